//! Evaluation of expression trees against a posting's tag set.

use crate::models::TagSet;
use crate::query::Expr;

/// Evaluate `expr` against `tags`.
///
/// Pure and total. `AND` stops at the first false operand and `OR` at the
/// first true one.
pub fn evaluate(expr: &Expr, tags: &TagSet) -> bool {
    match expr {
        Expr::Term(name) => tags.contains(name),
        Expr::Not(inner) => !evaluate(inner, tags),
        Expr::And(left, right) => evaluate(left, tags) && evaluate(right, tags),
        Expr::Or(left, right) => evaluate(left, tags) || evaluate(right, tags),
    }
}

impl Expr {
    /// Whether a posting with these tags satisfies the expression.
    pub fn matches(&self, tags: &TagSet) -> bool {
        evaluate(self, tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Term, Tokenizer, parse};

    fn tags(names: &[&str]) -> TagSet {
        names.iter().copied().collect()
    }

    fn eval_str(query: &str, names: &[&str]) -> bool {
        let expr = parse(&Tokenizer::new().tokenize(query)).unwrap();
        evaluate(&expr, &tags(names))
    }

    #[test]
    fn test_term_membership_is_case_insensitive() {
        assert!(eval_str("python", &["Python"]));
        assert!(eval_str("PYTHON", &["python"]));
        assert!(!eval_str("Cobol", &["Python"]));

        let built = Expr::Term(Term::new("React"));
        assert!(built.matches(&tags(&["react"])));
    }

    #[test]
    fn test_symbol_boundaries() {
        let only_cpp = ["C++"];
        assert!(!eval_str("C", &only_cpp));
        assert!(eval_str("C++", &only_cpp));
        assert!(eval_str("C++ AND NOT C", &only_cpp));
        assert!(!eval_str("C AND NOT C++", &only_cpp));
    }

    #[test]
    fn test_implicit_and() {
        assert!(eval_str("Python React", &["Python", "React"]));
        assert!(!eval_str("Python React", &["Python"]));
    }

    #[test]
    fn test_precedence() {
        assert!(eval_str("Python AND React OR Angular", &["Python", "Angular"]));
        assert!(!eval_str("Python AND (React OR Go)", &["Angular"]));
    }

    #[test]
    fn test_de_morgan() {
        let a = Expr::term("go");
        let b = Expr::term("rust");
        let lhs = Expr::not(Expr::and(a.clone(), b.clone()));
        let rhs = Expr::or(Expr::not(a.clone()), Expr::not(b.clone()));
        let lhs_or = Expr::not(Expr::or(a.clone(), b.clone()));
        let rhs_or = Expr::and(Expr::not(a), Expr::not(b));

        let cases: [&[&str]; 5] = [&[], &["go"], &["rust"], &["go", "rust"], &["java"]];
        for set in cases {
            let tags = tags(set);
            assert_eq!(evaluate(&lhs, &tags), evaluate(&rhs, &tags));
            assert_eq!(evaluate(&lhs_or, &tags), evaluate(&rhs_or, &tags));
        }
    }

    #[test]
    fn test_idempotent() {
        let expr = Expr::or(Expr::term("go"), Expr::not(Expr::term("rust")));
        let tags = tags(&["rust"]);
        assert_eq!(expr.matches(&tags), expr.matches(&tags));
    }

    #[test]
    fn test_unknown_term_never_matches() {
        assert!(!eval_str("Brainfuck", &["Python", "Rust"]));
        assert!(eval_str("NOT Brainfuck", &["Python"]));
    }
}
