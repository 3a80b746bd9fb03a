//! Expression tree of a parsed tech-stack query.

use std::fmt;
use std::ops::Deref;

use crate::models::Vocabulary;

/// A normalized (case-folded, trimmed) technology name.
///
/// The field is private so a term can only come from [`Term::new`], which
/// keeps it comparable with the names in a [`TagSet`](crate::models::TagSet).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Term(String);

impl Term {
    pub fn new(name: &str) -> Self {
        Self(Vocabulary::normalize(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for Term {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Describes an expression node in the query AST.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Term(Term),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Leaf node for a technology name (case-folded and trimmed).
    pub fn term(name: &str) -> Self {
        Expr::Term(Term::new(name))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(child: Expr) -> Self {
        Expr::Not(Box::new(child))
    }

    pub fn and(left: Expr, right: Expr) -> Self {
        Expr::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Expr, right: Expr) -> Self {
        Expr::Or(Box::new(left), Box::new(right))
    }

    /// Distinct term names in left-to-right order.
    pub fn terms(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_terms(&mut out);
        out
    }

    fn collect_terms<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::Term(name) => {
                if !out.contains(&name.as_str()) {
                    out.push(name.as_str());
                }
            }
            Expr::Not(inner) => inner.collect_terms(out),
            Expr::And(left, right) | Expr::Or(left, right) => {
                left.collect_terms(out);
                right.collect_terms(out);
            }
        }
    }

    /// Rewrite alias terms to their canonical names. Unknown terms are kept.
    pub fn resolve_aliases(&self, vocabulary: &Vocabulary) -> Expr {
        self.map_terms(&|name: &str| {
            vocabulary
                .canonical(name)
                .unwrap_or_else(|| name.to_string())
        })
    }

    fn map_terms(&self, f: &dyn Fn(&str) -> String) -> Expr {
        match self {
            Expr::Term(name) => Expr::Term(Term::new(&f(name.as_str()))),
            Expr::Not(inner) => Expr::not(inner.map_terms(f)),
            Expr::And(left, right) => Expr::and(left.map_terms(f), right.map_terms(f)),
            Expr::Or(left, right) => Expr::or(left.map_terms(f), right.map_terms(f)),
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Or(..) => 1,
            Expr::And(..) => 2,
            Expr::Not(_) => 3,
            Expr::Term(_) => 4,
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, parenthesize: bool) -> fmt::Result {
        if parenthesize {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }

    fn fmt_binary(
        &self,
        f: &mut fmt::Formatter<'_>,
        left: &Expr,
        operator: &str,
        right: &Expr,
    ) -> fmt::Result {
        let own = self.precedence();
        left.fmt_operand(f, left.precedence() < own)?;
        write!(f, " {operator} ")?;
        // Left-associative: a right operand of equal precedence keeps its parens.
        right.fmt_operand(f, right.precedence() <= own)
    }
}

/// Whether a term must be quoted to survive re-tokenization.
fn needs_quotes(name: &str) -> bool {
    name.is_empty()
        || matches!(name.to_ascii_uppercase().as_str(), "AND" | "OR" | "NOT")
        || name
            .chars()
            .any(|c| !(c.is_alphanumeric() || matches!(c, '+' | '#' | '.' | '-')))
}

/// Canonical, minimally parenthesized form that re-parses to the same tree.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Term(name) if needs_quotes(name) => write!(f, "\"{name}\""),
            Expr::Term(name) => f.write_str(name),
            Expr::Not(inner) => {
                f.write_str("NOT ")?;
                inner.fmt_operand(f, inner.precedence() < self.precedence())
            }
            Expr::And(left, right) => self.fmt_binary(f, left, "AND", right),
            Expr::Or(left, right) => self.fmt_binary(f, left, "OR", right),
        }
    }
}
