//! Recursive-descent parser for tech-stack queries.
//!
//! Grammar, highest binding last:
//!
//! ```text
//! Expr    := OrExpr
//! OrExpr  := AndExpr (OR AndExpr)*
//! AndExpr := NotExpr ((AND)? NotExpr)*     juxtaposition is an implicit AND
//! NotExpr := NOT NotExpr | Atom
//! Atom    := IDENTIFIER | LPAREN Expr RPAREN
//! ```

use std::iter::Peekable;
use std::slice;

use crate::error::QueryError;
use crate::query::{Expr, Token, TokenKind};

type Result<T> = std::result::Result<T, QueryError>;

/// Deepest allowed stack of open parentheses and `NOT`s.
pub const MAX_NESTING: usize = 128;

/// Longest accepted query, in tokens. Bounds the depth of AND/OR chains.
pub const MAX_TOKENS: usize = 512;

/// Parse a token sequence into an expression tree.
///
/// Every tree this returns is at most [`MAX_TOKENS`] levels deep, so the
/// recursive evaluator, formatter and destructor stay within the stack.
pub fn parse(tokens: &[Token]) -> Result<Expr> {
    if let Some(token) = tokens.get(MAX_TOKENS) {
        return Err(QueryError::TooLong {
            limit: MAX_TOKENS,
            position: token.position,
        });
    }
    Parser::new(tokens).parse()
}

struct Parser<'a> {
    iter: Peekable<slice::Iter<'a, Token>>,
    /// Number of currently open parentheses
    depth: usize,
    /// Open parentheses plus pending `NOT`s
    nesting: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            iter: tokens.iter().peekable(),
            depth: 0,
            nesting: 0,
        }
    }

    fn enter(&mut self, token: &Token) -> Result<()> {
        self.nesting += 1;
        if self.nesting > MAX_NESTING {
            return Err(QueryError::TooDeep {
                limit: MAX_NESTING,
                position: token.position,
            });
        }
        Ok(())
    }

    fn parse(mut self) -> Result<Expr> {
        if self.iter.peek().is_none() {
            return Err(QueryError::Empty);
        }

        let expr = self.parse_or()?;
        match self.iter.next() {
            None => Ok(expr),
            Some(token) if token.kind == TokenKind::RParen => Err(QueryError::UnmatchedParen {
                position: token.position,
            }),
            Some(token) => Err(unexpected(token)),
        }
    }

    fn peek_kind(&mut self) -> Option<TokenKind> {
        self.iter.peek().map(|t| t.kind)
    }

    /// The token after `operator` must be able to start an operand.
    fn expect_operand(&mut self, operator: &Token) -> Result<()> {
        match self.iter.peek() {
            Some(token) if token.starts_operand() => Ok(()),
            _ => Err(missing_operand(operator)),
        }
    }

    fn parse_or(&mut self) -> Result<Expr> {
        let mut left = self.parse_and()?;
        while let Some(TokenKind::Or) = self.peek_kind() {
            let operator = self.iter.next().ok_or(QueryError::Empty)?;
            self.expect_operand(operator)?;
            let right = self.parse_and()?;
            left = Expr::or(left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr> {
        let mut left = self.parse_not()?;
        loop {
            match self.iter.peek().map(|t| (t.kind, t.starts_operand())) {
                Some((TokenKind::And, _)) => {
                    let operator = self.iter.next().ok_or(QueryError::Empty)?;
                    self.expect_operand(operator)?;
                }
                Some((_, true)) => {}
                _ => break,
            }
            let right = self.parse_not()?;
            left = Expr::and(left, right);
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expr> {
        if let Some(TokenKind::Not) = self.peek_kind() {
            let operator = self.iter.next().ok_or(QueryError::Empty)?;
            self.expect_operand(operator)?;
            self.enter(operator)?;
            let inner = self.parse_not()?;
            self.nesting -= 1;
            return Ok(Expr::not(inner));
        }
        self.parse_atom()
    }

    fn parse_atom(&mut self) -> Result<Expr> {
        let token = self.iter.next().ok_or(QueryError::Empty)?;
        match token.kind {
            TokenKind::Identifier => Ok(Expr::term(&token.text)),
            TokenKind::LParen => {
                match self.iter.peek() {
                    None => {
                        return Err(QueryError::UnclosedParen {
                            position: token.position,
                        });
                    }
                    Some(next) if next.kind == TokenKind::RParen => return Err(unexpected(next)),
                    Some(_) => {}
                }

                self.enter(token)?;
                self.depth += 1;
                let inner = self.parse_or()?;
                self.depth -= 1;
                self.nesting -= 1;

                match self.iter.next() {
                    Some(close) if close.kind == TokenKind::RParen => Ok(inner),
                    Some(other) => Err(unexpected(other)),
                    None => Err(QueryError::UnclosedParen {
                        position: token.position,
                    }),
                }
            }
            TokenKind::And | TokenKind::Or | TokenKind::Not => Err(missing_operand(token)),
            TokenKind::RParen if self.depth == 0 => Err(QueryError::UnmatchedParen {
                position: token.position,
            }),
            TokenKind::RParen => Err(unexpected(token)),
        }
    }
}

fn unexpected(token: &Token) -> QueryError {
    QueryError::UnexpectedToken {
        found: token.text.clone(),
        position: token.position,
    }
}

fn missing_operand(operator: &Token) -> QueryError {
    QueryError::MissingOperand {
        operator: operator.text.to_uppercase(),
        position: operator.position,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Tokenizer;

    fn parse_str(query: &str) -> Result<Expr> {
        parse(&Tokenizer::new().tokenize(query))
    }

    fn t(name: &str) -> Expr {
        Expr::term(name)
    }

    #[test]
    fn test_single_term() {
        assert_eq!(parse_str("Rust").unwrap(), t("rust"));
    }

    #[test]
    fn test_precedence_and_over_or() {
        assert_eq!(
            parse_str("Python AND React OR Angular").unwrap(),
            Expr::or(Expr::and(t("python"), t("react")), t("angular"))
        );
        assert_eq!(
            parse_str("Python OR React AND Angular").unwrap(),
            Expr::or(t("python"), Expr::and(t("react"), t("angular")))
        );
    }

    #[test]
    fn test_not_binds_tightest() {
        assert_eq!(
            parse_str("C AND NOT C++").unwrap(),
            Expr::and(t("c"), Expr::not(t("c++")))
        );
        assert_eq!(
            parse_str("NOT Go OR Rust").unwrap(),
            Expr::or(Expr::not(t("go")), t("rust"))
        );
        assert_eq!(parse_str("NOT NOT Go").unwrap(), Expr::not(Expr::not(t("go"))));
    }

    #[test]
    fn test_parentheses_override() {
        assert_eq!(
            parse_str("Python AND (React OR Angular)").unwrap(),
            Expr::and(t("python"), Expr::or(t("react"), t("angular")))
        );
        assert_eq!(
            parse_str("NOT (Go OR Rust)").unwrap(),
            Expr::not(Expr::or(t("go"), t("rust")))
        );
    }

    #[test]
    fn test_left_associative() {
        assert_eq!(
            parse_str("a OR b OR c").unwrap(),
            Expr::or(Expr::or(t("a"), t("b")), t("c"))
        );
        assert_eq!(
            parse_str("a AND b AND c").unwrap(),
            Expr::and(Expr::and(t("a"), t("b")), t("c"))
        );
    }

    #[test]
    fn test_implicit_and() {
        assert_eq!(
            parse_str("Python React").unwrap(),
            Expr::and(t("python"), t("react"))
        );
        assert_eq!(
            parse_str("Python React OR Go").unwrap(),
            Expr::or(Expr::and(t("python"), t("react")), t("go"))
        );
        assert_eq!(
            parse_str("(Go) (Rust) NOT Java").unwrap(),
            Expr::and(Expr::and(t("go"), t("rust")), Expr::not(t("java")))
        );
    }

    #[test]
    fn test_empty_query() {
        assert_eq!(parse_str(""), Err(QueryError::Empty));
        assert_eq!(parse_str("  ,; "), Err(QueryError::Empty));
    }

    #[test]
    fn test_dangling_operators() {
        assert_eq!(
            parse_str("AND Python"),
            Err(QueryError::MissingOperand {
                operator: "AND".into(),
                position: 0
            })
        );
        assert_eq!(
            parse_str("Python or"),
            Err(QueryError::MissingOperand {
                operator: "OR".into(),
                position: 7
            })
        );
        assert_eq!(
            parse_str("Python AND OR React"),
            Err(QueryError::MissingOperand {
                operator: "AND".into(),
                position: 7
            })
        );
        assert_eq!(
            parse_str("Python NOT"),
            Err(QueryError::MissingOperand {
                operator: "NOT".into(),
                position: 7
            })
        );
    }

    #[test]
    fn test_unbalanced_parentheses() {
        assert_eq!(
            parse_str("Python AND ("),
            Err(QueryError::UnclosedParen { position: 11 })
        );
        assert_eq!(
            parse_str("(Python OR Go"),
            Err(QueryError::UnclosedParen { position: 0 })
        );
        assert_eq!(
            parse_str("Python) Go"),
            Err(QueryError::UnmatchedParen { position: 6 })
        );
        assert_eq!(
            parse_str(") Python"),
            Err(QueryError::UnmatchedParen { position: 0 })
        );
        assert_eq!(
            parse_str("Go AND ()"),
            Err(QueryError::UnexpectedToken {
                found: ")".into(),
                position: 8
            })
        );
        assert_eq!(
            parse_str("(Go OR)"),
            Err(QueryError::MissingOperand {
                operator: "OR".into(),
                position: 4
            })
        );
    }

    #[test]
    fn test_nesting_limit() {
        assert_eq!(parse_str(&nested_parens(MAX_NESTING)).unwrap(), t("python"));
        assert_eq!(
            parse_str(&nested_parens(200)),
            Err(QueryError::TooDeep {
                limit: MAX_NESTING,
                position: MAX_NESTING
            })
        );

        let nots = format!("{}Go", "NOT ".repeat(200));
        assert_eq!(
            parse_str(&nots),
            Err(QueryError::TooDeep {
                limit: MAX_NESTING,
                position: MAX_NESTING * 4
            })
        );

        // Sibling groups do not accumulate nesting.
        let siblings = vec!["(Go)"; 150].join(" ");
        assert!(parse_str(&siblings).is_ok());
    }

    #[test]
    fn test_token_limit() {
        let deep = nested_parens(5_000);
        assert!(matches!(
            parse_str(&deep),
            Err(QueryError::TooLong { limit: MAX_TOKENS, .. })
        ));

        let nots = format!("{}Go", "NOT ".repeat(200_000));
        assert_eq!(
            parse_str(&nots),
            Err(QueryError::TooLong {
                limit: MAX_TOKENS,
                position: MAX_TOKENS * 4
            })
        );

        let chain = vec!["Go"; 1_000].join(" OR ");
        assert!(matches!(parse_str(&chain), Err(QueryError::TooLong { .. })));
    }

    fn nested_parens(levels: usize) -> String {
        format!("{}Python{}", "(".repeat(levels), ")".repeat(levels))
    }

    #[test]
    fn test_canonical_form_round_trips() {
        let queries = [
            "Python AND (React OR Angular)",
            "C AND NOT C++",
            "Python React OR Go",
            "a OR (b OR c)",
            "NOT (Go AND Rust) OR .NET",
            r#""Ruby on Rails" Postgres"#,
            "(a AND b) AND (c OR NOT d)",
        ];
        for query in queries {
            let expr = parse_str(query).unwrap();
            let canonical = expr.to_string();
            assert_eq!(parse_str(&canonical).unwrap(), expr, "{query} -> {canonical}");
        }
    }
}
