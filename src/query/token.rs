//! Lexical analysis of tech-stack queries.
//!
//! Some examples of valid inputs:
//!  - `Python React`
//!  - `Python AND (React OR Angular)`
//!  - `C AND NOT C++`
//!  - `"Ruby on Rails" OR Django`

use std::fmt;

use crate::models::{Config, Vocabulary};

/// Classification of a lexical unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    And,
    Or,
    Not,
    LParen,
    RParen,
}

/// A classified lexical unit with its raw text and byte offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }

    /// Whether this token can start an operand.
    pub fn starts_operand(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Identifier | TokenKind::LParen | TokenKind::Not
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Splits raw query strings into tokens.
///
/// Unquoted identifiers are contiguous runs of alphanumerics and the
/// configured symbol characters; any other character is dropped and ends
/// the current run. Keywords are recognized case-insensitively only as whole
/// unquoted words.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    symbol_chars: Vec<char>,
    /// Multi-word names merged without quoting, longest first
    phrases: Vec<Vec<String>>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    /// Tokenizer with the default symbol allow-list (`+ # . -`).
    pub fn new() -> Self {
        Self::with_symbols("+#.-")
    }

    /// Tokenizer with a custom symbol allow-list.
    pub fn with_symbols(symbols: &str) -> Self {
        Self {
            symbol_chars: symbols.chars().collect(),
            phrases: Vec::new(),
        }
    }

    /// Tokenizer configured from the query section and vocabulary.
    pub fn from_config(config: &Config) -> Self {
        Self::with_symbols(&config.query.symbol_chars).with_vocabulary(&config.vocabulary)
    }

    /// Recognize the vocabulary's multi-word names as single identifiers.
    pub fn with_vocabulary(mut self, vocabulary: &Vocabulary) -> Self {
        let mut phrases = vocabulary.multi_word_forms();
        phrases.sort_by(|a, b| b.len().cmp(&a.len()));
        phrases.dedup();
        self.phrases = phrases;
        self
    }

    fn is_word_char(&self, c: char) -> bool {
        c.is_alphanumeric() || self.symbol_chars.contains(&c)
    }

    /// Tokenize a query. Never fails; unusable characters are dropped.
    pub fn tokenize(&self, query: &str) -> Vec<Token> {
        let mut scanned: Vec<(Token, bool)> = Vec::new();
        let mut chars = query.char_indices().peekable();

        while let Some((position, ch)) = chars.next() {
            match ch {
                c if c.is_whitespace() => continue,
                '(' => scanned.push((Token::new(TokenKind::LParen, "(", position), false)),
                ')' => scanned.push((Token::new(TokenKind::RParen, ")", position), false)),
                '"' => {
                    let mut word = String::new();
                    for (_, c) in chars.by_ref() {
                        if c == '"' {
                            break;
                        }
                        word.push(c);
                    }
                    let word = word.split_whitespace().collect::<Vec<_>>().join(" ");
                    if !word.is_empty() {
                        scanned.push((Token::new(TokenKind::Identifier, word, position), true));
                    }
                }
                // Anything else outside the allow-list separates words.
                c if !self.is_word_char(c) => continue,
                first => {
                    let mut word = String::from(first);
                    while let Some(&(_, c)) = chars.peek() {
                        if !self.is_word_char(c) {
                            break;
                        }
                        word.push(c);
                        chars.next();
                    }
                    scanned.push((Self::classify(word, position), false));
                }
            }
        }

        self.merge_phrases(scanned)
    }

    fn classify(word: String, position: usize) -> Token {
        let kind = match word.to_ascii_uppercase().as_str() {
            "AND" => TokenKind::And,
            "OR" => TokenKind::Or,
            "NOT" => TokenKind::Not,
            _ => TokenKind::Identifier,
        };
        Token::new(kind, word, position)
    }

    /// Collapse runs of unquoted identifiers that spell a known multi-word name.
    fn merge_phrases(&self, scanned: Vec<(Token, bool)>) -> Vec<Token> {
        let mut tokens = Vec::with_capacity(scanned.len());
        let mut i = 0;

        while i < scanned.len() {
            let matched = self
                .phrases
                .iter()
                .find(|phrase| {
                    phrase.len() <= scanned.len() - i
                        && phrase.iter().zip(&scanned[i..]).all(|(word, (token, quoted))| {
                            !quoted
                                && token.kind == TokenKind::Identifier
                                && token.text.to_lowercase() == *word
                        })
                })
                .map(Vec::len);

            match matched {
                Some(len) => {
                    let text = scanned[i..i + len]
                        .iter()
                        .map(|(t, _)| t.text.as_str())
                        .collect::<Vec<_>>()
                        .join(" ");
                    tokens.push(Token::new(TokenKind::Identifier, text, scanned[i].0.position));
                    i += len;
                }
                None => {
                    tokens.push(scanned[i].0.clone());
                    i += 1;
                }
            }
        }
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_symbol_bearing_identifiers() {
        let tokens = Tokenizer::new().tokenize("C++ .NET Node.js Objective-C C#");
        assert_eq!(texts(&tokens), vec!["C++", ".NET", "Node.js", "Objective-C", "C#"]);
        assert!(tokens.iter().all(|t| t.kind == TokenKind::Identifier));
    }

    #[test]
    fn test_keywords_case_insensitive() {
        let tokens = Tokenizer::new().tokenize("python and react Or NOT angular");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Identifier,
                TokenKind::And,
                TokenKind::Identifier,
                TokenKind::Or,
                TokenKind::Not,
                TokenKind::Identifier,
            ]
        );
    }

    #[test]
    fn test_keyword_inside_word_is_identifier() {
        let tokens = Tokenizer::new().tokenize("Android ORM");
        assert_eq!(kinds(&tokens), vec![TokenKind::Identifier, TokenKind::Identifier]);
    }

    #[test]
    fn test_parentheses_without_spaces() {
        let tokens = Tokenizer::new().tokenize("Python AND(React OR Angular)");
        assert_eq!(texts(&tokens), vec!["Python", "AND", "(", "React", "OR", "Angular", ")"]);
        assert_eq!(tokens[2].position, 10);
    }

    #[test]
    fn test_disallowed_characters_dropped() {
        let tokens = Tokenizer::new().tokenize("Python, React! ;");
        assert_eq!(texts(&tokens), vec!["Python", "React"]);
    }

    #[test]
    fn test_disallowed_characters_split_words() {
        let tokens = Tokenizer::new().tokenize("Python,React Rust/Go");
        assert_eq!(texts(&tokens), vec!["Python", "React", "Rust", "Go"]);
        assert_eq!(tokens[1].position, 7);
        assert_eq!(tokens[3].position, 18);

        let tokens = Tokenizer::new().tokenize("Go,AND;Rust");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Identifier, TokenKind::And, TokenKind::Identifier]
        );
    }

    #[test]
    fn test_quoted_identifier() {
        let tokens = Tokenizer::new().tokenize(r#""Ruby  on Rails" OR "and""#);
        assert_eq!(texts(&tokens), vec!["Ruby on Rails", "OR", "and"]);
        assert_eq!(tokens[2].kind, TokenKind::Identifier);
    }

    #[test]
    fn test_unterminated_quote_runs_to_end() {
        let tokens = Tokenizer::new().tokenize(r#"Go "machine learning"#);
        assert_eq!(texts(&tokens), vec!["Go", "machine learning"]);
    }

    #[test]
    fn test_vocabulary_phrases_merged() {
        let tokenizer = Tokenizer::new().with_vocabulary(&Vocabulary::default());
        let tokens = tokenizer.tokenize("Ruby on Rails AND machine learning OR React");
        assert_eq!(
            texts(&tokens),
            vec!["Ruby on Rails", "AND", "machine learning", "OR", "React"]
        );
        assert_eq!(tokens[2].position, 18);
    }

    #[test]
    fn test_empty_input() {
        assert!(Tokenizer::new().tokenize("   ").is_empty());
        assert!(Tokenizer::new().tokenize("").is_empty());
    }
}
