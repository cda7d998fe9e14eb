// src/frontend/lexer.rs

use crate::errors::LexerError;
use crate::frontend::{Span, Token, TokenType};

pub struct Lexer<'src> {
    source: &'src str,
    chars: std::iter::Peekable<std::str::CharIndices<'src>>,
    start: usize,
    current: usize,
    line: u32,
    column: u32,
    start_column: u32,
    start_line: u32,
    // Error collection
    errors: Vec<LexerError>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            start: 0,
            current: 0,
            line: 1,
            column: 1,
            start_column: 1,
            start_line: 1,
            errors: Vec::new(),
        }
    }

    /// Take all collected errors, leaving the internal list empty.
    pub fn take_errors(&mut self) -> Vec<LexerError> {
        std::mem::take(&mut self.errors)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Get the next token from the source
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        self.start = self.current;
        self.start_column = self.column;
        self.start_line = self.line;

        let Some(c) = self.advance() else {
            return self.make_token(TokenType::Eof);
        };

        match c {
            '(' => self.make_token(TokenType::LParen),
            ')' => self.make_token(TokenType::RParen),
            '[' => self.make_token(TokenType::LBracket),
            ']' => self.make_token(TokenType::RBracket),
            ',' => self.make_token(TokenType::Comma),
            ':' => self.make_token(TokenType::Colon),
            ';' => self.make_token(TokenType::Semicolon),
            '+' => self.make_token(TokenType::Plus),
            '-' => self.make_token(TokenType::Minus),
            '*' => self.make_token(TokenType::Star),
            '/' => self.make_token(TokenType::Slash),
            '%' => self.make_token(TokenType::Percent),
            '=' => {
                if self.match_char('=') {
                    self.make_token(TokenType::EqEq)
                } else {
                    self.make_token(TokenType::Assign)
                }
            }
            '!' => {
                if self.match_char('=') {
                    self.make_token(TokenType::NotEq)
                } else {
                    self.make_token(TokenType::Not)
                }
            }
            '<' => {
                if self.match_char('=') {
                    self.make_token(TokenType::LtEq)
                } else {
                    self.make_token(TokenType::Lt)
                }
            }
            '>' => {
                if self.match_char('=') {
                    self.make_token(TokenType::GtEq)
                } else {
                    self.make_token(TokenType::Gt)
                }
            }
            '&' => {
                if self.match_char('&') {
                    self.make_token(TokenType::AndAnd)
                } else {
                    self.error_token("unexpected character '&'")
                }
            }
            '|' => {
                if self.match_char('|') {
                    self.make_token(TokenType::OrOr)
                } else {
                    self.error_token("unexpected character '|'")
                }
            }
            '\'' => self.char_literal(),
            '"' => self.string_literal(),
            c if c.is_ascii_digit() => self.number(),
            c if c.is_alphabetic() || c == '_' => self.identifier(),
            c => self.error_token(&format!("unexpected character '{c}'")),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(&(_, c)) = self.chars.peek() {
            match c {
                ' ' | '\t' | '\r' | '\n' => {
                    self.advance();
                }
                '/' => {
                    // Only a comment if followed by another slash
                    let rest = &self.source[self.current..];
                    if rest.starts_with("//") {
                        while let Some(&(_, c)) = self.chars.peek() {
                            if c == '\n' {
                                break;
                            }
                            self.advance();
                        }
                    } else {
                        return;
                    }
                }
                _ => return,
            }
        }
    }

    fn advance(&mut self) -> Option<char> {
        let (idx, c) = self.chars.next()?;
        self.current = idx + c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn match_char(&mut self, expected: char) -> bool {
        match self.chars.peek() {
            Some(&(_, c)) if c == expected => {
                self.advance();
                true
            }
            _ => false,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn number(&mut self) -> Token {
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }
        // A '.' followed by a digit makes it a float
        let mut is_float = false;
        if matches!(self.peek(), Some('.')) {
            let after_dot = self.source[self.current + 1..].chars().next();
            if matches!(after_dot, Some(c) if c.is_ascii_digit()) {
                is_float = true;
                self.advance();
                while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                    self.advance();
                }
            }
        }
        if is_float {
            self.make_token(TokenType::FloatLiteral)
        } else {
            self.make_token(TokenType::IntLiteral)
        }
    }

    fn identifier(&mut self) -> Token {
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.advance();
        }
        let lexeme = &self.source[self.start..self.current];
        match TokenType::keyword(lexeme) {
            Some(kw) => self.make_token(kw),
            None => self.make_token(TokenType::Identifier),
        }
    }

    fn char_literal(&mut self) -> Token {
        match self.peek() {
            Some('\\') => {
                self.advance();
                self.advance(); // the escaped character
            }
            Some(c) if c != '\'' && c != '\n' => {
                self.advance();
            }
            _ => return self.error_token("empty character literal"),
        }
        if !self.match_char('\'') {
            return self.error_token("unterminated character literal");
        }
        self.make_token(TokenType::CharLiteral)
    }

    fn string_literal(&mut self) -> Token {
        loop {
            match self.peek() {
                Some('"') => {
                    self.advance();
                    return self.make_token(TokenType::StringLiteral);
                }
                Some('\\') => {
                    self.advance();
                    self.advance(); // the escaped character
                }
                Some('\n') | None => {
                    return self.error_token("unterminated string literal");
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    fn make_token(&self, ty: TokenType) -> Token {
        let span = Span::new(self.start, self.current, self.start_line, self.start_column);
        Token::new(ty, &self.source[self.start..self.current], span)
    }

    fn error_token(&mut self, message: &str) -> Token {
        let span = Span::new(self.start, self.current, self.start_line, self.start_column);
        self.errors.push(LexerError::InvalidToken {
            message: message.to_string(),
            span: span.into(),
        });
        Token::new(TokenType::Error, &self.source[self.start..self.current], span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_types(source: &str) -> Vec<TokenType> {
        let mut lexer = Lexer::new(source);
        let mut types = Vec::new();
        loop {
            let tok = lexer.next_token();
            if tok.ty == TokenType::Eof {
                break;
            }
            types.push(tok.ty);
        }
        types
    }

    #[test]
    fn lexes_function_header() {
        let types = token_types("func main()");
        assert_eq!(
            types,
            vec![
                TokenType::KwFunc,
                TokenType::Identifier,
                TokenType::LParen,
                TokenType::RParen
            ]
        );
    }

    #[test]
    fn lexes_operators() {
        let types = token_types("== != <= >= && || ! = %");
        assert_eq!(
            types,
            vec![
                TokenType::EqEq,
                TokenType::NotEq,
                TokenType::LtEq,
                TokenType::GtEq,
                TokenType::AndAnd,
                TokenType::OrOr,
                TokenType::Not,
                TokenType::Assign,
                TokenType::Percent,
            ]
        );
    }

    #[test]
    fn distinguishes_int_and_float() {
        let types = token_types("3 3.25");
        assert_eq!(types, vec![TokenType::IntLiteral, TokenType::FloatLiteral]);
    }

    #[test]
    fn lexes_char_and_string_literals() {
        let mut lexer = Lexer::new(r#"'a' '\n' "hi\n""#);
        assert_eq!(lexer.next_token().ty, TokenType::CharLiteral);
        assert_eq!(lexer.next_token().ty, TokenType::CharLiteral);
        assert_eq!(lexer.next_token().ty, TokenType::StringLiteral);
        assert!(!lexer.has_errors());
    }

    #[test]
    fn skips_line_comments() {
        let types = token_types("x // the rest is ignored\ny");
        assert_eq!(types, vec![TokenType::Identifier, TokenType::Identifier]);
    }

    #[test]
    fn keywords_are_not_identifiers() {
        let types = token_types("endwhile endif endvar");
        assert_eq!(
            types,
            vec![TokenType::KwEndWhile, TokenType::KwEndIf, TokenType::KwEndVar]
        );
    }

    #[test]
    fn reports_unterminated_string() {
        let mut lexer = Lexer::new("\"abc");
        let tok = lexer.next_token();
        assert_eq!(tok.ty, TokenType::Error);
        assert!(lexer.has_errors());
    }

    #[test]
    fn tracks_line_numbers() {
        let mut lexer = Lexer::new("a\nb");
        assert_eq!(lexer.next_token().span.line, 1);
        assert_eq!(lexer.next_token().span.line, 2);
    }
}
