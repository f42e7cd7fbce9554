//! A minimal token cursor over `sqlparser`'s tokenizer output. We reuse
//! `sqlparser` for lexing only: none of its bundled grammars understand
//! GoogleSQL/Spanner DDL, so statement-level parsing is hand-rolled in
//! [`crate::statement`] and [`crate::types`].

use sqlparser::tokenizer::Token;

pub(crate) struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub(crate) fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    pub(crate) fn peek_word(&self) -> Option<&'a str> {
        match self.peek() {
            Some(Token::Word(word)) => Some(word.value.as_str()),
            _ => None,
        }
    }

    pub(crate) fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    pub(crate) fn eat_word(&mut self, word: &str) -> bool {
        if self.peek_word().is_some_and(|found| found.eq_ignore_ascii_case(word)) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_token(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect_word(&mut self, word: &str) -> Result<(), String> {
        if self.eat_word(word) {
            Ok(())
        } else {
            Err(format!("expected `{word}`, found {:?}", self.peek()))
        }
    }

    pub(crate) fn expect_token(&mut self, token: &Token) -> Result<(), String> {
        if self.eat_token(token) {
            Ok(())
        } else {
            Err(format!("expected `{token}`, found {:?}", self.peek()))
        }
    }

    pub(crate) fn next_identifier(&mut self) -> Result<String, String> {
        match self.advance() {
            Some(Token::Word(word)) => Ok(word.value.clone()),
            other => Err(format!("expected identifier, found {other:?}")),
        }
    }

    pub(crate) fn next_number(&mut self) -> Result<u64, String> {
        match self.advance() {
            Some(Token::Number(value, _)) => value
                .parse::<u64>()
                .map_err(|err| format!("invalid integer literal `{value}`: {err}")),
            other => Err(format!("expected integer literal, found {other:?}")),
        }
    }

    /// Consumes tokens up to (not including) a top-level comma or any of
    /// `terminators`, honoring parenthesis nesting. Returns the normalized
    /// text of the consumed span (§9: canonicalize whitespace once).
    pub(crate) fn capture_until(&mut self, terminators: &[&str]) -> String {
        let mut depth = 0i32;
        let mut parts = Vec::new();
        while let Some(token) = self.peek() {
            if depth == 0 {
                if let Token::Word(word) = token {
                    if terminators.iter().any(|t| word.value.eq_ignore_ascii_case(t)) {
                        break;
                    }
                }
                if matches!(token, Token::Comma | Token::RParen) {
                    break;
                }
            }
            match token {
                Token::LParen => depth += 1,
                Token::RParen => depth -= 1,
                _ => {}
            }
            parts.push(token.to_string());
            self.advance();
        }
        join_tokens(&parts)
    }

    /// Consumes tokens up to (not including) a top-level occurrence of any of
    /// `terminators`, honoring parenthesis nesting but *not* stopping at a
    /// top-level comma (used for clauses like `FOR table1, table2(col)` where
    /// commas are part of the clause, not a delimiter of it).
    pub(crate) fn capture_until_keyword(&mut self, terminators: &[&str]) -> String {
        let mut depth = 0i32;
        let mut parts = Vec::new();
        while let Some(token) = self.peek() {
            if depth == 0 {
                if let Token::Word(word) = token {
                    if terminators.iter().any(|t| word.value.eq_ignore_ascii_case(t)) {
                        break;
                    }
                }
                if matches!(token, Token::RParen) {
                    break;
                }
            }
            match token {
                Token::LParen => depth += 1,
                Token::RParen => depth -= 1,
                _ => {}
            }
            parts.push(token.to_string());
            self.advance();
        }
        join_tokens(&parts)
    }

    /// Consumes a `(` ... `)` group (outer parens included in the input
    /// stream), returning the inner text only.
    pub(crate) fn capture_parenthesized(&mut self) -> Result<String, String> {
        self.expect_token(&Token::LParen)?;
        let mut depth = 1i32;
        let mut parts = Vec::new();
        loop {
            match self.advance() {
                Some(Token::LParen) => {
                    depth += 1;
                    parts.push("(".to_string());
                }
                Some(Token::RParen) => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                    parts.push(")".to_string());
                }
                Some(token) => parts.push(token.to_string()),
                None => return Err("unterminated parenthesized group".to_string()),
            }
        }
        Ok(join_tokens(&parts))
    }

    /// Consumes a `<` ... `>` group (outer angle brackets included in the
    /// input stream), returning the inner text only. Used for `ARRAY<...>`
    /// and `STRUCT<...>` type syntax.
    pub(crate) fn capture_angle_bracketed(&mut self) -> Result<String, String> {
        self.expect_token(&Token::Lt)?;
        let mut depth = 1i32;
        let mut parts = Vec::new();
        loop {
            match self.advance() {
                Some(Token::Lt) => {
                    depth += 1;
                    parts.push("<".to_string());
                }
                Some(Token::Gt) => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                    parts.push(">".to_string());
                }
                Some(token) => parts.push(token.to_string()),
                None => return Err("unterminated angle-bracketed type".to_string()),
            }
        }
        Ok(join_tokens(&parts))
    }

    pub(crate) fn rest_as_text(&mut self) -> String {
        let mut parts = Vec::new();
        while let Some(token) = self.advance() {
            parts.push(token.to_string());
        }
        join_tokens(&parts)
    }
}

/// Joins rendered tokens with normalized spacing: a single space between
/// tokens in general, tightened around parens and commas so `( x )` becomes
/// `(x)` and `a , b` becomes `a, b`.
pub(crate) fn join_tokens(tokens: &[String]) -> String {
    let mut text = tokens.join(" ");
    for (pattern, replacement) in [(" (", "("), ("( ", "("), (" )", ")"), (" ,", ",")] {
        while text.contains(pattern) {
            text = text.replace(pattern, replacement);
        }
    }
    text
}
