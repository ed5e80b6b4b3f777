//! Lexer for Fein source text.
//!
//! [`Scanner`] walks the source bytes once and yields `Result<Token<'a>>`
//! items.  Lexemes are slices of the input, so tokens borrow from it and
//! nothing is copied except string and number literal payloads.
//!
//! What gets skipped:
//!
//! * spaces, tabs, carriage returns and newlines (newlines bump `line`);
//! * `// line comments`, up to the next newline;
//! * `/* block comments */`, which may span lines and do not nest.  The
//!   first `*/` closes the comment.
//!
//! Lexical problems (`Unexpected character: c`, `Unterminated string.`,
//! `Unterminated block comment.`) come out of the iterator as
//! [`FeinError::Lex`] items and scanning resumes right after them, so one
//! pass reports all of them.  After the last token the scanner yields a
//! single `EOF` and is then exhausted for good ([`FusedIterator`]).
//!
//! Both comment forms are skipped with `memchr`: `memchr` finds the end of
//! a line comment, `memmem` finds the `*/` of a block comment and
//! `memchr_iter` counts the newlines it swallowed.
//!
//! ```rust
//! use fein::scanner::Scanner;
//!
//! let tokens: Vec<_> = Scanner::new("print 1; /* done */")
//!     .filter_map(Result::ok)
//!     .map(|t| t.token_type.name())
//!     .collect();
//!
//! assert_eq!(tokens, ["PRINT", "NUMBER", "SEMICOLON", "EOF"]);
//! ```

use crate::error::{FeinError, Result};
use crate::token::{Token, TokenType};
use log::{debug, info};
use memchr::{memchr, memchr_iter, memmem};
use phf::phf_map;
use std::iter::FusedIterator;

// ─────────────────────────────────────────────────────────────────────────────
// Static keyword map (compile‑time perfect hash)
// ─────────────────────────────────────────────────────────────────────────────

static KEYWORDS: phf::Map<&'static [u8], TokenType> = phf_map! {
    b"and"    => TokenType::AND,
    b"class"  => TokenType::CLASS,
    b"else"   => TokenType::ELSE,
    b"false"  => TokenType::FALSE,
    b"fun"    => TokenType::FUN,
    b"for"    => TokenType::FOR,
    b"if"     => TokenType::IF,
    b"nil"    => TokenType::NIL,
    b"or"     => TokenType::OR,
    b"print"  => TokenType::PRINT,
    b"return" => TokenType::RETURN,
    b"super"  => TokenType::SUPER,
    b"this"   => TokenType::THIS,
    b"true"   => TokenType::TRUE,
    b"var"    => TokenType::VAR,
    b"while"  => TokenType::WHILE,
};

/// Byte-level cursor over one source text.
///
/// `start..curr` is the lexeme being scanned.  `curr` reaching `len() + 1`
/// marks that `EOF` has been handed out.
pub struct Scanner<'a> {
    text: &'a str,
    src: &'a [u8],
    start: usize,
    curr: usize,
    line: usize,
    /// Kind recognised by the last `scan_token`; `None` after trivia.
    pending: Option<TokenType>,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        info!("Scanner created over {} bytes", text.len());

        Self {
            text,
            src: text.as_bytes(),
            start: 0,
            curr: 0,
            line: 1,
            pending: None,
        }
    }

    #[inline(always)]
    const fn len(&self) -> usize {
        self.src.len()
    }

    #[inline(always)]
    fn is_at_end(&self) -> bool {
        self.curr >= self.len()
    }

    /// Callers check `is_at_end` first.
    #[inline(always)]
    fn advance(&mut self) -> u8 {
        let b = self.src[self.curr];
        self.curr += 1;
        b
    }

    /// Current byte, or `0` past the end.
    #[inline(always)]
    fn peek(&self) -> u8 {
        self.src.get(self.curr).copied().unwrap_or(0)
    }

    /// Byte after the current one, or `0` past the end.
    #[inline(always)]
    fn peek_next(&self) -> u8 {
        self.src.get(self.curr + 1).copied().unwrap_or(0)
    }

    #[inline(always)]
    fn match_byte(&mut self, expected: u8) -> bool {
        let matched = !self.is_at_end() && self.peek() == expected;
        if matched {
            self.curr += 1;
        }
        matched
    }

    /// Consumes one lexeme.  A token sets `pending`; whitespace and comments
    /// leave it `None`.
    fn scan_token(&mut self) -> Result<()> {
        let b = self.advance();

        match b {
            // ── single‑character punctuators ──────────────────────────────
            b'(' => self.pending = Some(TokenType::LEFT_PAREN),
            b')' => self.pending = Some(TokenType::RIGHT_PAREN),
            b'{' => self.pending = Some(TokenType::LEFT_BRACE),
            b'}' => self.pending = Some(TokenType::RIGHT_BRACE),
            b',' => self.pending = Some(TokenType::COMMA),
            b'.' => self.pending = Some(TokenType::DOT),
            b'-' => self.pending = Some(TokenType::MINUS),
            b'+' => self.pending = Some(TokenType::PLUS),
            b';' => self.pending = Some(TokenType::SEMICOLON),
            b'*' => self.pending = Some(TokenType::STAR),

            // ── two‑character operators (!=, ==, <=, >=) ─────────────────
            b'!' => {
                let tt = if self.match_byte(b'=') {
                    TokenType::BANG_EQUAL
                } else {
                    TokenType::BANG
                };

                self.pending = Some(tt);
            }

            b'=' => {
                let tt = if self.match_byte(b'=') {
                    TokenType::EQUAL_EQUAL
                } else {
                    TokenType::EQUAL
                };

                self.pending = Some(tt);
            }

            b'<' => {
                let tt = if self.match_byte(b'=') {
                    TokenType::LESS_EQUAL
                } else {
                    TokenType::LESS
                };

                self.pending = Some(tt);
            }

            b'>' => {
                let tt = if self.match_byte(b'=') {
                    TokenType::GREATER_EQUAL
                } else {
                    TokenType::GREATER
                };

                self.pending = Some(tt);
            }

            // ── whitespace / newline ─────────────────────────────────────
            b' ' | b'\r' | b'\t' => {
                return Ok(()); // skip insignificants
            }

            b'\n' => {
                self.line += 1; // track for diagnostics

                return Ok(());
            }

            // ── comments, or a plain slash ───────────────────────────────
            b'/' => {
                if self.match_byte(b'/') {
                    // the newline itself is left for the main loop to count
                    self.curr = memchr(b'\n', &self.src[self.curr..])
                        .map_or(self.len(), |pos| self.curr + pos);

                    return Ok(());
                }

                if self.match_byte(b'*') {
                    return self.skip_block_comment();
                }

                self.pending = Some(TokenType::SLASH);
            }

            // ── string literal " … " ─────────────────────────────────────
            b'"' => {
                return self.parse_string();
            }

            // ── number literal (digit‑leading) ───────────────────────────
            b'0'..=b'9' => {
                self.parse_number();
            }

            // ── identifiers / keywords (alpha or underscore‑leading) ─────
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                self.parse_identifier();
            }

            // ── unexpected character ─────────────────────────────────────
            _ => {
                // Swallow the continuation bytes of a multi‑byte character so
                // the next lexeme starts on a char boundary.
                while self.peek() & 0xC0 == 0x80 {
                    self.advance();
                }

                let c: char = self.text[self.start..]
                    .chars()
                    .next()
                    .unwrap_or(char::REPLACEMENT_CHARACTER);

                return Err(FeinError::lex(
                    self.line,
                    format!("Unexpected character: {}", c),
                ));
            }
        }

        Ok(())
    }

    /// Skip the rest of a `/* ... */` comment; the opening `/*` is consumed.
    fn skip_block_comment(&mut self) -> Result<()> {
        let rest: &[u8] = &self.src[self.curr..];

        let (body_len, closed) = match memmem::find(rest, b"*/") {
            Some(pos) => (pos, true),
            None => (rest.len(), false),
        };

        self.line += memchr_iter(b'\n', &rest[..body_len]).count();

        if !closed {
            self.curr = self.len();
            return Err(FeinError::lex(self.line, "Unterminated block comment."));
        }

        self.curr += body_len + 2;
        debug!("Skipped block comment, now on line {}", self.line);

        Ok(())
    }

    /// Parse a double‑quoted string literal.
    ///
    /// * `self.start` still points to the opening `"`.
    /// * When we return, `self.curr` points **past** the closing `"`.
    fn parse_string(&mut self) -> Result<()> {
        while !self.is_at_end() && self.peek() != b'"' {
            if self.advance() == b'\n' {
                self.line += 1; // multi‑line strings are allowed
            }
        }

        if self.is_at_end() {
            return Err(FeinError::lex(self.line, "Unterminated string."));
        }

        self.advance(); // consume closing quote

        // Slice excluding the surrounding quotes; both are ASCII so the
        // bounds sit on char boundaries.
        let s: &str = &self.text[self.start + 1..self.curr - 1];

        self.pending = Some(TokenType::STRING(s.to_owned()));

        Ok(())
    }

    /// Parse a numeric literal (`123`, `3.14`).  Fractions are optional.
    fn parse_number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        // Optional fractional part.
        if self.peek() == b'.' && self.peek_next().is_ascii_digit() {
            self.advance(); // consume "."

            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let s: &str = &self.text[self.start..self.curr];
        let n: f64 = s.parse::<f64>().unwrap_or(0.0); // parse never fails (checked digits)
        self.pending = Some(TokenType::NUMBER(n));
    }

    /// Parse an identifier and decide if it is a **keyword** or a generic
    /// `IDENTIFIER` token.
    fn parse_identifier(&mut self) {
        while {
            let c: u8 = self.peek();
            c.is_ascii_alphanumeric() || c == b'_'
        } {
            self.advance();
        }

        let slice: &[u8] = &self.src[self.start..self.curr];

        let tt: TokenType = KEYWORDS
            .get(slice)
            .cloned()
            .unwrap_or(TokenType::IDENTIFIER);

        self.pending = Some(tt);
    }
}

// ───────────────────────── Iterator implementation ─────────────────────────

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.curr <= self.len() {
            if self.curr == self.len() {
                self.curr += 1;
                return Some(Ok(Token::new(TokenType::EOF, "", self.line)));
            }

            self.start = self.curr;
            self.pending = None;

            if let Err(e) = self.scan_token() {
                debug!("Lexical error: {}", e);
                return Some(Err(e));
            }

            if let Some(tt) = self.pending.take() {
                let lexeme: &'a str = &self.text[self.start..self.curr];
                return Some(Ok(Token::new(tt, lexeme, self.line)));
            }
        }

        None
    }
}

impl<'a> FusedIterator for Scanner<'a> {}
