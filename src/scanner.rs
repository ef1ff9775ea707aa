//! Module `scanner` implements a one‑pass, streaming lexer for the Lox language.
//!
//! It transforms a source string into a sequence of [`Token`]s, skipping whitespace
//! and comments, and emitting exactly one `EOF` token at the end. Designed as a `FusedIterator`,
//! it can be chained safely with other iterator adapters.
//!
//! # Public API
//!
//! - `Scanner::new(src: &'a str) -> Scanner<'a>`
//!   Create a new lexer over the input buffer.
//!
//! - `impl Iterator for Scanner<'a>`
//!   Yields `Result<Token, LoxError>` on each `.next()`. An `Err` reports a lexing
//!   error with line information; scanning resumes after the offending lexeme, so
//!   one pass surfaces every lexical error.
//!
//! - `Scanner::scan_tokens(self) -> (Vec<Token>, Diagnostics)`
//!   Drains the iterator, splitting tokens from errors.
//!
//! # Token Recognition (`lex_token`)
//!
//! - Single‑character tokens: `(`, `)`, `{`, `}`, `,`, `.`, `-`, `+`, `;`, `*`.
//! - Two‑character operators: `!=`, `==`, `<=`, `>=`.
//! - String literals: `"` … `"`, allowing multi‑line and reporting unterminated errors.
//! - Numeric literals: integer and optional fractional part; no exponent, no sign.
//! - Identifiers/keywords: alphanumeric/_ sequences, resolved via a perfect‑hash `KEYWORDS` map.
//! - Line comments via `memchr` for rapid new‑line search.
//!
//! # Example
//!
//! ```rust
//! use rox::scanner::Scanner;
//!
//! let mut scanner = Scanner::new("print 123; // example");
//! for result in &mut scanner {
//!     match result {
//!         Ok(token) => println!("{}", token),
//!         Err(err) => eprintln!("{}", err),
//!     }
//! }
//! ```


use crate::error::{Diagnostics, LoxError, Result};
use crate::token::{Token, TokenType};
use log::{debug, info};
use memchr::memchr;
use phf::phf_map;
use std::iter::FusedIterator;

// ─────────────────────────────────────────────────────────────────────────────
// Static keyword map (compile‑time perfect hash)
// ─────────────────────────────────────────────────────────────────────────────

static KEYWORDS: phf::Map<&'static str, TokenType> = phf_map! {
    "and"    => TokenType::AND,
    "class"  => TokenType::CLASS,
    "else"   => TokenType::ELSE,
    "false"  => TokenType::FALSE,
    "fun"    => TokenType::FUN,
    "for"    => TokenType::FOR,
    "if"     => TokenType::IF,
    "nil"    => TokenType::NIL,
    "or"     => TokenType::OR,
    "print"  => TokenType::PRINT,
    "return" => TokenType::RETURN,
    "super"  => TokenType::SUPER,
    "this"   => TokenType::THIS,
    "true"   => TokenType::TRUE,
    "var"    => TokenType::VAR,
    "while"  => TokenType::WHILE,
};

/// A single pass **scanner / lexer** that converts source text into a
/// sequence of [`Token`]s.
pub struct Scanner<'a> {
    src: &'a str,
    bytes: &'a [u8],
    start: usize,   // first byte of the lexeme being scanned
    pos: usize,     // next byte to examine
    line: usize,    // 1‑based
    finished: bool, // EOF already yielded
}

impl<'a> Scanner<'a> {
    /// Create a new lexer over `src`.
    pub fn new(src: &'a str) -> Self {
        info!("Scanner created over {} bytes", src.len());

        Self {
            src,
            bytes: src.as_bytes(),
            start: 0,
            pos: 0,
            line: 1,
            finished: false,
        }
    }

    /// Scan the whole input.  The token list always ends with `EOF`, even when
    /// errors were reported along the way.
    pub fn scan_tokens(self) -> (Vec<Token>, Diagnostics) {
        let mut tokens: Vec<Token> = Vec::new();
        let mut diagnostics = Diagnostics::new();

        for result in self {
            match result {
                Ok(token) => tokens.push(token),
                Err(e) => diagnostics.push(e),
            }
        }

        info!(
            "Scanned {} tokens with {} error(s)",
            tokens.len(),
            diagnostics.len()
        );

        (tokens, diagnostics)
    }

    // ───────────────────────────── cursor ──────────────────────────────────

    #[inline(always)]
    fn current(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    #[inline(always)]
    fn lookahead(&self) -> Option<u8> {
        self.bytes.get(self.pos + 1).copied()
    }

    #[inline(always)]
    fn bump(&mut self) -> Option<u8> {
        let b = self.current()?;
        self.pos += 1;
        Some(b)
    }

    /// Consume the next byte only if it is `expected`.
    #[inline(always)]
    fn eat(&mut self, expected: u8) -> bool {
        if self.current() == Some(expected) {
            self.pos += 1;
            return true;
        }

        false
    }

    /// `matched` if the next byte is `next` (consuming it), else `single`.
    fn either(&mut self, next: u8, matched: TokenType, single: TokenType) -> TokenType {
        if self.eat(next) {
            matched
        } else {
            single
        }
    }

    fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while self.current().is_some_and(&pred) {
            self.pos += 1;
        }
    }

    // ───────────────────────────── lexing ──────────────────────────────────

    /// Skips whitespace and `//` comments, counting newlines.
    fn skip_trivia(&mut self) {
        loop {
            match self.current() {
                Some(b' ' | b'\r' | b'\t') => self.pos += 1,

                Some(b'\n') => {
                    self.line += 1;
                    self.pos += 1;
                }

                Some(b'/') if self.lookahead() == Some(b'/') => {
                    // Stop *on* the newline so the arm above counts it.
                    self.pos = memchr(b'\n', &self.bytes[self.pos..])
                        .map_or(self.bytes.len(), |offset| self.pos + offset);
                }

                _ => return,
            }
        }
    }

    /// Recognise the lexeme starting with `first` (already consumed).
    fn lex_token(&mut self, first: u8) -> Result<TokenType> {
        let tt = match first {
            b'(' => TokenType::LEFT_PAREN,
            b')' => TokenType::RIGHT_PAREN,
            b'{' => TokenType::LEFT_BRACE,
            b'}' => TokenType::RIGHT_BRACE,
            b',' => TokenType::COMMA,
            b'.' => TokenType::DOT,
            b'-' => TokenType::MINUS,
            b'+' => TokenType::PLUS,
            b';' => TokenType::SEMICOLON,
            b'*' => TokenType::STAR,
            b'/' => TokenType::SLASH,

            b'!' => self.either(b'=', TokenType::BANG_EQUAL, TokenType::BANG),
            b'=' => self.either(b'=', TokenType::EQUAL_EQUAL, TokenType::EQUAL),
            b'<' => self.either(b'=', TokenType::LESS_EQUAL, TokenType::LESS),
            b'>' => self.either(b'=', TokenType::GREATER_EQUAL, TokenType::GREATER),

            b'"' => self.string()?,
            b'0'..=b'9' => self.number()?,
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.identifier(),

            _ => return Err(self.unexpected()),
        };

        Ok(tt)
    }

    /// Body of a `"…"` literal; strings may span lines and have no escapes.
    fn string(&mut self) -> Result<TokenType> {
        loop {
            match self.bump() {
                None => return Err(LoxError::lex(self.line, "Unterminated string.")),
                Some(b'"') => break,
                Some(b'\n') => self.line += 1,
                Some(_) => {}
            }
        }

        let contents: &str = &self.src[self.start + 1..self.pos - 1];
        Ok(TokenType::STRING(contents.to_owned()))
    }

    /// `123` or `12.5`.  A '.' joins the number only when a digit follows it.
    fn number(&mut self) -> Result<TokenType> {
        self.eat_while(|b| b.is_ascii_digit());

        if self.current() == Some(b'.') && self.lookahead().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
            self.eat_while(|b| b.is_ascii_digit());
        }

        let text: &str = &self.src[self.start..self.pos];
        let n: f64 = text
            .parse()
            .map_err(|_| LoxError::lex(self.line, format!("Invalid number '{}'.", text)))?;

        Ok(TokenType::NUMBER(n))
    }

    fn identifier(&mut self) -> TokenType {
        self.eat_while(|b| b.is_ascii_alphanumeric() || b == b'_');

        let word: &str = &self.src[self.start..self.pos];
        KEYWORDS.get(word).cloned().unwrap_or(TokenType::IDENTIFIER)
    }

    /// Reports the character at `start`, consuming all of its UTF‑8 bytes so
    /// the next lexeme begins on a char boundary.
    fn unexpected(&mut self) -> LoxError {
        self.eat_while(|b| (b & 0xC0) == 0x80);

        let ch: &str = &self.src[self.start..self.pos];
        LoxError::lex(self.line, format!("Unexpected character: {}", ch))
    }
}

// ───────────────────────── Iterator implementation ─────────────────────────

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        self.skip_trivia();
        self.start = self.pos;

        let Some(first) = self.bump() else {
            self.finished = true;
            return Some(Ok(Token::new(TokenType::EOF, "", self.line)));
        };

        match self.lex_token(first) {
            Ok(tt) => {
                debug!("Scanned token ({:?}) on line {}", tt, self.line);
                let lexeme: &str = &self.src[self.start..self.pos];
                Some(Ok(Token::new(tt, lexeme, self.line)))
            }

            Err(e) => {
                debug!("Lex error on line {}: {}", self.line, e);
                Some(Err(e))
            }
        }
    }
}

impl<'a> FusedIterator for Scanner<'a> {}
