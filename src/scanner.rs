//! Module `scanner` implements a one-pass, streaming lexer for the Grai
//! language.
//!
//! It transforms a byte slice (`&[u8]`) into a sequence of `Token<'src>`s,
//! skipping whitespace and comments, and emitting exactly one `EOF` token at
//! the end.  Designed as a `FusedIterator`, it can be chained safely with
//! other iterator adapters.
//!
//! Lexical errors are yielded inline as `Err` items and scanning continues
//! afterwards, so a source file with several bad characters produces one
//! diagnostic per bad character and the token stream still reaches
//! end-of-input.  The scanner never aborts early.
//!
//! # Core Phases
//!
//! 1. **Initialization** - `start`, `curr`, and `line` counters are set;
//!    `pending` holds the next token kind.
//! 2. **Primitive Helpers** - `advance()`, `peek()`, `peek_next()`, and
//!    `match_byte()` provide fast, inlined access to the byte stream;
//!    `is_at_end()` guards against overrun.
//! 3. **Lexing Loop** (`next`) - on each call, reset `start` and `pending`,
//!    then call `scan_token()`.  Whitespace and comments are skipped without
//!    setting `pending`; at EOF one `EOF` token is emitted and the iterator
//!    terminates.
//! 4. **Token Recognition** (`scan_token`) - punctuators, two-character
//!    operators (`!=`, `==`, `<=`, `>=`) via one-byte lookahead, string
//!    literals (multi-line, with unterminated-string reporting), numeric
//!    literals (a trailing `.` with no digit after it is an error and the
//!    malformed token is dropped), identifiers/keywords resolved through a
//!    perfect-hash `KEYWORDS` map, and an "invalid character" error for
//!    everything else.
//! 5. **Performance** - bulk comment skipping via `memchr`,
//!    `#[inline(always)]` on hot-path helpers, zero-allocation lexeme
//!    slicing (tokens reference the original buffer).

use crate::error::{GraiError, Result};
use crate::token::{Token, TokenType};
use log::{debug, info};
use memchr::memchr;
use phf::phf_map;
use std::iter::FusedIterator;

// ─────────────────────────────────────────────────────────────────────────────
// Static keyword map (compile-time perfect hash)
// ─────────────────────────────────────────────────────────────────────────────

static KEYWORDS: phf::Map<&'static [u8], TokenType> = phf_map! {
    b"si"         => TokenType::AND,
    b"sau"        => TokenType::OR,
    b"adevarat"   => TokenType::TRUE,
    b"fals"       => TokenType::FALSE,
    b"nul"        => TokenType::NIL,
    b"var"        => TokenType::VAR,
    b"const"      => TokenType::CONST,
    b"din"        => TokenType::FROM,
    b"pentru"     => TokenType::FOR,
    b"cattimp"    => TokenType::WHILE,
    b"daca"       => TokenType::IF,
    b"altfel"     => TokenType::ELSE,
    b"afiseaza"   => TokenType::PRINT,
    b"fun"        => TokenType::FUN,
    b"returneaza" => TokenType::RETURN,
    b"clasa"      => TokenType::CLASS,
    b"mosteneste" => TokenType::INHERITS,
    b"instanta"   => TokenType::THIS,
    b"super"      => TokenType::SUPER,
};

/// A single pass **scanner / lexer** that converts raw source bytes into a
/// sequence of [`Token`]s.  The lifetime `'src` ties every emitted token's
/// `lexeme` slice back to the original source buffer.
///
/// The caller guarantees the buffer is valid UTF-8 (the CLI validates the
/// whole script once at ingestion).
pub struct Scanner<'src> {
    src: &'src [u8],            // entire source file (memory-mapped)
    start: usize,               // index of the *first* byte of the current lexeme
    curr: usize,                // index *one past* the last byte examined
    line: usize,                // 1-based line counter (\n increments)
    pending: Option<TokenType>, // recognised token kind waiting to be emitted
}

impl<'src> Scanner<'src> {
    /// Create a new lexer over `src`.
    #[inline]
    pub fn new(src: &'src [u8]) -> Self {
        info!("Scanner created over {} bytes", src.len());

        Self {
            src,
            start: 0,
            curr: 0,
            line: 1,
            pending: None,
        }
    }

    // ───────────────────────────── primitive helpers ────────────────────────

    /// Return the length of the input slice.
    #[inline(always)]
    const fn len(&self) -> usize {
        self.src.len()
    }

    /// Are we at (or past) the end of input?
    #[inline(always)]
    fn is_at_end(&self) -> bool {
        self.curr >= self.len()
    }

    /// Advance one byte and return it.  Higher-level code always guards with
    /// [`Self::is_at_end`].
    #[inline(always)]
    fn advance(&mut self) -> u8 {
        let b = self.src[self.curr];
        self.curr += 1;
        b
    }

    /// Peek at the current byte without consuming it.  Returns `0` if past
    /// EOF to avoid branching at call-site.
    #[inline(always)]
    fn peek(&self) -> u8 {
        if self.is_at_end() {
            0
        } else {
            self.src[self.curr]
        }
    }

    /// Peek one byte beyond [`Self::peek`].  Safe at EOF.
    #[inline(always)]
    fn peek_next(&self) -> u8 {
        if self.curr + 1 >= self.len() {
            0
        } else {
            self.src[self.curr + 1]
        }
    }

    /// Conditionally consume a byte **iff** it matches `expected`.
    /// Returns `true` on success so callers can branch inline without an else.
    #[inline(always)]
    fn match_byte(&mut self, expected: u8) -> bool {
        if !self.is_at_end() && self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    // ───────────────────────────── core lexing ─────────────────────────────

    /// Scan a *single* token starting at `self.curr`.  If the lexeme produces
    /// an actual token the kind is stored in `self.pending`.  Whitespace and
    /// comments are skipped by returning `Ok(())` with `pending = None`.
    fn scan_token(&mut self) -> Result<()> {
        let b = self.advance();

        match b {
            // ── single-character punctuators ──────────────────────────────
            b'(' => self.pending = Some(TokenType::LEFT_PAREN),
            b')' => self.pending = Some(TokenType::RIGHT_PAREN),
            b'{' => self.pending = Some(TokenType::LEFT_BRACE),
            b'}' => self.pending = Some(TokenType::RIGHT_BRACE),
            b'[' => self.pending = Some(TokenType::LEFT_BRACKET),
            b']' => self.pending = Some(TokenType::RIGHT_BRACKET),
            b',' => self.pending = Some(TokenType::COMMA),
            b'.' => self.pending = Some(TokenType::DOT),
            b'-' => self.pending = Some(TokenType::MINUS),
            b'+' => self.pending = Some(TokenType::PLUS),
            b';' => self.pending = Some(TokenType::SEMICOLON),
            b'*' => self.pending = Some(TokenType::STAR),
            b'%' => self.pending = Some(TokenType::PERCENT),

            // ── two-character operators (!=, ==, <=, >=) ─────────────────
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

            // ── comments (// … until newline) ────────────────────────────
            b'/' => {
                if self.match_byte(b'/') {
                    // Fast-forward to the next newline using `memchr`.
                    // If none is found, skip to EOF.
                    if let Some(pos) = memchr(b'\n', &self.src[self.curr..]) {
                        self.curr += pos;
                    } else {
                        self.curr = self.len();
                    }

                    return Ok(());
                }

                self.pending = Some(TokenType::SLASH);
            }

            // ── string literal " … " ─────────────────────────────────────
            b'"' => {
                return self.parse_string();
            }

            // ── number literal (digit-leading) ───────────────────────────
            b'0'..=b'9' => {
                return self.parse_number();
            }

            // ── identifiers / keywords (alpha or underscore-leading) ─────
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                self.parse_identifier();
            }

            // ── unexpected character ─────────────────────────────────────
            _ => {
                return Err(GraiError::lex(
                    self.line,
                    format!("Invalid character '{}'", b as char),
                ));
            }
        }

        Ok(())
    }

    /// Parse a double-quoted string literal.
    ///
    /// * `self.start` still points to the opening `"`.
    /// * When we return, `self.curr` points **past** the closing `"`.
    ///
    /// Newlines inside the literal are kept verbatim and bump the line
    /// counter; an unterminated string is reported at the line where input
    /// ended, naming the line it started on.
    fn parse_string(&mut self) -> Result<()> {
        let start_line: usize = self.line;

        while !self.is_at_end() && self.peek() != b'"' {
            if self.advance() == b'\n' {
                self.line += 1;
            }
        }

        if self.is_at_end() {
            return Err(GraiError::lex(
                self.line,
                format!("Unterminated string, started at line {}", start_line),
            ));
        }

        self.advance(); // consume closing quote

        // Slice excluding the surrounding quotes.
        let slice: &[u8] = &self.src[self.start + 1..self.curr - 1];

        // SAFETY: the source is valid UTF-8 (guaranteed by caller) and both
        // delimiters are single-byte, so the slice stays on char boundaries.
        let s: &str = unsafe { std::str::from_utf8_unchecked(slice) };

        self.pending = Some(TokenType::STRING(s.to_owned()));

        Ok(())
    }

    /// Parse a numeric literal (`123`, `3.14`).  Fractions are optional, but
    /// a `.` with no digit after it is a lexical error: the digits scanned so
    /// far are discarded and scanning resumes at the `.`.
    fn parse_number(&mut self) -> Result<()> {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        // Optional fractional part.
        if self.peek() == b'.' {
            if !self.peek_next().is_ascii_digit() {
                return Err(GraiError::lex(self.line, "Number cannot end in '.'"));
            }

            self.advance(); // consume "."

            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let slice: &[u8] = &self.src[self.start..self.curr];

        // SAFETY: every byte in the slice is an ASCII digit or '.'.
        let s: &str = unsafe { std::str::from_utf8_unchecked(slice) };

        let n: f64 = s.parse::<f64>().unwrap_or(0.0); // parse never fails (checked digits)
        self.pending = Some(TokenType::NUMBER(n));

        Ok(())
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

impl<'src> Iterator for Scanner<'src> {
    type Item = Result<Token<'src>>;

    fn next(&mut self) -> Option<Self::Item> {
        // Loop until we either emit a token, hit EOF, or see an error.
        while self.curr <= self.len() {
            // 1. EOF guard - emit exactly one EOF then terminate.
            if self.curr == self.len() {
                self.curr += 1; // ensure fused semantics
                return Some(Ok(Token::new(TokenType::EOF, "", self.line)));
            }

            // 2. Reset per-token state.
            self.start = self.curr;
            self.pending = None;

            // 3. Attempt to scan a token.
            if let Err(e) = self.scan_token() {
                return Some(Err(e));
            }

            // 4. If a real token was recognised, build and return it.
            if let Some(tt) = self.pending.take() {
                let slice: &[u8] = &self.src[self.start..self.curr];

                // SAFETY: lexeme boundaries always fall on ASCII bytes.
                let lex: &str = unsafe { std::str::from_utf8_unchecked(slice) };
                debug!("Scanned token ({:?}) on line {}", tt, self.line);

                return Some(Ok(Token::new(tt, lex, self.line)));
            }
            // Otherwise it was whitespace / comment → continue loop.
        }

        None // already yielded EOF
    }
}

impl FusedIterator for Scanner<'_> {}
