use log::debug;
use serde::Serialize;
use std::fmt;
use std::mem;

/// The different kinds of tokens recognized by the Grai scanner.
///
/// Variants without data represent single-character, operator, or keyword
/// tokens.  `STRING(String)` and `NUMBER(f64)` carry their literal values.
/// `IDENTIFIER` is used for user-defined names.  `EOF` marks the end of input.
///
/// Keyword variants are named after what the keyword *means*, not how it is
/// spelled: the surface spellings are Romanian (`afiseaza` scans to `PRINT`,
/// `instanta` to `THIS`, `mosteneste` to `INHERITS`, and so on - see the
/// keyword table in the scanner).
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Serialize)]
pub enum TokenType {
    /// '('
    LEFT_PAREN,

    /// ')'
    RIGHT_PAREN,

    /// '{'
    LEFT_BRACE,

    /// '}'
    RIGHT_BRACE,

    /// '[' - scanned but not yet part of the grammar
    LEFT_BRACKET,

    /// ']' - scanned but not yet part of the grammar
    RIGHT_BRACKET,

    /// ','
    COMMA,

    /// '.'
    DOT,

    /// '-'
    MINUS,

    /// '+'
    PLUS,

    /// ';'
    SEMICOLON,

    /// '/'
    SLASH,

    /// '*'
    STAR,

    /// '%'
    PERCENT,

    /// '!'
    BANG,

    /// '!='
    BANG_EQUAL,

    /// '='
    EQUAL,

    /// '=='
    EQUAL_EQUAL,

    /// '>'
    GREATER,

    /// '>='
    GREATER_EQUAL,

    /// '<'
    LESS,

    /// '<='
    LESS_EQUAL,

    /// A user-defined identifier
    IDENTIFIER,

    /// A string literal (contents without quotes)
    STRING(String),

    /// A numeric literal
    #[serde(rename = "NUMBER")]
    NUMBER(f64),

    /// 'si'
    AND,

    /// 'sau'
    OR,

    /// 'adevarat'
    TRUE,

    /// 'fals'
    FALSE,

    /// 'nul'
    NIL,

    /// 'var'
    VAR,

    /// 'const' - reserved, not yet part of the grammar
    CONST,

    /// 'din' - reserved, not yet part of the grammar
    FROM,

    /// 'pentru'
    FOR,

    /// 'cattimp'
    WHILE,

    /// 'daca'
    IF,

    /// 'altfel'
    ELSE,

    /// 'afiseaza'
    PRINT,

    /// 'fun'
    FUN,

    /// 'returneaza'
    RETURN,

    /// 'clasa'
    CLASS,

    /// 'mosteneste'
    INHERITS,

    /// 'instanta'
    THIS,

    /// 'super'
    SUPER,

    /// End-of-file marker
    EOF,
}

impl TokenType {
    /// Variant name without payloads, for the `tokenize` listing.
    pub fn name(&self) -> &'static str {
        match self {
            TokenType::LEFT_PAREN => "LEFT_PAREN",
            TokenType::RIGHT_PAREN => "RIGHT_PAREN",
            TokenType::LEFT_BRACE => "LEFT_BRACE",
            TokenType::RIGHT_BRACE => "RIGHT_BRACE",
            TokenType::LEFT_BRACKET => "LEFT_BRACKET",
            TokenType::RIGHT_BRACKET => "RIGHT_BRACKET",
            TokenType::COMMA => "COMMA",
            TokenType::DOT => "DOT",
            TokenType::MINUS => "MINUS",
            TokenType::PLUS => "PLUS",
            TokenType::SEMICOLON => "SEMICOLON",
            TokenType::SLASH => "SLASH",
            TokenType::STAR => "STAR",
            TokenType::PERCENT => "PERCENT",
            TokenType::BANG => "BANG",
            TokenType::BANG_EQUAL => "BANG_EQUAL",
            TokenType::EQUAL => "EQUAL",
            TokenType::EQUAL_EQUAL => "EQUAL_EQUAL",
            TokenType::GREATER => "GREATER",
            TokenType::GREATER_EQUAL => "GREATER_EQUAL",
            TokenType::LESS => "LESS",
            TokenType::LESS_EQUAL => "LESS_EQUAL",
            TokenType::IDENTIFIER => "IDENTIFIER",
            TokenType::STRING(_) => "STRING",
            TokenType::NUMBER(_) => "NUMBER",
            TokenType::AND => "AND",
            TokenType::OR => "OR",
            TokenType::TRUE => "TRUE",
            TokenType::FALSE => "FALSE",
            TokenType::NIL => "NIL",
            TokenType::VAR => "VAR",
            TokenType::CONST => "CONST",
            TokenType::FROM => "FROM",
            TokenType::FOR => "FOR",
            TokenType::WHILE => "WHILE",
            TokenType::IF => "IF",
            TokenType::ELSE => "ELSE",
            TokenType::PRINT => "PRINT",
            TokenType::FUN => "FUN",
            TokenType::RETURN => "RETURN",
            TokenType::CLASS => "CLASS",
            TokenType::INHERITS => "INHERITS",
            TokenType::THIS => "THIS",
            TokenType::SUPER => "SUPER",
            TokenType::EOF => "EOF",
        }
    }
}

impl PartialEq for TokenType {
    /// Two TokenTypes are equal if they share the same variant
    /// (ignoring any inner data). Uses `mem::discriminant` to compare.
    fn eq(&self, other: &Self) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }
}

/// A scanned token, including its type, the original lexeme,
/// and the line number where it was found.
///
/// The lifetime `'src` ties the `lexeme` slice back to the original source
/// buffer: tokens are zero-copy except for string literal payloads.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Token<'src> {
    /// The category of this token.
    pub token_type: TokenType,

    /// The exact substring from the source that produced this token.
    pub lexeme: &'src str,

    /// 1-based line number in the source.
    pub line: usize,
}

impl<'src> Token<'src> {
    /// Create a new Token with the given type, lexeme, and line.
    pub fn new(token_type: TokenType, lexeme: &'src str, line: usize) -> Self {
        debug!(
            "Creating new token: type={:?}, lexeme={}, line={}",
            token_type, lexeme, line
        );

        Self {
            token_type,
            lexeme,
            line,
        }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ", self.token_type.name(), self.lexeme)?;

        match &self.token_type {
            TokenType::STRING(s) => write!(f, "{}", s),

            TokenType::NUMBER(n) => {
                // 3 -> "3.0", 3.14 -> "3.14"  (integer forms use a tiny stack buffer)
                if n.fract() == 0.0 {
                    let mut buf: itoa::Buffer = itoa::Buffer::new();

                    write!(f, "{}.0", buf.format(*n as i64))
                } else {
                    write!(f, "{}", n)
                }
            }

            _ => write!(f, "null"),
        }
    }
}
