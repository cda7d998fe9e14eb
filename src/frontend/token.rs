// src/frontend/token.rs

/// All token types in the ASL language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    // Literals
    IntLiteral,
    FloatLiteral,
    CharLiteral,
    StringLiteral,
    Identifier,

    // Keywords
    KwFunc,
    KwEndFunc,
    KwVar,
    KwEndVar,
    KwArray,
    KwOf,
    KwIf,
    KwThen,
    KwElse,
    KwEndIf,
    KwWhile,
    KwDo,
    KwEndWhile,
    KwReturn,
    KwRead,
    KwWrite,
    KwTrue,
    KwFalse,

    // Type keywords
    KwInt,
    KwFloat,
    KwBool,
    KwChar,

    // Operators
    Assign,   // =
    EqEq,     // ==
    NotEq,    // !=
    Lt,       // <
    LtEq,     // <=
    Gt,       // >
    GtEq,     // >=
    Plus,     // +
    Minus,    // -
    Star,     // *
    Slash,    // /
    Percent,  // %
    AndAnd,   // &&
    OrOr,     // ||
    Not,      // !

    // Punctuation
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Colon,
    Semicolon,

    Error,
    Eof,
}

impl TokenType {
    /// Human-readable name for error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::IntLiteral => "integer literal",
            TokenType::FloatLiteral => "float literal",
            TokenType::CharLiteral => "character literal",
            TokenType::StringLiteral => "string literal",
            TokenType::Identifier => "identifier",
            TokenType::KwFunc => "'func'",
            TokenType::KwEndFunc => "'endfunc'",
            TokenType::KwVar => "'var'",
            TokenType::KwEndVar => "'endvar'",
            TokenType::KwArray => "'array'",
            TokenType::KwOf => "'of'",
            TokenType::KwIf => "'if'",
            TokenType::KwThen => "'then'",
            TokenType::KwElse => "'else'",
            TokenType::KwEndIf => "'endif'",
            TokenType::KwWhile => "'while'",
            TokenType::KwDo => "'do'",
            TokenType::KwEndWhile => "'endwhile'",
            TokenType::KwReturn => "'return'",
            TokenType::KwRead => "'read'",
            TokenType::KwWrite => "'write'",
            TokenType::KwTrue => "'true'",
            TokenType::KwFalse => "'false'",
            TokenType::KwInt => "'int'",
            TokenType::KwFloat => "'float'",
            TokenType::KwBool => "'bool'",
            TokenType::KwChar => "'char'",
            TokenType::Assign => "'='",
            TokenType::EqEq => "'=='",
            TokenType::NotEq => "'!='",
            TokenType::Lt => "'<'",
            TokenType::LtEq => "'<='",
            TokenType::Gt => "'>'",
            TokenType::GtEq => "'>='",
            TokenType::Plus => "'+'",
            TokenType::Minus => "'-'",
            TokenType::Star => "'*'",
            TokenType::Slash => "'/'",
            TokenType::Percent => "'%'",
            TokenType::AndAnd => "'&&'",
            TokenType::OrOr => "'||'",
            TokenType::Not => "'!'",
            TokenType::LParen => "'('",
            TokenType::RParen => "')'",
            TokenType::LBracket => "'['",
            TokenType::RBracket => "']'",
            TokenType::Comma => "','",
            TokenType::Colon => "':'",
            TokenType::Semicolon => "';'",
            TokenType::Error => "invalid token",
            TokenType::Eof => "end of input",
        }
    }

    /// Keyword lookup for identifiers
    pub fn keyword(lexeme: &str) -> Option<TokenType> {
        let ty = match lexeme {
            "func" => TokenType::KwFunc,
            "endfunc" => TokenType::KwEndFunc,
            "var" => TokenType::KwVar,
            "endvar" => TokenType::KwEndVar,
            "array" => TokenType::KwArray,
            "of" => TokenType::KwOf,
            "if" => TokenType::KwIf,
            "then" => TokenType::KwThen,
            "else" => TokenType::KwElse,
            "endif" => TokenType::KwEndIf,
            "while" => TokenType::KwWhile,
            "do" => TokenType::KwDo,
            "endwhile" => TokenType::KwEndWhile,
            "return" => TokenType::KwReturn,
            "read" => TokenType::KwRead,
            "write" => TokenType::KwWrite,
            "true" => TokenType::KwTrue,
            "false" => TokenType::KwFalse,
            "int" => TokenType::KwInt,
            "float" => TokenType::KwFloat,
            "bool" => TokenType::KwBool,
            "char" => TokenType::KwChar,
            _ => return None,
        };
        Some(ty)
    }
}

/// A token with its source text and location
#[derive(Debug, Clone)]
pub struct Token {
    pub ty: TokenType,
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn new(ty: TokenType, lexeme: &str, span: Span) -> Self {
        Self {
            ty,
            lexeme: lexeme.to_string(),
            span,
        }
    }
}

/// A source region, byte-offset based with line/column for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize, // Byte offset
    pub end: usize,   // Byte offset (exclusive)
    pub line: u32,    // Start line (1-indexed)
    pub column: u32,  // Start column (1-indexed)
}

impl Span {
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// Span covering both `self` and `other`
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            line: self.line.min(other.line),
            column: if other.line < self.line {
                other.column
            } else {
                self.column
            },
        }
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        // miette uses (offset, length)
        (span.start, span.end - span.start).into()
    }
}

impl From<&Span> for miette::SourceSpan {
    fn from(span: &Span) -> Self {
        (span.start, span.end - span.start).into()
    }
}
