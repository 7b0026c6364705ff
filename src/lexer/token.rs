//! Token kinds and the keyword enumeration.

use std::fmt;

/// 1-based line/column, 0-based byte offset (matches [`crate::ParseError`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

/// A single lexical token. `raw` is a sub-slice of the source; it is never
/// copied or mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub raw: &'src str,
    pub position: Position,
}

impl<'src> Token<'src> {
    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Illegal,
    Eof,
    Ident,
    Keyword(Keyword),
    Literal(LiteralKind),
    Punct(Punct),
}

impl TokenKind {
    pub fn is_keyword(self, kw: Keyword) -> bool {
        matches!(self, Self::Keyword(k) if k == kw)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Illegal => write!(f, "illegal token"),
            Self::Eof => write!(f, "end of input"),
            Self::Ident => write!(f, "identifier"),
            Self::Keyword(kw) => write!(f, "{kw:?}"),
            Self::Literal(lit) => write!(f, "{lit:?}"),
            Self::Punct(p) => write!(f, "{p:?}"),
        }
    }
}

/// Literal payload kinds. The raw token text carries the literal's spelling
/// verbatim, including surrounding quotes where present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Integer,
    Float,
    SingleQuotedString,
    DoubleQuotedString,
    BacktickQuotedString,
    Hex,
    Bit,
    NamedParam,
    QMarkParam,
}

/// Punctuation and operator tokens, including multi-character forms and the
/// PostgreSQL JSON operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punct {
    LParen,
    RParen,
    Comma,
    Semicolon,
    Dot,
    DotDot,
    Colon,
    Star,
    Plus,
    Minus,
    Slash,
    Percent,
    Eq,
    BangEq,
    LtGt,
    Lt,
    Gt,
    Le,
    Ge,
    LShift,
    RShift,
    Bang,
    Pipe,
    PipePipe,
    Amp,
    AmpAmp,
    Caret,
    Tilde,
    Arrow,      // ->
    Arrow2,     // ->>
    HashArrow,  // #>
    HashArrow2, // #>>
    AtArrow,    // @>
    ArrowAt,    // <@
    QPipe,      // ?|
    QAmp,       // ?&
    FatArrow,   // =>
    Dollar,     // $ (not followed by a digit or identifier start)
}

impl Punct {
    /// Source spelling, used by the renderer and by error messages.
    pub fn as_str(self) -> &'static str {
        use Punct::*;
        match self {
            LParen => "(",
            RParen => ")",
            Comma => ",",
            Semicolon => ";",
            Dot => ".",
            DotDot => "..",
            Colon => ":",
            Star => "*",
            Plus => "+",
            Minus => "-",
            Slash => "/",
            Percent => "%",
            Eq => "=",
            BangEq => "!=",
            LtGt => "<>",
            Lt => "<",
            Gt => ">",
            Le => "<=",
            Ge => ">=",
            LShift => "<<",
            RShift => ">>",
            Bang => "!",
            Pipe => "|",
            PipePipe => "||",
            Amp => "&",
            AmpAmp => "&&",
            Caret => "^",
            Tilde => "~",
            Arrow => "->",
            Arrow2 => "->>",
            HashArrow => "#>",
            HashArrow2 => "#>>",
            AtArrow => "@>",
            ArrowAt => "<@",
            QPipe => "?|",
            QAmp => "?&",
            FatArrow => "=>",
            Dollar => "$",
        }
    }
}

macro_rules! keywords {
    ($( $variant:ident => $text:literal ),+ $(,)?) => {
        /// Case-insensitive SQL keywords. Variant names
        /// match the spelling up to case; `AUTO_INCREMENT` keeps its
        /// underscore because it is not a separate token otherwise.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Keyword {
            $( $variant ),+
        }

        impl Keyword {
            pub fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $text ),+
                }
            }

            /// All keywords paired with their lowercase spelling, used to
            /// build the length-bucketed lookup table in
            /// [`crate::lexer::keyword`].
            pub(crate) const ALL: &'static [(&'static str, Keyword)] = &[
                $( ($text, Self::$variant) ),+
            ];
        }
    };
}

keywords! {
    Add => "add", After => "after", All => "all", Alter => "alter",
    Analyze => "analyze", And => "and", As => "as", Asc => "asc",
    AutoIncrement => "auto_increment", Between => "between", By => "by",
    Cascade => "cascade", Case => "case", Cast => "cast", Change => "change",
    Character => "character", Check => "check", Collate => "collate",
    Column => "column", Comment => "comment", Constraint => "constraint",
    Create => "create", Cross => "cross", Database => "database",
    Default => "default", Deferrable => "deferrable", Deferred => "deferred",
    Delete => "delete", Desc => "desc", Distinct => "distinct",
    Drop => "drop", Else => "else", End => "end", Engine => "engine",
    Escape => "escape", Except => "except", Exists => "exists",
    Explain => "explain", False => "false", First => "first", For => "for",
    Foreign => "foreign", From => "from", Full => "full",
    Function => "function", Group => "group", Having => "having",
    If => "if", Ignore => "ignore", In => "in", Index => "index",
    Inner => "inner", Insert => "insert", Intersect => "intersect",
    Into => "into", Is => "is", Join => "join", Key => "key",
    Last => "last", Left => "left", Like => "like", Limit => "limit",
    Match => "match", Natural => "natural", No => "no", Not => "not",
    Null => "null", Offset => "offset", On => "on", Or => "or",
    Order => "order", Outer => "outer", Partition => "partition",
    Primary => "primary", Procedure => "procedure", Recursive => "recursive",
    References => "references", Rename => "rename", Replace => "replace",
    Restrict => "restrict", Right => "right", Rollback => "rollback",
    Select => "select", Set => "set", Show => "show", Table => "table",
    Tables => "tables", Then => "then", To => "to",
    Transaction => "transaction", Trigger => "trigger", True => "true",
    Truncate => "truncate", Union => "union", Unique => "unique",
    Update => "update", Use => "use", Using => "using", Values => "values",
    View => "view", When => "when", Where => "where", With => "with",
    Without => "without",

    BigInt => "bigint", Binary => "binary", Blob => "blob",
    Boolean => "boolean", Char => "char", Date => "date",
    Datetime => "datetime", Decimal => "decimal", Double => "double",
    Enum => "enum", Float => "float", Int => "int", Integer => "integer",
    Json => "json", Jsonb => "jsonb", LongBlob => "longblob",
    LongText => "longtext", MediumBlob => "mediumblob",
    MediumInt => "mediumint", MediumText => "mediumtext", NChar => "nchar",
    Numeric => "numeric", Real => "real", SmallInt => "smallint",
    Text => "text", Time => "time", Timestamp => "timestamp",
    TinyBlob => "tinyblob", TinyInt => "tinyint", TinyText => "tinytext",
    VarBinary => "varbinary", VarChar => "varchar", Year => "year",
}

/// Longest keyword spelling, in bytes (`auto_increment`). Bounds the
/// stack-owned lowercasing scratch buffer used by the lexer.
pub const MAX_KEYWORD_LEN: usize = 14;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longest_keyword_matches_constant() {
        let longest = Keyword::ALL.iter().map(|(s, _)| s.len()).max().unwrap();
        assert_eq!(longest, MAX_KEYWORD_LEN);
    }

    #[test]
    fn keyword_spellings_are_lowercase() {
        for (text, kw) in Keyword::ALL {
            assert_eq!(*text, text.to_ascii_lowercase());
            assert_eq!(*text, kw.as_str());
        }
    }
}
