//! Byte-level, zero-allocation SQL lexer.
//!
//! `Lexer::next` never fails: unrecognized bytes become
//! [`TokenKind::Illegal`] and unterminated strings/comments simply run to
//! end of input. The parser is the only place a malformed token becomes a
//! reported error.

mod keyword;
pub mod token;

pub use token::{Keyword, LiteralKind, Position, Punct, Token, TokenKind};

use token::MAX_KEYWORD_LEN;

/// Scans a source string into a token stream. Holds no heap state of its
/// own; every `raw` field in the tokens it emits is a sub-slice of `src`.
#[derive(Debug, Clone)]
pub struct Lexer<'src> {
    src: &'src str,
    bytes: &'src [u8],
    pos: usize,
    line: u32,
    col: u32,
}

impl<'src> Lexer<'src> {
    pub fn new(src: &'src str) -> Self {
        Self { src, bytes: src.as_bytes(), pos: 0, line: 1, col: 1 }
    }

    fn position(&self) -> Position {
        Position { offset: self.pos, line: self.line, column: self.col }
    }

    fn cur_byte(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_byte(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    /// Advances over exactly one source character, keeping `line`/`col`
    /// correct for both ASCII and multi-byte UTF-8 input. Column advances
    /// by one per character regardless of its UTF-8 byte length; a `\n` or
    /// `\r\n` advances the line instead and resets the column.
    fn bump(&mut self) -> Option<char> {
        if self.pos >= self.bytes.len() {
            return None;
        }
        let ch = self.src[self.pos..].chars().next()?;
        match ch {
            '\n' => {
                self.pos += 1;
                self.line += 1;
                self.col = 1;
            }
            '\r' => {
                self.pos += 1;
                if self.cur_byte() == Some(b'\n') {
                    self.pos += 1;
                }
                self.line += 1;
                self.col = 1;
            }
            _ => {
                self.pos += ch.len_utf8();
                self.col += 1;
            }
        }
        Some(ch)
    }

    fn make(&self, kind: TokenKind, start: Position, raw: &'src str) -> Token<'src> {
        Token { kind, raw, position: start }
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.cur_byte() {
                Some(b' ') | Some(b'\t') | Some(0x0b) | Some(0x0c) | Some(b'\n') | Some(b'\r') => {
                    self.bump();
                }
                Some(b'-') if self.peek_byte(1) == Some(b'-') => self.skip_to_eol(),
                // A bare `#` starts a MySQL hash comment; `#>`/`#>>` are JSON
                // operators and must not be swallowed here (rule 4).
                Some(b'#') if self.peek_byte(1) != Some(b'>') => self.skip_to_eol(),
                Some(b'/') if self.peek_byte(1) == Some(b'*') => self.skip_block_comment(),
                _ => break,
            }
        }
    }

    fn skip_to_eol(&mut self) {
        while !matches!(self.cur_byte(), None | Some(b'\n') | Some(b'\r')) {
            self.bump();
        }
    }

    /// Unterminated block comments extend to end of input (§4.2, §7).
    fn skip_block_comment(&mut self) {
        self.bump(); // '/'
        self.bump(); // '*'
        loop {
            match self.cur_byte() {
                None => break,
                Some(b'*') if self.peek_byte(1) == Some(b'/') => {
                    self.bump();
                    self.bump();
                    break;
                }
                _ => {
                    self.bump();
                }
            }
        }
    }

    pub fn next(&mut self) -> Token<'src> {
        self.skip_trivia();
        let start = self.position();

        let c = match self.cur_byte() {
            Some(c) => c,
            None => return self.make(TokenKind::Eof, start, ""),
        };

        if c.is_ascii_digit() || (c == b'.' && self.peek_byte(1).is_some_and(|b| b.is_ascii_digit())) {
            return self.scan_number(start);
        }
        if c == b'\'' {
            return self.scan_delimited(start, b'\'', LiteralKind::SingleQuotedString, true);
        }
        if c == b'"' {
            return self.scan_delimited(start, b'"', LiteralKind::DoubleQuotedString, true);
        }
        if c == b'`' {
            return self.scan_delimited(start, b'`', LiteralKind::BacktickQuotedString, false);
        }
        if (c == b'x' || c == b'X') && self.peek_byte(1) == Some(b'\'') {
            self.bump();
            return self.scan_delimited(start, b'\'', LiteralKind::Hex, false);
        }
        if c == b'0' && matches!(self.peek_byte(1), Some(b'x') | Some(b'X')) {
            return self.scan_0x_hex(start);
        }
        if (c == b'b' || c == b'B') && self.peek_byte(1) == Some(b'\'') {
            self.bump();
            return self.scan_delimited(start, b'\'', LiteralKind::Bit, false);
        }
        if c.is_ascii_alphabetic() || c == b'_' {
            return self.scan_ident(start);
        }
        self.scan_punct(start)
    }

    fn scan_number(&mut self, start: Position) -> Token<'src> {
        let begin = self.pos;
        let mut is_float = false;

        if self.cur_byte() == Some(b'.') {
            is_float = true;
            self.bump();
            self.bump_digits();
        } else {
            self.bump_digits();
            if self.cur_byte() == Some(b'.') {
                is_float = true;
                self.bump();
                self.bump_digits();
            }
        }

        if matches!(self.cur_byte(), Some(b'e') | Some(b'E')) {
            let (save_pos, save_line, save_col) = (self.pos, self.line, self.col);
            self.bump();
            if matches!(self.cur_byte(), Some(b'+') | Some(b'-')) {
                self.bump();
            }
            if matches!(self.cur_byte(), Some(b) if b.is_ascii_digit()) {
                is_float = true;
                self.bump_digits();
            } else {
                self.pos = save_pos;
                self.line = save_line;
                self.col = save_col;
            }
        }

        let raw = &self.src[begin..self.pos];
        let kind = if is_float { LiteralKind::Float } else { LiteralKind::Integer };
        self.make(TokenKind::Literal(kind), start, raw)
    }

    fn bump_digits(&mut self) {
        while matches!(self.cur_byte(), Some(b) if b.is_ascii_digit()) {
            self.bump();
        }
    }

    /// Scans `delim ... delim`. A doubled delimiter is an escaped literal
    /// delimiter; when `honor_backslash`, a backslash escapes the following
    /// character too. An unterminated literal runs to end of input.
    fn scan_delimited(
        &mut self,
        start: Position,
        delim: u8,
        kind: LiteralKind,
        honor_backslash: bool,
    ) -> Token<'src> {
        let begin = self.pos;
        self.bump(); // opening delimiter

        loop {
            match self.cur_byte() {
                None => break,
                Some(b) if b == delim => {
                    if self.peek_byte(1) == Some(delim) {
                        self.bump();
                        self.bump();
                    } else {
                        self.bump();
                        break;
                    }
                }
                Some(b'\\') if honor_backslash => {
                    self.bump();
                    if self.cur_byte().is_some() {
                        self.bump();
                    }
                }
                _ => {
                    self.bump();
                }
            }
        }

        let raw = &self.src[begin..self.pos];
        self.make(TokenKind::Literal(kind), start, raw)
    }

    fn scan_0x_hex(&mut self, start: Position) -> Token<'src> {
        let begin = self.pos;
        self.bump(); // '0'
        self.bump(); // 'x'/'X'
        while matches!(self.cur_byte(), Some(b) if b.is_ascii_hexdigit()) {
            self.bump();
        }
        let raw = &self.src[begin..self.pos];
        self.make(TokenKind::Literal(LiteralKind::Hex), start, raw)
    }

    fn scan_ident(&mut self, start: Position) -> Token<'src> {
        let begin = self.pos;
        self.bump();
        while matches!(self.cur_byte(), Some(b) if b.is_ascii_alphanumeric() || b == b'_' || b == b'$') {
            self.bump();
        }
        let raw = &self.src[begin..self.pos];

        if raw.len() <= MAX_KEYWORD_LEN {
            let mut buf = [0u8; MAX_KEYWORD_LEN];
            let bytes = raw.as_bytes();
            for (slot, &b) in buf.iter_mut().zip(bytes) {
                *slot = b.to_ascii_lowercase();
            }
            if let Some(kw) = keyword::lookup(&buf[..bytes.len()]) {
                return self.make(TokenKind::Keyword(kw), start, raw);
            }
        }

        self.make(TokenKind::Ident, start, raw)
    }

    /// `$name`/`@name`/`:name` style named parameters: the prefix character
    /// followed by an identifier-ish run.
    fn scan_named_param(&mut self, start: Position) -> Token<'src> {
        let begin = self.pos;
        self.bump(); // prefix character
        while matches!(self.cur_byte(), Some(b) if b.is_ascii_alphanumeric() || b == b'_') {
            self.bump();
        }
        let raw = &self.src[begin..self.pos];
        self.make(TokenKind::Literal(LiteralKind::NamedParam), start, raw)
    }

    fn scan_punct(&mut self, start: Position) -> Token<'src> {
        let begin = self.pos;
        let c = self.cur_byte().expect("scan_punct called at end of input");

        macro_rules! single {
            ($p:expr) => {{
                self.bump();
                self.make(TokenKind::Punct($p), start, &self.src[begin..self.pos])
            }};
        }
        macro_rules! two {
            ($p:expr) => {{
                self.bump();
                self.bump();
                self.make(TokenKind::Punct($p), start, &self.src[begin..self.pos])
            }};
        }
        macro_rules! three {
            ($p:expr) => {{
                self.bump();
                self.bump();
                self.bump();
                self.make(TokenKind::Punct($p), start, &self.src[begin..self.pos])
            }};
        }

        match c {
            b'(' => single!(Punct::LParen),
            b')' => single!(Punct::RParen),
            b',' => single!(Punct::Comma),
            b';' => single!(Punct::Semicolon),
            b'~' => single!(Punct::Tilde),
            b'^' => single!(Punct::Caret),
            b'%' => single!(Punct::Percent),
            b'*' => single!(Punct::Star),
            b'/' => single!(Punct::Slash),
            b'+' => single!(Punct::Plus),
            b'-' => match (self.peek_byte(1), self.peek_byte(2)) {
                (Some(b'>'), Some(b'>')) => three!(Punct::Arrow2),
                (Some(b'>'), _) => two!(Punct::Arrow),
                _ => single!(Punct::Minus),
            },
            b'=' => match self.peek_byte(1) {
                Some(b'>') => two!(Punct::FatArrow),
                _ => single!(Punct::Eq),
            },
            b'<' => match self.peek_byte(1) {
                Some(b'=') => two!(Punct::Le),
                Some(b'>') => two!(Punct::LtGt),
                Some(b'@') => two!(Punct::ArrowAt),
                Some(b'<') => two!(Punct::LShift),
                _ => single!(Punct::Lt),
            },
            b'>' => match self.peek_byte(1) {
                Some(b'=') => two!(Punct::Ge),
                Some(b'>') => two!(Punct::RShift),
                _ => single!(Punct::Gt),
            },
            b'!' => match self.peek_byte(1) {
                Some(b'=') => two!(Punct::BangEq),
                _ => single!(Punct::Bang),
            },
            b'|' => match self.peek_byte(1) {
                Some(b'|') => two!(Punct::PipePipe),
                _ => single!(Punct::Pipe),
            },
            b'&' => match self.peek_byte(1) {
                Some(b'&') => two!(Punct::AmpAmp),
                _ => single!(Punct::Amp),
            },
            // A bare `#` is absorbed as a comment in `skip_trivia`; reaching
            // here means it must be followed by `>` (rule 4).
            b'#' => match self.peek_byte(2) {
                Some(b'>') => three!(Punct::HashArrow2),
                _ => two!(Punct::HashArrow),
            },
            b'@' => match self.peek_byte(1) {
                Some(b'>') => two!(Punct::AtArrow),
                Some(nb) if is_ident_start(nb) => self.scan_named_param(start),
                _ => {
                    self.bump();
                    self.make(TokenKind::Illegal, start, &self.src[begin..self.pos])
                }
            },
            // A bare `?` is the positional parameter token (§6 "Named
            // parameters"); the Pratt parser reinterprets it as the JSON
            // existence operator when it appears in infix (`led`) position,
            // so there is no separate `Punct` form for it.
            b'?' => match self.peek_byte(1) {
                Some(b'|') => two!(Punct::QPipe),
                Some(b'&') => two!(Punct::QAmp),
                Some(d) if d.is_ascii_digit() => self.scan_named_param(start),
                _ => {
                    self.bump();
                    self.make(
                        TokenKind::Literal(LiteralKind::QMarkParam),
                        start,
                        &self.src[begin..self.pos],
                    )
                }
            },
            b'$' => match self.peek_byte(1) {
                Some(nb) if nb.is_ascii_digit() || is_ident_start(nb) => self.scan_named_param(start),
                _ => single!(Punct::Dollar),
            },
            b':' => match self.peek_byte(1) {
                Some(nb) if is_ident_start(nb) => self.scan_named_param(start),
                _ => single!(Punct::Colon),
            },
            b'.' => match self.peek_byte(1) {
                Some(b'.') => two!(Punct::DotDot),
                _ => single!(Punct::Dot),
            },
            _ => {
                self.bump();
                self.make(TokenKind::Illegal, start, &self.src[begin..self.pos])
            }
        }
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

/// Tokenizes `src` into `out`, reusing its existing capacity, and returns it.
/// Includes the trailing [`TokenKind::Eof`] token. Whitespace and comments
/// are not emitted: the lexer absorbs them silently.
pub fn tokenize<'src>(src: &'src str, out: &mut Vec<Token<'src>>) -> &mut Vec<Token<'src>> {
    let mut lexer = Lexer::new(src);
    loop {
        let tok = lexer.next();
        let is_eof = tok.is_eof();
        out.push(tok);
        if is_eof {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let mut out = Vec::new();
        tokenize(src, &mut out);
        out.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn skips_whitespace_and_comments() {
        let mut out = Vec::new();
        tokenize("  select -- comment\n  /* block */ 1", &mut out);
        assert_eq!(
            out.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Literal(LiteralKind::Integer),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unterminated_block_comment_runs_to_eof() {
        let mut out = Vec::new();
        tokenize("select /* never closes", &mut out);
        assert_eq!(
            out.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![TokenKind::Keyword(Keyword::Select), TokenKind::Eof]
        );
    }

    #[test]
    fn hash_comment_vs_json_operator() {
        assert_eq!(
            kinds("a # b"),
            vec![TokenKind::Ident, TokenKind::Eof]
        );
        assert_eq!(
            kinds("a #> b"),
            vec![
                TokenKind::Ident,
                TokenKind::Punct(Punct::HashArrow),
                TokenKind::Ident,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn multi_char_operators() {
        assert_eq!(kinds("<="), vec![TokenKind::Punct(Punct::Le), TokenKind::Eof]);
        assert_eq!(kinds("<>"), vec![TokenKind::Punct(Punct::LtGt), TokenKind::Eof]);
        assert_eq!(kinds("->>"), vec![TokenKind::Punct(Punct::Arrow2), TokenKind::Eof]);
        assert_eq!(kinds("#>>"), vec![TokenKind::Punct(Punct::HashArrow2), TokenKind::Eof]);
        assert_eq!(kinds("@>"), vec![TokenKind::Punct(Punct::AtArrow), TokenKind::Eof]);
        assert_eq!(kinds("?|"), vec![TokenKind::Punct(Punct::QPipe), TokenKind::Eof]);
    }

    #[test]
    fn numeric_literals() {
        let mut out = Vec::new();
        tokenize("1 1.5 .5 1e10 1.2e-3 1.", &mut out);
        let lits: Vec<_> = out
            .iter()
            .filter_map(|t| match t.kind {
                TokenKind::Literal(k) => Some((k, t.raw)),
                _ => None,
            })
            .collect();
        assert_eq!(
            lits,
            vec![
                (LiteralKind::Integer, "1"),
                (LiteralKind::Float, "1.5"),
                (LiteralKind::Float, ".5"),
                (LiteralKind::Float, "1e10"),
                (LiteralKind::Float, "1.2e-3"),
                (LiteralKind::Float, "1."),
            ]
        );
    }

    #[test]
    fn quoted_string_with_doubled_escape() {
        let mut out = Vec::new();
        tokenize("'it''s'", &mut out);
        assert_eq!(out[0].raw, "'it''s'");
        assert_eq!(out[0].kind, TokenKind::Literal(LiteralKind::SingleQuotedString));
    }

    #[test]
    fn backtick_ident_ignores_backslash() {
        let mut out = Vec::new();
        tokenize(r"`a\b`", &mut out);
        assert_eq!(out[0].raw, r"`a\b`");
        assert_eq!(out[0].kind, TokenKind::Literal(LiteralKind::BacktickQuotedString));
    }

    #[test]
    fn parameters() {
        assert_eq!(kinds("?"), vec![TokenKind::Literal(LiteralKind::QMarkParam), TokenKind::Eof]);
        let mut out = Vec::new();
        tokenize("?1 $2 :name @name $name", &mut out);
        for tok in out.iter().take(5) {
            assert_eq!(tok.kind, TokenKind::Literal(LiteralKind::NamedParam));
        }
    }

    #[test]
    fn hex_and_bit_literals() {
        let mut out = Vec::new();
        tokenize("x'FF' 0x1A b'01'", &mut out);
        let kinds: Vec<_> = out.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Literal(LiteralKind::Hex),
                TokenKind::Literal(LiteralKind::Hex),
                TokenKind::Literal(LiteralKind::Bit),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn position_tracking_across_newlines() {
        let mut out = Vec::new();
        tokenize("a\nb", &mut out);
        assert_eq!(out[0].position, Position { offset: 0, line: 1, column: 1 });
        assert_eq!(out[1].position, Position { offset: 2, line: 2, column: 1 });
    }

    #[test]
    fn tokenization_covers_the_source() {
        // Every byte of the source is accounted for by some token's raw
        // span or by inter-token trivia (whitespace/comments).
        let src = "SELECT a, b FROM t WHERE a = 1; -- trailing\n";
        let mut out = Vec::new();
        tokenize(src, &mut out);
        let mut offsets: Vec<usize> = out.iter().map(|t| t.position.offset).collect();
        offsets.dedup();
        for w in offsets.windows(2) {
            assert!(w[0] < w[1], "token offsets must be strictly increasing");
        }
    }
}
