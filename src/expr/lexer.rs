// Tokenizer for formula strings
//
// Recognises the small arithmetic grammar plus the operators and literals of
// the surrounding expression language, so the parser can name them when it
// rejects them instead of reporting a bare syntax error.

use super::CompileError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Number(String),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Comma,
    Dot,
    /// Operators and punctuation outside the grammar (`%`, `<<`, `==`, `[` ...)
    Other(&'static str),
    /// String, raw string or rune literal
    Quoted,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
}

// Longest first so `<<` wins over `<`.
const OTHER_OPERATORS: &[&str] = &[
    "&^=", "<<=", ">>=", "...", "&&", "||", "<<", ">>", "&^", "==", "!=", "<=", ">=", ":=", "<-",
    "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "%", "&", "|", "^", "<", ">", "=", "!", "[",
    "]", "{", "}", ";", ":", "?", "~",
];

/// Split `source` into tokens, always ending with [`TokenKind::Eof`]
pub(crate) fn tokenize(source: &str) -> Result<Vec<Token>, CompileError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let c = bytes[pos];
        if c.is_ascii_whitespace() {
            pos += 1;
            continue;
        }

        let start = pos;
        let kind = if c.is_ascii_digit() || (c == b'.' && next_is_digit(bytes, pos)) {
            pos = scan_number(source, pos)?;
            TokenKind::Number(source[start..pos].to_string())
        } else if c == b'"' || c == b'`' || c == b'\'' {
            pos = scan_quoted(source, pos)?;
            TokenKind::Quoted
        } else if is_ident_start(source, pos) {
            pos = scan_ident(source, pos);
            TokenKind::Ident(source[start..pos].to_string())
        } else if let Some(op) = OTHER_OPERATORS
            .iter()
            .find(|op| source[pos..].starts_with(**op))
        {
            pos += op.len();
            TokenKind::Other(*op)
        } else {
            pos += 1;
            match c {
                b'+' => TokenKind::Plus,
                b'-' => TokenKind::Minus,
                b'*' => TokenKind::Star,
                b'/' => TokenKind::Slash,
                b'(' => TokenKind::LParen,
                b')' => TokenKind::RParen,
                b',' => TokenKind::Comma,
                b'.' => TokenKind::Dot,
                _ => {
                    let ch = source[start..].chars().next().unwrap_or('?');
                    return Err(CompileError::syntax(
                        start,
                        format!("unexpected character {:?}", ch),
                    ));
                }
            }
        };

        tokens.push(Token {
            kind,
            start,
            end: pos,
        });
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        start: bytes.len(),
        end: bytes.len(),
    });
    Ok(tokens)
}

fn next_is_digit(bytes: &[u8], pos: usize) -> bool {
    bytes.get(pos + 1).is_some_and(u8::is_ascii_digit)
}

fn is_ident_start(source: &str, pos: usize) -> bool {
    source[pos..]
        .chars()
        .next()
        .is_some_and(|c| c == '_' || c.is_alphabetic())
}

fn scan_ident(source: &str, pos: usize) -> usize {
    let len: usize = source[pos..]
        .chars()
        .take_while(|&c| c == '_' || c.is_alphanumeric())
        .map(char::len_utf8)
        .sum();
    pos + len
}

/// Decimal float: digits [. digits] [e|E [+|-] digits]
fn scan_number(source: &str, start: usize) -> Result<usize, CompileError> {
    let bytes = source.as_bytes();
    let digits = |mut p: usize| {
        while p < bytes.len() && bytes[p].is_ascii_digit() {
            p += 1;
        }
        p
    };

    let mut pos = digits(start);
    if pos < bytes.len() && bytes[pos] == b'.' {
        pos = digits(pos + 1);
    }
    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        let mut exp = pos + 1;
        if exp < bytes.len() && (bytes[exp] == b'+' || bytes[exp] == b'-') {
            exp += 1;
        }
        let end = digits(exp);
        if end == exp {
            return Err(CompileError::syntax(pos, "exponent has no digits"));
        }
        pos = end;
    }

    // `0x1F`, `2i`, `1_000` and friends
    if is_ident_start(source, pos) || source[pos..].starts_with(|c: char| c.is_ascii_digit()) {
        return Err(CompileError::syntax(
            start,
            format!("malformed number literal starting {:?}", &source[start..pos]),
        ));
    }
    Ok(pos)
}

fn scan_quoted(source: &str, start: usize) -> Result<usize, CompileError> {
    let bytes = source.as_bytes();
    let quote = bytes[start];
    let mut pos = start + 1;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' if quote != b'`' => pos += 2,
            b if b == quote => return Ok(pos + 1),
            _ => pos += 1,
        }
    }
    Err(CompileError::syntax(start, "literal not terminated"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_tokenize_arithmetic() {
        assert_eq!(
            kinds("N*N + 1.0"),
            vec![
                TokenKind::Ident("N".to_string()),
                TokenKind::Star,
                TokenKind::Ident("N".to_string()),
                TokenKind::Plus,
                TokenKind::Number("1.0".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_call() {
        assert_eq!(
            kinds("math.Log(N)"),
            vec![
                TokenKind::Ident("math".to_string()),
                TokenKind::Dot,
                TokenKind::Ident("Log".to_string()),
                TokenKind::LParen,
                TokenKind::Ident("N".to_string()),
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_number_forms() {
        for literal in ["1", "1.", ".5", "2.5e10", "1E-3", "6.02e+23"] {
            assert_eq!(
                kinds(literal),
                vec![TokenKind::Number(literal.to_string()), TokenKind::Eof],
                "{}",
                literal
            );
        }
    }

    #[test]
    fn test_tokenize_rejects_malformed_numbers() {
        assert!(tokenize("1e").is_err());
        assert!(tokenize("0x10").is_err());
        assert!(tokenize("3i").is_err());
    }

    #[test]
    fn test_tokenize_other_operators() {
        assert_eq!(
            kinds("N << 2"),
            vec![
                TokenKind::Ident("N".to_string()),
                TokenKind::Other("<<"),
                TokenKind::Number("2".to_string()),
                TokenKind::Eof,
            ]
        );
        assert_eq!(kinds("a[0]")[1], TokenKind::Other("["));
        assert_eq!(kinds("N % 2")[1], TokenKind::Other("%"));
    }

    #[test]
    fn test_tokenize_quoted() {
        assert_eq!(kinds(r#""abc\"d""#), vec![TokenKind::Quoted, TokenKind::Eof]);
        assert_eq!(kinds("`raw`"), vec![TokenKind::Quoted, TokenKind::Eof]);
        assert!(tokenize("\"open").is_err());
    }

    #[test]
    fn test_token_offsets() {
        let tokens = tokenize("  N +  10").unwrap();
        assert_eq!((tokens[0].start, tokens[0].end), (2, 3));
        assert_eq!((tokens[2].start, tokens[2].end), (7, 9));
        assert_eq!(tokens[3].start, 9);
    }

    #[test]
    fn test_unexpected_character() {
        let err = tokenize("N # 2").unwrap_err();
        assert!(matches!(err, CompileError::Syntax { offset: 2, .. }));
    }
}
