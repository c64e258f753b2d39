//! Lexical analyzer

use std::error::Error;
use std::fmt;
use std::io;
use std::io::prelude::*;

use crate::byte_reader::ByteReader;
use crate::diag::{Position, SyntaxError, SyntaxErrorKind};
use crate::token::Token;

/// Maximum length of a token, in bytes.
const MAX_TOKEN: usize = 1023;

/// Turn a sequence of bytes into a sequence of tokens.
pub struct Scanner<R: BufRead> {
    input: ByteReader<R>,
    line: Position,

    // Buffer used when scanning identifiers and numbers.  Allocated here to reuse memory.
    buf: String,
}

impl<R: BufRead> Scanner<R> {
    /// Creates a new scanner operating on `input`.
    pub fn new(input: R) -> Scanner<R> {
        Scanner {
            input: ByteReader::new(input),
            line: 1,
            buf: String::new(),
        }
    }

    /// Scan the next token and return it with the line it ended on.
    pub fn get_token(&mut self) -> Result<(Position, Token), ScanError> {
        self.get_raw_token().map(|token| (self.line, token))
    }

    fn get_raw_token(&mut self) -> Result<Token, ScanError> {
        let first = match self.skip_blanks()? {
            Some(byte) => byte,
            None => return Ok(Token::Eof),
        };

        match first {
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.scan_identifier(first),
            b'0'..=b'9' => self.scan_number(first),
            b'-' => match self.input.next_byte()? {
                Some(byte) if byte.is_ascii_digit() => {
                    self.input.unget(byte);
                    self.scan_number(b'-')
                }
                Some(byte) => {
                    self.input.unget(byte);
                    Ok(Token::Minus)
                }
                None => Ok(Token::Minus),
            },
            b'"' | b'\'' => self.scan_string(first),
            b'=' => Ok(if self.next_is(b'=')? {
                Token::EqualEqual
            } else {
                Token::Equal
            }),
            b'&' => {
                if self.next_is(b'&')? {
                    Ok(Token::AndAnd)
                } else {
                    Err(self.syntax(SyntaxErrorKind::Syntax))
                }
            }
            b'|' => {
                if self.next_is(b'|')? {
                    Ok(Token::OrOr)
                } else {
                    Err(self.syntax(SyntaxErrorKind::Syntax))
                }
            }
            b'+' => Ok(Token::Plus),
            b'*' => Ok(Token::Star),
            b'/' => Ok(Token::Slash),
            b'<' => Ok(Token::Less),
            b'(' => Ok(Token::LeftParen),
            b')' => Ok(Token::RightParen),
            b'{' => Ok(Token::LeftCurly),
            b'}' => Ok(Token::RightCurly),
            b'[' => Ok(Token::LeftBracket),
            b']' => Ok(Token::RightBracket),
            b';' => Ok(Token::Semicolon),
            b',' => Ok(Token::Comma),
            _ => Err(self.syntax(SyntaxErrorKind::Syntax)),
        }
    }

    /// Consume whitespace and `#`-to-end-of-line comments, counting newlines, and return the
    /// first byte of the next token (or `None` at end of input).
    fn skip_blanks(&mut self) -> Result<Option<u8>, ScanError> {
        loop {
            let byte = match self.input.next_byte()? {
                Some(byte) => byte,
                None => return Ok(None),
            };
            match byte {
                b'#' => loop {
                    match self.input.next_byte()? {
                        None => return Ok(None),
                        Some(b'\n') => {
                            self.line += 1;
                            break;
                        }
                        Some(_) => (),
                    }
                },
                b'\n' => self.line += 1,
                b' ' | b'\t' | b'\r' | 0x0b | 0x0c => (),
                _ => return Ok(Some(byte)),
            }
        }
    }

    fn scan_identifier(&mut self, first: u8) -> Result<Token, ScanError> {
        self.buf.clear();
        self.buf.push(char::from(first));
        loop {
            match self.input.next_byte()? {
                Some(byte) if byte.is_ascii_alphanumeric() || byte == b'_' => {
                    self.push_to_buf(byte)?;
                }
                Some(byte) => {
                    self.input.unget(byte);
                    break;
                }
                None => break,
            }
        }

        Ok(match self.buf.as_str() {
            "if" => Token::If,
            "while" => Token::While,
            "print" => Token::Print,
            "push" => Token::Push,
            "len" => Token::Len,
            _ => Token::Identifier(self.buf.clone()),
        })
    }

    fn scan_number(&mut self, first: u8) -> Result<Token, ScanError> {
        self.buf.clear();
        self.buf.push(char::from(first));
        loop {
            match self.input.next_byte()? {
                Some(byte) if byte.is_ascii_digit() => self.push_to_buf(byte)?,
                Some(byte) => {
                    self.input.unget(byte);
                    break;
                }
                None => break,
            }
        }

        self.buf
            .parse::<i64>()
            .map(Token::Int)
            .map_err(|_| self.syntax(SyntaxErrorKind::Syntax))
    }

    /// Scan a string or character literal.  `quote` is the opening quote; the token ends at
    /// the matching unescaped quote on the same line.
    fn scan_string(&mut self, quote: u8) -> Result<Token, ScanError> {
        let mut body: Vec<u8> = Vec::new();
        // The opening and closing quotes count against the token length limit.
        let mut token_len = 1;
        let mut escape = false;
        loop {
            let byte = match self.input.next_byte()? {
                Some(byte) => byte,
                None => return Err(self.syntax(SyntaxErrorKind::InvalidStringLiteral)),
            };
            if byte == quote && !escape {
                break;
            }
            if byte == b'\n' {
                return Err(self.syntax(SyntaxErrorKind::InvalidStringLiteral));
            }
            if !escape && byte == b'\\' {
                escape = true;
                continue;
            }
            let decoded = if escape {
                escape = false;
                match byte {
                    b'n' => b'\n',
                    b't' => b'\t',
                    b'"' => b'"',
                    b'\\' => b'\\',
                    _ => return Err(self.syntax(SyntaxErrorKind::InvalidEscape(byte))),
                }
            } else {
                byte
            };
            if token_len >= MAX_TOKEN {
                return Err(self.syntax(SyntaxErrorKind::TokenTooLong));
            }
            body.push(decoded);
            token_len += 1;
        }
        if token_len >= MAX_TOKEN {
            return Err(self.syntax(SyntaxErrorKind::TokenTooLong));
        }

        if quote == b'\'' {
            if body.len() != 1 {
                return Err(self.syntax(SyntaxErrorKind::InvalidSingleQuote));
            }
            Ok(Token::Char(body[0]))
        } else {
            Ok(Token::Str(body))
        }
    }

    fn push_to_buf(&mut self, byte: u8) -> Result<(), ScanError> {
        if self.buf.len() >= MAX_TOKEN {
            return Err(self.syntax(SyntaxErrorKind::TokenTooLong));
        }
        self.buf.push(char::from(byte));
        Ok(())
    }

    /// Consume the next byte if it equals `expected`; push it back otherwise.
    fn next_is(&mut self, expected: u8) -> Result<bool, ScanError> {
        match self.input.next_byte()? {
            Some(byte) if byte == expected => Ok(true),
            Some(byte) => {
                self.input.unget(byte);
                Ok(false)
            }
            None => Ok(false),
        }
    }

    fn syntax(&self, kind: SyntaxErrorKind) -> ScanError {
        ScanError::Syntax(SyntaxError {
            pos: self.line,
            kind,
        })
    }
}

impl<R: BufRead> Iterator for Scanner<R> {
    type Item = Result<Token, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.get_token() {
            Ok((_, Token::Eof)) => None,
            Ok((_, t)) => Some(Ok(t)),
            Err(e) => Some(Err(e)),
        }
    }
}

#[derive(Debug)]
pub enum ScanError {
    Io(io::Error),
    Syntax(SyntaxError),
}

impl Error for ScanError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ScanError::Io(e) => Some(e),
            ScanError::Syntax(_) => None,
        }
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::Io(e) => write!(f, "read error: {}", e),
            ScanError::Syntax(e) => write!(f, "{}", e),
        }
    }
}

impl From<io::Error> for ScanError {
    fn from(e: io::Error) -> ScanError {
        ScanError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    fn scan(input: &str) -> Result<Vec<Token>, ScanError> {
        let s = Scanner::new(BufReader::new(input.as_bytes()));
        s.collect::<Result<Vec<Token>, ScanError>>()
    }

    fn scan_err(input: &str) -> SyntaxError {
        match scan(input) {
            Err(ScanError::Syntax(e)) => e,
            r => panic!("unexpected output: {:?}", r),
        }
    }

    #[test]
    fn scan_single_token() -> Result<(), ScanError> {
        assert_eq!(scan("+")?, vec![Token::Plus]);
        Ok(())
    }

    #[test]
    fn fixed_tokens() -> Result<(), ScanError> {
        assert_eq!(
            scan("+ - * / < = == && || ( ) { } [ ] ; ,")?,
            vec![
                Token::Plus,
                Token::Minus,
                Token::Star,
                Token::Slash,
                Token::Less,
                Token::Equal,
                Token::EqualEqual,
                Token::AndAnd,
                Token::OrOr,
                Token::LeftParen,
                Token::RightParen,
                Token::LeftCurly,
                Token::RightCurly,
                Token::LeftBracket,
                Token::RightBracket,
                Token::Semicolon,
                Token::Comma,
            ]
        );
        Ok(())
    }

    #[test]
    fn two_byte_operators_are_greedy() -> Result<(), ScanError> {
        assert_eq!(
            scan("===")?,
            vec![Token::EqualEqual, Token::Equal],
            "the third = must be pushed back and scanned alone"
        );
        Ok(())
    }

    #[test]
    fn blanks_are_ignored() -> Result<(), ScanError> {
        assert_eq!(scan(" \t\r\n+")?, vec![Token::Plus]);
        Ok(())
    }

    #[test]
    fn comments_run_to_end_of_line() -> Result<(), ScanError> {
        assert_eq!(
            scan("1 # everything here is skipped ; [ \n2")?,
            vec![Token::Int(1), Token::Int(2)]
        );
        assert_eq!(scan("# comment up to eof")?, vec![]);
        Ok(())
    }

    #[test]
    fn integer_literals() -> Result<(), ScanError> {
        assert_eq!(scan("0 42 -7")?, vec![
            Token::Int(0),
            Token::Int(42),
            Token::Int(-7)
        ]);
        Ok(())
    }

    #[test]
    fn minus_is_negative_sign_only_before_a_digit() -> Result<(), ScanError> {
        assert_eq!(
            scan("1 - 2")?,
            vec![Token::Int(1), Token::Minus, Token::Int(2)]
        );
        assert_eq!(scan("1 -2")?, vec![Token::Int(1), Token::Int(-2)]);
        assert_eq!(scan("-")?, vec![Token::Minus]);
        assert_eq!(scan("- 2")?, vec![Token::Minus, Token::Int(2)]);
        Ok(())
    }

    #[test]
    fn number_glued_to_identifier_splits() -> Result<(), ScanError> {
        assert_eq!(
            scan("9abc")?,
            vec![Token::Int(9), Token::Identifier("abc".to_string())]
        );
        Ok(())
    }

    #[test]
    fn out_of_range_integer_is_a_syntax_error() {
        let e = scan_err("99999999999999999999999999");
        assert_eq!(e.kind, SyntaxErrorKind::Syntax);
        assert_eq!(e.pos, 1);
    }

    #[test]
    fn identifiers_and_keywords() -> Result<(), ScanError> {
        assert_eq!(
            scan("foo _bar t42 if while print push len lenx")?,
            vec![
                Token::Identifier("foo".to_string()),
                Token::Identifier("_bar".to_string()),
                Token::Identifier("t42".to_string()),
                Token::If,
                Token::While,
                Token::Print,
                Token::Push,
                Token::Len,
                Token::Identifier("lenx".to_string()),
            ]
        );
        Ok(())
    }

    #[test]
    fn scanner_keeps_track_of_lines() -> Result<(), ScanError> {
        let mut s = Scanner::new(BufReader::new("1\n2 3\n# skip\n4".as_bytes()));
        assert_eq!(s.get_token()?, (1, Token::Int(1)));
        assert_eq!(s.get_token()?, (2, Token::Int(2)));
        assert_eq!(s.get_token()?, (2, Token::Int(3)));
        assert_eq!(s.get_token()?, (4, Token::Int(4)));
        assert_eq!(s.get_token()?, (4, Token::Eof));
        Ok(())
    }

    #[test]
    fn string_literal_decodes_to_bytes() -> Result<(), ScanError> {
        assert_eq!(scan(r#""Hi""#)?, vec![Token::Str(b"Hi".to_vec())]);
        assert_eq!(scan(r#""""#)?, vec![Token::Str(vec![])]);
        Ok(())
    }

    #[test]
    fn string_escapes() -> Result<(), ScanError> {
        assert_eq!(
            scan(r#""a\n\t\"\\b""#)?,
            vec![Token::Str(b"a\n\t\"\\b".to_vec())]
        );
        Ok(())
    }

    #[test]
    fn char_literal_is_one_byte() -> Result<(), ScanError> {
        assert_eq!(scan("'x'")?, vec![Token::Char(b'x')]);
        assert_eq!(scan(r"'\n'")?, vec![Token::Char(b'\n')]);
        Ok(())
    }

    #[test]
    fn invalid_escape_is_reported() {
        let e = scan_err(r#""a\q""#);
        assert_eq!(e.kind, SyntaxErrorKind::InvalidEscape(b'q'));
        assert_eq!(e.to_string(), "line 1: Invalid escape sequence \"\\q\"");
    }

    #[test]
    fn newline_inside_string_is_reported() {
        let e = scan_err("\"abc\ndef\"");
        assert_eq!(e.kind, SyntaxErrorKind::InvalidStringLiteral);
        assert_eq!(e.to_string(), "line 1: invalid string literal.");
    }

    #[test]
    fn eof_inside_string_is_reported() {
        let e = scan_err("\"abc");
        assert_eq!(e.kind, SyntaxErrorKind::InvalidStringLiteral);
    }

    #[test]
    fn single_quoted_string_must_hold_one_byte() {
        assert_eq!(scan_err("'ab'").kind, SyntaxErrorKind::InvalidSingleQuote);
        assert_eq!(scan_err("''").kind, SyntaxErrorKind::InvalidSingleQuote);
        assert_eq!(
            scan_err("''").to_string(),
            "line 1: Invalid single-quoted string"
        );
    }

    #[test]
    fn quote_escape_inside_single_quotes_is_invalid() {
        assert_eq!(scan_err(r"'\''").kind, SyntaxErrorKind::InvalidEscape(b'\''));
    }

    #[test]
    fn overlong_identifier_is_reported() {
        let long = "x".repeat(MAX_TOKEN + 1);
        let e = scan_err(&long);
        assert_eq!(e.kind, SyntaxErrorKind::TokenTooLong);
        assert_eq!(e.to_string(), "line 1: token too long");
    }

    #[test]
    fn longest_legal_identifier_scans() -> Result<(), ScanError> {
        let name = "x".repeat(MAX_TOKEN);
        assert_eq!(scan(&name)?, vec![Token::Identifier(name.clone())]);
        Ok(())
    }

    #[test]
    fn overlong_string_is_reported() {
        let body = "s".repeat(MAX_TOKEN);
        let e = scan_err(&format!("\"{}\"", body));
        assert_eq!(e.kind, SyntaxErrorKind::TokenTooLong);
    }

    #[test]
    fn stray_symbol_is_a_syntax_error() {
        assert_eq!(scan_err("@").kind, SyntaxErrorKind::Syntax);
        assert_eq!(scan_err("a > b").kind, SyntaxErrorKind::Syntax);
        assert_eq!(scan_err("a & b").kind, SyntaxErrorKind::Syntax);
        assert_eq!(scan_err("1\n%").to_string(), "line 2: syntax error");
    }
}
