//! Bracket-aware tokenizer shared by the address grammar.
//!
//! Splits on a delimiter only at bracket depth zero, so nested addresses
//! (which carry their own delimiters) stay in one piece.

use crate::domain::error::ParseError;

/// Square brackets, as used around dependency lists.
pub const SQUARE: (char, char) = ('[', ']');

struct Splitter<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
    offset: usize,
}

impl<'a> Splitter<'a> {
    fn new(input: &'a str, offset: usize) -> Self {
        Self {
            input,
            pos: 0,
            depth: 0,
            offset,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn split(
        mut self,
        delimiter: char,
        (open, close): (char, char),
    ) -> Result<Vec<&'a str>, ParseError> {
        let mut parts = Vec::new();
        let mut start = 0;

        while let Some(ch) = self.peek() {
            let at = self.pos;
            self.advance();
            if ch == open {
                self.depth += 1;
            } else if ch == close {
                if self.depth == 0 {
                    return Err(ParseError {
                        message: format!("unexpected '{}' with no matching '{}'", close, open),
                        position: self.offset + at,
                    });
                }
                self.depth -= 1;
            } else if ch == delimiter && self.depth == 0 {
                parts.push(&self.input[start..at]);
                start = self.pos;
            }
        }

        if self.depth != 0 {
            return Err(ParseError {
                message: format!("{} unclosed '{}'", self.depth, open),
                position: self.offset + self.input.len(),
            });
        }

        parts.push(&self.input[start..]);
        Ok(parts)
    }
}

/// Split `input` on `delimiter` wherever it is outside any bracket pair.
///
/// `offset` is added to error positions so nested calls report positions in
/// the outermost string.
pub fn split_top_level(
    input: &str,
    delimiter: char,
    brackets: (char, char),
    offset: usize,
) -> Result<Vec<&str>, ParseError> {
    Splitter::new(input, offset).split(delimiter, brackets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_only_at_depth_zero() {
        let parts = split_top_level("a;b;[c;d=[e;f]];g", ';', SQUARE, 0).unwrap();
        assert_eq!(parts, vec!["a", "b", "[c;d=[e;f]]", "g"]);
    }

    #[test]
    fn keeps_empty_pieces() {
        let parts = split_top_level("x;;", ';', SQUARE, 0).unwrap();
        assert_eq!(parts, vec!["x", "", ""]);
        assert_eq!(split_top_level("", '=', SQUARE, 0).unwrap(), vec![""]);
    }

    #[test]
    fn other_delimiters() {
        let parts = split_top_level("a;b;[];=c;d;[x=y];", '=', SQUARE, 0).unwrap();
        assert_eq!(parts, vec!["a;b;[];", "c;d;[x=y];"]);
    }

    #[test]
    fn stray_close_reports_position() {
        let err = split_top_level("ab;]", ';', SQUARE, 0).unwrap_err();
        assert_eq!(err.position, 3);
        let err = split_top_level("ab;]", ';', SQUARE, 10).unwrap_err();
        assert_eq!(err.position, 13);
    }

    #[test]
    fn unclosed_open_is_an_error() {
        let err = split_top_level("a;[b;c", ';', SQUARE, 0).unwrap_err();
        assert_eq!(err.position, 6);
        assert!(err.message.contains("unclosed"));
    }
}
