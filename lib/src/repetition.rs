/*!
Repetition bounds: how many times an atom or group may repeat, and the
parser for the quantifier suffixes that express them.
*/

use crate::cursor::Cursor;
use crate::errors::CompileError;

/// How many times a pattern can be repeated. When `unbounded` is set the
/// upper bound is ignored and the pattern may repeat any number of times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Repetition {
    /// We must match at least this many instances (inclusive).
    pub lower: u32,
    /// We may match at most this many instances (inclusive).
    pub upper: u32,
    pub unbounded: bool,
}

impl Default for Repetition {
    /// No quantifier means the pattern appears exactly once.
    fn default() -> Self {
        Repetition { lower: 1, upper: 1, unbounded: false }
    }
}

/// Parses an optional quantifier at the cursor (`?`, `*`, `+`, `{m}`,
/// `{m,}` or `{m,n}`), advancing past it. Without a quantifier the default
/// bound is returned and the cursor stays put.
pub(crate) fn parse_repetition(
    cursor: &mut Cursor,
) -> Result<Repetition, CompileError> {
    match cursor.peek() {
        Some('?') => {
            cursor.bump();
            Ok(Repetition { lower: 0, upper: 1, unbounded: false })
        }
        Some('*') => {
            cursor.bump();
            Ok(Repetition { lower: 0, upper: u32::MAX, unbounded: true })
        }
        Some('+') => {
            cursor.bump();
            Ok(Repetition { lower: 1, upper: u32::MAX, unbounded: true })
        }
        Some('{') => {
            cursor.bump();
            parse_braces(cursor)
        }
        _ => Ok(Repetition::default()),
    }
}

fn parse_braces(cursor: &mut Cursor) -> Result<Repetition, CompileError> {
    let lower = parse_number(cursor)?;
    match cursor.bump() {
        Some('}') => Ok(Repetition { lower, upper: lower, unbounded: false }),
        Some(',') => {
            if cursor.eat('}') {
                return Ok(Repetition {
                    lower,
                    upper: u32::MAX,
                    unbounded: true,
                });
            }
            if !matches!(cursor.peek(), Some(ch) if ch.is_ascii_digit()) {
                return Err(CompileError::MalformedRepetition(
                    "expected `}` or a number after `,`",
                ));
            }
            let upper = parse_number(cursor)?;
            if upper < lower {
                return Err(CompileError::InvalidBounds { lower, upper });
            }
            if !cursor.eat('}') {
                return Err(CompileError::MalformedRepetition(
                    "expected `}` after the upper bound",
                ));
            }
            Ok(Repetition { lower, upper, unbounded: false })
        }
        _ => Err(CompileError::MalformedRepetition(
            "expected `,` or `}` after the lower bound",
        )),
    }
}

fn parse_number(cursor: &mut Cursor) -> Result<u32, CompileError> {
    let mut value: u32 = 0;
    let mut digits = 0;
    while let Some(digit) = cursor.peek().and_then(|ch| ch.to_digit(10)) {
        cursor.bump();
        value = value
            .checked_mul(10)
            .and_then(|value| value.checked_add(digit))
            .ok_or(CompileError::MalformedRepetition(
                "repetition bound is too large",
            ))?;
        digits += 1;
    }
    if digits == 0 {
        return Err(CompileError::MalformedRepetition(
            "expected a number inside `{ }`",
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(src: &str) -> Result<Repetition, CompileError> {
        parse_repetition(&mut Cursor::new(src))
    }

    #[test]
    fn quantifiers() {
        assert_eq!(
            parse("?"),
            Ok(Repetition { lower: 0, upper: 1, unbounded: false })
        );
        assert_eq!(
            parse("*"),
            Ok(Repetition { lower: 0, upper: u32::MAX, unbounded: true })
        );
        assert_eq!(
            parse("+"),
            Ok(Repetition { lower: 1, upper: u32::MAX, unbounded: true })
        );
        assert_eq!(
            parse("{3}"),
            Ok(Repetition { lower: 3, upper: 3, unbounded: false })
        );
        assert_eq!(
            parse("{2,}"),
            Ok(Repetition { lower: 2, upper: u32::MAX, unbounded: true })
        );
        assert_eq!(
            parse("{2,5}"),
            Ok(Repetition { lower: 2, upper: 5, unbounded: false })
        );
    }

    #[test]
    fn no_quantifier_does_not_advance() {
        let mut cursor = Cursor::new("abc");
        assert_eq!(parse_repetition(&mut cursor), Ok(Repetition::default()));
        assert_eq!(cursor.pos(), 0);
    }

    #[test]
    fn malformed_braces() {
        assert!(matches!(
            parse("{}"),
            Err(CompileError::MalformedRepetition(_))
        ));
        assert!(matches!(
            parse("{a}"),
            Err(CompileError::MalformedRepetition(_))
        ));
        assert!(matches!(
            parse("{2"),
            Err(CompileError::MalformedRepetition(_))
        ));
        assert!(matches!(
            parse("{2,a}"),
            Err(CompileError::MalformedRepetition(_))
        ));
        assert!(matches!(
            parse("{2,5"),
            Err(CompileError::MalformedRepetition(_))
        ));
        assert_eq!(
            parse("{5,2}"),
            Err(CompileError::InvalidBounds { lower: 5, upper: 2 })
        );
    }
}
