/*!
Atomic patterns: the smallest unit the matcher can test against a single
input character, and the parser that recognizes them in the pattern text.
*/

use std::fmt::{self, Display, Formatter};

use itertools::Itertools;

use crate::cursor::Cursor;
use crate::errors::CompileError;

/// The metacharacters that `\` turns back into plain literals.
const ESCAPABLE: &str = r"\.^$?*{}[]()";

/// One atomic pattern, the guard of a transition in the compiled graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Pattern {
    /// Matches without consuming anything. This is the guard of epsilon
    /// transitions; it never appears in the pattern text itself.
    Empty,
    /// A plain character, or an escaped metacharacter.
    Literal(char),
    /// `.`
    Any,
    /// `\s`
    Whitespace,
    /// `\w`
    Alpha,
    /// `\W`
    NonAlpha,
    /// `\d`
    Digit,
    /// `\D`
    NonDigit,
    /// `[ ]`, matches when any of its sub-patterns does.
    Set(Vec<Pattern>),
    /// `[^ ]`, matches when none of its sub-patterns does.
    NegatedSet(Vec<Pattern>),
}

impl Pattern {
    /// Whether this pattern accepts `ch`. `Empty` accepts anything, it
    /// just consumes nothing when it does.
    pub fn matches(&self, ch: char) -> bool {
        match self {
            Pattern::Empty => true,
            Pattern::Literal(literal) => *literal == ch,
            Pattern::Any => true,
            Pattern::Whitespace => ch.is_ascii_whitespace(),
            Pattern::Alpha => ch.is_ascii_alphabetic(),
            Pattern::NonAlpha => !ch.is_ascii_alphabetic(),
            Pattern::Digit => ch.is_ascii_digit(),
            Pattern::NonDigit => !ch.is_ascii_digit(),
            Pattern::Set(patterns) => patterns.iter().any(|p| p.matches(ch)),
            Pattern::NegatedSet(patterns) => {
                !patterns.iter().any(|p| p.matches(ch))
            }
        }
    }

    /// Bytes of input consumed when this pattern matches `ch`.
    pub fn width(&self, ch: char) -> usize {
        match self {
            Pattern::Empty => 0,
            _ => ch.len_utf8(),
        }
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Empty => write!(f, "empty"),
            Pattern::Literal(literal) => write!(f, "'{literal}'"),
            Pattern::Any => write!(f, "any"),
            Pattern::Whitespace => write!(f, r"\s"),
            Pattern::Alpha => write!(f, r"\w"),
            Pattern::NonAlpha => write!(f, r"\W"),
            Pattern::Digit => write!(f, r"\d"),
            Pattern::NonDigit => write!(f, r"\D"),
            Pattern::Set(patterns) => {
                write!(f, "[{}]", patterns.iter().join(", "))
            }
            Pattern::NegatedSet(patterns) => {
                write!(f, "[^{}]", patterns.iter().join(", "))
            }
        }
    }
}

/// Parses one atom at the cursor: an escape sequence, a `[ ]` set, the `.`
/// wildcard, or a bare literal. Leaves the cursor just past the atom.
pub(crate) fn parse_pattern(
    cursor: &mut Cursor,
) -> Result<Pattern, CompileError> {
    match cursor.bump() {
        Some('\\') => parse_escape(cursor),
        Some('[') => parse_set(cursor),
        Some('.') => Ok(Pattern::Any),
        Some(literal) => Ok(Pattern::Literal(literal)),
        // Callers only invoke the parser when a character is available.
        None => unreachable!(),
    }
}

fn parse_escape(cursor: &mut Cursor) -> Result<Pattern, CompileError> {
    match cursor.bump() {
        Some(ch) if ESCAPABLE.contains(ch) => Ok(Pattern::Literal(ch)),
        Some('s') => Ok(Pattern::Whitespace),
        Some('w') => Ok(Pattern::Alpha),
        Some('W') => Ok(Pattern::NonAlpha),
        Some('d') => Ok(Pattern::Digit),
        Some('D') => Ok(Pattern::NonDigit),
        Some(ch) => Err(CompileError::UnknownEscape(ch)),
        None => Err(CompileError::DanglingEscape),
    }
}

/// Parses the inside of a `[ ]` or `[^ ]` set; the cursor sits just past
/// the opening `[`. The sub-patterns use the same atom grammar, so escapes
/// and `.` work inside a set, but another `[` does not.
fn parse_set(cursor: &mut Cursor) -> Result<Pattern, CompileError> {
    let negated = cursor.eat('^');
    let mut patterns = Vec::new();
    loop {
        match cursor.peek() {
            None => return Err(CompileError::UnterminatedSet),
            Some(']') => {
                cursor.bump();
                break;
            }
            Some('[') => return Err(CompileError::NestedSet),
            Some(_) => patterns.push(parse_pattern(cursor)?),
        }
    }
    Ok(if negated {
        Pattern::NegatedSet(patterns)
    } else {
        Pattern::Set(patterns)
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(src: &str) -> Result<Pattern, CompileError> {
        parse_pattern(&mut Cursor::new(src))
    }

    #[test]
    fn literals_and_classes() {
        assert_eq!(parse("a"), Ok(Pattern::Literal('a')));
        assert_eq!(parse("."), Ok(Pattern::Any));
        assert_eq!(parse(r"\d"), Ok(Pattern::Digit));
        assert_eq!(parse(r"\D"), Ok(Pattern::NonDigit));
        assert_eq!(parse(r"\s"), Ok(Pattern::Whitespace));
        assert_eq!(parse(r"\."), Ok(Pattern::Literal('.')));
        assert_eq!(parse(r"\\"), Ok(Pattern::Literal('\\')));
        assert_eq!(parse(r"\)"), Ok(Pattern::Literal(')')));
    }

    #[test]
    fn sets() {
        assert_eq!(
            parse("[abc]"),
            Ok(Pattern::Set(vec![
                Pattern::Literal('a'),
                Pattern::Literal('b'),
                Pattern::Literal('c'),
            ]))
        );
        assert_eq!(
            parse("[^ab]"),
            Ok(Pattern::NegatedSet(vec![
                Pattern::Literal('a'),
                Pattern::Literal('b'),
            ]))
        );
        assert_eq!(
            parse(r"[\d\s]"),
            Ok(Pattern::Set(vec![Pattern::Digit, Pattern::Whitespace]))
        );
        assert_eq!(
            parse(r"[\]]"),
            Ok(Pattern::Set(vec![Pattern::Literal(']')]))
        );
    }

    #[test]
    fn parse_errors() {
        assert_eq!(parse("[ab"), Err(CompileError::UnterminatedSet));
        assert_eq!(parse("[a[b]]"), Err(CompileError::NestedSet));
        assert_eq!(parse(r"\q"), Err(CompileError::UnknownEscape('q')));
        assert_eq!(parse("\\"), Err(CompileError::DanglingEscape));
    }

    #[test]
    fn class_membership() {
        assert!(Pattern::Digit.matches('7'));
        assert!(!Pattern::Digit.matches('x'));
        assert!(Pattern::Alpha.matches('x'));
        assert!(!Pattern::Alpha.matches('7'));
        assert!(Pattern::NonAlpha.matches('7'));
        assert!(Pattern::Whitespace.matches('\t'));
        assert!(Pattern::Any.matches('!'));

        let set = parse("[abc]").unwrap();
        assert!(set.matches('b'));
        assert!(!set.matches('d'));

        let negated = parse("[^abc]").unwrap();
        assert!(!negated.matches('b'));
        assert!(negated.matches('d'));
    }
}
