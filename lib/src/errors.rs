use thiserror::Error;

/// Errors returned while compiling a pattern into a [`Regex`](crate::Regex).
///
/// Compilation either succeeds completely or fails with one of these
/// errors; a partial graph is never returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// An escape sequence other than the character classes and the escaped
    /// metacharacters.
    #[error("unexpected escape sequence `\\{0}`")]
    UnknownEscape(char),

    /// The pattern ends with a bare `\`.
    #[error("escape character at the end of the pattern")]
    DanglingEscape,

    /// A `[ ]` set was still open when the pattern ended.
    #[error("end of input inside `[ ]` set")]
    UnterminatedSet,

    /// A `[` inside a `[ ]` set.
    #[error("`[ ]` sets can not be nested")]
    NestedSet,

    /// A `( )` group was still open when the pattern ended.
    #[error("unclosed `( )` capture group, expected a closing `)`")]
    UnclosedGroup,

    /// A `{ }` repetition that does not follow the `{m}`, `{m,}` or
    /// `{m,n}` grammar.
    #[error("malformed `{{ }}` repetition: {0}")]
    MalformedRepetition(&'static str),

    /// A `{m,n}` repetition with `n < m`.
    #[error("repetition upper bound ({upper}) is less than lower bound ({lower})")]
    InvalidBounds {
        /// The `m` in `{m,n}`.
        lower: u32,
        /// The `n` in `{m,n}`.
        upper: u32,
    },

    /// The pattern declares more capture groups than fit in the group
    /// bitset.
    #[error("more than {} capture groups are not supported", crate::MAX_GROUPS)]
    TooManyGroups,

    /// Characters were left over after parsing finished, commonly caused
    /// by an unbalanced `)`.
    #[error("unexpected characters after parsing was finished: `{0}`, was there an unclosed `)`?")]
    TrailingInput(String),

    /// The graph arena could not grow.
    #[error("out of memory while building the graph")]
    OutOfMemory,
}

/// Errors returned while matching an input string.
///
/// An input that simply does not match is not an error; matching reports
/// that as a regular result.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchError {
    /// The search path or the capture table could not grow.
    #[error("out of memory while searching for a match")]
    OutOfMemory,
}
