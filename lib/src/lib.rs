/*! A line-oriented regular expression engine with capture groups.

This crate compiles a pattern into a graph of states and pattern-guarded
transitions, and matches it against input strings with a greedy
backtracking search. A successful match produces a [`Captures`] table that
records, for every `( )` group in the pattern, the spans of input each of
its repetitions consumed; group 0 is implicit and spans the whole match.

The supported syntax is deliberately small: literals, `.`, the
`\s \w \W \d \D` classes, `[ ]` and `[^ ]` sets, the `? * + {m} {m,}
{m,n}` quantifiers, `( )` capture groups, and the `^`/`$` anchors. There
is no alternation, no backreferences and no lazy quantifiers, and class
semantics are ASCII-oriented.

# Example

```rust
let regex = regrep::compile(r"(\w+)@(\w+)").unwrap();

let captures = regex.captures("mail me at user@example").unwrap().unwrap();

assert_eq!(captures.iter_group(0).collect::<Vec<_>>(), vec!["user@example"]);
assert_eq!(captures.iter_group(1).collect::<Vec<_>>(), vec!["user"]);
assert_eq!(captures.iter_group(2).collect::<Vec<_>>(), vec!["example"]);
```

A compiled [`Regex`] is immutable and can be reused for any number of
match calls; each call borrows the input only for as long as the returned
captures are alive.
*/

#![deny(missing_docs)]

pub use compiler::compile;
pub use errors::CompileError;
pub use errors::MatchError;
pub use matcher::Captures;
pub use nfa::Regex;
pub use nfa::MAX_GROUPS;

mod compiler;
mod cursor;
mod errors;
mod matcher;
mod nfa;
mod pattern;
mod repetition;
