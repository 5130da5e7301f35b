/*!
This module compiles a pattern string into the graph of states and
transitions that the matcher executes.

Compilation is a single recursive-descent walk over the pattern text. Each
quantified atom or group appends a small, fixed shape to the state chain:
mandatory repetitions become a straight run of states, an unbounded
quantifier becomes a consume self-loop with an epsilon edge onward, and
bounded optional repetitions each offer a consume edge next to an epsilon
bypass. Capture groups re-compile their body once per repetition and OR
their group bit onto the states that begin and end every copy.
*/

use log::debug;

use crate::cursor::Cursor;
use crate::errors::CompileError;
use crate::nfa::{GroupSet, Regex, StateId, MAX_GROUPS};
use crate::pattern::{parse_pattern, Pattern};
use crate::repetition::{parse_repetition, Repetition};

/// Compiles `pattern` into a [`Regex`].
///
/// # Example
///
/// ```rust
/// let regex = regrep::compile(r"^\d{4}-\d{2}$").unwrap();
///
/// assert!(regex.is_match("2024-11").unwrap());
/// assert!(!regex.is_match("2024-1").unwrap());
/// ```
pub fn compile(pattern: &str) -> Result<Regex, CompileError> {
    Compiler::new(pattern).compile()
}

pub(crate) struct Compiler<'src> {
    cursor: Cursor<'src>,
    regex: Regex,
}

impl<'src> Compiler<'src> {
    pub fn new(pattern: &'src str) -> Self {
        Self { cursor: Cursor::new(pattern), regex: Regex::new() }
    }

    pub fn compile(mut self) -> Result<Regex, CompileError> {
        debug!("compiling `{}`", self.cursor.source());

        let trap = self.regex.add_state()?;
        self.regex.add_edge(trap, trap, Pattern::Any)?;
        self.regex.trap = trap;

        let initial = self.regex.add_state()?;
        self.regex.initial = initial;

        let group0 = self.new_group()?;
        self.regex.states[initial].begin_groups |= group0;

        let anchored_start = self.cursor.eat('^');

        let mut last = self.compile_chain(initial)?;
        if last == initial {
            // an empty pattern body still needs distinct begin and end
            // states for group 0
            last = self.regex.add_state()?;
            self.regex.add_edge(initial, last, Pattern::Empty)?;
        }
        self.regex.states[last].accepts = true;
        self.regex.states[last].end_groups |= group0;

        if self.cursor.peek() == Some('$') && self.cursor.second().is_none() {
            self.cursor.bump();
            // anything after the anchored end walks into the trap and can
            // never be accepted
            self.regex.add_edge(last, trap, Pattern::Any)?;
        } else {
            // Unanchored end: an accepting drain swallows whatever follows
            // the match. Keeping the drain separate from `last` leaves the
            // capture marks on `last` untouched while the suffix is
            // consumed.
            let drain = self.regex.add_state()?;
            self.regex.add_edge(last, drain, Pattern::Empty)?;
            self.regex.add_edge(drain, drain, Pattern::Any)?;
            self.regex.states[drain].accepts = true;
        }

        if anchored_start {
            self.regex.start = initial;
        } else {
            // Unanchored start: the search begins at a scan state that
            // first tries to enter the pattern and otherwise skips one
            // character of prefix. Trying the entry edge first yields the
            // leftmost match, and since group 0 begins at `initial`, its
            // span excludes whatever prefix was skipped.
            let scan = self.regex.add_state()?;
            self.regex.add_edge(scan, initial, Pattern::Empty)?;
            self.regex.add_edge(scan, scan, Pattern::Any)?;
            self.regex.start = scan;
        }

        if !self.cursor.at_end() {
            return Err(CompileError::TrailingInput(
                self.cursor.rest().to_string(),
            ));
        }

        debug!(
            "compiled `{}` into {} states and {} capture groups",
            self.cursor.source(),
            self.regex.state_count(),
            self.regex.group_count(),
        );

        Ok(self.regex)
    }

    /// Returns the bit for a newly declared capture group.
    fn new_group(&mut self) -> Result<GroupSet, CompileError> {
        if self.regex.group_count >= MAX_GROUPS {
            return Err(CompileError::TooManyGroups);
        }
        let group = GroupSet::single(self.regex.group_count);
        self.regex.group_count += 1;
        Ok(group)
    }

    /// Appends a chain of states after `start` for the constructs at the
    /// cursor, stopping at end of input, at `)`, or at a trailing `$`.
    /// Returns the last state of the chain, which is `start` itself when
    /// the chain is empty.
    fn compile_chain(
        &mut self,
        start: StateId,
    ) -> Result<StateId, CompileError> {
        let mut curr = start;
        loop {
            let Some(ch) = self.cursor.peek() else { break };
            if ch == ')' {
                break;
            }
            if ch == '$' && self.cursor.second().is_none() {
                break;
            }
            if ch == '(' {
                self.cursor.bump();
                curr = self.compile_group(curr)?;
                continue;
            }
            let pattern = parse_pattern(&mut self.cursor)?;
            let rep = parse_repetition(&mut self.cursor)?;
            curr = self.compile_atom(curr, pattern, rep)?;
        }
        Ok(curr)
    }

    /// Emits the state chain for a single quantified atom.
    fn compile_atom(
        &mut self,
        start: StateId,
        pattern: Pattern,
        rep: Repetition,
    ) -> Result<StateId, CompileError> {
        let mut curr = start;
        // the mandatory repetitions are a straight chain
        for _ in 0..rep.lower {
            let next = self.regex.add_state()?;
            self.regex.add_edge(curr, next, pattern.clone())?;
            curr = next;
        }
        if rep.unbounded {
            // consume as many more as we like on the junction, or stop and
            // move on; when `lower` is zero the epsilon edge also skips
            // the whole construct
            let next = self.regex.add_state()?;
            self.regex.add_edge(curr, curr, pattern)?;
            self.regex.add_edge(curr, next, Pattern::Empty)?;
            curr = next;
        } else {
            // optional repetitions: consume one more, or bypass it
            for _ in rep.lower..rep.upper {
                let next = self.regex.add_state()?;
                self.regex.add_edge(curr, next, pattern.clone())?;
                self.regex.add_edge(curr, next, Pattern::Empty)?;
                curr = next;
            }
        }
        Ok(curr)
    }

    /// Compiles a `( )` capture group; the cursor sits just past the `(`.
    ///
    /// Every repetition of a group is a fresh compilation of its body, so
    /// the group bit lands on the states that begin and end each copy, and
    /// groups nested inside the body are declared once per copy.
    fn compile_group(
        &mut self,
        start: StateId,
    ) -> Result<StateId, CompileError> {
        let body_start = self.cursor.pos();
        let body_end = self.find_group_end()?;
        self.cursor.set_pos(body_end + 1);
        let rep = parse_repetition(&mut self.cursor)?;
        let after = self.cursor.pos();

        let group = self.new_group()?;

        let mut curr = start;
        for _ in 0..rep.lower {
            curr = self.compile_group_copy(curr, body_start, body_end, group)?;
        }
        if rep.unbounded {
            let loop_start = curr;
            let loop_end =
                self.compile_group_copy(curr, body_start, body_end, group)?;
            let done = self.regex.add_state()?;
            // repeat the copy, stop after it, or skip it entirely
            self.regex.add_edge(loop_end, loop_start, Pattern::Empty)?;
            self.regex.add_edge(loop_end, done, Pattern::Empty)?;
            self.regex.add_edge(loop_start, done, Pattern::Empty)?;
            curr = done;
        } else {
            for _ in rep.lower..rep.upper {
                let before = curr;
                curr = self
                    .compile_group_copy(curr, body_start, body_end, group)?;
                // the whole copy can also be bypassed
                self.regex.add_edge(before, curr, Pattern::Empty)?;
            }
        }

        self.cursor.set_pos(after);
        Ok(curr)
    }

    /// Compiles one copy of a group body, marking the states that begin
    /// and end it with the group's bit.
    fn compile_group_copy(
        &mut self,
        from: StateId,
        body_start: usize,
        body_end: usize,
        group: GroupSet,
    ) -> Result<StateId, CompileError> {
        self.cursor.set_pos(body_start);
        self.regex.states[from].begin_groups |= group;
        let mut to = self.compile_chain(from)?;
        debug_assert_eq!(self.cursor.pos(), body_end);
        if to == from {
            // A zero-width body would put the begin and end marks on the
            // same state; an empty link separates them so the capture scan
            // sees a begin arrival and an end arrival.
            to = self.regex.add_state()?;
            self.regex.add_edge(from, to, Pattern::Empty)?;
        }
        self.regex.states[to].end_groups |= group;
        Ok(to)
    }

    /// Finds the byte offset of the `)` matching the `(` the cursor just
    /// consumed, without moving the cursor. Escapes and `[ ]` sets are
    /// honored, since both may contain bare parentheses.
    fn find_group_end(&self) -> Result<usize, CompileError> {
        let mut depth = 0usize;
        let mut probe = self.cursor.clone();
        loop {
            match probe.bump() {
                None => return Err(CompileError::UnclosedGroup),
                Some('\\') => {
                    probe.bump();
                }
                Some('[') => loop {
                    match probe.bump() {
                        None => return Err(CompileError::UnterminatedSet),
                        Some('\\') => {
                            probe.bump();
                        }
                        Some(']') => break,
                        Some(_) => {}
                    }
                },
                Some('(') => depth += 1,
                Some(')') if depth == 0 => return Ok(probe.pos() - 1),
                Some(')') => depth -= 1,
                Some(_) => {}
            }
        }
    }
}
