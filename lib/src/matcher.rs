/*!
This module executes a compiled graph against an input string.

The search is a classic backtracking DFS: at every state the outgoing
transitions are tried in the order the compiler added them, which makes
repetition greedy — "consume another" edges are always tried before
"stop/skip" edges. The first path that exhausts the input on an accepting
state wins; captures are then reconstructed from that path in a single
scan. There is no memoization, so adversarial pattern/input pairs can take
exponential time.
*/

use std::iter;
use std::ops::Range;

use log::trace;

use crate::errors::MatchError;
use crate::nfa::{Regex, StateId};
use crate::pattern::Pattern;

/// The capture table produced by a successful match.
///
/// For every capture group of the pattern it holds the spans of input the
/// group's repetitions consumed, in match order. Group 0 is implicit and
/// spans the whole match. The table borrows the matched input; spans are
/// byte ranges into it.
pub struct Captures<'input> {
    input: &'input str,
    groups: Vec<Vec<Range<usize>>>,
}

impl<'input> Captures<'input> {
    /// The number of capture groups, including the implicit group 0.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// The spans captured by `group`, one per completed repetition.
    pub fn spans(&self, group: usize) -> &[Range<usize>] {
        &self.groups[group]
    }

    /// The captured text of every span of `group`.
    pub fn iter_group(
        &self,
        group: usize,
    ) -> impl Iterator<Item = &'input str> + '_ {
        self.groups[group].iter().map(|span| &self.input[span.clone()])
    }
}

impl Regex {
    /// Returns true if `input` matches this regular expression.
    pub fn is_match(&self, input: &str) -> Result<bool, MatchError> {
        Search::new(self, input).run()
    }

    /// Matches `input`, returning `Ok(None)` when it does not match and
    /// the capture table of the winning path when it does.
    pub fn captures<'input>(
        &self,
        input: &'input str,
    ) -> Result<Option<Captures<'input>>, MatchError> {
        let mut search = Search::new(self, input);
        if !search.run()? {
            return Ok(None);
        }
        Ok(Some(collect_captures(self, input, &search.path)?))
    }
}

/// One traversed transition of the search path: the state it leads to and
/// the number of input bytes it consumed.
struct PathStep {
    target: StateId,
    width: usize,
}

struct Search<'r, 'input> {
    regex: &'r Regex,
    input: &'input str,
    /// The transitions traversed so far, pushed and popped as the search
    /// advances and backtracks. After a successful run this is the winning
    /// path.
    path: Vec<PathStep>,
    /// States already entered at a given input position. Zero-width edges
    /// may lead back to such a state without consuming anything, and
    /// re-entering it can not make progress.
    visited: Vec<(StateId, usize)>,
}

impl<'r, 'input> Search<'r, 'input> {
    fn new(regex: &'r Regex, input: &'input str) -> Self {
        Self { regex, input, path: Vec::new(), visited: Vec::new() }
    }

    fn run(&mut self) -> Result<bool, MatchError> {
        trace!("matching `{}`", self.input);
        self.search(self.regex.start, 0)
    }

    /// Returns true if some path from `state` consumes the rest of the
    /// input and lands on an accepting state. The winning path is left in
    /// `self.path`.
    fn search(
        &mut self,
        state: StateId,
        pos: usize,
    ) -> Result<bool, MatchError> {
        let regex = self.regex;
        let rest = &self.input[pos..];
        if rest.is_empty() && regex.state(state).accepts {
            return Ok(true);
        }
        if self.visited.contains(&(state, pos)) {
            return Ok(false);
        }
        try_push(&mut self.visited, (state, pos))?;
        let next_char = rest.chars().next();
        for index in 0..regex.state(state).edges.len() {
            let edge = &regex.state(state).edges[index];
            let target = edge.target;
            let width = match edge.pattern {
                Pattern::Empty => 0,
                ref pattern => match next_char {
                    Some(ch) if pattern.matches(ch) => pattern.width(ch),
                    _ => continue,
                },
            };
            try_push(&mut self.path, PathStep { target, width })?;
            if self.search(target, pos + width)? {
                return Ok(true);
            }
            self.path.pop();
        }
        self.visited.pop();
        Ok(false)
    }
}

fn collect_captures<'input>(
    regex: &Regex,
    input: &'input str,
    path: &[PathStep],
) -> Result<Captures<'input>, MatchError> {
    let mut groups = Vec::new();
    groups
        .try_reserve(regex.group_count())
        .map_err(|_| MatchError::OutOfMemory)?;
    for group in 0..regex.group_count() {
        groups.push(group_spans(regex, path, group)?);
    }
    Ok(Captures { input, groups })
}

/// Scans the winning path once, reconstructing the spans captured by
/// `group` from the begin/end bits of the states along it.
fn group_spans(
    regex: &Regex,
    path: &[PathStep],
    group: usize,
) -> Result<Vec<Range<usize>>, MatchError> {
    let mut spans: Vec<Range<usize>> = Vec::new();
    let mut cursor = 0;
    let mut start = 0;
    let mut seeking_end = false;

    // The state the search began at is part of the walk even though no
    // transition leads to it.
    let steps = iter::once((regex.start, 0))
        .chain(path.iter().map(|step| (step.target, step.width)));

    for (target, width) in steps {
        cursor += width;
        let state = regex.state(target);
        // The end check runs first: a state that closes one repetition of
        // a group and opens the next must finish the span in progress
        // before starting a new one.
        if seeking_end && state.end_groups.contains(group) {
            try_push(&mut spans, start..cursor)?;
            seeking_end = false;
        }
        if !seeking_end && state.begin_groups.contains(group) {
            start = cursor;
            seeking_end = true;
        }
    }
    // a span still open when the path ends is discarded

    Ok(spans)
}

fn try_push<T>(vec: &mut Vec<T>, value: T) -> Result<(), MatchError> {
    vec.try_reserve(1).map_err(|_| MatchError::OutOfMemory)?;
    vec.push(value);
    Ok(())
}
