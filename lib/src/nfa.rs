/*!
The data model of a compiled regular expression: a graph of states and
pattern-guarded transitions, with capture-group membership bits threaded
through the states.

All states live in a single arena owned by [`Regex`]; transitions refer to
their target by arena index, so the graph needs no reference cycles and is
freed as one unit.
*/

use std::fmt::{self, Display, Formatter};
use std::ops::BitOrAssign;

use itertools::Itertools;

use crate::errors::CompileError;
use crate::pattern::Pattern;

/// Maximum number of capture groups a pattern may declare, including the
/// implicit group 0 that spans the whole match.
///
/// The limit comes from packing group membership into a 64-bit set; a
/// pattern that declares more groups fails to compile.
pub const MAX_GROUPS: usize = 64;

pub(crate) type StateId = usize;

/// A set of capture-group indices, packed into the bits of a `u64`:
/// bit `n` set means group `n` belongs to the set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct GroupSet(u64);

impl GroupSet {
    pub fn single(group: usize) -> GroupSet {
        debug_assert!(group < MAX_GROUPS);
        GroupSet(1 << group)
    }

    pub fn contains(&self, group: usize) -> bool {
        self.0 & (1 << group) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl BitOrAssign for GroupSet {
    fn bitor_assign(&mut self, rhs: GroupSet) {
        self.0 |= rhs.0;
    }
}

impl Display for GroupSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}}}",
            (0..MAX_GROUPS).filter(|group| self.contains(*group)).join(", ")
        )
    }
}

/// A transition between two states, guarded by an atomic pattern.
/// Zero-width if the pattern is [`Pattern::Empty`].
#[derive(Debug, PartialEq)]
pub(crate) struct Edge {
    pub pattern: Pattern,
    pub target: StateId,
}

/// A node in the compiled graph.
#[derive(Debug, PartialEq)]
pub(crate) struct State {
    pub id: StateId,
    /// Outgoing transitions, in the order the compiler added them. The
    /// matcher tries them in exactly this order, which is what makes
    /// repetition greedy: "consume another" edges always precede
    /// "stop/skip" edges.
    pub edges: Vec<Edge>,
    /// Whether the search may stop here once the input is exhausted.
    pub accepts: bool,
    /// The capture groups that begin at this state.
    pub begin_groups: GroupSet,
    /// The capture groups that end at this state.
    pub end_groups: GroupSet,
}

/// A compiled regular expression.
///
/// Produced by [`compile`](crate::compile), immutable afterwards, and
/// reusable for any number of match calls. Matching is done with
/// [`Regex::is_match`] and [`Regex::captures`]; the `Display`
/// implementation renders a human-readable report of the whole graph.
#[derive(Debug, PartialEq)]
pub struct Regex {
    pub(crate) states: Vec<State>,
    /// Where the search starts: `initial` for anchored patterns, or a scan
    /// state that may skip an arbitrary prefix before entering `initial`.
    pub(crate) start: StateId,
    /// The state the pattern body hangs off; begin of capture group 0.
    pub(crate) initial: StateId,
    /// A sink that consumes any character forever and never accepts, used
    /// to reject input following an anchored end.
    pub(crate) trap: StateId,
    pub(crate) group_count: usize,
}

impl Regex {
    pub(crate) fn new() -> Regex {
        Regex {
            states: Vec::new(),
            start: 0,
            initial: 0,
            trap: 0,
            group_count: 0,
        }
    }

    /// Adds a new state with no transitions that is non-accepting and
    /// captures nothing.
    pub(crate) fn add_state(&mut self) -> Result<StateId, CompileError> {
        self.states.try_reserve(1).map_err(|_| CompileError::OutOfMemory)?;
        let id = self.states.len();
        self.states.push(State {
            id,
            edges: Vec::new(),
            accepts: false,
            begin_groups: GroupSet::default(),
            end_groups: GroupSet::default(),
        });
        Ok(id)
    }

    /// Adds a transition from `from` to `to` that consumes `pattern`.
    pub(crate) fn add_edge(
        &mut self,
        from: StateId,
        to: StateId,
        pattern: Pattern,
    ) -> Result<(), CompileError> {
        let edges = &mut self.states[from].edges;
        edges.try_reserve(1).map_err(|_| CompileError::OutOfMemory)?;
        edges.push(Edge { pattern, target: to });
        Ok(())
    }

    pub(crate) fn state(&self, id: StateId) -> &State {
        &self.states[id]
    }

    /// The number of capture groups, including the implicit group 0.
    pub fn group_count(&self) -> usize {
        self.group_count
    }

    /// The number of states in the compiled graph.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }
}

impl Display for Regex {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "start:   state {}", self.start)?;
        writeln!(f, "initial: state {}", self.initial)?;
        writeln!(f, "trap:    state {}", self.trap)?;
        writeln!(f, "groups:  {}", self.group_count)?;
        for state in &self.states {
            writeln!(
                f,
                "state {} ({})",
                state.id,
                if state.accepts { "accepts" } else { "rejects" }
            )?;
            if !state.begin_groups.is_empty() || !state.end_groups.is_empty()
            {
                writeln!(
                    f,
                    "    begin: {}, end: {}",
                    state.begin_groups, state.end_groups
                )?;
            }
            for edge in &state.edges {
                writeln!(f, "    {} -> state {}", edge.pattern, edge.target)?;
            }
        }
        Ok(())
    }
}
