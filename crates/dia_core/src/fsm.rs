//! State Machine Runtime
//!
//! Flat, typed state machines used for the activation lifecycle and the
//! tracker's motion state. Transitions are looked up by `(state, event)`;
//! an event with no matching transition leaves the machine where it is.

use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use std::fmt::Debug;
use std::hash::Hash;

/// Maximum number of transitions kept in the debug history
const HISTORY_LIMIT: usize = 64;

/// A transition in the state machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition<S, E> {
    pub from: S,
    pub event: E,
    pub to: S,
}

impl<S, E> Transition<S, E> {
    pub const fn new(from: S, event: E, to: S) -> Self {
        Self { from, event, to }
    }
}

/// Builder for creating state machines
pub struct StateMachineBuilder<S, E> {
    initial_state: S,
    transitions: Vec<Transition<S, E>>,
}

impl<S, E> StateMachineBuilder<S, E>
where
    S: Copy + Eq + Hash + Debug,
    E: Copy + Eq + Hash + Debug,
{
    pub fn new(initial_state: S) -> Self {
        Self {
            initial_state,
            transitions: Vec::new(),
        }
    }

    /// Add a transition
    pub fn transition(mut self, transition: Transition<S, E>) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add a simple transition (from, event, to)
    pub fn on(mut self, from: S, event: E, to: S) -> Self {
        self.transitions.push(Transition::new(from, event, to));
        self
    }

    pub fn build(self) -> StateMachine<S, E> {
        StateMachine::new(self.initial_state, self.transitions)
    }
}

/// A state machine instance
#[derive(Clone, Debug)]
pub struct StateMachine<S, E> {
    current_state: S,
    transitions: FxHashMap<(S, E), S>,
    /// Recent transitions, oldest first
    history: VecDeque<(S, E, S)>,
}

impl<S, E> StateMachine<S, E>
where
    S: Copy + Eq + Hash + Debug,
    E: Copy + Eq + Hash + Debug,
{
    /// Create a state machine; later transitions for the same
    /// `(from, event)` pair replace earlier ones
    pub fn new(initial_state: S, transitions: impl IntoIterator<Item = Transition<S, E>>) -> Self {
        let transitions = transitions
            .into_iter()
            .map(|t| ((t.from, t.event), t.to))
            .collect();

        Self {
            current_state: initial_state,
            transitions,
            history: VecDeque::new(),
        }
    }

    pub fn builder(initial_state: S) -> StateMachineBuilder<S, E> {
        StateMachineBuilder::new(initial_state)
    }

    pub fn current_state(&self) -> S {
        self.current_state
    }

    pub fn is_in(&self, state: S) -> bool {
        self.current_state == state
    }

    /// Check if an event can trigger a transition from the current state
    pub fn can_send(&self, event: E) -> bool {
        self.transitions.contains_key(&(self.current_state, event))
    }

    /// Send an event, returning the new state if a transition fired
    pub fn send(&mut self, event: E) -> Option<S> {
        let from = self.current_state;
        let to = *self.transitions.get(&(from, event))?;

        self.current_state = to;
        if self.history.len() == HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back((from, event, to));

        if from != to {
            tracing::trace!("fsm: {:?} --{:?}--> {:?}", from, event, to);
        }
        Some(to)
    }

    /// Transition history (bounded, oldest first)
    pub fn history(&self) -> impl Iterator<Item = &(S, E, S)> {
        self.history.iter()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}
