use std::iter;

use crate::register::ShiftRegister;
use crate::state::{Aux, Controls, State};

/// Each row corresponds to the state of the register _just before_ the clock
/// edge, the controls sampled at that edge, and the feedback evaluated from
/// that state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub state: State,
    pub controls: Controls,
    pub aux: Aux,
}

/// Trace produced by clocking a register
#[derive(Debug, Clone, Default)]
pub struct ExecutionRecord {
    /// One row per clock edge
    pub executed: Vec<Row>,
    /// The state after the final edge
    pub last_state: State,
}

impl ExecutionRecord {
    /// Register values before each edge, in order.
    pub fn values(&self) -> impl Iterator<Item = u64> + '_ {
        self.executed.iter().map(|row| row.state.value)
    }

    /// Returns the state just before the final edge
    #[must_use]
    pub fn state_before_final(&self) -> Option<&State> { self.executed.last().map(|row| &row.state) }
}

/// Apply one clock edge per element of `controls`.
pub fn step<R: ShiftRegister + ?Sized>(
    register: &R,
    mut last_state: State,
    controls: impl IntoIterator<Item = Controls>,
) -> ExecutionRecord {
    let mut executed = vec![];
    for controls in controls {
        let (aux, new_state) = register.execute_edge(last_state, &controls);
        executed.push(Row {
            state: last_state,
            controls,
            aux,
        });
        last_state = new_state;
    }
    ExecutionRecord {
        executed,
        last_state,
    }
}

/// Apply `edges` clock edges with constant `controls`.
pub fn run<R: ShiftRegister + ?Sized>(
    register: &R,
    state: State,
    controls: Controls,
    edges: usize,
) -> ExecutionRecord {
    step(register, state, iter::repeat(controls).take(edges))
}

/// Unbounded stream of rows with constant controls.
///
/// Callers bound it, e.g. with [`Iterator::take`].
#[derive(Debug, Clone)]
pub struct Clock<'a, R: ?Sized> {
    register: &'a R,
    state: State,
    controls: Controls,
}

impl<'a, R: ShiftRegister + ?Sized> Clock<'a, R> {
    #[must_use]
    pub fn new(register: &'a R, state: State, controls: Controls) -> Self {
        Clock {
            register,
            state,
            controls,
        }
    }

    /// The state the next edge starts from.
    #[must_use]
    pub fn state(&self) -> State { self.state }
}

impl<R: ShiftRegister + ?Sized> Iterator for Clock<'_, R> {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        let (aux, new_state) = self.register.execute_edge(self.state, &self.controls);
        let row = Row {
            state: self.state,
            controls: self.controls,
            aux,
        };
        self.state = new_state;
        Some(row)
    }
}
