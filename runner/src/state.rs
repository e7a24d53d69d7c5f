use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Shift direction.
///
/// Forward shifts bits up and feeds back into bit 0. Reverse shifts bits down
/// and feeds back into the MSB.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default, Display, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Forward, Direction::Reverse];

    #[must_use]
    pub fn flip(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }

    #[must_use]
    pub fn is_reverse(self) -> bool { self == Direction::Reverse }
}

impl From<bool> for Direction {
    /// `true` selects [`Direction::Reverse`], like the `dir` input of the
    /// reversible register.
    fn from(reverse: bool) -> Self {
        if reverse {
            Direction::Reverse
        } else {
            Direction::Forward
        }
    }
}

/// Inputs sampled at a rising clock edge.
///
/// `direction` is only read by the reversible register.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub struct Controls {
    pub enable: bool,
    pub load: bool,
    pub load_value: u64,
    pub direction: Direction,
}

/// What a clock edge does to the register.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Action {
    Load(u64),
    Shift,
    Hold,
}

impl Controls {
    /// Shift on every edge.
    #[must_use]
    pub fn enabled() -> Self {
        Controls {
            enable: true,
            ..Controls::default()
        }
    }

    /// Neither shift nor load.
    #[must_use]
    pub fn hold() -> Self { Controls::default() }

    /// Force the register to `value`. Enable is left asserted, load wins
    /// anyway.
    #[must_use]
    pub fn load(value: u64) -> Self {
        Controls {
            load: true,
            load_value: value,
            ..Controls::enabled()
        }
    }

    #[must_use]
    pub fn with_direction(self, direction: Direction) -> Self { Controls { direction, ..self } }

    /// `load` takes precedence over `enable`, which takes precedence over
    /// holding.
    #[must_use]
    pub fn action(&self) -> Action {
        match (self.load, self.enable) {
            (true, _) => Action::Load(self.load_value),
            (false, true) => Action::Shift,
            (false, false) => Action::Hold,
        }
    }
}

/// State of a shift register
///
/// `clk` counts accepted clock edges, `value` is the register contents.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub struct State {
    pub clk: u64,
    pub value: u64,
}

impl State {
    #[must_use]
    pub fn new(value: u64) -> Self { State { clk: 0, value } }

    #[must_use]
    pub fn set_value(mut self, value: u64) -> Self {
        self.value = value;
        self
    }

    #[must_use]
    pub fn bump_clock(mut self) -> Self {
        self.clk += 1;
        self
    }
}

/// Auxiliary information about a clock edge
///
/// Feedback bits are the combinational outputs evaluated from the state
/// before the edge. A fixed direction register only has the one matching its
/// direction, a reversible one always has both.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Aux {
    pub action: Action,
    pub forward_feedback: Option<bool>,
    pub reverse_feedback: Option<bool>,
}

impl Aux {
    /// The feedback bit that drives a shift in `direction`.
    #[must_use]
    pub fn feedback(&self, direction: Direction) -> Option<bool> {
        match direction {
            Direction::Forward => self.forward_feedback,
            Direction::Reverse => self.reverse_feedback,
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(Controls { enable: true, load: true, load_value: 5, direction: Direction::Forward }, Action::Load(5); "load beats enable")]
    #[test_case(Controls { enable: false, load: true, load_value: 7, direction: Direction::Reverse }, Action::Load(7); "load without enable")]
    #[test_case(Controls::enabled(), Action::Shift; "enable shifts")]
    #[test_case(Controls::hold(), Action::Hold; "neither holds")]
    fn control_precedence(controls: Controls, expected: Action) {
        assert_eq!(controls.action(), expected);
    }

    #[test]
    fn direction_flips_back() {
        for direction in Direction::ALL {
            assert_ne!(direction.flip(), direction);
            assert_eq!(direction.flip().flip(), direction);
        }
        assert_eq!(Direction::from(true), Direction::Reverse);
        assert!(!Direction::from(false).is_reverse());
    }

    #[test]
    fn clock_counts_edges() {
        let state = State::new(3).bump_clock().bump_clock().set_value(9);
        assert_eq!(state, State { clk: 2, value: 9 });
    }
}
