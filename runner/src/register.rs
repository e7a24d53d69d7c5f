use log::trace;
use serde::{Deserialize, Serialize};

use crate::feedback::{mask, FeedbackNetwork};
use crate::state::{Action, Aux, Controls, Direction, State};
use crate::taps::LfsrError;

/// Shift `value` by one position in `direction`, feeding `bit` into the
/// vacated end.
///
/// # Panics
/// Panics if `width` is 0 or larger than 64.
#[must_use]
pub fn shift(value: u64, width: usize, direction: Direction, bit: bool) -> u64 {
    let value = value & mask(width);
    match direction {
        Direction::Forward => ((value << 1) | u64::from(bit)) & mask(width),
        Direction::Reverse => (value >> 1) | (u64::from(bit) << (width - 1)),
    }
}

/// Synchronous update rule for one rising edge.
///
/// Loading ignores `feedback`. Loaded values are truncated to `width` bits.
///
/// # Panics
/// Panics if `width` is 0 or larger than 64.
#[must_use]
pub fn transition(
    value: u64,
    width: usize,
    direction: Direction,
    feedback: bool,
    action: Action,
) -> u64 {
    match action {
        Action::Load(load_value) => load_value & mask(width),
        Action::Shift => shift(value, width, direction, feedback),
        Action::Hold => value,
    }
}

/// A clocked register driven by [`Controls`].
///
/// Implementations are pure: the next state only depends on the current state
/// and the controls sampled at the edge.
pub trait ShiftRegister {
    fn width(&self) -> usize;

    fn non_locking(&self) -> bool;

    /// Evaluate one rising clock edge.
    fn execute_edge(&self, state: State, controls: &Controls) -> (Aux, State);

    #[must_use]
    fn mask(&self) -> u64 { mask(self.width()) }

    /// Initial state holding `seed`, truncated to the register width.
    #[must_use]
    fn seeded(&self, seed: u64) -> State { State::new(seed & self.mask()) }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct LfsrConfig {
    pub width: usize,
    pub direction: Direction,
    pub non_locking: bool,
}

/// Shift register with a fixed direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lfsr {
    direction: Direction,
    network: FeedbackNetwork,
}

impl Lfsr {
    /// # Errors
    /// Errors if `config.width` has no valid entry in the tap table.
    pub fn new(config: LfsrConfig) -> Result<Self, LfsrError> {
        let LfsrConfig {
            width,
            direction,
            non_locking,
        } = config;
        Ok(Lfsr {
            direction,
            network: FeedbackNetwork::new(width, direction, non_locking)?,
        })
    }

    #[must_use]
    pub fn direction(&self) -> Direction { self.direction }

    #[must_use]
    pub fn network(&self) -> &FeedbackNetwork { &self.network }

    /// The feedback bit for the current `value`.
    #[must_use]
    pub fn feedback(&self, value: u64) -> bool { self.network.feedback(value) }

    /// Pure form of [`ShiftRegister::execute_edge`]: next value and the
    /// feedback bit.
    #[must_use]
    pub fn next(&self, value: u64, controls: &Controls) -> (u64, bool) {
        let feedback = self.feedback(value);
        let next = transition(
            value,
            self.width(),
            self.direction,
            feedback,
            controls.action(),
        );
        (next, feedback)
    }
}

impl ShiftRegister for Lfsr {
    fn width(&self) -> usize { self.network.width() }

    fn non_locking(&self) -> bool { self.network.non_locking() }

    fn execute_edge(&self, state: State, controls: &Controls) -> (Aux, State) {
        let (value, feedback) = self.next(state.value, controls);
        trace!(
            "clk: {}, {:#x} -> {value:#x} ({:?}, feedback {feedback})",
            state.clk,
            state.value,
            controls.action()
        );
        let aux = Aux {
            action: controls.action(),
            forward_feedback: (!self.direction.is_reverse()).then_some(feedback),
            reverse_feedback: self.direction.is_reverse().then_some(feedback),
        };
        (aux, state.set_value(value).bump_clock())
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct ReversibleConfig {
    pub width: usize,
    pub non_locking: bool,
}

/// Shift register whose direction is a control input.
///
/// Both feedback networks are evaluated on every edge, so the direction may
/// change between any two edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReversibleLfsr {
    forward: FeedbackNetwork,
    reverse: FeedbackNetwork,
}

impl ReversibleLfsr {
    /// # Errors
    /// Errors if `config.width` has no valid entry in the tap table.
    pub fn new(ReversibleConfig { width, non_locking }: ReversibleConfig) -> Result<Self, LfsrError> {
        Ok(ReversibleLfsr {
            forward: FeedbackNetwork::new(width, Direction::Forward, non_locking)?,
            reverse: FeedbackNetwork::new(width, Direction::Reverse, non_locking)?,
        })
    }

    /// Forward and reverse feedback bits for `value`.
    #[must_use]
    pub fn feedback(&self, value: u64) -> (bool, bool) {
        (self.forward.feedback(value), self.reverse.feedback(value))
    }

    /// Pure form of [`ShiftRegister::execute_edge`]: next value and the
    /// feedback bit selected by `controls.direction`.
    #[must_use]
    pub fn next(&self, value: u64, controls: &Controls) -> (u64, bool) {
        let (next, feedback) = self.edge(value, controls);
        (next, feedback.select(controls.direction))
    }

    fn edge(&self, value: u64, controls: &Controls) -> (u64, Feedback) {
        let (forward, reverse) = self.feedback(value);
        let feedback = Feedback { forward, reverse };
        let next = transition(
            value,
            self.width(),
            controls.direction,
            feedback.select(controls.direction),
            controls.action(),
        );
        (next, feedback)
    }
}

#[derive(Debug, Clone, Copy)]
struct Feedback {
    forward: bool,
    reverse: bool,
}

impl Feedback {
    fn select(self, direction: Direction) -> bool {
        match direction {
            Direction::Forward => self.forward,
            Direction::Reverse => self.reverse,
        }
    }
}

impl ShiftRegister for ReversibleLfsr {
    fn width(&self) -> usize { self.forward.width() }

    fn non_locking(&self) -> bool { self.forward.non_locking() }

    fn execute_edge(&self, state: State, controls: &Controls) -> (Aux, State) {
        let (value, Feedback { forward, reverse }) = self.edge(state.value, controls);
        trace!(
            "clk: {}, {:#x} -> {value:#x} ({:?} {}, feedback {forward}/{reverse})",
            state.clk,
            state.value,
            controls.action(),
            controls.direction,
        );
        let aux = Aux {
            action: controls.action(),
            forward_feedback: Some(forward),
            reverse_feedback: Some(reverse),
        };
        (aux, state.set_value(value).bump_clock())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use test_case::test_case;

    use super::*;
    use crate::test_utils::{direction, small_width, width};

    fn lfsr(width: usize, direction: Direction, non_locking: bool) -> Lfsr {
        Lfsr::new(LfsrConfig {
            width,
            direction,
            non_locking,
        })
        .unwrap()
    }

    fn reversible(width: usize, non_locking: bool) -> ReversibleLfsr {
        ReversibleLfsr::new(ReversibleConfig { width, non_locking }).unwrap()
    }

    #[test_case(0b0101, Direction::Forward, true, 0b1011; "forward feeds bit 0")]
    #[test_case(0b1101, Direction::Forward, false, 0b1010; "forward drops msb")]
    #[test_case(0b0101, Direction::Reverse, true, 0b1010; "reverse feeds msb")]
    #[test_case(0b1101, Direction::Reverse, false, 0b0110; "reverse drops bit 0")]
    fn shift_width_4(value: u64, direction: Direction, bit: bool, expected: u64) {
        assert_eq!(shift(value, 4, direction, bit), expected);
    }

    #[test]
    fn width_3_forward_sequence() {
        let lfsr = lfsr(3, Direction::Forward, false);
        let sequence: Vec<u64> = std::iter::successors(Some(1), |&value| {
            Some(lfsr.next(value, &Controls::enabled()).0)
        })
        .take(8)
        .collect();
        assert_eq!(sequence, [1, 3, 6, 5, 2, 4, 0, 1]);
    }

    #[test]
    fn width_4_non_locking_escapes_all_ones() {
        let lfsr = lfsr(4, Direction::Forward, true);
        assert!(lfsr.non_locking());
        assert_eq!(lfsr.network().taps().as_slice(), [3, 2]);
        assert_eq!(lfsr.next(0b1111, &Controls::enabled()), (0b1110, false));
    }

    #[test]
    fn reversible_keeps_configuration() {
        let register = reversible(4, true);
        assert_eq!(register.width(), 4);
        assert!(register.non_locking());
        assert!(!reversible(4, false).non_locking());
    }

    #[test]
    fn all_ones_locks_without_guard() {
        for width in [3, 8, 37, 64] {
            for direction in Direction::ALL {
                let lfsr = lfsr(width, direction, false);
                let all_ones = lfsr.mask();
                assert_eq!(lfsr.next(all_ones, &Controls::enabled()).0, all_ones);
            }
        }
    }

    #[test]
    fn load_wins_over_feedback() {
        let lfsr = lfsr(5, Direction::Reverse, true);
        let controls = Controls::load(0xFFFF_FFFF);
        let (aux, state) = lfsr.execute_edge(State::new(3), &controls);
        assert_eq!(state, State { clk: 1, value: 0b1_1111 });
        assert_eq!(aux.action, Action::Load(0xFFFF_FFFF));
        assert_eq!(aux.forward_feedback, None);
        assert_eq!(aux.reverse_feedback, Some(lfsr.feedback(3)));
    }

    #[test]
    fn hold_keeps_value_and_counts_edge() {
        let register = reversible(7, false);
        let (aux, state) = register.execute_edge(State::new(42), &Controls::hold());
        assert_eq!(state, State { clk: 1, value: 42 });
        assert_eq!(aux.action, Action::Hold);
        assert!(aux.forward_feedback.is_some() && aux.reverse_feedback.is_some());
    }

    #[test]
    fn seeded_truncates_to_width() {
        assert_eq!(lfsr(3, Direction::Forward, false).seeded(0b1010).value, 0b010);
    }

    proptest! {
        #[test]
        fn reverse_undoes_forward(width in width(), value in any::<u64>(), non_locking in any::<bool>()) {
            let forward = lfsr(width, Direction::Forward, non_locking);
            let reverse = lfsr(width, Direction::Reverse, non_locking);
            let value = value & forward.mask();
            prop_assume!(value != forward.mask());
            let (next, _) = forward.next(value, &Controls::enabled());
            prop_assert_eq!(reverse.next(next, &Controls::enabled()).0, value);
        }

        #[test]
        fn reversible_matches_fixed(width in small_width(), value in any::<u64>(), direction in direction(), non_locking in any::<bool>()) {
            let fixed = lfsr(width, direction, non_locking);
            let register = reversible(width, non_locking);
            let value = value & fixed.mask();
            let controls = Controls::enabled().with_direction(direction);
            prop_assert_eq!(register.next(value, &controls), fixed.next(value, &controls));
        }

        #[test]
        fn disabled_register_holds(width in width(), value in any::<u64>(), direction in direction()) {
            let lfsr = lfsr(width, direction, true);
            let value = value & lfsr.mask();
            prop_assert_eq!(lfsr.next(value, &Controls::hold()).0, value);
        }
    }
}
