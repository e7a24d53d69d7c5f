use proptest::prelude::any;
use proptest::prop_oneof;
use proptest::strategy::{Just, Strategy};

use crate::feedback::mask;
use crate::state::Direction;
use crate::taps::{MAX_WIDTH, MIN_WIDTH};

/// Largest width for which a test may walk the whole state space.
pub const MAX_TESTED_WIDTH: usize = 10;

pub fn init_logger() { let _ = env_logger::try_init(); }

pub fn width() -> impl Strategy<Value = usize> { MIN_WIDTH..=MAX_WIDTH }

pub fn small_width() -> impl Strategy<Value = usize> { MIN_WIDTH..=MAX_TESTED_WIDTH }

/// Number of edges clocked before reversing a reversible register.
pub fn reversible_length() -> impl Strategy<Value = usize> { 1_usize..40 }

pub fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Forward), Just(Direction::Reverse)]
}

#[allow(clippy::cast_sign_loss)]
pub fn u64_extra() -> impl Strategy<Value = u64> {
    prop_oneof![
        Just(0_u64),
        Just(1_u64),
        Just(u64::MAX),
        any::<u64>(),
        Just(i64::MIN as u64),
        Just(i64::MAX as u64),
    ]
}

/// A width together with a seed that fits in it.
pub fn width_and_seed() -> impl Strategy<Value = (usize, u64)> {
    (width(), u64_extra()).prop_map(|(width, seed)| (width, seed & mask(width)))
}
