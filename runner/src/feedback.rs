//! Feedback network
//!
//! The new bit is the XNOR of the tapped bits, i.e. their XOR complemented by
//! one. Its linear fixed point is `11..1`: an even number of set taps XORs to
//! 0, complemented to 1, and shifting a 1 into `11..1` reproduces it. With
//! `non_locking` that one state is overridden to feed back a 0 instead.
use bitfield::Bit;

use crate::state::Direction;
use crate::taps::{LfsrError, Taps};

/// All ones in the low `width` bits.
///
/// # Panics
/// Panics if `width` is 0 or larger than 64.
#[must_use]
pub fn mask(width: usize) -> u64 { u64::MAX >> (64 - width) }

fn xnor_feedback(value: u64, width: usize, taps: &[usize], non_locking: bool) -> bool {
    let all_ones = mask(width);
    if non_locking && value & all_ones == all_ones {
        return false;
    }
    taps.iter().fold(true, |acc, &tap| acc ^ value.bit(tap))
}

/// Compute a single feedback bit from forward 0-indexed `taps`.
///
/// In reverse mode, `taps` are [reversed](Taps::reversed) first.
///
/// # Errors
/// Errors with [`LfsrError::UnsupportedWidth`] outside of the tap table's
/// widths, and with [`LfsrError::MalformedTapTable`] if `taps` are not a
/// valid forward tap set for `width`.
pub fn feedback(
    value: u64,
    width: usize,
    taps: &[usize],
    direction: Direction,
    non_locking: bool,
) -> Result<bool, LfsrError> {
    let taps = Taps::from_positions(width, taps)?;
    let taps = match direction {
        Direction::Forward => taps,
        Direction::Reverse => taps.reversed(),
    };
    Ok(xnor_feedback(value, width, &taps, non_locking))
}

/// Precomputed feedback network for one width and direction.
///
/// Nothing is cached across evaluations, [`FeedbackNetwork::feedback`] is
/// recomputed from the value it is given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackNetwork {
    width: usize,
    taps: Taps,
    non_locking: bool,
}

impl FeedbackNetwork {
    /// # Errors
    /// Errors if `width` has no valid entry in the tap table.
    pub fn new(width: usize, direction: Direction, non_locking: bool) -> Result<Self, LfsrError> {
        let taps = Taps::for_width(width)?;
        let taps = match direction {
            Direction::Forward => taps,
            Direction::Reverse => taps.reversed(),
        };
        Ok(FeedbackNetwork {
            width,
            taps,
            non_locking,
        })
    }

    #[must_use]
    pub fn feedback(&self, value: u64) -> bool {
        xnor_feedback(value, self.width, &self.taps, self.non_locking)
    }

    #[must_use]
    pub fn taps(&self) -> &Taps { &self.taps }

    #[must_use]
    pub fn width(&self) -> usize { self.width }

    #[must_use]
    pub fn non_locking(&self) -> bool { self.non_locking }
}
