//! Maximal length tap table
//!
//! The new bit of a register of width `n` is a combination of taps from the
//! existing bits. The table is stored with bits numbered `1..=n`, so `4: [4,
//! 3]` means tap `x[4]` and `x[3]` to get the new `x[1]`.
//!
//! Values from: Peter Alfke, "Efficient Shift Registers, LFSR Counters, and
//! Long Pseudo-Random Sequence Generators", Xilinx Application Note 052, July
//! 7, 1996. The application note uses XNOR feedback, see
//! [`crate::feedback`].
use arrayvec::ArrayVec;
use derive_more::Deref;
use itertools::Itertools;
use thiserror::Error;

pub const MIN_WIDTH: usize = 3;
pub const MAX_WIDTH: usize = 64;
/// Largest number of taps in [`TAP_TABLE`]
pub const MAX_TAPS: usize = 6;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LfsrError {
    #[error("unsupported register width {0} (expected {}..={})", MIN_WIDTH, MAX_WIDTH)]
    UnsupportedWidth(usize),
    #[error("malformed tap table entry for width {width}: {taps:?}")]
    MalformedTapTable { width: usize, taps: Vec<usize> },
}

/// Indexed by `width - MIN_WIDTH`.
#[rustfmt::skip]
const TAP_TABLE: [&[usize]; MAX_WIDTH - MIN_WIDTH + 1] = [
    &[3, 2],
    &[4, 3],
    &[5, 3],
    &[6, 5],
    &[7, 6],
    &[8, 6, 5, 4],
    &[9, 5],
    &[10, 7],
    &[11, 9],
    &[12, 6, 4, 1],
    &[13, 4, 3, 1],
    &[14, 5, 3, 1],
    &[15, 14],
    &[16, 15, 13, 4],
    &[17, 14],
    &[18, 11],
    &[19, 6, 2, 1],
    &[20, 17],
    &[21, 19],
    &[22, 21],
    &[23, 18],
    &[24, 23, 22, 17],
    &[25, 22],
    &[26, 6, 2, 1],
    &[27, 5, 2, 1],
    &[28, 25],
    &[29, 27],
    &[30, 6, 4, 1],
    &[31, 28],
    &[32, 22, 2, 1],
    &[33, 20],
    &[34, 27, 2, 1],
    &[35, 33],
    &[36, 25],
    // Anomalous case, 6 taps required.
    &[37, 5, 4, 3, 2, 1],
    &[38, 6, 5, 1],
    &[39, 35],
    &[40, 38, 21, 19],
    &[41, 38],
    &[42, 41, 20, 19],
    &[43, 42, 38, 37],
    &[44, 43, 18, 17],
    &[45, 44, 42, 41],
    &[46, 45, 26, 25],
    &[47, 42],
    &[48, 47, 21, 20],
    &[49, 40],
    &[50, 49, 24, 23],
    &[51, 50, 36, 35],
    &[52, 49],
    &[53, 52, 38, 37],
    &[54, 53, 18, 17],
    &[55, 31],
    &[56, 55, 35, 34],
    &[57, 50],
    &[58, 39],
    &[59, 58, 38, 37],
    &[60, 59],
    &[61, 60, 46, 45],
    &[62, 61, 6, 5],
    &[63, 62],
    &[64, 63, 61, 60],
];

/// Get the 1-indexed table entry for `width`.
///
/// # Errors
/// Errors with [`LfsrError::UnsupportedWidth`] outside of
/// `MIN_WIDTH..=MAX_WIDTH`.
pub fn table_entry(width: usize) -> Result<&'static [usize], LfsrError> {
    width
        .checked_sub(MIN_WIDTH)
        .and_then(|index| TAP_TABLE.get(index))
        .copied()
        .ok_or(LfsrError::UnsupportedWidth(width))
}

/// 0-indexed tap positions of a register.
///
/// The first tap anchors the recurrence: it is the MSB for forward taps and
/// bit 0 for [reversed](Taps::reversed) taps.
#[derive(Debug, Clone, PartialEq, Eq, Deref)]
pub struct Taps(ArrayVec<usize, MAX_TAPS>);

impl Taps {
    /// Forward taps of the table entry for `width`.
    ///
    /// # Errors
    /// Errors if the width is not in the table, or its entry is malformed.
    pub fn for_width(width: usize) -> Result<Self, LfsrError> {
        Self::from_table_entry(width, table_entry(width)?)
    }

    /// Normalize a 1-indexed table entry.
    ///
    /// # Errors
    /// Errors with [`LfsrError::MalformedTapTable`] if the entry has a zero
    /// position, or if the normalized positions are rejected by
    /// [`Taps::from_positions`].
    pub fn from_table_entry(width: usize, entry: &[usize]) -> Result<Self, LfsrError> {
        let positions: Option<Vec<usize>> = entry.iter().map(|tap| tap.checked_sub(1)).collect();
        let positions = positions.ok_or_else(|| LfsrError::MalformedTapTable {
            width,
            taps: entry.to_vec(),
        })?;
        Self::from_positions(width, &positions)
    }

    /// Validate 0-indexed forward tap positions.
    ///
    /// A valid tap set has 2, 4 or 6 strictly descending positions, and the
    /// first one is the MSB `width - 1`.
    ///
    /// # Errors
    /// Errors with [`LfsrError::UnsupportedWidth`] outside of
    /// `MIN_WIDTH..=MAX_WIDTH`, and with [`LfsrError::MalformedTapTable`] on
    /// any other violation.
    pub fn from_positions(width: usize, positions: &[usize]) -> Result<Self, LfsrError> {
        if !(MIN_WIDTH..=MAX_WIDTH).contains(&width) {
            return Err(LfsrError::UnsupportedWidth(width));
        }
        let well_formed = matches!(positions.len(), 2 | 4 | 6)
            && width.checked_sub(1).as_ref() == positions.first()
            && positions.iter().tuple_windows().all(|(hi, lo)| hi > lo);
        if !well_formed {
            return Err(LfsrError::MalformedTapTable {
                width,
                taps: positions.to_vec(),
            });
        }
        Ok(Taps(positions.iter().copied().collect()))
    }

    /// Taps of the inverse recurrence.
    ///
    /// Forward step: `y_0 = x_(n-1) ^ x_t1 ^ .. ^ 1` and `y_(i+1) = x_i`.
    /// Solved for the bit that was shifted out:
    /// `x_(n-1) = y_0 ^ y_(t1+1) ^ .. ^ 1`.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let Taps(taps) = self;
        Taps(
            std::iter::once(0)
                .chain(taps.iter().skip(1).map(|tap| tap + 1))
                .collect(),
        )
    }

    /// Back to the 1-indexed form of the table.
    #[must_use]
    pub fn to_table_entry(&self) -> Vec<usize> { self.iter().map(|tap| tap + 1).collect() }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test]
    fn table_covers_every_supported_width() {
        for width in MIN_WIDTH..=MAX_WIDTH {
            let entry = table_entry(width).unwrap();
            assert_eq!(entry[0], width);
            assert!(Taps::for_width(width).is_ok(), "width {width}");
        }
    }

    #[test_case(0; "zero")]
    #[test_case(2; "below minimum")]
    #[test_case(65; "above maximum")]
    fn rejects_unsupported_width(width: usize) {
        assert_eq!(Taps::for_width(width), Err(LfsrError::UnsupportedWidth(width)));
    }

    #[test_case(3, &[2, 1]; "width 3")]
    #[test_case(4, &[3, 2]; "width 4")]
    #[test_case(8, &[7, 5, 4, 3]; "width 8")]
    #[test_case(37, &[36, 4, 3, 2, 1, 0]; "width 37 needs six taps")]
    fn normalizes_to_zero_indexed(width: usize, expected: &[usize]) {
        assert_eq!(Taps::for_width(width).unwrap().as_slice(), expected);
    }

    #[test_case(3, &[0, 2]; "width 3")]
    #[test_case(8, &[0, 6, 5, 4]; "width 8")]
    #[test_case(37, &[0, 5, 4, 3, 2, 1]; "width 37")]
    fn reversed_replaces_anchor_and_shifts_the_rest(width: usize, expected: &[usize]) {
        assert_eq!(Taps::for_width(width).unwrap().reversed().as_slice(), expected);
    }

    #[test_case(&[3, 2, 1]; "odd tap count")]
    #[test_case(&[4, 3, 2, 1, 0, 0, 0]; "too many taps")]
    #[test_case(&[2, 1]; "first tap is not the msb")]
    #[test_case(&[3, 3]; "not strictly descending")]
    fn rejects_malformed_positions(positions: &[usize]) {
        assert!(matches!(
            Taps::from_positions(4, positions),
            Err(LfsrError::MalformedTapTable { width: 4, .. })
        ));
    }

    #[test_case(2, &[1, 0]; "below minimum")]
    #[test_case(65, &[64, 63]; "above maximum")]
    fn positions_need_a_supported_width(width: usize, positions: &[usize]) {
        assert_eq!(
            Taps::from_positions(width, positions),
            Err(LfsrError::UnsupportedWidth(width))
        );
    }

    #[test]
    fn rejects_zero_in_table_entry() {
        assert_eq!(
            Taps::from_table_entry(4, &[4, 0]),
            Err(LfsrError::MalformedTapTable {
                width: 4,
                taps: vec![4, 0]
            })
        );
    }

    #[test]
    fn table_entry_round_trips() {
        for width in MIN_WIDTH..=MAX_WIDTH {
            let taps = Taps::for_width(width).unwrap();
            assert_eq!(taps.to_table_entry(), table_entry(width).unwrap());
        }
    }
}
