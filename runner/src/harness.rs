//! Verification harness
//!
//! Sweeps the configuration space and checks each configuration against its
//! property. A failing configuration is recorded in the [`Report`] and the
//! sweep carries on.
use std::collections::HashSet;
use std::fmt;
use std::iter;
use std::ops::RangeInclusive;

use derive_more::Display;
use itertools::{chain, iproduct, Itertools};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::register::{Lfsr, LfsrConfig, ReversibleConfig, ReversibleLfsr, ShiftRegister};
use crate::state::{Controls, Direction};
use crate::taps::{LfsrError, MAX_WIDTH, MIN_WIDTH};
use crate::vm::{step, Clock};

const NON_LOCKING: [bool; 2] = [true, false];

/// Ranges swept by [`run`].
///
/// The period, mirror and reversibility properties cost `2^width` edges per
/// configuration, hence their smaller default range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub period_widths: RangeInclusive<usize>,
    pub lock_widths: RangeInclusive<usize>,
    pub mirror_widths: RangeInclusive<usize>,
    pub reversible_widths: RangeInclusive<usize>,
    pub reversible_lengths: RangeInclusive<usize>,
    pub seed: u64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        HarnessConfig {
            period_widths: MIN_WIDTH..=10,
            lock_widths: MIN_WIDTH..=MAX_WIDTH,
            mirror_widths: MIN_WIDTH..=10,
            reversible_widths: MIN_WIDTH..=10,
            reversible_lengths: 3..=19,
            seed: 1,
        }
    }
}

impl HarnessConfig {
    /// Clamp every exponential range to at most `max_width`.
    #[must_use]
    pub fn with_max_tested_width(self, max_width: usize) -> Self {
        let clamp = |range: RangeInclusive<usize>| *range.start()..=(*range.end()).min(max_width);
        HarnessConfig {
            period_widths: clamp(self.period_widths),
            mirror_widths: clamp(self.mirror_widths),
            reversible_widths: clamp(self.reversible_widths),
            ..self
        }
    }
}

/// Which register a case instantiates
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Display)]
pub enum Variant {
    Fixed,
    Reversible,
}

/// One configuration of the sweep, with the full parameter tuple.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Case {
    Period {
        variant: Variant,
        non_locking: bool,
        direction: Direction,
        width: usize,
    },
    LockAvoidance {
        variant: Variant,
        direction: Direction,
        width: usize,
    },
    Mirror {
        non_locking: bool,
        width: usize,
    },
    Reversibility {
        non_locking: bool,
        direction: Direction,
        width: usize,
        length: usize,
    },
}

impl fmt::Display for Case {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Case::Period {
                variant,
                non_locking,
                direction,
                width,
            } => write!(
                f,
                "period {variant} non_locking={non_locking} direction={direction} width={width}"
            ),
            Case::LockAvoidance {
                variant,
                direction,
                width,
            } => write!(f, "lock avoidance {variant} direction={direction} width={width}"),
            Case::Mirror { non_locking, width } => {
                write!(f, "mirror non_locking={non_locking} width={width}")
            }
            Case::Reversibility {
                non_locking,
                direction,
                width,
                length,
            } => write!(
                f,
                "reversibility non_locking={non_locking} direction={direction} width={width} length={length}"
            ),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error(transparent)]
    Construction(#[from] LfsrError),
    #[error(
        "period from seed {seed:#x}: {distinct} distinct states (expected {expected}), first repeat {repeated:?}"
    )]
    PeriodViolation {
        seed: u64,
        expected: u128,
        distinct: u128,
        repeated: Option<u64>,
    },
    #[error("lock state {state:#x} reproduced itself")]
    LockNotAvoided { state: u64 },
    #[error("sequences diverge at edge {index}: forward {forward:#x}, reversed reverse {reverse:#x}")]
    MirrorMismatch {
        index: usize,
        forward: u64,
        reverse: u64,
    },
    #[error("reversing after {length} edges gave {actual:#x}, expected {expected:#x}")]
    ReversibilitySymmetryViolation {
        length: usize,
        expected: u64,
        actual: u64,
    },
}

/// Number of edges in a full sweep of the state space, `2^width`.
fn state_count(width: usize) -> u128 { 1_u128 << width }

/// The first repeated state must be `seed`, after `2^width - 1` distinct
/// states.
///
/// # Errors
/// Errors with [`Violation::PeriodViolation`] otherwise, including when the
/// seed does not come back within `2^width + 1` edges.
pub fn check_period<R: ShiftRegister + ?Sized>(
    register: &R,
    seed: u64,
    controls: Controls,
) -> Result<(), Violation> {
    let seed = register.seeded(seed).value;
    let expected = state_count(register.width()) - 1;
    let limit = usize::try_from(state_count(register.width()) + 1).unwrap_or(usize::MAX);
    let mut visited = HashSet::new();
    let repeated = Clock::new(register, register.seeded(seed), controls)
        .take(limit)
        .map(|row| row.state.value)
        .find(|&value| !visited.insert(value));
    let distinct = visited.len() as u128;
    if repeated == Some(seed) && distinct == expected {
        Ok(())
    } else {
        Err(Violation::PeriodViolation {
            seed,
            expected,
            distinct,
            repeated,
        })
    }
}

/// Loading all-ones, resp. all-zero, and clocking once must leave that state.
///
/// # Errors
/// Errors with [`Violation::LockNotAvoided`] naming the state that stayed.
pub fn check_lock_avoidance<R: ShiftRegister + ?Sized>(
    register: &R,
    controls: Controls,
) -> Result<(), Violation> {
    for state in [register.mask(), 0] {
        let load = Controls::load(state).with_direction(controls.direction);
        let record = step(register, register.seeded(0), [load, controls]);
        if record.last_state.value == state {
            return Err(Violation::LockNotAvoided { state });
        }
    }
    Ok(())
}

fn record_values<R: ShiftRegister + ?Sized>(
    register: &R,
    seed: u64,
    controls: Controls,
    edges: usize,
) -> Vec<u64> {
    Clock::new(register, register.seeded(seed), controls)
        .take(edges)
        .map(|row| row.state.value)
        .collect_vec()
}

/// Forward and reverse registers, seeded identically and clocked `2^width`
/// times, record sequences that are reverses of each other.
///
/// # Errors
/// Errors with [`Violation::MirrorMismatch`] at the first differing edge.
pub fn check_mirror<F, R>(forward: &F, reverse: &R, seed: u64) -> Result<(), Violation>
where
    F: ShiftRegister + ?Sized,
    R: ShiftRegister + ?Sized, {
    let edges = usize::try_from(state_count(forward.width())).unwrap_or(usize::MAX);
    let forward_values = record_values(forward, seed, Controls::enabled(), edges);
    let mut reverse_values = record_values(
        reverse,
        seed,
        Controls::enabled().with_direction(Direction::Reverse),
        edges,
    );
    reverse_values.reverse();
    match forward_values
        .iter()
        .zip(&reverse_values)
        .position(|(forward, reverse)| forward != reverse)
    {
        None => Ok(()),
        Some(index) => Err(Violation::MirrorMismatch {
            index,
            forward: forward_values[index],
            reverse: reverse_values[index],
        }),
    }
}

/// Clock `length` edges in `direction`, flip the direction and clock once
/// more: the register must hold the value from before the last of the
/// `length` edges.
///
/// Zero edges leave nothing to undo and pass trivially.
///
/// # Errors
/// Errors with [`Violation::ReversibilitySymmetryViolation`].
pub fn check_reversibility(
    register: &ReversibleLfsr,
    seed: u64,
    direction: Direction,
    length: usize,
) -> Result<(), Violation> {
    let controls = Controls::enabled().with_direction(direction);
    let record = step(
        register,
        register.seeded(seed),
        chain!(
            iter::repeat(controls).take(length),
            [controls.with_direction(direction.flip())]
        ),
    );
    let Some(before_last) = length
        .checked_sub(1)
        .and_then(|index| record.executed.get(index))
    else {
        return Ok(());
    };
    let expected = before_last.state.value;
    let actual = record.last_state.value;
    if expected == actual {
        Ok(())
    } else {
        Err(Violation::ReversibilitySymmetryViolation {
            length,
            expected,
            actual,
        })
    }
}

impl Case {
    /// Instantiate the registers of this case and check its property.
    ///
    /// # Errors
    /// Errors with the [`Violation`] found, or with
    /// [`Violation::Construction`] if a register cannot be built.
    pub fn check(&self, seed: u64) -> Result<(), Violation> {
        let controls = |direction| Controls::enabled().with_direction(direction);
        match *self {
            Case::Period {
                variant: Variant::Fixed,
                non_locking,
                direction,
                width,
            } => check_period(
                &Lfsr::new(LfsrConfig {
                    width,
                    direction,
                    non_locking,
                })?,
                seed,
                controls(direction),
            ),
            Case::Period {
                variant: Variant::Reversible,
                non_locking,
                direction,
                width,
            } => check_period(
                &ReversibleLfsr::new(ReversibleConfig { width, non_locking })?,
                seed,
                controls(direction),
            ),
            Case::LockAvoidance {
                variant: Variant::Fixed,
                direction,
                width,
            } => check_lock_avoidance(
                &Lfsr::new(LfsrConfig {
                    width,
                    direction,
                    non_locking: true,
                })?,
                controls(direction),
            ),
            Case::LockAvoidance {
                variant: Variant::Reversible,
                direction,
                width,
            } => check_lock_avoidance(
                &ReversibleLfsr::new(ReversibleConfig {
                    width,
                    non_locking: true,
                })?,
                controls(direction),
            ),
            Case::Mirror { non_locking, width } => {
                let lfsr = |direction| {
                    Lfsr::new(LfsrConfig {
                        width,
                        direction,
                        non_locking,
                    })
                };
                check_mirror(
                    &lfsr(Direction::Forward)?,
                    &lfsr(Direction::Reverse)?,
                    seed,
                )
            }
            Case::Reversibility {
                non_locking,
                direction,
                width,
                length,
            } => check_reversibility(
                &ReversibleLfsr::new(ReversibleConfig { width, non_locking })?,
                seed,
                direction,
                length,
            ),
        }
    }
}

/// All cases of the sweep, in order: period, lock avoidance, mirror,
/// reversibility.
pub fn cases(config: &HarnessConfig) -> impl Iterator<Item = Case> + '_ {
    let variants = |variant| {
        iproduct!(NON_LOCKING, Direction::ALL, config.period_widths.clone()).map(
            move |(non_locking, direction, width)| Case::Period {
                variant,
                non_locking,
                direction,
                width,
            },
        )
    };
    let period = chain!(variants(Variant::Fixed), variants(Variant::Reversible));
    let lock = iproduct!(
        [Variant::Fixed, Variant::Reversible],
        Direction::ALL,
        config.lock_widths.clone()
    )
    .map(|(variant, direction, width)| Case::LockAvoidance {
        variant,
        direction,
        width,
    });
    let mirror = iproduct!(NON_LOCKING, config.mirror_widths.clone())
        .map(|(non_locking, width)| Case::Mirror { non_locking, width });
    let reversibility = iproduct!(
        NON_LOCKING,
        Direction::ALL,
        config.reversible_widths.clone(),
        config.reversible_lengths.clone()
    )
    .map(|(non_locking, direction, width, length)| Case::Reversibility {
        non_locking,
        direction,
        width,
        length,
    });
    chain!(period, lock, mirror, reversibility)
}

/// A case that did not hold, with the reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub case: Case,
    pub violation: Violation,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.case, self.violation)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub checked: usize,
    pub failures: Vec<Failure>,
}

impl Report {
    pub fn record(&mut self, case: Case, result: Result<(), Violation>) {
        self.checked += 1;
        match result {
            Ok(()) => debug!("{case}: ok"),
            Err(violation) => {
                warn!("{case}: {violation}");
                self.failures.push(Failure { case, violation });
            }
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool { self.failures.is_empty() }

    /// # Errors
    /// Errors if any case failed.
    pub fn ensure_success(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.is_success(),
            "{} of {} cases failed",
            self.failures.len(),
            self.checked
        );
        Ok(())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for failure in &self.failures {
            writeln!(f, "FAILED {failure}")?;
        }
        write!(
            f,
            "{} cases checked, {} failed",
            self.checked,
            self.failures.len()
        )
    }
}

/// Run every case of `config`, collecting all failures.
#[must_use]
pub fn run(config: &HarnessConfig) -> Report {
    let report = cases(config).fold(Report::default(), |mut report, case| {
        report.record(case, case.check(config.seed));
        report
    });
    info!(
        "{} cases checked, {} failed",
        report.checked,
        report.failures.len()
    );
    report
}
