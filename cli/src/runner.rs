//! Utility functions that helps the CLI to interact with the
//! [LFSR runner crate](lfsr_runner).
use std::io::Read;

use anyhow::Result;
use itertools::Itertools;
use lfsr_runner::harness::HarnessConfig;
use lfsr_runner::register::{Lfsr, LfsrConfig, ShiftRegister};
use lfsr_runner::state::Controls;
use lfsr_runner::taps::{table_entry, Taps};
use lfsr_runner::vm::Clock;
use log::debug;

/// Deserializes a JSON harness configuration. Missing fields keep their
/// defaults.
///
/// # Errors
///
/// Errors if reading fails or the input is not a valid configuration.
pub fn read_config(mut input: impl Read) -> Result<HarnessConfig> {
    let mut bytes = Vec::new();
    let bytes_read = input.read_to_end(&mut bytes)?;
    debug!("Read {bytes_read} bytes of harness config.");
    let config: HarnessConfig = serde_json::from_slice(&bytes)?;
    Ok(config)
}

/// Table entry of `width` with its forward and reverse 0-indexed taps.
///
/// # Errors
///
/// Errors if `width` is not in the tap table.
pub fn describe_taps(width: usize) -> Result<String> {
    let taps = Taps::for_width(width)?;
    Ok(format!(
        "width {width}: table [{}], forward taps [{}], reverse taps [{}]",
        table_entry(width)?.iter().join(", "),
        taps.iter().join(", "),
        taps.reversed().iter().join(", "),
    ))
}

/// `value` as a binary string of `width` digits, MSB first.
#[must_use]
pub fn render_value(value: u64, width: usize) -> String { format!("{value:0width$b}") }

/// The first `count` values of a register, starting with `seed`.
///
/// # Errors
///
/// Errors if the register cannot be built.
pub fn sequence(config: LfsrConfig, seed: u64, count: usize) -> Result<Vec<u64>> {
    let lfsr = Lfsr::new(config)?;
    let controls = Controls::enabled().with_direction(config.direction);
    let values = Clock::new(&lfsr, lfsr.seeded(seed), controls)
        .take(count)
        .map(|row| row.state.value)
        .collect_vec();
    debug!(
        "{} {} edges of width {} from {seed:#x}",
        values.len(),
        config.direction,
        config.width
    );
    Ok(values)
}
