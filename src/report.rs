use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};
use log::info;

use crate::{alignment::AlignmentResult, instrumentation::Measurement};

/// Write cost, both aligned sequences, elapsed milliseconds and memory delta in KiB, one per line.
pub fn write_report<Character: Clone + Into<char>>(
    mut writer: impl Write,
    result: &AlignmentResult<Character>,
    measurement: &Measurement,
) -> Result<()> {
    writeln!(writer, "{result}")?;
    writeln!(writer, "{:.6}", measurement.elapsed_millis())?;
    writeln!(writer, "{}", measurement.memory_delta_kib)?;
    writer.flush()?;
    Ok(())
}

pub fn write_report_file<Character: Clone + Into<char>>(
    path: impl AsRef<Path>,
    result: &AlignmentResult<Character>,
    measurement: &Measurement,
) -> Result<()> {
    let path = path.as_ref();
    info!("Writing report to {path:?}");

    let file = File::create(path).with_context(|| format!("Error creating file: {path:?}"))?;
    write_report(BufWriter::new(file), result, measurement)
        .with_context(|| format!("Error writing report: {path:?}"))
}
