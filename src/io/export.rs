//! CSV export for day schedules.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::types::ScheduleRow;

/// Column header for schedule CSV export.
const HEADER: &str = "time,price,pv_kw,miner_kw,grid_charge_kw,pv_charge_kw,\
                      discharge_kw,grid_used_kw,soc_kwh";

/// Exports a schedule to a CSV file at the given path.
///
/// Writes a header row followed by one data row per slot. Produces
/// deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(rows: &[ScheduleRow], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(rows, buf)
}

/// Writes a schedule as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(rows: &[ScheduleRow], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for r in rows {
        wtr.write_record(&[
            r.time.format("%H:%M").to_string(),
            format!("{:.4}", r.price),
            format!("{:.4}", r.pv_kw),
            format!("{:.4}", r.miner_kw),
            format!("{:.4}", r.grid_charge_kw),
            format!("{:.4}", r.pv_charge_kw),
            format!("{:.4}", r.discharge_kw),
            format!("{:.4}", r.grid_used_kw),
            format!("{:.4}", r.soc_kwh),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
