use std::path::Path;

use csv::{Writer, WriterBuilder};

use crate::display::cell_label;
use crate::error::{PlannerError, Result};
use crate::schedule::types::ScheduleGrid;

fn write_rows<W: std::io::Write>(grid: &ScheduleGrid, wtr: &mut Writer<W>) -> Result<()> {
    let days: Vec<_> = grid.days().collect();

    let mut header = vec!["Time".to_string()];
    header.extend(days.iter().map(|d| d.name().to_string()));
    wtr.write_record(&header)?;

    for slot in grid.slots() {
        let mut record = vec![slot.to_string()];
        record.extend(days.iter().map(|day| cell_label(grid.entries(*day, slot))));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Serializes the timetable as CSV: one row per slot, one column per day
pub fn schedule_to_csv(grid: &ScheduleGrid) -> Result<String> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    write_rows(grid, &mut wtr)?;
    let bytes = wtr
        .into_inner()
        .map_err(|e| PlannerError::Io(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| PlannerError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// Writes the timetable as CSV to a file, replacing any existing file
pub fn export_schedule_to_csv(grid: &ScheduleGrid, csv_path: &Path) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_path(csv_path)?;
    write_rows(grid, &mut wtr)
}
