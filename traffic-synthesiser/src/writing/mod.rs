// This module contains functionality related to formatting and writing traffic tables as CSV files.
use std::{
    fmt::{self, Display, Formatter},
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};
use common_utils::parsing_utils::TRAFFIC_HEADER;

use crate::generation::DailyTrafficRecord;

impl Display for DailyTrafficRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{},{},{},{}",
            self.date.format("%Y-%m-%d"),
            self.visitors,
            self.pageviews,
            self.sessions,
            self.bounced_sessions,
            self.avg_session_duration_secs,
            self.awards_week as u8,
            self.awards_night as u8
        )
    }
}

// Write items from an iterator, one line per item.
// the BufWriter will be told to flush when the difference between the buffers internal capacity and the buffered data
// is below the given flush_threshold.
fn write_records<W: Write, Record: Display, I: IntoIterator<Item = Record>>(
    buf_writer: &mut BufWriter<W>,
    record_iterator: I,
    flush_threshold: usize,
) -> Result<()> {
    for record in record_iterator {
        if buf_writer.capacity() - buf_writer.buffer().len() < flush_threshold {
            buf_writer
                .flush()
                .with_context(|| "Failed flushing all bytes".to_string())?;
        }
        writeln!(buf_writer, "{}", record)
            .with_context(|| format!("Failed to write record: {} into the BufWriter", record))?;
    }
    buf_writer
        .flush()
        .with_context(|| "Failed flushing all bytes".to_string())?;
    Ok(())
}

/// Writes the header row followed by one row per record.
pub(crate) fn write_traffic_table<W: Write>(
    writer: W,
    records: &[DailyTrafficRecord],
) -> Result<()> {
    const BUFFER_SIZE: usize = 64 * 1024;
    const FLUSH_THRESHOLD: usize = 256; // comfortably above the longest possible row
    let mut buf_writer = BufWriter::with_capacity(BUFFER_SIZE, writer);
    writeln!(buf_writer, "{}", TRAFFIC_HEADER.join(","))
        .with_context(|| "Failed to write the header row".to_string())?;
    write_records(&mut buf_writer, records.iter(), FLUSH_THRESHOLD)
}

/// Creates (or truncates) the file at `path` and writes the traffic table to it.
pub(crate) fn write_traffic_file(path: &Path, records: &[DailyTrafficRecord]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path.as_os_str()))?;
    write_traffic_table(file, records)
        .with_context(|| format!("Failed to write the traffic table to {:?}", path.as_os_str()))
}
