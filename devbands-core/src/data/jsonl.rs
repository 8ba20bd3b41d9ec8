//! Bars as JSON Lines, one `Bar` object per line. Blank lines are ignored.

use std::io::{BufRead, Write};

use super::DataError;
use crate::domain::Bar;

pub fn read_bars<R: BufRead>(reader: R) -> Result<Vec<Bar>, DataError> {
    let mut bars = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| DataError::Read { line: i + 1, source })?;
        if line.trim().is_empty() {
            continue;
        }
        let bar: Bar = serde_json::from_str(&line).map_err(|source| DataError::Json {
            line: i + 1,
            source,
        })?;
        bars.push(bar);
    }
    Ok(bars)
}

pub fn write_bars<W: Write>(mut writer: W, bars: &[Bar]) -> std::io::Result<()> {
    for bar in bars {
        serde_json::to_writer(&mut writer, bar)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}
