//! Flat bars as CSV.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use super::DataError;
use crate::domain::Bar;

#[derive(Debug, Serialize, Deserialize)]
struct BarRecord {
    timestamp: NaiveDateTime,
    trade_date: Option<NaiveDate>,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
    #[serde(default)]
    bid_volume: f64,
    #[serde(default)]
    ask_volume: f64,
}

impl From<BarRecord> for Bar {
    fn from(r: BarRecord) -> Self {
        Bar {
            timestamp: r.timestamp,
            trade_date: r.trade_date,
            high: r.high,
            low: r.low,
            close: r.close,
            volume: r.volume,
            bid_volume: r.bid_volume,
            ask_volume: r.ask_volume,
            profile: Vec::new(),
        }
    }
}

pub fn read_bars<R: Read>(reader: R) -> Result<Vec<Bar>, DataError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut bars = Vec::new();
    for record in rdr.deserialize::<BarRecord>() {
        bars.push(record?.into());
    }
    Ok(bars)
}

pub fn write_bars<W: Write>(writer: W, bars: &[Bar]) -> Result<(), DataError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for bar in bars {
        if bar.has_profile() {
            return Err(DataError::ProfileNotRepresentable {
                timestamp: bar.timestamp.to_string(),
            });
        }
        wtr.serialize(BarRecord {
            timestamp: bar.timestamp,
            trade_date: bar.trade_date,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            bid_volume: bar.bid_volume,
            ask_volume: bar.ask_volume,
        })?;
    }
    wtr.flush().map_err(|e| DataError::Csv(e.into()))?;
    Ok(())
}
