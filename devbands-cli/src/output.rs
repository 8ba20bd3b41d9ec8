//! Per-input evaluation output files.
//!
//! CSV rows carry `timestamp,status`, VWAP, sigma and the six sigma bands,
//! followed by one column per marker kind of the selected policy. Cells with no
//! value (undefined bands, markers that did not fire) are left empty.

use anyhow::{Context, Result};
use clap::ValueEnum;
use std::io::Write;
use std::path::Path;

use devbands_core::engine::{Band, Evaluation};
use devbands_core::SignalPolicy;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Csv,
    Jsonl,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Jsonl => "jsonl",
        }
    }
}

/// Column names for `policy`, in write order.
pub fn csv_header(policy: SignalPolicy) -> Vec<&'static str> {
    let mut header = vec!["timestamp", "status", "vwap", "sigma"];
    // vwap already placed ahead of sigma
    header.extend(Band::ALL.iter().filter(|b| **b != Band::Vwap).map(|b| b.key()));
    header.extend(policy.marker_kinds().iter().map(|k| k.key()));
    header
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn csv_row(eval: &Evaluation, policy: SignalPolicy) -> Vec<String> {
    let bands = eval.step.bands();
    let mut row = vec![
        eval.timestamp.format(TIMESTAMP_FORMAT).to_string(),
        eval.step.label().to_string(),
        cell(bands.map(|b| b.vwap)),
        cell(bands.map(|b| b.sigma)),
    ];
    row.extend(
        Band::ALL
            .iter()
            .filter(|b| **b != Band::Vwap)
            .map(|band| cell(bands.map(|b| b.level(*band)))),
    );
    row.extend(
        policy
            .marker_kinds()
            .iter()
            .map(|kind| cell(eval.markers.get(*kind))),
    );
    row
}

pub fn write_csv<W: Write>(writer: W, evaluations: &[Evaluation], policy: SignalPolicy) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(csv_header(policy))?;
    for eval in evaluations {
        wtr.write_record(csv_row(eval, policy))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_jsonl<W: Write>(mut writer: W, evaluations: &[Evaluation]) -> Result<()> {
    for eval in evaluations {
        serde_json::to_writer(&mut writer, eval)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Write `evaluations` to `path` in `format`.
pub fn write_evaluations(
    path: &Path,
    evaluations: &[Evaluation],
    policy: SignalPolicy,
    format: OutputFormat,
) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let writer = std::io::BufWriter::new(file);
    match format {
        OutputFormat::Csv => write_csv(writer, evaluations, policy),
        OutputFormat::Jsonl => write_jsonl(writer, evaluations),
    }
    .with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use devbands_core::engine::{BandSet, Moments, Step};
    use devbands_core::{MarkerKind, SignalMarkers};

    fn eval(step: Step, markers: SignalMarkers) -> Evaluation {
        Evaluation {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
            step,
            markers,
        }
    }

    #[test]
    fn header_follows_policy() {
        assert_eq!(
            csv_header(SignalPolicy::None),
            vec![
                "timestamp", "status", "vwap", "sigma", "bull_sup", "bull_res", "bull_cap",
                "bear_sup", "bear_res", "bear_cap"
            ]
        );
        let breakout = csv_header(SignalPolicy::SimpleBreakout);
        assert_eq!(&breakout[10..], &["bear_signal", "bull_signal"]);
        let trend = csv_header(SignalPolicy::TrendReversion);
        assert_eq!(
            &trend[10..],
            &["bull_trending", "bull_reversion", "bear_trending", "bear_reversion"]
        );
    }

    #[test]
    fn undefined_row_has_empty_cells() {
        let mut buf = Vec::new();
        write_csv(
            &mut buf,
            &[eval(Step::Undefined, SignalMarkers::default())],
            SignalPolicy::SimpleBreakout,
        )
        .unwrap();
        let text = String::from_utf8(buf).unwrap();
        let row = text.lines().nth(1).unwrap();
        assert_eq!(row, "2024-01-02T09:30:00,undefined,,,,,,,,,,");
    }

    #[test]
    fn banded_row_carries_levels_and_markers() {
        let bands = BandSet::from_moments(Moments {
            mean: 100.0,
            sigma: 2.0,
        });
        let mut markers = SignalMarkers::default();
        markers.set(MarkerKind::BearReversal, 106.5);
        let mut buf = Vec::new();
        write_csv(
            &mut buf,
            &[eval(Step::Bands(bands), markers)],
            SignalPolicy::SimpleBreakout,
        )
        .unwrap();
        let text = String::from_utf8(buf).unwrap();
        let row = text.lines().nth(1).unwrap();
        assert_eq!(row, "2024-01-02T09:30:00,bands,100,2,102,104,106,98,96,94,106.5,");
    }

    #[test]
    fn jsonl_writes_one_line_per_bar() {
        let evals = vec![
            eval(Step::Incomplete, SignalMarkers::default()),
            eval(Step::Undefined, SignalMarkers::default()),
        ];
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jsonl");
        write_evaluations(&path, &evals, SignalPolicy::None, OutputFormat::Jsonl).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let back: Evaluation = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(back, evals[0]);
    }
}
