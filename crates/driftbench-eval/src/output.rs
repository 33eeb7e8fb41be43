//! Output formatting for streams and scores.
//!
//! Supports both human-readable terminal output and JSON for scripting.
//! Undefined metrics print as "undefined" for humans and `null` in JSON.

use anyhow::{Context, Result};
use driftbench_core::evaluation::ChangePointReport;
use driftbench_core::stream::Stream;
use serde::Serialize;
use std::io::Write;

/// Maximum number of change points listed in human output
const MAX_LISTED: usize = 20;

// ============================================================================
// Stream Summary
// ============================================================================

/// JSON summary of a built stream
#[derive(Debug, Serialize)]
pub struct StreamSummary {
    pub dataset: String,
    pub length: usize,
    pub dims: usize,
    pub num_concepts: usize,
    pub drift_length: usize,
    pub true_change_points: Vec<usize>,
    /// Effective length of each transition
    pub drift_lengths: Vec<usize>,
    /// Number of coordinates that change at each change point
    pub changed_dims: Vec<usize>,
}

impl StreamSummary {
    pub fn new(dataset: &str, stream: &Stream) -> Self {
        Self {
            dataset: dataset.to_string(),
            length: stream.len(),
            dims: stream.dims(),
            num_concepts: stream.num_concepts(),
            drift_length: stream.drift_length(),
            true_change_points: stream.true_change_points().to_vec(),
            drift_lengths: stream.drift_lengths().to_vec(),
            changed_dims: stream.change_regions().iter().map(Vec::len).collect(),
        }
    }
}

/// Formats a stream summary as JSON.
pub fn format_stream_json(summary: &StreamSummary) -> String {
    serde_json::to_string_pretty(summary).unwrap_or_else(|_| "{}".to_string())
}

/// Formats a stream summary for the terminal.
pub fn format_stream_human(summary: &StreamSummary) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "{} stream: {} samples, {} dims, {} concept{}\n",
        summary.dataset,
        summary.length,
        summary.dims,
        summary.num_concepts,
        if summary.num_concepts == 1 { "" } else { "s" }
    ));
    output.push_str(&format!("   Drift length: {}\n", summary.drift_length));
    output.push_str(&format!(
        "   Change points: {}\n",
        list_positions(&summary.true_change_points)
    ));
    if summary.drift_lengths.iter().any(|&l| l != summary.drift_length) {
        output.push_str(&format!(
            "   Effective drift lengths: {}\n",
            list_positions(&summary.drift_lengths)
        ));
    }
    output.trim_end().to_string()
}

/// One JSON line of `--samples` output
#[derive(Serialize)]
struct SampleRecord<'a> {
    position: usize,
    label: u32,
    features: &'a [f64],
}

/// Writes every sample of `stream` as one JSON line. Returns the line count.
pub fn write_samples<W: Write>(stream: &Stream, mut writer: W) -> Result<usize> {
    let mut written = 0;
    for sample in stream.iter() {
        let record = SampleRecord {
            position: sample.position,
            label: sample.label,
            features: &sample.features,
        };
        serde_json::to_writer(&mut writer, &record).context("Failed to encode sample")?;
        writer.write_all(b"\n").context("Failed to write sample")?;
        written += 1;
    }
    writer.flush().context("Failed to flush samples")?;
    Ok(written)
}

// ============================================================================
// Score Report
// ============================================================================

/// JSON output of the `score` command
#[derive(Debug, Serialize)]
pub struct ScoreOutput {
    pub true_change_points: Vec<usize>,
    pub reported: Vec<usize>,
    pub tolerance: usize,
    pub beta: f64,
    #[serde(flatten)]
    pub report: ChangePointReport,
}

/// Formats a score as JSON.
pub fn format_score_json(output: &ScoreOutput) -> String {
    serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
}

/// Formats a score for the terminal.
pub fn format_score_human(output: &ScoreOutput) -> String {
    let report = &output.report;
    let mut text = String::new();
    text.push_str(&format!(
        "Scored {} report{} against {} change point{} (tolerance {}):\n\n",
        output.reported.len(),
        if output.reported.len() == 1 { "" } else { "s" },
        output.true_change_points.len(),
        if output.true_change_points.len() == 1 { "" } else { "s" },
        output.tolerance
    ));
    text.push_str(&format!(
        "   TP: {}  FP: {}  FN: {}\n",
        report.true_positives, report.false_positives, report.false_negatives
    ));
    text.push_str(&format!("   Precision: {}\n", format_metric(report.precision)));
    text.push_str(&format!("   Recall:    {}\n", format_metric(report.recall)));
    text.push_str(&format!(
        "   F{}:        {}\n",
        output.beta,
        format_metric(report.f_beta)
    ));
    text.push_str(&format!(
        "   Detected:  {}%\n",
        format_metric(report.percent_detected)
    ));
    text.push_str(&format!(
        "   Mean delay: {}\n",
        format_metric(report.mean_delay)
    ));
    text.trim_end().to_string()
}

fn format_metric(value: f64) -> String {
    if value.is_nan() {
        "undefined".to_string()
    } else {
        format!("{:.4}", value)
    }
}

/// Comma-separated list, shortened after `MAX_LISTED` entries.
fn list_positions(values: &[usize]) -> String {
    if values.is_empty() {
        return "none".to_string();
    }
    let shown: Vec<String> = values.iter().take(MAX_LISTED).map(usize::to_string).collect();
    if values.len() > MAX_LISTED {
        format!("{}, ... ({} total)", shown.join(", "), values.len())
    } else {
        shown.join(", ")
    }
}
