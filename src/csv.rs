use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::ledger::UserSummary;
use crate::model::RecordRequest;

/// Errors that can occur when parsing csv rows
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("line {line}: failed to parse row: {source}")]
    Parse { line: usize, source: csv::Error },

    #[error("line {line}: unknown action type '{action}'")]
    UnknownAction { line: usize, action: String },

    #[error("line {line}: missing credits")]
    MissingCredits { line: usize },
}

#[derive(Debug, Deserialize)]
struct InputRow {
    user: String,
    action: String,
    credits: Option<i64>,
    referrer: Option<String>,
}

#[derive(Debug, Serialize)]
struct OutputRow {
    user: String,
    total_credits: u64,
    total_events: usize,
}

/// Read award requests from a csv file
pub fn read_requests(
    path: impl AsRef<Path>,
) -> impl Iterator<Item = Result<RecordRequest, CsvError>> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .expect("failed to open csv file");

    reader
        .into_deserialize::<InputRow>()
        .enumerate()
        .map(|(idx, result)| {
            let line = idx + 2; // 1-indexed, skip header
            let row = result.map_err(|source| CsvError::Parse { line, source })?;
            let action = row
                .action
                .parse()
                .map_err(|_| CsvError::UnknownAction {
                    line,
                    action: row.action,
                })?;
            let credits = row.credits.ok_or(CsvError::MissingCredits { line })?;

            let mut req = RecordRequest::new(row.user, action, credits);
            req.referrer = row.referrer;
            Ok(req)
        })
}

/// Write per-user summaries to stdout in csv format
pub fn write_summaries(summaries: impl IntoIterator<Item = UserSummary>) {
    let stdout = io::stdout();
    let mut writer = csv::Writer::from_writer(stdout.lock());

    for summary in summaries {
        let row = OutputRow {
            user: summary.user,
            total_credits: summary.total_credits,
            total_events: summary.total_events,
        };
        writer.serialize(&row).expect("failed to write csv row");
    }

    writer.flush().expect("failed to flush csv writer");
}
