use std::io::Write;

use chrono::SecondsFormat;

use super::questions::SUS_QUESTIONS;
use super::submission::StoredSubmission;

/// Column order shared by the results file and spreadsheet exports:
/// nickname, timestamp, score, then the ten answers in question order.
pub fn header() -> Vec<String> {
    let mut columns = vec![
        "nickname".to_string(),
        "timestamp".to_string(),
        "score".to_string(),
    ];
    columns.extend(SUS_QUESTIONS.iter().map(|question| question.label()));
    columns
}

pub fn row(record: &StoredSubmission) -> Vec<String> {
    let mut fields = vec![
        record.nickname.clone(),
        record
            .timestamp
            .to_rfc3339_opts(SecondsFormat::Secs, true),
        format!("{:.1}", record.score),
    ];
    fields.extend((0..SUS_QUESTIONS.len()).map(|index| {
        record
            .responses
            .get(index)
            .copied()
            .flatten()
            .map(|value| value.to_string())
            .unwrap_or_default()
    }));
    fields
}

/// Writes a comma-separated export with a header row.
pub fn write_csv<W: Write>(writer: W, records: &[StoredSubmission]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(header())?;
    for record in records {
        csv_writer.write_record(row(record))?;
    }
    csv_writer.flush()?;
    Ok(())
}
