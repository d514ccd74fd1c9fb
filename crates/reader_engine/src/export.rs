use std::path::{Path, PathBuf};

use serde_json::json;

use crate::persist::{AtomicFileWriter, PersistError};
use crate::ResultRow;

const CSV_HEADER: [&str; 4] = ["file", "page", "format", "text"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// `.json` paths export JSON; everything else exports CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ExportFormat::Json,
            _ => ExportFormat::Csv,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub row_count: usize,
    pub format: ExportFormat,
    pub output_path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Writes `rows` to `path` in the format implied by its extension.
pub fn export_rows(path: &Path, rows: &[ResultRow]) -> Result<ExportSummary, ExportError> {
    let format = ExportFormat::from_path(path);
    let content = match format {
        ExportFormat::Csv => render_csv(rows)?,
        ExportFormat::Json => render_json(rows)?.into_bytes(),
    };

    let output_path = AtomicFileWriter::new().write(path, &content)?;
    Ok(ExportSummary {
        row_count: rows.len(),
        format,
        output_path,
    })
}

/// Fields are quoted only when they contain a delimiter, quote or line break.
fn render_csv(rows: &[ResultRow]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::with_capacity(rows.len() * 64));
    writer.write_record(CSV_HEADER)?;
    for row in rows {
        writer.write_record([&row.file, &row.page, &row.format, &row.text])?;
    }
    writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))
}

fn render_json(rows: &[ResultRow]) -> Result<String, serde_json::Error> {
    let values: Vec<_> = rows
        .iter()
        .map(|row| {
            let page = match row.page.parse::<u64>() {
                Ok(number) => json!(number),
                Err(_) => json!(row.page),
            };
            json!({
                "file": row.file,
                "page": page,
                "format": row.format,
                "text": row.text,
            })
        })
        .collect();
    serde_json::to_string_pretty(&values)
}
