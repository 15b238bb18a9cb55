//! CSV/TSV reading and writing for record tables.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use grouper_core::Table;

/// Field delimiter, chosen by file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Csv,
    Tsv,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("csv") => Ok(Format::Csv),
            Some("tsv") => Ok(Format::Tsv),
            _ => bail!(
                "unsupported file type: {} (expected .csv or .tsv)",
                path.display()
            ),
        }
    }

    fn delimiter(self) -> u8 {
        match self {
            Format::Csv => b',',
            Format::Tsv => b'\t',
        }
    }

    fn extension(self) -> &'static str {
        match self {
            Format::Csv => "csv",
            Format::Tsv => "tsv",
        }
    }
}

/// `<stem>-key.<ext>` beside the input.
pub fn default_output_path(input: &Path, format: Format) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{stem}-key.{}", format.extension()))
}

pub fn read_table(path: &Path, format: Format) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(format.delimiter())
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut headers: Vec<String> = reader
        .headers()
        .with_context(|| format!("failed to read header of {}", path.display()))?
        .iter()
        .map(str::to_string)
        .collect();
    if let Some(first) = headers.first_mut()
        && let Some(stripped) = first.strip_prefix('\u{feff}')
    {
        *first = stripped.to_string();
    }

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record =
            record.with_context(|| format!("failed to read record {} of {}", i + 1, path.display()))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    tracing::debug!("read {} records from {}", rows.len(), path.display());
    Ok(Table::new(headers, rows))
}

pub fn write_table(path: &Path, format: Format, table: &Table) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(format.delimiter())
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    writer
        .write_record(&table.headers)
        .context("failed to write header")?;
    for row in &table.rows {
        writer.write_record(row).context("failed to write record")?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to flush {}", path.display()))?;
    Ok(())
}
