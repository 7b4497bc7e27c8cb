//! CSV file sink for ingested recall batches

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::domain::recall::CsvRecallRow;
use crate::domain::services::RecallSink;

const SEPARATOR: char = ',';

fn needs_quotes(field: &str) -> bool {
    field.contains(SEPARATOR) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write one row, quoting fields that carry separators, quotes or line breaks
pub fn write_row<W: Write>(w: &mut W, row: &[&str]) -> io::Result<()> {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            write!(w, "{SEPARATOR}")?;
        }
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{cell}")?;
        }
    }
    writeln!(w)
}

/// Writes a header on creation, then every batch of rows it is handed
pub struct CsvFileSink {
    path: PathBuf,
    writer: BufWriter<File>,
    rows_written: usize,
}

impl CsvFileSink {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
        }

        let file = File::create(&path).with_context(|| format!("Failed to create CSV file {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        write_row(&mut writer, &CsvRecallRow::HEADER).context("Failed to write CSV header")?;

        Ok(Self {
            path,
            writer,
            rows_written: 0,
        })
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }
}

impl RecallSink for CsvFileSink {
    fn write_rows(&mut self, rows: &[CsvRecallRow]) -> Result<()> {
        for row in rows {
            write_row(&mut self.writer, &row.fields())
                .with_context(|| format!("Failed to write CSV row to {}", self.path.display()))?;
        }
        self.writer.flush().context("Failed to flush CSV file")?;
        self.rows_written += rows.len();
        info!("💾 Wrote {} rows to {}", rows.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn row(title: &str, reason: &str) -> CsvRecallRow {
        CsvRecallRow {
            title: title.into(),
            maker: "Martin".into(),
            risks: "Listeria".into(),
            reason: reason.into(),
            date: "14/02/2025 15:43:31".into(),
            zone: "France entière".into(),
            link: "https://rappel.conso.gouv.fr/fiche-rappel/1/Interne".into(),
        }
    }

    #[test]
    fn plain_fields_are_written_verbatim() {
        let mut out = Vec::new();
        write_row(&mut out, &["a", "b c", ""]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a,b c,\n");
    }

    #[test]
    fn special_fields_are_quoted_and_escaped() {
        let mut out = Vec::new();
        write_row(&mut out, &["x,y", "say \"hi\"", "two\nlines"]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\"x,y\",\"say \"\"hi\"\"\",\"two\nlines\"\n"
        );
    }

    #[test]
    fn file_starts_with_header_then_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("recalls.csv");

        let mut sink = CsvFileSink::create(&path).unwrap();
        sink.write_rows(&[row("Jambon", "Présence, de listeria")]).unwrap();
        sink.write_rows(&[row("Pâté", "Salmonelle")]).unwrap();
        assert_eq!(sink.rows_written(), 2);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "title,maker,risks,reason,date,zone,link");
        assert_eq!(
            lines[1],
            "Jambon,Martin,Listeria,\"Présence, de listeria\",14/02/2025 15:43:31,France entière,https://rappel.conso.gouv.fr/fiche-rappel/1/Interne"
        );
        assert!(lines[2].starts_with("Pâté,"));
    }
}
