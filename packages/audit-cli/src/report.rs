//! CSV report writer.
//!
//! Both reports share the schema `id,username,name,email`. `name` is always
//! quoted (display names carry commas and spaces); the other fields never
//! are. Files are truncated on create, so each run starts fresh.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use gitlab_client::User;

pub const CSV_HEADER: &str = "id,username,name,email";

pub struct CsvReport {
    writer: BufWriter<File>,
    path: PathBuf,
    rows: usize,
}

impl CsvReport {
    /// Create (truncating) the report file and write the header row.
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "{}", CSV_HEADER)?;
        Ok(Self {
            writer,
            path: path.to_path_buf(),
            rows: 0,
        })
    }

    /// Append one data row for a user.
    pub fn append(&mut self, user: &User) -> io::Result<()> {
        writeln!(self.writer, "{}", format_row(user))?;
        self.rows += 1;
        Ok(())
    }

    /// Number of data rows written so far (header excluded).
    pub fn rows_written(&self) -> usize {
        self.rows
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush buffered rows to disk. Must run before the verifier reads the
    /// file back.
    pub fn finish(mut self) -> io::Result<usize> {
        self.writer.flush()?;
        Ok(self.rows)
    }
}

/// Format one data row. Embedded quotes in the name are doubled per CSV
/// convention.
pub fn format_row(user: &User) -> String {
    format!(
        "{},{},\"{}\",{}",
        user.id,
        user.username,
        user.name.replace('"', "\"\""),
        user.email.as_deref().unwrap_or("")
    )
}
