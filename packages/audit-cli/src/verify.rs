//! Post-run integrity checks.
//!
//! Reads both reports back after the pipeline finishes. The duplicate check
//! is structurally impossible to fail (a user is written to exactly one
//! file), so it is a self-consistency check rather than a real error path.
//! Violations are reported, never fatal; the writes they concern already
//! happened.

use std::collections::BTreeSet;
use std::io;
use std::path::Path;

#[derive(Debug)]
pub struct VerifyOutcome {
    /// IDs present in both files, sorted.
    pub duplicate_ids: Vec<String>,
    /// Data rows with an empty `id` or empty `username`, across both files.
    pub integrity_errors: usize,
    /// Data rows in the active report.
    pub active_rows: usize,
    /// Data rows in the inactive report.
    pub inactive_rows: usize,
}

impl VerifyOutcome {
    pub fn is_clean(&self) -> bool {
        self.duplicate_ids.is_empty() && self.integrity_errors == 0
    }
}

/// Run both checks against the two report files.
pub fn verify(active_path: &Path, inactive_path: &Path) -> io::Result<VerifyOutcome> {
    let active_rows = data_rows(active_path)?;
    let inactive_rows = data_rows(inactive_path)?;

    let active_ids: BTreeSet<String> = active_rows.iter().map(|row| id_field(row)).collect();
    let duplicate_ids: Vec<String> = inactive_rows
        .iter()
        .map(|row| id_field(row))
        .filter(|id| active_ids.contains(id))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let integrity_errors = active_rows
        .iter()
        .chain(inactive_rows.iter())
        .filter(|row| {
            let missing = id_field(row).is_empty() || username_field(row).is_empty();
            if missing {
                tracing::warn!(row = %row, "Row with empty id or username");
            }
            missing
        })
        .count();

    Ok(VerifyOutcome {
        duplicate_ids,
        integrity_errors,
        active_rows: active_rows.len(),
        inactive_rows: inactive_rows.len(),
    })
}

/// All lines after the header, blank lines excluded.
fn data_rows(path: &Path) -> io::Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(contents
        .lines()
        .skip(1)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

// `id` and `username` precede the quoted name, so a plain comma split is
// safe for these two columns.
fn id_field(row: &str) -> String {
    row.split(',').next().unwrap_or("").to_string()
}

fn username_field(row: &str) -> String {
    row.split(',').nth(1).unwrap_or("").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_report(dir: &Path, name: &str, rows: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut contents = String::from("id,username,name,email\n");
        for row in rows {
            contents.push_str(row);
            contents.push('\n');
        }
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_clean_reports() {
        let dir = tempfile::tempdir().unwrap();
        let active = write_report(
            dir.path(),
            "active.csv",
            &[r#"1,root,"Administrator",admin@x.com"#, r#"2,alice,"Alice",a@x.com"#],
        );
        let inactive = write_report(dir.path(), "inactive.csv", &[r#"3,bob,"Bob",b@x.com"#]);

        let outcome = verify(&active, &inactive).unwrap();
        assert!(outcome.is_clean());
        assert_eq!(outcome.active_rows, 2);
        assert_eq!(outcome.inactive_rows, 1);
    }

    #[test]
    fn test_detects_cross_file_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let active = write_report(
            dir.path(),
            "active.csv",
            &[r#"5,eve,"Eve",e@x.com"#, r#"9,mallory,"Mallory",m@x.com"#],
        );
        let inactive = write_report(
            dir.path(),
            "inactive.csv",
            &[r#"9,mallory,"Mallory",m@x.com"#, r#"12,trent,"Trent",t@x.com"#],
        );

        let outcome = verify(&active, &inactive).unwrap();
        assert_eq!(outcome.duplicate_ids, vec!["9".to_string()]);
        assert!(!outcome.is_clean());
    }

    #[test]
    fn test_counts_empty_required_fields() {
        let dir = tempfile::tempdir().unwrap();
        let active = write_report(dir.path(), "active.csv", &[r#",ghost,"Ghost",g@x.com"#]);
        let inactive = write_report(dir.path(), "inactive.csv", &[r#"4,,"No Name",n@x.com"#]);

        let outcome = verify(&active, &inactive).unwrap();
        assert_eq!(outcome.integrity_errors, 2);
        assert!(outcome.duplicate_ids.is_empty());
    }

    #[test]
    fn test_header_only_files_are_clean() {
        let dir = tempfile::tempdir().unwrap();
        let active = write_report(dir.path(), "active.csv", &[]);
        let inactive = write_report(dir.path(), "inactive.csv", &[]);

        let outcome = verify(&active, &inactive).unwrap();
        assert!(outcome.is_clean());
        assert_eq!(outcome.active_rows, 0);
        assert_eq!(outcome.inactive_rows, 0);
    }
}
