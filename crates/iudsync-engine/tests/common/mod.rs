use std::io::Write;
use std::path::PathBuf;

use iudsync_core::model::{ChangeRecord, IudStatus, RecordKey};
use tempfile::TempDir;

pub const HEADER: &str = "Field1,Field2,Field3,Field4,Field5\n";

/// Write `content` to `<dir>/<name>` and return its path
#[allow(dead_code)]
pub fn write_csv(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

/// CSV text with a full header and one line per `(f1, f2, f3, f4, f5)`
#[allow(dead_code)]
pub fn csv_of(rows: &[(i64, &str, i64, i64, i64)]) -> String {
    let mut content = String::from(HEADER);
    for (f1, f2, f3, f4, f5) in rows {
        content.push_str(&format!("{},{},{},{},{}\n", f1, f2, f3, f4, f5));
    }
    content
}

#[allow(dead_code)]
pub fn stored(rows: &[(i64, &str, i64, i64, i64)], status: IudStatus) -> Vec<ChangeRecord> {
    rows.iter()
        .map(|&(f1, f2, f3, f4, f5)| ChangeRecord::new(RecordKey::new(f1, f2), f3, f4, f5, status))
        .collect()
}

/// Rows sorted by key, for comparing tables written in different orders
#[allow(dead_code)]
pub fn sorted(mut rows: Vec<ChangeRecord>) -> Vec<ChangeRecord> {
    rows.sort_by(|a, b| a.key.cmp(&b.key));
    rows
}
