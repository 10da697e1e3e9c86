//! Bulk-import input records and the counters an import batch produces.
//!
//! An import file is a JSON array of `{"name": ..., "emails": [...]}`
//! objects. The whole file is parsed before the store sees any of it, so a
//! malformed record rejects the batch without touching the database.

use std::{fmt, fs::File, io::{BufReader, Read}, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
  document::{Document, email_document},
  Error, Result,
};

// ─── Input ───────────────────────────────────────────────────────────────────

/// One incoming person. Both fields are required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRecord {
  pub name:   String,
  pub emails: Vec<String>,
}

impl ImportRecord {
  /// The content this record asks for, or `None` when it carries no emails
  /// and should leave the person's content alone.
  pub fn candidate_content(&self) -> Option<Document> {
    (!self.emails.is_empty()).then(|| email_document(&self.emails))
  }
}

/// Parse a JSON array of [`ImportRecord`]s.
pub fn read_records(reader: impl Read) -> Result<Vec<ImportRecord>> {
  Ok(serde_json::from_reader(reader)?)
}

/// Open `path` and parse it with [`read_records`].
pub fn load_file(path: impl AsRef<Path>) -> Result<Vec<ImportRecord>> {
  let path = path.as_ref();
  let file = File::open(path).map_err(|source| Error::Io {
    path: path.to_path_buf(),
    source,
  })?;
  read_records(BufReader::new(file))
}

// ─── Output ──────────────────────────────────────────────────────────────────

/// Per-category tallies for one committed import batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportStats {
  #[serde(rename = "new-person")]
  pub new_person:  u64,
  #[serde(rename = "new-version")]
  pub new_version: u64,
}

impl ImportStats {
  /// `true` when the batch changed nothing.
  pub fn is_empty(&self) -> bool { self.new_person == 0 && self.new_version == 0 }
}

impl fmt::Display for ImportStats {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "new-person={}, new-version={}",
      self.new_person, self.new_version
    )
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn parses_records() {
    let input = br#"[
      {"name": "Alice", "emails": ["a@x.com"]},
      {"name": "Bob",   "emails": []}
    ]"#;
    let records = read_records(&input[..]).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].name, "Alice");
    assert_eq!(records[0].emails, ["a@x.com"]);
    assert!(records[1].emails.is_empty());
  }

  #[test]
  fn missing_emails_is_rejected() {
    let input = br#"[{"name": "Alice"}]"#;
    let err = read_records(&input[..]).unwrap_err();
    assert!(matches!(err, Error::Serialization(_)));
  }

  #[test]
  fn missing_file_reports_path() {
    let err = load_file("/nonexistent/folio-import.json").unwrap_err();
    assert!(
      matches!(err, Error::Io { ref path, .. } if path.ends_with("folio-import.json"))
    );
  }

  #[test]
  fn candidate_content_skips_empty_emails() {
    let record = ImportRecord { name: "Carol".into(), emails: vec![] };
    assert!(record.candidate_content().is_none());

    let record = ImportRecord { name: "Carol".into(), emails: vec!["c@x.com".into()] };
    let content = record.candidate_content().unwrap();
    assert_eq!(serde_json::Value::Object(content), json!({ "email": ["c@x.com"] }));
  }

  #[test]
  fn stats_serialize_with_hyphenated_keys() {
    let stats = ImportStats { new_person: 1, new_version: 2 };
    assert_eq!(
      serde_json::to_value(stats).unwrap(),
      json!({ "new-person": 1, "new-version": 2 })
    );
    assert_eq!(stats.to_string(), "new-person=1, new-version=2");
    assert!(!stats.is_empty());
    assert!(ImportStats::default().is_empty());
  }
}
