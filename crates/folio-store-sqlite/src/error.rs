//! Error type for `folio-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// An import record's name matched more than one person. The batch was
  /// rolled back.
  #[error("integrity violation: {matches} persons are named {name:?}")]
  DuplicateName { name: String, matches: usize },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
