//! Encoding and decoding helpers between Rust domain types and the
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings with a fixed microsecond width,
//! so comparing the text compares the instants. Documents are stored as
//! compact JSON bytes.

use chrono::{DateTime, SecondsFormat, SubsecRound as _, Utc};
use folio_core::{
  Document,
  person::{ContentVersion, Person, PersonId, VersionId},
  user::{User, UserId},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

/// The current instant at the precision the store keeps.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Document ────────────────────────────────────────────────────────────────

pub fn encode_document(doc: &Document) -> Result<Vec<u8>> {
  Ok(serde_json::to_vec(doc)?)
}

pub fn decode_document(bytes: &[u8]) -> Result<Document> {
  Ok(serde_json::from_slice(bytes)?)
}

/// [`decode_document`] for use inside a connection closure, where every
/// error has to be a [`tokio_rusqlite::Error`].
pub fn decode_document_in_call(
  bytes: &[u8],
) -> std::result::Result<Document, tokio_rusqlite::Error> {
  serde_json::from_slice(bytes).map_err(|e| tokio_rusqlite::Error::Other(Box::new(e)))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column values read directly from a `content_version` row.
pub struct RawVersion {
  pub id:        VersionId,
  pub person_id: PersonId,
  pub user_id:   Option<UserId>,
  pub content:   Vec<u8>,
  pub time:      String,
}

impl RawVersion {
  pub const COLUMNS: &'static str = "id, person_id, user_id, content, time";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:        row.get(0)?,
      person_id: row.get(1)?,
      user_id:   row.get(2)?,
      content:   row.get(3)?,
      time:      row.get(4)?,
    })
  }

  pub fn into_version(self) -> Result<ContentVersion> {
    Ok(ContentVersion {
      id:        self.id,
      person_id: self.person_id,
      user_id:   self.user_id,
      content:   decode_document(&self.content)?,
      time:      decode_dt(&self.time)?,
    })
  }
}

pub fn person_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Person> {
  Ok(Person { id: row.get(0)?, name: row.get(1)? })
}

pub fn user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
  Ok(User {
    id:         row.get(0)?,
    openid_url: row.get(1)?,
    name:       row.get(2)?,
    email:      row.get(3)?,
  })
}
