//! Persons and their append-only content versions.
//!
//! A person is a thin envelope holding only a name. Everything else known
//! about it lives in its content versions, which are never updated or
//! deleted. The "current content" is read from the newest version.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{document::Document, user::UserId};

/// Surrogate key of a `person` row.
pub type PersonId = i64;

/// Surrogate key of a `content_version` row. Increases with insertion order.
pub type VersionId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub id:   PersonId,
  /// Natural key during import; expected, but not enforced, to be unique.
  pub name: String,
}

/// An immutable snapshot of a person's content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentVersion {
  pub id:        VersionId,
  pub person_id: PersonId,
  /// The user who made the edit; `None` for automated imports.
  pub user_id:   Option<UserId>,
  pub content:   Document,
  /// When the version was recorded. Assigned by the store.
  pub time:      DateTime<Utc>,
}
