//! The `ContentStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `folio-store-sqlite`).
//! Callers such as the `folio` CLI depend on this abstraction, not on any
//! concrete backend.

use std::{collections::BTreeMap, future::Future};

use crate::{
  document::Document,
  import::{ImportRecord, ImportStats},
  person::{ContentVersion, Person, PersonId},
  user::{User, UserId},
};

/// Abstraction over a Folio store backend.
///
/// Content versions are append-only; a person's content is changed only by
/// recording a newer version. Each method is one unit of work, and every
/// method that writes does so inside a single transaction.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait ContentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Persons ───────────────────────────────────────────────────────────

  /// Create and persist a person. No uniqueness check is made on `name`.
  fn add_person<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + 'a;

  /// Retrieve a person by id. Returns `None` if not found.
  fn get_person(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// All persons whose name equals `name` exactly, in id order.
  fn find_persons_by_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + 'a;

  /// Every person's current content with its `name` overlaid, keyed by id.
  fn list_all_persons(
    &self,
  ) -> impl Future<Output = Result<BTreeMap<PersonId, Document>, Self::Error>>
  + Send
  + '_;

  // ── Content versions ──────────────────────────────────────────────────

  /// The newest version's content, or an empty document if the person has
  /// no versions.
  fn get_current_content(
    &self,
    person_id: PersonId,
  ) -> impl Future<Output = Result<Document, Self::Error>> + Send + '_;

  /// All versions of a person, newest first.
  fn list_versions(
    &self,
    person_id: PersonId,
  ) -> impl Future<Output = Result<Vec<ContentVersion>, Self::Error>> + Send + '_;

  /// Append a version. The timestamp is assigned by the store; there is no
  /// conflict detection, so the last committed version wins.
  fn save_content_version(
    &self,
    person_id: PersonId,
    content: Document,
    user_id: Option<UserId>,
  ) -> impl Future<Output = Result<ContentVersion, Self::Error>> + Send + '_;

  // ── Import ────────────────────────────────────────────────────────────

  /// Reconcile `records` against the stored persons in one transaction.
  ///
  /// Returns an error, and commits nothing, if any record's name matches
  /// more than one person.
  fn import_bulk(
    &self,
    records: Vec<ImportRecord>,
  ) -> impl Future<Output = Result<ImportStats, Self::Error>> + Send + '_;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Look a user up by the exact identity URL.
  fn get_user<'a>(
    &'a self,
    openid_url: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// Create the user, or bring its name and email up to date. Writes nothing
  /// when the stored profile already matches.
  fn get_or_update_user<'a>(
    &'a self,
    openid_url: &'a str,
    name: Option<&'a str>,
    email: Option<&'a str>,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + 'a;
}
