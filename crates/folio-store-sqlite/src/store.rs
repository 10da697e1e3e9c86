//! [`SqliteStore`] — the SQLite implementation of [`ContentStore`].

use std::{collections::BTreeMap, path::Path};

use rusqlite::{Connection, OptionalExtension as _};
use tracing::info;

use folio_core::{
  Document,
  document::with_name,
  import::{ImportRecord, ImportStats},
  person::{ContentVersion, Person, PersonId, VersionId},
  store::ContentStore,
  user::{User, UserId},
};

use crate::{
  encode::{
    RawVersion, decode_document, decode_document_in_call, encode_document, encode_dt, now,
    person_from_row, user_from_row,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Folio store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. Every
/// operation runs as one closure on the connection's thread, so operations
/// issued through the same handle never interleave.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Rows inserted, updated or deleted since the connection was opened.
  #[cfg(test)]
  pub(crate) async fn total_changes(&self) -> Result<i64> {
    Ok(
      self
        .conn
        .call(|conn| Ok(conn.query_row("SELECT total_changes()", [], |r| r.get(0))?))
        .await?,
    )
  }
}

// ─── Statement helpers ───────────────────────────────────────────────────────
//
// Plain functions over `&Connection` so they run unchanged inside a
// `Transaction`, which derefs to one.

fn insert_person(conn: &Connection, name: &str) -> rusqlite::Result<PersonId> {
  conn.execute("INSERT INTO person (name) VALUES (?1)", rusqlite::params![name])?;
  Ok(conn.last_insert_rowid())
}

fn query_persons_by_name(conn: &Connection, name: &str) -> rusqlite::Result<Vec<Person>> {
  let mut stmt = conn.prepare("SELECT id, name FROM person WHERE name = ?1 ORDER BY id")?;
  let persons = stmt
    .query_map(rusqlite::params![name], person_from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(persons)
}

/// Raw content of the person's newest version; later `time` wins, then
/// higher `id`.
fn query_latest_content(
  conn: &Connection,
  person_id: PersonId,
) -> rusqlite::Result<Option<Vec<u8>>> {
  conn
    .query_row(
      "SELECT content FROM content_version
       WHERE person_id = ?1
       ORDER BY time DESC, id DESC
       LIMIT 1",
      rusqlite::params![person_id],
      |r| r.get(0),
    )
    .optional()
}

fn insert_version(
  conn: &Connection,
  person_id: PersonId,
  user_id: Option<UserId>,
  content: &[u8],
  time: &str,
) -> rusqlite::Result<VersionId> {
  conn.execute(
    "INSERT INTO content_version (person_id, user_id, content, time)
     VALUES (?1, ?2, ?3, ?4)",
    rusqlite::params![person_id, user_id, content, time],
  )?;
  Ok(conn.last_insert_rowid())
}

fn query_user(conn: &Connection, openid_url: &str) -> rusqlite::Result<Option<User>> {
  conn
    .query_row(
      "SELECT id, openid_url, name, email FROM \"user\"
       WHERE openid_url = ?1
       ORDER BY id
       LIMIT 1",
      rusqlite::params![openid_url],
      user_from_row,
    )
    .optional()
}

// ─── Import plumbing ─────────────────────────────────────────────────────────

/// A row written by an import batch, logged once the batch has committed.
enum ImportEvent {
  NewPerson { person_id: PersonId, name: String },
  NewVersion { person_id: PersonId, version_id: VersionId },
}

enum ImportOutcome {
  Committed { stats: ImportStats, events: Vec<ImportEvent> },
  /// The batch was abandoned and its transaction rolled back.
  DuplicateName { name: String, matches: usize },
}

/// An import record with its candidate content already serialised.
struct PreparedRecord {
  name:      String,
  candidate: Option<(Document, Vec<u8>)>,
}

impl PreparedRecord {
  fn prepare(record: ImportRecord) -> Result<Self> {
    let candidate = record
      .candidate_content()
      .map(|doc| encode_document(&doc).map(|bytes| (doc, bytes)))
      .transpose()?;
    Ok(Self { name: record.name, candidate })
  }
}

enum UserChange {
  Created,
  Updated,
  Unchanged,
}

// ─── ContentStore impl ───────────────────────────────────────────────────────

impl ContentStore for SqliteStore {
  type Error = Error;

  // ── Persons ───────────────────────────────────────────────────────────────

  async fn add_person<'a>(&'a self, name: &'a str) -> Result<Person> {
    let name_owned = name.to_owned();

    let id = self
      .conn
      .call(move |conn| Ok(insert_person(conn, &name_owned)?))
      .await?;

    info!(person_id = id, name = %name, "new person");
    Ok(Person { id, name: name.to_owned() })
  }

  async fn get_person(&self, id: PersonId) -> Result<Option<Person>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                "SELECT id, name FROM person WHERE id = ?1",
                rusqlite::params![id],
                person_from_row,
              )
              .optional()?,
          )
        })
        .await?,
    )
  }

  async fn find_persons_by_name<'a>(&'a self, name: &'a str) -> Result<Vec<Person>> {
    let name = name.to_owned();
    Ok(
      self
        .conn
        .call(move |conn| Ok(query_persons_by_name(conn, &name)?))
        .await?,
    )
  }

  async fn list_all_persons(&self) -> Result<BTreeMap<PersonId, Document>> {
    let rows: Vec<(PersonId, String, Option<Vec<u8>>)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT
             p.id,
             p.name,
             (SELECT v.content FROM content_version v
               WHERE v.person_id = p.id
               ORDER BY v.time DESC, v.id DESC
               LIMIT 1) AS content
           FROM person p
           ORDER BY p.id",
        )?;

        let rows = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    rows
      .into_iter()
      .map(|(id, name, content)| -> Result<(PersonId, Document)> {
        let content = match content {
          Some(bytes) => decode_document(&bytes)?,
          None => Document::new(),
        };
        Ok((id, with_name(content, &name)))
      })
      .collect()
  }

  // ── Content versions ──────────────────────────────────────────────────────

  async fn get_current_content(&self, person_id: PersonId) -> Result<Document> {
    let raw = self
      .conn
      .call(move |conn| Ok(query_latest_content(conn, person_id)?))
      .await?;

    match raw {
      Some(bytes) => decode_document(&bytes),
      None => Ok(Document::new()),
    }
  }

  async fn list_versions(&self, person_id: PersonId) -> Result<Vec<ContentVersion>> {
    let raws: Vec<RawVersion> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {} FROM content_version
           WHERE person_id = ?1
           ORDER BY time DESC, id DESC",
          RawVersion::COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![person_id], RawVersion::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawVersion::into_version).collect()
  }

  async fn save_content_version(
    &self,
    person_id: PersonId,
    content: Document,
    user_id: Option<UserId>,
  ) -> Result<ContentVersion> {
    let time     = now();
    let time_str = encode_dt(time);
    let bytes    = encode_document(&content)?;

    let version_id = self
      .conn
      .call(move |conn| Ok(insert_version(conn, person_id, user_id, &bytes, &time_str)?))
      .await?;

    info!(person_id, version_id, "content update");

    Ok(ContentVersion { id: version_id, person_id, user_id, content, time })
  }

  // ── Import ────────────────────────────────────────────────────────────────

  async fn import_bulk(&self, records: Vec<ImportRecord>) -> Result<ImportStats> {
    // Every version written by one batch carries the same timestamp.
    let batch_time = encode_dt(now());
    let prepared = records
      .into_iter()
      .map(PreparedRecord::prepare)
      .collect::<Result<Vec<_>>>()?;

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut stats = ImportStats::default();
        let mut events = Vec::new();

        for PreparedRecord { name, candidate } in prepared {
          let found = query_persons_by_name(&tx, &name)?;
          let person_id = match found.as_slice() {
            [] => {
              let person_id = insert_person(&tx, &name)?;
              stats.new_person += 1;
              events.push(ImportEvent::NewPerson { person_id, name });
              person_id
            }
            [person] => person.id,
            // Dropping `tx` rolls back everything written so far.
            _ => {
              return Ok(ImportOutcome::DuplicateName { name, matches: found.len() });
            }
          };

          let Some((content, bytes)) = candidate else {
            continue;
          };

          let current = match query_latest_content(&tx, person_id)? {
            Some(raw) => decode_document_in_call(&raw)?,
            None => Document::new(),
          };

          if content != current {
            let version_id = insert_version(&tx, person_id, None, &bytes, &batch_time)?;
            stats.new_version += 1;
            events.push(ImportEvent::NewVersion { person_id, version_id });
          }
        }

        tx.commit()?;
        Ok(ImportOutcome::Committed { stats, events })
      })
      .await?;

    let (stats, events) = match outcome {
      ImportOutcome::Committed { stats, events } => (stats, events),
      ImportOutcome::DuplicateName { name, matches } => {
        return Err(Error::DuplicateName { name, matches });
      }
    };

    for event in events {
      match event {
        ImportEvent::NewPerson { person_id, name } => {
          info!(person_id, name = %name, "new person");
        }
        ImportEvent::NewVersion { person_id, version_id } => {
          info!(person_id, version_id, "content update");
        }
      }
    }

    if !stats.is_empty() {
      info!(
        new_person = stats.new_person,
        new_version = stats.new_version,
        "bulk import committed"
      );
    }

    Ok(stats)
  }

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn get_user<'a>(&'a self, openid_url: &'a str) -> Result<Option<User>> {
    let openid_url = openid_url.to_owned();
    Ok(
      self
        .conn
        .call(move |conn| Ok(query_user(conn, &openid_url)?))
        .await?,
    )
  }

  async fn get_or_update_user<'a>(
    &'a self,
    openid_url: &'a str,
    name: Option<&'a str>,
    email: Option<&'a str>,
  ) -> Result<User> {
    let openid_url = openid_url.to_owned();
    let name       = name.map(str::to_owned);
    let email      = email.map(str::to_owned);

    let (user, change) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let result = match query_user(&tx, &openid_url)? {
          None => {
            tx.execute(
              "INSERT INTO \"user\" (openid_url, name, email) VALUES (?1, ?2, ?3)",
              rusqlite::params![openid_url, name, email],
            )?;
            let user = User { id: tx.last_insert_rowid(), openid_url, name, email };
            (user, UserChange::Created)
          }
          Some(user) if user.profile_matches(name.as_deref(), email.as_deref()) => {
            (user, UserChange::Unchanged)
          }
          Some(mut user) => {
            tx.execute(
              "UPDATE \"user\" SET name = ?1, email = ?2 WHERE id = ?3",
              rusqlite::params![name, email, user.id],
            )?;
            user.name = name;
            user.email = email;
            (user, UserChange::Updated)
          }
        };

        tx.commit()?;
        Ok(result)
      })
      .await?;

    match change {
      UserChange::Created => {
        info!(user_id = user.id, openid_url = %user.openid_url, "new user");
      }
      UserChange::Updated => {
        info!(user_id = user.id, openid_url = %user.openid_url, "user data modified");
      }
      UserChange::Unchanged => {}
    }

    Ok(user)
  }
}
