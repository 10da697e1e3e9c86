//! Documents — the opaque JSON payload carried by every content version.
//!
//! A document is a JSON object. The store never looks inside one except to
//! compare it for equality during import and to overlay the person's name
//! when building the export view.

use serde_json::{Map, Value};

/// A JSON object mapping string keys to arbitrary JSON values.
pub type Document = Map<String, Value>;

/// Key under which an import stores a person's email addresses.
pub const EMAIL_KEY: &str = "email";

/// Key the export view uses for the person's name.
pub const NAME_KEY: &str = "name";

/// Build the `{"email": [...]}` document an import record maps to.
pub fn email_document(emails: &[String]) -> Document {
  let mut doc = Document::new();
  doc.insert(
    EMAIL_KEY.to_owned(),
    Value::Array(emails.iter().cloned().map(Value::String).collect()),
  );
  doc
}

/// Overlay `name` onto `content` for the export view.
///
/// The name is inserted last, so it replaces any `name` key the stored
/// document happens to carry.
pub fn with_name(mut content: Document, name: &str) -> Document {
  content.insert(NAME_KEY.to_owned(), Value::String(name.to_owned()));
  content
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn email_document_shape() {
    let doc = email_document(&["a@x.com".into(), "b@x.com".into()]);
    assert_eq!(Value::Object(doc), json!({ "email": ["a@x.com", "b@x.com"] }));
  }

  #[test]
  fn name_overrides_stored_key() {
    let Value::Object(content) = json!({ "name": "stale", "email": ["b@x.com"] })
    else {
      unreachable!()
    };

    let view = with_name(content, "Bob");
    assert_eq!(Value::Object(view), json!({ "name": "Bob", "email": ["b@x.com"] }));
  }

  #[test]
  fn key_order_does_not_affect_equality() {
    let Value::Object(a) = json!({ "email": ["a@x.com"], "note": 1 }) else {
      unreachable!()
    };
    let Value::Object(b) = json!({ "note": 1, "email": ["a@x.com"] }) else {
      unreachable!()
    };
    assert_eq!(a, b);
  }
}
