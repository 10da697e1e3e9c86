//! Users — the identities edits are attributed to.
//!
//! A user is keyed by the URL issued by an external OpenID-style provider.
//! The store trusts that the caller already verified that identity.

use serde::{Deserialize, Serialize};

/// Surrogate key of a `user` row.
pub type UserId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id:         UserId,
  pub openid_url: String,
  pub name:       Option<String>,
  pub email:      Option<String>,
}

impl User {
  /// Whether the stored profile already equals `(name, email)`.
  pub fn profile_matches(&self, name: Option<&str>, email: Option<&str>) -> bool {
    self.name.as_deref() == name && self.email.as_deref() == email
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn alice() -> User {
    User {
      id:         1,
      openid_url: "https://id.example.com/alice".into(),
      name:       Some("Alice".into()),
      email:      Some("alice@example.com".into()),
    }
  }

  #[test]
  fn profile_matches_identical() {
    assert!(alice().profile_matches(Some("Alice"), Some("alice@example.com")));
  }

  #[test]
  fn profile_differs_on_either_field() {
    let user = alice();
    assert!(!user.profile_matches(Some("Alice L."), Some("alice@example.com")));
    assert!(!user.profile_matches(Some("Alice"), None));
  }
}
