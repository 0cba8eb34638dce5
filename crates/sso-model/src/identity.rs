//! Remote identity returned by the identity provider.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Profile of the authenticated user as reported by the identity provider.
///
/// Deserializes directly from an OpenID Connect userinfo document. Claims
/// other than `email`, `given_name` and `family_name` are kept in
/// [`RemoteIdentity::attributes`]. Missing or `null` names become empty
/// strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteIdentity {
    /// Email address.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    /// Given (first) name.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub given_name: String,
    /// Family (last) name.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub family_name: String,
    /// All remaining claims.
    #[serde(flatten)]
    pub attributes: HashMap<String, serde_json::Value>,
}

impl RemoteIdentity {
    /// Creates an identity with the given email and no names.
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Self::default()
        }
    }

    /// Sets the given and family names.
    #[must_use]
    pub fn with_names(mut self, given: impl Into<String>, family: impl Into<String>) -> Self {
        self.given_name = given.into();
        self.family_name = family.into();
        self
    }

    /// Checks whether the identity carries an email.
    ///
    /// Only an empty value counts as missing; the email is otherwise used
    /// verbatim.
    #[must_use]
    pub fn has_email(&self) -> bool {
        !self.email.is_empty()
    }

    /// Gets an extra claim as a string.
    #[must_use]
    pub fn attribute_str(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).and_then(serde_json::Value::as_str)
    }

    /// The provider's subject identifier, if present.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.attribute_str("sub")
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_userinfo_document() {
        let json = r#"{
            "sub": "f7c1a0e2",
            "email": "agent@example.com",
            "email_verified": true,
            "given_name": "Ada",
            "family_name": "Lovelace",
            "locale": "de"
        }"#;

        let identity: RemoteIdentity = serde_json::from_str(json).unwrap();

        assert_eq!(identity.email, "agent@example.com");
        assert_eq!(identity.given_name, "Ada");
        assert_eq!(identity.family_name, "Lovelace");
        assert_eq!(identity.subject(), Some("f7c1a0e2"));
        assert_eq!(identity.attribute_str("locale"), Some("de"));
        assert!(!identity.attributes.contains_key("email"));
    }

    #[test]
    fn missing_and_null_fields_become_empty() {
        let identity: RemoteIdentity =
            serde_json::from_str(r#"{"sub": "x", "email": null}"#).unwrap();

        assert_eq!(identity.email, "");
        assert_eq!(identity.given_name, "");
        assert!(!identity.has_email());
    }

    #[test]
    fn only_empty_email_is_missing() {
        assert!(!RemoteIdentity::new("").has_email());
        assert!(RemoteIdentity::new("  ").has_email());
        assert!(RemoteIdentity::new("a@b.com").has_email());
    }
}
