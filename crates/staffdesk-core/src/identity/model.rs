//! Identity domain model.
//!
//! An `Identity` is fetched from the backend and replaced wholesale on every
//! verification; nothing mutates it field by field.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// The authenticated user as reported by the identity endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "role")]
    pub roles: RoleSet,
    /// Opaque employee record attached to the account, if any.
    #[serde(default, alias = "employee", skip_serializing_if = "Option::is_none")]
    pub profile: Option<Value>,
}

impl Identity {
    pub fn has_role(&self, name: &str) -> bool {
        self.roles.contains(name)
    }
}

/// Case-insensitive set of role names.
///
/// The backend sends roles either as plain strings, as objects with a
/// `name` field, or as a single string; all three deserialize here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RoleSet(BTreeSet<String>);

impl RoleSet {
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            roles
                .into_iter()
                .map(|r| r.as_ref().trim().to_lowercase())
                .filter(|r| !r.is_empty())
                .collect(),
        )
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(&name.trim().to_lowercase())
    }

    /// True if any of `names` is held.
    pub fn intersects<S: AsRef<str>>(&self, names: &[S]) -> bool {
        names.iter().any(|n| self.contains(n.as_ref()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<'de> Deserialize<'de> for RoleSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RoleEntry {
            Name(String),
            Object { name: String },
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RolesWire {
            Many(Vec<RoleEntry>),
            One(String),
            Null(()),
        }

        let names = match RolesWire::deserialize(deserializer)? {
            RolesWire::Many(entries) => entries
                .into_iter()
                .map(|e| match e {
                    RoleEntry::Name(n) => n,
                    RoleEntry::Object { name } => name,
                })
                .collect(),
            RolesWire::One(name) => vec![name],
            RolesWire::Null(()) => Vec::new(),
        };

        Ok(RoleSet::new(names))
    }
}

/// Accepts numeric or string identifiers and normalizes them to a string.
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identity_with_string_roles() {
        let identity: Identity = serde_json::from_value(json!({
            "id": 7,
            "email": "jo@example.com",
            "roles": ["Admin", "employee"],
            "employee": { "first_name": "Jo" }
        }))
        .unwrap();

        assert_eq!(identity.id, "7");
        assert!(identity.has_role("admin"));
        assert!(identity.has_role("EMPLOYEE"));
        assert!(!identity.has_role("hr"));
        assert_eq!(identity.profile.unwrap()["first_name"], "Jo");
    }

    #[test]
    fn test_identity_with_object_roles() {
        let identity: Identity = serde_json::from_value(json!({
            "id": "u-1",
            "email": "hr@example.com",
            "roles": [{ "name": "hr" }, { "name": "manager" }]
        }))
        .unwrap();

        assert_eq!(identity.roles.len(), 2);
        assert!(identity.roles.intersects(&["admin", "hr"]));
    }

    #[test]
    fn test_identity_with_single_role_field() {
        let identity: Identity = serde_json::from_value(json!({
            "id": 3,
            "email": "a@example.com",
            "role": "admin"
        }))
        .unwrap();

        assert!(identity.has_role("admin"));
        assert!(identity.profile.is_none());
    }

    #[test]
    fn test_missing_roles_is_empty() {
        let identity: Identity =
            serde_json::from_value(json!({ "id": 1, "email": "x@example.com" })).unwrap();
        assert!(identity.roles.is_empty());

        let null_roles: Identity =
            serde_json::from_value(json!({ "id": 1, "roles": null })).unwrap();
        assert!(null_roles.roles.is_empty());
    }

    #[test]
    fn test_rejects_object_id() {
        let result: Result<Identity, _> = serde_json::from_value(json!({ "id": { "x": 1 } }));
        assert!(result.is_err());
    }
}
