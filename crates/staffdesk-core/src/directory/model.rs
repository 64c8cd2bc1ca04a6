//! Directory records.
//!
//! The backend is loose about optional fields, so everything except the id
//! is optional and display helpers pick the best available text.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::identity::deserialize_id;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    /// Either a department name or an embedded department object.
    #[serde(default)]
    pub department: Option<Value>,
}

impl Employee {
    /// "First Last", falling back to `name`, then `email`, then the id.
    pub fn display_name(&self) -> String {
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !full.is_empty() {
            return full;
        }
        non_empty(self.name.as_deref())
            .or_else(|| non_empty(self.email.as_deref()))
            .map(str::to_string)
            .unwrap_or_else(|| format!("Employee {}", self.id))
    }

    pub fn department_name(&self) -> Option<&str> {
        match self.department.as_ref()? {
            Value::String(s) => non_empty(Some(s)),
            Value::Object(map) => non_empty(map.get("name").and_then(Value::as_str)),
            _ => None,
        }
    }

    /// Position if known, otherwise the department name.
    pub fn subtitle(&self) -> Option<String> {
        non_empty(self.position.as_deref())
            .or_else(|| self.department_name())
            .map(str::to_string)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

impl Branch {
    pub fn location(&self) -> Option<String> {
        non_empty(self.address.as_deref())
            .or_else(|| non_empty(self.city.as_deref()))
            .map(str::to_string)
    }
}

/// `null` and a missing field both read as an empty name.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}
