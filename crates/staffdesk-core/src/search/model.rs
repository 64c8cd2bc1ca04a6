//! Search domain models.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::directory::{Branch, Department, Employee};

/// Collection a result came from. Declaration order is merge priority.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ResultKind {
    Employee,
    Department,
    Branch,
}

/// A single, immutable search hit. Identity is `(kind, id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub kind: ResultKind,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Where the UI should navigate when this result is chosen.
    pub target_location: String,
}

impl SearchResult {
    pub fn key(&self) -> (ResultKind, &str) {
        (self.kind, self.id.as_str())
    }
}

impl From<&Employee> for SearchResult {
    fn from(employee: &Employee) -> Self {
        Self {
            id: employee.id.clone(),
            kind: ResultKind::Employee,
            title: employee.display_name(),
            subtitle: employee.subtitle(),
            target_location: format!("/employees/{}", employee.id),
        }
    }
}

impl From<&Department> for SearchResult {
    fn from(department: &Department) -> Self {
        Self {
            id: department.id.clone(),
            kind: ResultKind::Department,
            title: department.name.clone(),
            subtitle: department.description.clone().filter(|d| !d.trim().is_empty()),
            target_location: format!("/departments/{}", department.id),
        }
    }
}

impl From<&Branch> for SearchResult {
    fn from(branch: &Branch) -> Self {
        Self {
            id: branch.id.clone(),
            kind: ResultKind::Branch,
            title: branch.name.clone(),
            subtitle: branch.location(),
            target_location: format!("/branches/{}", branch.id),
        }
    }
}

/// A settled, trimmed query that is long enough to dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    text: String,
}

impl SearchQuery {
    /// Trims `raw` and returns `None` when fewer than `min_len` characters remain.
    pub fn parse(raw: &str, min_len: usize) -> Option<Self> {
        let text = raw.trim();
        if text.chars().count() < min_len {
            return None;
        }
        Some(Self {
            text: text.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Case-insensitive substring match used for restricted collections.
    pub fn matches(&self, candidate: &str) -> bool {
        candidate.to_lowercase().contains(&self.text.to_lowercase())
    }
}
