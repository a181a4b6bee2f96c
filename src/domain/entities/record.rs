//! Entity kinds and their opaque row representation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Collections exposed by the back-office REST backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Construction projects (new builds).
    Projects,
    Houses,
    /// Package deals bundling a house with extras.
    Packages,
    Clients,
    /// Incoming leads.
    Applications,
    /// Manager accounts.
    Users,
}

impl EntityKind {
    /// Every kind, in menu order.
    pub const ALL: [Self; 6] = [
        Self::Projects,
        Self::Houses,
        Self::Packages,
        Self::Clients,
        Self::Applications,
        Self::Users,
    ];

    /// Collection path relative to the API base URL.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Projects => "projects",
            Self::Houses => "houses",
            Self::Packages => "packages",
            Self::Clients => "clients",
            Self::Applications => "applications",
            Self::Users => "users",
        }
    }

    /// Singular label used in messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Projects => "project",
            Self::Houses => "house",
            Self::Packages => "package",
            Self::Clients => "client",
            Self::Applications => "application",
            Self::Users => "manager",
        }
    }

    /// Path of a single row of this kind.
    #[must_use]
    pub fn item_path(self, id: &EntityId) -> String {
        format!("{}/{id}", self.path())
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "projects" | "project" => Ok(Self::Projects),
            "houses" | "house" => Ok(Self::Houses),
            "packages" | "package" => Ok(Self::Packages),
            "clients" | "client" => Ok(Self::Clients),
            "applications" | "application" | "leads" => Ok(Self::Applications),
            "users" | "managers" | "manager" => Ok(Self::Users),
            other => Err(format!("unknown entity kind '{other}'")),
        }
    }
}

/// Identifier of a row; the backend uses numbers, routes take strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityId(String);

impl EntityId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for EntityId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.trim().to_string())
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl FromStr for EntityId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.contains('/') {
            return Err(format!("invalid id '{s}'"));
        }
        Ok(Self(trimmed.to_string()))
    }
}

/// A single row of any entity kind, kept as the backend sent it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    #[must_use]
    pub const fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Row identifier, when the row carries one.
    #[must_use]
    pub fn id(&self) -> Option<EntityId> {
        match self.0.get("id")? {
            Value::Number(n) => n.as_u64().map(EntityId::from),
            Value::String(s) if !s.is_empty() => Some(EntityId::from(s.as_str())),
            _ => None,
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String field, skipping nulls and empty strings.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}
