//! Back-office user (manager account) entity.

use serde::{Deserialize, Serialize};

use crate::domain::serde_utils::lenient_u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(#[serde(with = "lenient_u64")] pub u64);

impl UserId {
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for UserId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Account role as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access, including manager administration.
    SuperManager,
    /// Regular sales manager.
    #[default]
    Manager,
    /// Any role this client does not know about.
    #[serde(other)]
    Unknown,
}

impl Role {
    /// Wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SuperManager => "super_manager",
            Self::Manager => "manager",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "super_manager" => Ok(Self::SuperManager),
            "manager" => Ok(Self::Manager),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// Authenticated back-office user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    username: String,
    #[serde(default)]
    role: Role,
}

impl User {
    #[must_use]
    pub fn new(id: impl Into<UserId>, username: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            role,
        }
    }

    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Whether the user may administer manager accounts.
    #[must_use]
    pub const fn is_super_manager(&self) -> bool {
        matches!(self.role, Role::SuperManager)
    }

    /// Whether the user may work with the catalog and leads.
    #[must_use]
    pub const fn is_manager(&self) -> bool {
        matches!(self.role, Role::Manager | Role::SuperManager)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(r#""super_manager""#, Role::SuperManager ; "super_manager")]
    #[test_case(r#""manager""#, Role::Manager ; "manager")]
    #[test_case(r#""auditor""#, Role::Unknown ; "unknown_role")]
    fn test_role_from_wire(json: &str, expected: Role) {
        let role: Role = serde_json::from_str(json).unwrap();
        assert_eq!(role, expected);
    }

    #[test]
    fn test_user_from_backend_payload() {
        let payload = r#"{"id": "1", "username": "main_manager", "role": "super_manager"}"#;
        let user: User = serde_json::from_str(payload).unwrap();

        assert_eq!(user.id(), UserId(1));
        assert_eq!(user.username(), "main_manager");
        assert!(user.is_super_manager());
        assert!(user.is_manager());
    }

    #[test]
    fn test_manager_is_not_super_manager() {
        let user = User::new(2, "manager", Role::Manager);
        assert!(!user.is_super_manager());
        assert!(user.is_manager());
    }

    #[test]
    fn test_unknown_role_has_no_privileges() {
        let user = User::new(3, "guest", Role::Unknown);
        assert!(!user.is_manager());
    }

    #[test]
    fn test_missing_role_defaults_to_manager() {
        let user: User = serde_json::from_str(r#"{"id": 4, "username": "anna"}"#).unwrap();
        assert_eq!(user.role(), Role::Manager);
    }
}
