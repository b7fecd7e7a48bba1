//! User roles.
//!
//! Roles are stored as TEXT in the `users` table (constrained by a CHECK)
//! and travel through JWT claims and API payloads in their wire form
//! (`"ADMIN"`, `"MANAGER"`, `"USER"`).

use serde::{Deserialize, Serialize};

use crate::error::InvalidEnumValue;

/// The three access levels a user can hold. A role never changes after
/// the account is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Manager,
    User,
}

impl Role {
    /// Wire/database representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Manager => "MANAGER",
            Role::User => "USER",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "MANAGER" => Ok(Role::Manager),
            "USER" => Ok(Role::User),
            other => Err(InvalidEnumValue(format!("Unknown role: {other}"))),
        }
    }
}

// Lets sqlx `FromRow` derives decode TEXT columns via `#[sqlx(try_from = "String")]`.
impl TryFrom<String> for Role {
    type Error = InvalidEnumValue;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Admin, Role::Manager, Role::User] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert!("SUPERVISOR".parse::<Role>().is_err());
        // Wire form is case-sensitive.
        assert!("admin".parse::<Role>().is_err());
    }
}
