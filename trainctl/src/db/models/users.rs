//! Database models for login accounts.

use crate::types::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

/// Kind of account. Stored as snake_case text guarded by `ck_users_user_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    SuperAdmin,
    Admin,
    Trainer,
    Student,
}

impl UserType {
    pub const ALL: [UserType; 4] = [UserType::SuperAdmin, UserType::Admin, UserType::Trainer, UserType::Student];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::SuperAdmin => "super_admin",
            UserType::Admin => "admin",
            UserType::Trainer => "trainer",
            UserType::Student => "student",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown user type '{s}'"))
    }
}

/// Database request for creating a new user
#[derive(Debug, Clone)]
pub struct UserCreateDBRequest {
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub user_type: UserType,
}

/// Database request for updating a user
#[derive(Debug, Clone, Default)]
pub struct UserUpdateDBRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub user_type: Option<UserType>,
}

/// Database response for a user
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct UserDBResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub user_type: UserType,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_type_round_trip() {
        for user_type in UserType::ALL {
            assert_eq!(user_type.to_string().parse::<UserType>().unwrap(), user_type);
        }
        assert_eq!(UserType::SuperAdmin.to_string(), "super_admin");
    }

    #[test]
    fn test_user_type_rejects_unknown() {
        assert!("SuperAdmin".parse::<UserType>().is_err());
        assert!("root".parse::<UserType>().is_err());
        assert!("".parse::<UserType>().is_err());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = UserDBResponse {
            id: 7,
            name: "Trainer Bob".to_string(),
            email: "bob.trainer@acme.com".to_string(),
            password_hash: Some("$argon2id$v=19$...".to_string()),
            user_type: UserType::Trainer,
            created_at: Utc::now(),
            updated_at: None,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["user_type"], "trainer");
    }
}
