//! Customer and review records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    User,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Full display name: the account name when set, otherwise "First Last".
pub fn display_name(name: Option<&str>, first_name: &str, last_name: &str) -> String {
    match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(n) => n.to_string(),
        None => format!("{first_name} {last_name}").trim().to_string(),
    }
}

/// Compact reviewer name: the account name when set, otherwise "First L.".
pub fn short_name(name: Option<&str>, first_name: &str, last_name: &str) -> String {
    match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(n) => n.to_string(),
        None => match last_name.chars().next() {
            Some(initial) => format!("{first_name} {initial}."),
            None => first_name.to_string(),
        },
    }
}

pub fn initials(first_name: &str, last_name: &str) -> String {
    first_name.chars().take(1).chain(last_name.chars().take(1)).collect::<String>().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(display_name(Some("JD"), "John", "Doe"), "JD");
        assert_eq!(display_name(None, "John", "Doe"), "John Doe");
        assert_eq!(display_name(Some(" "), "John", "Doe"), "John Doe");
        assert_eq!(short_name(None, "John", "Doe"), "John D.");
        assert_eq!(short_name(None, "Cher", ""), "Cher");
        assert_eq!(initials("john", "doe"), "JD");
        assert_eq!(initials("", ""), "");
    }
}
