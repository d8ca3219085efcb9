//! Authenticated user profile

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a platform account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Teacher,
    Student,
    Demo,
}

/// Profile returned by `GET users/{username}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub username: String,
    pub role: UserRole,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// First name with only its first letter upper-cased, as used in greetings.
    pub fn display_name(&self) -> String {
        capitalize(&self.first_name)
    }
}

/// Upper-case the first character and lower-case the rest.
///
/// `"JOHN"` becomes `"John"`, `"émile"` becomes `"Émile"`.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("JOHN", "John")]
    #[case("john", "John")]
    #[case("mARIE-claire", "Marie-claire")]
    #[case("émile", "Émile")]
    #[case("a", "A")]
    #[case("", "")]
    fn test_capitalize(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(capitalize(input), expected);
    }

    #[test]
    fn test_user_deserializes_camel_case() {
        let json = r#"{
            "id": 7,
            "username": "jdoe",
            "role": "teacher",
            "firstName": "JOHN",
            "lastName": "Doe",
            "email": "jdoe@example.org",
            "createdAt": "2024-01-02T03:04:05Z",
            "updatedAt": "2024-01-02T03:04:05Z"
        }"#;

        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, UserRole::Teacher);
        assert_eq!(user.display_name(), "John");
    }
}
