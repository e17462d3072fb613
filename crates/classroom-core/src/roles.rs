//! User roles.
//!
//! Every account has exactly one role from a closed set. The role is chosen
//! at registration and never changes afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Creates and manages classes.
    Teacher,
    /// Joins classes with a class code.
    Student,
    /// No class visibility; may only use detection tooling.
    #[default]
    Guest,
}

impl UserRole {
    pub const ALL: [UserRole; 3] = [UserRole::Teacher, UserRole::Student, UserRole::Guest];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Teacher => "teacher",
            UserRole::Student => "student",
            UserRole::Guest => "guest",
        }
    }

    pub fn is_teacher(&self) -> bool {
        *self == UserRole::Teacher
    }

    pub fn is_student(&self) -> bool {
        *self == UserRole::Student
    }

    pub fn is_guest(&self) -> bool {
        *self == UserRole::Guest
    }

    pub fn can_create_class(&self) -> bool {
        self.is_teacher()
    }

    pub fn can_join_class(&self) -> bool {
        self.is_student()
    }

    pub fn can_use_detection(&self) -> bool {
        self.is_guest()
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "teacher" => Ok(UserRole::Teacher),
            "student" => Ok(UserRole::Student),
            "guest" => Ok(UserRole::Guest),
            other => Err(format!("Invalid role: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_follow_role() {
        assert!(UserRole::Teacher.can_create_class());
        assert!(!UserRole::Teacher.can_join_class());
        assert!(UserRole::Student.can_join_class());
        assert!(!UserRole::Student.can_create_class());
        assert!(UserRole::Guest.can_use_detection());
        assert!(!UserRole::Guest.can_create_class());
        assert!(!UserRole::Guest.can_join_class());
    }

    #[test]
    fn test_default_is_guest() {
        assert_eq!(UserRole::default(), UserRole::Guest);
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&UserRole::Teacher).unwrap(), r#""teacher""#);
        let role: UserRole = serde_json::from_str(r#""student""#).unwrap();
        assert_eq!(role, UserRole::Student);
        assert!(serde_json::from_str::<UserRole>(r#""admin""#).is_err());
    }

    #[test]
    fn test_from_str_roundtrips_display() {
        for role in UserRole::ALL {
            assert_eq!(role.to_string().parse::<UserRole>().unwrap(), role);
        }
        assert!("principal".parse::<UserRole>().is_err());
    }
}
