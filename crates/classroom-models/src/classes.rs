//! Class and enrollment models.

use chrono::{DateTime, Utc};
use classroom_core::UserRole;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::class_code::ClassCode;
use crate::ids::{ClassId, EnrollmentId, UserId};
use crate::users::User;

/// A row of the `classes` table.
#[derive(Debug, Clone, FromRow)]
pub struct Class {
    pub id: ClassId,
    pub name: String,
    pub code: ClassCode,
    pub description: String,
    pub teacher_id: UserId,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A class joined with its teacher and enrollment count.
#[derive(Debug, Clone, FromRow)]
pub struct ClassRow {
    pub id: ClassId,
    pub name: String,
    pub code: ClassCode,
    pub description: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub student_count: i64,
    pub teacher_id: UserId,
    pub teacher_email: String,
    pub teacher_username: String,
    pub teacher_first_name: String,
    pub teacher_last_name: String,
    pub teacher_role: UserRole,
    pub teacher_created_at: DateTime<Utc>,
    pub teacher_updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClassResponse {
    pub id: ClassId,
    pub name: String,
    pub code: ClassCode,
    pub description: String,
    pub teacher: User,
    pub student_count: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<ClassRow> for ClassResponse {
    fn from(row: ClassRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            code: row.code,
            description: row.description,
            teacher: User {
                id: row.teacher_id,
                email: row.teacher_email,
                username: row.teacher_username,
                first_name: row.teacher_first_name,
                last_name: row.teacher_last_name,
                role: row.teacher_role,
                created_at: row.teacher_created_at,
                updated_at: row.teacher_updated_at,
            },
            student_count: row.student_count,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

fn trimmed<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    String::deserialize(deserializer).map(|s| s.trim().to_string())
}

fn trimmed_opt<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Option::<String>::deserialize(deserializer).map(|s| s.map(|s| s.trim().to_string()))
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank").with_message("This field may not be blank.".into()))
    } else {
        Ok(())
    }
}

/// Names are trimmed while parsing, so validation sees the stored value.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateClassDto {
    #[serde(deserialize_with = "trimmed")]
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 200, message = "Name must be between 1 and 200 characters.")
    )]
    #[schema(example = "Algorithms")]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Partial class update. Code and teacher are not accepted.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateClassDto {
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 200, message = "Name must be between 1 and 200 characters.")
    )]
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EnrollResponse {
    #[schema(example = "Successfully enrolled")]
    pub message: String,
    pub class: ClassResponse,
}

/// An enrollment joined with the enrolled student.
#[derive(Debug, Clone, FromRow)]
pub struct EnrolledStudentRow {
    pub id: EnrollmentId,
    pub enrolled_at: DateTime<Utc>,
    pub student_id: UserId,
    pub student_email: String,
    pub student_username: String,
    pub student_first_name: String,
    pub student_last_name: String,
    pub student_role: UserRole,
    pub student_created_at: DateTime<Utc>,
    pub student_updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EnrolledStudent {
    pub id: EnrollmentId,
    pub student: User,
    pub enrolled_at: DateTime<Utc>,
}

impl From<EnrolledStudentRow> for EnrolledStudent {
    fn from(row: EnrolledStudentRow) -> Self {
        Self {
            id: row.id,
            student: User {
                id: row.student_id,
                email: row.student_email,
                username: row.student_username,
                first_name: row.student_first_name,
                last_name: row.student_last_name,
                role: row.student_role,
                created_at: row.student_created_at,
                updated_at: row.student_updated_at,
            },
            enrolled_at: row.enrolled_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_row() -> ClassRow {
        let now = Utc::now();
        ClassRow {
            id: ClassId::new(),
            name: "Algorithms".to_string(),
            code: ClassCode::parse("ALG101").unwrap(),
            description: String::new(),
            is_active: true,
            created_at: now,
            student_count: 3,
            teacher_id: UserId::new(),
            teacher_email: "knuth@example.com".to_string(),
            teacher_username: "knuth".to_string(),
            teacher_first_name: "Donald".to_string(),
            teacher_last_name: "Knuth".to_string(),
            teacher_role: UserRole::Teacher,
            teacher_created_at: now,
            teacher_updated_at: now,
        }
    }

    #[test]
    fn test_class_response_shape() {
        let response = ClassResponse::from(sample_row());
        let value = serde_json::to_value(&response).unwrap();
        let mut keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(
            keys,
            vec![
                "code",
                "created_at",
                "description",
                "id",
                "is_active",
                "name",
                "student_count",
                "teacher"
            ]
        );
        assert_eq!(value["teacher"]["username"], "knuth");
        assert_eq!(value["code"], "ALG101");
    }

    #[test]
    fn test_create_class_validation() {
        let dto: CreateClassDto = serde_json::from_value(json!({ "name": "Algorithms" })).unwrap();
        assert!(dto.validate().is_ok());
        assert_eq!(dto.description, "");

        let empty: CreateClassDto = serde_json::from_value(json!({ "name": "" })).unwrap();
        assert!(empty.validate().is_err());

        let long: CreateClassDto =
            serde_json::from_value(json!({ "name": "x".repeat(201) })).unwrap();
        assert!(long.validate().is_err());
    }

    #[test]
    fn test_class_name_is_trimmed_before_validation() {
        let dto: CreateClassDto =
            serde_json::from_value(json!({ "name": "  Compilers \n" })).unwrap();
        assert_eq!(dto.name, "Compilers");
        assert!(dto.validate().is_ok());

        let blank: CreateClassDto = serde_json::from_value(json!({ "name": "   " })).unwrap();
        assert_eq!(blank.name, "");
        let errors = blank.validate().unwrap_err();
        let name_errors = &errors.field_errors()["name"];
        assert_eq!(
            name_errors[0].message.as_deref(),
            Some("This field may not be blank.")
        );

        let padded: CreateClassDto =
            serde_json::from_value(json!({ "name": format!("  {}  ", "x".repeat(200)) })).unwrap();
        assert!(padded.validate().is_ok());
    }

    #[test]
    fn test_update_rejects_blank_name_but_allows_absent_name() {
        let blank: UpdateClassDto = serde_json::from_value(json!({ "name": " \t " })).unwrap();
        assert_eq!(blank.name.as_deref(), Some(""));
        assert!(blank.validate().is_err());

        let absent: UpdateClassDto =
            serde_json::from_value(json!({ "description": "Graphs" })).unwrap();
        assert!(absent.name.is_none());
        assert!(absent.validate().is_ok());

        let renamed: UpdateClassDto =
            serde_json::from_value(json!({ "name": " Databases " })).unwrap();
        assert_eq!(renamed.name.as_deref(), Some("Databases"));
    }

    #[test]
    fn test_update_class_ignores_read_only_fields() {
        let dto: UpdateClassDto = serde_json::from_value(json!({
            "is_active": false,
            "code": "ZZZZZZ",
            "teacher": "someone"
        }))
        .unwrap();
        assert_eq!(dto.is_active, Some(false));
        assert!(dto.name.is_none());
    }
}
