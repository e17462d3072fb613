use sqlx::PgPool;
use tracing::{debug, error, info, instrument, warn};

use classroom_core::{AppError, UserRole, owns};
use classroom_db::{is_foreign_key_violation, is_unique_violation, violated_constraint};
use classroom_models::{
    Class, ClassCode, ClassId, ClassResponse, ClassRow, CreateClassDto, EnrollResponse,
    EnrolledStudent, EnrolledStudentRow, UpdateClassDto, UserId,
};

use crate::metrics;

/// Attempts at finding an unused class code before giving up.
pub const MAX_CODE_ATTEMPTS: usize = 5;

const CLASS_CODE_CONSTRAINT: &str = "classes_code_key";

const CLASS_SELECT: &str = "SELECT c.id, c.name, c.code, c.description, c.is_active, c.created_at,
        (SELECT COUNT(*) FROM enrollments e WHERE e.class_id = c.id) AS student_count,
        u.id AS teacher_id, u.email AS teacher_email, u.username AS teacher_username,
        u.first_name AS teacher_first_name, u.last_name AS teacher_last_name,
        u.role AS teacher_role, u.created_at AS teacher_created_at,
        u.updated_at AS teacher_updated_at
    FROM classes c
    JOIN users u ON u.id = c.teacher_id";

/// Restricts [`CLASS_SELECT`] to the classes `$1` may see.
fn visibility_filter(role: UserRole) -> Option<&'static str> {
    match role {
        UserRole::Teacher => Some("c.teacher_id = $1"),
        UserRole::Student => Some(
            "EXISTS (SELECT 1 FROM enrollments e WHERE e.class_id = c.id AND e.student_id = $1)",
        ),
        UserRole::Guest => None,
    }
}

fn class_not_found() -> AppError {
    AppError::not_found("Class not found")
}

fn invalid_code() -> AppError {
    AppError::validation("code", vec!["Invalid code".to_string()])
}

/// Malformed ids are indistinguishable from unknown ones.
pub fn parse_class_id(raw: &str) -> Result<ClassId, AppError> {
    raw.parse::<ClassId>().map_err(|_| class_not_found())
}

fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> AppError {
    move |e| {
        error!(error = %e, "{}", context);
        AppError::database(e)
    }
}

pub struct ClassService;

impl ClassService {
    /// Inserts a class under a fresh code, retrying on code collisions.
    #[instrument(skip(db, dto), fields(class.name = %dto.name, db.operation = "INSERT", db.table = "classes"))]
    pub async fn create(
        db: &PgPool,
        teacher_id: UserId,
        dto: CreateClassDto,
    ) -> Result<ClassResponse, AppError> {
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = ClassCode::generate();

            let result = sqlx::query_as::<_, Class>(
                "INSERT INTO classes (name, code, description, teacher_id)
                 VALUES ($1, $2, $3, $4)
                 RETURNING id, name, code, description, teacher_id, is_active, created_at, updated_at",
            )
            .bind(&dto.name)
            .bind(&code)
            .bind(&dto.description)
            .bind(teacher_id)
            .fetch_one(db)
            .await;

            match result {
                Ok(class) => {
                    metrics::track_class_created();
                    info!(class.id = %class.id, class.code = %class.code, attempt, "Class created");
                    return Self::find_owned(db, teacher_id, class.id).await;
                }
                Err(e)
                    if is_unique_violation(&e)
                        && violated_constraint(&e) == Some(CLASS_CODE_CONSTRAINT) =>
                {
                    metrics::track_class_code_collision();
                    warn!(class.code = %code, attempt, "Class code collision, regenerating");
                }
                Err(e) => return Err(db_error("Database error creating class")(e)),
            }
        }

        error!(attempts = MAX_CODE_ATTEMPTS, "Could not allocate a unique class code");
        Err(AppError::service_unavailable(
            "Could not allocate a unique class code, please retry",
        ))
    }

    /// Teachers see the classes they own, students the classes they are
    /// enrolled in, guests nothing.
    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "classes"))]
    pub async fn list(
        db: &PgPool,
        caller_id: UserId,
        role: UserRole,
    ) -> Result<Vec<ClassResponse>, AppError> {
        let Some(filter) = visibility_filter(role) else {
            debug!("Guest class list is always empty");
            return Ok(Vec::new());
        };

        let rows = sqlx::query_as::<_, ClassRow>(&format!(
            "{CLASS_SELECT} WHERE {filter} ORDER BY c.created_at DESC"
        ))
        .bind(caller_id)
        .fetch_all(db)
        .await
        .map_err(db_error("Database error listing classes"))?;

        Ok(rows.into_iter().map(ClassResponse::from).collect())
    }

    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "classes"))]
    pub async fn retrieve(
        db: &PgPool,
        caller_id: UserId,
        role: UserRole,
        class_id: ClassId,
    ) -> Result<ClassResponse, AppError> {
        let filter = visibility_filter(role).ok_or_else(class_not_found)?;

        sqlx::query_as::<_, ClassRow>(&format!("{CLASS_SELECT} WHERE {filter} AND c.id = $2"))
            .bind(caller_id)
            .bind(class_id)
            .fetch_optional(db)
            .await
            .map_err(db_error("Database error fetching class"))?
            .map(ClassResponse::from)
            .ok_or_else(class_not_found)
    }

    async fn find_owned(
        db: &PgPool,
        teacher_id: UserId,
        class_id: ClassId,
    ) -> Result<ClassResponse, AppError> {
        Self::retrieve(db, teacher_id, UserRole::Teacher, class_id).await
    }

    /// Applies the fields present in `dto`. Code and teacher never change.
    #[instrument(skip(db, dto), fields(db.operation = "UPDATE", db.table = "classes"))]
    pub async fn update(
        db: &PgPool,
        teacher_id: UserId,
        class_id: ClassId,
        dto: UpdateClassDto,
    ) -> Result<ClassResponse, AppError> {
        let updated = sqlx::query_scalar::<_, ClassId>(
            "UPDATE classes SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                is_active = COALESCE($5, is_active),
                updated_at = NOW()
             WHERE id = $1 AND teacher_id = $2
             RETURNING id",
        )
        .bind(class_id)
        .bind(teacher_id)
        .bind(dto.name.as_deref())
        .bind(dto.description.as_deref())
        .bind(dto.is_active)
        .fetch_optional(db)
        .await
        .map_err(db_error("Database error updating class"))?
        .ok_or_else(class_not_found)?;

        info!(class.id = %updated, "Class updated");
        Self::find_owned(db, teacher_id, updated).await
    }

    #[instrument(skip(db), fields(db.operation = "DELETE", db.table = "classes"))]
    pub async fn delete(db: &PgPool, teacher_id: UserId, class_id: ClassId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM classes WHERE id = $1 AND teacher_id = $2")
            .bind(class_id)
            .bind(teacher_id)
            .execute(db)
            .await
            .map_err(db_error("Database error deleting class"))?;

        if result.rows_affected() == 0 {
            return Err(class_not_found());
        }

        info!(class.id = %class_id, "Class deleted");
        Ok(())
    }

    /// Enrolls `student_id` in the active class with `raw_code`.
    ///
    /// Duplicate enrollments are rejected by the `(student_id, class_id)`
    /// unique constraint, so concurrent attempts insert at most one row.
    #[instrument(skip(db), fields(db.operation = "INSERT", db.table = "enrollments"))]
    pub async fn enroll_by_code(
        db: &PgPool,
        student_id: UserId,
        raw_code: &str,
    ) -> Result<EnrollResponse, AppError> {
        let code = ClassCode::parse(raw_code).map_err(|_| {
            metrics::track_enrollment("invalid_code");
            invalid_code()
        })?;

        let class_id = sqlx::query_scalar::<_, ClassId>(
            "SELECT id FROM classes WHERE code = $1 AND is_active",
        )
        .bind(&code)
        .fetch_optional(db)
        .await
        .map_err(db_error("Database error looking up class code"))?
        .ok_or_else(|| {
            metrics::track_enrollment("invalid_code");
            invalid_code()
        })?;

        sqlx::query("INSERT INTO enrollments (student_id, class_id) VALUES ($1, $2)")
            .bind(student_id)
            .bind(class_id)
            .execute(db)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    metrics::track_enrollment("duplicate");
                    AppError::conflict("Already enrolled")
                } else if is_foreign_key_violation(&e) {
                    // The class was deleted between lookup and insert.
                    metrics::track_enrollment("invalid_code");
                    invalid_code()
                } else {
                    db_error("Database error creating enrollment")(e)
                }
            })?;

        metrics::track_enrollment("enrolled");
        info!(class.id = %class_id, student.id = %student_id, "Student enrolled");

        let class = Self::retrieve(db, student_id, UserRole::Student, class_id).await?;
        Ok(EnrollResponse {
            message: "Successfully enrolled".to_string(),
            class,
        })
    }

    /// Enrollments of a class owned by `teacher_id`, newest first.
    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "enrollments"))]
    pub async fn list_students(
        db: &PgPool,
        teacher_id: UserId,
        class_id: ClassId,
    ) -> Result<Vec<EnrolledStudent>, AppError> {
        let owner = sqlx::query_scalar::<_, UserId>("SELECT teacher_id FROM classes WHERE id = $1")
            .bind(class_id)
            .fetch_optional(db)
            .await
            .map_err(db_error("Database error checking class ownership"))?
            .ok_or_else(class_not_found)?;

        // Another teacher's class is reported exactly like a missing one.
        if !owns(&teacher_id, &owner) {
            return Err(class_not_found());
        }

        let rows = sqlx::query_as::<_, EnrolledStudentRow>(
            "SELECT e.id, e.enrolled_at,
                    u.id AS student_id, u.email AS student_email,
                    u.username AS student_username, u.first_name AS student_first_name,
                    u.last_name AS student_last_name, u.role AS student_role,
                    u.created_at AS student_created_at, u.updated_at AS student_updated_at
             FROM enrollments e
             JOIN users u ON u.id = e.student_id
             WHERE e.class_id = $1
             ORDER BY e.enrolled_at DESC",
        )
        .bind(class_id)
        .fetch_all(db)
        .await
        .map_err(db_error("Database error listing enrolled students"))?;

        Ok(rows.into_iter().map(EnrolledStudent::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guests_have_no_visibility() {
        assert!(visibility_filter(UserRole::Guest).is_none());
        assert!(visibility_filter(UserRole::Teacher).is_some());
        assert!(visibility_filter(UserRole::Student).is_some());
    }

    #[test]
    fn test_malformed_class_id_is_not_found() {
        let err = parse_class_id("not-a-uuid").unwrap_err();
        assert_eq!(err.status.as_u16(), 404);
        assert_eq!(err.public_message(), "Class not found");
    }

    #[test]
    fn test_parse_class_id_accepts_uuid() {
        let id = ClassId::new();
        assert_eq!(parse_class_id(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn test_invalid_code_error_shape() {
        let err = invalid_code();
        assert_eq!(err.status.as_u16(), 400);
        assert_eq!(err.public_message(), "Invalid code");
        assert!(err.details.unwrap().contains_key("code"));
    }
}
