use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use classroom_core::AppError;
use classroom_models::{
    ClassResponse, CreateClassDto, EnrollResponse, EnrolledStudent, UpdateClassDto,
};

use crate::middleware::auth::{
    RequireCreateClass, RequireDestroyClass, RequireEnrollByCode, RequireListClasses,
    RequireListEnrolledStudents, RequirePartialUpdateClass, RequireRetrieveClass,
    RequireUpdateClass,
};
use crate::modules::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::{ClassService, parse_class_id};

/// List the classes visible to the caller
///
/// Teachers get the classes they own, students the classes they are
/// enrolled in. Guests always get an empty list.
#[utoipa::path(
    get,
    path = "/api/classes/",
    responses(
        (status = 200, description = "Visible classes, newest first", body = Vec<ClassResponse>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
#[instrument(skip(state))]
pub async fn list_classes(
    State(state): State<AppState>,
    RequireListClasses(auth_user): RequireListClasses,
) -> Result<Json<Vec<ClassResponse>>, AppError> {
    let classes =
        ClassService::list(&state.db, auth_user.user_id()?, auth_user.role()).await?;
    Ok(Json(classes))
}

/// Create a class with a freshly generated join code
#[utoipa::path(
    post,
    path = "/api/classes/",
    request_body = CreateClassDto,
    responses(
        (status = 201, description = "Class created", body = ClassResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not a teacher", body = ErrorResponse),
        (status = 503, description = "No unused class code could be allocated", body = ErrorResponse),
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
#[instrument(skip(state, dto))]
pub async fn create_class(
    State(state): State<AppState>,
    RequireCreateClass(auth_user): RequireCreateClass,
    ValidatedJson(dto): ValidatedJson<CreateClassDto>,
) -> Result<(StatusCode, Json<ClassResponse>), AppError> {
    let class = ClassService::create(&state.db, auth_user.user_id()?, dto).await?;
    Ok((StatusCode::CREATED, Json(class)))
}

#[utoipa::path(
    get,
    path = "/api/classes/{id}/",
    params(("id" = String, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Class", body = ClassResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Class not found or not visible", body = ErrorResponse),
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
#[instrument(skip(state))]
pub async fn get_class(
    State(state): State<AppState>,
    RequireRetrieveClass(auth_user): RequireRetrieveClass,
    Path(id): Path<String>,
) -> Result<Json<ClassResponse>, AppError> {
    let class_id = parse_class_id(&id)?;
    let class =
        ClassService::retrieve(&state.db, auth_user.user_id()?, auth_user.role(), class_id)
            .await?;
    Ok(Json(class))
}

/// Update a class you own
///
/// Only the fields sent are changed. The code and teacher are read-only.
#[utoipa::path(
    put,
    path = "/api/classes/{id}/",
    params(("id" = String, Path, description = "Class ID")),
    request_body = UpdateClassDto,
    responses(
        (status = 200, description = "Updated class", body = ClassResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not a teacher", body = ErrorResponse),
        (status = 404, description = "Class not found or not owned", body = ErrorResponse),
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
#[instrument(skip(state, dto))]
pub async fn update_class(
    State(state): State<AppState>,
    RequireUpdateClass(auth_user): RequireUpdateClass,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateClassDto>,
) -> Result<Json<ClassResponse>, AppError> {
    let class_id = parse_class_id(&id)?;
    let class = ClassService::update(&state.db, auth_user.user_id()?, class_id, dto).await?;
    Ok(Json(class))
}

/// Partially update a class you own
#[utoipa::path(
    patch,
    path = "/api/classes/{id}/",
    params(("id" = String, Path, description = "Class ID")),
    request_body = UpdateClassDto,
    responses(
        (status = 200, description = "Updated class", body = ClassResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not a teacher", body = ErrorResponse),
        (status = 404, description = "Class not found or not owned", body = ErrorResponse),
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
#[instrument(skip(state, dto))]
pub async fn partial_update_class(
    State(state): State<AppState>,
    RequirePartialUpdateClass(auth_user): RequirePartialUpdateClass,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateClassDto>,
) -> Result<Json<ClassResponse>, AppError> {
    let class_id = parse_class_id(&id)?;
    let class = ClassService::update(&state.db, auth_user.user_id()?, class_id, dto).await?;
    Ok(Json(class))
}

#[utoipa::path(
    delete,
    path = "/api/classes/{id}/",
    params(("id" = String, Path, description = "Class ID")),
    responses(
        (status = 204, description = "Class deleted"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not a teacher", body = ErrorResponse),
        (status = 404, description = "Class not found or not owned", body = ErrorResponse),
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
#[instrument(skip(state))]
pub async fn delete_class(
    State(state): State<AppState>,
    RequireDestroyClass(auth_user): RequireDestroyClass,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let class_id = parse_class_id(&id)?;
    ClassService::delete(&state.db, auth_user.user_id()?, class_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Join a class using its code
///
/// The code is case-insensitive.
#[utoipa::path(
    post,
    path = "/api/classes/{code}/enroll/",
    params(("code" = String, Path, description = "Six-character class code")),
    responses(
        (status = 200, description = "Enrolled", body = EnrollResponse),
        (status = 400, description = "Invalid code or already enrolled", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not a student", body = ErrorResponse),
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
#[instrument(skip(state))]
pub async fn enroll(
    State(state): State<AppState>,
    RequireEnrollByCode(auth_user): RequireEnrollByCode,
    Path(code): Path<String>,
) -> Result<Json<EnrollResponse>, AppError> {
    let response = ClassService::enroll_by_code(&state.db, auth_user.user_id()?, &code).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/classes/{id}/students/",
    params(("id" = String, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Enrollments, newest first", body = Vec<EnrolledStudent>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not a teacher", body = ErrorResponse),
        (status = 404, description = "Class not found or not owned", body = ErrorResponse),
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
#[instrument(skip(state))]
pub async fn list_students(
    State(state): State<AppState>,
    RequireListEnrolledStudents(auth_user): RequireListEnrolledStudents,
    Path(id): Path<String>,
) -> Result<Json<Vec<EnrolledStudent>>, AppError> {
    let class_id = parse_class_id(&id)?;
    let students = ClassService::list_students(&state.db, auth_user.user_id()?, class_id).await?;
    Ok(Json(students))
}
