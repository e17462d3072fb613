use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use classroom_core::UserRole;
use classroom_models::{
    AuthResponse, ClassResponse, CreateClassDto, EnrollResponse, EnrolledStudent, HealthResponse,
    LoginRequest, RefreshTokenRequest, RefreshTokenResponse, RegisterRequestDto, TokenPair,
    UpdateClassDto, UpdateProfileDto, User,
};

use crate::modules::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::refresh_token,
        crate::modules::users::controller::get_profile,
        crate::modules::users::controller::update_profile,
        crate::modules::classes::controller::list_classes,
        crate::modules::classes::controller::create_class,
        crate::modules::classes::controller::get_class,
        crate::modules::classes::controller::update_class,
        crate::modules::classes::controller::partial_update_class,
        crate::modules::classes::controller::delete_class,
        crate::modules::classes::controller::enroll,
        crate::modules::classes::controller::list_students,
        crate::modules::health::controller::health_check,
    ),
    components(
        schemas(
            User,
            UserRole,
            RegisterRequestDto,
            UpdateProfileDto,
            LoginRequest,
            TokenPair,
            AuthResponse,
            RefreshTokenRequest,
            RefreshTokenResponse,
            ClassResponse,
            CreateClassDto,
            UpdateClassDto,
            EnrollResponse,
            EnrolledStudent,
            HealthResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and token refresh"),
        (name = "Profile", description = "The authenticated user's own account"),
        (name = "Classes", description = "Class management and enrollment by code"),
        (name = "Health", description = "Dependency health")
    ),
    info(
        title = "Classroom API",
        version = "0.1.0",
        description = "Teachers create classes, students join them with a six-character code.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
