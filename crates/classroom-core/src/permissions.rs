//! Permission rules.
//!
//! Permissions are pure functions of the caller's role and the kind of
//! access requested. They know nothing about HTTP; the middleware layer maps
//! request methods to [`AccessKind`] and endpoints to [`Action`].
//!
//! Ownership is a separate check ([`owns`]) applied after the role check,
//! typically by filtering queries to the caller's own rows.
//!
//! # Example
//!
//! ```ignore
//! use classroom_core::permissions::{Action, authorize};
//! use classroom_core::UserRole;
//!
//! assert!(authorize(Some(UserRole::Student), Action::EnrollByCode).is_ok());
//! assert!(authorize(Some(UserRole::Teacher), Action::EnrollByCode).is_err());
//! ```

use crate::errors::AppError;
use crate::roles::UserRole;

/// Whether a request reads or mutates state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    Read,
    Write,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    AllowAny,
    IsAuthenticated,
    IsTeacher,
    IsStudent,
    IsGuest,
    /// Reads for any authenticated caller, writes for teachers only.
    IsTeacherOrReadOnly,
}

impl Permission {
    /// `role` is `None` for anonymous callers.
    pub fn check(self, role: Option<UserRole>, access: AccessKind) -> bool {
        match (self, role) {
            (Permission::AllowAny, _) => true,
            (_, None) => false,
            (Permission::IsAuthenticated, Some(_)) => true,
            (Permission::IsTeacher, Some(role)) => role.is_teacher(),
            (Permission::IsStudent, Some(role)) => role.is_student(),
            (Permission::IsGuest, Some(role)) => role.is_guest(),
            (Permission::IsTeacherOrReadOnly, Some(role)) => {
                access == AccessKind::Read || role.is_teacher()
            }
        }
    }

    pub fn denial_message(self) -> &'static str {
        match self {
            Permission::AllowAny | Permission::IsAuthenticated => {
                "Authentication credentials were not provided."
            }
            Permission::IsTeacher => "Access denied. Only teachers can perform this action.",
            Permission::IsStudent => "Access denied. Only students can perform this action.",
            Permission::IsGuest => "Access denied. Only guests can perform this action.",
            Permission::IsTeacherOrReadOnly => "Access denied. Only teachers can modify this resource.",
        }
    }
}

/// Every endpoint action the API exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Register,
    Login,
    RefreshToken,
    HealthCheck,
    ViewProfile,
    UpdateProfile,
    ListClasses,
    RetrieveClass,
    CreateClass,
    UpdateClass,
    PartialUpdateClass,
    DestroyClass,
    EnrollByCode,
    ListEnrolledStudents,
}

impl Action {
    const PUBLIC: &'static [Action] = &[
        Action::Register,
        Action::Login,
        Action::RefreshToken,
        Action::HealthCheck,
    ];

    const TEACHER_ONLY: &'static [Action] = &[
        Action::CreateClass,
        Action::UpdateClass,
        Action::PartialUpdateClass,
        Action::DestroyClass,
        Action::ListEnrolledStudents,
    ];

    const STUDENT_ONLY: &'static [Action] = &[Action::EnrollByCode];

    pub fn required_permission(self) -> Permission {
        if Self::PUBLIC.contains(&self) {
            Permission::AllowAny
        } else if Self::TEACHER_ONLY.contains(&self) {
            Permission::IsTeacher
        } else if Self::STUDENT_ONLY.contains(&self) {
            Permission::IsStudent
        } else {
            Permission::IsAuthenticated
        }
    }

    pub fn access_kind(self) -> AccessKind {
        match self {
            Action::HealthCheck
            | Action::ViewProfile
            | Action::ListClasses
            | Action::RetrieveClass
            | Action::ListEnrolledStudents => AccessKind::Read,
            _ => AccessKind::Write,
        }
    }
}

/// Why a permission check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    Unauthenticated,
    Forbidden(Permission),
}

impl Denial {
    /// 401 for anonymous callers, 403 for authenticated callers lacking the role.
    pub fn into_error(self) -> AppError {
        match self {
            Denial::Unauthenticated => {
                AppError::unauthorized("Authentication credentials were not provided.")
            }
            Denial::Forbidden(permission) => AppError::forbidden(permission.denial_message()),
        }
    }
}

/// Evaluates the permission required by `action` for a caller with `role`.
pub fn authorize(role: Option<UserRole>, action: Action) -> Result<(), Denial> {
    let permission = action.required_permission();
    evaluate(permission, role, action.access_kind())
}

/// Evaluates an explicit permission for a caller with `role`.
pub fn evaluate(
    permission: Permission,
    role: Option<UserRole>,
    access: AccessKind,
) -> Result<(), Denial> {
    if permission.check(role, access) {
        return Ok(());
    }
    match role {
        None => Err(Denial::Unauthenticated),
        Some(_) => Err(Denial::Forbidden(permission)),
    }
}

/// Resource ownership check: the caller may mutate only what they own.
pub fn owns<T: PartialEq>(principal_id: &T, owner_id: &T) -> bool {
    principal_id == owner_id
}
