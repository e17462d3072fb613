//! Password hashing and strength rules.
//!
//! Hashing uses bcrypt at the default cost. Strength rules run before any
//! account is written and report every failing rule at once.

use bcrypt::{DEFAULT_COST, hash, verify};
use similar::TextDiff;

use crate::errors::AppError;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Lower-cased. Checked by exact match.
const COMMON_PASSWORDS: &[&str] = &[
    "123456",
    "12345678",
    "123456789",
    "1234567890",
    "password",
    "password1",
    "password123",
    "passw0rd",
    "qwerty",
    "qwerty123",
    "qwertyuiop",
    "abc123",
    "abcd1234",
    "111111",
    "11111111",
    "000000",
    "00000000",
    "iloveyou",
    "letmein",
    "welcome",
    "welcome1",
    "admin",
    "admin123",
    "monkey",
    "dragon",
    "football",
    "baseball",
    "sunshine",
    "princess",
    "trustno1",
    "superman",
    "starwars",
    "whatever",
    "1q2w3e4r",
    "zaq12wsx",
    "changeme",
    "teacher",
    "student",
];

/// Ratio at or above which a password counts as too similar to an attribute.
pub const MAX_SIMILARITY: f32 = 0.7;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::internal_error(format!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    verify(password, hash)
        .map_err(|e| AppError::internal_error(format!("Failed to verify password: {}", e)))
}

/// Checks a candidate password against the strength rules.
///
/// `user_attributes` are `(label, value)` pairs such as `("username", "jdoe")`.
/// Returns every failing rule's message.
pub fn validate_password_strength(
    password: &str,
    user_attributes: &[(&str, &str)],
) -> Result<(), Vec<String>> {
    let mut problems = Vec::new();

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        problems.push(format!(
            "This password is too short. It must contain at least {} characters.",
            MIN_PASSWORD_LENGTH
        ));
    }

    let lowered = password.to_lowercase();

    if COMMON_PASSWORDS.contains(&lowered.as_str()) {
        problems.push("This password is too common.".to_string());
    }

    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        problems.push("This password is entirely numeric.".to_string());
    }

    if let Some(label) = similar_attribute(&lowered, user_attributes) {
        problems.push(format!("The password is too similar to the {}.", label));
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems)
    }
}

/// Attribute parts are the whole value and its `\W+`-separated pieces. Only
/// the local part of an email address is compared.
fn similar_attribute<'a>(lowered: &str, user_attributes: &[(&'a str, &str)]) -> Option<&'a str> {
    user_attributes.iter().find_map(|(label, value)| {
        let value = value.to_lowercase();
        let value = value.split_once('@').map_or(value.as_str(), |(local, _)| local);

        value
            .split(|c: char| !c.is_alphanumeric() && c != '_')
            .chain(std::iter::once(value))
            .filter(|part| !part.is_empty())
            .filter(|part| !exceeds_length_ratio(lowered, part))
            .any(|part| TextDiff::from_chars(lowered, part).ratio() >= MAX_SIMILARITY)
            .then_some(*label)
    })
}

/// A part far shorter than the password cannot reach the similarity bound.
fn exceeds_length_ratio(password: &str, part: &str) -> bool {
    let password_len = password.chars().count();
    let part_len = part.chars().count();
    let length_bound = MAX_SIMILARITY / 2.0 * password_len as f32;
    password_len >= 10 * part_len && (part_len as f32) < length_bound
}
