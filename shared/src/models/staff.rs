//! Staff Model

use serde::{Deserialize, Serialize};

use crate::error::{AppError, ErrorCode};

/// Minimum length for a new staff password
pub const MIN_PASSWORD_LEN: usize = 8;

/// Staff profile (without password)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StaffProfile {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Login request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub staff: StaffProfile,
}

/// Profile update payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// Validated profile update
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileChanges {
    pub name: String,
    /// Lower-cased
    pub email: String,
    /// `(current, new)` when a password change was requested
    pub password: Option<(String, String)>,
}

impl ProfileUpdate {
    pub fn validate(self) -> Result<ProfileChanges, AppError> {
        let name = self
            .name
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::required_field("name"))?;
        let email = self
            .email
            .map(|v| v.trim().to_lowercase())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::required_field("email"))?;
        if !email.contains('@') {
            return Err(AppError::validation("Invalid email address").with_detail("field", "email"));
        }

        let current = self.current_password.filter(|v| !v.is_empty());
        let new = self.new_password.filter(|v| !v.is_empty());
        let password = match (current, new) {
            (Some(current), Some(new)) => {
                if new.chars().count() < MIN_PASSWORD_LEN {
                    return Err(AppError::new(ErrorCode::PasswordTooShort));
                }
                Some((current, new))
            }
            (None, None) => None,
            (None, Some(_)) => return Err(AppError::required_field("currentPassword")),
            (Some(_), None) => return Err(AppError::required_field("newPassword")),
        };

        Ok(ProfileChanges {
            name,
            email,
            password,
        })
    }
}

/// Password re-verification payload (destructive admin actions)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PasswordConfirm {
    pub password: Option<String>,
}
