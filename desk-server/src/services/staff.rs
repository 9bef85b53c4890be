//! Staff accounts: login, profile and password re-verification

use shared::error::{AppError, ErrorCode};
use shared::models::{LoginResponse, ProfileUpdate, StaffProfile};
use shared::util::now_millis;
use sqlx::SqlitePool;

use crate::auth::AuthContext;
use crate::config::Config;
use crate::db;
use crate::error::{ServiceError, ServiceResult};
use crate::security_log;
use crate::state::AppState;
use crate::util::{hash_password, new_id, verify_password};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Create the configured admin account when no staff exists yet
///
/// Returns whether an account was created.
pub async fn seed_admin(pool: &SqlitePool, config: &Config) -> Result<bool, BoxError> {
    if db::staff::count(pool).await? > 0 {
        return Ok(false);
    }

    let hashed = hash_password(&config.admin_password).map_err(|e| e.to_string())?;
    db::staff::create(
        pool,
        &new_id(),
        &config.admin_name,
        &config.admin_email,
        &hashed,
        now_millis(),
    )
    .await?;

    tracing::info!(email = %config.admin_email, "Seeded first staff account");
    Ok(true)
}

/// Check email + password and issue a session token
pub async fn login(
    state: &AppState,
    email: Option<&str>,
    password: Option<&str>,
) -> ServiceResult<LoginResponse> {
    let email = email
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::required_field("email"))?;
    let password = password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::required_field("password"))?;

    let staff = db::staff::find_by_email(&state.pool, &email).await?;
    let Some(staff) = staff.filter(|s| verify_password(password, &s.hashed_password)) else {
        security_log!("WARN", "login_failed", email = email);
        return Err(AppError::invalid_credentials().into());
    };

    let token = state
        .jwt
        .generate_token(&staff.id, &staff.email)
        .map_err(|e| ServiceError::Db(e.into()))?;

    tracing::info!(staff_id = %staff.id, "Staff logged in");
    Ok(LoginResponse {
        token,
        staff: staff.profile(),
    })
}

/// Staff record of the caller
async fn current_staff(state: &AppState, ctx: &AuthContext) -> ServiceResult<db::staff::Staff> {
    let staff_id = ctx.require_staff()?;
    db::staff::find_by_id(&state.pool, staff_id)
        .await?
        .ok_or_else(|| AppError::not_authenticated().into())
}

pub async fn profile(state: &AppState, ctx: &AuthContext) -> ServiceResult<StaffProfile> {
    Ok(current_staff(state, ctx).await?.profile())
}

/// Update name and email, optionally the password
pub async fn update_profile(
    state: &AppState,
    ctx: &AuthContext,
    update: ProfileUpdate,
) -> ServiceResult<StaffProfile> {
    let staff = current_staff(state, ctx).await?;
    let changes = update.validate()?;

    if db::staff::email_taken_by_other(&state.pool, &changes.email, &staff.id).await? {
        return Err(AppError::new(ErrorCode::StaffEmailExists)
            .with_detail("field", "email")
            .into());
    }

    let new_hash = match &changes.password {
        Some((current, new)) => {
            if !verify_password(current, &staff.hashed_password) {
                security_log!("WARN", "profile_password_mismatch", staff_id = staff.id);
                return Err(AppError::password_mismatch().into());
            }
            Some(hash_password(new).map_err(|e| ServiceError::Db(e.to_string().into()))?)
        }
        None => None,
    };

    let mut tx = state.pool.begin().await?;
    db::staff::update_profile(&mut *tx, &staff.id, &changes.name, &changes.email).await?;
    if let Some(hash) = &new_hash {
        db::staff::update_password(&mut *tx, &staff.id, hash).await?;
    }
    tx.commit().await?;

    tracing::info!(
        staff_id = %staff.id,
        password_changed = new_hash.is_some(),
        "Staff profile updated"
    );
    Ok(StaffProfile {
        id: staff.id,
        name: changes.name,
        email: changes.email,
    })
}

/// Re-verify a staff member's password before a destructive action
pub async fn verify_staff_password(
    state: &AppState,
    staff_id: &str,
    password: &str,
) -> ServiceResult<()> {
    let staff = db::staff::find_by_id(&state.pool, staff_id)
        .await?
        .ok_or_else(AppError::not_authenticated)?;

    if !verify_password(password, &staff.hashed_password) {
        security_log!("WARN", "password_reverify_failed", staff_id = staff_id);
        return Err(AppError::password_mismatch().into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn state() -> AppState {
        let pool = crate::db::connect_in_memory().await.unwrap();
        AppState::with_pool(pool, Config::default()).await.unwrap()
    }

    fn admin_password() -> String {
        Config::default().admin_password
    }

    async fn admin_ctx(state: &AppState) -> AuthContext {
        let admin = db::staff::find_by_email(&state.pool, &state.config.admin_email)
            .await
            .unwrap()
            .unwrap();
        AuthContext::staff(admin.id)
    }

    #[tokio::test]
    async fn test_seed_admin_runs_once() {
        let state = state().await;
        assert_eq!(db::staff::count(&state.pool).await.unwrap(), 1);
        assert!(!seed_admin(&state.pool, &state.config).await.unwrap());
        assert_eq!(db::staff::count(&state.pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_login_issues_valid_token() {
        let state = state().await;
        let password = admin_password();
        let response = login(&state, Some(" Admin@Localhost "), Some(&password))
            .await
            .unwrap();
        assert_eq!(response.staff.email, "admin@localhost");

        let claims = state.jwt.validate_token(&response.token).unwrap();
        assert_eq!(claims.sub, response.staff.id);
    }

    #[tokio::test]
    async fn test_login_failures_look_the_same() {
        let state = state().await;
        let wrong_password = login(&state, Some("admin@localhost"), Some("nope"))
            .await
            .unwrap_err();
        let unknown_email = login(&state, Some("ghost@localhost"), Some("nope"))
            .await
            .unwrap_err();

        let (a, b) = (AppError::from(wrong_password), AppError::from(unknown_email));
        assert_eq!(a.code, ErrorCode::InvalidCredentials);
        assert_eq!(a.code, b.code);
        assert_eq!(a.message, b.message);
    }

    #[tokio::test]
    async fn test_login_requires_fields() {
        let state = state().await;
        let err = AppError::from(login(&state, None, Some("x")).await.unwrap_err());
        assert_eq!(err.code, ErrorCode::RequiredField);
    }

    #[tokio::test]
    async fn test_profile_needs_session() {
        let state = state().await;
        let err = AppError::from(
            profile(&state, &AuthContext::anonymous())
                .await
                .unwrap_err(),
        );
        assert_eq!(err.code, ErrorCode::NotAuthenticated);

        let err = AppError::from(
            profile(&state, &AuthContext::staff("deleted-staff"))
                .await
                .unwrap_err(),
        );
        assert_eq!(err.code, ErrorCode::NotAuthenticated);
    }

    #[tokio::test]
    async fn test_update_profile_changes_password() {
        let state = state().await;
        let ctx = admin_ctx(&state).await;

        let updated = update_profile(
            &state,
            &ctx,
            ProfileUpdate {
                name: Some("Kepala Loket".into()),
                email: Some("Loket@Example.com".into()),
                current_password: Some(admin_password()),
                new_password: Some("brand-new-pass".into()),
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.email, "loket@example.com");
        assert_eq!(profile(&state, &ctx).await.unwrap(), updated);

        assert!(
            login(&state, Some("loket@example.com"), Some("brand-new-pass"))
                .await
                .is_ok()
        );
        assert!(
            login(&state, Some("loket@example.com"), Some(&admin_password()))
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_update_profile_wrong_current_password() {
        let state = state().await;
        let ctx = admin_ctx(&state).await;

        let err = update_profile(
            &state,
            &ctx,
            ProfileUpdate {
                name: Some("Admin".into()),
                email: Some("admin@localhost".into()),
                current_password: Some("not-the-password".into()),
                new_password: Some("brand-new-pass".into()),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(AppError::from(err).code, ErrorCode::PasswordMismatch);
    }

    #[tokio::test]
    async fn test_update_profile_rejects_taken_email() {
        let state = state().await;
        let ctx = admin_ctx(&state).await;
        db::staff::create(
            &state.pool,
            "staff-2",
            "Sari",
            "sari@localhost",
            "unused-hash",
            now_millis(),
        )
        .await
        .unwrap();

        let err = update_profile(
            &state,
            &ctx,
            ProfileUpdate {
                name: Some("Admin".into()),
                email: Some("sari@localhost".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(AppError::from(err).code, ErrorCode::StaffEmailExists);
    }

    #[tokio::test]
    async fn test_verify_staff_password() {
        let state = state().await;
        let ctx = admin_ctx(&state).await;
        let id = ctx.require_staff().unwrap();

        assert!(verify_staff_password(&state, id, &admin_password()).await.is_ok());
        let err = verify_staff_password(&state, id, "wrong").await.unwrap_err();
        assert_eq!(AppError::from(err).code, ErrorCode::PasswordMismatch);
    }
}
