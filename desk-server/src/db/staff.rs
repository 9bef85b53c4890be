use shared::models::StaffProfile;
use sqlx::{SqliteExecutor, SqlitePool};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Staff {
    pub id: String,
    pub name: String,
    pub email: String,
    pub hashed_password: String,
    pub created_at: i64,
}

impl Staff {
    pub fn profile(&self) -> StaffProfile {
        StaffProfile {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

pub async fn create(
    executor: impl SqliteExecutor<'_>,
    id: &str,
    name: &str,
    email: &str,
    hashed_password: &str,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO staff (id, name, email, hashed_password, created_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(name)
    .bind(email)
    .bind(hashed_password)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM staff")
        .fetch_one(pool)
        .await
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<Staff>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM staff WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<Staff>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM staff WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Whether `email` belongs to a staff member other than `staff_id`
pub async fn email_taken_by_other(
    pool: &SqlitePool,
    email: &str,
    staff_id: &str,
) -> Result<bool, sqlx::Error> {
    let taken: Option<i64> =
        sqlx::query_scalar("SELECT 1 FROM staff WHERE email = ? AND id != ? LIMIT 1")
            .bind(email)
            .bind(staff_id)
            .fetch_optional(pool)
            .await?;
    Ok(taken.is_some())
}

pub async fn update_profile(
    executor: impl SqliteExecutor<'_>,
    staff_id: &str,
    name: &str,
    email: &str,
) -> Result<u64, sqlx::Error> {
    let rows = sqlx::query("UPDATE staff SET name = ?, email = ? WHERE id = ?")
        .bind(name)
        .bind(email)
        .bind(staff_id)
        .execute(executor)
        .await?
        .rows_affected();
    Ok(rows)
}

pub async fn update_password(
    executor: impl SqliteExecutor<'_>,
    staff_id: &str,
    hashed_password: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE staff SET hashed_password = ? WHERE id = ?")
        .bind(hashed_password)
        .bind(staff_id)
        .execute(executor)
        .await?;
    Ok(())
}
