//! Complaint queries
//!
//! `rowid` breaks ties between records created in the same millisecond.

use shared::models::Complaint;
use sqlx::{SqliteExecutor, SqlitePool};

const COLUMNS: &str = "id, queue_number, name, company, phone, complaint, category, \
                       device_type, no_internet, status, notes, created_at";

/// Ticket of the newest complaint in `epoch` created at or after `since`
///
/// `Ok(None)` when the scope is empty or the newest record has no ticket.
pub async fn last_ticket(
    executor: impl SqliteExecutor<'_>,
    epoch: i64,
    since: Option<i64>,
) -> Result<Option<String>, sqlx::Error> {
    let row: Option<Option<String>> = sqlx::query_scalar(
        "SELECT queue_number FROM complaints
         WHERE queue_epoch = ? AND created_at >= ?
         ORDER BY created_at DESC, rowid DESC
         LIMIT 1",
    )
    .bind(epoch)
    .bind(since.unwrap_or(i64::MIN))
    .fetch_optional(executor)
    .await?;
    Ok(row.flatten())
}

pub async fn insert(
    executor: impl SqliteExecutor<'_>,
    complaint: &Complaint,
    epoch: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO complaints (id, queue_number, name, company, phone, complaint, category,
                                 device_type, no_internet, status, notes, created_at, queue_epoch)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&complaint.id)
    .bind(&complaint.queue_number)
    .bind(&complaint.name)
    .bind(&complaint.company)
    .bind(&complaint.phone)
    .bind(&complaint.complaint)
    .bind(&complaint.category)
    .bind(&complaint.device_type)
    .bind(&complaint.no_internet)
    .bind(complaint.status)
    .bind(&complaint.notes)
    .bind(complaint.created_at)
    .bind(epoch)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn find_by_id(
    executor: impl SqliteExecutor<'_>,
    id: &str,
) -> Result<Option<Complaint>, sqlx::Error> {
    sqlx::query_as(&format!("SELECT {COLUMNS} FROM complaints WHERE id = ?"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Complaints in creation order
///
/// - `since`: inclusive lower bound on `created_at`
/// - `finished`: `Some(true)` only Selesai, `Some(false)` only active
/// - `limit`/`offset`: page window, `None` for everything
pub async fn list(
    pool: &SqlitePool,
    since: Option<i64>,
    finished: Option<bool>,
    limit: Option<u32>,
    offset: u32,
) -> Result<Vec<Complaint>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM complaints
         WHERE created_at >= ?1
           AND (?2 IS NULL OR (status = 'Selesai') = ?2)
         ORDER BY created_at ASC, rowid ASC
         LIMIT ?3 OFFSET ?4"
    ))
    .bind(since.unwrap_or(i64::MIN))
    .bind(finished)
    .bind(limit.map(i64::from).unwrap_or(-1))
    .bind(i64::from(offset))
    .fetch_all(pool)
    .await
}

/// Write every editable field of `complaint` back, returns rows affected
pub async fn update(
    executor: impl SqliteExecutor<'_>,
    complaint: &Complaint,
) -> Result<u64, sqlx::Error> {
    let rows = sqlx::query(
        "UPDATE complaints
         SET name = ?, company = ?, phone = ?, complaint = ?, category = ?,
             device_type = ?, no_internet = ?, status = ?, notes = ?
         WHERE id = ?",
    )
    .bind(&complaint.name)
    .bind(&complaint.company)
    .bind(&complaint.phone)
    .bind(&complaint.complaint)
    .bind(&complaint.category)
    .bind(&complaint.device_type)
    .bind(&complaint.no_internet)
    .bind(complaint.status)
    .bind(&complaint.notes)
    .bind(&complaint.id)
    .execute(executor)
    .await?
    .rows_affected();
    Ok(rows)
}

pub async fn delete(executor: impl SqliteExecutor<'_>, id: &str) -> Result<u64, sqlx::Error> {
    let rows = sqlx::query("DELETE FROM complaints WHERE id = ?")
        .bind(id)
        .execute(executor)
        .await?
        .rows_affected();
    Ok(rows)
}

/// Clear the ticket of every unfinished complaint that still has one
pub async fn clear_active_numbers(executor: impl SqliteExecutor<'_>) -> Result<u64, sqlx::Error> {
    let rows = sqlx::query(
        "UPDATE complaints SET queue_number = NULL
         WHERE status != 'Selesai' AND queue_number IS NOT NULL",
    )
    .execute(executor)
    .await?
    .rows_affected();
    Ok(rows)
}

/// Delete unfinished complaints created at or after `since`
pub async fn delete_unfinished_since(
    executor: impl SqliteExecutor<'_>,
    since: i64,
) -> Result<u64, sqlx::Error> {
    let rows = sqlx::query("DELETE FROM complaints WHERE status != 'Selesai' AND created_at >= ?")
        .bind(since)
        .execute(executor)
        .await?
        .rows_affected();
    Ok(rows)
}

pub async fn delete_all(executor: impl SqliteExecutor<'_>) -> Result<u64, sqlx::Error> {
    let rows = sqlx::query("DELETE FROM complaints")
        .execute(executor)
        .await?
        .rows_affected();
    Ok(rows)
}

/// `(waiting, in_progress, done)`
pub async fn count_by_status(pool: &SqlitePool) -> Result<(i64, i64, i64), sqlx::Error> {
    sqlx::query_as(
        "SELECT
            COALESCE(SUM(CASE WHEN status = 'Menunggu' THEN 1 ELSE 0 END), 0),
            COALESCE(SUM(CASE WHEN status = 'Diproses' THEN 1 ELSE 0 END), 0),
            COALESCE(SUM(CASE WHEN status = 'Selesai' THEN 1 ELSE 0 END), 0)
         FROM complaints",
    )
    .fetch_one(pool)
    .await
}

pub async fn count_created_before(pool: &SqlitePool, before: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM complaints WHERE created_at < ?")
        .bind(before)
        .fetch_one(pool)
        .await
}
