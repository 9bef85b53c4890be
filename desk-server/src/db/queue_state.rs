//! Numbering epoch and ticket counter (single row)

use sqlx::SqliteExecutor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct QueueState {
    pub epoch: i64,
    pub last_reset_at: Option<i64>,
    /// Highest ticket sequence issued in the scope `sequence_day`
    pub last_sequence: i64,
    /// Business-day start of the counter, `None` for the global scope
    pub sequence_day: Option<i64>,
}

impl QueueState {
    /// Highest sequence already issued in `scope_start`, 0 for a new scope
    pub fn issued_in(&self, scope_start: Option<i64>) -> u64 {
        if self.sequence_day == scope_start {
            u64::try_from(self.last_sequence).unwrap_or(0)
        } else {
            0
        }
    }

    /// Whether a reset already ran at or after `since`
    pub fn reset_since(&self, since: i64) -> bool {
        self.last_reset_at.is_some_and(|at| at >= since)
    }
}

pub async fn get(executor: impl SqliteExecutor<'_>) -> Result<QueueState, sqlx::Error> {
    sqlx::query_as(
        "SELECT epoch, last_reset_at, last_sequence, sequence_day FROM queue_state WHERE id = 1",
    )
    .fetch_one(executor)
    .await
}

/// Store the sequence just issued for `scope_start`
pub async fn record_sequence(
    executor: impl SqliteExecutor<'_>,
    sequence: u64,
    scope_start: Option<i64>,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE queue_state SET last_sequence = ?, sequence_day = ? WHERE id = 1")
        .bind(i64::try_from(sequence).unwrap_or(i64::MAX))
        .bind(scope_start)
        .execute(executor)
        .await?;
    Ok(())
}

/// Start a new numbering epoch with a fresh counter, returns the epoch
pub async fn advance_epoch(
    executor: impl SqliteExecutor<'_>,
    now: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "UPDATE queue_state
         SET epoch = epoch + 1, last_reset_at = ?, last_sequence = 0, sequence_day = NULL
         WHERE id = 1
         RETURNING epoch",
    )
    .bind(now)
    .fetch_one(executor)
    .await
}
