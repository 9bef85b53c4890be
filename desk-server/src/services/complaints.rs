//! Complaint service
//!
//! Every operation takes the caller's [`AuthContext`]. Creation and the
//! summary are public; everything else needs a staff session.

use shared::error::AppError;
use shared::models::{
    Complaint, ComplaintCreate, ComplaintStatus, ComplaintUpdate, CreatedComplaint, QueueSummary,
};
use shared::queue::{ListQuery, QueueView, TicketScope, Transition, format_ticket, next_sequence};
use shared::util::{now_millis, start_of_day_millis};

use crate::auth::AuthContext;
use crate::config::QueueResetMode;
use crate::db;
use crate::error::ServiceResult;
use crate::services::staff;
use crate::state::AppState;
use crate::util::new_id;

/// Lower bound of the ticket lookup for the configured scope
fn ticket_scope_start(state: &AppState, now: i64) -> Option<i64> {
    match state.config.ticket_scope {
        TicketScope::Global => None,
        TicketScope::Daily => Some(start_of_day_millis(now, state.config.timezone)),
    }
}

/// Register a complaint and hand out the next ticket
pub async fn create(
    state: &AppState,
    ctx: &AuthContext,
    input: ComplaintCreate,
) -> ServiceResult<CreatedComplaint> {
    let input = input.validate()?;

    let complaint = {
        let _guard = state.ticket_lock.lock().await;
        let now = now_millis();

        let mut tx = state.pool.begin().await?;
        let queue = db::queue_state::get(&mut *tx).await?;
        let scope_start = ticket_scope_start(state, now);
        let last = db::complaints::last_ticket(&mut *tx, queue.epoch, scope_start).await?;
        let sequence = next_sequence(queue.issued_in(scope_start), last.as_deref());
        db::queue_state::record_sequence(&mut *tx, sequence, scope_start).await?;

        let complaint = Complaint {
            id: new_id(),
            queue_number: Some(format_ticket(sequence)),
            name: input.name,
            company: input.company,
            phone: input.phone,
            complaint: input.complaint,
            category: input.category,
            device_type: input.device_type,
            no_internet: input.no_internet,
            status: ComplaintStatus::Menunggu,
            notes: None,
            created_at: now,
        };
        db::complaints::insert(&mut *tx, &complaint, queue.epoch).await?;
        tx.commit().await?;
        complaint
    };

    tracing::info!(
        id = %complaint.id,
        ticket = complaint.queue_number.as_deref().unwrap_or_default(),
        by_staff = ctx.staff_id.as_deref().unwrap_or("-"),
        "Complaint registered"
    );

    let summary = summary(state, ctx).await?;
    Ok(CreatedComplaint {
        complaint,
        estimated_wait_minutes: summary.estimated_wait_minutes,
    })
}

/// Complaints in creation order, narrowed by date, view and page
pub async fn list(
    state: &AppState,
    ctx: &AuthContext,
    query: ListQuery,
) -> ServiceResult<Vec<Complaint>> {
    if state.config.list_requires_auth {
        ctx.require_staff()?;
    }
    let params = query.validate()?;

    let since = params.filter.lower_bound(now_millis(), state.config.timezone);
    let finished = match params.view {
        QueueView::Active => Some(false),
        QueueView::History => Some(true),
        QueueView::All => None,
    };
    let (limit, offset) = match params.page {
        Some(page) => (Some(page.per_page), page.offset()),
        None => (None, 0),
    };

    Ok(db::complaints::list(&state.pool, since, finished, limit, offset).await?)
}

/// Partial update; only fields present in `update` change
pub async fn update(
    state: &AppState,
    ctx: &AuthContext,
    id: &str,
    update: ComplaintUpdate,
) -> ServiceResult<Complaint> {
    let staff_id = ctx.require_staff()?;
    let changes = update.validate()?;

    let mut tx = state.pool.begin().await?;
    let mut complaint = db::complaints::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| AppError::complaint_not_found(id))?;
    changes.apply(&mut complaint);
    db::complaints::update(&mut *tx, &complaint).await?;
    tx.commit().await?;

    tracing::info!(id, staff_id, status = %complaint.status, "Complaint updated");
    Ok(complaint)
}

/// Call or finish a ticket
pub async fn transition(
    state: &AppState,
    ctx: &AuthContext,
    id: &str,
    transition: Transition,
) -> ServiceResult<Complaint> {
    let staff_id = ctx.require_staff()?;

    let mut tx = state.pool.begin().await?;
    let mut complaint = db::complaints::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| AppError::complaint_not_found(id))?;
    complaint.status = transition.apply(complaint.status);
    db::complaints::update(&mut *tx, &complaint).await?;
    tx.commit().await?;

    tracing::info!(
        id,
        staff_id,
        transition = transition.as_str(),
        ticket = complaint.queue_number.as_deref().unwrap_or_default(),
        "Complaint status changed"
    );
    Ok(complaint)
}

pub async fn delete(state: &AppState, ctx: &AuthContext, id: &str) -> ServiceResult<()> {
    let staff_id = ctx.require_staff()?;

    let rows = db::complaints::delete(&state.pool, id).await?;
    if rows == 0 {
        return Err(AppError::complaint_not_found(id).into());
    }

    tracing::info!(id, staff_id, "Complaint deleted");
    Ok(())
}

/// Staff-triggered queue reset, returns the number of records touched
pub async fn reset_queue(state: &AppState, ctx: &AuthContext) -> ServiceResult<u64> {
    let staff_id = ctx.require_staff()?;
    let count = run_queue_reset(state, now_millis()).await?;
    tracing::info!(staff_id, count, mode = %state.config.reset_mode, "Queue reset by staff");
    Ok(count)
}

/// Reset the queue per the configured mode and start a new numbering epoch
///
/// Finished complaints keep their tickets in both modes.
pub(crate) async fn run_queue_reset(state: &AppState, now: i64) -> ServiceResult<u64> {
    Ok(reset_unless_done_since(state, now, None).await?.unwrap_or_default())
}

/// Reset at most once per business day; `None` when a reset (manual or
/// scheduled) already ran since the start of `now`'s day
pub(crate) async fn run_daily_reset(state: &AppState, now: i64) -> ServiceResult<Option<u64>> {
    let today = start_of_day_millis(now, state.config.timezone);
    reset_unless_done_since(state, now, Some(today)).await
}

async fn reset_unless_done_since(
    state: &AppState,
    now: i64,
    since: Option<i64>,
) -> ServiceResult<Option<u64>> {
    let _guard = state.ticket_lock.lock().await;

    let mut tx = state.pool.begin().await?;
    if let Some(since) = since
        && db::queue_state::get(&mut *tx).await?.reset_since(since)
    {
        return Ok(None);
    }

    let count = match state.config.reset_mode {
        QueueResetMode::ClearNumbers => db::complaints::clear_active_numbers(&mut *tx).await?,
        QueueResetMode::DeleteUnfinishedToday => {
            let today = start_of_day_millis(now, state.config.timezone);
            db::complaints::delete_unfinished_since(&mut *tx, today).await?
        }
    };
    let epoch = db::queue_state::advance_epoch(&mut *tx, now).await?;
    tx.commit().await?;

    tracing::debug!(epoch, count, "Numbering epoch advanced");
    Ok(Some(count))
}

/// Delete every complaint after re-verifying the caller's password
pub async fn reset_all(
    state: &AppState,
    ctx: &AuthContext,
    password: Option<&str>,
) -> ServiceResult<u64> {
    let staff_id = ctx.require_staff()?;
    let password = password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::required_field("password"))?;
    staff::verify_staff_password(state, staff_id, password).await?;

    let _guard = state.ticket_lock.lock().await;
    let mut tx = state.pool.begin().await?;
    let count = db::complaints::delete_all(&mut *tx).await?;
    db::queue_state::advance_epoch(&mut *tx, now_millis()).await?;
    tx.commit().await?;

    tracing::warn!(staff_id, count, "All complaints deleted");
    Ok(count)
}

/// Queue counters and wait estimate, no personal data
pub async fn summary(state: &AppState, _ctx: &AuthContext) -> ServiceResult<QueueSummary> {
    let (waiting, in_progress, done) = db::complaints::count_by_status(&state.pool).await?;
    Ok(QueueSummary::from_counts(
        waiting,
        in_progress,
        done,
        state.config.minutes_per_ticket,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use shared::error::ErrorCode;
    use shared::queue::ListQuery;

    async fn state_with(config: Config) -> (AppState, AuthContext) {
        let pool = crate::db::connect_in_memory().await.unwrap();
        let admin_email = config.admin_email.clone();
        let state = AppState::with_pool(pool, config).await.unwrap();
        let admin = db::staff::find_by_email(&state.pool, &admin_email)
            .await
            .unwrap()
            .unwrap();
        (state, AuthContext::staff(admin.id))
    }

    async fn state() -> (AppState, AuthContext) {
        state_with(Config::default()).await
    }

    fn form(name: &str) -> ComplaintCreate {
        ComplaintCreate {
            name: Some(name.into()),
            phone: Some("08123456789".into()),
            complaint: Some("Internet putus".into()),
            ..Default::default()
        }
    }

    async fn create_n(state: &AppState, n: usize) -> Vec<Complaint> {
        let mut out = Vec::new();
        for i in 0..n {
            let created = create(state, &AuthContext::anonymous(), form(&format!("C{i}")))
                .await
                .unwrap();
            out.push(created.complaint);
        }
        out
    }

    fn tickets(list: &[Complaint]) -> Vec<Option<&str>> {
        list.iter().map(|c| c.queue_number.as_deref()).collect()
    }

    #[tokio::test]
    async fn test_sequential_tickets() {
        let (state, _) = state().await;
        let created = create_n(&state, 3).await;
        assert_eq!(tickets(&created), [Some("A001"), Some("A002"), Some("A003")]);
        assert!(created.iter().all(|c| c.status == ComplaintStatus::Menunggu));
    }

    #[tokio::test]
    async fn test_create_reports_wait_estimate() {
        let (state, _) = state().await;
        create_n(&state, 1).await;
        let second = create(&state, &AuthContext::anonymous(), form("B")).await.unwrap();
        assert_eq!(second.estimated_wait_minutes, 14);
    }

    #[tokio::test]
    async fn test_create_validation() {
        let (state, _) = state().await;
        let mut input = form("A");
        input.complaint = Some("   ".into());
        let err: AppError = create(&state, &AuthContext::anonymous(), input)
            .await
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::RequiredField);
        assert_eq!(summary(&state, &AuthContext::anonymous()).await.unwrap().active, 0);
    }

    #[tokio::test]
    async fn test_daily_scope_ignores_yesterday() {
        let (state, _) = state().await;
        let yesterday = now_millis() - 86_400_000 * 2;
        let mut old = create_n(&state, 1).await.remove(0);
        old.id = new_id();
        old.queue_number = Some("A057".into());
        old.created_at = yesterday;
        db::complaints::insert(&state.pool, &old, 0).await.unwrap();

        // The A001 created above is today's latest record
        let next = create(&state, &AuthContext::anonymous(), form("X")).await.unwrap();
        assert_eq!(next.complaint.queue_number.as_deref(), Some("A002"));
    }

    #[tokio::test]
    async fn test_global_scope_continues_across_days() {
        let config = Config {
            ticket_scope: TicketScope::Global,
            ..Config::default()
        };
        let (state, _) = state_with(config).await;
        let mut old = create_n(&state, 1).await.remove(0);
        db::complaints::delete_all(&state.pool).await.unwrap();
        old.queue_number = Some("A041".into());
        old.created_at = now_millis() - 86_400_000 * 3;
        db::complaints::insert(&state.pool, &old, 0).await.unwrap();

        let next = create(&state, &AuthContext::anonymous(), form("X")).await.unwrap();
        assert_eq!(next.complaint.queue_number.as_deref(), Some("A042"));
    }

    #[tokio::test]
    async fn test_deleted_newest_ticket_is_not_reissued() {
        let (state, staff) = state().await;
        let created = create_n(&state, 2).await;
        delete(&state, &staff, &created[1].id).await.unwrap();

        let next = create(&state, &AuthContext::anonymous(), form("N")).await.unwrap();
        assert_eq!(next.complaint.queue_number.as_deref(), Some("A003"));
    }

    #[tokio::test]
    async fn test_counter_of_previous_day_is_ignored() {
        let (state, _) = state().await;
        let yesterday = start_of_day_millis(now_millis(), state.config.timezone) - 86_400_000;
        db::queue_state::record_sequence(&state.pool, 9, Some(yesterday))
            .await
            .unwrap();

        let next = create(&state, &AuthContext::anonymous(), form("N")).await.unwrap();
        assert_eq!(next.complaint.queue_number.as_deref(), Some("A001"));
    }

    #[tokio::test]
    async fn test_reset_queue_restarts_numbering() {
        let (state, staff) = state().await;
        let created = create_n(&state, 3).await;
        update(
            &state,
            &staff,
            &created[0].id,
            ComplaintUpdate {
                status: Some("Selesai".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(reset_queue(&state, &staff).await.unwrap(), 2);

        let next = create(&state, &AuthContext::anonymous(), form("N")).await.unwrap();
        assert_eq!(next.complaint.queue_number.as_deref(), Some("A001"));

        let finished = db::complaints::find_by_id(&state.pool, &created[0].id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(finished.queue_number.as_deref(), Some("A001"));
        let cleared = db::complaints::find_by_id(&state.pool, &created[1].id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cleared.queue_number, None);
    }

    #[tokio::test]
    async fn test_reset_queue_delete_mode() {
        let config = Config {
            reset_mode: QueueResetMode::DeleteUnfinishedToday,
            ..Config::default()
        };
        let (state, staff) = state_with(config).await;
        let created = create_n(&state, 2).await;
        transition(&state, &staff, &created[0].id, Transition::Finish)
            .await
            .unwrap();

        assert_eq!(reset_queue(&state, &staff).await.unwrap(), 1);
        let all = list(&state, &staff, ListQuery::default()).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].status, ComplaintStatus::Selesai);

        let next = create(&state, &AuthContext::anonymous(), form("N")).await.unwrap();
        assert_eq!(next.complaint.queue_number.as_deref(), Some("A001"));
    }

    #[tokio::test]
    async fn test_finished_moves_to_history() {
        let (state, staff) = state().await;
        let created = create_n(&state, 2).await;
        let active = ListQuery {
            view: Some("active".into()),
            ..Default::default()
        };

        transition(&state, &staff, &created[0].id, Transition::Call)
            .await
            .unwrap();
        assert_eq!(list(&state, &staff, active.clone()).await.unwrap().len(), 2);

        let done = transition(&state, &staff, &created[0].id, Transition::Finish)
            .await
            .unwrap();
        assert_eq!(done.status, ComplaintStatus::Selesai);

        let remaining = list(&state, &staff, active).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, created[1].id);

        let history = ListQuery {
            view: Some("history".into()),
            ..Default::default()
        };
        assert_eq!(list(&state, &staff, history).await.unwrap().len(), 1);

        let summary = summary(&state, &AuthContext::anonymous()).await.unwrap();
        assert_eq!((summary.waiting, summary.done), (1, 1));
        assert_eq!(summary.estimated_wait_minutes, 7);
    }

    #[tokio::test]
    async fn test_update_changes_only_given_fields() {
        let (state, staff) = state().await;
        let created = create_n(&state, 1).await.remove(0);
        let updated = update(
            &state,
            &staff,
            &created.id,
            ComplaintUpdate {
                notes: Some("Teknisi dijadwalkan".into()),
                company: Some("PT Maju".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.notes.as_deref(), Some("Teknisi dijadwalkan"));
        assert_eq!(updated.company.as_deref(), Some("PT Maju"));
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.queue_number, created.queue_number);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_staff_only_operations() {
        let (state, _) = state().await;
        let created = create_n(&state, 1).await.remove(0);
        let anon = AuthContext::anonymous();

        let err: AppError = delete(&state, &anon, &created.id).await.unwrap_err().into();
        assert_eq!(err.code, ErrorCode::NotAuthenticated);
        let err: AppError = list(&state, &anon, ListQuery::default()).await.unwrap_err().into();
        assert_eq!(err.code, ErrorCode::NotAuthenticated);
        let err: AppError = reset_queue(&state, &anon).await.unwrap_err().into();
        assert_eq!(err.code, ErrorCode::NotAuthenticated);
    }

    #[tokio::test]
    async fn test_open_list_when_configured() {
        let config = Config {
            list_requires_auth: false,
            ..Config::default()
        };
        let (state, _) = state_with(config).await;
        create_n(&state, 2).await;
        let all = list(&state, &AuthContext::anonymous(), ListQuery::default())
            .await
            .unwrap();
        assert_eq!(tickets(&all), [Some("A001"), Some("A002")]);
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let (state, staff) = state().await;
        let created = create_n(&state, 1).await.remove(0);
        delete(&state, &staff, &created.id).await.unwrap();
        let err: AppError = delete(&state, &staff, &created.id).await.unwrap_err().into();
        assert_eq!(err.code, ErrorCode::ComplaintNotFound);
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let (state, staff) = state().await;
        let err: AppError = update(&state, &staff, "nope", ComplaintUpdate::default())
            .await
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::ComplaintNotFound);
    }

    #[tokio::test]
    async fn test_reset_all_requires_password() {
        let (state, staff) = state().await;
        create_n(&state, 3).await;

        let err: AppError = reset_all(&state, &staff, Some("wrong-password"))
            .await
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::PasswordMismatch);
        assert_eq!(list(&state, &staff, ListQuery::default()).await.unwrap().len(), 3);

        let password = state.config.admin_password.clone();
        assert_eq!(reset_all(&state, &staff, Some(&password)).await.unwrap(), 3);
        assert!(list(&state, &staff, ListQuery::default()).await.unwrap().is_empty());

        let next = create(&state, &AuthContext::anonymous(), form("N")).await.unwrap();
        assert_eq!(next.complaint.queue_number.as_deref(), Some("A001"));
    }

    #[tokio::test]
    async fn test_concurrent_creates_get_unique_tickets() {
        let (state, staff) = state().await;
        let mut handles = Vec::new();
        for i in 0..8 {
            let state = state.clone();
            handles.push(tokio::spawn(async move {
                create(&state, &AuthContext::anonymous(), form(&format!("P{i}")))
                    .await
                    .map(|c| c.complaint.queue_number)
            }));
        }
        let mut numbers = Vec::new();
        for handle in handles {
            numbers.push(handle.await.unwrap().unwrap().unwrap());
        }
        numbers.sort();
        let expected: Vec<String> = (1..=8).map(|n| format!("A{n:03}")).collect();
        assert_eq!(numbers, expected);
        assert_eq!(list(&state, &staff, ListQuery::default()).await.unwrap().len(), 8);
    }
}
