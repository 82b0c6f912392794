//! Background job scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup and registers the
//! recurring sync job.

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use insiderdb_sync::{run_reddit_sync, run_sec_sync};

use crate::api::AppState;

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process — dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// the job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(state: AppState) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register_sync_job(&scheduler, state).await?;

    scheduler.start().await?;
    Ok(scheduler)
}

/// Register the hourly sync job (`0 0 * * * *`): both sources, the same
/// pipeline the `/api/sync` endpoint drives on demand.
async fn register_sync_job(
    scheduler: &JobScheduler,
    state: AppState,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async("0 0 * * * *", move |_uuid, _lock| {
        let state = state.clone();

        Box::pin(async move {
            tracing::info!("scheduler: starting hourly sync run");
            run_scheduled_sync(&state).await;
            tracing::info!("scheduler: hourly sync run complete");
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}

async fn run_scheduled_sync(state: &AppState) {
    match run_sec_sync(&state.pool, &state.edgar, &state.config).await {
        Ok(summary) => {
            tracing::info!(stored = summary.stored, "scheduler: SEC sync done");
        }
        Err(e) => {
            tracing::error!(error = %e, "scheduler: SEC sync failed");
        }
    }

    match run_reddit_sync(&state.pool, &state.reddit, &state.config).await {
        Ok(summary) => {
            tracing::info!(stored = summary.stored, "scheduler: Reddit sync done");
        }
        Err(e) => {
            tracing::error!(error = %e, "scheduler: Reddit sync failed");
        }
    }
}
