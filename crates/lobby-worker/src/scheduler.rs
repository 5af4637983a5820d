//! Cron scheduler for periodic maintenance tasks.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};

use lobby_cache::SessionCache;
use lobby_core::config::{CacheConfig, WorkerConfig};
use lobby_core::error::AppError;
use lobby_database::RequestLogRepository;

use crate::jobs::cache_sweep::CacheSweepJob;
use crate::jobs::request_log_cleanup::RequestLogCleanupJob;

/// Cron-based scheduler for periodic background tasks
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Session cache to sweep
    cache: Arc<SessionCache>,
    /// Cron expression for the sweep
    sweep_schedule: String,
    /// Request log retention, with its cron expression
    request_log_cleanup: Option<(RequestLogCleanupJob, String)>,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler")
            .field("sweep_schedule", &self.sweep_schedule)
            .field(
                "request_log_cleanup",
                &self.request_log_cleanup.as_ref().map(|(_, schedule)| schedule),
            )
            .finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new(cache: Arc<SessionCache>, config: &CacheConfig) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self {
            scheduler,
            cache,
            sweep_schedule: config.sweep_schedule.clone(),
            request_log_cleanup: None,
        })
    }

    /// Also prune `repo` on the worker's request log schedule.
    pub fn with_request_logs(mut self, repo: RequestLogRepository, config: &WorkerConfig) -> Self {
        self.request_log_cleanup = Some((
            RequestLogCleanupJob::new(repo, config.request_log_retention_days),
            config.request_log_cleanup_schedule.clone(),
        ));
        self
    }

    /// Register all default scheduled tasks
    pub async fn register_default_tasks(&self) -> Result<(), AppError> {
        self.register_session_cache_sweep().await?;
        self.register_request_log_cleanup().await?;

        tracing::info!("All scheduled tasks registered");
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }

    /// Session cache sweep, hourly by default
    async fn register_session_cache_sweep(&self) -> Result<(), AppError> {
        let sweep = CacheSweepJob::new(Arc::clone(&self.cache));
        let job = CronJob::new_async(self.sweep_schedule.as_str(), move |_uuid, _lock| {
            let sweep = sweep.clone();
            Box::pin(async move {
                tracing::debug!("Running session_cache_sweep");
                sweep.run().await;
            })
        })
        .map_err(|e| {
            AppError::configuration(format!(
                "Invalid session_cache_sweep schedule '{}': {e}",
                self.sweep_schedule
            ))
        })?;

        self.scheduler.add(job).await.map_err(|e| {
            AppError::internal(format!("Failed to add session_cache_sweep schedule: {e}"))
        })?;

        tracing::info!(schedule = %self.sweep_schedule, "Registered: session_cache_sweep");
        Ok(())
    }

    /// Request log retention, daily at midnight by default
    async fn register_request_log_cleanup(&self) -> Result<(), AppError> {
        let Some((cleanup, schedule)) = &self.request_log_cleanup else {
            tracing::debug!("No request log store, skipping request_log_cleanup");
            return Ok(());
        };

        let cleanup = cleanup.clone();
        let job = CronJob::new_async(schedule.as_str(), move |_uuid, _lock| {
            let cleanup = cleanup.clone();
            Box::pin(async move {
                tracing::debug!("Running request_log_cleanup");
                if let Err(e) = cleanup.run().await {
                    tracing::error!(error = %e, "request_log_cleanup failed");
                }
            })
        })
        .map_err(|e| {
            AppError::configuration(format!(
                "Invalid request_log_cleanup schedule '{schedule}': {e}"
            ))
        })?;

        self.scheduler.add(job).await.map_err(|e| {
            AppError::internal(format!("Failed to add request_log_cleanup schedule: {e}"))
        })?;

        tracing::info!(schedule = %schedule, "Registered: request_log_cleanup");
        Ok(())
    }
}
