//! Scheduled maintenance tasks for Lobby.
//!
//! This crate provides:
//! - A cron scheduler for periodic maintenance tasks
//! - The session cache sweep job
//! - The request log retention job

pub mod jobs;
pub mod scheduler;

pub use jobs::cache_sweep::CacheSweepJob;
pub use jobs::request_log_cleanup::RequestLogCleanupJob;
pub use scheduler::CronScheduler;
