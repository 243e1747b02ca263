//! # gamehub-queue
//!
//! Implementations of the [`EventQueue`] contract: a Redis stream
//! producer for production and an in-memory buffer for tests and
//! single-node development.
//!
//! [`EventQueue`]: gamehub_core::traits::EventQueue

pub mod memory;
pub mod redis;

use std::sync::Arc;

use gamehub_core::config::queue::QueueConfig;
use gamehub_core::error::AppError;
use gamehub_core::result::AppResult;
use gamehub_core::traits::EventQueue;

pub use crate::memory::InMemoryEventQueue;
pub use crate::redis::RedisEventQueue;

/// Build the queue named by configuration.
pub fn from_config(config: &QueueConfig) -> AppResult<Arc<dyn EventQueue>> {
    match config.provider.as_str() {
        "redis" => Ok(Arc::new(RedisEventQueue::new(
            &config.redis_url,
            &config.stream_key,
        )?)),
        "memory" => Ok(Arc::new(InMemoryEventQueue::new())),
        other => Err(AppError::configuration(format!(
            "Unknown queue provider '{other}'"
        ))),
    }
}
