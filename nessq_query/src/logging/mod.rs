//! Global logging module for nessq
//!
//! Provides a process-wide logging service with coded events and a small
//! macro interface. Every macro is a no-op until [`init_global_logging`] or
//! [`init_global_logging_with_service`] has been called, so library users and
//! tests never need to set anything up.

#[macro_use]
pub mod macros;
pub mod codes;
pub mod events;
pub mod service;

use crate::config::runtime::LoggingPreferences;
use std::sync::{Arc, OnceLock};

// Re-export main types
pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, StructuredLogger};

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging system from preferences
pub fn init_global_logging(preferences: &LoggingPreferences) -> Result<(), String> {
    let logging_service = Arc::new(LoggingService::from_preferences(preferences));

    GLOBAL_LOGGER
        .set(logging_service.clone())
        .map_err(|_| "Global logger already initialized")?;

    logging_service.log_event(LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    ));

    Ok(())
}

/// Initialize with custom service (primarily for testing)
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized")?;

    Ok(())
}

static MEMORY_LOGGER: OnceLock<Arc<MemoryLogger>> = OnceLock::new();

/// Route every global event, debug included, into a shared [`MemoryLogger`].
///
/// Meant for test binaries that assert on emitted codes. The first call installs
/// the service; later calls hand out the same logger. Events from concurrently
/// running tests land in the same buffer, so filter on context.
pub fn init_global_memory_logging() -> Arc<MemoryLogger> {
    MEMORY_LOGGER
        .get_or_init(|| {
            let memory = Arc::new(MemoryLogger::new());
            let service = LoggingService::new(memory.clone(), LogLevel::Debug);
            // Ignored when a different service is already installed
            let _ = init_global_logging_with_service(Arc::new(service));
            memory
        })
        .clone()
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

/// Safe access to global logger
pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

/// Whether events of `level` would currently be emitted
pub fn is_enabled(level: LogLevel) -> bool {
    try_get_global_logger()
        .map(|logger| logger.should_log(level))
        .unwrap_or(false)
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

/// Attach context pairs and hand the event to the global logger (used by macros)
pub fn log_with_context(event: LogEvent, context: Vec<(&str, &str)>) {
    let Some(logger) = try_get_global_logger() else {
        return;
    };

    let mut event = event;
    for (key, value) in context {
        event = event.with_context(key, value);
    }

    logger.log_event(event);
}
