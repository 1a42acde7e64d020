//! Library lifecycle handle.
//!
//! Replaces the hidden-global `initialize()`/`terminate()` pair from the
//! original source with an explicit value: a `DsssContext` owns the
//! `SignalLogger` and is threaded by reference through call sites that want
//! to log. `init`/`shutdown` are idempotent and a double-call is reported
//! rather than silently ignored.

use crate::errors::{ConfigError, Result};
use crate::logging::{LogConfig, SignalLogger};

/// Owns the process-wide logger for one run of the pipeline.
#[derive(Debug)]
pub struct DsssContext {
    logger: SignalLogger,
    shut_down: bool,
}

impl DsssContext {
    /// Construct a context with the default [`LogConfig`].
    pub fn init() -> Result<Self> {
        Self::init_with(LogConfig::default())
    }

    /// Construct a context with an explicit [`LogConfig`].
    pub fn init_with(config: LogConfig) -> Result<Self> {
        Ok(Self {
            logger: SignalLogger::new(config),
            shut_down: false,
        })
    }

    pub fn logger(&self) -> &SignalLogger {
        &self.logger
    }

    pub fn logger_mut(&mut self) -> &mut SignalLogger {
        &mut self.logger
    }

    /// Mark the context as shut down. A second call returns
    /// `ConfigError::NotInitialized` rather than silently succeeding.
    pub fn shutdown(&mut self) -> Result<()> {
        if self.shut_down {
            return Err(ConfigError::NotInitialized.into());
        }
        self.shut_down = true;
        Ok(())
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shutdown_is_idempotent_check() {
        let mut ctx = DsssContext::init().unwrap();
        assert!(ctx.shutdown().is_ok());
        assert!(ctx.shutdown().is_err());
    }

    #[test]
    fn init_with_custom_config_is_applied() {
        let ctx = DsssContext::init_with(LogConfig::quiet()).unwrap();
        assert!(!ctx.is_shut_down());
    }
}
