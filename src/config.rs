use crate::error::{Error, Result};
use crate::executor::PanicStrategy;

#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub num_workers: Option<usize>,
    pub stack_size: Option<usize>,
    pub thread_name_prefix: String,
    pub panic_strategy: PanicStrategy,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            num_workers: None,
            stack_size: Some(2 * 1024 * 1024),
            thread_name_prefix: "handoff-worker".to_string(),
            panic_strategy: PanicStrategy::default(),
        }
    }
}

impl PoolConfig {
    pub fn builder() -> PoolConfigBuilder {
        PoolConfigBuilder::new()
    }

    /// A worker count of zero is an error; it is never clamped to one.
    /// There is no upper bound: the OS thread limit is reported by `start`.
    pub fn validate(&self) -> Result<()> {
        if self.num_workers == Some(0) {
            return Err(Error::config("num_workers must be > 0"));
        }

        if let Some(0) = self.stack_size {
            return Err(Error::config("stack_size must be > 0"));
        }

        Ok(())
    }

    pub fn worker_count(&self) -> usize {
        self.num_workers.unwrap_or_else(num_cpus::get)
    }
}

#[derive(Debug, Default)]
pub struct PoolConfigBuilder {
    config: PoolConfig,
}

impl PoolConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: PoolConfig::default(),
        }
    }

    pub fn num_workers(mut self, n: usize) -> Self {
        self.config.num_workers = Some(n);
        self
    }

    pub fn stack_size(mut self, size: usize) -> Self {
        self.config.stack_size = Some(size);
        self
    }

    pub fn thread_name_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.config.thread_name_prefix = prefix.into();
        self
    }

    pub fn panic_strategy(mut self, strategy: PanicStrategy) -> Self {
        self.config.panic_strategy = strategy;
        self
    }

    pub fn build(self) -> Result<PoolConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Settings shared by every participant of a relay ring.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub rounds: usize,
    pub thread_name_prefix: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            rounds: 1,
            thread_name_prefix: "handoff-relay".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PoolConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.worker_count() >= 1);
    }

    #[test]
    fn test_builder() {
        let config = PoolConfig::builder()
            .num_workers(5)
            .thread_name_prefix("jobs")
            .panic_strategy(PanicStrategy::Isolate)
            .build()
            .unwrap();

        assert_eq!(config.worker_count(), 5);
        assert_eq!(config.thread_name_prefix, "jobs");
        assert_eq!(config.panic_strategy, PanicStrategy::Isolate);
    }

    #[test]
    fn test_zero_workers_rejected() {
        let result = PoolConfig::builder().num_workers(0).build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_large_worker_counts_accepted() {
        for n in [1, 1025, 4096] {
            let config = PoolConfig::builder().num_workers(n).build().unwrap();
            assert_eq!(config.worker_count(), n);
        }
    }

    #[test]
    fn test_zero_stack_rejected() {
        let result = PoolConfig::builder().stack_size(0).build();
        assert!(result.is_err());
    }
}
