pub use crate::config::{PoolConfig, PoolConfigBuilder, RelayConfig};
pub use crate::error::{Error, Result};
pub use crate::executor::{PanicStrategy, WorkerPool, WorkerStats};
pub use crate::relay::{RelayReport, RelayScheduler};
pub use crate::util::StopSignal;
