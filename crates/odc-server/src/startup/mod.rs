//! Application startup utilities

mod http;
mod logging;
mod shutdown;

pub use http::{build_state, main_server};
pub use logging::{LogRotation, LoggingConfig, LoggingGuard, init_logging};
pub use shutdown::{ShutdownSignal, shutdown_on_os_signal};
