//! Conditional logging macros gated by a module-level `ENABLE_LOGS` flag.
//!
//! Modules that want squelchable logging define `const ENABLE_LOGS: bool` and
//! use these instead of the `log` macros directly. Useful in the sampling hot
//! loop, where per-tick chatter drowns everything else.

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}
