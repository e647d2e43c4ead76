// Logging macro shims.
// These forward to il2_common::logging::Logger methods so format arguments
// are only evaluated into a message when the level is enabled.

#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => {{
        ($logger).debug_args(format_args!($($arg)*));
    }}
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => {{
        ($logger).info_args(format_args!($($arg)*));
    }}
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)*) => {{
        ($logger).warn_args(format_args!($($arg)*));
    }}
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)*) => {{
        ($logger).error_args(format_args!($($arg)*));
    }}
}
