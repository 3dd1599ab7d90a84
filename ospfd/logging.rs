#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => {{
        ::log::info!($($arg)*)
    }};
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        ::log::debug!($($arg)*)
    }};
}

#[macro_export]
macro_rules! log_warning {
    ($($arg:tt)*) => {{
        ::log::warn!($($arg)*)
    }};
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        ::log::error!($($arg)*)
    }};
}

/// State changes and new neighbors, logged under their own target so they can be
/// filtered with `RUST_LOG=ospfd::adjacency=info`.
#[macro_export]
macro_rules! log_success {
    ($($arg:tt)*) => {{
        ::log::info!(target: "ospfd::adjacency", $($arg)*)
    }};
}

/// Installs the env_logger backend, `info` unless `RUST_LOG` says otherwise.
pub fn init() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
