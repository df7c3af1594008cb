//! Internal logging macros.
//!
//! The engine never talks to a logging backend directly; every diagnostic
//! goes through one of the `*_log!` macros below, which expand to the
//! [`log`](https://docs.rs/log) crate (default) or to
//! [`tracing`](https://docs.rs/tracing) when that feature is enabled
//! instead. With neither feature the macros expand to nothing. The two
//! features are mutually exclusive — enable at most one.
//!
//! What the engine logs where:
//!
//! - **info** — route registration, navigation start and completion,
//!   redirects.
//! - **debug** — pipeline decisions: guard vetoes, filter short-circuits,
//!   cancellations, handled errors, unmatched fragments.
//! - **trace** — fragment matching detail.
//! - **warn** — duplicate route names, unknown names in queries, ignored
//!   after-filter cancels, redirect-depth aborts.
//! - **error** — failed navigations.
//!
//! All macros take `format!`-style arguments:
//!
//! ```ignore
//! info_log!("Registered route `{}` -> `{}`", name, template);
//! debug_log!("Navigation to `{}` vetoed by guard", fragment);
//! ```

/// Log at **trace** level through the configured backend.
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::trace!($($arg)*);
        #[cfg(feature = "log")]
        ::log::trace!($($arg)*);
    };
}

/// Log at **debug** level through the configured backend.
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!($($arg)*);
        #[cfg(feature = "log")]
        ::log::debug!($($arg)*);
    };
}

/// Log at **info** level through the configured backend.
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::info!($($arg)*);
        #[cfg(feature = "log")]
        ::log::info!($($arg)*);
    };
}

/// Log at **warn** level through the configured backend.
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::warn!($($arg)*);
        #[cfg(feature = "log")]
        ::log::warn!($($arg)*);
    };
}

/// Log at **error** level through the configured backend.
#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::error!($($arg)*);
        #[cfg(feature = "log")]
        ::log::error!($($arg)*);
    };
}
