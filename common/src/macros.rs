//! Status macros shared by every crate in the workspace.
//!
//! They are thin wrappers over [`tracing`] events with a dedicated target so the
//! terminal formatter can pick a symbol for them.

/// Reports a step that completed.
#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "authbench::success", $($arg)*)
    };
}

/// Reports a condition the operator should look at.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        ::tracing::warn!($($arg)*)
    };
}
