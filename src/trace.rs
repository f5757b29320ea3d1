//! Logging shims over the optional `tracing` dependency.
//!
//! With the `tracing` feature disabled these expand to nothing, so call sites
//! must only pass expressions that are free to skip.

macro_rules! trace_debug {
    ($($arg:tt)+) => {
        #[cfg(feature = "tracing")]
        tracing::debug!($($arg)+);
    };
}

macro_rules! trace_trace {
    ($($arg:tt)+) => {
        #[cfg(feature = "tracing")]
        tracing::trace!($($arg)+);
    };
}
