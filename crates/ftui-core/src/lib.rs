#![forbid(unsafe_code)]

//! Core: geometry, the host toolkit seam, events, and logging.

pub mod event;
pub mod geometry;
pub mod logging;
pub mod toolkit;

// Re-export tracing macros at crate root so `ftui_core::debug!` resolves
// with or without the feature.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, info, trace, trace_span, warn};
