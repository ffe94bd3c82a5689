//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! client / normalizer / transport produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms via the metrics facade)
//!
//! Consumers:
//!     → whatever subscriber / recorder the host application installs
//! ```
//!
//! # Design Decisions
//! - The library never installs a metrics recorder itself
//! - Request ID flows from the outgoing header into log fields
//! - Metrics are cheap (no-ops without a recorder)

pub mod logging;
pub mod metrics;
