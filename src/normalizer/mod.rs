//! Response classification and error normalization.
//!
//! # Data Flow
//! ```text
//! RawOutcome (from transport)
//!     → classify.rs (decide Success | BizError | HttpStatus | Timeout | ...)
//!         → config.rs (normalize, message lookups, hooks)
//!     → result.rs (ApiResult on the Ok or Err channel)
//! ```
//!
//! # Design Decisions
//! - Classification is synchronous and runs after the transport settles
//! - A biz error inside a 2xx response is an explicit classification, not
//!   an exception jumping between paths
//! - Message lookups are consulted in fixed priority; first non-empty wins
//! - Hooks observe, they never change the outcome; a panicking hook is not caught

pub mod classify;
pub mod config;
pub mod result;

pub use classify::{Classification, ResultNormalizer};
pub use config::{default_normalize, FailureMessages, Hooks, HttpErrorResponse, NormalizeConfig};
pub use result::ApiResult;
