//! Normalized HTTP requests.
//!
//! Turns heterogeneous backend responses (business codes inside 2xx bodies,
//! non-2xx statuses, timeouts, unreachable hosts) into one uniform
//! [`ApiResult`] on either the success or the error channel.
//!
//! ```no_run
//! use normalized_request::{ClientConfig, NormalizeConfig, RequestClient};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig {
//!     prefix: "http://localhost:3001".to_string(),
//!     ..ClientConfig::default()
//! };
//! let normalize = NormalizeConfig::new()
//!     .with_msg_by_biz_code(|code| code.map(|c| format!("error {}", c)))
//!     .on_error(|e| eprintln!("request failed: {}", e));
//!
//! let client = RequestClient::new(config, normalize)?;
//! let users = client.get("/users").await?;
//! println!("{:?}", users.data);
//! # Ok(())
//! # }
//! ```

// Core
pub mod client;
pub mod normalizer;

// Collaborators
pub mod token;
pub mod transport;

// Cross-cutting concerns
pub mod config;
pub mod error;
pub mod observability;

pub use client::{RequestClient, X_REQUEST_ID};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use normalizer::{ApiResult, Classification, NormalizeConfig, ResultNormalizer};
pub use token::{BearerTokenProvider, TokenProvider, TokenStore};
pub use transport::{FailureKind, HttpTransport, RawOutcome, RequestOptions, Transport, TransportFailure};
