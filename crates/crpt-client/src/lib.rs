//! crpt-client: rate-limited client for the CRPT document registration API.
//!
//! Admission is controlled by a bounded permit pool that is refilled from two
//! independent sources:
//! - a per-call delayed release, one permit returned a fixed delay after it was taken
//! - a periodic top-up that raises the pool back to capacity every time unit

mod version;

pub mod admission;
pub mod client;
pub mod config;
pub mod document;
pub mod error;
pub mod permit;
pub mod replenish;
pub mod transport;

pub use admission::AdmissionGate;
pub use client::{PoolSnapshot, SubmissionClient, SubmissionResponse};
pub use config::ClientConfig;
pub use document::{DOC_TYPE_INTRODUCE_GOODS, Description, Document, Product, SubmissionRequest};
pub use error::{BuildError, RateLimitExceeded, SubmitError, TransportError};
pub use permit::{HeldPermit, PermitPool};
pub use replenish::ReplenishCycle;
pub use transport::{HttpTransport, Transport};
pub use version::{CLIENT_VERSION, user_agent};
