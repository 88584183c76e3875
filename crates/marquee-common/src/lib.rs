//! Marquee-Common: Shared types, constants, and utilities.
//!
//! This crate provides common functionality used across marquee:
//!
//! - **Typed IDs**: Type-safe UUID wrappers for request correlation
//! - **Core Types**: Enums for media types and provider capabilities
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use marquee_common::{Capability, MediaType, Error, RequestId, Result};
//!
//! // Create typed IDs
//! let request_id = RequestId::new();
//!
//! // Work with media types and capabilities
//! let media_type = MediaType::Movie;
//! let capability = Capability::Catalog;
//!
//! // Use common error types
//! fn example() -> Result<()> {
//!     Err(Error::provider_not_found("tmdb"))
//! }
//! ```

pub mod error;
pub mod ids;
pub mod types;

pub use error::{Error, Result};
pub use ids::*;
pub use types::*;
