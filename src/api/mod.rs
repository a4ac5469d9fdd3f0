//! Backend contract.
//!
//! The natural-language translation, database access and CSV parsing all
//! live behind three HTTP endpoints. This module owns the wire types, the
//! [`Backend`] seam and its HTTP implementation.
//!
//! - [`client`]: [`Backend`] trait and [`HttpBackend`]
//! - [`types`]: request/response DTOs
//! - [`error`]: [`ApiError`] taxonomy (transport, protocol, application)

pub mod client;
pub mod error;
pub mod types;

pub use client::{Backend, HttpBackend};
pub use error::{ApiError, RAW_BODY_EXCERPT_CHARS, Result};
pub use types::{ErrorBody, ImportResponse, QueryRequest, QueryResult, SetupResponse};
