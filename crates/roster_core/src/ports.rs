//! crates/roster_core/src/ports.rs
//!
//! Defines the service contracts (traits) the roster core depends on.
//! These traits form the boundary of the hexagonal architecture, keeping the
//! core independent of the REST backend that actually stores profiles.

use crate::domain::{PhotoRef, Profile, ProfileDraft, ProfileId};
use crate::validation::ValidationErrors;
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// The error type for all port operations and the store built on them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    /// The draft was rejected locally; no request was sent.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("Item not found: {0}")]
    NotFound(String),
    /// The request could not complete (connection refused, DNS, broken body...).
    #[error("Network error: {0}")]
    Network(String),
    /// The backend answered with a non-success status.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Request cancelled")]
    Cancelled,
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Fetches the full profile collection, in backend order.
    async fn list_profiles(&self) -> PortResult<Vec<Profile>>;

    /// Submits a new profile. The draft's photo is uploaded with it.
    async fn create_profile(&self, draft: &ProfileDraft) -> PortResult<Profile>;

    /// Replaces every mutable field of profile `id`.
    async fn update_profile(&self, id: &ProfileId, draft: &ProfileDraft) -> PortResult<Profile>;

    async fn delete_profile(&self, id: &ProfileId) -> PortResult<()>;
}

#[async_trait]
pub trait PhotoRepository: Send + Sync {
    /// The absolute URL the stored photo is served from.
    fn photo_url(&self, photo: &PhotoRef) -> PortResult<String>;

    /// Downloads the stored image bytes.
    async fn fetch_photo(&self, photo: &PhotoRef) -> PortResult<Bytes>;
}
