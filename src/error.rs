use thiserror::Error;

use crate::models::ContentKind;

/// Validation failures when building catalog items
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContentError {
    #[error("content id must not be empty")]
    EmptyId,

    #[error("title must not be empty (id {0})")]
    EmptyTitle(String),

    #[error("rating {rating} for {id} is outside 0.0..=10.0")]
    RatingOutOfRange { id: String, rating: f32 },

    #[error("{field} is not meaningful for a {kind}")]
    FieldNotAllowed {
        field: &'static str,
        kind: ContentKind,
    },

    #[error("{field} must be a positive integer")]
    NonPositiveCount { field: &'static str },

    #[error("duplicate content id in snapshot: {0}")]
    DuplicateId(String),
}

/// Metadata provider (TMDB) failures
#[derive(Error, Debug)]
pub enum TmdbError {
    /// Connection, timeout or body read failure
    #[error("network error: {0}")]
    Network(String),

    /// Upstream answered 404
    #[error("not found")]
    NotFound,

    /// Any other non-2xx status
    #[error("HTTP error: {0}")]
    Http(u16),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("client setup failed: {0}")]
    Client(String),
}

/// Video-embed provider failures
#[derive(Error, Debug)]
pub enum EmbedError {
    #[error("network error: {0}")]
    Network(String),
}
