//! Data models
//!
//! Catalog items, episode proxy payloads, and browse session requests/views.

pub mod content;
pub mod episode;
pub mod session;

// Re-export commonly used items
pub use content::{clamp_rating, ContentItem, ContentKind, QualityTag};
pub use episode::{
    AvailabilityQuery, AvailabilityResponse, Episode, EpisodesQuery, EpisodesResponse,
};
pub use session::{
    CreateSessionResponse, GoToPageRequest, SearchRequest, SelectSectionRequest, Section,
    SessionSearchResponse, SessionView,
};
