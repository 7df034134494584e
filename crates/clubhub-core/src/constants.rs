//! Application-wide constants.

/// API version used when `CLUBHUB_API_VERSION` is not set.
pub const DEFAULT_API_VERSION: &str = "v1";

/// Default page size for entity list requests.
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Object key stem used when a desired name slugs to nothing.
pub const FALLBACK_ASSET_STEM: &str = "asset";

/// Longest slug kept from a desired asset name.
pub const MAX_ASSET_STEM_LENGTH: usize = 64;

/// Length of a YouTube video identifier.
pub const YOUTUBE_ID_LENGTH: usize = 11;
