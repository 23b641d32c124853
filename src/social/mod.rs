//! Posting clients for the platforms new releases are announced on.
//!
//! Both publishers take platform independent [`Post`](crate::types::Post)s,
//! render their links the way the platform expects and split texts longer
//! than the platform limit with [`segment`](crate::text::segment).

pub mod bluesky;
pub mod telegram;

pub use bluesky::{BlueskyClient, Facet, FacetFeature, detect_facets};
pub use telegram::TelegramClient;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SocialError {
    #[error("request to {platform} failed: {source}")]
    Http {
        platform: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{platform} answered {status}: {message}")]
    Api {
        platform: &'static str,
        status: u16,
        message: String,
    },
    #[error("not logged in to {0}")]
    NotAuthenticated(&'static str),
}

impl SocialError {
    pub(crate) fn http(platform: &'static str) -> impl Fn(reqwest::Error) -> SocialError {
        move |source| SocialError::Http { platform, source }
    }
}
