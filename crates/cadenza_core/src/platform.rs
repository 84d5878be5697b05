//! Supported publishing platforms.

use serde::{Deserialize, Serialize};

/// A platform a content item can be published to.
///
/// The set is closed: dispatch branches on this enum rather than on raw
/// platform strings, and the publisher capability decides per variant
/// whether post deletion is supported.
///
/// # Examples
///
/// ```
/// use cadenza_core::Platform;
/// use std::str::FromStr;
///
/// assert_eq!(Platform::Bluesky.to_string(), "bluesky");
/// assert_eq!(Platform::from_str("mastodon").unwrap(), Platform::Mastodon);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Platform {
    /// Mastodon (ActivityPub)
    Mastodon,
    /// Bluesky (AT Protocol)
    Bluesky,
    /// Discord channel posting
    Discord,
    /// LinkedIn pages
    Linkedin,
    /// Tumblr blogs
    Tumblr,
}
