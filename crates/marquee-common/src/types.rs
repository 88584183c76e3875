//! Core type definitions for media items and provider capabilities.
//!
//! This module defines the enums used throughout marquee for categorizing
//! media and for naming the facets of functionality a provider may support.
//! All enums are serialized in snake_case for compatibility with persisted
//! client state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type of a media item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// A feature film.
    Movie,
    /// A TV series.
    Series,
    /// A person (actor, director, etc.).
    Person,
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Movie => write!(f, "movie"),
            Self::Series => write!(f, "series"),
            Self::Person => write!(f, "person"),
        }
    }
}

/// A named facet of functionality that a provider may support.
///
/// This is a closed enumeration: providers declare, at registration time,
/// exactly which capabilities they implement. There is no runtime shape
/// probing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Watch activity / history feeds.
    Activity,
    /// Catalog listing and pagination.
    Catalog,
    /// External ID cross-referencing (IMDb, TVDb, ...).
    ExternalIds,
    /// A person's filmography.
    Filmography,
    /// Poster / backdrop / logo artwork.
    Images,
    /// Core descriptive metadata.
    Metadata,
    /// People lookups (cast, crew, person details).
    People,
    /// Community or critic ratings.
    Ratings,
    /// Related / recommended titles.
    Recommendations,
    /// User reviews.
    Reviews,
    /// Full-text search.
    Search,
    /// Season and episode listings for series.
    SeasonsEpisodes,
    /// Playable stream resolution.
    Streams,
    /// Subtitle lookups.
    Subtitles,
    /// Watchlist membership.
    Watchlist,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Activity => write!(f, "activity"),
            Self::Catalog => write!(f, "catalog"),
            Self::ExternalIds => write!(f, "external_ids"),
            Self::Filmography => write!(f, "filmography"),
            Self::Images => write!(f, "images"),
            Self::Metadata => write!(f, "metadata"),
            Self::People => write!(f, "people"),
            Self::Ratings => write!(f, "ratings"),
            Self::Recommendations => write!(f, "recommendations"),
            Self::Reviews => write!(f, "reviews"),
            Self::Search => write!(f, "search"),
            Self::SeasonsEpisodes => write!(f, "seasons_episodes"),
            Self::Streams => write!(f, "streams"),
            Self::Subtitles => write!(f, "subtitles"),
            Self::Watchlist => write!(f, "watchlist"),
        }
    }
}
