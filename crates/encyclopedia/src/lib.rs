//! Encyclopedia lookup for the research stage.
//!
//! [`Encyclopedia`] is the seam the research agent depends on;
//! [`WikipediaClient`] implements it over the MediaWiki Action API.

pub mod client;
pub mod wikipedia;

pub use client::{Encyclopedia, EncyclopediaConfig, Page};
pub use wikipedia::WikipediaClient;
