//! Wastewater COVID-19 chart bot for Metro Vancouver
//!
//! The run is a single sequential pipeline: fetch the portal dataset, check
//! the publish guard, render the composite figure, post to each enabled
//! platform, and persist the marker that suppresses duplicate posts.

pub mod caption;
pub mod guard;
pub mod mastodon;
pub mod oauth;
pub mod pipeline;
pub mod publisher;
pub mod twitter;

pub use pipeline::{run, RunOptions};
pub use publisher::Publisher;
