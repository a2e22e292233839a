//! Common error types and time helpers for the wwgraph wastewater bot

pub mod error;
pub mod time;

pub use error::{Result, WwgraphError};
