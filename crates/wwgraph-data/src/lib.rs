//! Metro Vancouver wastewater portal client and dataset model
//!
//! The portal is a SharePoint list exposed through its OData "verbose" API.
//! Fetching is a three-step dance: obtain a form digest from the contextinfo
//! endpoint, page through the list items with the digest as a request
//! header, then read the list's own metadata for its last-modified time.

pub mod client;
pub mod schema;
pub mod snapshot;

pub use client::{PortalClient, PortalConfig};
pub use snapshot::{display_plant_name, Measurement, Snapshot};
