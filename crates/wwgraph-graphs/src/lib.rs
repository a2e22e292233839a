//! Chart rendering and figure composition for the wwgraph wastewater bot
//!
//! One composite figure per run: two faceted panel stacks (all time and the
//! last 60 days, one facet per treatment plant) drawn side by side on a
//! white canvas, with a title overlay at the top and a timestamp footer at
//! the bottom.

pub mod figure;
pub mod fonts;
pub mod loess;
pub mod panel;

pub use figure::{render, Figure};
pub use panel::PanelSpec;
