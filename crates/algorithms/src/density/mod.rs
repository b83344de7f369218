//! Density surfaces from scattered point samples

mod heatmap;

pub use heatmap::{HeatmapParams, HeatmapSurface};
