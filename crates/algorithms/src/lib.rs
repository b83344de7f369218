//! # Rastermap Algorithms
//!
//! Rasterization and density algorithms for rastermap.
//!
//! ## Available Algorithm Categories
//!
//! - **rasterize**: bounding-box, centroid and fast-line geometry
//!   rasterization over a [`GridTransform`](rastermap_core::GridTransform)
//! - **density**: heatmap surfaces from weighted point samples

pub mod density;
pub mod rasterize;

mod maybe_rayon;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::density::{HeatmapParams, HeatmapSurface};
    pub use crate::rasterize::{
        BoundingBoxRasterizer, CentroidRasterizer, FastLineRasterizer, GeometryRasterizer,
    };
    pub use rastermap_core::prelude::*;
}
