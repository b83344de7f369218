//! Geometry rasterization
//!
//! Converts vector geometry into the set of grid cells it occupies,
//! delivering one visit per covered cell to a caller-supplied closure.
//! Three strategies are provided:
//! - [`BoundingBoxRasterizer`]: every cell of the geometry's bounding
//!   rectangle
//! - [`CentroidRasterizer`]: the single cell containing the centroid
//! - [`FastLineRasterizer`]: Bresenham walk along line geometries

mod bounding_box;
mod centroid;
mod fast_line;

pub use bounding_box::BoundingBoxRasterizer;
pub use centroid::CentroidRasterizer;
pub use fast_line::FastLineRasterizer;

use geo_types::Geometry;
use rastermap_core::{GridTransform, Result};

/// A rasterization strategy.
///
/// `rasterize` visits every grid cell the geometry occupies under the
/// given transform, calling `visit(i, j)` once per cell in a
/// deterministic, algorithm-defined order. Per-geometry user data is
/// carried by capturing it in the closure. Whether out-of-range indices
/// can reach the closure depends on the strategy; see each
/// implementation.
pub trait GeometryRasterizer {
    fn rasterize(
        &self,
        trans: &GridTransform,
        geom: &Geometry<f64>,
        visit: &mut dyn FnMut(isize, isize),
    ) -> Result<()>;
}

/// Human-readable geometry kind tag, for error messages
pub(crate) fn geometry_kind(geom: &Geometry<f64>) -> &'static str {
    match geom {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}
