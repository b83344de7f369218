//! Bounding-box rasterization

use geo::BoundingRect;
use geo_types::Geometry;
use rastermap_core::{GridTransform, Result};

use super::GeometryRasterizer;

/// Rasterizer that covers the entire bounding rectangle of the
/// geometry.
///
/// The rectangle's corners are mapped with `safe_i`/`safe_j`, so on a
/// clamped transform every visited index is already pinned inside the
/// grid. Cells are visited column by column (`i` outer, `j` inner),
/// each exactly once. A geometry with no bounding rectangle (e.g. an
/// empty `MultiPoint`) produces no visits.
pub struct BoundingBoxRasterizer;

impl GeometryRasterizer for BoundingBoxRasterizer {
    fn rasterize(
        &self,
        trans: &GridTransform,
        geom: &Geometry<f64>,
        visit: &mut dyn FnMut(isize, isize),
    ) -> Result<()> {
        let rect = match geom.bounding_rect() {
            Some(rect) => rect,
            None => return Ok(()),
        };

        let min_i = trans.safe_i(rect.min().x);
        let min_j = trans.safe_j(rect.min().y);
        let max_i = trans.safe_i(rect.max().x);
        let max_j = trans.safe_j(rect.max().y);

        for i in min_i..=max_i {
            for j in min_j..=max_j {
                visit(i, j);
            }
        }

        Ok(())
    }
}
