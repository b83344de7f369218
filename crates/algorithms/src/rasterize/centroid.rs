//! Centroid rasterization

use geo::Centroid;
use geo_types::Geometry;
use rastermap_core::{GridTransform, Result};

use super::GeometryRasterizer;

/// Rasterizer that sets a single cell at the centroid of the geometry.
///
/// The centroid is mapped with the plain `i`/`j` lookup and checked
/// against the grid bounds explicitly; a centroid falling outside
/// `[0, x_size) x [0, y_size)` is silently dropped (no visit, no
/// error), as is a geometry without a centroid.
pub struct CentroidRasterizer;

impl GeometryRasterizer for CentroidRasterizer {
    fn rasterize(
        &self,
        trans: &GridTransform,
        geom: &Geometry<f64>,
        visit: &mut dyn FnMut(isize, isize),
    ) -> Result<()> {
        let centroid = match geom.centroid() {
            Some(p) => p,
            None => return Ok(()),
        };

        let i = trans.i(centroid.x());
        let j = trans.j(centroid.y());

        if i < 0 || i >= trans.x_size() as isize {
            return Ok(());
        }
        if j < 0 || j >= trans.y_size() as isize {
            return Ok(());
        }

        visit(i, j);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{polygon, MultiPoint, Point, Polygon};
    use rastermap_core::Envelope;

    fn grid_10x10() -> GridTransform {
        GridTransform::new(Envelope::new(0.0, 0.0, 10.0, 10.0), 10, 10).unwrap()
    }

    fn collect_cells(trans: &GridTransform, geom: &Geometry<f64>) -> Vec<(isize, isize)> {
        let mut cells = Vec::new();
        CentroidRasterizer
            .rasterize(trans, geom, &mut |i, j| cells.push((i, j)))
            .unwrap();
        cells
    }

    #[test]
    fn test_point_centroid() {
        let trans = grid_10x10();
        let cells = collect_cells(&trans, &Geometry::Point(Point::new(3.5, 7.5)));
        assert_eq!(cells, vec![(3, 7)]);
    }

    #[test]
    fn test_polygon_centroid_single_visit() {
        let trans = grid_10x10();
        // square centered on (5.0, 5.0)
        let poly: Polygon<f64> = polygon![
            (x: 4.0, y: 4.0),
            (x: 6.0, y: 4.0),
            (x: 6.0, y: 6.0),
            (x: 4.0, y: 6.0),
            (x: 4.0, y: 4.0),
        ];
        let cells = collect_cells(&trans, &Geometry::Polygon(poly));
        assert_eq!(cells, vec![(5, 5)]);
    }

    #[test]
    fn test_out_of_grid_centroid_is_dropped() {
        let trans = grid_10x10();
        assert!(collect_cells(&trans, &Geometry::Point(Point::new(-2.0, 5.0))).is_empty());
        assert!(collect_cells(&trans, &Geometry::Point(Point::new(5.0, 12.0))).is_empty());
    }

    #[test]
    fn test_centroidless_geometry_is_dropped() {
        let trans = grid_10x10();
        let empty = Geometry::MultiPoint(MultiPoint::<f64>(vec![]));
        assert!(collect_cells(&trans, &empty).is_empty());
    }

    #[test]
    fn test_centroid_outside_but_box_inside() {
        let trans = grid_10x10();
        // centroid of this two-point multipoint lies outside the grid
        let mp = MultiPoint::<f64>(vec![Point::new(5.0, 5.0), Point::new(5.0, 25.0)]);
        assert!(collect_cells(&trans, &Geometry::MultiPoint(mp)).is_empty());
    }
}
