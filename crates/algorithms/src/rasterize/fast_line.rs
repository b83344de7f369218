//! Line rasterization with integer Bresenham stepping

use geo_types::{Geometry, LineString};
use rastermap_core::{Error, GridTransform, Result};

use super::{geometry_kind, GeometryRasterizer};

/// Rasterizer for lineal geometries using fast integer arithmetic.
///
/// Accepts `Line`, `LineString` and `MultiLineString` geometries only;
/// anything else is an [`Error::UnsupportedGeometry`].
///
/// Segment endpoints are mapped with an unclamped copy of the
/// transform, so segments leaving the grid emit out-of-range indices;
/// the caller is responsible for discarding cells it cannot use. The
/// walk between the endpoint cells is 8-connected with no gaps,
/// regardless of slope sign or steepness, and coincident endpoints emit
/// a single cell.
pub struct FastLineRasterizer;

impl GeometryRasterizer for FastLineRasterizer {
    fn rasterize(
        &self,
        trans: &GridTransform,
        geom: &Geometry<f64>,
        visit: &mut dyn FnMut(isize, isize),
    ) -> Result<()> {
        // endpoint mapping must not clamp, whatever the caller's flag
        let mut raw = *trans;
        raw.set_clamp(false);

        match geom {
            Geometry::Line(line) => {
                let i0 = raw.i(line.start.x);
                let j0 = raw.j(line.start.y);
                let i1 = raw.i(line.end.x);
                let j1 = raw.j(line.end.y);
                bresenham(i0, j0, i1, j1, visit);
            }
            Geometry::LineString(string) => draw(&raw, string, visit),
            Geometry::MultiLineString(strings) => {
                for string in &strings.0 {
                    draw(&raw, string, visit);
                }
            }
            other => {
                return Err(Error::UnsupportedGeometry {
                    rasterizer: "FastLineRasterizer",
                    kind: geometry_kind(other),
                })
            }
        }

        Ok(())
    }
}

fn draw(trans: &GridTransform, string: &LineString<f64>, visit: &mut dyn FnMut(isize, isize)) {
    for segment in string.lines() {
        let i0 = trans.i(segment.start.x);
        let j0 = trans.j(segment.start.y);
        let i1 = trans.i(segment.end.x);
        let j1 = trans.j(segment.end.y);

        bresenham(i0, j0, i1, j1, visit);
    }
}

/// Walk the discrete 8-connected line from `(i0, j0)` to `(i1, j1)`,
/// visiting both endpoints.
fn bresenham(
    mut i0: isize,
    mut j0: isize,
    i1: isize,
    j1: isize,
    visit: &mut dyn FnMut(isize, isize),
) {
    let di = (i1 - i0).abs();
    let dj = (j1 - j0).abs();

    let si = if i0 < i1 { 1 } else { -1 };
    let sj = if j0 < j1 { 1 } else { -1 };

    let mut err = di - dj;

    loop {
        visit(i0, j0);
        if i0 == i1 && j0 == j1 {
            break;
        }
        let e2 = err * 2;
        if e2 > -dj {
            err -= dj;
            i0 += si;
        }
        if e2 < di {
            err += di;
            j0 += sj;
        }
    }
}
