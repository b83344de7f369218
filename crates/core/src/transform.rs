//! Affine mapping between an envelope and a discrete grid

use serde::{Deserialize, Serialize};

use crate::envelope::Envelope;
use crate::error::{Error, Result};

/// Affine transformation between two parallel coordinate systems: one
/// defined by an [`Envelope`] and one defined by a discrete zero-based
/// grid covering the same area.
///
/// The transformation is an isotropic-per-axis scaling plus a
/// translation. Column index `i` grows with X, row index `j` grows
/// with Y.
///
/// By default index lookups are clamped to the envelope: coordinates
/// below the minimum map to `-1`, coordinates above the maximum map to
/// `x_size`/`y_size`, and interior results are kept inside
/// `[0, size)`. Clamping can be disabled with [`set_clamp`], in which
/// case the caller must range-check the results itself.
///
/// [`set_clamp`]: GridTransform::set_clamp
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridTransform {
    env: Envelope,
    x_size: usize,
    y_size: usize,
    dx: f64,
    dy: f64,
    clamped: bool,
}

impl GridTransform {
    /// Create a new transform over `env` with `x_size` columns and
    /// `y_size` rows.
    ///
    /// Fails with [`Error::InvalidDimensions`] for a zero grid size and
    /// [`Error::InvalidParameter`] for an envelope with zero width or
    /// height (either would produce a degenerate cell size).
    pub fn new(env: Envelope, x_size: usize, y_size: usize) -> Result<Self> {
        if x_size == 0 || y_size == 0 {
            return Err(Error::InvalidDimensions {
                width: x_size as isize,
                height: y_size as isize,
            });
        }
        if !(env.width() > 0.0) || !(env.height() > 0.0) {
            return Err(Error::InvalidParameter {
                name: "env",
                value: format!("{:?}", env),
                reason: "envelope width and height must be positive".into(),
            });
        }

        let dx = env.width() / x_size as f64;
        let dy = env.height() / y_size as f64;

        Ok(Self {
            env,
            x_size,
            y_size,
            dx,
            dy,
            clamped: true,
        })
    }

    /// Returns a transform with the same cell scale but an envelope
    /// grown by the given per-side margins, in cells. Negative margins
    /// contract the envelope.
    ///
    /// For coordinates inside both envelopes (or with clamping off),
    /// indices in the derived grid are those of the source grid shifted
    /// by `(left, bottom)`. `dx` and `dy` are carried over verbatim so
    /// the scale is bit-identical. The clamp flag is copied.
    pub fn expand(&self, left: isize, bottom: isize, right: isize, top: isize) -> Result<Self> {
        let x_size = self.x_size as isize + left + right;
        let y_size = self.y_size as isize + bottom + top;
        if x_size <= 0 || y_size <= 0 {
            return Err(Error::InvalidDimensions {
                width: x_size,
                height: y_size,
            });
        }

        let env = Envelope::new(
            self.env.min_x - left as f64 * self.dx,
            self.env.min_y - bottom as f64 * self.dy,
            self.env.max_x + right as f64 * self.dx,
            self.env.max_y + top as f64 * self.dy,
        );

        Ok(Self {
            env,
            x_size: x_size as usize,
            y_size: y_size as usize,
            dx: self.dx,
            dy: self.dy,
            clamped: self.clamped,
        })
    }

    /// [`expand`](GridTransform::expand) with the same margin on all
    /// four sides.
    pub fn expand_uniform(&self, margin: isize) -> Result<Self> {
        self.expand(margin, margin, margin, margin)
    }

    /// Sets whether index lookups are clamped to the envelope.
    /// Default is clamped.
    pub fn set_clamp(&mut self, clamped: bool) {
        self.clamped = clamped;
    }

    pub fn is_clamped(&self) -> bool {
        self.clamped
    }

    pub fn env(&self) -> &Envelope {
        &self.env
    }

    /// Number of grid columns
    pub fn x_size(&self) -> usize {
        self.x_size
    }

    /// Number of grid rows
    pub fn y_size(&self) -> usize {
        self.y_size
    }

    /// Cell width in map units
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Cell height in map units
    pub fn dy(&self) -> f64 {
        self.dy
    }

    /// X ordinate of the center of grid column `i`.
    ///
    /// For the last column (and beyond) this returns `max_x` exactly
    /// rather than the geometric cell center, so the rightmost center
    /// always lands on the envelope boundary.
    pub fn x(&self, i: usize) -> f64 {
        if i >= self.x_size - 1 {
            return self.env.max_x;
        }
        self.env.min_x + (2 * i + 1) as f64 * self.dx / 2.0
    }

    /// Y ordinate of the center of grid row `j`. The last row returns
    /// `max_y` exactly, as in [`x`](GridTransform::x).
    pub fn y(&self, j: usize) -> f64 {
        if j >= self.y_size - 1 {
            return self.env.max_y;
        }
        self.env.min_y + (2 * j + 1) as f64 * self.dy / 2.0
    }

    /// Column index of the cell containing the X ordinate `x`.
    ///
    /// When clamped, ordinates below `min_x` map to `-1` and ordinates
    /// above `max_x` map to `x_size`; all other results stay inside
    /// `[0, x_size)`. When unclamped this is the raw
    /// `floor((x - min_x) / dx)` with no range handling.
    pub fn i(&self, x: f64) -> isize {
        if self.clamped && x > self.env.max_x {
            return self.x_size as isize;
        }
        if self.clamped && x < self.env.min_x {
            return -1;
        }
        let i = ((x - self.env.min_x) / self.dx).floor() as isize;
        // in-range ordinates can still floor to x_size at the boundary
        if self.clamped && i >= self.x_size as isize {
            return self.x_size as isize - 1;
        }
        i
    }

    /// Row index of the cell containing the Y ordinate `y`. Same
    /// clamping rules as [`i`](GridTransform::i).
    pub fn j(&self, y: f64) -> isize {
        if self.clamped && y > self.env.max_y {
            return self.y_size as isize;
        }
        if self.clamped && y < self.env.min_y {
            return -1;
        }
        let j = ((y - self.env.min_y) / self.dy).floor() as isize;
        if self.clamped && j >= self.y_size as isize {
            return self.y_size as isize - 1;
        }
        j
    }

    /// Like [`i`](GridTransform::i), but when clamped, out-of-range
    /// ordinates are pinned to the nearest valid index instead of the
    /// `-1`/`x_size` sentinels. Identical to `i` when unclamped.
    pub fn safe_i(&self, x: f64) -> isize {
        let i = self.i(x);
        if self.clamped {
            if i < 0 {
                return 0;
            }
            if i >= self.x_size as isize {
                return self.x_size as isize - 1;
            }
        }
        i
    }

    /// Like [`j`](GridTransform::j), pinning out-of-range ordinates to
    /// the nearest valid row index when clamped.
    pub fn safe_j(&self, y: f64) -> isize {
        let j = self.j(y);
        if self.clamped {
            if j < 0 {
                return 0;
            }
            if j >= self.y_size as isize {
                return self.y_size as isize - 1;
            }
        }
        j
    }
}
