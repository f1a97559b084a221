use egui::{Pos2, Rect, Vec2, pos2};

use crate::error::EditorError;

/// A 2D affine transform stored as a row-major 3x3 matrix.
///
/// The last row is always `[0, 0, 1]`. Points are column vectors, so
/// `a.then(&b)` maps through `a` first and `b` second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformMatrix {
    m: [[f32; 3]; 3],
}

impl Default for TransformMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl TransformMatrix {
    pub const IDENTITY: Self = Self {
        m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        Self {
            m: [[sx, 0.0, 0.0], [0.0, sy, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    pub fn translate(offset: Vec2) -> Self {
        Self {
            m: [[1.0, 0.0, offset.x], [0.0, 1.0, offset.y], [0.0, 0.0, 1.0]],
        }
    }

    /// Clockwise rotation (y points down) about `pivot`.
    ///
    /// Multiples of 90 degrees use exact sine/cosine values so repeated
    /// quarter turns do not accumulate error.
    pub fn rotation(degrees: f32, pivot: Pos2) -> Self {
        let (sin, cos) = exact_sin_cos(degrees);
        let rotate = Self {
            m: [[cos, -sin, 0.0], [sin, cos, 0.0], [0.0, 0.0, 1.0]],
        };
        Self::translate(-pivot.to_vec2())
            .then(&rotate)
            .then(&Self::translate(pivot.to_vec2()))
    }

    /// Apply `self`, then `next`.
    pub fn then(&self, next: &Self) -> Self {
        Self {
            m: multiply_matrices(&next.m, &self.m),
        }
    }

    pub fn map_point(&self, p: Pos2) -> Pos2 {
        let m = &self.m;
        pos2(
            m[0][0] * p.x + m[0][1] * p.y + m[0][2],
            m[1][0] * p.x + m[1][1] * p.y + m[1][2],
        )
    }

    /// Map a direction, ignoring translation.
    pub fn map_vec(&self, v: Vec2) -> Vec2 {
        let m = &self.m;
        Vec2::new(m[0][0] * v.x + m[0][1] * v.y, m[1][0] * v.x + m[1][1] * v.y)
    }

    /// Bounding box of the four mapped corners.
    pub fn map_rect(&self, rect: Rect) -> Rect {
        let corners = [
            self.map_point(rect.left_top()),
            self.map_point(rect.right_top()),
            self.map_point(rect.left_bottom()),
            self.map_point(rect.right_bottom()),
        ];
        Rect::from_points(&corners)
    }

    pub fn determinant(&self) -> f32 {
        self.m[0][0] * self.m[1][1] - self.m[0][1] * self.m[1][0]
    }

    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let [[a, b, tx], [c, d, ty], _] = self.m;
        let inv_det = 1.0 / det;
        let ia = d * inv_det;
        let ib = -b * inv_det;
        let ic = -c * inv_det;
        let id = a * inv_det;
        Some(Self {
            m: [
                [ia, ib, -(ia * tx + ib * ty)],
                [ic, id, -(ic * tx + id * ty)],
                [0.0, 0.0, 1.0],
            ],
        })
    }

    /// Length scale of the transform, used to size strokes on screen.
    pub fn uniform_scale(&self) -> f32 {
        self.determinant().abs().sqrt()
    }

    pub fn translation(&self) -> Vec2 {
        Vec2::new(self.m[0][2], self.m[1][2])
    }

    pub fn to_array(&self) -> [[f32; 3]; 3] {
        self.m
    }
}

/// Uniform scale-to-fit (never upscaling) followed by centering in the view.
pub fn fit_to_view(raster_size: Vec2, view_size: Vec2) -> TransformMatrix {
    if raster_size.x <= 0.0 || raster_size.y <= 0.0 || view_size.x <= 0.0 || view_size.y <= 0.0 {
        return TransformMatrix::identity();
    }
    let scale = (view_size.x / raster_size.x)
        .min(view_size.y / raster_size.y)
        .min(1.0);
    let offset = (view_size - raster_size * scale) / 2.0;
    TransformMatrix::scale(scale, scale).then(&TransformMatrix::translate(offset))
}

/// Number of clockwise quarter turns for `degrees`, or an error if it is not
/// a multiple of 90.
pub fn quarter_turns(degrees: i32) -> Result<u8, EditorError> {
    if degrees % 90 != 0 {
        return Err(EditorError::UnsupportedRotation(degrees));
    }
    Ok((degrees / 90).rem_euclid(4) as u8)
}

/// Remap for a raster of `size` rotated by `turns` clockwise quarter turns.
/// Returns the matrix and the rotated raster size.
pub fn quarter_turn_remap(size: Vec2, turns: u8) -> (TransformMatrix, Vec2) {
    let turns = turns % 4;
    let new_size = if turns % 2 == 1 { Vec2::new(size.y, size.x) } else { size };
    let center = (size / 2.0).to_pos2();
    let matrix = TransformMatrix::rotation(90.0 * turns as f32, center)
        .then(&TransformMatrix::translate(new_size / 2.0 - size / 2.0));
    (matrix, new_size)
}

/// `x -> width - x`
pub fn flip_horizontal_remap(width: f32) -> TransformMatrix {
    TransformMatrix::scale(-1.0, 1.0).then(&TransformMatrix::translate(Vec2::new(width, 0.0)))
}

/// `y -> height - y`
pub fn flip_vertical_remap(height: f32) -> TransformMatrix {
    TransformMatrix::scale(1.0, -1.0).then(&TransformMatrix::translate(Vec2::new(0.0, height)))
}

/// The on-screen transform together with its inverse.
///
/// The inverse is only ever produced by [`ViewTransform::new`], so it can never
/// go stale relative to the forward matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    forward: TransformMatrix,
    inverse: TransformMatrix,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            forward: TransformMatrix::identity(),
            inverse: TransformMatrix::identity(),
        }
    }
}

impl ViewTransform {
    /// Falls back to identity if `forward` is singular.
    pub fn new(forward: TransformMatrix) -> Self {
        match forward.inverse() {
            Some(inverse) => Self { forward, inverse },
            None => {
                log::warn!("Singular view transform {:?}, using identity", forward);
                Self::default()
            }
        }
    }

    pub fn fit(raster_size: Vec2, view_size: Vec2) -> Self {
        Self::new(fit_to_view(raster_size, view_size))
    }

    pub fn forward(&self) -> &TransformMatrix {
        &self.forward
    }

    pub fn inverse(&self) -> &TransformMatrix {
        &self.inverse
    }

    pub fn image_to_view(&self, p: Pos2) -> Pos2 {
        self.forward.map_point(p)
    }

    pub fn image_rect_to_view(&self, rect: Rect) -> Rect {
        self.forward.map_rect(rect)
    }

    /// Unclamped inverse mapping.
    pub fn view_to_image(&self, p: Pos2) -> Pos2 {
        self.inverse.map_point(p)
    }

    pub fn view_rect_to_image(&self, rect: Rect) -> Rect {
        self.inverse.map_rect(rect)
    }

    /// Inverse mapping clamped into `[0, w] x [0, h]`.
    pub fn view_to_image_clamped(&self, p: Pos2, raster_size: Vec2) -> Pos2 {
        let image = self.view_to_image(p);
        pos2(
            image.x.clamp(0.0, raster_size.x.max(0.0)),
            image.y.clamp(0.0, raster_size.y.max(0.0)),
        )
    }

    pub fn scale(&self) -> f32 {
        self.forward.uniform_scale()
    }
}

fn exact_sin_cos(degrees: f32) -> (f32, f32) {
    let normalized = degrees.rem_euclid(360.0);
    if normalized == 0.0 {
        (0.0, 1.0)
    } else if normalized == 90.0 {
        (1.0, 0.0)
    } else if normalized == 180.0 {
        (0.0, -1.0)
    } else if normalized == 270.0 {
        (-1.0, 0.0)
    } else {
        degrees.to_radians().sin_cos()
    }
}

const fn const_multiply_matrices(a: &[[f32; 3]; 3], b: &[[f32; 3]; 3]) -> [[f32; 3]; 3] {
    let mut result = [[0.0; 3]; 3];
    let mut i = 0;
    while i < 3 {
        let mut j = 0;
        while j < 3 {
            let mut k = 0;
            while k < 3 {
                result[i][j] += a[i][k] * b[k][j];
                k += 1;
            }
            j += 1;
        }
        i += 1;
    }
    result
}

fn multiply_matrices(a: &[[f32; 3]; 3], b: &[[f32; 3]; 3]) -> [[f32; 3]; 3] {
    const_multiply_matrices(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::vec2;

    fn assert_pos_eq(a: Pos2, b: Pos2) {
        assert!((a - b).length() < 0.001, "{a:?} != {b:?}");
    }

    #[test]
    fn test_fit_to_view_never_upscales() {
        let small = fit_to_view(vec2(100.0, 50.0), vec2(1000.0, 1000.0));
        assert_eq!(small.uniform_scale(), 1.0);
        assert_pos_eq(small.map_point(Pos2::ZERO), pos2(450.0, 475.0));

        let large = fit_to_view(vec2(800.0, 600.0), vec2(400.0, 400.0));
        assert!((large.uniform_scale() - 0.5).abs() < 1e-6);
        // 800x600 at 0.5 is 400x300, centered vertically.
        assert_pos_eq(large.map_point(Pos2::ZERO), pos2(0.0, 50.0));
        assert_pos_eq(large.map_point(pos2(800.0, 600.0)), pos2(400.0, 350.0));
    }

    #[test]
    fn test_fit_to_view_degenerate_sizes_are_identity() {
        assert_eq!(fit_to_view(Vec2::ZERO, vec2(10.0, 10.0)), TransformMatrix::identity());
        assert_eq!(fit_to_view(vec2(10.0, 10.0), Vec2::ZERO), TransformMatrix::identity());
    }

    #[test]
    fn test_inverse_roundtrip() {
        let m = TransformMatrix::scale(0.5, 0.5)
            .then(&TransformMatrix::translate(vec2(20.0, 20.0)))
            .then(&TransformMatrix::rotation(90.0, pos2(3.0, 4.0)));
        let inv = m.inverse().unwrap();
        let p = pos2(123.0, -45.0);
        assert_pos_eq(inv.map_point(m.map_point(p)), p);
        assert!(TransformMatrix::scale(0.0, 1.0).inverse().is_none());
    }

    #[test]
    fn test_quarter_turn_remaps() {
        let size = vec2(800.0, 600.0);
        let (m90, s90) = quarter_turn_remap(size, 1);
        assert_eq!(s90, vec2(600.0, 800.0));
        assert_eq!(m90.map_point(pos2(10.0, 10.0)), pos2(590.0, 10.0));
        assert_eq!(m90.map_point(pos2(50.0, 30.0)), pos2(570.0, 50.0));

        let (m180, s180) = quarter_turn_remap(size, 2);
        assert_eq!(s180, size);
        assert_eq!(m180.map_point(pos2(10.0, 20.0)), pos2(790.0, 580.0));

        let (m270, s270) = quarter_turn_remap(size, 3);
        assert_eq!(s270, vec2(600.0, 800.0));
        assert_eq!(m270.map_point(pos2(10.0, 20.0)), pos2(20.0, 790.0));
    }

    #[test]
    fn test_quarter_turns_normalization() {
        assert_eq!(quarter_turns(90), Ok(1));
        assert_eq!(quarter_turns(-90), Ok(3));
        assert_eq!(quarter_turns(450), Ok(1));
        assert_eq!(quarter_turns(0), Ok(0));
        assert_eq!(quarter_turns(45), Err(EditorError::UnsupportedRotation(45)));
    }

    #[test]
    fn test_flip_remaps_are_involutions() {
        let flip = flip_horizontal_remap(800.0);
        let p = pos2(10.25, 33.0);
        assert_eq!(flip.map_point(p), pos2(789.75, 33.0));
        assert_eq!(flip.map_point(flip.map_point(p)), p);

        let flip_v = flip_vertical_remap(600.0);
        assert_eq!(flip_v.map_point(p), pos2(10.25, 567.0));
    }

    #[test]
    fn test_view_to_image_clamps() {
        let view = ViewTransform::new(
            TransformMatrix::scale(0.5, 0.5).then(&TransformMatrix::translate(vec2(20.0, 20.0))),
        );
        let size = vec2(800.0, 600.0);
        assert_pos_eq(view.view_to_image(pos2(0.0, 0.0)), pos2(-40.0, -40.0));
        assert_pos_eq(view.view_to_image_clamped(pos2(0.0, 0.0), size), Pos2::ZERO);
        assert_pos_eq(view.view_to_image_clamped(pos2(1000.0, 1000.0), size), pos2(800.0, 600.0));
    }

    #[test]
    fn test_map_rect_normalizes_after_rotation() {
        let (m, _) = quarter_turn_remap(vec2(100.0, 50.0), 1);
        let rect = m.map_rect(Rect::from_min_max(pos2(10.0, 5.0), pos2(20.0, 15.0)));
        assert_eq!(rect.min, pos2(35.0, 10.0));
        assert_eq!(rect.max, pos2(45.0, 20.0));
    }
}
