use egui::{Pos2, Rect, pos2};

/// Distance from `point` to the segment `start..end`.
pub fn distance_to_segment(point: Pos2, start: Pos2, end: Pos2) -> f32 {
    let segment = end - start;
    let len_sq = segment.length_sq();
    if len_sq == 0.0 {
        return point.distance(start);
    }
    let t = ((point - start).dot(segment) / len_sq).clamp(0.0, 1.0);
    point.distance(start + segment * t)
}

/// Minimum distance from `point` to any segment of the polyline.
/// A single point is treated as a zero-length segment.
pub fn distance_to_polyline(point: Pos2, points: &[Pos2]) -> Option<f32> {
    match points {
        [] => None,
        [only] => Some(point.distance(*only)),
        _ => points
            .windows(2)
            .map(|w| distance_to_segment(point, w[0], w[1]))
            .reduce(f32::min),
    }
}

/// Distance from `point` to the outline of `rect` (zero on the outline, positive
/// both inside and outside).
pub fn distance_to_rect_outline(point: Pos2, rect: Rect) -> f32 {
    if rect.contains(point) {
        let to_left = point.x - rect.min.x;
        let to_right = rect.max.x - point.x;
        let to_top = point.y - rect.min.y;
        let to_bottom = rect.max.y - point.y;
        to_left.min(to_right).min(to_top).min(to_bottom)
    } else {
        let dx = (rect.min.x - point.x).max(point.x - rect.max.x).max(0.0);
        let dy = (rect.min.y - point.y).max(point.y - rect.max.y).max(0.0);
        (dx * dx + dy * dy).sqrt()
    }
}

/// `sqrt((dx/rx)^2 + (dy/ry)^2)`: 1.0 on the ellipse inscribed in `rect`.
/// `None` when either radius is zero.
pub fn normalized_ellipse_distance(point: Pos2, rect: Rect) -> Option<f32> {
    let rx = rect.width() / 2.0;
    let ry = rect.height() / 2.0;
    if rx <= 0.0 || ry <= 0.0 {
        return None;
    }
    let center = rect.center();
    let nx = (point.x - center.x) / rx;
    let ny = (point.y - center.y) / ry;
    Some((nx * nx + ny * ny).sqrt())
}

/// Whether `point` lies within `tolerance` of the outline of the ellipse
/// inscribed in `rect`. Flat ellipses degenerate to their segment.
pub fn near_ellipse_outline(point: Pos2, rect: Rect, tolerance: f32) -> bool {
    match normalized_ellipse_distance(point, rect) {
        Some(d) => {
            let min_radius = (rect.width() / 2.0).min(rect.height() / 2.0);
            (d - 1.0).abs() * min_radius <= tolerance
        }
        None => {
            let center = rect.center();
            let (a, b) = if rect.width() > 0.0 {
                (pos2(rect.min.x, center.y), pos2(rect.max.x, center.y))
            } else {
                (pos2(center.x, rect.min.y), pos2(center.x, rect.max.y))
            };
            distance_to_segment(point, a, b) <= tolerance
        }
    }
}

/// Bounding box of a set of points, or `None` if empty.
pub fn bounds_of(points: &[Pos2]) -> Option<Rect> {
    if points.is_empty() {
        return None;
    }
    Some(Rect::from_points(points))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_to_segment() {
        let a = pos2(0.0, 0.0);
        let b = pos2(10.0, 0.0);
        assert_eq!(distance_to_segment(pos2(5.0, 3.0), a, b), 3.0);
        assert_eq!(distance_to_segment(pos2(-4.0, 3.0), a, b), 5.0);
        assert_eq!(distance_to_segment(pos2(14.0, 3.0), a, b), 5.0);
        assert_eq!(distance_to_segment(pos2(3.0, 4.0), a, a), 5.0);
    }

    #[test]
    fn test_distance_to_polyline_takes_minimum() {
        let path = [pos2(0.0, 0.0), pos2(10.0, 0.0), pos2(10.0, 10.0)];
        assert_eq!(distance_to_polyline(pos2(12.0, 5.0), &path), Some(2.0));
        assert_eq!(distance_to_polyline(pos2(1.0, 1.0), &[]), None);
        assert_eq!(distance_to_polyline(pos2(3.0, 4.0), &[Pos2::ZERO]), Some(5.0));
    }

    #[test]
    fn test_rect_outline_distance() {
        let rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(100.0, 50.0));
        assert_eq!(distance_to_rect_outline(pos2(50.0, 25.0), rect), 25.0);
        assert_eq!(distance_to_rect_outline(pos2(2.0, 25.0), rect), 2.0);
        assert_eq!(distance_to_rect_outline(pos2(103.0, 54.0), rect), 5.0);
    }

    #[test]
    fn test_ellipse_outline() {
        let rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(200.0, 100.0));
        assert!(near_ellipse_outline(pos2(200.0, 50.0), rect, 1.0));
        assert!(near_ellipse_outline(pos2(100.0, 2.0), rect, 3.0));
        assert!(!near_ellipse_outline(pos2(100.0, 50.0), rect, 5.0));
        assert!(!near_ellipse_outline(pos2(0.0, 0.0), rect, 5.0));

        let flat = Rect::from_min_max(pos2(0.0, 10.0), pos2(100.0, 10.0));
        assert!(near_ellipse_outline(pos2(50.0, 12.0), flat, 3.0));
        assert!(!near_ellipse_outline(pos2(50.0, 20.0), flat, 3.0));
    }
}
