use egui::{Color32, Pos2, Rect, pos2};
use image::RgbaImage;

/// Source-over blend of an unmultiplied color into one pixel.
pub fn blend_pixel(img: &mut RgbaImage, x: u32, y: u32, color: Color32) {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    if a == 0 {
        return;
    }
    let dst = img.get_pixel(x, y).0;
    let src_a = a as f32 / 255.0;
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    if out_a <= 0.0 {
        return;
    }
    let blend = |src: u8, dst: u8| {
        let src_f = src as f32 / 255.0;
        let dst_f = dst as f32 / 255.0;
        ((src_f * src_a + dst_f * dst_a * (1.0 - src_a)) / out_a * 255.0)
            .round()
            .clamp(0.0, 255.0) as u8
    };
    img.put_pixel(
        x,
        y,
        image::Rgba([
            blend(r, dst[0]),
            blend(g, dst[1]),
            blend(b, dst[2]),
            (out_a * 255.0).round() as u8,
        ]),
    );
}

/// Blend only if `(x, y)` is inside the image.
pub fn blend_pixel_checked(img: &mut RgbaImage, x: i32, y: i32, color: Color32) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        blend_pixel(img, x as u32, y as u32, color);
    }
}

pub fn fill_disk(img: &mut RgbaImage, center: Pos2, radius: f32, color: Color32) {
    if radius <= 0.0 || img.width() == 0 || img.height() == 0 {
        return;
    }
    let radius_sq = radius * radius;
    let max_x = img.width() as f32 - 1.0;
    let max_y = img.height() as f32 - 1.0;
    let min_x = (center.x - radius).floor().max(0.0) as i32;
    let hi_x = (center.x + radius).ceil().min(max_x) as i32;
    let min_y = (center.y - radius).floor().max(0.0) as i32;
    let hi_y = (center.y + radius).ceil().min(max_y) as i32;
    for y in min_y..=hi_y {
        for x in min_x..=hi_x {
            let dx = x as f32 + 0.5 - center.x;
            let dy = y as f32 + 0.5 - center.y;
            if dx * dx + dy * dy <= radius_sq {
                blend_pixel(img, x as u32, y as u32, color);
            }
        }
    }
}

/// Round-capped line. Overlapping stamps are collected first so a translucent
/// stroke is blended once per pixel.
pub fn stroke_polyline(img: &mut RgbaImage, points: &[Pos2], color: Color32, width: f32) {
    if points.is_empty() || img.width() == 0 || img.height() == 0 {
        return;
    }
    let radius = (width / 2.0).max(0.5);
    let mut mask = vec![false; img.width() as usize * img.height() as usize];
    let mut stamp = |center: Pos2| {
        let min_x = (center.x - radius).floor().max(0.0) as i64;
        let max_x = ((center.x + radius).ceil() as i64).min(img.width() as i64 - 1);
        let min_y = (center.y - radius).floor().max(0.0) as i64;
        let max_y = ((center.y + radius).ceil() as i64).min(img.height() as i64 - 1);
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let dx = x as f32 + 0.5 - center.x;
                let dy = y as f32 + 0.5 - center.y;
                if dx * dx + dy * dy <= radius * radius {
                    mask[y as usize * img.width() as usize + x as usize] = true;
                }
            }
        }
    };

    if let [only] = points {
        stamp(*only);
    }
    for segment in points.windows(2) {
        let (start, end) = (segment[0], segment[1]);
        let delta = end - start;
        let steps = delta.x.abs().max(delta.y.abs()).ceil().max(1.0) as i32;
        for i in 0..=steps {
            stamp(start + delta * (i as f32 / steps as f32));
        }
    }

    let width = img.width() as usize;
    for (index, hit) in mask.into_iter().enumerate() {
        if hit {
            blend_pixel(img, (index % width) as u32, (index / width) as u32, color);
        }
    }
}

pub fn stroke_rect(img: &mut RgbaImage, rect: Rect, color: Color32, width: f32) {
    let outline = [
        rect.left_top(),
        rect.right_top(),
        rect.right_bottom(),
        rect.left_bottom(),
        rect.left_top(),
    ];
    stroke_polyline(img, &outline, color, width);
}

pub fn stroke_ellipse(img: &mut RgbaImage, rect: Rect, color: Color32, width: f32) {
    stroke_polyline(img, &ellipse_polyline(rect), color, width);
}

/// Closed polyline approximating the ellipse inscribed in `rect`.
pub fn ellipse_polyline(rect: Rect) -> Vec<Pos2> {
    let center = rect.center();
    let rx = rect.width() * 0.5;
    let ry = rect.height() * 0.5;
    let segments = ((rx.max(ry) * std::f32::consts::TAU / 4.0).ceil() as usize).clamp(16, 720);
    let mut points = Vec::with_capacity(segments + 1);
    for i in 0..=segments {
        let t = (i as f32 / segments as f32) * std::f32::consts::TAU;
        points.push(pos2(center.x + rx * t.cos(), center.y + ry * t.sin()));
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_opaque_over_transparent() {
        let mut img = RgbaImage::new(2, 2);
        blend_pixel(&mut img, 1, 1, Color32::RED);
        assert_eq!(img.get_pixel(1, 1).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_blend_half_alpha_over_white() {
        let mut img = RgbaImage::from_pixel(1, 1, image::Rgba([255, 255, 255, 255]));
        blend_pixel(&mut img, 0, 0, Color32::from_rgba_unmultiplied(0, 0, 0, 128));
        let px = img.get_pixel(0, 0).0;
        assert_eq!(px[3], 255);
        assert!((px[0] as i32 - 127).abs() <= 1);
    }

    #[test]
    fn test_polyline_stays_inside_image() {
        let mut img = RgbaImage::new(10, 10);
        stroke_polyline(&mut img, &[pos2(-20.0, 5.0), pos2(30.0, 5.0)], Color32::BLUE, 3.0);
        assert_eq!(img.get_pixel(5, 5).0, [0, 0, 255, 255]);
        assert_eq!(img.get_pixel(5, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_rect_outline_leaves_interior_untouched() {
        let mut img = RgbaImage::new(40, 40);
        stroke_rect(
            &mut img,
            Rect::from_min_max(pos2(5.0, 5.0), pos2(35.0, 35.0)),
            Color32::GREEN,
            2.0,
        );
        assert_eq!(img.get_pixel(20, 20).0, [0, 0, 0, 0]);
        assert_ne!(img.get_pixel(5, 20).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_ellipse_polyline_is_closed() {
        let points = ellipse_polyline(Rect::from_min_max(pos2(0.0, 0.0), pos2(40.0, 20.0)));
        let first = points[0];
        let last = *points.last().unwrap();
        assert!((first - last).length() < 1e-3);
        assert!((first - pos2(40.0, 10.0)).length() < 1e-3);
    }
}
