//! Bitmap operations that reallocate the raster.
//!
//! Every operation builds the new bitmap in a separately allocated buffer and
//! hands it back; the source is never touched, so a failed allocation leaves
//! the caller's state exactly as it was.

pub mod paint;
pub mod text;

use image::{RgbaImage, imageops};

use crate::error::{EditorError, EditorResult};

/// Allocate a zeroed `width x height` RGBA bitmap without aborting on failure.
///
/// `budget` is the maximum number of pixels allowed for the new bitmap plus
/// `already_alive` pixels that must coexist with it.
pub fn allocate(
    width: u32,
    height: u32,
    already_alive: u64,
    budget: Option<u64>,
) -> EditorResult<RgbaImage> {
    let exhausted = EditorError::ResourceExhausted { width, height };
    let pixels = u64::from(width) * u64::from(height);
    if let Some(budget) = budget {
        if pixels.saturating_add(already_alive) > budget {
            log::warn!(
                "Raster {}x{} exceeds the working budget of {} pixels",
                width,
                height,
                budget
            );
            return Err(exhausted);
        }
    }
    let len = usize::try_from(pixels)
        .ok()
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| exhausted.clone())?;
    let mut data: Vec<u8> = Vec::new();
    if data.try_reserve_exact(len).is_err() {
        log::warn!("Allocation of {} bytes for a {}x{} raster failed", len, width, height);
        return Err(exhausted);
    }
    data.resize(len, 0);
    RgbaImage::from_raw(width, height, data).ok_or(exhausted)
}

fn pixel_count(img: &RgbaImage) -> u64 {
    u64::from(img.width()) * u64::from(img.height())
}

/// Rotate clockwise by `turns` quarter turns.
pub fn rotate_quarter_turns(src: &RgbaImage, turns: u8, budget: Option<u64>) -> EditorResult<RgbaImage> {
    let turns = turns % 4;
    let (width, height) = if turns % 2 == 1 {
        (src.height(), src.width())
    } else {
        (src.width(), src.height())
    };
    let mut dst = allocate(width, height, pixel_count(src), budget)?;
    let result = match turns {
        0 => {
            dst.copy_from_slice(src.as_raw());
            Ok(())
        }
        1 => imageops::rotate90_in(src, &mut dst),
        2 => imageops::rotate180_in(src, &mut dst),
        _ => imageops::rotate270_in(src, &mut dst),
    };
    result.map_err(|err| {
        log::warn!("Rotation failed: {}", err);
        EditorError::ResourceExhausted { width, height }
    })?;
    Ok(dst)
}

pub fn flip_horizontal(src: &RgbaImage, budget: Option<u64>) -> EditorResult<RgbaImage> {
    let mut dst = allocate(src.width(), src.height(), pixel_count(src), budget)?;
    imageops::flip_horizontal_in(src, &mut dst).map_err(|err| {
        log::warn!("Horizontal flip failed: {}", err);
        EditorError::ResourceExhausted { width: src.width(), height: src.height() }
    })?;
    Ok(dst)
}

pub fn flip_vertical(src: &RgbaImage, budget: Option<u64>) -> EditorResult<RgbaImage> {
    let mut dst = allocate(src.width(), src.height(), pixel_count(src), budget)?;
    imageops::flip_vertical_in(src, &mut dst).map_err(|err| {
        log::warn!("Vertical flip failed: {}", err);
        EditorError::ResourceExhausted { width: src.width(), height: src.height() }
    })?;
    Ok(dst)
}

/// Copy the `width x height` block at `(x, y)`. The block must lie inside `src`.
pub fn crop(
    src: &RgbaImage,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    budget: Option<u64>,
) -> EditorResult<RgbaImage> {
    let fits = u64::from(x) + u64::from(width) <= u64::from(src.width())
        && u64::from(y) + u64::from(height) <= u64::from(src.height());
    if width == 0 || height == 0 || !fits {
        return Err(EditorError::EmptyCrop);
    }
    let mut dst = allocate(width, height, pixel_count(src), budget)?;
    let src_stride = src.width() as usize * 4;
    let row_len = width as usize * 4;
    let raw = src.as_raw();
    for (row, chunk) in dst.chunks_exact_mut(row_len).enumerate() {
        let start = (y as usize + row) * src_stride + x as usize * 4;
        chunk.copy_from_slice(&raw[start..start + row_len]);
    }
    Ok(dst)
}

/// Copy of the whole raster, for export.
pub fn duplicate(src: &RgbaImage, budget: Option<u64>) -> EditorResult<RgbaImage> {
    crop(src, 0, 0, src.width(), src.height(), budget).or_else(|err| match err {
        // An empty raster has nothing to crop but is still exportable.
        EditorError::EmptyCrop => Ok(RgbaImage::new(src.width(), src.height())),
        other => Err(other),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn numbered(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 0, 255]))
    }

    #[test]
    fn test_allocate_respects_budget() {
        assert!(allocate(10, 10, 0, Some(100)).is_ok());
        assert_eq!(
            allocate(10, 10, 1, Some(100)),
            Err(EditorError::ResourceExhausted { width: 10, height: 10 })
        );
    }

    #[test]
    fn test_allocate_reports_impossible_sizes() {
        assert_eq!(
            allocate(u32::MAX, u32::MAX, 0, None),
            Err(EditorError::ResourceExhausted { width: u32::MAX, height: u32::MAX })
        );
    }

    #[test]
    fn test_rotate_swaps_dimensions_and_moves_pixels() {
        let src = numbered(4, 2);
        let rotated = rotate_quarter_turns(&src, 1, None).unwrap();
        assert_eq!(rotated.dimensions(), (2, 4));
        // Pixel (x, y) lands on (h - 1 - y, x).
        assert_eq!(rotated.get_pixel(1, 3).0, src.get_pixel(3, 0).0);

        let back = rotate_quarter_turns(&rotated, 3, None).unwrap();
        assert_eq!(back, src);
        assert_eq!(rotate_quarter_turns(&src, 0, None).unwrap(), src);
    }

    #[test]
    fn test_flips() {
        let src = numbered(3, 2);
        let h = flip_horizontal(&src, None).unwrap();
        assert_eq!(h.get_pixel(0, 1).0, src.get_pixel(2, 1).0);
        let v = flip_vertical(&src, None).unwrap();
        assert_eq!(v.get_pixel(2, 0).0, src.get_pixel(2, 1).0);
    }

    #[test]
    fn test_crop_copies_block() {
        let src = numbered(10, 8);
        let cropped = crop(&src, 2, 3, 4, 2, None).unwrap();
        assert_eq!(cropped.dimensions(), (4, 2));
        assert_eq!(cropped.get_pixel(0, 0).0, [2, 3, 0, 255]);
        assert_eq!(cropped.get_pixel(3, 1).0, [5, 4, 0, 255]);
        assert_eq!(crop(&src, 8, 0, 4, 2, None), Err(EditorError::EmptyCrop));
    }
}
