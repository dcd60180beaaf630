//! Pure calculation functions for thumbnail cropping.
//!
//! All functions here are pure and testable without any I/O or images.

/// A rectangle within the source image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Largest centered window of `source` with the aspect ratio of `target`.
///
/// Wider sources keep their full height and lose equal strips left and
/// right; taller (or equal) sources keep their full width and lose equal
/// strips top and bottom. The kept extent is truncated to whole pixels and
/// the offset uses integer division, so the two discarded strips differ by
/// at most one pixel. The window is never smaller than 1x1.
///
/// # Examples
/// ```
/// # use bg_ingest::imaging::{CropRect, center_crop};
/// // 1000x300 is wider than 2:1 → keep a 600px wide window
/// assert_eq!(
///     center_crop((1000, 300), (340, 170)),
///     CropRect { x: 200, y: 0, width: 600, height: 300 }
/// );
/// ```
pub fn center_crop(source: (u32, u32), target: (u32, u32)) -> CropRect {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    if src_w == 0 || src_h == 0 || tgt_w == 0 || tgt_h == 0 {
        return CropRect {
            x: 0,
            y: 0,
            width: src_w,
            height: src_h,
        };
    }

    let src_aspect = src_w as f64 / src_h as f64;
    let tgt_aspect = tgt_w as f64 / tgt_h as f64;

    if src_aspect > tgt_aspect {
        let new_w = ((src_h as f64 * tgt_aspect) as u32).clamp(1, src_w);
        CropRect {
            x: (src_w - new_w) / 2,
            y: 0,
            width: new_w,
            height: src_h,
        }
    } else {
        let new_h = ((src_w as f64 / tgt_aspect) as u32).clamp(1, src_h);
        CropRect {
            x: 0,
            y: (src_h - new_h) / 2,
            width: src_w,
            height: new_h,
        }
    }
}
