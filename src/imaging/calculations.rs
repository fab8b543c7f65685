//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::ResizeBound;

/// Calculate contain-fit dimensions for a bound, never enlarging.
///
/// The bounded edge is scaled down to the limit and the other edge follows
/// the source aspect ratio. Images already within the bound keep their
/// original dimensions. Neither edge collapses below 1px.
///
/// # Examples
/// ```
/// # use album_resize::imaging::{ResizeBound, contain_fit};
/// // 3000x2000 landscape bounded to 900px height → 1350x900
/// assert_eq!(contain_fit((3000, 2000), ResizeBound::Height(900)), (1350, 900));
///
/// // 400x300 is already under a 610px width bound → unchanged
/// assert_eq!(contain_fit((400, 300), ResizeBound::Width(610)), (400, 300));
/// ```
pub fn contain_fit(original: (u32, u32), bound: ResizeBound) -> (u32, u32) {
    let (w, h) = original;
    match bound {
        ResizeBound::Height(limit) => {
            if h <= limit || h == 0 {
                return original;
            }
            let scaled = (w as f64 * limit as f64 / h as f64).round() as u32;
            (scaled.max(1), limit)
        }
        ResizeBound::Width(limit) => {
            if w <= limit || w == 0 {
                return original;
            }
            let scaled = (h as f64 * limit as f64 / w as f64).round() as u32;
            (limit, scaled.max(1))
        }
    }
}
