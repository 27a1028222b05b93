//! Color similarity predicates.

use image::Rgba;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// True when every RGB channel differs by at most `tolerance` (alpha ignored)
pub fn is_similar(a: Rgba<u8>, b: Rgba<u8>, tolerance: u8) -> bool {
    a.0[..3]
        .iter()
        .zip(&b.0[..3])
        .all(|(x, y)| x.abs_diff(*y) <= tolerance)
}

/// True for pixels a coloring page treats as paper: near-white or translucent
pub fn is_blank(color: Rgba<u8>, tolerance: u8, translucent_alpha: u8) -> bool {
    color.0[3] < translucent_alpha || is_similar(color, WHITE, tolerance)
}
