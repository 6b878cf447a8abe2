//! Channel rotation used to shift track colors across tile seams

use image::Rgb;

/// Pure red, the first palette entry
pub const RED: Rgb<u8> = Rgb([255, 0, 0]);
/// Pure green, `rotate(RED)`
pub const GREEN: Rgb<u8> = Rgb([0, 255, 0]);
/// Pure blue, `rotate(GREEN)`
pub const BLUE: Rgb<u8> = Rgb([0, 0, 255]);

/// Three-hue palette closed under [`rotate`]
pub const DEFAULT_PALETTE: [Rgb<u8>; 3] = [RED, GREEN, BLUE];

/// Rotate the color channels one step: `[r, g, b] -> [b, r, g]`
///
/// Maps red to green, green to blue and blue to red. Applying it three times
/// returns the original color for every input.
pub const fn rotate(color: Rgb<u8>) -> Rgb<u8> {
    let [r, g, b] = color.0;
    Rgb([b, r, g])
}

/// Undo [`rotate`]: `[r, g, b] -> [g, b, r]`
pub const fn inverse_rotate(color: Rgb<u8>) -> Rgb<u8> {
    let [r, g, b] = color.0;
    Rgb([g, b, r])
}

/// Whether every palette entry rotates into another palette entry
pub fn is_closed_under_rotation(palette: &[Rgb<u8>]) -> bool {
    palette
        .iter()
        .all(|&color| palette.contains(&rotate(color)))
}
