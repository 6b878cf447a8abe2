//! Tests for the RGB channel rotation and palette closure

#[cfg(test)]
mod tests {
    use image::Rgb;
    use jigtile::math::color::{
        BLUE, DEFAULT_PALETTE, GREEN, RED, inverse_rotate, is_closed_under_rotation, rotate,
    };

    const SAMPLES: [Rgb<u8>; 5] = [
        Rgb([0, 0, 0]),
        Rgb([255, 255, 255]),
        Rgb([12, 200, 99]),
        Rgb([1, 2, 3]),
        Rgb([64, 64, 65]),
    ];

    // Tests rotation cycles red to green to blue
    // Verified by rotating channels in the opposite direction
    #[test]
    fn test_rotate_cycles_primaries() {
        assert_eq!(rotate(RED), GREEN);
        assert_eq!(rotate(GREEN), BLUE);
        assert_eq!(rotate(BLUE), RED);
        assert_eq!(rotate(Rgb([1, 2, 3])), Rgb([3, 1, 2]));
    }

    // Tests three rotations are the identity
    // Verified by swapping two channels instead of rotating
    #[test]
    fn test_rotate_has_order_three() {
        for color in SAMPLES {
            assert_eq!(rotate(rotate(rotate(color))), color);
        }
    }

    // Tests the inverse undoes rotation and equals a double rotation
    // Verified by making the inverse equal to rotate
    #[test]
    fn test_inverse_rotate() {
        for color in SAMPLES {
            assert_eq!(inverse_rotate(rotate(color)), color);
            assert_eq!(rotate(inverse_rotate(color)), color);
            assert_eq!(rotate(rotate(color)), inverse_rotate(color));
        }
    }

    // Tests palette closure detection
    // Verified by returning true for every palette
    #[test]
    fn test_palette_closure() {
        assert!(is_closed_under_rotation(&DEFAULT_PALETTE));
        assert!(is_closed_under_rotation(&[Rgb([7, 7, 7])]));
        assert!(!is_closed_under_rotation(&[RED, GREEN]));
        assert!(is_closed_under_rotation(&[]));
    }
}
