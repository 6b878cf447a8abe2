//! Tests for tile geometry validation, spoke paths and rasterization

#[cfg(test)]
mod tests {
    use image::Rgb;
    use jigtile::TilingError;
    use jigtile::algorithm::renderer::{TileGeometry, TileRenderer};
    use jigtile::io::configuration::{BORDER_COLOR, FILL_COLOR};
    use jigtile::math::color::{BLUE, GREEN, RED};
    use jigtile::spatial::canvas::Canvas;
    use jigtile::spatial::ports::{PortMap, Routing};

    const GRAY: Rgb<u8> = Rgb([10, 10, 10]);

    fn small_geometry() -> TileGeometry {
        TileGeometry {
            line_width: 2,
            separation: 4,
            stub_length: 2,
            border_width: 1,
        }
    }

    fn rejected_parameter(geometry: TileGeometry) -> &'static str {
        match geometry.validate() {
            Err(TilingError::InvalidParameter { parameter, .. }) => parameter,
            other => unreachable!("Expected InvalidParameter, got {other:?}"),
        }
    }

    // Tests side length and diagonal stroke width formulas
    // Verified by rounding the diagonal width up
    #[test]
    fn test_side_and_diagonal_width() {
        let geometry = TileGeometry::default();
        assert_eq!(geometry.side(), 360);
        assert_eq!(geometry.diagonal_width(), 22);
        assert_eq!(small_geometry().side(), 16);
        assert_eq!(small_geometry().diagonal_width(), 2);

        let thin = TileGeometry {
            line_width: 1,
            ..small_geometry()
        };
        assert_eq!(thin.diagonal_width(), 1);
    }

    // Tests each geometry constraint is enforced
    // Verified by removing the separation check
    #[test]
    fn test_geometry_validation() {
        assert!(TileGeometry::default().validate().is_ok());
        assert!(small_geometry().validate().is_ok());

        let base = TileGeometry::default();
        assert_eq!(
            rejected_parameter(TileGeometry {
                line_width: 0,
                ..base
            }),
            "line_width"
        );
        assert_eq!(
            rejected_parameter(TileGeometry {
                separation: 20,
                ..base
            }),
            "separation"
        );
        assert_eq!(
            rejected_parameter(TileGeometry {
                stub_length: 0,
                ..base
            }),
            "stub_length"
        );
        assert_eq!(
            rejected_parameter(TileGeometry {
                stub_length: 101,
                ..base
            }),
            "stub_length"
        );
        // Diagonal inset for a 30 pixel line is 8
        assert_eq!(
            rejected_parameter(TileGeometry {
                stub_length: 7,
                ..base
            }),
            "stub_length"
        );
        assert_eq!(
            rejected_parameter(TileGeometry {
                border_width: 180,
                ..base
            }),
            "border_width"
        );
        assert_eq!(
            rejected_parameter(TileGeometry {
                line_width: 1,
                separation: u32::MAX / 2,
                stub_length: 1,
                border_width: 0,
            }),
            "separation"
        );
        assert!(
            TileGeometry {
                border_width: 0,
                ..base
            }
            .validate()
            .is_ok()
        );
    }

    // Tests straight spokes end on the matching incoming lane
    // Verified by dropping the line width from the step counts
    #[test]
    fn test_straight_spoke_paths() {
        let geometry = TileGeometry::default();

        let u_turn = geometry.spoke_path(0);
        assert!(!u_turn.is_diagonal());
        assert_eq!(u_turn.start, (100, 50));
        assert_eq!(u_turn.end(), (230, 50));
        assert_eq!(u_turn.width, 30);

        let across = geometry.spoke_path(2);
        assert_eq!(across.direction, (0, 1));
        // Last square ends where the opposite side's tab begins
        assert_eq!(across.end().1 + across.width, 360 - 50);
    }

    // Tests diagonal spokes are narrowed, shifted and lengthened by the inset
    // Verified by leaving the start square in place
    #[test]
    fn test_diagonal_spoke_paths() {
        let geometry = TileGeometry::default();

        let clockwise = geometry.spoke_path(1);
        assert!(clockwise.is_diagonal());
        assert_eq!(clockwise.width, 22);
        assert_eq!(clockwise.start, (100, 42));
        assert_eq!(clockwise.steps, 180 + 16);
        // Reaches the east side's tab column and the incoming lane's rows
        assert_eq!(clockwise.end().0 + clockwise.width, 360 - 50 + 8);
        assert_eq!(clockwise.end().1 + clockwise.width, 260);

        let counter = geometry.spoke_path(3);
        assert_eq!(counter.direction, (-1, 1));
        assert_eq!(counter.start, (108, 42));
        assert_eq!(counter.steps, 50 + 16);
        assert_eq!(counter.end(), (42, 108));

        assert_eq!(geometry.spoke_path(5), clockwise);
    }

    // Tests background, tabs, notches and spokes land on the expected pixels
    // Verified by coloring incoming tabs with the forward routing
    #[test]
    fn test_rasterize_default_piece() {
        let renderer = TileRenderer::new(TileGeometry::default()).expect("valid geometry");
        // North -> east, east -> south, south -> north, west -> west
        let routing = Routing::from_exits([1, 2, 0, 3]).expect("valid permutation");
        let colors = PortMap([RED, GREEN, BLUE, GRAY]);
        let piece = renderer.rasterize(&routing, &colors);

        assert_eq!(piece.dimensions(), (360, 360));
        assert_eq!(*piece.get_pixel(0, 0), BORDER_COLOR);
        assert_eq!(*piece.get_pixel(2, 300), BORDER_COLOR);
        assert_eq!(*piece.get_pixel(20, 20), FILL_COLOR);

        // Outgoing and incoming tabs on the north side
        assert_eq!(*piece.get_pixel(110, 0), RED);
        assert_eq!(*piece.get_pixel(240, 0), BLUE);
        // Notches flank the incoming tab
        assert_eq!(*piece.get_pixel(229, 1), BLUE);
        assert_eq!(*piece.get_pixel(227, 3), BLUE);
        assert_eq!(*piece.get_pixel(226, 3), FILL_COLOR);
        assert_eq!(*piece.get_pixel(260, 1), BLUE);
        // East outgoing tab, rotated onto the right edge
        assert_eq!(*piece.get_pixel(359, 110), GREEN);

        // The south spoke runs straight up into the north incoming lane
        assert_eq!(*piece.get_pixel(245, 180), BLUE);
        // The west spoke turns back along the west side
        assert_eq!(*piece.get_pixel(60, 180), GRAY);
    }

    // Tests the identity routing paints each incoming tab with its own port color
    // Verified by using the outgoing color on the wrong lane
    #[test]
    fn test_rasterize_identity_lanes() {
        let renderer = TileRenderer::new(small_geometry()).expect("valid geometry");
        let colors = PortMap([RED, GREEN, BLUE, GRAY]);
        let piece = renderer.rasterize(&Routing::identity(), &colors);

        // North lanes at u 4..6 and 10..12, both red
        assert_eq!(*piece.get_pixel(4, 0), RED);
        assert_eq!(*piece.get_pixel(11, 0), RED);
        // South side runs right to left
        assert_eq!(*piece.get_pixel(11, 15), BLUE);
        assert_eq!(*piece.get_pixel(4, 15), BLUE);
        assert_eq!(*piece.get_pixel(0, 4), GRAY);
        assert_eq!(*piece.get_pixel(15, 4), GREEN);
    }

    // Tests rendering into a view matches the standalone raster
    // Verified by painting at the canvas origin
    #[test]
    fn test_render_into_view() {
        let renderer = TileRenderer::new(small_geometry()).expect("valid geometry");
        let routing = Routing::from_exits([2, 3, 0, 1]).expect("valid permutation");
        let colors = PortMap([RED, GREEN, BLUE, RED]);
        let expected = renderer.rasterize(&routing, &colors);

        let mut canvas = Canvas::new(40, 40);
        {
            let mut region = canvas.view(16, 8, 16, 16).expect("view fits");
            renderer
                .render(&mut region, &routing, &colors)
                .expect("render succeeds");
        }
        for (x, y, pixel) in expected.enumerate_pixels() {
            assert_eq!(canvas.pixel(16 + x, 8 + y), Some(*pixel));
        }
        assert_eq!(canvas.pixel(15, 8), Some(Rgb([0, 0, 0])));
    }

    // Tests a wrongly sized region is rejected before drawing
    // Verified by rendering into the partial region anyway
    #[test]
    fn test_render_rejects_wrong_region() {
        let renderer = TileRenderer::new(small_geometry()).expect("valid geometry");
        let mut canvas = Canvas::new(40, 40);
        {
            let mut region = canvas.view(0, 0, 15, 16).expect("view fits");
            let result = renderer.render(&mut region, &Routing::identity(), &PortMap([RED; 4]));
            assert!(matches!(
                result,
                Err(TilingError::PreconditionViolation {
                    operation: "render tile",
                    ..
                })
            ));
        }
        assert!(
            canvas
                .as_image()
                .pixels()
                .all(|pixel| *pixel == Rgb([0, 0, 0]))
        );
    }

    // Tests invalid geometry cannot build a renderer
    // Verified by skipping validation in the constructor
    #[test]
    fn test_renderer_requires_valid_geometry() {
        let result = TileRenderer::new(TileGeometry {
            separation: 1,
            ..small_geometry()
        });
        assert!(result.is_err());
    }
}
