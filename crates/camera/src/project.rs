use crate::view::{Camera, Vec2};

impl Camera {
    /// Projects a world position onto the screen. Pure; the result may lie
    /// outside the viewport.
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        Vec2 {
            x: (world.x - self.focal.x) * self.zoom + self.viewport.width as f32 / 2.0,
            y: (self.focal.y - world.y) * self.zoom + self.viewport.height as f32 / 2.0,
        }
    }

    /// Maps a screen pixel back into world space, e.g. for cursor
    /// hit-testing.
    pub fn screen_to_world(&self, screen_x: i32, screen_y: i32) -> Vec2 {
        Vec2 {
            x: (screen_x as f32 - self.viewport.width as f32 / 2.0) / self.zoom + self.focal.x,
            y: self.focal.y - (screen_y as f32 - self.viewport.height as f32 / 2.0) / self.zoom,
        }
    }

    /// Integer screen position of a world point, plus a visibility verdict.
    /// The position truncates toward zero; visibility tests the world-space
    /// point against the cached visible bounds, inclusive on all four edges.
    pub fn point_on_screen(&self, world: Vec2) -> (i32, i32, bool) {
        let screen = self.world_to_screen(world);
        let on_screen_x = world.x >= self.visible.left && world.x <= self.visible.right;
        let on_screen_y = world.y <= self.visible.top && world.y >= self.visible.bottom;
        (screen.x as i32, screen.y as i32, on_screen_x && on_screen_y)
    }

    /// Legacy overlap test for a box centered at a screen point: the box is
    /// on screen unless one of its truncated half-extents lies fully past a
    /// viewport edge. Preserved as-is for compatibility; see
    /// `box_intersects_viewport` for the exact test.
    pub fn box_on_screen(
        &self,
        screen_x: i32,
        screen_y: i32,
        box_width: i32,
        box_height: i32,
    ) -> bool {
        if screen_x - box_width / 2 > self.viewport.width as i32 {
            return false;
        }
        if screen_x + box_width / 2 < 0 {
            return false;
        }
        if screen_y - box_height / 2 > self.viewport.height as i32 {
            return false;
        }
        if screen_y + box_height / 2 < 0 {
            return false;
        }
        true
    }

    /// Exact AABB-vs-viewport overlap for a box centered at a screen point.
    /// Unlike `box_on_screen` it keeps the extra pixel of odd box sizes on
    /// the right/bottom half and rejects non-positive box dimensions.
    pub fn box_intersects_viewport(
        &self,
        screen_x: i32,
        screen_y: i32,
        box_width: i32,
        box_height: i32,
    ) -> bool {
        if box_width <= 0 || box_height <= 0 {
            return false;
        }
        let left = screen_x - box_width / 2;
        let right = screen_x + (box_width - box_width / 2);
        let top = screen_y - box_height / 2;
        let bottom = screen_y + (box_height - box_height / 2);
        left <= self.viewport.width as i32
            && right >= 0
            && top <= self.viewport.height as i32
            && bottom >= 0
    }

    /// Per-drawable entry point: projects a world point, tests visibility of
    /// the point and of an image of the given size centered on it, and for
    /// visible images converts the center to a top-left drawing origin.
    /// When the flag is false the returned coordinates are the uncentered
    /// screen point and carry no placement guarantee.
    pub fn place(&self, world: Vec2, image_width: i32, image_height: i32) -> (i32, i32, bool) {
        let (mut screen_x, mut screen_y, mut visible) = self.point_on_screen(world);
        if visible {
            visible = self.box_on_screen(screen_x, screen_y, image_width, image_height);
        }
        if visible {
            (screen_x, screen_y) =
                center_image_origin(screen_x, screen_y, image_width, image_height);
        }
        (screen_x, screen_y, visible)
    }
}

/// Top-left drawing origin for an image of the given size centered at a
/// screen point, for renderers that draw from a top-left anchor.
pub fn center_image_origin(
    screen_x: i32,
    screen_y: i32,
    image_width: i32,
    image_height: i32,
) -> (i32, i32) {
    (screen_x - image_width / 2, screen_y - image_height / 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera_at(width: u32, height: u32, focal: Vec2) -> Camera {
        let mut camera = Camera::new(width, height);
        camera.look_at(focal);
        camera
    }

    #[test]
    fn point_inside_view_maps_to_screen_and_reports_visible() {
        let camera = camera_at(400, 200, Vec2 { x: 600.0, y: 1200.0 });
        let (x, y, visible) = camera.point_on_screen(Vec2 { x: 500.0, y: 1150.0 });
        assert_eq!((x, y), (100, 150));
        assert!(visible);
        assert!(camera.box_on_screen(x, y, 100, 100));
    }

    #[test]
    fn point_outside_view_still_maps_but_reports_hidden() {
        let camera = camera_at(200, 100, Vec2 { x: 600.0, y: 1200.0 });
        let (x, y, visible) = camera.point_on_screen(Vec2 { x: 450.0, y: 1280.0 });
        assert_eq!((x, y), (-50, -30));
        assert!(!visible);
        assert!(camera.box_on_screen(x, y, 100, 100));
    }

    #[test]
    fn zoomed_projection_scales_offsets_from_the_focal_point() {
        let mut camera = Camera::new(300, 200);
        camera.set_zoom(2.0);
        camera.look_at(Vec2 { x: 0.0, y: 0.0 });
        camera.look_at(Vec2 { x: 10.0, y: 10.0 });
        let (x, y, _) = camera.point_on_screen(Vec2 { x: -20.0, y: 10.0 });
        assert_eq!((x, y), (90, 100));
    }

    #[test]
    fn screen_to_world_inverts_world_to_screen_for_integer_hits() {
        let mut camera = Camera::new(300, 200);
        camera.set_zoom(2.0);
        camera.look_at(Vec2 { x: 10.0, y: 10.0 });
        let world = Vec2 { x: -20.0, y: 10.0 };
        let (x, y, _) = camera.point_on_screen(world);
        assert_eq!(camera.screen_to_world(x, y), world);
    }

    #[test]
    fn screen_round_trips_back_to_world_within_one_pixel() {
        for &zoom in &[0.5_f32, 1.0, 2.0, 4.0] {
            let mut camera = Camera::new(640, 480);
            camera.set_zoom(zoom);
            camera.look_at(Vec2 { x: -37.5, y: 112.25 });
            let world = Vec2 { x: -21.75, y: 140.5 };
            let (x, y, _) = camera.point_on_screen(world);
            let round_tripped = camera.screen_to_world(x, y);
            let tolerance = 1.0 / zoom + 1e-4;
            assert!(
                (round_tripped.x - world.x).abs() <= tolerance,
                "zoom {zoom}: x came back as {}",
                round_tripped.x
            );
            assert!(
                (round_tripped.y - world.y).abs() <= tolerance,
                "zoom {zoom}: y came back as {}",
                round_tripped.y
            );
        }
    }

    #[test]
    fn visibility_is_inclusive_at_the_bound_edges() {
        let camera = camera_at(400, 200, Vec2 { x: 600.0, y: 1200.0 });
        let bounds = camera.visible_bounds();
        for world in [
            Vec2 {
                x: bounds.left,
                y: 1200.0,
            },
            Vec2 {
                x: bounds.right,
                y: 1200.0,
            },
            Vec2 {
                x: 600.0,
                y: bounds.top,
            },
            Vec2 {
                x: 600.0,
                y: bounds.bottom,
            },
        ] {
            let (_, _, visible) = camera.point_on_screen(world);
            assert!(visible, "point on the edge should be visible: {world:?}");
        }
        for world in [
            Vec2 {
                x: bounds.left - 0.01,
                y: 1200.0,
            },
            Vec2 {
                x: bounds.right + 0.01,
                y: 1200.0,
            },
            Vec2 {
                x: 600.0,
                y: bounds.top + 0.01,
            },
            Vec2 {
                x: 600.0,
                y: bounds.bottom - 0.01,
            },
        ] {
            let (_, _, visible) = camera.point_on_screen(world);
            assert!(!visible, "point just outside should be hidden: {world:?}");
        }
    }

    #[test]
    fn screen_coordinates_truncate_toward_zero() {
        let camera = camera_at(200, 100, Vec2 { x: 600.0, y: 1200.0 });

        // Floats land at (-50.5, -30.25); flooring would give (-51, -31).
        let (x, y, _) = camera.point_on_screen(Vec2 { x: 449.5, y: 1280.25 });
        assert_eq!((x, y), (-50, -30));

        let (x, y, _) = camera.point_on_screen(Vec2 { x: 750.5, y: 1120.25 });
        assert_eq!((x, y), (250, 129));
    }

    #[test]
    fn box_touching_a_viewport_edge_is_still_on_screen() {
        let camera = camera_at(400, 200, Vec2::default());
        assert!(camera.box_on_screen(450, 100, 100, 100));
        assert!(camera.box_on_screen(-50, 100, 100, 100));
        assert!(camera.box_on_screen(200, 250, 100, 100));
        assert!(camera.box_on_screen(200, -50, 100, 100));
    }

    #[test]
    fn box_fully_past_an_edge_is_off_screen() {
        let camera = camera_at(400, 200, Vec2::default());
        assert!(!camera.box_on_screen(451, 100, 100, 100));
        assert!(!camera.box_on_screen(-51, 100, 100, 100));
        assert!(!camera.box_on_screen(200, 251, 100, 100));
        assert!(!camera.box_on_screen(200, -51, 100, 100));
    }

    #[test]
    fn exact_overlap_test_keeps_the_odd_half_extent_pixel() {
        let camera = camera_at(400, 200, Vec2::default());

        // A 101-wide box at x = -51 reaches screen x = 0 with its full
        // extent; the legacy test truncates the half width and misses it.
        assert!(!camera.box_on_screen(-51, 100, 101, 100));
        assert!(camera.box_intersects_viewport(-51, 100, 101, 100));

        // Degenerate boxes pass the legacy test and fail the exact one.
        assert!(camera.box_on_screen(200, 100, 0, 0));
        assert!(!camera.box_intersects_viewport(200, 100, 0, 0));
    }

    #[test]
    fn exact_overlap_test_agrees_with_legacy_for_even_boxes() {
        let camera = camera_at(400, 200, Vec2::default());
        for (x, y) in [(450, 100), (-50, 100), (200, 250), (200, -50), (451, 100)] {
            assert_eq!(
                camera.box_on_screen(x, y, 100, 100),
                camera.box_intersects_viewport(x, y, 100, 100),
                "diverged at ({x}, {y})"
            );
        }
    }

    #[test]
    fn center_image_origin_offsets_by_the_truncated_half_size() {
        assert_eq!(center_image_origin(100, 150, 100, 100), (50, 100));
        assert_eq!(center_image_origin(10, 10, 5, 5), (8, 8));
        assert_eq!(center_image_origin(-50, -30, 100, 100), (-100, -80));
    }

    #[test]
    fn place_returns_top_left_origin_for_a_visible_image() {
        let camera = camera_at(400, 200, Vec2 { x: 600.0, y: 1200.0 });
        let (x, y, visible) = camera.place(Vec2 { x: 500.0, y: 1150.0 }, 100, 100);
        assert!(visible);
        assert_eq!((x, y), (50, 100));
    }

    #[test]
    fn place_skips_centering_when_the_point_is_hidden() {
        let camera = camera_at(200, 100, Vec2 { x: 600.0, y: 1200.0 });
        let (x, y, visible) = camera.place(Vec2 { x: 450.0, y: 1280.0 }, 100, 100);
        assert!(!visible);
        assert_eq!((x, y), (-50, -30));
    }
}
