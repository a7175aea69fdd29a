use tracing::{debug, warn};

/// World-space position or offset. World Y increases upward.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

/// Pixel dimensions of the output surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// World-space rectangle currently mapped onto the viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VisibleBounds {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

pub const ZOOM_DEFAULT: f32 = 1.0;
pub const ZOOM_MIN: f32 = 0.25;
pub const ZOOM_MAX: f32 = 4.0;
pub const ZOOM_STEP: f32 = 0.25;

/// Converts between world coordinates and screen coordinates for one
/// rendering surface. Every mutation of the focal point, zoom or viewport
/// size refreshes the cached visible bounds before it returns.
#[derive(Debug, Clone)]
pub struct Camera {
    pub(crate) viewport: Viewport,
    pub(crate) focal: Vec2,
    pub(crate) zoom: f32,
    pub(crate) zoom_inv: f32,
    pub(crate) visible: VisibleBounds,
}

impl Camera {
    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        let mut camera = Self {
            viewport: Viewport {
                width: viewport_width,
                height: viewport_height,
            },
            focal: Vec2::default(),
            zoom: ZOOM_DEFAULT,
            zoom_inv: 1.0 / ZOOM_DEFAULT,
            visible: VisibleBounds::default(),
        };
        camera.look_at(Vec2::default());
        camera
    }

    /// Points the camera at a world position.
    pub fn look_at(&mut self, target: Vec2) {
        self.focal = target;
        self.refresh_visible_bounds();
    }

    pub fn looking_at(&self) -> Vec2 {
        self.focal
    }

    /// Sets the world-units-to-screen-pixels scale factor. A zero zoom is
    /// ignored and the prior view state is retained; any other value,
    /// including negative or non-finite ones, is applied as-is.
    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom == 0.0 {
            warn!(requested_zoom = zoom, "camera_zoom_rejected");
            return;
        }
        self.zoom = zoom;
        self.zoom_inv = 1.0 / zoom;
        self.refresh_visible_bounds();
    }

    /// Nudges zoom by `steps * ZOOM_STEP`, clamped to `[ZOOM_MIN, ZOOM_MAX]`.
    pub fn apply_zoom_steps(&mut self, steps: i32) {
        if steps == 0 {
            return;
        }
        let target_zoom = self.zoom + steps as f32 * ZOOM_STEP;
        self.set_zoom(clamp_zoom(target_zoom));
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn set_viewport_size(&mut self, width: u32, height: u32) {
        self.viewport = Viewport { width, height };
        self.refresh_visible_bounds();
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn visible_bounds(&self) -> VisibleBounds {
        self.visible
    }

    /// Introspection hook: emits the focal point and visible bounds as a
    /// `tracing` debug event. Filtering is up to the installed subscriber.
    pub fn log_view_state(&self) {
        debug!(
            focal_x = self.focal.x,
            focal_y = self.focal.y,
            visible_left = self.visible.left,
            visible_right = self.visible.right,
            visible_top = self.visible.top,
            visible_bottom = self.visible.bottom,
            "camera_view_state"
        );
    }

    // Half extents use the truncated integer half of each viewport
    // dimension, scaled by the inverse zoom. Projection uses the float
    // half; the two must not be unified.
    fn refresh_visible_bounds(&mut self) {
        let half_width = (self.viewport.width / 2) as f32 * self.zoom_inv;
        let half_height = (self.viewport.height / 2) as f32 * self.zoom_inv;
        self.visible = VisibleBounds {
            left: self.focal.x - half_width,
            right: self.focal.x + half_width,
            top: self.focal.y + half_height,
            bottom: self.focal.y - half_height,
        };
    }
}

fn clamp_zoom(zoom: f32) -> f32 {
    if !zoom.is_finite() {
        return ZOOM_DEFAULT;
    }
    zoom.clamp(ZOOM_MIN, ZOOM_MAX)
}
