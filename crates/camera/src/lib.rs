//! 2D camera for a pixel surface: tracks a focal point, zoom factor and
//! viewport size, converts between world and screen coordinates, and answers
//! per-frame visibility and placement queries.
//!
//! World Y increases upward; screen Y increases downward with the origin at
//! the top-left. A `Camera` is plain mutable state with no interior locking;
//! callers sharing one across threads must synchronize externally.

mod project;
mod view;

pub use project::center_image_origin;
pub use view::{
    Camera, Vec2, Viewport, VisibleBounds, ZOOM_DEFAULT, ZOOM_MAX, ZOOM_MIN, ZOOM_STEP,
};
