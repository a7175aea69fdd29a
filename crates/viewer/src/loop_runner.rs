use std::time::Instant;

use camera::{Camera, Vec2, VisibleBounds};
use pixels::{Error as PixelsError, Pixels, SurfaceTexture};
use thiserror::Error;
use tracing::{info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use crate::config::ViewerConfig;
use crate::draw;

const PAN_SPEED_WORLD_PER_SECOND: f32 = 240.0;
const MAX_FRAME_DT_SECONDS: f32 = 0.25;
const MARKER_SIZE_PX: i32 = 12;
const FOCAL_CROSS_HALF_SIZE_PX: i32 = 6;
const CLEAR_COLOR: [u8; 4] = [20, 22, 28, 255];
const MARKER_COLOR: [u8; 4] = [220, 220, 240, 255];
const ORIGIN_MARKER_COLOR: [u8; 4] = [255, 210, 70, 255];
const FOCAL_CROSS_COLOR: [u8; 4] = [255, 120, 120, 255];

#[derive(Debug, Error)]
pub(crate) enum ViewerError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to create pixel surface: {0}")]
    CreateSurface(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

pub(crate) fn run_viewer(config: ViewerConfig) -> Result<(), ViewerError> {
    let event_loop = EventLoop::new().map_err(ViewerError::CreateEventLoop)?;
    let window: &'static winit::window::Window = Box::leak(Box::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(ViewerError::CreateWindow)?,
    ));

    let size = window.inner_size();
    let mut pixels =
        build_pixels(window, size.width, size.height).map_err(ViewerError::CreateSurface)?;
    let mut camera = Camera::new(size.width, size.height);
    camera.set_zoom(config.start_zoom);
    camera.look_at(Vec2 {
        x: config.start_focal_x,
        y: config.start_focal_y,
    });
    let marker_spacing_world = normalize_marker_spacing(config.marker_spacing_world);

    event_loop.set_control_flow(ControlFlow::Poll);
    info!(
        window_width = size.width,
        window_height = size.height,
        zoom = camera.zoom(),
        marker_spacing_world,
        "viewer_started"
    );

    let mut input = InputState::default();
    let mut log_view_state = false;
    let mut last_frame_instant = Instant::now();

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    info!(reason = "window_close", "shutdown_requested");
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    camera.set_viewport_size(new_size.width, new_size.height);
                    if new_size.width > 0 && new_size.height > 0 {
                        match build_pixels(window, new_size.width, new_size.height) {
                            Ok(rebuilt) => pixels = rebuilt,
                            Err(error) => {
                                warn!(error = %error, "surface_resize_failed");
                                window_target.exit();
                            }
                        }
                    }
                }
                WindowEvent::CursorMoved { position, .. } => {
                    input.cursor_position_px = Some((position.x as f32, position.y as f32));
                }
                WindowEvent::CursorLeft { .. } => {
                    input.cursor_position_px = None;
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    input.handle_mouse_input(button, state);
                }
                WindowEvent::MouseWheel { delta, .. } => {
                    input.handle_mouse_wheel(delta);
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    input.handle_keyboard_input(&event);
                    if input.quit_requested {
                        info!(reason = "escape_key", "shutdown_requested");
                        window_target.exit();
                    }
                }
                WindowEvent::RedrawRequested => {
                    let now = Instant::now();
                    let frame_dt_seconds = now
                        .saturating_duration_since(last_frame_instant)
                        .as_secs_f32()
                        .min(MAX_FRAME_DT_SECONDS);
                    last_frame_instant = now;

                    step_camera(&mut camera, &mut input, frame_dt_seconds);

                    if input.take_state_log_toggle_pressed() {
                        log_view_state = !log_view_state;
                        info!(log_view_state, "view_state_logging_toggled");
                    }
                    if log_view_state {
                        camera.log_view_state();
                    }

                    if let Some((cursor_x, cursor_y)) = input.take_left_click_at_cursor() {
                        let world = camera.screen_to_world(cursor_x as i32, cursor_y as i32);
                        info!(
                            screen_x = cursor_x as i32,
                            screen_y = cursor_y as i32,
                            world_x = world.x,
                            world_y = world.y,
                            "cursor_hit_test"
                        );
                    }

                    render_frame(&mut pixels, &camera, marker_spacing_world);
                    if let Err(error) = pixels.render() {
                        warn!(error = %error, "surface_present_failed");
                        window_target.exit();
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                window.request_redraw();
            }
            Event::LoopExiting => {
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(ViewerError::EventLoopRun)
}

fn build_pixels(
    window: &'static winit::window::Window,
    width: u32,
    height: u32,
) -> Result<Pixels<'static>, PixelsError> {
    let surface = SurfaceTexture::new(width, height, window);
    Pixels::new(width, height, surface)
}

fn step_camera(camera: &mut Camera, input: &mut InputState, frame_dt_seconds: f32) {
    let zoom_steps = input.take_zoom_steps();
    if zoom_steps != 0 {
        camera.apply_zoom_steps(zoom_steps);
        info!(zoom = camera.zoom(), "camera_zoom_changed");
    }

    let direction = input.pan.direction();
    if direction != Vec2::default() {
        let distance = PAN_SPEED_WORLD_PER_SECOND * frame_dt_seconds / camera.zoom();
        let focal = camera.looking_at();
        camera.look_at(Vec2 {
            x: focal.x + direction.x * distance,
            y: focal.y + direction.y * distance,
        });
    }
}

fn render_frame(pixels: &mut Pixels<'static>, camera: &Camera, marker_spacing_world: f32) {
    let viewport = camera.viewport();
    if viewport.width == 0 || viewport.height == 0 {
        return;
    }
    let frame = pixels.frame_mut();
    draw::fill_frame(frame, CLEAR_COLOR);
    draw_marker_lattice(frame, camera, marker_spacing_world);

    let (focal_x, focal_y, _) = camera.point_on_screen(camera.looking_at());
    draw::draw_cross(
        frame,
        viewport.width,
        viewport.height,
        focal_x,
        focal_y,
        FOCAL_CROSS_HALF_SIZE_PX,
        FOCAL_CROSS_COLOR,
    );
}

// One square marker per lattice point, culled and placed through the
// camera like any renderer drawable.
fn draw_marker_lattice(frame: &mut [u8], camera: &Camera, spacing_world: f32) {
    let viewport = camera.viewport();
    let (ix_start, ix_end, iy_start, iy_end) =
        lattice_index_bounds(camera.visible_bounds(), spacing_world);

    for iy in iy_start..=iy_end {
        for ix in ix_start..=ix_end {
            let world = Vec2 {
                x: ix as f32 * spacing_world,
                y: iy as f32 * spacing_world,
            };
            let (origin_x, origin_y, visible) = camera.place(world, MARKER_SIZE_PX, MARKER_SIZE_PX);
            if !visible {
                continue;
            }
            let color = if ix == 0 && iy == 0 {
                ORIGIN_MARKER_COLOR
            } else {
                MARKER_COLOR
            };
            draw::draw_square_from_origin(
                frame,
                viewport.width,
                viewport.height,
                origin_x,
                origin_y,
                MARKER_SIZE_PX,
                color,
            );
        }
    }
}

fn lattice_index_bounds(bounds: VisibleBounds, spacing_world: f32) -> (i32, i32, i32, i32) {
    (
        (bounds.left / spacing_world).floor() as i32,
        (bounds.right / spacing_world).ceil() as i32,
        (bounds.bottom / spacing_world).floor() as i32,
        (bounds.top / spacing_world).ceil() as i32,
    )
}

fn normalize_marker_spacing(spacing_world: f32) -> f32 {
    if spacing_world.is_finite() && spacing_world > 0.0 {
        return spacing_world;
    }
    let fallback = ViewerConfig::default().marker_spacing_world;
    warn!(
        requested_spacing = spacing_world,
        fallback, "marker_spacing_invalid_using_default"
    );
    fallback
}

#[derive(Debug, Clone, Copy, Default)]
struct PanState {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
}

impl PanState {
    fn direction(&self) -> Vec2 {
        let mut direction = Vec2::default();
        if self.up {
            direction.y += 1.0;
        }
        if self.down {
            direction.y -= 1.0;
        }
        if self.left {
            direction.x -= 1.0;
        }
        if self.right {
            direction.x += 1.0;
        }
        direction
    }
}

#[derive(Debug, Default)]
struct InputState {
    quit_requested: bool,
    pan: PanState,
    cursor_position_px: Option<(f32, f32)>,
    pending_zoom_steps: i32,
    left_mouse_is_down: bool,
    left_click_pressed_edge: bool,
    state_log_key_is_down: bool,
    state_log_toggle_pressed_edge: bool,
}

impl InputState {
    fn handle_keyboard_input(&mut self, key_event: &winit::event::KeyEvent) {
        let is_pressed = key_event.state == ElementState::Pressed;
        match key_event.physical_key {
            PhysicalKey::Code(KeyCode::KeyW) | PhysicalKey::Code(KeyCode::ArrowUp) => {
                self.pan.up = is_pressed;
            }
            PhysicalKey::Code(KeyCode::KeyS) | PhysicalKey::Code(KeyCode::ArrowDown) => {
                self.pan.down = is_pressed;
            }
            PhysicalKey::Code(KeyCode::KeyA) | PhysicalKey::Code(KeyCode::ArrowLeft) => {
                self.pan.left = is_pressed;
            }
            PhysicalKey::Code(KeyCode::KeyD) | PhysicalKey::Code(KeyCode::ArrowRight) => {
                self.pan.right = is_pressed;
            }
            PhysicalKey::Code(KeyCode::Equal) | PhysicalKey::Code(KeyCode::NumpadAdd) => {
                if is_pressed {
                    self.pending_zoom_steps = self.pending_zoom_steps.saturating_add(1);
                }
            }
            PhysicalKey::Code(KeyCode::Minus) | PhysicalKey::Code(KeyCode::NumpadSubtract) => {
                if is_pressed {
                    self.pending_zoom_steps = self.pending_zoom_steps.saturating_sub(1);
                }
            }
            PhysicalKey::Code(KeyCode::F1) => {
                self.handle_state_log_key(key_event.state);
            }
            PhysicalKey::Code(KeyCode::Escape) => {
                if is_pressed {
                    self.quit_requested = true;
                }
            }
            _ => {}
        }
    }

    fn handle_state_log_key(&mut self, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.state_log_key_is_down {
                    self.state_log_toggle_pressed_edge = true;
                }
                self.state_log_key_is_down = true;
            }
            ElementState::Released => self.state_log_key_is_down = false,
        }
    }

    fn handle_mouse_input(&mut self, button: MouseButton, state: ElementState) {
        if button != MouseButton::Left {
            return;
        }
        match state {
            ElementState::Pressed => {
                if !self.left_mouse_is_down {
                    self.left_click_pressed_edge = true;
                }
                self.left_mouse_is_down = true;
            }
            ElementState::Released => self.left_mouse_is_down = false,
        }
    }

    fn handle_mouse_wheel(&mut self, delta: MouseScrollDelta) {
        let steps = zoom_steps_from_scroll_delta(delta);
        self.pending_zoom_steps = self.pending_zoom_steps.saturating_add(steps);
    }

    fn take_zoom_steps(&mut self) -> i32 {
        let steps = self.pending_zoom_steps;
        self.pending_zoom_steps = 0;
        steps
    }

    fn take_state_log_toggle_pressed(&mut self) -> bool {
        let was_pressed = self.state_log_toggle_pressed_edge;
        self.state_log_toggle_pressed_edge = false;
        was_pressed
    }

    fn take_left_click_at_cursor(&mut self) -> Option<(f32, f32)> {
        let was_pressed = self.left_click_pressed_edge;
        self.left_click_pressed_edge = false;
        if was_pressed {
            self.cursor_position_px
        } else {
            None
        }
    }
}

fn zoom_steps_from_scroll_delta(delta: MouseScrollDelta) -> i32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y.round() as i32,
        MouseScrollDelta::PixelDelta(position) => {
            if position.y > 0.0 {
                1
            } else if position.y < 0.0 {
                -1
            } else {
                0
            }
        }
    }
}
