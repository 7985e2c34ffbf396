//! Interactive first-person camera
//!
//! The camera translates per-frame keyboard and mouse state into view and
//! projection matrices. Orientation is stored both as a `front`/`right`/`up`
//! basis and as pitch/yaw Euler angles; the angles are authoritative and the
//! basis is re-derived from them on every rotation.

use nalgebra::{Matrix4, Point3, Vector3};

use crate::error::{RenderError, RenderResult};
use crate::utils::clamp;

const MOVE_SPEED: f32 = 2.5;
const ROTATE_SPEED: f32 = 10.0;
const ZOOM_SPEED: f32 = 100.0;

const PITCH_UPPER: f32 = 89.0;
const PITCH_LOWER: f32 = -89.0;

const FOVY_DEFAULT: f32 = 60.0;
const FOVY_MINIMUM: f32 = 15.0;

const DEPTH_NEAR: f32 = 1.0;
const DEPTH_FAR: f32 = 100.0;

#[inline]
fn world_up() -> Vector3<f32> {
    Vector3::y()
}

/// Keys the camera reads for movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    A,
    S,
    D,
    W,
}

/// Mouse buttons the camera reads for rotation (left) and zoom (right)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
}

/// Keyboard and mouse state the camera queries once per frame.
///
/// Implement this for whatever windowing backend drives the render loop; the
/// `minifb_compat` feature ships an implementation for `minifb::Window`.
pub trait Input {
    /// Current cursor position in integer pixel coordinates
    fn cursor_position(&self) -> (i32, i32);

    fn key_pressed(&self, key: Key) -> bool;

    fn button_pressed(&self, button: MouseButton) -> bool;
}

/// Camera tunables. Angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraOptions {
    pub move_speed: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pitch_upper: f32,
    pub pitch_lower: f32,
    pub fovy_default: f32,
    pub fovy_minimum: f32,
    pub aspect: f32,
    pub depth_near: f32,
    pub depth_far: f32,
}

impl CameraOptions {
    /// Default options for the given aspect ratio
    pub fn new(aspect: f32) -> CameraOptions {
        CameraOptions {
            move_speed: MOVE_SPEED,
            rotate_speed: ROTATE_SPEED,
            zoom_speed: ZOOM_SPEED,
            pitch_upper: PITCH_UPPER,
            pitch_lower: PITCH_LOWER,
            fovy_default: FOVY_DEFAULT,
            fovy_minimum: FOVY_MINIMUM,
            aspect,
            depth_near: DEPTH_NEAR,
            depth_far: DEPTH_FAR,
        }
    }

    fn validate(&self) -> RenderResult<()> {
        if self.pitch_upper < self.pitch_lower {
            return Err(RenderError::InvalidOptions("pitch_upper is below pitch_lower"));
        }

        if !(self.fovy_minimum > 0.0) {
            return Err(RenderError::InvalidOptions("fovy_minimum must be positive"));
        }

        if self.fovy_default < self.fovy_minimum {
            return Err(RenderError::InvalidOptions("fovy_default is below fovy_minimum"));
        }

        if !(self.aspect > 0.0) {
            return Err(RenderError::InvalidOptions("aspect must be positive"));
        }

        if !(self.depth_near > 0.0 && self.depth_far > self.depth_near) {
            return Err(RenderError::InvalidOptions("depth range must satisfy far > near > 0"));
        }

        Ok(())
    }
}

/// First-person camera with Euler-angle orientation and fovy zoom.
pub struct Camera {
    position: Point3<f32>,
    /* orientation in vector form */
    front: Vector3<f32>,
    right: Vector3<f32>,
    up: Vector3<f32>,
    /* orientation in Euler angles, degrees */
    pitch: f32,
    yaw: f32,
    /* field of view, degrees */
    fovy: f32,
    /* input history */
    rotating: bool,
    last_x: i32,
    last_y: i32,
    options: CameraOptions,
}

impl Camera {
    /// Create a camera at `position` looking along `forward`.
    ///
    /// Fails with [`RenderError::DegenerateForward`] when `forward` has no
    /// usable direction or is parallel to the world up axis, and with
    /// [`RenderError::InvalidOptions`] when `aspect` is not positive.
    pub fn new(position: Point3<f32>, forward: Vector3<f32>, aspect: f32) -> RenderResult<Camera> {
        if forward.norm() <= 1e-6 || forward.cross(&world_up()).norm() <= 1e-6 {
            return Err(RenderError::DegenerateForward);
        }

        let options = CameraOptions::new(aspect);
        options.validate()?;

        let front = forward.normalize();

        let mut camera = Camera {
            position,
            front,
            right: Vector3::zeros(),
            up: Vector3::zeros(),
            pitch: calculate_pitch(&front),
            yaw: calculate_yaw(&front),
            fovy: options.fovy_default,
            rotating: false,
            last_x: -1,
            last_y: -1,
            options,
        };

        // Derive the basis through the same spherical form the rotation path
        // uses, so orientation is consistent from the first frame.
        camera.update_orientation();

        Ok(camera)
    }

    #[inline(always)]
    pub fn position(&self) -> Point3<f32> { self.position }

    #[inline(always)]
    pub fn front(&self) -> Vector3<f32> { self.front }

    #[inline(always)]
    pub fn right(&self) -> Vector3<f32> { self.right }

    #[inline(always)]
    pub fn up(&self) -> Vector3<f32> { self.up }

    /// Pitch in degrees, clamped into the configured range
    #[inline(always)]
    pub fn pitch(&self) -> f32 { self.pitch }

    /// Yaw in degrees
    #[inline(always)]
    pub fn yaw(&self) -> f32 { self.yaw }

    /// Vertical field of view in degrees
    #[inline(always)]
    pub fn fovy(&self) -> f32 { self.fovy }

    #[inline(always)]
    pub fn options(&self) -> CameraOptions { self.options }

    /// Replace the camera options after validating them.
    pub fn set_options(&mut self, options: CameraOptions) -> RenderResult<()> {
        options.validate()?;
        self.options = options;
        Ok(())
    }

    /// Apply one frame of input: rotate, then zoom, then move.
    pub fn process_input<I: Input>(&mut self, input: &I, delta_time: f32) {
        self.rotate(input, delta_time);
        self.zoom(input, delta_time);
        self.translate(input, delta_time);
    }

    /// View matrix looking from the camera position along `front`
    pub fn view_matrix(&self) -> Matrix4<f32> {
        let target = self.position + self.front;

        Matrix4::look_at_rh(&self.position, &target, &world_up())
    }

    /// Perspective projection from the current fovy and the configured
    /// aspect ratio and depth range
    pub fn proj_matrix(&self) -> Matrix4<f32> {
        let CameraOptions { aspect, depth_near, depth_far, .. } = self.options;

        Matrix4::new_perspective(aspect, self.fovy.to_radians(), depth_near, depth_far)
    }

    /// Combined projection * view matrix
    pub fn view_proj_matrix(&self) -> Matrix4<f32> {
        self.proj_matrix() * self.view_matrix()
    }

    /// Rebuild `front`, `right` and `up` from the Euler angles.
    fn update_orientation(&mut self) {
        let (sin_yaw, cos_yaw) = self.yaw.to_radians().sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.to_radians().sin_cos();

        self.front = Vector3::new(cos_yaw * cos_pitch, sin_pitch, sin_yaw * cos_pitch).normalize();
        self.right = self.front.cross(&world_up()).normalize();
        self.up = self.right.cross(&self.front);
    }

    fn rotate<I: Input>(&mut self, input: &I, delta_time: f32) {
        if input.button_pressed(MouseButton::Left) {
            let (x, y) = input.cursor_position();

            if self.rotating {
                let dx = (x - self.last_x) as f32;
                let dy = (y - self.last_y) as f32;

                self.yaw -= dx * self.options.rotate_speed * delta_time;
                self.pitch += dy * self.options.rotate_speed * delta_time;
                self.pitch = clamp(self.pitch, self.options.pitch_lower, self.options.pitch_upper);

                self.update_orientation();
            } else {
                // the first frame of a drag only arms the state, so stale
                // cursor coordinates never produce a jump
                self.rotating = true;
            }

            self.last_x = x;
            self.last_y = y;
        } else {
            self.rotating = false;
        }
    }

    fn zoom<I: Input>(&mut self, input: &I, delta_time: f32) {
        let options = self.options;

        self.fovy = clamp(self.fovy, options.fovy_minimum, options.fovy_default);

        if input.button_pressed(MouseButton::Right) {
            self.fovy = (self.fovy - options.zoom_speed * delta_time).max(options.fovy_minimum);
        } else {
            self.fovy = (self.fovy + options.zoom_speed * delta_time).min(options.fovy_default);
        }
    }

    fn translate<I: Input>(&mut self, input: &I, delta_time: f32) {
        let mut direction = Vector3::zeros();

        if input.key_pressed(Key::A) {
            direction -= self.right;
        }
        if input.key_pressed(Key::D) {
            direction += self.right;
        }
        if input.key_pressed(Key::S) {
            direction -= self.front;
        }
        if input.key_pressed(Key::W) {
            direction += self.front;
        }

        if direction.norm() > 1e-6 {
            self.position += direction.normalize() * (self.options.move_speed * delta_time);
        }
    }
}

/// Angle between `front` and the world up axis, mapped from `[0, PI]` to
/// pitch degrees in `[90, -90]`.
fn calculate_pitch(front: &Vector3<f32>) -> f32 {
    let angle = clamp(front.dot(&world_up()), -1.0, 1.0).acos();

    (std::f32::consts::FRAC_PI_2 - angle).to_degrees()
}

fn calculate_yaw(front: &Vector3<f32>) -> f32 {
    front.z.atan2(front.x).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angles_match_spherical_parameterization() {
        let front = Vector3::new(0.0, 0.0, -1.0);

        assert!(calculate_pitch(&front).abs() < 1e-4);
        assert!((calculate_yaw(&front) + 90.0).abs() < 1e-4);

        let level = Vector3::new(1.0, 0.0, 0.0);
        assert!(calculate_yaw(&level).abs() < 1e-4);
    }

    #[test]
    fn construction_rejects_degenerate_forward() {
        let origin = Point3::origin();

        assert!(Camera::new(origin, Vector3::zeros(), 1.0).is_err());
        assert!(Camera::new(origin, Vector3::y(), 1.0).is_err());
        assert!(Camera::new(origin, Vector3::new(0.0, 0.0, -1.0), 0.0).is_err());
    }

    #[test]
    fn options_validation_catches_bad_ranges() {
        let mut options = CameraOptions::new(1.0);
        options.pitch_upper = -90.0;
        assert!(options.validate().is_err());

        let mut options = CameraOptions::new(1.0);
        options.fovy_minimum = 0.0;
        assert!(options.validate().is_err());

        let mut options = CameraOptions::new(1.0);
        options.depth_far = options.depth_near;
        assert!(options.validate().is_err());

        assert!(CameraOptions::new(1.0).validate().is_ok());
    }
}
