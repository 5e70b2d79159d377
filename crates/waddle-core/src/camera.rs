//! Camera rig: spherical follow offsets, staging transitions and zoom.

use rapier3d::prelude::Vector;
use serde::{Deserialize, Serialize};

use crate::util::Spherical;

/// Upper bound for the zoom scalar.
pub const MAX_ZOOM: f32 = 100.0;
/// Lower bound keeping the camera from collapsing onto its target.
pub const MIN_ZOOM: f32 = 0.5;

/// Camera state advanced once per tick by the active game mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraRig {
    pub position: Vector,
    /// What the camera looks at; consumed by the external renderer.
    pub look_target: Vector,
    pub zoom: f32,
    /// Extra distance beyond the target's radius in follow mode.
    pub radius_offset: f32,
    /// Polar-angle offset lifting the camera above the target.
    pub polar_offset: f32,
    /// Interpolation factor toward the follow ideal point per tick.
    pub follow_smoothing: f32,
    /// Interpolation factor toward staging points per tick.
    pub staging_smoothing: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            position: Vector::ZERO,
            look_target: Vector::ZERO,
            zoom: 3.0,
            radius_offset: 1.0,
            polar_offset: 0.1,
            follow_smoothing: 0.07,
            staging_smoothing: 0.01,
        }
    }
}

impl CameraRig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Follow mode: approach the spherical offset point above the target
    /// and look at the target.
    pub fn follow(&mut self, target: Vector) {
        let mut spherical = Spherical::from_cartesian(target);
        spherical.radius += self.radius_offset;
        spherical.phi += self.polar_offset;

        let ideal = spherical.to_cartesian() * self.zoom;
        self.position = self.position.lerp(ideal, self.follow_smoothing);
        self.look_target = target;
    }

    /// Viewing mode: drift toward a staging point while watching the
    /// inspected object.
    pub fn stage(&mut self, staging: Vector, target: Vector) {
        self.position = self.position.lerp(staging, self.staging_smoothing);
        self.look_target = target;
    }

    /// Applies a wheel delta to the zoom scalar.
    ///
    /// Zooming out (positive delta) is always accepted. Zooming in is
    /// accepted only while the player sits between the camera and the
    /// world center, so the camera cannot pass through the surface;
    /// viewing and introduction modes lift that constraint.
    pub fn apply_zoom_delta(&mut self, delta: f32, player_distance: f32, unconstrained: bool) {
        let camera_distance = self.position.length();
        if self.zoom <= MAX_ZOOM && (player_distance < camera_distance || unconstrained) {
            self.zoom += delta;
        } else if delta > 0.0 {
            self.zoom += delta;
        }
        self.zoom = self.zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }
}
