//! Small math helpers shared by locomotion, camera and spawning.

use rapier3d::prelude::{Rotation, Vector};

/// Spherical coordinates matching the render-space convention:
/// `phi` is the polar angle measured from +Y, `theta` the azimuth
/// around Y measured from +Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub phi: f32,
    pub theta: f32,
}

impl Spherical {
    /// Decomposes a cartesian vector. A zero vector yields zero angles.
    pub fn from_cartesian(v: Vector) -> Self {
        let radius = v.length();
        if radius == 0.0 {
            return Self {
                radius: 0.0,
                phi: 0.0,
                theta: 0.0,
            };
        }
        Self {
            radius,
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
            theta: v.x.atan2(v.z),
        }
    }

    /// Recomposes the cartesian vector.
    pub fn to_cartesian(self) -> Vector {
        let sin_phi = self.phi.sin();
        Vector::new(
            self.radius * sin_phi * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * sin_phi * self.theta.cos(),
        )
    }
}

/// Unit vector pointing from the world center (origin) through `position`,
/// or `None` for a degenerate zero-length position.
pub fn outward_axis(position: Vector) -> Option<Vector> {
    position.try_normalize()
}

/// Rotation aligning the model's local +Y with the outward direction at
/// `position`. Returns `None` at the world center. The antipodal case
/// (straight below the center) resolves to a half-turn about an axis
/// perpendicular to +Y.
pub fn face_outward(position: Vector) -> Option<Rotation> {
    let outward = outward_axis(position)?;
    Some(Rotation::from_rotation_arc(Vector::Y, outward))
}

/// Outward alignment composed with a roll about the outward axis, so the
/// player can turn on the spot without losing its footing on the sphere.
pub fn orient_outward(position: Vector, roll: f32) -> Option<Rotation> {
    let outward = outward_axis(position)?;
    let base = face_outward(position)?;
    Some(Rotation::from_axis_angle(outward, roll) * base)
}
