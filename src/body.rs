//! The integrator-owned rigid body, as seen by the geometry layer.

use crate::geom;
use crate::{Fp, Vec2};

/// Application-chosen handle tying shapes to their owning body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(pub u32);

/// Transform source for attached shapes.
///
/// Integration (velocity, forces, stepping) happens outside this crate;
/// only the position and rotation are consumed here, once per step per
/// body. Rotation is carried as the unit vector `(cos, sin)` and kept in
/// sync with the angle.
#[derive(Debug, Clone, Copy)]
pub struct Body {
    id: BodyId,
    /// World position.
    pub pos: Vec2,
    angle: Fp,
    rot: Vec2,
}

impl Body {
    pub fn new(id: BodyId, pos: Vec2, angle: Fp) -> Body {
        Body {
            id,
            pos,
            angle,
            rot: geom::rot_from_angle(angle),
        }
    }

    #[inline]
    pub fn id(&self) -> BodyId {
        self.id
    }

    #[inline]
    pub fn angle(&self) -> Fp {
        self.angle
    }

    /// Rotation as a unit vector.
    #[inline]
    pub fn rot(&self) -> Vec2 {
        self.rot
    }

    pub fn set_angle(&mut self, angle: Fp) {
        self.angle = angle;
        self.rot = geom::rot_from_angle(angle);
    }
}
