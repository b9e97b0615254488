use glam::DVec2;

/// A rotation stored as its sine/cosine pair so repeated application never
/// re-runs trig.
#[derive(Copy, Clone, Debug)]
pub struct Rot {
    pub sin: f64,
    pub cos: f64,
}

impl Rot {
    pub const IDENTITY: Self = Self { sin: 0.0, cos: 1.0 };

    /// Rotation of `angle` radians.
    pub fn from_angle(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self { sin, cos }
    }

    /// Rotate `p`.
    pub fn rotate(self, p: DVec2) -> DVec2 {
        DVec2::new(
            p.x * self.cos - p.y * self.sin,
            p.x * self.sin + p.y * self.cos,
        )
    }

    /// Rotate `p` by the inverse rotation.
    pub fn inv_rotate(self, p: DVec2) -> DVec2 {
        DVec2::new(
            p.x * self.cos + p.y * self.sin,
            p.y * self.cos - p.x * self.sin,
        )
    }
}

/// A rigid transform: rotation followed by translation.
#[derive(Copy, Clone, Debug)]
pub struct Transform {
    pub position: DVec2,
    pub rotation: Rot,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: DVec2::ZERO,
        rotation: Rot::IDENTITY,
    };

    pub fn new(position: DVec2, angle: f64) -> Self {
        Self {
            position,
            rotation: Rot::from_angle(angle),
        }
    }

    /// Map a local point to world space.
    pub fn apply(self, p: DVec2) -> DVec2 {
        self.rotation.rotate(p) + self.position
    }

    /// Map a world point back to local space.
    pub fn apply_inv(self, p: DVec2) -> DVec2 {
        self.rotation.inv_rotate(p - self.position)
    }
}

/// Linear-in-time motion from `(p0, r0)` at t = 0 to `(p1, r1)` at t = 1.
///
/// The rotation angle is lerped component-wise rather than spherically,
/// which assumes small per-step rotations.
#[derive(Copy, Clone, Debug, Default)]
pub struct Sweep {
    pub p0: DVec2,
    pub p1: DVec2,
    pub r0: f64,
    pub r1: f64,
}

impl Sweep {
    /// The transform at time `t`.
    pub fn transform_at(self, t: f64) -> Transform {
        Transform::new(
            self.p0.lerp(self.p1, t),
            self.r0 * (1.0 - t) + self.r1 * t,
        )
    }

    /// Advance the start of the sweep to time `t`, keeping the endpoint.
    pub fn advance(self, t: f64) -> Sweep {
        Sweep {
            p0: self.p0.lerp(self.p1, t),
            p1: self.p1,
            r0: self.r0 * (1.0 - t) + self.r1 * t,
            r1: self.r1,
        }
    }
}

/// Contact between two overlapping shapes.
#[derive(Copy, Clone, Debug)]
pub struct Collision {
    /// Unit contact normal, directed from shape A toward shape B.
    pub normal: DVec2,
    /// Penetration depth along the normal, non-negative.
    pub depth: f64,
}
