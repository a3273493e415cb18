//! World bounds, movement integration and overlap tests

use glam::Vec2;

/// Axis-aligned simulation area with its origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub width: f32,
    pub height: f32,
}

impl WorldBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Edges count as inside
    pub fn contains(&self, point: Vec2) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }

    /// Keep a body of `radius` fully inside the world
    pub fn clamp(&self, point: Vec2, radius: f32) -> Vec2 {
        let rx = radius.min(self.width / 2.0);
        let ry = radius.min(self.height / 2.0);
        Vec2::new(
            point.x.clamp(rx, self.width - rx),
            point.y.clamp(ry, self.height - ry),
        )
    }
}

/// Physics system for moving bodies
pub struct PhysicsSystem;

impl PhysicsSystem {
    /// Advance a position by `velocity` over `dt` seconds
    pub fn integrate(position: Vec2, velocity: Vec2, dt: f32) -> Vec2 {
        position + velocity * dt
    }

    /// Facing angle for a velocity, if it is moving at all
    pub fn heading(velocity: Vec2) -> Option<f32> {
        if velocity == Vec2::ZERO {
            None
        } else {
            Some(velocity.y.atan2(velocity.x))
        }
    }

    /// Check overlap between two circles (touching counts)
    pub fn check_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
        let combined_radius = radius_a + radius_b;
        a.distance_squared(b) <= combined_radius * combined_radius
    }
}
