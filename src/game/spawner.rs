//! Enemy spawn placement and initial targeting

use glam::Vec2;
use rand::Rng;

use super::physics::WorldBounds;

/// Border edge an enemy enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        match rng.gen_range(0..4) {
            0 => Self::Top,
            1 => Self::Right,
            2 => Self::Bottom,
            _ => Self::Left,
        }
    }

    /// Uniformly random point along this edge
    pub fn random_point<R: Rng>(&self, rng: &mut R, bounds: &WorldBounds) -> Vec2 {
        match self {
            Self::Top => Vec2::new(rng.gen_range(0.0..=bounds.width), 0.0),
            Self::Right => Vec2::new(bounds.width, rng.gen_range(0.0..=bounds.height)),
            Self::Bottom => Vec2::new(rng.gen_range(0.0..=bounds.width), bounds.height),
            Self::Left => Vec2::new(0.0, rng.gen_range(0.0..=bounds.height)),
        }
    }
}

/// Pick a spawn point on a random border edge
pub fn border_spawn_point<R: Rng>(rng: &mut R, bounds: &WorldBounds) -> Vec2 {
    Edge::random(rng).random_point(rng, bounds)
}

/// Nearest target to `from`, by Euclidean distance
pub fn nearest_target(from: Vec2, targets: impl IntoIterator<Item = Vec2>) -> Option<Vec2> {
    targets
        .into_iter()
        .min_by(|a, b| a.distance_squared(from).total_cmp(&b.distance_squared(from)))
}

/// Velocity for a freshly spawned enemy.
///
/// Heads for the nearest target at `speed`; this is a snapshot and is never
/// updated. Without targets each axis is drawn from `[-random_speed, random_speed]`.
pub fn initial_velocity<R: Rng>(
    rng: &mut R,
    spawn: Vec2,
    targets: impl IntoIterator<Item = Vec2>,
    speed: f32,
    random_speed: f32,
) -> Vec2 {
    match nearest_target(spawn, targets) {
        Some(target) => {
            let delta = target - spawn;
            let angle = delta.y.atan2(delta.x);
            Vec2::new(angle.cos(), angle.sin()) * speed
        }
        None => {
            let r = random_speed.abs();
            Vec2::new(rng.gen_range(-r..=r), rng.gen_range(-r..=r))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn spawn_points_lie_on_border() {
        let bounds = WorldBounds::new(800.0, 600.0);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            let p = border_spawn_point(&mut rng, &bounds);
            assert!(bounds.contains(p));
            let on_edge = p.x == 0.0 || p.x == bounds.width || p.y == 0.0 || p.y == bounds.height;
            assert!(on_edge, "{p:?} is not on the border");
        }
    }

    #[test]
    fn all_edges_get_used() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let edges: Vec<Edge> = (0..100).map(|_| Edge::random(&mut rng)).collect();
        for edge in [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left] {
            assert!(edges.contains(&edge));
        }
    }

    #[test]
    fn heads_for_nearest_target() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let spawn = Vec2::new(0.0, 100.0);
        let targets = [Vec2::new(500.0, 100.0), Vec2::new(0.0, 300.0)];

        let v = initial_velocity(&mut rng, spawn, targets, 100.0, 100.0);

        assert!(v.x.abs() < 1e-3);
        assert!((v.y - 100.0).abs() < 1e-3);
    }

    #[test]
    fn random_velocity_without_targets_is_bounded() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..100 {
            let v = initial_velocity(&mut rng, Vec2::ZERO, std::iter::empty(), 100.0, 100.0);
            assert!((-100.0..=100.0).contains(&v.x));
            assert!((-100.0..=100.0).contains(&v.y));
        }
    }
}
