//! Slice detection and resolution
//!
//! A pointer segment is tested against every sliceable projectile in three
//! layers, cheapest first:
//! 1. swept segment vs. circle (banana also tests a rotated offset center)
//! 2. dense sampling of the segment against the kind's hit shape, with
//!    speed-scaled look-ahead for fast projectiles
//! 3. for fast swipes, the longer segment from two samples back
//!
//! The first layer that reports a hit wins. A confirmed hit is never undone.

use glam::DVec2;
use rand::Rng;

use super::geometry::{
    point_in_aabb, point_in_circle, point_in_rotated_box, sample_segment, segment_circle_intersect,
};
use super::state::{Fragment, GameEvent, GameSession, Projectile, ProjectileKind};
use crate::consts::*;
use crate::unit;

/// Point-test shape used by the sampled layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitShape {
    /// Box that turns with the sprite
    RotatedBox { half_extents: DVec2 },
    /// Plain circle
    Circle { radius: f64 },
    /// Axis-aligned box, then circle, then speed-compensated circle
    Layered { box_half: f64, radius: f64 },
}

/// Per-kind collision description
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitProfile {
    /// Radius for the swept segment test
    pub sweep_radius: f64,
    /// Distance of the secondary sweep center along the sprite's rotation
    pub sweep_offset: Option<f64>,
    pub shape: HitShape,
}

impl ProjectileKind {
    /// Collision description for this kind
    pub fn hit_profile(&self) -> HitProfile {
        match self {
            // Long curved sprite: largest radius plus a bent-arm center
            ProjectileKind::Banana => HitProfile {
                sweep_radius: FRUIT_SIZE * 0.7,
                sweep_offset: Some(FRUIT_SIZE * 0.25),
                shape: HitShape::RotatedBox {
                    half_extents: DVec2::new(FRUIT_SIZE * 0.6, FRUIT_SIZE * 0.3),
                },
            },
            ProjectileKind::Apple => HitProfile {
                sweep_radius: FRUIT_SIZE * 0.6,
                sweep_offset: None,
                shape: HitShape::Layered {
                    box_half: FRUIT_SIZE * 0.5,
                    radius: FRUIT_SIZE * 0.6,
                },
            },
            // Matches the drawn radius
            ProjectileKind::Orange => HitProfile {
                sweep_radius: FRUIT_SIZE * 0.55,
                sweep_offset: None,
                shape: HitShape::Circle {
                    radius: FRUIT_SIZE * 0.55,
                },
            },
            ProjectileKind::Bomb => HitProfile {
                sweep_radius: FRUIT_SIZE * 0.45,
                sweep_offset: None,
                shape: HitShape::Layered {
                    box_half: FRUIT_SIZE * 0.35,
                    radius: FRUIT_SIZE * 0.45,
                },
            },
        }
    }
}

/// One pointer motion sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub from: DVec2,
    pub to: DVec2,
    /// Sample preceding `from`, if any
    pub before: Option<DVec2>,
}

impl Motion {
    pub fn new(from: DVec2, to: DVec2) -> Self {
        Self {
            from,
            to,
            before: None,
        }
    }

    pub fn displacement(&self) -> f64 {
        self.from.distance(self.to)
    }

    /// Long enough to count as a slice rather than jitter
    pub fn is_slice(&self) -> bool {
        self.displacement() >= MIN_SLICE_DISTANCE
    }

    /// Unit direction of travel (defaults to +x for a zero-length move)
    pub fn direction(&self) -> DVec2 {
        (self.to - self.from).try_normalize().unwrap_or(DVec2::X)
    }
}

/// Layer 1: swept segment vs. the kind's circle
fn sweep_hit(from: DVec2, to: DVec2, projectile: &Projectile, profile: &HitProfile) -> bool {
    if segment_circle_intersect(from, to, projectile.position, profile.sweep_radius) {
        return true;
    }
    profile.sweep_offset.is_some_and(|offset| {
        let center = projectile.position + unit(projectile.rotation) * offset;
        segment_circle_intersect(from, to, center, profile.sweep_radius)
    })
}

/// Layer 2 point test
pub fn point_hit(point: DVec2, projectile: &Projectile) -> bool {
    let center = projectile.position;
    match projectile.kind.hit_profile().shape {
        HitShape::RotatedBox { half_extents } => {
            point_in_rotated_box(point, center, half_extents, projectile.rotation)
        }
        HitShape::Circle { radius } => point_in_circle(point, center, radius),
        HitShape::Layered { box_half, radius } => {
            if point_in_aabb(point, center, DVec2::splat(box_half)) {
                return true;
            }
            if point_in_circle(point, center, radius) {
                return true;
            }
            // Fast objects outrun their hitbox between frames
            let speed = projectile.speed();
            if speed > FAST_OBJECT_SPEED {
                let grown = radius * (1.0 + speed * SPEED_RADIUS_FACTOR);
                let ahead = center + projectile.velocity * LOOKAHEAD_FRAMES;
                return point_in_circle(point, ahead, grown);
            }
            false
        }
    }
}

/// Run every test layer for one projectile
pub fn projectile_hit(projectile: &Projectile, motion: &Motion) -> bool {
    let profile = projectile.kind.hit_profile();

    if sweep_hit(motion.from, motion.to, projectile, &profile) {
        return true;
    }

    if sample_segment(motion.from, motion.to, SLICE_SAMPLES).any(|p| point_hit(p, projectile)) {
        return true;
    }

    if motion.displacement() > FAST_SWIPE_DISTANCE
        && let Some(before) = motion.before
    {
        return sweep_hit(before, motion.to, projectile, &profile);
    }

    false
}

/// Split a projectile into two fragments flying apart across the cut
pub fn slice_projectile<R: Rng>(projectile: &mut Projectile, direction: DVec2, rng: &mut R) {
    projectile.sliced = true;

    let normal = direction.perp();
    let carry = DVec2::new(0.0, projectile.velocity.y * 0.5);
    let spin = projectile.rotation_speed.abs().max(0.02);

    for (i, side) in [1.0, -1.0].into_iter().enumerate() {
        let speed = rng.random_range(FRAGMENT_SPEED_MIN..=FRAGMENT_SPEED_MAX);
        projectile.fragments[i] = Fragment {
            position: projectile.position,
            velocity: normal * side * speed + carry,
            rotation: projectile.rotation,
            rotation_speed: spin * side,
            time_remaining: SLICE_DURATION,
        };
    }
}

/// Resolve one pointer motion against the session
///
/// Returns the number of projectiles sliced. Does nothing outside Playing or
/// for moves below the jitter threshold.
pub fn resolve_slices(session: &mut GameSession, motion: &Motion) -> usize {
    if !session.is_playing() {
        return 0;
    }
    if !motion.is_slice() {
        session.pointer.trail_visible = false;
        return 0;
    }
    session.pointer.trail_visible = true;

    let direction = motion.direction();
    let mut hit_this_motion = vec![false; session.pool.capacity()];
    let mut sliced = 0;

    for slot in 0..session.pool.capacity() {
        let Some(projectile) = session.pool.get(slot) else {
            continue;
        };
        if hit_this_motion[slot] || !projectile.is_sliceable() || !projectile_hit(projectile, motion) {
            continue;
        }
        hit_this_motion[slot] = true;

        let kind = projectile.kind;
        let mut projectile = *projectile;
        slice_projectile(&mut projectile, direction, session.rng_mut());
        if let Some(target) = session.pool.get_mut(slot) {
            *target = projectile;
        }
        sliced += 1;

        if kind.is_bomb() {
            session.lose_health();
            log::debug!("Bomb sliced in slot {slot}, health {}", session.health);
            session.push_event(GameEvent::BombSliced { slot });
            if session.check_game_over() {
                break;
            }
        } else {
            session.score += session.effects.points_per_fruit();
            log::debug!("{} sliced in slot {slot}, score {}", kind.as_str(), session.score);
            session.push_event(GameEvent::FruitSliced { slot, kind });
        }
    }

    sliced
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn projectile(kind: ProjectileKind, x: f64, y: f64) -> Projectile {
        Projectile {
            position: DVec2::new(x, y),
            kind,
            active: true,
            ..Default::default()
        }
    }

    fn place(session: &mut GameSession, slot: usize, p: Projectile) {
        session.pool.slots_mut()[slot] = p;
    }

    #[test]
    fn test_radius_ordering() {
        let r = |k: ProjectileKind| k.hit_profile().sweep_radius;
        assert!(r(ProjectileKind::Banana) > r(ProjectileKind::Apple));
        assert!(r(ProjectileKind::Apple) > r(ProjectileKind::Bomb));
        assert!(r(ProjectileKind::Orange) > r(ProjectileKind::Bomb));
    }

    #[test]
    fn test_diagonal_slice_hits_apple() {
        let apple = projectile(ProjectileKind::Apple, 100.0, 100.0);
        let motion = Motion::new(DVec2::new(90.0, 90.0), DVec2::new(110.0, 110.0));
        assert!(projectile_hit(&apple, &motion));
    }

    #[test]
    fn test_distant_motion_misses() {
        let apple = projectile(ProjectileKind::Apple, 100.0, 100.0);
        let motion = Motion::new(DVec2::new(300.0, 300.0), DVec2::new(320.0, 300.0));
        assert!(!projectile_hit(&apple, &motion));
    }

    #[test]
    fn test_banana_offset_center() {
        let mut banana = projectile(ProjectileKind::Banana, 100.0, 100.0);
        banana.rotation = 0.0;
        // Just beyond the main sweep circle, inside the offset one
        let x = 100.0 + FRUIT_SIZE * 0.7 + 5.0;
        let motion = Motion::new(DVec2::new(x, 80.0), DVec2::new(x, 120.0));
        assert!(projectile_hit(&banana, &motion));

        banana.rotation = std::f64::consts::PI;
        assert!(!projectile_hit(&banana, &motion));
    }

    #[test]
    fn test_banana_rotated_box_point() {
        let mut banana = projectile(ProjectileKind::Banana, 0.0, 0.0);
        banana.rotation = 0.0;
        assert!(point_hit(DVec2::new(FRUIT_SIZE * 0.55, 0.0), &banana));
        assert!(!point_hit(DVec2::new(0.0, FRUIT_SIZE * 0.35), &banana));
        banana.rotation = std::f64::consts::FRAC_PI_2;
        assert!(point_hit(DVec2::new(0.0, FRUIT_SIZE * 0.55), &banana));
    }

    #[test]
    fn test_fast_bomb_lookahead() {
        let mut bomb = projectile(ProjectileKind::Bomb, 100.0, 100.0);
        let point = DVec2::new(100.0, 100.0 + FRUIT_SIZE * 0.45 + 6.0);
        assert!(!point_hit(point, &bomb));
        bomb.velocity = DVec2::new(0.0, 14.0);
        assert!(point_hit(point, &bomb));
    }

    #[test]
    fn test_fast_swipe_uses_previous_sample() {
        let orange = projectile(ProjectileKind::Orange, 100.0, 100.0);
        let motion = Motion {
            from: DVec2::new(200.0, 100.0),
            to: DVec2::new(250.0, 100.0),
            before: Some(DVec2::new(0.0, 100.0)),
        };
        assert!(projectile_hit(&orange, &motion));

        let slow = Motion {
            to: DVec2::new(230.0, 100.0),
            ..motion
        };
        assert!(!projectile_hit(&orange, &slow));
    }

    #[test]
    fn test_slice_creates_opposing_fragments() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut p = projectile(ProjectileKind::Apple, 50.0, 50.0);
        p.velocity = DVec2::new(0.0, 4.0);
        p.rotation_speed = 0.05;
        slice_projectile(&mut p, DVec2::X, &mut rng);

        assert!(p.sliced);
        let [a, b] = p.fragments;
        assert_eq!(a.time_remaining, SLICE_DURATION);
        assert_eq!(b.time_remaining, SLICE_DURATION);
        // Cut along x: fragments separate in y around half the parent's vy
        assert!(a.velocity.y - 2.0 > 0.0);
        assert!(b.velocity.y - 2.0 < 0.0);
        assert!(a.velocity.x.abs() < 1e-9);
        assert!(a.rotation_speed * b.rotation_speed < 0.0);
    }

    #[test]
    fn test_jitter_is_ignored() {
        let mut session = GameSession::new(1);
        place(&mut session, 0, projectile(ProjectileKind::Apple, 100.0, 100.0));
        let motion = Motion::new(DVec2::new(100.0, 100.0), DVec2::new(102.0, 101.0));
        assert_eq!(resolve_slices(&mut session, &motion), 0);
        assert!(!session.pointer.trail_visible);
        assert_eq!(session.score, 0);
    }

    #[test]
    fn test_sliced_object_is_immune() {
        let mut session = GameSession::new(1);
        place(&mut session, 0, projectile(ProjectileKind::Apple, 100.0, 100.0));
        let motion = Motion::new(DVec2::new(90.0, 90.0), DVec2::new(110.0, 110.0));
        assert_eq!(resolve_slices(&mut session, &motion), 1);
        let before = session.pool.get(0).copied().unwrap_or_default();
        session.drain_events();

        let reverse = Motion::new(DVec2::new(110.0, 90.0), DVec2::new(90.0, 110.0));
        assert_eq!(resolve_slices(&mut session, &motion), 0);
        assert_eq!(resolve_slices(&mut session, &reverse), 0);
        assert_eq!(session.score, 1);
        assert!(session.drain_events().is_empty());

        let after = session.pool.get(0).copied().unwrap_or_default();
        assert!(after.sliced);
        assert_eq!(after.kind, before.kind);
        assert_eq!(after.position, before.position);
        assert_eq!(after.velocity, before.velocity);
        for (a, b) in after.fragments.iter().zip(before.fragments.iter()) {
            assert_eq!(a.position, b.position);
            assert_eq!(a.velocity, b.velocity);
            assert_eq!(a.rotation_speed, b.rotation_speed);
            assert_eq!(a.time_remaining, b.time_remaining);
        }
    }

    #[test]
    fn test_double_points() {
        let mut session = GameSession::new(1);
        session.apply_power_up(crate::sim::state::PowerUp::DoublePoints);
        place(&mut session, 0, projectile(ProjectileKind::Orange, 100.0, 100.0));
        let motion = Motion::new(DVec2::new(90.0, 90.0), DVec2::new(110.0, 110.0));
        resolve_slices(&mut session, &motion);
        assert_eq!(session.score, 2);
    }

    #[test]
    fn test_bomb_costs_health_not_score() {
        let mut session = GameSession::new(1);
        session.score = 5;
        place(&mut session, 0, projectile(ProjectileKind::Bomb, 100.0, 100.0));
        let motion = Motion::new(DVec2::new(90.0, 90.0), DVec2::new(110.0, 110.0));
        resolve_slices(&mut session, &motion);
        assert_eq!(session.health, STARTING_HEALTH - 1);
        assert_eq!(session.score, 5);
        assert!(
            session
                .drain_events()
                .contains(&GameEvent::BombSliced { slot: 0 })
        );
    }

    #[test]
    fn test_many_bombs_one_game_over() {
        let mut session = GameSession::new(1);
        session.health = 2;
        for slot in 0..5 {
            place(
                &mut session,
                slot,
                projectile(ProjectileKind::Bomb, 100.0 + slot as f64 * 30.0, 100.0),
            );
        }
        let motion = Motion::new(DVec2::new(80.0, 100.0), DVec2::new(260.0, 100.0));
        resolve_slices(&mut session, &motion);
        assert_eq!(session.health, 0);
        assert_eq!(session.leaderboard.entries.len(), 1);
        assert_eq!(session.phase, crate::sim::state::GamePhase::GameOver);
    }

    #[test]
    fn test_no_slicing_outside_playing() {
        let mut session = GameSession::new(1);
        session.health = 0;
        session.check_game_over();
        place(&mut session, 0, projectile(ProjectileKind::Apple, 100.0, 100.0));
        let motion = Motion::new(DVec2::new(90.0, 90.0), DVec2::new(110.0, 110.0));
        assert_eq!(resolve_slices(&mut session, &motion), 0);
        assert!(session.pool.get(0).is_some_and(|p| !p.sliced));
    }
}
