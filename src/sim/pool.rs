//! Fixed-capacity projectile pool and spawn parameter generation
//!
//! Slots are reused across spawn/retire cycles. A full pool silently drops
//! spawn requests; the capacity is the cap on simultaneous objects.

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Fragment, Projectile, ProjectileKind};
use crate::consts::*;

/// Which playfield edge projectiles are launched from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LaunchEdge {
    /// Dropped in from above, falling
    #[default]
    Top,
    /// Tossed up from below, arcing back down
    Bottom,
}

/// Numeric spawn policy shared by the pool and the scheduler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnTuning {
    pub launch_edge: LaunchEdge,
    /// Scales both velocity components of every launch
    pub speed_multiplier: f64,
    /// Bomb probability for a lone spawn
    pub single_bomb_chance: f64,
    /// Bomb probability for each member of a formation
    pub formation_bomb_chance: f64,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            launch_edge: LaunchEdge::Top,
            speed_multiplier: SPEED_MULTIPLIER,
            single_bomb_chance: SINGLE_BOMB_CHANCE,
            formation_bomb_chance: FORMATION_BOMB_CHANCE,
        }
    }
}

impl SpawnTuning {
    /// Spawn height for the configured launch edge (just outside the visible area)
    pub fn launch_y(&self) -> f64 {
        match self.launch_edge {
            LaunchEdge::Top => -FRUIT_SIZE / 2.0,
            LaunchEdge::Bottom => PLAYFIELD_HEIGHT + FRUIT_SIZE / 2.0,
        }
    }

    /// Vertical launch speed band for the configured edge (unscaled)
    pub fn vy_band(&self) -> (f64, f64) {
        match self.launch_edge {
            LaunchEdge::Top => (1.0, 3.0),
            LaunchEdge::Bottom => (-15.0, -11.0),
        }
    }

    /// Draw a launch velocity: mild horizontal drift, vertical bias toward the playfield
    pub fn draw_velocity<R: Rng>(&self, rng: &mut R) -> DVec2 {
        let drift = match self.launch_edge {
            LaunchEdge::Top => 1.5,
            LaunchEdge::Bottom => 2.0,
        };
        let (vy_min, vy_max) = self.vy_band();
        let vx = rng.random_range(-drift..=drift);
        let vy = rng.random_range(vy_min..=vy_max);
        DVec2::new(vx, vy) * self.speed_multiplier
    }
}

/// Pick a projectile kind with a single weighted draw
///
/// `bomb_chance` of the unit interval maps to Bomb, the rest is split evenly
/// between the fruits.
pub fn draw_kind<R: Rng>(rng: &mut R, bomb_chance: f64) -> ProjectileKind {
    let bomb_chance = bomb_chance.clamp(0.0, 1.0);
    let roll: f64 = rng.random();
    if roll < bomb_chance {
        return ProjectileKind::Bomb;
    }
    let fruit_span = (1.0 - bomb_chance).max(f64::EPSILON);
    let index = ((roll - bomb_chance) / fruit_span * ProjectileKind::FRUITS.len() as f64) as usize;
    ProjectileKind::FRUITS[index.min(ProjectileKind::FRUITS.len() - 1)]
}

/// Spin rate with random magnitude and random direction
fn draw_rotation_speed<R: Rng>(rng: &mut R) -> f64 {
    let speed = rng.random_range(0.02..0.08);
    if rng.random_bool(0.5) { -speed } else { speed }
}

/// The projectile arena
#[derive(Debug, Clone)]
pub struct ProjectilePool {
    slots: Vec<Projectile>,
}

impl ProjectilePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![Projectile::default(); capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// First inactive slot (linear scan)
    pub fn find_free_slot(&self) -> Option<usize> {
        self.slots.iter().position(|p| !p.active)
    }

    /// Fill a free slot with a random position along the launch edge
    ///
    /// Returns false (and does nothing) if the slot is out of range or occupied.
    pub fn spawn_default<R: Rng>(&mut self, slot: usize, rng: &mut R, tuning: &SpawnTuning) -> bool {
        if !self.is_free(slot) {
            return false;
        }
        let x = rng.random_range(FRUIT_SIZE..=PLAYFIELD_WIDTH - FRUIT_SIZE);
        let position = DVec2::new(x, tuning.launch_y());
        let velocity = tuning.draw_velocity(rng);
        let kind = draw_kind(rng, tuning.single_bomb_chance);
        self.fill(slot, position, velocity, kind, rng);
        true
    }

    /// Fill a free slot at an explicit position and velocity (formation spawns)
    pub fn spawn_at<R: Rng>(
        &mut self,
        slot: usize,
        position: DVec2,
        velocity: DVec2,
        rng: &mut R,
        bomb_chance: f64,
    ) -> bool {
        if !self.is_free(slot) {
            return false;
        }
        let kind = draw_kind(rng, bomb_chance);
        self.fill(slot, position, velocity, kind, rng);
        true
    }

    fn is_free(&self, slot: usize) -> bool {
        self.slots.get(slot).is_some_and(|p| !p.active)
    }

    fn fill<R: Rng>(&mut self, slot: usize, position: DVec2, velocity: DVec2, kind: ProjectileKind, rng: &mut R) {
        let rotation = rng.random_range(0.0..std::f64::consts::TAU);
        let rotation_speed = draw_rotation_speed(rng);
        self.slots[slot] = Projectile {
            position,
            velocity,
            kind,
            rotation,
            rotation_speed,
            active: true,
            sliced: false,
            fragments: [Fragment::default(); FRAGMENT_COUNT],
        };
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|p| p.active).count()
    }

    /// Free every slot
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.retire();
        }
    }

    pub fn get(&self, slot: usize) -> Option<&Projectile> {
        self.slots.get(slot)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut Projectile> {
        self.slots.get_mut(slot)
    }

    pub fn slots(&self) -> &[Projectile] {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut [Projectile] {
        &mut self.slots
    }

    /// Active slots with their indices
    pub fn iter_active(&self) -> impl Iterator<Item = (usize, &Projectile)> {
        self.slots.iter().enumerate().filter(|(_, p)| p.active)
    }
}
