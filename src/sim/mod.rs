//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed per-frame steps only (no wall-clock in physics)
//! - Seeded RNG only
//! - Stable iteration order (by pool slot)
//! - No rendering or platform dependencies

pub mod collision;
pub mod geometry;
pub mod physics;
pub mod pool;
pub mod scheduler;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{HitProfile, HitShape, Motion, projectile_hit, resolve_slices};
pub use pool::{LaunchEdge, ProjectilePool, SpawnTuning};
pub use scheduler::{SpawnPattern, SpawnScheduler};
pub use snapshot::{FragmentView, FrameSnapshot, ProjectileView};
pub use state::{
    ActiveEffects, Fragment, GameEvent, GamePhase, GameSession, PowerUp, Projectile,
    ProjectileKind,
};
pub use tick::{InputEvent, KeyCommand, handle_input, tick};
