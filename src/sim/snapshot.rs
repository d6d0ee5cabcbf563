//! Read-only frame data for the presentation sink

use glam::DVec2;
use serde::Serialize;

use super::state::{Fragment, GamePhase, GameSession, ProjectileKind};

#[derive(Debug, Clone, Serialize)]
pub struct FragmentView {
    pub position: DVec2,
    pub rotation: f64,
    pub time_remaining: u32,
}

impl From<&Fragment> for FragmentView {
    fn from(fragment: &Fragment) -> Self {
        Self {
            position: fragment.position,
            rotation: fragment.rotation,
            time_remaining: fragment.time_remaining,
        }
    }
}

/// One active slot as the renderer sees it
#[derive(Debug, Clone, Serialize)]
pub struct ProjectileView {
    pub slot: usize,
    pub kind: ProjectileKind,
    pub position: DVec2,
    pub rotation: f64,
    pub sliced: bool,
    /// Only live fragments of a sliced projectile
    pub fragments: Vec<FragmentView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot {
    pub phase: GamePhase,
    pub score: i64,
    pub health: i32,
    pub elapsed_secs: f64,
    pub trail_visible: bool,
    pub pointer: Option<DVec2>,
    pub slow_motion: bool,
    pub double_points: bool,
    pub projectiles: Vec<ProjectileView>,
}

impl GameSession {
    /// Capture what needs drawing this frame
    pub fn snapshot(&self) -> FrameSnapshot {
        let projectiles = self
            .pool
            .iter_active()
            .map(|(slot, p)| ProjectileView {
                slot,
                kind: p.kind,
                position: p.position,
                rotation: p.rotation,
                sliced: p.sliced,
                fragments: if p.sliced {
                    p.fragments
                        .iter()
                        .filter(|f| f.is_live())
                        .map(FragmentView::from)
                        .collect()
                } else {
                    Vec::new()
                },
            })
            .collect();

        FrameSnapshot {
            phase: self.phase,
            score: self.score,
            health: self.health,
            elapsed_secs: self.elapsed_time().as_secs_f64(),
            trail_visible: self.pointer.trail_visible,
            pointer: self.pointer.last,
            slow_motion: self.effects.slow_motion_frames > 0,
            double_points: self.effects.double_points_frames > 0,
            projectiles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::slice_projectile;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_snapshot_lists_active_only() {
        let mut session = GameSession::new(5);
        session.spawn_default();
        session.spawn_default();
        session.pool.slots_mut()[0].retire();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.projectiles.len(), 1);
        assert_eq!(snapshot.projectiles[0].slot, 1);
        assert!(snapshot.projectiles[0].fragments.is_empty());
    }

    #[test]
    fn test_snapshot_includes_live_fragments() {
        let mut session = GameSession::new(5);
        let slot = session.spawn_default().unwrap_or_default();
        let mut rng = Pcg32::seed_from_u64(1);
        if let Some(p) = session.pool.get_mut(slot) {
            slice_projectile(p, DVec2::X, &mut rng);
            p.fragments[1].time_remaining = 0;
        }
        let snapshot = session.snapshot();
        assert!(snapshot.projectiles[0].sliced);
        assert_eq!(snapshot.projectiles[0].fragments.len(), 1);
    }
}
