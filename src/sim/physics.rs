//! Fixed-step projectile integration and retirement
//!
//! Velocity picks up gravity first, then position moves by the new velocity.

use glam::DVec2;

use super::pool::ProjectilePool;
use super::state::Projectile;
use crate::consts::*;
use crate::normalize_angle;

/// Advance one projectile by `dt` frames (1.0 for a normal frame)
pub fn advance(projectile: &mut Projectile, dt: f64) {
    if !projectile.active {
        return;
    }

    projectile.velocity.y += GRAVITY * dt;
    projectile.position += projectile.velocity * dt;
    projectile.rotation = normalize_angle(projectile.rotation + projectile.rotation_speed * dt);

    if projectile.sliced {
        for fragment in projectile.fragments.iter_mut().filter(|f| f.is_live()) {
            fragment.velocity.y += FRAGMENT_GRAVITY * dt;
            fragment.position += fragment.velocity * dt;
            fragment.rotation = normalize_angle(fragment.rotation + fragment.rotation_speed * dt);
            fragment.time_remaining -= 1;
        }
    }
}

/// Is `position` outside the playfield padded by one object size?
pub fn out_of_bounds(position: DVec2) -> bool {
    position.x < -FRUIT_SIZE
        || position.x > PLAYFIELD_WIDTH + FRUIT_SIZE
        || position.y < -FRUIT_SIZE
        || position.y > PLAYFIELD_HEIGHT + FRUIT_SIZE
}

/// Whether an active projectile has finished its life
///
/// Missed fruit leave quietly: there is no score penalty for letting one fall.
pub fn should_retire(projectile: &Projectile) -> bool {
    if !projectile.active || !out_of_bounds(projectile.position) {
        return false;
    }
    !projectile.sliced || projectile.fragments_expired()
}

/// Advance every active slot and retire finished ones
///
/// Returns the number of slots freed this step.
pub fn step_pool(pool: &mut ProjectilePool, dt: f64) -> usize {
    let mut retired = 0;
    for projectile in pool.slots_mut().iter_mut().filter(|p| p.active) {
        advance(projectile, dt);
        if should_retire(projectile) {
            log::debug!(
                "Retiring {} (sliced: {}) at ({:.0}, {:.0})",
                projectile.kind.as_str(),
                projectile.sliced,
                projectile.position.x,
                projectile.position.y
            );
            projectile.retire();
            retired += 1;
        }
    }
    retired
}
