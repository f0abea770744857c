//! Projectiles and shockwaves
//!
//! Pure linear motion: no gravity, no collision with world geometry. A
//! projectile is removed when it hits the player or drifts far outside the
//! play area (see SimContext::step).

use super::{Aabb, Bounds};

pub const PROJECTILE_SIZE: f32 = 10.0;
pub const SHOCKWAVE_WIDTH: f32 = 30.0;
pub const SHOCKWAVE_HEIGHT: f32 = 10.0;

/// Distinguishes the spawn source; motion is identical for all kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileKind {
    /// Fired by a turret.
    TurretShot,
    /// Aimed shot fired by a boss.
    BossShot,
    /// Wide ground-pound shockwave (Tyrant) or its simple Warden counterpart.
    Shockwave,
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub vx: f32,
    pub vy: f32,
    pub kind: ProjectileKind,
}

impl Projectile {
    pub fn new(x: f32, y: f32, vx: f32, vy: f32, kind: ProjectileKind) -> Self {
        Self {
            x,
            y,
            width: PROJECTILE_SIZE,
            height: PROJECTILE_SIZE,
            vx,
            vy,
            kind,
        }
    }

    /// Wide horizontal shockwave used by the Tyrant's ground pound.
    pub fn shockwave(x: f32, y: f32, vx: f32) -> Self {
        Self {
            x,
            y,
            width: SHOCKWAVE_WIDTH,
            height: SHOCKWAVE_HEIGHT,
            vx,
            vy: 0.0,
            kind: ProjectileKind::Shockwave,
        }
    }

    pub fn update(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
    }
}

impl Bounds for Projectile {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projectile_moves_linearly() {
        let mut p = Projectile::new(100.0, 200.0, 3.0, -1.5, ProjectileKind::TurretShot);
        for _ in 0..10 {
            p.update();
        }
        assert_eq!(p.x, 130.0);
        assert_eq!(p.y, 185.0);
    }

    #[test]
    fn test_shockwave_has_no_vertical_motion() {
        let mut s = Projectile::shockwave(400.0, 570.0, -5.0);
        for _ in 0..20 {
            s.update();
        }
        assert_eq!(s.y, 570.0);
        assert_eq!(s.width, SHOCKWAVE_WIDTH);
    }
}
