//! Turrets
//!
//! Stationary emitters that fire a single projectile along one cardinal axis
//! on a fixed cooldown. Turrets are full solids: they block the player on
//! every side, like wall platforms.

use serde::{Deserialize, Serialize};

use super::{Aabb, Bounds, Projectile, ProjectileKind};

pub const TURRET_SIZE: f32 = 40.0;
pub const TURRET_COOLDOWN: u32 = 240;
pub const TURRET_SHOT_SPEED: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    Left,
    Right,
    Up,
    Down,
}

impl Facing {
    /// Next direction clockwise; used by the editor's rotate mode.
    pub fn rotated(self) -> Self {
        match self {
            Facing::Left => Facing::Up,
            Facing::Up => Facing::Right,
            Facing::Right => Facing::Down,
            Facing::Down => Facing::Left,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Turret {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub facing: Facing,
    shoot_timer: u32,
}

impl Turret {
    pub fn new(x: f32, y: f32, facing: Facing) -> Self {
        Self {
            x,
            y,
            width: TURRET_SIZE,
            height: TURRET_SIZE,
            facing,
            shoot_timer: 0,
        }
    }

    pub fn update(&mut self, projectiles: &mut Vec<Projectile>) {
        self.shoot_timer += 1;
        if self.shoot_timer >= TURRET_COOLDOWN {
            self.shoot_timer = 0;
            projectiles.push(self.shot());
        }
    }

    /// Build the projectile for this turret's facing: spawned at the middle
    /// of the facing edge, moving straight along the axis.
    fn shot(&self) -> Projectile {
        let (vx, vy, px, py) = match self.facing {
            Facing::Left => (
                -TURRET_SHOT_SPEED,
                0.0,
                self.x,
                self.y + self.height / 2.0,
            ),
            Facing::Right => (
                TURRET_SHOT_SPEED,
                0.0,
                self.x + self.width,
                self.y + self.height / 2.0,
            ),
            Facing::Up => (
                0.0,
                -TURRET_SHOT_SPEED,
                self.x + self.width / 2.0,
                self.y,
            ),
            Facing::Down => (
                0.0,
                TURRET_SHOT_SPEED,
                self.x + self.width / 2.0,
                self.y + self.height,
            ),
        };
        Projectile::new(px - 5.0, py - 5.0, vx, vy, ProjectileKind::TurretShot)
    }
}

impl Bounds for Turret {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turret_fires_on_cooldown() {
        let mut t = Turret::new(0.0, 100.0, Facing::Right);
        let mut shots = Vec::new();
        for _ in 0..TURRET_COOLDOWN - 1 {
            t.update(&mut shots);
        }
        assert!(shots.is_empty());
        t.update(&mut shots);
        assert_eq!(shots.len(), 1);
        // Cooldown restarts after firing.
        for _ in 0..TURRET_COOLDOWN {
            t.update(&mut shots);
        }
        assert_eq!(shots.len(), 2);
    }

    #[test]
    fn test_shot_direction_left() {
        let t = Turret::new(100.0, 100.0, Facing::Left);
        let shot = t.shot();
        assert_eq!(shot.vx, -TURRET_SHOT_SPEED);
        assert_eq!(shot.vy, 0.0);
        assert_eq!(shot.x, 95.0); // left edge, centered on the 10px projectile
        assert_eq!(shot.y, 115.0);
    }

    #[test]
    fn test_shot_direction_right() {
        let t = Turret::new(100.0, 100.0, Facing::Right);
        let shot = t.shot();
        assert_eq!(shot.vx, TURRET_SHOT_SPEED);
        assert_eq!(shot.vy, 0.0);
        assert_eq!(shot.x, 135.0); // right edge
        assert_eq!(shot.y, 115.0);
    }

    #[test]
    fn test_shot_direction_up() {
        let t = Turret::new(100.0, 100.0, Facing::Up);
        let shot = t.shot();
        assert_eq!(shot.vx, 0.0);
        assert_eq!(shot.vy, -TURRET_SHOT_SPEED);
        assert_eq!(shot.x, 115.0);
        assert_eq!(shot.y, 95.0); // top edge
    }

    #[test]
    fn test_shot_direction_down() {
        let t = Turret::new(100.0, 100.0, Facing::Down);
        let shot = t.shot();
        assert_eq!(shot.vx, 0.0);
        assert_eq!(shot.vy, TURRET_SHOT_SPEED);
        assert_eq!(shot.x, 115.0);
        assert_eq!(shot.y, 135.0); // bottom edge
    }

    #[test]
    fn test_rotation_cycle() {
        let mut f = Facing::Left;
        for _ in 0..4 {
            f = f.rotated();
        }
        assert_eq!(f, Facing::Left);
    }
}
