//! Simulation core
//!
//! Fixed-step 2D platformer simulation: one `SimContext::step` per rendered
//! frame, no sub-stepping. All tuning constants live here so the individual
//! entity modules and the collision code agree on the numbers.
//!
//! Coordinates are screen-style (y grows downward). Level data is authored as
//! height-above-ground and converted to absolute y at load time.

mod boss;
mod context;
mod enemy;
mod platform;
mod player;
mod projectile;
mod turret;

pub use boss::{Attack, Boss, BossKind, OverlayColor};
pub use context::{InputFrame, SimContext};
pub use enemy::{Enemy, EnemyKind, ENEMY_SIZE};
pub use platform::{Platform, PlatformId, PlatformKind, BREAK_DELAY_FRAMES};
pub use player::{Player, PlayerPose};
pub use projectile::{Projectile, ProjectileKind};
pub use turret::{Facing, Turret, TURRET_COOLDOWN, TURRET_SIZE};

/// Fixed viewport size. The play field is exactly one screen wide; levels
/// extend upward from the ground.
pub const VIEW_WIDTH: f32 = 800.0;
pub const VIEW_HEIGHT: f32 = 600.0;

/// Top edge of the full-width ground platform.
pub const GROUND_Y: f32 = VIEW_HEIGHT - 20.0;

/// Default platform dimensions used by the editor and the catalog.
pub const PLATFORM_WIDTH: f32 = 100.0;
pub const PLATFORM_HEIGHT: f32 = 20.0;

pub const PLAYER_SIZE: f32 = 40.0;
pub const PLAYER_SPEED: f32 = 5.0;

/// Downward acceleration per frame, shared by the player, enemies and bosses.
pub const GRAVITY: f32 = 0.5;

/// Upward jump impulse (applied as a negative vertical velocity).
pub const JUMP_IMPULSE: f32 = 12.0;
pub const ENEMY_JUMP_IMPULSE: f32 = 8.0;

/// Axis-aligned bounding box. Every entity in the simulation is one of these;
/// there is no rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Aabb {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Strict-overlap test: touching edges do not count as contact.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Implemented by every entity that participates in collision checks.
pub trait Bounds {
    fn bounds(&self) -> Aabb;
}
