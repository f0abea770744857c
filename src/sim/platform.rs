//! Platforms and walls
//!
//! Five behaviors share one struct: standard (static landing surface), moving
//! (horizontal oscillation), breakable (removed shortly after first contact),
//! win (ends the level on landing) and wall (solid on every side).
//!
//! Breakable removal is a per-platform countdown ticked by the orchestrator,
//! so a pending removal cannot outlive the level that scheduled it.

use serde::{Deserialize, Serialize};

use super::{Aabb, Bounds, VIEW_WIDTH};

/// Frames between first contact and removal of a breakable platform
/// (500 ms at the fixed 60 fps step).
pub const BREAK_DELAY_FRAMES: u32 = 30;

/// Horizontal speed of moving platforms.
pub const MOVING_PLATFORM_SPEED: f32 = 2.0;

/// Stable identifier for a platform within one loaded level. Never reused
/// while the level instance is alive, so a patrol reference held by an enemy
/// simply stops resolving when its platform is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlatformId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    Standard,
    Moving,
    Breakable,
    Win,
    Wall,
}

#[derive(Debug, Clone)]
pub struct Platform {
    pub id: PlatformId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: PlatformKind,
    /// Patrol direction for moving platforms (+1 or -1).
    pub direction: f32,
    pub speed: f32,
    /// Frames until removal, armed on first player contact (breakable only).
    pub break_timer: Option<u32>,
}

impl Platform {
    pub fn new(id: PlatformId, x: f32, y: f32, width: f32, height: f32, kind: PlatformKind) -> Self {
        Self {
            id,
            x,
            y,
            width,
            height,
            kind,
            direction: 1.0,
            speed: MOVING_PLATFORM_SPEED,
            break_timer: None,
        }
    }

    /// Per-frame behavior. Only moving platforms do anything: oscillate and
    /// reverse at the screen edges.
    pub fn update(&mut self) {
        if self.kind == PlatformKind::Moving {
            self.x += self.speed * self.direction;
            if self.x + self.width > VIEW_WIDTH || self.x < 0.0 {
                self.direction *= -1.0;
            }
        }
    }

    /// Arm the breakable countdown. Idempotent: a platform already counting
    /// down keeps its original deadline.
    pub fn start_breaking(&mut self) {
        if self.kind == PlatformKind::Breakable && self.break_timer.is_none() {
            self.break_timer = Some(BREAK_DELAY_FRAMES);
        }
    }

    /// Tick the countdown; returns true once the platform should be removed.
    pub fn tick_break_timer(&mut self) -> bool {
        match self.break_timer {
            Some(0) => true,
            Some(n) => {
                self.break_timer = Some(n - 1);
                n - 1 == 0
            }
            None => false,
        }
    }
}

impl Bounds for Platform {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }
}
