//! Enemy behaviors
//!
//! Three behaviors, no shared states between them:
//! - standard: full-width ground patrol, bounces at the screen edges
//! - patrolling: gravity + landing, walks only on its associated platform
//! - jumping: gravity + landing, relaunches the moment it becomes grounded
//!
//! A patrolling enemy holds a PlatformId, not a reference. The id is resolved
//! against the live platform set every frame; if the platform is gone the
//! enemy keeps falling/landing but stops walking (no bound to patrol).

use serde::{Deserialize, Serialize};

use super::{
    Aabb, Bounds, Platform, PlatformId, ENEMY_JUMP_IMPULSE, GRAVITY, PLATFORM_HEIGHT, VIEW_WIDTH,
};

pub const ENEMY_SIZE: f32 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    Standard,
    Patrolling,
    Jumping,
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: EnemyKind,
    pub direction: f32,
    pub speed: f32,
    pub velocity_y: f32,
    pub grounded: bool,
    /// Patrol bound for patrolling enemies; resolved lazily, tolerant of the
    /// platform's removal.
    pub patrol: Option<PlatformId>,
    pub anim_frame: u32,
    frame_counter: u32,
}

impl Enemy {
    pub fn new(x: f32, y: f32, kind: EnemyKind, patrol: Option<PlatformId>) -> Self {
        Self {
            x,
            y,
            width: ENEMY_SIZE,
            height: ENEMY_SIZE,
            kind,
            direction: 1.0,
            speed: if kind == EnemyKind::Patrolling { 1.0 } else { 2.0 },
            velocity_y: 0.0,
            grounded: false,
            patrol,
            anim_frame: 0,
            frame_counter: 0,
        }
    }

    pub fn update(&mut self, platforms: &[Platform]) {
        if matches!(self.kind, EnemyKind::Standard | EnemyKind::Patrolling) {
            self.tick_animation();
        }

        // Gravity and platform landing for the grounded behaviors. The
        // landing band is the fixed platform thickness: feet inside the top
        // 20px of any platform while falling counts as a landing.
        if matches!(self.kind, EnemyKind::Patrolling | EnemyKind::Jumping) {
            self.velocity_y += GRAVITY;
            self.y += self.velocity_y;
            self.grounded = false;
            for p in platforms {
                let feet = self.y + self.height;
                if self.x < p.x + p.width
                    && self.x + self.width > p.x
                    && feet >= p.y
                    && feet <= p.y + PLATFORM_HEIGHT
                    && self.velocity_y > 0.0
                {
                    self.y = p.y - self.height;
                    self.velocity_y = 0.0;
                    self.grounded = true;
                }
            }
        }

        match self.kind {
            EnemyKind::Standard => {
                self.x += self.speed * self.direction;
                if self.x < 0.0 || self.x + self.width > VIEW_WIDTH {
                    self.direction *= -1.0;
                }
            }
            EnemyKind::Patrolling => {
                let bound = self
                    .patrol
                    .and_then(|id| platforms.iter().find(|p| p.id == id));
                if let Some(platform) = bound {
                    if self.grounded {
                        self.x += self.speed * self.direction;
                        let past_right = self.direction == 1.0
                            && self.x + self.width > platform.x + platform.width;
                        let past_left = self.direction == -1.0 && self.x < platform.x;
                        if past_right || past_left {
                            self.direction *= -1.0;
                        }
                    }
                }
            }
            EnemyKind::Jumping => {
                if self.grounded {
                    self.velocity_y = -ENEMY_JUMP_IMPULSE;
                    // Airborne immediately so the launch cannot re-trigger
                    // before the next landing.
                    self.grounded = false;
                }
            }
        }
    }

    fn tick_animation(&mut self) {
        let num_frames = if self.kind == EnemyKind::Standard { 4 } else { 3 };
        self.frame_counter += 1;
        if self.frame_counter >= 15 {
            self.frame_counter = 0;
            self.anim_frame = (self.anim_frame + 1) % num_frames;
        }
    }
}

impl Bounds for Enemy {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }
}
