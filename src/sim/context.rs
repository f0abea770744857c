//! Simulation context and per-frame step
//!
//! `SimContext` owns every live entity collection and is the only code that
//! adds or removes members: load builds the collections, the step removes
//! expired breakables, stomped enemies and spent projectiles. Nothing else
//! mutates membership, so iteration is never invalidated from outside.
//!
//! The step runs its phases in a strict order; reordering them changes
//! observable behavior (the horizontal push-out depends on the delta applied
//! in the same frame, the landing check depends on the pre-motion bottom
//! edge). Terminal conditions never return errors: `game_over` / `game_won`
//! are advisory flags for the mode controller to read next frame.

use crate::level::LevelData;

use super::{
    Aabb, Boss, Bounds, Enemy, Platform, PlatformId, PlatformKind, Player, PlayerPose,
    Projectile, Turret, GRAVITY, GROUND_Y, JUMP_IMPULSE, PLAYER_SIZE, PLAYER_SPEED,
    VIEW_HEIGHT, VIEW_WIDTH,
};

/// Vertical band above a moving platform's top surface within which the
/// player is carried along with it.
const CARRY_BAND: f32 = 5.0;

/// How far outside the play area a projectile may drift before it is pruned.
/// The original never pruned projectiles; this bounds that growth without
/// affecting anything the player can see or be hit by.
const PRUNE_MARGIN: f32 = 600.0;

/// Falling this far below the camera is fatal.
const FALL_MARGIN: f32 = 50.0;

/// Camera dead-zone divisor: the camera keeps the player above
/// `camera_y + VIEW_HEIGHT / CAMERA_FRACTION`.
const CAMERA_FRACTION: f32 = 2.5;

/// Input flags sampled once per frame. No buffering or queuing.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputFrame {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

/// The live simulation for one level attempt.
pub struct SimContext {
    pub player: Player,
    /// Player vertical velocity; positive is downward.
    pub velocity_y: f32,
    pub grounded: bool,
    pub platforms: Vec<Platform>,
    pub enemies: Vec<Enemy>,
    pub turrets: Vec<Turret>,
    pub projectiles: Vec<Projectile>,
    pub boss: Option<Boss>,
    pub camera_y: f32,
    pub score: u32,
    /// Seconds of simulated play time (1/60 per step).
    pub elapsed: f64,
    pub game_over: bool,
    pub game_won: bool,
    next_platform_id: u32,
}

impl SimContext {
    /// Build a fresh simulation from level records. The full-width ground
    /// platform is always present, whatever the records say. Pending state
    /// from a previous attempt (breakable countdowns included) cannot leak
    /// in: everything is rebuilt from the records.
    pub fn from_level(data: &LevelData, boss_seed: u64) -> Self {
        let mut ctx = Self {
            player: Player::new(VIEW_WIDTH / 2.0 - PLAYER_SIZE / 2.0, GROUND_Y - PLAYER_SIZE),
            velocity_y: 0.0,
            grounded: false,
            platforms: Vec::new(),
            enemies: Vec::new(),
            turrets: Vec::new(),
            projectiles: Vec::new(),
            boss: None,
            camera_y: 0.0,
            score: 0,
            elapsed: 0.0,
            game_over: false,
            game_won: false,
            next_platform_id: 0,
        };

        let ground_id = ctx.alloc_platform_id();
        ctx.platforms.push(Platform::new(
            ground_id,
            0.0,
            GROUND_Y,
            VIEW_WIDTH,
            VIEW_HEIGHT - GROUND_Y,
            PlatformKind::Standard,
        ));

        for record in &data.platforms {
            let id = ctx.alloc_platform_id();
            ctx.platforms.push(Platform::new(
                id,
                record.x,
                GROUND_Y - record.elevation,
                record.width,
                record.height,
                record.kind,
            ));
        }

        for record in &data.enemies {
            // A patrolling enemy's platform key is the record x/elevation
            // pair; an unresolved key degrades to "no patrol bound".
            let patrol = match (record.platform_x, record.platform_elevation) {
                (Some(px), Some(pe)) => {
                    let py = GROUND_Y - pe;
                    ctx.platforms
                        .iter()
                        .find(|p| p.x == px && p.y == py)
                        .map(|p| p.id)
                }
                _ => None,
            };
            let platform_top = patrol
                .and_then(|id| ctx.platforms.iter().find(|p| p.id == id))
                .map(|p| p.y);
            let y = match platform_top {
                Some(top) => top - record.elevation,
                None => GROUND_Y - record.elevation,
            };
            ctx.enemies.push(Enemy::new(record.x, y, record.kind, patrol));
        }

        for record in &data.turrets {
            ctx.turrets
                .push(Turret::new(record.x, GROUND_Y - record.elevation, record.facing));
        }

        if let Some(record) = &data.boss {
            ctx.boss = Some(Boss::new(
                record.x,
                GROUND_Y - record.elevation,
                record.width,
                record.height,
                record.health,
                record.kind,
                boss_seed,
            ));
        }

        ctx
    }

    fn alloc_platform_id(&mut self) -> PlatformId {
        let id = PlatformId(self.next_platform_id);
        self.next_platform_id += 1;
        id
    }

    /// Advance the simulation one frame.
    pub fn step(&mut self, input: &InputFrame) {
        // Phase 1: entity updates and deferred breakable removal.
        for platform in &mut self.platforms {
            platform.update();
        }
        self.platforms.retain_mut(|p| !p.tick_break_timer());

        let platforms = &self.platforms;
        for enemy in &mut self.enemies {
            enemy.update(platforms);
        }
        for turret in &mut self.turrets {
            turret.update(&mut self.projectiles);
        }
        if let Some(boss) = self.boss.as_mut() {
            boss.update(&self.player, &mut self.projectiles);
        }
        for projectile in &mut self.projectiles {
            projectile.update();
        }
        let camera_y = self.camera_y;
        self.projectiles.retain(|p| {
            p.x > -PRUNE_MARGIN
                && p.x < VIEW_WIDTH + PRUNE_MARGIN
                && p.y > camera_y - PRUNE_MARGIN
                && p.y < camera_y + VIEW_HEIGHT + PRUNE_MARGIN
        });

        // Phase 2: animation pose from this frame's input.
        let pose = if input.right && !input.left {
            PlayerPose::MovingRight
        } else if input.left && !input.right {
            PlayerPose::MovingLeft
        } else {
            PlayerPose::Standing
        };
        self.player.set_pose(pose);
        self.player.tick_animation();

        // Phase 3: horizontal movement. A moving platform underfoot carries
        // the player along with it.
        let mut carry_dx = 0.0;
        let feet = self.player.y + self.player.height;
        for p in &self.platforms {
            if p.kind == PlatformKind::Moving
                && feet >= p.y
                && feet <= p.y + CARRY_BAND
                && self.player.x < p.x + p.width
                && self.player.x + self.player.width > p.x
            {
                carry_dx = p.speed * p.direction;
            }
        }
        let input_dx = if input.right && !input.left {
            PLAYER_SPEED
        } else if input.left && !input.right {
            -PLAYER_SPEED
        } else {
            0.0
        };
        let total_dx = input_dx + carry_dx;
        self.player.x += total_dx;

        // Phase 4: horizontal push-out against full solids (walls, turrets).
        // Direction comes from the delta just applied, never from overlap
        // depth.
        for p in &self.platforms {
            if p.kind == PlatformKind::Wall {
                Self::push_out_x(&mut self.player, &p.bounds(), total_dx);
            }
        }
        for t in &self.turrets {
            Self::push_out_x(&mut self.player, &t.bounds(), total_dx);
        }

        // Phase 5: vertical movement.
        if input.jump && self.grounded {
            self.velocity_y = -JUMP_IMPULSE;
        }
        self.velocity_y += GRAVITY;
        self.player.y += self.velocity_y;
        self.grounded = false;

        // Phase 6: vertical resolution against platforms and turrets.
        for i in 0..self.platforms.len() {
            let (rect, kind) = {
                let p = &self.platforms[i];
                (p.bounds(), p.kind)
            };
            if !self.player_touches(&rect) {
                continue;
            }
            if self.velocity_y > 0.0 {
                // Swept landing check: the player's bottom edge must have
                // been at or above the solid's top before this frame moved.
                let previous_bottom = self.player.y + self.player.height - self.velocity_y;
                if previous_bottom <= rect.y {
                    self.player.y = rect.y - self.player.height;
                    self.velocity_y = 0.0;
                    self.grounded = true;
                    match kind {
                        PlatformKind::Breakable => self.platforms[i].start_breaking(),
                        PlatformKind::Win => self.game_won = true,
                        _ => {}
                    }
                }
            } else if self.velocity_y < 0.0 && kind == PlatformKind::Wall {
                // Walls block from below; one-sided platforms do not.
                self.player.y = rect.bottom();
                self.velocity_y = 0.0;
            }
        }
        for t in &self.turrets {
            let rect = t.bounds();
            if !self.player_touches(&rect) {
                continue;
            }
            if self.velocity_y > 0.0 {
                let previous_bottom = self.player.y + self.player.height - self.velocity_y;
                if previous_bottom <= rect.y {
                    self.player.y = rect.y - self.player.height;
                    self.velocity_y = 0.0;
                    self.grounded = true;
                }
            } else if self.velocity_y < 0.0 {
                self.player.y = rect.bottom();
                self.velocity_y = 0.0;
            }
        }

        // Phase 7: clamp to the level's horizontal bounds.
        self.player.x = self.player.x.clamp(0.0, VIEW_WIDTH - self.player.width);

        // Phase 8: enemy contacts. Reverse iteration keeps removal safe, and
        // later stomps still register in the same frame even after a fatal
        // contact set the flag (the caller observes it next frame).
        for i in (0..self.enemies.len()).rev() {
            let rect = self.enemies[i].bounds();
            if !self.player_touches(&rect) {
                continue;
            }
            let stomp = self.velocity_y > 0.0
                && self.player.y + self.player.height < rect.center_y();
            if stomp {
                self.enemies.remove(i);
                self.score += 100;
                self.velocity_y = -JUMP_IMPULSE / 2.0;
            } else {
                self.game_over = true;
            }
        }

        // Phase 9: boss contact. The stomp window is tighter than for
        // enemies: the pre-motion bottom edge must clear the boss's top.
        if let Some(boss) = self.boss.as_mut() {
            let rect = boss.bounds();
            if self.player.bounds().overlaps(&rect) {
                let previous_bottom = self.player.y + self.player.height - self.velocity_y;
                if self.velocity_y > 0.0 && previous_bottom <= rect.y {
                    boss.health -= super::boss::STOMP_DAMAGE;
                    self.score += boss.stomp_score();
                    self.velocity_y = -JUMP_IMPULSE;
                    if boss.health <= 0 {
                        self.game_won = true;
                    }
                } else if self.player.y + self.player.height > rect.y + rect.height / 4.0 {
                    self.game_over = true;
                }
            }
        }

        // Phase 10: projectile contact is always fatal.
        for i in (0..self.projectiles.len()).rev() {
            let rect = self.projectiles[i].bounds();
            if self.player_touches(&rect) {
                self.game_over = true;
                self.projectiles.remove(i);
            }
        }

        // Phase 11: camera follows upward only; falling far below it is
        // fatal.
        if self.player.y < self.camera_y + VIEW_HEIGHT / CAMERA_FRACTION {
            self.camera_y = self.player.y - VIEW_HEIGHT / CAMERA_FRACTION;
        }
        if self.player.y > self.camera_y + VIEW_HEIGHT + FALL_MARGIN {
            self.game_over = true;
        }

        self.elapsed += 1.0 / 60.0;
    }

    fn player_touches(&self, rect: &Aabb) -> bool {
        self.player.bounds().overlaps(rect)
    }

    /// Push the player out of a solid along x, by the sign of the movement
    /// applied this frame. Zero movement leaves an overlap untouched.
    fn push_out_x(player: &mut Player, solid: &Aabb, dx: f32) {
        if player.bounds().overlaps(solid) {
            if dx > 0.0 {
                player.x = solid.x - player.width;
            } else if dx < 0.0 {
                player.x = solid.right();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{BossRecord, EnemyRecord, LevelData, PlatformRecord, TurretRecord};
    use crate::sim::{BossKind, EnemyKind, Facing, PlatformKind, ProjectileKind, BREAK_DELAY_FRAMES};

    const NO_INPUT: InputFrame = InputFrame { left: false, right: false, jump: false };
    const RIGHT: InputFrame = InputFrame { left: false, right: true, jump: false };

    fn platform(x: f32, elevation: f32, width: f32, kind: PlatformKind) -> PlatformRecord {
        PlatformRecord { x, elevation, width, height: 20.0, kind }
    }

    fn empty_level() -> LevelData {
        LevelData::default()
    }

    #[test]
    fn test_no_input_player_lands_on_ground() {
        let mut ctx = SimContext::from_level(&empty_level(), 1);
        for _ in 0..200 {
            ctx.step(&NO_INPUT);
        }
        assert!(ctx.grounded);
        assert_eq!(ctx.velocity_y, 0.0);
        assert_eq!(ctx.player.y, GROUND_Y - PLAYER_SIZE);
    }

    #[test]
    fn test_player_size_and_bounds_invariant() {
        let mut ctx = SimContext::from_level(&empty_level(), 1);
        for _ in 0..300 {
            ctx.step(&RIGHT);
            assert_eq!(ctx.player.width, PLAYER_SIZE);
            assert_eq!(ctx.player.height, PLAYER_SIZE);
            assert!(ctx.player.x >= 0.0);
            assert!(ctx.player.x <= VIEW_WIDTH - PLAYER_SIZE);
        }
        assert_eq!(ctx.player.x, VIEW_WIDTH - PLAYER_SIZE);
    }

    #[test]
    fn test_jump_requires_ground() {
        let mut ctx = SimContext::from_level(&empty_level(), 1);
        for _ in 0..10 {
            ctx.step(&NO_INPUT);
        }
        assert!(ctx.grounded);
        let jump = InputFrame { jump: true, ..NO_INPUT };
        ctx.step(&jump);
        assert!(ctx.velocity_y < 0.0);
        assert!(!ctx.grounded);
        // Holding jump in the air does not re-fire the impulse.
        let vy = ctx.velocity_y;
        ctx.step(&jump);
        assert_eq!(ctx.velocity_y, vy + GRAVITY);
    }

    #[test]
    fn test_stomp_removes_enemy_and_bounces() {
        let mut ctx = SimContext::from_level(&empty_level(), 1);
        ctx.enemies.push(Enemy::new(400.0, 400.0, EnemyKind::Standard, None));
        ctx.player.x = 400.0;
        ctx.player.y = 340.0;
        ctx.velocity_y = 4.0;
        ctx.grounded = false;
        let mut stomped = false;
        for _ in 0..10 {
            ctx.step(&NO_INPUT);
            if ctx.enemies.is_empty() {
                stomped = true;
                break;
            }
        }
        assert!(stomped);
        assert_eq!(ctx.score, 100);
        assert_eq!(ctx.velocity_y, -JUMP_IMPULSE / 2.0);
        assert!(!ctx.game_over);
    }

    #[test]
    fn test_side_contact_with_enemy_is_fatal() {
        let mut ctx = SimContext::from_level(&empty_level(), 1);
        // Enemy resting exactly at player height on the ground.
        ctx.enemies.push(Enemy::new(440.0, GROUND_Y - 40.0, EnemyKind::Standard, None));
        for _ in 0..60 {
            ctx.step(&RIGHT);
            if ctx.game_over {
                break;
            }
        }
        assert!(ctx.game_over);
        assert_eq!(ctx.enemies.len(), 1);
        assert_eq!(ctx.score, 0);
    }

    #[test]
    fn test_breakable_platform_removed_after_delay() {
        let level = LevelData {
            platforms: vec![platform(360.0, 100.0, 100.0, PlatformKind::Breakable)],
            ..Default::default()
        };
        let mut ctx = SimContext::from_level(&level, 1);
        // Stand the player on the breakable platform (top at GROUND_Y - 100).
        ctx.player.x = 380.0;
        ctx.player.y = GROUND_Y - 100.0 - PLAYER_SIZE;
        ctx.step(&NO_INPUT);
        assert!(ctx.grounded);
        assert_eq!(ctx.platforms.len(), 2);

        // Not removed a frame early.
        for _ in 0..BREAK_DELAY_FRAMES - 1 {
            ctx.step(&NO_INPUT);
        }
        assert_eq!(ctx.platforms.len(), 2);
        ctx.step(&NO_INPUT);
        assert_eq!(ctx.platforms.len(), 1);
    }

    #[test]
    fn test_level_reload_discards_pending_break() {
        let level = LevelData {
            platforms: vec![platform(360.0, 100.0, 100.0, PlatformKind::Breakable)],
            ..Default::default()
        };
        let mut ctx = SimContext::from_level(&level, 1);
        ctx.player.x = 380.0;
        ctx.player.y = GROUND_Y - 100.0 - PLAYER_SIZE;
        ctx.step(&NO_INPUT);
        assert!(ctx.platforms.iter().any(|p| p.break_timer.is_some()));

        // Reload before the countdown fires: the new level keeps all its
        // platforms no matter how long we run it without contact.
        let mut fresh = SimContext::from_level(&level, 1);
        for _ in 0..BREAK_DELAY_FRAMES * 3 {
            fresh.step(&NO_INPUT);
        }
        assert_eq!(fresh.platforms.len(), 2);
    }

    #[test]
    fn test_win_platform_sets_flag() {
        let level = LevelData {
            platforms: vec![platform(360.0, 100.0, 100.0, PlatformKind::Win)],
            ..Default::default()
        };
        let mut ctx = SimContext::from_level(&level, 1);
        ctx.player.x = 380.0;
        ctx.player.y = GROUND_Y - 100.0 - PLAYER_SIZE - 10.0;
        ctx.velocity_y = 2.0;
        for _ in 0..20 {
            ctx.step(&NO_INPUT);
        }
        assert!(ctx.game_won);
        assert_eq!(ctx.score, 0);
    }

    #[test]
    fn test_wall_blocks_horizontal_movement() {
        let level = LevelData {
            platforms: vec![PlatformRecord {
                x: 500.0,
                elevation: 40.0,
                width: 60.0,
                height: 40.0,
                kind: PlatformKind::Wall,
            }],
            ..Default::default()
        };
        let mut ctx = SimContext::from_level(&level, 1);
        for _ in 0..120 {
            ctx.step(&RIGHT);
        }
        assert_eq!(ctx.player.x, 500.0 - PLAYER_SIZE);
    }

    #[test]
    fn test_moving_platform_carries_player() {
        let level = LevelData {
            platforms: vec![platform(300.0, 100.0, 100.0, PlatformKind::Moving)],
            ..Default::default()
        };
        let mut ctx = SimContext::from_level(&level, 1);
        ctx.player.x = 320.0;
        ctx.player.y = GROUND_Y - 100.0 - PLAYER_SIZE;
        let before = ctx.player.x;
        ctx.step(&NO_INPUT);
        assert!(ctx.grounded);
        assert_ne!(ctx.player.x, before);
    }

    #[test]
    fn test_camera_follows_upward_only() {
        let mut ctx = SimContext::from_level(&empty_level(), 1);
        ctx.player.y = 100.0;
        ctx.step(&NO_INPUT);
        let high_camera = ctx.camera_y;
        assert!((high_camera - (ctx.player.y - VIEW_HEIGHT / CAMERA_FRACTION)).abs() < 1.0);

        // Dropping back down must not move the camera.
        ctx.player.y = 400.0;
        ctx.velocity_y = 0.0;
        ctx.step(&NO_INPUT);
        assert_eq!(ctx.camera_y, high_camera);
    }

    #[test]
    fn test_falling_below_camera_is_fatal() {
        let mut ctx = SimContext::from_level(&empty_level(), 1);
        ctx.camera_y = -2000.0;
        ctx.step(&NO_INPUT);
        assert!(ctx.game_over);
    }

    #[test]
    fn test_projectile_hit_is_fatal_and_consumes_projectile() {
        let mut ctx = SimContext::from_level(&empty_level(), 1);
        ctx.projectiles.push(Projectile::new(
            ctx.player.x,
            ctx.player.y,
            0.0,
            0.0,
            ProjectileKind::TurretShot,
        ));
        ctx.step(&NO_INPUT);
        assert!(ctx.game_over);
        assert!(ctx.projectiles.is_empty());
    }

    #[test]
    fn test_offscreen_projectiles_are_pruned() {
        let mut ctx = SimContext::from_level(&empty_level(), 1);
        ctx.projectiles.push(Projectile::new(
            -PRUNE_MARGIN - 100.0,
            300.0,
            0.0,
            0.0,
            ProjectileKind::TurretShot,
        ));
        ctx.step(&NO_INPUT);
        assert!(ctx.projectiles.is_empty());
        assert!(!ctx.game_over);
    }

    #[test]
    fn test_turret_spawns_are_hooked_into_step() {
        let level = LevelData {
            turrets: vec![TurretRecord { x: 0.0, elevation: 300.0, facing: Facing::Right }],
            ..Default::default()
        };
        let mut ctx = SimContext::from_level(&level, 1);
        for _ in 0..crate::sim::TURRET_COOLDOWN {
            ctx.step(&NO_INPUT);
        }
        assert_eq!(ctx.projectiles.len(), 1);
    }

    #[test]
    fn test_patrolling_enemy_positioned_relative_to_platform() {
        let level = LevelData {
            platforms: vec![platform(500.0, 400.0, 100.0, PlatformKind::Standard)],
            enemies: vec![EnemyRecord {
                x: 500.0,
                elevation: 32.0,
                kind: EnemyKind::Patrolling,
                platform_x: Some(500.0),
                platform_elevation: Some(400.0),
            }],
            ..Default::default()
        };
        let ctx = SimContext::from_level(&level, 1);
        let platform_top = GROUND_Y - 400.0;
        assert_eq!(ctx.enemies[0].y, platform_top - 32.0);
        assert!(ctx.enemies[0].patrol.is_some());
    }

    #[test]
    fn test_dangling_patrol_key_degrades_to_unbound() {
        let level = LevelData {
            enemies: vec![EnemyRecord {
                x: 500.0,
                elevation: 32.0,
                kind: EnemyKind::Patrolling,
                platform_x: Some(999.0),
                platform_elevation: Some(999.0),
            }],
            ..Default::default()
        };
        let ctx = SimContext::from_level(&level, 1);
        assert!(ctx.enemies[0].patrol.is_none());
        assert_eq!(ctx.enemies[0].y, GROUND_Y - 32.0);
    }

    #[test]
    fn test_boss_fight_ten_stomps_win() {
        let level = LevelData {
            boss: Some(BossRecord {
                x: 650.0,
                elevation: 180.0,
                width: 100.0,
                height: 100.0,
                health: 500,
                kind: BossKind::Warden,
            }),
            ..Default::default()
        };
        let mut ctx = SimContext::from_level(&level, 1);
        // Let the boss settle on the floor. Kept short so every stomp below
        // lands inside the boss's first attack cooldown.
        for _ in 0..40 {
            ctx.step(&NO_INPUT);
        }
        for hit in 1..=10 {
            let (bx, by) = {
                let b = ctx.boss.as_ref().unwrap();
                (b.x, b.y)
            };
            // Drop the player squarely onto the boss's top edge.
            ctx.player.x = bx + 30.0;
            ctx.player.y = by - PLAYER_SIZE - 1.0;
            ctx.velocity_y = 2.0;
            ctx.grounded = false;
            ctx.step(&NO_INPUT);
            let b = ctx.boss.as_ref().unwrap();
            assert_eq!(b.health, 500 - 50 * hit, "stomp {} did not land", hit);
        }
        assert!(ctx.game_won);
        assert_eq!(ctx.boss.as_ref().unwrap().health, 0);
        assert_eq!(ctx.score, 500 * 10);
    }

    #[test]
    fn test_boss_body_contact_is_fatal() {
        let level = LevelData {
            boss: Some(BossRecord {
                x: 650.0,
                elevation: 180.0,
                width: 100.0,
                height: 100.0,
                health: 500,
                kind: BossKind::Warden,
            }),
            ..Default::default()
        };
        let mut ctx = SimContext::from_level(&level, 1);
        for _ in 0..40 {
            ctx.step(&NO_INPUT);
        }
        let (bx, by, bh) = {
            let b = ctx.boss.as_ref().unwrap();
            (b.x, b.y, b.height)
        };
        // Overlap the boss's lower half at ground level.
        ctx.player.x = bx + 30.0;
        ctx.player.y = by + bh - PLAYER_SIZE;
        ctx.velocity_y = 0.0;
        ctx.grounded = true;
        ctx.step(&NO_INPUT);
        assert!(ctx.game_over);
    }
}
