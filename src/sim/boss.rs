//! Boss encounters
//!
//! One struct drives both encounters; `BossKind` selects the points where the
//! second boss diverges (double jump, player-aimed dash with a two-wall-hit
//! cutoff, triple shot, wide shockwaves). This replaces the base-class /
//! override split of the original design with a tagged variant.
//!
//! State machine: idle -> cooldown -> warning(attack) -> executing(attack)
//! -> idle. The warning phase is a pure telegraph: a visual overlay cue, no
//! attack logic. Attack selection draws from an injected seedable RNG so
//! encounters can be replayed deterministically in tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::{Aabb, Bounds, Player, Projectile, ProjectileKind, GRAVITY, GROUND_Y, JUMP_IMPULSE, VIEW_WIDTH};

pub const ATTACK_COOLDOWN: u32 = 180;
pub const ATTACK_DURATION: i32 = 120;
pub const WARNING_DURATION: u32 = 60;
pub const BOSS_SPEED: f32 = 1.0;
pub const DASH_SPEED: f32 = 10.0;
pub const BOSS_SHOT_SPEED: f32 = 5.0;
/// Angular spread of the Tyrant's triple shot, radians.
pub const TRIPLE_SHOT_SPREAD: f32 = 0.3;
/// Health removed per qualifying player stomp.
pub const STOMP_DAMAGE: i32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BossKind {
    /// First encounter: single aimed shot, fixed-direction dash, plain
    /// ground-pound projectiles.
    Warden,
    /// Second encounter: double jump, aimed dash ending after two wall hits,
    /// triple shot, wide shockwaves.
    Tyrant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attack {
    None,
    Jump,
    Shoot,
    Dash,
    GroundPound,
}

/// Telegraph overlay shown during the warning phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayColor {
    Black,
    White,
    Orange,
    Cyan,
}

#[derive(Debug)]
pub struct Boss {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: BossKind,
    pub health: i32,
    pub max_health: i32,
    pub direction: f32,
    pub speed: f32,
    pub velocity_y: f32,
    /// Vertical velocity before this frame's ground snap; the ground-pound
    /// landing check needs the pre-snap value.
    prev_velocity_y: f32,
    pub grounded: bool,
    pub attack: Attack,
    cooldown_timer: u32,
    attack_duration_timer: i32,
    pub warning: bool,
    warning_timer: u32,
    pub overlay: Option<OverlayColor>,
    pub dashing: bool,
    ground_pounding: bool,
    jump_count: u32,
    dash_wall_hits: u32,
    pub anim_frame: u32,
    frame_counter: u32,
    rng: StdRng,
}

impl Boss {
    pub fn new(x: f32, y: f32, width: f32, height: f32, health: i32, kind: BossKind, seed: u64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            kind,
            health,
            max_health: health,
            direction: 1.0,
            speed: BOSS_SPEED,
            velocity_y: 0.0,
            prev_velocity_y: 0.0,
            grounded: false,
            attack: Attack::None,
            cooldown_timer: 0,
            attack_duration_timer: 0,
            warning: false,
            warning_timer: 0,
            overlay: None,
            dashing: false,
            ground_pounding: false,
            jump_count: 0,
            dash_wall_hits: 0,
            anim_frame: 0,
            frame_counter: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Score awarded to the player per qualifying stomp.
    pub fn stomp_score(&self) -> u32 {
        match self.kind {
            BossKind::Warden => 500,
            BossKind::Tyrant => 1000,
        }
    }

    pub fn update(&mut self, player: &Player, projectiles: &mut Vec<Projectile>) {
        self.prev_velocity_y = self.velocity_y;
        self.tick_animation();

        // Edge-bounded patrol, suspended while dashing.
        if !self.dashing {
            self.x += self.speed * self.direction;
            if self.x + self.width >= VIEW_WIDTH {
                self.direction = -1.0;
                self.x = VIEW_WIDTH - self.width;
            } else if self.x <= 0.0 {
                self.direction = 1.0;
                self.x = 0.0;
            }
        }

        // Gravity and ground collision against the fixed floor.
        self.velocity_y += GRAVITY;
        self.y += self.velocity_y;
        if self.y + self.height > GROUND_Y {
            self.y = GROUND_Y - self.height;
            self.velocity_y = 0.0;
            let just_landed = !self.grounded;
            // Tyrant only: a landing mid jump-attack either relaunches
            // (one extra mid-air jump) or ends the attack.
            if self.kind == BossKind::Tyrant && just_landed && self.attack == Attack::Jump {
                if self.jump_count < 2 {
                    self.velocity_y = -JUMP_IMPULSE * 1.5;
                    self.jump_count += 1;
                } else {
                    self.attack = Attack::None;
                }
            }
            self.grounded = true;
        } else {
            self.grounded = false;
        }

        self.cooldown_timer += 1;

        if self.warning {
            self.warning_timer += 1;
            self.overlay = match self.attack {
                // Jump and ground pound flash on a 10-frame cadence.
                Attack::Jump => {
                    (self.warning_timer % 20 >= 10).then_some(OverlayColor::Black)
                }
                Attack::GroundPound => {
                    (self.warning_timer % 20 >= 10).then_some(OverlayColor::White)
                }
                Attack::Shoot => Some(OverlayColor::Orange),
                Attack::Dash => Some(OverlayColor::Cyan),
                Attack::None => None,
            };

            if self.warning_timer >= WARNING_DURATION {
                self.warning = false;
                self.warning_timer = 0;
                self.overlay = None;
                self.attack_duration_timer = ATTACK_DURATION;

                // Shoot resolves entirely at the warning's end: spawn the
                // aimed shot(s) and return to idle immediately.
                if self.attack == Attack::Shoot {
                    self.shoot_at(player, projectiles);
                    self.attack = Attack::None;
                }
            }
        } else if self.cooldown_timer >= ATTACK_COOLDOWN && self.attack == Attack::None {
            self.cooldown_timer = 0;
            self.attack = self.pick_attack();
            self.warning = true;
            self.warning_timer = 0;
            if self.kind == BossKind::Tyrant {
                self.jump_count = 0;
                self.dash_wall_hits = 0;
            }
        }

        if !self.warning {
            self.execute_attack(player, projectiles);
        }
    }

    fn pick_attack(&mut self) -> Attack {
        match self.rng.gen_range(0..4) {
            0 => Attack::Jump,
            1 => Attack::Shoot,
            2 => Attack::Dash,
            _ => Attack::GroundPound,
        }
    }

    fn execute_attack(&mut self, player: &Player, projectiles: &mut Vec<Projectile>) {
        match self.attack {
            Attack::Jump => {
                if self.attack_duration_timer == ATTACK_DURATION && self.grounded {
                    self.velocity_y = -JUMP_IMPULSE * 1.5;
                    if self.kind == BossKind::Tyrant {
                        self.jump_count = 1;
                    }
                }
                self.attack_duration_timer -= 1;
                if self.attack_duration_timer <= 0 {
                    self.attack = Attack::None;
                }
            }
            Attack::GroundPound => {
                if self.attack_duration_timer == ATTACK_DURATION && self.grounded {
                    self.velocity_y = -JUMP_IMPULSE * 2.0;
                    self.ground_pounding = true;
                }

                // Landing is detected by the pre-snap velocity: the snap has
                // already zeroed velocity_y by the time we get here.
                if self.ground_pounding && self.prev_velocity_y > 0.0 && self.grounded {
                    let cx = self.x + self.width / 2.0;
                    let foot = self.y + self.height;
                    match self.kind {
                        BossKind::Warden => {
                            projectiles.push(Projectile::new(
                                cx, foot, -5.0, 0.0, ProjectileKind::Shockwave,
                            ));
                            projectiles.push(Projectile::new(
                                cx, foot, 5.0, 0.0, ProjectileKind::Shockwave,
                            ));
                        }
                        BossKind::Tyrant => {
                            projectiles.push(Projectile::shockwave(cx, foot - 10.0, -5.0));
                            projectiles.push(Projectile::shockwave(cx, foot - 10.0, 5.0));
                        }
                    }
                    self.ground_pounding = false;
                    self.attack = Attack::None;
                }

                self.attack_duration_timer -= 1;
                if self.attack_duration_timer <= 0 {
                    self.attack = Attack::None;
                    self.ground_pounding = false;
                }
            }
            Attack::Dash => {
                if self.attack_duration_timer == ATTACK_DURATION {
                    self.dashing = true;
                    if self.kind == BossKind::Tyrant {
                        // Aim the dash at the player's current side.
                        self.direction = if player.x > self.x { 1.0 } else { -1.0 };
                    }
                }

                if self.dashing {
                    self.x += DASH_SPEED * self.direction;
                    match self.kind {
                        BossKind::Warden => {
                            // Warden stops dashing at a wall; the attack
                            // itself runs out its duration.
                            if self.x + self.width > VIEW_WIDTH {
                                self.x = VIEW_WIDTH - self.width;
                                self.dashing = false;
                            } else if self.x < 0.0 {
                                self.x = 0.0;
                                self.dashing = false;
                            }
                        }
                        BossKind::Tyrant => {
                            let mut wall_hit = false;
                            if self.x + self.width >= VIEW_WIDTH {
                                self.direction = -1.0;
                                self.x = VIEW_WIDTH - self.width;
                                wall_hit = true;
                            } else if self.x < 0.0 {
                                self.direction = 1.0;
                                self.x = 0.0;
                                wall_hit = true;
                            }
                            if wall_hit {
                                self.dash_wall_hits += 1;
                                if self.dash_wall_hits >= 2 {
                                    self.dashing = false;
                                    self.attack = Attack::None;
                                    return;
                                }
                            }
                        }
                    }
                }

                self.attack_duration_timer -= 1;
                // The Tyrant's dash ends only on its second wall contact;
                // every other execution is capped by the duration timer.
                if self.attack_duration_timer <= 0 && self.kind == BossKind::Warden {
                    self.attack = Attack::None;
                    self.dashing = false;
                }
            }
            Attack::Shoot | Attack::None => {}
        }
    }

    /// Spawn the aimed shot(s) from the boss center toward the player center:
    /// one for the Warden, three at a fixed angular spread for the Tyrant.
    fn shoot_at(&mut self, player: &Player, projectiles: &mut Vec<Projectile>) {
        let origin = self.bounds();
        let target = player.bounds();
        let cx = origin.center_x();
        let cy = origin.center_y();
        let angle = (target.center_y() - cy).atan2(target.center_x() - cx);

        let angles: &[f32] = match self.kind {
            BossKind::Warden => &[0.0],
            BossKind::Tyrant => &[0.0, -TRIPLE_SHOT_SPREAD, TRIPLE_SHOT_SPREAD],
        };
        for offset in angles {
            let a = angle + offset;
            projectiles.push(Projectile::new(
                cx - 5.0,
                cy - 5.0,
                a.cos() * BOSS_SHOT_SPEED,
                a.sin() * BOSS_SHOT_SPEED,
                ProjectileKind::BossShot,
            ));
        }
    }

    fn tick_animation(&mut self) {
        self.frame_counter += 1;
        if self.frame_counter >= 15 {
            self.frame_counter = 0;
            self.anim_frame = (self.anim_frame + 1) % 4;
        }
    }
}

impl Bounds for Boss {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::PLAYER_SIZE;

    fn grounded_boss(kind: BossKind) -> Boss {
        // Spawned resting on the floor so gravity never interferes with the
        // timer assertions.
        Boss::new(650.0, GROUND_Y - 100.0, 100.0, 100.0, 500, kind, 7)
    }

    fn far_player() -> Player {
        Player::new(100.0, GROUND_Y - PLAYER_SIZE)
    }

    /// Drive the boss into a chosen attack's first execution frame.
    fn force_attack(boss: &mut Boss, attack: Attack) {
        boss.attack = attack;
        boss.warning = false;
        boss.warning_timer = 0;
        boss.cooldown_timer = 0;
        boss.attack_duration_timer = ATTACK_DURATION;
    }

    #[test]
    fn test_warning_begins_after_cooldown() {
        let mut boss = grounded_boss(BossKind::Warden);
        let player = far_player();
        let mut shots = Vec::new();
        for _ in 0..ATTACK_COOLDOWN {
            boss.update(&player, &mut shots);
        }
        assert!(boss.warning);
        assert_ne!(boss.attack, Attack::None);
    }

    #[test]
    fn test_warning_lasts_sixty_frames() {
        let mut boss = grounded_boss(BossKind::Warden);
        let player = far_player();
        let mut shots = Vec::new();
        for _ in 0..ATTACK_COOLDOWN {
            boss.update(&player, &mut shots);
        }
        for _ in 0..WARNING_DURATION - 1 {
            boss.update(&player, &mut shots);
            assert!(boss.warning);
        }
        boss.update(&player, &mut shots);
        assert!(!boss.warning);
    }

    #[test]
    fn test_warning_overlay_set_during_telegraph() {
        let mut boss = grounded_boss(BossKind::Warden);
        let player = far_player();
        let mut shots = Vec::new();
        for _ in 0..ATTACK_COOLDOWN {
            boss.update(&player, &mut shots);
        }
        // Solid colors always show; flashing colors show half the time. Over
        // a full flash period at least one frame must carry the overlay.
        let mut saw_overlay = false;
        for _ in 0..20 {
            boss.update(&player, &mut shots);
            saw_overlay |= boss.overlay.is_some();
        }
        assert!(saw_overlay);
    }

    #[test]
    fn test_seeded_selection_is_deterministic() {
        let mut a = Boss::new(0.0, GROUND_Y - 100.0, 100.0, 100.0, 500, BossKind::Warden, 42);
        let mut b = Boss::new(0.0, GROUND_Y - 100.0, 100.0, 100.0, 500, BossKind::Warden, 42);
        assert_eq!(a.pick_attack(), b.pick_attack());
        assert_eq!(a.pick_attack(), b.pick_attack());
    }

    #[test]
    fn test_warden_shoots_single_projectile() {
        let mut boss = grounded_boss(BossKind::Warden);
        let player = far_player();
        let mut shots = Vec::new();
        boss.attack = Attack::Shoot;
        boss.warning = true;
        boss.warning_timer = WARNING_DURATION - 1;
        boss.update(&player, &mut shots);
        assert_eq!(shots.len(), 1);
        assert_eq!(boss.attack, Attack::None);
        // Aimed at the player on the left: must move leftward.
        assert!(shots[0].vx < 0.0);
    }

    #[test]
    fn test_tyrant_shoots_triple_spread() {
        let mut boss = grounded_boss(BossKind::Tyrant);
        let player = far_player();
        let mut shots = Vec::new();
        boss.attack = Attack::Shoot;
        boss.warning = true;
        boss.warning_timer = WARNING_DURATION - 1;
        boss.update(&player, &mut shots);
        assert_eq!(shots.len(), 3);
        // All three at the same speed, different headings.
        for s in &shots {
            let speed = (s.vx * s.vx + s.vy * s.vy).sqrt();
            assert!((speed - BOSS_SHOT_SPEED).abs() < 0.001);
        }
        assert!(shots[1].vy != shots[2].vy);
    }

    #[test]
    fn test_tyrant_dash_ends_after_two_wall_hits() {
        let mut boss = grounded_boss(BossKind::Tyrant);
        let player = far_player();
        let mut shots = Vec::new();
        force_attack(&mut boss, Attack::Dash);
        let mut frames = 0;
        while boss.attack == Attack::Dash && frames < 1000 {
            boss.update(&player, &mut shots);
            frames += 1;
        }
        assert_eq!(boss.attack, Attack::None);
        assert_eq!(boss.dash_wall_hits, 2);
        assert!(!boss.dashing);
    }

    #[test]
    fn test_warden_dash_stops_at_wall_but_attack_runs_out() {
        let mut boss = grounded_boss(BossKind::Warden);
        let player = far_player();
        let mut shots = Vec::new();
        force_attack(&mut boss, Attack::Dash);
        boss.direction = 1.0;
        // Reach the right wall well before the duration cap.
        for _ in 0..30 {
            boss.update(&player, &mut shots);
        }
        assert!(!boss.dashing);
        assert_eq!(boss.attack, Attack::Dash);
        for _ in 0..ATTACK_DURATION as u32 {
            boss.update(&player, &mut shots);
        }
        assert_eq!(boss.attack, Attack::None);
    }

    #[test]
    fn test_tyrant_double_jump() {
        let mut boss = grounded_boss(BossKind::Tyrant);
        let player = far_player();
        let mut shots = Vec::new();
        force_attack(&mut boss, Attack::Jump);
        for _ in 0..400 {
            boss.update(&player, &mut shots);
            if boss.attack == Attack::None && boss.grounded {
                break;
            }
        }
        assert_eq!(boss.jump_count, 2);
    }

    #[test]
    fn test_ground_pound_spawns_shockwave_pair_on_landing() {
        for kind in [BossKind::Warden, BossKind::Tyrant] {
            let mut boss = grounded_boss(kind);
            let player = far_player();
            let mut shots = Vec::new();
            force_attack(&mut boss, Attack::GroundPound);
            for _ in 0..ATTACK_DURATION as u32 {
                boss.update(&player, &mut shots);
                if !shots.is_empty() {
                    break;
                }
            }
            assert_eq!(shots.len(), 2, "kind {:?}", kind);
            assert_eq!(shots[0].vx, -shots[1].vx);
            assert_eq!(boss.attack, Attack::None);
        }
    }

    #[test]
    fn test_attack_duration_is_a_hard_cap() {
        let mut boss = grounded_boss(BossKind::Warden);
        let player = far_player();
        let mut shots = Vec::new();
        force_attack(&mut boss, Attack::Jump);
        for _ in 0..=ATTACK_DURATION as u32 {
            boss.update(&player, &mut shots);
        }
        assert_eq!(boss.attack, Attack::None);
    }

    #[test]
    fn test_boss_rests_on_floor() {
        let mut boss = Boss::new(650.0, 180.0, 100.0, 100.0, 500, BossKind::Warden, 3);
        let player = far_player();
        let mut shots = Vec::new();
        for _ in 0..600 {
            boss.update(&player, &mut shots);
        }
        assert!((boss.y + boss.height - GROUND_Y).abs() < 0.001);
    }
}
