//! Drawing
//!
//! Flat-colored rectangles, camera applied as a plain y offset. Screen
//! layout constants live here and double as the hit rectangles `app.rs`
//! tests clicks against.

use macroquad::prelude::*;

use crate::editor::{EditorState, Handle, Selection, Tool, GRID, HANDLE_SIZE};
use crate::sim::{
    Boss, Enemy, EnemyKind, Facing, OverlayColor, Platform, PlatformKind, Player, PlayerPose,
    Projectile, ProjectileKind, SimContext, Turret, VIEW_HEIGHT, VIEW_WIDTH,
};

const TURRET_COLOR: Color = Color::new(0.55, 0.0, 0.0, 1.0);
const CYAN: Color = Color::new(0.0, 1.0, 1.0, 1.0);

/// A clickable screen rectangle.
#[derive(Debug, Clone, Copy)]
pub struct ButtonRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ButtonRect {
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }
}

// Menu layout: levels plus the editor and time-attack entries, four per row.
pub const MENU_ITEMS_PER_ROW: usize = 4;
pub const MENU_BUTTON_WIDTH: f32 = 150.0;
pub const MENU_BUTTON_HEIGHT: f32 = 60.0;
pub const MENU_GAP: f32 = 20.0;
pub const MENU_START_Y: f32 = 200.0;

pub fn menu_button(index: usize) -> ButtonRect {
    let row = (index / MENU_ITEMS_PER_ROW) as f32;
    let col = (index % MENU_ITEMS_PER_ROW) as f32;
    let row_width = MENU_ITEMS_PER_ROW as f32 * MENU_BUTTON_WIDTH
        + (MENU_ITEMS_PER_ROW as f32 - 1.0) * MENU_GAP;
    let start_x = (VIEW_WIDTH - row_width) / 2.0;
    ButtonRect {
        x: start_x + col * (MENU_BUTTON_WIDTH + MENU_GAP),
        y: MENU_START_Y + row * (MENU_BUTTON_HEIGHT + MENU_GAP),
        width: MENU_BUTTON_WIDTH,
        height: MENU_BUTTON_HEIGHT,
    }
}

/// In-game "Back to Menu" / "Back to Editor" button.
pub const BACK_BUTTON: ButtonRect =
    ButtonRect { x: VIEW_WIDTH - 160.0, y: 50.0, width: 150.0, height: 40.0 };

/// Primary button on the end screens (try again / continue).
pub const END_PRIMARY_BUTTON: ButtonRect = ButtonRect {
    x: VIEW_WIDTH / 2.0 - 100.0,
    y: VIEW_HEIGHT / 2.0 + 80.0,
    width: 200.0,
    height: 40.0,
};

/// Secondary button on the end screens (back to menu / editor).
pub const END_SECONDARY_BUTTON: ButtonRect = ButtonRect {
    x: VIEW_WIDTH / 2.0 - 100.0,
    y: VIEW_HEIGHT / 2.0 + 130.0,
    width: 200.0,
    height: 40.0,
};

/// "Back to Menu" on the time-attack completion screen.
pub const END_FINAL_BUTTON: ButtonRect = ButtonRect {
    x: VIEW_WIDTH / 2.0 - 100.0,
    y: VIEW_HEIGHT / 2.0 + 180.0,
    width: 200.0,
    height: 40.0,
};

fn platform_color(kind: PlatformKind) -> Color {
    match kind {
        PlatformKind::Standard => GREEN,
        PlatformKind::Moving => BLUE,
        PlatformKind::Breakable => RED,
        PlatformKind::Win => GOLD,
        PlatformKind::Wall => GRAY,
    }
}

fn enemy_color(kind: EnemyKind) -> Color {
    match kind {
        EnemyKind::Patrolling => ORANGE,
        EnemyKind::Standard | EnemyKind::Jumping => PURPLE,
    }
}

fn projectile_color(kind: ProjectileKind) -> Color {
    match kind {
        ProjectileKind::TurretShot | ProjectileKind::BossShot => RED,
        ProjectileKind::Shockwave => ORANGE,
    }
}

fn overlay_color(overlay: OverlayColor) -> Color {
    match overlay {
        OverlayColor::Black => BLACK,
        OverlayColor::White => WHITE,
        OverlayColor::Orange => ORANGE,
        OverlayColor::Cyan => CYAN,
    }
}

fn draw_player(p: &Player, camera_y: f32) {
    let y = p.y - camera_y;
    draw_rectangle(p.x, y, p.width, p.height, WHITE);
    // Feet shuffle while moving; the standing pose just blinks them.
    let stride = match p.pose {
        PlayerPose::Standing => 0.0,
        PlayerPose::MovingLeft | PlayerPose::MovingRight => (p.anim_frame % 2) as f32 * 6.0,
    };
    draw_rectangle(p.x + 4.0 + stride, y + p.height - 6.0, 10.0, 6.0, BLACK);
    draw_rectangle(p.x + p.width - 14.0 - stride, y + p.height - 6.0, 10.0, 6.0, BLACK);
}

fn draw_platform(p: &Platform, camera_y: f32) {
    draw_rectangle(p.x, p.y - camera_y, p.width, p.height, platform_color(p.kind));
}

fn draw_enemy(e: &Enemy, camera_y: f32) {
    draw_rectangle(e.x, e.y - camera_y, e.width, e.height, enemy_color(e.kind));
}

fn draw_projectile(p: &Projectile, camera_y: f32) {
    draw_rectangle(p.x, p.y - camera_y, p.width, p.height, projectile_color(p.kind));
}

fn draw_turret(t: &Turret, camera_y: f32) {
    let y = t.y - camera_y;
    draw_rectangle(t.x, y, t.width, t.height, TURRET_COLOR);
    // Muzzle marker on the firing edge.
    match t.facing {
        Facing::Left => draw_rectangle(t.x, y + t.height / 2.0 - 2.0, 10.0, 4.0, BLACK),
        Facing::Right => {
            draw_rectangle(t.x + t.width - 10.0, y + t.height / 2.0 - 2.0, 10.0, 4.0, BLACK)
        }
        Facing::Up => draw_rectangle(t.x + t.width / 2.0 - 2.0, y, 4.0, 10.0, BLACK),
        Facing::Down => {
            draw_rectangle(t.x + t.width / 2.0 - 2.0, y + t.height - 10.0, 4.0, 10.0, BLACK)
        }
    }
}

fn draw_boss(b: &Boss, camera_y: f32) {
    let y = b.y - camera_y;
    draw_rectangle(b.x, y, b.width, b.height, PURPLE);
    if let Some(overlay) = b.overlay {
        let mut color = overlay_color(overlay);
        color.a = 0.5;
        draw_rectangle(b.x, y, b.width, b.height, color);
    }
    // Health bar above the body.
    draw_rectangle(b.x, y - 15.0, b.width, 10.0, RED);
    let fraction = (b.health.max(0) as f32) / (b.max_health as f32);
    draw_rectangle(b.x, y - 15.0, b.width * fraction, 10.0, GREEN);
}

/// Draw one simulation frame plus the HUD.
pub fn draw_game(ctx: &SimContext, testing_level: bool, time_attack: bool, total_time: f64) {
    clear_background(DARKGRAY);
    let cam = ctx.camera_y;

    for p in &ctx.platforms {
        draw_platform(p, cam);
    }
    for t in &ctx.turrets {
        draw_turret(t, cam);
    }
    for e in &ctx.enemies {
        draw_enemy(e, cam);
    }
    if let Some(b) = &ctx.boss {
        draw_boss(b, cam);
    }
    for p in &ctx.projectiles {
        draw_projectile(p, cam);
    }
    draw_player(&ctx.player, cam);

    draw_text(&format!("Score: {}", ctx.score), 10.0, 30.0, 24.0, WHITE);
    if time_attack {
        draw_text(&format_time(total_time), 10.0, 80.0, 24.0, WHITE);
    }

    let label = if testing_level { "Back to Editor" } else { "Back to Menu" };
    draw_button(BACK_BUTTON, label);
}

pub fn format_time(total: f64) -> String {
    let minutes = (total / 60.0).floor() as u64;
    let seconds = total % 60.0;
    format!("Time: {:02}:{:05.2}", minutes, seconds)
}

fn draw_button(rect: ButtonRect, label: &str) {
    draw_rectangle(rect.x, rect.y, rect.width, rect.height, GRAY);
    let size = 20.0;
    let dims = measure_text(label, None, size as u16, 1.0);
    draw_text(
        label,
        rect.x + (rect.width - dims.width) / 2.0,
        rect.y + rect.height / 2.0 + size / 3.0,
        size,
        WHITE,
    );
}

fn draw_centered(text: &str, y: f32, size: f32) {
    let dims = measure_text(text, None, size as u16, 1.0);
    draw_text(text, (VIEW_WIDTH - dims.width) / 2.0, y, size, WHITE);
}

/// Level select screen. `labels` pairs with `menu_button(i)`.
pub fn draw_menu(labels: &[String]) {
    clear_background(BLACK);
    draw_centered("Dungeon Jumper", 100.0, 48.0);
    draw_centered("Level Select", 150.0, 24.0);
    for (i, label) in labels.iter().enumerate() {
        draw_button(menu_button(i), label);
    }
}

pub fn draw_game_over(score: u32, testing_level: bool) {
    clear_background(BLACK);
    draw_centered("Game Over", VIEW_HEIGHT / 2.0, 48.0);
    draw_centered(&format!("Score: {}", score), VIEW_HEIGHT / 2.0 + 50.0, 24.0);
    draw_button(END_PRIMARY_BUTTON, "Try Again");
    draw_button(END_SECONDARY_BUTTON, if testing_level { "Back to Editor" } else { "Back to Menu" });
}

pub fn draw_level_complete(score: u32, testing_level: bool) {
    clear_background(BLACK);
    draw_centered("Level Complete!", VIEW_HEIGHT / 2.0, 48.0);
    draw_centered(&format!("Score: {}", score), VIEW_HEIGHT / 2.0 + 50.0, 24.0);
    if testing_level {
        draw_button(END_PRIMARY_BUTTON, "Back to Editor");
    } else {
        draw_button(END_PRIMARY_BUTTON, "Continue");
        draw_button(END_SECONDARY_BUTTON, "Back to Menu");
    }
}

/// Shown when a time-attack run clears the last level.
pub fn draw_run_complete(total_time: f64) {
    clear_background(BLACK);
    draw_centered("Game Complete!", VIEW_HEIGHT / 2.0, 48.0);
    draw_centered(
        &format!("Total {}", format_time(total_time)),
        VIEW_HEIGHT / 2.0 + 100.0,
        24.0,
    );
    draw_button(END_FINAL_BUTTON, "Back to Menu");
}

fn draw_editor_grid(camera_y: f32) {
    let start_y = (camera_y / GRID).floor() * GRID;
    let color = Color::new(0.33, 0.33, 0.33, 1.0);
    let mut x = 0.0;
    while x < VIEW_WIDTH {
        draw_line(x, start_y - camera_y, x, start_y - camera_y + VIEW_HEIGHT, 1.0, color);
        x += GRID;
    }
    let mut y = start_y;
    while y < start_y + VIEW_HEIGHT + GRID {
        draw_line(0.0, y - camera_y, VIEW_WIDTH, y - camera_y, 1.0, color);
        y += GRID;
    }
}

/// Editor view: grid, entities, selection outline, resize handles and enemy
/// hitboxes.
pub fn draw_editor(state: &EditorState) {
    clear_background(DARKGRAY);
    let cam = state.camera_y;
    draw_editor_grid(cam);

    for p in &state.platforms {
        draw_platform(p, cam);
    }
    for e in &state.enemies {
        draw_enemy(e, cam);
    }
    for t in &state.turrets {
        draw_turret(t, cam);
    }

    match state.selection {
        Selection::Platform(i) => {
            let p = &state.platforms[i];
            draw_rectangle_lines(p.x, p.y - cam, p.width, p.height, 3.0, YELLOW);
            if state.tool == Tool::Resize {
                for handle in Handle::ALL {
                    let (hx, hy) = handle.position(p);
                    draw_rectangle(
                        hx - HANDLE_SIZE / 2.0,
                        hy - cam - HANDLE_SIZE / 2.0,
                        HANDLE_SIZE,
                        HANDLE_SIZE,
                        YELLOW,
                    );
                }
            }
        }
        Selection::Enemy(i) => {
            let e = &state.enemies[i];
            draw_rectangle_lines(e.x, e.y - cam, e.width, e.height, 3.0, YELLOW);
        }
        Selection::Turret(i) => {
            let t = &state.turrets[i];
            draw_rectangle_lines(t.x, t.y - cam, t.width, t.height, 3.0, YELLOW);
        }
        Selection::None => {}
    }

    // Enemy hitboxes stay visible so patrol placement is legible.
    for e in &state.enemies {
        draw_rectangle_lines(e.x, e.y - cam, e.width, e.height, 2.0, Color::new(1.0, 0.0, 0.0, 0.7));
    }

    draw_text(
        "1-5 platform  6-8 enemy  9 turret | Q place W remove E move R resize T rotate",
        10.0,
        20.0,
        16.0,
        WHITE,
    );
    draw_text(
        "P playtest  S save  L load  F1-F10 load level  Esc menu",
        10.0,
        40.0,
        16.0,
        WHITE,
    );
}
