//! Keyboard sampling
//!
//! Raw macroquad key state translated into the flags the simulation and the
//! editor consume. No buffering: each frame reads the keys as they are.

use macroquad::prelude::*;

use crate::editor::{Palette, Tool};
use crate::sim::{EnemyKind, InputFrame, PlatformKind};

/// Movement keys for one simulation step.
pub fn sample() -> InputFrame {
    InputFrame {
        left: is_key_down(KeyCode::Left),
        right: is_key_down(KeyCode::Right),
        jump: is_key_down(KeyCode::Space),
    }
}

/// Editor keyboard commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    SelectTool(Tool),
    SelectPalette(Palette),
    Playtest,
    Save,
    Load,
    /// Load a bundled catalog level into the edit buffer.
    LoadCatalog(u32),
    BackToMenu,
}

const CATALOG_KEYS: [(KeyCode, u32); 10] = [
    (KeyCode::F1, 1),
    (KeyCode::F2, 2),
    (KeyCode::F3, 3),
    (KeyCode::F4, 4),
    (KeyCode::F5, 5),
    (KeyCode::F6, 6),
    (KeyCode::F7, 7),
    (KeyCode::F8, 8),
    (KeyCode::F9, 9),
    (KeyCode::F10, 10),
];

/// Map the key pressed this frame, if any, to an editor command.
pub fn editor_command() -> Option<EditorCommand> {
    let palette = |p| Some(EditorCommand::SelectPalette(p));
    let tool = |t| Some(EditorCommand::SelectTool(t));
    if is_key_pressed(KeyCode::Key1) {
        return palette(Palette::Platform(PlatformKind::Standard));
    }
    if is_key_pressed(KeyCode::Key2) {
        return palette(Palette::Platform(PlatformKind::Moving));
    }
    if is_key_pressed(KeyCode::Key3) {
        return palette(Palette::Platform(PlatformKind::Breakable));
    }
    if is_key_pressed(KeyCode::Key4) {
        return palette(Palette::Platform(PlatformKind::Win));
    }
    if is_key_pressed(KeyCode::Key5) {
        return palette(Palette::Platform(PlatformKind::Wall));
    }
    if is_key_pressed(KeyCode::Key6) {
        return palette(Palette::Enemy(EnemyKind::Standard));
    }
    if is_key_pressed(KeyCode::Key7) {
        return palette(Palette::Enemy(EnemyKind::Patrolling));
    }
    if is_key_pressed(KeyCode::Key8) {
        return palette(Palette::Enemy(EnemyKind::Jumping));
    }
    if is_key_pressed(KeyCode::Key9) {
        return palette(Palette::Turret);
    }
    if is_key_pressed(KeyCode::Q) {
        return tool(Tool::Place);
    }
    if is_key_pressed(KeyCode::W) {
        return tool(Tool::Remove);
    }
    if is_key_pressed(KeyCode::E) {
        return tool(Tool::Move);
    }
    if is_key_pressed(KeyCode::R) {
        return tool(Tool::Resize);
    }
    if is_key_pressed(KeyCode::T) {
        return tool(Tool::Rotate);
    }
    if is_key_pressed(KeyCode::P) {
        return Some(EditorCommand::Playtest);
    }
    if is_key_pressed(KeyCode::S) {
        return Some(EditorCommand::Save);
    }
    if is_key_pressed(KeyCode::L) {
        return Some(EditorCommand::Load);
    }
    if is_key_pressed(KeyCode::Escape) {
        return Some(EditorCommand::BackToMenu);
    }
    for (key, number) in CATALOG_KEYS {
        if is_key_pressed(key) {
            return Some(EditorCommand::LoadCatalog(number));
        }
    }
    None
}
