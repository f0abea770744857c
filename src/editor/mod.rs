//! Level editor state
//!
//! Headless editing model: placement, removal, drag-move, handle-resize,
//! turret rotation and camera scroll over the same entity types the
//! simulation runs. Mouse coordinates arriving here are world coordinates
//! (screen y plus the editor camera). Rendering and mouse plumbing live in
//! `render.rs` / `app.rs`.
//!
//! The ground platform is always index 0 and can be selected but never
//! removed. Playtesting serializes the edit buffer to records and restores
//! from that snapshot afterwards, so a playtest can never corrupt the buffer.

use std::fs;
use std::path::Path;

use crate::level::{
    decode_level_string, encode_level_string, CodecError, EnemyRecord, LevelData, PlatformRecord,
    TurretRecord,
};
use crate::sim::{
    Enemy, EnemyKind, Facing, Platform, PlatformId, PlatformKind, Turret, ENEMY_SIZE, GROUND_Y,
    PLATFORM_HEIGHT, PLATFORM_WIDTH, TURRET_SIZE, VIEW_HEIGHT, VIEW_WIDTH,
};

pub const GRID: f32 = 20.0;

/// Camera scroll step: two and a half grid squares per wheel notch.
const SCROLL_STEP: f32 = 2.5 * GRID;

/// Side length of a resize handle, in world units.
pub const HANDLE_SIZE: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Place,
    Remove,
    Move,
    Resize,
    Rotate,
}

/// What the place tool drops on click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Platform(PlatformKind),
    Enemy(EnemyKind),
    Turret,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Platform(usize),
    Enemy(usize),
    Turret(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    TopLeft,
    Top,
    TopRight,
    Left,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl Handle {
    pub const ALL: [Handle; 8] = [
        Handle::TopLeft,
        Handle::Top,
        Handle::TopRight,
        Handle::Left,
        Handle::Right,
        Handle::BottomLeft,
        Handle::Bottom,
        Handle::BottomRight,
    ];

    /// Handle center position on a platform's outline.
    pub fn position(self, p: &Platform) -> (f32, f32) {
        match self {
            Handle::TopLeft => (p.x, p.y),
            Handle::Top => (p.x + p.width / 2.0, p.y),
            Handle::TopRight => (p.x + p.width, p.y),
            Handle::Left => (p.x, p.y + p.height / 2.0),
            Handle::Right => (p.x + p.width, p.y + p.height / 2.0),
            Handle::BottomLeft => (p.x, p.y + p.height),
            Handle::Bottom => (p.x + p.width / 2.0, p.y + p.height),
            Handle::BottomRight => (p.x + p.width, p.y + p.height),
        }
    }

    fn moves_left_edge(self) -> bool {
        matches!(self, Handle::TopLeft | Handle::Left | Handle::BottomLeft)
    }

    fn moves_top_edge(self) -> bool {
        matches!(self, Handle::TopLeft | Handle::Top | Handle::TopRight)
    }

    fn moves_right_edge(self) -> bool {
        matches!(self, Handle::TopRight | Handle::Right | Handle::BottomRight)
    }

    fn moves_bottom_edge(self) -> bool {
        matches!(self, Handle::BottomLeft | Handle::Bottom | Handle::BottomRight)
    }
}

enum Drag {
    Move { offset_x: f32, offset_y: f32 },
    Resize { handle: Handle, mouse: (f32, f32), rect: (f32, f32, f32, f32) },
}

#[derive(Debug)]
pub enum EditorError {
    Io(std::io::Error),
    Codec(CodecError),
}

impl std::fmt::Display for EditorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditorError::Io(e) => write!(f, "level file error: {}", e),
            EditorError::Codec(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for EditorError {}

impl From<std::io::Error> for EditorError {
    fn from(e: std::io::Error) -> Self {
        EditorError::Io(e)
    }
}

impl From<CodecError> for EditorError {
    fn from(e: CodecError) -> Self {
        EditorError::Codec(e)
    }
}

pub struct EditorState {
    pub platforms: Vec<Platform>,
    pub enemies: Vec<Enemy>,
    pub turrets: Vec<Turret>,
    pub tool: Tool,
    pub palette: Palette,
    pub camera_y: f32,
    pub selection: Selection,
    drag: Option<Drag>,
    playtest_backup: Option<LevelData>,
    next_platform_id: u32,
}

impl EditorState {
    pub fn new() -> Self {
        let mut state = Self {
            platforms: Vec::new(),
            enemies: Vec::new(),
            turrets: Vec::new(),
            tool: Tool::Place,
            palette: Palette::Platform(PlatformKind::Standard),
            camera_y: 0.0,
            selection: Selection::None,
            drag: None,
            playtest_backup: None,
            next_platform_id: 0,
        };
        state.reset();
        state
    }

    /// Clear the buffer back to just the ground platform.
    pub fn reset(&mut self) {
        self.platforms.clear();
        self.enemies.clear();
        self.turrets.clear();
        self.selection = Selection::None;
        self.drag = None;
        let ground_id = self.alloc_platform_id();
        self.platforms.push(Platform::new(
            ground_id,
            0.0,
            GROUND_Y,
            VIEW_WIDTH,
            VIEW_HEIGHT - GROUND_Y,
            PlatformKind::Standard,
        ));
    }

    fn alloc_platform_id(&mut self) -> PlatformId {
        let id = PlatformId(self.next_platform_id);
        self.next_platform_id += 1;
        id
    }

    /// Handle a click in world coordinates for the place/remove/rotate tools.
    /// Returns a status message when the click was rejected.
    pub fn click(&mut self, x: f32, y: f32) -> Result<(), &'static str> {
        match self.tool {
            Tool::Place => self.place(x, y),
            Tool::Remove => {
                self.remove_at(x, y);
                Ok(())
            }
            Tool::Rotate => {
                self.rotate_turret_at(x, y);
                Ok(())
            }
            Tool::Move | Tool::Resize => Ok(()),
        }
    }

    fn place(&mut self, x: f32, y: f32) -> Result<(), &'static str> {
        let grid_x = (x / GRID).floor() * GRID;
        let grid_y = (y / GRID).floor() * GRID;
        match self.palette {
            Palette::Platform(kind) => {
                let id = self.alloc_platform_id();
                self.platforms.push(Platform::new(
                    id,
                    grid_x,
                    grid_y,
                    PLATFORM_WIDTH,
                    PLATFORM_HEIGHT,
                    kind,
                ));
                Ok(())
            }
            Palette::Enemy(EnemyKind::Patrolling) => {
                // Needs a platform below the click that spans the clicked
                // column; the nearest one becomes the patrol bound.
                let enemy_y = grid_y + GRID - ENEMY_SIZE;
                let target = self
                    .platforms
                    .iter()
                    .filter(|p| grid_x >= p.x && grid_x < p.x + p.width && enemy_y < p.y)
                    .min_by(|a, b| a.y.total_cmp(&b.y))
                    .map(|p| p.id);
                match target {
                    Some(id) => {
                        let snapped_x = ((x - ENEMY_SIZE / 2.0) / GRID).round() * GRID;
                        self.enemies.push(Enemy::new(
                            snapped_x,
                            enemy_y,
                            EnemyKind::Patrolling,
                            Some(id),
                        ));
                        Ok(())
                    }
                    None => Err("patrolling enemies must be placed in the air above a platform"),
                }
            }
            Palette::Enemy(kind) => {
                let snapped_x = ((x - ENEMY_SIZE / 2.0) / GRID).round() * GRID;
                let snapped_y = ((y - ENEMY_SIZE / 2.0) / GRID).round() * GRID;
                self.enemies.push(Enemy::new(snapped_x, snapped_y, kind, None));
                Ok(())
            }
            Palette::Turret => {
                let snapped_x = ((x - TURRET_SIZE / 2.0) / GRID).round() * GRID;
                let snapped_y = ((y - TURRET_SIZE / 2.0) / GRID).round() * GRID;
                self.turrets.push(Turret::new(snapped_x, snapped_y, Facing::Left));
                Ok(())
            }
        }
    }

    /// Remove the topmost entity under the cursor. Turrets win over enemies,
    /// enemies over platforms; the ground platform is untouchable.
    fn remove_at(&mut self, x: f32, y: f32) {
        for i in (0..self.turrets.len()).rev() {
            let t = &self.turrets[i];
            if point_in(x, y, t.x, t.y, t.width, t.height) {
                self.turrets.remove(i);
                self.selection = Selection::None;
                return;
            }
        }
        for i in (0..self.enemies.len()).rev() {
            let e = &self.enemies[i];
            if point_in(x, y, e.x, e.y, e.width, e.height) {
                self.enemies.remove(i);
                self.selection = Selection::None;
                return;
            }
        }
        for i in (1..self.platforms.len()).rev() {
            let p = &self.platforms[i];
            if point_in(x, y, p.x, p.y, p.width, p.height) {
                self.platforms.remove(i);
                self.selection = Selection::None;
                return;
            }
        }
    }

    fn rotate_turret_at(&mut self, x: f32, y: f32) {
        for t in self.turrets.iter_mut().rev() {
            if point_in(x, y, t.x, t.y, t.width, t.height) {
                t.facing = t.facing.rotated();
                return;
            }
        }
    }

    /// Begin a drag for the move/resize tools.
    pub fn mouse_down(&mut self, x: f32, y: f32) {
        match self.tool {
            Tool::Resize => {
                if let Selection::Platform(i) = self.selection {
                    if let Some(handle) = self.handle_at(i, x, y) {
                        let p = &self.platforms[i];
                        self.drag = Some(Drag::Resize {
                            handle,
                            mouse: (x, y),
                            rect: (p.x, p.y, p.width, p.height),
                        });
                        return;
                    }
                }
                self.selection = Selection::None;
                for i in (0..self.platforms.len()).rev() {
                    let p = &self.platforms[i];
                    if point_in(x, y, p.x, p.y, p.width, p.height) {
                        self.selection = Selection::Platform(i);
                        break;
                    }
                }
            }
            Tool::Move => {
                for i in (0..self.turrets.len()).rev() {
                    let t = &self.turrets[i];
                    if point_in(x, y, t.x, t.y, t.width, t.height) {
                        self.selection = Selection::Turret(i);
                        self.drag = Some(Drag::Move { offset_x: x - t.x, offset_y: y - t.y });
                        return;
                    }
                }
                for i in (0..self.enemies.len()).rev() {
                    let e = &self.enemies[i];
                    if point_in(x, y, e.x, e.y, e.width, e.height) {
                        self.selection = Selection::Enemy(i);
                        self.drag = Some(Drag::Move { offset_x: x - e.x, offset_y: y - e.y });
                        return;
                    }
                }
                for i in (0..self.platforms.len()).rev() {
                    let p = &self.platforms[i];
                    if point_in(x, y, p.x, p.y, p.width, p.height) {
                        self.selection = Selection::Platform(i);
                        self.drag = Some(Drag::Move { offset_x: x - p.x, offset_y: y - p.y });
                        return;
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_at(&self, platform: usize, x: f32, y: f32) -> Option<Handle> {
        let p = &self.platforms[platform];
        Handle::ALL.into_iter().find(|h| {
            let (hx, hy) = h.position(p);
            point_in(
                x,
                y,
                hx - HANDLE_SIZE / 2.0,
                hy - HANDLE_SIZE / 2.0,
                HANDLE_SIZE,
                HANDLE_SIZE,
            )
        })
    }

    /// Continue an active drag.
    pub fn mouse_move(&mut self, x: f32, y: f32) {
        match &self.drag {
            Some(Drag::Move { offset_x, offset_y }) => {
                let snapped_x = ((x - offset_x) / GRID).round() * GRID;
                let snapped_y = ((y - offset_y) / GRID).round() * GRID;
                match self.selection {
                    Selection::Platform(i) => {
                        self.platforms[i].x = snapped_x;
                        self.platforms[i].y = snapped_y;
                    }
                    Selection::Enemy(i) => {
                        self.enemies[i].x = snapped_x;
                        self.enemies[i].y = snapped_y;
                    }
                    Selection::Turret(i) => {
                        self.turrets[i].x = snapped_x;
                        self.turrets[i].y = snapped_y;
                    }
                    Selection::None => {}
                }
            }
            Some(Drag::Resize { handle, mouse, rect }) => {
                let i = match self.selection {
                    Selection::Platform(i) => i,
                    _ => return,
                };
                let (handle, mouse, rect) = (*handle, *mouse, *rect);
                let dx = x - mouse.0;
                let dy = y - mouse.1;
                let (rx, ry, rw, rh) = rect;
                let mut new_x = rx;
                let mut new_y = ry;
                let mut new_w = rw;
                let mut new_h = rh;
                if handle.moves_left_edge() {
                    new_x = rx + dx;
                    new_w = rw - dx;
                }
                if handle.moves_right_edge() {
                    new_w = rw + dx;
                }
                if handle.moves_top_edge() {
                    new_y = ry + dy;
                    new_h = rh - dy;
                }
                if handle.moves_bottom_edge() {
                    new_h = rh + dy;
                }
                if new_w < GRID {
                    if handle.moves_left_edge() {
                        new_x = rx + rw - GRID;
                    }
                    new_w = GRID;
                }
                if new_h < GRID {
                    if handle.moves_top_edge() {
                        new_y = ry + rh - GRID;
                    }
                    new_h = GRID;
                }
                let p = &mut self.platforms[i];
                p.x = (new_x / GRID).round() * GRID;
                p.y = (new_y / GRID).round() * GRID;
                p.width = (new_w / GRID).round() * GRID;
                p.height = (new_h / GRID).round() * GRID;
            }
            None => {}
        }
    }

    pub fn mouse_up(&mut self) {
        self.drag = None;
    }

    /// Scroll the camera by wheel notches (positive scrolls down). The view
    /// never scrolls below the lowest platform edge.
    pub fn scroll(&mut self, notches: f32) {
        self.camera_y += notches * SCROLL_STEP;
        let lowest = self
            .platforms
            .iter()
            .map(|p| p.y + p.height)
            .fold(VIEW_HEIGHT, f32::max);
        let max_camera = lowest - VIEW_HEIGHT;
        if self.camera_y > max_camera {
            self.camera_y = max_camera;
        }
    }

    /// Serialize the buffer to records. The implicit ground platform is
    /// skipped; patrolling enemies with a live patrol bound store their
    /// platform's key and a platform-relative elevation.
    pub fn to_level_data(&self) -> LevelData {
        let platforms = self.platforms[1..]
            .iter()
            .map(|p| PlatformRecord {
                x: p.x,
                elevation: GROUND_Y - p.y,
                width: p.width,
                height: p.height,
                kind: p.kind,
            })
            .collect();
        let enemies = self
            .enemies
            .iter()
            .map(|e| {
                let bound = e
                    .patrol
                    .and_then(|id| self.platforms.iter().find(|p| p.id == id));
                match bound {
                    Some(p) => EnemyRecord {
                        x: e.x,
                        elevation: p.y - e.y,
                        kind: e.kind,
                        platform_x: Some(p.x),
                        platform_elevation: Some(GROUND_Y - p.y),
                    },
                    None => EnemyRecord {
                        x: e.x,
                        elevation: GROUND_Y - e.y,
                        kind: e.kind,
                        platform_x: None,
                        platform_elevation: None,
                    },
                }
            })
            .collect();
        let turrets = self
            .turrets
            .iter()
            .map(|t| TurretRecord { x: t.x, elevation: GROUND_Y - t.y, facing: t.facing })
            .collect();
        LevelData { platforms, enemies, turrets, boss: None }
    }

    /// Replace the buffer with the given records. Bosses are not editable and
    /// are dropped here.
    pub fn load_level_data(&mut self, data: &LevelData) {
        self.reset();
        for record in &data.platforms {
            let id = self.alloc_platform_id();
            self.platforms.push(Platform::new(
                id,
                record.x,
                GROUND_Y - record.elevation,
                record.width,
                record.height,
                record.kind,
            ));
        }
        for record in &data.enemies {
            let patrol = match (record.platform_x, record.platform_elevation) {
                (Some(px), Some(pe)) => {
                    let py = GROUND_Y - pe;
                    self.platforms
                        .iter()
                        .find(|p| p.x == px && p.y == py)
                        .map(|p| p.id)
                }
                _ => None,
            };
            let y = match patrol.and_then(|id| self.platforms.iter().find(|p| p.id == id)) {
                Some(p) => p.y - record.elevation,
                None => GROUND_Y - record.elevation,
            };
            self.enemies.push(Enemy::new(record.x, y, record.kind, patrol));
        }
        for record in &data.turrets {
            self.turrets
                .push(Turret::new(record.x, GROUND_Y - record.elevation, record.facing));
        }
    }

    /// Snapshot the buffer for a playtest run and return the records to
    /// simulate.
    pub fn begin_playtest(&mut self) -> LevelData {
        let data = self.to_level_data();
        self.playtest_backup = Some(data.clone());
        data
    }

    /// Restore the buffer snapshotted by `begin_playtest`.
    pub fn end_playtest(&mut self) {
        if let Some(data) = self.playtest_backup.take() {
            self.load_level_data(&data);
        }
    }

    /// Encode the buffer as a shareable level string.
    pub fn level_string(&self) -> Result<String, EditorError> {
        Ok(encode_level_string(&self.to_level_data())?)
    }

    /// Replace the buffer from a level string. A failed decode leaves the
    /// buffer untouched.
    pub fn load_level_string(&mut self, s: &str) -> Result<(), EditorError> {
        let data = decode_level_string(s)?;
        self.load_level_data(&data);
        Ok(())
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), EditorError> {
        fs::write(path, self.level_string()?)?;
        println!("Saved level to {}", path.display());
        Ok(())
    }

    pub fn load_from_file(&mut self, path: &Path) -> Result<(), EditorError> {
        let s = fs::read_to_string(path)?;
        self.load_level_string(&s)?;
        println!("Loaded level from {}", path.display());
        Ok(())
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

fn point_in(px: f32, py: f32, x: f32, y: f32, width: f32, height: f32) -> bool {
    px >= x && px <= x + width && py >= y && py <= y + height
}
