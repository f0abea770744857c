//! Application modes and transitions
//!
//! Owns the currently running simulation, the editor buffer and the flags
//! distinguishing a plain run from a time-attack run or an editor playtest.
//! Everything here is headless: clicks arrive as screen coordinates and
//! frames as `InputFrame`s, so the whole mode machine is testable without a
//! window.

use std::path::Path;

use crate::editor::EditorState;
use crate::level::{catalog_level, catalog_level_numbers, LevelData};
use crate::render::{
    menu_button, BACK_BUTTON, END_FINAL_BUTTON, END_PRIMARY_BUTTON, END_SECONDARY_BUTTON,
};
use crate::sim::{InputFrame, SimContext};

/// Where editor save/load reads and writes its level string.
pub const LEVEL_FILE: &str = "level.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Menu,
    Playing,
    GameOver,
    LevelComplete,
    Editor,
}

pub struct App {
    pub mode: Mode,
    pub sim: Option<SimContext>,
    pub editor: EditorState,
    pub level: u32,
    pub time_attack: bool,
    /// Time-attack clock: banked completed-attempt time plus the running
    /// simulation's elapsed seconds.
    pub total_time: f64,
    /// Seconds banked from earlier attempts in the current time-attack run.
    time_base: f64,
    /// True while playing a level launched from the editor.
    pub testing_level: bool,
    seed: u64,
}

impl App {
    pub fn new(seed: u64) -> Self {
        Self {
            mode: Mode::Menu,
            sim: None,
            editor: EditorState::new(),
            level: 1,
            time_attack: false,
            total_time: 0.0,
            time_base: 0.0,
            testing_level: false,
            seed,
        }
    }

    fn next_seed(&mut self) -> u64 {
        self.seed = self.seed.wrapping_add(1);
        self.seed
    }

    fn last_level(&self) -> u32 {
        catalog_level_numbers().last().copied().unwrap_or(1)
    }

    /// Menu entries in button order: levels, then editor, then time attack.
    pub fn menu_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = catalog_level_numbers()
            .into_iter()
            .map(|n| match n {
                5 => "Boss 1".to_string(),
                10 => "Boss 2".to_string(),
                n => format!("Level {}", n),
            })
            .collect();
        labels.push("Level Editor".to_string());
        labels.push("Time Attack".to_string());
        labels
    }

    /// Load a catalog level and enter play. Unknown numbers are a no-op.
    pub fn start_level(&mut self, number: u32) -> bool {
        match catalog_level(number) {
            Some(data) => {
                let data = data.clone();
                self.begin_sim(&data);
                self.level = number;
                self.testing_level = false;
                true
            }
            None => {
                eprintln!("Level {} not found", number);
                false
            }
        }
    }

    pub fn start_time_attack(&mut self) {
        self.time_attack = true;
        self.total_time = 0.0;
        self.time_base = 0.0;
        self.start_level(1);
    }

    /// Launch a playtest of the editor buffer.
    pub fn start_playtest(&mut self) {
        let data = self.editor.begin_playtest();
        self.begin_sim(&data);
        self.testing_level = true;
    }

    fn begin_sim(&mut self, data: &LevelData) {
        let seed = self.next_seed();
        self.sim = Some(SimContext::from_level(data, seed));
        self.mode = Mode::Playing;
    }

    /// Restart the current attempt after a game over.
    fn retry(&mut self) {
        if self.testing_level {
            // Rebuild from the playtest snapshot, not the (restorable)
            // editor buffer.
            let data = self.editor.begin_playtest();
            self.begin_sim(&data);
            self.testing_level = true;
        } else {
            self.start_level(self.level);
        }
    }

    fn return_to_editor(&mut self) {
        self.editor.end_playtest();
        self.sim = None;
        self.testing_level = false;
        self.mode = Mode::Editor;
    }

    fn return_to_menu(&mut self) {
        self.sim = None;
        self.testing_level = false;
        self.time_attack = false;
        self.mode = Mode::Menu;
    }

    /// True on the level-complete screen of a finished time-attack run.
    pub fn run_complete(&self) -> bool {
        self.time_attack && self.level >= self.last_level()
    }

    /// Advance one frame while playing, then apply the mode transitions the
    /// simulation flags call for.
    pub fn frame(&mut self, input: &InputFrame) {
        if self.mode != Mode::Playing {
            return;
        }
        let Some(sim) = self.sim.as_mut() else {
            return;
        };
        sim.step(input);
        if self.time_attack && !self.testing_level {
            // The simulation owns the attempt clock; the run total is that
            // plus whatever earlier attempts banked.
            self.total_time = self.time_base + sim.elapsed;
        }

        let (game_over, game_won) = (sim.game_over, sim.game_won);
        if game_won {
            if self.time_attack && !self.testing_level && self.level < self.last_level() {
                // Time attack rolls straight into the next level.
                self.time_base = self.total_time;
                let next = self.level + 1;
                self.start_level(next);
            } else {
                self.mode = Mode::LevelComplete;
            }
        } else if game_over {
            if self.time_attack && !self.testing_level {
                // Time attack retries instantly; the clock keeps running.
                self.time_base = self.total_time;
                self.start_level(self.level);
            } else {
                self.mode = Mode::GameOver;
            }
        }
    }

    /// Route a click in screen coordinates to the current mode. Editor-mode
    /// canvas clicks are handled by the caller against `self.editor`.
    pub fn handle_click(&mut self, x: f32, y: f32) {
        match self.mode {
            Mode::Menu => {
                let labels = self.menu_labels();
                let levels = labels.len() - 2;
                for i in 0..labels.len() {
                    if !menu_button(i).contains(x, y) {
                        continue;
                    }
                    if i < levels {
                        self.time_attack = false;
                        self.start_level(i as u32 + 1);
                    } else if i == levels {
                        self.mode = Mode::Editor;
                    } else {
                        self.start_time_attack();
                    }
                    return;
                }
            }
            Mode::Playing => {
                if BACK_BUTTON.contains(x, y) {
                    if self.testing_level {
                        self.return_to_editor();
                    } else {
                        self.return_to_menu();
                    }
                }
            }
            Mode::GameOver => {
                if END_PRIMARY_BUTTON.contains(x, y) {
                    self.retry();
                } else if END_SECONDARY_BUTTON.contains(x, y) {
                    if self.testing_level {
                        self.return_to_editor();
                    } else {
                        self.return_to_menu();
                    }
                }
            }
            Mode::LevelComplete => {
                if self.testing_level {
                    if END_PRIMARY_BUTTON.contains(x, y) {
                        self.return_to_editor();
                    }
                } else if self.run_complete() {
                    if END_FINAL_BUTTON.contains(x, y) {
                        self.return_to_menu();
                    }
                } else if END_PRIMARY_BUTTON.contains(x, y) {
                    if self.level < self.last_level() {
                        let next = self.level + 1;
                        self.start_level(next);
                    } else {
                        self.return_to_menu();
                    }
                } else if END_SECONDARY_BUTTON.contains(x, y) {
                    self.return_to_menu();
                }
            }
            Mode::Editor => {}
        }
    }

    pub fn save_editor_level(&mut self) {
        if let Err(e) = self.editor.save_to_file(Path::new(LEVEL_FILE)) {
            eprintln!("{}", e);
        }
    }

    pub fn load_editor_level(&mut self) {
        if let Err(e) = self.editor.load_from_file(Path::new(LEVEL_FILE)) {
            eprintln!("{}", e);
        }
    }
}
