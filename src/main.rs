//! Dungeon Jumper
//!
//! Vertical-scrolling platformer with two boss fights, a time-attack mode
//! and an in-app level editor. Fixed-step simulation at one step per frame,
//! 800x600 window.

mod app;
mod editor;
mod input;
mod level;
mod render;
mod sim;

use macroquad::prelude::*;

use app::{App, Mode};
use editor::Tool;
use input::EditorCommand;
use level::catalog_level;
use sim::{VIEW_HEIGHT, VIEW_WIDTH};

fn window_conf() -> Conf {
    Conf {
        window_title: "Dungeon Jumper".to_string(),
        window_width: VIEW_WIDTH as i32,
        window_height: VIEW_HEIGHT as i32,
        window_resizable: false,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let seed = (macroquad::miniquad::date::now() * 1000.0) as u64;
    let mut app = App::new(seed);

    loop {
        if app.mode != Mode::Editor && is_mouse_button_pressed(MouseButton::Left) {
            let (mx, my) = mouse_position();
            app.handle_click(mx, my);
        }

        match app.mode {
            Mode::Menu => render::draw_menu(&app.menu_labels()),
            Mode::Playing => {
                let frame_input = input::sample();
                app.frame(&frame_input);
                if let Some(sim) = &app.sim {
                    render::draw_game(sim, app.testing_level, app.time_attack, app.total_time);
                }
            }
            Mode::GameOver => {
                let score = app.sim.as_ref().map(|s| s.score).unwrap_or(0);
                render::draw_game_over(score, app.testing_level);
            }
            Mode::LevelComplete => {
                if app.run_complete() && !app.testing_level {
                    render::draw_run_complete(app.total_time);
                } else {
                    let score = app.sim.as_ref().map(|s| s.score).unwrap_or(0);
                    render::draw_level_complete(score, app.testing_level);
                }
            }
            Mode::Editor => editor_frame(&mut app),
        }

        next_frame().await;
    }
}

fn editor_frame(app: &mut App) {
    if let Some(cmd) = input::editor_command() {
        match cmd {
            EditorCommand::SelectTool(tool) => app.editor.tool = tool,
            EditorCommand::SelectPalette(palette) => app.editor.palette = palette,
            EditorCommand::Playtest => {
                app.start_playtest();
                return;
            }
            EditorCommand::Save => app.save_editor_level(),
            EditorCommand::Load => app.load_editor_level(),
            EditorCommand::LoadCatalog(number) => match catalog_level(number) {
                Some(data) => app.editor.load_level_data(data),
                None => eprintln!("Level {} not found", number),
            },
            EditorCommand::BackToMenu => {
                app.mode = Mode::Menu;
                return;
            }
        }
    }

    let (mx, my) = mouse_position();
    let world_y = my + app.editor.camera_y;
    if is_mouse_button_pressed(MouseButton::Left) {
        match app.editor.tool {
            Tool::Move | Tool::Resize => app.editor.mouse_down(mx, world_y),
            _ => {
                if let Err(msg) = app.editor.click(mx, world_y) {
                    eprintln!("{}", msg);
                }
            }
        }
    } else if is_mouse_button_down(MouseButton::Left) {
        app.editor.mouse_move(mx, world_y);
    }
    if is_mouse_button_released(MouseButton::Left) {
        app.editor.mouse_up();
    }

    let wheel = mouse_wheel().1;
    if wheel != 0.0 {
        app.editor.scroll(if wheel < 0.0 { 1.0 } else { -1.0 });
    }

    render::draw_editor(&app.editor);
}
