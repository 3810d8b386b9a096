pub mod hud;
pub mod run_scene;

use ratatui::Frame;
use requisite_run::RunState;

/// Main UI drawing function.
pub fn draw_ui(frame: &mut Frame, run: &RunState, waiting_to_start: bool) {
    let area = frame.size();
    run_scene::render_run_scene(frame, area, run, waiting_to_start);
}
