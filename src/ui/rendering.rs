use cairo::Context;

use crate::game::board::BOARD_SIZE;
use crate::game::logic::GameState;
use crate::game::types::{GameOutcome, Mark};

// Design-time (reference) dimensions. The board is drawn in a square
// 600×600 coordinate space and scaled to fit the widget.
pub const REF_SIZE: f64 = 600.0;
const CELL_SIZE: f64 = REF_SIZE / BOARD_SIZE as f64;

const GRID_WIDTH: f64 = 15.0;
const CIRCLE_WIDTH: f64 = 15.0;
const CROSS_WIDTH: f64 = 20.0;
const CIRCLE_RADIUS: f64 = CELL_SIZE / 3.0;
const CROSS_INSET: f64 = CELL_SIZE / 4.0;
const STRIKE_WIDTH: f64 = 12.0;

// Palette: teal felt, slightly darker grid, cream circles, charcoal crosses.
const BG_COLOR: (f64, f64, f64) = (0.110, 0.667, 0.612);
const GRID_COLOR: (f64, f64, f64) = (0.090, 0.569, 0.529);
const CIRCLE_COLOR: (f64, f64, f64) = (0.937, 0.906, 0.784);
const CROSS_COLOR: (f64, f64, f64) = (0.259, 0.259, 0.259);

/// Render the whole scene, scaled to fit (widget_w, widget_h).
/// `pulse_cell` = optional (row, col, progress 0..1) for the pulsing cell
/// highlight; `is_cpu_pulse` selects its color (red = computer, blue = player).
pub fn render(
    cr: &Context,
    state: &GameState,
    widget_w: i32,
    widget_h: i32,
    pulse_cell: Option<(usize, usize, f64)>,
    is_cpu_pulse: bool,
) {
    let w = widget_w as f64;
    let h = widget_h as f64;
    let scale = (w / REF_SIZE).min(h / REF_SIZE);
    let offset_x = (w - REF_SIZE * scale) / 2.0;
    let offset_y = (h - REF_SIZE * scale) / 2.0;

    // Background fills the whole widget, including letterbox margins.
    cr.set_source_rgb(BG_COLOR.0, BG_COLOR.1, BG_COLOR.2);
    let _ = cr.paint();

    let _ = cr.save();
    cr.translate(offset_x, offset_y);
    cr.scale(scale, scale);

    draw_grid(cr);

    // Hover highlight under the marks, only while the game accepts input.
    if state.outcome == GameOutcome::Running {
        if let Some((row, col)) = state.hovered {
            cr.set_source_rgba(1.0, 1.0, 1.0, 0.15);
            cr.rectangle(
                col as f64 * CELL_SIZE,
                row as f64 * CELL_SIZE,
                CELL_SIZE,
                CELL_SIZE,
            );
            let _ = cr.fill();
        }
    }

    for row in 0..BOARD_SIZE {
        for col in 0..BOARD_SIZE {
            match state.board.get(row, col) {
                Some(Mark::O) => draw_circle(cr, row, col),
                Some(Mark::X) => draw_cross(cr, row, col),
                None => {}
            }
        }
    }

    // Tip: a dashed frame around the suggested cell.
    if let Some((row, col)) = state.tip {
        cr.set_source_rgba(1.0, 0.85, 0.2, 0.9);
        cr.set_line_width(6.0);
        cr.set_dash(&[14.0, 10.0], 0.0);
        cr.rectangle(
            col as f64 * CELL_SIZE + 8.0,
            row as f64 * CELL_SIZE + 8.0,
            CELL_SIZE - 16.0,
            CELL_SIZE - 16.0,
        );
        let _ = cr.stroke();
        cr.set_dash(&[], 0.0);
    }

    if let Some((row, col, progress)) = pulse_cell {
        draw_pulse_highlight(cr, row, col, progress, is_cpu_pulse);
    }

    // Strike through the completed line.
    if let Some((line, _)) = state.board.winning_line() {
        let (r0, c0) = line[0];
        let (r2, c2) = line[2];
        cr.set_source_rgba(1.0, 1.0, 1.0, 0.85);
        cr.set_line_width(STRIKE_WIDTH);
        cr.set_line_cap(cairo::LineCap::Round);
        cr.move_to(cell_center(c0), cell_center(r0));
        cr.line_to(cell_center(c2), cell_center(r2));
        let _ = cr.stroke();
        cr.set_line_cap(cairo::LineCap::Butt);
    }

    let _ = cr.restore();
}

fn cell_center(idx: usize) -> f64 {
    idx as f64 * CELL_SIZE + CELL_SIZE / 2.0
}

fn draw_grid(cr: &Context) {
    cr.set_source_rgb(GRID_COLOR.0, GRID_COLOR.1, GRID_COLOR.2);
    cr.set_line_width(GRID_WIDTH);
    for i in 1..BOARD_SIZE {
        let pos = i as f64 * CELL_SIZE;
        cr.move_to(0.0, pos);
        cr.line_to(REF_SIZE, pos);
        cr.move_to(pos, 0.0);
        cr.line_to(pos, REF_SIZE);
    }
    let _ = cr.stroke();
}

fn draw_circle(cr: &Context, row: usize, col: usize) {
    cr.set_source_rgb(CIRCLE_COLOR.0, CIRCLE_COLOR.1, CIRCLE_COLOR.2);
    cr.set_line_width(CIRCLE_WIDTH);
    cr.arc(
        cell_center(col),
        cell_center(row),
        CIRCLE_RADIUS,
        0.0,
        2.0 * std::f64::consts::PI,
    );
    let _ = cr.stroke();
}

fn draw_cross(cr: &Context, row: usize, col: usize) {
    let x = col as f64 * CELL_SIZE;
    let y = row as f64 * CELL_SIZE;
    cr.set_source_rgb(CROSS_COLOR.0, CROSS_COLOR.1, CROSS_COLOR.2);
    cr.set_line_width(CROSS_WIDTH);
    cr.move_to(x + CROSS_INSET, y + CELL_SIZE - CROSS_INSET);
    cr.line_to(x + CELL_SIZE - CROSS_INSET, y + CROSS_INSET);
    cr.move_to(x + CROSS_INSET, y + CROSS_INSET);
    cr.line_to(x + CELL_SIZE - CROSS_INSET, y + CELL_SIZE - CROSS_INSET);
    let _ = cr.stroke();
}

/// Draw a pulsing coloured rectangle around a cell.
/// `progress` goes from 0.0 to 1.0 over the pulse duration; alpha and line
/// width oscillate with a sine wave for a smooth effect.
fn draw_pulse_highlight(cr: &Context, row: usize, col: usize, progress: f64, is_cpu: bool) {
    let t = (progress * 3.0 * 2.0 * std::f64::consts::PI).sin().abs();
    let alpha = 0.3 + 0.7 * t;
    let line_w = 4.0 + 4.0 * t;

    if is_cpu {
        cr.set_source_rgba(1.0, 0.2, 0.2, alpha);
    } else {
        cr.set_source_rgba(0.2, 0.5, 1.0, alpha);
    }
    cr.set_line_width(line_w);
    let inset = line_w / 2.0;
    cr.rectangle(
        col as f64 * CELL_SIZE + inset,
        row as f64 * CELL_SIZE + inset,
        CELL_SIZE - line_w,
        CELL_SIZE - line_w,
    );
    let _ = cr.stroke();
}

/// Convert widget-space mouse coordinates back to reference coordinates,
/// then to board (row, col).
pub fn mouse_to_cell(x: f64, y: f64, widget_w: i32, widget_h: i32) -> Option<(usize, usize)> {
    let w = widget_w as f64;
    let h = widget_h as f64;
    let scale = (w / REF_SIZE).min(h / REF_SIZE);
    if scale <= 0.0 {
        return None;
    }
    let offset_x = (w - REF_SIZE * scale) / 2.0;
    let offset_y = (h - REF_SIZE * scale) / 2.0;

    let rx = (x - offset_x) / scale;
    let ry = (y - offset_y) / scale;

    let col = (rx / CELL_SIZE).floor() as i32;
    let row = (ry / CELL_SIZE).floor() as i32;

    if row >= 0 && row < BOARD_SIZE as i32 && col >= 0 && col < BOARD_SIZE as i32 {
        Some((row as usize, col as usize))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_square_widget_coordinates_to_cells() {
        assert_eq!(mouse_to_cell(10.0, 10.0, 600, 600), Some((0, 0)));
        assert_eq!(mouse_to_cell(300.0, 300.0, 600, 600), Some((1, 1)));
        assert_eq!(mouse_to_cell(599.0, 10.0, 600, 600), Some((0, 2)));
        assert_eq!(mouse_to_cell(10.0, 599.0, 600, 600), Some((2, 0)));
    }

    #[test]
    fn accounts_for_letterbox_offsets() {
        // 800×600 widget: the board is centered with 100px margins.
        assert_eq!(mouse_to_cell(50.0, 300.0, 800, 600), None);
        assert_eq!(mouse_to_cell(150.0, 300.0, 800, 600), Some((1, 0)));
        assert_eq!(mouse_to_cell(780.0, 300.0, 800, 600), None);
    }

    #[test]
    fn scales_with_the_widget() {
        assert_eq!(mouse_to_cell(20.0, 20.0, 300, 300), Some((0, 0)));
        assert_eq!(mouse_to_cell(280.0, 280.0, 300, 300), Some((2, 2)));
    }

    #[test]
    fn rejects_points_outside_the_board() {
        assert_eq!(mouse_to_cell(-5.0, 10.0, 600, 600), None);
        assert_eq!(mouse_to_cell(10.0, 620.0, 600, 600), None);
    }
}
