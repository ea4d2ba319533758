use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use gtk4::prelude::*;
use gtk4::{DrawingArea, EventControllerMotion, GestureClick};

use super::rendering;
use crate::game::logic::GameState;
use crate::game::types::GameOutcome;

/// Pulse duration.
const PULSE_DURATION: Duration = Duration::from_millis(400);
/// Pause before the CPU acts.
const WAIT_BEFORE_CPU_DURATION: Duration = Duration::from_millis(250);

/// The phases of the turn animation state machine.
#[derive(Debug, Clone)]
pub enum AnimPhase {
    /// Waiting for the player to click.
    Idle,
    /// Player clicked (row, col) – pulsing highlight, then apply the move.
    PlayerPulse {
        row: usize,
        col: usize,
        time_left: Duration,
        total: Duration,
    },
    /// Player move was applied. Short pause before the CPU answers.
    WaitBeforeCpu { time_left: Duration },
    /// CPU has chosen (row, col) – pulsing highlight, then apply the move.
    CpuPulse {
        row: usize,
        col: usize,
        time_left: Duration,
        total: Duration,
    },
}

/// Turn animation state. While a phase other than `Idle` is active the
/// board ignores clicks, so the game state is never mutated from two
/// places in the same turn.
pub struct AnimationState {
    pub phase: AnimPhase,
}

impl AnimationState {
    pub fn new() -> Self {
        Self {
            phase: AnimPhase::Idle,
        }
    }

    /// Is a pulse/wait animation running? (blocks clicks)
    pub fn is_busy(&self) -> bool {
        !matches!(self.phase, AnimPhase::Idle)
    }

    /// The currently pulsing cell (if any) and its progress 0.0..1.0.
    pub fn pulse_cell(&self) -> Option<(usize, usize, f64)> {
        match &self.phase {
            AnimPhase::PlayerPulse {
                row,
                col,
                time_left,
                total,
            }
            | AnimPhase::CpuPulse {
                row,
                col,
                time_left,
                total,
            } => {
                let elapsed = (*total - *time_left).as_secs_f64();
                Some((*row, *col, (elapsed / total.as_secs_f64()).clamp(0.0, 1.0)))
            }
            _ => None,
        }
    }

    /// Is the current pulse for the CPU?
    pub fn is_cpu_pulse(&self) -> bool {
        matches!(self.phase, AnimPhase::CpuPulse { .. })
    }

    /// Abort any running animation (e.g. on new game).
    pub fn reset(&mut self) {
        self.phase = AnimPhase::Idle;
    }

    pub fn pulse_duration(&self) -> Duration {
        PULSE_DURATION
    }

    pub fn wait_before_cpu_duration(&self) -> Duration {
        WAIT_BEFORE_CPU_DURATION
    }
}

/// Create the game board drawing area widget with mouse handling.
pub fn create_board(
    state: Rc<RefCell<GameState>>,
    anim: Rc<RefCell<AnimationState>>,
) -> DrawingArea {
    let drawing_area = DrawingArea::new();
    drawing_area.set_content_width(rendering::REF_SIZE as i32);
    drawing_area.set_content_height(rendering::REF_SIZE as i32);
    drawing_area.set_hexpand(true);
    drawing_area.set_vexpand(true);

    // --- Draw handler ---
    {
        let state = state.clone();
        let anim = anim.clone();
        drawing_area.set_draw_func(move |_area, cr, w, h| {
            let st = state.borrow();
            let an = anim.borrow();
            rendering::render(cr, &st, w, h, an.pulse_cell(), an.is_cpu_pulse());
        });
    }

    // --- Click handler ---
    {
        let state = state.clone();
        let da = drawing_area.clone();
        let anim = anim.clone();
        let click = GestureClick::new();
        click.connect_released(move |_gesture, _n, x, y| {
            // Ignore clicks while a turn animation is in flight.
            if anim.borrow().is_busy() {
                return;
            }
            let w = da.width();
            let h = da.height();
            if let Some((row, col)) = rendering::mouse_to_cell(x, y, w, h) {
                let st = state.borrow();
                if st.outcome != GameOutcome::Running {
                    return;
                }
                // The engine moves on its own schedule; only the human side
                // may be driven by clicks.
                if st.current_player == st.computer_mark {
                    return;
                }
                if !st.is_valid_move(row, col) {
                    return;
                }
                drop(st);
                let mut an = anim.borrow_mut();
                let dur = an.pulse_duration();
                an.phase = AnimPhase::PlayerPulse {
                    row,
                    col,
                    time_left: dur,
                    total: dur,
                };
                da.queue_draw();
            }
        });
        drawing_area.add_controller(click);
    }

    // --- Mouse move handler ---
    {
        let state = state.clone();
        let da = drawing_area.clone();
        let motion = EventControllerMotion::new();
        motion.connect_motion(move |_ctrl, x, y| {
            let w = da.width();
            let h = da.height();
            let mut st = state.borrow_mut();
            if let Some((row, col)) = rendering::mouse_to_cell(x, y, w, h) {
                st.update_hover(row, col);
            } else {
                st.clear_hover();
            }
            drop(st);
            da.queue_draw();
        });
        drawing_area.add_controller(motion);
    }

    drawing_area
}
