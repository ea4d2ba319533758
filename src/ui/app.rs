use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use gtk4::gdk::{Display, Key};
use gtk4::gio::{Menu, SimpleAction};
use gtk4::prelude::*;
use gtk4::{
    Application, ApplicationWindow, AspectFrame, Box as GtkBox, CssProvider, EventControllerKey,
    HeaderBar, Label, MenuButton, Orientation, Separator, STYLE_PROVIDER_PRIORITY_APPLICATION,
};

use super::board::{self, AnimPhase, AnimationState};
use super::dialogs;
use crate::game::logic::{GameState, MoveResult};
use crate::game::types::{Difficulty, GameOutcome};
use crate::i18n::I18n;
use fluent_bundle::FluentArgs;

/// Build and present the main application window.
pub fn build_ui(app: &Application, resources_dir: &str) {
    // ── Shared state ──
    let state = Rc::new(RefCell::new(GameState::new()));
    let i18n = Rc::new(I18n::load_from_dir(resources_dir));
    let anim = Rc::new(RefCell::new(AnimationState::new()));

    // ── CSS ──
    let provider = CssProvider::new();
    let css = "
        .title-label  { font-weight: 700; font-size: 15px; }
        .status-label { font-weight: 600; font-size: 14px; }
        .stat-label   { font-size: 12px; margin: 0 6px; }
        .game-board   { background-color: #1caa9c; }
    ";
    provider.load_from_data(css);
    if let Some(display) = Display::default() {
        gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }

    // ── Window ──
    let win_title = i18n.t("app-title");
    let window = ApplicationWindow::builder()
        .application(app)
        .title(&win_title)
        .default_width(600)
        .default_height(680)
        .resizable(true)
        .build();

    // ── Header bar ──
    let header = HeaderBar::new();
    header.set_show_title_buttons(true);
    let header_title = Label::new(Some(&i18n.t("app-title")));
    header_title.add_css_class("title-label");
    header.set_title_widget(Some(&header_title));

    // ── Hamburger menu ──
    let menu = Menu::new();
    menu.append(Some(&i18n.t("menu-new-game")), Some("win.new-game"));
    menu.append(
        Some(&i18n.t("menu-computer-begins")),
        Some("win.computer-begins"),
    );
    menu.append(Some(&i18n.t("menu-hint")), Some("win.hint"));

    let section2 = Menu::new();
    section2.append(Some(&i18n.t("menu-settings")), Some("win.settings"));
    section2.append(Some(&i18n.t("menu-info")), Some("win.info"));
    menu.append_section(None, &section2);

    let menu_button = MenuButton::new();
    menu_button.set_icon_name("open-menu-symbolic");
    menu_button.set_menu_model(Some(&menu));
    header.pack_end(&menu_button);

    // ── Main layout ──
    let main_box = GtkBox::new(Orientation::Vertical, 0);

    // Square game board, letterboxed inside an AspectFrame.
    let drawing_area = board::create_board(state.clone(), anim.clone());
    drawing_area.add_css_class("game-board");
    let aspect_frame = AspectFrame::new(0.5, 0.5, 1.0, false);
    aspect_frame.set_child(Some(&drawing_area));
    aspect_frame.set_hexpand(true);
    aspect_frame.set_vexpand(true);
    main_box.append(&aspect_frame);

    // Status bar: turn/outcome banner, per-mark totals, difficulty.
    let status_bar = GtkBox::new(Orientation::Horizontal, 8);
    status_bar.set_margin_start(8);
    status_bar.set_margin_end(8);
    status_bar.set_margin_top(4);
    status_bar.set_margin_bottom(4);

    let status_label = Label::new(None);
    status_label.add_css_class("status-label");
    status_label.set_hexpand(true);
    status_label.set_halign(gtk4::Align::Start);

    let stat_x = Label::new(None);
    stat_x.add_css_class("stat-label");
    let stat_o = Label::new(None);
    stat_o.add_css_class("stat-label");
    let stat_ties = Label::new(None);
    stat_ties.add_css_class("stat-label");
    let difficulty_label = Label::new(None);
    difficulty_label.add_css_class("stat-label");

    status_bar.append(&status_label);
    status_bar.append(&stat_x);
    status_bar.append(&Separator::new(Orientation::Vertical));
    status_bar.append(&stat_o);
    status_bar.append(&Separator::new(Orientation::Vertical));
    status_bar.append(&stat_ties);
    status_bar.append(&Separator::new(Orientation::Vertical));
    status_bar.append(&difficulty_label);

    main_box.append(&status_bar);

    // ── Status updater ──
    let update_status = {
        let state = state.clone();
        let i18n = i18n.clone();
        let status_label = status_label.clone();
        let stat_x = stat_x.clone();
        let stat_o = stat_o.clone();
        let stat_ties = stat_ties.clone();
        let difficulty_label = difficulty_label.clone();
        move || {
            let st = state.borrow();
            let banner = match st.outcome {
                GameOutcome::Running => {
                    let mut args = FluentArgs::new();
                    args.set("mark", st.current_player.as_str());
                    i18n.t_args("status-turn", &args)
                }
                GameOutcome::Win(mark) => {
                    let mut args = FluentArgs::new();
                    args.set("mark", mark.as_str());
                    i18n.t_args("status-win", &args)
                }
                GameOutcome::Tie => i18n.t("status-tie"),
            };
            status_label.set_text(&banner);
            stat_x.set_text(&format!("{}: {}", i18n.t("stat-x"), st.statistics.x_wins));
            stat_o.set_text(&format!("{}: {}", i18n.t("stat-o"), st.statistics.o_wins));
            stat_ties.set_text(&format!("{}: {}", i18n.t("stat-ties"), st.statistics.ties));
            difficulty_label.set_text(&format!(
                "{}: {}",
                i18n.t("difficulty-label"),
                i18n.t(st.difficulty.label_key())
            ));
        }
    };
    update_status();

    // ── Turn driver (time-based) ──
    // Advances the pulse/wait state machine and applies moves when their
    // animation finishes. The computer's answer is scheduled here, never
    // from the click handler.
    {
        let state = state.clone();
        let anim = anim.clone();
        let update_status = update_status.clone();
        let last_time = Rc::new(RefCell::new(Instant::now()));
        drawing_area.add_tick_callback(move |widget, _clock| {
            let now = Instant::now();
            let mut lt = last_time.borrow_mut();
            let dt = now.duration_since(*lt).as_secs_f64();
            *lt = now;
            drop(lt);

            let phase = anim.borrow().phase.clone();
            let mut need_redraw = false;

            match phase {
                AnimPhase::Idle => {}

                AnimPhase::PlayerPulse {
                    row,
                    col,
                    time_left,
                    total,
                } => {
                    need_redraw = true;
                    if time_left <= Duration::from_secs(0) {
                        // Pulse done → apply the player's move
                        anim.borrow_mut().phase = AnimPhase::Idle;
                        let mut st = state.borrow_mut();
                        let result = st.make_move(row, col);
                        let cpu_next = result == MoveResult::Continue
                            && st.current_player == st.computer_mark;
                        drop(st);
                        if cpu_next {
                            let mut an = anim.borrow_mut();
                            let wait = an.wait_before_cpu_duration();
                            an.phase = AnimPhase::WaitBeforeCpu { time_left: wait };
                        }
                    } else {
                        let remaining = time_left.saturating_sub(Duration::from_secs_f64(dt));
                        anim.borrow_mut().phase = AnimPhase::PlayerPulse {
                            row,
                            col,
                            time_left: remaining,
                            total,
                        };
                    }
                }

                AnimPhase::WaitBeforeCpu { time_left } => {
                    need_redraw = true;
                    if time_left <= Duration::from_secs(0) {
                        // Pause done → the engine picks and starts pulsing
                        let st = state.borrow();
                        let cell = if st.outcome == GameOutcome::Running
                            && st.current_player == st.computer_mark
                        {
                            st.compute_ai_move(&mut rand::thread_rng())
                        } else {
                            None
                        };
                        drop(st);
                        let mut an = anim.borrow_mut();
                        if let Some((row, col)) = cell {
                            let dur = an.pulse_duration();
                            an.phase = AnimPhase::CpuPulse {
                                row,
                                col,
                                time_left: dur,
                                total: dur,
                            };
                        } else {
                            an.phase = AnimPhase::Idle;
                        }
                    } else {
                        let remaining = time_left.saturating_sub(Duration::from_secs_f64(dt));
                        anim.borrow_mut().phase = AnimPhase::WaitBeforeCpu {
                            time_left: remaining,
                        };
                    }
                }

                AnimPhase::CpuPulse {
                    row,
                    col,
                    time_left,
                    total,
                } => {
                    need_redraw = true;
                    if time_left <= Duration::from_secs(0) {
                        // Pulse done → apply the CPU's move
                        anim.borrow_mut().phase = AnimPhase::Idle;
                        state.borrow_mut().make_move(row, col);
                    } else {
                        let remaining = time_left.saturating_sub(Duration::from_secs_f64(dt));
                        anim.borrow_mut().phase = AnimPhase::CpuPulse {
                            row,
                            col,
                            time_left: remaining,
                            total,
                        };
                    }
                }
            }

            if need_redraw {
                widget.queue_draw();
            }
            update_status();
            glib::Continue(true)
        });
    }

    // ── Actions ──
    // New Game
    {
        let action = SimpleAction::new("new-game", None);
        let state = state.clone();
        let drawing_area = drawing_area.clone();
        let update_status = update_status.clone();
        let i18n = i18n.clone();
        let win_for_closure = window.clone();
        let anim = anim.clone();
        action.connect_activate(move |_, _| {
            let running = state.borrow().outcome == GameOutcome::Running;
            if running && state.borrow().moves_made > 0 {
                let state = state.clone();
                let drawing_area = drawing_area.clone();
                let update_status = update_status.clone();
                let anim = anim.clone();
                dialogs::confirm_new_game(&win_for_closure, &i18n, move || {
                    state.borrow_mut().new_game();
                    anim.borrow_mut().reset();
                    drawing_area.queue_draw();
                    update_status();
                });
            } else {
                state.borrow_mut().new_game();
                anim.borrow_mut().reset();
                drawing_area.queue_draw();
                update_status();
            }
        });
        window.add_action(&action);
    }

    // Computer begins
    {
        let action = SimpleAction::new("computer-begins", None);
        let state = state.clone();
        let drawing_area = drawing_area.clone();
        let anim = anim.clone();
        action.connect_activate(move |_, _| {
            let mut st = state.borrow_mut();
            if st.moves_made != 0 || st.outcome != GameOutcome::Running {
                return;
            }
            st.computer_begins();
            let cell = st.compute_ai_move(&mut rand::thread_rng());
            drop(st);
            let mut an = anim.borrow_mut();
            if let (Some((row, col)), false) = (cell, an.is_busy()) {
                let dur = an.pulse_duration();
                an.phase = AnimPhase::CpuPulse {
                    row,
                    col,
                    time_left: dur,
                    total: dur,
                };
                drop(an);
                drawing_area.queue_draw();
            }
        });
        window.add_action(&action);
    }

    // Hint
    {
        let action = SimpleAction::new("hint", None);
        let state = state.clone();
        let drawing_area = drawing_area.clone();
        action.connect_activate(move |_, _| {
            state.borrow_mut().get_tip();
            drawing_area.queue_draw();
        });
        window.add_action(&action);
    }

    // Settings
    {
        let action = SimpleAction::new("settings", None);
        let state = state.clone();
        let i18n = i18n.clone();
        let update_status = update_status.clone();
        let win_for_closure = window.clone();
        action.connect_activate(move |_, _| {
            dialogs::show_settings_dialog(
                &win_for_closure,
                state.clone(),
                &i18n,
                update_status.clone(),
            );
        });
        window.add_action(&action);
    }

    // Info
    {
        let action = SimpleAction::new("info", None);
        let win_for_closure = window.clone();
        let i18n = i18n.clone();
        action.connect_activate(move |_, _| {
            let mut args = FluentArgs::new();
            args.set("version", env!("CARGO_PKG_VERSION"));
            let mut body = i18n.t_args("info-body", &args);
            // Fluent stores literal "\n" sequences; convert them to real newlines
            body = body.replace("\\n", "\n");
            let link = i18n.t("info-link");
            body.push_str("\n\n");
            body.push_str(&link);
            dialogs::show_info(&win_for_closure, &i18n.t("menu-info"), &body, &i18n);
        });
        window.add_action(&action);
    }

    // ── Keyboard shortcuts (R = new game, E/M/H = difficulty) ──
    {
        let state = state.clone();
        let update_status = update_status.clone();
        let win_for_closure = window.clone();
        let keys = EventControllerKey::new();
        keys.connect_key_pressed(move |_, key, _, _| {
            let difficulty = match key {
                Key::r | Key::R => {
                    ActionGroupExt::activate_action(&win_for_closure, "new-game", None);
                    return gtk4::Inhibit(true);
                }
                Key::e | Key::E => Difficulty::Easy,
                Key::m | Key::M => Difficulty::Medium,
                Key::h | Key::H => Difficulty::Hard,
                _ => return gtk4::Inhibit(false),
            };
            state.borrow_mut().difficulty = difficulty;
            update_status();
            gtk4::Inhibit(true)
        });
        window.add_controller(keys);
    }

    // ── Close-request handler (warn if a round is running) ──
    {
        let state = state.clone();
        let i18n = i18n.clone();
        window.connect_close_request(move |win| {
            let st = state.borrow();
            if st.outcome == GameOutcome::Running && st.moves_made > 0 {
                drop(st);
                let dialog = dialogs::confirm_close(win, &i18n);
                let win = win.clone();
                dialog.connect_response(move |dialog, response| {
                    dialog.close();
                    if response == gtk4::ResponseType::Accept {
                        win.destroy();
                    }
                });
                dialog.show();
                gtk4::Inhibit(true)
            } else {
                gtk4::Inhibit(false)
            }
        });
    }

    window.set_titlebar(Some(&header));
    window.set_child(Some(&main_box));

    window.present();
}
