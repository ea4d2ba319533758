use std::cell::RefCell;
use std::rc::Rc;

use gtk4::gio;
use gtk4::prelude::*;
use gtk4::{Adjustment, ApplicationWindow, Dialog, Label, ResponseType, Scale, Switch};

use crate::game::logic::GameState;
use crate::game::types::Difficulty;
use crate::i18n::I18n;

/// Show a settings dialog (difficulty, reset statistics).
pub fn show_settings_dialog(
    parent: &ApplicationWindow,
    state: Rc<RefCell<GameState>>,
    i18n: &I18n,
    on_change: impl Fn() + 'static,
) {
    let dialog = Dialog::new();
    dialog.set_transient_for(Some(parent));
    dialog.set_modal(true);
    dialog.set_destroy_with_parent(true);
    dialog.set_title(Some(&i18n.t("settings-title")));
    dialog.set_default_width(380);

    let ok_btn = dialog.add_button(&i18n.t("ok"), ResponseType::Accept);
    let cancel_btn = dialog.add_button(&i18n.t("cancel"), ResponseType::Cancel);
    for btn in [&ok_btn, &cancel_btn] {
        btn.set_margin_start(8);
        btn.set_margin_end(8);
        btn.set_margin_top(6);
        btn.set_margin_bottom(6);
    }

    let content = dialog.content_area();
    content.set_spacing(12);
    content.set_margin_start(16);
    content.set_margin_end(16);
    content.set_margin_top(12);
    content.set_margin_bottom(12);

    // ── Difficulty ──
    let current = state.borrow().difficulty;
    let difficulty_label = Label::new(Some(&format!(
        "{}: {}",
        i18n.t("settings-difficulty"),
        i18n.t(current.label_key())
    )));
    content.append(&difficulty_label);

    let adj = Adjustment::new(
        current.index() as f64,
        0.0,
        (Difficulty::ALL.len() - 1) as f64,
        1.0,
        1.0,
        0.0,
    );
    let scale = Scale::new(gtk4::Orientation::Horizontal, Some(&adj));
    scale.set_digits(0);
    scale.set_hexpand(true);
    for d in Difficulty::ALL {
        scale.add_mark(
            d.index() as f64,
            gtk4::PositionType::Bottom,
            Some(&i18n.t(d.label_key())),
        );
    }
    content.append(&scale);

    {
        let difficulty_label = difficulty_label.clone();
        let key = i18n.t("settings-difficulty");
        let names: Vec<String> = Difficulty::ALL
            .iter()
            .map(|d| i18n.t(d.label_key()))
            .collect();
        adj.connect_value_changed(move |adj| {
            let idx = adj.value().round() as usize;
            let name = names.get(idx).cloned().unwrap_or_default();
            difficulty_label.set_text(&format!("{}: {}", key, name));
        });
    }

    // ── Reset statistics ──
    let reset_switch = Switch::new();
    reset_switch.set_active(false);
    let reset_box = gtk4::Box::new(gtk4::Orientation::Horizontal, 8);
    let reset_label = Label::new(Some(&i18n.t("settings-reset")));
    reset_box.append(&reset_label);
    reset_box.append(&reset_switch);
    content.append(&reset_box);

    let state_clone = state.clone();
    let reset_switch_clone = reset_switch.clone();
    dialog.connect_response(move |dialog, response| {
        if response == ResponseType::Accept {
            let mut st = state_clone.borrow_mut();
            st.difficulty = Difficulty::from_index(adj.value().round() as usize);
            if reset_switch_clone.is_active() {
                st.statistics.reset();
            }
            drop(st);
            on_change();
        }
        dialog.close();
    });

    dialog.show();
}

/// Confirm abandoning the running round before starting a new one.
/// An abandoned round is not counted in the statistics.
pub fn confirm_new_game(parent: &ApplicationWindow, i18n: &I18n, on_confirm: impl Fn() + 'static) {
    let dialog = Dialog::with_buttons(
        Some(&i18n.t("new-game-confirm-title")),
        Some(parent),
        gtk4::DialogFlags::MODAL | gtk4::DialogFlags::DESTROY_WITH_PARENT,
        &[
            (&i18n.t("ok"), ResponseType::Accept),
            (&i18n.t("cancel"), ResponseType::Cancel),
        ],
    );

    let content = dialog.content_area();
    content.set_margin_start(16);
    content.set_margin_end(16);
    content.set_margin_top(12);
    content.set_margin_bottom(12);
    let label = Label::new(Some(&i18n.t("new-game-confirm-message")));
    label.set_wrap(true);
    content.append(&label);

    dialog.connect_response(move |dialog, response| {
        if response == ResponseType::Accept {
            on_confirm();
        }
        dialog.close();
    });

    dialog.show();
}

/// Show a simple info message box. The message may contain markup; links
/// open in the default browser.
pub fn show_info(parent: &ApplicationWindow, title: &str, message: &str, i18n: &I18n) {
    let dialog = Dialog::new();
    dialog.set_transient_for(Some(parent));
    dialog.set_modal(true);
    dialog.set_destroy_with_parent(true);
    dialog.set_title(Some(title));
    let ok_btn = dialog.add_button(&i18n.t("ok"), ResponseType::Accept);
    ok_btn.set_margin_start(8);
    ok_btn.set_margin_end(8);
    ok_btn.set_margin_top(6);
    ok_btn.set_margin_bottom(6);

    let content = dialog.content_area();
    content.set_margin_start(16);
    content.set_margin_end(16);
    content.set_margin_top(12);
    content.set_margin_bottom(12);
    let label = Label::new(None);
    label.set_wrap(true);
    label.set_use_markup(true);
    label.set_markup(message);
    label.connect_activate_link(|_, uri| {
        if let Err(e) = gio::AppInfo::launch_default_for_uri(uri, None::<&gio::AppLaunchContext>) {
            eprintln!("Failed to open link {}: {}", uri, e);
            return gtk4::Inhibit(false);
        }
        gtk4::Inhibit(true)
    });
    content.append(&label);

    dialog.connect_response(|dialog, _| {
        dialog.close();
    });

    dialog.show();
}

/// Show a "quit while a round is running?" confirmation. Returns the Dialog
/// so the caller can wire up the response.
pub fn confirm_close(parent: &ApplicationWindow, i18n: &I18n) -> Dialog {
    let dialog = Dialog::new();
    dialog.set_transient_for(Some(parent));
    dialog.set_modal(true);
    dialog.set_destroy_with_parent(true);
    dialog.set_title(Some(&i18n.t("close-confirm-title")));

    let ok_btn = dialog.add_button(&i18n.t("ok"), ResponseType::Accept);
    let cancel_btn = dialog.add_button(&i18n.t("cancel"), ResponseType::Cancel);
    for btn in [&ok_btn, &cancel_btn] {
        btn.set_margin_start(8);
        btn.set_margin_end(8);
        btn.set_margin_top(6);
        btn.set_margin_bottom(6);
    }

    let content = dialog.content_area();
    content.set_margin_start(16);
    content.set_margin_end(16);
    content.set_margin_top(12);
    content.set_margin_bottom(12);
    let label = Label::new(Some(&i18n.t("close-confirm-message")));
    label.set_wrap(true);
    content.append(&label);

    dialog
}
