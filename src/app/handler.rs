//! Input handling — maps key/mouse events to widget commands.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;

use crate::config::Action;
use crate::core::widgets::{WidgetCommand, WidgetRef};

use super::state::{AppState, HitTarget};

/// Process a key event against the focused widget.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    // Ctrl+c always quits.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    // Digits pick a tab / slide / section directly.
    if let KeyCode::Char(c @ '1'..='9') = key.code {
        let n = c as usize - '0' as usize;
        select_nth(state, n);
        return;
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };

    match action {
        Action::Quit => state.should_quit = true,
        Action::FocusUp => state.focus = state.focus.saturating_sub(1),
        Action::FocusDown => {
            if state.focus + 1 < state.widgets.order.len() {
                state.focus += 1;
            }
        }
        Action::Prev => step_focused(state, -1),
        Action::Next => step_focused(state, 1),
        Action::Toggle => {
            if let Some(WidgetRef::Accordion(a)) = state.focused() {
                let section = state.accordion_cursor[a];
                state.run(WidgetCommand::Toggle {
                    accordion: a,
                    section,
                });
            }
        }
    }
}

/// Previous/next for whatever has focus.
fn step_focused(state: &mut AppState, delta: i64) {
    match state.focused() {
        Some(WidgetRef::Tabs(group)) => state.run(WidgetCommand::CycleTab { group, delta }),
        Some(WidgetRef::Carousel(carousel)) => state.run(WidgetCommand::Step { carousel, delta }),
        Some(WidgetRef::Accordion(a)) => {
            let len = state.widgets.accordions[a].sections.len();
            if len > 0 {
                let cursor = state.accordion_cursor[a] as i64 + delta;
                state.accordion_cursor[a] = cursor.clamp(0, len as i64 - 1) as usize;
            }
        }
        None => {}
    }
}

/// 1-based direct selection.
fn select_nth(state: &mut AppState, n: usize) {
    match state.focused() {
        Some(WidgetRef::Tabs(group)) => {
            if let Some(tab) = state.widgets.tab_groups[group].tabs.get(n - 1) {
                let panel = tab.name.clone();
                state.run(WidgetCommand::Activate { group, panel });
            }
        }
        Some(WidgetRef::Carousel(carousel)) => state.run(WidgetCommand::Select {
            carousel,
            slide: n as i64,
        }),
        Some(WidgetRef::Accordion(a)) => {
            if n <= state.widgets.accordions[a].sections.len() {
                state.accordion_cursor[a] = n - 1;
                state.run(WidgetCommand::Toggle {
                    accordion: a,
                    section: n - 1,
                });
            }
        }
        None => {}
    }
}

/// Left clicks hit-test against the zones recorded by the last draw.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let pos = Position::new(mouse.column, mouse.row);
            let Some(target) = state
                .hit_zones
                .iter()
                .find(|z| z.rect.contains(pos))
                .map(|z| z.target.clone())
            else {
                return;
            };
            match target {
                HitTarget::Focus(i) => state.focus = i,
                HitTarget::Command(command) => {
                    if let WidgetCommand::Toggle { accordion, section } = command {
                        state.accordion_cursor[accordion] = section;
                    }
                    state.run(command);
                }
            }
        }
        MouseEventKind::ScrollDown => step_focused(state, 1),
        MouseEventKind::ScrollUp => step_focused(state, -1),
        _ => {}
    }
}
