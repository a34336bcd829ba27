// services/sentiment-dash/src/input.rs
//
// Key map: terminal key events to dashboard actions

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::debug;

use crate::controller::DashboardController;
use crate::state::{ActiveView, DashboardState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    SwitchView(ActiveView),
    NextView,
    PrevView,
    RefreshAll,

    // Detailed view
    CycleDepartmentFilter,
    CycleSentimentFilter,
    ClearFilters,
    ApplyFilters,

    // Submit view
    FocusNext,
    FocusPrev,
    CycleDraftDepartment { forward: bool },
    TypeChar(char),
    DeleteChar,
    Submit,
    Back,
}

/// Map a key to an action for the current view. The Submit view captures
/// printable keys for text entry, so only `Ctrl+C` quits from there.
pub fn map_key(state: &DashboardState, key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Action::Quit);
    }

    if state.view == ActiveView::Submit {
        return map_form_key(key);
    }

    let action = match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char(c @ '1'..='4') => {
            let index = c as usize - '1' as usize;
            Action::SwitchView(ActiveView::ALL[index])
        }
        KeyCode::Tab => Action::NextView,
        KeyCode::BackTab => Action::PrevView,
        KeyCode::Char('r') => Action::RefreshAll,
        _ if state.view == ActiveView::Detailed => return map_filter_key(key),
        _ => return None,
    };
    Some(action)
}

fn map_filter_key(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('d') => Some(Action::CycleDepartmentFilter),
        KeyCode::Char('s') => Some(Action::CycleSentimentFilter),
        KeyCode::Char('c') => Some(Action::ClearFilters),
        KeyCode::Char('a') | KeyCode::Enter => Some(Action::ApplyFilters),
        _ => None,
    }
}

fn map_form_key(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Esc => Some(Action::Back),
        KeyCode::Enter => Some(Action::Submit),
        KeyCode::Tab => Some(Action::FocusNext),
        KeyCode::BackTab => Some(Action::FocusPrev),
        KeyCode::Left => Some(Action::CycleDraftDepartment { forward: false }),
        KeyCode::Right => Some(Action::CycleDraftDepartment { forward: true }),
        KeyCode::Backspace => Some(Action::DeleteChar),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Action::TypeChar(c))
        }
        _ => None,
    }
}

/// Apply an action. Returns true when the dashboard should exit.
pub fn apply(controller: &mut DashboardController, action: Action) -> bool {
    debug!("Key action: {:?}", action);

    match action {
        Action::Quit => return true,
        Action::SwitchView(view) => controller.set_view(view),
        Action::NextView => {
            let next = controller.state().view.next();
            controller.set_view(next);
        }
        Action::PrevView => {
            let prev = controller.state().view.prev();
            controller.set_view(prev);
        }
        Action::RefreshAll => controller.refresh_all(),
        Action::CycleDepartmentFilter => controller.cycle_department_filter(),
        Action::CycleSentimentFilter => controller.cycle_sentiment_filter(),
        Action::ClearFilters => controller.clear_filters(),
        Action::ApplyFilters => controller.apply_filters(),
        Action::FocusNext => controller.focus_next_field(),
        Action::FocusPrev => controller.focus_prev_field(),
        Action::CycleDraftDepartment { forward } => controller.cycle_draft_department(forward),
        Action::TypeChar(c) => controller.type_char(c),
        Action::DeleteChar => controller.delete_char(),
        Action::Submit => {
            // Rejections are already surfaced as a notice.
            if let Err(err) = controller.submit() {
                debug!("Submit rejected: {}", err);
            }
        }
        Action::Back => controller.set_view(ActiveView::Overview),
    }
    false
}
