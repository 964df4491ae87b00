//! UI events - messages from UI layer to App layer
//!
//! Key mapping doubles as the gesture surface of the bill list: it decides
//! when a key press counts as a pull-to-refresh or a load-more.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // List gestures
    PullRefresh,
    ScrollUp,
    /// Move the cursor down; `load_more` is set when the cursor is close enough to the end
    ScrollDown { load_more: bool },

    // Filters
    OpenCategoryPicker,
    OpenMonthPicker,
    PickerNext,
    PickerPrev,
    PickerConfirm,
    PickerCancel,

    // Add bill
    OpenAddBill,
    FormChar(char),
    FormBackspace,
    FormNextField,
    FormToggleKind,
    FormNextCategory,
    FormPrevCategory,
    FormSubmit,
    FormCancel,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Popup currently covering the bill list
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Popup {
    #[default]
    None,
    CategoryPicker,
    MonthPicker,
    AddBill,
    Help,
}

/// Whether a downward scroll from `selected` lands within `threshold` rows of the end
pub fn within_load_distance(selected: usize, list_len: usize, threshold: usize) -> bool {
    list_len > 0 && list_len - 1 - selected.min(list_len - 1) <= threshold
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    popup: Popup,
    list_len: usize,
    selected: usize,
    load_threshold: usize,
) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UiEvent::Quit);
    }

    match popup {
        Popup::Help => Some(UiEvent::CloseHelp),
        Popup::CategoryPicker | Popup::MonthPicker => match key.code {
            KeyCode::Esc => Some(UiEvent::PickerCancel),
            KeyCode::Enter => Some(UiEvent::PickerConfirm),
            KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::PickerPrev),
            KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::PickerNext),
            _ => None,
        },
        Popup::AddBill => match key.code {
            KeyCode::Esc => Some(UiEvent::FormCancel),
            KeyCode::Enter => Some(UiEvent::FormSubmit),
            KeyCode::Tab | KeyCode::BackTab => Some(UiEvent::FormNextField),
            KeyCode::Up | KeyCode::Down => Some(UiEvent::FormToggleKind),
            KeyCode::Left => Some(UiEvent::FormPrevCategory),
            KeyCode::Right => Some(UiEvent::FormNextCategory),
            KeyCode::Backspace => Some(UiEvent::FormBackspace),
            KeyCode::Char(c) => Some(UiEvent::FormChar(c)),
            _ => None,
        },
        Popup::None => handle_list_keys(key, list_len, selected, load_threshold),
    }
}

/// Handle keys for the bill list screen
fn handle_list_keys(
    key: KeyEvent,
    list_len: usize,
    selected: usize,
    load_threshold: usize,
) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('q') => Some(UiEvent::Quit),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        KeyCode::Char('t') => Some(UiEvent::OpenCategoryPicker),
        KeyCode::Char('m') => Some(UiEvent::OpenMonthPicker),
        KeyCode::Char('a') => Some(UiEvent::OpenAddBill),
        // No gesture surface over an empty list
        _ if list_len == 0 => None,
        KeyCode::Char('r') => Some(UiEvent::PullRefresh),
        KeyCode::Up | KeyCode::Char('k') => {
            if selected == 0 {
                Some(UiEvent::PullRefresh)
            } else {
                Some(UiEvent::ScrollUp)
            }
        }
        KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::ScrollDown {
            load_more: within_load_distance(selected + 1, list_len, load_threshold),
        }),
        _ => None,
    }
}
