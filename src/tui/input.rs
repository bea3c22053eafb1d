use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Pan(Direction),
    ZoomIn,
    ZoomOut,
    AddNode,
    EditLabel,
    DeleteNode,
    DeleteEdge,
    TogglePin,
    CycleSelection,
    Save,
    ToggleHelp,
    Quit,
    Cancel,
    SubmitText,
    Backspace,
    InputChar(char),
    Noop,
}

/// Pointer gestures the controller's state machine consumes. Coordinates
/// are canvas-local cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pointer {
    Down(u16, u16),
    Drag(u16, u16),
    Up(u16, u16),
    Move(u16, u16),
    ScrollUp,
    ScrollDown,
    Other,
}

pub fn action_for_key(key: KeyEvent, text_mode: bool) -> Action {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    if text_mode {
        return match key.code {
            KeyCode::Enter => Action::SubmitText,
            KeyCode::Esc => Action::Cancel,
            KeyCode::Backspace => Action::Backspace,
            KeyCode::Left => Action::Pan(Direction::Left),
            KeyCode::Right => Action::Pan(Direction::Right),
            KeyCode::Char(c) => Action::InputChar(c),
            _ => Action::Noop,
        };
    }

    match key.code {
        KeyCode::Up => Action::Pan(Direction::Up),
        KeyCode::Down => Action::Pan(Direction::Down),
        KeyCode::Left => Action::Pan(Direction::Left),
        KeyCode::Right => Action::Pan(Direction::Right),
        KeyCode::Char('+') => Action::ZoomIn,
        KeyCode::Char('=') if key.modifiers.contains(KeyModifiers::SHIFT) => Action::ZoomIn,
        KeyCode::Char('-') => Action::ZoomOut,
        KeyCode::Tab => Action::CycleSelection,
        KeyCode::Esc => Action::Cancel,
        KeyCode::Char('n') => Action::AddNode,
        KeyCode::Char('e') => Action::EditLabel,
        KeyCode::Char('d') => Action::DeleteNode,
        KeyCode::Char('x') => Action::DeleteEdge,
        KeyCode::Char('p') => Action::TogglePin,
        KeyCode::Char('w') => Action::Save,
        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Char('q') => Action::Quit,
        _ => Action::Noop,
    }
}

pub fn pointer_for_mouse(mouse: MouseEvent) -> Pointer {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Pointer::Down(mouse.column, mouse.row),
        MouseEventKind::Drag(MouseButton::Left) => Pointer::Drag(mouse.column, mouse.row),
        MouseEventKind::Up(MouseButton::Left) => Pointer::Up(mouse.column, mouse.row),
        MouseEventKind::Moved => Pointer::Move(mouse.column, mouse.row),
        MouseEventKind::ScrollUp => Pointer::ScrollUp,
        MouseEventKind::ScrollDown => Pointer::ScrollDown,
        _ => Pointer::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn ctrl_c_quits_even_in_text_mode() {
        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(action_for_key(event, true), Action::Quit);
        assert_eq!(action_for_key(event, false), Action::Quit);
    }

    #[test]
    fn text_mode_captures_printable_characters() {
        assert_eq!(
            action_for_key(key(KeyCode::Char('q')), true),
            Action::InputChar('q'),
            "quit key must type a 'q' while editing"
        );
        assert_eq!(action_for_key(key(KeyCode::Enter), true), Action::SubmitText);
        assert_eq!(action_for_key(key(KeyCode::Esc), true), Action::Cancel);
    }

    #[test]
    fn normal_mode_bindings() {
        assert_eq!(action_for_key(key(KeyCode::Char('q')), false), Action::Quit);
        assert_eq!(
            action_for_key(key(KeyCode::Up), false),
            Action::Pan(Direction::Up)
        );
        assert_eq!(action_for_key(key(KeyCode::Char('+')), false), Action::ZoomIn);
        assert_eq!(action_for_key(key(KeyCode::Char('z')), false), Action::Noop);
    }

    #[test]
    fn mouse_translation() {
        let event = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 4,
            row: 7,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(pointer_for_mouse(event), Pointer::Down(4, 7));
    }
}
