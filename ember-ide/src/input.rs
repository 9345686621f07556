//! Keyboard input mapping
//!
//! winit key events are first reduced to a small `Key` + `Modifiers` model,
//! then mapped to editor `Command`s. The mapping itself is pure so the
//! bindings can be tested without a window.

use winit::keyboard::{Key as WinitKey, ModifiersState, NamedKey};

/// Spaces inserted by Tab
pub const INDENT: &str = "    ";

/// Keys the editor reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Delete,
    Escape,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

/// Keyboard modifiers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    /// Ctrl, or Cmd on macOS
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub fn from_winit(state: ModifiersState) -> Self {
        #[cfg(target_os = "macos")]
        let ctrl = state.super_key() || state.control_key();
        #[cfg(not(target_os = "macos"))]
        let ctrl = state.control_key();

        Self {
            shift: state.shift_key(),
            ctrl,
            alt: state.alt_key(),
        }
    }
}

/// Cursor motions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
}

/// Everything a key press can ask the editor to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    InsertChar(char),
    Indent,
    Newline,
    Backspace,
    Delete,
    Move { motion: Motion, extend: bool },
    ScrollPage(i32),
    ClearSelection,
    SelectAll,
    Cut,
    Copy,
    Paste,
    Undo,
    Redo,
    Save,
    Load,
    CompileAndRun,
    NewDocument,
    ToggleTheme,
}

/// Reduce a winit logical key to the editor's key model
pub fn key_from_winit(key: &WinitKey) -> Option<Key> {
    match key {
        WinitKey::Named(named) => match named {
            NamedKey::Enter => Some(Key::Enter),
            NamedKey::Tab => Some(Key::Tab),
            NamedKey::Space => Some(Key::Char(' ')),
            NamedKey::Backspace => Some(Key::Backspace),
            NamedKey::Delete => Some(Key::Delete),
            NamedKey::Escape => Some(Key::Escape),
            NamedKey::ArrowUp => Some(Key::Up),
            NamedKey::ArrowDown => Some(Key::Down),
            NamedKey::ArrowLeft => Some(Key::Left),
            NamedKey::ArrowRight => Some(Key::Right),
            NamedKey::Home => Some(Key::Home),
            NamedKey::End => Some(Key::End),
            NamedKey::PageUp => Some(Key::PageUp),
            NamedKey::PageDown => Some(Key::PageDown),
            _ => None,
        },
        WinitKey::Character(s) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Key::Char(c)),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Map a key press to a command
pub fn map_key(key: Key, mods: Modifiers) -> Option<Command> {
    let extend = mods.shift;
    let motion = |motion| Some(Command::Move { motion, extend });

    match key {
        Key::Char(c) if mods.ctrl && !mods.alt => map_ctrl_char(c, mods.shift),
        Key::Char(c) if c.is_control() => None,
        Key::Char(c) => Some(Command::InsertChar(c)),
        Key::Enter => Some(Command::Newline),
        Key::Tab => Some(Command::Indent),
        Key::Backspace => Some(Command::Backspace),
        Key::Delete => Some(Command::Delete),
        Key::Escape => Some(Command::ClearSelection),
        Key::Left => motion(Motion::Left),
        Key::Right => motion(Motion::Right),
        Key::Up => motion(Motion::Up),
        Key::Down => motion(Motion::Down),
        Key::Home => motion(Motion::Home),
        Key::End => motion(Motion::End),
        Key::PageUp => Some(Command::ScrollPage(-1)),
        Key::PageDown => Some(Command::ScrollPage(1)),
    }
}

fn map_ctrl_char(c: char, shift: bool) -> Option<Command> {
    match (c.to_ascii_lowercase(), shift) {
        ('s', _) => Some(Command::Save),
        ('o', _) => Some(Command::Load),
        ('b', _) => Some(Command::CompileAndRun),
        ('a', _) => Some(Command::SelectAll),
        ('x', _) => Some(Command::Cut),
        ('c', _) => Some(Command::Copy),
        ('v', _) => Some(Command::Paste),
        ('z', false) => Some(Command::Undo),
        ('z', true) | ('y', _) => Some(Command::Redo),
        ('n', _) => Some(Command::NewDocument),
        ('t', _) => Some(Command::ToggleTheme),
        _ => None,
    }
}
