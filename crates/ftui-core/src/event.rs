#![forbid(unsafe_code)]

//! Host and widget event types.
//!
//! The host forwards its own lifecycle hooks as [`HostEvent`]s and frame
//! input as [`WidgetEvent`]s. Both derive `Clone` and `PartialEq` so tests
//! can script and compare them.

use std::time::Duration;

use crate::toolkit::FrameHandle;

/// Host-level lifecycle notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// The escape key was pressed with no text input focused.
    EscapePressed,
    /// A default host dialog became visible.
    DefaultDialogShown,
    /// A default host dialog was hidden.
    DefaultDialogHidden,
    /// The host re-stacked its default dialogs.
    DefaultDialogsRepositioned,
    /// The player died.
    PlayerDied,
    /// A cinematic started playing.
    CinematicStarted,
    /// Frame time elapsed since the previous tick.
    Tick(Duration),
}

/// Mouse button that produced a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// Host-facing name of the button.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "LeftButton",
            Self::Right => "RightButton",
            Self::Middle => "MiddleButton",
        }
    }
}

/// Input delivered to a single frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetAction {
    /// Mouse click; `pressed` is `true` on the down stroke.
    Click { button: MouseButton, pressed: bool },
    /// Enter in an edit box.
    EnterPressed,
    /// Escape in an edit box.
    EscapePressed,
    /// The text of an edit box changed.
    TextChanged(String),
}

/// A [`WidgetAction`] addressed to a host frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetEvent {
    pub frame: FrameHandle,
    pub action: WidgetAction,
}

impl WidgetEvent {
    /// Create a new widget event.
    pub fn new(frame: FrameHandle, action: WidgetAction) -> Self {
        Self { frame, action }
    }

    /// Left-button release on `frame`, the usual click.
    pub fn click(frame: FrameHandle) -> Self {
        Self::new(
            frame,
            WidgetAction::Click {
                button: MouseButton::Left,
                pressed: false,
            },
        )
    }
}
