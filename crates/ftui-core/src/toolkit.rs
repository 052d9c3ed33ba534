#![forbid(unsafe_code)]

//! The host widget toolkit seam.
//!
//! Dialogs never draw anything themselves. Every visual operation goes
//! through [`Toolkit`], which a host implements on top of its own frame
//! primitives. The crate `ftui-harness` provides an in-memory implementation
//! for tests.

use crate::geometry::{Anchor, Size};

/// Opaque reference to a frame owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(pub u64);

/// Kind of frame requested from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameKind {
    /// Top-level dialog container with a backdrop.
    Dialog,
    /// Push button with a text label.
    Button,
    /// Toggle with a text label.
    CheckBox,
    /// Single-line text input with an optional side label.
    EditBox,
    /// Static text region.
    FontString,
    /// Image region.
    Texture,
    /// Small dismiss button in a dialog corner.
    CloseButton,
    /// Invisible grouping frame.
    Container,
}

/// Ambient game state consulted before a dialog is admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AmbientState {
    /// The player is dead or otherwise incapacitated.
    pub player_dead: bool,
    /// A cinematic is playing.
    pub in_cinematic: bool,
}

/// Frame operations the dialog manager consumes from the host.
///
/// Handles returned by [`Toolkit::create_frame`] stay valid for the lifetime
/// of the toolkit; frames are hidden and reused, never destroyed.
pub trait Toolkit {
    /// Create a new frame. Called only on pool misses.
    fn create_frame(&mut self, kind: FrameKind, name: &str, parent: Option<FrameHandle>)
    -> FrameHandle;

    /// Reparent a frame; `None` detaches it.
    fn set_parent(&mut self, frame: FrameHandle, parent: Option<FrameHandle>);

    fn show(&mut self, frame: FrameHandle);

    fn hide(&mut self, frame: FrameHandle);

    fn is_shown(&self, frame: FrameHandle) -> bool;

    /// Drop every anchor of a frame.
    fn clear_anchors(&mut self, frame: FrameHandle);

    /// Add an anchor to a frame.
    fn set_anchor(&mut self, frame: FrameHandle, anchor: Anchor);

    fn set_width(&mut self, frame: FrameHandle, width: f32);

    fn set_height(&mut self, frame: FrameHandle, height: f32);

    /// Current size of a frame.
    fn size(&self, frame: FrameHandle) -> Size;

    /// Set the text of a label, button, check box, or edit box.
    fn set_text(&mut self, frame: FrameHandle, text: &str);

    /// Set or clear the image of a texture region.
    fn set_texture(&mut self, frame: FrameHandle, texture: Option<&str>);

    fn set_checked(&mut self, frame: FrameHandle, checked: bool);

    /// Limit the number of characters an edit box accepts.
    fn set_max_letters(&mut self, frame: FrameHandle, max: Option<usize>);

    /// Give keyboard focus to an edit box.
    fn set_focus(&mut self, frame: FrameHandle);

    /// Rendered extent of the frame's current text at its current width.
    fn text_extent(&self, frame: FrameHandle) -> Size;

    /// Play a named sound cue.
    fn play_sound(&mut self, cue: &str);

    fn ambient(&self) -> AmbientState;

    /// The lowest visible entry of the host's own default dialog stack.
    fn bottommost_default_dialog(&self) -> Option<FrameHandle>;
}
