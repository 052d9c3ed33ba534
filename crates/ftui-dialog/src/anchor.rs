#![forbid(unsafe_code)]

//! Vertical stacking of active dialogs.
//!
//! The first active dialog hangs below the lowest visible host dialog, or
//! at a fixed offset from the top of the screen when there is none. Every
//! later dialog hangs below its predecessor.

use ftui_core::geometry::{Anchor, Offset};
use ftui_core::toolkit::{FrameHandle, Toolkit};

/// Anchor for a dialog placed below `above`, or at `fallback` from the top
/// of the screen.
pub fn stack_anchor(above: Option<FrameHandle>, fallback: Offset) -> Anchor {
    match above {
        Some(frame) => Anchor::below(frame),
        None => Anchor::screen_top(fallback),
    }
}

/// Re-anchor every frame in `stack`, top to bottom.
pub fn restack(tk: &mut dyn Toolkit, stack: &[FrameHandle], fallback: Offset) {
    let mut above = tk.bottommost_default_dialog();
    for &frame in stack {
        tk.clear_anchors(frame);
        tk.set_anchor(frame, stack_anchor(above, fallback));
        above = Some(frame);
    }
}
