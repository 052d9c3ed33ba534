#![forbid(unsafe_code)]

//! In-memory host toolkit for testing dialogs.
//!
//! [`HeadlessToolkit`] implements [`Toolkit`] by recording every frame
//! operation. Clones share state, so a test can hand one clone to the
//! dialog manager and keep another to inspect frames, script ambient state,
//! or push host dialogs.
//!
//! Text is measured as monospace: each terminal column of a string (per
//! `unicode-width`) is [`GLYPH_WIDTH`] units wide and each line
//! [`LINE_HEIGHT`] tall. Text labels ([`FrameKind::FontString`]) wrap at
//! their width; every other frame reports a single line.
//!
//! ```
//! use ftui_core::toolkit::{FrameKind, Toolkit};
//! use ftui_harness::HeadlessToolkit;
//!
//! let mut tk = HeadlessToolkit::new();
//! let probe = tk.clone();
//! let label = tk.create_frame(FrameKind::FontString, "Label", None);
//! tk.set_text(label, "Hello");
//! assert_eq!(probe.text_of(label).as_deref(), Some("Hello"));
//! assert_eq!(probe.text_extent(label).width, 30.0);
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt::Write as FmtWrite;
use std::rc::Rc;

use ftui_core::geometry::{Anchor, AnchorTarget, Rect, Size};
use ftui_core::toolkit::{AmbientState, FrameHandle, FrameKind, Toolkit};
use unicode_width::UnicodeWidthStr;

/// Width of one text column.
pub const GLYPH_WIDTH: f32 = 6.0;
/// Height of one line of text.
pub const LINE_HEIGHT: f32 = 12.0;
/// Screen size used to resolve anchors.
pub const SCREEN: Size = Size::new(1024.0, 768.0);

/// Everything recorded about one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRecord {
    pub kind: FrameKind,
    pub name: String,
    pub parent: Option<FrameHandle>,
    pub shown: bool,
    pub anchors: Vec<Anchor>,
    pub size: Size,
    pub text: String,
    pub texture: Option<String>,
    pub checked: bool,
    pub max_letters: Option<usize>,
}

impl FrameRecord {
    fn new(kind: FrameKind, name: &str, parent: Option<FrameHandle>) -> Self {
        Self {
            kind,
            name: name.to_string(),
            parent,
            shown: true,
            anchors: Vec::new(),
            size: Size::ZERO,
            text: String::new(),
            texture: None,
            checked: false,
            max_letters: None,
        }
    }
}

#[derive(Debug, Default)]
struct HeadlessState {
    frames: BTreeMap<FrameHandle, FrameRecord>,
    next_handle: u64,
    sounds: Vec<String>,
    ambient: AmbientState,
    default_dialogs: Vec<FrameHandle>,
    focus: Option<FrameHandle>,
    created: usize,
}

/// Recording [`Toolkit`] with shared, inspectable state.
#[derive(Debug, Clone, Default)]
pub struct HeadlessToolkit {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessToolkit {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Scripting ───────────────────────────────────────────────────────

    pub fn set_ambient(&self, ambient: AmbientState) {
        self.state.borrow_mut().ambient = ambient;
    }

    /// Show a host default dialog below the ones already shown.
    pub fn push_default_dialog(&self, frame: FrameHandle) {
        self.state.borrow_mut().default_dialogs.push(frame);
    }

    /// Hide the lowest host default dialog.
    pub fn pop_default_dialog(&self) -> Option<FrameHandle> {
        self.state.borrow_mut().default_dialogs.pop()
    }

    // ── Inspection ──────────────────────────────────────────────────────

    pub fn frame(&self, frame: FrameHandle) -> Option<FrameRecord> {
        self.state.borrow().frames.get(&frame).cloned()
    }

    pub fn frame_name(&self, frame: FrameHandle) -> Option<String> {
        self.with_frame(frame, |r| r.name.clone())
    }

    pub fn parent_of(&self, frame: FrameHandle) -> Option<FrameHandle> {
        self.with_frame(frame, |r| r.parent).flatten()
    }

    pub fn anchors_of(&self, frame: FrameHandle) -> Vec<Anchor> {
        self.with_frame(frame, |r| r.anchors.clone()).unwrap_or_default()
    }

    pub fn text_of(&self, frame: FrameHandle) -> Option<String> {
        self.with_frame(frame, |r| r.text.clone())
    }

    pub fn texture_of(&self, frame: FrameHandle) -> Option<String> {
        self.with_frame(frame, |r| r.texture.clone()).flatten()
    }

    pub fn is_checked(&self, frame: FrameHandle) -> bool {
        self.with_frame(frame, |r| r.checked).unwrap_or(false)
    }

    pub fn max_letters_of(&self, frame: FrameHandle) -> Option<usize> {
        self.with_frame(frame, |r| r.max_letters).flatten()
    }

    /// Sound cues played so far, oldest first.
    pub fn sounds(&self) -> Vec<String> {
        self.state.borrow().sounds.clone()
    }

    pub fn clear_sounds(&self) {
        self.state.borrow_mut().sounds.clear();
    }

    pub fn focused(&self) -> Option<FrameHandle> {
        self.state.borrow().focus
    }

    /// Number of frames ever created.
    pub fn frames_created(&self) -> usize {
        self.state.borrow().created
    }

    /// Find a frame by name.
    pub fn find(&self, name: &str) -> Option<FrameHandle> {
        self.state
            .borrow()
            .frames
            .iter()
            .find(|(_, r)| r.name == name)
            .map(|(&h, _)| h)
    }

    /// Screen rectangle of a frame, following its first anchor.
    ///
    /// Unanchored frames sit at their parent's top-left corner, or at the
    /// screen origin without a parent.
    pub fn resolve(&self, frame: FrameHandle) -> Rect {
        let state = self.state.borrow();
        resolve_in(&state, frame, 0)
    }

    /// Text dump of every visible frame tree, roots in creation order.
    ///
    /// One line per frame: indentation by depth, name, resolved rectangle,
    /// and text when present. Meant for snapshot-style assertions.
    pub fn dump(&self) -> String {
        let state = self.state.borrow();
        let mut out = String::new();
        for (&handle, record) in &state.frames {
            if record.parent.is_none() && record.shown {
                dump_tree(&state, handle, 0, &mut out);
            }
        }
        out
    }

    fn with_frame<R>(&self, frame: FrameHandle, f: impl FnOnce(&FrameRecord) -> R) -> Option<R> {
        self.state.borrow().frames.get(&frame).map(f)
    }

    fn update(&mut self, frame: FrameHandle, f: impl FnOnce(&mut FrameRecord)) {
        if let Some(record) = self.state.borrow_mut().frames.get_mut(&frame) {
            f(record);
        }
    }
}

const MAX_ANCHOR_DEPTH: usize = 64;

fn resolve_in(state: &HeadlessState, frame: FrameHandle, depth: usize) -> Rect {
    let Some(record) = state.frames.get(&frame) else {
        return Rect::default();
    };
    if depth > MAX_ANCHOR_DEPTH {
        return Rect::from_size(record.size);
    }
    let Some(anchor) = record.anchors.first() else {
        return match record.parent {
            Some(parent) => {
                let p = resolve_in(state, parent, depth + 1);
                Rect::new(p.x, p.y, record.size.width, record.size.height)
            }
            None => Rect::from_size(record.size),
        };
    };
    let target = match anchor.target {
        AnchorTarget::Screen => Rect::from_size(SCREEN),
        AnchorTarget::Frame(target) => resolve_in(state, target, depth + 1),
    };
    Rect::placed(
        record.size,
        anchor.point,
        target.point(anchor.relative_point),
        anchor.offset,
    )
}

fn dump_tree(state: &HeadlessState, frame: FrameHandle, depth: usize, out: &mut String) {
    let Some(record) = state.frames.get(&frame) else {
        return;
    };
    let r = resolve_in(state, frame, 0);
    let _ = write!(
        out,
        "{:indent$}{} [{:.0},{:.0} {:.0}x{:.0}]",
        "",
        record.name,
        r.x,
        r.y,
        r.width,
        r.height,
        indent = depth * 2
    );
    if !record.text.is_empty() {
        let _ = write!(out, " {:?}", record.text);
    }
    out.push('\n');
    for (&child, rec) in &state.frames {
        if rec.parent == Some(frame) && rec.shown {
            dump_tree(state, child, depth + 1, out);
        }
    }
}

/// Number of lines `text` occupies when wrapped at `width` columns.
fn wrapped_lines(text: &str, columns: usize) -> usize {
    text.split('\n')
        .map(|line| {
            let w = line.width();
            if columns == 0 || w == 0 {
                1
            } else {
                w.div_ceil(columns)
            }
        })
        .sum()
}

impl Toolkit for HeadlessToolkit {
    fn create_frame(
        &mut self,
        kind: FrameKind,
        name: &str,
        parent: Option<FrameHandle>,
    ) -> FrameHandle {
        let mut state = self.state.borrow_mut();
        state.next_handle += 1;
        state.created += 1;
        let handle = FrameHandle(state.next_handle);
        state
            .frames
            .insert(handle, FrameRecord::new(kind, name, parent));
        handle
    }

    fn set_parent(&mut self, frame: FrameHandle, parent: Option<FrameHandle>) {
        self.update(frame, |r| r.parent = parent);
    }

    fn show(&mut self, frame: FrameHandle) {
        self.update(frame, |r| r.shown = true);
    }

    fn hide(&mut self, frame: FrameHandle) {
        self.update(frame, |r| r.shown = false);
        let mut state = self.state.borrow_mut();
        if state.focus == Some(frame) {
            state.focus = None;
        }
    }

    fn is_shown(&self, frame: FrameHandle) -> bool {
        self.with_frame(frame, |r| r.shown).unwrap_or(false)
    }

    fn clear_anchors(&mut self, frame: FrameHandle) {
        self.update(frame, |r| r.anchors.clear());
    }

    fn set_anchor(&mut self, frame: FrameHandle, anchor: Anchor) {
        self.update(frame, |r| r.anchors.push(anchor));
    }

    fn set_width(&mut self, frame: FrameHandle, width: f32) {
        self.update(frame, |r| r.size.width = width);
    }

    fn set_height(&mut self, frame: FrameHandle, height: f32) {
        self.update(frame, |r| r.size.height = height);
    }

    fn size(&self, frame: FrameHandle) -> Size {
        self.with_frame(frame, |r| r.size).unwrap_or_default()
    }

    fn set_text(&mut self, frame: FrameHandle, text: &str) {
        self.update(frame, |r| text.clone_into(&mut r.text));
    }

    fn set_texture(&mut self, frame: FrameHandle, texture: Option<&str>) {
        self.update(frame, |r| r.texture = texture.map(str::to_string));
    }

    fn set_checked(&mut self, frame: FrameHandle, checked: bool) {
        self.update(frame, |r| r.checked = checked);
    }

    fn set_max_letters(&mut self, frame: FrameHandle, max: Option<usize>) {
        self.update(frame, |r| r.max_letters = max);
    }

    fn set_focus(&mut self, frame: FrameHandle) {
        self.state.borrow_mut().focus = Some(frame);
    }

    fn text_extent(&self, frame: FrameHandle) -> Size {
        self.with_frame(frame, |r| {
            if r.text.is_empty() {
                return Size::ZERO;
            }
            let columns = r.text.split('\n').map(|line| line.width()).max().unwrap_or(0);
            let natural = columns as f32 * GLYPH_WIDTH;
            if r.kind == FrameKind::FontString && r.size.width > 0.0 && natural > r.size.width {
                let per_line = (r.size.width / GLYPH_WIDTH).floor().max(1.0) as usize;
                let lines = wrapped_lines(&r.text, per_line);
                Size::new(r.size.width, lines as f32 * LINE_HEIGHT)
            } else {
                let lines = r.text.split('\n').count();
                Size::new(natural, lines as f32 * LINE_HEIGHT)
            }
        })
        .unwrap_or_default()
    }

    fn play_sound(&mut self, cue: &str) {
        self.state.borrow_mut().sounds.push(cue.to_string());
    }

    fn ambient(&self) -> AmbientState {
        self.state.borrow().ambient
    }

    fn bottommost_default_dialog(&self) -> Option<FrameHandle> {
        let state = self.state.borrow();
        state
            .default_dialogs
            .iter()
            .rev()
            .copied()
            .find(|f| state.frames.get(f).is_some_and(|r| r.shown))
    }
}
