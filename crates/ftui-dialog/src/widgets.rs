#![forbid(unsafe_code)]

//! Pooled child widgets: buttons, check boxes, and edit boxes.

use ftui_core::geometry::{Anchor, AnchorPoint, AnchorTarget, Offset};
use ftui_core::toolkit::{FrameHandle, FrameKind, Toolkit};
use ftui_layout::LayoutMetrics;

use crate::pool::{ButtonId, CheckBoxId, EditBoxId, Recyclable, WidgetBinding, WidgetKind};

/// A push button.
#[derive(Debug)]
pub struct Button {
    id: ButtonId,
    frame: FrameHandle,
    binding: Option<WidgetBinding>,
}

impl Button {
    pub fn id(&self) -> ButtonId {
        self.id
    }

    pub fn frame(&self) -> FrameHandle {
        self.frame
    }

    pub fn binding(&self) -> Option<WidgetBinding> {
        self.binding
    }

    pub(crate) fn bind(&mut self, binding: WidgetBinding) {
        self.binding = Some(binding);
    }
}

impl Recyclable for Button {
    type Id = ButtonId;
    const KIND: WidgetKind = WidgetKind::Button;

    fn construct(id: ButtonId, name: &str, tk: &mut dyn Toolkit, metrics: &LayoutMetrics) -> Self {
        let frame = tk.create_frame(FrameKind::Button, name, None);
        tk.set_width(frame, metrics.button_min_width);
        tk.set_height(frame, metrics.button_height);
        tk.hide(frame);
        Self {
            id,
            frame,
            binding: None,
        }
    }

    fn frame(&self) -> FrameHandle {
        self.frame
    }

    fn reset(&mut self, tk: &mut dyn Toolkit) {
        self.binding = None;
        tk.set_text(self.frame, "");
    }
}

/// A labelled toggle.
#[derive(Debug)]
pub struct CheckBox {
    id: CheckBoxId,
    frame: FrameHandle,
    binding: Option<WidgetBinding>,
    checked: bool,
}

impl CheckBox {
    pub fn id(&self) -> CheckBoxId {
        self.id
    }

    pub fn frame(&self) -> FrameHandle {
        self.frame
    }

    pub fn binding(&self) -> Option<WidgetBinding> {
        self.binding
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub(crate) fn bind(&mut self, binding: WidgetBinding) {
        self.binding = Some(binding);
    }

    pub(crate) fn set_checked(&mut self, tk: &mut dyn Toolkit, checked: bool) {
        self.checked = checked;
        tk.set_checked(self.frame, checked);
    }
}

impl Recyclable for CheckBox {
    type Id = CheckBoxId;
    const KIND: WidgetKind = WidgetKind::CheckBox;

    fn construct(id: CheckBoxId, name: &str, tk: &mut dyn Toolkit, metrics: &LayoutMetrics) -> Self {
        let frame = tk.create_frame(FrameKind::CheckBox, name, None);
        tk.set_width(frame, metrics.checkbox_size);
        tk.set_height(frame, metrics.checkbox_size);
        tk.hide(frame);
        Self {
            id,
            frame,
            binding: None,
            checked: false,
        }
    }

    fn frame(&self) -> FrameHandle {
        self.frame
    }

    fn reset(&mut self, tk: &mut dyn Toolkit) {
        self.binding = None;
        self.set_checked(tk, false);
        tk.set_text(self.frame, "");
    }
}

/// A single-line text input with an optional side label.
///
/// The label is a permanent child of the input, anchored to its left edge.
#[derive(Debug)]
pub struct EditBox {
    id: EditBoxId,
    frame: FrameHandle,
    label: FrameHandle,
    binding: Option<WidgetBinding>,
    text: String,
    max_letters: Option<usize>,
}

impl EditBox {
    pub fn id(&self) -> EditBoxId {
        self.id
    }

    pub fn frame(&self) -> FrameHandle {
        self.frame
    }

    /// Frame of the side label.
    pub fn label_frame(&self) -> FrameHandle {
        self.label
    }

    pub fn binding(&self) -> Option<WidgetBinding> {
        self.binding
    }

    /// Current input text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn max_letters(&self) -> Option<usize> {
        self.max_letters
    }

    pub(crate) fn bind(&mut self, binding: WidgetBinding) {
        self.binding = Some(binding);
    }

    pub(crate) fn set_max_letters(&mut self, tk: &mut dyn Toolkit, max: Option<usize>) {
        self.max_letters = max;
        tk.set_max_letters(self.frame, max);
        if let Some(max) = max
            && self.truncate(max)
        {
            tk.set_text(self.frame, &self.text);
        }
    }

    /// Store and display `text`, clamped to the letter limit.
    ///
    /// Returns whether the stored text changed.
    pub(crate) fn set_text(&mut self, tk: &mut dyn Toolkit, text: &str) -> bool {
        let clamped: String = match self.max_letters {
            Some(max) => text.chars().take(max).collect(),
            None => text.to_string(),
        };
        if clamped == self.text {
            return false;
        }
        self.text = clamped;
        tk.set_text(self.frame, &self.text);
        true
    }

    /// Show `label` beside the input, or hide the label when empty.
    ///
    /// Returns the rendered label width, `0` when hidden.
    pub(crate) fn set_label(&mut self, tk: &mut dyn Toolkit, label: Option<&str>) -> f32 {
        match label.filter(|l| !l.is_empty()) {
            Some(label) => {
                tk.set_text(self.label, label);
                tk.show(self.label);
                tk.text_extent(self.label).width
            }
            None => {
                tk.set_text(self.label, "");
                tk.hide(self.label);
                0.0
            }
        }
    }

    fn truncate(&mut self, max: usize) -> bool {
        match self.text.char_indices().nth(max) {
            Some((byte, _)) => {
                self.text.truncate(byte);
                true
            }
            None => false,
        }
    }
}

impl Recyclable for EditBox {
    type Id = EditBoxId;
    const KIND: WidgetKind = WidgetKind::EditBox;

    fn construct(id: EditBoxId, name: &str, tk: &mut dyn Toolkit, metrics: &LayoutMetrics) -> Self {
        let frame = tk.create_frame(FrameKind::EditBox, name, None);
        tk.set_width(frame, metrics.editbox_width);
        tk.set_height(frame, metrics.editbox_height);

        let label = tk.create_frame(FrameKind::FontString, &format!("{name}Label"), Some(frame));
        tk.set_anchor(
            label,
            Anchor::new(
                AnchorPoint::Right,
                AnchorTarget::Frame(frame),
                AnchorPoint::Left,
                Offset::new(-metrics.editbox_label_gap, 0.0),
            ),
        );
        tk.hide(label);
        tk.hide(frame);

        Self {
            id,
            frame,
            label,
            binding: None,
            text: String::new(),
            max_letters: None,
        }
    }

    fn frame(&self) -> FrameHandle {
        self.frame
    }

    fn reset(&mut self, tk: &mut dyn Toolkit) {
        self.binding = None;
        self.text.clear();
        self.max_letters = None;
        tk.set_text(self.frame, "");
        tk.set_max_letters(self.frame, None);
        tk.set_text(self.label, "");
        tk.hide(self.label);
    }
}
