#![forbid(unsafe_code)]

//! The pooled dialog frame.

use std::rc::Rc;
use std::time::Duration;

use ftui_core::geometry::{Anchor, AnchorPoint, Offset, Size};
use ftui_core::toolkit::{FrameHandle, FrameKind, Toolkit};
use ftui_layout::{
    EditBoxMetrics, LayoutMetrics, LayoutSnapshot, Sizing, content_height, plan_width,
};

use crate::delegate::Delegate;
use crate::payload::Payload;
use crate::pool::{ButtonId, CheckBoxId, DialogId, EditBoxId, Recyclable, WidgetKind};

/// A dialog instance.
///
/// The text label, icon, close control, and check box container are
/// permanent children created with the dialog. Buttons, check boxes, and
/// edit boxes are borrowed from their pools for one use and recorded here in
/// attachment order.
#[derive(Debug)]
pub struct Dialog {
    id: DialogId,
    frame: FrameHandle,
    text: FrameHandle,
    icon: FrameHandle,
    close: FrameHandle,
    checkbox_container: FrameHandle,
    default_size: Size,
    default_text_width: f32,
    generation: u64,
    delegate: Option<Rc<Delegate>>,
    data: Payload,
    pub(crate) buttons: Vec<ButtonId>,
    pub(crate) checkboxes: Vec<CheckBoxId>,
    pub(crate) editboxes: Vec<EditBoxId>,
    pub(crate) editbox_metrics: Vec<EditBoxMetrics>,
    pub(crate) icon_shown: bool,
    pub(crate) elapsed: Duration,
    pub(crate) closing: bool,
}

impl Dialog {
    pub fn id(&self) -> DialogId {
        self.id
    }

    /// Root frame.
    pub fn frame(&self) -> FrameHandle {
        self.frame
    }

    /// Frame of the text label.
    pub fn text_frame(&self) -> FrameHandle {
        self.text
    }

    pub fn icon_frame(&self) -> FrameHandle {
        self.icon
    }

    pub fn close_frame(&self) -> FrameHandle {
        self.close
    }

    pub fn checkbox_container(&self) -> FrameHandle {
        self.checkbox_container
    }

    /// Bumped every time the dialog is bound to a delegate.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn delegate(&self) -> Option<&Rc<Delegate>> {
        self.delegate.as_ref()
    }

    pub fn data(&self) -> &Payload {
        &self.data
    }

    pub fn buttons(&self) -> &[ButtonId] {
        &self.buttons
    }

    pub fn checkboxes(&self) -> &[CheckBoxId] {
        &self.checkboxes
    }

    pub fn editboxes(&self) -> &[EditBoxId] {
        &self.editboxes
    }

    pub fn icon_shown(&self) -> bool {
        self.icon_shown
    }

    /// Time shown so far, as accumulated from host ticks.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Whether the dialog is in the middle of hiding.
    pub fn is_closing(&self) -> bool {
        self.closing
    }

    /// Bind a delegate and payload, starting a new generation.
    pub(crate) fn bind(&mut self, delegate: Rc<Delegate>, data: Payload) -> u64 {
        self.generation += 1;
        self.delegate = Some(delegate);
        self.data = data;
        self.generation
    }

    /// Show the icon with `texture`, or hide it.
    pub(crate) fn set_icon(&mut self, tk: &mut dyn Toolkit, texture: Option<&str>) {
        tk.set_texture(self.icon, texture);
        if texture.is_some() {
            tk.show(self.icon);
        } else {
            tk.hide(self.icon);
        }
        self.icon_shown = texture.is_some();
    }

    /// Recompute width and height from the delegate hints and the attached
    /// widgets. Non-positive results leave the current dimension untouched.
    pub(crate) fn resize(&self, tk: &mut dyn Toolkit, metrics: &LayoutMetrics) {
        let Some(delegate) = &self.delegate else {
            return;
        };
        let _span = ftui_core::debug_span!(
            "dialog_resize",
            dialog = self.id.index(),
            buttons = self.buttons.len(),
            editboxes = self.editboxes.len(),
            checkboxes = self.checkboxes.len()
        )
        .entered();

        let snap = LayoutSnapshot {
            width_hint: delegate.width_hint(),
            height_hint: delegate.height_hint(),
            static_size: delegate.is_static_size(),
            button_count: self.buttons.len(),
            editboxes: self.editbox_metrics.clone(),
            checkbox_count: self.checkboxes.len(),
            icon_shown: self.icon_shown,
        };

        let (width, height) = match plan_width(metrics, &snap) {
            Sizing::Static { width, height } => (width, height.unwrap_or(0.0)),
            Sizing::Auto { width, text_width } => {
                if text_width > 0.0 {
                    tk.set_width(self.text, text_width);
                }
                let text_height = tk.text_extent(self.text).height;
                (width, content_height(metrics, &snap, text_height))
            }
        };

        if width > 0.0 {
            tk.set_width(self.frame, width);
        }
        if height > 0.0 {
            tk.set_height(self.frame, height);
        }
        ftui_core::trace!(width, height, "dialog resized");
    }
}

impl Recyclable for Dialog {
    type Id = DialogId;
    const KIND: WidgetKind = WidgetKind::Dialog;

    fn construct(id: DialogId, name: &str, tk: &mut dyn Toolkit, metrics: &LayoutMetrics) -> Self {
        let default_size = Size::new(metrics.default_width, metrics.default_height);
        let default_text_width = metrics.default_width - metrics.text_side_margin;
        let frame = tk.create_frame(FrameKind::Dialog, name, None);
        tk.set_width(frame, default_size.width);
        tk.set_height(frame, default_size.height);

        let text = tk.create_frame(FrameKind::FontString, &format!("{name}Text"), Some(frame));
        tk.set_width(text, default_text_width);
        tk.set_anchor(
            text,
            Anchor::inside(
                AnchorPoint::Top,
                frame,
                Offset::new(0.0, -metrics.text_margin / 2.0),
            ),
        );

        let icon = tk.create_frame(FrameKind::Texture, &format!("{name}Icon"), Some(frame));
        tk.set_width(icon, metrics.icon_size);
        tk.set_height(icon, metrics.icon_size);
        tk.set_anchor(
            icon,
            Anchor::inside(
                AnchorPoint::Left,
                frame,
                Offset::new(metrics.icon_left_offset, 0.0),
            ),
        );
        tk.hide(icon);

        let close = tk.create_frame(FrameKind::CloseButton, &format!("{name}Close"), Some(frame));
        tk.set_width(close, metrics.close_button_size);
        tk.set_height(close, metrics.close_button_size);
        tk.set_anchor(
            close,
            Anchor::inside(
                AnchorPoint::TopRight,
                frame,
                Offset::new(-metrics.close_button_inset, -metrics.close_button_inset),
            ),
        );

        let checkbox_container = tk.create_frame(
            FrameKind::Container,
            &format!("{name}CheckBoxes"),
            Some(frame),
        );
        tk.hide(checkbox_container);
        tk.hide(frame);

        Self {
            id,
            frame,
            text,
            icon,
            close,
            checkbox_container,
            default_size,
            default_text_width,
            generation: 0,
            delegate: None,
            data: Payload::none(),
            buttons: Vec::new(),
            checkboxes: Vec::new(),
            editboxes: Vec::new(),
            editbox_metrics: Vec::new(),
            icon_shown: false,
            elapsed: Duration::ZERO,
            closing: false,
        }
    }

    fn frame(&self) -> FrameHandle {
        self.frame
    }

    fn reset(&mut self, tk: &mut dyn Toolkit) {
        self.delegate = None;
        self.data = Payload::none();
        self.buttons.clear();
        self.checkboxes.clear();
        self.editboxes.clear();
        self.editbox_metrics.clear();
        self.elapsed = Duration::ZERO;
        self.closing = false;

        // Static-size layouts only write positive hints, so start from the
        // construction geometry.
        tk.set_width(self.frame, self.default_size.width);
        tk.set_height(self.frame, self.default_size.height);
        tk.set_width(self.text, self.default_text_width);
        tk.set_text(self.text, "");
        self.set_icon(tk, None);
        tk.show(self.close);
        tk.clear_anchors(self.checkbox_container);
        tk.hide(self.checkbox_container);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::PoolId;
    use ftui_harness::HeadlessToolkit;

    fn dialog(tk: &mut HeadlessToolkit) -> Dialog {
        Dialog::construct(DialogId::from_index(0), "FtuiDialog1", tk, &LayoutMetrics::default())
    }

    #[test]
    fn construct_creates_permanent_children() {
        let mut tk = HeadlessToolkit::new();
        let d = dialog(&mut tk);
        assert_eq!(tk.frame_name(d.text_frame()).as_deref(), Some("FtuiDialog1Text"));
        assert_eq!(tk.parent_of(d.close_frame()), Some(d.frame()));
        assert!(!tk.is_shown(d.frame()));
        assert!(!tk.is_shown(d.icon_frame()));
    }

    #[test]
    fn bind_bumps_generation() {
        let mut tk = HeadlessToolkit::new();
        let mut d = dialog(&mut tk);
        let g1 = d.bind(Rc::new(Delegate::new("a")), Payload::none());
        let g2 = d.bind(Rc::new(Delegate::new("b")), Payload::new(1u8));
        assert_eq!(g2, g1 + 1);
        assert_eq!(d.data().get::<u8>(), Some(&1));
    }

    #[test]
    fn resize_default_dialog() {
        let mut tk = HeadlessToolkit::new();
        let mut d = dialog(&mut tk);
        d.bind(Rc::new(Delegate::new("Hello")), Payload::none());
        tk.set_text(d.text_frame(), "Hello");
        d.resize(&mut tk, &LayoutMetrics::default());

        let text_height = tk.text_extent(d.text_frame()).height;
        assert_eq!(tk.size(d.frame()).width, 320.0);
        assert_eq!(tk.size(d.frame()).height, 32.0 + text_height);
        assert_eq!(tk.size(d.text_frame()).width, 260.0);
    }

    #[test]
    fn static_size_skips_non_positive() {
        let mut tk = HeadlessToolkit::new();
        let mut d = dialog(&mut tk);
        d.bind(
            Rc::new(Delegate::new("x").width(500.0).height(0.0).static_size()),
            Payload::none(),
        );
        d.resize(&mut tk, &LayoutMetrics::default());
        assert_eq!(tk.size(d.frame()).width, 500.0);
        assert_eq!(tk.size(d.frame()).height, 72.0);
    }

    #[test]
    fn unbound_resize_is_noop() {
        let mut tk = HeadlessToolkit::new();
        let d = dialog(&mut tk);
        d.resize(&mut tk, &LayoutMetrics::default());
        assert_eq!(tk.size(d.frame()).width, 320.0);
    }

    #[test]
    fn reset_drops_binding() {
        let mut tk = HeadlessToolkit::new();
        let mut d = dialog(&mut tk);
        d.bind(Rc::new(Delegate::new("x").icon("Interface/Icon")), Payload::new(3));
        d.set_icon(&mut tk, Some("Interface/Icon"));
        d.closing = true;
        d.reset(&mut tk);
        assert!(d.delegate().is_none());
        assert!(d.data().is_none());
        assert!(!d.icon_shown());
        assert!(!d.is_closing());
        assert_eq!(tk.texture_of(d.icon_frame()), None);
    }

    #[test]
    fn reset_restores_default_geometry() {
        let mut tk = HeadlessToolkit::new();
        let mut d = dialog(&mut tk);
        d.bind(Rc::new(Delegate::new("x").icon("Interface/Icon")), Payload::none());
        d.set_icon(&mut tk, Some("Interface/Icon"));
        d.editbox_metrics.push(EditBoxMetrics::default());
        d.editbox_metrics.push(EditBoxMetrics::default());
        tk.set_text(d.text_frame(), "Hello");
        d.resize(&mut tk, &LayoutMetrics::default());
        assert_ne!(tk.size(d.frame()).height, 72.0);
        assert_ne!(tk.size(d.text_frame()).width, 260.0);

        d.reset(&mut tk);
        assert_eq!(tk.size(d.frame()), Size::new(320.0, 72.0));
        assert_eq!(tk.size(d.text_frame()).width, 260.0);
    }
}
