#![forbid(unsafe_code)]

//! Dialog layout.
//!
//! Sizing is computed from a [`LayoutSnapshot`] of the widgets attached to a
//! dialog, in two steps because the text label wraps:
//!
//! 1. [`plan_width`] decides the dialog width and the width of the text
//!    label (or reports a static size).
//! 2. The caller applies the text width, measures the wrapped text, and
//!    passes its height to [`content_height`].
//!
//! ```
//! use ftui_layout::{LayoutMetrics, LayoutSnapshot, Sizing, content_height, plan_width};
//!
//! let metrics = LayoutMetrics::default();
//! let snap = LayoutSnapshot { button_count: 3, ..LayoutSnapshot::default() };
//!
//! let Sizing::Auto { width, text_width } = plan_width(&metrics, &snap) else {
//!     unreachable!()
//! };
//! assert_eq!(width, 440.0);
//! assert_eq!(text_width, 380.0);
//! assert_eq!(content_height(&metrics, &snap, 12.0), 32.0 + 12.0 + 21.0 + 8.0);
//! ```
//!
//! Child placement helpers ([`first_button_offset`], [`editbox_offset`], ...)
//! are used when a dialog is built, not on every resize.

pub mod metrics;

pub use ftui_core::geometry::{Offset, Size};
pub use metrics::LayoutMetrics;

/// Measurements of one attached edit box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EditBoxMetrics {
    /// Width of the input field.
    pub width: f32,
    /// Rendered width of its side label, `0` when it has none.
    pub label_width: f32,
}

impl EditBoxMetrics {
    /// Whether a side label is shown.
    #[inline]
    pub fn has_label(&self) -> bool {
        self.label_width > 0.0
    }
}

/// Everything the layout engine needs to know about a dialog.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutSnapshot {
    pub width_hint: Option<f32>,
    pub height_hint: Option<f32>,
    /// Skip auto-layout and use the hints verbatim.
    pub static_size: bool,
    pub button_count: usize,
    pub editboxes: Vec<EditBoxMetrics>,
    pub checkbox_count: usize,
    /// An icon is attached and visible.
    pub icon_shown: bool,
}

/// Outcome of [`plan_width`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sizing {
    /// Static size. Non-positive values leave the dimension unchanged.
    Static { width: f32, height: Option<f32> },
    /// Auto-layout. The height follows from [`content_height`].
    Auto { width: f32, text_width: f32 },
}

/// Decide the dialog width and the text label width.
pub fn plan_width(metrics: &LayoutMetrics, snap: &LayoutSnapshot) -> Sizing {
    let base = snap.width_hint.unwrap_or(metrics.default_width);

    if snap.static_size {
        return Sizing::Static {
            width: base,
            height: snap.height_hint,
        };
    }

    let mut width = base;
    if snap.button_count == metrics.max_buttons {
        width = metrics.wide_width;
    } else {
        for eb in &snap.editboxes {
            width = fit_editbox(metrics, base, width, eb);
        }
    }

    let text_width = if snap.icon_shown {
        let pad = metrics.icon_padding();
        width += pad;
        width - 2.0 * pad
    } else {
        width - metrics.text_side_margin
    };

    Sizing::Auto { width, text_width }
}

/// Widen `width` until `eb` and its label fit inside the dialog.
fn fit_editbox(metrics: &LayoutMetrics, base: f32, mut width: f32, eb: &EditBoxMetrics) -> f32 {
    if eb.width > metrics.editbox_width {
        width = width.max(base + eb.width - metrics.editbox_width);
    }

    let shift = editbox_shift(metrics, eb);

    if eb.has_label() {
        let box_left = width / 2.0 + shift - eb.width / 2.0;
        let label_left = box_left - metrics.editbox_label_gap - eb.label_width;
        if label_left < metrics.editbox_side_padding {
            width += 2.0 * (metrics.editbox_side_padding - label_left);
        }
    }

    // Widening by 2d moves a centered box d to the right, so the gap to the
    // right edge grows by d.
    let limit = width - metrics.editbox_overflow_tolerance;
    let box_right = width / 2.0 + shift + eb.width / 2.0;
    if box_right > limit {
        width += 2.0 * (box_right - limit);
    }

    width
}

/// Final dialog height once the text label has been measured.
pub fn content_height(metrics: &LayoutMetrics, snap: &LayoutSnapshot, text_height: f32) -> f32 {
    let mut height = metrics.text_margin + text_height;
    if snap.button_count > 0 {
        height += metrics.button_height + metrics.button_gap;
    }
    height += metrics.editbox_height * snap.editboxes.len() as f32;
    height += metrics.checkbox_size * snap.checkbox_count as f32;
    height
}

/// Offset of the first button from the dialog's bottom edge.
///
/// `count` is clamped to `1..=3`.
pub fn first_button_offset(metrics: &LayoutMetrics, count: usize) -> Offset {
    let idx = count.clamp(1, metrics.first_button_offsets.len()) - 1;
    Offset::new(metrics.first_button_offsets[idx], metrics.button_bottom_offset)
}

/// Offset of each button after the first, relative to its predecessor.
pub fn next_button_offset(metrics: &LayoutMetrics) -> Offset {
    Offset::new(metrics.button_spacing, 0.0)
}

/// Width of a button whose label renders `text_width` wide.
pub fn button_width(metrics: &LayoutMetrics, text_width: f32) -> f32 {
    metrics
        .button_min_width
        .max(text_width + metrics.button_text_padding)
}

/// Horizontal shift that keeps a labelled edit box and its label centered.
pub fn editbox_shift(metrics: &LayoutMetrics, eb: &EditBoxMetrics) -> f32 {
    if eb.has_label() {
        (eb.label_width + metrics.editbox_label_gap) / 2.0
    } else {
        0.0
    }
}

/// Offset of the edit box at 1-based `position` from the bottom of the text
/// label.
pub fn editbox_offset(metrics: &LayoutMetrics, position: usize, eb: &EditBoxMetrics) -> Offset {
    let mut y = metrics.editbox_top_gap + metrics.editbox_height * position.saturating_sub(1) as f32;
    if position == 1 && eb.has_label() {
        y += metrics.editbox_label_drop;
    }
    Offset::new(editbox_shift(metrics, eb), -y)
}

/// Size of the container holding `count` check boxes whose widest label is
/// `widest_label` wide.
pub fn checkbox_container_size(metrics: &LayoutMetrics, widest_label: f32, count: usize) -> Size {
    Size::new(
        metrics.checkbox_size + widest_label,
        metrics.checkbox_size * count as f32,
    )
}

/// Offset of the check box container below its reference frame.
pub fn checkbox_container_offset(metrics: &LayoutMetrics) -> Offset {
    Offset::new(0.0, -metrics.checkbox_top_gap)
}
