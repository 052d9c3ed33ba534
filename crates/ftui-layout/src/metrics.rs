#![forbid(unsafe_code)]

//! Fixed layout constants for dialogs and their children.

/// Dimensions the layout engine works from.
///
/// Defaults match the stock dialog look: a 320-wide frame that grows to 440
/// when it carries three buttons, 21-tall buttons, 24-tall edit boxes, and
/// 32-square check boxes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutMetrics {
    /// Dialog width when the delegate gives no hint.
    pub default_width: f32,
    /// Dialog height before the first resize.
    pub default_height: f32,
    /// Dialog width when the maximum number of buttons is attached.
    pub wide_width: f32,
    /// Button count that triggers [`wide_width`](Self::wide_width).
    pub max_buttons: usize,
    /// Vertical space around the text label.
    pub text_margin: f32,
    /// Horizontal space subtracted from the dialog width for the text label.
    pub text_side_margin: f32,

    pub button_height: f32,
    /// Vertical gap between the content and the button row.
    pub button_gap: f32,
    /// Horizontal gap between neighbouring buttons.
    pub button_spacing: f32,
    pub button_min_width: f32,
    /// Added to a button's measured text width.
    pub button_text_padding: f32,
    /// X offset of the first button for one, two, and three buttons.
    pub first_button_offsets: [f32; 3],
    /// Distance from the dialog's bottom edge to the button row.
    pub button_bottom_offset: f32,

    pub editbox_height: f32,
    /// Edit boxes wider than this widen the dialog.
    pub editbox_width: f32,
    /// Gap between the text label and the first edit box.
    pub editbox_top_gap: f32,
    /// Extra drop for a first edit box carrying a side label.
    pub editbox_label_drop: f32,
    /// Gap between a side label and its edit box.
    pub editbox_label_gap: f32,
    /// Minimum space between a side label and the dialog's left edge.
    pub editbox_side_padding: f32,
    /// Minimum space between an edit box and the dialog's right edge.
    pub editbox_overflow_tolerance: f32,

    pub checkbox_size: f32,
    /// Gap above the check box container.
    pub checkbox_top_gap: f32,

    pub icon_size: f32,
    /// The icon pads the dialog by this many icon widths.
    pub icon_padding_factor: f32,
    /// Distance from the dialog's left edge to the icon.
    pub icon_left_offset: f32,

    pub close_button_size: f32,
    /// Inset of the close button from the top-right corner.
    pub close_button_inset: f32,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            default_width: 320.0,
            default_height: 72.0,
            wide_width: 440.0,
            max_buttons: 3,
            text_margin: 32.0,
            text_side_margin: 60.0,
            button_height: 21.0,
            button_gap: 8.0,
            button_spacing: 13.0,
            button_min_width: 128.0,
            button_text_padding: 20.0,
            first_button_offsets: [0.0, -69.0, -139.0],
            button_bottom_offset: 16.0,
            editbox_height: 24.0,
            editbox_width: 130.0,
            editbox_top_gap: 8.0,
            editbox_label_drop: 4.0,
            editbox_label_gap: 5.0,
            editbox_side_padding: 16.0,
            editbox_overflow_tolerance: 10.0,
            checkbox_size: 32.0,
            checkbox_top_gap: 4.0,
            icon_size: 36.0,
            icon_padding_factor: 2.0,
            icon_left_offset: 24.0,
            close_button_size: 32.0,
            close_button_inset: 3.0,
        }
    }
}

impl LayoutMetrics {
    /// Padding added on each side of the text label when an icon is shown.
    #[inline]
    pub fn icon_padding(&self) -> f32 {
        self.icon_size * self.icon_padding_factor
    }
}
