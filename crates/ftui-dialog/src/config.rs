#![forbid(unsafe_code)]

//! Manager configuration.

use ftui_core::geometry::Offset;
use ftui_layout::LayoutMetrics;

/// Sound cues played on dialog transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SoundCues {
    /// Played when a dialog is shown.
    pub open: String,
    /// Played when a dialog is hidden.
    pub close: String,
}

impl Default for SoundCues {
    fn default() -> Self {
        Self {
            open: "igMainMenuOpen".to_string(),
            close: "igMainMenuClose".to_string(),
        }
    }
}

/// Configuration for a [`DialogManager`](crate::DialogManager).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DialogConfig {
    /// Maximum number of dialogs visible at once. Further spawns queue.
    pub max_dialogs: usize,
    /// Position of the first dialog relative to the top of the screen when
    /// no host dialog is visible.
    pub fallback_offset: Offset,
    pub sounds: SoundCues,
    pub layout: LayoutMetrics,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            max_dialogs: 4,
            fallback_offset: Offset::new(0.0, -135.0),
            sounds: SoundCues::default(),
            layout: LayoutMetrics::default(),
        }
    }
}

impl DialogConfig {
    /// Set the concurrency cap. Values below one are raised to one.
    #[must_use]
    pub fn with_max_dialogs(mut self, max: usize) -> Self {
        self.max_dialogs = max.max(1);
        self
    }

    #[must_use]
    pub fn with_fallback_offset(mut self, offset: Offset) -> Self {
        self.fallback_offset = offset;
        self
    }

    #[must_use]
    pub fn with_sounds(mut self, sounds: SoundCues) -> Self {
        self.sounds = sounds;
        self
    }

    #[must_use]
    pub fn with_layout(mut self, layout: LayoutMetrics) -> Self {
        self.layout = layout;
        self
    }

    /// Maximum number of buttons attached to one dialog.
    pub fn max_buttons(&self) -> usize {
        self.layout.max_buttons
    }
}
