#![forbid(unsafe_code)]

//! Dialog delegates: what a dialog shows and how it reacts.
//!
//! A [`Delegate`] is built once, frozen into an `Rc`, and shared by every
//! dialog spawned from it. Widget specs are addressed by their position in
//! the delegate's lists; attached widgets carry that position and look the
//! spec up again whenever an event arrives.
//!
//! ```
//! use ftui_dialog::{ButtonSpec, Delegate, DelegateFlags};
//!
//! let confirm = Delegate::new("Discard changes?")
//!     .button(ButtonSpec::new("Discard", |_, _, _| false))
//!     .button(ButtonSpec::new("Keep", |_, _, _| false))
//!     .flags(DelegateFlags::HIDE_ON_ESCAPE);
//! assert_eq!(confirm.buttons().len(), 2);
//! ```

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use bitflags::bitflags;
use ftui_core::event::MouseButton;

use crate::manager::DialogManager;
use crate::payload::Payload;
use crate::pool::{ButtonId, CheckBoxId, DialogId, EditBoxId};

bitflags! {
    /// Dismissal and admission policy of a delegate.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DelegateFlags: u8 {
        /// Escape hides the dialog.
        const HIDE_ON_ESCAPE = 1 << 0;
        /// Escape hides without invoking `on_cancel`.
        const CANCEL_IGNORES_ESCAPE = 1 << 1;
        /// May be shown, and stays shown, while the player is dead.
        const SHOW_WHILE_DEAD = 1 << 2;
        /// May be shown, and stays shown, during a cinematic.
        const SHOW_DURING_CINEMATIC = 1 << 3;
        /// Do not show the close control.
        const NO_CLOSE_BUTTON = 1 << 4;
    }
}

/// Why a dialog was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CancelReason {
    /// Escape was pressed.
    Escape,
    /// The close control was clicked.
    CloseButton,
    /// The delegate's duration elapsed.
    Timeout,
    /// The spawn was refused because of ambient state; no dialog exists.
    Vetoed,
    /// The player died or a cinematic started while the dialog was shown.
    Ambient,
}

/// A click on an attached button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonClick {
    pub dialog: DialogId,
    pub button: ButtonId,
    /// Position of the spec in [`Delegate::buttons`].
    pub index: usize,
    pub mouse: MouseButton,
    pub pressed: bool,
}

/// A toggle of an attached check box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckBoxToggle {
    pub dialog: DialogId,
    pub checkbox: CheckBoxId,
    /// Position of the spec in [`Delegate::checkboxes`].
    pub index: usize,
    /// State after the toggle.
    pub checked: bool,
    pub mouse: MouseButton,
    pub pressed: bool,
}

/// Input in an attached edit box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBoxInput {
    pub dialog: DialogId,
    pub editbox: EditBoxId,
    /// Position of the spec in [`Delegate::editboxes`].
    pub index: usize,
    /// Current text of the edit box.
    pub text: String,
}

/// `on_show` / `on_hide`.
pub type DialogCallback = Rc<dyn Fn(&mut DialogManager, DialogId, &Payload)>;
/// `on_cancel`. The dialog is `None` when the spawn itself was vetoed.
pub type CancelCallback = Rc<dyn Fn(&mut DialogManager, Option<DialogId>, &Payload, CancelReason)>;
/// Button click. Return `true` to keep the dialog open.
pub type ClickCallback = Rc<dyn Fn(&mut DialogManager, &ButtonClick, &Payload) -> bool>;
/// Initial check box state.
pub type GetValueCallback = Rc<dyn Fn(CheckBoxId, &Payload) -> bool>;
/// Check box toggled.
pub type SetValueCallback = Rc<dyn Fn(&mut DialogManager, &CheckBoxToggle, &Payload)>;
/// Edit box enter, escape, or text change.
pub type EditBoxCallback = Rc<dyn Fn(&mut DialogManager, &EditBoxInput, &Payload)>;

/// Dialog text, literal or derived from the spawn payload.
#[derive(Clone)]
pub enum DialogText {
    Static(String),
    Computed(Rc<dyn Fn(&Payload) -> String>),
}

impl DialogText {
    /// Resolve against a payload.
    pub fn resolve(&self, data: &Payload) -> String {
        match self {
            Self::Static(text) => text.clone(),
            Self::Computed(f) => f(data),
        }
    }
}

impl Default for DialogText {
    fn default() -> Self {
        Self::Static(String::new())
    }
}

impl fmt::Debug for DialogText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(text) => f.debug_tuple("Static").field(text).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// A button slot.
#[derive(Clone, Default)]
pub struct ButtonSpec {
    pub text: String,
    pub on_click: Option<ClickCallback>,
}

impl ButtonSpec {
    pub fn new(
        text: impl Into<String>,
        on_click: impl Fn(&mut DialogManager, &ButtonClick, &Payload) -> bool + 'static,
    ) -> Self {
        Self {
            text: text.into(),
            on_click: Some(Rc::new(on_click)),
        }
    }

    /// Only buttons with both a label and a handler are attached.
    pub fn is_usable(&self) -> bool {
        !self.text.is_empty() && self.on_click.is_some()
    }
}

/// A check box slot.
#[derive(Clone, Default)]
pub struct CheckBoxSpec {
    pub label: String,
    pub get_value: Option<GetValueCallback>,
    pub set_value: Option<SetValueCallback>,
}

impl CheckBoxSpec {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn get_value(mut self, f: impl Fn(CheckBoxId, &Payload) -> bool + 'static) -> Self {
        self.get_value = Some(Rc::new(f));
        self
    }

    #[must_use]
    pub fn set_value(
        mut self,
        f: impl Fn(&mut DialogManager, &CheckBoxToggle, &Payload) + 'static,
    ) -> Self {
        self.set_value = Some(Rc::new(f));
        self
    }
}

/// An edit box slot.
#[derive(Clone, Default)]
pub struct EditBoxSpec {
    /// Side label shown left of the input.
    pub label: Option<String>,
    /// Initial text.
    pub text: Option<String>,
    /// Input width; the layout default when `None`.
    pub width: Option<f32>,
    pub max_letters: Option<usize>,
    /// Take keyboard focus when shown.
    pub auto_focus: bool,
    pub on_enter_pressed: Option<EditBoxCallback>,
    pub on_escape_pressed: Option<EditBoxCallback>,
    pub on_text_changed: Option<EditBoxCallback>,
}

impl EditBoxSpec {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    #[must_use]
    pub fn max_letters(mut self, max: usize) -> Self {
        self.max_letters = Some(max);
        self
    }

    #[must_use]
    pub fn auto_focus(mut self) -> Self {
        self.auto_focus = true;
        self
    }

    #[must_use]
    pub fn on_enter_pressed(
        mut self,
        f: impl Fn(&mut DialogManager, &EditBoxInput, &Payload) + 'static,
    ) -> Self {
        self.on_enter_pressed = Some(Rc::new(f));
        self
    }

    #[must_use]
    pub fn on_escape_pressed(
        mut self,
        f: impl Fn(&mut DialogManager, &EditBoxInput, &Payload) + 'static,
    ) -> Self {
        self.on_escape_pressed = Some(Rc::new(f));
        self
    }

    #[must_use]
    pub fn on_text_changed(
        mut self,
        f: impl Fn(&mut DialogManager, &EditBoxInput, &Payload) + 'static,
    ) -> Self {
        self.on_text_changed = Some(Rc::new(f));
        self
    }
}

/// Describes a family of dialogs.
#[derive(Clone, Default)]
pub struct Delegate {
    text: DialogText,
    icon: Option<String>,
    width: Option<f32>,
    height: Option<f32>,
    static_size: bool,
    buttons: Vec<ButtonSpec>,
    checkboxes: Vec<CheckBoxSpec>,
    editboxes: Vec<EditBoxSpec>,
    on_show: Option<DialogCallback>,
    on_hide: Option<DialogCallback>,
    on_cancel: Option<CancelCallback>,
    flags: DelegateFlags,
    sound: Option<String>,
    duration: Option<Duration>,
}

impl Delegate {
    /// Delegate with literal text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: DialogText::Static(text.into()),
            ..Self::default()
        }
    }

    /// Delegate whose text is computed from the spawn payload.
    pub fn computed(text: impl Fn(&Payload) -> String + 'static) -> Self {
        Self {
            text: DialogText::Computed(Rc::new(text)),
            ..Self::default()
        }
    }

    /// Icon texture shown left of the text.
    #[must_use]
    pub fn icon(mut self, texture: impl Into<String>) -> Self {
        self.icon = Some(texture.into());
        self
    }

    #[must_use]
    pub fn width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    #[must_use]
    pub fn height(mut self, height: f32) -> Self {
        self.height = Some(height);
        self
    }

    /// Use the width and height hints verbatim instead of auto-layout.
    #[must_use]
    pub fn static_size(mut self) -> Self {
        self.static_size = true;
        self
    }

    #[must_use]
    pub fn button(mut self, spec: ButtonSpec) -> Self {
        self.buttons.push(spec);
        self
    }

    #[must_use]
    pub fn checkbox(mut self, spec: CheckBoxSpec) -> Self {
        self.checkboxes.push(spec);
        self
    }

    #[must_use]
    pub fn editbox(mut self, spec: EditBoxSpec) -> Self {
        self.editboxes.push(spec);
        self
    }

    #[must_use]
    pub fn on_show(mut self, f: impl Fn(&mut DialogManager, DialogId, &Payload) + 'static) -> Self {
        self.on_show = Some(Rc::new(f));
        self
    }

    #[must_use]
    pub fn on_hide(mut self, f: impl Fn(&mut DialogManager, DialogId, &Payload) + 'static) -> Self {
        self.on_hide = Some(Rc::new(f));
        self
    }

    #[must_use]
    pub fn on_cancel(
        mut self,
        f: impl Fn(&mut DialogManager, Option<DialogId>, &Payload, CancelReason) + 'static,
    ) -> Self {
        self.on_cancel = Some(Rc::new(f));
        self
    }

    #[must_use]
    pub fn flags(mut self, flags: DelegateFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Sound cue played when a dialog of this delegate is spawned.
    #[must_use]
    pub fn sound(mut self, cue: impl Into<String>) -> Self {
        self.sound = Some(cue.into());
        self
    }

    /// Cancel and hide automatically after this much time.
    #[must_use]
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn text(&self) -> &DialogText {
        &self.text
    }

    /// Resolve the display text for a payload.
    pub fn resolve_text(&self, data: &Payload) -> String {
        self.text.resolve(data)
    }

    pub fn icon_texture(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn width_hint(&self) -> Option<f32> {
        self.width
    }

    pub fn height_hint(&self) -> Option<f32> {
        self.height
    }

    pub fn is_static_size(&self) -> bool {
        self.static_size
    }

    pub fn buttons(&self) -> &[ButtonSpec] {
        &self.buttons
    }

    pub fn checkboxes(&self) -> &[CheckBoxSpec] {
        &self.checkboxes
    }

    pub fn editboxes(&self) -> &[EditBoxSpec] {
        &self.editboxes
    }

    pub fn on_show_callback(&self) -> Option<&DialogCallback> {
        self.on_show.as_ref()
    }

    pub fn on_hide_callback(&self) -> Option<&DialogCallback> {
        self.on_hide.as_ref()
    }

    pub fn on_cancel_callback(&self) -> Option<&CancelCallback> {
        self.on_cancel.as_ref()
    }

    pub fn policy(&self) -> DelegateFlags {
        self.flags
    }

    pub fn sound_cue(&self) -> Option<&str> {
        self.sound.as_deref()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.duration
    }
}

impl fmt::Debug for Delegate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Delegate")
            .field("text", &self.text)
            .field("icon", &self.icon)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("static_size", &self.static_size)
            .field("buttons", &self.buttons.len())
            .field("checkboxes", &self.checkboxes.len())
            .field("editboxes", &self.editboxes.len())
            .field("flags", &self.flags)
            .field("sound", &self.sound)
            .field("duration", &self.duration)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computed_text_reads_payload() {
        let d = Delegate::computed(|data| match data.get::<String>() {
            Some(name) => format!("Invite {name}?"),
            None => String::new(),
        });
        assert_eq!(d.resolve_text(&Payload::new("Ada".to_string())), "Invite Ada?");
        assert_eq!(d.resolve_text(&Payload::none()), "");
    }

    #[test]
    fn button_usability() {
        assert!(ButtonSpec::new("OK", |_, _, _| false).is_usable());
        assert!(!ButtonSpec::new("", |_, _, _| false).is_usable());
        let no_handler = ButtonSpec {
            text: "OK".into(),
            on_click: None,
        };
        assert!(!no_handler.is_usable());
    }

    #[test]
    fn builder_collects_specs() {
        let d = Delegate::new("Rename")
            .width(280.0)
            .editbox(EditBoxSpec::new().label("Name").max_letters(12).auto_focus())
            .checkbox(CheckBoxSpec::new("Remember"))
            .flags(DelegateFlags::HIDE_ON_ESCAPE | DelegateFlags::NO_CLOSE_BUTTON)
            .duration(Duration::from_secs(5));
        assert_eq!(d.width_hint(), Some(280.0));
        assert_eq!(d.editboxes()[0].max_letters, Some(12));
        assert!(d.editboxes()[0].auto_focus);
        assert_eq!(d.checkboxes().len(), 1);
        assert!(d.policy().contains(DelegateFlags::NO_CLOSE_BUTTON));
        assert_eq!(d.timeout(), Some(Duration::from_secs(5)));
    }
}
