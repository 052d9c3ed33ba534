#![forbid(unsafe_code)]

//! The dialog manager context.
//!
//! [`DialogManager`] owns everything: the host toolkit, the four widget
//! pools, the registry, and the spawn queue. Callbacks receive it by
//! mutable reference, so a click handler may spawn or hide dialogs itself.
//!
//! # Lifecycle
//!
//! ```text
//! spawn ──veto──▶ on_cancel(None, Vetoed)
//!   │
//!   ├─cap reached──▶ queue ──(slot frees)──▶ drain ──▶ spawn
//!   │
//!   └─▶ build ─▶ anchor ─▶ show ─▶ on_show
//!                                   │
//!        hide ◀── click / escape / close / timeout / dismiss
//!         │
//!         └─▶ on_hide ─▶ release widgets ─▶ refresh anchors ─▶ drain
//! ```
//!
//! Every dialog binding carries a generation. Handlers check it again after
//! each callback, because the callback may have hidden the dialog and a new
//! spawn may have reused the same pooled instance.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use ftui_core::event::MouseButton;
use ftui_core::geometry::{Anchor, AnchorPoint, AnchorTarget, Offset};
use ftui_core::toolkit::{FrameHandle, Toolkit};
use ftui_layout::{
    EditBoxMetrics, button_width, checkbox_container_offset, checkbox_container_size,
    editbox_offset, first_button_offset, next_button_offset,
};

use crate::anchor::{restack, stack_anchor};
use crate::config::DialogConfig;
use crate::delegate::{
    ButtonClick, CancelReason, CheckBoxToggle, Delegate, DelegateFlags, EditBoxCallback,
    EditBoxInput, EditBoxSpec,
};
use crate::dialog::Dialog;
use crate::error::DialogError;
use crate::payload::Payload;
use crate::pool::{
    Acquired, ButtonId, CheckBoxId, DialogId, EditBoxId, Pool, PoolStats, Recyclable,
    WidgetBinding, WidgetKind,
};
use crate::queue::SpawnQueue;
use crate::registry::{DelegateRef, Registry};
use crate::widgets::{Button, CheckBox, EditBox};

/// Result of a spawn that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    /// A dialog was built and shown.
    Shown(DialogId),
    /// The cap was reached; the request waits in the queue (or already did).
    Queued,
    /// Ambient state refused the dialog; `on_cancel` ran.
    Vetoed,
    /// A dialog was built and shown, then hidden again by its own `on_show`.
    Closed,
}

impl SpawnOutcome {
    /// The shown dialog, if any.
    pub fn dialog(self) -> Option<DialogId> {
        match self {
            Self::Shown(id) => Some(id),
            Self::Queued | Self::Vetoed | Self::Closed => None,
        }
    }
}

/// Widget owning a host frame that receives input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FrameOwner {
    Close(DialogId),
    Button(ButtonId),
    CheckBox(CheckBoxId),
    EditBox(EditBoxId),
}

/// Owns the toolkit, the widget pools, the delegate registry, and the spawn
/// queue.
///
/// Every operation runs to completion on the caller's thread. Delegate
/// callbacks receive `&mut DialogManager` and may spawn or hide dialogs
/// themselves.
pub struct DialogManager {
    toolkit: Box<dyn Toolkit>,
    config: DialogConfig,
    registry: Registry,
    queue: SpawnQueue,
    dialogs: Pool<Dialog>,
    buttons: Pool<Button>,
    checkboxes: Pool<CheckBox>,
    editboxes: Pool<EditBox>,
    frames: HashMap<FrameHandle, FrameOwner>,
}

impl fmt::Debug for DialogManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogManager")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("queue", &self.queue)
            .field("dialogs", &self.dialogs)
            .field("buttons", &self.buttons)
            .field("checkboxes", &self.checkboxes)
            .field("editboxes", &self.editboxes)
            .finish_non_exhaustive()
    }
}

impl DialogManager {
    pub fn new(toolkit: impl Toolkit + 'static, config: DialogConfig) -> Self {
        Self {
            toolkit: Box::new(toolkit),
            config,
            registry: Registry::new(),
            queue: SpawnQueue::new(),
            dialogs: Pool::new(),
            buttons: Pool::new(),
            checkboxes: Pool::new(),
            editboxes: Pool::new(),
            frames: HashMap::new(),
        }
    }

    pub fn config(&self) -> &DialogConfig {
        &self.config
    }

    pub fn toolkit(&self) -> &dyn Toolkit {
        &*self.toolkit
    }

    pub fn toolkit_mut(&mut self) -> &mut dyn Toolkit {
        &mut *self.toolkit
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    // ── Registry ────────────────────────────────────────────────────────

    /// Register a delegate under `name`. A previous registration is
    /// replaced.
    pub fn register(
        &mut self,
        name: &str,
        delegate: impl Into<Rc<Delegate>>,
    ) -> Result<(), DialogError> {
        self.registry.register(name, delegate.into()).map(|_| ())
    }

    /// Remove a registration. Dialogs already shown are unaffected.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.registry.unregister(name).is_some()
    }

    // ── Spawn ───────────────────────────────────────────────────────────

    /// Show a dialog for `reference` carrying `data`.
    ///
    /// # Errors
    ///
    /// [`DialogError::InvalidName`] for an empty name,
    /// [`DialogError::UnknownDelegate`] for an unregistered one, and
    /// [`DialogError::EmptyText`] when the delegate's text resolves to an
    /// empty string. Nothing is acquired in any of these cases.
    pub fn spawn(
        &mut self,
        reference: impl Into<DelegateRef>,
        data: Payload,
    ) -> Result<SpawnOutcome, DialogError> {
        let delegate = self.registry.resolve(&reference.into())?;
        self.spawn_delegate(delegate, data)
    }

    fn spawn_delegate(
        &mut self,
        delegate: Rc<Delegate>,
        data: Payload,
    ) -> Result<SpawnOutcome, DialogError> {
        let _span = ftui_core::debug_span!(
            "dialog_spawn",
            active = self.dialogs.active().len(),
            queued = self.queue.len()
        )
        .entered();

        if let Some(blocker) = self.admission_blocker(&delegate) {
            ftui_core::debug!(blocker, "spawn vetoed");
            if let Some(on_cancel) = delegate.on_cancel_callback() {
                on_cancel(self, None, &data, CancelReason::Vetoed);
            }
            return Ok(SpawnOutcome::Vetoed);
        }

        let text = delegate.resolve_text(&data);
        if text.is_empty() {
            return Err(DialogError::EmptyText);
        }

        if self.dialogs.active().len() >= self.config.max_dialogs {
            self.queue.enqueue(delegate, data);
            return Ok(SpawnOutcome::Queued);
        }

        if self.queue.remove(&delegate).is_some() {
            ftui_core::debug!("pending request superseded by direct spawn");
        }

        let id = self.build(&delegate, data.clone(), &text);
        if let Some(cue) = delegate.sound_cue() {
            self.toolkit.play_sound(cue);
        }
        self.anchor_newest(id);
        let frame = self.dialogs[id].frame();
        self.toolkit.show(frame);
        self.toolkit.play_sound(&self.config.sounds.open);
        self.focus_editbox(id, &delegate);
        ftui_core::debug!(
            dialog = id.index(),
            active = self.dialogs.active().len(),
            "dialog shown"
        );

        let generation = self.dialogs[id].generation();
        if let Some(on_show) = delegate.on_show_callback() {
            on_show(self, id, &data);
        }
        if self.is_current(id, generation) {
            Ok(SpawnOutcome::Shown(id))
        } else {
            Ok(SpawnOutcome::Closed)
        }
    }

    fn admission_blocker(&self, delegate: &Delegate) -> Option<&'static str> {
        let ambient = self.toolkit.ambient();
        let flags = delegate.policy();
        if ambient.player_dead && !flags.contains(DelegateFlags::SHOW_WHILE_DEAD) {
            Some("player_dead")
        } else if ambient.in_cinematic && !flags.contains(DelegateFlags::SHOW_DURING_CINEMATIC) {
            Some("cinematic")
        } else {
            None
        }
    }

    /// Acquire a dialog, bind it, attach the requested widgets, and size it.
    fn build(&mut self, delegate: &Rc<Delegate>, data: Payload, text: &str) -> DialogId {
        let Acquired { id, fresh } = self.dialogs.acquire(&mut *self.toolkit, &self.config.layout);
        let generation = self.dialogs[id].bind(Rc::clone(delegate), data);
        if fresh {
            self.frames
                .insert(self.dialogs[id].close_frame(), FrameOwner::Close(id));
        }

        let text_frame = self.dialogs[id].text_frame();
        let close = self.dialogs[id].close_frame();
        self.toolkit.set_text(text_frame, text);
        self.dialogs[id].set_icon(&mut *self.toolkit, delegate.icon_texture());
        if delegate.policy().contains(DelegateFlags::NO_CLOSE_BUTTON) {
            self.toolkit.hide(close);
        } else {
            self.toolkit.show(close);
        }

        self.attach_buttons(id, generation, delegate);
        let last_row = self.attach_editboxes(id, generation, delegate);
        self.attach_checkboxes(id, generation, delegate, last_row);

        self.dialogs[id].resize(&mut *self.toolkit, &self.config.layout);
        id
    }

    fn attach_buttons(&mut self, id: DialogId, generation: u64, delegate: &Delegate) {
        let usable: Vec<usize> = delegate
            .buttons()
            .iter()
            .enumerate()
            .filter(|(_, spec)| spec.is_usable())
            .map(|(index, _)| index)
            .take(self.config.max_buttons())
            .collect();
        if usable.len() < delegate.buttons().len() {
            ftui_core::debug!(
                requested = delegate.buttons().len(),
                attached = usable.len(),
                "buttons skipped"
            );
        }

        let metrics = &self.config.layout;
        let dialog_frame = self.dialogs[id].frame();
        let count = usable.len();
        let mut previous = None;

        for index in usable {
            let Acquired { id: button, fresh } = self.buttons.acquire(&mut *self.toolkit, metrics);
            let frame = self.buttons[button].frame();
            if fresh {
                self.frames.insert(frame, FrameOwner::Button(button));
            }
            self.buttons[button].bind(WidgetBinding {
                dialog: id,
                generation,
                index,
            });

            let tk = &mut *self.toolkit;
            tk.set_parent(frame, Some(dialog_frame));
            tk.set_text(frame, &delegate.buttons()[index].text);
            let label_width = tk.text_extent(frame).width;
            tk.set_width(frame, button_width(metrics, label_width));
            let anchor = match previous {
                None => Anchor::inside(
                    AnchorPoint::Bottom,
                    dialog_frame,
                    first_button_offset(metrics, count),
                ),
                Some(prev) => Anchor::new(
                    AnchorPoint::Left,
                    AnchorTarget::Frame(prev),
                    AnchorPoint::Right,
                    next_button_offset(metrics),
                ),
            };
            tk.set_anchor(frame, anchor);
            tk.show(frame);

            previous = Some(frame);
            self.dialogs[id].buttons.push(button);
        }
    }

    /// Returns the frame check boxes hang below: the last edit box, or the
    /// text label when there is none.
    fn attach_editboxes(&mut self, id: DialogId, generation: u64, delegate: &Delegate) -> FrameHandle {
        let metrics = &self.config.layout;
        let dialog_frame = self.dialogs[id].frame();
        let text_frame = self.dialogs[id].text_frame();
        let mut last_row = text_frame;
        let mut sizes = Vec::with_capacity(delegate.editboxes().len());

        for (index, spec) in delegate.editboxes().iter().enumerate() {
            let Acquired { id: editbox, fresh } = self.editboxes.acquire(&mut *self.toolkit, metrics);
            let eb = &mut self.editboxes[editbox];
            let frame = eb.frame();
            if fresh {
                self.frames.insert(frame, FrameOwner::EditBox(editbox));
            }
            eb.bind(WidgetBinding {
                dialog: id,
                generation,
                index,
            });

            let tk = &mut *self.toolkit;
            let width = spec.width.unwrap_or(metrics.editbox_width);
            tk.set_parent(frame, Some(dialog_frame));
            tk.set_width(frame, width);
            eb.set_max_letters(tk, spec.max_letters);
            eb.set_text(tk, spec.text.as_deref().unwrap_or_default());
            let label_width = eb.set_label(tk, spec.label.as_deref());

            let size = EditBoxMetrics { width, label_width };
            tk.set_anchor(
                frame,
                Anchor::new(
                    AnchorPoint::Top,
                    AnchorTarget::Frame(text_frame),
                    AnchorPoint::Bottom,
                    editbox_offset(metrics, index + 1, &size),
                ),
            );
            tk.show(frame);

            sizes.push(size);
            last_row = frame;
            self.dialogs[id].editboxes.push(editbox);
        }

        self.dialogs[id].editbox_metrics = sizes;
        last_row
    }

    fn attach_checkboxes(
        &mut self,
        id: DialogId,
        generation: u64,
        delegate: &Delegate,
        last_row: FrameHandle,
    ) {
        let specs = delegate.checkboxes();
        if specs.is_empty() {
            return;
        }

        let metrics = &self.config.layout;
        let container = self.dialogs[id].checkbox_container();
        let data = self.dialogs[id].data().clone();
        let mut widest = 0.0f32;
        let mut previous = None;

        for (index, spec) in specs.iter().enumerate() {
            let Acquired { id: checkbox, fresh } =
                self.checkboxes.acquire(&mut *self.toolkit, metrics);
            let frame = self.checkboxes[checkbox].frame();
            if fresh {
                self.frames.insert(frame, FrameOwner::CheckBox(checkbox));
            }
            self.checkboxes[checkbox].bind(WidgetBinding {
                dialog: id,
                generation,
                index,
            });
            let checked = spec
                .get_value
                .as_ref()
                .is_some_and(|get_value| get_value(checkbox, &data));

            let tk = &mut *self.toolkit;
            tk.set_parent(frame, Some(container));
            tk.set_text(frame, &spec.label);
            self.checkboxes[checkbox].set_checked(tk, checked);
            widest = widest.max(tk.text_extent(frame).width);
            let anchor = match previous {
                None => Anchor::inside(AnchorPoint::TopLeft, container, Offset::ZERO),
                Some(prev) => Anchor::new(
                    AnchorPoint::TopLeft,
                    AnchorTarget::Frame(prev),
                    AnchorPoint::BottomLeft,
                    Offset::ZERO,
                ),
            };
            tk.set_anchor(frame, anchor);
            tk.show(frame);

            previous = Some(frame);
            self.dialogs[id].checkboxes.push(checkbox);
        }

        let size = checkbox_container_size(metrics, widest, specs.len());
        let tk = &mut *self.toolkit;
        tk.set_width(container, size.width);
        tk.set_height(container, size.height);
        tk.clear_anchors(container);
        tk.set_anchor(
            container,
            Anchor::new(
                AnchorPoint::Top,
                AnchorTarget::Frame(last_row),
                AnchorPoint::Bottom,
                checkbox_container_offset(metrics),
            ),
        );
        tk.show(container);
    }

    fn focus_editbox(&mut self, id: DialogId, delegate: &Delegate) {
        let Some(index) = delegate.editboxes().iter().position(|spec| spec.auto_focus) else {
            return;
        };
        if let Some(&editbox) = self.dialogs[id].editboxes.get(index) {
            let frame = self.editboxes[editbox].frame();
            self.toolkit.set_focus(frame);
        }
    }

    /// Hang the most recently acquired dialog below its predecessor.
    fn anchor_newest(&mut self, id: DialogId) {
        let active = self.dialogs.active();
        let above = match active.iter().position(|&d| d == id) {
            Some(pos) if pos > 0 => Some(self.dialogs[active[pos - 1]].frame()),
            _ => self.toolkit.bottommost_default_dialog(),
        };
        let frame = self.dialogs[id].frame();
        let anchor = stack_anchor(above, self.config.fallback_offset);
        self.toolkit.clear_anchors(frame);
        self.toolkit.set_anchor(frame, anchor);
    }

    // ── Hide and release ────────────────────────────────────────────────

    /// Hide an active dialog: play the close cue, run `on_hide`, release it,
    /// and drain the queue.
    ///
    /// Returns `false` when the dialog is not active or already hiding.
    pub fn hide(&mut self, id: DialogId) -> bool {
        if !self.dialogs.is_active(id) {
            ftui_core::warn!(dialog = id.index(), "hide of inactive dialog ignored");
            return false;
        }
        if self.dialogs[id].closing {
            return false;
        }
        let _span = ftui_core::debug_span!("dialog_hide", dialog = id.index()).entered();

        let dialog = &mut self.dialogs[id];
        dialog.closing = true;
        let generation = dialog.generation();
        let delegate = dialog.delegate().cloned();
        let data = dialog.data().clone();
        let frame = dialog.frame();

        self.toolkit.hide(frame);
        self.toolkit.play_sound(&self.config.sounds.close);
        if let Some(delegate) = &delegate
            && let Some(on_hide) = delegate.on_hide_callback()
        {
            on_hide(self, id, &data);
        }

        if self.is_current(id, generation) {
            self.release(id);
        }
        self.drain_queue();
        true
    }

    /// Return a dialog and every widget attached to it to their pools, then
    /// restack the remaining dialogs. No callbacks run.
    pub(crate) fn release(&mut self, id: DialogId) -> bool {
        if !self.dialogs.is_active(id) {
            ftui_core::warn!(dialog = id.index(), "release of inactive dialog ignored");
            return false;
        }

        let dialog = &mut self.dialogs[id];
        let editboxes = std::mem::take(&mut dialog.editboxes);
        let checkboxes = std::mem::take(&mut dialog.checkboxes);
        let buttons = std::mem::take(&mut dialog.buttons);

        let tk = &mut *self.toolkit;
        for editbox in editboxes {
            self.editboxes.release(editbox, tk);
        }
        for checkbox in checkboxes {
            self.checkboxes.release(checkbox, tk);
        }
        for button in buttons {
            self.buttons.release(button, tk);
        }
        self.dialogs.release(id, tk);
        ftui_core::debug!(dialog = id.index(), "dialog released");

        self.refresh_anchors();
        true
    }

    /// Re-anchor every active dialog, top to bottom.
    pub fn refresh_anchors(&mut self) {
        let stack: Vec<FrameHandle> = self
            .dialogs
            .active()
            .iter()
            .map(|&d| self.dialogs[d].frame())
            .collect();
        restack(&mut *self.toolkit, &stack, self.config.fallback_offset);
        ftui_core::trace!(dialogs = stack.len(), "anchors refreshed");
    }

    /// Spawn queued requests until the cap is reached or the queue empties.
    ///
    /// Entries vetoed or failing validation at this point are dropped.
    /// Returns the number of dialogs shown.
    pub fn drain_queue(&mut self) -> usize {
        let mut shown = 0;
        while self.dialogs.active().len() < self.config.max_dialogs {
            let Some(next) = self.queue.pop() else {
                break;
            };
            match self.spawn_delegate(next.delegate, next.data) {
                Ok(SpawnOutcome::Shown(_)) => shown += 1,
                Ok(SpawnOutcome::Queued | SpawnOutcome::Closed) => {}
                Ok(SpawnOutcome::Vetoed) => {
                    ftui_core::debug!("queued spawn vetoed, dropped");
                }
                Err(err) => {
                    ftui_core::warn!(error = %err, "queued spawn failed, dropped");
                }
            }
        }
        if shown > 0 {
            ftui_core::debug!(shown, pending = self.queue.len(), "queue drained");
        }
        shown
    }

    /// Re-run layout for an active dialog.
    pub fn resize(&mut self, id: DialogId) -> bool {
        if !self.dialogs.is_active(id) {
            return false;
        }
        self.dialogs[id].resize(&mut *self.toolkit, &self.config.layout);
        true
    }

    /// Run `on_cancel` with `reason`, then hide.
    pub fn cancel(&mut self, id: DialogId, reason: CancelReason) -> bool {
        if !self.dialogs.is_active(id) || self.dialogs[id].closing {
            return false;
        }
        let generation = self.dialogs[id].generation();
        let delegate = self.dialogs[id].delegate().cloned();
        let data = self.dialogs[id].data().clone();
        ftui_core::debug!(dialog = id.index(), reason = ?reason, "dialog cancelled");

        if let Some(delegate) = &delegate
            && let Some(on_cancel) = delegate.on_cancel_callback()
        {
            on_cancel(self, Some(id), &data, reason);
        }
        if self.is_current(id, generation) {
            self.hide(id);
        }
        true
    }

    /// Hide every active dialog of a delegate. Returns how many were hidden.
    pub fn dismiss(&mut self, reference: impl Into<DelegateRef>) -> Result<usize, DialogError> {
        let delegate = self.registry.resolve(&reference.into())?;
        let targets: Vec<(DialogId, u64)> = self
            .active_generations()
            .into_iter()
            .filter(|&(id, _)| {
                self.dialogs[id]
                    .delegate()
                    .is_some_and(|d| Rc::ptr_eq(d, &delegate))
            })
            .collect();
        Ok(self.hide_all(targets))
    }

    /// Hide every active dialog.
    pub fn dismiss_all(&mut self) -> usize {
        let targets = self.active_generations();
        self.hide_all(targets)
    }

    fn hide_all(&mut self, targets: Vec<(DialogId, u64)>) -> usize {
        targets
            .into_iter()
            .filter(|&(id, generation)| self.is_current(id, generation) && self.hide(id))
            .count()
    }

    // ── Widget handlers ─────────────────────────────────────────────────

    /// Run a button's click handler. The dialog hides unless the handler
    /// returns `true`.
    pub fn click_button(&mut self, button: ButtonId, mouse: MouseButton, pressed: bool) -> bool {
        let Some(binding) = self
            .buttons
            .is_active(button)
            .then(|| self.buttons[button].binding())
            .flatten()
        else {
            return false;
        };
        let Some((delegate, data)) = self.resolve_binding(binding) else {
            return false;
        };
        let Some(on_click) = delegate
            .buttons()
            .get(binding.index)
            .and_then(|spec| spec.on_click.as_ref())
        else {
            return false;
        };

        let click = ButtonClick {
            dialog: binding.dialog,
            button,
            index: binding.index,
            mouse,
            pressed,
        };
        let keep_open = on_click(self, &click, &data);
        if !keep_open && self.is_current(binding.dialog, binding.generation) {
            self.hide(binding.dialog);
        }
        true
    }

    /// Toggle a check box and report the new state to its `set_value`.
    pub fn click_checkbox(&mut self, checkbox: CheckBoxId, mouse: MouseButton, pressed: bool) -> bool {
        let Some(binding) = self
            .checkboxes
            .is_active(checkbox)
            .then(|| self.checkboxes[checkbox].binding())
            .flatten()
        else {
            return false;
        };
        let Some((delegate, data)) = self.resolve_binding(binding) else {
            return false;
        };

        let checked = !self.checkboxes[checkbox].is_checked();
        self.checkboxes[checkbox].set_checked(&mut *self.toolkit, checked);

        if let Some(set_value) = delegate
            .checkboxes()
            .get(binding.index)
            .and_then(|spec| spec.set_value.as_ref())
        {
            let toggle = CheckBoxToggle {
                dialog: binding.dialog,
                checkbox,
                index: binding.index,
                checked,
                mouse,
                pressed,
            };
            set_value(self, &toggle, &data);
        }
        true
    }

    pub fn editbox_enter(&mut self, editbox: EditBoxId) -> bool {
        self.run_editbox_callback(editbox, |spec| spec.on_enter_pressed.clone())
    }

    /// Run the edit box's escape handler. Without one, escape acts on the
    /// dialog as the escape key would.
    pub fn editbox_escape(&mut self, editbox: EditBoxId) -> bool {
        let Some(binding) = self.editbox_binding(editbox) else {
            return false;
        };
        if self.run_editbox_callback(editbox, |spec| spec.on_escape_pressed.clone()) {
            return true;
        }
        self.is_current(binding.dialog, binding.generation) && self.escape(binding.dialog)
    }

    /// Store text typed by the user and run `on_text_changed`.
    pub fn editbox_text_changed(&mut self, editbox: EditBoxId, text: &str) -> bool {
        let Some(binding) = self.editbox_binding(editbox) else {
            return false;
        };
        if self.resolve_binding(binding).is_none() {
            return false;
        }
        if !self.editboxes[editbox].set_text(&mut *self.toolkit, text) {
            return false;
        }
        self.run_editbox_callback(editbox, |spec| spec.on_text_changed.clone());
        true
    }

    /// Close control clicked.
    pub fn click_close(&mut self, id: DialogId) -> bool {
        self.cancel(id, CancelReason::CloseButton)
    }

    /// Escape on one dialog. Only dialogs with
    /// [`DelegateFlags::HIDE_ON_ESCAPE`] react.
    pub fn escape(&mut self, id: DialogId) -> bool {
        let Some(flags) = self
            .dialogs
            .is_active(id)
            .then(|| self.dialogs[id].delegate().map(|d| d.policy()))
            .flatten()
        else {
            return false;
        };
        if !flags.contains(DelegateFlags::HIDE_ON_ESCAPE) {
            return false;
        }
        if flags.contains(DelegateFlags::CANCEL_IGNORES_ESCAPE) {
            self.hide(id)
        } else {
            self.cancel(id, CancelReason::Escape)
        }
    }

    fn editbox_binding(&self, editbox: EditBoxId) -> Option<WidgetBinding> {
        self.editboxes
            .is_active(editbox)
            .then(|| self.editboxes[editbox].binding())
            .flatten()
    }

    fn run_editbox_callback(
        &mut self,
        editbox: EditBoxId,
        pick: impl Fn(&EditBoxSpec) -> Option<EditBoxCallback>,
    ) -> bool {
        let Some(binding) = self.editbox_binding(editbox) else {
            return false;
        };
        let Some((delegate, data)) = self.resolve_binding(binding) else {
            return false;
        };
        let Some(callback) = delegate.editboxes().get(binding.index).and_then(pick) else {
            return false;
        };
        let input = EditBoxInput {
            dialog: binding.dialog,
            editbox,
            index: binding.index,
            text: self.editboxes[editbox].text().to_string(),
        };
        callback(self, &input, &data);
        true
    }

    /// Delegate and payload behind a widget binding, if it is still current.
    fn resolve_binding(&self, binding: WidgetBinding) -> Option<(Rc<Delegate>, Payload)> {
        if !self.is_current(binding.dialog, binding.generation) {
            return None;
        }
        let dialog = &self.dialogs[binding.dialog];
        if dialog.closing {
            return None;
        }
        Some((Rc::clone(dialog.delegate()?), dialog.data().clone()))
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// Active dialogs, top to bottom.
    pub fn active_dialogs(&self) -> &[DialogId] {
        self.dialogs.active()
    }

    /// An active dialog.
    pub fn dialog(&self, id: DialogId) -> Option<&Dialog> {
        self.dialogs.is_active(id).then(|| &self.dialogs[id])
    }

    pub fn button(&self, id: ButtonId) -> Option<&Button> {
        self.buttons.is_active(id).then(|| &self.buttons[id])
    }

    pub fn checkbox(&self, id: CheckBoxId) -> Option<&CheckBox> {
        self.checkboxes.is_active(id).then(|| &self.checkboxes[id])
    }

    pub fn editbox(&self, id: EditBoxId) -> Option<&EditBox> {
        self.editboxes.is_active(id).then(|| &self.editboxes[id])
    }

    /// The first active dialog of a delegate, optionally also matching the
    /// payload by identity.
    pub fn active_dialog(
        &self,
        reference: impl Into<DelegateRef>,
        data: Option<&Payload>,
    ) -> Result<Option<DialogId>, DialogError> {
        let delegate = self.registry.resolve(&reference.into())?;
        Ok(self.dialogs.active().iter().copied().find(|&id| {
            let dialog = &self.dialogs[id];
            dialog.delegate().is_some_and(|d| Rc::ptr_eq(d, &delegate))
                && data.is_none_or(|p| dialog.data().same(p))
        }))
    }

    pub fn editbox_text(&self, id: EditBoxId) -> Option<&str> {
        self.editbox(id).map(EditBox::text)
    }

    /// Replace an edit box's text without running `on_text_changed`.
    pub fn set_editbox_text(&mut self, id: EditBoxId, text: &str) -> bool {
        if !self.editboxes.is_active(id) {
            return false;
        }
        self.editboxes[id].set_text(&mut *self.toolkit, text);
        true
    }

    pub fn checkbox_checked(&self, id: CheckBoxId) -> Option<bool> {
        self.checkbox(id).map(CheckBox::is_checked)
    }

    pub fn pool_stats(&self, kind: WidgetKind) -> PoolStats {
        match kind {
            WidgetKind::Dialog => self.dialogs.stats(),
            WidgetKind::Button => self.buttons.stats(),
            WidgetKind::CheckBox => self.checkboxes.stats(),
            WidgetKind::EditBox => self.editboxes.stats(),
        }
    }

    pub fn queued_len(&self) -> usize {
        self.queue.len()
    }

    /// Whether a delegate has a pending queued spawn.
    pub fn is_queued(&self, reference: impl Into<DelegateRef>) -> Result<bool, DialogError> {
        let delegate = self.registry.resolve(&reference.into())?;
        Ok(self.queue.contains(&delegate))
    }

    // ── Crate internals for the event hooks ─────────────────────────────

    pub(crate) fn is_current(&self, id: DialogId, generation: u64) -> bool {
        self.dialogs.is_active(id) && self.dialogs[id].generation() == generation
    }

    pub(crate) fn active_generations(&self) -> Vec<(DialogId, u64)> {
        self.dialogs
            .active()
            .iter()
            .map(|&id| (id, self.dialogs[id].generation()))
            .collect()
    }

    pub(crate) fn frame_owner(&self, frame: FrameHandle) -> Option<FrameOwner> {
        self.frames.get(&frame).copied()
    }

    pub(crate) fn policy(&self, id: DialogId) -> Option<DelegateFlags> {
        self.dialog(id)?.delegate().map(|d| d.policy())
    }

    /// Add `dt` to a dialog's shown time. Returns whether its duration has
    /// now elapsed.
    pub(crate) fn advance_timer(&mut self, id: DialogId, dt: Duration) -> bool {
        if !self.dialogs.is_active(id) {
            return false;
        }
        let dialog = &mut self.dialogs[id];
        dialog.elapsed += dt;
        let elapsed = dialog.elapsed;
        dialog
            .delegate()
            .and_then(|d| d.timeout())
            .is_some_and(|limit| elapsed >= limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delegate::{ButtonSpec, CheckBoxSpec};
    use ftui_core::toolkit::AmbientState;
    use ftui_harness::HeadlessToolkit;
    use std::cell::{Cell, RefCell};

    fn manager() -> (DialogManager, HeadlessToolkit) {
        let tk = HeadlessToolkit::new();
        (DialogManager::new(tk.clone(), DialogConfig::default()), tk)
    }

    fn shown(outcome: Result<SpawnOutcome, DialogError>) -> DialogId {
        outcome
            .expect("spawn should succeed")
            .dialog()
            .expect("dialog should be shown")
    }

    #[test]
    fn spawn_shows_and_plays_cues() {
        let (mut m, tk) = manager();
        let d = Delegate::new("Hello").sound("levelup");
        let id = shown(m.spawn(d, Payload::none()));
        let frame = m.dialog(id).expect("active").frame();
        assert!(tk.is_shown(frame));
        assert_eq!(tk.sounds(), vec!["levelup".to_string(), "igMainMenuOpen".to_string()]);
        assert_eq!(
            tk.text_of(m.dialog(id).expect("active").text_frame()).as_deref(),
            Some("Hello")
        );
    }

    #[test]
    fn empty_text_is_an_error() {
        let (mut m, _tk) = manager();
        assert_eq!(
            m.spawn(Delegate::new(""), Payload::none()),
            Err(DialogError::EmptyText)
        );
        assert_eq!(m.pool_stats(WidgetKind::Dialog).created, 0);
    }

    #[test]
    fn unknown_name_is_an_error() {
        let (mut m, _tk) = manager();
        assert_eq!(
            m.spawn("missing", Payload::none()),
            Err(DialogError::UnknownDelegate("missing".into()))
        );
    }

    #[test]
    fn hide_releases_every_widget() {
        let (mut m, _tk) = manager();
        let d = Delegate::new("Form")
            .button(ButtonSpec::new("OK", |_, _, _| false))
            .checkbox(CheckBoxSpec::new("Remember"))
            .editbox(EditBoxSpec::new().label("Name"));
        let id = shown(m.spawn(d, Payload::none()));
        assert_eq!(m.pool_stats(WidgetKind::Button).active, 1);

        assert!(m.hide(id));
        for kind in [
            WidgetKind::Dialog,
            WidgetKind::Button,
            WidgetKind::CheckBox,
            WidgetKind::EditBox,
        ] {
            let stats = m.pool_stats(kind);
            assert_eq!(stats.active, 0, "{kind:?}");
            assert_eq!(stats.free, 1, "{kind:?}");
        }
        assert!(m.dialog(id).is_none());
    }

    #[test]
    fn click_hides_unless_handler_keeps_open() {
        let (mut m, _tk) = manager();
        let keep = Rc::new(Cell::new(true));
        let flag = Rc::clone(&keep);
        let d = Delegate::new("Keep?").button(ButtonSpec::new("Go", move |_, _, _| flag.get()));
        let id = shown(m.spawn(d, Payload::none()));
        let button = m.dialog(id).expect("active").buttons()[0];

        assert!(m.click_button(button, MouseButton::Left, false));
        assert!(m.dialog(id).is_some());

        keep.set(false);
        assert!(m.click_button(button, MouseButton::Left, false));
        assert!(m.dialog(id).is_none());
        assert!(!m.click_button(button, MouseButton::Left, false));
    }

    #[test]
    fn on_hide_may_spawn_reentrantly() {
        let (mut m, _tk) = manager();
        let follow_up = Rc::new(Delegate::new("Next"));
        let next = Rc::clone(&follow_up);
        let d = Delegate::new("First").on_hide(move |m, _, _| {
            m.spawn(&next, Payload::none()).expect("valid");
        });
        let id = shown(m.spawn(d, Payload::none()));
        assert!(m.hide(id));
        assert_eq!(m.active_dialogs().len(), 1);
        assert!(m.active_dialog(&follow_up, None).expect("direct").is_some());
    }

    #[test]
    fn hide_inside_on_hide_is_ignored() {
        let (mut m, _tk) = manager();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let d = Delegate::new("Once").on_hide(move |m, id, _| {
            counter.set(counter.get() + 1);
            assert!(!m.hide(id));
        });
        let id = shown(m.spawn(d, Payload::none()));
        m.hide(id);
        assert_eq!(calls.get(), 1);
        assert!(m.active_dialogs().is_empty());
    }

    #[test]
    fn checkbox_initial_value_and_toggle() {
        let (mut m, _tk) = manager();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let d = Delegate::new("Options").checkbox(
            CheckBoxSpec::new("Loot")
                .get_value(|_, data| data.get::<bool>().copied().unwrap_or(false))
                .set_value(move |_, toggle, _| sink.borrow_mut().push(toggle.checked)),
        );
        let id = shown(m.spawn(d, Payload::new(true)));
        let cb = m.dialog(id).expect("active").checkboxes()[0];
        assert_eq!(m.checkbox_checked(cb), Some(true));

        m.click_checkbox(cb, MouseButton::Left, false);
        assert_eq!(m.checkbox_checked(cb), Some(false));
        assert_eq!(*seen.borrow(), vec![false]);
    }

    #[test]
    fn vetoed_spawn_calls_cancel_without_dialog() {
        let (mut m, tk) = manager();
        tk.set_ambient(AmbientState {
            player_dead: true,
            in_cinematic: false,
        });
        let reasons = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&reasons);
        let d = Delegate::new("Nope").on_cancel(move |_, dialog, _, reason| {
            sink.borrow_mut().push((dialog, reason));
        });
        assert_eq!(m.spawn(d, Payload::none()), Ok(SpawnOutcome::Vetoed));
        assert_eq!(*reasons.borrow(), vec![(None, CancelReason::Vetoed)]);
        assert_eq!(m.pool_stats(WidgetKind::Dialog).created, 0);

        let allowed = Delegate::new("Release spirit").flags(DelegateFlags::SHOW_WHILE_DEAD);
        assert!(m.spawn(allowed, Payload::none()).expect("valid").dialog().is_some());
    }

    #[test]
    fn auto_focus_focuses_editbox() {
        let (mut m, tk) = manager();
        let d = Delegate::new("Name?").editbox(EditBoxSpec::new().auto_focus());
        let id = shown(m.spawn(d, Payload::none()));
        let eb = m.dialog(id).expect("active").editboxes()[0];
        assert_eq!(tk.focused(), Some(m.editbox(eb).expect("active").frame()));
    }

    #[test]
    fn no_close_button_flag_hides_close_control() {
        let (mut m, tk) = manager();
        let d = Delegate::new("Sticky").flags(DelegateFlags::NO_CLOSE_BUTTON);
        let id = shown(m.spawn(d, Payload::none()));
        assert!(!tk.is_shown(m.dialog(id).expect("active").close_frame()));
    }

    #[test]
    fn direct_spawn_withdraws_pending_request() {
        let tk = HeadlessToolkit::new();
        let mut m = DialogManager::new(tk, DialogConfig::default().with_max_dialogs(1));
        let blocker = shown(m.spawn(Delegate::new("blocker"), Payload::none()));
        let d = Rc::new(Delegate::new("waiting"));
        assert_eq!(m.spawn(&d, Payload::none()), Ok(SpawnOutcome::Queued));

        assert!(m.release(blocker));
        let id = shown(m.spawn(&d, Payload::none()));
        assert_eq!(m.queued_len(), 0);

        assert!(m.hide(id));
        assert!(m.active_dialogs().is_empty());
    }

    #[test]
    fn debug_output_omits_toolkit() {
        let (m, _tk) = manager();
        let text = format!("{m:?}");
        assert!(text.starts_with("DialogManager"));
    }
}
