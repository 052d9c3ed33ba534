#![forbid(unsafe_code)]

//! Host integration.
//!
//! The host forwards its lifecycle hooks through
//! [`DialogManager::handle_host_event`] and raw frame input through
//! [`DialogManager::dispatch`].

use std::time::Duration;

use ftui_core::event::{HostEvent, WidgetAction, WidgetEvent};

use crate::delegate::{CancelReason, DelegateFlags};
use crate::manager::{DialogManager, FrameOwner};
use crate::pool::DialogId;

impl DialogManager {
    /// React to a host event. Returns whether any dialog state changed or,
    /// for [`HostEvent::EscapePressed`], whether the key was consumed.
    pub fn handle_host_event(&mut self, event: &HostEvent) -> bool {
        ftui_core::trace!(event = ?event, "host event");
        match event {
            HostEvent::EscapePressed => self.escape_all(),
            HostEvent::DefaultDialogShown
            | HostEvent::DefaultDialogHidden
            | HostEvent::DefaultDialogsRepositioned => {
                self.refresh_anchors();
                self.drain_queue();
                true
            }
            HostEvent::PlayerDied => self.cancel_lacking(DelegateFlags::SHOW_WHILE_DEAD) > 0,
            HostEvent::CinematicStarted => {
                self.cancel_lacking(DelegateFlags::SHOW_DURING_CINEMATIC) > 0
            }
            HostEvent::Tick(dt) => self.tick(*dt) > 0,
        }
    }

    /// Route input on a host frame to the widget that owns it.
    ///
    /// Hidden frames and frames this manager did not create are ignored.
    pub fn dispatch(&mut self, event: &WidgetEvent) -> bool {
        let Some(owner) = self.frame_owner(event.frame) else {
            return false;
        };
        if !self.toolkit().is_shown(event.frame) {
            return false;
        }
        match (owner, &event.action) {
            (FrameOwner::Button(id), WidgetAction::Click { button, pressed }) => {
                self.click_button(id, *button, *pressed)
            }
            (FrameOwner::CheckBox(id), WidgetAction::Click { button, pressed }) => {
                self.click_checkbox(id, *button, *pressed)
            }
            (FrameOwner::Close(id), WidgetAction::Click { .. }) => self.click_close(id),
            (FrameOwner::EditBox(id), WidgetAction::EnterPressed) => self.editbox_enter(id),
            (FrameOwner::EditBox(id), WidgetAction::EscapePressed) => self.editbox_escape(id),
            (FrameOwner::EditBox(id), WidgetAction::TextChanged(text)) => {
                self.editbox_text_changed(id, text)
            }
            _ => false,
        }
    }

    /// Escape every dialog that hides on escape.
    fn escape_all(&mut self) -> bool {
        let mut consumed = false;
        for (id, generation) in self.active_generations() {
            if self.is_current(id, generation) && self.escape(id) {
                consumed = true;
            }
        }
        consumed
    }

    /// Cancel active dialogs whose delegate lacks `flag`.
    fn cancel_lacking(&mut self, flag: DelegateFlags) -> usize {
        let targets: Vec<(DialogId, u64)> = self
            .active_generations()
            .into_iter()
            .filter(|&(id, _)| self.policy(id).is_some_and(|p| !p.contains(flag)))
            .collect();
        let mut cancelled = 0;
        for (id, generation) in targets {
            if self.is_current(id, generation) && self.cancel(id, CancelReason::Ambient) {
                cancelled += 1;
            }
        }
        cancelled
    }

    /// Advance dialog timers and time out the expired ones.
    fn tick(&mut self, dt: Duration) -> usize {
        let expired: Vec<(DialogId, u64)> = self
            .active_generations()
            .into_iter()
            .filter(|&(id, _)| self.advance_timer(id, dt))
            .collect();
        let mut timed_out = 0;
        for (id, generation) in expired {
            if self.is_current(id, generation) && self.cancel(id, CancelReason::Timeout) {
                timed_out += 1;
            }
        }
        timed_out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DialogConfig;
    use crate::delegate::{ButtonSpec, Delegate, EditBoxSpec};
    use crate::payload::Payload;
    use ftui_core::event::MouseButton;
    use ftui_core::toolkit::Toolkit;
    use ftui_harness::HeadlessToolkit;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn manager() -> (DialogManager, HeadlessToolkit) {
        let tk = HeadlessToolkit::new();
        (DialogManager::new(tk.clone(), DialogConfig::default()), tk)
    }

    fn recorder() -> (
        Rc<RefCell<Vec<CancelReason>>>,
        impl Fn(&mut DialogManager, Option<DialogId>, &Payload, CancelReason) + 'static,
    ) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        (log, move |_: &mut DialogManager, _, _: &Payload, reason| {
            sink.borrow_mut().push(reason)
        })
    }

    #[test]
    fn escape_hides_only_flagged_dialogs() {
        let (mut m, _tk) = manager();
        let (log, on_cancel) = recorder();
        let escapable = Delegate::new("Esc me")
            .flags(DelegateFlags::HIDE_ON_ESCAPE)
            .on_cancel(on_cancel);
        m.spawn(escapable, Payload::none()).expect("valid");
        m.spawn(Delegate::new("Stay"), Payload::none()).expect("valid");

        assert!(m.handle_host_event(&HostEvent::EscapePressed));
        assert_eq!(m.active_dialogs().len(), 1);
        assert_eq!(*log.borrow(), vec![CancelReason::Escape]);
        assert!(!m.handle_host_event(&HostEvent::EscapePressed));
    }

    #[test]
    fn cancel_ignores_escape_skips_on_cancel() {
        let (mut m, _tk) = manager();
        let (log, on_cancel) = recorder();
        let d = Delegate::new("Quiet")
            .flags(DelegateFlags::HIDE_ON_ESCAPE | DelegateFlags::CANCEL_IGNORES_ESCAPE)
            .on_cancel(on_cancel);
        m.spawn(d, Payload::none()).expect("valid");
        assert!(m.handle_host_event(&HostEvent::EscapePressed));
        assert!(m.active_dialogs().is_empty());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn duration_times_out() {
        let (mut m, _tk) = manager();
        let (log, on_cancel) = recorder();
        let d = Delegate::new("Brief")
            .duration(Duration::from_secs(2))
            .on_cancel(on_cancel);
        m.spawn(d, Payload::none()).expect("valid");

        assert!(!m.handle_host_event(&HostEvent::Tick(Duration::from_millis(1500))));
        assert_eq!(m.active_dialogs().len(), 1);
        assert!(m.handle_host_event(&HostEvent::Tick(Duration::from_millis(500))));
        assert!(m.active_dialogs().is_empty());
        assert_eq!(*log.borrow(), vec![CancelReason::Timeout]);
    }

    #[test]
    fn player_death_hides_ordinary_dialogs() {
        let (mut m, _tk) = manager();
        let (log, on_cancel) = recorder();
        m.spawn(Delegate::new("Trade?").on_cancel(on_cancel), Payload::none())
            .expect("valid");
        m.spawn(
            Delegate::new("Release").flags(DelegateFlags::SHOW_WHILE_DEAD),
            Payload::none(),
        )
        .expect("valid");

        assert!(m.handle_host_event(&HostEvent::PlayerDied));
        assert_eq!(m.active_dialogs().len(), 1);
        assert_eq!(*log.borrow(), vec![CancelReason::Ambient]);
    }

    #[test]
    fn dispatch_routes_button_clicks() {
        let (mut m, _tk) = manager();
        let clicks = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&clicks);
        let d = Delegate::new("Pick")
            .button(ButtonSpec::new("A", |_, _, _| true))
            .button(ButtonSpec::new("B", move |_, click, _| {
                sink.borrow_mut().push((click.index, click.mouse));
                false
            }));
        let id = m.spawn(d, Payload::none()).expect("valid").dialog().expect("shown");
        let b = m.dialog(id).expect("active").buttons()[1];
        let frame = m.button(b).expect("active").frame();

        let event = WidgetEvent::new(
            frame,
            WidgetAction::Click {
                button: MouseButton::Right,
                pressed: false,
            },
        );
        assert!(m.dispatch(&event));
        assert_eq!(*clicks.borrow(), vec![(1, MouseButton::Right)]);
        assert!(m.active_dialogs().is_empty());
        assert!(!m.dispatch(&event));
    }

    #[test]
    fn dispatch_text_changes_and_enter() {
        let (mut m, _tk) = manager();
        let entered = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&entered);
        let d = Delegate::new("Name?").editbox(
            EditBoxSpec::new()
                .max_letters(3)
                .on_enter_pressed(move |_, input, _| sink.borrow_mut().push(input.text.clone())),
        );
        let id = m.spawn(d, Payload::none()).expect("valid").dialog().expect("shown");
        let eb = m.dialog(id).expect("active").editboxes()[0];
        let frame = m.editbox(eb).expect("active").frame();

        m.dispatch(&WidgetEvent::new(frame, WidgetAction::TextChanged("Arthas".into())));
        assert_eq!(m.editbox_text(eb), Some("Art"));
        assert!(m.dispatch(&WidgetEvent::new(frame, WidgetAction::EnterPressed)));
        assert_eq!(*entered.borrow(), vec!["Art".to_string()]);
    }

    #[test]
    fn dispatch_close_cancels() {
        let (mut m, tk) = manager();
        let (log, on_cancel) = recorder();
        let id = m
            .spawn(Delegate::new("Close me").on_cancel(on_cancel), Payload::none())
            .expect("valid")
            .dialog()
            .expect("shown");
        let close = m.dialog(id).expect("active").close_frame();
        assert!(tk.is_shown(close));
        assert!(m.dispatch(&WidgetEvent::click(close)));
        assert_eq!(*log.borrow(), vec![CancelReason::CloseButton]);
        assert!(m.active_dialogs().is_empty());
    }

    #[test]
    fn unknown_frames_are_ignored() {
        let (mut m, mut tk) = manager();
        let foreign = tk.create_frame(ftui_core::toolkit::FrameKind::Button, "Other", None);
        assert!(!m.dispatch(&WidgetEvent::click(foreign)));
    }
}
