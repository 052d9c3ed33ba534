#![forbid(unsafe_code)]

//! Pooled, queued popup dialogs.
//!
//! Callers describe a dialog once as a [`Delegate`] and spawn it as often as
//! they like. At most [`DialogConfig::max_dialogs`] dialogs are visible at a
//! time; further spawns wait in a queue and appear as slots free up. Every
//! dialog, button, check box, and edit box comes from a pool and goes back
//! to it on hide, so host frames are created once and reused.
//!
//! ```
//! use ftui_dialog::{ButtonSpec, Delegate, DialogConfig, DialogManager, Payload};
//! use ftui_harness::HeadlessToolkit;
//!
//! let mut dialogs = DialogManager::new(HeadlessToolkit::new(), DialogConfig::default());
//! dialogs
//!     .register(
//!         "confirm_quit",
//!         Delegate::new("Quit now?")
//!             .button(ButtonSpec::new("Quit", |_, _, _| false))
//!             .button(ButtonSpec::new("Cancel", |_, _, _| false)),
//!     )
//!     .unwrap();
//!
//! let shown = dialogs.spawn("confirm_quit", Payload::none()).unwrap();
//! let id = shown.dialog().unwrap();
//! assert_eq!(dialogs.dialog(id).unwrap().buttons().len(), 2);
//! ```

pub mod anchor;
pub mod config;
pub mod delegate;
pub mod dialog;
pub mod error;
mod hooks;
pub mod manager;
pub mod payload;
pub mod pool;
pub mod queue;
pub mod registry;
pub mod widgets;

pub use config::{DialogConfig, SoundCues};
pub use delegate::{
    ButtonClick, ButtonSpec, CancelReason, CheckBoxSpec, CheckBoxToggle, Delegate, DelegateFlags,
    DialogText, EditBoxInput, EditBoxSpec,
};
pub use dialog::Dialog;
pub use error::DialogError;
pub use manager::{DialogManager, SpawnOutcome};
pub use payload::Payload;
pub use pool::{ButtonId, CheckBoxId, DialogId, EditBoxId, PoolStats, WidgetBinding, WidgetKind};
pub use registry::{DelegateRef, Registry};
pub use widgets::{Button, CheckBox, EditBox};
