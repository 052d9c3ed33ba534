#![forbid(unsafe_code)]

//! Widget pools.
//!
//! Every widget kind lives in its own [`Pool`]: an arena of instances that
//! were constructed once and are never destroyed, split into an unordered
//! free list and an ordered active list. An instance is in exactly one of the
//! two at any time.
//!
//! Construction asks the host for frames and is comparatively expensive, so
//! [`Pool::acquire`] always prefers a free instance. [`Pool::release`] hides
//! the instance, detaches it, and resets it before putting it back.

use std::fmt;
use std::hash::Hash;
use std::ops::{Index, IndexMut};

use ftui_core::toolkit::{FrameHandle, FrameKind, Toolkit};
use ftui_layout::LayoutMetrics;

/// Typed index into a [`Pool`].
pub trait PoolId: Copy + Eq + Hash + fmt::Debug {
    fn from_index(index: usize) -> Self;
    fn index(self) -> usize;
}

macro_rules! pool_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl PoolId for $name {
            #[inline]
            fn from_index(index: usize) -> Self {
                Self(index as u32)
            }

            #[inline]
            fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl $name {
            /// Arena index of the instance.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

pool_id!(
    /// Handle to a pooled dialog.
    DialogId
);
pool_id!(
    /// Handle to a pooled button.
    ButtonId
);
pool_id!(
    /// Handle to a pooled check box.
    CheckBoxId
);
pool_id!(
    /// Handle to a pooled edit box.
    EditBoxId
);

/// The pooled widget kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Dialog,
    Button,
    CheckBox,
    EditBox,
}

impl WidgetKind {
    /// Frame name prefix. Instances are named `<prefix><n>` in creation
    /// order, starting at 1.
    pub const fn frame_prefix(self) -> &'static str {
        match self {
            Self::Dialog => "FtuiDialog",
            Self::Button => "FtuiDialogButton",
            Self::CheckBox => "FtuiDialogCheckBox",
            Self::EditBox => "FtuiDialogEditBox",
        }
    }

    /// Host frame kind of the instance's root frame.
    pub const fn frame_kind(self) -> FrameKind {
        match self {
            Self::Dialog => FrameKind::Dialog,
            Self::Button => FrameKind::Button,
            Self::CheckBox => FrameKind::CheckBox,
            Self::EditBox => FrameKind::EditBox,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dialog => "dialog",
            Self::Button => "button",
            Self::CheckBox => "checkbox",
            Self::EditBox => "editbox",
        }
    }
}

/// Who currently owns an attached widget, and which spec slot it serves.
///
/// Rewritten on every acquisition. Handlers resolve it at event time, so a
/// recycled widget always follows its current dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetBinding {
    pub dialog: DialogId,
    /// Generation of `dialog` when the binding was made.
    pub generation: u64,
    /// Position of the spec in the delegate's list for this widget kind.
    pub index: usize,
}

/// A widget that can live in a [`Pool`].
pub trait Recyclable {
    type Id: PoolId;
    const KIND: WidgetKind;

    /// Build a new instance, creating its host frames.
    fn construct(
        id: Self::Id,
        name: &str,
        toolkit: &mut dyn Toolkit,
        metrics: &LayoutMetrics,
    ) -> Self;

    /// Root frame of the instance.
    fn frame(&self) -> FrameHandle;

    /// Drop all per-use state. The pool has already hidden, detached, and
    /// unanchored the root frame.
    fn reset(&mut self, toolkit: &mut dyn Toolkit);
}

/// Result of [`Pool::acquire`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Acquired<I> {
    pub id: I,
    /// The instance was constructed by this call.
    pub fresh: bool,
}

/// Instance counts of one pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolStats {
    /// Instances ever constructed.
    pub created: usize,
    pub active: usize,
    pub free: usize,
}

/// Free list plus active list over an arena of `T`.
pub struct Pool<T: Recyclable> {
    items: Vec<T>,
    free: Vec<T::Id>,
    active: Vec<T::Id>,
}

impl<T: Recyclable> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Recyclable> Pool<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            free: Vec::new(),
            active: Vec::new(),
        }
    }

    /// Take an idle instance, constructing one on a miss, and append it to
    /// the active list.
    pub fn acquire(&mut self, toolkit: &mut dyn Toolkit, metrics: &LayoutMetrics) -> Acquired<T::Id> {
        if let Some(id) = self.free.pop() {
            self.active.push(id);
            ftui_core::trace!(kind = T::KIND.as_str(), index = id.index(), "pool hit");
            return Acquired { id, fresh: false };
        }

        let id = T::Id::from_index(self.items.len());
        let name = format!("{}{}", T::KIND.frame_prefix(), self.items.len() + 1);
        ftui_core::debug!(kind = T::KIND.as_str(), name = %name, "pool miss, constructing");
        self.items.push(T::construct(id, &name, toolkit, metrics));
        self.active.push(id);
        Acquired { id, fresh: true }
    }

    /// Return an active instance to the free list.
    ///
    /// Returns `false`, and changes nothing, when `id` is not active.
    pub fn release(&mut self, id: T::Id, toolkit: &mut dyn Toolkit) -> bool {
        let Some(pos) = self.active.iter().position(|&a| a == id) else {
            ftui_core::warn!(
                kind = T::KIND.as_str(),
                index = id.index(),
                "release of inactive widget ignored"
            );
            return false;
        };
        self.active.remove(pos);

        let item = &mut self.items[id.index()];
        let frame = item.frame();
        toolkit.hide(frame);
        toolkit.set_parent(frame, None);
        toolkit.clear_anchors(frame);
        item.reset(toolkit);

        self.free.push(id);
        true
    }

    pub fn get(&self, id: T::Id) -> Option<&T> {
        self.items.get(id.index())
    }

    pub fn get_mut(&mut self, id: T::Id) -> Option<&mut T> {
        self.items.get_mut(id.index())
    }

    /// Active instances in acquisition order.
    pub fn active(&self) -> &[T::Id] {
        &self.active
    }

    pub fn is_active(&self, id: T::Id) -> bool {
        self.active.contains(&id)
    }

    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            created: self.items.len(),
            active: self.active.len(),
            free: self.free.len(),
        }
    }
}

impl<T: Recyclable> Index<T::Id> for Pool<T> {
    type Output = T;

    fn index(&self, id: T::Id) -> &T {
        &self.items[id.index()]
    }
}

impl<T: Recyclable> IndexMut<T::Id> for Pool<T> {
    fn index_mut(&mut self, id: T::Id) -> &mut T {
        &mut self.items[id.index()]
    }
}

impl<T: Recyclable> fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("kind", &T::KIND)
            .field("created", &self.items.len())
            .field("free", &self.free)
            .field("active", &self.active)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::Button;
    use ftui_harness::HeadlessToolkit;

    fn setup() -> (Pool<Button>, HeadlessToolkit, LayoutMetrics) {
        (Pool::new(), HeadlessToolkit::new(), LayoutMetrics::default())
    }

    #[test]
    fn miss_then_hit() {
        let (mut pool, mut tk, m) = setup();
        let a = pool.acquire(&mut tk, &m);
        assert!(a.fresh);
        assert!(pool.release(a.id, &mut tk));

        let b = pool.acquire(&mut tk, &m);
        assert!(!b.fresh);
        assert_eq!(a.id, b.id);
        assert_eq!(pool.stats().created, 1);
    }

    #[test]
    fn names_follow_creation_order() {
        let (mut pool, mut tk, m) = setup();
        let a = pool.acquire(&mut tk, &m).id;
        let b = pool.acquire(&mut tk, &m).id;
        assert_eq!(tk.frame_name(pool[a].frame()).as_deref(), Some("FtuiDialogButton1"));
        assert_eq!(tk.frame_name(pool[b].frame()).as_deref(), Some("FtuiDialogButton2"));
    }

    #[test]
    fn active_order_is_acquisition_order() {
        let (mut pool, mut tk, m) = setup();
        let ids: Vec<_> = (0..3).map(|_| pool.acquire(&mut tk, &m).id).collect();
        assert_eq!(pool.active(), ids.as_slice());
        pool.release(ids[1], &mut tk);
        assert_eq!(pool.active(), &[ids[0], ids[2]]);
    }

    #[test]
    fn double_release_is_tolerated() {
        let (mut pool, mut tk, m) = setup();
        let id = pool.acquire(&mut tk, &m).id;
        assert!(pool.release(id, &mut tk));
        assert!(!pool.release(id, &mut tk));
        assert_eq!(
            pool.stats(),
            PoolStats {
                created: 1,
                active: 0,
                free: 1
            }
        );
    }

    #[test]
    fn release_hides_and_detaches() {
        let (mut pool, mut tk, m) = setup();
        let parent = tk.create_frame(FrameKind::Dialog, "Parent", None);
        let id = pool.acquire(&mut tk, &m).id;
        let frame = pool[id].frame();
        tk.set_parent(frame, Some(parent));
        tk.show(frame);

        pool.release(id, &mut tk);
        assert!(!tk.is_shown(frame));
        assert_eq!(tk.parent_of(frame), None);
        assert!(tk.anchors_of(frame).is_empty());
    }
}
