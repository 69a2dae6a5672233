// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Undoable edits.
//!
//! A [`Command`] describes one user-level edit. [`History::apply`] performs it
//! on a [`Canvas`], which keeps the spatial index and the z-order in step, and
//! records what is needed to reverse it: removed items keep the neighbour they
//! sat above, reorders keep the previous neighbour, geometry edits keep the old
//! item. Undo and redo bring items back under their original ids, so entries
//! further down either stack stay valid.
//!
//! ```
//! use std::rc::Rc;
//! use easel_canvas::{Canvas, Command, History, QueryFilter, ReorderOp};
//! use easel_canvas::shapes::Rectangle;
//! use kurbo::{Point, Rect};
//!
//! let mut canvas = Canvas::new();
//! let mut history = History::new();
//! let a = history.apply(&mut canvas, Command::Add(Rc::new(Rectangle::new(Rect::new(0.0, 0.0, 10.0, 10.0), 1.0))))[0];
//! let b = history.apply(&mut canvas, Command::Add(Rc::new(Rectangle::new(Rect::new(0.0, 0.0, 10.0, 10.0), 1.0))))[0];
//! history.apply(&mut canvas, Command::Reorder(a, ReorderOp::BringToFront));
//!
//! let corner = Point::new(0.0, 0.0);
//! assert_eq!(canvas.hit_test(&corner, QueryFilter::PICK), Some(a));
//! history.undo(&mut canvas);
//! assert_eq!(canvas.hit_test(&corner, QueryFilter::PICK), Some(b));
//! ```

use alloc::rc::Rc;
use alloc::vec::Vec;

use kurbo::Vec2;

use crate::canvas::Canvas;
use crate::shape::Item;
use crate::types::{ItemFlags, ItemId};

/// A stacking change.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ReorderOp {
    /// Swap with the item directly in front.
    BringForward,
    /// Swap with the item directly behind.
    SendBackward,
    /// Move in front of everything.
    BringToFront,
    /// Move behind everything.
    SendToBack,
}

impl ReorderOp {
    fn apply(self, canvas: &mut Canvas, id: ItemId) -> bool {
        match self {
            Self::BringForward => canvas.bring_forward(id),
            Self::SendBackward => canvas.send_backward(id),
            Self::BringToFront => canvas.bring_to_front(id),
            Self::SendToBack => canvas.send_to_back(id),
        }
    }
}

/// A user-level edit.
#[derive(Clone, Debug)]
pub enum Command {
    /// Add an item in front of everything.
    Add(Rc<dyn Item>),
    /// Remove items, such as everything an eraser stroke touched.
    Remove(Vec<ItemId>),
    /// Move items by an offset.
    Move(Vec<ItemId>, Vec2),
    /// Swap in new geometry for one item.
    Replace(ItemId, Rc<dyn Item>),
    /// Change one item's stacking position.
    Reorder(ItemId, ReorderOp),
}

/// An item as it sat on the canvas when it was taken off.
#[derive(Clone, Debug)]
struct Removal {
    id: ItemId,
    item: Rc<dyn Item>,
    below: Option<ItemId>,
    flags: ItemFlags,
}

impl Removal {
    fn take(canvas: &mut Canvas, id: ItemId) -> Option<Self> {
        let below = canvas.below(id);
        let flags = canvas.flags(id)?;
        let item = canvas.remove(id)?;
        Some(Self {
            id,
            item,
            below,
            flags,
        })
    }

    fn put_back(&self, canvas: &mut Canvas) {
        let restored = canvas.restore(self.id, self.item.clone(), self.below, self.flags);
        debug_assert!(
            restored,
            "slot of {:?} was reused out of history order",
            self.id
        );
    }
}

#[derive(Clone, Debug)]
enum Change {
    /// `flags` are refreshed each time the add is undone.
    Added(Removal),
    /// In removal order.
    Removed(Vec<Removal>),
    /// `(id, before, after)`.
    Replaced(Vec<(ItemId, Rc<dyn Item>, Rc<dyn Item>)>),
    Reordered {
        id: ItemId,
        op: ReorderOp,
        below_before: Option<ItemId>,
    },
}

#[derive(Clone, Debug)]
struct Entry {
    serial: u64,
    change: Change,
}

/// Undo and redo stacks over a [`Canvas`], with saved-state tracking.
#[derive(Clone, Debug)]
pub struct History {
    undo: Vec<Entry>,
    redo: Vec<Entry>,
    limit: Option<usize>,
    next_serial: u64,
    /// Serial of the state at the bottom of the undo stack.
    base: u64,
    /// Serial of the state last marked saved.
    saved: u64,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// Create an empty, unbounded history. The initial state counts as saved.
    pub fn new() -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            limit: None,
            next_serial: 1,
            base: 0,
            saved: 0,
        }
    }

    /// Create a history that keeps at most `limit` undo steps, dropping the oldest.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::new()
        }
    }

    /// Perform `command` on `canvas` and record it.
    ///
    /// Returns the ids the command affected. When that is empty (stale ids,
    /// a reorder at the boundary) nothing is recorded and the redo stack is kept.
    pub fn apply(&mut self, canvas: &mut Canvas, command: Command) -> Vec<ItemId> {
        let change = match command {
            Command::Add(item) => {
                let below = canvas.front();
                let id = canvas.add(item.clone());
                Some(Change::Added(Removal {
                    id,
                    item,
                    below,
                    flags: ItemFlags::default(),
                }))
            }
            Command::Remove(ids) => {
                let removed: Vec<Removal> = ids
                    .into_iter()
                    .filter_map(|id| Removal::take(canvas, id))
                    .collect();
                (!removed.is_empty()).then_some(Change::Removed(removed))
            }
            Command::Move(ids, delta) => {
                let mut replaced = Vec::new();
                for id in ids {
                    let Some(after) = canvas.get(id).map(|item| item.translated(delta)) else {
                        continue;
                    };
                    if let Some(before) = canvas.replace(id, after.clone()) {
                        replaced.push((id, before, after));
                    }
                }
                (!replaced.is_empty()).then_some(Change::Replaced(replaced))
            }
            Command::Replace(id, after) => canvas
                .replace(id, after.clone())
                .map(|before| Change::Replaced(alloc::vec![(id, before, after)])),
            Command::Reorder(id, op) => {
                let below_before = canvas.below(id);
                op.apply(canvas, id).then_some(Change::Reordered {
                    id,
                    op,
                    below_before,
                })
            }
        };
        let Some(change) = change else {
            return Vec::new();
        };
        let affected = change.ids();
        self.redo.clear();
        let serial = self.next_serial;
        self.next_serial += 1;
        self.undo.push(Entry { serial, change });
        if let Some(limit) = self.limit
            && self.undo.len() > limit
        {
            let excess = self.undo.len() - limit;
            self.base = self.undo[excess - 1].serial;
            self.undo.drain(..excess);
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(serial, items = affected.len(), "command recorded");
        affected
    }

    /// Reverse the most recent command. Returns `false` if there is none.
    pub fn undo(&mut self, canvas: &mut Canvas) -> bool {
        let Some(mut entry) = self.undo.pop() else {
            return false;
        };
        match &mut entry.change {
            Change::Added(added) => {
                if let Some(flags) = canvas.flags(added.id) {
                    added.flags = flags;
                }
                canvas.remove(added.id);
            }
            Change::Removed(removed) => {
                for removal in removed.iter().rev() {
                    removal.put_back(canvas);
                }
            }
            Change::Replaced(replaced) => {
                for (id, before, _) in replaced.iter().rev() {
                    canvas.replace(*id, before.clone());
                }
            }
            Change::Reordered {
                id, below_before, ..
            } => {
                canvas.move_above(*id, *below_before);
            }
        }
        self.redo.push(entry);
        true
    }

    /// Re-apply the most recently undone command. Returns `false` if there is none.
    pub fn redo(&mut self, canvas: &mut Canvas) -> bool {
        let Some(mut entry) = self.redo.pop() else {
            return false;
        };
        match &mut entry.change {
            Change::Added(added) => added.put_back(canvas),
            Change::Removed(removed) => {
                for removal in removed.iter_mut() {
                    // Flags may have changed since the undo brought it back.
                    if let Some(taken) = Removal::take(canvas, removal.id) {
                        removal.flags = taken.flags;
                    }
                }
            }
            Change::Replaced(replaced) => {
                for (id, _, after) in replaced {
                    canvas.replace(*id, after.clone());
                }
            }
            Change::Reordered { id, op, .. } => {
                op.apply(canvas, *id);
            }
        }
        self.undo.push(entry);
        true
    }

    /// Whether [`undo`](Self::undo) has anything to reverse.
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Whether [`redo`](Self::redo) has anything to re-apply.
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Number of undo steps available.
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    /// Number of redo steps available.
    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Forget every step. The current state becomes the saved one.
    pub fn clear(&mut self) {
        self.base = self.current();
        self.saved = self.base;
        self.undo.clear();
        self.redo.clear();
    }

    /// Whether the canvas differs from the state last marked saved.
    pub fn is_dirty(&self) -> bool {
        self.saved != self.current()
    }

    /// Record the current state as saved.
    pub fn mark_saved(&mut self) {
        self.saved = self.current();
    }

    fn current(&self) -> u64 {
        self.undo.last().map_or(self.base, |e| e.serial)
    }
}

impl Change {
    fn ids(&self) -> Vec<ItemId> {
        match self {
            Self::Added(Removal { id, .. }) | Self::Reordered { id, .. } => alloc::vec![*id],
            Self::Removed(removed) => removed.iter().map(|r| r.id).collect(),
            Self::Replaced(replaced) => replaced.iter().map(|(id, ..)| *id).collect(),
        }
    }
}
