//! Drag lifecycle with hover settling.
//!
//! A drag passing quickly over several icons must not reorder the grid at
//! every one of them.  [`DragSession`] only commits once the pointer has
//! rested on the same [`DropTarget`] for the configured drop delay.
//!
//! ```text
//!   Idle ──begin──▶ Dragging ──hover──▶ Settling ──fire (deadline)──▶ Dragging
//!                      ▲                   │  │
//!                      └──── leave / ──────┘  └─ release ─▶ Idle (pending move dropped)
//!                            new target
//! ```
//!
//! Timers are not callbacks.  Each hover hands out a [`HoverToken`]; the
//! event loop sleeps until [`deadline`](DragSession::deadline) and then calls
//! [`fire`](DragSession::fire) with the token it was given.  A token that is
//! no longer current (target changed, drag cancelled or dropped) fires as a
//! no-op.

use crate::item::ItemId;
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// What the dragged item is currently over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropTarget {
    /// Another item (a page item or a member of the open folder).
    ///
    /// `merge` is set when the pointer rests on the centre of the icon, which
    /// asks for folder creation / insertion instead of a reorder.
    Item { id: ItemId, merge: bool },
    /// The backdrop around an open folder; dropping there takes the app out.
    RemoveZone,
    /// Empty space on a page; the item goes to the end of that page.
    Page(usize),
}

/// Identifies one scheduled settle timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HoverToken(u64);

/// A mutation the orchestrator should apply now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingMove {
    pub item: ItemId,
    pub target: DropTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Dragging {
        item: ItemId,
    },
    Settling {
        item: ItemId,
        target: DropTarget,
        token: HoverToken,
        deadline: Instant,
    },
}

/// Drag state machine for one pointer.
#[derive(Debug)]
pub struct DragSession {
    phase: DragPhase,
    delay: Duration,
    next_token: u64,
}

impl DragSession {
    pub fn new(delay: Duration) -> Self {
        Self {
            phase: DragPhase::Idle,
            delay,
            next_token: 0,
        }
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// The item being dragged, if any.
    pub fn dragged(&self) -> Option<ItemId> {
        match self.phase {
            DragPhase::Idle => None,
            DragPhase::Dragging { item } | DragPhase::Settling { item, .. } => Some(item),
        }
    }

    /// When the pending settle timer elapses.
    pub fn deadline(&self) -> Option<Instant> {
        match self.phase {
            DragPhase::Settling { deadline, .. } => Some(deadline),
            _ => None,
        }
    }

    /// Start dragging `item`, abandoning any previous drag.
    pub fn begin(&mut self, item: ItemId) {
        debug!("drag begin {}", item);
        self.phase = DragPhase::Dragging { item };
    }

    /// The pointer entered `target`.
    ///
    /// Re-entering the target that is already settling keeps its timer.
    /// Any other target replaces the timer.  Returns the token of the timer
    /// now running, or `None` when nothing is being dragged or the target is
    /// the dragged item itself.
    pub fn hover(&mut self, target: DropTarget, now: Instant) -> Option<HoverToken> {
        let item = self.dragged()?;
        if let DragPhase::Settling {
            target: current,
            token,
            ..
        } = self.phase
        {
            if current == target {
                return Some(token);
            }
        }
        if matches!(target, DropTarget::Item { id, .. } if id == item) {
            self.phase = DragPhase::Dragging { item };
            return None;
        }
        let token = HoverToken(self.next_token);
        self.next_token += 1;
        self.phase = DragPhase::Settling {
            item,
            target,
            token,
            deadline: now + self.delay,
        };
        debug!("hover {:?}, settles in {:?}", target, self.delay);
        Some(token)
    }

    /// The pointer left its target without entering a new one.
    pub fn leave(&mut self) {
        if let DragPhase::Settling { item, .. } = self.phase {
            self.phase = DragPhase::Dragging { item };
        }
    }

    /// A settle timer elapsed.
    ///
    /// Commits only if `token` is still the current one and its deadline has
    /// passed.  The drag itself continues: the pointer is still held and may
    /// settle on further targets.
    pub fn fire(&mut self, token: HoverToken, now: Instant) -> Option<PendingMove> {
        match self.phase {
            DragPhase::Settling {
                item,
                target,
                token: current,
                deadline,
            } if current == token && now >= deadline => {
                self.phase = DragPhase::Dragging { item };
                Some(PendingMove { item, target })
            }
            _ => None,
        }
    }

    /// Fire whatever timer is due at `now`.
    pub fn poll(&mut self, now: Instant) -> Option<PendingMove> {
        match self.phase {
            DragPhase::Settling { token, .. } => self.fire(token, now),
            _ => None,
        }
    }

    /// The pointer was released over `target` (or over nothing).
    ///
    /// Only the folder remove zone commits on release.  Any other release
    /// ends the drag, and a settle timer still running is dropped with it:
    /// a move takes effect only once its hover has settled.  The session is
    /// idle afterwards either way.
    pub fn release(&mut self, target: Option<DropTarget>) -> Option<PendingMove> {
        let phase = std::mem::replace(&mut self.phase, DragPhase::Idle);
        let item = match phase {
            DragPhase::Idle => return None,
            DragPhase::Dragging { item } | DragPhase::Settling { item, .. } => item,
        };
        match target {
            Some(DropTarget::RemoveZone) => {
                debug!("drag {} dropped on the remove zone", item);
                Some(PendingMove {
                    item,
                    target: DropTarget::RemoveZone,
                })
            }
            _ => {
                debug!("drag {} released", item);
                None
            }
        }
    }

    /// Abandon the drag.  Pending tokens become stale.
    pub fn cancel(&mut self) {
        if self.phase != DragPhase::Idle {
            debug!("drag cancelled");
        }
        self.phase = DragPhase::Idle;
    }
}
