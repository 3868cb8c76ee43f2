//! Frame-driven task scheduling.
//!
//! Work runs as self-rescheduling tasks: a task asks to be run on the next
//! frame, and when the frame comes it runs once and must ask again to keep
//! going. A standing request is withdrawn with [`FrameClock::cancel`], after
//! which the task can no longer run.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

/// Handle to a standing frame request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameRequestId(u64);

/// Work the pond can schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameTask {
    /// Tick the tadpole with this id
    Tadpole(usize),
    /// Shrink active food and release eaten slots
    Depletion,
}

/// Monotonic frame counter holding the requests for the next frame
#[derive(Debug, Default)]
pub struct FrameClock {
    frame: u64,
    next_id: u64,
    // ids grow monotonically, so map order is request order
    pending: BTreeMap<FrameRequestId, FrameTask>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames started so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Ask for `task` to run on the next frame
    pub fn request(&mut self, task: FrameTask) -> FrameRequestId {
        let id = FrameRequestId(self.next_id);
        self.next_id += 1;
        self.pending.insert(id, task);
        id
    }

    /// Withdraw a request, returns `false` if it already ran or was cancelled
    pub fn cancel(&mut self, id: FrameRequestId) -> bool {
        self.pending.remove(&id).is_some()
    }

    pub fn is_pending(&self, id: FrameRequestId) -> bool {
        self.pending.contains_key(&id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Start the next frame and hand over every task due in it, in request
    /// order. Requests made while running these land in the frame after.
    pub fn advance(&mut self) -> Vec<(FrameRequestId, FrameTask)> {
        self.frame += 1;
        core::mem::take(&mut self.pending).into_iter().collect()
    }
}
