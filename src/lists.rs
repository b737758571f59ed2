//! Task state lists.
//!
//! The engine keeps four ordered lists of arena indices: New, Ready,
//! Waiting-I/O and Terminated. Order is meaningful (FCFS and Round-Robin
//! schedule in list order), so every operation here is order preserving.
//! Removal never splices while iterating: the set of indices to move is
//! computed first and the list is then rebuilt by a stable partition.

use std::collections::VecDeque;

use crate::types::TaskIdx;

/// An ordered list of tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskList {
    entries: VecDeque<TaskIdx>,
}

impl TaskList {
    pub fn new() -> Self {
        TaskList {
            entries: VecDeque::new(),
        }
    }

    /// Number of tasks in the list.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First task in list order.
    pub fn head(&self) -> Option<TaskIdx> {
        self.entries.front().copied()
    }

    pub fn contains(&self, idx: TaskIdx) -> bool {
        self.entries.contains(&idx)
    }

    /// Iterate in list order.
    pub fn iter(&self) -> impl Iterator<Item = TaskIdx> + '_ {
        self.entries.iter().copied()
    }

    /// Move the head to the tail. No-op on lists shorter than two.
    pub fn rotate_head_to_tail(&mut self) {
        if self.entries.len() > 1 {
            self.entries.rotate_left(1);
        }
    }

    /// Move `idx` to the tail, keeping everyone else in order. Returns false
    /// if `idx` is not in the list.
    pub fn move_to_back(&mut self, idx: TaskIdx) -> bool {
        match self.entries.iter().position(|&i| i == idx) {
            Some(pos) => {
                self.entries.remove(pos);
                self.entries.push_back(idx);
                true
            }
            None => false,
        }
    }

    /// Append a task. Only the engine changes membership.
    pub(crate) fn push_back(&mut self, idx: TaskIdx) {
        self.entries.push_back(idx);
    }

    /// Remove every task matching `pred`, returning them in list order.
    /// The tasks that stay keep their relative order.
    pub(crate) fn take_where(&mut self, mut pred: impl FnMut(TaskIdx) -> bool) -> Vec<TaskIdx> {
        let (moved, stays): (Vec<TaskIdx>, Vec<TaskIdx>) =
            self.entries.iter().copied().partition(|&idx| pred(idx));
        if !moved.is_empty() {
            self.entries = stays.into();
        }
        moved
    }

    /// Indices in list order, as a vector.
    pub fn to_vec(&self) -> Vec<TaskIdx> {
        self.entries.iter().copied().collect()
    }

    /// Whether `other` holds exactly the same tasks, ignoring order.
    pub fn same_members(&self, other: &TaskList) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let mut a = self.to_vec();
        let mut b = other.to_vec();
        a.sort_unstable();
        b.sort_unstable();
        a == b
    }
}

impl FromIterator<TaskIdx> for TaskList {
    fn from_iter<I: IntoIterator<Item = TaskIdx>>(iter: I) -> Self {
        TaskList {
            entries: iter.into_iter().collect(),
        }
    }
}

/// The four lists of the task state machine.
#[derive(Debug, Clone, Default)]
pub struct TaskLists {
    pub new: TaskList,
    pub ready: TaskList,
    pub waiting_io: TaskList,
    pub terminated: TaskList,
}

impl TaskLists {
    pub fn new() -> Self {
        Self::default()
    }

    /// No task can ever run again: nothing waiting to arrive, nothing ready
    /// and nothing blocked on I/O.
    pub fn is_quiescent(&self) -> bool {
        self.new.is_empty() && self.ready.is_empty() && self.waiting_io.is_empty()
    }

    /// Tasks not yet terminated.
    pub fn unfinished(&self) -> usize {
        self.new.len() + self.ready.len() + self.waiting_io.len()
    }

    /// Total number of tasks across all four lists.
    pub fn total(&self) -> usize {
        self.unfinished() + self.terminated.len()
    }
}
