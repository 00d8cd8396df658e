use crate::operation::Operation;

/// Drawing history of a room with one cursor shared by every participant.
///
/// Only `operations[..visible]` is on the canvas. The rest is the redo tail,
/// kept until the next append. The tail is linear: appending always drops it,
/// so undo/redo never branch.
#[derive(Debug, Default)]
pub struct OperationLog {
    operations: Vec<Operation>,
    visible: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogSnapshot {
    pub operations: Vec<Operation>,
    /// Index of the last visible operation, -1 when nothing is visible.
    pub cursor: isize,
}

impl OperationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> LogSnapshot {
        LogSnapshot {
            operations: self.visible().to_vec(),
            cursor: self.cursor(),
        }
    }

    pub fn visible(&self) -> &[Operation] {
        &self.operations[..self.visible]
    }

    pub fn cursor(&self) -> isize {
        self.visible as isize - 1
    }

    /// Number of stored operations, redo tail included.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn append(&mut self, operation: Operation) {
        if self.visible < self.operations.len() {
            log::debug!(
                "Discarding {} redoable operations",
                self.operations.len() - self.visible
            );
            self.operations.truncate(self.visible);
        }
        self.operations.push(operation);
        self.visible = self.operations.len();
    }

    /// Hides the most recent visible operation, whoever drew it.
    pub fn undo(&mut self) -> bool {
        if self.visible > 0 {
            self.visible -= 1;
            true
        } else {
            false
        }
    }

    pub fn redo(&mut self) -> bool {
        if self.visible < self.operations.len() {
            self.visible += 1;
            true
        } else {
            false
        }
    }

    /// Drops everything, redo tail included. Cannot be undone.
    pub fn clear(&mut self) {
        self.operations.clear();
        self.visible = 0;
    }
}
