//! Undo and redo stacks of inverse operations.
//!
//! The undo stack holds the inverse of each local edit. Undoing pops the top
//! entry and hands it to a callback that applies it and adds its own inverse
//! back through [`UndoManager::add`], which lands on the redo stack while an
//! undo is in progress. Concurrent remote edits are folded into both stacks
//! with [`UndoManager::transform`].

use std::collections::VecDeque;

use ot_text::TextOperation;
use tracing::trace;

use crate::error::{ClientError, StackKind};
use crate::meta::Meta;
use crate::wrapped::WrappedOperation;

pub const DEFAULT_MAX_ITEMS: usize = 50;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UndoState {
    #[default]
    Normal,
    Undoing,
    Redoing,
}

#[derive(Debug, Clone)]
pub struct UndoManager<M> {
    max_items: usize,
    state: UndoState,
    dont_compose: bool,
    undo_stack: VecDeque<WrappedOperation<M>>,
    redo_stack: VecDeque<WrappedOperation<M>>,
}

impl<M: Meta> Default for UndoManager<M> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ITEMS)
    }
}

impl<M: Meta> UndoManager<M> {
    /// A manager keeping at most `max_items` entries per stack. Zero selects
    /// [`DEFAULT_MAX_ITEMS`].
    pub fn new(max_items: usize) -> Self {
        Self {
            max_items: if max_items == 0 {
                DEFAULT_MAX_ITEMS
            } else {
                max_items
            },
            state: UndoState::Normal,
            dont_compose: false,
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
        }
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    pub fn state(&self) -> UndoState {
        self.state
    }

    pub fn dont_compose(&self) -> bool {
        self.dont_compose
    }

    pub fn undo_stack(&self) -> &VecDeque<WrappedOperation<M>> {
        &self.undo_stack
    }

    pub fn redo_stack(&self) -> &VecDeque<WrappedOperation<M>> {
        &self.redo_stack
    }

    /// Most recent undo entry.
    pub fn last_undo(&self) -> Option<&WrappedOperation<M>> {
        self.undo_stack.back()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn is_undoing(&self) -> bool {
        self.state == UndoState::Undoing
    }

    pub fn is_redoing(&self) -> bool {
        self.state == UndoState::Redoing
    }

    /// Records the inverse of the latest edit.
    ///
    /// With `compose` set, the entry is merged into the top of the undo stack
    /// unless that top was produced by an undo or redo. Adding a fresh edit
    /// clears the redo stack.
    pub fn add(&mut self, operation: WrappedOperation<M>, compose: bool) -> Result<(), ClientError> {
        match self.state {
            UndoState::Undoing => {
                trace!(len = self.redo_stack.len() + 1, "push redo entry");
                push_bounded(&mut self.redo_stack, operation, self.max_items);
                self.dont_compose = true;
            }
            UndoState::Redoing => {
                trace!(len = self.undo_stack.len() + 1, "push undo entry from redo");
                push_bounded(&mut self.undo_stack, operation, self.max_items);
                self.dont_compose = true;
            }
            UndoState::Normal => {
                let merge_into_top = compose && !self.dont_compose;
                match self.undo_stack.back() {
                    Some(top) if merge_into_top => {
                        let composed = operation.compose(top)?;
                        trace!(len = self.undo_stack.len(), "compose undo entry");
                        self.undo_stack.pop_back();
                        self.undo_stack.push_back(composed);
                    }
                    _ => {
                        trace!(len = self.undo_stack.len() + 1, "push undo entry");
                        push_bounded(&mut self.undo_stack, operation, self.max_items);
                    }
                }
                self.dont_compose = false;
                self.redo_stack.clear();
            }
        }
        Ok(())
    }

    /// Moves both stacks past an operation made by another client. Entries
    /// that become no-ops are dropped. On error the stacks are unchanged.
    pub fn transform(&mut self, operation: &TextOperation) -> Result<(), ClientError> {
        let undo_stack = transform_stack(&self.undo_stack, operation)?;
        let redo_stack = transform_stack(&self.redo_stack, operation)?;
        trace!(
            undo = undo_stack.len(),
            redo = redo_stack.len(),
            "transformed undo stacks"
        );
        self.undo_stack = undo_stack;
        self.redo_stack = redo_stack;
        Ok(())
    }

    /// Pops the latest undo entry and passes it to `apply`, which is expected
    /// to call [`UndoManager::add`] with the entry's inverse.
    pub fn perform_undo<F>(&mut self, apply: F) -> Result<(), ClientError>
    where
        F: FnOnce(&mut Self, WrappedOperation<M>) -> Result<(), ClientError>,
    {
        let operation = self
            .undo_stack
            .pop_back()
            .ok_or(ClientError::EmptyStack(StackKind::Undo))?;
        self.run(UndoState::Undoing, operation, apply)
    }

    /// The inverse of [`UndoManager::perform_undo`].
    pub fn perform_redo<F>(&mut self, apply: F) -> Result<(), ClientError>
    where
        F: FnOnce(&mut Self, WrappedOperation<M>) -> Result<(), ClientError>,
    {
        let operation = self
            .redo_stack
            .pop_back()
            .ok_or(ClientError::EmptyStack(StackKind::Redo))?;
        self.run(UndoState::Redoing, operation, apply)
    }

    fn run<F>(&mut self, state: UndoState, operation: WrappedOperation<M>, apply: F) -> Result<(), ClientError>
    where
        F: FnOnce(&mut Self, WrappedOperation<M>) -> Result<(), ClientError>,
    {
        self.state = state;
        let result = apply(self, operation);
        self.state = UndoState::Normal;
        result
    }
}

fn push_bounded<T>(stack: &mut VecDeque<T>, item: T, max_items: usize) {
    stack.push_back(item);
    while stack.len() > max_items {
        stack.pop_front();
    }
}

// Walks from newest to oldest, each entry moving the running operation one
// step further into the past.
fn transform_stack<M: Meta>(
    stack: &VecDeque<WrappedOperation<M>>,
    operation: &TextOperation,
) -> Result<VecDeque<WrappedOperation<M>>, ClientError> {
    let mut operation = operation.clone();
    let mut out = VecDeque::with_capacity(stack.len());
    for entry in stack.iter().rev() {
        let (entry_prime, operation_prime) = entry.transform_against(&operation)?;
        if !entry_prime.wrapped.is_noop() {
            out.push_front(entry_prime);
        }
        operation = operation_prime;
    }
    Ok(out)
}
