// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sibling-list iteration.

use super::id::{INVALID, LayerId};
use super::store::LayerTree;

/// An iterator over the direct children of a layer, bottom to top.
///
/// Created by [`LayerTree::children`]. Supports reverse iteration, which
/// visits the topmost child first.
#[derive(Debug)]
pub struct Children<'a> {
    tree: &'a LayerTree,
    front: u32,
    back: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(tree: &'a LayerTree, first: u32, last: u32) -> Self {
        Self {
            tree,
            front: first,
            back: last,
        }
    }

    fn handle(&self, idx: u32) -> LayerId {
        LayerId {
            idx,
            generation: self.tree.generation[idx as usize],
        }
    }
}

impl Iterator for Children<'_> {
    type Item = LayerId;

    fn next(&mut self) -> Option<LayerId> {
        if self.front == INVALID {
            return None;
        }
        let idx = self.front;
        if idx == self.back {
            self.front = INVALID;
            self.back = INVALID;
        } else {
            self.front = self.tree.next_sibling[idx as usize];
        }
        Some(self.handle(idx))
    }
}

impl DoubleEndedIterator for Children<'_> {
    fn next_back(&mut self) -> Option<LayerId> {
        if self.back == INVALID {
            return None;
        }
        let idx = self.back;
        if idx == self.front {
            self.front = INVALID;
            self.back = INVALID;
        } else {
            self.back = self.tree.prev_sibling[idx as usize];
        }
        Some(self.handle(idx))
    }
}
