//! Anchor registry: where each paragraph is mounted in each pane

use crate::document::ParagraphId;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// One of the two panes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Left pane, original text
    Source,
    /// Right pane, translated text
    Target,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Source => Side::Target,
            Side::Target => Side::Source,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Side::Source => 0,
            Side::Target => 1,
        }
    }

    pub const BOTH: [Side; 2] = [Side::Source, Side::Target];
}

/// Weak reference to an element owned by the renderer.
///
/// Handles come from an [`ElementArena`]; once the arena is reset for a new
/// render every handle it issued stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementHandle {
    epoch: u32,
    index: u32,
}

/// Renderer-side storage for mounted elements
#[derive(Debug, Clone)]
pub struct ElementArena<T> {
    epoch: u32,
    items: Vec<T>,
}

impl<T> Default for ElementArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ElementArena<T> {
    pub fn new() -> Self {
        Self {
            epoch: 0,
            items: Vec::new(),
        }
    }

    pub fn insert(&mut self, item: T) -> ElementHandle {
        let index = self.items.len() as u32;
        self.items.push(item);
        ElementHandle {
            epoch: self.epoch,
            index,
        }
    }

    /// Drop every element and invalidate all outstanding handles
    pub fn reset(&mut self) {
        self.items.clear();
        self.epoch = self.epoch.wrapping_add(1);
    }

    pub fn get(&self, handle: ElementHandle) -> Option<&T> {
        if handle.epoch != self.epoch {
            return None;
        }
        self.items.get(handle.index as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A registry entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub paragraph_id: ParagraphId,
    pub side: Side,
    pub handle: ElementHandle,
}

/// Maps `(paragraph, side)` to the element currently mounted for it.
/// At most one live handle per key.
#[derive(Debug, Default)]
pub struct AnchorRegistry {
    anchors: FxHashMap<(ParagraphId, Side), ElementHandle>,
}

impl AnchorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mounted element, replacing any previous one for the key
    pub fn register(
        &mut self,
        paragraph_id: ParagraphId,
        side: Side,
        handle: ElementHandle,
    ) -> Option<ElementHandle> {
        self.anchors.insert((paragraph_id, side), handle)
    }

    pub fn unregister(&mut self, paragraph_id: ParagraphId, side: Side) -> Option<ElementHandle> {
        self.anchors.remove(&(paragraph_id, side))
    }

    /// Remove every anchor of one pane ahead of a re-render
    pub fn unmount_side(&mut self, side: Side) -> usize {
        let before = self.anchors.len();
        self.anchors.retain(|(_, s), _| *s != side);
        before - self.anchors.len()
    }

    pub fn clear(&mut self) {
        self.anchors.clear();
    }

    /// Handle for `paragraph_id` on the side opposite to `side`
    pub fn resolve(&self, paragraph_id: ParagraphId, side: Side) -> Option<ElementHandle> {
        self.get(paragraph_id, side.opposite())
    }

    pub fn get(&self, paragraph_id: ParagraphId, side: Side) -> Option<ElementHandle> {
        self.anchors.get(&(paragraph_id, side)).copied()
    }

    /// Anchors mounted on one side, in paragraph order
    pub fn anchors(&self, side: Side) -> Vec<Anchor> {
        let mut out: Vec<Anchor> = self
            .anchors
            .iter()
            .filter(|((_, s), _)| *s == side)
            .map(|(&(paragraph_id, side), &handle)| Anchor {
                paragraph_id,
                side,
                handle,
            })
            .collect();
        out.sort_by_key(|a| a.paragraph_id);
        out
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}
