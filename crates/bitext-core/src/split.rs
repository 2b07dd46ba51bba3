//! Draggable divider between the panes

pub const MIN_SPLIT_PERCENT: f64 = 20.0;
pub const MAX_SPLIT_PERCENT: f64 = 80.0;
pub const DEFAULT_SPLIT_PERCENT: f64 = 50.0;

/// Horizontal extent of the element containing both panes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerBounds {
    pub left: f64,
    pub width: f64,
}

/// Global affordances overridden while a drag is in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DragAffordances {
    /// Cursor forced to the resize indicator
    pub resize_cursor: bool,
    /// Text selection disabled
    pub selection_disabled: bool,
}

#[derive(Debug, Clone)]
pub struct SplitResizer {
    left_percent: f64,
    dragging: bool,
    affordances: DragAffordances,
}

pub fn clamp_split(percent: f64) -> f64 {
    percent.clamp(MIN_SPLIT_PERCENT, MAX_SPLIT_PERCENT)
}

impl SplitResizer {
    pub fn new(left_percent: f64) -> Self {
        let left_percent = if left_percent.is_finite() {
            clamp_split(left_percent)
        } else {
            DEFAULT_SPLIT_PERCENT
        };
        Self {
            left_percent,
            dragging: false,
            affordances: DragAffordances::default(),
        }
    }

    pub fn left_percent(&self) -> f64 {
        self.left_percent
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn affordances(&self) -> DragAffordances {
        self.affordances
    }

    pub fn begin_drag(&mut self) {
        self.dragging = true;
        self.affordances = DragAffordances {
            resize_cursor: true,
            selection_disabled: true,
        };
    }

    /// Track the pointer. Returns true if the split changed.
    ///
    /// Ignored unless a drag is active. Degenerate geometry keeps the
    /// current value.
    pub fn drag_to(&mut self, pointer_x: f64, container: ContainerBounds) -> bool {
        if !self.dragging {
            return false;
        }
        let usable =
            container.width.is_finite() && container.width > 0.0 && container.left.is_finite();
        if !usable || !pointer_x.is_finite() {
            return false;
        }
        let pct = (pointer_x - container.left) / container.width * 100.0;
        let next = clamp_split(pct);
        let changed = next != self.left_percent;
        self.left_percent = next;
        changed
    }

    /// Release tracking. Affordances are restored whether or not a drag was
    /// active, so a pointer-up delivered anywhere always cleans up.
    pub fn end_drag(&mut self) -> bool {
        let was_dragging = self.dragging;
        self.dragging = false;
        self.affordances = DragAffordances::default();
        was_dragging
    }

    /// Keyboard resize
    pub fn nudge(&mut self, delta: f64) {
        if delta.is_finite() {
            self.left_percent = clamp_split(self.left_percent + delta);
        }
    }
}

impl Default for SplitResizer {
    fn default() -> Self {
        Self::new(DEFAULT_SPLIT_PERCENT)
    }
}
