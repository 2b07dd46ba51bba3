//! Selection lookup and tooltip placement
//!
//! `Idle -> Selecting -> Showing -> Idle`. A finished selection is looked up
//! and, if it qualifies, turned into a payload anchored at the top middle of
//! the selection. The tooltip closes on a click outside its bounds, but only
//! once it has been armed, so the click that opened it cannot close it.

use crate::anchor::Side;
use crate::document::ParagraphId;
use crate::lookup::Lookup;
use crate::navigation::EventStamp;
use crate::schedule::{Generation, Millis, Scheduler};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

pub const DEFAULT_ARM_DELAY_MS: Millis = 100;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Midpoint of the top edge
    pub fn top_center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y)
    }
}

/// Thresholds deciding whether a selection is worth looking up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupPolicy {
    /// Longer selections are treated as accidental
    pub max_selection_chars: usize,
    /// Unmatched selections with more tokens than this are ignored
    pub max_unmatched_tokens: usize,
    /// Shown for a single word with no dictionary entry
    pub not_found_marker: String,
}

impl Default for LookupPolicy {
    fn default() -> Self {
        Self {
            max_selection_chars: 80,
            max_unmatched_tokens: 4,
            not_found_marker: "(not in dictionary)".to_string(),
        }
    }
}

/// Tooltip size and spacing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipGeometry {
    pub width: f64,
    pub height: f64,
    /// Gap between the tooltip bottom and the anchor when placed above
    pub gap_above: f64,
    /// Offset from the anchor to the tooltip top when placed below
    pub offset_below: f64,
    /// Minimum distance to every viewport edge
    pub margin: f64,
}

impl Default for TooltipGeometry {
    fn default() -> Self {
        Self {
            width: 280.0,
            height: 140.0,
            gap_above: 12.0,
            offset_below: 24.0,
            margin: 8.0,
        }
    }
}

/// A completed text selection reported by the front end
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionEvent {
    pub text: String,
    /// Bounding rectangle of the selection in viewport space
    pub bounds: Rect,
    pub side: Option<Side>,
    pub paragraph_id: Option<ParagraphId>,
}

impl SelectionEvent {
    pub fn new(text: impl Into<String>, bounds: Rect) -> Self {
        Self {
            text: text.into(),
            bounds,
            side: None,
            paragraph_id: None,
        }
    }

    pub fn in_paragraph(mut self, side: Side, paragraph_id: ParagraphId) -> Self {
        self.side = Some(side);
        self.paragraph_id = Some(paragraph_id);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipPayload {
    pub word: String,
    pub phonetic: String,
    pub part_of_speech: String,
    pub translation: String,
    pub example: Option<String>,
    pub anchor_x: i64,
    pub anchor_y: i64,
}

/// Build the tooltip payload for a selection, or `None` if the selection is
/// not a lookup target.
pub fn build_payload(
    event: &SelectionEvent,
    lookup: &dyn Lookup,
    policy: &LookupPolicy,
) -> Option<TooltipPayload> {
    let text = event.text.trim();
    if text.is_empty() || text.chars().count() > policy.max_selection_chars {
        return None;
    }
    let entry = lookup.lookup(text);
    let tokens = text.split_whitespace().count();
    if entry.is_none() && tokens > policy.max_unmatched_tokens {
        return None;
    }

    let anchor = event.bounds.top_center();
    let entry = entry.unwrap_or_default();
    let translation = if !entry.translation.is_empty() {
        entry.translation
    } else if tokens == 1 {
        policy.not_found_marker.clone()
    } else {
        format!("\u{300c}{text}\u{300d}")
    };

    Some(TooltipPayload {
        word: text.to_string(),
        phonetic: entry.phonetic,
        part_of_speech: entry.part_of_speech,
        translation,
        example: entry.example,
        anchor_x: anchor.x.round() as i64,
        anchor_y: anchor.y.round() as i64,
    })
}

/// Which way the tooltip's arrow points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowDirection {
    /// Tooltip above the anchor, arrow on its bottom edge
    Down,
    /// Tooltip below the anchor, arrow on its top edge
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub rect: Rect,
    pub arrow: ArrowDirection,
    /// Arrow position measured from the tooltip's left edge
    pub arrow_offset: f64,
}

/// Position a tooltip of `geometry` size for `anchor` inside `viewport`.
///
/// Prefers above the anchor, flips below when there is no room, and clamps
/// to keep `margin` from every viewport edge whenever the viewport is big
/// enough to allow it.
pub fn place_tooltip(anchor: Point, geometry: &TooltipGeometry, viewport: Rect) -> Placement {
    let w = geometry.width;
    let h = geometry.height;
    let m = geometry.margin;

    let mut left = anchor.x - w / 2.0;
    let mut top = anchor.y - h - geometry.gap_above;
    let below = top < viewport.y + m;
    if below {
        top = anchor.y + geometry.offset_below;
    }

    left = left.min(viewport.right() - w - m).max(viewport.x + m);
    top = top.min(viewport.bottom() - h - m).max(viewport.y + m);

    let arrow_offset = (anchor.x - left - 6.0).min(w - 24.0).max(12.0);
    Placement {
        rect: Rect::new(left, top, w, h),
        arrow: if below { ArrowDirection::Up } else { ArrowDirection::Down },
        arrow_offset,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipPhase {
    Idle,
    Selecting,
    Showing,
}

#[derive(Debug, Clone)]
struct Shown {
    payload: TooltipPayload,
    placement: Placement,
    armed: bool,
}

/// Selection listener, present only while the feature is on
#[derive(Debug, Default)]
struct Subscription {
    timers: Scheduler<()>,
    last_stamp: Option<EventStamp>,
}

#[derive(Debug)]
pub struct TooltipController {
    policy: LookupPolicy,
    geometry: TooltipGeometry,
    arm_delay: Millis,
    generation: Generation,
    subscription: Option<Subscription>,
    phase: TooltipPhase,
    shown: Option<Shown>,
}

impl TooltipController {
    /// Starts enabled
    pub fn new(policy: LookupPolicy, geometry: TooltipGeometry, arm_delay: Millis) -> Self {
        Self {
            policy,
            geometry,
            arm_delay,
            generation: Generation::default(),
            subscription: Some(Subscription::default()),
            phase: TooltipPhase::Idle,
            shown: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.subscription.is_some()
    }

    /// Turning the feature off closes any open tooltip and drops the
    /// selection listener together with its pending timers.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled {
            if self.subscription.is_none() {
                self.subscription = Some(Subscription::default());
            }
            return;
        }
        self.close();
        self.subscription = None;
    }

    pub fn phase(&self) -> TooltipPhase {
        self.phase
    }

    pub fn payload(&self) -> Option<&TooltipPayload> {
        self.shown.as_ref().map(|s| &s.payload)
    }

    pub fn placement(&self) -> Option<&Placement> {
        self.shown.as_ref().map(|s| &s.placement)
    }

    /// Whether an outside click will currently dismiss the tooltip
    pub fn is_armed(&self) -> bool {
        self.shown.as_ref().map(|s| s.armed).unwrap_or(false)
    }

    pub fn policy(&self) -> &LookupPolicy {
        &self.policy
    }

    pub fn set_policy(&mut self, policy: LookupPolicy) {
        self.policy = policy;
    }

    /// Pointer went down on text; only meaningful when nothing is showing
    pub fn begin_selection(&mut self) {
        if self.subscription.is_some() && self.phase == TooltipPhase::Idle {
            self.phase = TooltipPhase::Selecting;
        }
    }

    /// Selection finished. Returns true if a tooltip is now showing for it.
    pub fn complete_selection(
        &mut self,
        now: Millis,
        stamp: EventStamp,
        event: &SelectionEvent,
        lookup: &dyn Lookup,
        viewport: Rect,
    ) -> bool {
        let Some(sub) = self.subscription.as_mut() else {
            return false;
        };
        if sub.last_stamp == Some(stamp) {
            return false;
        }
        sub.last_stamp = Some(stamp);

        let Some(payload) = build_payload(event, lookup, &self.policy) else {
            self.phase = if self.shown.is_some() {
                TooltipPhase::Showing
            } else {
                TooltipPhase::Idle
            };
            return false;
        };

        let anchor = Point::new(payload.anchor_x as f64, payload.anchor_y as f64);
        let placement = place_tooltip(anchor, &self.geometry, viewport);
        self.generation = self.generation.next();
        sub.timers.clear();
        sub.timers.schedule(now, self.arm_delay, self.generation, ());
        debug!(word = %payload.word, "tooltip shown");
        self.shown = Some(Shown {
            payload,
            placement,
            armed: false,
        });
        self.phase = TooltipPhase::Showing;
        true
    }

    /// Pointer went down at `point`. Returns true if this closed the tooltip.
    pub fn pointer_down(&mut self, point: Point) -> bool {
        let outside_armed = match &self.shown {
            Some(shown) => shown.armed && !shown.placement.rect.contains(point),
            None => false,
        };
        if outside_armed {
            self.close();
        }
        outside_armed
    }

    pub fn close(&mut self) {
        self.shown = None;
        self.phase = TooltipPhase::Idle;
        self.generation = self.generation.next();
        if let Some(sub) = self.subscription.as_mut() {
            sub.timers.clear();
        }
    }

    /// Arm the outside-click listener once its delay has elapsed
    pub fn tick(&mut self, now: Millis) {
        let Some(sub) = self.subscription.as_mut() else {
            return;
        };
        for due in sub.timers.poll(now) {
            if due.generation != self.generation {
                trace!("stale tooltip arm dropped");
                continue;
            }
            if let Some(shown) = self.shown.as_mut() {
                shown.armed = true;
            }
        }
    }

    pub fn next_due(&self) -> Option<Millis> {
        self.subscription.as_ref().and_then(|sub| sub.timers.next_due())
    }
}

impl Default for TooltipController {
    fn default() -> Self {
        Self::new(LookupPolicy::default(), TooltipGeometry::default(), DEFAULT_ARM_DELAY_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::{Dictionary, LookupEntry};

    const VIEWPORT: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 1280.0,
        height: 800.0,
    };

    fn dictionary() -> Dictionary {
        let mut dict = Dictionary::new();
        dict.insert(
            "attention",
            LookupEntry {
                phonetic: "/əˈtenʃn/".into(),
                part_of_speech: "n.".into(),
                translation: "注意力".into(),
                example: Some("Attention is all you need.".into()),
            },
        );
        dict
    }

    fn selection(text: &str) -> SelectionEvent {
        SelectionEvent::new(text, Rect::new(400.0, 300.0, 80.0, 20.0))
    }

    #[test]
    fn test_payload_for_dictionary_hit() {
        let dict = dictionary();
        let payload =
            build_payload(&selection(" Attention "), &dict, &LookupPolicy::default()).unwrap();
        assert_eq!(payload.word, "Attention");
        assert_eq!(payload.translation, "注意力");
        assert_eq!(payload.part_of_speech, "n.");
        assert_eq!(payload.example.as_deref(), Some("Attention is all you need."));
        assert_eq!((payload.anchor_x, payload.anchor_y), (440, 300));
    }

    #[test]
    fn test_single_word_miss_uses_marker() {
        let policy = LookupPolicy {
            not_found_marker: "?!".into(),
            ..Default::default()
        };
        let payload = build_payload(&selection("the"), &dictionary(), &policy).unwrap();
        assert_eq!(payload.translation, "?!");
        assert!(payload.phonetic.is_empty());
    }

    #[test]
    fn test_short_phrase_miss_is_echoed() {
        let payload = build_payload(
            &selection("four words right here"),
            &dictionary(),
            &LookupPolicy::default(),
        )
        .unwrap();
        assert_eq!(payload.translation, "「four words right here」");
    }

    #[test]
    fn test_ignored_selections() {
        let dict = dictionary();
        let policy = LookupPolicy::default();
        assert!(build_payload(&selection("   "), &dict, &policy).is_none());
        assert!(build_payload(&selection("one two three four five six"), &dict, &policy).is_none());
        assert!(build_payload(&selection(&"x".repeat(81)), &dict, &policy).is_none());
        assert!(build_payload(&selection(&"x".repeat(80)), &dict, &policy).is_some());
    }

    #[test]
    fn test_thresholds_are_configurable() {
        let policy = LookupPolicy {
            max_selection_chars: 5,
            max_unmatched_tokens: 6,
            ..Default::default()
        };
        let dict = dictionary();
        assert!(build_payload(&selection("abcdef"), &dict, &policy).is_none());
        assert!(build_payload(&selection("a b c"), &dict, &policy).is_some());
    }

    #[test]
    fn test_placement_prefers_above() {
        let g = TooltipGeometry::default();
        let p = place_tooltip(Point::new(640.0, 400.0), &g, VIEWPORT);
        assert_eq!(p.arrow, ArrowDirection::Down);
        assert_eq!(p.rect.y, 400.0 - 140.0 - 12.0);
        assert_eq!(p.rect.x, 640.0 - 140.0);
    }

    #[test]
    fn test_placement_flips_below_near_top() {
        let g = TooltipGeometry::default();
        let p = place_tooltip(Point::new(640.0, 50.0), &g, VIEWPORT);
        assert_eq!(p.arrow, ArrowDirection::Up);
        assert_eq!(p.rect.y, 74.0);
    }

    #[test]
    fn test_placement_stays_inside_near_every_edge() {
        let g = TooltipGeometry::default();
        let anchors = [
            Point::new(2.0, 400.0),
            Point::new(1278.0, 400.0),
            Point::new(640.0, 1.0),
            Point::new(640.0, 799.0),
            Point::new(0.0, 0.0),
            Point::new(1280.0, 800.0),
        ];
        for anchor in anchors {
            let p = place_tooltip(anchor, &g, VIEWPORT);
            assert!(VIEWPORT.contains_rect(&p.rect), "{anchor:?} -> {:?}", p.rect);
            assert!(p.rect.x >= 8.0 && p.rect.right() <= 1272.0);
        }
    }

    #[test]
    fn test_arrow_offset_is_clamped() {
        let g = TooltipGeometry::default();
        let p = place_tooltip(Point::new(2.0, 400.0), &g, VIEWPORT);
        assert_eq!(p.arrow_offset, 12.0);
        let p = place_tooltip(Point::new(1279.0, 400.0), &g, VIEWPORT);
        assert_eq!(p.arrow_offset, 256.0);
    }

    #[test]
    fn test_opening_click_cannot_close() {
        let dict = dictionary();
        let mut tip = TooltipController::default();
        tip.begin_selection();
        assert_eq!(tip.phase(), TooltipPhase::Selecting);
        assert!(tip.complete_selection(0, 1, &selection("attention"), &dict, VIEWPORT));
        assert_eq!(tip.phase(), TooltipPhase::Showing);

        assert!(!tip.pointer_down(Point::new(5.0, 5.0)));
        assert!(tip.payload().is_some());

        tip.tick(99);
        assert!(!tip.is_armed());
        tip.tick(100);
        assert!(tip.is_armed());

        let inside = tip.placement().unwrap().rect.top_center();
        assert!(!tip.pointer_down(Point::new(inside.x, inside.y + 1.0)));
        assert!(tip.pointer_down(Point::new(5.0, 5.0)));
        assert_eq!(tip.phase(), TooltipPhase::Idle);
        assert!(tip.payload().is_none());
    }

    #[test]
    fn test_stale_arm_does_not_arm_newer_tooltip() {
        let dict = dictionary();
        let mut tip = TooltipController::default();
        assert!(tip.complete_selection(0, 1, &selection("attention"), &dict, VIEWPORT));
        assert!(tip.complete_selection(80, 2, &selection("the"), &dict, VIEWPORT));
        tip.tick(100);
        assert!(!tip.is_armed());
        tip.tick(180);
        assert!(tip.is_armed());
        assert_eq!(tip.payload().unwrap().word, "the");
    }

    #[test]
    fn test_ignored_selection_keeps_existing_tooltip() {
        let dict = dictionary();
        let mut tip = TooltipController::default();
        tip.complete_selection(0, 1, &selection("attention"), &dict, VIEWPORT);
        assert!(!tip.complete_selection(10, 2, &selection("a b c d e f"), &dict, VIEWPORT));
        assert_eq!(tip.phase(), TooltipPhase::Showing);
        assert_eq!(tip.payload().unwrap().word, "attention");
    }

    #[test]
    fn test_duplicate_mouseup_is_ignored() {
        let dict = dictionary();
        let mut tip = TooltipController::default();
        assert!(tip.complete_selection(0, 1, &selection("attention"), &dict, VIEWPORT));
        tip.tick(100);
        assert!(!tip.complete_selection(0, 1, &selection("attention"), &dict, VIEWPORT));
        assert!(tip.is_armed());
    }

    #[test]
    fn test_disable_clears_and_detaches() {
        let dict = dictionary();
        let mut tip = TooltipController::default();
        tip.complete_selection(0, 1, &selection("attention"), &dict, VIEWPORT);
        tip.set_enabled(false);
        assert!(tip.payload().is_none());
        assert_eq!(tip.next_due(), None);
        assert!(!tip.complete_selection(10, 2, &selection("attention"), &dict, VIEWPORT));
        tip.begin_selection();
        assert_eq!(tip.phase(), TooltipPhase::Idle);

        tip.set_enabled(true);
        assert!(tip.complete_selection(20, 3, &selection("attention"), &dict, VIEWPORT));
    }
}
