//! Bidirectional Sync Scrolling for the Editor and Preview panes
//!
//! Scrolling one pane moves the other to the same offset. To keep the
//! mirrored scroll from echoing back, the target pane's listener is
//! detached while it is being driven, and re-attached once no mirror
//! has happened for the debounce period.
//!
//! # Architecture
//!
//! egui has no scroll events, so the view polls: every frame each visible
//! pane reports its offset through [`SyncScrollState::observe`], and applies
//! whatever [`SyncScrollState::take_pending`] hands back on the next frame.
//! Time is always passed in, which keeps the state machine deterministic.
//!
//! # Usage
//!
//! ```ignore
//! let mut sync = SyncScrollState::new(DEFAULT_DEBOUNCE);
//! sync.mount(Pane::Editor);
//! sync.mount(Pane::Preview);
//!
//! // Each frame
//! let now = Instant::now();
//! if let Some(wait) = sync.tick(now) {
//!     ctx.request_repaint_after(wait);
//! }
//! let forced = sync.take_pending(Pane::Editor);
//! let offset = editor.show(ui, forced);
//! sync.observe(Pane::Editor, offset, now);
//! ```

use log::debug;
use std::time::{Duration, Instant};

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Quiet period before a mirrored pane listens to its own scrolling again.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(66);

/// Offsets closer than this are treated as the same position.
const OFFSET_EPSILON: f32 = 0.5;

// ─────────────────────────────────────────────────────────────────────────────
// Pane
// ─────────────────────────────────────────────────────────────────────────────

/// One of the two scrollable regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Editor,
    Preview,
}

impl Pane {
    /// The pane on the other side of the split.
    pub fn other(self) -> Pane {
        match self {
            Pane::Editor => Pane::Preview,
            Pane::Preview => Pane::Editor,
        }
    }

    fn index(self) -> usize {
        match self {
            Pane::Editor => 0,
            Pane::Preview => 1,
        }
    }
}

/// What happened when a pane reported a scroll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollResponse {
    /// The other pane was moved to `offset` and its listener detached
    Mirrored { target: Pane, offset: f32 },
    /// The pane's listener is detached (or the pane is hidden); nothing ran
    Suppressed,
    /// The handler ran but did not mirror (sync off, or other pane hidden)
    Ignored,
    /// The offset has not moved since the last observation
    Unchanged,
}

// ─────────────────────────────────────────────────────────────────────────────
// Per-Pane State
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
struct PaneScroll {
    /// Pane is on screen
    mounted: bool,
    /// Scroll listener attached
    listening: bool,
    /// Last known offset; `None` until the first observation after mount
    offset: Option<f32>,
    /// Programmatic offset the view still has to apply
    pending: Option<f32>,
    /// When the listener comes back
    reattach_at: Option<Instant>,
    /// How many times the scroll handler ran
    handled: usize,
}

// ─────────────────────────────────────────────────────────────────────────────
// Sync Scroll State
// ─────────────────────────────────────────────────────────────────────────────

/// State machine for managing synchronized scrolling between panes.
#[derive(Debug)]
pub struct SyncScrollState {
    /// Whether sync scrolling is enabled
    enabled: bool,
    /// Re-attach delay after a mirror
    debounce: Duration,
    panes: [PaneScroll; 2],
}

impl Default for SyncScrollState {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl SyncScrollState {
    /// Create a new sync scroll state. Both panes start unmounted.
    pub fn new(debounce: Duration) -> Self {
        Self {
            enabled: true,
            debounce,
            panes: Default::default(),
        }
    }

    fn pane(&self, pane: Pane) -> &PaneScroll {
        &self.panes[pane.index()]
    }

    fn pane_mut(&mut self, pane: Pane) -> &mut PaneScroll {
        &mut self.panes[pane.index()]
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Set whether sync scrolling is enabled.
    ///
    /// Turning it off drops pending mirrors and re-attaches every mounted
    /// listener immediately.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            for pane in self.panes.iter_mut() {
                pane.pending = None;
                pane.reattach_at = None;
                pane.listening = pane.mounted;
            }
        }
    }

    /// Toggle sync scrolling on/off.
    pub fn toggle(&mut self) -> bool {
        self.set_enabled(!self.enabled);
        self.enabled
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// The pane became visible: attach its listener.
    ///
    /// The first offset observed afterwards is taken as a baseline and does
    /// not count as a scroll.
    pub fn mount(&mut self, pane: Pane) {
        let state = self.pane_mut(pane);
        if state.mounted {
            return;
        }
        debug!("Sync scroll: mounting {:?}", pane);
        *state = PaneScroll {
            mounted: true,
            listening: true,
            handled: state.handled,
            ..PaneScroll::default()
        };
    }

    /// The pane was hidden: drop its listener, timer and pending offset.
    pub fn unmount(&mut self, pane: Pane) {
        let state = self.pane_mut(pane);
        if !state.mounted {
            return;
        }
        debug!("Sync scroll: unmounting {:?}", pane);
        *state = PaneScroll {
            handled: state.handled,
            ..PaneScroll::default()
        };
    }

    /// Mount or unmount to match visibility.
    pub fn set_mounted(&mut self, pane: Pane, visible: bool) {
        if visible {
            self.mount(pane);
        } else {
            self.unmount(pane);
        }
    }

    pub fn is_mounted(&self, pane: Pane) -> bool {
        self.pane(pane).mounted
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Events
    // ─────────────────────────────────────────────────────────────────────────

    /// A scroll event fired on `source`.
    ///
    /// Runs the handler only if the source's listener is attached. The
    /// handler mirrors `offset` into the other pane, detaches that pane's
    /// listener and (re)starts its re-attach timer.
    pub fn on_scroll(&mut self, source: Pane, offset: f32, now: Instant) -> ScrollResponse {
        let debounce = self.debounce;
        let enabled = self.enabled;

        let state = self.pane_mut(source);
        if !state.mounted || !state.listening {
            return ScrollResponse::Suppressed;
        }
        state.handled += 1;
        state.offset = Some(offset);

        if !enabled {
            return ScrollResponse::Ignored;
        }

        let target = source.other();
        let other = self.pane_mut(target);
        if !other.mounted {
            return ScrollResponse::Ignored;
        }

        other.listening = false;
        other.offset = Some(offset);
        other.pending = Some(offset);
        other.reattach_at = Some(now + debounce);

        debug!(
            "Sync scroll: {:?} -> {:?} at {:.1}",
            source, target, offset
        );
        ScrollResponse::Mirrored { target, offset }
    }

    /// Report the offset a pane has this frame.
    ///
    /// Changed offsets are fed to [`Self::on_scroll`]; a detached pane still
    /// has its position recorded so it does not fire once re-attached.
    pub fn observe(&mut self, pane: Pane, offset: f32, now: Instant) -> ScrollResponse {
        let state = self.pane_mut(pane);
        if !state.mounted {
            return ScrollResponse::Suppressed;
        }

        let last = state.offset;
        match last {
            None => {
                state.offset = Some(offset);
                ScrollResponse::Unchanged
            }
            Some(last) if (last - offset).abs() < OFFSET_EPSILON => ScrollResponse::Unchanged,
            Some(_) if !state.listening => {
                state.offset = Some(offset);
                ScrollResponse::Suppressed
            }
            Some(_) => self.on_scroll(pane, offset, now),
        }
    }

    /// Re-attach every listener whose timer has expired.
    ///
    /// Returns how long until the next timer fires, if any are still running.
    pub fn tick(&mut self, now: Instant) -> Option<Duration> {
        let mut next: Option<Duration> = None;
        for state in self.panes.iter_mut() {
            match state.reattach_at {
                Some(at) if at <= now => {
                    state.reattach_at = None;
                    state.listening = state.mounted;
                }
                Some(at) => {
                    let wait = at - now;
                    next = Some(next.map_or(wait, |n| n.min(wait)));
                }
                None => {}
            }
        }
        next
    }

    /// Offset the view must apply to `pane` on this frame, if any.
    pub fn take_pending(&mut self, pane: Pane) -> Option<f32> {
        self.pane_mut(pane).pending.take()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Last known offset of a pane (0 before the first observation).
    pub fn offset(&self, pane: Pane) -> f32 {
        self.pane(pane).offset.unwrap_or(0.0)
    }

    /// Whether the pane's scroll listener is attached.
    pub fn is_listening(&self, pane: Pane) -> bool {
        self.pane(pane).listening
    }

    /// Number of times the pane's scroll handler has run.
    pub fn handled_count(&self, pane: Pane) -> usize {
        self.pane(pane).handled
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    /// Both panes mounted with a zero baseline.
    fn split_state(now: Instant) -> SyncScrollState {
        let mut sync = SyncScrollState::default();
        sync.mount(Pane::Editor);
        sync.mount(Pane::Preview);
        sync.observe(Pane::Editor, 0.0, now);
        sync.observe(Pane::Preview, 0.0, now);
        sync
    }

    #[test]
    fn test_default_debounce() {
        assert_eq!(SyncScrollState::default().debounce(), ms(66));
    }

    #[test]
    fn test_pane_other() {
        assert_eq!(Pane::Editor.other(), Pane::Preview);
        assert_eq!(Pane::Preview.other(), Pane::Editor);
    }

    #[test]
    fn test_editor_scroll_converges_without_feedback() {
        let t0 = Instant::now();
        let mut sync = split_state(t0);

        let response = sync.observe(Pane::Editor, 120.0, t0);
        assert_eq!(
            response,
            ScrollResponse::Mirrored {
                target: Pane::Preview,
                offset: 120.0
            }
        );
        assert!(!sync.is_listening(Pane::Preview));

        // The view applies the mirrored offset on the next frame.
        let t1 = t0 + ms(16);
        assert_eq!(sync.take_pending(Pane::Preview), Some(120.0));
        assert_eq!(sync.take_pending(Pane::Preview), None);
        assert_eq!(sync.observe(Pane::Preview, 120.0, t1), ScrollResponse::Unchanged);

        assert_eq!(sync.offset(Pane::Editor), 120.0);
        assert_eq!(sync.offset(Pane::Preview), 120.0);
        assert_eq!(sync.handled_count(Pane::Editor), 1);
        assert_eq!(sync.handled_count(Pane::Preview), 0);
    }

    #[test]
    fn test_programmatic_scroll_on_detached_pane_is_suppressed() {
        let t0 = Instant::now();
        let mut sync = split_state(t0);
        sync.observe(Pane::Editor, 500.0, t0);

        // Preview is shorter and clamps the offset.
        assert_eq!(
            sync.on_scroll(Pane::Preview, 300.0, t0 + ms(10)),
            ScrollResponse::Suppressed
        );
        assert_eq!(
            sync.observe(Pane::Preview, 300.0, t0 + ms(10)),
            ScrollResponse::Suppressed
        );
        assert_eq!(
            sync.observe(Pane::Preview, 300.0, t0 + ms(20)),
            ScrollResponse::Unchanged
        );

        // Once re-attached, the clamped position does not fire either.
        sync.tick(t0 + ms(66));
        assert_eq!(
            sync.observe(Pane::Preview, 300.0, t0 + ms(80)),
            ScrollResponse::Unchanged
        );
        assert_eq!(sync.handled_count(Pane::Preview), 0);
        assert_eq!(sync.offset(Pane::Editor), 500.0);
    }

    #[test]
    fn test_listener_reattached_after_debounce() {
        let t0 = Instant::now();
        let mut sync = split_state(t0);
        sync.observe(Pane::Editor, 120.0, t0);

        assert_eq!(sync.tick(t0 + ms(30)), Some(ms(36)));
        assert!(!sync.is_listening(Pane::Preview));

        assert_eq!(sync.tick(t0 + ms(66)), None);
        assert!(sync.is_listening(Pane::Preview));

        // Now a user scroll on the preview mirrors back.
        let response = sync.observe(Pane::Preview, 40.0, t0 + ms(100));
        assert_eq!(
            response,
            ScrollResponse::Mirrored {
                target: Pane::Editor,
                offset: 40.0
            }
        );
        assert_eq!(sync.handled_count(Pane::Preview), 1);
    }

    #[test]
    fn test_repeated_mirrors_restart_timer() {
        let t0 = Instant::now();
        let mut sync = split_state(t0);
        sync.observe(Pane::Editor, 10.0, t0);
        sync.observe(Pane::Editor, 20.0, t0 + ms(50));

        // First deadline has passed, but the second mirror pushed it back.
        sync.tick(t0 + ms(70));
        assert!(!sync.is_listening(Pane::Preview));
        sync.tick(t0 + ms(116));
        assert!(sync.is_listening(Pane::Preview));
    }

    #[test]
    fn test_directions_are_independent() {
        let t0 = Instant::now();
        let mut sync = split_state(t0);

        sync.observe(Pane::Editor, 100.0, t0);
        sync.tick(t0 + ms(70));
        sync.observe(Pane::Preview, 250.0, t0 + ms(80));

        // Editor's listener is now detached; the preview's is attached.
        assert!(!sync.is_listening(Pane::Editor));
        assert!(sync.is_listening(Pane::Preview));
        assert_eq!(sync.take_pending(Pane::Editor), Some(250.0));

        sync.tick(t0 + ms(146));
        assert!(sync.is_listening(Pane::Editor));
        assert!(sync.is_listening(Pane::Preview));
    }

    #[test]
    fn test_tick_is_idempotent() {
        let t0 = Instant::now();
        let mut sync = split_state(t0);
        sync.observe(Pane::Editor, 5.0, t0);
        sync.tick(t0 + ms(100));
        sync.tick(t0 + ms(200));
        assert!(sync.is_listening(Pane::Editor));
        assert!(sync.is_listening(Pane::Preview));
    }

    #[test]
    fn test_hidden_pane_is_not_mirrored() {
        let t0 = Instant::now();
        let mut sync = SyncScrollState::default();
        sync.mount(Pane::Editor);
        sync.observe(Pane::Editor, 0.0, t0);

        let response = sync.observe(Pane::Editor, 80.0, t0);
        assert_eq!(response, ScrollResponse::Ignored);
        assert_eq!(sync.take_pending(Pane::Preview), None);
        assert_eq!(
            sync.on_scroll(Pane::Preview, 10.0, t0),
            ScrollResponse::Suppressed
        );
    }

    #[test]
    fn test_first_observation_after_mount_is_baseline() {
        let t0 = Instant::now();
        let mut sync = SyncScrollState::default();
        sync.mount(Pane::Editor);
        sync.mount(Pane::Preview);

        assert_eq!(sync.observe(Pane::Preview, 300.0, t0), ScrollResponse::Unchanged);
        assert_eq!(sync.handled_count(Pane::Preview), 0);
    }

    #[test]
    fn test_unmount_clears_pending() {
        let t0 = Instant::now();
        let mut sync = split_state(t0);
        sync.observe(Pane::Editor, 60.0, t0);

        sync.unmount(Pane::Preview);
        assert_eq!(sync.take_pending(Pane::Preview), None);
        assert!(!sync.is_listening(Pane::Preview));
        assert_eq!(sync.tick(t0), None);

        sync.mount(Pane::Preview);
        assert!(sync.is_listening(Pane::Preview));
    }

    #[test]
    fn test_disabled_sync_does_not_mirror() {
        let t0 = Instant::now();
        let mut sync = split_state(t0);
        assert!(!sync.toggle());

        assert_eq!(sync.observe(Pane::Editor, 90.0, t0), ScrollResponse::Ignored);
        assert_eq!(sync.take_pending(Pane::Preview), None);
        assert_eq!(sync.handled_count(Pane::Editor), 1);
    }

    #[test]
    fn test_disabling_reattaches_listeners() {
        let t0 = Instant::now();
        let mut sync = split_state(t0);
        sync.observe(Pane::Editor, 90.0, t0);
        assert!(!sync.is_listening(Pane::Preview));

        sync.set_enabled(false);
        assert!(sync.is_listening(Pane::Preview));
        assert_eq!(sync.take_pending(Pane::Preview), None);

        assert!(sync.toggle());
        assert!(sync.is_enabled());
    }

    #[test]
    fn test_small_jitter_is_unchanged() {
        let t0 = Instant::now();
        let mut sync = split_state(t0);
        assert_eq!(sync.observe(Pane::Editor, 0.2, t0), ScrollResponse::Unchanged);
        assert_eq!(sync.handled_count(Pane::Editor), 0);
    }
}
