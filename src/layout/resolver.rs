//! Height settling state machine.
//!
//! Section heights can only be read once the table is attached and the
//! browser has laid out the header. Each call to [`HeightResolver::resolve`]
//! is one settling pass over a [`Measurements`] snapshot: it either commits
//! every height cell at once, defers to a later tick, or aborts. Nothing is
//! written on a deferred or aborted pass.

use crate::scheduler::Tick;
use crate::surface::{Attachment, Measurements, TableLayoutMode};
use crate::types::LayoutState;

/// Header heights below this are a mount-time measurement artifact.
const MIN_SETTLED_HEADER_HEIGHT: f64 = 2.0;

/// Where the resolver is in the settling protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolverPhase {
    #[default]
    Idle,
    /// A pass is running or a retry is pending
    Measuring,
    /// The last pass committed
    Settled,
}

/// Why a pass gave up without scheduling a retry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// The table wrapper is `display: none`
    Hidden,
    /// A header is expected but its wrapper does not exist
    MissingHeader,
}

/// Result of one settling pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// Measurements are not usable yet; retry on the given tick
    Deferred(Tick),
    /// Give up until something external triggers a new pass
    Aborted(AbortReason),
    /// Heights were written
    Committed {
        /// `scroll_y` flipped during this pass
        scroll_y_changed: bool,
        /// The body height was defined for the first time; run one more
        /// pass on the next frame to pick up late scrollbar reflow
        frame_retry: bool,
    },
}

/// Widget settings a pass depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveContext {
    pub show_header: bool,
    pub table_layout: TableLayoutMode,
    /// Number of leaf columns
    pub column_count: usize,
}

#[derive(Debug, Default)]
pub struct HeightResolver {
    phase: ResolverPhase,
}

impl HeightResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> ResolverPhase {
        self.phase
    }

    /// Enter `Measuring` after a structural change
    pub fn begin(&mut self) {
        self.phase = ResolverPhase::Measuring;
    }

    /// Run one settling pass
    pub fn resolve(
        &mut self,
        state: &mut LayoutState,
        attachment: Attachment,
        measured: &Measurements,
        ctx: &ResolveContext,
    ) -> ResolveOutcome {
        self.phase = ResolverPhase::Measuring;

        match attachment {
            Attachment::Detached => {
                log::debug!("table not attached, deferring height pass");
                return ResolveOutcome::Deferred(Tick::Microtask);
            }
            Attachment::Hidden => {
                log::debug!("table hidden, skipping height pass");
                return self.abort(AbortReason::Hidden);
            }
            Attachment::Visible => {}
        }

        let append_height = measured.append_wrapper.unwrap_or(0.0);

        if ctx.show_header
            && measured.header_wrapper.is_none()
            && ctx.table_layout == TableLayoutMode::Fixed
        {
            log::debug!("header wrapper missing, skipping height pass");
            return self.abort(AbortReason::MissingHeader);
        }

        let wrapper_height = measured.header_wrapper.unwrap_or(0.0);
        let header_height = if !ctx.show_header || measured.header_hidden {
            0.0
        } else {
            wrapper_height
        };

        if ctx.show_header
            && !measured.header_hidden
            && wrapper_height > 0.0
            && ctx.column_count > 0
            && header_height < MIN_SETTLED_HEADER_HEIGHT
        {
            log::debug!("header height {header_height}px not settled, deferring height pass");
            return ResolveOutcome::Deferred(Tick::Microtask);
        }

        let table_height = measured.client_height;
        let footer_height = measured.footer_wrapper.unwrap_or(0.0);

        state.append_height = Some(append_height);
        state.header_height = Some(header_height);
        state.table_height = Some(table_height);
        state.footer_height = Some(footer_height);

        let mut frame_retry = false;
        if state.has_height() {
            frame_retry = state.body_height.is_none();
            // Border collapse loses a pixel between body and footer
            let compensation = if measured.footer_wrapper.is_some() {
                1.0
            } else {
                0.0
            };
            let body_height = table_height - header_height - footer_height + compensation;
            let gutter = if state.scroll_x {
                state.gutter_width
            } else {
                0.0
            };
            state.body_height = Some(body_height);
            state.body_scroll_height = measured.body_scroll_height.unwrap_or(0.0);
            state.fixed_body_height = Some(body_height - gutter);
            state.viewport_height = Some(table_height - gutter);
        }

        let scroll_y_changed = update_scroll_y(state, measured.body_wrapper_scroll_height);
        self.phase = ResolverPhase::Settled;

        log::trace!(
            "heights committed: table={table_height} header={header_height} footer={footer_height} body={:?}",
            state.body_height
        );

        ResolveOutcome::Committed {
            scroll_y_changed,
            frame_retry,
        }
    }

    fn abort(&mut self, reason: AbortReason) -> ResolveOutcome {
        self.phase = ResolverPhase::Idle;
        ResolveOutcome::Aborted(reason)
    }
}

/// Recompute vertical overflow. Returns true if `scroll_y` changed.
///
/// Without a configured height the body never scrolls and nothing changes.
/// Without a body wrapper measurement the flag is left alone.
pub fn update_scroll_y(state: &mut LayoutState, body_wrapper_scroll_height: Option<f64>) -> bool {
    if !state.has_height() {
        return false;
    }
    let Some(scroll_height) = body_wrapper_scroll_height else {
        return false;
    };
    let previous = state.scroll_y;
    state.scroll_y = state
        .body_height
        .is_some_and(|body_height| scroll_height > body_height);
    previous != state.scroll_y
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::types::HeightValue;

    fn ctx() -> ResolveContext {
        ResolveContext {
            show_header: true,
            table_layout: TableLayoutMode::Fixed,
            column_count: 3,
        }
    }

    fn measured() -> Measurements {
        Measurements {
            client_width: 600.0,
            client_height: 400.0,
            header_wrapper: Some(40.0),
            header_hidden: false,
            footer_wrapper: None,
            append_wrapper: None,
            body_scroll_height: Some(200.0),
            body_wrapper_scroll_height: Some(200.0),
        }
    }

    #[test]
    fn test_detached_defers_without_writes() {
        let mut resolver = HeightResolver::new();
        let mut state = LayoutState::default();
        let outcome = resolver.resolve(&mut state, Attachment::Detached, &measured(), &ctx());
        assert_eq!(outcome, ResolveOutcome::Deferred(Tick::Microtask));
        assert_eq!(resolver.phase(), ResolverPhase::Measuring);
        assert_eq!(state, LayoutState::default());
    }

    #[test]
    fn test_hidden_aborts_to_idle() {
        let mut resolver = HeightResolver::new();
        let mut state = LayoutState::default();
        let outcome = resolver.resolve(&mut state, Attachment::Hidden, &measured(), &ctx());
        assert_eq!(outcome, ResolveOutcome::Aborted(AbortReason::Hidden));
        assert_eq!(resolver.phase(), ResolverPhase::Idle);
        assert_eq!(state, LayoutState::default());
    }

    #[test]
    fn test_missing_header_wrapper_aborts_in_fixed_mode() {
        let mut resolver = HeightResolver::new();
        let mut state = LayoutState::default();
        let m = Measurements {
            header_wrapper: None,
            append_wrapper: Some(30.0),
            ..measured()
        };
        let outcome = resolver.resolve(&mut state, Attachment::Visible, &m, &ctx());
        assert_eq!(outcome, ResolveOutcome::Aborted(AbortReason::MissingHeader));
        assert_eq!(state, LayoutState::default());

        let auto = ResolveContext {
            table_layout: TableLayoutMode::Auto,
            ..ctx()
        };
        let outcome = resolver.resolve(&mut state, Attachment::Visible, &m, &auto);
        assert!(matches!(outcome, ResolveOutcome::Committed { .. }));
        assert_eq!(state.header_height, Some(0.0));
        assert_eq!(state.append_height, Some(30.0));
    }

    #[test]
    fn test_header_artifact_defers() {
        let mut resolver = HeightResolver::new();
        let mut state = LayoutState::default();
        let m = Measurements {
            header_wrapper: Some(1.0),
            ..measured()
        };
        let outcome = resolver.resolve(&mut state, Attachment::Visible, &m, &ctx());
        assert_eq!(outcome, ResolveOutcome::Deferred(Tick::Microtask));
        assert_eq!(state.header_height, Some(44.0));
    }

    #[test]
    fn test_header_artifact_ignored_without_columns() {
        let mut resolver = HeightResolver::new();
        let mut state = LayoutState::default();
        let m = Measurements {
            header_wrapper: Some(1.0),
            ..measured()
        };
        let no_columns = ResolveContext {
            column_count: 0,
            ..ctx()
        };
        let outcome = resolver.resolve(&mut state, Attachment::Visible, &m, &no_columns);
        assert!(matches!(outcome, ResolveOutcome::Committed { .. }));
        assert_eq!(state.header_height, Some(1.0));
    }

    #[test]
    fn test_hidden_header_measures_zero() {
        let mut resolver = HeightResolver::new();
        let mut state = LayoutState::default();
        let m = Measurements {
            header_hidden: true,
            ..measured()
        };
        resolver.resolve(&mut state, Attachment::Visible, &m, &ctx());
        assert_eq!(state.header_height, Some(0.0));
    }

    #[test]
    fn test_commit_without_height_leaves_body_unset() {
        let mut resolver = HeightResolver::new();
        let mut state = LayoutState::default();
        let outcome = resolver.resolve(&mut state, Attachment::Visible, &measured(), &ctx());
        assert_eq!(
            outcome,
            ResolveOutcome::Committed {
                scroll_y_changed: false,
                frame_retry: false
            }
        );
        assert_eq!(resolver.phase(), ResolverPhase::Settled);
        assert_eq!(state.table_height, Some(400.0));
        assert_eq!(state.header_height, Some(40.0));
        assert_eq!(state.footer_height, Some(0.0));
        assert_eq!(state.body_height, None);
        assert_eq!(state.fixed_body_height, None);
        assert_eq!(state.viewport_height, None);
        assert!(!state.scroll_y);
    }

    #[test]
    fn test_commit_with_height_and_footer() {
        let mut resolver = HeightResolver::new();
        let mut state = LayoutState {
            height: Some(HeightValue::Pixels(400.0)),
            ..LayoutState::default()
        };
        let m = Measurements {
            footer_wrapper: Some(30.0),
            ..measured()
        };
        let outcome = resolver.resolve(&mut state, Attachment::Visible, &m, &ctx());
        assert_eq!(
            outcome,
            ResolveOutcome::Committed {
                scroll_y_changed: false,
                frame_retry: true
            }
        );
        // 400 - 40 - 30 + 1
        assert_eq!(state.body_height, Some(331.0));
        assert_eq!(state.fixed_body_height, Some(331.0));
        assert_eq!(state.viewport_height, Some(400.0));
        assert_eq!(state.body_scroll_height, 200.0);

        // Second pass: body height already known, no further frame retry
        let outcome = resolver.resolve(&mut state, Attachment::Visible, &m, &ctx());
        assert_eq!(
            outcome,
            ResolveOutcome::Committed {
                scroll_y_changed: false,
                frame_retry: false
            }
        );
    }

    #[test]
    fn test_gutter_subtracted_on_horizontal_overflow() {
        let mut resolver = HeightResolver::new();
        let mut state = LayoutState {
            height: Some(HeightValue::Pixels(400.0)),
            scroll_x: true,
            gutter_width: 17.0,
            ..LayoutState::default()
        };
        resolver.resolve(&mut state, Attachment::Visible, &measured(), &ctx());
        assert_eq!(state.body_height, Some(360.0));
        assert_eq!(state.fixed_body_height, Some(343.0));
        assert_eq!(state.viewport_height, Some(383.0));
    }

    #[test]
    fn test_update_scroll_y_transitions() {
        let mut state = LayoutState::default();
        assert!(!update_scroll_y(&mut state, Some(1000.0)));
        assert!(!state.scroll_y);

        state.height = Some(HeightValue::Pixels(300.0));
        assert!(!update_scroll_y(&mut state, Some(1000.0)));
        assert!(!state.scroll_y);

        state.body_height = Some(250.0);
        assert!(update_scroll_y(&mut state, Some(251.0)));
        assert!(state.scroll_y);
        assert!(!update_scroll_y(&mut state, Some(400.0)));
        assert!(!update_scroll_y(&mut state, None));
        assert!(state.scroll_y);
        assert!(update_scroll_y(&mut state, Some(250.0)));
        assert!(!state.scroll_y);
    }
}
