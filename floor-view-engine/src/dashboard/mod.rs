//! Factory-floor dashboard on top of the viewer.
//!
//! ```text
//! load_dashboard / demo feed ──> DashboardStore ──> reconcile_dashboard ──> Viewer
//! push_status_snapshot ────────┘       │   ^
//!                                      v   │ overdue flip
//!                              OverdueTimers
//! ```
//!
//! The store is the single source of truth for statuses. Reconciliation and
//! timer scheduling run whenever it changes; widgets only read it.

/// Native-only demo feed loading the bundled layout and status files.
pub mod loader;

/// Serde model of dashboard layouts and status snapshots.
pub mod model;

/// Overdue timers keyed by workstation id.
pub mod overdue;

/// Populate-then-patch synchronisation of the scene with the store.
pub mod reconciler;

pub mod store;

/// Per-workstation screen-space status overlays.
pub mod widget;

use bevy::prelude::*;

use crate::engine::core::app_setup::RenderLoopSet;
use crate::engine::core::app_state::ViewerState;
use overdue::{
    OverdueTimers, WorkstationOverdue, clear_overdue_timers, notify_workstation_overdue,
    schedule_overdue_timers, tick_overdue_timers,
};
use reconciler::{ReconcilerState, reconcile_dashboard};
use store::{DashboardLoaded, DashboardStore, StatusSnapshotReceived, apply_dashboard_events};
use widget::{WidgetClock, position_status_widgets, refresh_status_widgets, spawn_status_widgets};

pub struct DashboardPlugin;

impl Plugin for DashboardPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DashboardStore>()
            .init_resource::<ReconcilerState>()
            .init_resource::<OverdueTimers>()
            .init_resource::<WidgetClock>()
            .add_event::<DashboardLoaded>()
            .add_event::<StatusSnapshotReceived>()
            .add_event::<WorkstationOverdue>();

        app.add_systems(
            Update,
            (
                apply_dashboard_events,
                schedule_overdue_timers.run_if(resource_changed::<DashboardStore>),
                tick_overdue_timers,
                notify_workstation_overdue,
                reconcile_dashboard.run_if(resource_changed::<DashboardStore>),
            )
                .chain()
                .run_if(not(in_state(ViewerState::Disposed))),
        )
        .add_systems(
            Update,
            (
                spawn_status_widgets,
                refresh_status_widgets,
                position_status_widgets,
            )
                .chain()
                .in_set(RenderLoopSet::Overlay),
        )
        .add_systems(OnEnter(ViewerState::Disposed), clear_overdue_timers);
    }
}
