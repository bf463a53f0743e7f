use bevy::prelude::*;

use super::model::{DashboardConfig, ElementStatus, StatusSnapshot, WorkStationLayout, WorkStationStatus};
use crate::engine::core::app_state::ViewerConfigInput;

/// A dashboard layout arrived from the host or the demo feed.
#[derive(Event, Debug, Clone)]
pub struct DashboardLoaded(pub DashboardConfig);

/// A fresh status snapshot arrived.
#[derive(Event, Debug, Clone)]
pub struct StatusSnapshotReceived(pub StatusSnapshot);

/// Dashboard layout plus the latest workstation and element statuses.
///
/// Statuses are replaced wholesale by each snapshot. The only local mutation
/// is the overdue flip, which lasts until the next snapshot says otherwise.
#[derive(Resource, Debug, Default)]
pub struct DashboardStore {
    layout: Option<DashboardConfig>,
    work_stations: Vec<WorkStationStatus>,
    elements: Vec<ElementStatus>,
    snapshots_received: u64,
}

impl DashboardStore {
    pub fn layout(&self) -> Option<&DashboardConfig> {
        self.layout.as_ref()
    }

    pub fn work_stations(&self) -> &[WorkStationStatus] {
        &self.work_stations
    }

    pub fn elements(&self) -> &[ElementStatus] {
        &self.elements
    }

    pub fn has_snapshot(&self) -> bool {
        self.snapshots_received > 0
    }

    pub fn snapshots_received(&self) -> u64 {
        self.snapshots_received
    }

    pub fn work_station_layout(&self, id: &str) -> Option<&WorkStationLayout> {
        self.layout.as_ref().and_then(|layout| layout.work_station(id))
    }

    pub fn work_station_status(&self, id: &str) -> Option<&WorkStationStatus> {
        self.work_stations.iter().find(|ws| ws.id() == Some(id))
    }

    pub fn set_layout(&mut self, layout: DashboardConfig) {
        self.layout = Some(layout);
    }

    pub fn apply_snapshot(&mut self, snapshot: StatusSnapshot) {
        self.work_stations = snapshot.work_stations_with_status;
        self.elements = snapshot.elements_with_status;
        self.snapshots_received += 1;
    }

    /// Flag a workstation overdue. Returns false if it already was, or is
    /// unknown.
    pub fn mark_overdue(&mut self, id: &str) -> bool {
        match self.work_stations.iter_mut().find(|ws| ws.id() == Some(id)) {
            Some(status) if !status.checkin_overdue => {
                status.checkin_overdue = true;
                true
            }
            _ => false,
        }
    }
}

/// Fold incoming layouts and snapshots into the store. A layout that carries
/// a viewer configuration also hands it to the viewer.
pub fn apply_dashboard_events(
    mut loaded: EventReader<DashboardLoaded>,
    mut received: EventReader<StatusSnapshotReceived>,
    mut store: ResMut<DashboardStore>,
    mut viewer_input: ResMut<ViewerConfigInput>,
) {
    for DashboardLoaded(layout) in loaded.read() {
        info!(
            "→ Dashboard '{}' loaded with {} workstations",
            layout.id,
            layout.work_stations.len()
        );
        if let Some(config) = &layout.viewer_config {
            if viewer_input.0.as_ref() != Some(config) {
                viewer_input.0 = Some(config.clone());
            }
        }
        store.set_layout(layout.clone());
    }

    for StatusSnapshotReceived(snapshot) in received.read() {
        debug!(
            "Status snapshot: {} workstations, {} elements",
            snapshot.work_stations_with_status.len(),
            snapshot.elements_with_status.len()
        );
        store.apply_snapshot(snapshot.clone());
    }
}
