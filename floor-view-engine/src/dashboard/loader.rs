//! Demo feed for native builds: the bundled dashboard layout and status
//! snapshot are loaded as JSON assets and fed through the same events the
//! host page uses. Editing the status file while running pushes a new
//! snapshot.

use bevy::prelude::*;

use super::model::{DashboardConfig, StatusSnapshot};
use super::store::{DashboardLoaded, StatusSnapshotReceived};

pub const DEMO_DASHBOARD_PATH: &str = "dashboard/demo.dashboard.json";
pub const DEMO_STATUS_PATH: &str = "dashboard/demo.status.json";

#[derive(Resource, Debug)]
pub struct DemoFeed {
    dashboard: Handle<DashboardConfig>,
    status: Handle<StatusSnapshot>,
    dashboard_sent: bool,
    status_sent: bool,
}

pub fn start_demo_feed(mut commands: Commands, asset_server: Res<AssetServer>) {
    info!("→ Loading demo dashboard from {}", DEMO_DASHBOARD_PATH);
    commands.insert_resource(DemoFeed {
        dashboard: asset_server.load(DEMO_DASHBOARD_PATH),
        status: asset_server.load(DEMO_STATUS_PATH),
        dashboard_sent: false,
        status_sent: false,
    });
}

pub fn forward_demo_feed(
    feed: Option<ResMut<DemoFeed>>,
    dashboards: Res<Assets<DashboardConfig>>,
    snapshots: Res<Assets<StatusSnapshot>>,
    mut status_changes: EventReader<AssetEvent<StatusSnapshot>>,
    mut loaded: EventWriter<DashboardLoaded>,
    mut received: EventWriter<StatusSnapshotReceived>,
) {
    let Some(mut feed) = feed else {
        return;
    };

    if !feed.dashboard_sent {
        if let Some(dashboard) = dashboards.get(&feed.dashboard) {
            loaded.write(DashboardLoaded(dashboard.clone()));
            feed.dashboard_sent = true;
        }
        return;
    }

    let status_id = feed.status.id();
    let modified = status_changes
        .read()
        .any(|event| event.is_modified(status_id));
    if feed.status_sent && !modified {
        return;
    }
    if let Some(snapshot) = snapshots.get(&feed.status) {
        if feed.status_sent {
            info!("→ Demo status file changed, pushing snapshot");
        }
        received.write(StatusSnapshotReceived(snapshot.clone()));
        feed.status_sent = true;
    }
}
