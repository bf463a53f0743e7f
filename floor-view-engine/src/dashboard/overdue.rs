use std::collections::HashMap;

use bevy::prelude::*;
use chrono::{DateTime, Utc};

use super::store::DashboardStore;
use crate::rpc::web_rpc::WebRpcInterface;

/// A workstation's checked-in element passed its target time.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct WorkstationOverdue {
    pub id: String,
}

/// One pending overdue flip per workstation id, keyed to a wall-clock
/// instant.
///
/// Re-arming with the same due instant is a no-op; a different instant
/// replaces it. Workstations that are no longer checked in, or already
/// overdue, lose their entry.
#[derive(Resource, Debug, Default)]
pub struct OverdueTimers {
    due: HashMap<String, DateTime<Utc>>,
}

impl OverdueTimers {
    pub fn len(&self) -> usize {
        self.due.len()
    }

    pub fn is_empty(&self) -> bool {
        self.due.is_empty()
    }

    pub fn is_armed(&self, id: &str) -> bool {
        self.due.contains_key(id)
    }

    /// Arm or re-arm a timer. Returns false if the due instant is not after
    /// `now`, in which case no timer is kept.
    pub fn arm(&mut self, id: &str, due: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        if due <= now {
            self.due.remove(id);
            return false;
        }
        match self.due.insert(id.to_string(), due) {
            Some(previous) if previous != due => debug!("Overdue timer for '{}' re-armed", id),
            _ => {}
        }
        true
    }

    /// Keep only the ids accepted by `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.due.retain(|id, _| keep(id));
    }

    /// Remove and return, sorted, every id whose due instant is at or before
    /// `now`.
    pub fn take_due(&mut self, now: DateTime<Utc>) -> Vec<String> {
        let mut fired = Vec::new();
        self.due.retain(|id, due| {
            if *due <= now {
                fired.push(id.clone());
                false
            } else {
                true
            }
        });
        fired.sort();
        fired
    }

    pub fn clear(&mut self) {
        self.due.clear();
    }
}

/// Arm a timer for every checked-in workstation that is not overdue yet.
pub fn schedule_overdue_timers(store: Res<DashboardStore>, mut timers: ResMut<OverdueTimers>) {
    let now = Utc::now();
    let mut wanted = Vec::new();

    for status in store.work_stations() {
        let Some(id) = status.id() else {
            continue;
        };
        if !status.is_checked_in() || status.checkin_overdue {
            continue;
        }
        let (Some(checkin), Some(layout)) = (status.checkin_time, store.work_station_layout(id)) else {
            continue;
        };
        let Some(due) = layout
            .target_duration()
            .and_then(|target| checkin.checked_add_signed(target))
        else {
            warn!(
                "Workstation '{}' target time {}s is out of range, not tracking overdue",
                id, layout.target_time
            );
            continue;
        };
        if timers.arm(id, due, now) {
            wanted.push(id.to_string());
        }
    }

    timers.retain(|id| wanted.iter().any(|w| w == id));
}

/// Flip every workstation whose due instant has passed on the wall clock.
pub fn tick_overdue_timers(
    mut timers: ResMut<OverdueTimers>,
    mut store: ResMut<DashboardStore>,
    mut overdue_events: EventWriter<WorkstationOverdue>,
) {
    if timers.is_empty() {
        return;
    }
    for id in timers.take_due(Utc::now()) {
        if !store.mark_overdue(&id) {
            continue;
        }
        info!("→ Workstation '{}' is overdue", id);
        overdue_events.write(WorkstationOverdue { id });
    }
}

pub fn notify_workstation_overdue(
    mut overdue_events: EventReader<WorkstationOverdue>,
    mut rpc: ResMut<WebRpcInterface>,
) {
    for event in overdue_events.read() {
        rpc.send_notification("workstation_overdue", serde_json::json!({ "id": event.id }));
    }
}

pub fn clear_overdue_timers(mut timers: ResMut<OverdueTimers>) {
    timers.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::model::{
        DashboardConfig, ElementDetails, OrganizationWorkStation, StatusSnapshot, WorkStationLayout,
        WorkStationStatus,
    };
    use crate::dashboard::store::{DashboardLoaded, StatusSnapshotReceived};
    use crate::engine::coordinates::DomainPosition;
    use crate::test_support::{headless_app, run_ticks};
    use chrono::Duration as ChronoDuration;

    const HOUR: f64 = 3600.0;

    #[derive(Resource, Default)]
    struct FlipCount(u32);

    fn count_flips(mut events: EventReader<WorkstationOverdue>, mut count: ResMut<FlipCount>) {
        count.0 += events.read().count() as u32;
    }

    fn layout(target_time: f64) -> DashboardConfig {
        DashboardConfig {
            id: "123".into(),
            work_stations: vec![WorkStationLayout {
                id: "ws-1".into(),
                checkin_zone_id: String::new(),
                checkout_zone_id: String::new(),
                show_timer: true,
                target_time,
                length: 1000.0,
                width: 500.0,
                height: 500.0,
                position: DomainPosition::ORIGIN,
                rotation: None,
            }],
            zones: Vec::new(),
            viewer_config: None,
            ui_scale: None,
            widget_offset: None,
        }
    }

    fn checked_in_now() -> StatusSnapshot {
        StatusSnapshot {
            work_stations_with_status: vec![WorkStationStatus {
                organization_work_station: OrganizationWorkStation {
                    id: Some("ws-1".into()),
                    ..default()
                },
                failure_mode: false,
                checked_in_element: Some(ElementDetails::default()),
                checkin_time: Some(Utc::now()),
                checkin_overdue: false,
            }],
            elements_with_status: Vec::new(),
        }
    }

    fn is_overdue(app: &App) -> bool {
        app.world()
            .resource::<DashboardStore>()
            .work_station_status("ws-1")
            .unwrap()
            .checkin_overdue
    }

    /// Pull the armed due instant for ws-1 into the past.
    fn expire(app: &mut App) {
        let now = Utc::now();
        let mut timers = app.world_mut().resource_mut::<OverdueTimers>();
        assert!(timers.arm(
            "ws-1",
            now - ChronoDuration::milliseconds(1),
            now - ChronoDuration::seconds(10)
        ));
    }

    #[test]
    fn past_due_instants_are_not_armed() {
        let now = Utc::now();
        let mut timers = OverdueTimers::default();
        assert!(!timers.arm("ws-1", now - ChronoDuration::seconds(5), now));
        assert!(timers.is_empty());
        assert!(timers.arm("ws-1", now + ChronoDuration::seconds(5), now));
        assert!(timers.is_armed("ws-1"));
    }

    #[test]
    fn fires_on_wall_clock_regardless_of_frame_gaps() {
        let armed_at = Utc::now();
        let mut timers = OverdueTimers::default();
        timers.arm("ws-1", armed_at + ChronoDuration::seconds(1), armed_at);
        timers.arm("ws-2", armed_at + ChronoDuration::seconds(60), armed_at);

        assert!(timers.take_due(armed_at + ChronoDuration::milliseconds(500)).is_empty());
        // a single late frame after a long stall
        assert_eq!(
            timers.take_due(armed_at + ChronoDuration::milliseconds(1500)),
            vec!["ws-1".to_string()]
        );
        assert!(!timers.is_armed("ws-1"));
        assert!(timers.is_armed("ws-2"));
    }

    #[test]
    fn new_due_instant_replaces_the_timer() {
        let now = Utc::now();
        let mut timers = OverdueTimers::default();
        timers.arm("ws-1", now + ChronoDuration::seconds(1), now);
        timers.arm("ws-1", now + ChronoDuration::seconds(10), now);
        assert_eq!(timers.len(), 1);
        assert!(timers.take_due(now + ChronoDuration::seconds(2)).is_empty());
        assert_eq!(timers.take_due(now + ChronoDuration::seconds(10)).len(), 1);
    }

    #[test]
    fn flips_overdue_exactly_once_when_due() {
        let mut app = headless_app();
        app.init_resource::<FlipCount>()
            .add_systems(Update, count_flips);
        app.world_mut().send_event(DashboardLoaded(layout(HOUR)));
        app.world_mut().send_event(StatusSnapshotReceived(checked_in_now()));

        run_ticks(&mut app, 4);
        assert!(app.world().resource::<OverdueTimers>().is_armed("ws-1"));
        assert!(!is_overdue(&app));

        expire(&mut app);
        run_ticks(&mut app, 1);
        assert!(is_overdue(&app));
        assert!(app.world().resource::<OverdueTimers>().is_empty());

        run_ticks(&mut app, 10);
        assert_eq!(app.world().resource::<FlipCount>().0, 1);
    }

    #[test]
    fn repeated_snapshots_do_not_duplicate_timers() {
        let mut app = headless_app();
        app.init_resource::<FlipCount>()
            .add_systems(Update, count_flips);
        app.world_mut().send_event(DashboardLoaded(layout(HOUR)));
        let snapshot = checked_in_now();
        for _ in 0..3 {
            app.world_mut().send_event(StatusSnapshotReceived(snapshot.clone()));
            run_ticks(&mut app, 2);
        }
        assert_eq!(app.world().resource::<OverdueTimers>().len(), 1);

        expire(&mut app);
        run_ticks(&mut app, 10);
        assert_eq!(app.world().resource::<FlipCount>().0, 1);
    }

    #[test]
    fn overdue_flip_is_reported_to_the_host() {
        let mut app = App::new();
        app.add_event::<WorkstationOverdue>()
            .init_resource::<WebRpcInterface>()
            .add_systems(Update, notify_workstation_overdue);
        app.world_mut().send_event(WorkstationOverdue { id: "ws-1".into() });
        app.update();

        let rpc = app.world().resource::<WebRpcInterface>();
        let sent = rpc.pending_notifications();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, "workstation_overdue");
        assert_eq!(sent[0].params, serde_json::json!({ "id": "ws-1" }));
    }

    #[test]
    fn out_of_range_target_times_are_skipped() {
        for target_time in [1e300, -1e300, 1e15] {
            let mut app = headless_app();
            app.world_mut().send_event(DashboardLoaded(layout(target_time)));
            app.world_mut().send_event(StatusSnapshotReceived(checked_in_now()));

            run_ticks(&mut app, 4);
            assert!(app.world().resource::<OverdueTimers>().is_empty());
            assert!(!is_overdue(&app));
        }
    }
}
