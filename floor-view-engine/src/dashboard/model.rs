use bevy::prelude::*;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use constants::dashboard::{DEFAULT_UI_SCALE, DEFAULT_WIDGET_OFFSET};
use serde::{Deserialize, Serialize};

use crate::engine::config::ViewerConfig;
use crate::engine::coordinates::DomainPosition;

/// Layout of one dashboard: where each workstation sits on the floor and how
/// the viewer should be set up.
#[derive(Asset, TypePath, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardConfig {
    pub id: String,
    #[serde(default)]
    pub work_stations: Vec<WorkStationLayout>,
    #[serde(default)]
    pub zones: Vec<Zone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewer_config: Option<ViewerConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_scale: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget_offset: Option<f32>,
}

impl DashboardConfig {
    /// World units per widget pixel. Zero or missing uses the default.
    pub fn ui_scale(&self) -> f32 {
        self.ui_scale
            .filter(|s| *s > 0.0)
            .unwrap_or(DEFAULT_UI_SCALE)
    }

    pub fn widget_offset(&self) -> f32 {
        self.widget_offset
            .filter(|o| *o != 0.0)
            .unwrap_or(DEFAULT_WIDGET_OFFSET)
    }

    pub fn work_station(&self, id: &str) -> Option<&WorkStationLayout> {
        self.work_stations.iter().find(|ws| ws.id == id)
    }
}

/// Physical footprint of a workstation, in millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkStationLayout {
    pub id: String,
    #[serde(default)]
    pub checkin_zone_id: String,
    #[serde(default)]
    pub checkout_zone_id: String,
    #[serde(default)]
    pub show_timer: bool,
    /// Seconds an element may stay checked in before it is overdue.
    pub target_time: f64,
    pub length: f32,
    pub width: f32,
    pub height: f32,
    pub position: DomainPosition,
    /// Radians around the vertical axis. Carried but not rendered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f32>,
}

impl WorkStationLayout {
    /// Target time as a duration, or `None` when it does not fit.
    pub fn target_duration(&self) -> Option<ChronoDuration> {
        let millis = (self.target_time * 1000.0).round();
        if !(i64::MIN as f64..i64::MAX as f64).contains(&millis) {
            return None;
        }
        ChronoDuration::try_milliseconds(millis as i64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub work_stations: Vec<String>,
}

/// One complete status payload for every tracked workstation and element.
#[derive(Asset, TypePath, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    #[serde(default)]
    pub work_stations_with_status: Vec<WorkStationStatus>,
    #[serde(default)]
    pub elements_with_status: Vec<ElementStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WorkstationType {
    Execute,
    Inspect,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationWorkStation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub guid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub work_station_type: String,
    #[serde(default)]
    pub organization_production_line_id: String,
    #[serde(default)]
    pub organization_id: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<WorkstationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_production_line: Option<NamedRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<NamedRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectRef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDetails {
    #[serde(default)]
    pub element_type: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub readable_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rfid: Option<String>,
    #[serde(default)]
    pub project_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assembly_order_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_check_in: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkStationStatus {
    pub organization_work_station: OrganizationWorkStation,
    #[serde(default)]
    pub failure_mode: bool,
    #[serde(default)]
    pub checked_in_element: Option<ElementDetails>,
    #[serde(default)]
    pub checkin_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub checkin_overdue: bool,
}

impl WorkStationStatus {
    /// Stable workstation id; entries without one are not tracked.
    pub fn id(&self) -> Option<&str> {
        self.organization_work_station
            .id
            .as_deref()
            .filter(|id| !id.is_empty())
    }

    pub fn is_checked_in(&self) -> bool {
        self.checked_in_element.is_some()
    }
}

/// Dimensions of an element in millimetres.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementGeometry {
    pub length: f32,
    pub width: f32,
    pub thickness: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementStatus {
    pub element: ElementDetails,
    pub geometry: ElementGeometry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<String>,
    pub position: DomainPosition,
    #[serde(default)]
    pub work_station_id: Option<String>,
    #[serde(default)]
    pub checked_in: bool,
    #[serde(default)]
    pub checkin_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub checkin_overdue: bool,
}

impl ElementStatus {
    pub fn id(&self) -> Option<&str> {
        Some(self.element.id.as_str()).filter(|id| !id.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_defaults_for_scale_and_offset() {
        let config: DashboardConfig = serde_json::from_str(
            r#"{ "id": "123", "workStations": [], "zones": [], "uiScale": 0 }"#,
        )
        .unwrap();
        assert_eq!(config.ui_scale(), DEFAULT_UI_SCALE);
        assert_eq!(config.widget_offset(), DEFAULT_WIDGET_OFFSET);
        assert!(config.viewer_config.is_none());
    }

    #[test]
    fn parses_status_payload() {
        let json = r#"{
            "workStationsWithStatus": [{
                "organizationWorkStation": { "id": "ws-1", "name": "Saw", "type": "EXECUTE" },
                "failureMode": false,
                "checkedInElement": { "id": "el-1", "readableId": "W-001" },
                "checkinTime": "2024-05-01T08:00:00Z",
                "checkinOverdue": false
            }, {
                "organizationWorkStation": { "name": "Unregistered" },
                "checkedInElement": null,
                "checkinTime": null
            }],
            "elementsWithStatus": [{
                "element": { "id": "el-1", "readableId": "W-001" },
                "geometry": { "length": 6000, "width": 300, "thickness": 200 },
                "position": { "x": 100, "y": 200, "z": 0 },
                "workStationId": "ws-1",
                "checkedIn": true,
                "checkinTime": "2024-05-01T08:00:00Z",
                "checkinOverdue": false
            }]
        }"#;
        let snapshot: StatusSnapshot = serde_json::from_str(json).unwrap();

        let first = &snapshot.work_stations_with_status[0];
        assert_eq!(first.id(), Some("ws-1"));
        assert!(first.is_checked_in());
        assert_eq!(first.organization_work_station.kind, Some(WorkstationType::Execute));
        assert_eq!(snapshot.work_stations_with_status[1].id(), None);

        let element = &snapshot.elements_with_status[0];
        assert_eq!(element.id(), Some("el-1"));
        assert_eq!(element.geometry.thickness, 200.0);
        assert_eq!(element.work_station_id.as_deref(), Some("ws-1"));
    }

    #[test]
    fn target_time_is_in_seconds() {
        let layout = WorkStationLayout {
            id: "ws-1".into(),
            checkin_zone_id: String::new(),
            checkout_zone_id: String::new(),
            show_timer: true,
            target_time: 1.5,
            length: 1.0,
            width: 1.0,
            height: 1.0,
            position: DomainPosition::ORIGIN,
            rotation: None,
        };
        assert_eq!(layout.target_duration(), Some(ChronoDuration::milliseconds(1500)));
    }

    #[test]
    fn out_of_range_target_time_has_no_duration() {
        let mut layout: WorkStationLayout = serde_json::from_str(
            r#"{ "id": "ws-1", "targetTime": 1e300, "length": 1, "width": 1, "height": 1,
                 "position": { "x": 0, "y": 0, "z": 0 } }"#,
        )
        .unwrap();
        assert_eq!(layout.target_duration(), None);

        layout.target_time = -1e300;
        assert_eq!(layout.target_duration(), None);
    }
}
