//! Keeps the placed scene in step with the dashboard store.
//!
//! The first snapshot that arrives with a layout populates the scene. Every
//! later change only patches: workstation beams are recoloured, new elements
//! are inserted and moved elements are tweened to their new place. Nothing is
//! ever rebuilt.

use std::collections::HashMap;

use bevy::prelude::*;
use constants::dashboard::{
    CHECKED_IN_COLOUR, DEFAULT_WIDGET_HEIGHT, ELEMENT_COLOUR, ELEMENT_NUDGE_HEIGHT, IDLE_COLOUR,
    OVERDUE_COLOUR,
};

use super::model::{DashboardConfig, ElementStatus, WorkStationLayout, WorkStationStatus};
use super::store::DashboardStore;
use crate::engine::coordinates::DomainPosition;
use crate::engine::scene::objects::SceneObject;
use crate::engine::viewer::Viewer;

#[derive(Resource, Debug, Default)]
pub struct ReconcilerState {
    populated: bool,
    /// Last position each element was sent to, by element id.
    element_targets: HashMap<String, DomainPosition>,
}

impl ReconcilerState {
    pub fn is_populated(&self) -> bool {
        self.populated
    }
}

pub fn workstation_colour(status: &WorkStationStatus) -> &'static str {
    match (status.is_checked_in(), status.checkin_overdue) {
        (true, true) => OVERDUE_COLOUR,
        (true, false) => CHECKED_IN_COLOUR,
        (false, _) => IDLE_COLOUR,
    }
}

pub fn station_group_name(id: &str) -> String {
    format!("station-{id}")
}

pub fn widget_name(id: &str) -> String {
    format!("widget-{id}")
}

pub fn element_group_name(id: &str) -> String {
    format!("group-{id}")
}

/// Widget anchor relative to the workstation corner: centred along the
/// length, past the far edge by the widget offset, at the top of the beam.
pub fn widget_anchor_position(layout: &WorkStationLayout, dashboard: &DashboardConfig) -> DomainPosition {
    let ui_scale = dashboard.ui_scale();
    let y = layout.width + dashboard.widget_offset() + (DEFAULT_WIDGET_HEIGHT / 2.0) * ui_scale;
    DomainPosition::new(layout.length / 2.0, y, layout.height)
}

pub fn workstation_object(
    layout: &WorkStationLayout,
    status: &WorkStationStatus,
    dashboard: &DashboardConfig,
) -> SceneObject {
    SceneObject::group(
        station_group_name(&layout.id),
        layout.position,
        vec![
            SceneObject::beam(
                layout.id.clone(),
                layout.length,
                layout.width,
                layout.height,
                workstation_colour(status),
            ),
            SceneObject::widget_anchor(
                widget_name(&layout.id),
                widget_anchor_position(layout, dashboard),
                &layout.id,
            ),
        ],
    )
}

pub fn element_object(id: &str, element: &ElementStatus) -> SceneObject {
    SceneObject::group(
        element_group_name(id),
        element.position,
        vec![SceneObject::beam(
            id,
            element.geometry.length,
            element.geometry.width,
            element.geometry.thickness,
            ELEMENT_COLOUR,
        )],
    )
}

pub fn reconcile_dashboard(
    store: Res<DashboardStore>,
    mut state: ResMut<ReconcilerState>,
    mut viewer: Viewer,
) {
    let Some(layout) = store.layout() else {
        return;
    };
    if !store.has_snapshot() {
        return;
    }

    if !state.populated {
        populate(&store, layout, &mut state, &mut viewer);
        state.populated = true;
        return;
    }
    patch(&store, layout, &mut state, &mut viewer);
}

fn populate(
    store: &DashboardStore,
    layout: &DashboardConfig,
    state: &mut ReconcilerState,
    viewer: &mut Viewer,
) {
    let stations: Vec<SceneObject> = layout
        .work_stations
        .iter()
        .filter_map(|ws| {
            let status = store.work_station_status(&ws.id);
            if status.is_none() {
                debug!("Workstation '{}' has no status, not placed", ws.id);
            }
            status.map(|status| workstation_object(ws, status, layout))
        })
        .collect();
    let station_count = stations.len();
    viewer.add_objects(stations);

    let mut element_count = 0;
    for element in store.elements() {
        if insert_element(element, state, viewer) {
            element_count += 1;
        }
    }

    info!(
        "→ Dashboard populated: {} workstations, {} elements",
        station_count, element_count
    );
}

fn patch(
    store: &DashboardStore,
    layout: &DashboardConfig,
    state: &mut ReconcilerState,
    viewer: &mut Viewer,
) {
    for status in store.work_stations() {
        let Some(id) = status.id() else {
            continue;
        };
        let Some(ws) = layout.work_station(id) else {
            continue;
        };
        if !viewer.is_known(id) {
            viewer.add_objects([workstation_object(ws, status, layout)]);
            continue;
        }
        if let Err(err) = viewer.recolor_object(id, workstation_colour(status)) {
            warn!("Workstation recolour skipped: {}", err);
        }
    }

    for element in store.elements() {
        let Some(id) = element.id() else {
            continue;
        };
        if insert_element(element, state, viewer) {
            continue;
        }

        let target = element.position.lifted(ELEMENT_NUDGE_HEIGHT);
        if state.element_targets.get(id) == Some(&target) {
            continue;
        }
        match viewer.move_object(&element_group_name(id), target) {
            Ok(_) => {
                state.element_targets.insert(id.to_string(), target);
            }
            Err(err) => warn!("Element move skipped: {}", err),
        }
    }
}

/// Place an element that is not in the scene yet, then lift it into view.
/// Returns false if it was already known or has no id.
fn insert_element(element: &ElementStatus, state: &mut ReconcilerState, viewer: &mut Viewer) -> bool {
    let Some(id) = element.id() else {
        return false;
    };
    if viewer.is_known(id) {
        return false;
    }

    viewer.add_objects([element_object(id, element)]);
    let target = element.position.lifted(ELEMENT_NUDGE_HEIGHT);
    if let Err(err) = viewer.move_object(&element_group_name(id), target) {
        warn!("Element nudge skipped: {}", err);
    }
    state.element_targets.insert(id.to_string(), target);
    true
}
