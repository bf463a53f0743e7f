//! Screen-space status labels that follow each workstation.

use std::time::Duration;

use bevy::prelude::*;
use chrono::{DateTime, Utc};
use constants::dashboard::{AppearanceInfo, DEFAULT_WIDGET_HEIGHT, get_appearance};

use super::model::{WorkStationLayout, WorkStationStatus};
use super::store::DashboardStore;
use crate::engine::camera::ViewerCamera;
use crate::engine::config::parse_colour;
use crate::engine::scene::ViewerOwned;
use crate::engine::scene::objects::WidgetAnchor;

const FALLBACK_WIDGET_WIDTH: f32 = 300.0;

/// Overlay node for one workstation.
#[derive(Component, Debug)]
pub struct StatusWidget {
    pub workstation_id: String,
    pub anchor: Entity,
    pub width: f32,
}

/// Placed on an anchor once its overlay exists.
#[derive(Component, Debug)]
pub struct WidgetOverlay(pub Entity);

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetField {
    Heading,
    Element,
    Timer,
}

/// Ticks once a second to advance the elapsed timers.
#[derive(Resource, Debug)]
pub struct WidgetClock(pub Timer);

impl Default for WidgetClock {
    fn default() -> Self {
        Self(Timer::new(Duration::from_secs(1), TimerMode::Repeating))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WidgetContent {
    pub heading: String,
    pub element: String,
    pub timer: Option<String>,
    pub appearance: &'static str,
}

pub fn widget_appearance(status: &WorkStationStatus) -> &'static str {
    match (status.is_checked_in(), status.checkin_overdue) {
        (true, true) => "danger",
        (true, false) => "light",
        (false, _) => "dark",
    }
}

/// Whole seconds since check-in, never negative.
pub fn elapsed_seconds(checkin: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now.timestamp() - checkin.timestamp()).max(0)
}

pub fn format_elapsed(seconds: i64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

pub fn widget_content(
    status: Option<&WorkStationStatus>,
    layout: Option<&WorkStationLayout>,
    now: DateTime<Utc>,
) -> WidgetContent {
    let Some(status) = status else {
        return WidgetContent {
            heading: layout.map(|l| l.id.clone()).unwrap_or_default(),
            element: String::new(),
            timer: None,
            appearance: "dark",
        };
    };

    let heading = if status.organization_work_station.name.is_empty() {
        status.id().unwrap_or_default().to_string()
    } else {
        status.organization_work_station.name.clone()
    };
    let element = status
        .checked_in_element
        .as_ref()
        .map(|e| e.readable_id.clone())
        .unwrap_or_default();
    let show_timer = layout.is_some_and(|l| l.show_timer);
    let timer = match (show_timer, status.is_checked_in(), status.checkin_time) {
        (true, true, Some(checkin)) => Some(format_elapsed(elapsed_seconds(checkin, now))),
        _ => None,
    };

    WidgetContent {
        heading,
        element,
        timer,
        appearance: widget_appearance(status),
    }
}

fn appearance_colours(info: &AppearanceInfo) -> (Color, Color) {
    (
        parse_colour(info.text).unwrap_or(Color::WHITE),
        parse_colour(info.background).unwrap_or(Color::BLACK),
    )
}

pub fn spawn_status_widgets(
    mut commands: Commands,
    store: Res<DashboardStore>,
    anchors: Query<(Entity, &WidgetAnchor), Without<WidgetOverlay>>,
) {
    for (anchor, widget) in &anchors {
        let width = store
            .layout()
            .and_then(|dashboard| {
                dashboard
                    .work_station(&widget.workstation_id)
                    .map(|ws| (ws.length / dashboard.ui_scale()).floor())
            })
            .filter(|w| *w > 0.0)
            .unwrap_or(FALLBACK_WIDGET_WIDTH);
        let (text_colour, background) = appearance_colours(get_appearance("dark"));

        let overlay = commands
            .spawn((
                Name::new(format!("StatusWidget {}", widget.workstation_id)),
                StatusWidget {
                    workstation_id: widget.workstation_id.clone(),
                    anchor,
                    width,
                },
                Node {
                    position_type: PositionType::Absolute,
                    width: Val::Px(width),
                    min_height: Val::Px(DEFAULT_WIDGET_HEIGHT),
                    padding: UiRect::all(Val::Px(4.0)),
                    display: Display::Flex,
                    flex_direction: FlexDirection::Column,
                    align_items: AlignItems::Center,
                    overflow: Overflow::clip(),
                    ..default()
                },
                BackgroundColor(background),
                Visibility::Hidden,
                ViewerOwned,
            ))
            .with_children(|parent| {
                for (field, size) in [
                    (WidgetField::Heading, 14.0),
                    (WidgetField::Element, 12.0),
                    (WidgetField::Timer, 12.0),
                ] {
                    parent.spawn((
                        field,
                        Text::new(""),
                        TextFont {
                            font_size: size,
                            ..default()
                        },
                        TextColor(text_colour),
                    ));
                }
            })
            .id();

        commands.entity(anchor).insert(WidgetOverlay(overlay));
    }
}

/// Rewrite widget text and colours on store changes and once a second.
pub fn refresh_status_widgets(
    time: Res<Time>,
    mut clock: ResMut<WidgetClock>,
    store: Res<DashboardStore>,
    added: Query<(), Added<StatusWidget>>,
    mut widgets: Query<(&StatusWidget, &Children, &mut BackgroundColor)>,
    mut fields: Query<(&WidgetField, &mut Text, &mut TextColor)>,
) {
    clock.0.tick(time.delta());
    if !clock.0.just_finished() && !store.is_changed() && added.is_empty() {
        return;
    }

    let now = Utc::now();
    for (widget, children, mut background) in &mut widgets {
        let content = widget_content(
            store.work_station_status(&widget.workstation_id),
            store.work_station_layout(&widget.workstation_id),
            now,
        );
        let (text_colour, background_colour) = appearance_colours(get_appearance(content.appearance));
        background.0 = background_colour;

        for &child in &**children {
            let Ok((field, mut text, mut colour)) = fields.get_mut(child) else {
                continue;
            };
            let value = match field {
                WidgetField::Heading => content.heading.clone(),
                WidgetField::Element => content.element.clone(),
                WidgetField::Timer => content.timer.clone().unwrap_or_default(),
            };
            if text.0 != value {
                text.0 = value;
            }
            colour.0 = text_colour;
        }
    }
}

/// Project each anchor to the screen. Widgets whose anchor is behind the
/// camera or off the viewport are hidden.
pub fn position_status_widgets(
    cameras: Query<(&Camera, &GlobalTransform), With<ViewerCamera>>,
    anchors: Query<&GlobalTransform, With<WidgetAnchor>>,
    mut widgets: Query<(&StatusWidget, &mut Node, &mut Visibility)>,
) {
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };

    for (widget, mut node, mut visibility) in &mut widgets {
        let screen = anchors
            .get(widget.anchor)
            .ok()
            .and_then(|anchor| camera.world_to_viewport(camera_transform, anchor.translation()).ok());

        match screen {
            Some(position) => {
                node.left = Val::Px(position.x - widget.width / 2.0);
                node.top = Val::Px(position.y - DEFAULT_WIDGET_HEIGHT / 2.0);
                *visibility = Visibility::Inherited;
            }
            None => *visibility = Visibility::Hidden,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::model::{ElementDetails, OrganizationWorkStation};
    use crate::engine::coordinates::DomainPosition;
    use chrono::Duration as ChronoDuration;

    fn status(checked_in: bool, overdue: bool, checkin: Option<DateTime<Utc>>) -> WorkStationStatus {
        WorkStationStatus {
            organization_work_station: OrganizationWorkStation {
                id: Some("ws-1".into()),
                name: "Saw".into(),
                ..default()
            },
            failure_mode: false,
            checked_in_element: checked_in.then(|| ElementDetails {
                id: "el-1".into(),
                readable_id: "W-001".into(),
                ..default()
            }),
            checkin_time: checkin,
            checkin_overdue: overdue,
        }
    }

    fn layout(show_timer: bool) -> WorkStationLayout {
        WorkStationLayout {
            id: "ws-1".into(),
            checkin_zone_id: String::new(),
            checkout_zone_id: String::new(),
            show_timer,
            target_time: 60.0,
            length: 4000.0,
            width: 1000.0,
            height: 800.0,
            position: DomainPosition::ORIGIN,
            rotation: None,
        }
    }

    #[test]
    fn elapsed_time_formats_as_minutes_and_seconds() {
        assert_eq!(format_elapsed(0), "00:00");
        assert_eq!(format_elapsed(65), "01:05");
        assert_eq!(format_elapsed(6000), "100:00");
    }

    #[test]
    fn future_checkin_counts_as_zero() {
        let now = Utc::now();
        assert_eq!(elapsed_seconds(now + ChronoDuration::seconds(30), now), 0);
        assert_eq!(elapsed_seconds(now - ChronoDuration::seconds(125), now), 125);
    }

    #[test]
    fn appearance_follows_checkin_state() {
        assert_eq!(widget_appearance(&status(true, true, None)), "danger");
        assert_eq!(widget_appearance(&status(true, false, None)), "light");
        assert_eq!(widget_appearance(&status(false, false, None)), "dark");
    }

    #[test]
    fn timer_only_when_enabled_and_checked_in() {
        let now = Utc::now();
        let checkin = Some(now - ChronoDuration::seconds(90));

        let content = widget_content(Some(&status(true, false, checkin)), Some(&layout(true)), now);
        assert_eq!(content.heading, "Saw");
        assert_eq!(content.element, "W-001");
        assert_eq!(content.timer.as_deref(), Some("01:30"));

        let hidden = widget_content(Some(&status(true, false, checkin)), Some(&layout(false)), now);
        assert_eq!(hidden.timer, None);

        let idle = widget_content(Some(&status(false, false, None)), Some(&layout(true)), now);
        assert_eq!(idle.timer, None);
        assert!(idle.element.is_empty());
    }
}
