/// Workstation with nothing checked in.
pub const IDLE_COLOUR: &str = "#bfbfbf";

/// Workstation with a checked-in element still within its target time.
pub const CHECKED_IN_COLOUR: &str = "#e6f5d7";

/// Workstation whose checked-in element exceeded its target time.
pub const OVERDUE_COLOUR: &str = "#f7d0d0";

/// Element beam colour.
pub const ELEMENT_COLOUR: &str = "#c7b02c";

/// Upward lift (domain Z, mm) applied to an element after insertion.
pub const ELEMENT_NUDGE_HEIGHT: f32 = 1000.0;

pub const DEFAULT_UI_SCALE: f32 = 20.0;
pub const DEFAULT_WIDGET_OFFSET: f32 = 200.0;

/// Assumed widget height (px) when the widget has not been laid out yet.
pub const DEFAULT_WIDGET_HEIGHT: f32 = 40.0;

pub struct AppearanceInfo {
    pub name: &'static str,
    pub text: &'static str,
    pub background: &'static str,
}

pub const APPEARANCE_MAP: &[AppearanceInfo] = &[
    AppearanceInfo {
        name: "light",
        text: "#1f2937",
        background: "#f9fafb",
    },
    AppearanceInfo {
        name: "dark",
        text: "#f9fafb",
        background: "#1f2937",
    },
    AppearanceInfo {
        name: "danger",
        text: "#ffffff",
        background: "#dc2626",
    },
];

pub fn get_appearance(name: &str) -> &'static AppearanceInfo {
    APPEARANCE_MAP
        .iter()
        .find(|a| a.name == name)
        .unwrap_or(&APPEARANCE_MAP[1])
}
