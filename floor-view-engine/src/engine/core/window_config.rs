use bevy::prelude::*;
use bevy::window::PresentMode;

/// Canvas element the viewer renders into when embedded in a page.
pub const CANVAS_SELECTOR: &str = "#floor-view";

pub fn create_window_config() -> Window {
    #[cfg(target_arch = "wasm32")]
    {
        Window {
            canvas: Some(CANVAS_SELECTOR.into()),
            fit_canvas_to_parent: true,
            prevent_default_event_handling: false,
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Window {
            title: "Floor View".into(),
            resolution: (1600., 900.).into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }
}
