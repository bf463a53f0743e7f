pub mod coordinate_system;
pub mod dashboard;
pub mod render_settings;
