pub mod animation;
pub mod camera;
pub mod config;
pub mod coordinates;
pub mod core;
pub mod errors;
pub mod scene;
pub mod systems;
pub mod viewer;
