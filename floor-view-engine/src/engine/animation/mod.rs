//! Time-driven object moves advanced once per render-loop tick.

/// Eased translation tweens.
pub mod tween;
