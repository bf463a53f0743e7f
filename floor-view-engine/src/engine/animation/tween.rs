use std::time::Duration;

use bevy::math::curve::{Curve, EaseFunction};
use bevy::prelude::*;

/// In-flight move of an entity's local translation.
///
/// The start point is captured on the first tick, so a tween can be attached
/// in the same frame the entity is spawned. Inserting a new `Tween` replaces
/// the running one and continues from wherever the entity is at that moment.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Tween {
    start: Option<Vec3>,
    target: Vec3,
    elapsed: Duration,
    duration: Duration,
}

impl Tween {
    pub fn new(target: Vec3, duration: Duration) -> Self {
        Self {
            start: None,
            target,
            elapsed: Duration::ZERO,
            duration,
        }
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Advance by `delta` and return the translation to apply and whether
    /// the tween has finished.
    pub fn step(&mut self, current: Vec3, delta: Duration) -> (Vec3, bool) {
        let start = *self.start.get_or_insert(current);
        self.elapsed += delta;

        if self.duration.is_zero() || self.elapsed >= self.duration {
            return (self.target, true);
        }

        let t = self.elapsed.as_secs_f32() / self.duration.as_secs_f32();
        let eased = EaseFunction::SineInOut.sample_clamped(t);
        (start.lerp(self.target, eased), false)
    }
}

pub fn advance_tweens(
    time: Res<Time>,
    mut tweens: Query<(Entity, &mut Transform, &mut Tween)>,
    mut commands: Commands,
) {
    let delta = time.delta();
    for (entity, mut transform, mut tween) in &mut tweens {
        let (translation, finished) = tween.step(transform.translation, delta);
        transform.translation = translation;
        if finished {
            commands.entity(entity).remove::<Tween>();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::time::TimeUpdateStrategy;

    #[test]
    fn eases_symmetrically_and_lands_on_target() {
        let mut tween = Tween::new(Vec3::new(100.0, 0.0, 0.0), Duration::from_secs(4));

        let (quarter, done) = tween.step(Vec3::ZERO, Duration::from_secs(1));
        assert!(!done);
        let (half, _) = tween.step(quarter, Duration::from_secs(1));
        assert!((half.x - 50.0).abs() < 1e-3);
        // sine in-out is slow at the start
        assert!(quarter.x < 25.0);

        let (end, done) = tween.step(half, Duration::from_secs(5));
        assert!(done);
        assert_eq!(end, Vec3::new(100.0, 0.0, 0.0));
    }

    #[test]
    fn finished_tween_removes_itself() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)))
            .add_systems(Update, advance_tweens);

        let entity = app
            .world_mut()
            .spawn((
                Transform::default(),
                Tween::new(Vec3::new(0.0, 1000.0, 0.0), Duration::from_millis(500)),
            ))
            .id();

        for _ in 0..8 {
            app.update();
        }

        let world = app.world();
        assert!(world.get::<Tween>(entity).is_none());
        assert_eq!(
            world.get::<Transform>(entity).unwrap().translation,
            Vec3::new(0.0, 1000.0, 0.0)
        );
    }
}
