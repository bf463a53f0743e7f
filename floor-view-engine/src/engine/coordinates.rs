use bevy::prelude::*;
use constants::coordinate_system::{to_domain_space, to_render_space};
use serde::{Deserialize, Serialize};

/// Position in the factory-floor domain: millimetres, Z up, Y as depth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainPosition {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl DomainPosition {
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn to_render(self) -> Vec3 {
        to_render_space(self.x, self.y, self.z)
    }

    pub fn from_render(render: Vec3) -> Self {
        let [x, y, z] = to_domain_space(render);
        Self { x, y, z }
    }

    /// Same position raised along the domain Z axis.
    pub fn lifted(self, dz: f32) -> Self {
        Self::new(self.x, self.y, self.z + dz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_round_trip() {
        let p = DomainPosition::new(4200.0, 1800.0, 350.0);
        assert_eq!(p.to_render(), Vec3::new(4200.0, 350.0, -1800.0));
        assert_eq!(DomainPosition::from_render(p.to_render()), p);
    }

    #[test]
    fn lift_raises_render_height() {
        let p = DomainPosition::new(10.0, 20.0, 0.0).lifted(1000.0);
        assert_eq!(p.to_render().y, 1000.0);
    }
}
