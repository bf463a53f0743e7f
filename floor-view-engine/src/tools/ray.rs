use bevy::prelude::*;

/// Distance along the ray to an oriented box of `size` centred on `xf`.
pub fn ray_hits_obb(origin: Vec3, dir: Vec3, xf: &GlobalTransform, size: Vec3) -> Option<f32> {
    let inv = xf.compute_matrix().inverse();
    let o_local = inv.transform_point3(origin);
    let d_local = inv.transform_vector3(dir);
    let he = size * 0.5;
    ray_aabb_hit_t(o_local, d_local, -he, he)
}

// Slab-method ray–AABB intersection, returns Some(t) or None
pub fn ray_aabb_hit_t(ray_origin: Vec3, ray_direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;

    for axis in 0..3 {
        let o = ray_origin[axis];
        let d = ray_direction[axis];
        if d == 0.0 {
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let (mut t0, mut t1) = ((min[axis] - o) * inv, (max[axis] - o) * inv);
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_near = t_near.max(t0);
        t_far = t_far.min(t1);
        if t_near > t_far {
            return None;
        }
    }

    if t_far < 0.0 {
        return None;
    }
    Some(if t_near >= 0.0 { t_near } else { t_far })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hits_front_face() {
        let t = ray_aabb_hit_t(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y, Vec3::splat(-1.0), Vec3::splat(1.0));
        assert_eq!(t, Some(9.0));
    }

    #[test]
    fn axis_parallel_ray_outside_slab_misses() {
        let t = ray_aabb_hit_t(Vec3::new(5.0, 10.0, 0.0), Vec3::NEG_Y, Vec3::splat(-1.0), Vec3::splat(1.0));
        assert_eq!(t, None);
    }

    #[test]
    fn box_behind_the_ray_misses() {
        let t = ray_aabb_hit_t(Vec3::new(0.0, 10.0, 0.0), Vec3::Y, Vec3::splat(-1.0), Vec3::splat(1.0));
        assert_eq!(t, None);
    }

    #[test]
    fn respects_box_transform() {
        let xf = GlobalTransform::from(Transform::from_xyz(100.0, 0.0, -50.0));
        let size = Vec3::new(20.0, 10.0, 20.0);
        let hit = ray_hits_obb(Vec3::new(100.0, 100.0, -50.0), Vec3::NEG_Y, &xf, size);
        assert_eq!(hit, Some(95.0));
        assert_eq!(ray_hits_obb(Vec3::new(0.0, 100.0, 0.0), Vec3::NEG_Y, &xf, size), None);
    }
}
