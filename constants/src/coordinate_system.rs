use bevy::math::Vec3;

/// Domain to render axis mapping (row-major: [x_new, y_new, z_new]).
/// Domain is engineering X/Y/Z in millimetres with Z up and Y as depth;
/// render space is Y-up, right-handed (X→X, Z→Y, -Y→Z).
pub const COORDINATE_TRANSFORM: [[f32; 3]; 3] = [
    [1.0, 0.0, 0.0],  // X = X
    [0.0, 0.0, 1.0],  // Y = Z
    [0.0, -1.0, 0.0], // Z = -Y
];

/// Map a domain point (x, y, z) to render space (x, z, -y).
pub fn to_render_space(x: f32, y: f32, z: f32) -> Vec3 {
    let input = [x, y, z];
    let mut output = [0.0; 3];

    for i in 0..3 {
        for j in 0..3 {
            output[i] += COORDINATE_TRANSFORM[i][j] * input[j];
        }
    }

    Vec3::from_array(output)
}

/// Exact inverse of [`to_render_space`]. The matrix is orthonormal, so the
/// transpose is applied.
pub fn to_domain_space(render: Vec3) -> [f32; 3] {
    let input = render.to_array();
    let mut output = [0.0; 3];

    for i in 0..3 {
        for j in 0..3 {
            output[i] += COORDINATE_TRANSFORM[j][i] * input[j];
        }
    }

    output
}
