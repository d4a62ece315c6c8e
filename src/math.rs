/// Edge function used in rasterization
pub fn edge_function(a: &[f64; 2], b: &[f64; 2], c: &[f64; 2]) -> f64 {
    (c[0] - a[0]) * (b[1] - a[1]) - (c[1] - a[1]) * (b[0] - a[0])
}

/// Multiplies a 3x3 matrix by a 3-dimensional vector
pub fn multiply_matrix_vector(matrix: &[[f64; 3]; 3], vector: &[f64; 3]) -> [f64; 3] {
    let mut result = [0.0; 3];
    for i in 0..3 {
        for j in 0..3 {
            result[i] += matrix[i][j] * vector[j];
        }
    }
    result
}

/// Multiplies two 3x3 matrices
pub fn multiply_matrices(a: &[[f64; 3]; 3], b: &[[f64; 3]; 3]) -> [[f64; 3]; 3] {
    let mut result = [[0.0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            for k in 0..3 {
                result[i][j] += a[i][k] * b[k][j];
            }
        }
    }
    result
}

/// Builds the rotation matrix for Euler angles applied in XYZ order
pub fn rotation_matrix(euler: &[f64; 3]) -> [[f64; 3]; 3] {
    let (sin_x, cos_x) = euler[0].sin_cos();
    let (sin_y, cos_y) = euler[1].sin_cos();
    let (sin_z, cos_z) = euler[2].sin_cos();

    let rotation_x = [[1.0, 0.0, 0.0], [0.0, cos_x, -sin_x], [0.0, sin_x, cos_x]];
    let rotation_y = [[cos_y, 0.0, sin_y], [0.0, 1.0, 0.0], [-sin_y, 0.0, cos_y]];
    let rotation_z = [[cos_z, -sin_z, 0.0], [sin_z, cos_z, 0.0], [0.0, 0.0, 1.0]];

    multiply_matrices(&multiply_matrices(&rotation_x, &rotation_y), &rotation_z)
}

pub fn add(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

pub fn sub(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub fn scale(v: &[f64; 3], s: f64) -> [f64; 3] {
    [v[0] * s, v[1] * s, v[2] * s]
}

pub fn dot(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn cross(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

pub fn length(v: &[f64; 3]) -> f64 {
    dot(v, v).sqrt()
}

/// Returns the unit vector along `v`, or `v` itself when it has no length
pub fn normalize(v: &[f64; 3]) -> [f64; 3] {
    let length = length(v);
    if length == 0.0 {
        *v
    } else {
        scale(v, 1.0 / length)
    }
}

/// Linear interpolation between two points
pub fn lerp(a: &[f64; 3], b: &[f64; 3], t: f64) -> [f64; 3] {
    add(a, &scale(&sub(b, a), t))
}

/// Moves `current` toward `target` by `factor` of the remaining distance.
///
/// Applied once per tick this is a discrete exponential decay: the distance
/// to the target shrinks by `1 - factor` every call and never reaches zero.
pub fn damp(current: f64, target: f64, factor: f64) -> f64 {
    current + (target - current) * factor
}

/// Hermite interpolation of `x` between the two edges, clamped to [0, 1]
pub fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Calculates the normal vector of a triangle
pub fn calculate_normal(a: &[f64; 3], b: &[f64; 3], c: &[f64; 3]) -> [f64; 3] {
    let u = sub(b, a);
    let v = sub(c, a);
    normalize(&cross(&u, &v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn rotation_matrix_identity_at_zero() {
        let m = rotation_matrix(&[0.0, 0.0, 0.0]);
        let v = multiply_matrix_vector(&m, &[1.0, 2.0, 3.0]);
        assert_approx_eq!(v[0], 1.0);
        assert_approx_eq!(v[1], 2.0);
        assert_approx_eq!(v[2], 3.0);
    }

    #[test]
    fn rotation_matrix_quarter_turn_about_z() {
        let m = rotation_matrix(&[0.0, 0.0, FRAC_PI_2]);
        let v = multiply_matrix_vector(&m, &[1.0, 0.0, 0.0]);
        assert_approx_eq!(v[0], 0.0);
        assert_approx_eq!(v[1], 1.0);
        assert_approx_eq!(v[2], 0.0);
    }

    #[test]
    fn rotation_matrix_applies_z_first() {
        // XYZ order: v' = Rx * Ry * Rz * v
        let m = rotation_matrix(&[FRAC_PI_2, 0.0, FRAC_PI_2]);
        let v = multiply_matrix_vector(&m, &[1.0, 0.0, 0.0]);
        assert_approx_eq!(v[0], 0.0);
        assert_approx_eq!(v[1], 0.0);
        assert_approx_eq!(v[2], 1.0);
    }

    #[test]
    fn damp_closes_fraction_of_distance() {
        assert_approx_eq!(damp(0.0, 10.0, 0.02), 0.2);
        assert_approx_eq!(damp(10.0, 10.0, 0.02), 10.0);
        assert_approx_eq!(damp(-1.0, 1.0, 0.05), -0.9);
    }

    #[test]
    fn smoothstep_clamps_outside_edges() {
        assert_eq!(smoothstep(100.0, 1000.0, 5.0), 0.0);
        assert_eq!(smoothstep(100.0, 1000.0, 2000.0), 1.0);
        assert_approx_eq!(smoothstep(0.0, 1.0, 0.5), 0.5);
    }

    #[test]
    fn normal_of_counter_clockwise_triangle_faces_viewer() {
        let n = calculate_normal(&[0.0, 0.0, 0.0], &[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]);
        assert_approx_eq!(n[2], 1.0);
    }

    #[test]
    fn normalize_zero_vector_is_unchanged() {
        assert_eq!(normalize(&[0.0, 0.0, 0.0]), [0.0, 0.0, 0.0]);
    }
}
