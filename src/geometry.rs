use crate::math::{calculate_normal, dot, lerp, normalize, scale};

/// A single triangle in object space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub positions: [[f64; 3]; 3],
    pub normals: [[f64; 3]; 3],
}

/// Triangle soup for one shape, centered on the object origin
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

/// The decorative shapes placed in the scene
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Box,
    Icosahedron,
    Octahedron,
    Tetrahedron,
}

impl Shape {
    /// Builds the mesh with the dimensions used by the background scene
    pub fn mesh(self) -> Mesh {
        match self {
            Shape::Box => cube(1.0),
            Shape::Icosahedron => icosahedron(0.7, 4),
            Shape::Octahedron => octahedron(0.8, 0),
            Shape::Tetrahedron => tetrahedron(1.0, 0),
        }
    }
}

/// Axis-aligned cube with the given edge length and flat faces
pub fn cube(size: f64) -> Mesh {
    let h = size / 2.0;
    let vertices = [
        [-h, -h, -h], // 0
        [h, -h, -h],  // 1
        [h, h, -h],   // 2
        [-h, h, -h],  // 3
        [-h, -h, h],  // 4
        [h, -h, h],   // 5
        [h, h, h],    // 6
        [-h, h, h],   // 7
    ];

    // Each face is defined by 4 vertex indices
    let faces = [
        (0, 1, 2, 3),
        (5, 4, 7, 6),
        (4, 0, 3, 7),
        (1, 5, 6, 2),
        (4, 5, 1, 0),
        (3, 2, 6, 7),
    ];

    let mut triangles = Vec::with_capacity(faces.len() * 2);
    for &(a, b, c, d) in faces.iter() {
        triangles.push(flat_triangle(vertices[a], vertices[b], vertices[c]));
        triangles.push(flat_triangle(vertices[a], vertices[c], vertices[d]));
    }
    Mesh { triangles }
}

pub fn tetrahedron(radius: f64, detail: usize) -> Mesh {
    let vertices = [
        [1.0, 1.0, 1.0],
        [-1.0, -1.0, 1.0],
        [-1.0, 1.0, -1.0],
        [1.0, -1.0, -1.0],
    ];
    let indices = [2, 1, 0, 0, 3, 2, 1, 3, 0, 2, 3, 1];
    polyhedron(&vertices, &indices, radius, detail)
}

pub fn octahedron(radius: f64, detail: usize) -> Mesh {
    let vertices = [
        [1.0, 0.0, 0.0],
        [-1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
    ];
    let indices = [
        0, 2, 4, 0, 4, 3, 0, 3, 5, 0, 5, 2, 1, 2, 5, 1, 5, 3, 1, 3, 4, 1, 4, 2,
    ];
    polyhedron(&vertices, &indices, radius, detail)
}

pub fn icosahedron(radius: f64, detail: usize) -> Mesh {
    let t = (1.0 + 5.0_f64.sqrt()) / 2.0;
    let vertices = [
        [-1.0, t, 0.0],
        [1.0, t, 0.0],
        [-1.0, -t, 0.0],
        [1.0, -t, 0.0],
        [0.0, -1.0, t],
        [0.0, 1.0, t],
        [0.0, -1.0, -t],
        [0.0, 1.0, -t],
        [t, 0.0, -1.0],
        [t, 0.0, 1.0],
        [-t, 0.0, -1.0],
        [-t, 0.0, 1.0],
    ];
    let indices = [
        0, 11, 5, 0, 5, 1, 0, 1, 7, 0, 7, 10, 0, 10, 11, 1, 5, 9, 5, 11, 4, 11, 10, 2, 10, 7, 6,
        7, 1, 8, 3, 9, 4, 3, 4, 2, 3, 2, 6, 3, 6, 8, 3, 8, 9, 4, 9, 5, 2, 4, 11, 6, 2, 10, 8, 6,
        7, 9, 8, 1,
    ];
    polyhedron(&vertices, &indices, radius, detail)
}

/// Subdivides every face of a convex polyhedron and pushes the resulting
/// vertices onto the sphere of the given radius.
///
/// Each face is split into `(detail + 1)^2` triangles. Without subdivision the
/// faces keep flat normals; subdivided shapes are shaded as spheres.
fn polyhedron(vertices: &[[f64; 3]], indices: &[usize], radius: f64, detail: usize) -> Mesh {
    let mut triangles = Vec::with_capacity(indices.len() / 3 * (detail + 1) * (detail + 1));

    for face in indices.chunks_exact(3) {
        for [a, b, c] in subdivide_face(vertices[face[0]], vertices[face[1]], vertices[face[2]], detail)
        {
            let a = scale(&normalize(&a), radius);
            let b = scale(&normalize(&b), radius);
            let c = scale(&normalize(&c), radius);
            if detail == 0 {
                triangles.push(flat_triangle(a, b, c));
            } else {
                triangles.push(Triangle {
                    positions: [a, b, c],
                    normals: [normalize(&a), normalize(&b), normalize(&c)],
                });
            }
        }
    }
    Mesh { triangles }
}

/// Splits triangle `abc` into a grid of `(detail + 1)^2` smaller triangles
fn subdivide_face(a: [f64; 3], b: [f64; 3], c: [f64; 3], detail: usize) -> Vec<[[f64; 3]; 3]> {
    let cols = detail + 1;
    let mut grid: Vec<Vec<[f64; 3]>> = Vec::with_capacity(cols + 1);

    for i in 0..=cols {
        let aj = lerp(&a, &c, i as f64 / cols as f64);
        let bj = lerp(&b, &c, i as f64 / cols as f64);
        let rows = cols - i;
        let row = (0..=rows)
            .map(|j| {
                if j == 0 && i == cols {
                    aj
                } else {
                    lerp(&aj, &bj, j as f64 / rows as f64)
                }
            })
            .collect();
        grid.push(row);
    }

    let mut faces = Vec::with_capacity(cols * cols);
    for i in 0..cols {
        for j in 0..2 * (cols - i) - 1 {
            let k = j / 2;
            if j % 2 == 0 {
                faces.push([grid[i][k + 1], grid[i + 1][k], grid[i][k]]);
            } else {
                faces.push([grid[i][k + 1], grid[i + 1][k + 1], grid[i + 1][k]]);
            }
        }
    }
    faces
}

/// Triangle with a single face normal pointing away from the object origin
fn flat_triangle(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> Triangle {
    let mut normal = calculate_normal(&a, &b, &c);
    let centroid = scale(&[a[0] + b[0] + c[0], a[1] + b[1] + c[1], a[2] + b[2] + c[2]], 1.0 / 3.0);
    if dot(&normal, &centroid) < 0.0 {
        normal = scale(&normal, -1.0);
    }
    Triangle {
        positions: [a, b, c],
        normals: [normal; 3],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::length;
    use assert_approx_eq::assert_approx_eq;

    fn assert_outward(mesh: &Mesh) {
        for triangle in &mesh.triangles {
            for (position, normal) in triangle.positions.iter().zip(triangle.normals.iter()) {
                assert_approx_eq!(length(normal), 1.0);
                assert!(dot(position, normal) > 0.0);
            }
        }
    }

    #[test]
    fn cube_has_twelve_triangles_on_its_half_extent() {
        let mesh = Shape::Box.mesh();
        assert_eq!(mesh.triangles.len(), 12);
        for triangle in &mesh.triangles {
            for position in &triangle.positions {
                for coord in position {
                    assert_approx_eq!(coord.abs(), 0.5);
                }
            }
        }
        assert_outward(&mesh);
    }

    #[test]
    fn tetrahedron_is_flat_with_four_faces() {
        let mesh = Shape::Tetrahedron.mesh();
        assert_eq!(mesh.triangles.len(), 4);
        for triangle in &mesh.triangles {
            assert_eq!(triangle.normals[0], triangle.normals[1]);
            assert_eq!(triangle.normals[1], triangle.normals[2]);
            for position in &triangle.positions {
                assert_approx_eq!(length(position), 1.0);
            }
        }
        assert_outward(&mesh);
    }

    #[test]
    fn octahedron_has_eight_faces_on_its_radius() {
        let mesh = Shape::Octahedron.mesh();
        assert_eq!(mesh.triangles.len(), 8);
        for triangle in &mesh.triangles {
            for position in &triangle.positions {
                assert_approx_eq!(length(position), 0.8);
            }
        }
        assert_outward(&mesh);
    }

    #[test]
    fn subdivided_icosahedron_is_smooth_sphere() {
        let mesh = Shape::Icosahedron.mesh();
        assert_eq!(mesh.triangles.len(), 20 * 25);
        for triangle in &mesh.triangles {
            for (position, normal) in triangle.positions.iter().zip(triangle.normals.iter()) {
                assert_approx_eq!(length(position), 0.7);
                let expected = normalize(position);
                assert_approx_eq!(normal[0], expected[0]);
                assert_approx_eq!(normal[1], expected[1]);
                assert_approx_eq!(normal[2], expected[2]);
            }
        }
    }

    #[test]
    fn subdivide_face_without_detail_keeps_the_face() {
        let faces = subdivide_face([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0], 0);
        assert_eq!(faces.len(), 1);
        assert_eq!(faces[0], [[0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]]);
    }
}
