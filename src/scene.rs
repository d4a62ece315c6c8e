use crate::geometry::{Mesh, Shape};
use crate::graphics::Color;
use log::debug;
use rand::Rng;
use std::f64::consts::PI;

pub const BACKGROUND: Color = Color::from_hex(0x0f0c29);

/// Number of decorative objects, fixed for the whole session
pub const OBJECT_COUNT: usize = 4;

const BASE_POSITIONS: [[f64; 3]; OBJECT_COUNT] = [
    [-3.0, 2.0, 0.0],
    [2.0, -1.5, -1.0],
    [0.0, 0.0, -3.0],
    [3.0, 1.5, -2.0],
];

const SHAPES: [Shape; 4] = [
    Shape::Box,
    Shape::Icosahedron,
    Shape::Octahedron,
    Shape::Tetrahedron,
];

/// Distance from the origin of a freshly built camera
pub const CAMERA_BASE_Z: f64 = 5.0;

/// Phong surface description
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub color: Color,
    pub emissive: Color,
    pub emissive_intensity: f64,
    pub specular: Color,
    pub shininess: f64,
}

impl Material {
    fn glowing(hex: u32, emissive_intensity: f64) -> Self {
        Material {
            color: Color::from_hex(hex),
            emissive: Color::from_hex(hex),
            emissive_intensity,
            specular: Color::from_hex(0x111111),
            shininess: 100.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Light {
    Ambient {
        color: Color,
        intensity: f64,
    },
    /// Shines from `position` toward the origin
    Directional {
        color: Color,
        intensity: f64,
        position: [f64; 3],
    },
    /// Falls off linearly to zero at `range`
    Point {
        color: Color,
        intensity: f64,
        position: [f64; 3],
        range: f64,
    },
}

/// Linear fog blended in between `near` and `far` view depth
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fog {
    pub color: Color,
    pub near: f64,
    pub far: f64,
}

/// Per-object animation parameters and counters
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationState {
    /// Attractor for the object's position, never changed after setup
    pub base_position: [f64; 3],
    pub rotation_speed: f64,
    pub float_speed: f64,
    pub float_range: f64,
    /// Phase accumulator driving the vertical float
    pub time: f64,
}

impl AnimationState {
    /// Draws speeds and the initial phase from `rng`
    pub fn random<R: Rng + ?Sized>(base_position: [f64; 3], rng: &mut R) -> Self {
        AnimationState {
            base_position,
            rotation_speed: rng.gen::<f64>() * 0.005 + 0.002,
            float_speed: rng.gen::<f64>() * 0.002 + 0.0005,
            float_range: rng.gen::<f64>() * 0.5 + 0.3,
            time: rng.gen::<f64>() * PI * 2.0,
        }
    }
}

pub struct RenderableObject {
    /// Index into [`Scene::meshes`]
    pub mesh: usize,
    /// Index into [`Scene::materials`]
    pub material: usize,
    pub position: [f64; 3],
    /// Euler angles in radians, XYZ order
    pub rotation: [f64; 3],
    pub animation: AnimationState,
}

/// Perspective camera
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: [f64; 3],
    pub target: [f64; 3],
    pub up: [f64; 3],
    /// Vertical field of view in degrees
    pub fov: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl Camera {
    pub fn new(aspect: f64) -> Self {
        Camera {
            position: [0.0, 0.0, CAMERA_BASE_Z],
            target: [0.0, 0.0, 0.0],
            up: [0.0, 1.0, 0.0],
            fov: 75.0,
            aspect,
            near: 0.1,
            far: 1000.0,
        }
    }

    pub fn look_at(&mut self, target: [f64; 3]) {
        self.target = target;
    }
}

pub struct Scene {
    pub objects: Vec<RenderableObject>,
    pub meshes: Vec<Mesh>,
    pub materials: Vec<Material>,
    pub lights: Vec<Light>,
    pub camera: Camera,
    pub background: Color,
    pub fog: Fog,
}

impl Scene {
    /// Builds the four floating shapes, their materials and the lights.
    ///
    /// All randomness is drawn from `rng` so a seeded generator reproduces the
    /// same speeds and phases. The camera starts square; the host sets the
    /// aspect once it knows the output size.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let materials = vec![
            Material::glowing(0x6c5ce7, 0.2),
            Material::glowing(0x7d6ff9, 0.2),
            Material::glowing(0x302b63, 0.15),
        ];
        let meshes: Vec<Mesh> = SHAPES.iter().map(|shape| shape.mesh()).collect();

        let objects = BASE_POSITIONS
            .iter()
            .enumerate()
            .map(|(index, &base)| {
                let animation = AnimationState::random(base, &mut *rng);
                debug!("Object {index}: {:?} {animation:?}", SHAPES[index % SHAPES.len()]);
                RenderableObject {
                    mesh: index % meshes.len(),
                    material: index % materials.len(),
                    position: base,
                    rotation: [0.0; 3],
                    animation,
                }
            })
            .collect();

        Scene {
            objects,
            meshes,
            materials,
            lights: default_lights(),
            camera: Camera::new(1.0),
            background: BACKGROUND,
            fog: Fog {
                color: BACKGROUND,
                near: 100.0,
                far: 1000.0,
            },
        }
    }
}

fn default_lights() -> Vec<Light> {
    vec![
        Light::Ambient {
            color: Color::from_hex(0xffffff),
            intensity: 0.5,
        },
        Light::Directional {
            color: Color::from_hex(0x6c5ce7),
            intensity: 0.8,
            position: [10.0, 10.0, 10.0],
        },
        Light::Point {
            color: Color::from_hex(0x7d6ff9),
            intensity: 0.6,
            position: [-5.0, 5.0, 5.0],
            range: 100.0,
        },
        Light::Point {
            color: Color::from_hex(0x302b63),
            intensity: 0.4,
            position: [5.0, -5.0, 5.0],
            range: 100.0,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn scene_has_four_objects_at_their_anchors() {
        let mut rng = StdRng::seed_from_u64(7);
        let scene = Scene::new(&mut rng);
        assert_eq!(scene.objects.len(), OBJECT_COUNT);
        for (object, base) in scene.objects.iter().zip(BASE_POSITIONS.iter()) {
            assert_eq!(object.position, *base);
            assert_eq!(object.animation.base_position, *base);
            assert_eq!(object.rotation, [0.0; 3]);
        }
    }

    #[test]
    fn objects_cycle_through_shapes_and_materials() {
        let mut rng = StdRng::seed_from_u64(7);
        let scene = Scene::new(&mut rng);
        let meshes: Vec<usize> = scene.objects.iter().map(|o| o.mesh).collect();
        let materials: Vec<usize> = scene.objects.iter().map(|o| o.material).collect();
        assert_eq!(meshes, vec![0, 1, 2, 3]);
        assert_eq!(materials, vec![0, 1, 2, 0]);
        assert_eq!(scene.meshes[1].triangles.len(), 500);
    }

    #[test]
    fn random_speeds_stay_in_their_ranges() {
        let mut rng = StdRng::seed_from_u64(0xD18BEC491D021ED4);
        for _ in 0..1000 {
            let a = AnimationState::random([0.0; 3], &mut rng);
            assert!((0.002..0.007).contains(&a.rotation_speed));
            assert!((0.0005..0.0025).contains(&a.float_speed));
            assert!((0.3..0.8).contains(&a.float_range));
            assert!((0.0..2.0 * PI).contains(&a.time));
        }
    }

    #[test]
    fn same_seed_builds_same_scene() {
        let a = Scene::new(&mut StdRng::seed_from_u64(42));
        let b = Scene::new(&mut StdRng::seed_from_u64(42));
        for (x, y) in a.objects.iter().zip(b.objects.iter()) {
            assert_eq!(x.animation, y.animation);
        }
    }

    #[test]
    fn camera_starts_on_the_z_axis() {
        let camera = Camera::new(2.0);
        assert_eq!(camera.position, [0.0, 0.0, 5.0]);
        assert_eq!(camera.target, [0.0, 0.0, 0.0]);
        assert_eq!(camera.aspect, 2.0);
    }

    #[test]
    fn new_scene_camera_is_square_until_the_host_sizes_it() {
        let scene = Scene::new(&mut StdRng::seed_from_u64(1));
        assert_eq!(scene.camera, Camera::new(1.0));
    }
}
