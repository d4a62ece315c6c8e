use crate::graphics::{draw_triangle, shade, Framebuffer};
use crate::math::{
    add, cross, dot, multiply_matrix_vector, normalize, rotation_matrix, scale, sub,
};
use crate::scene::{Camera, Light, Scene, BACKGROUND};
use crate::vertex::Vertex;

/// Texels along each side of the shadow map
const SHADOW_MAP_SIZE: usize = 256;
/// Half-width of the square the light's orthographic view covers
const SHADOW_EXTENT: f64 = 5.0;
const SHADOW_NEAR: f64 = 0.5;
const SHADOW_FAR: f64 = 50.0;
/// Depth slack before a surface counts as occluded
const SHADOW_BIAS: f64 = 0.1;
/// Distance a lookup is lifted off the surface along its normal
const NORMAL_OFFSET: f64 = 0.05;

/// Perspective projection for one camera pose and output size
pub struct Projection {
    eye: [f64; 3],
    right: [f64; 3],
    up: [f64; 3],
    forward: [f64; 3],
    tan_half_fov: f64,
    aspect: f64,
    near: f64,
    far: f64,
    width: f64,
    height: f64,
}

impl Projection {
    pub fn new(camera: &Camera, width: usize, height: usize) -> Self {
        let forward = normalize(&sub(&camera.target, &camera.position));
        let right = normalize(&cross(&forward, &camera.up));
        let up = cross(&right, &forward);
        Projection {
            eye: camera.position,
            right,
            up,
            forward,
            tan_half_fov: (camera.fov.to_radians() / 2.0).tan(),
            aspect: camera.aspect,
            near: camera.near,
            far: camera.far,
            width: width as f64,
            height: height as f64,
        }
    }

    /// Maps a world-space point to the screen, or `None` when it falls
    /// outside the near/far range.
    pub fn project(&self, position: [f64; 3], normal: [f64; 3]) -> Option<Vertex> {
        let relative = sub(&position, &self.eye);
        let depth = dot(&relative, &self.forward);
        if depth < self.near || depth > self.far {
            return None;
        }
        let ndc_x = dot(&relative, &self.right) / (depth * self.tan_half_fov * self.aspect);
        let ndc_y = dot(&relative, &self.up) / (depth * self.tan_half_fov);
        Some(Vertex {
            position,
            screen_position: [
                (ndc_x + 1.0) / 2.0 * self.width,
                (1.0 - ndc_y) / 2.0 * self.height,
            ],
            normal,
            inv_depth: 1.0 / depth,
        })
    }
}

/// Depth of the scene as seen from a directional light.
///
/// The light looks from its position toward the origin through an
/// orthographic box. Each texel keeps the closeness of the first surface
/// hit, `SHADOW_FAR - depth`, so the rasterizer's nearest-wins test applies
/// unchanged.
pub struct ShadowMap {
    origin: [f64; 3],
    right: [f64; 3],
    up: [f64; 3],
    forward: [f64; 3],
    depth: Framebuffer,
}

impl ShadowMap {
    /// Renders every object of `scene` into a map for a light at `light_position`
    pub fn cast(scene: &Scene, light_position: [f64; 3]) -> Self {
        let forward = normalize(&scale(&light_position, -1.0));
        let reference = if forward[1].abs() > 0.99 {
            [0.0, 0.0, 1.0]
        } else {
            [0.0, 1.0, 0.0]
        };
        let right = normalize(&cross(&forward, &reference));
        let up = cross(&right, &forward);
        let mut map = ShadowMap {
            origin: light_position,
            right,
            up,
            forward,
            depth: Framebuffer::new(SHADOW_MAP_SIZE, SHADOW_MAP_SIZE, BACKGROUND),
        };

        for_each_triangle(scene, |_, positions, normals| {
            let vertices = [0, 1, 2].map(|i| map.project(positions[i], normals[i]));
            if let [Some(v0), Some(v1), Some(v2)] = vertices {
                draw_triangle(&v0, &v1, &v2, &mut map.depth, |_, _, _| BACKGROUND);
            }
        });
        map
    }

    fn project(&self, position: [f64; 3], normal: [f64; 3]) -> Option<Vertex> {
        let relative = sub(&position, &self.origin);
        let depth = dot(&relative, &self.forward);
        if depth < SHADOW_NEAR || depth > SHADOW_FAR {
            return None;
        }
        let x = dot(&relative, &self.right) / SHADOW_EXTENT;
        let y = dot(&relative, &self.up) / SHADOW_EXTENT;
        let size = SHADOW_MAP_SIZE as f64;
        Some(Vertex {
            position,
            screen_position: [(x + 1.0) / 2.0 * size, (1.0 - y) / 2.0 * size],
            normal,
            inv_depth: SHADOW_FAR - depth,
        })
    }

    /// 1 when the light reaches the surface point, 0 when something nearer
    /// to the light covers it. Points outside the map are lit.
    pub fn sunlight(&self, position: &[f64; 3], normal: &[f64; 3]) -> f64 {
        let lifted = add(position, &scale(normal, NORMAL_OFFSET));
        let Some(texel) = self.project(lifted, *normal) else {
            return 1.0;
        };
        let [x, y] = texel.screen_position.map(f64::floor);
        let size = SHADOW_MAP_SIZE as f64;
        if x < 0.0 || y < 0.0 || x >= size || y >= size {
            return 1.0;
        }
        let nearest = self.depth.depth(x as usize, y as usize);
        if texel.inv_depth + SHADOW_BIAS >= nearest {
            1.0
        } else {
            0.0
        }
    }
}

/// Calls `f` with every triangle of the scene in world space
fn for_each_triangle<F>(scene: &Scene, mut f: F)
where
    F: FnMut(usize, [[f64; 3]; 3], [[f64; 3]; 3]),
{
    for (index, object) in scene.objects.iter().enumerate() {
        let rotation = rotation_matrix(&object.rotation);
        for triangle in &scene.meshes[object.mesh].triangles {
            let positions = triangle
                .positions
                .map(|local| add(&object.position, &multiply_matrix_vector(&rotation, &local)));
            let normals = triangle
                .normals
                .map(|normal| multiply_matrix_vector(&rotation, &normal));
            f(index, positions, normals);
        }
    }
}

/// Rasterizes the whole scene into `framebuffer`.
///
/// The first directional light casts shadows; point lights do not.
pub fn render(scene: &Scene, framebuffer: &mut Framebuffer) {
    framebuffer.clear(scene.background);
    let projection = Projection::new(&scene.camera, framebuffer.width(), framebuffer.height());
    let eye = scene.camera.position;
    let shadows = scene.lights.iter().find_map(|light| match *light {
        Light::Directional { position, .. } => Some(ShadowMap::cast(scene, position)),
        _ => None,
    });

    for_each_triangle(scene, |index, positions, normals| {
        let material = &scene.materials[scene.objects[index].material];
        let vertices = [0, 1, 2].map(|i| projection.project(positions[i], normals[i]));

        // Triangles crossing the near or far plane are dropped whole
        if let [Some(v0), Some(v1), Some(v2)] = vertices {
            draw_triangle(&v0, &v1, &v2, framebuffer, |position, normal, depth| {
                let sunlight = shadows
                    .as_ref()
                    .map_or(1.0, |map| map.sunlight(position, normal));
                shade(
                    position,
                    normal,
                    depth,
                    sunlight,
                    &eye,
                    material,
                    &scene.lights,
                    &scene.fog,
                )
            });
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::cube;
    use assert_approx_eq::assert_approx_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn origin_projects_to_screen_center() {
        let camera = Camera::new(2.0);
        let projection = Projection::new(&camera, 200, 100);
        let v = projection.project([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]).unwrap();
        assert_approx_eq!(v.screen_position[0], 100.0);
        assert_approx_eq!(v.screen_position[1], 50.0);
        assert_approx_eq!(v.inv_depth, 0.2);
    }

    #[test]
    fn up_and_right_map_to_screen_axes() {
        let camera = Camera::new(1.0);
        let projection = Projection::new(&camera, 100, 100);
        let v = projection.project([1.0, 1.0, 0.0], [0.0, 0.0, 1.0]).unwrap();
        assert!(v.screen_position[0] > 50.0);
        assert!(v.screen_position[1] < 50.0);
    }

    #[test]
    fn points_behind_the_camera_are_rejected() {
        let camera = Camera::new(1.0);
        let projection = Projection::new(&camera, 100, 100);
        assert!(projection.project([0.0, 0.0, 6.0], [0.0, 0.0, 1.0]).is_none());
        assert!(projection.project([0.0, 0.0, -2000.0], [0.0, 0.0, 1.0]).is_none());
    }

    #[test]
    fn scene_draws_shapes_over_background() {
        let scene = Scene::new(&mut StdRng::seed_from_u64(11));
        let mut framebuffer = Framebuffer::new(64, 64, BACKGROUND);
        render(&scene, &mut framebuffer);

        // The octahedron sits on the view axis, the corners stay empty
        assert_ne!(framebuffer.pixel(32, 32), BACKGROUND);
        assert_eq!(framebuffer.pixel(0, 63), BACKGROUND);
        assert_eq!(framebuffer.pixel(63, 0), BACKGROUND);
    }

    #[test]
    fn empty_framebuffer_is_left_alone() {
        let scene = Scene::new(&mut StdRng::seed_from_u64(12));
        let mut framebuffer = Framebuffer::new(0, 0, BACKGROUND);
        render(&scene, &mut framebuffer);
        assert_eq!(framebuffer.width(), 0);
    }

    /// A scene holding only a 2-unit box centred at `caster` between the
    /// light at (10, 10, 10) and the origin, plus the octahedron at the origin
    fn shadow_scene(caster: [f64; 3]) -> Scene {
        let mut scene = Scene::new(&mut StdRng::seed_from_u64(13));
        scene.meshes.push(cube(2.0));
        let big_box = scene.meshes.len() - 1;

        scene.objects.retain(|object| object.mesh == 0 || object.mesh == 2);
        for object in &mut scene.objects {
            if object.mesh == 0 {
                object.mesh = big_box;
                object.position = caster;
            } else {
                object.position = [0.0, 0.0, 0.0];
            }
        }
        scene
    }

    #[test]
    fn box_between_light_and_origin_casts_a_shadow() {
        let map = ShadowMap::cast(&shadow_scene([1.5, 1.5, 1.5]), [10.0, 10.0, 10.0]);

        // Behind the box as seen from the light
        assert_eq!(map.sunlight(&[0.0, 0.0, 0.0], &[0.0, 0.0, 1.0]), 0.0);
        // Off to the side
        assert_eq!(map.sunlight(&[-2.0, 2.0, 0.0], &[0.0, 1.0, 0.0]), 1.0);
        // The box's own lit top face
        assert_eq!(map.sunlight(&[1.5, 2.5, 1.5], &[0.0, 1.0, 0.0]), 1.0);
    }

    #[test]
    fn points_outside_the_light_view_are_lit() {
        let map = ShadowMap::cast(&shadow_scene([1.5, 1.5, 1.5]), [10.0, 10.0, 10.0]);
        assert_eq!(map.sunlight(&[0.0, 30.0, 0.0], &[0.0, 1.0, 0.0]), 1.0);
        assert_eq!(map.sunlight(&[-40.0, -40.0, -40.0], &[0.0, 1.0, 0.0]), 1.0);
    }

    #[test]
    fn one_object_darkens_another() {
        // Window around the octahedron that the box itself never covers
        let brightness = |scene: &Scene| {
            let mut framebuffer = Framebuffer::new(64, 64, BACKGROUND);
            render(scene, &mut framebuffer);
            let mut total = 0u32;
            for y in 28..40 {
                for x in 24..36 {
                    let c = framebuffer.pixel(x, y);
                    total += c.r as u32 + c.g as u32 + c.b as u32;
                }
            }
            total
        };

        let shadowed = brightness(&shadow_scene([1.5, 1.5, 1.5]));
        let lit = brightness(&shadow_scene([40.0, 0.0, 0.0]));
        assert!(shadowed < lit, "{shadowed} >= {lit}");
    }
}
