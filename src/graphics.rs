use crate::math::{add, dot, edge_function, length, normalize, scale, smoothstep, sub};
use crate::scene::{Fog, Light, Material};
use crate::vertex::Vertex;

/// 24-bit color
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn from_hex(hex: u32) -> Self {
        Color {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }

    /// Channels scaled to [0, 1]
    pub fn to_unit(self) -> [f64; 3] {
        [
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
        ]
    }

    /// Inverse of [`Color::to_unit`], saturating out-of-range channels
    pub fn from_unit(rgb: [f64; 3]) -> Self {
        let channel = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Color {
            r: channel(rgb[0]),
            g: channel(rgb[1]),
            b: channel(rgb[2]),
        }
    }
}

/// Pixel buffer with a depth buffer holding reciprocal view depths
pub struct Framebuffer {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
    z_buffer: Vec<f64>,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize, background: Color) -> Self {
        Framebuffer {
            width,
            height,
            pixels: vec![background; width * height],
            z_buffer: vec![0.0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Changes the output dimensions, discarding the previous contents
    pub fn resize(&mut self, width: usize, height: usize, background: Color) {
        *self = Framebuffer::new(width, height, background);
    }

    /// Fills every pixel with the background and resets depth
    pub fn clear(&mut self, background: Color) {
        self.pixels.fill(background);
        self.z_buffer.fill(0.0);
    }

    pub fn pixel(&self, x: usize, y: usize) -> Color {
        self.pixels[y * self.width + x]
    }

    /// Depth-buffer value at a pixel, 0 where nothing was drawn
    pub fn depth(&self, x: usize, y: usize) -> f64 {
        self.z_buffer[y * self.width + x]
    }
}

/// Draws a depth-tested triangle, shading every covered pixel.
///
/// `shade` receives the interpolated world position, normal and view depth.
/// Both windings are accepted; hidden faces are resolved by the depth test.
pub fn draw_triangle<F>(v0: &Vertex, v1: &Vertex, v2: &Vertex, framebuffer: &mut Framebuffer, shade: F)
where
    F: Fn(&[f64; 3], &[f64; 3], f64) -> Color,
{
    let width = framebuffer.width;
    let height = framebuffer.height;
    if width == 0 || height == 0 {
        return;
    }

    // Compute bounding box of the triangle
    let min_x = v0.screen_position[0]
        .min(v1.screen_position[0])
        .min(v2.screen_position[0])
        .floor()
        .max(0.0);
    let max_x = v0.screen_position[0]
        .max(v1.screen_position[0])
        .max(v2.screen_position[0])
        .ceil()
        .min(width as f64 - 1.0);
    let min_y = v0.screen_position[1]
        .min(v1.screen_position[1])
        .min(v2.screen_position[1])
        .floor()
        .max(0.0);
    let max_y = v0.screen_position[1]
        .max(v1.screen_position[1])
        .max(v2.screen_position[1])
        .ceil()
        .min(height as f64 - 1.0);
    if min_x > max_x || min_y > max_y {
        return;
    }

    let area = edge_function(&v0.screen_position, &v1.screen_position, &v2.screen_position);
    if area == 0.0 {
        return;
    }

    for y in min_y as usize..=max_y as usize {
        for x in min_x as usize..=max_x as usize {
            let p = [x as f64 + 0.5, y as f64 + 0.5];

            // Normalized barycentric coordinates, positive inside for either winding
            let w0 = edge_function(&v1.screen_position, &v2.screen_position, &p) / area;
            let w1 = edge_function(&v2.screen_position, &v0.screen_position, &p) / area;
            let w2 = edge_function(&v0.screen_position, &v1.screen_position, &p) / area;
            if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                continue;
            }

            let inv_depth = v0.inv_depth * w0 + v1.inv_depth * w1 + v2.inv_depth * w2;
            let offset = y * width + x;
            if inv_depth <= framebuffer.z_buffer[offset] {
                continue;
            }
            framebuffer.z_buffer[offset] = inv_depth;

            // Attributes are linear in world space, not on screen
            let p0 = w0 * v0.inv_depth / inv_depth;
            let p1 = w1 * v1.inv_depth / inv_depth;
            let p2 = w2 * v2.inv_depth / inv_depth;
            let position = add(
                &add(&scale(&v0.position, p0), &scale(&v1.position, p1)),
                &scale(&v2.position, p2),
            );
            let normal = normalize(&add(
                &add(&scale(&v0.normal, p0), &scale(&v1.normal, p1)),
                &scale(&v2.normal, p2),
            ));

            framebuffer.pixels[offset] = shade(&position, &normal, 1.0 / inv_depth);
        }
    }
}

/// Blinn-Phong shading of a surface point, followed by linear fog.
///
/// `sunlight` scales the directional lights: 1 when the point sees them, 0
/// when another surface casts a shadow on it.
#[allow(clippy::too_many_arguments)]
pub fn shade(
    position: &[f64; 3],
    normal: &[f64; 3],
    depth: f64,
    sunlight: f64,
    eye: &[f64; 3],
    material: &Material,
    lights: &[Light],
    fog: &Fog,
) -> Color {
    let albedo = material.color.to_unit();
    let specular = material.specular.to_unit();
    let view_dir = normalize(&sub(eye, position));

    let mut rgb = scale(&material.emissive.to_unit(), material.emissive_intensity);

    for light in lights {
        let (light_dir, strength) = match *light {
            Light::Ambient { color, intensity } => {
                let lc = color.to_unit();
                rgb = add(&rgb, &scale(&mul(&lc, &albedo), intensity));
                continue;
            }
            Light::Directional {
                color,
                intensity,
                position: light_pos,
            } => (
                normalize(&light_pos),
                scale(&color.to_unit(), intensity * sunlight),
            ),
            Light::Point {
                color,
                intensity,
                position: light_pos,
                range,
            } => {
                let to_light = sub(&light_pos, position);
                let distance = length(&to_light);
                let attenuation = (1.0 - distance / range).max(0.0);
                (
                    normalize(&to_light),
                    scale(&color.to_unit(), intensity * attenuation),
                )
            }
        };

        let diffuse = dot(normal, &light_dir).max(0.0);
        let half_dir = normalize(&add(&light_dir, &view_dir));
        let highlight = dot(normal, &half_dir).max(0.0).powf(material.shininess);

        rgb = add(&rgb, &scale(&mul(&strength, &albedo), diffuse));
        rgb = add(&rgb, &scale(&mul(&strength, &specular), highlight));
    }

    let fog_factor = smoothstep(fog.near, fog.far, depth);
    let fog_color = fog.color.to_unit();
    let rgb = [
        rgb[0].min(1.0) + (fog_color[0] - rgb[0].min(1.0)) * fog_factor,
        rgb[1].min(1.0) + (fog_color[1] - rgb[1].min(1.0)) * fog_factor,
        rgb[2].min(1.0) + (fog_color[2] - rgb[2].min(1.0)) * fog_factor,
    ];
    Color::from_unit(rgb)
}

/// Component-wise product
fn mul(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [a[0] * b[0], a[1] * b[1], a[2] * b[2]]
}
