//! Per-frame update of the floating objects and the camera.

use crate::math::damp;
use crate::scene::{Camera, RenderableObject, CAMERA_BASE_Z};
use crate::state::{AppState, InputState};

/// Rate of the third rotation axis relative to the other two
const TERTIARY_ROTATION_RATIO: f64 = 0.5;
/// Fraction of the distance to the anchor closed per tick
const ANCHOR_DAMPING: f64 = 0.02;
/// Fraction of the distance to the pointer target closed per tick
const CAMERA_DAMPING: f64 = 0.05;
/// Camera offset per unit of normalized pointer position
const POINTER_PARALLAX: f64 = 0.5;
/// Camera depth per pixel of scroll offset
const SCROLL_PARALLAX: f64 = 0.0005;

/// Advances every object and the camera by one frame.
///
/// Contains only arithmetic and cannot fail.
pub fn tick(state: &mut AppState) {
    for object in state.scene.objects.iter_mut() {
        advance_object(object);
    }
    follow_input(&mut state.scene.camera, &state.input);
    state.frame += 1;
}

fn advance_object(object: &mut RenderableObject) {
    let anim = &mut object.animation;
    anim.time += anim.float_speed;

    object.rotation[0] += anim.rotation_speed;
    object.rotation[1] += anim.rotation_speed;
    object.rotation[2] += anim.rotation_speed * TERTIARY_ROTATION_RATIO;

    let base = anim.base_position;
    object.position[1] = base[1] + anim.time.sin() * anim.float_range;
    object.position[0] = damp(object.position[0], base[0], ANCHOR_DAMPING);
    object.position[2] = damp(object.position[2], base[2], ANCHOR_DAMPING);
}

fn follow_input(camera: &mut Camera, input: &InputState) {
    let target_x = input.mouse_x * POINTER_PARALLAX;
    let target_y = input.mouse_y * POINTER_PARALLAX;

    camera.position[0] = damp(camera.position[0], target_x, CAMERA_DAMPING);
    camera.position[1] = damp(camera.position[1], target_y, CAMERA_DAMPING);
    camera.look_at([0.0, 0.0, 0.0]);

    camera.position[2] = camera_depth(input.scroll_y);
}

/// Camera distance for a scroll offset, independent of earlier frames
pub fn camera_depth(scroll_y: f64) -> f64 {
    CAMERA_BASE_Z + scroll_y * SCROLL_PARALLAX
}
