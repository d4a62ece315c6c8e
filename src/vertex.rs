/// Vertex structure with world position, screen position, and normal
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub position: [f64; 3],
    pub screen_position: [f64; 2],
    pub normal: [f64; 3],
    /// Reciprocal of the distance along the camera's viewing direction
    pub inv_depth: f64,
}
