use thiserror::Error;

/// Reasons the rendering context could not be brought up.
///
/// All variants are handled the same way: the fallback message is shown once
/// and the animation never starts.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("3D rendering is unavailable: {0}")]
    Unsupported(&'static str),
    #[error("terminal setup failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("terminal reports an empty viewport ({cols}x{rows})")]
    EmptyViewport { cols: u16, rows: u16 },
}
