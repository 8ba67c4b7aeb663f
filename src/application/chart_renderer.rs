// Rendering port - draws one chart config onto a canvas
use crate::domain::chart::ChartConfig;
use crate::domain::view_state::Canvas;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("canvas {id} is too small ({width}x{height})")]
    CanvasTooSmall { id: String, width: u32, height: u32 },
    #[error("drawing failed: {0}")]
    Drawing(String),
}

pub trait ChartRenderer: Send + Sync {
    /// Returns the rendered chart as an SVG document.
    fn render(&self, canvas: &Canvas, config: &ChartConfig) -> Result<String, RenderError>;
}
