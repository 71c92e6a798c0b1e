//! Figure rendering
//!
//! Structure:
//! - `figure.rs`: fixed panel layouts per variant (`FigureSpec`)
//! - `scale.rs`: axis ranges, margins and equal-aspect fitting
//! - `renderer.rs`: plotters drawing, PNG encoding and atomic file write

pub mod figure;
pub mod renderer;
pub mod scale;

pub use figure::{FigureSpec, PanelSpec};
pub use renderer::{FigureRenderer, RenderedFigure};
