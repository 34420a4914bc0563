//! Zoom state threaded between the layout and whatever renders it.

use serde::Serialize;

use super::Size;

/// Zoom applied to the canvas when it is drawn into a viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewTransform {
    zoom: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self { zoom: 1.0 }
    }
}

impl ViewTransform {
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Zoom at which the whole canvas fits inside the viewport.
    ///
    /// `None` when either size is degenerate.
    pub fn fit_zoom(canvas: Size, viewport: Size) -> Option<f64> {
        if canvas.width <= 0.0 || canvas.height <= 0.0 || viewport.width <= 0.0 || viewport.height <= 0.0 {
            return None;
        }
        Some((viewport.width / canvas.width).min(viewport.height / canvas.height))
    }

    /// Multiplies the zoom by `step`, never going below fit-to-viewport.
    pub fn zoom_in(self, step: f64, canvas: Size, viewport: Size) -> Self {
        self.rescale(self.zoom * step, canvas, viewport)
    }

    /// Divides the zoom by `step`, never going below fit-to-viewport.
    pub fn zoom_out(self, step: f64, canvas: Size, viewport: Size) -> Self {
        self.rescale(self.zoom / step, canvas, viewport)
    }

    fn rescale(self, zoom: f64, canvas: Size, viewport: Size) -> Self {
        let floor = Self::fit_zoom(canvas, viewport).unwrap_or(f64::MIN_POSITIVE);
        Self {
            zoom: zoom.max(floor),
        }
    }
}
