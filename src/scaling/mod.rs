//! Viewport-relative sizing for the dashboard surfaces.
//!
//! Sizes are designed against a 375x812 phone and stretched to the current
//! viewport. All functions are pure; [`ScaleTracker`] only remembers the
//! last viewport it saw.

/// Reference design width in logical pixels.
pub const BASE_WIDTH: f64 = 375.0;
/// Reference design height in logical pixels.
pub const BASE_HEIGHT: f64 = 812.0;
/// Widths at or above this are tablets.
pub const TABLET_MIN_WIDTH: f64 = 600.0;
/// Widths strictly below this are small phones.
pub const SMALL_PHONE_MAX_WIDTH: f64 = 380.0;
pub const DEFAULT_MODERATE_FACTOR: f64 = 0.5;

/// The surface being laid out. The target platform enters only through
/// `pixel_ratio`, which is what [`ScaleFactors::font_scale`] snaps to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    /// Device pixels per logical pixel.
    pub pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    pub fn reference() -> Self {
        Self::new(BASE_WIDTH, BASE_HEIGHT, 1.0)
    }
}

/// Scale factors for one viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactors {
    width_ratio: f64,
    height_ratio: f64,
    pixel_ratio: f64,
    pub is_tablet: bool,
    pub is_small_phone: bool,
}

impl ScaleFactors {
    pub fn for_viewport(viewport: Viewport) -> Self {
        let pixel_ratio = if viewport.pixel_ratio > 0.0 {
            viewport.pixel_ratio
        } else {
            1.0
        };
        Self {
            width_ratio: viewport.width / BASE_WIDTH,
            height_ratio: viewport.height / BASE_HEIGHT,
            pixel_ratio,
            is_tablet: viewport.width >= TABLET_MIN_WIDTH,
            is_small_phone: viewport.width < SMALL_PHONE_MAX_WIDTH,
        }
    }

    pub fn horizontal_scale(&self, size: f64) -> f64 {
        size * self.width_ratio
    }

    pub fn vertical_scale(&self, size: f64) -> f64 {
        size * self.height_ratio
    }

    /// Blend between `size` (factor 0) and full horizontal scaling (factor 1).
    pub fn moderate_scale(&self, size: f64, factor: f64) -> f64 {
        size + (self.horizontal_scale(size) - size) * factor
    }

    /// Horizontally scaled font size, snapped to a whole device pixel.
    pub fn font_scale(&self, size: f64) -> f64 {
        (self.horizontal_scale(size) * self.pixel_ratio).round() / self.pixel_ratio
    }
}

/// Holds the factors for the most recent viewport and recomputes them when a
/// resize event reports a different one.
#[derive(Debug, Clone, Default)]
pub struct ScaleTracker {
    latest: Option<(Viewport, ScaleFactors)>,
}

impl ScaleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_resize(&mut self, viewport: Viewport) -> ScaleFactors {
        match self.latest {
            Some((seen, factors)) if seen == viewport => factors,
            _ => {
                let factors = ScaleFactors::for_viewport(viewport);
                tracing::trace!(
                    width = viewport.width,
                    height = viewport.height,
                    pixel_ratio = viewport.pixel_ratio,
                    "recomputed scale factors"
                );
                self.latest = Some((viewport, factors));
                factors
            }
        }
    }

    pub fn current(&self) -> Option<ScaleFactors> {
        self.latest.map(|(_, factors)| factors)
    }
}
