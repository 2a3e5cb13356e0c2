//! Image filter pipeline state.
//!
//! The editor only decides *which* filters are active and what their numeric
//! parameters are; pixel work belongs to whatever rendering surface the
//! object is drawn on. This module models that toggle-and-forward state.

use serde::{Deserialize, Serialize};

/// A filter the editor can toggle on an image object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    /// Brightness adjustment.
    Brighten,
    /// Contrast adjustment.
    Contrast,
    /// Desaturate to grayscale.
    Grayscale,
    /// Invert colors.
    Invert,
    /// Gaussian blur.
    Blur,
    /// Per-channel RGB adjustment.
    Rgb,
}

/// Numeric parameters forwarded to the active filters.
///
/// Setters clamp to the ranges the rendering surface accepts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterValues {
    brighten: f32,
    contrast: f32,
    blur_radius: f32,
    red: f32,
    green: f32,
    blue: f32,
}

impl Default for FilterValues {
    fn default() -> Self {
        Self {
            brighten: 0.0,
            contrast: 0.0,
            blur_radius: 0.0,
            red: 0.0,
            green: 0.0,
            blue: 0.0,
        }
    }
}

impl FilterValues {
    /// Brightness offset in `[-1, 1]`.
    #[must_use]
    pub fn brighten(&self) -> f32 {
        self.brighten
    }

    /// Set brightness, clamped to `[-1, 1]`.
    pub fn set_brighten(&mut self, value: f32) {
        self.brighten = value.clamp(-1.0, 1.0);
    }

    /// Contrast in `[-100, 100]`.
    #[must_use]
    pub fn contrast(&self) -> f32 {
        self.contrast
    }

    /// Set contrast, clamped to `[-100, 100]`.
    pub fn set_contrast(&mut self, value: f32) {
        self.contrast = value.clamp(-100.0, 100.0);
    }

    /// Blur radius in pixels, never negative.
    #[must_use]
    pub fn blur_radius(&self) -> f32 {
        self.blur_radius
    }

    /// Set blur radius; negative values clamp to zero.
    pub fn set_blur_radius(&mut self, value: f32) {
        self.blur_radius = value.max(0.0);
    }

    /// Red channel in `[0, 255]`.
    #[must_use]
    pub fn red(&self) -> f32 {
        self.red
    }

    /// Set the red channel, clamped to `[0, 255]`.
    pub fn set_red(&mut self, value: f32) {
        self.red = value.clamp(0.0, 255.0);
    }

    /// Green channel in `[0, 255]`.
    #[must_use]
    pub fn green(&self) -> f32 {
        self.green
    }

    /// Set the green channel, clamped to `[0, 255]`.
    pub fn set_green(&mut self, value: f32) {
        self.green = value.clamp(0.0, 255.0);
    }

    /// Blue channel in `[0, 255]`.
    #[must_use]
    pub fn blue(&self) -> f32 {
        self.blue
    }

    /// Set the blue channel, clamped to `[0, 255]`.
    pub fn set_blue(&mut self, value: f32) {
        self.blue = value.clamp(0.0, 255.0);
    }
}

/// Ordered set of active filters plus their parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterChain {
    active: Vec<FilterKind>,
    #[serde(default)]
    values: FilterValues,
}

impl FilterChain {
    /// Create an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate a filter. Activating an already-active filter is a no-op.
    pub fn enable(&mut self, filter: FilterKind) {
        if !self.active.contains(&filter) {
            self.active.push(filter);
        }
    }

    /// Deactivate a filter if it is active.
    pub fn disable(&mut self, filter: FilterKind) {
        self.active.retain(|f| *f != filter);
    }

    /// Flip a filter's active state.
    pub fn toggle(&mut self, filter: FilterKind) {
        if self.is_enabled(filter) {
            self.disable(filter);
        } else {
            self.enable(filter);
        }
    }

    /// Whether a filter is currently active.
    #[must_use]
    pub fn is_enabled(&self, filter: FilterKind) -> bool {
        self.active.contains(&filter)
    }

    /// Active filters in activation order.
    #[must_use]
    pub fn active(&self) -> &[FilterKind] {
        &self.active
    }

    /// Filters to hand to the rendering surface.
    ///
    /// An empty chain resolves to `[Brighten]` so the surface always has a
    /// cached filter pass to parameterize.
    #[must_use]
    pub fn effective(&self) -> Vec<FilterKind> {
        if self.active.is_empty() {
            vec![FilterKind::Brighten]
        } else {
            self.active.clone()
        }
    }

    /// Filter parameters.
    #[must_use]
    pub fn values(&self) -> &FilterValues {
        &self.values
    }

    /// Mutable filter parameters.
    pub fn values_mut(&mut self) -> &mut FilterValues {
        &mut self.values
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_enable_is_idempotent() {
        let mut chain = FilterChain::new();
        chain.enable(FilterKind::Contrast);
        chain.enable(FilterKind::Contrast);
        assert_eq!(chain.active(), &[FilterKind::Contrast]);
    }

    #[test]
    fn test_toggle() {
        let mut chain = FilterChain::new();
        chain.toggle(FilterKind::Grayscale);
        assert!(chain.is_enabled(FilterKind::Grayscale));
        chain.toggle(FilterKind::Grayscale);
        assert!(!chain.is_enabled(FilterKind::Grayscale));
    }

    #[test]
    fn test_activation_order_preserved() {
        let mut chain = FilterChain::new();
        chain.enable(FilterKind::Blur);
        chain.enable(FilterKind::Brighten);
        chain.enable(FilterKind::Rgb);
        chain.disable(FilterKind::Brighten);
        assert_eq!(chain.active(), &[FilterKind::Blur, FilterKind::Rgb]);
    }

    #[test]
    fn test_empty_chain_falls_back_to_brighten() {
        let chain = FilterChain::new();
        assert_eq!(chain.effective(), vec![FilterKind::Brighten]);

        let mut chain = FilterChain::new();
        chain.enable(FilterKind::Invert);
        assert_eq!(chain.effective(), vec![FilterKind::Invert]);
    }

    #[test]
    fn test_values_clamp() {
        let mut values = FilterValues::default();

        values.set_brighten(2.5);
        assert_eq!(values.brighten(), 1.0);
        values.set_brighten(-3.0);
        assert_eq!(values.brighten(), -1.0);

        values.set_contrast(500.0);
        assert_eq!(values.contrast(), 100.0);

        values.set_blur_radius(-4.0);
        assert_eq!(values.blur_radius(), 0.0);

        values.set_red(300.0);
        assert_eq!(values.red(), 255.0);
        values.set_green(-10.0);
        assert_eq!(values.green(), 0.0);
    }
}
