//! The canvas frame: artboard dimensions, zoom, and background.

use serde::{Deserialize, Serialize};

use crate::{CanvasError, CanvasResult};

/// Smallest accepted frame edge in pixels.
pub const MIN_FRAME_SIZE: f32 = 10.0;
/// Largest accepted frame edge in pixels.
pub const MAX_FRAME_SIZE: f32 = 10000.0;
/// Default frame width (square social-media post).
pub const DEFAULT_FRAME_WIDTH: f32 = 1080.0;
/// Default frame height.
pub const DEFAULT_FRAME_HEIGHT: f32 = 1080.0;

/// Long-side cap when sizing the frame to a background image.
const MAX_BACKGROUND_SIZE: f32 = 1920.0;

/// A named preset size for social-media formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StandardDimension {
    /// Human-readable label.
    pub label: &'static str,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Preset sizes offered by the resize tool.
pub const STANDARD_DIMENSIONS: [StandardDimension; 10] = [
    StandardDimension {
        label: "Instagram Post (1:1)",
        width: 1080,
        height: 1080,
    },
    StandardDimension {
        label: "Instagram Story (9:16)",
        width: 1080,
        height: 1920,
    },
    StandardDimension {
        label: "Facebook Post (1.91:1)",
        width: 1200,
        height: 630,
    },
    StandardDimension {
        label: "Facebook Cover (2.7:1)",
        width: 851,
        height: 315,
    },
    StandardDimension {
        label: "Twitter Post (16:9)",
        width: 1200,
        height: 675,
    },
    StandardDimension {
        label: "Twitter Header (3:1)",
        width: 1500,
        height: 500,
    },
    StandardDimension {
        label: "LinkedIn Post (1:1)",
        width: 1200,
        height: 1200,
    },
    StandardDimension {
        label: "LinkedIn Cover (4:1)",
        width: 1584,
        height: 396,
    },
    StandardDimension {
        label: "YouTube Thumbnail (16:9)",
        width: 1280,
        height: 720,
    },
    StandardDimension {
        label: "YouTube Cover (16:9)",
        width: 2560,
        height: 1440,
    },
];

/// The artboard being edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Frame width in pixels.
    width: f32,
    /// Frame height in pixels.
    height: f32,
    /// Zoom applied to the editing viewport (1.0 = 100%).
    pub scale: f32,
    /// Optional background image URL.
    background: Option<String>,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            width: DEFAULT_FRAME_WIDTH,
            height: DEFAULT_FRAME_HEIGHT,
            scale: 1.0,
            background: None,
        }
    }
}

/// Check that both edges fall within the accepted range.
fn validate_size(width: f32, height: f32) -> CanvasResult<()> {
    let in_range = |v: f32| (MIN_FRAME_SIZE..=MAX_FRAME_SIZE).contains(&v);
    if in_range(width) && in_range(height) {
        Ok(())
    } else {
        Err(CanvasError::InvalidDimensions { width, height })
    }
}

impl Frame {
    /// Create a frame with the given size.
    ///
    /// # Errors
    ///
    /// Returns an error if either edge is outside `10..=10000`.
    pub fn new(width: f32, height: f32) -> CanvasResult<Self> {
        validate_size(width, height)?;
        Ok(Self {
            width,
            height,
            scale: 1.0,
            background: None,
        })
    }

    /// Frame width in pixels.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Frame height in pixels.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Resize the frame.
    ///
    /// # Errors
    ///
    /// Returns an error if either edge is outside `10..=10000`.
    pub fn set_size(&mut self, width: f32, height: f32) -> CanvasResult<()> {
        validate_size(width, height)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Apply a preset size.
    #[allow(clippy::cast_precision_loss)] // preset edges stay far below f32 integer range
    pub fn apply_preset(&mut self, preset: StandardDimension) {
        // Presets are compile-time constants inside the accepted range.
        self.width = preset.width as f32;
        self.height = preset.height as f32;
    }

    /// Scale that fits the frame inside a container, leaving `padding`
    /// pixels on each side.
    #[must_use]
    pub fn fit_scale(&self, container_width: f32, container_height: f32, padding: f32) -> f32 {
        let available_w = (container_width - 2.0 * padding).max(1.0);
        let available_h = (container_height - 2.0 * padding).max(1.0);
        (available_w / self.width).min(available_h / self.height)
    }

    /// Background image URL, if any.
    #[must_use]
    pub fn background(&self) -> Option<&str> {
        self.background.as_deref()
    }

    /// Set the background image URL without touching the frame size.
    pub fn set_background(&mut self, url: impl Into<String>) {
        self.background = Some(url.into());
    }

    /// Size the frame to a background image.
    ///
    /// Images larger than 1920 on either edge shrink proportionally so the
    /// long side lands on 1920, mirroring what the editor viewport can hold.
    pub fn size_to_background(&mut self, img_width: f32, img_height: f32) {
        let mut width = img_width.max(MIN_FRAME_SIZE);
        let mut height = img_height.max(MIN_FRAME_SIZE);
        if width > MAX_BACKGROUND_SIZE || height > MAX_BACKGROUND_SIZE {
            let ratio = (MAX_BACKGROUND_SIZE / width).min(MAX_BACKGROUND_SIZE / height);
            width = (width * ratio).floor();
            height = (height * ratio).floor();
        }
        self.width = width;
        self.height = height;
    }

    /// Remove the background and restore the default frame size.
    pub fn clear_background(&mut self) {
        self.background = None;
        self.width = DEFAULT_FRAME_WIDTH;
        self.height = DEFAULT_FRAME_HEIGHT;
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_size_bounds() {
        assert!(Frame::new(1080.0, 1080.0).is_ok());
        assert!(Frame::new(10.0, 10.0).is_ok());
        assert!(Frame::new(10000.0, 10000.0).is_ok());
        assert!(Frame::new(9.0, 100.0).is_err());
        assert!(Frame::new(100.0, 10001.0).is_err());
    }

    #[test]
    fn test_fit_scale() {
        let frame = Frame::new(1000.0, 500.0).expect("frame");
        // 1040x540 container with 20px padding leaves exactly 1000x500.
        let scale = frame.fit_scale(1040.0, 540.0, 20.0);
        assert!((scale - 1.0).abs() < f32::EPSILON);

        // Half-size container halves the scale.
        let scale = frame.fit_scale(540.0, 290.0, 20.0);
        assert!((scale - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_background_clamps_long_side() {
        let mut frame = Frame::default();
        frame.set_background("/public/uploads/backgrounds/x.png");
        frame.size_to_background(3840.0, 2160.0);
        assert_eq!(frame.width(), 1920.0);
        assert_eq!(frame.height(), 1080.0);
        assert!(frame.background().is_some());
    }

    #[test]
    fn test_background_small_image_keeps_size() {
        let mut frame = Frame::default();
        frame.size_to_background(800.0, 600.0);
        assert_eq!(frame.width(), 800.0);
        assert_eq!(frame.height(), 600.0);
    }

    #[test]
    fn test_clear_background_restores_default() {
        let mut frame = Frame::default();
        frame.set_background("/public/uploads/backgrounds/x.png");
        frame.size_to_background(640.0, 480.0);
        frame.clear_background();
        assert!(frame.background().is_none());
        assert_eq!(frame.width(), DEFAULT_FRAME_WIDTH);
        assert_eq!(frame.height(), DEFAULT_FRAME_HEIGHT);
    }

    #[test]
    fn test_presets_within_bounds() {
        for preset in STANDARD_DIMENSIONS {
            let mut frame = Frame::default();
            frame.apply_preset(preset);
            assert!(frame.width() >= MIN_FRAME_SIZE && frame.width() <= MAX_FRAME_SIZE);
            assert!(frame.height() >= MIN_FRAME_SIZE && frame.height() <= MAX_FRAME_SIZE);
        }
    }
}
