//! Stage objects - the visual elements placed on a canvas.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::filter::FilterChain;

/// Unique identifier for a stage object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(Uuid);

impl ObjectId {
    /// Create a new unique object ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse an ID from its string form.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid UUID.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Current timestamp in milliseconds since the Unix epoch.
///
/// Stage objects carry this as `updated_at`; ties in z-order resolve on it.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // ms timestamps fit in u64 far beyond any session
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Left-aligned text.
    #[default]
    Left,
    /// Centered text.
    Center,
    /// Right-aligned text.
    Right,
    /// Justified text.
    Justify,
}

/// Font style of a text object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontStyle {
    /// Regular weight, upright.
    #[default]
    Normal,
    /// Bold weight.
    Bold,
    /// Italic slant.
    Italic,
    /// Bold and italic combined.
    BoldItalic,
}

/// Text decoration of a text object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextDecoration {
    /// No decoration.
    #[default]
    None,
    /// Underlined text.
    Underline,
    /// Struck-through text.
    LineThrough,
}

/// Basic geometric shapes the editor can place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeType {
    /// Rectangle.
    Rect,
    /// Circle.
    Circle,
    /// Five-pointed star.
    Star,
    /// Arrow.
    Arrow,
}

/// The type of content a stage object carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ObjectKind {
    /// A raster or vector image.
    Image {
        /// Image source URL.
        src: String,
        /// Active filter pipeline.
        #[serde(default)]
        filters: FilterChain,
    },

    /// A text block.
    Text {
        /// Text content.
        content: String,
        /// Font family name.
        font_family: String,
        /// Font size in pixels.
        font_size: f32,
        /// Fill color as hex.
        fill: String,
        /// Horizontal alignment.
        #[serde(default)]
        align: TextAlign,
        /// Font style.
        #[serde(default)]
        font_style: FontStyle,
        /// Text decoration.
        #[serde(default)]
        text_decoration: TextDecoration,
        /// Line height multiplier.
        line_height: f32,
        /// Whether the family is a web font that must be fetched before draw.
        #[serde(default)]
        web_font: bool,
    },

    /// A geometric shape.
    Shape {
        /// Shape geometry.
        shape: ShapeType,
        /// Fill color as hex.
        fill: String,
        /// Stroke color as hex.
        stroke: String,
        /// Stroke width in pixels.
        stroke_width: f32,
        /// Corner radius (rectangles only, ignored elsewhere).
        #[serde(default)]
        corner_radius: f32,
    },
}

/// Transform for positioning and sizing objects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// X position (pixels from frame left).
    pub x: f32,
    /// Y position (pixels from frame top).
    pub y: f32,
    /// Width in pixels, before scaling.
    pub width: f32,
    /// Height in pixels, before scaling.
    pub height: f32,
    /// Rotation in degrees.
    pub rotation: f32,
    /// Horizontal scale factor.
    pub scale_x: f32,
    /// Vertical scale factor.
    pub scale_y: f32,
    /// Z-index for layering; negative values sit behind the default layer.
    pub z_index: i32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            z_index: 0,
        }
    }
}

impl Transform {
    /// Effective width after scaling.
    #[must_use]
    pub fn scaled_width(&self) -> f32 {
        self.width * self.scale_x
    }

    /// Effective height after scaling.
    #[must_use]
    pub fn scaled_height(&self) -> f32 {
        self.height * self.scale_y
    }
}

/// Axis-aligned bounding box in frame coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Box width.
    pub width: f32,
    /// Box height.
    pub height: f32,
}

impl Bounds {
    /// Smallest box containing both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let bottom = (self.y + self.height).max(other.y + other.height);
        Self {
            x,
            y,
            width: right - x,
            height: bottom - y,
        }
    }

    /// Check whether a point falls inside the box.
    #[must_use]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// A stage object: content, transform, and layering metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageObject {
    /// Unique identifier.
    pub id: ObjectId,
    /// Object content.
    pub kind: ObjectKind,
    /// Position and size.
    pub transform: Transform,
    /// Last modification in ms since epoch; breaks z-order ties.
    pub updated_at: u64,
    /// Whether this object is part of the current selection.
    #[serde(default)]
    pub selected: bool,
    /// Whether this object can be dragged on the stage.
    #[serde(default = "StageObject::default_draggable")]
    pub draggable: bool,
}

impl StageObject {
    /// Create a new object with the given kind.
    #[must_use]
    pub fn new(kind: ObjectKind) -> Self {
        Self {
            id: ObjectId::new(),
            kind,
            transform: Transform::default(),
            updated_at: now_millis(),
            selected: false,
            draggable: true,
        }
    }

    const fn default_draggable() -> bool {
        true
    }

    /// Set the transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Set the z-index.
    #[must_use]
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.transform.z_index = z_index;
        self
    }

    /// Set whether the object is draggable.
    #[must_use]
    pub fn with_draggable(mut self, draggable: bool) -> Self {
        self.draggable = draggable;
        self
    }

    /// Mark the object as modified at the given timestamp.
    pub fn touch(&mut self, timestamp: u64) {
        self.updated_at = timestamp;
    }

    /// Bounding box of the object after scaling.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds {
            x: self.transform.x,
            y: self.transform.y,
            width: self.transform.scaled_width(),
            height: self.transform.scaled_height(),
        }
    }

    /// Check if a point (in frame coordinates) is within this object.
    #[must_use]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        self.bounds().contains(x, y)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn text_kind() -> ObjectKind {
        ObjectKind::Text {
            content: "Hello".to_string(),
            font_family: "Inter".to_string(),
            font_size: 16.0,
            fill: "#000000".to_string(),
            align: TextAlign::Left,
            font_style: FontStyle::Normal,
            text_decoration: TextDecoration::None,
            line_height: 1.2,
            web_font: false,
        }
    }

    #[test]
    fn test_contains_point_respects_scale() {
        let obj = StageObject::new(text_kind()).with_transform(Transform {
            x: 10.0,
            y: 10.0,
            width: 100.0,
            height: 50.0,
            scale_x: 2.0,
            ..Transform::default()
        });

        // 10 + 100 * 2 = 210 right edge
        assert!(obj.contains_point(200.0, 30.0));
        assert!(!obj.contains_point(220.0, 30.0));
    }

    #[test]
    fn test_bounds_union() {
        let a = Bounds {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
        };
        let b = Bounds {
            x: 20.0,
            y: 5.0,
            width: 10.0,
            height: 10.0,
        };
        let u = a.union(&b);
        assert_eq!(u.x, 0.0);
        assert_eq!(u.y, 0.0);
        assert_eq!(u.width, 30.0);
        assert_eq!(u.height, 15.0);
    }

    #[test]
    fn test_kind_serialization_tag() {
        let obj = StageObject::new(ObjectKind::Shape {
            shape: ShapeType::Rect,
            fill: "#ff0000".to_string(),
            stroke: "#000000".to_string(),
            stroke_width: 1.0,
            corner_radius: 0.0,
        });

        let json = serde_json::to_string(&obj).expect("should serialize");
        assert!(json.contains("\"type\":\"shape\""));
        assert!(json.contains("\"rect\""));

        let back: StageObject = serde_json::from_str(&json).expect("should deserialize");
        assert_eq!(back.id, obj.id);
    }

    #[test]
    fn test_object_id_parse_roundtrip() {
        let id = ObjectId::new();
        let parsed = ObjectId::parse(&id.to_string()).expect("should parse");
        assert_eq!(parsed, id);
        assert!(ObjectId::parse("not-a-uuid").is_err());
    }
}
