//! Canonical serialized canvas document.
//!
//! This is the shape the backend stores and the editor loads: document
//! metadata plus the stage-object array. The API transports `content` as a
//! JSON string, so parsing and validating that string lives here too.

use serde::{Deserialize, Serialize};

use crate::frame::Frame;
use crate::object::StageObject;
use crate::stage::Stage;
use crate::{CanvasError, CanvasResult};

/// A saved design: stage objects plus dimensions and metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasDocument {
    /// Document name.
    pub name: String,
    /// Document description.
    pub description: String,
    /// Stage objects in back-to-front order.
    pub content: Vec<StageObject>,
    /// Optional background image URL.
    pub background: Option<String>,
    /// Frame width in pixels.
    pub width: f32,
    /// Frame height in pixels.
    pub height: f32,
}

impl CanvasDocument {
    /// Build a document from live editor state.
    ///
    /// Objects are stored back-to-front; selection state does not survive
    /// a save.
    #[must_use]
    pub fn from_stage(
        name: impl Into<String>,
        description: impl Into<String>,
        frame: &Frame,
        stage: &Stage,
    ) -> Self {
        let content = stage
            .ordered()
            .into_iter()
            .map(|object| {
                let mut object = object.clone();
                object.selected = false;
                object
            })
            .collect();

        Self {
            name: name.into(),
            description: description.into(),
            content,
            background: frame.background().map(str::to_string),
            width: frame.width(),
            height: frame.height(),
        }
    }

    /// Materialize the document into live editor state.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored dimensions are out of range.
    pub fn into_stage(self) -> CanvasResult<(Frame, Stage)> {
        let mut frame = Frame::new(self.width, self.height)?;
        if let Some(background) = self.background {
            // Stored dimensions were already sized to the background.
            frame.set_background(background);
        }

        let mut stage = Stage::new();
        stage.replace_all(
            self.content
                .into_iter()
                .map(|mut object| {
                    object.selected = false;
                    object
                })
                .collect(),
        );

        Ok((frame, stage))
    }

    /// Serialize the stage-object array the way the API transports it.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn content_json(&self) -> CanvasResult<String> {
        serde_json::to_string(&self.content).map_err(CanvasError::Serialization)
    }
}

/// Parse API `content` into a stage-object array.
///
/// The editor sends the empty canvas as `""`, `"\"\""` or `"[]"`; all
/// three yield an empty array. Anything else must be a valid JSON
/// stage-object array.
///
/// # Errors
///
/// Returns [`CanvasError::InvalidContent`] if the string is not a valid
/// stage-object array.
pub fn parse_content(raw: &str) -> CanvasResult<Vec<StageObject>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "\"\"" || trimmed == "[]" {
        return Ok(Vec::new());
    }

    serde_json::from_str::<Vec<StageObject>>(trimmed)
        .map_err(|e| CanvasError::InvalidContent(e.to_string()))
}

/// Serialize a stage-object array into the API `content` string.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_content(objects: &[StageObject]) -> CanvasResult<String> {
    serde_json::to_string(objects).map_err(CanvasError::Serialization)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::object::{ObjectKind, ShapeType, Transform};

    fn rect(z_index: i32) -> StageObject {
        StageObject::new(ObjectKind::Shape {
            shape: ShapeType::Rect,
            fill: "#ffffff".to_string(),
            stroke: "#000000".to_string(),
            stroke_width: 1.0,
            corner_radius: 0.0,
        })
        .with_transform(Transform {
            z_index,
            ..Transform::default()
        })
    }

    #[test]
    fn test_parse_content_empty_variants() {
        assert!(parse_content("").expect("empty").is_empty());
        assert!(parse_content("  ").expect("blank").is_empty());
        assert!(parse_content("\"\"").expect("quoted empty").is_empty());
        assert!(parse_content("[]").expect("empty array").is_empty());
    }

    #[test]
    fn test_parse_content_rejects_garbage() {
        assert!(parse_content("not json").is_err());
        assert!(parse_content("{\"a\": 1}").is_err());
        assert!(parse_content("[{\"bogus\": true}]").is_err());
    }

    #[test]
    fn test_parse_content_roundtrip() {
        let objects = vec![rect(0), rect(1)];
        let json = serialize_content(&objects).expect("serialize");
        let parsed = parse_content(&json).expect("parse");
        assert_eq!(parsed, objects);
    }

    #[test]
    fn test_from_stage_orders_and_deselects() {
        let mut stage = Stage::new();
        let front = stage.add(rect(5));
        let back = stage.add(rect(-1));
        stage.select(front).expect("select");

        let frame = Frame::default();
        let doc = CanvasDocument::from_stage("Flyer", "August promo", &frame, &stage);

        assert_eq!(doc.content.len(), 2);
        assert_eq!(doc.content[0].id, back);
        assert_eq!(doc.content[1].id, front);
        assert!(doc.content.iter().all(|o| !o.selected));
    }

    #[test]
    fn test_into_stage_restores_frame_and_objects() {
        let mut stage = Stage::new();
        stage.add(rect(0));
        let frame = Frame::new(1200.0, 630.0).expect("frame");

        let doc = CanvasDocument::from_stage("Post", "", &frame, &stage);
        let (restored_frame, restored_stage) = doc.into_stage().expect("materialize");

        assert_eq!(restored_frame.width(), 1200.0);
        assert_eq!(restored_frame.height(), 630.0);
        assert_eq!(restored_stage.object_count(), 1);
        assert!(restored_stage.selected_ids().is_empty());
    }

    #[test]
    fn test_into_stage_rejects_bad_dimensions() {
        let doc = CanvasDocument {
            name: "x".to_string(),
            description: String::new(),
            content: Vec::new(),
            background: None,
            width: 5.0,
            height: 1080.0,
        };
        assert!(doc.into_stage().is_err());
    }
}
