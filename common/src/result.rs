use crate::Operation;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A location normalized to `[0,1]` of the image width and height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// An axis-aligned box normalized to `[0,1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Point(Point),
    Box(BoundingBox),
}

/// What an upstream response means for the overlay.
///
/// The variant is decided by the operation that produced the response plus a
/// schema check of the one field that operation is expected to fill in.
/// Anything else, including error bodies, stays `Opaque`.
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceResult {
    Points(Vec<Point>),
    Boxes(Vec<BoundingBox>),
    Opaque(Value),
}

impl InferenceResult {
    pub fn from_response(operation: Operation, value: &Value) -> Self {
        let decoded = match operation {
            Operation::Point => sequence_of(value, "points").map(InferenceResult::Points),
            Operation::Detect => sequence_of(value, "objects").map(InferenceResult::Boxes),
            Operation::Caption | Operation::Query => None,
        };
        decoded.unwrap_or_else(|| InferenceResult::Opaque(value.clone()))
    }

    /// Shapes in the order the upstream returned them.
    pub fn shapes(&self) -> Vec<Shape> {
        match self {
            InferenceResult::Points(points) => points.iter().copied().map(Shape::Point).collect(),
            InferenceResult::Boxes(boxes) => boxes.iter().copied().map(Shape::Box).collect(),
            InferenceResult::Opaque(_) => Vec::new(),
        }
    }

    pub fn is_opaque(&self) -> bool {
        matches!(self, InferenceResult::Opaque(_))
    }
}

fn sequence_of<T: DeserializeOwned>(value: &Value, field: &str) -> Option<Vec<T>> {
    let items = value.get(field)?.as_array()?;
    items
        .iter()
        .map(|item| serde_json::from_value(item.clone()).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_points_decoded_in_order() {
        let value = json!({ "points": [{ "x": 0.1, "y": 0.2 }, { "x": 0.9, "y": 0.8 }] });
        let result = InferenceResult::from_response(Operation::Point, &value);
        assert_eq!(
            result,
            InferenceResult::Points(vec![Point { x: 0.1, y: 0.2 }, Point { x: 0.9, y: 0.8 }])
        );
        assert_eq!(result.shapes().len(), 2);
    }

    #[test]
    fn test_boxes_decoded() {
        let value = json!({
            "request_id": "abc",
            "objects": [{ "x_min": 0.1, "x_max": 0.4, "y_min": 0.2, "y_max": 0.5 }]
        });
        let result = InferenceResult::from_response(Operation::Detect, &value);
        assert_eq!(
            result.shapes(),
            vec![Shape::Box(BoundingBox {
                x_min: 0.1,
                x_max: 0.4,
                y_min: 0.2,
                y_max: 0.5,
            })]
        );
    }

    #[test]
    fn test_out_of_range_kept() {
        let value = json!({ "points": [{ "x": 1.5, "y": -0.25 }] });
        let result = InferenceResult::from_response(Operation::Point, &value);
        assert_eq!(result, InferenceResult::Points(vec![Point { x: 1.5, y: -0.25 }]));
    }

    #[test]
    fn test_missing_field_is_opaque() {
        let value = json!({ "caption": "a cat" });
        let result = InferenceResult::from_response(Operation::Detect, &value);
        assert_eq!(result, InferenceResult::Opaque(value));
        assert!(result.shapes().is_empty());
    }

    #[test]
    fn test_field_checked_per_operation() {
        // `objects` only counts for detect, `points` only for point
        let value = json!({ "objects": [{ "x_min": 0.0, "x_max": 1.0, "y_min": 0.0, "y_max": 1.0 }] });
        assert!(InferenceResult::from_response(Operation::Point, &value).is_opaque());
        assert!(InferenceResult::from_response(Operation::Caption, &value).is_opaque());

        let value = json!({ "points": [{ "x": 0.5, "y": 0.5 }] });
        assert!(InferenceResult::from_response(Operation::Detect, &value).is_opaque());
        assert!(InferenceResult::from_response(Operation::Query, &value).is_opaque());
    }

    #[test]
    fn test_malformed_shapes_are_opaque() {
        let cases = [
            json!({ "points": "none" }),
            json!({ "points": [{ "x": 0.5 }] }),
            json!({ "points": [{ "x": 0.5, "y": 0.5 }, 3] }),
            json!([{ "x": 0.5, "y": 0.5 }]),
            json!({ "error": "Invalid endpoint" }),
        ];
        for value in cases {
            let result = InferenceResult::from_response(Operation::Point, &value);
            assert_eq!(result, InferenceResult::Opaque(value));
        }
    }

    #[test]
    fn test_empty_sequence() {
        let value = json!({ "objects": [] });
        let result = InferenceResult::from_response(Operation::Detect, &value);
        assert_eq!(result, InferenceResult::Boxes(vec![]));
        assert!(result.shapes().is_empty());
    }
}
