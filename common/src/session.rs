use crate::ErrorBody;
use crate::Operation;
use crate::overlay::{DisplaySize, Mark, Overlay};
use crate::payload::DataUrl;
use crate::result::InferenceResult;
use serde_json::Value;

/// Handle for one issued run. Only the most recently issued ticket can
/// deliver a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunTicket {
    seq: u64,
    operation: Operation,
}

impl RunTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Current,
    /// A newer run was started, or the image changed, after this ticket was issued.
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
struct Outcome {
    raw: Value,
    result: InferenceResult,
    overlay: Overlay,
}

/// Client-side state of one playground: the chosen image, its display size,
/// and the result of the latest run.
#[derive(Debug, Default)]
pub struct Session {
    image: Option<DataUrl>,
    display: DisplaySize,
    last_seq: u64,
    pending: Option<RunTicket>,
    outcome: Option<Outcome>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches to a new image. Any previous result is dropped and runs still
    /// in flight can no longer deliver.
    pub fn select_image(&mut self, image: DataUrl) {
        self.image = Some(image);
        self.pending = None;
        self.outcome = None;
    }

    /// Records the size the image is currently rendered at.
    pub fn resize(&mut self, display: DisplaySize) {
        self.display = display;
    }

    pub fn display(&self) -> DisplaySize {
        self.display
    }

    /// Starts a run, clearing the previous result. Returns `None` when no image
    /// has been chosen yet.
    pub fn begin_run(&mut self, operation: Operation) -> Option<RunTicket> {
        self.image.as_ref()?;
        self.last_seq += 1;
        let ticket = RunTicket {
            seq: self.last_seq,
            operation,
        };
        self.pending = Some(ticket);
        self.outcome = None;
        Some(ticket)
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    /// Delivers the relay response for `ticket`.
    pub fn complete(&mut self, ticket: RunTicket, response: Value) -> Applied {
        if self.pending != Some(ticket) {
            return Applied::Stale;
        }
        self.pending = None;
        let result = InferenceResult::from_response(ticket.operation, &response);
        let overlay = Overlay::new(result.shapes());
        self.outcome = Some(Outcome {
            raw: response,
            result,
            overlay,
        });
        Applied::Current
    }

    /// Delivers a failure that happened before any response was received.
    pub fn fail(&mut self, ticket: RunTicket, message: &str) -> Applied {
        self.complete(ticket, ErrorBody::new(message).to_value())
    }

    /// The latest response exactly as received, for display.
    pub fn raw(&self) -> Option<&Value> {
        self.outcome.as_ref().map(|o| &o.raw)
    }

    pub fn result(&self) -> Option<&InferenceResult> {
        self.outcome.as_ref().map(|o| &o.result)
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.outcome.as_ref().map(|o| &o.overlay)
    }

    /// Overlay marks scaled to the current display size.
    pub fn marks(&self) -> Vec<Mark> {
        self.overlay()
            .map(|o| o.render(self.display))
            .unwrap_or_default()
    }

    pub fn to_svg(&self) -> String {
        self.overlay()
            .cloned()
            .unwrap_or_default()
            .to_svg(self.display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::PixelPoint;
    use serde_json::json;

    fn image(tag: &[u8]) -> DataUrl {
        DataUrl::from_bytes("image/jpeg", tag)
    }

    fn points_response() -> Value {
        json!({ "points": [{ "x": 0.5, "y": 0.5 }] })
    }

    #[test]
    fn test_run_requires_image() {
        let mut session = Session::new();
        assert_eq!(session.begin_run(Operation::Caption), None);
        assert!(!session.is_running());
    }

    #[test]
    fn test_complete_applies_latest() {
        let mut session = Session::new();
        session.select_image(image(b"a"));
        session.resize(DisplaySize::new(200.0, 100.0).unwrap());

        let ticket = session.begin_run(Operation::Point).unwrap();
        assert!(session.is_running());
        assert_eq!(session.complete(ticket, points_response()), Applied::Current);
        assert!(!session.is_running());
        assert_eq!(session.raw(), Some(&points_response()));
        assert_eq!(
            session.marks(),
            vec![Mark::Circle(PixelPoint { x: 100.0, y: 50.0 })]
        );
    }

    #[test]
    fn test_marks_follow_resize() {
        let mut session = Session::new();
        session.select_image(image(b"a"));
        session.resize(DisplaySize::new(200.0, 100.0).unwrap());
        let ticket = session.begin_run(Operation::Point).unwrap();
        session.complete(ticket, points_response());

        session.resize(DisplaySize::new(50.0, 40.0).unwrap());
        assert_eq!(
            session.marks(),
            vec![Mark::Circle(PixelPoint { x: 25.0, y: 20.0 })]
        );
    }

    #[test]
    fn test_superseded_run_is_discarded() {
        let mut session = Session::new();
        session.select_image(image(b"a"));

        let first = session.begin_run(Operation::Point).unwrap();
        let second = session.begin_run(Operation::Caption).unwrap();
        assert!(second.seq() > first.seq());

        let caption = json!({ "caption": "a cat on a mat" });
        assert_eq!(session.complete(second, caption.clone()), Applied::Current);
        // the older response arrives last and must not overwrite
        assert_eq!(session.complete(first, points_response()), Applied::Stale);
        assert_eq!(session.raw(), Some(&caption));
        assert!(session.marks().is_empty());
    }

    #[test]
    fn test_ticket_delivers_once() {
        let mut session = Session::new();
        session.select_image(image(b"a"));
        let ticket = session.begin_run(Operation::Query).unwrap();
        assert_eq!(session.complete(ticket, json!({ "answer": "yes" })), Applied::Current);
        assert_eq!(session.complete(ticket, json!({ "answer": "no" })), Applied::Stale);
        assert_eq!(session.raw(), Some(&json!({ "answer": "yes" })));
    }

    #[test]
    fn test_new_image_clears_and_invalidates() {
        let mut session = Session::new();
        session.select_image(image(b"a"));
        let ticket = session.begin_run(Operation::Point).unwrap();
        session.complete(ticket, points_response());
        assert!(session.result().is_some());

        let in_flight = session.begin_run(Operation::Point).unwrap();
        session.select_image(image(b"b"));
        assert!(session.result().is_none());
        assert!(session.overlay().is_none());
        assert!(!session.is_running());
        assert_eq!(session.complete(in_flight, points_response()), Applied::Stale);
        assert!(session.raw().is_none());
    }

    #[test]
    fn test_begin_run_clears_previous_result() {
        let mut session = Session::new();
        session.select_image(image(b"a"));
        let ticket = session.begin_run(Operation::Point).unwrap();
        session.complete(ticket, points_response());

        session.begin_run(Operation::Detect).unwrap();
        assert!(session.raw().is_none());
        assert!(session.marks().is_empty());
    }

    #[test]
    fn test_failure_is_shown_as_error_body() {
        let mut session = Session::new();
        session.select_image(image(b"a"));
        let ticket = session.begin_run(Operation::Detect).unwrap();
        assert_eq!(session.fail(ticket, "connection refused"), Applied::Current);
        assert_eq!(session.raw(), Some(&json!({ "error": "connection refused" })));
        assert!(session.result().unwrap().is_opaque());
        assert!(session.marks().is_empty());
    }
}
