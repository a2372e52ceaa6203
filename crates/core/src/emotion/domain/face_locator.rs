use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Domain interface for finding faces in a frame.
///
/// Implementations hold inference sessions, hence `&mut self`.
pub trait FaceLocator {
    fn locate(&mut self, frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>>;
}
