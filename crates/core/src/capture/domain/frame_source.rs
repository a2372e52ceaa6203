use thiserror::Error;

use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("could not open capture device {device}: {reason}")]
    Open { device: String, reason: String },
    #[error("capture device is not open")]
    NotOpen,
    #[error("failed to read frame: {0}")]
    Read(String),
}

/// Size of the frames a source will produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptureInfo {
    pub width: u32,
    pub height: u32,
}

/// Live source of RGB frames, typically a camera.
pub trait FrameSource {
    fn open(&mut self) -> Result<CaptureInfo, CaptureError>;

    /// Blocks until the next frame is available.
    ///
    /// `Ok(None)` means the stream has ended.
    fn read_frame(&mut self) -> Result<Option<Frame>, CaptureError>;

    /// Releases the device. Calling it more than once is harmless.
    fn release(&mut self);
}
