use std::time::Duration;

use thiserror::Error;

use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("could not open window '{title}': {reason}")]
    Open { title: String, reason: String },
    #[error("window is not open")]
    NotOpen,
    #[error("failed to present frame: {0}")]
    Present(String),
}

/// A named on-screen surface that shows frames and reports the quit key.
pub trait DisplaySurface {
    fn open(&mut self, title: &str, width: u32, height: u32) -> Result<(), DisplayError>;

    fn present(&mut self, frame: &Frame) -> Result<(), DisplayError>;

    /// Waits up to `timeout` for input. Returns `true` once the user asked to
    /// quit or the window is gone.
    fn poll_quit(&mut self, timeout: Duration) -> bool;

    fn close(&mut self);
}
