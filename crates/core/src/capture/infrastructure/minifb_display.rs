use std::cell::Cell;
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

use minifb::{InputCallback, Key, Window, WindowOptions};

use crate::capture::domain::display_surface::{DisplayError, DisplaySurface};
use crate::shared::frame::Frame;

/// Key that ends the session.
pub const QUIT_KEY: Key = Key::Q;

/// Latches a typed `q`/`Q` from the window's character events, which also
/// report taps released between two `update` calls.
struct QuitLatch(Rc<Cell<bool>>);

impl InputCallback for QuitLatch {
    fn add_char(&mut self, uni_char: u32) {
        if matches!(char::from_u32(uni_char), Some('q' | 'Q')) {
            self.0.set(true);
        }
    }
}

/// Native window backed by minifb.
///
/// Frames are repacked from RGB24 into minifb's `0RGB` `u32` layout.
pub struct MinifbDisplay {
    window: Option<Window>,
    buffer: Vec<u32>,
    quit_typed: Rc<Cell<bool>>,
}

impl MinifbDisplay {
    pub fn new() -> Self {
        Self {
            window: None,
            buffer: Vec::new(),
            quit_typed: Rc::new(Cell::new(false)),
        }
    }

    fn quit_requested(quit_typed: &Cell<bool>, window: &Window) -> bool {
        quit_typed.get() || !window.is_open() || window.is_key_down(QUIT_KEY)
    }
}

impl Default for MinifbDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySurface for MinifbDisplay {
    fn open(&mut self, title: &str, width: u32, height: u32) -> Result<(), DisplayError> {
        let mut window = Window::new(
            title,
            width as usize,
            height as usize,
            WindowOptions::default(),
        )
        .map_err(|e| DisplayError::Open {
            title: title.to_string(),
            reason: e.to_string(),
        })?;
        self.quit_typed.set(false);
        window.set_input_callback(Box::new(QuitLatch(Rc::clone(&self.quit_typed))));
        self.window = Some(window);
        Ok(())
    }

    fn present(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        let window = self.window.as_mut().ok_or(DisplayError::NotOpen)?;
        pack_0rgb(frame.data(), &mut self.buffer);
        window
            .update_with_buffer(&self.buffer, frame.width() as usize, frame.height() as usize)
            .map_err(|e| DisplayError::Present(e.to_string()))
    }

    fn poll_quit(&mut self, timeout: Duration) -> bool {
        let quit_typed = &self.quit_typed;
        let Some(window) = self.window.as_mut() else {
            return true;
        };
        let deadline = Instant::now() + timeout;
        loop {
            window.update();
            if Self::quit_requested(quit_typed, window) {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            thread::sleep((deadline - now).min(Duration::from_millis(1)));
        }
    }

    fn close(&mut self) {
        // dropping the handle destroys the native window
        self.window = None;
    }
}

impl Drop for MinifbDisplay {
    fn drop(&mut self) {
        self.close();
    }
}

/// Repacks RGB24 bytes into `0x00RRGGBB` words, reusing `out`.
pub fn pack_0rgb(rgb: &[u8], out: &mut Vec<u32>) {
    out.clear();
    out.extend(
        rgb.chunks_exact(3)
            .map(|px| ((px[0] as u32) << 16) | ((px[1] as u32) << 8) | px[2] as u32),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_0rgb() {
        let mut out = Vec::new();
        pack_0rgb(&[255, 0, 0, 0, 255, 0, 0, 0, 255, 1, 2, 3], &mut out);
        assert_eq!(out, vec![0x00FF_0000, 0x0000_FF00, 0x0000_00FF, 0x0001_0203]);
    }

    #[test]
    fn test_pack_0rgb_reuses_buffer() {
        let mut out = vec![7; 10];
        pack_0rgb(&[9, 9, 9], &mut out);
        assert_eq!(out, vec![0x0009_0909]);
    }

    #[test]
    fn test_present_before_open_is_error() {
        let mut display = MinifbDisplay::new();
        let frame = Frame::filled(2, 2, [0, 0, 0], 0);
        assert!(matches!(
            display.present(&frame),
            Err(DisplayError::NotOpen)
        ));
    }

    #[test]
    fn test_poll_without_window_requests_quit() {
        let mut display = MinifbDisplay::new();
        assert!(display.poll_quit(Duration::from_millis(1)));
    }

    #[test]
    fn test_typed_quit_char_latches() {
        let flag = Rc::new(Cell::new(false));
        let mut latch = QuitLatch(Rc::clone(&flag));
        latch.add_char('a' as u32);
        assert!(!flag.get());
        latch.add_char('Q' as u32);
        assert!(flag.get());
        // stays set until the next window is opened
        latch.add_char('x' as u32);
        assert!(flag.get());
    }
}
