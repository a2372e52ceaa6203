use image::RgbImage;
use ndarray::ArrayView3;

/// Bytes per pixel. Frames are always packed RGB24.
pub const CHANNELS: usize = 3;

/// One captured camera frame: tightly packed RGB bytes in row-major order.
///
/// Owned by the loop iteration that read it. Pixel-format conversion
/// happens in the capture and display adapters only.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * CHANNELS,
            "data length must equal width * height * 3"
        );
        Self {
            data,
            width,
            height,
            index,
        }
    }

    /// A frame filled with a single colour.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3], index: usize) -> Self {
        let data = rgb
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * CHANNELS)
            .collect();
        Self::new(data, width, height, index)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 3]> {
        let offset = self.offset(x, y)?;
        Some([
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
        ])
    }

    /// Writes a pixel; coordinates outside the frame are ignored.
    pub fn put_pixel(&mut self, x: i32, y: i32, rgb: [u8; 3]) {
        if let Some(offset) = self.offset(x, y) {
            self.data[offset..offset + CHANNELS].copy_from_slice(&rgb);
        }
    }

    /// Runs `draw` over the frame as an `RgbImage`, reusing the buffer.
    pub fn draw_on_image<F>(&mut self, draw: F) -> Result<(), Box<dyn std::error::Error>>
    where
        F: FnOnce(&mut RgbImage),
    {
        let expected = self.width as usize * self.height as usize * CHANNELS;
        if self.data.len() != expected {
            return Err(format!(
                "frame buffer holds {} bytes, expected {expected}",
                self.data.len()
            )
            .into());
        }
        let data = std::mem::take(&mut self.data);
        let mut image = RgbImage::from_raw(self.width, self.height, data)
            .ok_or("frame buffer does not match its dimensions")?;
        draw(&mut image);
        self.data = image.into_raw();
        Ok(())
    }

    /// Copies the frame into an `image` buffer for resampling.
    pub fn to_rgb_image(&self) -> Option<RgbImage> {
        RgbImage::from_raw(self.width, self.height, self.data.clone())
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * CHANNELS)
    }

    fn shape(&self) -> (usize, usize, usize) {
        (self.height as usize, self.width as usize, CHANNELS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_and_accessors() {
        let data = vec![0u8; 12]; // 2x2x3
        let frame = Frame::new(data.clone(), 2, 2, 5);
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.index(), 5);
        assert_eq!(frame.data(), &data[..]);
    }

    #[test]
    #[should_panic(expected = "data length must equal width * height * 3")]
    fn test_mismatched_data_length_panics_in_debug() {
        Frame::new(vec![0u8; 10], 2, 2, 0);
    }

    #[test]
    fn test_filled_repeats_colour() {
        let frame = Frame::filled(3, 2, [1, 2, 3], 0);
        assert_eq!(frame.data().len(), 18);
        assert_eq!(frame.pixel(2, 1), Some([1, 2, 3]));
    }

    #[test]
    fn test_put_pixel_inside_frame() {
        let mut frame = Frame::filled(4, 4, [0, 0, 0], 0);
        frame.put_pixel(1, 2, [255, 10, 20]);
        assert_eq!(frame.pixel(1, 2), Some([255, 10, 20]));
        assert_eq!(frame.as_ndarray()[[2, 1, 0]], 255);
    }

    #[test]
    fn test_put_pixel_outside_frame_is_ignored() {
        let mut frame = Frame::filled(4, 4, [7, 7, 7], 0);
        frame.put_pixel(-1, 0, [255, 255, 255]);
        frame.put_pixel(0, 4, [255, 255, 255]);
        assert!(frame.data().iter().all(|&b| b == 7));
        assert_eq!(frame.pixel(4, 0), None);
    }

    #[test]
    fn test_draw_on_image_writes_back() {
        let mut frame = Frame::filled(4, 3, [0, 0, 0], 2);
        frame
            .draw_on_image(|img| img.put_pixel(3, 2, image::Rgb([9, 8, 7])))
            .unwrap();
        assert_eq!(frame.pixel(3, 2), Some([9, 8, 7]));
        assert_eq!(frame.data().len(), 36);
        assert_eq!(frame.index(), 2);
    }

    #[test]
    fn test_to_rgb_image_preserves_pixels() {
        let mut frame = Frame::filled(3, 3, [10, 20, 30], 0);
        frame.put_pixel(2, 1, [90, 80, 70]);
        let img = frame.to_rgb_image().unwrap();
        assert_eq!(img.dimensions(), (3, 3));
        assert_eq!(img.get_pixel(2, 1).0, [90, 80, 70]);
    }
}
