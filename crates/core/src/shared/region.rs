/// Axis-aligned face bounding box in pixel coordinates.
///
/// `x`/`y` is the top-left corner. Coordinates may lie partly outside the
/// frame; callers clamp when they need pixel access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds a region from `[x1, y1, x2, y2]` corners, clamped to the frame.
    ///
    /// Returns `None` when nothing of the box remains inside the frame.
    pub fn from_corners(corners: [f64; 4], frame_width: u32, frame_height: u32) -> Option<Self> {
        let x1 = corners[0].max(0.0).round() as i32;
        let y1 = corners[1].max(0.0).round() as i32;
        let x2 = corners[2].min(frame_width as f64).round() as i32;
        let y2 = corners[3].min(frame_height as f64).round() as i32;
        let region = Self::new(x1, y1, x2 - x1, y2 - y1);
        (!region.is_empty()).then_some(region)
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Intersection with a `frame_width` × `frame_height` frame.
    pub fn clamp_to(&self, frame_width: u32, frame_height: u32) -> Option<Self> {
        let x1 = self.x.max(0);
        let y1 = self.y.max(0);
        let x2 = self.right().min(frame_width as i32);
        let y2 = self.bottom().min(frame_height as i32);
        let clamped = Self::new(x1, y1, x2 - x1, y2 - y1);
        (!clamped.is_empty()).then_some(clamped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_edges() {
        let r = Region::new(10, 20, 30, 40);
        assert_eq!(r.right(), 40);
        assert_eq!(r.bottom(), 60);
        assert!(!r.is_empty());
    }

    #[rstest]
    #[case::zero_width(Region::new(0, 0, 0, 10))]
    #[case::zero_height(Region::new(0, 0, 10, 0))]
    #[case::negative(Region::new(0, 0, -5, 10))]
    fn test_is_empty(#[case] r: Region) {
        assert!(r.is_empty());
    }

    #[test]
    fn test_from_corners_rounds_and_clamps() {
        let r = Region::from_corners([-4.6, 10.4, 120.2, 90.6], 100, 80).unwrap();
        assert_eq!(r, Region::new(0, 10, 100, 70));
    }

    #[test]
    fn test_from_corners_outside_frame_is_none() {
        assert!(Region::from_corners([150.0, 10.0, 200.0, 50.0], 100, 100).is_none());
    }

    #[test]
    fn test_clamp_inside_is_identity() {
        let r = Region::new(10, 10, 20, 20);
        assert_eq!(r.clamp_to(100, 100), Some(r));
    }

    #[test]
    fn test_clamp_partially_outside() {
        let r = Region::new(-10, 90, 30, 30);
        assert_eq!(r.clamp_to(100, 100), Some(Region::new(0, 90, 20, 10)));
    }

    #[test]
    fn test_clamp_fully_outside_is_none() {
        assert!(Region::new(200, 200, 10, 10).clamp_to(100, 100).is_none());
    }
}
