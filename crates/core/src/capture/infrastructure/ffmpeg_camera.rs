use crate::capture::domain::frame_source::{CaptureError, CaptureInfo, FrameSource};
use crate::shared::frame::Frame;

/// Platform capture backend: libavdevice input format plus device URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceSpec {
    pub format: &'static str,
    pub url: String,
}

/// Maps a camera index or explicit device name to the platform's
/// libavdevice input.
///
/// `device` overrides `index`. DirectShow has no index addressing, so on
/// Windows a device name is required.
pub fn device_spec(index: u32, device: Option<&str>) -> Result<DeviceSpec, String> {
    if cfg!(target_os = "windows") {
        let name = device.ok_or("DirectShow needs a device name; pass --device")?;
        let url = if name.starts_with("video=") {
            name.to_string()
        } else {
            format!("video={name}")
        };
        Ok(DeviceSpec {
            format: "dshow",
            url,
        })
    } else if cfg!(target_os = "macos") {
        Ok(DeviceSpec {
            format: "avfoundation",
            url: device.map_or_else(|| index.to_string(), str::to_string),
        })
    } else {
        Ok(DeviceSpec {
            format: "v4l2",
            url: device.map_or_else(|| format!("/dev/video{index}"), str::to_string),
        })
    }
}

/// Reads live frames from a camera through libavdevice and converts them
/// to RGB24.
pub struct FfmpegCamera {
    index: u32,
    device: Option<String>,
    state: Option<OpenCamera>,
}

struct OpenCamera {
    input: ffmpeg_next::format::context::Input,
    decoder: ffmpeg_next::decoder::Video,
    // built on the first decoded frame, whose pixel format is authoritative
    scaler: Option<ffmpeg_next::software::scaling::Context>,
    stream_index: usize,
    width: u32,
    height: u32,
    frame_index: usize,
}

impl FfmpegCamera {
    pub fn new(index: u32, device: Option<String>) -> Self {
        Self {
            index,
            device,
            state: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state.is_some()
    }

    fn describe(&self) -> String {
        self.device
            .clone()
            .unwrap_or_else(|| format!("#{}", self.index))
    }

    fn open_device(&self) -> Result<OpenCamera, String> {
        let spec = device_spec(self.index, self.device.as_deref())?;
        ffmpeg_next::init().map_err(|e| e.to_string())?;
        ffmpeg_next::device::register_all();

        let format = ffmpeg_next::device::input::video()
            .find(|f| f.name() == spec.format)
            .ok_or_else(|| format!("input format '{}' is not available", spec.format))?;

        let input = ffmpeg_next::format::open_with(&spec.url, &format, ffmpeg_next::Dictionary::new())
            .map_err(|e| format!("{}: {e}", spec.url))?
            .input();

        let stream = input
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or("No video stream found")?;
        let stream_index = stream.index();
        let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())
            .map_err(|e| e.to_string())?;
        let decoder = codec_ctx.decoder().video().map_err(|e| e.to_string())?;
        let (width, height) = (decoder.width(), decoder.height());
        if width == 0 || height == 0 {
            return Err(format!("{} reported an empty frame size", spec.url));
        }

        Ok(OpenCamera {
            input,
            decoder,
            scaler: None,
            stream_index,
            width,
            height,
            frame_index: 0,
        })
    }
}

impl FrameSource for FfmpegCamera {
    fn open(&mut self) -> Result<CaptureInfo, CaptureError> {
        let camera = self.open_device().map_err(|reason| CaptureError::Open {
            device: self.describe(),
            reason,
        })?;
        let info = CaptureInfo {
            width: camera.width,
            height: camera.height,
        };
        log::info!(
            "Opened camera {} ({}x{})",
            self.describe(),
            info.width,
            info.height
        );
        self.state = Some(camera);
        Ok(info)
    }

    fn read_frame(&mut self) -> Result<Option<Frame>, CaptureError> {
        let camera = self.state.as_mut().ok_or(CaptureError::NotOpen)?;
        camera.next_frame()
    }

    fn release(&mut self) {
        if self.state.take().is_some() {
            log::info!("Released camera {}", self.describe());
        }
    }
}

impl Drop for FfmpegCamera {
    fn drop(&mut self) {
        self.release();
    }
}

impl OpenCamera {
    fn next_frame(&mut self) -> Result<Option<Frame>, CaptureError> {
        loop {
            if let Some(frame) = self.try_receive()? {
                return Ok(Some(frame));
            }

            let Some((stream, packet)) = self.input.packets().next() else {
                return Ok(None);
            };
            if stream.index() != self.stream_index {
                continue;
            }
            // corrupt packets from a live device are dropped, not fatal
            if let Err(e) = self.decoder.send_packet(&packet) {
                log::debug!("Dropping undecodable camera packet: {e}");
            }
        }
    }

    fn try_receive(&mut self) -> Result<Option<Frame>, CaptureError> {
        let mut decoded = ffmpeg_next::util::frame::video::Video::empty();
        if self.decoder.receive_frame(&mut decoded).is_err() {
            return Ok(None);
        }

        if self.scaler.is_none() {
            let scaler = ffmpeg_next::software::scaling::Context::get(
                decoded.format(),
                decoded.width(),
                decoded.height(),
                ffmpeg_next::format::Pixel::RGB24,
                self.width,
                self.height,
                ffmpeg_next::software::scaling::Flags::BILINEAR,
            )
            .map_err(|e| CaptureError::Read(e.to_string()))?;
            self.scaler = Some(scaler);
        }
        let Some(scaler) = self.scaler.as_mut() else {
            return Ok(None);
        };

        let mut rgb_frame = ffmpeg_next::util::frame::video::Video::empty();
        scaler
            .run(&decoded, &mut rgb_frame)
            .map_err(|e| CaptureError::Read(e.to_string()))?;

        let pixels = extract_rgb_pixels(&rgb_frame, self.width, self.height);
        let frame = Frame::new(pixels, self.width, self.height, self.frame_index);
        self.frame_index += 1;
        Ok(Some(frame))
    }
}

/// Copies an RGB24 ffmpeg frame into a tightly packed buffer.
///
/// ffmpeg rows may carry padding (stride > width * 3); it is stripped here.
fn extract_rgb_pixels(
    rgb_frame: &ffmpeg_next::util::frame::video::Video,
    width: u32,
    height: u32,
) -> Vec<u8> {
    pack_rows(rgb_frame.data(0), rgb_frame.stride(0), width, height)
}

fn pack_rows(data: &[u8], stride: usize, width: u32, height: u32) -> Vec<u8> {
    let row_bytes = width as usize * 3;
    let mut pixels = Vec::with_capacity(row_bytes * height as usize);
    for row in 0..height as usize {
        let row_start = row * stride;
        pixels.extend_from_slice(&data[row_start..row_start + row_bytes]);
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(target_os = "linux")]
    #[test]
    fn test_device_spec_uses_v4l2_index() {
        let spec = device_spec(2, None).unwrap();
        assert_eq!(spec.format, "v4l2");
        assert_eq!(spec.url, "/dev/video2");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_device_overrides_index() {
        let spec = device_spec(0, Some("/dev/v4l/by-id/usb-cam")).unwrap();
        assert_eq!(spec.url, "/dev/v4l/by-id/usb-cam");
    }

    #[cfg(target_os = "macos")]
    #[test]
    fn test_device_spec_uses_avfoundation_index() {
        let spec = device_spec(1, None).unwrap();
        assert_eq!(spec.format, "avfoundation");
        assert_eq!(spec.url, "1");
    }

    #[cfg(target_os = "windows")]
    #[test]
    fn test_dshow_requires_device_name() {
        assert!(device_spec(0, None).is_err());
        let spec = device_spec(0, Some("Integrated Camera")).unwrap();
        assert_eq!(spec.url, "video=Integrated Camera");
    }

    #[test]
    fn test_pack_rows_strips_padding() {
        // 2x2 RGB with 2 bytes of row padding
        let data = [
            1, 2, 3, 4, 5, 6, 0, 0, //
            7, 8, 9, 10, 11, 12, 0, 0,
        ];
        let packed = pack_rows(&data, 8, 2, 2);
        assert_eq!(packed, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
    }

    #[test]
    fn test_read_before_open_is_error() {
        let mut camera = FfmpegCamera::new(0, None);
        assert!(matches!(camera.read_frame(), Err(CaptureError::NotOpen)));
    }

    #[test]
    fn test_release_without_open_is_noop() {
        let mut camera = FfmpegCamera::new(0, None);
        camera.release();
        camera.release();
        assert!(!camera.is_open());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_open_missing_device_fails() {
        let mut camera = FfmpegCamera::new(0, Some("/dev/video-does-not-exist".into()));
        let err = camera.open().unwrap_err();
        assert!(matches!(err, CaptureError::Open { .. }));
        assert!(err.to_string().contains("/dev/video-does-not-exist"));
        assert!(!camera.is_open());
    }
}
