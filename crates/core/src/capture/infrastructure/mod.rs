pub mod ffmpeg_camera;
pub mod minifb_display;
