pub const YOLO_MODEL_NAME: &str = "yolo11n-pose_widerface.onnx";
pub const YOLO_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/yolo11n-pose_widerface.onnx";

/// BlazeFace has no published download; it must be bundled or pre-cached.
pub const BLAZEFACE_MODEL_NAME: &str = "blazeface.onnx";

pub const EMOTION_MODEL_NAME: &str = "emotion-ferplus-8.onnx";
pub const EMOTION_MODEL_URL: &str =
    "https://github.com/onnx/models/raw/main/validated/vision/body_analysis/emotion_ferplus/model/emotion-ferplus-8.onnx";

/// Cache directory name under the platform cache root.
pub const APP_DIR_NAME: &str = "EmotionLens";

pub const WINDOW_TITLE: &str = "Emotion Detection";

pub const DEFAULT_FONT_SIZE: f32 = 30.0;

/// Gap between the face box and the label, in pixels.
pub const TEXT_OFFSET: i32 = 5;

pub const BOX_THICKNESS: i32 = 2;

pub const OVERLAY_COLOR: [u8; 3] = [0, 255, 0];

/// How long each iteration waits for the quit key.
pub const QUIT_POLL_MS: u64 = 1;

#[cfg(target_os = "windows")]
pub const DEFAULT_FONT_PATH: &str = "C:/Windows/Fonts/msyh.ttc";
#[cfg(target_os = "macos")]
pub const DEFAULT_FONT_PATH: &str = "/System/Library/Fonts/PingFang.ttc";
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
pub const DEFAULT_FONT_PATH: &str = "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc";
