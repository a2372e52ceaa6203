pub mod analyzer_factory;
pub mod face_emotion_analyzer;
mod math;
pub mod onnx_blazeface_locator;
pub mod onnx_emotion_classifier;
pub mod onnx_yolo_locator;
