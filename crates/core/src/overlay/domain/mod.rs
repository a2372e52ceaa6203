pub mod face_annotation;
pub mod frame_annotator;
pub mod overlay_style;
