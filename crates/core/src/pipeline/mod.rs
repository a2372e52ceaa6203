pub mod live_annotation_loop;
pub mod pipeline_logger;
