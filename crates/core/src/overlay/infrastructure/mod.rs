mod builtin_font;
pub mod overlay_font;
pub mod raster_annotator;
