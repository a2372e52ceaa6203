pub mod capture;
pub mod emotion;
pub mod overlay;
pub mod pipeline;
pub mod shared;
