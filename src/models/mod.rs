pub mod history;
pub mod image;
pub mod patient;
pub mod prediction;
pub mod report;

pub use history::*;
pub use image::*;
pub use patient::*;
pub use prediction::*;
pub use report::*;
