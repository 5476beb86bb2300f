mod client_utils;
mod diagnosis;
mod errors;
mod image;
mod normalizer;

pub mod chat;
pub mod resolver;
pub mod vision;

pub use diagnosis::*;
pub use errors::*;
pub use image::ImageData;
pub use normalizer::normalize;
