#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod gemini;
pub mod json_file;

pub use gemini::{Gemini, GeminiConfig};
pub use json_file::JsonFile;
