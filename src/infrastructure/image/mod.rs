//! Image generation providers

mod openai;

pub use openai::{OpenAiImageProvider, DEFAULT_IMAGE_MODEL, DEFAULT_IMAGE_SIZE};
