pub mod document;
pub mod input;
pub mod sessions;
pub mod transcript;
