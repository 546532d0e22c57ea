pub mod generator;
pub mod metadata;
pub mod transcript;
