pub mod generator;
pub mod openai;
