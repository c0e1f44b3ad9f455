pub mod huggingface;
pub mod ollama;
pub mod openai;
