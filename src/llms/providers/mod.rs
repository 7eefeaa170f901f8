//! Network inference providers.
//!
//! | Provider | Module |
//! |----------|--------|
//! | OpenAI-compatible chat completions (OpenAI, llama.cpp, vLLM, Ollama) | [`openai`] |

pub mod openai;
