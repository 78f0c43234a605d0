// Engine orchestration: the one-shot load lifecycle and content rendering.

pub mod loader;
pub mod render;
