//! Deck composition model, the `.pptx` writer, and the generation engine.

pub mod assemble;
pub mod model;
pub mod pptx;
