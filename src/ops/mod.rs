//! Image operations for the synthesis pipeline
//!
//! Each module implements one pipeline stage as pure functions over image
//! buffers. Randomized parameters are drawn by the caller and passed in,
//! so every operation here is deterministic and testable in isolation.

pub mod augment;
pub mod background;
pub mod compose;
pub mod crop;
pub mod letterbox;
pub mod resize;
pub mod trimap;
