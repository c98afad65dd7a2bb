//! Core gateway functionality: audio pipeline and backend adapters.

pub mod audio;
pub mod backend;
