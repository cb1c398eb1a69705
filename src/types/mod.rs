//! Core types for Relista.

pub mod annotation;
pub mod generation;
pub mod message;
pub mod stream;

pub use annotation::*;
pub use generation::*;
pub use message::*;
pub use stream::*;
