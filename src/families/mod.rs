//! Problem families shipped with the engine.

pub mod factoring;
pub mod helpers;
pub mod sd;
