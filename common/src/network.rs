pub mod classify;
pub mod range;
