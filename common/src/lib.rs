pub mod config;
pub mod macros;
pub mod network;
pub mod render;
pub mod utils;
