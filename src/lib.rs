pub mod assets;
pub mod compute;
pub mod config;
pub mod display;
pub mod entities;
pub mod input;
pub mod session;
pub mod share;
