//! Instruction handlers

pub mod admin;
pub mod group;
pub mod player;

pub use admin::*;
