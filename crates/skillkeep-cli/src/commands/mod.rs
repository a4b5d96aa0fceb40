//! Command handlers

pub mod config;
pub mod skill;
pub mod version;
