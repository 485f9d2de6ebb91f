pub mod config;
pub mod exercise;
pub mod folder;
pub mod routine;
pub mod stats;
pub mod workout;
