//! CLI module graph.

pub mod command;
pub mod config;
pub mod detect;
pub mod matches;
pub mod normalize;
pub mod output;
pub mod report;
pub mod setup;
pub mod run;
