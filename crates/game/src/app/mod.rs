pub(crate) mod bootstrap;
mod config;
mod error;
mod gameplay;
pub(crate) mod loop_runner;
