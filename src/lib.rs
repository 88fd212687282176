pub mod auth;
pub mod cli;
pub mod constants;
pub mod ecr;
pub mod policy;
pub mod registry;
pub mod service;

pub use anyhow::Result;
