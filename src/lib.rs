#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;

pub mod aggregate;
pub mod features;
pub mod insights;
pub mod journey;
pub mod logs;
pub mod renderer;
