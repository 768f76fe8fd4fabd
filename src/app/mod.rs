//! Application module: the sharedq soak/demo binary

pub mod cli;
pub mod soak;
pub mod startup;
