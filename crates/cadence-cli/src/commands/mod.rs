pub mod config;
pub mod energy;
pub mod feedback;
pub mod plan;
