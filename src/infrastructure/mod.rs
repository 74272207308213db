// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod smartcitizen;
pub mod sun_times;
