// Application layer - Use cases behind repository traits
pub mod dashboard_service;
pub mod station_repository;
pub mod station_service;
