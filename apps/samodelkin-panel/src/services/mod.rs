pub mod monitoring;
pub mod notification_service;
pub mod simulation_service;
pub mod stats_service;
