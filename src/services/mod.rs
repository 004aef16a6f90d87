pub mod history_service;
pub mod ticker;
