pub mod analysis;
pub mod analytics;
pub mod analyze;
pub mod badge;
pub mod health;
pub mod upload;
