pub mod analytics;
pub mod dashboard;
pub mod layout;
pub mod results;
pub mod text;
