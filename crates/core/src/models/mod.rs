pub mod analytics;
pub mod insights;
pub mod position;
pub mod quote;
pub mod seed;
pub mod settings;
pub mod spending;
