pub mod traits;

// API provider implementations
pub mod alphavantage;
pub mod openai;
