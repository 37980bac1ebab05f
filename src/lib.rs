pub mod config;
pub mod error;
pub mod itinerary;
pub mod overlap;
pub mod parser;
pub mod types;
