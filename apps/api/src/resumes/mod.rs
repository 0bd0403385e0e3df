pub mod handlers;
pub mod service;
pub mod stats;
pub mod validation;
