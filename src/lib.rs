pub mod filter;
pub mod forms;
pub mod metrics;
pub mod models;
pub mod report;
pub mod store;
pub mod submit;
pub mod validation;
pub mod wizard;
