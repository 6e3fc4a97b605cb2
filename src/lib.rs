pub mod error;
pub mod manifest;
pub mod report;
pub mod rules;
pub mod validation;
