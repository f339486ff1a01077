//! Command implementations

pub mod clean;
pub mod docs;
pub mod doctor;
pub mod fmt;
pub mod roots;
pub mod run;
pub mod validate_all;
pub mod version;
