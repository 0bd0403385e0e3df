pub mod hunter;
pub mod resume;
