// src/services/mod.rs

pub mod grading;
pub mod results;
pub mod submission;
