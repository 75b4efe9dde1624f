// src/models/mod.rs

pub mod event;
pub mod question;
pub mod quiz;
pub mod submission;
