// src/handlers/mod.rs

pub mod admin;
pub mod event;
pub mod home;
pub mod quiz;
pub mod result;
