//! CLI Commands

pub mod api;
pub mod gui;
