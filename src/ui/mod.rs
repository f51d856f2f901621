//! UI module - widgets shared across the sidebar and output panel

pub mod components;
