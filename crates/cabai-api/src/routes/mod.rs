//! # Route Modules

pub mod verify;
