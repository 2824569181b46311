#![deny(clippy::mod_module_files)]
//! Campus parking companion: an interactive campus map with building
//! markers, live lot occupancy polled from the occupancy backend, and the
//! campus parking-map document.

pub mod api;
pub mod app;
pub mod buildings;
pub mod config;
pub mod error;
pub mod map;
pub mod occupancy;
pub mod routes;
pub mod screens;
