use wasm_bindgen::prelude::*;

mod animation;
mod bodies;
mod config;
mod controls;
mod game;
mod inspector;
mod scene;

use game::SolarSystem;

orrery_web::export_view!(SolarSystem, "solar-system");
