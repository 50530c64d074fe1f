//! The light interface, the parameter set lights are committed from,
//! the registry creating lights by name, and the few geometric and
//! color types they need.

pub mod api;
pub mod geometry;
pub mod light;
pub mod paramset;
pub mod pbrt;
pub mod spectrum;
