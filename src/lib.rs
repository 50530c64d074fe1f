//! # rs_lights
//!
//! [Rust][rust] crate for the light sources of a ray tracer. A scene
//! creates lights by type name, sets named parameters and commits
//! them; each commit resolves the parameters (with defaults) into
//! typed fields and copies them into a device equivalent, the compact
//! representation the rendering path reads.
//!
//! 1. [light interface][light] and commit lifecycle
//! 2. [parameter set][paramset] with coercing lookups
//! 3. [registry][api] creating lights by name
//! 4. [device][device] equivalents and their backend
//!
//! [rust]: https://www.rust-lang.org
//! [light]: core/light/trait.Light.html
//! [paramset]: core/paramset/struct.ParamSet.html
//! [api]: core/api/struct.LightRegistry.html
//! [device]: device/index.html

pub mod core;
pub mod device;
pub mod lights;
