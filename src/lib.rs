//! Eat The Brands core crate.
//!
//! Snake arcade for the fast-fashion thesis site: the player steers a snake
//! across a wrapping grid eating fast-fashion brand logos, and every logo adds
//! to an environmental "impact" counter. The simulation (`game`) is plain
//! Rust; `surface` binds one engine to a canvas in the page and exposes the
//! `GameHandle` the page drives.

use wasm_bindgen::prelude::*;

pub mod audio;
pub mod config;
pub mod error;
pub mod game;
pub mod grid;
pub mod input;
mod logging;
mod surface;

pub use config::{EngineConfig, Variant};
pub use error::{EngineError, SurfaceError};
pub use game::{Engine, Food, Lifecycle, Snapshot, TickOutcome};
pub use grid::{Direction, Grid, Position, compute_grid};
pub use logging::init_logging;
pub use surface::GameHandle;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    init_logging(log::LevelFilter::Info);
}

// -----------------------------------------------------------------------------
// Brand marks eaten as food: display name and logo URL. Food `brand` indices
// point into this table.
// -----------------------------------------------------------------------------

pub const BRANDS: &[(&str, &str)] = &[
    ("Zara", "https://logo.clearbit.com/zara.com"),
    ("H&M", "https://logo.clearbit.com/hm.com"),
    ("Shein", "https://logo.clearbit.com/shein.com"),
    ("ASOS", "https://logo.clearbit.com/asos.com"),
];

/// Display name of a brand index, for the page's game-over summary.
#[wasm_bindgen(js_name = brandName)]
pub fn brand_name(index: usize) -> Option<String> {
    BRANDS.get(index).map(|(name, _)| (*name).to_string())
}
