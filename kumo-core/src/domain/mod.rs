//! Domain types shared across the engine and the display surfaces.

pub mod bar;

pub use bar::PriceBar;
