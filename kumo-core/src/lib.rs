//! Kumo Core — Ichimoku engine, price data layer, and ticker directory resolver.
//!
//! This crate contains everything below the display surface:
//! - Domain types (daily price bars, ticker records)
//! - The Ichimoku Kinko Hyo indicator engine
//! - Price data providers, flat-file caching, and download orchestration
//! - The index constituent directory resolver with its fallback tables

pub mod config;
pub mod data;
pub mod directory;
pub mod domain;
pub mod indicators;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: types crossing the TUI boundary are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::PriceBar>();
        require_sync::<domain::PriceBar>();
        require_send::<indicators::IchimokuFrame>();
        require_sync::<indicators::IchimokuFrame>();
        require_send::<indicators::CloudBias>();
        require_sync::<indicators::CloudBias>();
        require_send::<directory::TickerRecord>();
        require_sync::<directory::TickerRecord>();
        require_send::<directory::TickerDirectory>();
        require_sync::<directory::TickerDirectory>();
        require_send::<directory::IndexKind>();
        require_sync::<directory::IndexKind>();
        require_send::<data::DataError>();
        require_sync::<data::DataError>();
    }
}
