//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Fixed-interval tickers
//! - Keyboard listeners
//! - Game-over notification

use std::time::Duration;

use thiserror::Error;

pub mod headless;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use headless::{HeadlessHost, HostLedger};
#[cfg(target_arch = "wasm32")]
pub use web::WebHost;

/// Handle to a registered fixed-interval ticker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickerHandle(pub i32);

/// Handle to a registered keyboard listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyListenerHandle(pub u32);

/// Registration failures reported by a host
#[derive(Debug, Error)]
pub enum HostError {
    #[error("failed to start ticker: {0}")]
    Ticker(String),
    #[error("failed to attach key listener: {0}")]
    KeyListener(String),
}

/// Runtime services the game loop engine needs from its environment
///
/// Ticker callbacks and key events must be delivered on the engine's own
/// thread and never overlap each other.
pub trait Host {
    /// Start calling the engine's tick every `period`
    fn start_ticker(&mut self, period: Duration) -> Result<TickerHandle, HostError>;
    /// Cancel a ticker; unknown handles are ignored
    fn stop_ticker(&mut self, handle: TickerHandle);
    /// Start forwarding key presses to the engine
    fn attach_keys(&mut self) -> Result<KeyListenerHandle, HostError>;
    /// Stop forwarding key presses; unknown handles are ignored
    fn detach_keys(&mut self, handle: KeyListenerHandle);
    /// Tell the player the run is over
    fn game_over(&mut self, score: u64);
}
