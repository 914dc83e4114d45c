//! Headless host for native runs and tests
//!
//! Nothing fires on its own: the owner drives ticks by calling the engine
//! directly. The host only keeps a ledger of what is registered.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use std::time::Duration;

use super::{Host, HostError, KeyListenerHandle, TickerHandle};

/// Registration bookkeeping shared between a host and its observers
#[derive(Debug, Default)]
pub struct HostLedger {
    pub active_tickers: HashSet<TickerHandle>,
    pub active_listeners: HashSet<KeyListenerHandle>,
    /// Final scores delivered through `game_over`, in order
    pub game_overs: Vec<u64>,
    /// Releases of handles that were not registered
    pub stray_releases: u32,
    /// Period requested by the most recent ticker
    pub last_period: Option<Duration>,
    /// Fail the next ticker registration (for error path tests)
    pub fail_next_ticker: bool,
    next_ticker: i32,
    next_listener: u32,
}

impl HostLedger {
    pub fn is_idle(&self) -> bool {
        self.active_tickers.is_empty() && self.active_listeners.is_empty()
    }
}

/// Host that records registrations without a real event loop
#[derive(Debug, Clone, Default)]
pub struct HeadlessHost {
    ledger: Rc<RefCell<HostLedger>>,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared view of the ledger; stays valid after the host is dropped
    pub fn ledger(&self) -> Rc<RefCell<HostLedger>> {
        Rc::clone(&self.ledger)
    }
}

impl Host for HeadlessHost {
    fn start_ticker(&mut self, period: Duration) -> Result<TickerHandle, HostError> {
        let mut ledger = self.ledger.borrow_mut();
        if ledger.fail_next_ticker {
            ledger.fail_next_ticker = false;
            return Err(HostError::Ticker("ticker registration refused".into()));
        }
        ledger.next_ticker += 1;
        let handle = TickerHandle(ledger.next_ticker);
        ledger.active_tickers.insert(handle);
        ledger.last_period = Some(period);
        Ok(handle)
    }

    fn stop_ticker(&mut self, handle: TickerHandle) {
        let mut ledger = self.ledger.borrow_mut();
        if !ledger.active_tickers.remove(&handle) {
            log::warn!("Stopping unknown ticker {:?}", handle);
            ledger.stray_releases += 1;
        }
    }

    fn attach_keys(&mut self) -> Result<KeyListenerHandle, HostError> {
        let mut ledger = self.ledger.borrow_mut();
        ledger.next_listener += 1;
        let handle = KeyListenerHandle(ledger.next_listener);
        ledger.active_listeners.insert(handle);
        Ok(handle)
    }

    fn detach_keys(&mut self, handle: KeyListenerHandle) {
        let mut ledger = self.ledger.borrow_mut();
        if !ledger.active_listeners.remove(&handle) {
            log::warn!("Detaching unknown key listener {:?}", handle);
            ledger.stray_releases += 1;
        }
    }

    fn game_over(&mut self, score: u64) {
        log::info!("Game Over! Your score: {}", score);
        self.ledger.borrow_mut().game_overs.push(score);
    }
}
