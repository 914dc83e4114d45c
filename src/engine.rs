//! Game loop engine
//!
//! Owns the `GameState`, the spawn source and the host. The ticker and key
//! listener are acquired together when a run starts and released on every
//! way out: crash, explicit stop, or drop.

use std::time::Duration;

use crate::consts::TICK_INTERVAL_MS;
use crate::platform::{Host, HostError, KeyListenerHandle, TickerHandle};
use crate::sim::{GamePhase, GameState, Keymap, SpawnSource, Steer, TickOutcome};
use crate::view::Frame;

/// Host registrations held for the duration of one run
#[derive(Debug)]
struct RunResources {
    ticker: TickerHandle,
    keys: KeyListenerHandle,
}

/// The game loop engine
pub struct Engine<H: Host, S: SpawnSource> {
    state: GameState,
    host: H,
    spawner: S,
    keymap: Keymap,
    resources: Option<RunResources>,
}

impl<H: Host, S: SpawnSource> Engine<H, S> {
    pub fn new(host: H, spawner: S) -> Self {
        Self {
            state: GameState::new(),
            host,
            spawner,
            keymap: Keymap::default(),
            resources: None,
        }
    }

    pub fn with_keymap(mut self, keymap: Keymap) -> Self {
        self.keymap = keymap;
        self
    }

    pub fn set_keymap(&mut self, keymap: Keymap) {
        self.keymap = keymap;
    }

    /// Read-only view of the current state
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn is_running(&self) -> bool {
        self.state.running()
    }

    /// Snapshot for the presentation layer
    pub fn frame(&self) -> Frame {
        Frame::capture(&self.state)
    }

    /// Start a new run (no-op while already running)
    pub fn start(&mut self) -> Result<(), HostError> {
        if self.state.running() {
            log::debug!("Start ignored: already running");
            return Ok(());
        }

        let keys = self.host.attach_keys()?;
        let ticker = match self
            .host
            .start_ticker(Duration::from_millis(TICK_INTERVAL_MS))
        {
            Ok(ticker) => ticker,
            Err(e) => {
                self.host.detach_keys(keys);
                log::error!("Could not start game loop: {}", e);
                return Err(e);
            }
        };

        self.resources = Some(RunResources { ticker, keys });
        self.state.begin_run();
        log::info!("Run started");
        Ok(())
    }

    /// Advance one tick; called by the host's ticker
    pub fn on_tick(&mut self) -> TickOutcome {
        let outcome = crate::sim::tick(&mut self.state, &mut self.spawner);
        if let TickOutcome::Crashed { score } = outcome {
            self.release();
            log::info!("Run ended after {} ticks", self.state.time_ticks);
            self.host.game_over(score);
        }
        outcome
    }

    /// Handle a raw key name; returns true if it was a steering key
    pub fn handle_key(&mut self, key: &str) -> bool {
        match self.keymap.steer_for(key) {
            Some(command) => {
                self.steer(command);
                true
            }
            None => false,
        }
    }

    /// Apply a steering command (ignored unless running)
    pub fn steer(&mut self, command: Steer) {
        if self.state.running() {
            crate::sim::steer(&mut self.state, command);
        }
    }

    /// Forced teardown without a game-over notice. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if self.state.running() {
            log::info!("Run stopped at score {}", self.state.score);
        }
        self.state.phase = GamePhase::Stopped;
        self.release();
    }

    fn release(&mut self) {
        if let Some(resources) = self.resources.take() {
            self.host.stop_ticker(resources.ticker);
            self.host.detach_keys(resources.keys);
        }
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}

impl<H: Host, S: SpawnSource> Drop for Engine<H, S> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::HeadlessHost;
    use crate::sim::{NoSpawn, SeededSpawner};

    fn engine() -> Engine<HeadlessHost, NoSpawn> {
        Engine::new(HeadlessHost::new(), NoSpawn)
    }

    #[test]
    fn test_start_registers_one_ticker_and_listener() {
        let mut engine = engine();
        let ledger = engine.host().ledger();
        assert!(ledger.borrow().is_idle());

        engine.start().unwrap();
        assert!(engine.is_running());
        assert_eq!(ledger.borrow().active_tickers.len(), 1);
        assert_eq!(ledger.borrow().active_listeners.len(), 1);
        assert_eq!(
            ledger.borrow().last_period,
            Some(Duration::from_millis(50))
        );

        // Second start while running must not register again
        engine.start().unwrap();
        assert_eq!(ledger.borrow().active_tickers.len(), 1);
        assert_eq!(ledger.borrow().active_listeners.len(), 1);
    }

    #[test]
    fn test_reference_run_crashes_at_27() {
        let mut engine = engine();
        let ledger = engine.host().ledger();
        engine.start().unwrap();
        engine.state_mut().spawn_obstacle(50.0, 0.0);

        for _ in 0..26 {
            assert_eq!(engine.on_tick(), TickOutcome::Advanced);
        }
        assert_eq!(engine.on_tick(), TickOutcome::Crashed { score: 27 });

        assert!(!engine.is_running());
        assert_eq!(engine.state().score, 27);
        assert_eq!(engine.state().obstacles[0].pos.y, 81.0);
        assert_eq!(engine.state().player_x, 50.0);

        let ledger = ledger.borrow();
        assert!(ledger.is_idle());
        assert_eq!(ledger.game_overs, vec![27]);
        assert_eq!(ledger.stray_releases, 0);
    }

    #[test]
    fn test_score_frozen_after_crash() {
        let mut engine = engine();
        engine.start().unwrap();
        engine.state_mut().spawn_obstacle(51.0, 88.0);
        assert_eq!(engine.on_tick(), TickOutcome::Crashed { score: 1 });

        for _ in 0..5 {
            assert_eq!(engine.on_tick(), TickOutcome::Idle);
        }
        assert_eq!(engine.state().score, 1);
        assert_eq!(engine.host().ledger().borrow().game_overs.len(), 1);
    }

    #[test]
    fn test_keys_ignored_when_stopped() {
        let mut engine = engine();
        assert!(engine.handle_key("ArrowLeft"));
        assert_eq!(engine.state().player_x, 50.0);

        engine.start().unwrap();
        assert!(engine.handle_key("ArrowLeft"));
        assert_eq!(engine.state().player_x, 45.0);
        assert!(!engine.handle_key("Enter"));
        assert_eq!(engine.state().player_x, 45.0);
    }

    #[test]
    fn test_restart_resets_state() {
        let mut engine = engine();
        engine.start().unwrap();
        engine.handle_key("ArrowRight");
        engine.state_mut().spawn_obstacle(55.0, 85.0);
        assert!(matches!(engine.on_tick(), TickOutcome::Crashed { .. }));

        engine.start().unwrap();
        let state = engine.state();
        assert!(state.running());
        assert_eq!(state.score, 0);
        assert_eq!(state.player_x, 50.0);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut engine = engine();
        let ledger = engine.host().ledger();
        engine.start().unwrap();

        engine.stop();
        engine.stop();
        let ledger = ledger.borrow();
        assert!(ledger.is_idle());
        assert_eq!(ledger.stray_releases, 0);
        assert!(ledger.game_overs.is_empty());
    }

    #[test]
    fn test_drop_releases_resources() {
        let mut engine = engine();
        let ledger = engine.host().ledger();
        engine.start().unwrap();
        engine.stop();
        drop(engine);

        assert!(ledger.borrow().is_idle());
        assert_eq!(ledger.borrow().stray_releases, 0);
    }

    #[test]
    fn test_drop_while_running_releases_resources() {
        let mut engine = Engine::new(HeadlessHost::new(), SeededSpawner::new(3));
        let ledger = engine.host().ledger();
        engine.start().unwrap();
        engine.on_tick();
        drop(engine);

        assert!(ledger.borrow().is_idle());
        assert!(ledger.borrow().game_overs.is_empty());
    }

    #[test]
    fn test_failed_ticker_rolls_back_listener() {
        let mut engine = engine();
        let ledger = engine.host().ledger();
        ledger.borrow_mut().fail_next_ticker = true;

        assert!(engine.start().is_err());
        assert!(!engine.is_running());
        assert!(ledger.borrow().is_idle());

        engine.start().unwrap();
        assert!(engine.is_running());
    }

    #[test]
    fn test_alternate_keymap() {
        let mut engine = engine().with_keymap(Keymap {
            alternate_keys: true,
        });
        engine.start().unwrap();
        assert!(engine.handle_key("d"));
        assert_eq!(engine.state().player_x, 55.0);
    }

    #[test]
    fn test_keymap_swapped_mid_run() {
        let mut engine = engine();
        engine.start().unwrap();
        assert!(!engine.handle_key("a"));

        engine.set_keymap(Keymap {
            alternate_keys: true,
        });
        assert!(engine.handle_key("a"));
        assert_eq!(engine.state().player_x, 45.0);
        assert!(engine.is_running());
    }
}
