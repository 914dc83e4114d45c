//! Browser host: `setInterval` ticker and a window `keydown` listener
//!
//! Both callbacks are created once by the front-end and live as long as the
//! host. Starting and stopping only registers/unregisters them, so a callback
//! is never dropped while it is executing.

use std::collections::HashSet;
use std::time::Duration;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, KeyboardEvent, Window};

use super::{Host, HostError, KeyListenerHandle, TickerHandle};
use crate::view::game_over_message;

pub struct WebHost {
    window: Window,
    on_tick: Closure<dyn FnMut()>,
    on_key: Closure<dyn FnMut(KeyboardEvent)>,
    tickers: HashSet<TickerHandle>,
    listener: Option<KeyListenerHandle>,
    next_listener: u32,
    /// Inline game-over banner; `None` means use `window.alert`
    banner: Option<Element>,
}

impl WebHost {
    pub fn new(
        window: Window,
        on_tick: Closure<dyn FnMut()>,
        on_key: Closure<dyn FnMut(KeyboardEvent)>,
    ) -> Self {
        Self {
            window,
            on_tick,
            on_key,
            tickers: HashSet::new(),
            listener: None,
            next_listener: 0,
            banner: None,
        }
    }

    /// Show game over inline in `banner` instead of a blocking alert
    pub fn set_banner(&mut self, banner: Option<Element>) {
        self.banner = banner;
    }
}

impl Host for WebHost {
    fn start_ticker(&mut self, period: Duration) -> Result<TickerHandle, HostError> {
        let id = self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                self.on_tick.as_ref().unchecked_ref(),
                period.as_millis() as i32,
            )
            .map_err(|e| HostError::Ticker(format!("{:?}", e)))?;
        let handle = TickerHandle(id);
        self.tickers.insert(handle);
        Ok(handle)
    }

    fn stop_ticker(&mut self, handle: TickerHandle) {
        if self.tickers.remove(&handle) {
            self.window.clear_interval_with_handle(handle.0);
        } else {
            log::warn!("Stopping unknown ticker {:?}", handle);
        }
    }

    fn attach_keys(&mut self) -> Result<KeyListenerHandle, HostError> {
        if let Some(handle) = self.listener {
            return Ok(handle);
        }
        self.window
            .add_event_listener_with_callback("keydown", self.on_key.as_ref().unchecked_ref())
            .map_err(|e| HostError::KeyListener(format!("{:?}", e)))?;
        self.next_listener += 1;
        let handle = KeyListenerHandle(self.next_listener);
        self.listener = Some(handle);
        Ok(handle)
    }

    fn detach_keys(&mut self, handle: KeyListenerHandle) {
        if self.listener != Some(handle) {
            log::warn!("Detaching unknown key listener {:?}", handle);
            return;
        }
        self.listener = None;
        if let Err(e) = self
            .window
            .remove_event_listener_with_callback("keydown", self.on_key.as_ref().unchecked_ref())
        {
            log::warn!("removeEventListener failed: {:?}", e);
        }
    }

    fn game_over(&mut self, score: u64) {
        let message = game_over_message(score);
        log::info!("{}", message);
        match &self.banner {
            Some(banner) => {
                banner.set_text_content(Some(&message));
                let _ = banner.set_attribute("class", "game-over");
            }
            None => {
                let _ = self.window.alert_with_message(&message);
            }
        }
    }
}

impl Drop for WebHost {
    fn drop(&mut self) {
        for handle in self.tickers.drain() {
            self.window.clear_interval_with_handle(handle.0);
        }
        if self.listener.take().is_some() {
            let _ = self
                .window
                .remove_event_listener_with_callback("keydown", self.on_key.as_ref().unchecked_ref());
        }
    }
}

/// Wrap a plain callback for use as a ticker
pub fn tick_closure(f: impl FnMut() + 'static) -> Closure<dyn FnMut()> {
    Closure::<dyn FnMut()>::new(f)
}

/// Wrap a key handler
pub fn key_closure(f: impl FnMut(KeyboardEvent) + 'static) -> Closure<dyn FnMut(KeyboardEvent)> {
    Closure::<dyn FnMut(KeyboardEvent)>::new(f)
}
