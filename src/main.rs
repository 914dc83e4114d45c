//! Road Dodge entry point
//!
//! Web: builds the play field in the DOM and drives the engine from
//! `setInterval`. Native: runs a headless autopilot session.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlElement, KeyboardEvent};

    use road_dodge::highscores::now_millis;
    use road_dodge::platform::WebHost;
    use road_dodge::platform::web::{key_closure, tick_closure};
    use road_dodge::sim::{SeededSpawner, TickOutcome};
    use road_dodge::view::Frame;
    use road_dodge::{Engine, HighScores, Settings};

    const FIELD_STYLE: &str = "position:relative;background:#1f2937;aspect-ratio:16/9;\
        border-radius:0.5rem;overflow:hidden;max-width:28rem;margin:0 auto;";
    const CAR_STYLE: &str = "position:absolute;bottom:1rem;width:2rem;height:3rem;\
        font-size:2rem;line-height:3rem;";
    const OVERLAY_STYLE: &str = "position:absolute;inset:0;display:flex;\
        align-items:center;justify-content:center;";

    /// Elements the renderer updates
    struct DomView {
        car: HtmlElement,
        trees: Element,
        overlay: HtmlElement,
        score: Element,
        best: Element,
        banner: Element,
        hint: Element,
        keys_toggle: Element,
    }

    impl DomView {
        fn build(document: &Document, settings: &Settings) -> Result<Self, JsValue> {
            let root = match document.get_element_by_id("road-dodge") {
                Some(root) => root,
                None => {
                    let root = document.create_element("div")?;
                    root.set_id("road-dodge");
                    document
                        .body()
                        .ok_or_else(|| JsValue::from_str("no body"))?
                        .append_child(&root)?;
                    root
                }
            };

            let field = document.create_element("div")?;
            field.set_attribute("style", FIELD_STYLE)?;

            let car: HtmlElement = document.create_element("div")?.dyn_into()?;
            let car_style = if settings.reduced_motion {
                CAR_STYLE.to_string()
            } else {
                format!("{}transition:left 120ms ease-out;", CAR_STYLE)
            };
            car.set_attribute("style", &car_style)?;
            car.set_text_content(Some("🚗"));

            let trees = document.create_element("div")?;
            trees.set_attribute("style", "position:absolute;inset:0;")?;

            let overlay: HtmlElement = document.create_element("div")?.dyn_into()?;
            overlay.set_attribute("style", OVERLAY_STYLE)?;
            let button = document.create_element("button")?;
            button.set_id("road-dodge-start");
            button.set_text_content(Some("Start Game"));
            overlay.append_child(&button)?;

            field.append_child(&trees)?;
            field.append_child(&car)?;
            field.append_child(&overlay)?;

            let footer = document.create_element("div")?;
            footer.set_attribute("style", "margin-top:1rem;text-align:center;")?;
            let score = document.create_element("p")?;
            let best = document.create_element("p")?;
            let banner = document.create_element("p")?;
            banner.set_attribute("class", "hidden")?;
            footer.append_child(&score)?;
            footer.append_child(&best)?;
            footer.append_child(&banner)?;
            let hint = document.create_element("p")?;
            if !settings.show_hint {
                hint.set_attribute("hidden", "")?;
            }
            footer.append_child(&hint)?;
            let keys_toggle = document.create_element("button")?;
            keys_toggle.set_id("road-dodge-keys");
            footer.append_child(&keys_toggle)?;

            root.append_child(&field)?;
            root.append_child(&footer)?;

            Ok(Self {
                car,
                trees,
                overlay,
                score,
                best,
                banner,
                hint,
                keys_toggle,
            })
        }

        fn show_controls(&self, settings: &Settings) {
            self.hint.set_text_content(Some(settings.hint_text()));
            let label = if settings.alternate_keys {
                "A/D keys: on"
            } else {
                "A/D keys: off"
            };
            self.keys_toggle.set_text_content(Some(label));
        }

        fn render(&self, frame: &Frame, best: Option<u64>) {
            let style = self.car.style();
            let _ = style.set_property("left", &format!("{}%", frame.player_x));
            let _ = style.set_property("display", if frame.running { "block" } else { "none" });
            let _ = self
                .overlay
                .style()
                .set_property("display", if frame.running { "none" } else { "flex" });

            let trees: String = if frame.running {
                frame
                    .obstacles
                    .iter()
                    .map(|o| {
                        format!(
                            "<div data-id=\"{}\" style=\"position:absolute;left:{}%;top:{}%;\
                             width:1.5rem;height:1.5rem;\">🌲</div>",
                            o.id, o.x, o.y
                        )
                    })
                    .collect()
            } else {
                String::new()
            };
            self.trees.set_inner_html(&trees);

            self.score.set_text_content(Some(&frame.status_line()));
            if let Some(best) = best {
                self.best.set_text_content(Some(&format!("Best: {}", best)));
            }
        }
    }

    /// Game instance holding all state
    struct Game {
        engine: Engine<WebHost, SeededSpawner>,
        view: DomView,
        scores: HighScores,
        settings: Settings,
        seed: u64,
    }

    impl Game {
        fn start(&mut self) {
            self.view.banner.set_attribute("class", "hidden").ok();
            self.view.banner.set_text_content(None);
            if let Err(e) = self.engine.start() {
                log::error!("Failed to start: {}", e);
            }
            self.render();
        }

        fn tick(&mut self) {
            if let TickOutcome::Crashed { score } = self.engine.on_tick() {
                if let Some(rank) = self.scores.record(score, self.seed, now_millis()) {
                    log::info!("New high score #{}: {}", rank, score);
                    self.scores.save();
                }
            }
            self.render();
        }

        fn key(&mut self, key: &str) -> bool {
            let consumed = self.engine.handle_key(key);
            if consumed {
                self.render();
            }
            consumed
        }

        /// Flip A/D steering and persist the choice
        fn toggle_alternate_keys(&mut self) {
            self.settings.alternate_keys = !self.settings.alternate_keys;
            self.settings.save();
            self.engine.set_keymap(self.settings.keymap());
            self.view.show_controls(&self.settings);
        }

        fn render(&self) {
            self.view.render(&self.engine.frame(), self.scores.top_score());
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("road-dodge-start") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().start();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("road-dodge-keys") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().toggle_alternate_keys();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Road Dodge starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let settings = Settings::load();
        let view = DomView::build(&document, &settings)?;
        let scores = HighScores::load();
        let seed = js_sys::Date::now() as u64;

        // Callbacks hold a weak reference so the game can own its host
        let game = Rc::new_cyclic(|weak: &Weak<RefCell<Game>>| {
            let on_tick = {
                let weak = weak.clone();
                tick_closure(move || {
                    if let Some(game) = weak.upgrade() {
                        game.borrow_mut().tick();
                    }
                })
            };
            let on_key = {
                let weak = weak.clone();
                key_closure(move |event: KeyboardEvent| {
                    if let Some(game) = weak.upgrade() {
                        if game.borrow_mut().key(&event.key()) {
                            event.prevent_default();
                        }
                    }
                })
            };

            let mut host = WebHost::new(window, on_tick, on_key);
            if !settings.blocking_alert {
                host.set_banner(Some(view.banner.clone()));
            }
            let engine =
                Engine::new(host, SeededSpawner::new(seed)).with_keymap(settings.keymap());

            view.show_controls(&settings);
            RefCell::new(Game {
                engine,
                view,
                scores,
                settings,
                seed,
            })
        });
        log::info!("Game initialized with seed: {}", seed);

        game.borrow().render();
        setup_buttons(&document, Rc::clone(&game));

        log::info!("Road Dodge ready");
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_game::run() {
        log::error!("Failed to start Road Dodge: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::time::Duration;

    use road_dodge::consts::TICK_INTERVAL_MS;
    use road_dodge::highscores::now_millis;
    use road_dodge::platform::HeadlessHost;
    use road_dodge::sim::autopilot::choose_steer;
    use road_dodge::sim::{SeededSpawner, TickOutcome};
    use road_dodge::settings::SettingsError;
    use road_dodge::{Engine, HighScores, Settings};

    /// Command line options
    #[derive(Debug)]
    pub struct Options {
        pub seed: u64,
        pub max_ticks: u64,
        pub realtime: bool,
        /// `name=value` settings to persist before running
        pub assignments: Vec<String>,
    }

    impl Options {
        pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, String> {
            let mut options = Options {
                seed: now_millis() as u64,
                max_ticks: 20 * 60 * 5,
                realtime: false,
                assignments: Vec::new(),
            };
            let mut args = args.into_iter();
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--max-ticks" => {
                        let value = args.next().ok_or("--max-ticks needs a value")?;
                        options.max_ticks = value
                            .parse()
                            .map_err(|_| format!("invalid tick count: {}", value))?;
                    }
                    "--realtime" => options.realtime = true,
                    "--set" => {
                        let value = args.next().ok_or("--set needs name=value")?;
                        options.assignments.push(value);
                    }
                    other => {
                        options.seed = other
                            .parse()
                            .map_err(|_| format!("invalid seed: {}", other))?;
                    }
                }
            }
            Ok(options)
        }
    }

    /// Run one autopilot session; returns the final score
    pub fn run(options: &Options) -> u64 {
        let host = HeadlessHost::new();
        let ledger = host.ledger();
        let mut engine = Engine::new(host, SeededSpawner::new(options.seed));

        if let Err(e) = engine.start() {
            log::error!("Could not start: {}", e);
            return 0;
        }

        let mut crashed = false;
        for _ in 0..options.max_ticks {
            if let Some(command) = choose_steer(engine.state()) {
                engine.steer(command);
            }
            if let TickOutcome::Crashed { .. } = engine.on_tick() {
                crashed = true;
                break;
            }
            if options.realtime {
                std::thread::sleep(Duration::from_millis(TICK_INTERVAL_MS));
            }
        }

        let score = engine.state().score;
        if !crashed {
            log::info!("Tick limit reached, stopping at score {}", score);
            engine.stop();
        }
        drop(engine);
        debug_assert!(ledger.borrow().is_idle());
        score
    }

    /// Persist `--set` assignments; nothing is saved if any is invalid
    pub fn apply_settings(assignments: &[String]) -> Result<(), SettingsError> {
        if assignments.is_empty() {
            return Ok(());
        }
        let mut settings = Settings::load();
        for assignment in assignments {
            settings.assign(assignment)?;
        }
        settings.save();
        Ok(())
    }

    pub fn record(score: u64, seed: u64) {
        let mut scores = HighScores::load();
        match scores.record(score, seed, now_millis()) {
            Some(rank) => {
                log::info!("New high score #{}: {}", rank, score);
                scores.save();
            }
            None => log::info!("Score {} did not make the leaderboard", score),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn parse(args: &[&str]) -> Result<Options, String> {
            Options::parse(args.iter().map(|a| a.to_string()))
        }

        #[test]
        fn test_parse_options() {
            let options = parse(&["42", "--max-ticks", "100", "--set", "alternate_keys=on"]).unwrap();
            assert_eq!(options.seed, 42);
            assert_eq!(options.max_ticks, 100);
            assert!(!options.realtime);
            assert_eq!(options.assignments, vec!["alternate_keys=on".to_string()]);
        }

        #[test]
        fn test_parse_rejects_missing_values() {
            assert!(parse(&["--set"]).is_err());
            assert!(parse(&["--max-ticks", "lots"]).is_err());
            assert!(parse(&["not-a-seed"]).is_err());
        }

        #[test]
        fn test_bounded_session_releases_host() {
            let options = parse(&["5", "--max-ticks", "30"]).unwrap();
            let score = run(&options);
            assert!(score >= 1 && score <= 30);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Road Dodge (native, headless autopilot) starting...");

    let options = match native::Options::parse(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("usage: road-dodge [seed] [--max-ticks N] [--realtime] [--set name=value]...");
            std::process::exit(2);
        }
    };

    if let Err(e) = native::apply_settings(&options.assignments) {
        log::error!("{}", e);
        std::process::exit(2);
    }

    log::info!("Seed: {}", options.seed);
    let score = native::run(&options);
    println!("Final score: {}", score);
    native::record(score, options.seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
