//! Sleigh Chase entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlElement, KeyboardEvent};

    use sleigh_chase::consts::*;
    use sleigh_chase::render::{FrameRenderer, FrameUniformsRaw, InstanceBatch};
    use sleigh_chase::sim::{FrameEvents, GamePhase, GameState, TickInput, tick};
    use sleigh_chase::{HudSnapshot, QualityPreset, Settings, clamp_dt};

    // Bridge to the page's WebGL host. Each instance record is 24 words:
    // world[16], color[4], emissive, terrain, primitive id, padding.
    #[wasm_bindgen(inline_js = "
        export function begin_frame(uniforms) {
            if (window.beginFrame) {
                window.beginFrame(new Float32Array(uniforms.buffer, uniforms.byteOffset, uniforms.byteLength / 4));
            }
        }

        export function draw_batch(instances) {
            const draw = window.drawPrimitive;
            if (!draw) return;
            const words = instances.byteLength / 4;
            const f = new Float32Array(instances.buffer, instances.byteOffset, words);
            const u = new Uint32Array(instances.buffer, instances.byteOffset, words);
            for (let i = 0; i < words; i += 24) {
                draw(u[i + 22], f.subarray(i, i + 16), f.subarray(i + 16, i + 20), f[i + 20], f[i + 21]);
            }
        }
    ")]
    extern "C" {
        fn begin_frame(uniforms: &[u8]);
        fn draw_batch(instances: &[u8]);
    }

    /// Logical keys currently held
    #[derive(Debug, Default, Clone, Copy)]
    struct HeldKeys {
        left: bool,
        right: bool,
        jump: bool,
        fire: bool,
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: FrameRenderer,
        batch: InstanceBatch,
        accumulator: f32,
        last_time: f64,
        keys: HeldKeys,
        /// One-shot pause toggle, consumed by the next tick
        pause_requested: bool,
        aspect: f32,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        last_hud: Option<HudSnapshot>,
    }

    impl Game {
        fn new(seed: u64, settings: Settings) -> Self {
            Self {
                state: GameState::new(seed),
                renderer: FrameRenderer::new(seed, &settings),
                batch: InstanceBatch::default(),
                accumulator: 0.0,
                last_time: 0.0,
                keys: HeldKeys::default(),
                pause_requested: false,
                aspect: 16.0 / 9.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                last_hud: None,
            }
        }

        fn restart(&mut self, seed: u64) {
            self.state = GameState::new(seed);
            self.accumulator = 0.0;
            self.pause_requested = false;
            self.last_hud = None;
            log::info!("Game restarted with seed: {}", seed);
        }

        fn cycle_quality(&mut self) {
            let mut settings = self.renderer.settings().clone();
            settings.quality = match settings.quality {
                QualityPreset::Low => QualityPreset::Medium,
                QualityPreset::Medium => QualityPreset::High,
                QualityPreset::High => QualityPreset::Low,
            };
            self.renderer.apply_settings(self.state.seed, &settings);
            settings.save();
            log::info!("Quality: {}", settings.quality.as_str());
        }

        fn input(&self) -> TickInput {
            TickInput {
                left: self.keys.left,
                right: self.keys.right,
                jump: self.keys.jump,
                fire: self.keys.fire,
                pause: self.pause_requested,
            }
        }

        /// Run simulation ticks, returning everything that happened this frame
        fn update(&mut self, dt: f32, time: f64) -> FrameEvents {
            let mut events = FrameEvents::default();
            self.accumulator += clamp_dt(dt);

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input();
                events.extend(tick(&mut self.state, &input, SIM_DT));
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.pause_requested = false;
            }
            if substeps == MAX_SUBSTEPS {
                // Drop the backlog instead of spiralling
                self.accumulator = 0.0;
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }

            events
        }

        /// Render the current frame
        fn render(&mut self, events: &FrameEvents) {
            let frame = self.renderer.build(&self.state, events);
            self.batch.clear();
            frame.submit(&mut self.batch);

            let uniforms = FrameUniformsRaw::new(&frame, self.aspect);
            begin_frame(uniforms.as_bytes());
            draw_batch(self.batch.as_bytes());
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if self.renderer.settings().show_fps {
                if let Some(el) = document.get_element_by_id("fps") {
                    el.set_text_content(Some(&self.fps.to_string()));
                }
            }

            let hud = HudSnapshot::from_state(&self.state);
            if self.last_hud.as_ref() == Some(&hud) {
                return;
            }

            if let Some(el) = document.get_element_by_id("scoreVal") {
                el.set_text_content(Some(&hud.score.to_string()));
            }

            if let Some(el) = document.get_element_by_id("status") {
                el.set_text_content(Some(&hud.status));
                if let Ok(el) = el.dyn_into::<HtmlElement>() {
                    let _ = el.style().set_property("color", hud.tone.css_color());
                }
            }

            if let Some(el) = document.get_element_by_id("pauseOverlay") {
                let _ = el.set_attribute("class", if hud.paused { "" } else { "hidden" });
            }

            if let Some(reason) = hud.game_over {
                if let Some(el) = document.get_element_by_id("gameOverReason") {
                    el.set_text_content(Some(reason));
                }
                if let Some(el) = document.get_element_by_id("finalScore") {
                    el.set_text_content(Some(&hud.score.to_string()));
                }
                if let Some(el) = document.get_element_by_id("gameOverScreen") {
                    let _ = el.set_attribute("class", "");
                }
            } else if let Some(el) = document.get_element_by_id("gameOverScreen") {
                let _ = el.set_attribute("class", "hidden");
            }

            self.last_hud = Some(hud);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Sleigh Chase starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let mut settings = Settings::load();
        if let Ok(query) = window.location().search() {
            if let Some(preset) = settings.apply_query(&query) {
                log::info!("Quality override from URL: {}", preset.as_str());
            }
        }

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, settings)));
        log::info!("Game initialized with seed: {}", seed);

        if let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        {
            let dpr = window.device_pixel_ratio();
            let (client_w, client_h) = (canvas.client_width(), canvas.client_height());
            canvas.set_width((client_w as f64 * dpr) as u32);
            canvas.set_height((client_h as f64 * dpr) as u32);
            if client_h > 0 {
                game.borrow_mut().aspect = client_w as f32 / client_h as f32;
            }
        }

        setup_keyboard(game.clone());
        setup_touch_buttons(game.clone());
        setup_restart_button(game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Sleigh Chase running!");
    }

    /// Map a keyboard key onto a held flag
    fn held_flag<'a>(keys: &'a mut HeldKeys, key: &str) -> Option<&'a mut bool> {
        match key {
            "a" | "arrowleft" => Some(&mut keys.left),
            "d" | "arrowright" => Some(&mut keys.right),
            " " => Some(&mut keys.jump),
            "f" => Some(&mut keys.fire),
            _ => None,
        }
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key().to_lowercase();
                let mut g = game.borrow_mut();
                if let Some(flag) = held_flag(&mut g.keys, &key) {
                    *flag = true;
                    event.prevent_default();
                    return;
                }
                match key.as_str() {
                    "escape" | "p" => g.pause_requested = true,
                    "r" if g.state.is_over() => g.restart(js_sys::Date::now() as u64),
                    "q" => g.cycle_quality(),
                    _ => {}
                }
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key().to_lowercase();
                let mut g = game.borrow_mut();
                if let Some(flag) = held_flag(&mut g.keys, &key) {
                    *flag = false;
                }
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// On-screen buttons, pressed by touch or mouse
    fn setup_touch_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        let buttons: [(&str, fn(&mut HeldKeys) -> &mut bool); 4] = [
            ("btnLeft", |k| &mut k.left),
            ("btnRight", |k| &mut k.right),
            ("btnJump", |k| &mut k.jump),
            ("btnShoot", |k| &mut k.fire),
        ];

        for (id, flag) in buttons {
            let Some(btn) = document.get_element_by_id(id) else {
                continue;
            };
            for (event_name, pressed) in [
                ("touchstart", true),
                ("touchend", false),
                ("touchcancel", false),
                ("mousedown", true),
                ("mouseup", false),
                ("mouseleave", false),
            ] {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                    event.prevent_default();
                    *flag(&mut game.borrow_mut().keys) = pressed;
                });
                let _ = btn.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            let events = g.update(dt, time);
            g.render(&events);
            g.update_hud();
        }

        request_animation_frame(game);
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("restartBtn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().restart(js_sys::Date::now() as u64);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.state.phase == GamePhase::Playing {
                        g.pause_requested = true;
                        g.keys = HeldKeys::default();
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.state.phase == GamePhase::Playing {
                    g.pause_requested = true;
                    g.keys = HeldKeys::default();
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Sleigh Chase (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - serve the web build to play");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2025);
    autopilot_demo(seed, 120.0);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive a run with the autopilot for up to `seconds` of simulated time
#[cfg(not(target_arch = "wasm32"))]
fn autopilot_demo(seed: u64, seconds: f32) {
    use sleigh_chase::consts::SIM_DT;
    use sleigh_chase::render::FrameRenderer;
    use sleigh_chase::sim::{GameEvent, GameState, autopilot_input, tick};
    use sleigh_chase::{HudSnapshot, Settings};

    let mut state = GameState::new(seed);
    let renderer = FrameRenderer::new(seed, &Settings::load());

    let mut hits = 0u32;
    let mut pickups = 0u32;
    let steps = (seconds / SIM_DT) as u32;
    for _ in 0..steps {
        let input = autopilot_input(&state);
        let events = tick(&mut state, &input, SIM_DT);
        for event in events.iter() {
            match event {
                e if e.is_hit() => hits += 1,
                GameEvent::GiftCollected
                | GameEvent::SledAcquired
                | GameEvent::StarCollected
                | GameEvent::ShootUnlocked => pickups += 1,
                _ => {}
            }
        }
        if state.is_over() {
            break;
        }
    }

    let hud = HudSnapshot::from_state(&state);
    let frame = renderer.build(&state, &Default::default());
    log::info!(
        "Seed {}: {:.1}s, score {}, {} pickups, {} hits, status '{}'",
        seed,
        state.time,
        hud.score,
        pickups,
        hits,
        hud.status
    );
    log::info!("Final frame: {} draw commands", frame.commands.len());
    match hud.game_over {
        Some(reason) => println!("Run ended: {reason} (score {})", hud.score),
        None => println!("Survived {seconds:.0}s with score {}", hud.score),
    }
}
