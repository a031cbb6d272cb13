//! Capy Catch entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::f32::consts::PI;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent};

    use capy_catch::consts::*;
    use capy_catch::renderer::{RenderState, scene};
    use capy_catch::sim::{GameEvent, GameState, MoodKind, Screen, TickInput, tick};
    use capy_catch::{Hud, Tuning};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        /// Canvas CSS size, for pointer scaling
        client_size: (f32, f32),
    }

    impl Game {
        fn new(tuning: Tuning, seed: u64) -> Self {
            Self {
                state: GameState::new(tuning, seed),
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                client_size: (1.0, 1.0),
            }
        }

        /// Convert a canvas-relative CSS position into playfield pixels
        fn to_playfield(&self, x: f32, y: f32) -> Vec2 {
            let (cw, ch) = self.client_size;
            Vec2::new(
                x * self.state.tuning.playfield_width / cw.max(1.0),
                y * self.state.tuning.playfield_height / ch.max(1.0),
            )
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                tick(&mut self.state, &input);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.pointer_down = None;
                self.input.pointer_up = None;
                self.input.restart = false;

                for event in self.state.drain_events() {
                    self.handle_event(&event);
                }
            }
        }

        fn handle_event(&self, event: &GameEvent) {
            if Hud::from_state(&self.state).floats_hearts(event) {
                spawn_floating_hearts();
            }
            match event {
                GameEvent::GameOver => log::info!("GAME OVER! Final score: {}", self.state.coins),
                GameEvent::FeedingStarted { items } => {
                    log::info!("Moving to feeding screen with {} oranges", items)
                }
                GameEvent::SessionReset => clear_floating_hearts(),
                _ => {}
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                let vertices = scene::build(&self.state);
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let hud = Hud::from_state(&self.state);
            let playing = hud.screen == Screen::Active;

            set_text(&document, "hud-coins", &hud.coins_text());
            set_text(&document, "hud-timer", &hud.timer);
            let hearts: String = (0..hud.max_lives)
                .map(|i| if i < hud.lives { '♥' } else { '♡' })
                .collect();
            set_text(&document, "hud-lives", &hearts);
            set_visible(&document, "hud", playing);

            // Portrait: scared outranks happy
            if let Some(icon) = document.get_element_by_id("capy-icon") {
                let classes = icon.class_list();
                let _ = classes.toggle_with_force("scared", hud.mood == MoodKind::Scared);
                let _ = classes.toggle_with_force("happy", hud.mood == MoodKind::Happy);
                let _ = classes.toggle_with_force("hidden", !playing);
            }
            set_text(&document, "capy-face", hud.face());

            // Game over overlay
            set_visible(&document, "game-over", hud.game_over);
            if hud.game_over {
                set_text(&document, "final-score", &hud.final_score_text());
                if let Some(text) = hud.restart_text() {
                    set_text(&document, "restart-countdown", &text);
                }
            }

            // Feeding banner
            set_visible(&document, "feeding-banner", !playing);
            if !playing {
                set_text(&document, "collected", &hud.collected_text());
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", !visible);
        }
    }

    /// Three hearts on a half circle above the portrait, gone after 500 ms
    fn spawn_floating_hearts() {
        let Some(window) = web_sys::window() else { return };
        let Some(document) = window.document() else { return };
        let (Some(icon), Some(body)) = (document.get_element_by_id("capy-icon"), document.body()) else {
            return;
        };
        let rect = icon.get_bounding_client_rect();
        let cx = (rect.left() + rect.width() / 2.0) as f32;
        let cy = (rect.top() + rect.height() / 2.0) as f32;

        for i in 0..3 {
            let Ok(heart) = document
                .create_element("span")
                .map_err(|_| ())
                .and_then(|el| el.dyn_into::<HtmlElement>().map_err(|_| ()))
            else {
                continue;
            };
            heart.set_text_content(Some("❤"));
            heart.set_class_name("floating-heart");

            // 45 to 135 degrees
            let angle = PI / 4.0 + i as f32 * PI / 6.0;
            let x = cx + angle.cos() * 60.0 - 12.5;
            let y = cy - angle.sin() * 60.0 - 12.5;
            let style = heart.style();
            let _ = style.set_property("left", &format!("{}px", x));
            let _ = style.set_property("top", &format!("{}px", y));

            if body.append_child(&heart).is_err() {
                continue;
            }
            let closure = Closure::once(move || heart.remove());
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                500,
            );
            closure.forget();
        }
    }

    fn clear_floating_hearts() {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Ok(hearts) = document.query_selector_all(".floating-heart") {
            for i in 0..hearts.length() {
                if let Some(node) = hearts.item(i) {
                    if let Some(parent) = node.parent_node() {
                        let _ = parent.remove_child(&node);
                    }
                }
            }
        }
    }

    /// Page may embed `<script id="tuning" type="application/json">`
    fn load_tuning(document: &Document) -> Tuning {
        let Some(json) = document
            .get_element_by_id("tuning")
            .and_then(|el| el.text_content())
        else {
            return Tuning::default();
        };
        match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides from page");
                tuning
            }
            Err(err) => {
                log::warn!("Ignoring page tuning: {}", err);
                Tuning::default()
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Capy Catch starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("gameCanvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #gameCanvas element");
            return;
        };

        // Initialize game
        let tuning = load_tuning(&document);
        let width = tuning.playfield_width as u32;
        let height = tuning.playfield_height as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let playfield = (tuning.playfield_width, tuning.playfield_height);
        let game = Rc::new(RefCell::new(Game::new(tuning, seed)));
        game.borrow_mut().client_size = (canvas.client_width() as f32, canvas.client_height() as f32);

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                return;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {}", e);
                return;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height, playfield).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => {
                log::error!("Failed to set up renderer: {}", e);
                return;
            }
        }

        // Set up input handlers
        setup_input_handlers(&canvas, game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Capy Catch running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse down - left/right buttons steer, left also grabs on the feeding screen
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                let p = g.to_playfield(event.offset_x() as f32, event.offset_y() as f32);
                match event.button() {
                    0 => {
                        g.input.move_left = true;
                        g.input.pointer_down = Some(p);
                    }
                    2 => g.input.move_right = true,
                    _ => {}
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse up - stop steering, drop on the feeding screen
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                let p = g.to_playfield(event.offset_x() as f32, event.offset_y() as f32);
                match event.button() {
                    0 => {
                        g.input.move_left = false;
                        g.input.pointer_up = Some(p);
                    }
                    2 => g.input.move_right = false,
                    _ => {}
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move - track pointer (also keeps the CSS size current)
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.client_size = (
                    canvas_clone.client_width() as f32,
                    canvas_clone.client_height() as f32,
                );
                let p = g.to_playfield(event.offset_x() as f32, event.offset_y() as f32);
                g.input.pointer = Some(p);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Buttons must not stay held when the pointer leaves the canvas
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.input.move_left = false;
                g.input.move_right = false;
            });
            let _ = canvas
                .add_event_listener_with_callback("mouseleave", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Right button steers, so no context menu
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.prevent_default();
            });
            let _ = canvas
                .add_event_listener_with_callback("contextmenu", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let Some(window) = web_sys::window() else { return };

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.input.move_left = true,
                    "ArrowRight" | "d" | "D" => g.input.move_right = true,
                    "r" | "R" => g.input.restart = true,
                    "i" | "I" => {
                        g.input.autopilot = !g.input.autopilot;
                        log::info!("Autopilot: {}", g.input.autopilot);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.input.move_left = false,
                    "ArrowRight" | "d" | "D" => g.input.move_right = false,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
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

            g.update(dt);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Upper bound on a headless run (ten minutes of game time)
#[cfg(not(target_arch = "wasm32"))]
const HEADLESS_MAX_TICKS: u32 = 10 * 60 * capy_catch::consts::TICKS_PER_SECOND;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use capy_catch::sim::{GameEvent, GameState, Screen, TickInput, tick};
    use capy_catch::{Hud, Tuning};

    env_logger::init();
    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(42);
    log::info!("Capy Catch (native) - headless autopilot run with seed {}", seed);
    log::info!("Play the real thing with `trunk serve`");

    let mut state = GameState::new(Tuning::default(), seed);
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };

    let (mut oranges, mut bombs, mut fed) = (0u32, 0u32, 0u32);
    for _ in 0..HEADLESS_MAX_TICKS {
        tick(&mut state, &input);
        for event in state.drain_events() {
            match event {
                GameEvent::OrangeCaught => oranges += 1,
                GameEvent::BombHit { .. } => bombs += 1,
                GameEvent::Fed { .. } => fed += 1,
                _ => {}
            }
        }
        if state.screen == Screen::Feeding && state.coins == 0 {
            break;
        }
    }

    log::info!(
        "Run finished after {} ticks: {} oranges caught, {} bombs hit, {} fed",
        state.time_ticks,
        oranges,
        bombs,
        fed
    );
    match serde_json::to_string_pretty(&Hud::from_state(&state)) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize HUD: {}", e),
    }
}
