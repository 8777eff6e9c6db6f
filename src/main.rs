//! Beat Runner entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use anyhow::{Context, Result, anyhow};
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlMediaElement, KeyboardEvent, PointerEvent};

    use beat_runner::audio::WebAudioSpectrum;
    use beat_runner::consts::*;
    use beat_runner::game::PendingCharacter;
    use beat_runner::platform::{BrowserScheduler, FrameLoop};
    use beat_runner::renderer::{PresentState, Sprite};
    use beat_runner::sim::GameEvent;
    use beat_runner::{Game, Settings};

    /// Everything one page session owns
    struct Host {
        game: Game,
        present: Option<PresentState>,
        audio: Option<WebAudioSpectrum>,
        score_el: Option<web_sys::Element>,
    }

    impl Host {
        /// One display frame: simulate, notify, present
        fn frame(&mut self) {
            self.game.frame_from(self.audio.as_mut());

            for event in self.game.drain_events() {
                match event {
                    GameEvent::ScoreChanged(score) => {
                        if let Some(el) = &self.score_el {
                            el.set_text_content(Some(&score.to_string()));
                        }
                    }
                    GameEvent::GameOver { score } => log::info!("Final score: {}", score),
                    GameEvent::Spawned { .. } | GameEvent::CoinCollected { .. } => {}
                }
            }

            if let Some(present) = &mut self.present {
                match present.present(self.game.framebuffer()) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        present.resize(present.size.0, present.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }
    }

    struct Session {
        host: Rc<RefCell<Host>>,
        frame_loop: FrameLoop<BrowserScheduler>,
    }

    thread_local! {
        static SESSION: RefCell<Option<Session>> = const { RefCell::new(None) };
        static PENDING_CHARACTER: RefCell<PendingCharacter> = RefCell::new(PendingCharacter::default());
    }

    pub async fn run() -> Result<()> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Beat Runner starting...");

        let settings = Settings::load();
        let window = web_sys::window().context("no window")?;
        let document = window.document().context("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .context("no canvas")?
            .dyn_into()
            .map_err(|_| anyhow!("#canvas is not a canvas"))?;

        let (width, height) = canvas_pixel_size(&window, &canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        // Audio is optional: without it the scene stays idle
        let audio_el: Option<HtmlMediaElement> = document
            .get_element_by_id("audio")
            .and_then(|el| el.dyn_into().ok());
        let audio = match &audio_el {
            Some(el) => match WebAudioSpectrum::attach(el) {
                Ok(spectrum) => Some(spectrum),
                Err(e) => {
                    log::warn!("Audio analysis unavailable: {e:#}");
                    None
                }
            },
            None => {
                log::warn!("No #audio element; running without music");
                None
            }
        };

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .context("failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to get adapter")?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let present =
            PresentState::new(surface, &adapter, width, height, (CANVAS_WIDTH, CANVAS_HEIGHT)).await?;

        let host = Rc::new(RefCell::new(Host {
            game: Game::new(settings),
            present: Some(present),
            audio,
            score_el: document.get_element_by_id("score"),
        }));
        PENDING_CHARACTER.with(|p| p.borrow_mut().apply(&mut host.borrow_mut().game));

        setup_input_handlers(&window, &canvas, host.clone());
        if let Some(el) = &audio_el {
            setup_transport_handlers(el, host.clone());
        }
        setup_resize_handler(&window, &canvas, host.clone());

        let scheduler = BrowserScheduler::new().context("no window for frame scheduling")?;
        let frame_loop = {
            let host = host.clone();
            FrameLoop::start(scheduler, move |_time| host.borrow_mut().frame())
        };

        SESSION.with(|s| *s.borrow_mut() = Some(Session { host, frame_loop }));

        log::info!("Beat Runner running!");
        Ok(())
    }

    fn canvas_pixel_size(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        (width.max(1), height.max(1))
    }

    fn setup_input_handlers(window: &web_sys::Window, canvas: &HtmlCanvasElement, host: Rc<RefCell<Host>>) {
        // Keyboard
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                match event.key().as_str() {
                    " " | "ArrowUp" => {
                        event.prevent_default();
                        host.borrow_mut().game.jump();
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Tap / click
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                host.borrow_mut().game.jump();
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Playback state drives the game clock
    fn setup_transport_handlers(audio: &HtmlMediaElement, host: Rc<RefCell<Host>>) {
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut h = host.borrow_mut();
                if let Some(spectrum) = &h.audio {
                    spectrum.resume();
                }
                h.game.play();
            });
            let _ = audio.add_event_listener_with_callback("play", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        for name in ["pause", "ended"] {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                host.borrow_mut().game.pause();
            });
            let _ = audio.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize_handler(window: &web_sys::Window, canvas: &HtmlCanvasElement, host: Rc<RefCell<Host>>) {
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (width, height) = canvas_pixel_size(&window, &canvas);
            canvas.set_width(width);
            canvas.set_height(height);
            if let Some(present) = &mut host.borrow_mut().present {
                present.resize(width, height);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Swap in a decoded character image (RGBA8, row-major)
    ///
    /// Images sent while the page is still starting up are applied once the
    /// session exists.
    #[wasm_bindgen]
    pub fn set_character_image(width: u32, height: u32, rgba: Vec<u8>) {
        let sprite = Sprite::from_rgba(width, height, rgba);
        if sprite.is_none() {
            return;
        }
        route_character(sprite);
    }

    /// Go back to the built-in character
    #[wasm_bindgen]
    pub fn clear_character_image() {
        route_character(None);
    }

    fn route_character(sprite: Option<Sprite>) {
        SESSION.with(|s| {
            let session = s.borrow();
            let mut host = session.as_ref().map(|session| session.host.borrow_mut());
            let game = host.as_deref_mut().map(|host| &mut host.game);
            PENDING_CHARACTER.with(|p| p.borrow_mut().request(sprite, game));
        });
    }

    /// Tear down: stop the frame loop and release the session
    #[wasm_bindgen]
    pub fn shutdown() {
        let session = SESSION.with(|s| s.borrow_mut().take());
        if let Some(session) = session {
            session.frame_loop.stop();
            session.host.borrow_mut().present = None;
            log::info!("Beat Runner shut down");
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Beat Runner failed to start: {e:#}");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Beat Runner (native) starting...");
    log::info!("Native mode runs a headless demo - build for wasm32 to play in a browser");

    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless demo: a synthetic track drives a self-playing run
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::cell::RefCell;
    use std::rc::Rc;

    use beat_runner::consts::*;
    use beat_runner::platform::{FrameLoop, ManualScheduler};
    use beat_runner::sim::{EntityKind, GameEvent, SyntheticTrack};
    use beat_runner::{Game, Settings};

    /// 30 seconds at 60 Hz
    const DEMO_FRAMES: u64 = 1800;
    const FRAME_MS: f64 = 1000.0 / 60.0;
    const BIN_COUNT: usize = 128;

    pub fn run() {
        let game = Rc::new(RefCell::new(Game::new(Settings::load())));
        game.borrow_mut().play();

        let scheduler = Rc::new(ManualScheduler::new());
        let frame_loop = {
            let game = game.clone();
            let mut track = SyntheticTrack::new(BIN_COUNT);
            FrameLoop::start(scheduler.clone(), move |_time| {
                let mut g = game.borrow_mut();
                autopilot(&mut g);
                g.frame_from(Some(&mut track));

                for event in g.drain_events() {
                    match event {
                        GameEvent::CoinCollected { id } => log::debug!("Coin {} collected", id),
                        GameEvent::GameOver { score } => log::info!("Game over with score {}", score),
                        GameEvent::ScoreChanged(_) | GameEvent::Spawned { .. } => {}
                    }
                }
            })
        };

        for i in 0..DEMO_FRAMES {
            scheduler.fire(i as f64 * FRAME_MS);
            if game.borrow().state().is_game_over() {
                break;
            }
        }
        frame_loop.stop();

        let g = game.borrow();
        let state = g.state();
        println!(
            "Demo finished after {} frames: score {}, {}",
            state.game_time,
            state.score,
            if state.is_game_over() { "crashed" } else { "survived" }
        );
    }

    /// Jump when a spike is about to reach the runner
    fn autopilot(game: &mut Game) {
        let danger = game.state().entities.iter().any(|e| {
            e.kind == EntityKind::Obstacle && e.x > PLAYER_X && e.x < PLAYER_X + 40.0
        });
        if danger {
            game.jump();
        }
    }
}
