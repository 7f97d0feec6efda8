//! Pendulum Wave entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;

    use pendulum_wave::audio::WebAudioInstrument;
    use pendulum_wave::renderer::CanvasSurface;
    use pendulum_wave::sim::{Clock, LoopControl, Snapshot, SystemClock, run_frame};
    use pendulum_wave::{Config, Store};

    const CANVAS_ID: &str = "paper";

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        let config = Config::load();
        let settings = match config.validate(SystemClock.now_ms()) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Invalid configuration: {}", e);
                return;
            }
        };
        log::info!(
            "Pendulum Wave: {} arcs, {} cycles over {}s",
            settings.number_of_arcs,
            settings.max_cycles,
            settings.duration
        );

        let instrument_name = settings.instrument_name.clone();
        let store = Rc::new(Store::new(Snapshot::new(settings)));

        if let Some(name) = instrument_name {
            load_instrument(store.clone(), &name);
        }

        request_animation_frame(store);
    }

    /// Publish the instrument into the snapshot once the browser lets it run
    fn load_instrument(store: Rc<Store<Snapshot>>, name: &str) {
        let Some(instrument) = WebAudioInstrument::new(name) else {
            return;
        };
        resume_on_gesture(instrument.context().clone());

        wasm_bindgen_futures::spawn_local(async move {
            if let Some(instrument) = instrument.load().await {
                let published = store.mutate(move |s| s.instrument = Some(Rc::new(instrument)));
                if let Err(e) = published {
                    log::warn!("Instrument not published: {}", e);
                }
            }
        });
    }

    /// Browsers only start audio after a user gesture
    fn resume_on_gesture(ctx: web_sys::AudioContext) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let _ = ctx.resume();
        });
        let _ = window
            .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
        let _ = window
            .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(store: Rc<Store<Snapshot>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            frame(store);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame(store: Rc<Store<Snapshot>>) {
        let mut surface = CanvasSurface::acquire(CANVAS_ID);
        if run_frame(&store, surface.as_mut(), &SystemClock) == LoopControl::Continue {
            request_animation_frame(store);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Pendulum Wave (native) starting...");
    log::info!("Native mode renders headless - run with `trunk serve` for the canvas version");

    if let Err(e) = headless::run(std::env::args().nth(1)) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;
    use std::rc::Rc;
    use std::time::Duration;

    use pendulum_wave::audio::LogInstrument;
    use pendulum_wave::consts::FRAME_DT_MS;
    use pendulum_wave::renderer::RecordingSurface;
    use pendulum_wave::sim::{Clock, LoopControl, Snapshot, SystemClock, run_frame};
    use pendulum_wave::{Config, ConfigError, Store};

    const VIEWPORT: (u32, u32) = (1280, 720);

    /// Drive the loop at ~60 Hz against a recording surface, logging notes
    pub fn run(config_path: Option<String>) -> Result<(), ConfigError> {
        let path = config_path.map(PathBuf::from);
        let config = Config::load_from(path.as_deref())?;
        let settings = config.validate(SystemClock.now_ms())?;
        log::info!(
            "{} arcs, {} cycles over {}s",
            settings.number_of_arcs,
            settings.max_cycles,
            settings.duration
        );

        let instrument_name = settings.instrument_name.clone();
        let store = Store::new(Snapshot::new(settings));
        if let Some(name) = instrument_name {
            let instrument = Rc::new(LogInstrument::new(&name));
            if let Err(e) = store.mutate(|s| s.instrument = Some(instrument)) {
                log::warn!("Instrument not published: {}", e);
            }
        }

        let mut surface = RecordingSurface::new(VIEWPORT.0, VIEWPORT.1);
        while run_frame(&store, Some(&mut surface), &SystemClock) == LoopControl::Continue {
            surface.take_commands();
            std::thread::sleep(Duration::from_millis(FRAME_DT_MS));
        }
        Ok(())
    }
}
