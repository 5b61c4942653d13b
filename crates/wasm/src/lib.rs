#![cfg(target_arch = "wasm32")]
//! Browser host for the first-triangle sample.
//!
//! `start` acquires a WebGL 1 context from a canvas, fetches the shader pair,
//! bootstraps the scene, and drives frames from `requestAnimationFrame`
//! until the frame driver stops. Escape stops an animated scene.

mod console;
mod fetch;
mod surface;

use std::cell::RefCell;
use std::rc::Rc;

use first_triangle_core::render::{GlowBackend, GpuContext};
use first_triangle_core::{load_shader_source, Error, FrameState, RunFlag, Scene, SceneConfig};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, KeyboardEvent, WebGlRenderingContext, Window};

pub use fetch::WebFetcher;
pub use surface::CanvasSurface;

/// Boots the scene on the canvas with id `canvas_id`.
///
/// `config_json` is an optional `SceneConfig` in JSON; missing keys take their
/// defaults. Loading and rendering continue asynchronously after this
/// returns.
#[wasm_bindgen]
pub fn start(canvas_id: &str, config_json: Option<String>) -> Result<(), JsValue> {
    console::init(log::LevelFilter::Info);

    let config = match config_json {
        Some(json) => SceneConfig::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?,
        None => SceneConfig::default(),
    };

    let window = web_sys::window().ok_or("no global window")?;
    let canvas: HtmlCanvasElement = window
        .document()
        .ok_or("no document")?
        .get_element_by_id(canvas_id)
        .ok_or_else(|| format!("no element with id '{canvas_id}'"))?
        .dyn_into()
        .map_err(|_| format!("'{canvas_id}' is not a canvas"))?;

    let ctx = match acquire_context(&canvas) {
        Ok(ctx) => ctx,
        Err(e) => {
            log::error!("{e}");
            return Ok(());
        }
    };

    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = run(window.clone(), canvas, ctx, config).await {
            report(&window, &e);
        }
    });
    Ok(())
}

fn acquire_context(canvas: &HtmlCanvasElement) -> Result<GpuContext<GlowBackend>, Error> {
    let context = ["webgl", "experimental-webgl"]
        .into_iter()
        .find_map(|name| canvas.get_context(name).ok().flatten())
        .ok_or_else(|| Error::UnsupportedContext("webgl not supported".into()))?;
    let context: WebGlRenderingContext = context
        .dyn_into()
        .map_err(|_| Error::UnsupportedContext("not a WebGLRenderingContext".into()))?;
    let ctx = GpuContext::new(GlowBackend::new(glow::Context::from_webgl1_context(context)));
    log::info!("webgl extensions: {:?}", ctx.extensions());
    Ok(ctx)
}

async fn run(
    window: Window,
    canvas: HtmlCanvasElement,
    ctx: GpuContext<GlowBackend>,
    config: SceneConfig,
) -> Result<(), Error> {
    let fetcher = WebFetcher::new(window.clone());
    let source =
        load_shader_source(&fetcher, &config.vertex_shader, &config.fragment_shader).await?;
    let scene = Scene::bootstrap(ctx.gl(), &source, &config, js_sys::Date::now())?;

    if let Err(e) = install_escape_handler(&window, scene.driver().run_flag()) {
        log::warn!("keyboard handler not installed: {e:?}");
    }

    let surface = CanvasSurface::new(window.clone(), canvas);
    if let Err(e) = start_frame_loop(&window, surface, ctx, scene) {
        log::error!("requestAnimationFrame failed: {e:?}");
    }
    Ok(())
}

fn install_escape_handler(window: &Window, run: RunFlag) -> Result<(), JsValue> {
    let keydown = Closure::wrap(Box::new(move |event: KeyboardEvent| {
        run.handle_key(&event.key());
    }) as Box<dyn FnMut(_)>);
    window.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())?;
    keydown.forget();
    Ok(())
}

fn start_frame_loop(
    window: &Window,
    mut surface: CanvasSurface,
    ctx: GpuContext<GlowBackend>,
    mut scene: Scene<GlowBackend>,
) -> Result<(), JsValue> {
    // The callback reschedules itself, so it holds a handle to its own slot.
    let callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let next = callback.clone();
    let raf_window = window.clone();

    *callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let driver = scene.driver_mut();
        match driver.render_frame(ctx.gl(), &mut surface, js_sys::Date::now()) {
            Ok(FrameState::ScheduledNext) => {
                if let Some(cb) = next.borrow().as_ref() {
                    if let Err(e) =
                        raf_window.request_animation_frame(cb.as_ref().unchecked_ref())
                    {
                        log::error!("requestAnimationFrame failed: {e:?}");
                    }
                }
            }
            Ok(_) => log::info!("stopped after {} frames", driver.frames()),
            Err(e) => log::error!("{e}"),
        }
    }) as Box<dyn FnMut()>));

    if let Some(cb) = callback.borrow().as_ref() {
        window.request_animation_frame(cb.as_ref().unchecked_ref())?;
    }
    Ok(())
}

/// Surfaces a bootstrap failure. Shader diagnostics go to an alert; the rest
/// only to the console.
fn report(window: &Window, err: &Error) {
    match err {
        Error::Shader(_) => {
            if window.alert_with_message(&err.to_string()).is_err() {
                log::error!("{err}");
            }
        }
        // Already logged by the loader.
        Error::Load(_) => {}
        _ => log::error!("{err}"),
    }
}
