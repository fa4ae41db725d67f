#![cfg(target_arch = "wasm32")]
use clickzoom_core::{populate_scene, Scene, ViewportConfig, ViewportController};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod constants;
mod dom;
mod events;
mod frame;
mod loader;
mod render;

fn wire_resize(
    container: &web::HtmlElement,
    canvas: &web::HtmlCanvasElement,
    viewport: &Rc<RefCell<ViewportController>>,
) {
    let container = container.clone();
    let canvas = canvas.clone();
    let viewport = viewport.clone();
    let apply = move || {
        dom::sync_canvas_backing_size(&canvas);
        let (w, h) = dom::client_size(&container);
        viewport.borrow_mut().resize(w, h);
    };
    apply();
    if let Some(window) = web::window() {
        dom::listen(&window, "resize", move |_: web::Event| apply());
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("clickzoom-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let container = dom::container_element(&document, constants::CONTAINER_ID)?;
    let canvas = dom::create_canvas(&document, &container)?;

    let scene = Rc::new(RefCell::new(Scene::new()));
    populate_scene(&mut scene.borrow_mut());
    for line in scene.borrow().dump_tree() {
        log::debug!("{}", line);
    }

    let (w, h) = dom::client_size(&container);
    let viewport = Rc::new(RefCell::new(ViewportController::new(
        ViewportConfig::default(),
        w,
        h,
    )));
    wire_resize(&container, &canvas, &viewport);

    events::wire_input_handlers(events::InputWiring {
        container: container.clone(),
        canvas: canvas.clone(),
        scene: scene.clone(),
        viewport: viewport.clone(),
    });

    loader::spawn_model_loads(scene.clone());

    let gpu = frame::init_gpu(&canvas).await;
    if gpu.is_none() {
        log::warn!("[gpu] rendering disabled; picking and camera still run");
    }
    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext::new(
        scene, viewport, canvas, gpu,
    )));
    frame::start_loop(frame_ctx);
    Ok(())
}
