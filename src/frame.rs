use crate::constants::MAX_FRAME_DT_SEC;
use crate::render;
use clickzoom_core::{Scene, SceneIndex, ViewportController};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext<'a> {
    pub scene: Rc<RefCell<Scene>>,
    pub viewport: Rc<RefCell<ViewportController>>,
    pub canvas: web::HtmlCanvasElement,
    pub gpu: Option<render::GpuState<'a>>,
    pub last_instant: Instant,
    // Rebuilt only when the scene revision changes
    pub index: Option<(u64, SceneIndex)>,
}

impl<'a> FrameContext<'a> {
    pub fn new(
        scene: Rc<RefCell<Scene>>,
        viewport: Rc<RefCell<ViewportController>>,
        canvas: web::HtmlCanvasElement,
        gpu: Option<render::GpuState<'a>>,
    ) -> Self {
        Self {
            scene,
            viewport,
            canvas,
            gpu,
            last_instant: Instant::now(),
            index: None,
        }
    }

    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt = now - self.last_instant;
        self.last_instant = now;
        // A backgrounded tab pauses rAF; resume animations where they left off
        let dt_sec = dt.as_secs_f32().min(MAX_FRAME_DT_SEC);

        {
            let scene = self.scene.borrow();
            let revision = scene.revision();
            if self.index.as_ref().map(|(r, _)| *r) != Some(revision) {
                self.index = Some((revision, scene.index()));
            }
            if let (Some(g), Some((_, index))) = (self.gpu.as_mut(), self.index.as_ref()) {
                let w = self.canvas.width();
                let h = self.canvas.height();
                g.resize_if_needed(w, h);
                let viewport = self.viewport.borrow();
                if let Err(e) = g.render(&scene, index, &viewport.camera) {
                    match e {
                        wgpu::SurfaceError::Timeout => log::warn!("[gpu] frame timeout"),
                        other => log::error!("render error: {:?}", other),
                    }
                }
            }
        }

        self.viewport.borrow_mut().advance(dt_sec);
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        if let (Some(w), Some(cb)) = (web::window(), tick_clone.borrow().as_ref()) {
            _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
