use crate::constants::{BUTTON_PRIMARY, BUTTON_SECONDARY, WHEEL_LINE_PX, WHEEL_PAGE_PX};
use crate::dom;
use clickzoom_core::{DragMode, PointerSample, Scene, SceneError, ViewportController};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

#[derive(Clone)]
pub struct InputWiring {
    pub container: web::HtmlElement,
    pub canvas: web::HtmlCanvasElement,
    pub scene: Rc<RefCell<Scene>>,
    pub viewport: Rc<RefCell<ViewportController>>,
}

pub fn wire_input_handlers(w: InputWiring) {
    wire_dblclick(&w);
    wire_pointerdown(&w);
    wire_pointermove(&w);
    wire_pointerup(&w);
    wire_wheel(&w);
    wire_contextmenu(&w);
}

/// Pointer position relative to the container's top-left corner, in CSS pixels.
fn container_offset(container: &web::HtmlElement, ev: &web::MouseEvent) -> (f32, f32) {
    let rect = container.get_bounding_client_rect();
    (
        (ev.client_x() as f64 - rect.left()) as f32,
        (ev.client_y() as f64 - rect.top()) as f32,
    )
}

fn wire_dblclick(w: &InputWiring) {
    let w = w.clone();
    let target = w.container.clone();
    dom::listen(&target, "dblclick", move |ev: web::MouseEvent| {
        let (x, y) = container_offset(&w.container, &ev);
        let (width, height) = dom::client_size(&w.container);
        let pointer = PointerSample {
            x,
            y,
            width,
            height,
        };
        let scene = w.scene.borrow();
        let result = w.viewport.borrow_mut().on_double_click(&scene, pointer);
        match result {
            Ok((pick, _pose)) => {
                log::info!(
                    "[pick] {:?} at ({:.0},{:.0}) distance={:?}",
                    pick.kind,
                    x,
                    y,
                    pick.distance
                );
            }
            Err(SceneError::MissingNode(name)) => {
                log::info!("[pick] nothing hit and no `{}` node yet", name);
            }
            Err(e) => log::error!("[pick] {}", e),
        }
        ev.prevent_default();
    });
}

fn wire_pointerdown(w: &InputWiring) {
    let w = w.clone();
    let target = w.canvas.clone();
    dom::listen(&target, "pointerdown", move |ev: web::PointerEvent| {
        let mode = match ev.button() {
            BUTTON_PRIMARY if ev.shift_key() || ev.ctrl_key() || ev.meta_key() => DragMode::Pan,
            BUTTON_PRIMARY => DragMode::Rotate,
            BUTTON_SECONDARY => DragMode::Pan,
            _ => return,
        };
        w.viewport
            .borrow_mut()
            .controls
            .begin_drag(mode, ev.client_x() as f32, ev.client_y() as f32);
        _ = w.canvas.set_pointer_capture(ev.pointer_id());
    });
}

fn wire_pointermove(w: &InputWiring) {
    let w = w.clone();
    let target = w.canvas.clone();
    dom::listen(&target, "pointermove", move |ev: web::PointerEvent| {
        let mut vp = w.viewport.borrow_mut();
        if vp.controls.drag_mode().is_none() {
            return;
        }
        let (_, height) = dom::client_size(&w.container);
        let ViewportController {
            camera, controls, ..
        } = &mut *vp;
        controls.drag_to(ev.client_x() as f32, ev.client_y() as f32, camera, height);
    });
}

fn wire_pointerup(w: &InputWiring) {
    for kind in ["pointerup", "pointercancel"] {
        let w = w.clone();
        let target = w.canvas.clone();
        dom::listen(&target, kind, move |ev: web::PointerEvent| {
            w.viewport.borrow_mut().controls.end_drag();
            _ = w.canvas.release_pointer_capture(ev.pointer_id());
        });
    }
}

/// Wheel delta in pixels regardless of `deltaMode`.
fn wheel_delta_px(ev: &web::WheelEvent) -> f32 {
    let dy = ev.delta_y() as f32;
    match ev.delta_mode() {
        web::WheelEvent::DOM_DELTA_LINE => dy * WHEEL_LINE_PX,
        web::WheelEvent::DOM_DELTA_PAGE => dy * WHEEL_PAGE_PX,
        _ => dy,
    }
}

fn wire_wheel(w: &InputWiring) {
    let w = w.clone();
    let target = w.canvas.clone();
    dom::listen(&target, "wheel", move |ev: web::WheelEvent| {
        let dy = wheel_delta_px(&ev);
        if dy != 0.0 {
            w.viewport.borrow_mut().controls.dolly(dy);
        }
        ev.prevent_default();
    });
}

fn wire_contextmenu(w: &InputWiring) {
    let target = w.canvas.clone();
    dom::listen(&target, "contextmenu", move |ev: web::MouseEvent| {
        ev.prevent_default();
    });
}
