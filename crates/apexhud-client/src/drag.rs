use std::cell::RefCell;
use std::rc::Rc;

use apexhud_core::hud::{DragController, Point};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

use crate::dom;

/// Make the element with `id` draggable: press on the element, move and
/// release anywhere on the document.
pub fn attach_drag(
    document: &web_sys::Document,
    id: &str,
) -> Option<Rc<RefCell<DragController>>> {
    let target = dom::by_id::<web_sys::HtmlElement>(document, id)?;
    let drag = Rc::new(RefCell::new(DragController::new()));
    dom::set_style(&target, "cursor", drag.borrow().cursor());

    // mousedown on the overlay
    {
        let drag = Rc::clone(&drag);
        let el = target.clone();
        let closure =
            Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |evt: web_sys::MouseEvent| {
                let rect = el.get_bounding_client_rect();
                let mut drag = drag.borrow_mut();
                drag.pointer_down(
                    Point::new(f64::from(evt.client_x()), f64::from(evt.client_y())),
                    Point::new(rect.left(), rect.top()),
                );
                dom::set_style(&el, "cursor", drag.cursor());
            });
        let _ =
            target.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // mousemove anywhere
    {
        let drag = Rc::clone(&drag);
        let el = target.clone();
        let closure =
            Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |evt: web_sys::MouseEvent| {
                let pointer = Point::new(f64::from(evt.client_x()), f64::from(evt.client_y()));
                if let Some(origin) = drag.borrow().pointer_move(pointer) {
                    dom::set_style(&el, "left", &format!("{}px", origin.x));
                    dom::set_style(&el, "top", &format!("{}px", origin.y));
                }
            });
        let _ = document
            .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // mouseup anywhere
    {
        let drag = Rc::clone(&drag);
        let el = target.clone();
        let closure = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |_: web_sys::MouseEvent| {
            let mut drag = drag.borrow_mut();
            drag.pointer_up();
            dom::set_style(&el, "cursor", drag.cursor());
        });
        let _ =
            document.add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    Some(drag)
}
