use std::cell::Cell;
use std::rc::Rc;

use apexhud_core::hud::{KeyPress, Shortcut, Visibility};

/// Toggles overlay visibility when the configured shortcut is pressed.
pub struct VisibilityToggle {
    shortcut: Shortcut,
    visibility: Cell<Visibility>,
}

impl VisibilityToggle {
    pub fn new(shortcut: Shortcut) -> Rc<Self> {
        Rc::new(Self {
            shortcut,
            visibility: Cell::new(Visibility::default()),
        })
    }

    /// Returns the new visibility when the press matched the shortcut.
    pub fn on_key(&self, press: &KeyPress) -> Option<Visibility> {
        if !self.shortcut.matches(press) {
            return None;
        }
        let mut visibility = self.visibility.get();
        visibility.toggle();
        self.visibility.set(visibility);
        Some(visibility)
    }

    pub fn is_visible(&self) -> bool {
        self.visibility.get().is_visible()
    }
}

#[cfg(target_family = "wasm")]
pub fn attach_toggle(
    document: &web_sys::Document,
    toggle: &Rc<VisibilityToggle>,
    renderer: &Rc<crate::renderer::Renderer>,
) {
    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;

    let toggle = Rc::clone(toggle);
    let renderer = Rc::clone(renderer);
    let closure =
        Closure::<dyn FnMut(web_sys::KeyboardEvent)>::new(move |evt: web_sys::KeyboardEvent| {
            let press = KeyPress {
                key: evt.key(),
                alt: evt.alt_key(),
                ctrl: evt.ctrl_key(),
                shift: evt.shift_key(),
                meta: evt.meta_key(),
            };
            if let Some(visibility) = toggle.on_key(&press) {
                evt.prevent_default();
                renderer.set_overlay_visibility(visibility);
            }
        });
    let _ = document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
    closure.forget();
}
