//! DOM side of the settings page: reads and writes the form controls and
//! wires the purely cosmetic page behavior.

/// `(picker id, text id)` for each color control, in `ColorSettings` order.
pub const COLOR_FIELDS: [(&str, &str); 5] = [
    ("background-color", "background-color-text"),
    ("text-color", "text-color-text"),
    ("health-color", "health-color-text"),
    ("shield-color", "shield-color-text"),
    ("accent-color", "accent-color-text"),
];

/// Opacity text to save. A range input snaps whatever is written into it,
/// so the loaded text is kept unless the slider now shows something other
/// than what it showed right after loading.
pub fn opacity_to_save<'a>(loaded: &'a str, shown_after_load: &str, current: &'a str) -> &'a str {
    if current == shown_after_load {
        loaded
    } else {
        current
    }
}

/// Section id a nav link points at: `"#appearance"` → `"appearance"`.
pub fn section_target(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

#[cfg(target_family = "wasm")]
pub use dom_view::{DomSettingsView, attach_page_behavior};

#[cfg(target_family = "wasm")]
mod dom_view {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;

    use apexhud_core::color::picker_value;
    use apexhud_core::settings::{
        ColorSettings, NameOverrides, OverlayPosition, SettingsForm, ShowElements,
    };

    use super::{COLOR_FIELDS, opacity_to_save, section_target};
    use crate::dom;
    use crate::settings_page::SettingsView;

    type RemoveHandler = Rc<dyn Fn(String)>;

    pub struct DomSettingsView {
        document: web_sys::Document,
        /// Not shown on the page; kept so a save writes back what was loaded.
        position: RefCell<Option<OverlayPosition>>,
        /// `(loaded text, slider text right after loading)`.
        opacity: RefCell<(String, String)>,
        on_remove: RefCell<Option<RemoveHandler>>,
    }

    impl DomSettingsView {
        pub fn new(document: web_sys::Document) -> Self {
            Self {
                document,
                position: RefCell::new(None),
                opacity: RefCell::new((String::new(), String::new())),
                on_remove: RefCell::new(None),
            }
        }

        /// Called with the player id when a row's delete button is pressed.
        pub fn set_on_remove(&self, handler: impl Fn(String) + 'static) {
            *self.on_remove.borrow_mut() = Some(Rc::new(handler));
        }

        fn input(&self, id: &str) -> Option<web_sys::HtmlInputElement> {
            dom::by_id(&self.document, id)
        }

        fn value(&self, id: &str) -> String {
            if let Some(select) = dom::by_id::<web_sys::HtmlSelectElement>(&self.document, id) {
                return select.value();
            }
            self.input(id).map(|el| el.value()).unwrap_or_default()
        }

        fn set_value(&self, id: &str, value: &str) {
            if let Some(select) = dom::by_id::<web_sys::HtmlSelectElement>(&self.document, id) {
                select.set_value(value);
            } else if let Some(input) = self.input(id) {
                input.set_value(value);
            }
        }

        fn checked(&self, id: &str) -> bool {
            self.input(id).is_some_and(|el| el.checked())
        }

        fn set_checked(&self, id: &str, checked: bool) {
            if let Some(el) = self.input(id) {
                el.set_checked(checked);
            }
        }

        fn override_row(&self, player_id: &str, name: &str) -> Option<web_sys::HtmlElement> {
            let doc = &self.document;
            let row = dom::create(doc, "div", "name-override-item", None)?;
            row.append_child(&dom::create(doc, "div", "id", Some(player_id))?)
                .ok()?;
            row.append_child(&dom::create(doc, "div", "name", Some(name))?)
                .ok()?;
            let button = dom::create(doc, "button", "delete", Some("\u{00d7}"))?;
            if let Some(handler) = self.on_remove.borrow().as_ref().map(Rc::clone) {
                let player_id = player_id.to_string();
                let closure = Closure::<dyn FnMut()>::new(move || handler(player_id.clone()));
                let _ = button
                    .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
            row.append_child(&button).ok()?;
            Some(row)
        }

        fn toggle_override_section(&self, enabled: bool) {
            toggle_hidden(&self.document, "name-override-settings", !enabled);
        }
    }

    impl SettingsView for DomSettingsView {
        fn read_form(&self) -> SettingsForm {
            let colors: Vec<String> = COLOR_FIELDS
                .iter()
                .map(|(_, text)| self.value(text))
                .collect();
            SettingsForm {
                theme: self.value("theme"),
                opacity: {
                    let current = self.value("opacity");
                    let (loaded, shown) = &*self.opacity.borrow();
                    opacity_to_save(loaded, shown, &current).to_string()
                },
                font_size: self.value("font-size"),
                show_elements: ShowElements {
                    player_info: self.checked("show-player-info"),
                    squad_info: self.checked("show-squad-info"),
                    game_state: self.checked("show-game-state"),
                    kills: self.checked("show-kills"),
                    damage: self.checked("show-damage"),
                },
                colors: ColorSettings {
                    background: colors[0].clone(),
                    text: colors[1].clone(),
                    health: colors[2].clone(),
                    shield: colors[3].clone(),
                    accent: colors[4].clone(),
                },
                websocket_host: self.value("websocket-host"),
                websocket_port: self.value("websocket-port"),
                http_host: self.value("http-host"),
                http_port: self.value("http-port"),
                name_override_enabled: self.checked("enable-name-override"),
                position: self.position.borrow().clone(),
            }
        }

        fn write_form(&self, form: &SettingsForm) {
            self.set_value("theme", &form.theme);
            self.set_value("opacity", &form.opacity);
            *self.opacity.borrow_mut() = (form.opacity.clone(), self.value("opacity"));
            dom::set_text(&self.document, "opacity-value", &form.opacity);
            self.set_value("font-size", &form.font_size);

            let show = &form.show_elements;
            self.set_checked("show-player-info", show.player_info);
            self.set_checked("show-squad-info", show.squad_info);
            self.set_checked("show-game-state", show.game_state);
            self.set_checked("show-kills", show.kills);
            self.set_checked("show-damage", show.damage);

            let colors = &form.colors;
            let values = [
                &colors.background,
                &colors.text,
                &colors.health,
                &colors.shield,
                &colors.accent,
            ];
            for ((picker, text), value) in COLOR_FIELDS.iter().zip(values) {
                self.set_value(text, value);
                if let Some(hex) = picker_value(value) {
                    self.set_value(picker, &hex);
                }
            }

            self.set_value("websocket-host", &form.websocket_host);
            self.set_value("websocket-port", &form.websocket_port);
            self.set_value("http-host", &form.http_host);
            self.set_value("http-port", &form.http_port);

            self.set_checked("enable-name-override", form.name_override_enabled);
            self.toggle_override_section(form.name_override_enabled);
            *self.position.borrow_mut() = form.position.clone();
        }

        fn override_inputs(&self) -> (String, String) {
            (self.value("player-id"), self.value("display-name"))
        }

        fn clear_override_inputs(&self) {
            self.set_value("player-id", "");
            self.set_value("display-name", "");
        }

        fn preset_name_input(&self) -> String {
            self.value("preset-name")
        }

        fn clear_preset_name_input(&self) {
            self.set_value("preset-name", "");
        }

        fn selected_preset(&self) -> String {
            self.value("preset-select")
        }

        fn clear_preset_selection(&self) {
            self.set_value("preset-select", "");
        }

        fn show_overrides(&self, overrides: &NameOverrides) {
            let Some(list) =
                dom::by_id::<web_sys::HtmlElement>(&self.document, "name-override-list")
            else {
                return;
            };
            list.set_inner_html("");
            for (player_id, name) in overrides {
                if let Some(row) = self.override_row(player_id, name) {
                    let _ = list.append_child(&row);
                }
            }
        }

        fn show_presets(&self, names: &[String]) {
            let Some(select) =
                dom::by_id::<web_sys::HtmlSelectElement>(&self.document, "preset-select")
            else {
                return;
            };
            select.set_inner_html("");
            let options = std::iter::once(("-- Select --", ""))
                .chain(names.iter().map(|n| (n.as_str(), n.as_str())));
            for (label, value) in options {
                match web_sys::HtmlOptionElement::new_with_text_and_value(label, value) {
                    Ok(option) => {
                        let _ = select.append_child(&option);
                    },
                    Err(e) => crate::diag::console_warn!("preset option {label:?}: {e:?}"),
                }
            }
        }

        fn alert(&self, message: &str) {
            if let Some(window) = web_sys::window() {
                let _ = window.alert_with_message(message);
            }
        }

        fn confirm(&self, message: &str) -> bool {
            web_sys::window()
                .and_then(|w| w.confirm_with_message(message).ok())
                .unwrap_or(false)
        }
    }

    fn toggle_hidden(document: &web_sys::Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    /// Tab navigation, the opacity readout, the name-override section toggle
    /// and picker/text color sync.
    pub fn attach_page_behavior(document: &web_sys::Document) {
        attach_tabs(document);

        {
            let doc = document.clone();
            dom::listen(document, "opacity", "input", move || {
                if let Some(input) = dom::by_id::<web_sys::HtmlInputElement>(&doc, "opacity") {
                    dom::set_text(&doc, "opacity-value", &input.value());
                }
            });
        }

        {
            let doc = document.clone();
            dom::listen(document, "enable-name-override", "change", move || {
                let enabled = dom::by_id::<web_sys::HtmlInputElement>(&doc, "enable-name-override")
                    .is_some_and(|el| el.checked());
                toggle_hidden(&doc, "name-override-settings", !enabled);
            });
        }

        for (picker, text) in COLOR_FIELDS {
            // picker → text: the picker's hex replaces the text.
            {
                let doc = document.clone();
                dom::listen(document, picker, "input", move || {
                    let (Some(p), Some(t)) = (
                        dom::by_id::<web_sys::HtmlInputElement>(&doc, picker),
                        dom::by_id::<web_sys::HtmlInputElement>(&doc, text),
                    ) else {
                        return;
                    };
                    t.set_value(&p.value());
                });
            }
            // text → picker: lossy for rgba().
            {
                let doc = document.clone();
                dom::listen(document, text, "input", move || {
                    let (Some(p), Some(t)) = (
                        dom::by_id::<web_sys::HtmlInputElement>(&doc, picker),
                        dom::by_id::<web_sys::HtmlInputElement>(&doc, text),
                    ) else {
                        return;
                    };
                    if let Some(hex) = picker_value(&t.value()) {
                        p.set_value(&hex);
                    }
                });
            }
        }
    }

    fn attach_tabs(document: &web_sys::Document) {
        let links: Vec<web_sys::Element> = match document.query_selector_all(".settings-nav a") {
            Ok(list) => (0..list.length())
                .filter_map(|i| list.item(i))
                .filter_map(|n| n.dyn_into::<web_sys::Element>().ok())
                .collect(),
            Err(_) => return,
        };
        for link in &links {
            let doc = document.clone();
            let all_links = links.clone();
            let this = link.clone();
            let closure =
                Closure::<dyn FnMut(web_sys::Event)>::new(move |evt: web_sys::Event| {
                    evt.prevent_default();
                    for l in &all_links {
                        let _ = l.class_list().remove_1("active");
                    }
                    for section in dom::query_all(&doc, ".settings-section") {
                        let _ = section.class_list().remove_1("active");
                    }
                    let _ = this.class_list().add_1("active");
                    let href = this.get_attribute("href").unwrap_or_default();
                    if let Some(id) = section_target(&href)
                        && let Some(section) = doc.get_element_by_id(id)
                    {
                        let _ = section.class_list().add_1("active");
                    }
                });
            let _ = link.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nav_targets() {
        assert_eq!(section_target("#appearance"), Some("appearance"));
        assert_eq!(section_target("#"), None);
        assert_eq!(section_target("appearance"), None);
    }

    #[test]
    fn untouched_slider_keeps_loaded_opacity() {
        assert_eq!(opacity_to_save("0.33", "0.35", "0.35"), "0.33");
        assert_eq!(opacity_to_save("0.33", "0.33", "0.33"), "0.33");
    }

    #[test]
    fn moved_slider_wins() {
        assert_eq!(opacity_to_save("0.33", "0.35", "0.6"), "0.6");
        assert_eq!(opacity_to_save("", "", "0.8"), "0.8");
    }

    #[test]
    fn color_fields_pair_picker_with_text() {
        for (picker, text) in COLOR_FIELDS {
            assert_eq!(text, format!("{picker}-text"));
        }
    }
}
