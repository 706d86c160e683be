pub mod api_client;
mod diag;
mod dom;
#[cfg(target_family = "wasm")]
mod drag;
pub mod hotkey;
pub mod net_client;
pub mod overlay;
pub mod renderer;
pub mod settings_form;
pub mod settings_page;

use apexhud_core::config::ClientConfig;

/// Client settings baked in at build time from `web/overlay.toml`. Problems
/// are reported on the console; the affected values fall back to defaults.
pub fn client_config() -> ClientConfig {
    let (config, problems) = ClientConfig::parse(include_str!("../../../web/overlay.toml"));
    for problem in &problems {
        diag::console_warn!("overlay.toml: {problem}");
    }
    config
}

#[cfg(target_family = "wasm")]
mod entry {
    use std::rc::{Rc, Weak};

    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;

    use apexhud_core::hud::AppearancePlan;

    use crate::api_client::HttpBackend;
    use crate::diag::{console_error, console_log};
    use crate::hotkey::{VisibilityToggle, attach_toggle};
    use crate::net_client::WsClient;
    use crate::overlay::{self, Overlay};
    use crate::renderer::{OVERLAY_ID, Renderer};
    use crate::settings_form::{DomSettingsView, attach_page_behavior};
    use crate::settings_page::{SettingsBackend, SettingsPage};
    use crate::{client_config, dom};

    type Page = SettingsPage<HttpBackend, DomSettingsView>;

    fn api_backend(config: &apexhud_core::config::ClientConfig) -> Option<HttpBackend> {
        let origin = web_sys::window()?.location().origin().ok()?;
        Some(HttpBackend::new(config.api_base(&origin)))
    }

    /// Entry point for `index.html`.
    #[wasm_bindgen]
    pub fn start_overlay() {
        console_error_panic_hook::set_once();

        let config = client_config();
        let (Some(document), Some(renderer)) = (dom::document(), Renderer::new()) else {
            console_error!("overlay page is missing its document");
            return;
        };
        let renderer = Rc::new(renderer);
        let overlay = Overlay::new(Rc::clone(&renderer));
        let client = WsClient::new(
            &config.ws_url(None),
            config.reconnect_policy(),
            config.greeting(),
        );
        overlay::wire(&client, &overlay);

        if crate::drag::attach_drag(&document, OVERLAY_ID).is_none() {
            console_log!("#{OVERLAY_ID} missing; dragging disabled");
        }
        attach_toggle(&document, &VisibilityToggle::new(config.shortcut()), &renderer);

        let backend = api_backend(&config);
        spawn_local(async move {
            let settings = match &backend {
                Some(backend) => match backend.fetch_settings().await {
                    Ok(doc) => Some(doc),
                    Err(e) => {
                        console_error!("Failed to load overlay settings: {e}");
                        None
                    },
                },
                None => None,
            };
            if let Some(doc) = &settings {
                renderer.apply_appearance(&AppearancePlan::from_settings(&doc.overlay));
            }
            client.set_url(&config.ws_url(settings.as_ref()));
            client.connect();
        });
    }

    /// Entry point for `settings.html`.
    #[wasm_bindgen]
    pub fn start_settings() {
        console_error_panic_hook::set_once();

        let config = client_config();
        let (Some(document), Some(backend)) = (dom::document(), api_backend(&config)) else {
            console_error!("settings page is missing its document");
            return;
        };
        let page: Rc<Page> = Rc::new(SettingsPage::new(
            backend,
            DomSettingsView::new(document.clone()),
        ));

        {
            let weak: Weak<Page> = Rc::downgrade(&page);
            page.view().set_on_remove(move |player_id| {
                if let Some(page) = weak.upgrade() {
                    spawn_local(async move {
                        let _ = page.remove_name_override(&player_id).await;
                    });
                }
            });
        }

        on_click(&document, &page, "save-settings", |page| async move {
            let _ = page.save().await;
        });
        on_click(&document, &page, "add-name-override", |page| async move {
            let _ = page.add_name_override().await;
        });
        on_click(&document, &page, "save-preset", |page| async move {
            let _ = page.save_preset().await;
        });
        on_click(&document, &page, "load-preset", |page| async move {
            let _ = page.load_preset().await;
        });
        on_click(&document, &page, "delete-preset", |page| async move {
            let _ = page.delete_preset().await;
        });

        attach_page_behavior(&document);

        spawn_local(async move {
            let _ = page.load().await;
        });
    }

    /// Run `action` on the page each time the button with `id` is clicked.
    /// Failures are reported to the user inside the page operations.
    fn on_click<F, Fut>(document: &web_sys::Document, page: &Rc<Page>, id: &str, action: F)
    where
        F: Fn(Rc<Page>) -> Fut + 'static,
        Fut: std::future::Future<Output = ()> + 'static,
    {
        let page = Rc::clone(page);
        dom::on_click(document, id, move || spawn_local(action(Rc::clone(&page))));
    }
}
