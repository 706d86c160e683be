//! Writes view models into the overlay page. Each call rewrites the regions
//! it is given from scratch; nothing is diffed.

use apexhud_core::hud::{AppearancePlan, HudFrame, Visibility};

#[cfg(target_family = "wasm")]
use apexhud_core::hud::{BarView, MatchView, MemberView, PlayerView};

#[cfg(target_family = "wasm")]
use crate::dom;

/// Container that is dragged and toggled.
pub const OVERLAY_ID: &str = "overlay";

pub struct Renderer {
    #[cfg(target_family = "wasm")]
    document: web_sys::Document,
}

impl Renderer {
    #[cfg(target_family = "wasm")]
    pub fn new() -> Option<Self> {
        Some(Self {
            document: dom::document()?,
        })
    }

    #[cfg(not(target_family = "wasm"))]
    pub fn new() -> Option<Self> {
        Some(Self {})
    }

    /// Draw every region the frame carries; `None` regions stay as they are.
    pub fn render(&self, frame: &HudFrame) {
        #[cfg(target_family = "wasm")]
        {
            if let Some(phase) = &frame.phase {
                dom::set_text(&self.document, "game-phase", phase);
            }
            if let Some(view) = &frame.match_view {
                self.render_match(view);
            }
            if let Some(player) = &frame.player {
                self.render_player(player);
            }
            if let Some(squad) = &frame.squad {
                self.render_squad(squad);
            }
        }
        #[cfg(not(target_family = "wasm"))]
        let _ = frame;
    }

    pub fn set_status(&self, text: &str) {
        #[cfg(target_family = "wasm")]
        dom::set_text(&self.document, "status", text);
        #[cfg(not(target_family = "wasm"))]
        let _ = text;
    }

    pub fn set_overlay_visibility(&self, visibility: Visibility) {
        #[cfg(target_family = "wasm")]
        dom::with_element::<web_sys::HtmlElement>(&self.document, OVERLAY_ID, |el| {
            dom::set_style(el, "display", visibility.display_css())
        });
        #[cfg(not(target_family = "wasm"))]
        let _ = visibility;
    }

    pub fn apply_appearance(&self, plan: &AppearancePlan) {
        #[cfg(target_family = "wasm")]
        {
            if let Some(body) = self.document.body() {
                body.set_class_name(&plan.body_class);
                dom::set_style(&body, "font-size", &plan.font_size_css());
            }
            self.apply_panel_opacity(plan.panel_opacity);

            for (element, visible) in &plan.visibility {
                for el in dom::query_all(&self.document, element.selector()) {
                    dom::set_display(&el, *visible);
                }
            }

            if let Some(root) = self
                .document
                .document_element()
                .and_then(|el| wasm_bindgen::JsCast::dyn_into::<web_sys::HtmlElement>(el).ok())
            {
                for (name, value) in &plan.css_vars {
                    dom::set_style(&root, name, value);
                }
            }

            if let Some(position) = &plan.position {
                dom::with_element::<web_sys::HtmlElement>(&self.document, OVERLAY_ID, |el| {
                    dom::set_style(el, "top", &position.top);
                    dom::set_style(el, "left", &position.left);
                });
            }
        }
        #[cfg(not(target_family = "wasm"))]
        let _ = plan;
    }

    /// Re-tint each panel's computed background, keeping its RGB.
    #[cfg(target_family = "wasm")]
    fn apply_panel_opacity(&self, opacity: f64) {
        let Some(window) = web_sys::window() else {
            return;
        };
        for panel in dom::query_all(&self.document, ".panel") {
            let Ok(Some(computed)) = window.get_computed_style(&panel) else {
                continue;
            };
            let Ok(background) = computed.get_property_value("background-color") else {
                continue;
            };
            match apexhud_core::color::with_alpha(&background, opacity) {
                Some(tinted) => dom::set_style(&panel, "background-color", &tinted),
                None => crate::diag::console_warn!("panel background {background:?} not rgb"),
            }
        }
    }

    #[cfg(target_family = "wasm")]
    fn render_match(&self, view: &MatchView) {
        dom::with_element::<web_sys::HtmlElement>(&self.document, "match-status", |el| {
            el.set_text_content(Some(view.status.label()));
            el.set_class_name(view.status.css_class());
        });
        dom::with_element::<web_sys::HtmlElement>(&self.document, "remaining-squads", |el| {
            match view.remaining_text() {
                Some(text) => {
                    el.set_text_content(Some(&text));
                    dom::set_display(el, true);
                },
                None => dom::set_display(el, false),
            }
        });
    }

    #[cfg(target_family = "wasm")]
    fn render_player(&self, player: &PlayerView) {
        let doc = &self.document;
        dom::set_text(doc, "player-name", &player.name);
        dom::set_text(doc, "player-legend", &player.legend);
        self.render_bar("health-fill", "health-text", &player.health);
        self.render_bar("shield-fill", "shield-text", &player.shields);
        dom::set_text(doc, "kills-value", &player.kills);
        dom::set_text(doc, "damage-value", &player.damage);
    }

    #[cfg(target_family = "wasm")]
    fn render_bar(&self, fill_id: &str, text_id: &str, bar: &BarView) {
        dom::with_element::<web_sys::HtmlElement>(&self.document, fill_id, |el| {
            dom::set_style(el, "width", &bar.width())
        });
        dom::set_text(&self.document, text_id, &bar.text());
    }

    #[cfg(target_family = "wasm")]
    fn render_squad(&self, squad: &[MemberView]) {
        let Some(container) = dom::by_id::<web_sys::HtmlElement>(&self.document, "squad-members")
        else {
            return;
        };
        container.set_inner_html("");
        for member in squad {
            if let Some(row) = self.member_row(member)
                && let Err(e) = container.append_child(&row)
            {
                crate::diag::console_warn!("squad row not added: {e:?}");
            }
        }
    }

    #[cfg(target_family = "wasm")]
    fn member_row(&self, member: &MemberView) -> Option<web_sys::HtmlElement> {
        let doc = &self.document;
        let row = dom::create(doc, "div", "squad-member", None)?;
        row.append_child(&dom::create(doc, "div", "name", Some(&member.name))?)
            .ok()?;
        row.append_child(&dom::create(doc, "div", "legend", Some(&member.legend))?)
            .ok()?;
        for (kind, bar) in [("health", &member.health), ("shield", &member.shields)] {
            let track = dom::create(doc, "div", &format!("{kind}-bar"), None)?;
            let fill = dom::create(doc, "div", &format!("{kind}-fill"), None)?;
            dom::set_style(&fill, "width", &bar.width());
            track.append_child(&fill).ok()?;
            track
                .append_child(&dom::create(doc, "div", "bar-text", Some(&bar.text()))?)
                .ok()?;
            row.append_child(&track).ok()?;
        }
        Some(row)
    }
}
