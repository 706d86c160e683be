//! Settings page controller. Talks to the backend through [`SettingsBackend`]
//! and to the page through [`SettingsView`], so it runs natively under test.

use std::cell::RefCell;

use apexhud_core::api::ApiError;
use apexhud_core::settings::overrides::{preset_name, preset_names};
use apexhud_core::settings::{
    NameOverrides, OverrideEntry, Presets, SettingsDocument, SettingsForm,
};

/// One method per settings endpoint.
#[allow(async_fn_in_trait)]
pub trait SettingsBackend {
    async fn fetch_settings(&self) -> Result<SettingsDocument, ApiError>;
    /// Submit a full replacement. Presets are never part of `doc`.
    async fn save_settings(&self, doc: &SettingsDocument) -> Result<(), ApiError>;
    async fn add_override(&self, entry: &OverrideEntry) -> Result<NameOverrides, ApiError>;
    async fn remove_override(&self, player_id: &str) -> Result<NameOverrides, ApiError>;
    async fn list_overrides(&self) -> Result<NameOverrides, ApiError>;
    async fn save_preset(&self, name: &str, overrides: &NameOverrides)
    -> Result<Presets, ApiError>;
    async fn load_preset(&self, name: &str) -> Result<NameOverrides, ApiError>;
    async fn delete_preset(&self, name: &str) -> Result<Presets, ApiError>;
}

/// Form IO, list rendering, and blocking prompts.
pub trait SettingsView {
    fn read_form(&self) -> SettingsForm;
    fn write_form(&self, form: &SettingsForm);
    /// Raw `(player id, display name)` input text.
    fn override_inputs(&self) -> (String, String);
    fn clear_override_inputs(&self);
    fn preset_name_input(&self) -> String;
    fn clear_preset_name_input(&self);
    fn selected_preset(&self) -> String;
    fn clear_preset_selection(&self);
    fn show_overrides(&self, overrides: &NameOverrides);
    fn show_presets(&self, names: &[String]);
    fn alert(&self, message: &str);
    fn confirm(&self, message: &str) -> bool;
}

/// Drives the settings page. Every operation alerts the user on failure and
/// returns the error; the displayed lists change only on success.
pub struct SettingsPage<B, V> {
    backend: B,
    view: V,
    overrides: RefCell<NameOverrides>,
    presets: RefCell<Vec<String>>,
}

impl<B: SettingsBackend, V: SettingsView> SettingsPage<B, V> {
    pub fn new(backend: B, view: V) -> Self {
        Self {
            backend,
            view,
            overrides: RefCell::new(NameOverrides::new()),
            presets: RefCell::new(Vec::new()),
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn overrides(&self) -> NameOverrides {
        self.overrides.borrow().clone()
    }

    pub fn presets(&self) -> Vec<String> {
        self.presets.borrow().clone()
    }

    /// Fetch the settings document and fill every control; then list the
    /// current overrides.
    pub async fn load(&self) -> Result<(), ApiError> {
        let doc = match self.backend.fetch_settings().await {
            Ok(doc) => doc,
            Err(e) => return Err(self.fail("Failed to load settings", e)),
        };
        self.view.write_form(&SettingsForm::from_document(&doc));
        let opacity = doc.overlay.opacity;
        if !(0.0..=1.0).contains(&opacity) {
            self.view.alert(&format!(
                "Stored opacity {opacity} is outside 0 to 1; it will be saved as {}.",
                opacity.clamp(0.0, 1.0)
            ));
        }
        let names = doc
            .name_override
            .presets
            .as_ref()
            .map(preset_names)
            .unwrap_or_default();
        self.set_presets(names);

        match self.backend.list_overrides().await {
            Ok(overrides) => self.set_overrides(overrides),
            Err(e) => crate::diag::console_warn!("Could not list name overrides: {e}"),
        }
        Ok(())
    }

    pub async fn save(&self) -> Result<(), ApiError> {
        let doc = match self.view.read_form().to_document() {
            Ok(doc) => doc,
            Err(e) => {
                let error = ApiError::Invalid(e.to_string());
                return Err(self.fail("Failed to save settings", error));
            },
        };
        match self.backend.save_settings(&doc).await {
            Ok(()) => {
                self.view
                    .alert("Settings saved. Reload the overlay to apply the changes.");
                Ok(())
            },
            Err(e) => Err(self.fail("Failed to save settings", e)),
        }
    }

    pub async fn add_name_override(&self) -> Result<(), ApiError> {
        let (player_id, display_name) = self.view.override_inputs();
        let Some(entry) = OverrideEntry::from_inputs(&player_id, &display_name) else {
            return Err(self.invalid("Enter both a player ID and a display name."));
        };
        match self.backend.add_override(&entry).await {
            Ok(overrides) => {
                self.view.clear_override_inputs();
                self.set_overrides(overrides);
                Ok(())
            },
            Err(e) => Err(self.fail("Failed to add name override", e)),
        }
    }

    pub async fn remove_name_override(&self, player_id: &str) -> Result<(), ApiError> {
        match self.backend.remove_override(player_id).await {
            Ok(overrides) => {
                self.set_overrides(overrides);
                Ok(())
            },
            Err(e) => Err(self.fail("Failed to remove name override", e)),
        }
    }

    /// Snapshot the current overrides (fetched fresh) under a new name.
    pub async fn save_preset(&self) -> Result<(), ApiError> {
        let Some(name) = preset_name(&self.view.preset_name_input()) else {
            return Err(self.invalid("Enter a preset name."));
        };
        let current = match self.backend.list_overrides().await {
            Ok(current) => current,
            Err(e) => return Err(self.fail("Failed to save preset", e)),
        };
        match self.backend.save_preset(&name, &current).await {
            Ok(presets) => {
                self.set_presets(preset_names(&presets));
                self.view.clear_preset_name_input();
                self.view.alert(&format!("Preset \"{name}\" saved."));
                Ok(())
            },
            Err(e) => Err(self.fail("Failed to save preset", e)),
        }
    }

    pub async fn load_preset(&self) -> Result<(), ApiError> {
        let Some(name) = preset_name(&self.view.selected_preset()) else {
            return Err(self.invalid("Select a preset."));
        };
        match self.backend.load_preset(&name).await {
            Ok(overrides) => {
                self.set_overrides(overrides);
                self.view.alert(&format!("Preset \"{name}\" loaded."));
                Ok(())
            },
            Err(e) => Err(self.fail("Failed to load preset", e)),
        }
    }

    /// Asks for confirmation first; declining sends nothing.
    pub async fn delete_preset(&self) -> Result<(), ApiError> {
        let Some(name) = preset_name(&self.view.selected_preset()) else {
            return Err(self.invalid("Select a preset."));
        };
        if !self.view.confirm(&format!("Delete preset \"{name}\"?")) {
            return Ok(());
        }
        match self.backend.delete_preset(&name).await {
            Ok(presets) => {
                self.set_presets(preset_names(&presets));
                self.view.clear_preset_selection();
                self.view.alert(&format!("Preset \"{name}\" deleted."));
                Ok(())
            },
            Err(e) => Err(self.fail("Failed to delete preset", e)),
        }
    }

    fn set_overrides(&self, overrides: NameOverrides) {
        self.view.show_overrides(&overrides);
        *self.overrides.borrow_mut() = overrides;
    }

    fn set_presets(&self, names: Vec<String>) {
        self.view.show_presets(&names);
        *self.presets.borrow_mut() = names;
    }

    fn invalid(&self, message: &str) -> ApiError {
        self.view.alert(message);
        ApiError::Invalid(message.to_string())
    }

    fn fail(&self, context: &str, error: ApiError) -> ApiError {
        crate::diag::console_error!("{context}: {error}");
        self.view.alert(&format!("{context}: {error}"));
        error
    }
}
