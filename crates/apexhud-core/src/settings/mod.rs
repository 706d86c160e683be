pub mod document;
pub mod form;
pub mod overrides;

pub use document::{
    ColorSettings, Endpoint, NameOverrideSettings, OverlayPosition, OverlaySettings,
    SettingsDocument, ShowElements,
};
pub use form::{FormError, SettingsForm};
pub use overrides::{NameOverrides, OverrideEntry, Presets};
