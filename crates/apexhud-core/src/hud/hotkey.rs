/// A key press as reported by a `keydown` event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPress {
    pub key: String,
    pub alt: bool,
    pub ctrl: bool,
    pub shift: bool,
    pub meta: bool,
}

/// A modifier+key combination such as `Alt+O`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    key: String,
    alt: bool,
    ctrl: bool,
    shift: bool,
    meta: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutParseError(pub String);

impl std::fmt::Display for ShortcutParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid shortcut: {:?}", self.0)
    }
}

impl std::error::Error for ShortcutParseError {}

/// `Alt+O`.
impl Default for Shortcut {
    fn default() -> Self {
        Self {
            key: "o".to_string(),
            alt: true,
            ctrl: false,
            shift: false,
            meta: false,
        }
    }
}

impl Shortcut {
    /// Parse `Mod+Mod+Key`. Modifiers are case-insensitive; exactly one
    /// non-modifier key is required.
    pub fn parse(s: &str) -> Result<Self, ShortcutParseError> {
        let err = || ShortcutParseError(s.to_string());
        let mut shortcut = Self {
            key: String::new(),
            alt: false,
            ctrl: false,
            shift: false,
            meta: false,
        };
        for part in s.split('+').map(str::trim) {
            match part.to_ascii_lowercase().as_str() {
                "" => return Err(err()),
                "alt" | "option" => shortcut.alt = true,
                "ctrl" | "control" => shortcut.ctrl = true,
                "shift" => shortcut.shift = true,
                "meta" | "cmd" | "super" => shortcut.meta = true,
                key => {
                    if !shortcut.key.is_empty() {
                        return Err(err());
                    }
                    shortcut.key = key.to_string();
                },
            }
        }
        if shortcut.key.is_empty() {
            return Err(err());
        }
        Ok(shortcut)
    }

    pub fn matches(&self, press: &KeyPress) -> bool {
        press.alt == self.alt
            && press.ctrl == self.ctrl
            && press.shift == self.shift
            && press.meta == self.meta
            && press.key.eq_ignore_ascii_case(&self.key)
    }
}

/// Shown/hidden state of the overlay container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility {
    visible: bool,
}

impl Default for Visibility {
    fn default() -> Self {
        Self { visible: true }
    }
}

impl Visibility {
    pub fn toggle(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn display_css(&self) -> &'static str {
        if self.visible { "block" } else { "none" }
    }
}
