//! CSS color helpers for the overlay panels and the settings color pickers.
//!
//! Only the forms the overlay actually deals with are understood:
//! `#rgb`, `#rrggbb`, `rgb(r, g, b)` and `rgba(r, g, b, a)`.

/// An sRGB color with 8-bit channels and a `[0, 1]` alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parse a CSS color string. Returns `None` for anything unrecognized.
    pub fn parse(input: &str) -> Option<Self> {
        let s = input.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        if let Some(body) = strip_function(s, "rgba") {
            let parts = split_args(body);
            if parts.len() != 4 {
                return None;
            }
            let a: f64 = parts[3].parse().ok()?;
            if !a.is_finite() {
                return None;
            }
            return Some(Self {
                r: parse_channel(parts[0])?,
                g: parse_channel(parts[1])?,
                b: parse_channel(parts[2])?,
                a: a.clamp(0.0, 1.0),
            });
        }
        if let Some(body) = strip_function(s, "rgb") {
            let parts = split_args(body);
            if parts.len() != 3 {
                return None;
            }
            return Some(Self::opaque(
                parse_channel(parts[0])?,
                parse_channel(parts[1])?,
                parse_channel(parts[2])?,
            ));
        }
        None
    }

    /// `#rrggbb`, dropping alpha.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// `rgba(r, g, b, a)` in the spacing browsers report from computed styles.
    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self {
            a: if a.is_finite() { a.clamp(0.0, 1.0) } else { self.a },
            ..self
        }
    }
}

/// Rewrite a computed `rgb()`/`rgba()` background with a new alpha, keeping
/// its RGB channels. Returns `None` when the input is not an rgb form.
pub fn with_alpha(css: &str, alpha: f64) -> Option<String> {
    let s = css.trim();
    if !s.starts_with("rgb") {
        return None;
    }
    Rgba::parse(s).map(|c| c.with_alpha(alpha).to_css())
}

/// Value for an `<input type="color">` given the paired text field.
///
/// `rgba()` text is approximated by its opaque hex; the alpha channel is
/// lost in this direction only. Hex text passes through normalized.
pub fn picker_value(text: &str) -> Option<String> {
    Rgba::parse(text).map(|c| c.to_hex())
}

fn strip_function<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    let rest = s.strip_prefix(name)?.trim_start();
    rest.strip_prefix('(')?.strip_suffix(')')
}

fn split_args(body: &str) -> Vec<&str> {
    body.split(',').map(str::trim).collect()
}

fn parse_channel(s: &str) -> Option<u8> {
    let v: f64 = s.parse().ok()?;
    if !v.is_finite() {
        return None;
    }
    Some(v.round().clamp(0.0, 255.0) as u8)
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 => {
            let mut ch = hex.chars().map(|c| {
                let v = c.to_digit(16).unwrap_or(0) as u8;
                v * 16 + v
            });
            Some(Rgba::opaque(ch.next()?, ch.next()?, ch.next()?))
        },
        6 => Some(Rgba::opaque(
            u8::from_str_radix(&hex[0..2], 16).ok()?,
            u8::from_str_radix(&hex[2..4], 16).ok()?,
            u8::from_str_radix(&hex[4..6], 16).ok()?,
        )),
        _ => None,
    }
}
