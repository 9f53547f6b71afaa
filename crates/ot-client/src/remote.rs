//! Other participants of the session and their cursor colors.

use ot_text::Cursor;

use crate::adapter::DocumentAdapter;

#[derive(Debug, Clone, PartialEq)]
pub struct OtherClient {
    pub id: String,
    pub name: Option<String>,
    pub hue: f64,
    /// Caret color.
    pub color: String,
    /// Selection color.
    pub light_color: String,
    pub cursor: Option<Cursor>,
}

impl OtherClient {
    /// The hue is derived from the name, or from the id for anonymous
    /// participants, so every client picks the same color.
    pub fn new(id: impl Into<String>, name: Option<String>) -> Self {
        let id = id.into();
        let hue = hue_from_name(name.as_deref().unwrap_or(&id));
        let mut client = Self {
            id,
            name,
            hue,
            color: String::new(),
            light_color: String::new(),
            cursor: None,
        };
        client.set_color(hue);
        client
    }

    pub fn set_color(&mut self, hue: f64) {
        self.hue = hue;
        self.color = hsl_to_hex(hue, 0.75, 0.5);
        self.light_color = hsl_to_hex(hue, 0.5, 0.9);
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.set_color(hue_from_name(&name));
        self.name = Some(name);
    }

    pub fn update_cursor<D: DocumentAdapter>(&mut self, cursor: Cursor, document: &mut D) {
        let color = if cursor.has_selection() {
            &self.light_color
        } else {
            &self.color
        };
        document.set_other_cursor(&self.id, cursor, color);
        self.cursor = Some(cursor);
    }

    pub fn remove_cursor<D: DocumentAdapter>(&mut self, document: &mut D) {
        if self.cursor.take().is_some() {
            document.remove_other_cursor(&self.id);
        }
    }
}

/// Hue in `[0, 1)` hashed from the UTF-16 code units of `name`.
pub fn hue_from_name(name: &str) -> f64 {
    let a = name
        .encode_utf16()
        .fold(1u32, |a, unit| 17 * (a + u32::from(unit)) % 360);
    f64::from(a) / 360.0
}

/// `#rrggbb` for a color given as hue, saturation and lightness in `[0, 1]`.
pub fn hsl_to_hex(h: f64, s: f64, l: f64) -> String {
    if s == 0.0 {
        return rgb_to_hex(l, l, l);
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { (l + s) - s * l };
    let p = 2.0 * l - q;
    let channel = |hue: f64| {
        let hue = if hue < 0.0 {
            hue + 1.0
        } else if hue > 1.0 {
            hue - 1.0
        } else {
            hue
        };
        if 6.0 * hue < 1.0 {
            p + (q - p) * 6.0 * hue
        } else if 2.0 * hue < 1.0 {
            q
        } else if 3.0 * hue < 2.0 {
            p + (q - p) * 6.0 * (2.0 / 3.0 - hue)
        } else {
            p
        }
    };
    rgb_to_hex(channel(h + 1.0 / 3.0), channel(h), channel(h - 1.0 / 3.0))
}

fn rgb_to_hex(r: f64, g: f64, b: f64) -> String {
    let digit = |n: f64| (255.0 * n).round().clamp(0.0, 255.0) as u8;
    format!("#{:02x}{:02x}{:02x}", digit(r), digit(g), digit(b))
}
