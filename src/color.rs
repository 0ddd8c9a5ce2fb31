//! Color-token classification.
//!
//! A background or text value is either a recognized color token (a named
//! color or a hex form) or an image source. `parse` makes that call: it
//! returns the decoded RGBA for recognized tokens and `None` for everything
//! else, which callers then treat as a source identifier.

/// An RGBA color, 8 bits per channel.
pub type Color = [u8; 4];

/// Opaque black, the fallback used when no background or text color is
/// configured.
pub const BLACK: Color = [0, 0, 0, 255];

// The CSS basic palette plus the handful of extended names that show up in
// real templates.
const NAMED: &[(&str, Color)] = &[
    ("aqua", [0, 255, 255, 255]),
    ("black", [0, 0, 0, 255]),
    ("blue", [0, 0, 255, 255]),
    ("brown", [165, 42, 42, 255]),
    ("cyan", [0, 255, 255, 255]),
    ("fuchsia", [255, 0, 255, 255]),
    ("gold", [255, 215, 0, 255]),
    ("gray", [128, 128, 128, 255]),
    ("green", [0, 128, 0, 255]),
    ("grey", [128, 128, 128, 255]),
    ("lime", [0, 255, 0, 255]),
    ("magenta", [255, 0, 255, 255]),
    ("maroon", [128, 0, 0, 255]),
    ("navy", [0, 0, 128, 255]),
    ("olive", [128, 128, 0, 255]),
    ("orange", [255, 165, 0, 255]),
    ("pink", [255, 192, 203, 255]),
    ("purple", [128, 0, 128, 255]),
    ("red", [255, 0, 0, 255]),
    ("silver", [192, 192, 192, 255]),
    ("teal", [0, 128, 128, 255]),
    ("transparent", [0, 0, 0, 0]),
    ("violet", [238, 130, 238, 255]),
    ("white", [255, 255, 255, 255]),
    ("yellow", [255, 255, 0, 255]),
];

/// Parse a color token.
///
/// Accepts the named palette above and `#rgb`, `#rgba`, `#rrggbb`,
/// `#rrggbbaa` hex forms. Returns `None` when the token is not a recognized
/// color and should be treated as an image source instead.
pub fn parse(token: &str) -> Option<Color> {
    let token = token.trim();
    if let Some(hex) = token.strip_prefix('#') {
        return parse_hex(hex);
    }
    let lower = token.to_ascii_lowercase();
    NAMED
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, color)| *color)
}

/// Whether `token` denotes a recognized color.
pub fn is_color(token: &str) -> bool {
    parse(token).is_some()
}

fn parse_hex(hex: &str) -> Option<Color> {
    let nibble = |c: u8| -> Option<u8> {
        match c {
            b'0'..=b'9' => Some(c - b'0'),
            b'a'..=b'f' => Some(c - b'a' + 10),
            b'A'..=b'F' => Some(c - b'A' + 10),
            _ => None,
        }
    };
    let bytes = hex.as_bytes();
    match bytes.len() {
        // Short forms replicate each digit: #1af => #11aaff
        3 | 4 => {
            let mut out = [0u8, 0, 0, 255];
            for (i, &b) in bytes.iter().enumerate() {
                let n = nibble(b)?;
                out[i] = n << 4 | n;
            }
            Some(out)
        }
        6 | 8 => {
            let mut out = [0u8, 0, 0, 255];
            for i in 0..bytes.len() / 2 {
                out[i] = nibble(bytes[i * 2])? << 4 | nibble(bytes[i * 2 + 1])?;
            }
            Some(out)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_colors_parse() {
        assert_eq!(parse("blue"), Some([0, 0, 255, 255]));
        assert_eq!(parse("Red"), Some([255, 0, 0, 255]));
        assert_eq!(parse(" black "), Some(BLACK));
    }

    #[test]
    fn hex_forms_parse() {
        assert_eq!(parse("#ff0000"), Some([255, 0, 0, 255]));
        assert_eq!(parse("#f00"), Some([255, 0, 0, 255]));
        assert_eq!(parse("#ff000080"), Some([255, 0, 0, 128]));
        assert_eq!(parse("#f008"), Some([255, 0, 0, 136]));
    }

    #[test]
    fn non_colors_classify_as_sources() {
        assert!(!is_color("https://example.com/bg.png"));
        assert!(!is_color("assets/bg.jpg"));
        assert!(!is_color("#zzz"));
        assert!(!is_color("#12345"));
    }
}
