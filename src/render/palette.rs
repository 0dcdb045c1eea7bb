//! Node colours.
//!
//! Nodes take their colour from a fixed palette by table index, cycling when
//! the tree has more nodes than colours. Hovered and dragged nodes are drawn
//! lightened.

/// Colours cycled through by node index.
pub const NODE_COLORS: [&str; 21] = [
    "#911eb4", "#4363d8", "#e6194b", "#3cb44b", "#ffe119", "#f58231", "#46f0f0",
    "#f032e6", "#bcf60c", "#fabebe", "#008080", "#e6beff", "#9a6324", "#800000",
    "#aaffc3", "#808000", "#000075", "#808080", "#000000", "#fffac8", "#ffd8b1",
];

/// Amount added to each channel of a highlighted node's colour.
pub const HIGHLIGHT_LIGHTEN: i16 = 30;

/// Palette colour of the node at `index` in table order.
#[must_use]
pub fn node_color(index: usize) -> &'static str {
    NODE_COLORS[index % NODE_COLORS.len()]
}

/// Converts a hex colour to an RGB tuple.
///
/// Strips a `#` prefix if present. Returns `(255, 255, 255)` (white) on parse
/// errors.
fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
    let hex = hex.trim_start_matches('#').trim();

    if hex.len() != 6 || !hex.is_ascii() {
        return (255, 255, 255);
    }

    let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
    let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
    let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);

    (r, g, b)
}

/// Adds `amount` to every channel of `hex`, clamping to `0..=255`.
///
/// # Example
///
/// ```
/// use tree_explorer::render::palette::lighten;
///
/// assert_eq!(lighten("#911eb4", 30), "#af3cd2");
/// assert_eq!(lighten("#ffe119", 30), "#ffff37");
/// ```
#[must_use]
pub fn lighten(hex: &str, amount: i16) -> String {
    let (r, g, b) = hex_to_rgb(hex);
    let shift = |channel: u8| -> u8 {
        u8::try_from((i16::from(channel) + amount).clamp(0, 255)).unwrap_or(u8::MAX)
    };
    format!("#{:02x}{:02x}{:02x}", shift(r), shift(g), shift(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_cycles() {
        assert_eq!(node_color(0), "#911eb4");
        assert_eq!(node_color(21), "#911eb4");
        assert_eq!(node_color(22), "#4363d8");
    }

    #[test]
    fn lighten_clamps_both_ends() {
        assert_eq!(lighten("#000000", 30), "#1e1e1e");
        assert_eq!(lighten("#fffac8", 30), "#ffffe6");
        assert_eq!(lighten("#1e1e1e", -40), "#000000");
        assert_eq!(lighten("nonsense", 30), "#ffffff");
    }
}
