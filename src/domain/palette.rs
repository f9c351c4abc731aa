// Deterministic chart colours
use sha2::{Digest, Sha256};

pub const PALETTE: [&str; 10] = [
    "#2563eb", "#16a34a", "#f59e0b", "#dc2626", "#7c3aed", "#0891b2", "#db2777", "#65a30d",
    "#ea580c", "#475569",
];

/// Pick a palette colour for a widget from its id, or its position when it has none.
pub fn color_for(widget_id: &str, index: usize) -> &'static str {
    let key = if widget_id.is_empty() {
        format!("#{}", index)
    } else {
        widget_id.to_string()
    };
    let digest = Sha256::digest(key.as_bytes());
    let bucket = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]) as usize;
    PALETTE[bucket % PALETTE.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_is_stable() {
        assert_eq!(color_for("sales-by-month", 0), color_for("sales-by-month", 7));
        assert_eq!(color_for("", 3), color_for("", 3));
        assert!(PALETTE.contains(&color_for("", 3)));
    }

    #[test]
    fn test_colors_spread_over_palette() {
        let distinct: std::collections::HashSet<&str> =
            (0..50).map(|i| color_for("", i)).collect();
        assert!(distinct.len() > 1);
    }
}
