//! Terminal styling utilities
//!
//! Consistent color scheme for CLI output. Uses crossterm for cross-platform
//! terminal colors.

use crossterm::style::{StyledContent, Stylize};

/// Edge weight colors
/// - 1: Dim (single synapse, often noise)
/// - 2-4: White
/// - 5-9: Yellow
/// - 10+: Green (strong connection)
pub fn weight_style(weight: u32) -> StyledContent<String> {
    let label = weight.to_string();
    match weight {
        0 | 1 => label.dark_grey(),
        2..=4 => label.white(),
        5..=9 => label.yellow(),
        _ => label.green().bold(),
    }
}

/// Synapse score colors, relative to the active threshold
pub fn score_style(score: f64, threshold: f64) -> StyledContent<String> {
    let label = format!("{:.1}", score);
    if threshold > 0.0 && score < threshold {
        label.red()
    } else {
        label.white()
    }
}

/// Segment id styling
pub fn segment_id(id: &str) -> StyledContent<String> {
    id.to_string().cyan()
}

/// Direction arrow between two segments
pub fn arrow() -> StyledContent<&'static str> {
    "→".dark_grey()
}

/// Count styling: dim when zero
pub fn count(n: usize) -> StyledContent<String> {
    if n == 0 {
        n.to_string().dark_grey()
    } else {
        n.to_string().white()
    }
}

/// Section headers
pub fn header(text: &str) -> StyledContent<String> {
    text.to_string().bold()
}

/// Dim/muted text
pub fn dim(text: &str) -> StyledContent<String> {
    text.to_string().dark_grey()
}

/// Success text
pub fn success(text: &str) -> StyledContent<String> {
    text.to_string().green()
}

/// Error text
pub fn error(text: &str) -> StyledContent<String> {
    text.to_string().red()
}

/// Path styling
pub fn path(p: &str) -> StyledContent<String> {
    p.to_string().blue()
}
