//! Terminal screens. Each one renders to an output stream, reads commands
//! from [`crate::app::Input`] and finishes with a [`crate::routes::Transition`].

pub mod home;
pub mod map;
pub mod occupancy;
pub mod parking_map;

/// Horizontal bar filled to `percent` of `width` cells
pub fn gauge(percent: f64, width: usize) -> String {
    let percent = if percent.is_finite() {
        percent.clamp(0.0, 100.0)
    } else {
        0.0
    };
    let filled = ((percent / 100.0) * width as f64).round() as usize;
    format!(
        "[{}{}]",
        "█".repeat(filled),
        "░".repeat(width.saturating_sub(filled))
    )
}

/// Split a command line into its verb and arguments
pub(crate) fn split_command(line: &str) -> (&str, Vec<&str>) {
    let mut parts = line.split_whitespace();
    let verb = parts.next().unwrap_or("");
    (verb, parts.collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gauge_fill() {
        assert_eq!(gauge(0.0, 4), "[░░░░]");
        assert_eq!(gauge(50.0, 4), "[██░░]");
        assert_eq!(gauge(100.0, 4), "[████]");
        assert_eq!(gauge(250.0, 4), "[████]");
        assert_eq!(gauge(f64::NAN, 4), "[░░░░]");
    }

    #[test]
    fn test_split_command() {
        assert_eq!(split_command("  pan 10 -5 "), ("pan", vec!["10", "-5"]));
        assert_eq!(split_command(""), ("", vec![]));
    }
}
