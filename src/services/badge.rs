//! Coverage badge rendering.
//!
//! Produces a small shields-style SVG for embedding in repository READMEs.

const COLOR_GOOD: &str = "#4c1";
const COLOR_WARN: &str = "#dfb317";
const COLOR_BAD: &str = "#e05d44";

fn coverage_color(percentage: f64) -> &'static str {
    if percentage >= 90.0 {
        COLOR_GOOD
    } else if percentage >= 70.0 {
        COLOR_WARN
    } else {
        COLOR_BAD
    }
}

/// Render an SVG coverage badge for the given line coverage percentage.
pub fn render_coverage_badge(percentage: f64) -> String {
    let label = "coverage";
    let value = format!("{:.0}%", percentage);
    let color = coverage_color(percentage);

    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="104" height="20" role="img" aria-label="{label}: {value}">
  <linearGradient id="s" x2="0" y2="100%">
    <stop offset="0" stop-color="#bbb" stop-opacity=".1"/>
    <stop offset="1" stop-opacity=".1"/>
  </linearGradient>
  <rect rx="3" width="104" height="20" fill="#555"/>
  <rect rx="3" x="62" width="42" height="20" fill="{color}"/>
  <rect rx="3" width="104" height="20" fill="url(#s)"/>
  <g fill="#fff" text-anchor="middle" font-family="Verdana,Geneva,DejaVu Sans,sans-serif" font-size="11">
    <text x="31" y="14">{label}</text>
    <text x="83" y="14">{value}</text>
  </g>
</svg>"##
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badge_contains_rounded_percentage() {
        let svg = render_coverage_badge(87.4);
        assert!(svg.contains(">87%<"));
        assert!(svg.starts_with("<svg"));
    }

    #[test]
    fn badge_color_follows_thresholds() {
        assert!(render_coverage_badge(95.0).contains(COLOR_GOOD));
        assert!(render_coverage_badge(75.0).contains(COLOR_WARN));
        assert!(render_coverage_badge(12.5).contains(COLOR_BAD));
    }
}
