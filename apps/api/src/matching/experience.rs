//! Experience extraction: pulls a years-of-experience figure out of free text.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

// "3 years", "10+ years", "1.5 yrs", "5 + Years", "1 year"
static DURATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:^|[^\w.])(\d+(?:\.\d+)?)\s*\+?\s*(?:years?|yrs?)\b")
        .expect("duration pattern is a valid regex")
});

/// Returns the largest "<number> years" figure mentioned in `text`, or `0.0`.
///
/// A bare "years" with no number contributes nothing, and numbers that fail to
/// parse are skipped.
pub fn extract_experience_years(text: &str) -> f64 {
    let years = DURATION_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);

    debug!("Extracted experience: {years} years");
    years
}
