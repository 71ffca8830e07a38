use regex::Regex;
use tracing::debug;

use crate::intent::Intent;

/// Ordered template matcher over the supported question shapes.
///
/// Templates are tried in a fixed priority order and the first match wins,
/// even when a later template would also match. Integer captures must parse
/// as positive integers; a failed parse is a non-match for that template and
/// matching falls through to the next one.
///
/// Known limitation: the `compare rainfall between A and B` split is
/// greedy-rightmost, so a state name containing ` and ` is split at its last
/// conjunction.
pub struct IntentRecognizer {
    top_crops: Regex,
    trend: Regex,
    compare_rain: Regex,
    rain_trend: Regex,
}

impl IntentRecognizer {
    pub fn new() -> Self {
        // Anchored and whitespace-tolerant; the capture charset mirrors the
        // punctuation allowed inside state and crop names.
        Self {
            top_crops: template(r"^top\s+(\d+)\s+crops\s+in\s+([\w\s&.,'-]+)$"),
            trend: template(
                r"^trend\s+of\s+([\w\s&.,'-]+)\s+over\s+last\s+(\d+)\s+years\s+in\s+([\w\s&.,'-]+)$",
            ),
            compare_rain: template(
                r"^compare\s+rainfall\s+between\s+([\w\s&.,'-]+)\s+and\s+([\w\s&.,'-]+?)(?:\s+over\s+last\s+(\d+)\s+years)?$",
            ),
            rain_trend: template(
                r"^trend\s+of\s+rainfall\s+in\s+([\w\s&.,'-]+?)\s+for\s+last\s+(\d+)\s+years$",
            ),
        }
    }

    /// Match a raw question against the templates. Pure function of the
    /// input text; unmatched input yields `Intent::Unknown`.
    pub fn recognize(&self, question: &str) -> Intent {
        let q = question.trim().to_lowercase();
        if q.is_empty() {
            return Intent::Unknown;
        }

        if let Some(caps) = self.top_crops.captures(&q) {
            if let Some(n) = positive_int(&caps[1]) {
                debug!(template = "top_crops", "question matched");
                return Intent::TopCrops {
                    n,
                    state: clean(&caps[2]),
                };
            }
        }

        if let Some(caps) = self.trend.captures(&q) {
            if let Some(n) = positive_int(&caps[2]) {
                debug!(template = "trend", "question matched");
                return Intent::Trend {
                    crop: clean(&caps[1]),
                    state: clean(&caps[3]),
                    window_years: n,
                };
            }
        }

        if let Some(caps) = self.compare_rain.captures(&q) {
            let window_capture = caps.get(3);
            let window_years = window_capture.and_then(|m| positive_int(m.as_str()));
            // a present-but-invalid window is a non-match, not an error
            if window_capture.is_none() || window_years.is_some() {
                debug!(template = "compare_rain", "question matched");
                return Intent::CompareRain {
                    state_a: clean(&caps[1]),
                    state_b: clean(&caps[2]),
                    window_years,
                };
            }
        }

        if let Some(caps) = self.rain_trend.captures(&q) {
            if let Some(n) = positive_int(&caps[2]) {
                debug!(template = "rain_trend", "question matched");
                return Intent::RainTrend {
                    state: clean(&caps[1]),
                    window_years: n,
                };
            }
        }

        debug!("question matched no template");
        Intent::Unknown
    }
}

impl Default for IntentRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

fn template(pattern: &str) -> Regex {
    Regex::new(pattern).expect("question template is a valid regex")
}

fn positive_int(text: &str) -> Option<u32> {
    text.parse::<u32>().ok().filter(|n| *n > 0)
}

fn clean(text: &str) -> String {
    text.trim().to_string()
}
