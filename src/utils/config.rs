//! Configuration and constants for the normalization pipeline.

use regex::RegexSet;
use std::sync::OnceLock;

/// Current bundle manifest schema version
pub const MANIFEST_VERSION: &str = "1.0.0";

/// Substring that marks a file in an extracted directory as a trace artifact
pub const TRACE_MARKER: &str = "trace";

// Noise patterns for step-trace filtering. Entries whose `apiName` matches
// any of these are internal driver bookkeeping (fixture setup/teardown,
// lifecycle calls, video handling, attach calls, hook markers) and carry no
// signal for failure analysis.
pub const NOISE_PATTERNS: &[&str] = &[
    r"^fixture:",
    r"^browserType\.",
    r"^browserContext\.",
    r"^page\.",
    r"^video\.",
    r"^attach",
    r"^Before Hooks$",
    r"^After Hooks$",
    r"^Worker Cleanup$",
];

// Overlay sources for raw-trace flattening, in increasing precedence.
// An entry's own fields come first; each listed sub-object then overwrites
// same-named keys from everything before it.
pub const RAW_TRACE_OVERLAY_KEYS: &[&str] = &["options", "params", "result", "snapshot"];

/// Placeholder function name for stack frames with an empty function field
pub const ANONYMOUS_FUNCTION: &str = "<anonymous>";

/// Compiled noise-pattern set, built once per process
pub fn noise_patterns() -> &'static RegexSet {
    static PATTERNS: OnceLock<RegexSet> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        RegexSet::new(NOISE_PATTERNS).expect("noise pattern table must compile")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_patterns_compile() {
        let set = noise_patterns();
        assert_eq!(set.len(), NOISE_PATTERNS.len());
    }

    #[test]
    fn test_noise_patterns_match_expected_api_names() {
        let set = noise_patterns();
        assert!(set.is_match("page.click"));
        assert!(set.is_match("fixture: browser"));
        assert!(set.is_match("Before Hooks"));
        assert!(set.is_match("attachScreenshot"));
        assert!(!set.is_match("expect.toBeVisible"));
        assert!(!set.is_match("locator.click"));
    }

    #[test]
    fn test_hook_markers_are_anchored() {
        let set = noise_patterns();
        // Only the exact hook markers are noise, not names containing them.
        assert!(!set.is_match("custom Before Hooks step"));
        assert!(!set.is_match("After Hooks extra"));
    }
}
