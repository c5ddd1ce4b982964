//! Stored filename generation

use chrono::Utc;
use rand::Rng;
use std::path::Path;

/// Exclusive upper bound of the random component
const RANDOM_UPPER_BOUND: u32 = 1_000_000_000;

/// Generate a stored filename `{prefix}-{millis}-{random}{ext}`
///
/// `ext` is the last extension of `original_name` including its dot, or empty
/// when the original has none. Uniqueness is probabilistic only.
pub fn generate_filename(prefix: &str, original_name: &str) -> String {
    let timestamp = Utc::now().timestamp_millis();
    let random: u32 = rand::thread_rng().gen_range(0..RANDOM_UPPER_BOUND);
    format!(
        "{}-{}-{}{}",
        prefix,
        timestamp,
        random,
        extension_of(original_name)
    )
}

/// Last extension of a client-supplied filename, with the leading dot
fn extension_of(original_name: &str) -> String {
    // Browsers on Windows may send backslash-separated paths
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name);
    Path::new(base)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}
