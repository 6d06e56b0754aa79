//! Identifier and display-name generation
//!
//! Short URL-safe ids for tree nodes, and collision-free display names
//! for panels ("Panel", "Panel (1)", "Panel (2)", ...).

use std::collections::HashSet;

use rand::Rng;

/// Characters used in generated ids. URL-safe, no padding.
const ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Default length of the random portion of an id
pub const DEFAULT_ID_LEN: usize = 7;

/// Prefix for all generated ids
const ID_PREFIX: &str = "t_";

/// Generate a fresh random id with the given length, e.g. `t_x9Kq3Wx`
pub fn fresh(len: usize) -> String {
    let mut rng = rand::thread_rng();
    let mut id = String::with_capacity(ID_PREFIX.len() + len);
    id.push_str(ID_PREFIX);
    for _ in 0..len {
        let idx = rng.gen_range(0..ID_ALPHABET.len());
        id.push(ID_ALPHABET[idx] as char);
    }
    id
}

/// Generate a fresh random id with the default length
pub fn fresh_id() -> String {
    fresh(DEFAULT_ID_LEN)
}

/// Generate a deterministic id from a seed.
///
/// Uses a xorshift-style PRNG so the same seed always yields the same id.
/// Used when tree nodes must be reproducible for a given input (e.g. ids
/// derived from file paths).
pub fn seeded(seed: u64, len: usize) -> String {
    // xorshift64; zero state would be a fixed point, so displace it
    let mut state = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15).max(1);
    let mut id = String::with_capacity(ID_PREFIX.len() + len);
    id.push_str(ID_PREFIX);
    for _ in 0..len {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let idx = (state % ID_ALPHABET.len() as u64) as usize;
        id.push(ID_ALPHABET[idx] as char);
    }
    id
}

/// Produce a display name that does not collide with `existing`.
///
/// If `base` is free it is returned unchanged. Otherwise a ` (N)` suffix
/// is appended, or an existing ` (N)` suffix incremented, until the name
/// is unique. Comparison is case-sensitive.
pub fn unique_name(base: &str, existing: &HashSet<String>) -> String {
    if !existing.contains(base) {
        return base.to_string();
    }

    let (stem, start) = split_counter_suffix(base);
    let mut n = start;
    loop {
        n += 1;
        let candidate = format!("{} ({})", stem, n);
        if !existing.contains(&candidate) {
            return candidate;
        }
    }
}

/// Split a trailing ` (N)` suffix off a name, returning the stem and N.
/// Names without a suffix return (name, 0).
fn split_counter_suffix(name: &str) -> (&str, u32) {
    if let Some(open) = name.rfind(" (") {
        if let Some(inner) = name[open + 2..].strip_suffix(')') {
            if let Ok(n) = inner.parse::<u32>() {
                return (&name[..open], n);
            }
        }
    }
    (name, 0)
}
