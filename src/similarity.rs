//! Lexical similarity primitives and the composite record score.
//!
//! Two field-level metrics, chosen by input size to bound cost:
//!
//! - **Edit distance** for short strings: `strsim::normalized_levenshtein`,
//!   which is `1 − distance / max(len)` over the normalized inputs.
//! - **Shingle overlap** for long strings: the Jaccard index of the sets of
//!   hashed fixed-length character windows. Near-linear, so body text can be
//!   arbitrarily long without quadratic blowup.
//!
//! Both are pure and symmetric, and return exactly `1.0` for identical
//! inputs. The composite record score weights title and body similarity;
//! titles are short and phrased inconsistently even for genuinely distinct
//! records, so the body carries more weight.

use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use sha2::{Digest, Sha256};

use crate::models::Record;

/// Similarity tuning knobs, decoupled from application config.
#[derive(Debug, Clone)]
pub struct DedupeParams {
    /// Weight of the title similarity in the composite score.
    pub title_weight: f64,
    /// Weight of the body similarity in the composite score.
    pub body_weight: f64,
    /// Normalized strings at or above this many characters use the shingle
    /// path instead of edit distance.
    pub edit_distance_cutoff: usize,
    /// Character window length for the shingle path.
    pub shingle_size: usize,
}

impl Default for DedupeParams {
    fn default() -> Self {
        Self {
            title_weight: 0.4,
            body_weight: 0.6,
            edit_distance_cutoff: 1000,
            shingle_size: 3,
        }
    }
}

/// Lowercase and collapse whitespace runs to single spaces.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Content fingerprint over the normalized fields.
///
/// Records with equal fingerprints are exact duplicates up to case and
/// whitespace; the comparator scores such pairs 1.0 without running the
/// similarity computation.
pub fn fingerprint(title: &str, body: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize(title).as_bytes());
    hasher.update(b"\n");
    hasher.update(normalize(body).as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Similarity of one free-text field of two records.
///
/// Normalizes both sides, then picks the edit-distance or shingle path by
/// the normalized lengths: edit distance only when both sides are below
/// `edit_distance_cutoff`, since the quadratic cost is driven by the longer
/// side.
pub fn text_similarity(a: &str, b: &str, params: &DedupeParams) -> f64 {
    let a = normalize(a);
    let b = normalize(b);

    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }

    let len_a = a.chars().count();
    let len_b = b.chars().count();
    if len_a < params.edit_distance_cutoff && len_b < params.edit_distance_cutoff {
        strsim::normalized_levenshtein(&a, &b)
    } else {
        shingle_similarity(&a, &b, params.shingle_size)
    }
}

/// Jaccard index of the hashed shingle sets of two normalized strings.
///
/// Shingles are hashed to `u64` so memory stays bounded regardless of input
/// length; Jaccard over the hashed sets is equivalent modulo collisions.
pub fn shingle_similarity(a: &str, b: &str, shingle_size: usize) -> f64 {
    let set_a = shingle_set(a, shingle_size);
    let set_b = shingle_set(b, shingle_size);

    if set_a.is_empty() && set_b.is_empty() {
        return 1.0;
    }
    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }

    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    intersection as f64 / union as f64
}

/// All contiguous `k`-character windows of `text`, hashed.
///
/// Strings shorter than `k` contribute a single shingle covering the whole
/// string, so short inputs still compare rather than producing empty sets.
fn shingle_set(text: &str, k: usize) -> HashSet<u64> {
    let k = k.max(1);
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return HashSet::new();
    }
    if chars.len() < k {
        let mut set = HashSet::new();
        set.insert(hash_shingle(&chars));
        return set;
    }
    chars.windows(k).map(hash_shingle).collect()
}

fn hash_shingle(window: &[char]) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    for c in window {
        c.hash(&mut hasher);
    }
    hasher.finish()
}

/// Composite similarity of two records:
/// `title_weight * title_sim + body_weight * body_sim`.
///
/// Each field independently picks its metric per its own normalized length.
pub fn record_similarity(a: &Record, b: &Record, params: &DedupeParams) -> f64 {
    let title_sim = text_similarity(&a.title, &b.title, params);
    let body_sim = text_similarity(&a.body, &b.body, params);
    params.title_weight * title_sim + params.body_weight * body_sim
}
