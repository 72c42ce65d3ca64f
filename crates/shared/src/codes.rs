//! Random, human-friendly code generation.

use rand::Rng;

/// Characters used in generated codes. Excludes 0, O, 1 and I.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Separator placed between code segments.
pub const SEGMENT_SEPARATOR: char = '-';

/// Generate a random code made of `segments` groups of `segment_len` characters,
/// joined by `-` (e.g. `ABCD-EFGH-JKLM`).
pub fn generate_segmented_code(segments: usize, segment_len: usize) -> String {
    let mut rng = rand::thread_rng();

    let mut generate_segment = || -> String {
        (0..segment_len)
            .map(|_| {
                let idx = rng.gen_range(0..CODE_ALPHABET.len());
                CODE_ALPHABET[idx] as char
            })
            .collect()
    };

    (0..segments)
        .map(|_| generate_segment())
        .collect::<Vec<_>>()
        .join(&SEGMENT_SEPARATOR.to_string())
}

/// Returns true if `code` has exactly the shape produced by
/// [`generate_segmented_code`] with the same parameters.
pub fn is_segmented_code(code: &str, segments: usize, segment_len: usize) -> bool {
    let parts: Vec<&str> = code.split(SEGMENT_SEPARATOR).collect();
    parts.len() == segments
        && parts.iter().all(|part| {
            part.len() == segment_len && part.bytes().all(|b| CODE_ALPHABET.contains(&b))
        })
}

/// Canonical form of a user-supplied code: trimmed and upper-cased.
pub fn canonicalize_code(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}
