//! Fuzzy name matching for watchlist screening.
//!
//! Names are normalized (lowercase, punctuation stripped, whitespace
//! collapsed) and compared with Levenshtein similarity.

/// Normalize a name for comparison.
pub fn normalize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Similarity of two already-normalized names, 0.0-1.0.
pub fn similarity(s1: &str, s2: &str) -> f64 {
    if s1 == s2 {
        return 1.0;
    }
    let max_len = s1.chars().count().max(s2.chars().count());
    if max_len == 0 {
        return 0.0;
    }
    let distance = levenshtein_distance(s1, s2);
    1.0 - (distance as f64 / max_len as f64)
}

/// Similarity expressed as a 0-100 match confidence.
pub fn confidence(s1: &str, s2: &str) -> u8 {
    (similarity(s1, s2) * 100.0).round().clamp(0.0, 100.0) as u8
}

fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();
    let mut matrix = vec![vec![0usize; b.len() + 1]; a.len() + 1];

    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=b.len() {
        matrix[0][j] = j;
    }

    for i in 0..a.len() {
        for j in 0..b.len() {
            let cost = if a[i] == b[j] { 0 } else { 1 };
            matrix[i + 1][j + 1] = (matrix[i][j + 1] + 1)
                .min(matrix[i + 1][j] + 1)
                .min(matrix[i][j] + cost);
        }
    }

    matrix[a.len()][b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_strips_punctuation() {
        assert_eq!(normalize_name("John O'Brien, Jr."), "john o brien jr");
        assert_eq!(normalize_name("ACME   Corp."), "acme corp");
        assert_eq!(normalize_name("  Ali  Al-Mansoori "), "ali al mansoori");
    }

    #[test]
    fn levenshtein_known_values() {
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("saturday", "sunday"), 3);
        assert_eq!(levenshtein_distance("test", "test"), 0);
        assert_eq!(levenshtein_distance("", "abc"), 3);
    }

    #[test]
    fn similarity_and_confidence() {
        assert_eq!(similarity("john smith", "john smith"), 1.0);
        assert_eq!(confidence("john smith", "john smith"), 100);

        let c = confidence("john smith", "jon smith");
        assert!(c >= 85 && c < 100, "near-miss should score high, got {c}");

        let far = confidence("john smith", "maria garcia");
        assert!(far < 50, "unrelated names should score low, got {far}");
    }

    #[test]
    fn empty_names_never_match() {
        assert_eq!(similarity("", ""), 1.0); // identical, degenerate
        assert_eq!(confidence("", "john"), 0);
    }
}
