/// Score for texts that match only after normalization. Identical raw text
/// is the only way to reach 1.0.
pub const NEAR_EXACT_SCORE: f64 = 0.99;

/// Lower-case and collapse whitespace runs.
pub fn normalize(text: &str) -> Vec<char> {
    let lowered = text.to_lowercase();
    let mut out = Vec::with_capacity(lowered.len());
    for word in lowered.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.extend(word.chars());
    }
    out
}

/// Levenshtein distance over characters, two-row variant.
pub fn edit_distance(a: &[char], b: &[char]) -> usize {
    let len_a = a.len();
    let len_b = b.len();

    if len_a == 0 {
        return len_b;
    }
    if len_b == 0 {
        return len_a;
    }

    let mut prev_row: Vec<usize> = (0..=len_b).collect();
    let mut curr_row = vec![0; len_b + 1];

    for i in 1..=len_a {
        curr_row[0] = i;

        for j in 1..=len_b {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };

            curr_row[j] = (prev_row[j] + 1)      // deletion
                .min(curr_row[j - 1] + 1)        // insertion
                .min(prev_row[j - 1] + cost);    // substitution
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[len_b]
}

/// Query text prepared once and scored against many candidates.
pub struct SimilarityScorer {
    raw: String,
    normalized: Vec<char>,
}

impl SimilarityScorer {
    pub fn new(query: &str) -> Self {
        SimilarityScorer {
            raw: query.to_string(),
            normalized: normalize(query),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }

    /// Best score any candidate with this many normalized characters could
    /// get; edit distance is at least the length difference.
    pub fn upper_bound(&self, candidate_len: usize) -> f64 {
        let max_len = self.normalized.len().max(candidate_len);
        if max_len == 0 {
            return 0.0;
        }
        let diff = self.normalized.len().abs_diff(candidate_len);
        1.0 - diff as f64 / max_len as f64
    }

    /// Similarity in 0.0..=1.0.
    pub fn score(&self, candidate: &str) -> f64 {
        self.score_normalized(candidate, &normalize(candidate))
    }

    /// Like `score` for a caller that already normalized the candidate.
    pub fn score_normalized(&self, candidate: &str, normalized: &[char]) -> f64 {
        if candidate == self.raw {
            return 1.0;
        }

        let max_len = self.normalized.len().max(normalized.len());
        if max_len == 0 {
            return 0.0;
        }

        let distance = edit_distance(&self.normalized, normalized);
        let score = 1.0 - distance as f64 / max_len as f64;
        score.min(NEAR_EXACT_SCORE)
    }
}
