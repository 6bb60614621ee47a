//! Word spans used to bias scramble reveal order toward earlier words

use rand::Rng;

/// A run of non-whitespace characters, `start..end` in char indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordSpan {
    pub start: usize,
    pub end: usize,
}

/// Read-only partition of a string into words
#[derive(Debug, Clone, Default)]
pub struct WordWeighting {
    spans: Vec<WordSpan>,
    /// Word index per char position (`None` for whitespace)
    index: Vec<Option<usize>>,
}

impl WordWeighting {
    pub fn new(chars: &[char]) -> Self {
        let mut spans = Vec::new();
        let mut index = vec![None; chars.len()];
        let mut start = None;

        for (i, c) in chars.iter().enumerate() {
            if c.is_whitespace() {
                if let Some(s) = start.take() {
                    spans.push(WordSpan { start: s, end: i });
                }
            } else {
                if start.is_none() {
                    start = Some(i);
                }
                index[i] = Some(spans.len());
            }
        }
        if let Some(s) = start {
            spans.push(WordSpan {
                start: s,
                end: chars.len(),
            });
        }

        Self { spans, index }
    }

    pub fn word_count(&self) -> usize {
        self.spans.len()
    }

    pub fn spans(&self) -> &[WordSpan] {
        &self.spans
    }

    /// Word containing `pos`, if it is not whitespace
    pub fn word_of(&self, pos: usize) -> Option<usize> {
        self.index.get(pos).copied().flatten()
    }

    /// Randomized selection weight for `pos`; earlier words weigh more
    pub fn weight<R: Rng>(&self, pos: usize, rng: &mut R) -> f64 {
        let word = self.word_of(pos).unwrap_or(self.spans.len());
        let rank = self.spans.len().saturating_sub(word) as f64;
        (rank * 2.0 + rng.random_range(0.0..3.0)).max(1.0)
    }

    /// Pick one of `candidates` with word-biased weights
    pub fn pick<R: Rng>(&self, candidates: &[usize], rng: &mut R) -> Option<usize> {
        let weights: Vec<f64> = candidates.iter().map(|&p| self.weight(p, rng)).collect();
        let total: f64 = weights.iter().sum();
        let mut roll = rng.random_range(0.0..total.max(f64::MIN_POSITIVE));

        for (&pos, w) in candidates.iter().zip(&weights) {
            roll -= w;
            if roll <= 0.0 {
                return Some(pos);
            }
        }
        candidates.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_spans() {
        let w = WordWeighting::new(&chars("  Hello big world "));
        assert_eq!(
            w.spans(),
            &[
                WordSpan { start: 2, end: 7 },
                WordSpan { start: 8, end: 11 },
                WordSpan { start: 12, end: 17 },
            ]
        );
        assert_eq!(w.word_of(0), None);
        assert_eq!(w.word_of(2), Some(0));
        assert_eq!(w.word_of(16), Some(2));
        assert_eq!(w.word_of(17), None);
        assert_eq!(w.word_of(99), None);
    }

    #[test]
    fn test_last_word_runs_to_end() {
        let w = WordWeighting::new(&chars("ab cd"));
        assert_eq!(w.spans().last(), Some(&WordSpan { start: 3, end: 5 }));
    }

    #[test]
    fn test_empty() {
        let w = WordWeighting::new(&[]);
        assert_eq!(w.word_count(), 0);
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(w.pick(&[], &mut rng), None);
    }

    #[test]
    fn test_earlier_words_win_more_often() {
        let text = chars("aaaa bbbb cccc dddd eeee ffff");
        let w = WordWeighting::new(&text);
        let first: Vec<usize> = (0..4).collect();
        let last: Vec<usize> = (25..29).collect();
        let candidates: Vec<usize> = first.iter().chain(&last).copied().collect();

        let mut rng = Pcg32::seed_from_u64(7);
        let mut first_hits = 0;
        for _ in 0..1000 {
            let pos = w.pick(&candidates, &mut rng).unwrap();
            if first.contains(&pos) {
                first_hits += 1;
            }
        }
        assert!(first_hits > 600, "first word picked {first_hits} times");
    }
}
