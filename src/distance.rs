use std::mem;

use smallvec::{smallvec, SmallVec};

const VEC_SIZE: usize = 16; //32
pub(crate) type FastVec<T> = SmallVec<[T; VEC_SIZE]>;

/// Decides whether two characters count as the same letter for edit distance purposes.
pub trait CharComparator {
    fn are_equal(&self, a: char, b: char) -> bool;

    fn are_distinct(&self, a: char, b: char) -> bool {
        !self.are_equal(a, b)
    }
}

/// Plain code point equality.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OrdinalComparator;

impl CharComparator for OrdinalComparator {
    #[inline]
    fn are_equal(&self, a: char, b: char) -> bool {
        a == b
    }
}

/// Case-insensitive equality using the full Unicode lowercase mapping.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IgnoreCaseComparator;

impl CharComparator for IgnoreCaseComparator {
    fn are_equal(&self, a: char, b: char) -> bool {
        a == b || a.to_lowercase().eq(b.to_lowercase())
    }
}

/// An edit distance metric with an optional upper bound.
pub trait StringDistance {
    /// Returns the edit distance between `a` and `b`,
    /// or `None` if the distance is greater than `max_distance`.
    fn distance_with_early_stop(&self, a: &str, b: &str, max_distance: usize) -> Option<usize>;

    /// Unbounded edit distance.
    fn distance(&self, a: &str, b: &str) -> usize {
        let max_distance = a.chars().count().max(b.chars().count());
        self.distance_with_early_stop(a, b, max_distance)
            .unwrap_or(max_distance)
    }
}

/// Damerau-Levenshtein edit distance, like Levenshtein but allows for adjacent transpositions.
/// Optimal string alignment version (OSA): each substring can only be edited once.
/// E.g., "CA" to "ABC" has an edit distance of 2 by for Damerau-Levenshtein, but a distance of 3 when using the optimal string alignment algorithm.
/// https://en.wikipedia.org/wiki/Damerau%E2%80%93Levenshtein_distance#Optimal_string_alignment_distance
///
/// Only a band of `2 * max_distance + 1` cells around the diagonal is evaluated, and the
/// computation stops as soon as a whole band row exceeds `max_distance`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DamerauLevenshteinOsa<C = OrdinalComparator> {
    comparator: C,
}

impl<C: CharComparator> DamerauLevenshteinOsa<C> {
    pub fn new(comparator: C) -> Self {
        Self { comparator }
    }

    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    // common suffix first, then common prefix
    fn strip_common_affixes<'s>(
        &self,
        mut short: &'s [char],
        mut long: &'s [char],
    ) -> (&'s [char], &'s [char]) {
        while let (Some(&s), Some(&l)) = (short.last(), long.last()) {
            if self.comparator.are_distinct(s, l) {
                break;
            }
            short = &short[..short.len() - 1];
            long = &long[..long.len() - 1];
        }

        let start = short
            .iter()
            .zip(long)
            .take_while(|(s, l)| self.comparator.are_equal(**s, **l))
            .count();

        (&short[start..], &long[start..])
    }

    /// `short` is non-empty, `long.len() - short.len() <= max_distance <= long.len()`.
    fn banded(&self, short: &[char], long: &[char], max_distance: usize) -> Option<usize> {
        let long_len = long.len();
        // any cell outside the band is at least max_distance + 1 away
        let limit = max_distance + 1;

        let mut before_distances: FastVec<usize> = smallvec![limit; long_len + 1];
        let mut prev_distances: FastVec<usize> = (0..=long_len).map(|j| j.min(limit)).collect();
        let mut curr_distances: FastVec<usize> = smallvec![limit; long_len + 1];

        for i in 1..=short.len() {
            let j_start = i.saturating_sub(max_distance).max(1);
            let j_end = (i + max_distance).min(long_len);

            curr_distances[j_start - 1] = if j_start == 1 { i.min(limit) } else { limit };
            if j_end < long_len {
                curr_distances[j_end + 1] = limit;
            }

            let a_char = short[i - 1];
            let mut row_min = curr_distances[j_start - 1];

            for j in j_start..=j_end {
                let b_char = long[j - 1];
                let distinct = self.comparator.are_distinct(a_char, b_char);
                let mut distance = min3(
                    prev_distances[j - 1] + usize::from(distinct),
                    prev_distances[j] + 1,
                    curr_distances[j - 1] + 1,
                );
                if distinct
                    && i > 1
                    && j > 1
                    && self.comparator.are_equal(a_char, long[j - 2])
                    && self.comparator.are_equal(short[i - 2], b_char)
                {
                    distance = distance.min(before_distances[j - 2] + 1);
                }
                curr_distances[j] = distance.min(limit);
                row_min = row_min.min(curr_distances[j]);
            }

            if row_min > max_distance {
                return None;
            }

            mem::swap(&mut before_distances, &mut prev_distances);
            mem::swap(&mut prev_distances, &mut curr_distances);
        }

        let distance = prev_distances[long_len];
        (distance <= max_distance).then_some(distance)
    }
}

impl<C: CharComparator> StringDistance for DamerauLevenshteinOsa<C> {
    fn distance_with_early_stop(&self, a: &str, b: &str, max_distance: usize) -> Option<usize> {
        let a: FastVec<char> = a.chars().collect();
        let b: FastVec<char> = b.chars().collect();

        // shorter string first, the inner loop then runs over the longer one
        let (short, long) = if a.len() > b.len() {
            (&b[..], &a[..])
        } else {
            (&a[..], &b[..])
        };

        let (short, long) = self.strip_common_affixes(short, long);

        // short is a substring of long
        if short.is_empty() {
            return (long.len() <= max_distance).then_some(long.len());
        }

        //the edit distance can't be less than the difference of the lengths of the strings.
        if long.len() - short.len() > max_distance {
            return None;
        }

        self.banded(short, long, max_distance.min(long.len()))
    }
}

#[inline]
fn min3(a: usize, b: usize, c: usize) -> usize {
    a.min(b).min(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    // full matrix, no band, no affix stripping
    fn reference_osa(a: &str, b: &str) -> usize {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let mut d = vec![vec![0usize; b.len() + 1]; a.len() + 1];
        for (i, row) in d.iter_mut().enumerate() {
            row[0] = i;
        }
        for j in 0..=b.len() {
            d[0][j] = j;
        }
        for i in 1..=a.len() {
            for j in 1..=b.len() {
                let cost = usize::from(a[i - 1] != b[j - 1]);
                d[i][j] = min3(d[i - 1][j] + 1, d[i][j - 1] + 1, d[i - 1][j - 1] + cost);
                if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                    d[i][j] = d[i][j].min(d[i - 2][j - 2] + 1);
                }
            }
        }
        d[a.len()][b.len()]
    }

    fn random_word(rng: &mut StdRng) -> String {
        let len = rng.gen_range(0..9);
        (0..len)
            .map(|_| char::from(b'a' + rng.gen_range(0..4u8)))
            .collect()
    }

    #[test]
    fn osa_is_not_unrestricted_damerau() {
        let osa: DamerauLevenshteinOsa = DamerauLevenshteinOsa::default();
        assert_eq!(Some(3), osa.distance_with_early_stop("CA", "ABC", 3));
    }

    #[test]
    fn distance_larger_than_max() {
        let osa: DamerauLevenshteinOsa = DamerauLevenshteinOsa::default();
        assert_eq!(None, osa.distance_with_early_stop("abcdef", "ghijkl", 3));
        assert_eq!(6, osa.distance("abcdef", "ghijkl"));
    }

    #[test]
    fn identical_strings_have_zero_distance() {
        let osa: DamerauLevenshteinOsa = DamerauLevenshteinOsa::default();
        for word in ["", "a", "house", "questionnaire", "łąka"] {
            for max in 0..3 {
                assert_eq!(Some(0), osa.distance_with_early_stop(word, word, max));
            }
        }
    }

    #[test]
    fn transposition_and_substring() {
        let osa: DamerauLevenshteinOsa = DamerauLevenshteinOsa::default();
        assert_eq!(Some(1), osa.distance_with_early_stop("ab", "ba", 1));
        assert_eq!(Some(1), osa.distance_with_early_stop("bank", "bnak", 1));
        assert_eq!(None, osa.distance_with_early_stop("bank", "kanb", 1));
        assert_eq!(Some(2), osa.distance_with_early_stop("abc", "xabcy", 2));
        assert_eq!(None, osa.distance_with_early_stop("abc", "xabcy", 1));
        assert_eq!(Some(4), osa.distance_with_early_stop("", "abcd", 4));
        assert_eq!(None, osa.distance_with_early_stop("abcd", "", 3));
    }

    #[test]
    fn zero_bound_is_exact_match() {
        let osa: DamerauLevenshteinOsa = DamerauLevenshteinOsa::default();
        assert_eq!(Some(0), osa.distance_with_early_stop("exact", "exact", 0));
        assert_eq!(None, osa.distance_with_early_stop("exact", "exakt", 0));
    }

    #[test]
    fn bounded_agrees_with_reference() {
        let osa: DamerauLevenshteinOsa = DamerauLevenshteinOsa::default();
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..5_000 {
            let a = random_word(&mut rng);
            let b = random_word(&mut rng);
            let expected = reference_osa(&a, &b);
            for max in 0..5 {
                let bounded = osa.distance_with_early_stop(&a, &b, max);
                if expected > max {
                    assert_eq!(None, bounded, "{a:?} {b:?} max={max}");
                } else {
                    assert_eq!(Some(expected), bounded, "{a:?} {b:?} max={max}");
                }
            }
            assert_eq!(expected, osa.distance(&a, &b), "{a:?} {b:?}");
        }
    }

    struct TildeInsensitive;

    impl CharComparator for TildeInsensitive {
        fn are_equal(&self, a: char, b: char) -> bool {
            if a == 'ñ' || b == 'ñ' {
                return a == 'n' || b == 'n' || a == b;
            }
            a == b
        }
    }

    #[test]
    fn custom_comparator_is_consulted() {
        let osa = DamerauLevenshteinOsa::new(TildeInsensitive);
        assert_eq!(0, osa.distance("Espana", "España"));
    }

    #[test]
    fn ignore_case_comparator() {
        let osa = DamerauLevenshteinOsa::new(IgnoreCaseComparator);
        assert_eq!(0, osa.distance("JSYMSPELL", "jsymspell"));
        // transposition check also goes through the comparator
        assert_eq!(Some(1), osa.distance_with_early_stop("Ab", "bA", 1));
    }
}
