// SymSpell: 1 million times faster through Symmetric Delete spelling correction algorithm
//
// The Symmetric Delete spelling correction algorithm reduces the complexity of edit candidate generation and dictionary lookup
// for a given Damerau-Levenshtein distance. It is six orders of magnitude faster and language independent.
// Opposite to other algorithms only deletes are required, no transposes + replaces + inserts.
// Transposes + replaces + inserts of the input term are transformed into deletes of the dictionary term.
// Replaces and inserts are expensive and language dependent: e.g. Chinese has 70,000 Unicode Han characters!
//
// SymSpell supports compound splitting / decompounding of multi-word input strings with three cases:
// 1. mistakenly inserted space into a correct word led to two incorrect terms
// 2. mistakenly omitted space between two correct words led to one incorrect combined term
// 3. multiple independent input terms with/without spelling errors

// Copyright (C) 2025 Wolf Garbe
// Author: Wolf Garbe wolf.garbe@seekstorm.com
// URL: https://github.com/wolfgarbe/symspell
// Description: https://seekstorm.com/blog/1000x-spelling-correction/
//
// MIT License
// Copyright (c) 2025 Wolf Garbe
// Permission is hereby granted, free of charge, to any person obtaining a copy of this software and associated
// documentation files (the "Software"), to deal in the Software without restriction, including without limitation
// the rights to use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of the Software,
// and to permit persons to whom the Software is furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all copies or substantial portions of the Software.
// https://opensource.org/licenses/MIT

use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{debug, info, trace, warn};
use unicode_normalization::UnicodeNormalization;

use crate::config::SymSpellConfig;
use crate::distance::{
    CharComparator, DamerauLevenshteinOsa, FastVec, OrdinalComparator, StringDistance,
};
use crate::error::{MalformedLine, SymSpellError};
use crate::staging::SuggestionStage;
use crate::store::{Backend, BigramStore, DeleteStore, FrequencyStore, HashBackend, StringHasher};

// expected number of delete keys of a bulk load
const STAGING_CAPACITY: usize = 16384;

fn len(s: &str) -> usize {
    s.chars().count()
}

fn remove(s: &str, index: usize) -> String {
    s.chars()
        .enumerate()
        .filter(|(ii, _)| ii != &index)
        .map(|(_, ch)| ch)
        .collect()
}

/// The first `chars` characters of `s`.
fn prefix(s: &str, chars: usize) -> &str {
    s.char_indices().nth(chars).map_or(s, |(i, _)| &s[..i])
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// Suggested correct spelling for a given input word.
pub struct Suggestion {
    /// The suggested correctly spelled word.
    pub term: String,
    /// Edit distance between searched for word and suggestion.
    pub distance: usize,
    /// Frequency of suggestion in the dictionary (a measure of how common the word is).
    pub count: u64,
}

impl Suggestion {
    pub fn new(term: impl Into<String>, distance: usize, count: u64) -> Suggestion {
        Suggestion {
            term: term.into(),
            distance,
            count,
        }
    }
}

// Order by distance ascending, then by frequency count descending, then by term
impl Ord for Suggestion {
    fn cmp(&self, other: &Suggestion) -> Ordering {
        self.distance
            .cmp(&other.distance)
            .then_with(|| other.count.cmp(&self.count))
            .then_with(|| self.term.cmp(&other.term))
    }
}

impl PartialOrd for Suggestion {
    fn partial_cmp(&self, other: &Suggestion) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// Controls the closeness/quantity of returned spelling suggestions.
pub enum Verbosity {
    /// Top suggestion with the highest term frequency of the suggestions of smallest edit distance found.
    Top,
    /// All suggestions of smallest edit distance found, suggestions ordered by term frequency.
    Closest,
    /// All suggestions within maxEditDistance, suggestions ordered by edit distance, then by term frequency (slower, no early termination)
    All,
}

/// Best-so-far state of a single lookup.
///
/// `bound` only ever decreases. Outside of [`Verbosity::All`] it is the distance of the
/// suggestions collected so far, so nothing farther away is accepted afterwards.
struct Accumulator {
    verbosity: Verbosity,
    bound: usize,
    suggestions: Vec<Suggestion>,
}

impl Accumulator {
    fn new(verbosity: Verbosity, max_edit_distance: usize) -> Self {
        Self {
            verbosity,
            bound: max_edit_distance,
            suggestions: Vec::new(),
        }
    }

    /// `suggestion.distance` must not exceed `self.bound`.
    fn offer(&mut self, suggestion: Suggestion) {
        match self.verbosity {
            Verbosity::Top => match self.suggestions.first_mut() {
                Some(best) => {
                    if suggestion.distance < self.bound || suggestion.count > best.count {
                        self.bound = suggestion.distance;
                        *best = suggestion;
                    }
                }
                None => {
                    self.bound = suggestion.distance;
                    self.suggestions.push(suggestion);
                }
            },
            Verbosity::Closest => {
                if suggestion.distance < self.bound {
                    self.suggestions.clear();
                }
                self.bound = suggestion.distance;
                self.suggestions.push(suggestion);
            }
            Verbosity::All => self.suggestions.push(suggestion),
        }
    }

    //sort by ascending edit distance, then by descending word frequency
    fn into_sorted(mut self) -> Vec<Suggestion> {
        if self.suggestions.len() > 1 {
            self.suggestions.sort();
        }
        self.suggestions
    }
}

// estimated word occurrence probability P=10 / (N * 10^word length l)
// estimated word count C=10 / 10^word length l
// formulae to calculate the probability of an unknown word proposed by Peter Norvig in Natural Language Corpus Data, page 224 http://norvig.com/ngrams/ch14.pdf
fn unknown_word(term: &str, max_edit_distance: usize) -> Suggestion {
    let exponent = i32::try_from(len(term)).unwrap_or(i32::MAX);
    Suggestion::new(
        term,
        max_edit_distance + 1,
        (10f64 / 10f64.powi(exponent)) as u64,
    )
}

fn columns<'l>(line: &'l str, separator: &str) -> Vec<&'l str> {
    if separator.trim().is_empty() {
        line.split_whitespace().collect()
    } else {
        line.split(separator).map(str::trim).collect()
    }
}

fn parse_count(column: Option<&&str>) -> Result<u64, String> {
    let column = column.ok_or("missing count column")?;
    column
        .parse::<u64>()
        .map_err(|err| format!("invalid count {column:?}: {err}"))
}

/// Parses every non-blank line, failing with all malformed lines at once.
fn parse_corpus<I, T>(
    corpus: I,
    mut parse: impl FnMut(&str) -> Result<T, String>,
) -> Result<Vec<T>, SymSpellError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut entries = Vec::new();
    let mut malformed = Vec::new();

    for (i, line) in corpus.into_iter().enumerate() {
        let line = line.as_ref();
        if line.trim().is_empty() {
            continue;
        }
        match parse(line) {
            Ok(entry) => entries.push(entry),
            Err(reason) => {
                warn!(line_number = i + 1, line, %reason, "malformed corpus line");
                malformed.push(MalformedLine {
                    line_number: i + 1,
                    line: line.to_string(),
                    reason,
                });
            }
        }
    }

    if malformed.is_empty() {
        Ok(entries)
    } else {
        Err(SymSpellError::MalformedCorpus { lines: malformed })
    }
}

fn read_lines(path: &Path) -> Result<Vec<String>, SymSpellError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(reader.lines().collect::<Result<Vec<_>, _>>()?)
}

/// SymSpell spell checker and corrector.
///
/// Generic over the storage [`Backend`] and the [`CharComparator`] used by the edit distance.
pub struct SymSpell<B: Backend = HashBackend, C: CharComparator = OrdinalComparator> {
    config: SymSpellConfig,
    /// Maximum dictionary term length
    max_dictionary_term_length: usize,
    /// Minimum bigram count in the bigram dictionary
    bigram_count_min: u64,
    // Dictionary of unique correct spelling words, and the frequency count for each word.
    words: B::Words,
    /// Words whose accumulated count has not reached `count_threshold` yet.
    below_threshold_words: AHashMap<Box<str>, u64>,
    /// Bigrams optionally used for improved correction quality in lookup_compound
    bigrams: B::Bigrams,
    /// Dictionary that contains a mapping of lists of suggested correction words to the hashCodes
    /// of the original words and the deletes derived from them. Collisions of hash codes are tolerated,
    /// because suggestions are ultimately verified via an edit distance function.
    /// A list of suggestions might have a single suggestion, or multiple suggestions.
    deletes: B::Deletes,
    hasher: B::Hasher,
    distance: DamerauLevenshteinOsa<C>,
}

impl SymSpell {
    /// Creates a new SymSpell instance with hash map storage and ordinal character comparison.
    ///
    /// Fails with [`SymSpellError::InvalidConfig`] if `config` breaks one of the invariants
    /// [`SymSpellConfigBuilder`](crate::SymSpellConfigBuilder) enforces.
    ///
    /// ```
    /// use symspell_engine::{SymSpell, SymSpellConfig};
    ///
    /// let symspell = SymSpell::new(SymSpellConfig::default())?;
    /// assert_eq!(symspell.word_count(), 0);
    /// # Ok::<(), symspell_engine::SymSpellError>(())
    /// ```
    pub fn new(config: SymSpellConfig) -> Result<Self, SymSpellError> {
        Self::with_comparator(config, OrdinalComparator)
    }
}

impl Default for SymSpell {
    fn default() -> Self {
        Self::assemble(
            SymSpellConfig::default(),
            Default::default(),
            Default::default(),
            Default::default(),
            Default::default(),
            OrdinalComparator,
        )
    }
}

impl<B, C> SymSpell<B, C>
where
    B: Backend,
    B::Words: Default,
    B::Bigrams: Default,
    B::Deletes: Default,
    B::Hasher: Default,
    C: CharComparator,
{
    /// Creates an empty instance with default stores of backend `B` and the given comparator.
    pub fn with_comparator(config: SymSpellConfig, comparator: C) -> Result<Self, SymSpellError> {
        Self::from_parts(
            config,
            B::Words::default(),
            B::Bigrams::default(),
            B::Deletes::default(),
            B::Hasher::default(),
            comparator,
        )
    }
}

impl<B: Backend, C: CharComparator> SymSpell<B, C> {
    /// Creates an instance on top of explicitly constructed stores.
    ///
    /// The stores are expected to be empty. Terms already in `words` have no deletes and
    /// are only found by exact match.
    pub fn from_parts(
        config: SymSpellConfig,
        words: B::Words,
        bigrams: B::Bigrams,
        deletes: B::Deletes,
        hasher: B::Hasher,
        comparator: C,
    ) -> Result<Self, SymSpellError> {
        config.validate()?;
        Ok(Self::assemble(config, words, bigrams, deletes, hasher, comparator))
    }

    fn assemble(
        config: SymSpellConfig,
        words: B::Words,
        bigrams: B::Bigrams,
        deletes: B::Deletes,
        hasher: B::Hasher,
        comparator: C,
    ) -> Self {
        Self {
            config,
            max_dictionary_term_length: 0,
            bigram_count_min: u64::MAX,
            words,
            below_threshold_words: AHashMap::new(),
            bigrams,
            deletes,
            hasher,
            distance: DamerauLevenshteinOsa::new(comparator),
        }
    }

    pub fn config(&self) -> &SymSpellConfig {
        &self.config
    }

    /// Get the number of entries in the dictionary.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Frequency count of a searchable dictionary term.
    pub fn frequency(&self, term: &str) -> Option<u64> {
        self.words.get(&self.normalize(term))
    }

    pub fn bigram_frequency(&self, first: &str, second: &str) -> Option<u64> {
        self.bigrams.get(&self.normalize(first), &self.normalize(second))
    }

    /// Number of words held back because their count is below `count_threshold`.
    pub fn below_threshold_count(&self) -> usize {
        self.below_threshold_words.len()
    }

    /// Length in characters of the longest dictionary term.
    pub fn max_dictionary_term_length(&self) -> usize {
        self.max_dictionary_term_length
    }

    /// Terms indexed under the delete variant `delete`.
    ///
    /// With a narrow hash this may include terms of other delete variants sharing the key.
    pub fn delete_candidates(&self, delete: &str) -> &[Box<str>] {
        self.deletes
            .get(self.hasher.hash(delete))
            .unwrap_or_default()
    }

    fn normalize<'a>(&self, s: &'a str) -> Cow<'a, str> {
        if self.config.normalize_unicode && !unicode_normalization::is_nfkc(s) {
            Cow::Owned(s.nfkc().collect())
        } else {
            Cow::Borrowed(s)
        }
    }

    /// Create/Update an entry in the dictionary
    /// For every word there are deletes with an edit distance of 1..maxEditDistance created and added to the
    /// dictionary. Every delete entry has a suggestions list, which points to the original term(s) it was created from.
    /// The dictionary may be dynamically updated (word frequency and new words) at any time by calling create_dictionary_entry
    /// # Arguments
    ///
    /// * `term` - The word to add to dictionary.
    /// * `count` - The frequency count for word.
    ///
    /// Returns True if the word is added or updated and the sum count reaches or exceeds the threshold for the first time,
    /// making it a new entry valid for suggestions, otherwise False.
    pub fn create_dictionary_entry(&mut self, term: &str, count: u64) -> bool {
        let term = self.normalize(term).into_owned();
        self.create_entry(&term, count, None)
    }

    fn create_entry(
        &mut self,
        term: &str,
        count: u64,
        staging: Option<&mut SuggestionStage>,
    ) -> bool {
        let count_threshold = self.config.count_threshold;
        if count == 0 && count_threshold > 0 {
            return false;
        }

        let mut count = count;
        if count_threshold > 1 {
            if let Some(previous) = self.below_threshold_words.get_mut(term) {
                let updated = previous.saturating_add(count);
                if updated < count_threshold {
                    *previous = updated;
                    return false;
                }
                // promoted: the term becomes searchable now
                self.below_threshold_words.remove(term);
                count = updated;
            }
        }

        if let Some(previous) = self.words.get(term) {
            self.words.put(term, previous.saturating_add(count));
            return false;
        }

        if count < count_threshold {
            self.below_threshold_words.insert(term.into(), count);
            return false;
        }

        self.words.put(term, count);

        //collect max_dictionary_term_length
        let term_len = len(term);
        if term_len > self.max_dictionary_term_length {
            self.max_dictionary_term_length = term_len;
        }

        let edits = self.edits_prefix(term);
        match staging {
            Some(staging) => {
                for delete in edits {
                    staging.add(self.hasher.hash(&delete), term);
                }
            }
            None => {
                for delete in edits {
                    self.deletes.push(self.hasher.hash(&delete), term.into());
                }
            }
        }

        true
    }

    /// Load multiple dictionary entries from an iterator of word/frequency count lines.
    ///
    /// The whole corpus is parsed before anything is added: a single malformed line fails
    /// the load with [`SymSpellError::MalformedCorpus`] and leaves the dictionary untouched.
    /// Blank lines are skipped. Returns the number of terms that became searchable.
    ///
    /// # Arguments
    ///
    /// * `corpus` - The lines of the corpus.
    /// * `term_index` - The column position of the word.
    /// * `count_index` - The column position of the frequency count.
    /// * `separator` - Separator between word and frequency. A whitespace separator splits on any run of whitespace.
    pub fn load_dictionary<I>(
        &mut self,
        corpus: I,
        term_index: usize,
        count_index: usize,
        separator: &str,
    ) -> Result<usize, SymSpellError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let entries = parse_corpus(corpus, |line| {
            let columns = columns(line, separator);
            let term = columns
                .get(term_index)
                .filter(|term| !term.is_empty())
                .ok_or("missing term column")?;
            let count = parse_count(columns.get(count_index))?;
            Ok((self.normalize(term).into_owned(), count))
        })?;

        let mut staging = SuggestionStage::new(STAGING_CAPACITY);
        let mut added = 0;
        for (term, count) in &entries {
            if self.create_entry(term, *count, Some(&mut staging)) {
                added += 1;
            }
        }
        let staged_keys = staging.delete_count();
        let staged_deletes = staging.node_count();
        staging.commit_to(&mut self.deletes);

        info!(
            lines = entries.len(),
            added,
            staged_keys,
            staged_deletes,
            words = self.words.len(),
            delete_keys = self.deletes.len(),
            "dictionary loaded"
        );
        Ok(added)
    }

    /// Load multiple dictionary entries from a file of word/frequency count pairs.
    ///
    /// # Arguments
    ///
    /// * `path` - The path+filename of the file.
    /// * `term_index` - The column position of the word.
    /// * `count_index` - The column position of the frequency count.
    /// * `separator` - Separator between word and frequency
    pub fn load_dictionary_file(
        &mut self,
        path: impl AsRef<Path>,
        term_index: usize,
        count_index: usize,
        separator: &str,
    ) -> Result<usize, SymSpellError> {
        let lines = read_lines(path.as_ref())?;
        self.load_dictionary(lines, term_index, count_index, separator)
    }

    /// Adds or overwrites the frequency count of the word pair `first second`.
    pub fn create_bigram_entry(&mut self, first: &str, second: &str, count: u64) {
        let first = self.normalize(first).into_owned();
        let second = self.normalize(second).into_owned();
        self.bigrams.put(&first, &second, count);
        self.bigram_count_min = self.bigram_count_min.min(count);
    }

    /// Load multiple bigram entries from an iterator of bigram/frequency count lines.
    /// Only used in lookup_compound for improved compound splitting/merging/correction quality.
    ///
    /// # Arguments
    ///
    /// * `corpus` - The lines of the corpus.
    /// * `term_index` - The column position of the first word.
    /// * `count_index` - The column position of the frequency count.
    /// * `separator` - Separator between bigram and frequency. With a whitespace separator the two words are
    ///   the columns `term_index` and `term_index + 1`, otherwise column `term_index` holds both words separated by a space.
    pub fn load_bigram_dictionary<I>(
        &mut self,
        corpus: I,
        term_index: usize,
        count_index: usize,
        separator: &str,
    ) -> Result<usize, SymSpellError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let whitespace = separator.trim().is_empty();
        let entries = parse_corpus(corpus, |line| {
            let columns = columns(line, separator);
            let (first, second) = if whitespace {
                match (columns.get(term_index), columns.get(term_index + 1)) {
                    (Some(first), Some(second)) => (*first, *second),
                    _ => return Err("missing bigram columns".to_string()),
                }
            } else {
                let bigram = columns.get(term_index).ok_or("missing bigram column")?;
                bigram
                    .split_whitespace()
                    .collect_tuple::<(&str, &str)>()
                    .ok_or_else(|| format!("expected two words, got {bigram:?}"))?
            };
            let count = parse_count(columns.get(count_index))?;
            Ok((first.to_string(), second.to_string(), count))
        })?;

        for (first, second, count) in &entries {
            self.create_bigram_entry(first, second, *count);
        }

        info!(
            lines = entries.len(),
            bigrams = self.bigrams.len(),
            bigram_count_min = self.bigram_count_min,
            "bigram dictionary loaded"
        );
        Ok(entries.len())
    }

    /// Load multiple bigram entries from a file of bigram/frequency count pairs.
    pub fn load_bigram_dictionary_file(
        &mut self,
        path: impl AsRef<Path>,
        term_index: usize,
        count_index: usize,
        separator: &str,
    ) -> Result<usize, SymSpellError> {
        let lines = read_lines(path.as_ref())?;
        self.load_bigram_dictionary(lines, term_index, count_index, separator)
    }

    /// Write the dictionary to a file, one `term<separator>count` per line.
    /// Useful when the dictionary was incrementally built/updated with create_dictionary_entry.
    /// Entries are sorted by frequency count descending, then by term.
    ///
    /// # Arguments
    ///
    /// * `path` - The path+filename of the file.
    /// * `separator` - Separator between word and frequency
    pub fn save_dictionary(
        &self,
        path: impl AsRef<Path>,
        separator: &str,
    ) -> Result<(), SymSpellError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        for (term, count) in self
            .words
            .entries()
            .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)))
        {
            writeln!(writer, "{}{}{}", term, separator, count)?;
        }
        writer.flush()?;

        Ok(())
    }

    /// Recursively collects the single character deletes of `word`, up to `max_dictionary_edit_distance` in total.
    ///
    /// inexpensive and language independent: only deletes, no transposes + replaces + inserts
    /// replaces and inserts are expensive and language dependent (Chinese has 70,000 Unicode Han characters)
    ///
    /// # Arguments
    ///
    /// * `word` - The string to delete characters from.
    /// * `edit_distance` - Number of deletes `word` is already away from the dictionary term.
    /// * `delete_words` - Accumulated deletes, also used to skip variants reached on another path.
    pub fn edits(&self, word: &str, edit_distance: usize, delete_words: &mut AHashSet<String>) {
        let edit_distance = edit_distance + 1;
        let max_edit_distance = self.config.max_dictionary_edit_distance;
        let word_len = len(word);

        if word_len > 1 && edit_distance <= max_edit_distance {
            for i in 0..word_len {
                let delete = remove(word, i);

                if !delete_words.contains(&delete) {
                    delete_words.insert(delete.clone());

                    if edit_distance < max_edit_distance {
                        self.edits(&delete, edit_distance, delete_words);
                    }
                }
            }
        }
    }

    /// All index keys of `term`: its prefix of `prefix_length` characters and the deletes of that prefix.
    pub fn edits_prefix(&self, term: &str) -> AHashSet<String> {
        let mut hash_set = AHashSet::new();

        if len(term) <= self.config.max_dictionary_edit_distance {
            hash_set.insert(String::new());
        }

        let key = prefix(term, self.config.prefix_length);
        hash_set.insert(key.to_string());
        self.edits(key, 0, &mut hash_set);

        hash_set
    }

    fn check_lookup(&self, max_edit_distance: usize) -> Result<(), SymSpellError> {
        if max_edit_distance > self.config.max_dictionary_edit_distance {
            return Err(SymSpellError::InvalidArgument {
                max_edit_distance,
                max_dictionary_edit_distance: self.config.max_dictionary_edit_distance,
            });
        }
        if self.words.is_empty() {
            return Err(SymSpellError::NotInitialized);
        }
        Ok(())
    }

    /// Find suggested spellings for a given input word.
    /// Returned suggestions are sorted by distance ascending, then by frequency count descending.
    ///
    /// # Arguments
    ///
    /// * `input` - The word being spell checked.
    /// * `verbosity` - The value controlling the quantity/closeness of the returned suggestions.
    /// * `max_edit_distance` - The maximum edit distance between input and suggested words,
    ///   at most `max_dictionary_edit_distance`.
    /// * `include_unknown` - Return `(input, max_edit_distance + 1, 0)` instead of nothing when no suggestion is found.
    ///
    /// # Errors
    ///
    /// [`SymSpellError::InvalidArgument`] if `max_edit_distance` exceeds the dictionary's,
    /// [`SymSpellError::NotInitialized`] if the dictionary is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use symspell_engine::{SymSpell, SymSpellConfig, Verbosity};
    ///
    /// let mut symspell = SymSpell::new(SymSpellConfig::default())?;
    /// symspell.load_dictionary(["whatever 3434557", "whenever 1846540"], 0, 1, " ")?;
    /// let suggestions = symspell.lookup("whatver", Verbosity::Top, 2, false)?;
    /// assert_eq!(suggestions[0].term, "whatever");
    /// # Ok::<(), symspell_engine::SymSpellError>(())
    /// ```
    pub fn lookup(
        &self,
        input: &str,
        verbosity: Verbosity,
        max_edit_distance: usize,
        include_unknown: bool,
    ) -> Result<Vec<Suggestion>, SymSpellError> {
        self.check_lookup(max_edit_distance)?;
        let input = self.normalize(input);
        Ok(self.lookup_checked(&input, verbosity, max_edit_distance, include_unknown))
    }

    fn lookup_checked(
        &self,
        input: &str,
        verbosity: Verbosity,
        max_edit_distance: usize,
        include_unknown: bool,
    ) -> Vec<Suggestion> {
        let mut suggestions = self.search(input, verbosity, max_edit_distance);
        if suggestions.is_empty() && include_unknown {
            suggestions.push(Suggestion::new(input, max_edit_distance + 1, 0));
        }
        trace!(input, ?verbosity, max_edit_distance, suggestions = suggestions.len(), "lookup");
        suggestions
    }

    fn search(&self, input: &str, verbosity: Verbosity, max_edit_distance: usize) -> Vec<Suggestion> {
        let mut found = Accumulator::new(verbosity, max_edit_distance);

        let input_len = len(input);
        // early termination - word is too big to possibly match any words
        if input_len > self.max_dictionary_term_length + max_edit_distance {
            return found.into_sorted();
        }

        if let Some(count) = self.words.get(input) {
            found.offer(Suggestion::new(input, 0, count));
            // early termination - return exact match, unless caller wants all matches
            if verbosity != Verbosity::All {
                return found.into_sorted();
            }
        }

        //early termination, if we only want to check if word in dictionary or get its frequency
        if max_edit_distance == 0 {
            return found.into_sorted();
        }

        let prefix_length = self.config.prefix_length;
        let comparator = self.distance.comparator();

        // deletes already queued, and suggestions already evaluated
        let mut considered_deletes: AHashSet<String> = AHashSet::new();
        let mut considered_suggestions: AHashSet<&str> = AHashSet::new();
        considered_suggestions.insert(input);

        let input_prefix_len = input_len.min(prefix_length);
        let mut candidates: VecDeque<String> = VecDeque::new();
        candidates.push_back(prefix(input, prefix_length).to_string());

        while let Some(candidate) = candidates.pop_front() {
            let candidate_len = len(&candidate);
            let length_diff = input_prefix_len.saturating_sub(candidate_len);

            //save some time - early termination
            //if candidate distance is already higher than suggestion distance, than there are no better suggestions to be expected
            if length_diff > found.bound {
                // skip to next candidate if Verbosity::All, look no further if Verbosity::Top or Closest
                // (candidates are ordered by delete distance, so none are closer than current)
                if verbosity == Verbosity::All {
                    continue;
                }
                break;
            }

            //read candidate entry from dictionary
            if let Some(dict_suggestions) = self.deletes.get(self.hasher.hash(&candidate)) {
                //iterate through suggestions (to other correct dictionary items) of delete item and add them to suggestion list
                for suggestion in dict_suggestions {
                    let suggestion: &str = suggestion;
                    if suggestion == input {
                        continue;
                    }

                    let suggestion_len = len(suggestion);
                    if suggestion_len.abs_diff(input_len) > found.bound
                        || suggestion_len < candidate_len
                        || (suggestion_len == candidate_len && suggestion != candidate)
                    {
                        continue;
                    }

                    let suggestion_prefix_len = suggestion_len.min(prefix_length);
                    if suggestion_prefix_len > input_prefix_len
                        && suggestion_prefix_len - candidate_len > found.bound
                    {
                        continue;
                    }

                    //Damerau-Levenshtein Edit Distance: adjust distance, if both distances>0
                    //We allow simultaneous edits (deletes) of maxEditDistance on on both the dictionary and the input term.
                    //For replaces and adjacent transposes the resulting edit distance stays <= maxEditDistance.
                    //For inserts and deletes the resulting edit distance might exceed maxEditDistance.
                    //To prevent suggestions of a higher edit distance, we need to calculate the resulting edit distance, if there are simultaneous edits on both sides.
                    //Example: (bank==bnak and bank==bink, but bank!=kanb and bank!=xban and bank!=baxn for maxEditDistance=1)
                    //Two deletes on each side of a pair makes them all equal, but the first two pairs have edit distance=1, the others edit distance=2.
                    let distance = if candidate_len == 0 {
                        //suggestions which have no common chars with input (inputLen<=maxEditDistance && suggestionLen<=maxEditDistance)
                        let distance = input_len.max(suggestion_len);
                        if distance > found.bound || !considered_suggestions.insert(suggestion) {
                            continue;
                        }
                        distance
                    } else if suggestion_len == 1 {
                        let shared = suggestion
                            .chars()
                            .next()
                            .is_some_and(|s| input.chars().any(|i| comparator.are_equal(i, s)));
                        let distance = if shared { input_len - 1 } else { input_len };
                        if distance > found.bound || !considered_suggestions.insert(suggestion) {
                            continue;
                        }
                        distance
                    // number of edits in prefix ==maxediddistance  AND no identic suffix,
                    // then editdistance>maxEditDistance and no need for Levenshtein calculation
                    } else if self.has_different_suffix(
                        max_edit_distance,
                        input,
                        input_len,
                        candidate_len,
                        suggestion,
                        suggestion_len,
                    ) {
                        continue;
                    } else {
                        // delete_in_suggestion_prefix is somewhat expensive, and only pays off when verbosity is Top or Closest.
                        if verbosity != Verbosity::All
                            && !self.delete_in_suggestion_prefix(&candidate, suggestion)
                        {
                            continue;
                        }

                        if !considered_suggestions.insert(suggestion) {
                            continue;
                        }

                        match self
                            .distance
                            .distance_with_early_stop(input, suggestion, found.bound)
                        {
                            Some(distance) => distance,
                            None => continue,
                        }
                    };

                    //save some time
                    //do not process higher distances than those already found, if verbosity<All (note: the bound will always equal max_edit_distance when Verbosity::All)
                    if distance <= found.bound {
                        let count = self.words.get(suggestion).unwrap_or_default();
                        found.offer(Suggestion::new(suggestion, distance, count));
                    }
                }
            }

            //add edits
            //derive edits (deletes) from candidate (input) and add them to candidates list
            //this is a recursive process until the maximum edit distance has been reached
            if length_diff < max_edit_distance && candidate_len <= prefix_length {
                //save some time
                //do not create edits with edit distance smaller than suggestions already found
                if verbosity != Verbosity::All && length_diff >= found.bound {
                    continue;
                }

                for i in 0..candidate_len {
                    let delete = remove(&candidate, i);

                    if !considered_deletes.contains(&delete) {
                        considered_deletes.insert(delete.clone());
                        candidates.push_back(delete);
                    }
                }
            }
        }

        found.into_sorted()
    }

    // Check whether all delete chars are present in the suggestion prefix in correct order, otherwise this is just a hash collision
    fn delete_in_suggestion_prefix(&self, delete: &str, suggestion: &str) -> bool {
        let comparator = self.distance.comparator();
        let mut suggestion_prefix = suggestion.chars().take(self.config.prefix_length);
        delete
            .chars()
            .all(|d| suggestion_prefix.any(|s| comparator.are_equal(d, s)))
    }

    // All deletes were spent inside the prefix (candidate_len == prefix_length - max_edit_distance),
    // so the parts of input and suggestion behind the prefix must match up to one transposition.
    fn has_different_suffix(
        &self,
        max_edit_distance: usize,
        input: &str,
        input_len: usize,
        candidate_len: usize,
        suggestion: &str,
        suggestion_len: usize,
    ) -> bool {
        let prefix_length = self.config.prefix_length;
        if prefix_length.checked_sub(max_edit_distance) != Some(candidate_len) {
            return false;
        }
        let min = match input_len.min(suggestion_len).checked_sub(prefix_length) {
            Some(min) if min > 0 => min,
            _ => return false,
        };

        // last min + 1 characters of both
        let input_tail: FastVec<char> = input.chars().skip(input_len - min - 1).collect();
        let suggestion_tail: FastVec<char> =
            suggestion.chars().skip(suggestion_len - min - 1).collect();

        let comparator = self.distance.comparator();
        let suffix_differs = min > 1
            && input_tail[2..]
                .iter()
                .zip(&suggestion_tail[2..])
                .any(|(a, b)| comparator.are_distinct(*a, *b));

        suffix_differs
            || (comparator.are_distinct(input_tail[1], suggestion_tail[1])
                && (comparator.are_distinct(input_tail[0], suggestion_tail[1])
                    || comparator.are_distinct(input_tail[1], suggestion_tail[0])))
    }

    /// Find suggested spellings for a multi-word input string (supports word splitting/merging).
    /// Returns a single Suggestion representing the suggested correct spelling of the whole input string.
    ///
    /// lookup_compound supports compound aware automatic spelling correction of multi-word input strings with three cases:
    /// 1. mistakenly inserted space into a correct word led to two incorrect terms
    /// 2. mistakenly omitted space between two correct words led to one incorrect combined term
    /// 3. multiple independent input terms with/without spelling errors
    ///
    /// # Arguments
    ///
    /// * `input` - The sentence being spell checked, split into terms on whitespace.
    /// * `max_edit_distance` - The maximum edit distance between input and suggested words.
    /// * `include_unknown` - Passed to the lookup of each single term.
    ///
    /// # Examples
    ///
    /// ```
    /// use symspell_engine::{SymSpell, SymSpellConfig};
    ///
    /// let mut symspell = SymSpell::new(SymSpellConfig::default())?;
    /// symspell.load_dictionary(["where 123", "is 456", "the 789", "love 101"], 0, 1, " ")?;
    /// let suggestion = symspell.lookup_compound("whereis th elove", 2, false)?;
    /// assert_eq!(suggestion.term, "where is the love");
    /// # Ok::<(), symspell_engine::SymSpellError>(())
    /// ```
    pub fn lookup_compound(
        &self,
        input: &str,
        max_edit_distance: usize,
        include_unknown: bool,
    ) -> Result<Suggestion, SymSpellError> {
        self.check_lookup(max_edit_distance)?;
        let input = self.normalize(input);
        let terms: Vec<&str> = input.split_whitespace().collect();

        //1 line with separate parts
        let mut suggestion_parts: Vec<Suggestion> = Vec::with_capacity(terms.len());

        //translate every term to its best suggestion, otherwise it remains unchanged
        let mut last_combi = false;
        for (i, &term) in terms.iter().enumerate() {
            let suggestions =
                self.lookup_checked(term, Verbosity::Top, max_edit_distance, include_unknown);

            //combi check, always before split
            if i > 0 && !last_combi {
                let combined = self.merge(
                    terms[i - 1],
                    term,
                    suggestion_parts.last(),
                    suggestions.first(),
                    max_edit_distance,
                );
                if let (Some(combined), Some(last)) = (combined, suggestion_parts.last_mut()) {
                    *last = combined;
                    last_combi = true;
                    continue;
                }
            }
            last_combi = false;

            //always split terms without suggestion / never split terms with suggestion ed=0 / never split single char terms
            match suggestions.into_iter().next() {
                Some(best) if best.distance == 0 || len(term) == 1 => suggestion_parts.push(best),
                best => suggestion_parts.push(self.split(term, best.as_ref(), max_edit_distance)),
            }
        }

        let n = self.config.corpus_word_count as f64;
        let count = suggestion_parts
            .iter()
            .fold(n, |count, part| count * (part.count as f64 / n));
        let term = suggestion_parts.iter().map(|part| part.term.as_str()).join(" ");
        let distance = self.distance.distance(&input, &term);

        debug!(
            terms = terms.len(),
            parts = suggestion_parts.len(),
            distance,
            "compound lookup"
        );
        Ok(Suggestion::new(term, distance, count as u64))
    }

    // Lookup of the concatenation `previous + term`. Returns the merged suggestion if it beats
    // the best suggestions of both terms on their own.
    fn merge(
        &self,
        previous: &str,
        term: &str,
        best1: Option<&Suggestion>,
        best2: Option<&Suggestion>,
        max_edit_distance: usize,
    ) -> Option<Suggestion> {
        let best1 = best1?;
        let mut combi = self
            .lookup_checked(
                &format!("{previous}{term}"),
                Verbosity::Top,
                max_edit_distance,
                false,
            )
            .into_iter()
            .next()?;

        let best2 = best2
            .cloned()
            .unwrap_or_else(|| unknown_word(term, max_edit_distance));

        //distance1=edit distance between 2 split terms und their best corrections : as comparative value for the combination
        let distance1 = best1.distance + best2.distance;
        let n = self.config.corpus_word_count as f64;
        // best1 / corpus * best2 / corpus * corpus
        let independent = best1.count as f64 / n * best2.count as f64;

        if combi.distance + 1 < distance1
            || (combi.distance + 1 == distance1 && combi.count as f64 > independent)
        {
            combi.distance += 1;
            Some(combi)
        } else {
            None
        }
    }

    // Best split of `term` into two dictionary words, or `best` if no split beats it.
    fn split(&self, term: &str, best: Option<&Suggestion>, max_edit_distance: usize) -> Suggestion {
        let n = self.config.corpus_word_count as f64;
        let mut split_best: Option<Suggestion> = best.cloned();

        for (j, _) in term.char_indices().skip(1) {
            let (part1, part2) = term.split_at(j);
            let Some(suggestion1) = self
                .lookup_checked(part1, Verbosity::Top, max_edit_distance, false)
                .into_iter()
                .next()
            else {
                continue;
            };
            let Some(suggestion2) = self
                .lookup_checked(part2, Verbosity::Top, max_edit_distance, false)
                .into_iter()
                .next()
            else {
                continue;
            };

            //select best suggestion for split pair
            let split_term = format!("{} {}", suggestion1.term, suggestion2.term);
            let distance = self
                .distance
                .distance_with_early_stop(term, &split_term, max_edit_distance)
                .unwrap_or(max_edit_distance + 1);

            if let Some(current) = &split_best {
                if distance > current.distance {
                    continue;
                }
                if distance < current.distance {
                    split_best = None;
                }
            }

            let concatenation_is_term = term.len() == suggestion1.term.len() + suggestion2.term.len()
                && term.starts_with(&suggestion1.term)
                && term.ends_with(&suggestion2.term);

            let count = match self.bigrams.get(&suggestion1.term, &suggestion2.term) {
                //if bigram exists in bigram dictionary
                Some(bigram_count) => match best {
                    //increase count, if split.corrections are part of or identical to input
                    //make count bigger than count of single term correction
                    Some(best) if concatenation_is_term => {
                        bigram_count.max(best.count.saturating_add(2))
                    }
                    Some(best) if suggestion1.term == best.term || suggestion2.term == best.term => {
                        bigram_count.max(best.count.saturating_add(1))
                    }
                    // no single term correction exists
                    None if concatenation_is_term => bigram_count
                        .max(suggestion1.count.max(suggestion2.count).saturating_add(2)),
                    _ => bigram_count,
                },
                //The Naive Bayes probability of the word combination is the product of the two word probabilities: P(AB) = P(A) * P(B)
                //use it to estimate the frequency count of the combination if no bigram in dictionary found, which then is used to rank/select the best splitting variant
                None => self
                    .bigram_count_min
                    .min((suggestion1.count as f64 / n * suggestion2.count as f64) as u64),
            };

            if split_best
                .as_ref()
                .map_or(true, |current| count > current.count)
            {
                split_best = Some(Suggestion::new(split_term, distance, count));
            }
        }

        split_best.unwrap_or_else(|| unknown_word(term, max_edit_distance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggestion_order() {
        let mut suggestions = vec![
            Suggestion::new("b", 1, 10),
            Suggestion::new("a", 1, 10),
            Suggestion::new("c", 0, 1),
            Suggestion::new("d", 1, 20),
        ];
        suggestions.sort();
        let terms: Vec<&str> = suggestions.iter().map(|s| s.term.as_str()).collect();
        assert_eq!(vec!["c", "d", "a", "b"], terms);
    }

    #[test]
    fn top_accumulator_keeps_single_best() {
        let mut found = Accumulator::new(Verbosity::Top, 2);
        found.offer(Suggestion::new("far", 2, 100));
        found.offer(Suggestion::new("near", 1, 5));
        assert_eq!(1, found.bound);
        found.offer(Suggestion::new("frequent", 1, 50));
        found.offer(Suggestion::new("rare", 1, 1));
        assert_eq!(vec![Suggestion::new("frequent", 1, 50)], found.into_sorted());
    }

    #[test]
    fn closest_accumulator_keeps_ties() {
        let mut found = Accumulator::new(Verbosity::Closest, 2);
        found.offer(Suggestion::new("far", 2, 100));
        found.offer(Suggestion::new("near", 1, 5));
        found.offer(Suggestion::new("close", 1, 7));
        let terms: Vec<String> = found.into_sorted().into_iter().map(|s| s.term).collect();
        assert_eq!(vec!["close", "near"], terms);
    }

    #[test]
    fn prefix_counts_chars() {
        assert_eq!("łąk", prefix("łąka", 3));
        assert_eq!("ab", prefix("ab", 7));
        assert_eq!("", prefix("ab", 0));
        assert_eq!("łka", remove("łąka", 1));
    }

    #[test]
    fn unknown_word_estimate() {
        assert_eq!(Suggestion::new("x", 3, 1), unknown_word("x", 2));
        assert_eq!(0, unknown_word("xyz", 2).count);
    }

    #[test]
    fn suffix_check_only_when_prefix_deletes_are_spent() {
        let symspell = SymSpell::default();
        // candidate_len 5 == prefix_length 7 - max 2, tails "ab" vs "xy" differ
        assert!(symspell.has_different_suffix(2, "abcdefgab", 9, 5, "abcdefgxy", 9));
        // transposition across the prefix boundary
        assert!(!symspell.has_different_suffix(2, "abcdefgab", 9, 5, "abcdefagb", 9));
        assert!(!symspell.has_different_suffix(2, "abcdefgab", 9, 6, "abcdefgxy", 9));
    }

    #[test]
    fn merged_suggestion_counts_the_removed_space() {
        let config = SymSpellConfig::builder()
            .corpus_word_count(1 << 20)
            .build()
            .unwrap();
        let mut symspell = SymSpell::new(config).unwrap();
        symspell
            .load_dictionary(["bat 1000", "an 100000", "batman 500"], 0, 1, " ")
            .unwrap();

        let bat = Suggestion::new("bat", 1, 1000);
        let an = Suggestion::new("an", 0, 100000);
        assert_eq!(
            Some(Suggestion::new("batman", 1, 500)),
            symspell.merge("batm", "an", Some(&bat), Some(&an), 2)
        );
        // two exact words never merge
        let bat = Suggestion::new("bat", 0, 1000);
        assert_eq!(None, symspell.merge("bat", "an", Some(&bat), Some(&an), 2));
    }

    #[test]
    fn delete_must_be_subsequence_of_prefix() {
        let symspell = SymSpell::default();
        assert!(symspell.delete_in_suggestion_prefix("hlo", "hello"));
        assert!(symspell.delete_in_suggestion_prefix("", "hello"));
        assert!(!symspell.delete_in_suggestion_prefix("oh", "hello"));
        assert!(!symspell.delete_in_suggestion_prefix("ll", "helo"));
    }
}
