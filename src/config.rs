use derive_builder::Builder;

use crate::error::SymSpellError;

/// Number of all words in the corpus the default English frequency dictionary was generated from.
pub const DEFAULT_CORPUS_WORD_COUNT: u64 = 1_024_908_267_229;

/// Construction parameters of a [`SymSpell`](crate::SymSpell) instance.
///
/// ```
/// use symspell_engine::SymSpellConfig;
///
/// let config = SymSpellConfig::builder()
///     .max_dictionary_edit_distance(3)
///     .count_threshold(10)
///     .build()
///     .unwrap();
/// assert_eq!(config.prefix_length, 7);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SymSpellConfig {
    /// Maximum edit distance for dictionary precalculation.
    #[builder(default = "2")]
    pub max_dictionary_edit_distance: usize,
    /// The length of word prefixes, from which deletes are generated. (5..7).
    #[builder(default = "7")]
    pub prefix_length: usize,
    /// The minimum frequency count for dictionary words to be considered a valid for spelling correction.
    #[builder(default = "1")]
    pub count_threshold: u64,
    /// Number of all words in the corpus used to generate the frequency dictionary.
    /// This is used to calculate the word occurrence probability p from word counts c : p=c/N.
    /// N equals the sum of all counts c in the dictionary only if the dictionary is complete,
    /// but not if the dictionary is truncated or filtered.
    #[builder(default = "DEFAULT_CORPUS_WORD_COUNT")]
    pub corpus_word_count: u64,
    /// Apply Unicode normalization form KC to dictionary terms and lookup input.
    #[builder(default = "false")]
    pub normalize_unicode: bool,
}

impl SymSpellConfig {
    pub fn builder() -> SymSpellConfigBuilder {
        SymSpellConfigBuilder::default()
    }

    /// Checks the invariants of the builder on a config assembled by hand or deserialized.
    pub fn validate(&self) -> Result<(), SymSpellError> {
        check(
            self.max_dictionary_edit_distance,
            self.prefix_length,
            self.corpus_word_count,
        )
        .map_err(SymSpellError::InvalidConfig)
    }
}

impl Default for SymSpellConfig {
    fn default() -> Self {
        Self {
            max_dictionary_edit_distance: 2,
            prefix_length: 7,
            count_threshold: 1,
            corpus_word_count: DEFAULT_CORPUS_WORD_COUNT,
            normalize_unicode: false,
        }
    }
}

impl SymSpellConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        check(
            self.max_dictionary_edit_distance.unwrap_or(2),
            self.prefix_length.unwrap_or(7),
            self.corpus_word_count.unwrap_or(DEFAULT_CORPUS_WORD_COUNT),
        )
    }
}

fn check(max_distance: usize, prefix_length: usize, corpus_word_count: u64) -> Result<(), String> {
    if prefix_length < 1 {
        return Err("prefix_length must be at least 1".into());
    }
    if prefix_length <= max_distance {
        return Err(format!(
            "prefix_length ({prefix_length}) must be greater than max_dictionary_edit_distance ({max_distance})"
        ));
    }
    if corpus_word_count == 0 {
        return Err("corpus_word_count must be positive".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_match_default() {
        let built = SymSpellConfig::builder().build().unwrap();
        assert_eq!(built, SymSpellConfig::default());
    }

    #[test]
    fn prefix_must_exceed_edit_distance() {
        let err = SymSpellConfig::builder()
            .max_dictionary_edit_distance(3)
            .prefix_length(3)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("prefix_length"));
    }

    #[test]
    fn corpus_word_count_must_be_positive() {
        assert!(SymSpellConfig::builder().corpus_word_count(0).build().is_err());
    }

    #[test]
    fn hand_built_config_is_checked() {
        assert!(SymSpellConfig::default().validate().is_ok());

        let config = SymSpellConfig {
            prefix_length: 2,
            ..SymSpellConfig::default()
        };
        assert!(matches!(config.validate(), Err(SymSpellError::InvalidConfig(_))));

        let config = SymSpellConfig {
            corpus_word_count: 0,
            ..SymSpellConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
