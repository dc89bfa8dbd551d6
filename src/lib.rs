/*!

Spelling correction & Fuzzy search based on Symmetric Delete spelling correction algorithm.

#### Usage of SymSpell Library

```rust
use symspell_engine::{SymSpell, SymSpellConfig, Verbosity};

let config = SymSpellConfig::builder()
    .max_dictionary_edit_distance(2) //maximum edit distance per dictionary precalculation
    .prefix_length(7)
    .count_threshold(1)
    .build()?;
let mut symspell = SymSpell::new(config)?;

let term_index = 0; //column of the term in the dictionary text file
let count_index = 1; //column of the term frequency in the dictionary text file

// single term dictionary
symspell.load_dictionary_file("data/words.txt", term_index, count_index, " ")?;

//lookup suggestions for single-word input strings
let input_term = "hous";
let suggestion_verbosity = Verbosity::Closest; //Top, Closest, All
let max_edit_distance_lookup = 1; //max edit distance per lookup (max_edit_distance_lookup<=max_dictionary_edit_distance)
let suggestions = symspell.lookup(input_term, suggestion_verbosity, max_edit_distance_lookup, false)?;
//display suggestions, edit distance and term frequency
println!("{:?}", suggestions);

// bigram dictionary
symspell.load_bigram_dictionary_file("data/bigrams.txt", 0, 2, " ")?;

//lookup suggestions for multi-word input strings (supports compound splitting & merging)
let input_sentence = "whereis th elove";
let max_edit_distance_lookup = 2; //max edit distance per lookup (per single word, not per whole input string)
let compound_suggestion = symspell.lookup_compound(input_sentence, max_edit_distance_lookup, false)?;
//display suggestion, edit distance and term frequency
println!("{:?}", compound_suggestion);
# Ok::<(), symspell_engine::SymSpellError>(())
```

Storage is pluggable through [`Backend`], character equality through [`CharComparator`].
*/

mod config;
mod distance;
mod error;
mod staging;
mod store;
mod symspell;

pub use config::{
    SymSpellConfig, SymSpellConfigBuilder, SymSpellConfigBuilderError, DEFAULT_CORPUS_WORD_COUNT,
};
pub use distance::{
    CharComparator, DamerauLevenshteinOsa, IgnoreCaseComparator, OrdinalComparator,
    StringDistance,
};
pub use error::{MalformedLine, SymSpellError};
pub use store::{
    Backend, BigramStore, DefaultStringHasher, DeleteStore, FrequencyStore, HashBackend,
    HashBigramStore, HashDeleteStore, HashFrequencyStore, StringHasher,
};
pub use symspell::{Suggestion, SymSpell, Verbosity};
