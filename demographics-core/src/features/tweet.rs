use {
    crate::record::Tweet,
    super::{count, Feature, FeatureValue},
};

pub const CAPITALIZATION_KEY: &str = "CapitalizationFeature";
pub const CATEGORICAL_WORD_KEY: &str = "CountCategoricalWords";

/// Lifestyle and goal related vocabulary, matched exactly.
pub const CATEGORICAL_WORDS: &[&str] = &[
    "help", "acheive", "success", "dreams", "goals", "career", "beer", "alcohol", "sex",
    "football", "esteem", "ego", "pride", "gym",
];

/// Upper-case characters in the raw text.
pub struct Capitalization<'a> {
    tweet: &'a Tweet,
}

impl<'a> Capitalization<'a> {
    pub fn new(tweet: &'a Tweet) -> Self {
        Self { tweet }
    }
}

impl Feature for Capitalization<'_> {
    fn key(&self) -> &'static str {
        CAPITALIZATION_KEY
    }

    fn value(&self) -> FeatureValue {
        count(self.tweet.raw_text().chars().filter(|c| c.is_uppercase()))
    }
}

/// Words of the raw text, split on single spaces, found in [`CATEGORICAL_WORDS`].
pub struct CategoricalWordCount<'a> {
    tweet: &'a Tweet,
}

impl<'a> CategoricalWordCount<'a> {
    pub fn new(tweet: &'a Tweet) -> Self {
        Self { tweet }
    }
}

impl Feature for CategoricalWordCount<'_> {
    fn key(&self) -> &'static str {
        CATEGORICAL_WORD_KEY
    }

    fn value(&self) -> FeatureValue {
        count(self.tweet.raw_text().split(' ').filter(|word| CATEGORICAL_WORDS.contains(word)))
    }
}
