//! Hand-crafted linguistic and behavioural features.
//!
//! Every feature is built over one record (a tweet, a user, or a tagged unit
//! of text) and exposes a stable key plus a value. Features hold no state
//! beyond the record and the shared resources they were constructed with.

use {
    std::{collections::BTreeMap, fmt},
    serde::{Serialize, Deserialize},
    crate::text::TaggedToken,
};

pub mod tagged;
pub mod tweet;
pub mod user;

pub use {
    tagged::{
        EmoticonCount,
        EmotionalWordCount,
        HashtagCount,
        MisspelledWordCount,
        PartOfSpeechTags,
        PersonalReferenceCount,
        PunctuationCount,
    },
    tweet::{Capitalization, CategoricalWordCount},
    user::{
        AverageTweetLength,
        FrequencyOfTweeting,
        LanguageCount,
        MentionCount,
        NumberOfCompleteMultiTweets,
        RegionCount,
        RetweetCount,
    },
};

#[derive(Serialize, Clone, Debug, PartialEq)]
pub enum FeatureValue {
    Scalar(f64),
    Mapping(BTreeMap<String, f64>),
    Tags(Vec<TaggedToken>),
}

pub trait Feature {
    /// Stable identifier, used as the column name.
    fn key(&self) -> &'static str;

    fn value(&self) -> FeatureValue;
}

/// Which record a feature is computed over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeatureScope {
    Tweet,
    User,
    TaggedText,
    RawText,
}

/// The closed set of features the aggregator can be configured with.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureKind {
    Capitalization,
    AverageTweetLength,
    MentionCount,
    PartOfSpeechTags,
    PersonalReferenceCount,
    PunctuationCount,
    HashtagCount,
    EmoticonCount,
    EmotionalWordCount,
    MisspelledWordCount,
    FrequencyOfTweeting,
    NumberOfCompleteMultiTweets,
    CategoricalWordCount,
    RetweetCount,
    LanguageCount,
    RegionCount,
}

impl FeatureKind {
    pub const ALL: [FeatureKind; 16] = [
        FeatureKind::Capitalization,
        FeatureKind::AverageTweetLength,
        FeatureKind::MentionCount,
        FeatureKind::PartOfSpeechTags,
        FeatureKind::PersonalReferenceCount,
        FeatureKind::PunctuationCount,
        FeatureKind::HashtagCount,
        FeatureKind::EmoticonCount,
        FeatureKind::EmotionalWordCount,
        FeatureKind::MisspelledWordCount,
        FeatureKind::FrequencyOfTweeting,
        FeatureKind::NumberOfCompleteMultiTweets,
        FeatureKind::CategoricalWordCount,
        FeatureKind::RetweetCount,
        FeatureKind::LanguageCount,
        FeatureKind::RegionCount,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            FeatureKind::Capitalization => tweet::CAPITALIZATION_KEY,
            FeatureKind::AverageTweetLength => user::AVERAGE_TWEET_LENGTH_KEY,
            FeatureKind::MentionCount => user::MENTION_COUNT_KEY,
            FeatureKind::PartOfSpeechTags => tagged::PART_OF_SPEECH_KEY,
            FeatureKind::PersonalReferenceCount => tagged::PERSONAL_REFERENCE_KEY,
            FeatureKind::PunctuationCount => tagged::PUNCTUATION_KEY,
            FeatureKind::HashtagCount => tagged::HASHTAG_KEY,
            FeatureKind::EmoticonCount => tagged::EMOTICON_KEY,
            FeatureKind::EmotionalWordCount => tagged::EMOTIONAL_WORD_KEY,
            FeatureKind::MisspelledWordCount => tagged::MISSPELLED_WORD_KEY,
            FeatureKind::FrequencyOfTweeting => user::FREQUENCY_OF_TWEETING_KEY,
            FeatureKind::NumberOfCompleteMultiTweets => user::MULTI_TWEETS_KEY,
            FeatureKind::CategoricalWordCount => tweet::CATEGORICAL_WORD_KEY,
            FeatureKind::RetweetCount => user::RETWEET_COUNT_KEY,
            FeatureKind::LanguageCount => user::LANGUAGE_COUNT_KEY,
            FeatureKind::RegionCount => user::REGION_COUNT_KEY,
        }
    }

    pub fn scope(&self) -> FeatureScope {
        match self {
            FeatureKind::Capitalization | FeatureKind::CategoricalWordCount => FeatureScope::Tweet,
            FeatureKind::HashtagCount => FeatureScope::RawText,
            FeatureKind::PartOfSpeechTags
            | FeatureKind::PersonalReferenceCount
            | FeatureKind::PunctuationCount
            | FeatureKind::EmoticonCount
            | FeatureKind::EmotionalWordCount
            | FeatureKind::MisspelledWordCount => FeatureScope::TaggedText,
            FeatureKind::AverageTweetLength
            | FeatureKind::MentionCount
            | FeatureKind::FrequencyOfTweeting
            | FeatureKind::NumberOfCompleteMultiTweets
            | FeatureKind::RetweetCount
            | FeatureKind::LanguageCount
            | FeatureKind::RegionCount => FeatureScope::User,
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

pub(crate) fn count<I: IntoIterator>(items: I) -> FeatureValue {
    FeatureValue::Scalar(items.into_iter().count() as f64)
}
