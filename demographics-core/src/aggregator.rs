use {
    std::collections::{BTreeMap, HashSet},
    tracing::debug,
    crate::{
        config::FeaturesConfig,
        error::{FeatureError, ResourceError},
        features::{
            AverageTweetLength,
            Capitalization,
            CategoricalWordCount,
            EmoticonCount,
            EmotionalWordCount,
            Feature,
            FeatureKind,
            FeatureScope,
            FeatureValue,
            FrequencyOfTweeting,
            HashtagCount,
            LanguageCount,
            MentionCount,
            MisspelledWordCount,
            NumberOfCompleteMultiTweets,
            PartOfSpeechTags,
            PersonalReferenceCount,
            PunctuationCount,
            RegionCount,
            RetweetCount,
            user::DEFAULT_MINUTE_INTERVAL,
        },
        lexicon::{EmotionLexicon, SenseDictionary, SenseLookup, StopWords},
        record::User,
        text::{RuleTagger, TaggedText, Tagger},
        vectorizer::{FeatureVector, VectorValue},
    },
};

/// Shared, read-only resources handed to the features that need them.
pub struct FeatureContext {
    tagger: Box<dyn Tagger>,
    emotions: Option<EmotionLexicon>,
    dictionary: Option<Box<dyn SenseLookup>>,
    stop_words: StopWords,
    minute_interval: u32,
}

impl FeatureContext {
    pub fn new(tagger: Box<dyn Tagger>) -> Self {
        Self {
            tagger,
            emotions: None,
            dictionary: None,
            stop_words: StopWords::english(),
            minute_interval: DEFAULT_MINUTE_INTERVAL,
        }
    }

    /// Loads only the resources the enabled features depend on.
    pub fn from_config(config: &FeaturesConfig) -> Result<Self, FeatureError> {
        let enabled = config.enabled();
        let mut context = Self::new(Box::new(RuleTagger::new()))
            .with_minute_interval(config.minute_interval())?;

        if enabled.contains(&FeatureKind::EmotionalWordCount) {
            let path = config.emotional_words().ok_or(ResourceError::NotConfigured { name: "emotional word list" })?;
            context = context.with_emotions(EmotionLexicon::load(path)?);
        }

        if enabled.contains(&FeatureKind::MisspelledWordCount) {
            let path = config.dictionary().ok_or(ResourceError::NotConfigured { name: "dictionary" })?;
            context = context.with_dictionary(Box::new(SenseDictionary::load(path)?));
        }

        Ok(context)
    }

    pub fn with_emotions(mut self, emotions: EmotionLexicon) -> Self {
        self.emotions = Some(emotions);
        self
    }

    pub fn with_dictionary(mut self, dictionary: Box<dyn SenseLookup>) -> Self {
        self.dictionary = Some(dictionary);
        self
    }

    pub fn with_stop_words(mut self, stop_words: StopWords) -> Self {
        self.stop_words = stop_words;
        self
    }

    pub fn with_minute_interval(mut self, minute_interval: u32) -> Result<Self, FeatureError> {
        if minute_interval == 0 || minute_interval > 24 * 60 {
            return Err(FeatureError::InvalidInterval(minute_interval));
        }

        self.minute_interval = minute_interval;
        Ok(self)
    }

    pub fn tagger(&self) -> &dyn Tagger {
        self.tagger.as_ref()
    }

    fn emotions(&self) -> Result<&EmotionLexicon, ResourceError> {
        self.emotions.as_ref().ok_or(ResourceError::NotConfigured { name: "emotional word list" })
    }

    fn dictionary(&self) -> Result<&dyn SenseLookup, ResourceError> {
        self.dictionary.as_deref().ok_or(ResourceError::NotConfigured { name: "dictionary" })
    }
}

pub struct FeatureAggregator {
    kinds: Vec<FeatureKind>,
    context: FeatureContext,
}

impl FeatureAggregator {
    pub fn new(kinds: Vec<FeatureKind>, context: FeatureContext) -> Result<Self, FeatureError> {
        let mut seen = HashSet::new();
        for kind in &kinds {
            if !seen.insert(*kind) {
                return Err(FeatureError::DuplicateFeature(kind.to_string()));
            }
        }

        // resources are checked up front so a missing one fails before any user is processed
        if kinds.contains(&FeatureKind::EmotionalWordCount) {
            context.emotions()?;
        }
        if kinds.contains(&FeatureKind::MisspelledWordCount) {
            context.dictionary()?;
        }

        Ok(Self { kinds, context })
    }

    pub fn kinds(&self) -> &[FeatureKind] {
        &self.kinds
    }

    pub fn context(&self) -> &FeatureContext {
        &self.context
    }

    pub fn aggregate(&self, users: &[User]) -> Result<Vec<FeatureVector>, FeatureError> {
        users.iter().map(|user| self.aggregate_user(user)).collect()
    }

    /// One feature vector per user. Tweet and text scoped features are summed
    /// over the user's tweets; mappings are merged key by key.
    pub fn aggregate_user(&self, user: &User) -> Result<FeatureVector, FeatureError> {
        let needs_tagging = self.kinds.iter().any(|kind| kind.scope() == FeatureScope::TaggedText);
        let tagged: Vec<TaggedText> = if needs_tagging {
            user.tweets().iter().map(|tweet| self.context.tagger.tag(tweet.raw_text())).collect()
        } else {
            Vec::new()
        };

        let mut merged = MergedVector::default();
        for kind in &self.kinds {
            let value = self.evaluate(*kind, user, &tagged)?;
            merged.insert(kind.key(), expand(kind.key(), value))?;
        }

        let vector = merged.vector;
        debug!("user {}: {} feature values", user.id(), vector.len());
        Ok(vector)
    }

    /// Every text scoped feature over one piece of text.
    pub fn inspect_text(&self, text: &str) -> Vec<(&'static str, FeatureValue)> {
        let tagged = self.context.tagger.tag(text);

        let mut values = vec![
            feature_entry(PartOfSpeechTags::new(&tagged)),
            feature_entry(PersonalReferenceCount::new(&tagged)),
            feature_entry(PunctuationCount::new(&tagged)),
            feature_entry(HashtagCount::new(text)),
            feature_entry(EmoticonCount::new(&tagged)),
        ];

        if let Ok(emotions) = self.context.emotions() {
            values.push(feature_entry(EmotionalWordCount::new(&tagged, emotions)));
        }
        if let Ok(dictionary) = self.context.dictionary() {
            values.push(feature_entry(MisspelledWordCount::new(&tagged, dictionary, &self.context.stop_words)));
        }

        values
    }

    fn evaluate(&self, kind: FeatureKind, user: &User, tagged: &[TaggedText]) -> Result<FeatureValue, FeatureError> {
        let context = &self.context;
        let tweets = user.tweets();

        let value = match kind {
            FeatureKind::Capitalization => sum(tweets.iter().map(|tweet| Capitalization::new(tweet).value())),
            FeatureKind::CategoricalWordCount => sum(tweets.iter().map(|tweet| CategoricalWordCount::new(tweet).value())),
            FeatureKind::HashtagCount => sum(tweets.iter().map(|tweet| HashtagCount::new(tweet.raw_text()).value())),
            FeatureKind::PartOfSpeechTags => {
                let tags = tagged.iter()
                    .flat_map(|text| match PartOfSpeechTags::new(text).value() {
                        FeatureValue::Tags(tags) => tags,
                        _ => Vec::new(),
                    })
                    .collect();
                FeatureValue::Tags(tags)
            },
            FeatureKind::PersonalReferenceCount => sum(tagged.iter().map(|text| PersonalReferenceCount::new(text).value())),
            FeatureKind::PunctuationCount => sum(tagged.iter().map(|text| PunctuationCount::new(text).value())),
            FeatureKind::EmoticonCount => sum(tagged.iter().map(|text| EmoticonCount::new(text).value())),
            FeatureKind::EmotionalWordCount => {
                let emotions = context.emotions()?;
                sum(tagged.iter().map(|text| EmotionalWordCount::new(text, emotions).value()))
            },
            FeatureKind::MisspelledWordCount => {
                let dictionary = context.dictionary()?;
                sum(tagged.iter().map(|text| MisspelledWordCount::new(text, dictionary, &context.stop_words).value()))
            },
            FeatureKind::AverageTweetLength => AverageTweetLength::new(user).value(),
            FeatureKind::MentionCount => MentionCount::new(user).value(),
            FeatureKind::FrequencyOfTweeting => FrequencyOfTweeting::new(user, context.minute_interval).value(),
            FeatureKind::NumberOfCompleteMultiTweets => NumberOfCompleteMultiTweets::new(user).value(),
            FeatureKind::RetweetCount => RetweetCount::new(user).value(),
            FeatureKind::LanguageCount => LanguageCount::new(user).value(),
            FeatureKind::RegionCount => RegionCount::new(user).value(),
        };

        Ok(value)
    }
}

/// Feature vector that remembers which feature wrote each key.
#[derive(Default)]
struct MergedVector {
    vector: FeatureVector,
    owners: BTreeMap<String, &'static str>,
}

impl MergedVector {
    fn insert(&mut self, owner: &'static str, entries: Vec<(String, VectorValue)>) -> Result<(), FeatureError> {
        for (key, value) in entries {
            if let Some(first) = self.owners.insert(key.clone(), owner) {
                return Err(FeatureError::DuplicateKey {
                    key,
                    first,
                    second: owner,
                });
            }
            self.vector.insert(key, value);
        }

        Ok(())
    }
}

fn feature_entry<F: Feature>(feature: F) -> (&'static str, FeatureValue) {
    (feature.key(), feature.value())
}

fn sum<I: Iterator<Item = FeatureValue>>(values: I) -> FeatureValue {
    let total = values
        .map(|value| match value {
            FeatureValue::Scalar(v) => v,
            _ => 0.0,
        })
        .sum();
    FeatureValue::Scalar(total)
}

/// Flattens a feature value into vector entries. Tag sequences become one
/// count per tag under `key=TAG`.
fn expand(key: &str, value: FeatureValue) -> Vec<(String, VectorValue)> {
    match value {
        FeatureValue::Scalar(v) => vec![(key.to_owned(), VectorValue::Number(v))],
        FeatureValue::Mapping(mapping) => mapping
            .into_iter()
            .map(|(key, v)| (key, VectorValue::Number(v)))
            .collect(),
        FeatureValue::Tags(tags) => {
            let mut counts: BTreeMap<String, f64> = BTreeMap::new();
            for tagged in tags {
                *counts.entry(format!("{}={}", key, tagged.tag)).or_insert(0.0) += 1.0;
            }
            counts.into_iter().map(|(key, v)| (key, VectorValue::Number(v))).collect()
        },
    }
}
