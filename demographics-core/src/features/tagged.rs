use {
    once_cell::sync::Lazy,
    regex::Regex,
    crate::{
        lexicon::{EmotionLexicon, SenseLookup, StopWords},
        text::{TaggedText, SYMBOL_TAG},
    },
    super::{count, Feature, FeatureValue},
};

pub const PART_OF_SPEECH_KEY: &str = "POSTagging";
pub const PERSONAL_REFERENCE_KEY: &str = "CountPersonalReferences";
pub const PUNCTUATION_KEY: &str = "CountPunctuations";
pub const HASHTAG_KEY: &str = "CountHashTags";
pub const EMOTICON_KEY: &str = "CountEmoticon";
pub const EMOTIONAL_WORD_KEY: &str = "CountEmotionalWords";
pub const MISSPELLED_WORD_KEY: &str = "CountMisspelledWords";

/// Case-sensitive pronoun set.
pub const PERSONAL_REFERENCES: &[&str] = &["I", "he", "she", "we", "you", "they"];

static HASHTAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#[a-zA-Z0-9]+").unwrap());
static EMOTICON: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?::\)|:\(|:D|:'\)|=\)|:O|:P|B\))").unwrap());

/// The tagger's tag sequence, unchanged.
pub struct PartOfSpeechTags<'a> {
    text: &'a TaggedText,
}

impl<'a> PartOfSpeechTags<'a> {
    pub fn new(text: &'a TaggedText) -> Self {
        Self { text }
    }
}

impl Feature for PartOfSpeechTags<'_> {
    fn key(&self) -> &'static str {
        PART_OF_SPEECH_KEY
    }

    fn value(&self) -> FeatureValue {
        FeatureValue::Tags(self.text.tags.clone())
    }
}

pub struct PersonalReferenceCount<'a> {
    text: &'a TaggedText,
}

impl<'a> PersonalReferenceCount<'a> {
    pub fn new(text: &'a TaggedText) -> Self {
        Self { text }
    }
}

impl Feature for PersonalReferenceCount<'_> {
    fn key(&self) -> &'static str {
        PERSONAL_REFERENCE_KEY
    }

    fn value(&self) -> FeatureValue {
        count(self.text.tokens.iter().filter(|token| PERSONAL_REFERENCES.contains(&token.as_str())))
    }
}

/// Tokens that are a single ASCII punctuation character.
pub struct PunctuationCount<'a> {
    text: &'a TaggedText,
}

impl<'a> PunctuationCount<'a> {
    pub fn new(text: &'a TaggedText) -> Self {
        Self { text }
    }
}

impl Feature for PunctuationCount<'_> {
    fn key(&self) -> &'static str {
        PUNCTUATION_KEY
    }

    fn value(&self) -> FeatureValue {
        count(self.text.tokens.iter().filter(|token| {
            let mut chars = token.chars();
            matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_punctuation())
        }))
    }
}

/// Whitespace separated words of the raw text that start with a hashtag.
pub struct HashtagCount<'a> {
    raw_text: &'a str,
}

impl<'a> HashtagCount<'a> {
    pub fn new(raw_text: &'a str) -> Self {
        Self { raw_text }
    }
}

impl Feature for HashtagCount<'_> {
    fn key(&self) -> &'static str {
        HASHTAG_KEY
    }

    fn value(&self) -> FeatureValue {
        count(self.raw_text.split_whitespace().filter(|word| HASHTAG.is_match(word)))
    }
}

pub struct EmoticonCount<'a> {
    text: &'a TaggedText,
}

impl<'a> EmoticonCount<'a> {
    pub fn new(text: &'a TaggedText) -> Self {
        Self { text }
    }
}

impl Feature for EmoticonCount<'_> {
    fn key(&self) -> &'static str {
        EMOTICON_KEY
    }

    fn value(&self) -> FeatureValue {
        count(self.text.tags.iter().filter(|tagged| EMOTICON.is_match(&tagged.word)))
    }
}

pub struct EmotionalWordCount<'a> {
    text: &'a TaggedText,
    lexicon: &'a EmotionLexicon,
}

impl<'a> EmotionalWordCount<'a> {
    pub fn new(text: &'a TaggedText, lexicon: &'a EmotionLexicon) -> Self {
        Self { text, lexicon }
    }
}

impl Feature for EmotionalWordCount<'_> {
    fn key(&self) -> &'static str {
        EMOTIONAL_WORD_KEY
    }

    fn value(&self) -> FeatureValue {
        count(self.text.tags.iter().filter(|tagged| self.lexicon.contains(&tagged.word)))
    }
}

/// Tagged words with no dictionary sense, excluding stop words and symbols.
pub struct MisspelledWordCount<'a> {
    text: &'a TaggedText,
    dictionary: &'a dyn SenseLookup,
    stop_words: &'a StopWords,
}

impl<'a> MisspelledWordCount<'a> {
    pub fn new(text: &'a TaggedText, dictionary: &'a dyn SenseLookup, stop_words: &'a StopWords) -> Self {
        Self {
            text,
            dictionary,
            stop_words,
        }
    }
}

impl Feature for MisspelledWordCount<'_> {
    fn key(&self) -> &'static str {
        MISSPELLED_WORD_KEY
    }

    fn value(&self) -> FeatureValue {
        count(self.text.tags.iter().filter(|tagged| {
            !self.dictionary.has_sense(&tagged.word)
                && !self.stop_words.contains(&tagged.word)
                && tagged.tag != SYMBOL_TAG
        }))
    }
}

#[cfg(test)]
mod tests {
    use {
        crate::{
            lexicon::SenseDictionary,
            text::{RuleTagger, Tagger},
        },
        super::*,
    };

    const SAMPLE: &str = "Heyyyy.. My Name is Chinmay!!!! I am so happy!!! That so gay.. :) =) #Name #Me #12";

    fn scalar(value: FeatureValue) -> f64 {
        match value {
            FeatureValue::Scalar(v) => v,
            other => panic!("expected scalar, got {:?}", other),
        }
    }

    fn tagged(text: &str) -> TaggedText {
        RuleTagger::new().tag(text)
    }

    #[test]
    fn part_of_speech_tags_pass_through() {
        let text = tagged("we run");
        match PartOfSpeechTags::new(&text).value() {
            FeatureValue::Tags(tags) => assert_eq!(tags, text.tags),
            other => panic!("expected tags, got {:?}", other),
        }
    }

    #[test]
    fn personal_references_are_case_sensitive() {
        let text = tagged("I think she and They said we you he i");
        // "They" and "i" are not in the set
        assert_eq!(scalar(PersonalReferenceCount::new(&text).value()), 5.0);
    }

    #[test]
    fn counts_single_punctuation_tokens() {
        let text = TaggedText {
            tokens: vec!["!".into(), "..".into(), "a".into(), "?".into(), "’".into()],
            ..TaggedText::default()
        };
        assert_eq!(scalar(PunctuationCount::new(&text).value()), 2.0);
    }

    #[test]
    fn hashtags_on_the_sample_line() {
        assert_eq!(scalar(HashtagCount::new(SAMPLE).value()), 3.0);
        assert_eq!(scalar(HashtagCount::new("# #! a#b").value()), 0.0);
    }

    #[test]
    fn emoticons_on_the_sample_line() {
        let text = tagged(SAMPLE);
        assert_eq!(scalar(EmoticonCount::new(&text).value()), 2.0);
    }

    #[test]
    fn emotional_words_use_injected_lexicon() {
        let lexicon = EmotionLexicon::parse("happy,gay,sad");
        let text = tagged(SAMPLE);
        assert_eq!(scalar(EmotionalWordCount::new(&text, &lexicon).value()), 2.0);

        let text = tagged("HAPPY Sad");
        assert_eq!(scalar(EmotionalWordCount::new(&text, &lexicon).value()), 2.0);
    }

    #[test]
    fn misspelled_words_skip_stop_words_and_symbols() {
        let dictionary = SenseDictionary::parse("name\nhappy\nthink");
        let stop_words = StopWords::english();
        let text = tagged("I think Heyyyy is happy $ wrld");

        // "Heyyyy" and "wrld" have no sense; "I" and "is" are stop words; "$" is a symbol
        let feature = MisspelledWordCount::new(&text, &dictionary, &stop_words);
        assert_eq!(scalar(feature.value()), 2.0);
    }

    #[test]
    fn empty_text_counts_are_zero() {
        let text = tagged("");
        let lexicon = EmotionLexicon::parse("happy");
        let dictionary = SenseDictionary::parse("happy");
        let stop_words = StopWords::english();

        assert_eq!(scalar(PersonalReferenceCount::new(&text).value()), 0.0);
        assert_eq!(scalar(PunctuationCount::new(&text).value()), 0.0);
        assert_eq!(scalar(HashtagCount::new("").value()), 0.0);
        assert_eq!(scalar(EmoticonCount::new(&text).value()), 0.0);
        assert_eq!(scalar(EmotionalWordCount::new(&text, &lexicon).value()), 0.0);
        assert_eq!(scalar(MisspelledWordCount::new(&text, &dictionary, &stop_words).value()), 0.0);
    }
}
