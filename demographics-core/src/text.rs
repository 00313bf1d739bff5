use {
    once_cell::sync::Lazy,
    regex::Regex,
    serde::Serialize,
};

/// A token paired with its part-of-speech tag.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct TaggedToken {
    pub word: String,
    pub tag: String,
}

/// Output of a tokenizer/tagger over one unit of text.
#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct TaggedText {
    pub raw: String,
    pub tokens: Vec<String>,
    pub tags: Vec<TaggedToken>,
}

pub trait Tagger: Send + Sync {
    fn tag(&self, text: &str) -> TaggedText;
}

pub const SYMBOL_TAG: &str = "SYM";

const PUNCTUATION_TAGS: &[&str] = &[".", ",", ":", "(", ")", "''"];

static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(concat!(
    r":'\)|:\)|:\(|:D|:O|:P|=\)|B\)",
    r"|[@#][A-Za-z0-9_]+",
    r"|https?://\S+",
    r"|[0-9]+(?:[.,][0-9]+)*",
    r"|\w+(?:['’]\w+)*",
    r"|[^\w\s]",
)).unwrap());

static EMOTICON: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?::'\)|:\)|:\(|:D|:O|:P|=\)|B\))$").unwrap());

const PRONOUNS: &[&str] = &[
    "i", "me", "you", "he", "him", "she", "her", "it", "we", "us", "they", "them",
];

const POSSESSIVES: &[&str] = &["my", "your", "his", "its", "our", "their"];

const DETERMINERS: &[&str] = &["a", "an", "the", "this", "that", "these", "those", "every", "some"];

const PREPOSITIONS: &[&str] = &[
    "in", "on", "at", "of", "for", "with", "from", "by", "about", "into", "over", "under",
    "after", "before", "to", "via",
];

const CONJUNCTIONS: &[&str] = &["and", "or", "but", "nor", "yet", "so"];

const MODALS: &[&str] = &["can", "could", "will", "would", "shall", "should", "may", "might", "must"];

const BE_FORMS: &[&str] = &["am", "is", "are", "was", "were", "be", "been", "being"];

/// Regex tokenizer with a lexicon-and-suffix tagger producing Penn Treebank tags.
///
/// Emoticons, mentions, hashtags and urls are kept as single tokens, every other
/// non-word character becomes its own token.
#[derive(Clone, Debug, Default)]
pub struct RuleTagger;

impl RuleTagger {
    pub fn new() -> Self {
        Self
    }

    pub fn tokenize(text: &str) -> Vec<String> {
        TOKEN_PATTERN
            .find_iter(text)
            .map(|m| m.as_str().to_owned())
            .collect()
    }

    fn tag_word(word: &str, sentence_start: bool) -> &'static str {
        let lower = word.to_lowercase();
        let lower = lower.as_str();
        let first = word.chars().next();

        if EMOTICON.is_match(word) {
            return "UH";
        }

        match first {
            Some('@') | Some('#') if word.len() > 1 => return "NNP",
            Some(c) if c.is_ascii_digit() => return "CD",
            Some(c) if !c.is_alphanumeric() && word.chars().count() == 1 => return punctuation_tag(c),
            _ => {},
        }

        if lower.starts_with("http://") || lower.starts_with("https://") {
            return "NN";
        }

        if PRONOUNS.contains(&lower) {
            "PRP"
        } else if POSSESSIVES.contains(&lower) {
            "PRP$"
        } else if DETERMINERS.contains(&lower) {
            "DT"
        } else if lower == "to" {
            "TO"
        } else if PREPOSITIONS.contains(&lower) {
            "IN"
        } else if CONJUNCTIONS.contains(&lower) {
            "CC"
        } else if MODALS.contains(&lower) {
            "MD"
        } else if BE_FORMS.contains(&lower) {
            if lower == "is" || lower == "am" || lower == "are" { "VBP" } else { "VB" }
        } else if lower.ends_with("ing") && lower.len() > 4 {
            "VBG"
        } else if lower.ends_with("ed") && lower.len() > 3 {
            "VBD"
        } else if lower.ends_with("ly") && lower.len() > 3 {
            "RB"
        } else if first.map(char::is_uppercase).unwrap_or(false) && !sentence_start {
            "NNP"
        } else if lower.ends_with('s') && !lower.ends_with("ss") && lower.len() > 3 {
            "NNS"
        } else {
            "NN"
        }
    }
}

fn punctuation_tag(c: char) -> &'static str {
    match c {
        '.' | '!' | '?' => ".",
        ',' => ",",
        ':' | ';' | '-' => ":",
        '(' | '[' | '{' => "(",
        ')' | ']' | '}' => ")",
        '"' | '\'' => "''",
        _ => SYMBOL_TAG,
    }
}

impl Tagger for RuleTagger {
    fn tag(&self, text: &str) -> TaggedText {
        let tokens = Self::tokenize(text);

        let mut sentence_start = true;
        let tags = tokens.iter()
            .filter_map(|word| {
                let tag = Self::tag_word(word, sentence_start);
                sentence_start = tag == ".";
                // punctuation stays in `tokens` but is not part of the tag sequence
                if PUNCTUATION_TAGS.contains(&tag) {
                    return None;
                }

                Some(TaggedToken {
                    word: word.clone(),
                    tag: tag.to_owned(),
                })
            })
            .collect();

        TaggedText {
            raw: text.to_owned(),
            tokens,
            tags,
        }
    }
}
