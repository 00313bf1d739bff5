use {
    std::{collections::HashSet, fs::read_to_string, path::Path},
    tracing::info,
    crate::error::ResourceError,
};

/// Emotional words, read once from a comma separated file.
#[derive(Clone, Debug, Default)]
pub struct EmotionLexicon {
    words: HashSet<String>,
}

impl EmotionLexicon {
    pub fn load(path: &Path) -> Result<Self, ResourceError> {
        let contents = read_resource("emotional word list", path)?;
        let lexicon = Self::parse(&contents);
        if lexicon.words.is_empty() {
            return Err(ResourceError::Empty {
                name: "emotional word list",
                path: path.to_owned(),
            });
        }

        info!("loaded {} emotional words from {}", lexicon.len(), path.display());
        Ok(lexicon)
    }

    pub fn parse(contents: &str) -> Self {
        let words = contents
            .split(',')
            .map(|word| word.trim().to_lowercase())
            .filter(|word| !word.is_empty())
            .collect();

        Self { words }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Answers whether a word has at least one dictionary sense.
pub trait SenseLookup: Send + Sync {
    fn has_sense(&self, word: &str) -> bool;
}

/// Word-sense dictionary backed by a plain word list, one entry per line.
#[derive(Clone, Debug, Default)]
pub struct SenseDictionary {
    words: HashSet<String>,
}

impl SenseDictionary {
    pub fn load(path: &Path) -> Result<Self, ResourceError> {
        let contents = read_resource("dictionary", path)?;
        let dictionary = Self::parse(&contents);
        if dictionary.words.is_empty() {
            return Err(ResourceError::Empty {
                name: "dictionary",
                path: path.to_owned(),
            });
        }

        info!("loaded {} dictionary entries from {}", dictionary.words.len(), path.display());
        Ok(dictionary)
    }

    pub fn parse(contents: &str) -> Self {
        let words = contents
            .lines()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| line.to_lowercase())
            .collect();

        Self { words }
    }
}

impl SenseLookup for SenseDictionary {
    fn has_sense(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }
}

fn read_resource(name: &'static str, path: &Path) -> Result<String, ResourceError> {
    read_to_string(path).map_err(|source| ResourceError::Read {
        name,
        path: path.to_owned(),
        source,
    })
}

const ENGLISH_STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
    "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
    "wouldn't",
];

#[derive(Clone, Debug)]
pub struct StopWords {
    words: HashSet<&'static str>,
}

impl StopWords {
    pub fn english() -> Self {
        Self {
            words: ENGLISH_STOP_WORDS.iter().copied().collect(),
        }
    }

    /// Membership of the lower-cased word.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word.to_lowercase().as_str())
    }
}

impl Default for StopWords {
    fn default() -> Self {
        Self::english()
    }
}

#[cfg(test)]
mod tests {
    use {
        std::io::Write,
        tempfile::NamedTempFile,
        super::*,
    };

    #[test]
    fn emotional_words_are_lower_cased_and_trimmed() {
        let lexicon = EmotionLexicon::parse("Happy, sad,ANGRY\n,,");
        assert_eq!(lexicon.len(), 3);
        assert!(lexicon.contains("happy"));
        assert!(lexicon.contains("Sad"));
        assert!(lexicon.contains("angry"));
        assert!(!lexicon.contains("calm"));
    }

    #[test]
    fn emotional_words_load_from_file_once() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "love,hate").unwrap();

        let lexicon = EmotionLexicon::load(file.path()).unwrap();
        assert!(lexicon.contains("LOVE"));
    }

    #[test]
    fn missing_resource_is_a_named_error() {
        let err = EmotionLexicon::load(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, ResourceError::Read { name: "emotional word list", .. }));

        let err = SenseDictionary::load(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, ResourceError::Read { name: "dictionary", .. }));
    }

    #[test]
    fn empty_resource_is_rejected() {
        let file = NamedTempFile::new().unwrap();
        let err = SenseDictionary::load(file.path()).unwrap_err();
        assert!(matches!(err, ResourceError::Empty { .. }));
    }

    #[test]
    fn dictionary_lookup_ignores_case() {
        let dictionary = SenseDictionary::parse("# comment\nhouse\nRun\n");
        assert!(dictionary.has_sense("House"));
        assert!(dictionary.has_sense("run"));
        assert!(!dictionary.has_sense("heyyyy"));
        assert!(!dictionary.has_sense("comment"));
    }

    #[test]
    fn stop_words_membership() {
        let stop_words = StopWords::english();
        assert!(stop_words.contains("The"));
        assert!(stop_words.contains("don't"));
        assert!(!stop_words.contains("football"));
    }
}
