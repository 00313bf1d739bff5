use {
    std::{fs::read_to_string, path::{Path, PathBuf}},
    tracing::warn,
    serde::Deserialize,
    crate::{
        classifier::ModelKind,
        error::ConfigError,
        features::{FeatureKind, user::DEFAULT_MINUTE_INTERVAL},
        report::TargetSchema,
    },
};

#[derive(Deserialize, Debug, Default)]
pub struct Config {
    #[serde(default)]
    data: DataConfig,
    #[serde(default)]
    features: FeaturesConfig,
    #[serde(default)]
    classifier: ClassifierConfig,
    #[serde(default)]
    report: ReportConfig,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct DataConfig {
    root: Option<PathBuf>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct FeaturesConfig {
    enabled: Option<Vec<FeatureKind>>,
    minute_interval: Option<u32>,
    emotional_words: Option<PathBuf>,
    dictionary: Option<PathBuf>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct ClassifierConfig {
    train_size: Option<usize>,
    models: Option<Vec<ModelKind>>,
    report_model: Option<ModelKind>,
    shuffle_seed: Option<u64>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct ReportConfig {
    output_dir: Option<PathBuf>,
    schemas: Option<Vec<TargetSchema>>,
}

impl Config {
    pub fn load() -> Self {
        read_to_string("./config.toml")
            .or_else(|_| read_to_string("/config/config.toml"))
            .map_err(|err| err.to_string())
            .and_then(|v| toml::from_str(&v).map_err(|err| err.to_string()))
            .unwrap_or_else(|err| {
                warn!("failed to read config: {}", err);
                Config::default()
            })
    }

    /// Unlike [`Config::load`], an explicitly named file must exist and parse.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;

        Self::parse(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn data(&self) -> &DataConfig {
        &self.data
    }

    pub fn features(&self) -> &FeaturesConfig {
        &self.features
    }

    pub fn classifier(&self) -> &ClassifierConfig {
        &self.classifier
    }

    pub fn report(&self) -> &ReportConfig {
        &self.report
    }
}

impl DataConfig {
    pub fn root(&self) -> PathBuf {
        self.root.as_ref().cloned().unwrap_or_else(|| PathBuf::from("./data"))
    }
}

impl FeaturesConfig {
    pub fn enabled(&self) -> Vec<FeatureKind> {
        self.enabled.as_ref().cloned().unwrap_or_else(|| vec![
            FeatureKind::AverageTweetLength,
            FeatureKind::MentionCount,
            FeatureKind::CategoricalWordCount,
            FeatureKind::PersonalReferenceCount,
            FeatureKind::FrequencyOfTweeting,
        ])
    }

    pub fn minute_interval(&self) -> u32 {
        self.minute_interval.unwrap_or(DEFAULT_MINUTE_INTERVAL)
    }

    pub fn emotional_words(&self) -> Option<&Path> {
        self.emotional_words.as_deref()
    }

    pub fn dictionary(&self) -> Option<&Path> {
        self.dictionary.as_deref()
    }
}

impl ClassifierConfig {
    pub fn train_size(&self) -> usize {
        self.train_size.unwrap_or(30)
    }

    /// Models evaluated for accuracy. Linear regression is left out by default,
    /// its normal equations are singular while there are more columns than
    /// training users.
    pub fn models(&self) -> Vec<ModelKind> {
        self.models.as_ref().cloned().unwrap_or_else(|| vec![ModelKind::Svm, ModelKind::NaiveBayes])
    }

    pub fn report_model(&self) -> ModelKind {
        self.report_model.unwrap_or(ModelKind::Svm)
    }

    /// Users keep their directory order unless a seed is set.
    pub fn shuffle_seed(&self) -> Option<u64> {
        self.shuffle_seed
    }
}

impl ReportConfig {
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.as_ref().cloned().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn schemas(&self) -> Vec<TargetSchema> {
        self.schemas.as_ref().cloned().unwrap_or_else(|| TargetSchema::ALL.to_vec())
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
    fn empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();

        assert_eq!(config.data().root(), PathBuf::from("./data"));
        assert_eq!(config.features().enabled().len(), 5);
        assert_eq!(config.features().minute_interval(), 30);
        assert_eq!(config.features().emotional_words(), None);
        assert_eq!(config.classifier().train_size(), 30);
        assert_eq!(config.classifier().models(), vec![ModelKind::Svm, ModelKind::NaiveBayes]);
        assert_eq!(config.classifier().report_model(), ModelKind::Svm);
        assert_eq!(config.classifier().shuffle_seed(), None);
        assert_eq!(config.report().output_dir(), PathBuf::from("."));
        assert_eq!(config.report().schemas(), TargetSchema::ALL.to_vec());
    }

    #[test]
    fn parses_all_sections() {
        let config = Config::parse(r#"
            [data]
            root = "/srv/users"

            [features]
            enabled = ["HashtagCount", "EmotionalWordCount"]
            minute_interval = 60
            emotional_words = "words.txt"

            [classifier]
            train_size = 10
            models = ["linear_regression"]
            report_model = "naive_bayes"
            shuffle_seed = 7

            [report]
            output_dir = "out"
            schemas = ["age"]
        "#).unwrap();

        assert_eq!(config.data().root(), PathBuf::from("/srv/users"));
        assert_eq!(config.features().enabled(), vec![FeatureKind::HashtagCount, FeatureKind::EmotionalWordCount]);
        assert_eq!(config.features().minute_interval(), 60);
        assert_eq!(config.features().emotional_words(), Some(Path::new("words.txt")));
        assert_eq!(config.classifier().train_size(), 10);
        assert_eq!(config.classifier().models(), vec![ModelKind::LinearRegression]);
        assert_eq!(config.classifier().report_model(), ModelKind::NaiveBayes);
        assert_eq!(config.classifier().shuffle_seed(), Some(7));
        assert_eq!(config.report().output_dir(), PathBuf::from("out"));
        assert_eq!(config.report().schemas(), vec![TargetSchema::Age]);
    }

    #[test]
    fn unknown_feature_name_is_rejected() {
        assert!(Config::parse("[features]\nenabled = [\"Sarcasm\"]").is_err());
    }

    #[test]
    fn load_from_reads_named_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[classifier]\ntrain_size = 3").unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.classifier().train_size(), 3);

        let err = Config::load_from(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[classifier]\ntrain_size = \"many\"").unwrap();

        let err = Config::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { ref path, .. } if path == file.path()));
    }
}
