use {
    std::{io, path::PathBuf},
    thiserror::Error,
    crate::classifier::ModelKind,
};

/// An explicitly named config file that cannot be used.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Failure to load an external resource that every run depends on.
#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("resource {name} is not configured")]
    NotConfigured { name: &'static str },
    #[error("failed to read {name} from {path}: {source}")]
    Read {
        name: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{name} at {path} contains no entries")]
    Empty { name: &'static str, path: PathBuf },
}

/// Missing or malformed data for a single user. The loader skips the user.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to list {path}: {source}")]
    ListDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("missing {file} in {dir}")]
    MissingFile { dir: PathBuf, file: &'static str },
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("tweet {tweet_id} in {path} has out of range time {time}")]
    InvalidTimestamp {
        path: PathBuf,
        tweet_id: String,
        time: f64,
    },
    #[error("malformed tweet {tweet_id} in {path}: {source}")]
    MalformedTweet {
        path: PathBuf,
        tweet_id: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum FeatureError {
    #[error("feature {0} is enabled more than once")]
    DuplicateFeature(String),
    #[error("feature key {key} is produced by both {first} and {second}")]
    DuplicateKey {
        key: String,
        first: &'static str,
        second: &'static str,
    },
    #[error("minute interval must be between 1 and 1440, got {0}")]
    InvalidInterval(u32),
    #[error(transparent)]
    Resource(#[from] ResourceError),
}

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("training set is empty")]
    EmptyTraining,
    #[error("test set is empty")]
    EmptyTest,
    #[error("feature vectors produce no columns")]
    NoFeatureColumns,
    #[error("{set} set has {features} feature vectors but {labels} labels")]
    LengthMismatch {
        set: &'static str,
        features: usize,
        labels: usize,
    },
    #[error("column {column} has negative values, naive bayes needs non-negative features")]
    NegativeFeature { column: String },
    #[error("training labels contain a single class")]
    SingleClass,
    #[error("{model} failed: {message}")]
    Fit { model: ModelKind, message: String },
    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("{ids} identifiers but {predictions} predictions")]
    LengthMismatch { ids: usize, predictions: usize },
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
