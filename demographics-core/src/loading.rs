use {
    std::{fs::{read_dir, read_to_string}, path::Path},
    serde::Deserialize,
    serde_json::{Map, Value},
    tracing::{info, warn},
    crate::{
        error::LoadError,
        features::user::tweet_time,
        record::{AuxiliaryData, Tweet, User},
    },
};

const TWEETS_FILE: &str = "tweets.json";
const USER_FILE: &str = "user.json";
const NGRAMS_FILE: &str = "ngrams.json";
const REPLACEMENTS_FILE: &str = "replacements.json";
const TRANSFORMS_FILE: &str = "transforms.json";

#[derive(Deserialize, Debug)]
struct RawTweet {
    #[serde(default)]
    tokenized: Vec<String>,
    time: f64,
    text: String,
    #[serde(default)]
    tokens: u32,
    #[serde(default)]
    punc: u32,
}

/// Loads every user directory under `root`, in name order. Users with missing
/// or malformed files are logged and skipped.
pub fn load_users(root: &Path) -> Result<Vec<User>, LoadError> {
    let entries = read_dir(root).map_err(|source| LoadError::ListDirectory {
        path: root.to_owned(),
        source,
    })?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| LoadError::ListDirectory {
            path: root.to_owned(),
            source,
        })?;
        if entry.path().is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();

    let mut users = Vec::with_capacity(dirs.len());
    for dir in &dirs {
        match load_user(dir) {
            Ok(user) => users.push(user),
            Err(err) => warn!("skipping user in {}: {}", dir.display(), err),
        }
    }

    info!("loaded {} of {} users from {}", users.len(), dirs.len(), root.display());
    Ok(users)
}

/// Loads one user directory. The directory name is the user id.
pub fn load_user(dir: &Path) -> Result<User, LoadError> {
    let id = dir.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string());

    let tweets = read_required(dir, TWEETS_FILE)?;
    let tweets = parse_tweets(&dir.join(TWEETS_FILE), tweets)?;

    let info = match read_required(dir, USER_FILE)? {
        Value::Object(info) => info,
        Value::Null => Map::new(),
        _ => return Err(malformed_shape(&dir.join(USER_FILE), "expected an object of user attributes")),
    };

    let auxiliary = AuxiliaryData {
        ngrams: read_optional(dir, NGRAMS_FILE)?,
        replacements: read_optional(dir, REPLACEMENTS_FILE)?,
        transforms: read_optional(dir, TRANSFORMS_FILE)?,
    };

    let mut user = User::builder()
        .id(id)
        .tweets(tweets)
        .auxiliary(auxiliary)
        .build();
    user.apply_info(&info);

    Ok(user)
}

fn parse_tweets(path: &Path, value: Value) -> Result<Vec<Tweet>, LoadError> {
    let tweets = match value {
        Value::Object(tweets) => tweets,
        Value::Null => Map::new(),
        _ => return Err(malformed_shape(path, "expected an object keyed by tweet id")),
    };

    tweets.into_iter()
        .map(|(tweet_id, value)| {
            let raw: RawTweet = serde_json::from_value(value).map_err(|source| LoadError::MalformedTweet {
                path: path.to_owned(),
                tweet_id: tweet_id.clone(),
                source,
            })?;

            let timestamp = match timestamp_of(raw.time) {
                Some(timestamp) => timestamp,
                None => return Err(LoadError::InvalidTimestamp {
                    path: path.to_owned(),
                    tweet_id,
                    time: raw.time,
                }),
            };

            Ok(Tweet::builder()
                .id(tweet_id)
                .tokens(raw.tokenized)
                .timestamp(timestamp)
                .raw_text(raw.text)
                .num_tokens(raw.tokens)
                .num_punctuation(raw.punc)
                .build())
        })
        .collect()
}

/// Whole timestamp units, rejecting anything that cannot be placed in time.
fn timestamp_of(time: f64) -> Option<i64> {
    // i64::MAX is not representable as f64, the bound rounds up to 2^63
    if !time.is_finite() || time < i64::MIN as f64 || time >= i64::MAX as f64 {
        return None;
    }

    let timestamp = time.trunc() as i64;
    tweet_time(timestamp).map(|_| timestamp)
}

fn read_required(dir: &Path, file: &'static str) -> Result<Value, LoadError> {
    let path = dir.join(file);
    if !path.is_file() {
        return Err(LoadError::MissingFile {
            dir: dir.to_owned(),
            file,
        });
    }

    read_json(&path)
}

fn read_optional(dir: &Path, file: &str) -> Result<Value, LoadError> {
    let path = dir.join(file);
    if !path.is_file() {
        return Ok(Value::Null);
    }

    read_json(&path)
}

fn read_json(path: &Path) -> Result<Value, LoadError> {
    let contents = read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_owned(),
        source,
    })?;

    serde_json::from_str(&contents).map_err(|source| LoadError::Malformed {
        path: path.to_owned(),
        source,
    })
}

fn malformed_shape(path: &Path, message: &str) -> LoadError {
    LoadError::Malformed {
        path: path.to_owned(),
        source: serde::de::Error::custom(message),
    }
}
