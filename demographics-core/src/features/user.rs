use {
    std::collections::BTreeMap,
    chrono::{DateTime, Timelike, Utc},
    once_cell::sync::Lazy,
    regex::Regex,
    tracing::warn,
    crate::record::User,
    super::{Feature, FeatureValue},
};

pub const AVERAGE_TWEET_LENGTH_KEY: &str = "AverageTweetLength";
pub const MENTION_COUNT_KEY: &str = "NumberOfTimesOthersMentioned";
pub const FREQUENCY_OF_TWEETING_KEY: &str = "FrequencyOfTweetingFeature";
pub const MULTI_TWEETS_KEY: &str = "NumberOfMultiTweetsFeature";
pub const RETWEET_COUNT_KEY: &str = "RetweetCount";
pub const LANGUAGE_COUNT_KEY: &str = "CountLanguageUsed";
pub const REGION_COUNT_KEY: &str = "CountRegions";

/// Tweet timestamps are divided by this before being read as seconds since the
/// epoch. This matches the exported dataset, not any standard epoch unit, and
/// still needs confirming against the data source.
pub const TIMESTAMP_DIVISOR: i64 = 100;

pub const DEFAULT_MINUTE_INTERVAL: u32 = 30;

/// Wall-clock time of a tweet timestamp, `None` when it is out of range.
pub fn tweet_time(timestamp: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp.div_euclid(TIMESTAMP_DIVISOR), 0)
}

const MINUTES_PER_DAY: u32 = 24 * 60;

// `A-z` also spans the few ASCII symbols between the two letter ranges
static MENTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"@[A-z]+").unwrap());
static RETWEET: Lazy<Regex> = Lazy::new(|| Regex::new(r"(RT|retweet|from|via)(?:\b\W*@(\w+))+").unwrap());
static MULTI_TWEET_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\(([0-9]+) of ([0-9]+)\)").unwrap());

/// Mean number of tokens per tweet, 0 for a user without tweets.
pub struct AverageTweetLength<'a> {
    user: &'a User,
}

impl<'a> AverageTweetLength<'a> {
    pub fn new(user: &'a User) -> Self {
        Self { user }
    }
}

impl Feature for AverageTweetLength<'_> {
    fn key(&self) -> &'static str {
        AVERAGE_TWEET_LENGTH_KEY
    }

    fn value(&self) -> FeatureValue {
        let tweets = self.user.tweets();
        if tweets.is_empty() {
            return FeatureValue::Scalar(0.0);
        }

        let total: usize = tweets.iter().map(|tweet| tweet.tokens().len()).sum();
        FeatureValue::Scalar(total as f64 / tweets.len() as f64)
    }
}

pub struct MentionCount<'a> {
    user: &'a User,
}

impl<'a> MentionCount<'a> {
    pub fn new(user: &'a User) -> Self {
        Self { user }
    }
}

impl Feature for MentionCount<'_> {
    fn key(&self) -> &'static str {
        MENTION_COUNT_KEY
    }

    fn value(&self) -> FeatureValue {
        let total: usize = self.user.tweets().iter()
            .map(|tweet| MENTION.find_iter(tweet.raw_text()).count())
            .sum();
        FeatureValue::Scalar(total as f64)
    }
}

/// Histogram of tweets over the time of day, one bucket per `minute_interval`.
pub struct FrequencyOfTweeting<'a> {
    user: &'a User,
    minute_interval: u32,
}

impl<'a> FrequencyOfTweeting<'a> {
    /// `minute_interval` must be in `1..=1440`; the aggregator validates it.
    pub fn new(user: &'a User, minute_interval: u32) -> Self {
        Self {
            user,
            minute_interval: minute_interval.clamp(1, MINUTES_PER_DAY),
        }
    }

    pub fn bucket_count(minute_interval: u32) -> usize {
        let minute_interval = minute_interval.clamp(1, MINUTES_PER_DAY);
        ((MINUTES_PER_DAY + minute_interval - 1) / minute_interval) as usize
    }

    pub fn bucket_key(index: usize) -> String {
        format!("{}_{}", FREQUENCY_OF_TWEETING_KEY, index)
    }

    /// Buckets are shifted back by one so the first interval of the day lands
    /// in the last bucket. Existing trained models depend on this layout.
    fn bucket_of(&self, timestamp: i64, buckets: usize) -> Option<usize> {
        let time = tweet_time(timestamp)?;
        let minute_of_day = time.hour() * 60 + time.minute();
        let index = (minute_of_day / self.minute_interval) as i64 - 1;
        Some(index.rem_euclid(buckets as i64) as usize)
    }

    pub fn histogram(&self) -> Vec<u32> {
        let buckets = Self::bucket_count(self.minute_interval);
        let mut histogram = vec![0; buckets];

        for tweet in self.user.tweets() {
            match self.bucket_of(tweet.timestamp(), buckets) {
                Some(index) => histogram[index] += 1,
                None => warn!("user {}: tweet {} has out of range timestamp {}", self.user.id(), tweet.id(), tweet.timestamp()),
            }
        }

        histogram
    }
}

impl Feature for FrequencyOfTweeting<'_> {
    fn key(&self) -> &'static str {
        FREQUENCY_OF_TWEETING_KEY
    }

    fn value(&self) -> FeatureValue {
        let mapping: BTreeMap<String, f64> = self.histogram()
            .into_iter()
            .enumerate()
            .map(|(index, count)| (Self::bucket_key(index), count as f64))
            .collect();
        FeatureValue::Mapping(mapping)
    }
}

/// Complete "(X of Y)" chains.
///
/// Each prefixed tweet is placed into the first open chain of the same size
/// that is still missing part X, otherwise it opens a new chain. A chain is
/// complete once parts 1..=Y are all present. The placement is greedy and
/// order sensitive. A chain declaring more parts than the user has tweets can
/// never complete and is not tracked.
pub struct NumberOfCompleteMultiTweets<'a> {
    user: &'a User,
}

impl<'a> NumberOfCompleteMultiTweets<'a> {
    pub fn new(user: &'a User) -> Self {
        Self { user }
    }

    fn parse_prefix(text: &str) -> Option<(usize, usize)> {
        let captures = MULTI_TWEET_PREFIX.captures(text)?;
        let part = captures.get(1)?.as_str().parse::<usize>().ok()?;
        let size = captures.get(2)?.as_str().parse::<usize>().ok()?;

        if part == 0 || part > size {
            return None;
        }

        Some((part, size))
    }
}

impl Feature for NumberOfCompleteMultiTweets<'_> {
    fn key(&self) -> &'static str {
        MULTI_TWEETS_KEY
    }

    fn value(&self) -> FeatureValue {
        let tweets = self.user.tweets();
        let mut chains: Vec<Vec<bool>> = Vec::new();

        for tweet in tweets {
            let (part, size) = match Self::parse_prefix(tweet.raw_text()) {
                Some((_, size)) if size > tweets.len() => continue,
                Some(prefix) => prefix,
                None => continue,
            };
            let slot = part - 1;

            match chains.iter_mut().find(|chain| chain.len() == size && !chain[slot]) {
                Some(chain) => chain[slot] = true,
                None => {
                    let mut chain = vec![false; size];
                    chain[slot] = true;
                    chains.push(chain);
                },
            }
        }

        let complete = chains.iter().filter(|chain| chain.iter().all(|part| *part)).count();
        FeatureValue::Scalar(complete as f64)
    }
}

/// Retweet attributions: "RT", "retweet", "from" or "via" followed by handles.
pub struct RetweetCount<'a> {
    user: &'a User,
}

impl<'a> RetweetCount<'a> {
    pub fn new(user: &'a User) -> Self {
        Self { user }
    }
}

impl Feature for RetweetCount<'_> {
    fn key(&self) -> &'static str {
        RETWEET_COUNT_KEY
    }

    fn value(&self) -> FeatureValue {
        let total: usize = self.user.tweets().iter()
            .map(|tweet| RETWEET.find_iter(tweet.raw_text()).count())
            .sum();
        FeatureValue::Scalar(total as f64)
    }
}

pub struct LanguageCount<'a> {
    user: &'a User,
}

impl<'a> LanguageCount<'a> {
    pub fn new(user: &'a User) -> Self {
        Self { user }
    }
}

impl Feature for LanguageCount<'_> {
    fn key(&self) -> &'static str {
        LANGUAGE_COUNT_KEY
    }

    fn value(&self) -> FeatureValue {
        FeatureValue::Scalar(self.user.attributes().languages.len() as f64)
    }
}

pub struct RegionCount<'a> {
    user: &'a User,
}

impl<'a> RegionCount<'a> {
    pub fn new(user: &'a User) -> Self {
        Self { user }
    }
}

impl Feature for RegionCount<'_> {
    fn key(&self) -> &'static str {
        REGION_COUNT_KEY
    }

    fn value(&self) -> FeatureValue {
        FeatureValue::Scalar(self.user.attributes().regions.len() as f64)
    }
}
