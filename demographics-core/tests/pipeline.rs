use {
    std::{fs::{create_dir, read_to_string, write}, path::Path},
    serde_json::{json, Value},
    demographics_core::{
        aggregator::{FeatureAggregator, FeatureContext},
        classifier::{get_naive_bayes_accuracy, get_svm_accuracy, Label},
        config::Config,
        error::{FeatureError, ResourceError},
        loading::load_users,
        report::{write_report, TargetSchema},
        vectorizer::FeatureVector,
    },
};

const USERS: usize = 40;
const TRAIN_SIZE: usize = 30;

fn tweet(text: &str, tokens: &[&str]) -> Value {
    json!({
        "tokenized": tokens,
        "time": 3600 * 100,
        "text": text,
        "tokens": tokens.len(),
        "punc": 0,
    })
}

// even users are male and mention others, odd users are female and talk about the gym
fn write_corpus(root: &Path) {
    for index in 0..USERS {
        let dir = root.join(format!("user_{:02}", index));
        create_dir(&dir).unwrap();

        let (gender, year, text, tokens) = if index % 2 == 0 {
            ("Male", 1990, "@ann @bob @cid", ["@ann", "@bob", "@cid"])
        } else {
            ("Female", 1975, "gym gym later", ["gym", "gym", "later"])
        };

        let tweets = json!({
            format!("{}-1", index): tweet(text, &tokens),
            format!("{}-2", index): tweet(text, &tokens),
        });
        write(dir.join("tweets.json"), tweets.to_string()).unwrap();
        write(dir.join("user.json"), json!({"Gender": gender, "Year": year}).to_string()).unwrap();
    }

    // a user with no user info file is skipped by the loader
    let broken = root.join("user_zz");
    create_dir(&broken).unwrap();
    write(broken.join("tweets.json"), "{}").unwrap();
}

#[test]
fn synthetic_corpus_end_to_end() {
    let data = tempfile::tempdir().unwrap();
    write_corpus(data.path());

    let users = load_users(data.path()).unwrap();
    assert_eq!(users.len(), USERS);

    let config = Config::parse("").unwrap();
    let context = FeatureContext::from_config(config.features()).unwrap();
    let aggregator = FeatureAggregator::new(config.features().enabled(), context).unwrap();
    let vectors: Vec<FeatureVector> = aggregator.aggregate(&users).unwrap();

    let labels: Vec<Label> = users.iter().map(|user| TargetSchema::Gender.encode(user).unwrap()).collect();
    let (train_features, test_features) = vectors.split_at(TRAIN_SIZE);
    let (train_labels, test_labels) = labels.split_at(TRAIN_SIZE);

    let svm = get_svm_accuracy(train_features, train_labels, test_features, test_labels).unwrap();
    assert!((0.0..=1.0).contains(&svm));

    let naive_bayes = get_naive_bayes_accuracy(train_features, train_labels, test_features, test_labels).unwrap();
    assert_eq!(naive_bayes, 1.0);

    let output = tempfile::tempdir().unwrap();
    let ids: Vec<String> = users[TRAIN_SIZE..].iter().map(|user| user.id().to_owned()).collect();
    let path = write_report(output.path(), TargetSchema::Gender, &ids, test_labels).unwrap();

    let report = read_to_string(path).unwrap();
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines.len(), USERS - TRAIN_SIZE);
    assert_eq!(lines[0], "user_30\tMale");
    assert_eq!(lines[1], "user_31\tFemale");
}

#[test]
fn age_schema_reports_cohorts() {
    let data = tempfile::tempdir().unwrap();
    write_corpus(data.path());
    let users = load_users(data.path()).unwrap();

    let years: Vec<Label> = users.iter().filter_map(|user| TargetSchema::Age.encode(user)).collect();
    assert_eq!(years.len(), USERS);

    let output = tempfile::tempdir().unwrap();
    let ids: Vec<String> = users.iter().take(2).map(|user| user.id().to_owned()).collect();
    let path = write_report(output.path(), TargetSchema::Age, &ids, &years[..2]).unwrap();
    assert_eq!(read_to_string(path).unwrap(), "user_00\t<=25\nuser_01\t>=36\n");
}

#[test]
fn configured_resources_are_loaded_once_and_required() {
    let resources = tempfile::tempdir().unwrap();
    let words = resources.path().join("emotions.txt");
    write(&words, "happy,sad").unwrap();

    let config = Config::parse(&format!(
        "[features]\nenabled = [\"EmotionalWordCount\"]\nemotional_words = {:?}\n",
        words.display().to_string(),
    )).unwrap();
    let context = FeatureContext::from_config(config.features()).unwrap();
    assert!(FeatureAggregator::new(config.features().enabled(), context).is_ok());

    let config = Config::parse("[features]\nenabled = [\"MisspelledWordCount\"]\n").unwrap();
    let result = FeatureContext::from_config(config.features());
    assert!(matches!(result, Err(FeatureError::Resource(ResourceError::NotConfigured { name: "dictionary" }))));
}
