use {
    anyhow::{Context, Result},
    rand::{seq::SliceRandom, SeedableRng},
    rand_xoshiro::Xoshiro256PlusPlus,
    tracing::{info, warn},
    demographics_core::{
        aggregator::{FeatureAggregator, FeatureContext},
        classifier::{evaluate, fit_predict, Label},
        config::Config,
        loading::load_users,
        record::User,
        report::{write_report, TargetSchema},
        vectorizer::FeatureVector,
    },
    crate::progress::Progress,
};

pub fn run_demographics_step(config: &Config) -> Result<()> {
    let root = config.data().root();
    let users = load_users(&root).with_context(|| format!("failed to load users from {}", root.display()))?;

    let context = FeatureContext::from_config(config.features()).context("failed to load feature resources")?;
    let aggregator = FeatureAggregator::new(config.features().enabled(), context).context("invalid feature configuration")?;
    info!("enabled features: {:?}", aggregator.kinds());

    let mut progress = Progress::new("aggregating user features".to_owned(), users.len());
    let mut vectors = Vec::with_capacity(users.len());
    for user in &users {
        vectors.push(aggregator.aggregate_user(user).with_context(|| format!("failed to aggregate features for user {}", user.id()))?);
        progress.update();
    }
    progress.finish();

    for schema in config.report().schemas() {
        run_schema(config, schema, &users, &vectors).with_context(|| format!("{} prediction failed", schema))?;
    }

    Ok(())
}

fn run_schema(config: &Config, schema: TargetSchema, users: &[User], vectors: &[FeatureVector]) -> Result<()> {
    let mut labeled: Vec<(usize, Label)> = users.iter()
        .enumerate()
        .filter_map(|(index, user)| schema.encode(user).map(|label| (index, label)))
        .collect();

    if let Some(seed) = config.classifier().shuffle_seed() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        labeled.shuffle(&mut rng);
    }

    let train_size = config.classifier().train_size().min(labeled.len());
    let (train, test) = labeled.split_at(train_size);
    info!("{}: {} labeled users, {} train, {} test", schema, labeled.len(), train.len(), test.len());
    if labeled.len() < users.len() {
        warn!("{}: {} users have no label and are left out", schema, users.len() - labeled.len());
    }

    let train_features: Vec<FeatureVector> = train.iter().map(|(index, _)| vectors[*index].clone()).collect();
    let train_labels: Vec<Label> = train.iter().map(|(_, label)| *label).collect();
    let test_features: Vec<FeatureVector> = test.iter().map(|(index, _)| vectors[*index].clone()).collect();
    let test_labels: Vec<Label> = test.iter().map(|(_, label)| *label).collect();

    let report_model = config.classifier().report_model();
    let mut report_predictions = None;

    for model in config.classifier().models() {
        let evaluation = evaluate(model, &train_features, &train_labels, &test_features, &test_labels)
            .with_context(|| format!("{} failed", model))?;
        info!("{}: {} accuracy {:.4}", schema, model, evaluation.accuracy);

        if model == report_model {
            report_predictions = Some(evaluation.predictions);
        }
    }

    let predictions = match report_predictions {
        Some(predictions) => predictions,
        None => fit_predict(report_model, &train_features, &train_labels, &test_features)
            .with_context(|| format!("{} failed", report_model))?,
    };

    let ids: Vec<String> = test.iter().map(|(index, _)| users[*index].id().to_owned()).collect();
    write_report(&config.report().output_dir(), schema, &ids, &predictions)?;

    Ok(())
}
