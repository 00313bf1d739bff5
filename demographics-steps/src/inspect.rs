use {
    anyhow::{Context, Result},
    tracing::info,
    demographics_core::{
        aggregator::{FeatureAggregator, FeatureContext},
        config::Config,
        features::FeatureValue,
    },
};

pub fn run_inspect_step(config: &Config, text: &str) -> Result<()> {
    let context = FeatureContext::from_config(config.features()).context("failed to load feature resources")?;
    let aggregator = FeatureAggregator::new(Vec::new(), context)?;

    info!("inspecting: {}", text);
    for (key, value) in aggregator.inspect_text(text) {
        match value {
            FeatureValue::Scalar(value) => println!("{}\t{}", key, value),
            FeatureValue::Mapping(mapping) => {
                for (key, value) in mapping {
                    println!("{}\t{}", key, value);
                }
            },
            FeatureValue::Tags(tags) => {
                let tags: Vec<String> = tags.iter().map(|tagged| format!("{}/{}", tagged.word, tagged.tag)).collect();
                println!("{}\t{}", key, tags.join(" "));
            },
        }
    }

    Ok(())
}
