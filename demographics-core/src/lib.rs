pub mod aggregator;
pub mod classifier;
pub mod config;
pub mod error;
pub mod features;
pub mod lexicon;
pub mod loading;
pub mod record;
pub mod report;
pub mod text;
pub mod vectorizer;
