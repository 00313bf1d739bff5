//! Learns a fixed column layout from sparse feature vectors and projects
//! vectors onto it.
//!
//! Numeric values become a column named after their key; categorical values
//! are one-hot encoded under `key=value`. Columns are sorted by name, so
//! fitting the same key set always yields the same layout.

use {
    std::collections::{BTreeMap, BTreeSet},
    ndarray::Array2,
    serde::{Serialize, Deserialize},
};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum VectorValue {
    Number(f64),
    Category(String),
}

/// Per-entity mapping from feature key to value, prior to vectorization.
pub type FeatureVector = BTreeMap<String, VectorValue>;

impl From<f64> for VectorValue {
    fn from(value: f64) -> Self {
        VectorValue::Number(value)
    }
}

impl From<String> for VectorValue {
    fn from(value: String) -> Self {
        VectorValue::Category(value)
    }
}

impl From<&str> for VectorValue {
    fn from(value: &str) -> Self {
        VectorValue::Category(value.to_owned())
    }
}

fn column_name(key: &str, value: &VectorValue) -> String {
    match value {
        VectorValue::Number(_) => key.to_owned(),
        VectorValue::Category(category) => format!("{}={}", key, category),
    }
}

fn cell_value(value: &VectorValue) -> f64 {
    match value {
        VectorValue::Number(number) => *number,
        VectorValue::Category(_) => 1.0,
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct DictVectorizer {
    vocabulary: BTreeMap<String, usize>,
    feature_names: Vec<String>,
}

impl DictVectorizer {
    pub fn fit<'a, I>(corpus: I) -> Self where I: IntoIterator<Item = &'a FeatureVector> {
        let names: BTreeSet<String> = corpus.into_iter()
            .flat_map(|vector| vector.iter().map(|(key, value)| column_name(key, value)))
            .collect();

        let feature_names: Vec<String> = names.into_iter().collect();
        let vocabulary = feature_names.iter()
            .enumerate()
            .map(|(column, name)| (name.clone(), column))
            .collect();

        Self {
            vocabulary,
            feature_names,
        }
    }

    pub fn transform(&self, vectors: &[FeatureVector]) -> Array2<f64> {
        let mut matrix = Array2::zeros((vectors.len(), self.feature_names.len()));

        for (row, vector) in vectors.iter().enumerate() {
            for (key, value) in vector {
                // keys unseen during fit are dropped
                if let Some(&column) = self.vocabulary.get(&column_name(key, value)) {
                    matrix[[row, column]] = cell_value(value);
                }
            }
        }

        matrix
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.vocabulary.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.feature_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feature_names.is_empty()
    }
}
