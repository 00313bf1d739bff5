//! Thin wrappers that vectorize feature dictionaries, fit one of the classical
//! models and score exact-match accuracy on a held out set.

use {
    std::{collections::BTreeSet, fmt},
    linfa::{
        prelude::*,
        composing::MultiClassModel,
        dataset::Pr,
        metrics::ToConfusionMatrix,
    },
    linfa_bayes::MultinomialNb,
    linfa_linear::LinearRegression,
    linfa_svm::Svm,
    ndarray::{Array1, Array2, Axis},
    serde::{Serialize, Deserialize},
    tracing::debug,
    crate::{
        error::ClassifierError,
        vectorizer::{DictVectorizer, FeatureVector},
    },
};

/// Encoded class label. Regression predictions are rounded onto this scale,
/// negative predictions land on 0.
pub type Label = usize;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Svm,
    NaiveBayes,
    LinearRegression,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [ModelKind::Svm, ModelKind::NaiveBayes, ModelKind::LinearRegression];

    pub fn name(&self) -> &'static str {
        match self {
            ModelKind::Svm => "svm",
            ModelKind::NaiveBayes => "naive_bayes",
            ModelKind::LinearRegression => "linear_regression",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub accuracy: f64,
    pub predictions: Vec<Label>,
}

/// Train and test matrices sharing one column layout.
struct Design {
    columns: Vec<String>,
    train: Array2<f64>,
    test: Array2<f64>,
}

fn build_design(
    train_features: &[FeatureVector],
    train_labels: &[Label],
    test_features: &[FeatureVector],
) -> Result<Design, ClassifierError> {
    if train_features.is_empty() {
        return Err(ClassifierError::EmptyTraining);
    }
    if test_features.is_empty() {
        return Err(ClassifierError::EmptyTest);
    }
    if train_features.len() != train_labels.len() {
        return Err(ClassifierError::LengthMismatch {
            set: "training",
            features: train_features.len(),
            labels: train_labels.len(),
        });
    }

    // the key space is learned over both sets so test columns line up with training columns
    let vectorizer = DictVectorizer::fit(train_features.iter().chain(test_features.iter()));
    if vectorizer.is_empty() {
        return Err(ClassifierError::NoFeatureColumns);
    }

    Ok(Design {
        train: vectorizer.transform(train_features),
        test: vectorizer.transform(test_features),
        columns: vectorizer.feature_names().to_vec(),
    })
}

/// Fits `kind` on the training set and predicts the test set.
pub fn fit_predict(
    kind: ModelKind,
    train_features: &[FeatureVector],
    train_labels: &[Label],
    test_features: &[FeatureVector],
) -> Result<Vec<Label>, ClassifierError> {
    let design = build_design(train_features, train_labels, test_features)?;
    let labels = Array1::from_vec(train_labels.to_vec());

    let predictions = match kind {
        ModelKind::Svm => predict_svm(design, labels)?,
        ModelKind::NaiveBayes => predict_naive_bayes(design, labels)?,
        ModelKind::LinearRegression => predict_linear_regression(design, labels)?,
    };

    Ok(predictions.to_vec())
}

/// Fits, predicts and scores the fraction of exact label matches on the test set.
pub fn evaluate(
    kind: ModelKind,
    train_features: &[FeatureVector],
    train_labels: &[Label],
    test_features: &[FeatureVector],
    test_labels: &[Label],
) -> Result<Evaluation, ClassifierError> {
    if !test_features.is_empty() && test_features.len() != test_labels.len() {
        return Err(ClassifierError::LengthMismatch {
            set: "test",
            features: test_features.len(),
            labels: test_labels.len(),
        });
    }

    let predictions = fit_predict(kind, train_features, train_labels, test_features)?;

    let matches = predictions.iter().zip(test_labels).filter(|(predicted, truth)| predicted == truth).count();
    let accuracy = matches as f64 / test_labels.len() as f64;

    log_confusion_matrix(kind, &predictions, test_labels);

    Ok(Evaluation {
        accuracy,
        predictions,
    })
}

pub fn accuracy(
    kind: ModelKind,
    train_features: &[FeatureVector],
    train_labels: &[Label],
    test_features: &[FeatureVector],
    test_labels: &[Label],
) -> Result<f64, ClassifierError> {
    evaluate(kind, train_features, train_labels, test_features, test_labels).map(|evaluation| evaluation.accuracy)
}

pub fn get_svm_accuracy(
    train_features: &[FeatureVector],
    train_labels: &[Label],
    test_features: &[FeatureVector],
    test_labels: &[Label],
) -> Result<f64, ClassifierError> {
    accuracy(ModelKind::Svm, train_features, train_labels, test_features, test_labels)
}

/// Features must be non-negative.
pub fn get_naive_bayes_accuracy(
    train_features: &[FeatureVector],
    train_labels: &[Label],
    test_features: &[FeatureVector],
    test_labels: &[Label],
) -> Result<f64, ClassifierError> {
    accuracy(ModelKind::NaiveBayes, train_features, train_labels, test_features, test_labels)
}

/// Linear regression with predictions rounded to the nearest label.
pub fn get_linear_regression_accuracy(
    train_features: &[FeatureVector],
    train_labels: &[Label],
    test_features: &[FeatureVector],
    test_labels: &[Label],
) -> Result<f64, ClassifierError> {
    accuracy(ModelKind::LinearRegression, train_features, train_labels, test_features, test_labels)
}

fn fit_error<E: fmt::Display>(model: ModelKind) -> impl FnOnce(E) -> ClassifierError {
    move |err| ClassifierError::Fit {
        model,
        message: err.to_string(),
    }
}

fn predict_svm(design: Design, labels: Array1<Label>) -> Result<Array1<Label>, ClassifierError> {
    let classes: BTreeSet<Label> = labels.iter().copied().collect();
    let (negative, positive) = match (classes.iter().next(), classes.iter().next_back()) {
        (Some(&first), Some(&last)) if first != last => (first, last),
        _ => return Err(ClassifierError::SingleClass),
    };

    if classes.len() == 2 {
        let targets = labels.mapv(|label| label == positive);
        let dataset = Dataset::new(design.train, targets);
        let model = Svm::<f64, bool>::params()
            .linear_kernel()
            .fit(&dataset)
            .map_err(fit_error(ModelKind::Svm))?;

        let predictions: Array1<bool> = model.predict(&design.test);
        return Ok(predictions.mapv(|is_positive| if is_positive { positive } else { negative }));
    }

    // one-vs-all with platt scaled outputs, the most probable class wins
    let dataset = Dataset::new(design.train, labels);
    let params = Svm::<f64, Pr>::params().linear_kernel();
    let models = dataset.one_vs_all()
        .map_err(fit_error(ModelKind::Svm))?
        .into_iter()
        .map(|(label, binary)| params.fit(&binary).map(|model| (label, model)))
        .collect::<Result<Vec<_>, _>>()
        .map_err(fit_error(ModelKind::Svm))?;

    let model: MultiClassModel<Array2<f64>, Label> = models.into_iter().collect();
    Ok(model.predict(&design.test))
}

fn predict_naive_bayes(design: Design, labels: Array1<Label>) -> Result<Array1<Label>, ClassifierError> {
    for matrix in [&design.train, &design.test] {
        for (column, values) in matrix.axis_iter(Axis(1)).enumerate() {
            if values.iter().any(|value| *value < 0.0) {
                return Err(ClassifierError::NegativeFeature {
                    column: design.columns[column].clone(),
                });
            }
        }
    }

    let dataset = Dataset::new(design.train, labels);
    let model = MultinomialNb::params()
        .fit(&dataset)
        .map_err(fit_error(ModelKind::NaiveBayes))?;

    Ok(model.predict(&design.test))
}

fn predict_linear_regression(design: Design, labels: Array1<Label>) -> Result<Array1<Label>, ClassifierError> {
    // all-zero training columns only make the normal equations singular
    let informative: Vec<usize> = design.train
        .axis_iter(Axis(1))
        .enumerate()
        .filter(|(_, values)| values.iter().any(|value| *value != 0.0))
        .map(|(column, _)| column)
        .collect();
    if informative.is_empty() {
        return Err(ClassifierError::NoFeatureColumns);
    }

    let train = design.train.select(Axis(1), &informative);
    let test = design.test.select(Axis(1), &informative);

    let dataset = Dataset::new(train, labels.mapv(|label| label as f64));
    let model = LinearRegression::new()
        .fit(&dataset)
        .map_err(fit_error(ModelKind::LinearRegression))?;

    let predictions: Array1<f64> = model.predict(&test);
    Ok(predictions.mapv(|value| value.round_ties_even().max(0.0) as Label))
}

fn log_confusion_matrix(kind: ModelKind, predictions: &[Label], truth: &[Label]) {
    let predictions = Array1::from_vec(predictions.to_vec());
    let truth = Array1::from_vec(truth.to_vec());

    match predictions.confusion_matrix(truth.view()) {
        Ok(matrix) => debug!("{} confusion matrix: {:?}", kind, matrix),
        Err(err) => debug!("{}: no confusion matrix: {}", kind, err),
    }
}
