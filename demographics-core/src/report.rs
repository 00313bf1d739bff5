use {
    std::{fmt, fs::create_dir_all, path::{Path, PathBuf}},
    serde::{Serialize, Deserialize},
    tracing::{info, warn},
    crate::{
        classifier::Label,
        error::ReportError,
        record::User,
    },
};

/// Birth years from this one on are labelled `<=25`.
pub const YOUNGEST_COHORT_FROM: Label = 1988;
/// Birth years from this one up to [`YOUNGEST_COHORT_FROM`] are labelled `26-35`.
pub const MIDDLE_COHORT_FROM: Label = 1978;

const GENDER_LABELS: &[&str] = &["Male", "Female"];
const EDUCATION_LABELS: &[&str] = &["high_school", "some_college", "graduate"];

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TargetSchema {
    Gender,
    Education,
    Age,
}

impl TargetSchema {
    pub const ALL: [TargetSchema; 3] = [TargetSchema::Gender, TargetSchema::Education, TargetSchema::Age];

    pub fn name(&self) -> &'static str {
        match self {
            TargetSchema::Gender => "gender",
            TargetSchema::Education => "education",
            TargetSchema::Age => "age",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.txt", self.name())
    }

    /// Numeric class of a user under this schema, `None` when the user has no
    /// usable label. Age uses the birth year itself as the class.
    pub fn encode(&self, user: &User) -> Option<Label> {
        let attributes = user.attributes();
        match self {
            TargetSchema::Gender => index_of(GENDER_LABELS, attributes.gender.as_deref()?),
            TargetSchema::Education => index_of(EDUCATION_LABELS, attributes.education.as_deref()?),
            TargetSchema::Age => attributes.year.and_then(|year| Label::try_from(year).ok()),
        }
    }

    pub fn label_for(&self, prediction: Label) -> Option<&'static str> {
        match self {
            TargetSchema::Gender => label_at(GENDER_LABELS, prediction),
            TargetSchema::Education => label_at(EDUCATION_LABELS, prediction),
            TargetSchema::Age => Some(age_label(prediction)),
        }
    }
}

impl fmt::Display for TargetSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn index_of(labels: &[&str], value: &str) -> Option<Label> {
    labels.iter().position(|label| *label == value)
}

fn label_at(labels: &[&'static str], prediction: Label) -> Option<&'static str> {
    labels.get(prediction).copied()
}

fn age_label(year: Label) -> &'static str {
    if year >= YOUNGEST_COHORT_FROM {
        "<=25"
    } else if year >= MIDDLE_COHORT_FROM {
        "26-35"
    } else {
        ">=36"
    }
}

/// Writes `<id>\t<label>` lines to `<dir>/<schema>.txt`, replacing the file.
pub fn write_report(dir: &Path, schema: TargetSchema, ids: &[String], predictions: &[Label]) -> Result<PathBuf, ReportError> {
    if ids.len() != predictions.len() {
        return Err(ReportError::LengthMismatch {
            ids: ids.len(),
            predictions: predictions.len(),
        });
    }

    create_dir_all(dir).map_err(|source| ReportError::Io {
        path: dir.to_owned(),
        source,
    })?;

    let path = dir.join(schema.file_name());
    let csv_error = |source| ReportError::Csv {
        path: path.clone(),
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Never)
        .from_path(&path)
        .map_err(csv_error)?;

    for (id, prediction) in ids.iter().zip(predictions) {
        let label = match schema.label_for(*prediction) {
            Some(label) => label,
            None => {
                warn!("{}: prediction {} for user {} has no label", schema, prediction, id);
                ""
            },
        };
        writer.write_record([id.as_str(), label]).map_err(csv_error)?;
    }

    writer.flush().map_err(|source| ReportError::Io {
        path: path.clone(),
        source,
    })?;

    info!("wrote {} {} predictions to {}", ids.len(), schema, path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use {
        std::fs::read_to_string,
        crate::record::UserAttributes,
        super::*,
    };

    fn user(attributes: UserAttributes) -> User {
        User::builder().id("u1").attributes(attributes).build()
    }

    #[test]
    fn age_cohort_boundaries() {
        let age = TargetSchema::Age;
        assert_eq!(age.label_for(1990), Some("<=25"));
        assert_eq!(age.label_for(1988), Some("<=25"));
        assert_eq!(age.label_for(1987), Some("26-35"));
        assert_eq!(age.label_for(1980), Some("26-35"));
        assert_eq!(age.label_for(1978), Some("26-35"));
        assert_eq!(age.label_for(1977), Some(">=36"));
        assert_eq!(age.label_for(1975), Some(">=36"));
    }

    #[test]
    fn categorical_labels() {
        assert_eq!(TargetSchema::Gender.label_for(0), Some("Male"));
        assert_eq!(TargetSchema::Gender.label_for(1), Some("Female"));
        assert_eq!(TargetSchema::Gender.label_for(2), None);
        assert_eq!(TargetSchema::Education.label_for(2), Some("graduate"));
        assert_eq!(TargetSchema::Education.label_for(3), None);
    }

    #[test]
    fn encodes_user_attributes() {
        let labelled = user(UserAttributes {
            gender: Some("Female".into()),
            education: Some("some_college".into()),
            year: Some(1984),
            ..UserAttributes::default()
        });
        assert_eq!(TargetSchema::Gender.encode(&labelled), Some(1));
        assert_eq!(TargetSchema::Education.encode(&labelled), Some(1));
        assert_eq!(TargetSchema::Age.encode(&labelled), Some(1984));

        let unknown = user(UserAttributes {
            gender: Some("unspecified".into()),
            ..UserAttributes::default()
        });
        assert_eq!(TargetSchema::Gender.encode(&unknown), None);
        assert_eq!(TargetSchema::Education.encode(&unknown), None);
        assert_eq!(TargetSchema::Age.encode(&unknown), None);

        let negative_year = user(UserAttributes {
            year: Some(-5),
            ..UserAttributes::default()
        });
        assert_eq!(TargetSchema::Age.encode(&negative_year), None);
    }

    #[test]
    fn writes_tab_separated_lines() {
        let dir = tempfile::tempdir().unwrap();
        let ids = vec!["alice".to_owned(), "bob".to_owned(), "carol".to_owned()];

        let path = write_report(dir.path(), TargetSchema::Gender, &ids, &[1, 0, 5]).unwrap();

        assert_eq!(path, dir.path().join("gender.txt"));
        assert_eq!(read_to_string(path).unwrap(), "alice\tFemale\nbob\tMale\ncarol\t\n");
    }

    #[test]
    fn writes_age_report() {
        let dir = tempfile::tempdir().unwrap();
        let ids = vec!["u1".to_owned(), "u2".to_owned()];

        let path = write_report(dir.path(), TargetSchema::Age, &ids, &[1992, 1970]).unwrap();
        assert_eq!(read_to_string(path).unwrap(), "u1\t<=25\nu2\t>=36\n");
    }

    #[test]
    fn rejects_mismatched_lengths() {
        let dir = tempfile::tempdir().unwrap();
        let result = write_report(dir.path(), TargetSchema::Education, &["u1".to_owned()], &[]);
        assert!(matches!(result, Err(ReportError::LengthMismatch { ids: 1, predictions: 0 })));
    }

    #[test]
    fn schema_names_deserialize_lowercase() {
        let schemas: Vec<TargetSchema> = serde_json::from_str(r#"["gender", "age"]"#).unwrap();
        assert_eq!(schemas, vec![TargetSchema::Gender, TargetSchema::Age]);
    }
}
