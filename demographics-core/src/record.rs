use {
    typed_builder::TypedBuilder,
    serde::Serialize,
    serde_json::{Map, Value},
    tracing::warn,
};

#[derive(TypedBuilder, Serialize, Clone, Debug)]
pub struct Tweet {
    #[builder(default, setter(into))]
    id: String,
    #[builder(default)]
    tokens: Vec<String>,
    // hundredths of a second since the epoch, see features::user::TIMESTAMP_DIVISOR
    #[builder(default)]
    timestamp: i64,
    #[builder(default, setter(into))]
    raw_text: String,
    #[builder(default)]
    num_tokens: u32,
    #[builder(default)]
    num_punctuation: u32,
}

/// Opaque per-user blobs that travel with the user but no feature reads.
#[derive(Serialize, Clone, Debug, Default)]
pub struct AuxiliaryData {
    pub ngrams: Value,
    pub replacements: Value,
    pub transforms: Value,
}

/// Demographic attributes, used as ground truth labels.
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct UserAttributes {
    pub month: Option<String>,
    pub regions: Vec<String>,
    pub languages: Vec<String>,
    pub gender: Option<String>,
    pub occupation: Option<String>,
    pub astrology: Option<String>,
    pub education: Option<String>,
    pub year: Option<i32>,
}

#[derive(TypedBuilder, Serialize, Clone, Debug)]
pub struct User {
    #[builder(setter(into))]
    id: String,
    #[builder(default)]
    tweets: Vec<Tweet>,
    #[builder(default)]
    auxiliary: AuxiliaryData,
    #[builder(default)]
    attributes: UserAttributes,
}

impl Tweet {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn num_tokens(&self) -> u32 {
        self.num_tokens
    }

    pub fn num_punctuation(&self) -> u32 {
        self.num_punctuation
    }
}

impl User {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tweets(&self) -> &[Tweet] {
        &self.tweets
    }

    pub fn auxiliary(&self) -> &AuxiliaryData {
        &self.auxiliary
    }

    pub fn attributes(&self) -> &UserAttributes {
        &self.attributes
    }

    /// Patches attributes from a user info mapping. Only the known attribute
    /// names are accepted; anything else is logged and dropped.
    pub fn apply_info(&mut self, info: &Map<String, Value>) {
        self.attributes.apply_info(&self.id, info);
    }
}

impl UserAttributes {
    pub fn from_info(user_id: &str, info: &Map<String, Value>) -> Self {
        let mut attributes = Self::default();
        attributes.apply_info(user_id, info);
        attributes
    }

    fn apply_info(&mut self, user_id: &str, info: &Map<String, Value>) {
        for (key, value) in info {
            let key = key.to_lowercase();
            let applied = match key.as_str() {
                "month" => set_text(&mut self.month, value),
                "gender" => set_text(&mut self.gender, value),
                "occupation" => set_text(&mut self.occupation, value),
                "astrology" => set_text(&mut self.astrology, value),
                "education" => set_text(&mut self.education, value),
                "regions" => set_list(&mut self.regions, value),
                "languages" => set_list(&mut self.languages, value),
                "year" => set_year(&mut self.year, value),
                _ => {
                    warn!("user {}: ignoring unknown attribute {}", user_id, key);
                    continue;
                }
            };

            if !applied {
                warn!("user {}: unexpected value for {}: {}", user_id, key, value);
            }
        }
    }
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn set_text(target: &mut Option<String>, value: &Value) -> bool {
    match value {
        Value::Null => {
            *target = None;
            true
        },
        other => match text_of(other) {
            Some(text) => {
                *target = Some(text);
                true
            },
            None => false,
        },
    }
}

fn set_list(target: &mut Vec<String>, value: &Value) -> bool {
    match value {
        Value::Null => {
            target.clear();
            true
        },
        Value::Array(items) => {
            let items: Option<Vec<String>> = items.iter().map(text_of).collect();
            match items {
                Some(items) => {
                    *target = items;
                    true
                },
                None => false,
            }
        },
        other => match text_of(other) {
            Some(text) => {
                *target = vec![text];
                true
            },
            None => false,
        },
    }
}

fn set_year(target: &mut Option<i32>, value: &Value) -> bool {
    let year = match value {
        Value::Null => None,
        Value::Number(number) => match number.as_i64().and_then(|v| i32::try_from(v).ok()) {
            Some(year) => Some(year),
            None => return false,
        },
        Value::String(text) => match text.trim().parse::<i32>() {
            Ok(year) => Some(year),
            Err(_) => return false,
        },
        _ => return false,
    };

    // 0 is the "unknown" placeholder in exported user info
    *target = year.filter(|year| *year != 0);
    true
}

#[cfg(test)]
mod tests {
    use {
        serde_json::json,
        super::*,
    };

    fn info(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn default_records_are_empty() {
        let tweet = Tweet::builder().build();
        assert_eq!(tweet.raw_text(), "");
        assert!(tweet.tokens().is_empty());

        let user = User::builder().id("u1").build();
        assert!(user.tweets().is_empty());
        assert_eq!(user.attributes(), &UserAttributes::default());
    }

    #[test]
    fn known_attributes_are_applied_case_insensitively() {
        let attributes = UserAttributes::from_info("u1", &info(json!({
            "Gender": "Female",
            "YEAR": 1985,
            "Languages": ["en", "fr"],
            "regions": "Ontario",
            "Education": "graduate",
        })));

        assert_eq!(attributes.gender.as_deref(), Some("Female"));
        assert_eq!(attributes.year, Some(1985));
        assert_eq!(attributes.languages, vec!["en", "fr"]);
        assert_eq!(attributes.regions, vec!["Ontario"]);
        assert_eq!(attributes.education.as_deref(), Some("graduate"));
    }

    #[test]
    fn unknown_attributes_and_bad_values_are_ignored() {
        let attributes = UserAttributes::from_info("u1", &info(json!({
            "favourite_colour": "blue",
            "year": "not a year",
            "languages": [1, {"x": 1}],
        })));

        assert_eq!(attributes, UserAttributes::default());
    }

    #[test]
    fn year_as_string_and_zero_placeholder() {
        let attributes = UserAttributes::from_info("u1", &info(json!({"year": " 1990 "})));
        assert_eq!(attributes.year, Some(1990));

        let attributes = UserAttributes::from_info("u1", &info(json!({"year": 0})));
        assert_eq!(attributes.year, None);
    }

    #[test]
    fn apply_info_patches_existing_user() {
        let mut user = User::builder().id("u1").build();
        user.apply_info(&info(json!({"gender": "Male"})));
        user.apply_info(&info(json!({"occupation": "student"})));

        assert_eq!(user.attributes().gender.as_deref(), Some("Male"));
        assert_eq!(user.attributes().occupation.as_deref(), Some("student"));
    }
}
