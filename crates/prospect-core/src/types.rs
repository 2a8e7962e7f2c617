use crate::constants::{DEFAULT_ENRICH_PROFILES, DEFAULT_JOB_FILTER, DEFAULT_PAGE_SIZE};
use crate::error::RouterError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Search intent. Selects the parameter schema and the provider endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Company,
    Person,
    Job,
}

impl Intent {
    pub const ALL: [Intent; 3] = [Intent::Company, Intent::Person, Intent::Job];

    pub fn as_str(self) -> &'static str {
        match self {
            Intent::Company => "company",
            Intent::Person => "person",
            Intent::Job => "job",
        }
    }

    /// Declared parameter schema for this intent.
    pub fn params(self) -> &'static [ParamSpec] {
        match self {
            Intent::Company => COMPANY_PARAMS,
            Intent::Person => PERSON_PARAMS,
            Intent::Job => JOB_PARAMS,
        }
    }

    pub fn declares(self, name: &str) -> bool {
        self.params().iter().any(|p| p.name == name)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "company" => Ok(Intent::Company),
            "person" => Ok(Intent::Person),
            "job" => Ok(Intent::Job),
            _ => Err(RouterError::UnsupportedIntent(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Integer,
}

impl ParamKind {
    /// JSON schema type name.
    pub fn as_str(self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Integer => "integer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamDefault {
    Text(&'static str),
    Integer(u64),
}

impl ParamDefault {
    pub fn to_json(self) -> Value {
        match self {
            ParamDefault::Text(s) => Value::from(s),
            ParamDefault::Integer(n) => Value::from(n),
        }
    }
}

/// One declared parameter of an intent.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub default: Option<ParamDefault>,
    pub description: &'static str,
}

const fn text(name: &'static str, description: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        kind: ParamKind::String,
        default: None,
        description,
    }
}

const fn text_or(name: &'static str, default: &'static str, description: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        kind: ParamKind::String,
        default: Some(ParamDefault::Text(default)),
        description,
    }
}

const fn integer(name: &'static str, description: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        kind: ParamKind::Integer,
        default: None,
        description,
    }
}

const COMPANY_PARAMS: &[ParamSpec] = &[
    text("country", "Alpha-2 ISO3166 country code"),
    text("city", "Filter companies based in this city"),
    text("industry", "Filter companies by industry"),
    text("company_size", "Employee count range, e.g. 51-200"),
    integer("funding_total", "Minimum total funding raised, in USD"),
    ParamSpec {
        name: "page_size",
        kind: ParamKind::Integer,
        default: Some(ParamDefault::Integer(DEFAULT_PAGE_SIZE)),
        description: "Max results per API call",
    },
    text_or(
        "enrich_profiles",
        DEFAULT_ENRICH_PROFILES,
        "Include full company data (enrich or skip)",
    ),
];

const PERSON_PARAMS: &[ParamSpec] = &[
    text("country", "Alpha-2 ISO3166 country code"),
    text("first_name", "Filter by first name"),
    text("last_name", "Filter by last name"),
    text("title", "Filter by current job title"),
    text("skills", "Comma-separated skills (e.g., python, c++)"),
    text("company", "Company name for filtering"),
    text("school", "School or university attended"),
];

const JOB_PARAMS: &[ParamSpec] = &[
    text_or(
        "job_type",
        DEFAULT_JOB_FILTER,
        "Job type: full-time, part-time, contract, internship, temporary, volunteer, anything",
    ),
    text_or(
        "experience_level",
        DEFAULT_JOB_FILTER,
        "Experience level: internship, entry_level, associate, mid-senior-level, director, anything",
    ),
    text_or(
        "flexibility",
        DEFAULT_JOB_FILTER,
        "Job flexibility: remote, on-site, hybrid, anything",
    ),
    text(
        "keyword",
        "Keyword for job search (e.g., software engineer, teacher)",
    ),
    integer("geo_id", "LinkedIn geographic location id"),
];

/// A single outbound query parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Text(String),
    Integer(u64),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Text(s) => f.write_str(s),
            ParamValue::Integer(n) => write!(f, "{}", n),
        }
    }
}

/// Outbound parameter mapping. Only ever contains set values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QueryParams(BTreeMap<&'static str, ParamValue>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert_text(&mut self, name: &'static str, value: Option<&str>) {
        if let Some(v) = value.and_then(normalize_text) {
            self.0.insert(name, ParamValue::Text(v));
        }
    }

    fn insert_text_or(&mut self, name: &'static str, value: Option<&str>, default: &str) {
        let v = value
            .and_then(normalize_text)
            .unwrap_or_else(|| default.to_string());
        self.0.insert(name, ParamValue::Text(v));
    }

    fn insert_integer(&mut self, name: &'static str, value: Option<u64>) {
        if let Some(v) = value {
            self.0.insert(name, ParamValue::Integer(v));
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }

    /// Parameters rendered as string pairs, ready for a URL query string.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        self.0.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }
}

fn normalize_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CompanySearch {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub country: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub city: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub industry: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub company_size: Option<String>,
    #[serde(deserialize_with = "lenient::opt_u64")]
    pub funding_total: Option<u64>,
    #[serde(deserialize_with = "lenient::opt_u64")]
    pub page_size: Option<u64>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub enrich_profiles: Option<String>,
}

impl CompanySearch {
    pub fn to_query_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.insert_text("country", self.country.as_deref());
        params.insert_text("city", self.city.as_deref());
        params.insert_text("industry", self.industry.as_deref());
        params.insert_text("company_size", self.company_size.as_deref());
        params.insert_integer("funding_total", self.funding_total);
        params.insert_integer("page_size", Some(self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)));
        params.insert_text_or(
            "enrich_profiles",
            self.enrich_profiles.as_deref(),
            DEFAULT_ENRICH_PROFILES,
        );
        params
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PersonSearch {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub country: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub first_name: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub last_name: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub skills: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub company: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub school: Option<String>,
}

impl PersonSearch {
    pub fn to_query_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.insert_text("country", self.country.as_deref());
        params.insert_text("first_name", self.first_name.as_deref());
        params.insert_text("last_name", self.last_name.as_deref());
        params.insert_text("title", self.title.as_deref());
        params.insert_text("skills", self.skills.as_deref());
        params.insert_text("company", self.company.as_deref());
        params.insert_text("school", self.school.as_deref());
        params
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct JobSearch {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub job_type: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub experience_level: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub flexibility: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub keyword: Option<String>,
    #[serde(deserialize_with = "lenient::opt_u64")]
    pub geo_id: Option<u64>,
}

impl JobSearch {
    pub fn to_query_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.insert_text_or("job_type", self.job_type.as_deref(), DEFAULT_JOB_FILTER);
        params.insert_text_or(
            "experience_level",
            self.experience_level.as_deref(),
            DEFAULT_JOB_FILTER,
        );
        params.insert_text_or("flexibility", self.flexibility.as_deref(), DEFAULT_JOB_FILTER);
        params.insert_text("keyword", self.keyword.as_deref());
        params.insert_integer("geo_id", self.geo_id);
        params
    }
}

/// An intent together with its typed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchRequest {
    Company(CompanySearch),
    Person(PersonSearch),
    Job(JobSearch),
}

impl SearchRequest {
    /// Empty request for an intent; only declared defaults will be sent.
    pub fn empty(intent: Intent) -> Self {
        match intent {
            Intent::Company => Self::Company(CompanySearch::default()),
            Intent::Person => Self::Person(PersonSearch::default()),
            Intent::Job => Self::Job(JobSearch::default()),
        }
    }

    pub fn intent(&self) -> Intent {
        match self {
            Self::Company(_) => Intent::Company,
            Self::Person(_) => Intent::Person,
            Self::Job(_) => Intent::Job,
        }
    }

    pub fn to_query_params(&self) -> QueryParams {
        match self {
            Self::Company(s) => s.to_query_params(),
            Self::Person(s) => s.to_query_params(),
            Self::Job(s) => s.to_query_params(),
        }
    }

    /// Build a request from a loosely typed parameter mapping.
    ///
    /// Undeclared keys are discarded. `null` and blank strings count as unset.
    /// Fails when a declared value cannot be coerced to its kind.
    pub fn from_parameters(intent: Intent, parameters: &Value) -> Result<Self, serde_json::Error> {
        let parameters = match parameters {
            Value::Null => Value::Object(serde_json::Map::new()),
            other => other.clone(),
        };
        if let Value::Object(map) = &parameters {
            for key in map.keys().filter(|k| !intent.declares(k)) {
                debug!(%intent, key = %key, "dropping undeclared parameter");
            }
        }

        Ok(match intent {
            Intent::Company => Self::Company(serde_json::from_value(parameters)?),
            Intent::Person => Self::Person(serde_json::from_value(parameters)?),
            Intent::Job => Self::Job(serde_json::from_value(parameters)?),
        })
    }
}

/// Deserializers that accept the loose shapes produced by query strings and
/// generative models.
mod lenient {
    use serde::Deserializer;
    use serde::de::{self, SeqAccess, Unexpected, Visitor};
    use std::fmt;

    pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        d.deserialize_any(OptStringVisitor)
    }

    pub fn opt_u64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        d.deserialize_any(OptU64Visitor)
    }

    struct OptStringVisitor;

    impl<'de> Visitor<'de> for OptStringVisitor {
        type Value = Option<String>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string, number, list of strings or null")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(super::normalize_text(v))
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
            d.deserialize_any(OptStringVisitor)
        }

        // Models sometimes answer `"skills": ["python", "sql"]`.
        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut parts = Vec::new();
            while let Some(item) = seq.next_element::<serde_json::Value>()? {
                match item {
                    serde_json::Value::String(s) => parts.extend(super::normalize_text(&s)),
                    serde_json::Value::Number(n) => parts.push(n.to_string()),
                    _ => {}
                }
            }
            if parts.is_empty() {
                Ok(None)
            } else {
                Ok(Some(parts.join(",")))
            }
        }
    }

    struct OptU64Visitor;

    impl<'de> Visitor<'de> for OptU64Visitor {
        type Value = Option<u64>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative integer or null")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            u64::try_from(v)
                .map(Some)
                .map_err(|_| E::invalid_value(Unexpected::Signed(v), &self))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64 {
                Ok(Some(v as u64))
            } else {
                Err(E::invalid_value(Unexpected::Float(v), &self))
            }
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<u64>()
                .map(Some)
                .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
            d.deserialize_any(OptU64Visitor)
        }
    }
}
