use crate::{Classification, Classifier};
use async_trait::async_trait;
use prospect_core::error::RouterError;
use prospect_core::types::{CompanySearch, JobSearch, PersonSearch, SearchRequest};
use regex::Regex;
use std::sync::LazyLock;

/// Keyword-based classifier. Deterministic and offline; never falls back.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleClassifier;

#[async_trait]
impl Classifier for RuleClassifier {
    async fn classify(&self, text: &str) -> Result<Classification, RouterError> {
        Ok(Classification::new(classify_text(text)))
    }
}

static IN_PLACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\bin\s+([A-Z][\w\-\.]*(?:\s+[A-Z][\w\-\.]*)*(?:\s*,\s*[A-Z][\w\-\.]*(?:\s+[A-Z][\w\-\.]*)*)*)",
    )
    .expect("static regex")
});

static AT_COMPANY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bat\s+([A-Z][\w&\.\-]*(?:\s+[A-Z][\w&\.\-]*)*)").expect("static regex")
});

static NAMED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:named|called)\s+([A-Z][\w\-']*)(?:\s+([A-Z][\w\-']*))?")
        .expect("static regex")
});

static WITH_SKILLS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bwith\s+([\w\+#\.]+(?:\s*(?:,|and)\s*[\w\+#\.]+)*)\s+skills?\b")
        .expect("static regex")
});

static SKILLED_IN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bskilled\s+in\s+([\w\+#\.]+(?:\s*(?:,|and)\s*[\w\+#\.]+)*)")
        .expect("static regex")
});

static LEADING_COMMAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:please\s+)?(?:find(?:\s+me)?|search(?:\s+for)?|look(?:ing)?\s+for|show(?:\s+me)?|list|get|give\s+me)\s+(?:all\s+|some\s+|the\s+)?",
    )
    .expect("static regex")
});

static TITLE_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s+(?:at|in|with|named|called|skilled|who|from|based)\b")
        .expect("static regex")
});

const JOB_WORDS: &[&str] = &[
    "job", "jobs", "position", "positions", "role", "roles", "opening", "openings", "vacancy",
    "vacancies", "hiring", "career", "careers",
];

const COMPANY_WORDS: &[&str] = &[
    "company",
    "companies",
    "startup",
    "startups",
    "firm",
    "firms",
    "business",
    "businesses",
    "organization",
    "organizations",
    "organisations",
    "employer",
    "employers",
    "agency",
    "agencies",
];

const COMMAND_WORDS: &[&str] = &[
    "find", "search", "look", "looking", "show", "me", "list", "get", "give", "for", "all",
    "some", "any", "please", "a", "an", "the", "of", "that", "are", "with", "at", "to", "in",
    "level", "candidates", "opportunities", "new",
];

const JOB_FILTER_WORDS: &[&str] = &[
    "remote",
    "hybrid",
    "on-site",
    "onsite",
    "full-time",
    "fulltime",
    "full",
    "part-time",
    "parttime",
    "part",
    "time",
    "contract",
    "contractor",
    "internship",
    "internships",
    "temporary",
    "temp",
    "volunteer",
    "entry-level",
    "entry",
    "junior",
    "graduate",
    "senior",
    "mid-senior",
    "mid-senior-level",
    "mid-level",
    "associate",
    "director-level",
];

const COUNTRIES: &[(&str, &str)] = &[
    ("australia", "AU"),
    ("austria", "AT"),
    ("belgium", "BE"),
    ("brazil", "BR"),
    ("britain", "GB"),
    ("canada", "CA"),
    ("china", "CN"),
    ("denmark", "DK"),
    ("england", "GB"),
    ("finland", "FI"),
    ("france", "FR"),
    ("germany", "DE"),
    ("india", "IN"),
    ("ireland", "IE"),
    ("israel", "IL"),
    ("italy", "IT"),
    ("japan", "JP"),
    ("korea", "KR"),
    ("mexico", "MX"),
    ("netherlands", "NL"),
    ("new zealand", "NZ"),
    ("norway", "NO"),
    ("poland", "PL"),
    ("portugal", "PT"),
    ("singapore", "SG"),
    ("south korea", "KR"),
    ("spain", "ES"),
    ("sweden", "SE"),
    ("switzerland", "CH"),
    ("uk", "GB"),
    ("united kingdom", "GB"),
    ("united states", "US"),
    ("us", "US"),
    ("usa", "US"),
];

/// Alpha-2 code for a country name, if known.
pub fn country_code(name: &str) -> Option<&'static str> {
    let lower = name.trim().trim_end_matches('.').to_lowercase();
    COUNTRIES
        .iter()
        .find(|(n, _)| *n == lower)
        .map(|(_, code)| *code)
}

/// Classify a query with keyword rules.
pub fn classify_text(text: &str) -> SearchRequest {
    let lower = text.to_lowercase();
    let words = lower_words(&lower);

    if words.iter().any(|w| JOB_WORDS.contains(w)) {
        return SearchRequest::Job(job_search(text, &lower, &words));
    }
    if words.iter().any(|w| COMPANY_WORDS.contains(w)) {
        return SearchRequest::Company(company_search(text, &words));
    }
    SearchRequest::Person(person_search(text))
}

fn lower_words(lower: &str) -> Vec<&str> {
    lower
        .split(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_'))
        .filter(|w| !w.is_empty())
        .collect()
}

/// Place names following `in`, split on commas and trimmed.
fn places(text: &str) -> Vec<String> {
    IN_PLACE
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .flat_map(|m| m.as_str().split(','))
        .map(|p| p.trim().trim_end_matches('.').to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

fn job_search(text: &str, lower: &str, words: &[&str]) -> JobSearch {
    let has = |w: &str| words.contains(&w);

    let flexibility = if has("remote") {
        Some("remote")
    } else if has("hybrid") {
        Some("hybrid")
    } else if has("on-site") || has("onsite") {
        Some("on-site")
    } else {
        None
    };

    let job_type = if has("full-time") || has("fulltime") || lower.contains("full time") {
        Some("full-time")
    } else if has("part-time") || has("parttime") || lower.contains("part time") {
        Some("part-time")
    } else if has("contract") || has("contractor") {
        Some("contract")
    } else if has("internship") || has("internships") {
        Some("internship")
    } else if has("temporary") || has("temp") {
        Some("temporary")
    } else if has("volunteer") {
        Some("volunteer")
    } else {
        None
    };

    let experience_level = if has("entry-level") || has("junior") || has("graduate")
        || lower.contains("entry level")
    {
        Some("entry_level")
    } else if has("associate") {
        Some("associate")
    } else if has("senior") || has("mid-senior") || has("mid-senior-level") || has("mid-level") {
        Some("mid-senior-level")
    } else if has("director-level") || lower.contains("director level") {
        Some("director")
    } else {
        None
    };

    let without_places = IN_PLACE.replace_all(text, "");
    let without_command = LEADING_COMMAND.replace(&without_places, "");
    let keyword_tokens: Vec<&str> = without_command
        .split_whitespace()
        .map(|t| t.trim_matches(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#')))
        .filter(|t| !t.is_empty())
        .filter(|t| {
            let l = t.to_lowercase();
            !JOB_WORDS.contains(&l.as_str())
                && !COMMAND_WORDS.contains(&l.as_str())
                && !JOB_FILTER_WORDS.contains(&l.as_str())
        })
        .collect();
    let keyword = (!keyword_tokens.is_empty()).then(|| keyword_tokens.join(" "));

    JobSearch {
        job_type: job_type.map(str::to_string),
        experience_level: experience_level.map(str::to_string),
        flexibility: flexibility.map(str::to_string),
        keyword,
        geo_id: None,
    }
}

fn company_search(text: &str, words: &[&str]) -> CompanySearch {
    let mut search = CompanySearch::default();
    for place in places(text) {
        match country_code(&place) {
            Some(code) if search.country.is_none() => search.country = Some(code.to_string()),
            Some(_) => {}
            None if search.city.is_none() => search.city = Some(place),
            None => {}
        }
    }

    search.industry = words
        .iter()
        .position(|w| COMPANY_WORDS.contains(w))
        .filter(|&i| i > 0)
        .map(|i| words[i - 1])
        .filter(|w| !COMMAND_WORDS.contains(w) && !COMPANY_WORDS.contains(w))
        .map(str::to_string);

    search
}

fn person_search(text: &str) -> PersonSearch {
    let mut search = PersonSearch {
        country: places(text).iter().find_map(|p| country_code(p)).map(str::to_string),
        company: AT_COMPANY
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim_end_matches('.').to_string()),
        ..Default::default()
    };

    if let Some(caps) = NAMED.captures(text) {
        search.first_name = caps.get(1).map(|m| m.as_str().to_string());
        search.last_name = caps.get(2).map(|m| m.as_str().to_string());
    }

    search.skills = WITH_SKILLS
        .captures(text)
        .or_else(|| SKILLED_IN.captures(text))
        .and_then(|c| c.get(1))
        .map(|m| normalize_skills(m.as_str()));

    let rest = LEADING_COMMAND.replace(text, "");
    let title_part = match TITLE_END.find(&rest) {
        Some(m) => &rest[..m.start()],
        None => &rest[..],
    };
    let title = title_part.trim().trim_end_matches(['.', '?', '!']);
    if !title.is_empty() {
        search.title = Some(title.to_string());
    }

    search
}

fn normalize_skills(raw: &str) -> String {
    raw.split(',')
        .flat_map(|part| part.split(" and "))
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}
