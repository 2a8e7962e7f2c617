pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const DEFAULT_ENRICH_PROFILES: &str = "skip";
pub const DEFAULT_JOB_FILTER: &str = "anything";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_GATEWAY_URL: &str = "http://127.0.0.1:8000";

pub const DEFAULT_COMPANY_URL: &str = "https://nubela.co/proxycurl/api/v2/linkedin/search/company";
pub const DEFAULT_PERSON_URL: &str = "https://nubela.co/proxycurl/api/v2/linkedin/search/person";
pub const DEFAULT_JOB_URL: &str = "https://nubela.co/proxycurl/api/v2/linkedin/company/job";

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "deepseek-r1:14b";

pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CLASSIFIER_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_GATEWAY_TIMEOUT_SECS: u64 = 60;

pub const CONFIG_DIR_NAME: &str = "prospect";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Response headers set by the gateway on routed (`/search?q=`) requests.
pub const HEADER_INTENT: &str = "x-prospect-intent";
pub const HEADER_FALLBACK: &str = "x-prospect-fallback";
