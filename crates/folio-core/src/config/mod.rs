use std::path::PathBuf;

mod env;

pub const ROOT_ENV: &str = "FOLIO_ROOT";
pub const PAGE_SIZE_ENV: &str = "FOLIO_PAGE_SIZE";
pub const OPERATOR_ID_ENV: &str = "FOLIO_OPERATOR_ID";
pub const BOT_TOKEN_ENV: &str = "FOLIO_BOT_TOKEN";
pub const BOT_API_BASE_ENV: &str = "FOLIO_BOT_API_BASE";
pub const MAX_REDIRECT_HOPS_ENV: &str = "FOLIO_MAX_REDIRECT_HOPS";
pub const SEARCH_CHOICES_ENV: &str = "FOLIO_SEARCH_CHOICES";

pub const DEFAULT_ROOT: &str = "./content";
pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_MAX_REDIRECT_HOPS: usize = 8;
pub const DEFAULT_SEARCH_CHOICES: usize = 8;
pub const DEFAULT_BOT_API_BASE: &str = "https://api.telegram.org";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub root: PathBuf,
    pub page_size: usize,
    pub operator_id: Option<i64>,
    pub bot_token: Option<String>,
    pub bot_api_base: String,
    pub max_redirect_hops: usize,
    pub search_choices: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            page_size: DEFAULT_PAGE_SIZE,
            operator_id: None,
            bot_token: None,
            bot_api_base: DEFAULT_BOT_API_BASE.to_string(),
            max_redirect_hops: DEFAULT_MAX_REDIRECT_HOPS,
            search_choices: DEFAULT_SEARCH_CHOICES,
        }
    }
}

impl AppConfig {
    /// Reads every setting from the environment; invalid numbers fall back to
    /// their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            root: env::read_non_empty_env(ROOT_ENV)
                .map_or_else(|| PathBuf::from(DEFAULT_ROOT), PathBuf::from),
            page_size: env::read_env_usize(PAGE_SIZE_ENV, DEFAULT_PAGE_SIZE, 1),
            operator_id: env::read_env_i64(OPERATOR_ID_ENV),
            bot_token: env::read_non_empty_env(BOT_TOKEN_ENV),
            bot_api_base: env::read_non_empty_env(BOT_API_BASE_ENV)
                .unwrap_or_else(|| DEFAULT_BOT_API_BASE.to_string()),
            max_redirect_hops: env::read_env_usize(
                MAX_REDIRECT_HOPS_ENV,
                DEFAULT_MAX_REDIRECT_HOPS,
                1,
            ),
            search_choices: env::read_env_usize(SEARCH_CHOICES_ENV, DEFAULT_SEARCH_CHOICES, 1),
        }
    }

    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }
}
