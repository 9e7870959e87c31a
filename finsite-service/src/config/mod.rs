use secrecy::{ExposeSecret, Secret};
use service_core::config::{self as core_config, get_env, is_production};
use service_core::error::AppError;

const DEFAULT_RESEND_BASE_URL: &str = "https://api.resend.com";
const DEFAULT_FMP_BASE_URL: &str = "https://financialmodelingprep.com/api/v3";
const DEFAULT_POLYGON_BASE_URL: &str = "https://api.polygon.io";
const DEFAULT_CHAT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_SYSTEM_PROMPT: &str = "You are a friendly assistant on a personal finance website. \
Explain financial concepts in plain language, point users to the site's calculators when useful, \
and remind them that you do not give individual investment, tax or legal advice.";

#[derive(Debug, Clone)]
pub struct FinsiteConfig {
    pub common: core_config::Config,
    pub resend: ResendConfig,
    pub fmp: FmpConfig,
    pub polygon: PolygonConfig,
    pub chat: ChatConfig,
    pub security: SecurityConfig,
    /// Per-request timeout applied to every upstream provider call.
    pub upstream_timeout_secs: u64,
    /// OTLP collector; span export is skipped when unset.
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ResendConfig {
    pub api_key: Secret<String>,
    pub base_url: String,
    pub from_email: String,
    pub subject: String,
}

#[derive(Debug, Clone)]
pub struct FmpConfig {
    pub api_key: Secret<String>,
    pub base_url: String,
    /// Number of daily closes returned in the stock envelope's history.
    pub history_days: u32,
}

#[derive(Debug, Clone)]
pub struct PolygonConfig {
    pub api_key: Secret<String>,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub api_key: Secret<String>,
    pub endpoint: String,
    pub model: String,
    pub system_prompt: String,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub allowed_origins: Vec<String>,
    /// Requests per minute per IP on endpoints that reach paid providers.
    pub rate_limit_per_minute: u32,
    /// Reverse proxies in front of the service that append to
    /// `x-forwarded-for`. With 0 the header is ignored.
    pub trusted_proxy_hops: usize,
}

impl ResendConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.expose_secret().is_empty()
    }
}

impl FmpConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.expose_secret().is_empty()
    }
}

impl PolygonConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.expose_secret().is_empty()
    }
}

impl ChatConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.expose_secret().is_empty()
    }
}

impl FinsiteConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = is_production();

        Ok(FinsiteConfig {
            common: common_config,
            resend: ResendConfig {
                api_key: Secret::new(get_env("RESEND_API_KEY", Some(""), is_prod)?),
                base_url: get_env("RESEND_BASE_URL", Some(DEFAULT_RESEND_BASE_URL), false)?,
                from_email: get_env(
                    "EMAIL_FROM",
                    Some("Finsite <newsletter@example.com>"),
                    is_prod,
                )?,
                subject: get_env("EMAIL_SUBJECT", Some("Welcome to the newsletter"), false)?,
            },
            fmp: FmpConfig {
                api_key: Secret::new(get_env("FMP_API_KEY", Some(""), is_prod)?),
                base_url: get_env("FMP_BASE_URL", Some(DEFAULT_FMP_BASE_URL), false)?,
                history_days: get_env("FMP_HISTORY_DAYS", Some("30"), false)?
                    .parse()
                    .unwrap_or(30),
            },
            polygon: PolygonConfig {
                api_key: Secret::new(get_env("POLYGON_API_KEY", Some(""), is_prod)?),
                base_url: get_env("POLYGON_BASE_URL", Some(DEFAULT_POLYGON_BASE_URL), false)?,
            },
            chat: ChatConfig {
                api_key: Secret::new(get_env("CHAT_API_KEY", Some(""), is_prod)?),
                endpoint: get_env("CHAT_ENDPOINT", Some(DEFAULT_CHAT_ENDPOINT), false)?,
                model: get_env("CHAT_MODEL", Some("gpt-4o-mini"), false)?,
                system_prompt: get_env("CHAT_SYSTEM_PROMPT", Some(DEFAULT_SYSTEM_PROMPT), false)?,
            },
            security: SecurityConfig {
                allowed_origins: parse_origins(&get_env(
                    "ALLOWED_ORIGINS",
                    Some("http://localhost:3000"),
                    is_prod,
                )?),
                rate_limit_per_minute: get_env("RATE_LIMIT_PER_MINUTE", Some("20"), false)?
                    .parse()
                    .unwrap_or(20),
                trusted_proxy_hops: get_env("TRUSTED_PROXY_HOPS", Some("0"), false)?
                    .parse()
                    .unwrap_or(0),
            },
            upstream_timeout_secs: get_env("UPSTREAM_TIMEOUT_SECS", Some("10"), false)?
                .parse()
                .unwrap_or(10),
            otlp_endpoint: std::env::var("OTLP_ENDPOINT")
                .ok()
                .filter(|s| !s.trim().is_empty()),
        })
    }
}

/// Split a comma-separated origin list, dropping blanks.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}
