use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub site: SiteConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

/// REST backend the site reads services and posts from.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub auth_token: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self { base_url: String::new(), timeout_secs: default_timeout(), auth_token: None }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
    #[serde(default = "default_blog_ttl")]
    pub blog_ttl_secs: u64,
    #[serde(default = "default_services_ttl")]
    pub services_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_max_capacity(),
            blog_ttl_secs: default_blog_ttl(),
            services_ttl_secs: default_services_ttl(),
        }
    }
}

/// Static content for the layout chrome.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_site_url")]
    pub base_url: String,
    #[serde(default = "default_company")]
    pub company_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub whatsapp_number: String,
    #[serde(default = "default_whatsapp_message")]
    pub whatsapp_message: String,
    #[serde(default = "default_fallback_services")]
    pub fallback_services: Vec<FallbackService>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_site_url(),
            company_name: default_company(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            whatsapp_number: String::new(),
            whatsapp_message: default_whatsapp_message(),
            fallback_services: default_fallback_services(),
        }
    }
}

/// Footer entry used when the services fetch fails or comes back empty.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FallbackService {
    pub title: String,
    pub slug: String,
}

fn default_timeout() -> u64 { 10 }
fn default_max_capacity() -> u64 { 1000 }
fn default_blog_ttl() -> u64 { 300 }
fn default_services_ttl() -> u64 { 30 }
fn default_site_url() -> String { "http://localhost:3000".into() }
fn default_company() -> String { "Studio".into() }
fn default_whatsapp_message() -> String { "Hello! I'd like to know more about your services.".into() }

fn default_fallback_services() -> Vec<FallbackService> {
    [
        ("Web Development", "web-development"),
        ("Mobile Apps", "mobile-apps"),
        ("E-commerce", "e-commerce"),
        ("SEO Optimization", "seo-optimization"),
        ("UI/UX Design", "ui-ux-design"),
        ("Hosting & Maintenance", "hosting-maintenance"),
    ]
    .into_iter()
    .map(|(title, slug)| FallbackService { title: title.into(), slug: slug.into() })
    .collect()
}

fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

/// 文件不存在时返回 `None`；读取失败或 TOML 格式错误都会上抛
pub fn load_optional(path: &str) -> Result<Option<AppConfig>> {
    match std::fs::read_to_string(path) {
        Ok(content) => load_from_str(&content)
            .map(Some)
            .with_context(|| format!("invalid config file {path}")),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(anyhow::Error::new(e).context(format!("failed to read config file {path}"))),
    }
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Config file when present, otherwise defaults plus environment.
    pub fn load_or_env() -> Result<Self> {
        Self::load_from_path_or_env(&config_path())
    }

    pub fn load_from_path_or_env(path: &str) -> Result<Self> {
        let mut cfg = load_optional(path)?.unwrap_or_default();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        // 归一化 server
        self.server.normalize()?;
        // 归一化 backend（支持从环境变量填充 URL 与令牌）
        self.backend.normalize_from_env();
        self.backend.validate()?;
        self.cache.validate()?;
        self.site.normalize();
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl BackendConfig {
    pub fn normalize_from_env(&mut self) {
        // TOML 中未提供时，从环境变量填充
        if self.base_url.trim().is_empty() {
            if let Ok(url) = std::env::var("BACKEND_URL") {
                self.base_url = url;
            }
        }
        if self.auth_token.as_deref().map_or(true, |t| t.trim().is_empty()) {
            self.auth_token = std::env::var("BACKEND_TOKEN").ok().filter(|t| !t.trim().is_empty());
        }
        self.base_url = self.base_url.trim().trim_end_matches('/').to_string();
        if self.timeout_secs == 0 {
            self.timeout_secs = default_timeout();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(anyhow!("backend.base_url is empty; set it in config.toml or BACKEND_URL"));
        }
        let lower = self.base_url.to_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(anyhow!("backend.base_url must start with http:// or https://"));
        }
        Ok(())
    }
}

impl CacheConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_capacity == 0 {
            return Err(anyhow!("cache.max_capacity must be >= 1"));
        }
        Ok(())
    }
}

impl SiteConfig {
    fn normalize(&mut self) {
        self.base_url = self.base_url.trim().trim_end_matches('/').to_string();
        // wa.me 只接受纯数字
        self.whatsapp_number.retain(|c| c.is_ascii_digit());
    }
}
