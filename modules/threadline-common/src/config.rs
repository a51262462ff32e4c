use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Twitter session
    pub twitter_username: String,
    pub twitter_email: String,
    pub twitter_password: String,
    pub cookies_file: String,

    // AI provider
    pub openrouter_api_key: String,
    pub keyword_model: String,

    // Headless rendering
    pub browserless_url: String,
    pub browserless_token: Option<String>,

    // Keyword callback
    pub callback_url: String,

    // Web server
    pub api_host: String,
    pub api_port: u16,

    // Thread walking
    pub max_thread_depth: usize,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            twitter_username: required_env("TWITTER_USERNAME"),
            twitter_email: required_env("TWITTER_EMAIL"),
            twitter_password: required_env("TWITTER_PASSWORD"),
            cookies_file: env::var("COOKIES_FILE").unwrap_or_else(|_| "cookies.json".to_string()),
            openrouter_api_key: required_env("OPENROUTER_API_KEY"),
            keyword_model: env::var("KEYWORD_MODEL")
                .unwrap_or_else(|_| "deepseek/deepseek-r1-distill-qwen-7b".to_string()),
            browserless_url: env::var("BROWSERLESS_URL")
                .unwrap_or_else(|_| "http://localhost:3030".to_string()),
            browserless_token: env::var("BROWSERLESS_TOKEN").ok(),
            callback_url: env::var("CALLBACK_URL")
                .unwrap_or_else(|_| "http://localhost:3000/callback".to_string()),
            api_host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            api_port: env::var("API_PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .expect("API_PORT must be a number"),
            max_thread_depth: env::var("MAX_THREAD_DEPTH")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .expect("MAX_THREAD_DEPTH must be a number"),
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
