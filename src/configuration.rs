use std::time::Duration;

use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;
use url::Url;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub webdriver: WebDriverSettings,
    #[serde(default)]
    pub reveal: RevealSettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    pub target_url: String,
    /// Class name shared by every rendered listing item.
    pub item_class: String,
    pub output_dir: String,
    pub output_prefix: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub initial_load_secs: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub close_delay_secs: u64,
}

impl ApplicationSettings {
    pub fn target_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.target_url)
    }

    pub fn initial_load(&self) -> Duration {
        Duration::from_secs(self.initial_load_secs)
    }

    pub fn close_delay(&self) -> Duration {
        Duration::from_secs(self.close_delay_secs)
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct WebDriverSettings {
    // http://chrome:4444/wd/hub
    // http://localhost:9515
    pub server_url: String,
    pub headless: bool,
    pub maximize_window: bool,
    pub proxy: Option<String>,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct RevealSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_iterations: u32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub stability_threshold: u32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub scroll_steps: u32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub scroll_step_px: u32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub scroll_step_delay_ms: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub bottom_delay_ms: u64,
    pub container_selector: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub container_limit: usize,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub container_delay_ms: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub scroll_into_view_delay_ms: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub click_delay_ms: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub post_interaction_delay_ms: u64,
}

impl Default for RevealSettings {
    fn default() -> Self {
        RevealSettings {
            max_iterations: 100,
            stability_threshold: 8,
            scroll_steps: 5,
            scroll_step_px: 300,
            scroll_step_delay_ms: 200,
            bottom_delay_ms: 1000,
            container_selector:
                "div[class*='container'], div[class*='list'], div[class*='grid']".to_string(),
            container_limit: 3,
            container_delay_ms: 1000,
            scroll_into_view_delay_ms: 500,
            click_delay_ms: 2000,
            post_interaction_delay_ms: 1000,
        }
    }
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| {
        config::ConfigError::Message(format!("Failed to determine the current directory: {}", e))
    })?;
    let configuration_directory = base_path.join("configuration");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        // E.g. `APP_REVEAL__MAX_ITERATIONS=50` sets `Settings.reveal.max_iterations`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
