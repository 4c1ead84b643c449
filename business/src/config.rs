use serde::{Deserialize, Serialize};

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_MEDIA_BASE_URL: &str = "http://127.0.0.1:8000/uploads/";

/// Optional dashboard capabilities.
///
/// Deployments differ only in which of these are switched on; the controller
/// logic is the same for all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardFeatures {
    /// Free-text filtering of the suspicious-domain list.
    pub search: bool,
    /// Resolve screenshot paths of suspicious domains into viewable URLs.
    pub image_preview: bool,
    /// Account creation, deletion and password change.
    pub user_management: bool,
}

impl Default for DashboardFeatures {
    fn default() -> Self {
        Self {
            search: true,
            image_preview: true,
            user_management: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessConfig {
    pub api_base_url: String,
    /// Origin that serves screenshot files referenced by `photo_url`.
    ///
    /// This is configured separately from the API origin; the two are not
    /// guaranteed to match across deployments.
    pub media_base_url: String,
    pub features: DashboardFeatures,
}

/// Environment overrides, read as `API_BASE_URL` and `MEDIA_BASE_URL`.
#[derive(Debug, Default, Deserialize)]
struct RawEnv {
    api_base_url: Option<String>,
    media_base_url: Option<String>,
}

impl BusinessConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Defaults overlaid with `API_BASE_URL` / `MEDIA_BASE_URL` from an environment iterator.
    pub fn from_env_iter<I, S>(vars: I) -> Result<Self, serde_env::Error>
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        Self::default().with_env_overrides(vars)
    }

    /// Overlay `API_BASE_URL` / `MEDIA_BASE_URL` on top of this configuration.
    ///
    /// Variables that are not set leave the current values alone.
    pub fn with_env_overrides<I, S>(mut self, vars: I) -> Result<Self, serde_env::Error>
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        let raw: RawEnv = serde_env::from_iter(vars)?;
        if let Some(url) = raw.api_base_url {
            self.api_base_url = url;
        }
        if let Some(url) = raw.media_base_url {
            self.media_base_url = url;
        }
        Ok(self)
    }

    pub fn api_url(&self) -> String {
        format!("{}/api", self.api_base_url.trim_end_matches('/'))
    }

    /// Resolve a relative `photo_url` against the media origin.
    ///
    /// Absolute URLs are returned unchanged.
    pub fn media_url(&self, photo_url: &str) -> String {
        if photo_url.starts_with("http://") || photo_url.starts_with("https://") {
            return photo_url.to_owned();
        }
        format!(
            "{}/{}",
            self.media_base_url.trim_end_matches('/'),
            photo_url.trim_start_matches('/')
        )
    }
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            media_base_url: DEFAULT_MEDIA_BASE_URL.to_owned(),
            features: DashboardFeatures::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_strips_trailing_slash() {
        let config = BusinessConfig::new("https://watch.example.com/");
        assert_eq!(config.api_url(), "https://watch.example.com/api");
    }

    #[test]
    fn test_media_url_joins_relative_paths() {
        let config = BusinessConfig::default();
        assert_eq!(
            config.media_url("shots/a.png"),
            "http://127.0.0.1:8000/uploads/shots/a.png"
        );
        assert_eq!(
            config.media_url("/shots/a.png"),
            "http://127.0.0.1:8000/uploads/shots/a.png"
        );
    }

    #[test]
    fn test_media_url_keeps_absolute_urls() {
        let config = BusinessConfig::default();
        assert_eq!(
            config.media_url("https://cdn.example.com/a.png"),
            "https://cdn.example.com/a.png"
        );
    }

    #[test]
    fn test_env_overrides() {
        let config = BusinessConfig::from_env_iter(vec![
            ("API_BASE_URL", "https://api.example.com"),
            ("MEDIA_BASE_URL", "https://media.example.com/uploads"),
            ("UNRELATED", "ignored"),
        ])
        .expect("env should deserialize");

        assert_eq!(config.api_base_url, "https://api.example.com");
        assert_eq!(config.media_base_url, "https://media.example.com/uploads");
        assert_eq!(config.features, DashboardFeatures::default());
    }

    #[test]
    fn test_env_without_overrides_uses_defaults() {
        let config = BusinessConfig::from_env_iter(Vec::<(&str, &str)>::new())
            .expect("empty env should deserialize");
        assert_eq!(config, BusinessConfig::default());
    }

    #[test]
    fn test_env_overrides_keep_unset_values() {
        let mut base = BusinessConfig::new("https://from-file.example.com");
        base.features.search = false;

        let config = base
            .with_env_overrides(vec![("MEDIA_BASE_URL", "https://media.example.com")])
            .expect("env should deserialize");

        assert_eq!(config.api_base_url, "https://from-file.example.com");
        assert_eq!(config.media_base_url, "https://media.example.com");
        assert!(!config.features.search);
    }
}
