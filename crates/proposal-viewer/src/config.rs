use std::net::SocketAddr;
use std::path::PathBuf;

use slide_deck::{CategoryRules, Segmenter, Strategy};

use crate::error::AppError;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8080";

/// Application configuration loaded explicitly from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON file holding the proposals served by this instance.
    pub proposals_path: PathBuf,
    /// Address the HTTP server listens on.
    pub bind_addr: SocketAddr,
    /// Origin used to build share and proposal links, without trailing slash.
    pub public_base_url: String,
    /// Target of the "book a meeting" call to action. `None` hides it.
    pub booking_url: Option<String>,
    pub strategy: Strategy,
    pub category_rules: CategoryRules,
}

impl Config {
    /// Required:
    /// - `PROPOSALS_PATH`: JSON file with the proposals
    ///
    /// Optional:
    /// - `BIND_ADDR` (default `127.0.0.1:8080`)
    /// - `PUBLIC_BASE_URL` (default `http://localhost:8080`)
    /// - `BOOKING_URL`
    /// - `DECK_STRATEGY`: `sections` or `outline`
    /// - `DECK_CATEGORY_RULES`: `keyword=category,...`, replaces the default table
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let proposals_path = value("PROPOSALS_PATH").map(PathBuf::from).ok_or_else(|| {
            AppError::Config("PROPOSALS_PATH environment variable is required".to_string())
        })?;

        let bind = value("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Config(format!("invalid BIND_ADDR {bind:?}: {e}")))?;

        let public_base_url = value("PUBLIC_BASE_URL")
            .unwrap_or_else(|| DEFAULT_PUBLIC_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let strategy = value("DECK_STRATEGY")
            .map(|s| s.parse::<Strategy>())
            .transpose()?
            .unwrap_or_default();

        let category_rules = value("DECK_CATEGORY_RULES")
            .map(|s| CategoryRules::parse(&s))
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            proposals_path,
            bind_addr,
            public_base_url,
            booking_url: value("BOOKING_URL"),
            strategy,
            category_rules,
        })
    }

    pub fn segmenter(&self) -> Segmenter {
        Segmenter::new(self.strategy, self.category_rules.clone())
    }

    /// Public viewer URL for a share identifier.
    pub fn share_url(&self, share_id: &str) -> String {
        format!("{}/proposal/{share_id}", self.public_base_url)
    }

    /// Viewer URL for a numeric proposal id, as handed out by the webhook.
    pub fn proposal_link(&self, id: i64) -> String {
        format!("{}/proposal/{id}", self.public_base_url)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use slide_deck::{Category, DeckError};

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn proposals_path_is_required() {
        let err = config_from(&[("BIND_ADDR", "0.0.0.0:9000")]).unwrap_err();
        assert!(matches!(err, AppError::Config(msg) if msg.contains("PROPOSALS_PATH")));
    }

    #[test]
    fn defaults_apply_when_optional_values_missing() {
        let config = config_from(&[("PROPOSALS_PATH", "data/proposals.json"), ("BOOKING_URL", "  ")]).unwrap();
        assert_eq!(config.proposals_path, PathBuf::from("data/proposals.json"));
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.public_base_url, DEFAULT_PUBLIC_BASE_URL);
        assert_eq!(config.booking_url, None);
        assert_eq!(config.strategy, Strategy::Sections);
        assert_eq!(config.category_rules, CategoryRules::default());
    }

    #[test]
    fn optional_values_are_parsed() {
        let config = config_from(&[
            ("PROPOSALS_PATH", "p.json"),
            ("BIND_ADDR", "0.0.0.0:9000"),
            ("PUBLIC_BASE_URL", "https://deck.example.com/"),
            ("BOOKING_URL", "https://cal.example.com/acme"),
            ("DECK_STRATEGY", "outline"),
            ("DECK_CATEGORY_RULES", "pricing=impact"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.public_base_url, "https://deck.example.com");
        assert_eq!(config.booking_url.as_deref(), Some("https://cal.example.com/acme"));
        assert_eq!(config.strategy, Strategy::Outline);
        assert_eq!(config.category_rules.classify("Pricing"), Category::Impact);
        assert_eq!(
            config.share_url("3f0c9a4e-1b2d-4c5e-8f90-a1b2c3d4e5f6"),
            "https://deck.example.com/proposal/3f0c9a4e-1b2d-4c5e-8f90-a1b2c3d4e5f6"
        );
        assert_eq!(config.proposal_link(42), "https://deck.example.com/proposal/42");
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            config_from(&[("PROPOSALS_PATH", "p.json"), ("BIND_ADDR", "nowhere")]),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            config_from(&[("PROPOSALS_PATH", "p.json"), ("DECK_STRATEGY", "carousel")]),
            Err(AppError::Deck(DeckError::UnknownStrategy(_)))
        ));
        assert!(matches!(
            config_from(&[("PROPOSALS_PATH", "p.json"), ("DECK_CATEGORY_RULES", "pricing")]),
            Err(AppError::Deck(DeckError::InvalidRule { .. }))
        ));
    }
}
