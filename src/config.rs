use std::path::PathBuf;
use std::sync::Arc;

use chrono::Duration;
use rocket::{
    fairing::{Fairing, Info, Kind},
    Build, Rocket,
};
use serde::Deserialize;

use crate::model::store::{load_fixtures, seed, MemoryStore, MongoStore, SharedStore};

/// Application configuration, derived from `Rocket.toml` and `ROCKET_*`
/// environment variables. This struct becomes managed state and can be
/// inspected by any endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    index_limit: Option<usize>,
    #[serde(default = "default_recent_window_hours")]
    recent_window_hours: u32,
}

fn default_recent_window_hours() -> u32 {
    24
}

impl Default for Config {
    fn default() -> Self {
        Self {
            index_limit: None,
            recent_window_hours: default_recent_window_hours(),
        }
    }
}

impl Config {
    /// The most questions the index will list, if limited.
    pub fn index_limit(&self) -> Option<usize> {
        self.index_limit
    }

    /// How long a question counts as new after publication.
    pub fn recent_window(&self) -> Duration {
        Duration::hours(self.recent_window_hours.into())
    }
}

/// A fairing that loads the application config and puts it in managed state.
pub struct ConfigFairing;

#[rocket::async_trait]
impl Fairing for ConfigFairing {
    fn info(&self) -> Info {
        Info {
            name: "Config",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        let config = match rocket.figment().extract::<Config>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load application config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };
        debug!("Loaded application config: {config:?}");

        rocket = rocket.manage(config);
        Ok(rocket)
    }
}

/// Configuration for the question store.
#[derive(Deserialize)]
struct StoreConfig {
    // secrets
    #[serde(default)]
    db_uri: Option<String>,
    // non-secrets
    #[serde(default = "default_db_name")]
    db_name: String,
    #[serde(default)]
    seed_file: Option<PathBuf>,
}

fn default_db_name() -> String {
    "polls".to_string()
}

/// A fairing that loads the store config and places a [`SharedStore`] into
/// managed state. With a `db_uri` this connects to MongoDB and ensures the
/// indexes exist; without one, questions live in memory for the lifetime of
/// the process. A `seed_file` of question fixtures is loaded into the store
/// before launch.
pub struct StoreFairing;

#[rocket::async_trait]
impl Fairing for StoreFairing {
    fn info(&self) -> Info {
        Info {
            name: "Poll store",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, rocket: Rocket<Build>) -> rocket::fairing::Result {
        let config = match rocket.figment().extract::<StoreConfig>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load store config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };

        let store: SharedStore = match config.db_uri {
            Some(uri) => {
                info!("Loaded database config, connecting...");
                match MongoStore::connect(&uri, &config.db_name).await {
                    Ok(store) => {
                        info!("...database connection online!");
                        Arc::new(store)
                    }
                    Err(e) => {
                        error!("Failed to connect to database: {e}");
                        return Err(rocket);
                    }
                }
            }
            None => {
                warn!("No `db_uri` configured; questions will only be kept in memory");
                Arc::new(MemoryStore::new())
            }
        };

        if let Some(path) = config.seed_file {
            let seeded = match load_fixtures(&path).await {
                Ok(fixtures) => seed(&*store, &fixtures).await,
                Err(e) => Err(e),
            };
            match seeded {
                Ok(count) => info!("Seeded {count} question(s) from {}", path.display()),
                Err(e) => {
                    error!("Failed to seed questions from {}: {e}", path.display());
                    return Err(rocket);
                }
            }
        }

        Ok(rocket.manage(store))
    }
}

#[cfg(test)]
mod tests {
    use rocket::{
        figment::{
            providers::{Format, Serialized, Toml},
            Figment,
        },
        http::Status,
        local::asynchronous::Client,
    };

    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        let config = Figment::new().extract::<Config>().unwrap();
        assert_eq!(config.index_limit(), None);
        assert_eq!(config.recent_window(), Duration::hours(24));

        let store = Figment::new().extract::<StoreConfig>().unwrap();
        assert!(store.db_uri.is_none());
        assert_eq!(store.db_name, "polls");
        assert!(store.seed_file.is_none());
    }

    #[test]
    fn values_are_read() {
        let figment = Figment::new()
            .merge(Serialized::default("index_limit", 5))
            .merge(Serialized::default("recent_window_hours", 48));
        let config = figment.extract::<Config>().unwrap();
        assert_eq!(config.index_limit(), Some(5));
        assert_eq!(config.recent_window(), Duration::hours(48));
    }

    #[test]
    fn shipped_profiles_leave_the_index_unlimited() {
        for profile in ["debug", "release"] {
            let config = Figment::from(Toml::file("Rocket.toml").nested())
                .select(profile)
                .extract::<Config>()
                .unwrap();
            assert_eq!(config.index_limit(), None, "profile {profile}");
        }
    }

    fn seeded_rocket(seed_file: &str) -> Rocket<Build> {
        let figment = rocket::Config::figment().merge(("seed_file", seed_file));
        rocket::custom(figment)
            .mount("/", crate::api::routes())
            .attach(ConfigFairing)
            .attach(StoreFairing)
    }

    #[rocket::async_test]
    async fn seed_file_fills_the_store() {
        log4rs_test_utils::test_logging::init_logging_once_for(["polls_backend"], None, None);

        let client = Client::tracked(seeded_rocket("fixtures/polls.json"))
            .await
            .unwrap();

        let response = client.get("/polls/").dispatch().await;
        assert_eq!(Status::Ok, response.status());
        let html = response.into_string().await.unwrap();
        assert!(html.contains("Favourite season?"));
        // Present in the fixtures, but with a single choice.
        assert!(!html.contains("Is anyone there?"));
        // Present in the fixtures, but not yet published.
        assert!(!html.contains("Which poll comes next?"));
    }

    #[rocket::async_test]
    async fn bad_seed_file_aborts_ignition() {
        let result = Client::tracked(seeded_rocket("fixtures/does-not-exist.json")).await;
        assert!(result.is_err());
    }
}
