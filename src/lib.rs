#[macro_use]
extern crate rocket;

#[cfg(test)]
#[macro_use]
extern crate backend_test;

use rocket::{Build, Rocket};

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;

pub use config::Config;

use config::{ConfigFairing, StoreFairing};
use logging::LoggerFairing;
use model::store::SharedStore;

/// The server with routes, logging and config, but no store yet.
fn base() -> Rocket<Build> {
    rocket::build()
        .mount("/", api::routes())
        .attach(LoggerFairing)
        .attach(ConfigFairing)
}

/// Build the server, with the store chosen by the configuration.
pub fn build() -> Rocket<Build> {
    base().attach(StoreFairing)
}

/// Build the server around an existing store.
pub fn rocket_for_store(store: SharedStore) -> Rocket<Build> {
    base().manage(store)
}
