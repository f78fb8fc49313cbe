//! Adapters over the on-disk state of game front-ends and scrapers.
//!
//! Every adapter speaks canonical [`Platform`](retrobox_core::Platform) and
//! [`Media`](retrobox_core::Media) values and translates them through its
//! own mapping tables.

pub mod batocera;
pub mod emu_movies;
pub mod error;
pub mod factory;
pub mod gamelist;
pub mod launchbox;
pub mod manager;
pub mod mapping;
pub mod records;
pub mod skraper;

pub use batocera::BatoceraManager;
pub use emu_movies::EmuMoviesManager;
pub use error::FrontendError;
pub use factory::ManagerKind;
pub use launchbox::LaunchBoxManager;
pub use manager::{GameRef, InstallPayload, Manager, filter_game_info};
pub use mapping::{MediaTable, PlatformTable};
pub use records::PlatformMappings;
pub use skraper::SkraperManager;
