//! Application services - Use case implementations
//!
//! Each service owns one slice of client state, talks to the Forge API
//! through [`ForgeApiPort`](crate::application::ports::outbound::ForgeApiPort)
//! and reports outcomes through the shared [`Notifier`].

pub mod character_service;
pub mod creature_service;
pub mod engine_service;
mod export;
pub mod item_service;
pub mod library_service;
pub mod navigation_service;
pub mod notification_service;
pub mod progression_service;
pub mod spell_service;
pub mod url_sync;

#[cfg(test)]
pub(crate) mod test_support;

pub use character_service::{CharacterBusyView, CharacterService};
pub use creature_service::{CreatureService, CreatureView};
pub use engine_service::{BackendHealth, EngineService};
pub use item_service::MagicItemService;
pub use library_service::{
    CharacterLibrary, CreatureLibrary, LibraryController, LibraryEndpoint, MagicItemLibrary,
    ProgressionLibrary, SpellLibrary,
};
pub use navigation_service::NavigationService;
pub use notification_service::{Notification, NotificationLevel, Notifier};
pub use progression_service::ProgressionService;
pub use spell_service::SpellService;
pub use url_sync::UrlSync;
