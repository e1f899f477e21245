//! Shared application state

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::application::ports::outbound::{DownloadPort, ForgeApiPort, PreferencesPort};
use crate::application::services::{
    CharacterLibrary, CharacterService, CreatureLibrary, CreatureService, EngineService,
    LibraryController, MagicItemLibrary, MagicItemService, NavigationService, Notifier,
    ProgressionLibrary, ProgressionService, SpellLibrary, SpellService, UrlSync,
};
use crate::application::state::{PreviewStore, SessionSnapshot};
use crate::domain::value_objects::EntityKind;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::downloads::FileDownloadSink;
use crate::infrastructure::forge_api::ForgeApiClient;
use crate::infrastructure::preferences::FilePreferences;

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    pub api: Arc<dyn ForgeApiPort>,
    pub notifier: Arc<Notifier>,
    pub url: UrlSync,
    pub previews: PreviewStore,
    // Application services
    pub engine: Arc<EngineService>,
    pub characters: Arc<CharacterService>,
    pub progressions: Arc<ProgressionService>,
    pub items: Arc<MagicItemService>,
    pub spells: Arc<SpellService>,
    pub creatures: Arc<CreatureService>,
    pub navigation: NavigationService,
}

impl AppState {
    pub async fn new(config: AppConfig) -> Result<Self> {
        let client = ForgeApiClient::new(&config.api_base_url, config.http_timeout)
            .context("Failed to build HTTP client")?;
        let api: Arc<dyn ForgeApiPort> = Arc::new(client);
        let preferences: Arc<dyn PreferencesPort> =
            Arc::new(FilePreferences::new(&config.preferences_path));
        let downloads: Arc<dyn DownloadPort> =
            Arc::new(FileDownloadSink::new(&config.download_dir));
        Ok(Self::with_ports(config, api, preferences, downloads).await)
    }

    /// Wire every service around the given adapters
    pub async fn with_ports(
        config: AppConfig,
        api: Arc<dyn ForgeApiPort>,
        preferences: Arc<dyn PreferencesPort>,
        downloads: Arc<dyn DownloadPort>,
    ) -> Self {
        let notifier = Arc::new(Notifier::new(config.notification_ttl));
        let url = UrlSync::new(SessionSnapshot::default());
        let previews = PreviewStore::new();
        let engine = Arc::new(EngineService::load(api.clone(), preferences).await);

        let page_size = config.page_size;
        let debounce = config.debounce;

        let characters = Arc::new(CharacterService::new(
            api.clone(),
            downloads.clone(),
            engine.clone(),
            notifier.clone(),
            Arc::new(
                LibraryController::new(CharacterLibrary(api.clone()), page_size, debounce)
                    .with_url_sync(url.clone(), EntityKind::Character),
            ),
            previews.clone(),
            config.cloud_key_configured,
        ));
        let progressions = Arc::new(ProgressionService::new(
            api.clone(),
            notifier.clone(),
            characters.clone(),
            Arc::new(LibraryController::new(
                ProgressionLibrary(api.clone()),
                page_size,
                debounce,
            )),
        ));
        let items = Arc::new(MagicItemService::new(
            api.clone(),
            downloads.clone(),
            engine.clone(),
            notifier.clone(),
            Arc::new(
                LibraryController::new(MagicItemLibrary(api.clone()), page_size, debounce)
                    .with_url_sync(url.clone(), EntityKind::MagicItem),
            ),
        ));
        let spells = Arc::new(SpellService::new(
            api.clone(),
            downloads.clone(),
            engine.clone(),
            notifier.clone(),
            Arc::new(
                LibraryController::new(SpellLibrary(api.clone()), page_size, debounce)
                    .with_url_sync(url.clone(), EntityKind::Spell),
            ),
        ));
        let creatures = Arc::new(CreatureService::new(
            api.clone(),
            downloads,
            engine.clone(),
            notifier.clone(),
            Arc::new(
                LibraryController::new(CreatureLibrary(api.clone()), page_size, debounce)
                    .with_url_sync(url.clone(), EntityKind::Creature),
            ),
            previews.clone(),
        ));
        let navigation = NavigationService::new(
            url.clone(),
            characters.clone(),
            items.clone(),
            spells.clone(),
            creatures.clone(),
        );

        Self {
            config,
            api,
            notifier,
            url,
            previews,
            engine,
            characters,
            progressions,
            items,
            spells,
            creatures,
            navigation,
        }
    }

    /// Restore navigation from `query`, then poll health and load reference data.
    ///
    /// Failures are logged; the client stays usable offline.
    pub async fn start(&self, query: &str) {
        let snapshot = self.navigation.restore_from_query(query).await;
        self.engine.poll_health().await;
        if let Err(e) = self.characters.load_rules().await {
            tracing::warn!(error = %e, "Reference data unavailable");
        }
        if let Err(e) = self.navigation.navigate(snapshot.section).await {
            tracing::warn!(error = %e, section = %snapshot.section, "Initial listing failed");
        }
    }
}
