//! Section navigation and start-up restoration from the URL

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use crate::application::error::ForgeError;
use crate::application::services::character_service::CharacterService;
use crate::application::services::creature_service::CreatureService;
use crate::application::services::item_service::MagicItemService;
use crate::application::services::spell_service::SpellService;
use crate::application::services::url_sync::UrlSync;
use crate::application::state::{from_query_string, SessionSnapshot};
use crate::domain::value_objects::{
    CharacterId, CreatureId, EntityKind, MagicItemId, Section, SpellId,
};

pub struct NavigationService {
    section: RwLock<Section>,
    url: UrlSync,
    characters: Arc<CharacterService>,
    items: Arc<MagicItemService>,
    spells: Arc<SpellService>,
    creatures: Arc<CreatureService>,
}

impl NavigationService {
    pub fn new(
        url: UrlSync,
        characters: Arc<CharacterService>,
        items: Arc<MagicItemService>,
        spells: Arc<SpellService>,
        creatures: Arc<CreatureService>,
    ) -> Self {
        Self {
            section: RwLock::new(url.snapshot().section),
            url,
            characters,
            items,
            spells,
            creatures,
        }
    }

    pub async fn current(&self) -> Section {
        *self.section.read().await
    }

    pub fn url(&self) -> &UrlSync {
        &self.url
    }

    /// Apply a query string to navigation and library state. Nothing is
    /// fetched; call [`navigate`](Self::navigate) with the returned section
    /// to load what it shows.
    #[instrument(skip(self))]
    pub async fn restore_from_query(&self, query: &str) -> SessionSnapshot {
        let snapshot = from_query_string(query);
        *self.section.write().await = snapshot.section;
        self.url.set_section(snapshot.section);
        self.characters.library().restore(&snapshot.characters).await;
        self.items.library().restore(&snapshot.items).await;
        self.spells.library().restore(&snapshot.spells).await;
        self.creatures.library().restore(&snapshot.creatures).await;
        debug!(section = %snapshot.section, "Restored session from URL");
        snapshot
    }

    /// Show `section`. A library shown for the first time is listed before this returns.
    #[instrument(skip(self))]
    pub async fn navigate(&self, section: Section) -> Result<(), ForgeError> {
        *self.section.write().await = section;
        self.url.set_section(section);
        let shown = section.library();
        info!(section = %section, "Navigated");

        // Deactivate first so only the shown library can load.
        for kind in [
            EntityKind::Character,
            EntityKind::MagicItem,
            EntityKind::Spell,
            EntityKind::Creature,
        ] {
            if shown != Some(kind) {
                self.set_library_active(kind, false).await?;
            }
        }
        if let Some(kind) = shown {
            self.set_library_active(kind, true).await?;
        }
        Ok(())
    }

    async fn set_library_active(&self, kind: EntityKind, active: bool) -> Result<(), ForgeError> {
        match kind {
            EntityKind::Character => self.characters.library().set_active(active).await?,
            EntityKind::MagicItem => self.items.library().set_active(active).await?,
            EntityKind::Spell => self.spells.library().set_active(active).await?,
            EntityKind::Creature => self.creatures.library().set_active(active).await?,
        }
        Ok(())
    }

    /// Reset every creation draft, then open the creation section for `kind`
    #[instrument(skip(self))]
    pub async fn start_new(&self, kind: EntityKind) -> Result<(), ForgeError> {
        self.characters.reset().await;
        self.items.close().await;
        self.spells.close().await;
        self.creatures.close().await;
        self.navigate(Section::new_for(kind)).await
    }

    /// Load a saved character and switch to the creation form
    pub async fn open_character(&self, id: CharacterId) -> Result<(), ForgeError> {
        self.characters.load(id).await?;
        self.navigate(Section::CharacterNew).await
    }

    pub async fn open_item(&self, id: MagicItemId) -> Result<(), ForgeError> {
        self.items.load(id).await?;
        self.navigate(Section::ItemNew).await
    }

    pub async fn open_spell(&self, id: SpellId) -> Result<(), ForgeError> {
        self.spells.load(id).await?;
        self.navigate(Section::SpellNew).await
    }

    pub async fn open_creature(&self, id: CreatureId) -> Result<(), ForgeError> {
        self.creatures.load(id).await?;
        self.navigate(Section::CreatureNew).await
    }
}
