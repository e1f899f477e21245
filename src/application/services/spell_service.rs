//! Spell generation and library

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use crate::application::dto::{ExportFormat, SpellRequest};
use crate::application::error::ForgeError;
use crate::application::ports::outbound::{DownloadPort, ForgeApiPort};
use crate::application::services::engine_service::EngineService;
use crate::application::services::export::{json_file, markdown_file};
use crate::application::services::library_service::{LibraryController, SpellLibrary};
use crate::application::services::notification_service::Notifier;
use crate::application::state::{BusyFlag, DraftSlot};
use crate::domain::entities::{SavedRecord, Spell};
use crate::domain::services::file_stem;
use crate::domain::value_objects::SpellId;

pub struct SpellService {
    api: Arc<dyn ForgeApiPort>,
    downloads: Arc<dyn DownloadPort>,
    engine: Arc<EngineService>,
    notifier: Arc<Notifier>,
    library: Arc<LibraryController<SpellLibrary>>,
    slot: RwLock<DraftSlot<SpellId, Spell>>,
    generating: BusyFlag,
    saving: BusyFlag,
}

impl SpellService {
    pub fn new(
        api: Arc<dyn ForgeApiPort>,
        downloads: Arc<dyn DownloadPort>,
        engine: Arc<EngineService>,
        notifier: Arc<Notifier>,
        library: Arc<LibraryController<SpellLibrary>>,
    ) -> Self {
        Self {
            api,
            downloads,
            engine,
            notifier,
            library,
            slot: RwLock::new(DraftSlot::default()),
            generating: BusyFlag::new(),
            saving: BusyFlag::new(),
        }
    }

    pub fn library(&self) -> &Arc<LibraryController<SpellLibrary>> {
        &self.library
    }

    pub async fn view(&self) -> DraftSlot<SpellId, Spell> {
        self.slot.read().await.clone()
    }

    pub fn is_generating(&self) -> bool {
        self.generating.is_busy()
    }

    pub fn is_saving(&self) -> bool {
        self.saving.is_busy()
    }

    #[instrument(skip(self, request))]
    pub async fn generate(&self, request: SpellRequest) -> Result<Spell, ForgeError> {
        let _guard = self
            .generating
            .try_acquire()
            .ok_or(ForgeError::Busy("spell generation"))?;
        let engine = self.engine.current().await;
        let spell = self.api.generate_spell(&request, engine).await?;
        info!(engine = %engine, level = spell.level, "Generated spell: {}", spell.name);
        self.slot.write().await.set_generated(spell.clone());
        Ok(spell)
    }

    #[instrument(skip(self))]
    pub async fn save(&self) -> Result<SavedRecord<SpellId>, ForgeError> {
        let spell = self
            .slot
            .read()
            .await
            .draft()
            .cloned()
            .ok_or(ForgeError::NotReady("nothing to save"))?;
        let _guard = self.saving.try_acquire().ok_or(ForgeError::Busy("save"))?;
        let saved = self.api.save_spell(&spell).await?;
        self.slot.write().await.mark_saved(saved.id);
        self.library.refresh_after_write().await;
        info!(spell_id = %saved.id, "Saved spell: {}", saved.name);
        self.notifier
            .success(format!("Saved #{}: {}", saved.id, saved.name));
        Ok(saved)
    }

    #[instrument(skip(self), fields(spell_id = %id))]
    pub async fn load(&self, id: SpellId) -> Result<(), ForgeError> {
        let record = self.api.get_spell(id).await?;
        debug!(spell_id = %id, "Loaded spell: {}", record.name);
        self.slot.write().await.set_loaded(id, record.spell);
        Ok(())
    }

    #[instrument(skip(self), fields(spell_id = %id))]
    pub async fn delete(&self, id: SpellId) -> Result<(), ForgeError> {
        self.library.delete(id).await?;
        self.slot.write().await.clear_if_open(id);
        Ok(())
    }

    pub async fn close(&self) {
        self.slot.write().await.clear();
    }

    #[instrument(skip(self))]
    pub async fn export(&self, format: ExportFormat) -> Result<PathBuf, ForgeError> {
        let spell = self
            .slot
            .read()
            .await
            .draft()
            .cloned()
            .ok_or(ForgeError::NotReady("nothing to export"))?;
        let stem = file_stem(&spell.name);
        let file = match format {
            ExportFormat::Json => json_file(&spell, format!("{}.json", stem))?,
            ExportFormat::Markdown => markdown_file(spell.to_markdown(), format!("{}.md", stem)),
            ExportFormat::Pdf => return Err(ForgeError::UnsupportedExport("spell PDF")),
        };
        let path = self.downloads.deliver(&file).await?;
        info!(path = %path.display(), "Exported spell");
        Ok(path)
    }
}
