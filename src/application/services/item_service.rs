//! Magic item generation and library

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use crate::application::dto::{ExportFormat, MagicItemRequest};
use crate::application::error::ForgeError;
use crate::application::ports::outbound::{DownloadPort, ForgeApiPort};
use crate::application::services::engine_service::EngineService;
use crate::application::services::export::{json_file, markdown_file};
use crate::application::services::library_service::{LibraryController, MagicItemLibrary};
use crate::application::services::notification_service::Notifier;
use crate::application::state::{BusyFlag, DraftSlot};
use crate::domain::entities::{MagicItem, SavedRecord};
use crate::domain::services::file_stem;
use crate::domain::value_objects::MagicItemId;

pub struct MagicItemService {
    api: Arc<dyn ForgeApiPort>,
    downloads: Arc<dyn DownloadPort>,
    engine: Arc<EngineService>,
    notifier: Arc<Notifier>,
    library: Arc<LibraryController<MagicItemLibrary>>,
    slot: RwLock<DraftSlot<MagicItemId, MagicItem>>,
    generating: BusyFlag,
    saving: BusyFlag,
}

impl MagicItemService {
    pub fn new(
        api: Arc<dyn ForgeApiPort>,
        downloads: Arc<dyn DownloadPort>,
        engine: Arc<EngineService>,
        notifier: Arc<Notifier>,
        library: Arc<LibraryController<MagicItemLibrary>>,
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

    pub fn library(&self) -> &Arc<LibraryController<MagicItemLibrary>> {
        &self.library
    }

    pub async fn view(&self) -> DraftSlot<MagicItemId, MagicItem> {
        self.slot.read().await.clone()
    }

    pub fn is_generating(&self) -> bool {
        self.generating.is_busy()
    }

    pub fn is_saving(&self) -> bool {
        self.saving.is_busy()
    }

    #[instrument(skip(self, request))]
    pub async fn generate(&self, request: MagicItemRequest) -> Result<MagicItem, ForgeError> {
        let _guard = self
            .generating
            .try_acquire()
            .ok_or(ForgeError::Busy("item generation"))?;
        let engine = self.engine.current().await;
        let item = self.api.generate_magic_item(&request, engine).await?;
        info!(engine = %engine, rarity = %item.rarity, "Generated item: {}", item.name);
        self.slot.write().await.set_generated(item.clone());
        Ok(item)
    }

    #[instrument(skip(self))]
    pub async fn save(&self) -> Result<SavedRecord<MagicItemId>, ForgeError> {
        let item = self
            .slot
            .read()
            .await
            .draft()
            .cloned()
            .ok_or(ForgeError::NotReady("nothing to save"))?;
        let _guard = self.saving.try_acquire().ok_or(ForgeError::Busy("save"))?;
        let saved = self.api.save_magic_item(&item).await?;
        self.slot.write().await.mark_saved(saved.id);
        self.library.refresh_after_write().await;
        info!(item_id = %saved.id, "Saved item: {}", saved.name);
        self.notifier
            .success(format!("Saved Item #{}: {}", saved.id, saved.name));
        Ok(saved)
    }

    #[instrument(skip(self), fields(item_id = %id))]
    pub async fn load(&self, id: MagicItemId) -> Result<(), ForgeError> {
        let record = self.api.get_magic_item(id).await?;
        debug!(item_id = %id, "Loaded item: {}", record.name);
        self.slot.write().await.set_loaded(id, record.item);
        Ok(())
    }

    #[instrument(skip(self), fields(item_id = %id))]
    pub async fn delete(&self, id: MagicItemId) -> Result<(), ForgeError> {
        self.library.delete(id).await?;
        self.slot.write().await.clear_if_open(id);
        Ok(())
    }

    pub async fn close(&self) {
        self.slot.write().await.clear();
    }

    /// JSON and Markdown are rendered locally; PDF comes from the server
    #[instrument(skip(self))]
    pub async fn export(&self, format: ExportFormat) -> Result<PathBuf, ForgeError> {
        let item = self
            .slot
            .read()
            .await
            .draft()
            .cloned()
            .ok_or(ForgeError::NotReady("nothing to export"))?;
        let stem = file_stem(&item.name);
        let file = match format {
            ExportFormat::Json => json_file(&item, format!("{}_item.json", stem))?,
            ExportFormat::Markdown => markdown_file(item.to_markdown(), format!("{}.md", stem)),
            ExportFormat::Pdf => self.api.export_magic_item_pdf(&item).await?,
        };
        let path = self.downloads.deliver(&file).await?;
        info!(path = %path.display(), "Exported item");
        Ok(path)
    }
}
