//! Creature generation, portraits and library

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use crate::application::dto::{CreatureEnvelope, CreatureRequest, ExportFormat};
use crate::application::error::ForgeError;
use crate::application::ports::outbound::{DownloadPort, ForgeApiPort};
use crate::application::services::engine_service::EngineService;
use crate::application::services::export::{json_file, markdown_file};
use crate::application::services::library_service::{CreatureLibrary, LibraryController};
use crate::application::services::notification_service::Notifier;
use crate::application::state::{BusyFlag, CreatureDraft, PreviewStore};
use crate::domain::entities::{Creature, SavedRecord};
use crate::domain::services::file_stem;
use crate::domain::value_objects::CreatureId;

/// Read-only copy of the creature slice
#[derive(Debug, Clone, PartialEq)]
pub struct CreatureView {
    pub creature: Option<Creature>,
    pub open_record: Option<CreatureId>,
    pub portrait_url: Option<String>,
}

pub struct CreatureService {
    api: Arc<dyn ForgeApiPort>,
    downloads: Arc<dyn DownloadPort>,
    engine: Arc<EngineService>,
    notifier: Arc<Notifier>,
    library: Arc<LibraryController<CreatureLibrary>>,
    draft: RwLock<CreatureDraft>,
    generating: BusyFlag,
    portrait: BusyFlag,
    saving: BusyFlag,
}

impl CreatureService {
    pub fn new(
        api: Arc<dyn ForgeApiPort>,
        downloads: Arc<dyn DownloadPort>,
        engine: Arc<EngineService>,
        notifier: Arc<Notifier>,
        library: Arc<LibraryController<CreatureLibrary>>,
        previews: PreviewStore,
    ) -> Self {
        Self {
            api,
            downloads,
            engine,
            notifier,
            library,
            draft: RwLock::new(CreatureDraft::new(previews)),
            generating: BusyFlag::new(),
            portrait: BusyFlag::new(),
            saving: BusyFlag::new(),
        }
    }

    pub fn library(&self) -> &Arc<LibraryController<CreatureLibrary>> {
        &self.library
    }

    pub async fn view(&self) -> CreatureView {
        let draft = self.draft.read().await;
        CreatureView {
            creature: draft.slot.draft().cloned(),
            open_record: draft.slot.open_record(),
            portrait_url: draft.portrait.url(),
        }
    }

    pub fn is_generating(&self) -> bool {
        self.generating.is_busy() || self.portrait.is_busy()
    }

    #[instrument(skip(self, request))]
    pub async fn generate(&self, request: CreatureRequest) -> Result<Creature, ForgeError> {
        let _guard = self
            .generating
            .try_acquire()
            .ok_or(ForgeError::Busy("creature generation"))?;
        let engine = self.engine.current().await;
        let creature = self.api.generate_creature(&request, engine).await?;
        info!(engine = %engine, cr = %creature.challenge_rating, "Generated creature: {}", creature.name);
        self.draft.write().await.set_generated(creature.clone());
        Ok(creature)
    }

    #[instrument(skip(self))]
    pub async fn generate_portrait(&self) -> Result<(), ForgeError> {
        let creature = self
            .draft
            .read()
            .await
            .slot
            .draft()
            .cloned()
            .ok_or(ForgeError::NotReady("generate a creature first"))?;
        let _guard = self
            .portrait
            .try_acquire()
            .ok_or(ForgeError::Busy("portrait"))?;
        let engine = self.engine.current().await;
        let bytes = self.api.generate_creature_portrait(&creature, engine).await?;
        info!(engine = %engine, size = bytes.len(), "Generated creature portrait");
        self.draft.write().await.portrait.replace(bytes);
        self.notifier.success("Portrait generated");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn save(&self) -> Result<SavedRecord<CreatureId>, ForgeError> {
        let envelope = {
            let draft = self.draft.read().await;
            let creature = draft
                .slot
                .draft()
                .cloned()
                .ok_or(ForgeError::NotReady("nothing to save"))?;
            CreatureEnvelope {
                creature,
                portrait_base64: draft.portrait.encoded().map(str::to_string),
            }
        };
        let _guard = self.saving.try_acquire().ok_or(ForgeError::Busy("save"))?;
        let saved = self.api.save_creature(&envelope).await?;
        self.draft.write().await.slot.mark_saved(saved.id);
        self.library.refresh_after_write().await;
        info!(creature_id = %saved.id, "Saved creature: {}", saved.name);
        self.notifier
            .success(format!("Saved #{}: {}", saved.id, saved.name));
        Ok(saved)
    }

    #[instrument(skip(self), fields(creature_id = %id))]
    pub async fn load(&self, id: CreatureId) -> Result<(), ForgeError> {
        let record = self.api.get_creature(id).await?;
        let mut draft = self.draft.write().await;
        draft.portrait.clear();
        draft.slot.set_loaded(id, record.creature);
        if let Some(encoded) = record.portrait_base64.as_deref() {
            if let Err(err) = draft.portrait.load_encoded(encoded) {
                warn!(creature_id = %id, error = %err, "Stored portrait is unreadable");
            }
        }
        info!(creature_id = %id, "Loaded creature: {}", record.name);
        Ok(())
    }

    #[instrument(skip(self), fields(creature_id = %id))]
    pub async fn delete(&self, id: CreatureId) -> Result<(), ForgeError> {
        self.library.delete(id).await?;
        self.draft.write().await.clear_if_open(id);
        Ok(())
    }

    pub async fn close(&self) {
        self.draft.write().await.clear();
    }

    #[instrument(skip(self))]
    pub async fn export(&self, format: ExportFormat) -> Result<PathBuf, ForgeError> {
        let creature = self
            .draft
            .read()
            .await
            .slot
            .draft()
            .cloned()
            .ok_or(ForgeError::NotReady("nothing to export"))?;
        let stem = file_stem(&creature.name);
        let file = match format {
            ExportFormat::Json => json_file(&creature, format!("{}.json", stem))?,
            ExportFormat::Markdown => {
                markdown_file(creature.to_markdown(), format!("{}.md", stem))
            }
            ExportFormat::Pdf => return Err(ForgeError::UnsupportedExport("creature PDF")),
        };
        let path = self.downloads.deliver(&file).await?;
        info!(path = %path.display(), "Exported creature");
        Ok(path)
    }
}
