//! Progression library: plans saved on their own, outside any character

use std::sync::Arc;

use tracing::{info, instrument};

use crate::application::error::ForgeError;
use crate::application::ports::outbound::ForgeApiPort;
use crate::application::services::character_service::CharacterService;
use crate::application::services::library_service::{LibraryController, ProgressionLibrary};
use crate::application::services::notification_service::Notifier;
use crate::application::state::BusyFlag;
use crate::domain::entities::{ProgressionPlan, SavedRecord};
use crate::domain::value_objects::ProgressionId;

pub struct ProgressionService {
    api: Arc<dyn ForgeApiPort>,
    notifier: Arc<Notifier>,
    characters: Arc<CharacterService>,
    library: Arc<LibraryController<ProgressionLibrary>>,
    saving: BusyFlag,
}

impl ProgressionService {
    pub fn new(
        api: Arc<dyn ForgeApiPort>,
        notifier: Arc<Notifier>,
        characters: Arc<CharacterService>,
        library: Arc<LibraryController<ProgressionLibrary>>,
    ) -> Self {
        Self {
            api,
            notifier,
            characters,
            library,
            saving: BusyFlag::new(),
        }
    }

    pub fn library(&self) -> &Arc<LibraryController<ProgressionLibrary>> {
        &self.library
    }

    /// Save the plan attached to the open character
    #[instrument(skip(self))]
    pub async fn save_current(&self) -> Result<SavedRecord<ProgressionId>, ForgeError> {
        let plan = self
            .characters
            .progression()
            .await
            .ok_or(ForgeError::NotReady("generate a progression first"))?;
        let _guard = self
            .saving
            .try_acquire()
            .ok_or(ForgeError::Busy("save"))?;
        let saved = self.api.save_progression(&plan).await?;
        self.library.refresh_after_write().await;
        info!(progression_id = %saved.id, "Saved progression: {}", saved.name);
        self.notifier
            .success(format!("Saved #{}: {}", saved.id, saved.name));
        Ok(saved)
    }

    #[instrument(skip(self), fields(progression_id = %id))]
    pub async fn get(&self, id: ProgressionId) -> Result<ProgressionPlan, ForgeError> {
        Ok(self.api.get_progression(id).await?.plan)
    }

    /// Fetch a saved plan and attach it to the open character
    #[instrument(skip(self), fields(progression_id = %id))]
    pub async fn attach(&self, id: ProgressionId) -> Result<(), ForgeError> {
        let plan = self.get(id).await?;
        self.characters.attach_progression(plan).await
    }

    pub async fn delete(&self, id: ProgressionId) -> Result<(), ForgeError> {
        self.library.delete(id).await
    }
}
