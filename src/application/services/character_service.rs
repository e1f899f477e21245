//! Character Service - the character creation flow
//!
//! Pick class/race/background, roll and assign abilities, generate a draft
//! and its backstory, portrait and progression, then save, load, delete and
//! export through the character library.

use std::path::PathBuf;
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::application::dto::{
    BackstoryRequest, ExportFormat, GenerateDraftRequest, PortraitRequest, ProgressionRequest,
};
use crate::application::error::ForgeError;
use crate::application::ports::outbound::{DownloadPort, ForgeApiPort};
use crate::application::services::engine_service::EngineService;
use crate::application::services::library_service::{CharacterLibrary, LibraryController};
use crate::application::services::notification_service::Notifier;
use crate::application::state::{
    BusyFlag, BusyGuard, CharacterState, CharacterView, PreviewStore, ProgressionOptions,
};
use crate::domain::entities::{
    clamp_level, BackstoryOptions, BackstoryResult, ProgressionPlan, RuleCatalog, SavedRecord,
};
use crate::domain::services::{auto_assignment_for_class, default_character_name, DerivedState};
use crate::domain::value_objects::{
    parse_seed, Ability, AbilityAssignment, AbilitySet, CharacterId, GenerationEngine,
};

/// Upper bound (exclusive) of seeds picked by quick generate
const QUICK_SEED_RANGE: u64 = 1_000_000;

#[derive(Default)]
struct CharacterBusy {
    roll: BusyFlag,
    generate: BusyFlag,
    backstory: BusyFlag,
    portrait: BusyFlag,
    progression: BusyFlag,
    save: BusyFlag,
    load: BusyFlag,
    export: BusyFlag,
}

/// Which character operations are in flight
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharacterBusyView {
    pub rolling: bool,
    pub generating: bool,
    pub backstory: bool,
    pub portrait: bool,
    pub progression: bool,
    pub saving: bool,
    pub loading: bool,
    pub exporting: bool,
}

fn acquire(flag: &BusyFlag, what: &'static str) -> Result<BusyGuard, ForgeError> {
    flag.try_acquire().ok_or(ForgeError::Busy(what))
}

pub struct CharacterService {
    api: Arc<dyn ForgeApiPort>,
    downloads: Arc<dyn DownloadPort>,
    engine: Arc<EngineService>,
    notifier: Arc<Notifier>,
    library: Arc<LibraryController<CharacterLibrary>>,
    state: RwLock<CharacterState>,
    catalog: RwLock<RuleCatalog>,
    busy: CharacterBusy,
    cloud_key_configured: bool,
}

impl CharacterService {
    pub fn new(
        api: Arc<dyn ForgeApiPort>,
        downloads: Arc<dyn DownloadPort>,
        engine: Arc<EngineService>,
        notifier: Arc<Notifier>,
        library: Arc<LibraryController<CharacterLibrary>>,
        previews: PreviewStore,
        cloud_key_configured: bool,
    ) -> Self {
        Self {
            api,
            downloads,
            engine,
            notifier,
            library,
            state: RwLock::new(CharacterState::new(previews)),
            catalog: RwLock::new(RuleCatalog::default()),
            busy: CharacterBusy::default(),
            cloud_key_configured,
        }
    }

    pub fn library(&self) -> &Arc<LibraryController<CharacterLibrary>> {
        &self.library
    }

    pub async fn view(&self) -> CharacterView {
        self.state.read().await.snapshot()
    }

    pub async fn catalog(&self) -> RuleCatalog {
        self.catalog.read().await.clone()
    }

    pub fn busy(&self) -> CharacterBusyView {
        CharacterBusyView {
            rolling: self.busy.roll.is_busy(),
            generating: self.busy.generate.is_busy(),
            backstory: self.busy.backstory.is_busy(),
            portrait: self.busy.portrait.is_busy(),
            progression: self.busy.progression.is_busy(),
            saving: self.busy.save.is_busy(),
            loading: self.busy.load.is_busy(),
            exporting: self.busy.export.is_busy(),
        }
    }

    /// Portrait bytes for display, if a portrait is held
    pub async fn portrait_bytes(&self) -> Option<Arc<Vec<u8>>> {
        self.state.read().await.portrait.bytes()
    }

    // =========================================================================
    // Reference data and selection
    // =========================================================================

    /// Fetch classes, races and backgrounds together. Any failure leaves all
    /// three lists empty.
    #[instrument(skip(self))]
    pub async fn load_rules(&self) -> Result<(), ForgeError> {
        let fetched = tokio::try_join!(
            self.api.list_classes(),
            self.api.list_races(),
            self.api.list_backgrounds()
        );
        match fetched {
            Ok((classes, races, backgrounds)) => {
                info!(
                    classes = classes.len(),
                    races = races.len(),
                    backgrounds = backgrounds.len(),
                    "Loaded reference lists"
                );
                *self.catalog.write().await = RuleCatalog::new(classes, races, backgrounds);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Failed to load reference lists");
                *self.catalog.write().await = RuleCatalog::default();
                Err(err.into())
            }
        }
    }

    pub async fn select_class(&self, index: impl Into<String>) {
        self.state.write().await.class_index = index.into();
    }

    pub async fn select_race(&self, index: impl Into<String>) {
        self.state.write().await.race_index = index.into();
    }

    pub async fn select_background(&self, index: impl Into<String>) {
        self.state.write().await.background_index = index.into();
    }

    pub async fn set_level(&self, level: i64) {
        self.state.write().await.set_level(level);
    }

    pub async fn set_seed_input(&self, input: &str) {
        self.state.write().await.set_seed_input(input);
    }

    /// Put `ability` on score slot `slot`, swapping with its previous slot
    pub async fn set_assignment_slot(&self, slot: usize, ability: Ability) -> bool {
        self.state.write().await.assignment.assign(slot, ability)
    }

    /// Replace the assignment with the selected class's priority order
    pub async fn auto_assign(&self) -> AbilityAssignment {
        let mut state = self.state.write().await;
        state.assignment = auto_assignment_for_class(&state.class_index);
        state.assignment.clone()
    }

    pub async fn set_name(&self, name: impl Into<String>) {
        self.state.write().await.name = name.into();
    }

    pub async fn set_backstory_options(&self, options: BackstoryOptions) {
        self.state.write().await.backstory_options = options;
    }

    pub async fn set_progression_options(&self, mut options: ProgressionOptions) {
        options.target_level = clamp_level(i64::from(options.target_level));
        self.state.write().await.progression_options = options;
    }

    /// Back to an empty creation form
    pub async fn reset(&self) {
        self.state.write().await.reset();
    }

    // =========================================================================
    // Generation
    // =========================================================================

    /// Roll a fresh ability set with the typed seed (if any). Clears the draft
    /// and everything derived from it.
    #[instrument(skip(self))]
    pub async fn roll_abilities(&self) -> Result<AbilitySet, ForgeError> {
        let seed = {
            let state = self.state.read().await;
            if !state.can_roll() {
                return Err(ForgeError::NotReady("pick a class, race and background first"));
            }
            parse_seed(&state.seed_input)
        };
        let _guard = acquire(&self.busy.roll, "roll")?;

        let set = self.api.roll_abilities(seed).await?;
        debug!(seed = ?set.seed, scores = ?set.scores, "Rolled abilities");
        self.state.write().await.set_abilities(set.clone());
        Ok(set)
    }

    /// Generate a draft from the current selection, roll and assignment
    #[instrument(skip(self))]
    pub async fn generate_draft(&self) -> Result<(), ForgeError> {
        let (request, scores, assignment, fallback_name) = {
            let state = self.state.read().await;
            if !state.can_generate() {
                return Err(ForgeError::NotReady("roll and assign abilities first"));
            }
            let scores = state
                .abilities
                .as_ref()
                .map(|set| set.scores.clone())
                .unwrap_or_default();
            let request = GenerateDraftRequest::new(
                state.class_index.clone(),
                state.race_index.clone(),
                state.background_index.clone(),
                state.level,
                &scores,
                &state.assignment,
            );
            let fallback = default_character_name(&state.race_index, &state.class_index);
            (request, scores, state.assignment.clone(), fallback)
        };
        let _guard = acquire(&self.busy.generate, "generate")?;

        let draft = self.api.generate_draft(&request).await?;
        let mut state = self.state.write().await;
        if !state.rolled_with(&scores, &assignment) {
            debug!("Abilities changed during generation, dropping draft");
            return Err(ForgeError::NotReady("abilities changed during generation"));
        }
        info!(class = %draft.cls, race = %draft.race, level = draft.level, "Generated draft");
        state.set_draft(draft, fallback_name);
        Ok(())
    }

    /// Random class, race and background, random seed, class-priority
    /// assignment and a draft, replacing whatever was there. With a cloud key
    /// configured a short heroic backstory is attempted as well.
    #[instrument(skip(self))]
    pub async fn quick_generate(&self) -> Result<(), ForgeError> {
        let (class, race, background, seed) = {
            let catalog = self.catalog.read().await;
            let mut rng = rand::thread_rng();
            let picked = (
                catalog.classes.choose(&mut rng).cloned(),
                catalog.races.choose(&mut rng).cloned(),
                catalog.backgrounds.choose(&mut rng).cloned(),
            );
            match picked {
                (Some(class), Some(race), Some(background)) => {
                    (class, race, background, rng.gen_range(0..QUICK_SEED_RANGE))
                }
                _ => return Err(ForgeError::NotReady("reference lists are not loaded")),
            }
        };
        let _guard = acquire(&self.busy.generate, "generate")?;
        info!(class = %class.index, race = %race.index, background = %background.index, seed, "Quick generate");

        {
            let mut state = self.state.write().await;
            state.reset();
            state.class_index = class.index.clone();
            state.race_index = race.index.clone();
            state.background_index = background.index.clone();
            state.seed_input = seed.to_string();
        }

        let set = self.api.roll_abilities(Some(seed)).await?;
        let assignment = auto_assignment_for_class(&class.index);
        let request = {
            let mut state = self.state.write().await;
            state.set_abilities(set.clone());
            state.assignment = assignment.clone();
            GenerateDraftRequest::new(
                class.index.clone(),
                race.index.clone(),
                background.index.clone(),
                state.level,
                &set.scores,
                &assignment,
            )
        };

        let draft = self.api.generate_draft(&request).await?;
        {
            let mut state = self.state.write().await;
            if !state.rolled_with(&set.scores, &assignment) {
                debug!("Abilities changed during quick generate, dropping draft");
                return Err(ForgeError::NotReady("abilities changed during generation"));
            }
            state.set_draft(draft, default_character_name(&race.name, &class.name));
        }

        if self.cloud_key_configured {
            match self
                .request_backstory(BackstoryOptions::quick(), GenerationEngine::Cloud)
                .await
            {
                Ok(_) => debug!("Quick backstory attached"),
                Err(err) => warn!(error = %err, "Quick backstory failed"),
            }
        }
        Ok(())
    }

    async fn request_backstory(
        &self,
        options: BackstoryOptions,
        engine: GenerationEngine,
    ) -> Result<BackstoryResult, ForgeError> {
        let request = {
            let mut state = self.state.write().await;
            let Some(named) = state.named_draft() else {
                return Err(ForgeError::NotReady("generate a draft first"));
            };
            state.draft = Some(named.clone());
            let name = state.name.trim();
            BackstoryRequest {
                name: (!name.is_empty()).then(|| name.to_string()),
                tone: options.tone,
                length: options.length,
                include_hooks: options.include_hooks,
                custom_inspiration: options.effective_inspiration(),
                draft: named,
            }
        };
        let result = self.api.generate_backstory(&request, engine).await?;
        self.state.write().await.backstory = Some(result.clone());
        Ok(result)
    }

    /// Generate a backstory with the current options and engine
    #[instrument(skip(self))]
    pub async fn generate_backstory(&self) -> Result<BackstoryResult, ForgeError> {
        let options = {
            let state = self.state.read().await;
            if state.draft.is_none() {
                return Err(ForgeError::NotReady("generate a draft first"));
            }
            state.backstory_options.clone()
        };
        let _guard = acquire(&self.busy.backstory, "backstory")?;
        let engine = self.engine.current().await;

        let result = self.request_backstory(options, engine).await?;
        info!(engine = %engine, "Generated backstory");
        self.notifier.success("Backstory ready");
        Ok(result)
    }

    /// Generate a portrait for the draft, replacing any previous one
    #[instrument(skip(self))]
    pub async fn generate_portrait(&self) -> Result<(), ForgeError> {
        let request = {
            let state = self.state.read().await;
            let draft = state
                .named_draft()
                .ok_or(ForgeError::NotReady("generate a draft first"))?;
            PortraitRequest {
                draft,
                backstory: state.backstory.clone(),
            }
        };
        let _guard = acquire(&self.busy.portrait, "portrait")?;
        let engine = self.engine.current().await;

        let bytes = self.api.generate_portrait(&request, engine).await?;
        info!(engine = %engine, size = bytes.len(), "Generated portrait");
        self.state.write().await.portrait.replace(bytes);
        self.notifier.success("Portrait generated");
        Ok(())
    }

    /// Generate a level-by-level plan for the draft
    #[instrument(skip(self))]
    pub async fn generate_progression(&self) -> Result<ProgressionPlan, ForgeError> {
        let request = {
            let state = self.state.read().await;
            let draft = state
                .named_draft()
                .ok_or(ForgeError::NotReady("generate a draft first"))?;
            let class_index = if state.class_index.is_empty() {
                draft.cls.to_lowercase()
            } else {
                state.class_index.clone()
            };
            ProgressionRequest {
                class_index,
                target_level: state.progression_options.target_level,
                allow_feats: state.progression_options.allow_feats,
                style: state.progression_options.style,
                draft,
            }
        };
        let _guard = acquire(&self.busy.progression, "progression")?;

        let plan = self.api.generate_progression(&request).await?;
        info!(class = %plan.class_index, target_level = plan.target_level, "Generated progression");
        self.state.write().await.progression = Some(plan.clone());
        Ok(plan)
    }

    /// Attach a plan (e.g. one fetched from the progression library) to the draft
    pub async fn attach_progression(&self, plan: ProgressionPlan) -> Result<(), ForgeError> {
        let mut state = self.state.write().await;
        if state.draft.is_none() {
            return Err(ForgeError::NotReady("generate a draft first"));
        }
        state.progression = Some(plan);
        Ok(())
    }

    pub async fn progression(&self) -> Option<ProgressionPlan> {
        self.state.read().await.progression.clone()
    }

    // =========================================================================
    // Library
    // =========================================================================

    /// Save the named draft with everything attached, then refresh the library
    #[instrument(skip(self))]
    pub async fn save(&self) -> Result<SavedRecord<CharacterId>, ForgeError> {
        let bundle = self
            .state
            .read()
            .await
            .bundle(true)
            .ok_or(ForgeError::NotReady("nothing to save"))?;
        let _guard = acquire(&self.busy.save, "save")?;

        let saved = self.api.save_character(&bundle).await?;
        {
            let mut state = self.state.write().await;
            if state.draft.is_some() {
                state.open_record = Some(saved.id);
            }
        }
        self.library.refresh_after_write().await;
        info!(character_id = %saved.id, "Saved character: {}", saved.name);
        self.notifier
            .success(format!("Saved #{}: {}", saved.id, saved.name));
        Ok(saved)
    }

    /// Load a saved character into the creation form
    #[instrument(skip(self), fields(character_id = %id))]
    pub async fn load(&self, id: CharacterId) -> Result<(), ForgeError> {
        let _guard = acquire(&self.busy.load, "load")?;
        let record = self.api.get_character(id).await?;
        let catalog = self.catalog.read().await;
        let mut state = self.state.write().await;

        let draft = record.draft;
        state.class_index = catalog
            .class_index_for(&draft.cls)
            .map(str::to_string)
            .unwrap_or_else(|| draft.cls.to_lowercase());
        state.race_index = catalog
            .race_index_for(&draft.race)
            .map(str::to_string)
            .unwrap_or_else(|| draft.race.to_lowercase());
        state.background_index = catalog
            .background_index_for(&draft.background)
            .map(str::to_string)
            .unwrap_or_else(|| draft.background.to_lowercase());
        state.level = clamp_level(i64::from(draft.level));

        let block = draft.abilities.clone();
        let set = AbilitySet::loaded(Ability::ALL.iter().map(|a| block.score(*a)));
        let assignment = AbilityAssignment::from_scores(&set.scores, |a| block.score(a));
        state.set_abilities(set);
        state.assignment = assignment;

        state.set_draft(draft, record.name.clone());
        state.backstory = record.backstory;
        state.progression = record.progression;
        if let Some(encoded) = record.portrait_base64.as_deref() {
            if let Err(err) = state.portrait.load_encoded(encoded) {
                warn!(character_id = %id, error = %err, "Stored portrait is unreadable");
            }
        }
        state.open_record = Some(id);
        info!(character_id = %id, "Loaded character: {}", record.name);
        Ok(())
    }

    /// Delete a saved character. The open draft is cleared only if it is that record.
    #[instrument(skip(self), fields(character_id = %id))]
    pub async fn delete(&self, id: CharacterId) -> Result<(), ForgeError> {
        self.library.delete(id).await?;
        let mut state = self.state.write().await;
        if state.open_record == Some(id) {
            state.discard(DerivedState::Draft);
            debug!(character_id = %id, "Closed deleted draft");
        }
        Ok(())
    }

    /// Drop the draft and everything attached to it
    pub async fn close(&self) {
        self.state.write().await.discard(DerivedState::Draft);
    }

    // =========================================================================
    // Exports
    // =========================================================================

    /// Render the draft on the server and hand the file to the download sink.
    /// Only the PDF carries the portrait.
    #[instrument(skip(self))]
    pub async fn export(&self, format: ExportFormat) -> Result<PathBuf, ForgeError> {
        let bundle = self
            .state
            .read()
            .await
            .bundle(format == ExportFormat::Pdf)
            .ok_or(ForgeError::NotReady("nothing to export"))?;
        let _guard = acquire(&self.busy.export, "export")?;
        let file = match format {
            ExportFormat::Json => self.api.export_character_json(&bundle).await?,
            ExportFormat::Markdown => self.api.export_character_markdown(&bundle).await?,
            ExportFormat::Pdf => self.api.export_character_pdf(&bundle).await?,
        };
        let path = self.downloads.deliver(&file).await?;
        info!(path = %path.display(), "Exported character");
        Ok(path)
    }

    /// Export the attached progression plan as Markdown or PDF
    #[instrument(skip(self))]
    pub async fn export_progression(&self, format: ExportFormat) -> Result<PathBuf, ForgeError> {
        let plan = self
            .state
            .read()
            .await
            .progression
            .clone()
            .ok_or(ForgeError::NotReady("generate a progression first"))?;
        let _guard = acquire(&self.busy.export, "export")?;
        let file = match format {
            ExportFormat::Pdf => self.api.export_progression_pdf(&plan).await?,
            ExportFormat::Markdown => self.api.export_progression_markdown(&plan).await?,
            ExportFormat::Json => {
                return Err(ForgeError::UnsupportedExport("progression JSON"))
            }
        };
        let path = self.downloads.deliver(&file).await?;
        info!(path = %path.display(), "Exported progression");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::CharacterBundle;
    use crate::application::services::library_service::LibraryController;
    use crate::application::services::test_support::{
        MemoryDownloads, MemoryPreferences, MockForgeApi, PNG_BYTES,
    };
    use crate::application::state::fixtures;
    use crate::domain::entities::{BackstoryLength, BackstoryTone};
    use std::time::Duration;

    struct Harness {
        api: Arc<MockForgeApi>,
        downloads: Arc<MemoryDownloads>,
        notifier: Arc<Notifier>,
        previews: PreviewStore,
        service: CharacterService,
    }

    async fn harness(cloud_key: bool) -> Harness {
        let api = Arc::new(MockForgeApi::new());
        let downloads = Arc::new(MemoryDownloads::default());
        let notifier = Arc::new(Notifier::new(Duration::from_secs(3)));
        let previews = PreviewStore::new();
        let engine = Arc::new(
            EngineService::load(api.clone(), Arc::new(MemoryPreferences::default())).await,
        );
        let library = Arc::new(LibraryController::new(
            CharacterLibrary(api.clone()),
            8,
            Duration::from_millis(300),
        ));
        let service = CharacterService::new(
            api.clone(),
            downloads.clone(),
            engine,
            notifier.clone(),
            library,
            previews.clone(),
            cloud_key,
        );
        service.load_rules().await.unwrap();
        Harness {
            api,
            downloads,
            notifier,
            previews,
            service,
        }
    }

    async fn select_all(service: &CharacterService) {
        service.select_class("fighter").await;
        service.select_race("half-elf").await;
        service.select_background("acolyte").await;
    }

    async fn generated(h: &Harness) {
        select_all(&h.service).await;
        h.service.roll_abilities().await.unwrap();
        h.service.generate_draft().await.unwrap();
    }

    #[tokio::test]
    async fn test_same_seed_rolls_same_set() {
        let h = harness(false).await;
        select_all(&h.service).await;
        h.service.set_seed_input("4x2").await;
        let first = h.service.roll_abilities().await.unwrap();
        let second = h.service.roll_abilities().await.unwrap();
        assert_eq!(first.seed, Some(42));
        assert_eq!(first, second);
        let mut sorted = first.scores.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(first.scores, sorted);
    }

    #[tokio::test]
    async fn test_roll_requires_full_selection() {
        let h = harness(false).await;
        h.service.select_class("fighter").await;
        let err = h.service.roll_abilities().await.unwrap_err();
        assert!(err.is_not_ready());
        assert_eq!(h.api.calls("roll/abilities"), 0);
    }

    #[tokio::test]
    async fn test_generate_without_roll_is_rejected() {
        let h = harness(false).await;
        select_all(&h.service).await;
        let err = h.service.generate_draft().await.unwrap_err();
        assert!(err.is_not_ready());
        assert_eq!(h.api.calls("generate"), 0);
        assert!(h.service.view().await.draft.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reroll_during_generation_drops_draft() {
        let h = harness(false).await;
        select_all(&h.service).await;
        h.service.roll_abilities().await.unwrap();
        h.service.set_assignment_slot(0, Ability::Cha).await;
        h.api.delay_generation(Duration::from_millis(200));

        let reroll = async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            h.service.roll_abilities().await.unwrap()
        };
        let (generated, rolled) = tokio::join!(h.service.generate_draft(), reroll);

        assert!(generated.unwrap_err().is_not_ready());
        assert_eq!(h.api.calls("generate"), 1);
        let view = h.service.view().await;
        assert!(view.draft.is_none());
        assert_eq!(view.abilities, Some(rolled));
        assert_eq!(view.assignment, AbilityAssignment::canonical());
    }

    #[tokio::test]
    async fn test_draft_gets_default_name() {
        let h = harness(false).await;
        generated(&h).await;
        let view = h.service.view().await;
        assert!(view.draft.is_some());
        assert_eq!(view.name, "Half-Elf Fighter");
    }

    #[tokio::test]
    async fn test_generation_failure_carries_status() {
        let h = harness(false).await;
        select_all(&h.service).await;
        h.service.roll_abilities().await.unwrap();
        h.api.fail_generation_with(502);
        match h.service.generate_draft().await {
            Err(ForgeError::Api(err)) => {
                assert_eq!(err.status(), Some(502));
                assert_eq!(err.to_string(), "generate failed: 502");
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert!(!h.service.busy().generating);
    }

    #[tokio::test]
    async fn test_quick_generate_fighter_priorities() {
        let h = harness(false).await;
        h.service.quick_generate().await.unwrap();
        let view = h.service.view().await;
        assert_eq!(view.class_index, "fighter");
        assert_eq!(
            &view.assignment.as_slice()[..3],
            &[Ability::Str, Ability::Con, Ability::Dex]
        );
        let seed: u64 = view.seed_input.parse().unwrap();
        assert!(seed < QUICK_SEED_RANGE);
        assert_eq!(view.abilities.unwrap().seed, Some(seed));
        assert_eq!(view.name, "Half-Elf Fighter");
        assert_eq!(h.api.calls("backstory"), 0);

        let request = h.api.last_draft_request().unwrap();
        assert_eq!(request.assignment[0], Ability::Str);
    }

    #[tokio::test]
    async fn test_quick_generate_adds_cloud_backstory() {
        let h = harness(true).await;
        h.service.quick_generate().await.unwrap();
        let (request, engine) = h.api.last_backstory().unwrap();
        assert_eq!(engine, GenerationEngine::Cloud);
        assert_eq!(request.tone, BackstoryTone::Heroic);
        assert_eq!(request.length, BackstoryLength::Short);
        assert!(request.include_hooks);
        assert!(h.service.view().await.backstory.is_some());
    }

    #[tokio::test]
    async fn test_quick_generate_swallows_backstory_failure() {
        let h = harness(true).await;
        h.api.fail_backstory();
        h.service.quick_generate().await.unwrap();
        let view = h.service.view().await;
        assert!(view.draft.is_some());
        assert!(view.backstory.is_none());
    }

    #[tokio::test]
    async fn test_quick_generate_needs_reference_lists() {
        let h = harness(false).await;
        h.api.fail_rules();
        assert!(h.service.load_rules().await.is_err());
        assert!(!h.service.catalog().await.is_loaded());
        assert!(h.service.catalog().await.races.is_empty());
        assert!(h.service.quick_generate().await.unwrap_err().is_not_ready());
    }

    #[tokio::test]
    async fn test_reroll_clears_draft_backstory_and_portrait() {
        let h = harness(false).await;
        generated(&h).await;
        h.service.generate_backstory().await.unwrap();
        h.service.generate_portrait().await.unwrap();
        assert_eq!(h.previews.live(), 1);

        h.service.roll_abilities().await.unwrap();

        let view = h.service.view().await;
        assert!(view.draft.is_none());
        assert!(view.backstory.is_none());
        assert!(view.portrait_url.is_none());
        assert_eq!(view.assignment, AbilityAssignment::canonical());
        assert_eq!(h.previews.live(), 0);
    }

    #[tokio::test]
    async fn test_backstory_sends_inspiration_only_for_custom_tone() {
        let h = harness(false).await;
        generated(&h).await;
        h.service.set_name(" Arwen Stormborn ").await;
        h.service
            .set_backstory_options(BackstoryOptions {
                tone: BackstoryTone::Noir,
                custom_inspiration: "rain-soaked docks".to_string(),
                ..BackstoryOptions::default()
            })
            .await;
        h.service.generate_backstory().await.unwrap();
        let (request, engine) = h.api.last_backstory().unwrap();
        assert_eq!(engine, GenerationEngine::Cloud);
        assert!(request.custom_inspiration.is_none());
        assert_eq!(request.name.as_deref(), Some("Arwen Stormborn"));
        assert_eq!(request.draft.name.as_deref(), Some("Arwen Stormborn"));

        h.service
            .set_backstory_options(BackstoryOptions {
                tone: BackstoryTone::Custom,
                custom_inspiration: "  rain-soaked docks ".to_string(),
                ..BackstoryOptions::default()
            })
            .await;
        h.service.generate_backstory().await.unwrap();
        let (request, _) = h.api.last_backstory().unwrap();
        assert_eq!(request.custom_inspiration.as_deref(), Some("rain-soaked docks"));

        let messages: Vec<String> = h.notifier.active().into_iter().map(|n| n.message).collect();
        assert!(messages.iter().all(|m| m == "Backstory ready"));
        assert_eq!(messages.len(), 2);
    }

    #[tokio::test]
    async fn test_backstory_without_draft_is_noop() {
        let h = harness(false).await;
        assert!(h.service.generate_backstory().await.unwrap_err().is_not_ready());
        assert!(h.service.generate_portrait().await.unwrap_err().is_not_ready());
        assert!(h.service.generate_progression().await.unwrap_err().is_not_ready());
        assert_eq!(h.api.calls("backstory"), 0);
        assert!(h.notifier.active().is_empty());
    }

    #[tokio::test]
    async fn test_portrait_is_replaced_not_leaked() {
        let h = harness(false).await;
        generated(&h).await;
        h.service.generate_portrait().await.unwrap();
        h.service.generate_portrait().await.unwrap();
        assert_eq!(h.previews.live(), 1);
        assert_eq!(
            h.service.portrait_bytes().await.as_deref(),
            Some(&PNG_BYTES.to_vec())
        );
        assert_eq!(h.notifier.active()[0].message, "Portrait generated");
    }

    #[tokio::test]
    async fn test_progression_is_cleared_with_new_draft() {
        let h = harness(false).await;
        generated(&h).await;
        h.service
            .set_progression_options(ProgressionOptions {
                target_level: 4,
                ..ProgressionOptions::default()
            })
            .await;
        let plan = h.service.generate_progression().await.unwrap();
        assert_eq!(plan.picks.len(), 3);
        h.service.generate_draft().await.unwrap();
        assert!(h.service.progression().await.is_none());
    }

    #[tokio::test]
    async fn test_save_then_list_round_trip() {
        let h = harness(false).await;
        generated(&h).await;
        h.service.set_name("Brom").await;
        let saved = h.service.save().await.unwrap();
        assert_eq!(saved.name, "Brom");

        let view = h.service.library().view().await;
        assert_eq!(view.total(), 1);
        assert_eq!(view.rows()[0].id, saved.id);
        assert_eq!(view.rows()[0].name, "Brom");
        assert_eq!(h.service.view().await.open_record, Some(saved.id));
        assert_eq!(
            h.notifier.active().last().unwrap().message,
            format!("Saved #{}: Brom", saved.id)
        );
    }

    #[tokio::test]
    async fn test_save_without_draft_is_rejected() {
        let h = harness(false).await;
        assert!(h.service.save().await.unwrap_err().is_not_ready());
        assert_eq!(h.api.stored_characters(), 0);
    }

    #[tokio::test]
    async fn test_delete_clears_only_matching_draft() {
        let h = harness(false).await;
        let other = h
            .api
            .save_character(&CharacterBundle {
                draft: fixtures::draft(Some("Someone Else")),
                backstory: None,
                portrait_base64: None,
                progression: None,
            })
            .await
            .unwrap();
        generated(&h).await;
        let mine = h.service.save().await.unwrap();

        h.service.delete(other.id).await.unwrap();
        assert!(h.service.view().await.draft.is_some());
        assert_eq!(h.service.library().view().await.total(), 1);

        h.service.delete(mine.id).await.unwrap();
        let view = h.service.view().await;
        assert!(view.draft.is_none());
        assert!(view.open_record.is_none());
        assert_eq!(h.service.library().view().await.total(), 0);
    }

    #[tokio::test]
    async fn test_load_restores_pickers_and_portrait() {
        let h = harness(false).await;
        let mut draft = fixtures::draft(Some("Brom"));
        draft.cls = "Fighter".to_string();
        draft.race = "Half-Elf".to_string();
        draft.background = "Acolyte".to_string();
        draft.level = 5;
        let saved = h
            .api
            .save_character(&CharacterBundle {
                draft,
                backstory: Some(fixtures::backstory()),
                portrait_base64: Some("iVBORw0KGgo=".to_string()),
                progression: None,
            })
            .await
            .unwrap();

        h.service.load(saved.id).await.unwrap();
        let view = h.service.view().await;
        assert_eq!(view.class_index, "fighter");
        assert_eq!(view.race_index, "half-elf");
        assert_eq!(view.background_index, "acolyte");
        assert_eq!(view.level, 5);
        assert_eq!(view.name, "Brom");
        assert_eq!(view.open_record, Some(saved.id));
        assert!(view.backstory.is_some());
        assert!(view.portrait_url.is_some());
        let abilities = view.abilities.unwrap();
        assert_eq!(abilities.method, "loaded");
        assert_eq!(abilities.scores, vec![15, 14, 13, 12, 10, 8]);
        assert_eq!(
            view.assignment.as_slice(),
            &[
                Ability::Str,
                Ability::Con,
                Ability::Dex,
                Ability::Wis,
                Ability::Cha,
                Ability::Int
            ]
        );
        assert!(view.can_generate);
    }

    #[tokio::test]
    async fn test_exports_go_to_download_sink() {
        let h = harness(false).await;
        assert!(h.service.export(ExportFormat::Pdf).await.unwrap_err().is_not_ready());
        generated(&h).await;
        h.service.export(ExportFormat::Json).await.unwrap();
        h.service.export(ExportFormat::Markdown).await.unwrap();
        let path = h.service.export(ExportFormat::Pdf).await.unwrap();
        assert!(path.ends_with("character.pdf"));
        assert_eq!(
            h.downloads.filenames(),
            vec!["character.json", "character.md", "character.pdf"]
        );

        assert!(h
            .service
            .export_progression(ExportFormat::Markdown)
            .await
            .unwrap_err()
            .is_not_ready());
        h.service.generate_progression().await.unwrap();
        h.service
            .export_progression(ExportFormat::Markdown)
            .await
            .unwrap();
        assert_eq!(h.downloads.filenames().last().unwrap(), "progression.md");
    }
}
