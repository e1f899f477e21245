//! Outbound port for the Forge REST API

use async_trait::async_trait;

use crate::application::dto::{
    BackstoryRequest, CharacterBundle, CharacterRecord, CreatureEnvelope, CreatureRecord,
    CreatureRequest, ExportFile, GenerateDraftRequest, HealthStatus, MagicItemRecord,
    MagicItemRequest, ModelHealth, PortraitRequest, ProgressionRecord, ProgressionRequest,
    SpellRecord, SpellRequest,
};
use crate::domain::entities::{
    BackstoryResult, CharacterDraft, Creature, ListResponse, MagicItem, ProgressionPlan,
    RuleRef, SavedRecord, Spell,
};
use crate::domain::value_objects::{
    AbilitySet, CharacterId, CreatureId, GenerationEngine, ListQuery, MagicItemId,
    ProgressionId, SpellId,
};

/// Failure talking to the Forge API. Never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("{endpoint} failed: {status}")]
    Status { endpoint: &'static str, status: u16 },
    #[error("{endpoint} request failed: {message}")]
    Transport {
        endpoint: &'static str,
        message: String,
    },
    #[error("{endpoint} returned an unreadable body: {message}")]
    Decode {
        endpoint: &'static str,
        message: String,
    },
}

impl ApiError {
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Status { endpoint, .. }
            | Self::Transport { endpoint, .. }
            | Self::Decode { endpoint, .. } => endpoint,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Typed surface of every endpoint the client consumes
#[async_trait]
pub trait ForgeApiPort: Send + Sync {
    // Health
    async fn health(&self) -> Result<HealthStatus, ApiError>;
    async fn model_health(&self) -> Result<ModelHealth, ApiError>;

    // Rules
    async fn list_classes(&self) -> Result<Vec<RuleRef>, ApiError>;
    async fn list_races(&self) -> Result<Vec<RuleRef>, ApiError>;
    async fn list_backgrounds(&self) -> Result<Vec<RuleRef>, ApiError>;

    // Character creation
    async fn roll_abilities(&self, seed: Option<u64>) -> Result<AbilitySet, ApiError>;
    async fn generate_draft(
        &self,
        request: &GenerateDraftRequest,
    ) -> Result<CharacterDraft, ApiError>;
    async fn generate_backstory(
        &self,
        request: &BackstoryRequest,
        engine: GenerationEngine,
    ) -> Result<BackstoryResult, ApiError>;
    async fn generate_portrait(
        &self,
        request: &PortraitRequest,
        engine: GenerationEngine,
    ) -> Result<Vec<u8>, ApiError>;

    // Character exports
    async fn export_character_json(&self, bundle: &CharacterBundle) -> Result<ExportFile, ApiError>;
    async fn export_character_markdown(
        &self,
        bundle: &CharacterBundle,
    ) -> Result<ExportFile, ApiError>;
    async fn export_character_pdf(&self, bundle: &CharacterBundle) -> Result<ExportFile, ApiError>;

    // Character library
    async fn save_character(
        &self,
        bundle: &CharacterBundle,
    ) -> Result<SavedRecord<CharacterId>, ApiError>;
    async fn list_characters(&self, query: &ListQuery)
        -> Result<ListResponse<CharacterId>, ApiError>;
    async fn get_character(&self, id: CharacterId) -> Result<CharacterRecord, ApiError>;
    async fn delete_character(&self, id: CharacterId) -> Result<(), ApiError>;

    // Progression
    async fn generate_progression(
        &self,
        request: &ProgressionRequest,
    ) -> Result<ProgressionPlan, ApiError>;
    async fn export_progression_markdown(
        &self,
        plan: &ProgressionPlan,
    ) -> Result<ExportFile, ApiError>;
    async fn export_progression_pdf(&self, plan: &ProgressionPlan) -> Result<ExportFile, ApiError>;
    async fn save_progression(
        &self,
        plan: &ProgressionPlan,
    ) -> Result<SavedRecord<ProgressionId>, ApiError>;
    async fn list_progressions(
        &self,
        query: &ListQuery,
    ) -> Result<ListResponse<ProgressionId>, ApiError>;
    async fn get_progression(&self, id: ProgressionId) -> Result<ProgressionRecord, ApiError>;
    async fn delete_progression(&self, id: ProgressionId) -> Result<(), ApiError>;

    // Magic items
    async fn generate_magic_item(
        &self,
        request: &MagicItemRequest,
        engine: GenerationEngine,
    ) -> Result<MagicItem, ApiError>;
    async fn export_magic_item_pdf(&self, item: &MagicItem) -> Result<ExportFile, ApiError>;
    async fn save_magic_item(&self, item: &MagicItem)
        -> Result<SavedRecord<MagicItemId>, ApiError>;
    async fn list_magic_items(&self, query: &ListQuery)
        -> Result<ListResponse<MagicItemId>, ApiError>;
    async fn get_magic_item(&self, id: MagicItemId) -> Result<MagicItemRecord, ApiError>;
    async fn delete_magic_item(&self, id: MagicItemId) -> Result<(), ApiError>;

    // Spells
    async fn generate_spell(
        &self,
        request: &SpellRequest,
        engine: GenerationEngine,
    ) -> Result<Spell, ApiError>;
    async fn save_spell(&self, spell: &Spell) -> Result<SavedRecord<SpellId>, ApiError>;
    async fn list_spells(&self, query: &ListQuery) -> Result<ListResponse<SpellId>, ApiError>;
    async fn get_spell(&self, id: SpellId) -> Result<SpellRecord, ApiError>;
    async fn delete_spell(&self, id: SpellId) -> Result<(), ApiError>;

    // Creatures
    async fn generate_creature(
        &self,
        request: &CreatureRequest,
        engine: GenerationEngine,
    ) -> Result<Creature, ApiError>;
    async fn generate_creature_portrait(
        &self,
        creature: &Creature,
        engine: GenerationEngine,
    ) -> Result<Vec<u8>, ApiError>;
    async fn save_creature(
        &self,
        envelope: &CreatureEnvelope,
    ) -> Result<SavedRecord<CreatureId>, ApiError>;
    async fn list_creatures(&self, query: &ListQuery)
        -> Result<ListResponse<CreatureId>, ApiError>;
    async fn get_creature(&self, id: CreatureId) -> Result<CreatureRecord, ApiError>;
    async fn delete_creature(&self, id: CreatureId) -> Result<(), ApiError>;
}
