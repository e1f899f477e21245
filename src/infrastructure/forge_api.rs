//! Forge API client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::application::dto::{
    BackstoryRequest, CharacterBundle, CharacterRecord, CreatureEnvelope, CreatureRecord,
    CreatureRequest, DeleteAck, ExportFile, GenerateDraftRequest, HealthStatus, ItemEnvelope,
    MagicItemRecord, MagicItemRequest, ModelHealth, PlanEnvelope, PortraitRequest,
    ProgressionRecord, ProgressionRequest, SpellEnvelope, SpellRecord, SpellRequest,
};
use crate::application::ports::outbound::{ApiError, ForgeApiPort};
use crate::domain::entities::{
    BackstoryResult, CharacterDraft, Creature, ListResponse, MagicItem, ProgressionPlan,
    RuleList, RuleRef, SavedRecord, Spell,
};
use crate::domain::services::{file_stem, filename_from_disposition};
use crate::domain::value_objects::{
    AbilitySet, CharacterId, CreatureId, GenerationEngine, ListQuery, MagicItemId,
    ProgressionId, SpellId,
};

type Query<'a> = [(&'a str, String)];

/// Client for the Forge API
pub struct ForgeApiClient {
    client: Client,
    base_url: String,
}

impl ForgeApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(
        &self,
        endpoint: &'static str,
        request: RequestBuilder,
    ) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(|e| ApiError::Transport {
            endpoint,
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(endpoint, status = status.as_u16(), "Forge API request failed");
            return Err(ApiError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }
        debug!(endpoint, status = status.as_u16(), "Forge API request succeeded");
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(
        endpoint: &'static str,
        response: Response,
    ) -> Result<T, ApiError> {
        response.json::<T>().await.map_err(|e| ApiError::Decode {
            endpoint,
            message: e.to_string(),
        })
    }

    async fn bytes(endpoint: &'static str, response: Response) -> Result<Vec<u8>, ApiError> {
        let bytes = response.bytes().await.map_err(|e| ApiError::Transport {
            endpoint,
            message: e.to_string(),
        })?;
        Ok(bytes.to_vec())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
        query: &Query<'_>,
    ) -> Result<T, ApiError> {
        let request = self.client.get(self.url(path)).query(query);
        let response = self.send(endpoint, request).await?;
        Self::decode(endpoint, response).await
    }

    async fn post_json<B, T>(
        &self,
        endpoint: &'static str,
        path: &str,
        query: &Query<'_>,
        body: &B,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let request = self.client.post(self.url(path)).query(query).json(body);
        let response = self.send(endpoint, request).await?;
        Self::decode(endpoint, response).await
    }

    async fn post_for_bytes<B>(
        &self,
        endpoint: &'static str,
        path: &str,
        query: &Query<'_>,
        body: &B,
    ) -> Result<Vec<u8>, ApiError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let request = self.client.post(self.url(path)).query(query).json(body);
        let response = self.send(endpoint, request).await?;
        Self::bytes(endpoint, response).await
    }

    /// POST a body and keep the response as a downloadable file. The
    /// server's `Content-Disposition` filename wins over `fallback`.
    async fn post_for_file<B>(
        &self,
        endpoint: &'static str,
        path: &str,
        body: &B,
        fallback: String,
    ) -> Result<ExportFile, ApiError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let request = self.client.post(self.url(path)).json(body);
        let response = self.send(endpoint, request).await?;

        let headers = response.headers();
        let filename = headers
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(filename_from_disposition)
            .unwrap_or(fallback);
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = Self::bytes(endpoint, response).await?;
        let file = ExportFile::new(filename, bytes);
        Ok(match content_type {
            Some(content_type) => file.with_content_type(content_type),
            None => file,
        })
    }

    async fn delete(&self, endpoint: &'static str, path: &str) -> Result<(), ApiError> {
        let request = self.client.delete(self.url(path));
        let response = self.send(endpoint, request).await?;
        let ack: DeleteAck = Self::decode(endpoint, response).await?;
        if !ack.ok {
            warn!(endpoint, "Delete was not acknowledged");
        }
        Ok(())
    }

    async fn list<I: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
        query: &ListQuery,
    ) -> Result<ListResponse<I>, ApiError> {
        self.get_json(endpoint, path, &query.to_pairs()).await
    }

    async fn rules(&self, endpoint: &'static str, path: &str) -> Result<Vec<RuleRef>, ApiError> {
        let list: RuleList = self.get_json(endpoint, path, &[]).await?;
        Ok(list.results)
    }
}

fn engine_query(engine: GenerationEngine) -> [(&'static str, String); 1] {
    [("engine", engine.as_str().to_string())]
}

#[async_trait]
impl ForgeApiPort for ForgeApiClient {
    async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.get_json("health", "/health", &[]).await
    }

    async fn model_health(&self) -> Result<ModelHealth, ApiError> {
        self.get_json("health/model", "/health/model", &[]).await
    }

    async fn list_classes(&self) -> Result<Vec<RuleRef>, ApiError> {
        self.rules("rules/classes", "/api/rules/api/classes").await
    }

    async fn list_races(&self) -> Result<Vec<RuleRef>, ApiError> {
        self.rules("rules/races", "/api/rules/api/races").await
    }

    async fn list_backgrounds(&self) -> Result<Vec<RuleRef>, ApiError> {
        self.rules("rules/backgrounds", "/api/rules/api/backgrounds")
            .await
    }

    async fn roll_abilities(&self, seed: Option<u64>) -> Result<AbilitySet, ApiError> {
        let query: Vec<(&str, String)> = seed
            .map(|seed| vec![("seed", seed.to_string())])
            .unwrap_or_default();
        self.get_json("roll/abilities", "/api/roll/abilities", &query)
            .await
    }

    async fn generate_draft(
        &self,
        request: &GenerateDraftRequest,
    ) -> Result<CharacterDraft, ApiError> {
        self.post_json("generate", "/api/generate", &[], request).await
    }

    async fn generate_backstory(
        &self,
        request: &BackstoryRequest,
        engine: GenerationEngine,
    ) -> Result<BackstoryResult, ApiError> {
        self.post_json("backstory", "/api/backstory", &engine_query(engine), request)
            .await
    }

    async fn generate_portrait(
        &self,
        request: &PortraitRequest,
        engine: GenerationEngine,
    ) -> Result<Vec<u8>, ApiError> {
        self.post_for_bytes("portrait", "/api/portrait", &engine_query(engine), request)
            .await
    }

    async fn export_character_json(&self, bundle: &CharacterBundle) -> Result<ExportFile, ApiError> {
        self.post_for_file(
            "export/json",
            "/api/export/json",
            bundle,
            "character.json".to_string(),
        )
        .await
    }

    async fn export_character_markdown(
        &self,
        bundle: &CharacterBundle,
    ) -> Result<ExportFile, ApiError> {
        self.post_for_file("export/md", "/api/export/md", bundle, "character.md".to_string())
            .await
    }

    async fn export_character_pdf(&self, bundle: &CharacterBundle) -> Result<ExportFile, ApiError> {
        self.post_for_file(
            "export/pdf",
            "/api/export/pdf",
            bundle,
            "character.pdf".to_string(),
        )
        .await
    }

    async fn save_character(
        &self,
        bundle: &CharacterBundle,
    ) -> Result<SavedRecord<CharacterId>, ApiError> {
        self.post_json("library/save", "/api/library/save", &[], bundle)
            .await
    }

    async fn list_characters(
        &self,
        query: &ListQuery,
    ) -> Result<ListResponse<CharacterId>, ApiError> {
        self.list("library/list", "/api/library/list", query).await
    }

    async fn get_character(&self, id: CharacterId) -> Result<CharacterRecord, ApiError> {
        self.get_json("library/get", &format!("/api/library/get/{}", id), &[])
            .await
    }

    async fn delete_character(&self, id: CharacterId) -> Result<(), ApiError> {
        self.delete("library/delete", &format!("/api/library/delete/{}", id))
            .await
    }

    async fn generate_progression(
        &self,
        request: &ProgressionRequest,
    ) -> Result<ProgressionPlan, ApiError> {
        self.post_json("progression/generate", "/api/progression/generate", &[], request)
            .await
    }

    async fn export_progression_markdown(
        &self,
        plan: &ProgressionPlan,
    ) -> Result<ExportFile, ApiError> {
        let body = PlanEnvelope { plan: plan.clone() };
        self.post_for_file(
            "progression/export/md",
            "/api/progression/export/md",
            &body,
            "progression.md".to_string(),
        )
        .await
    }

    async fn export_progression_pdf(&self, plan: &ProgressionPlan) -> Result<ExportFile, ApiError> {
        let body = PlanEnvelope { plan: plan.clone() };
        self.post_for_file(
            "progression/export/pdf",
            "/api/progression/export/pdf",
            &body,
            "progression.pdf".to_string(),
        )
        .await
    }

    async fn save_progression(
        &self,
        plan: &ProgressionPlan,
    ) -> Result<SavedRecord<ProgressionId>, ApiError> {
        let body = PlanEnvelope { plan: plan.clone() };
        self.post_json("progression/save", "/api/progression/save", &[], &body)
            .await
    }

    async fn list_progressions(
        &self,
        query: &ListQuery,
    ) -> Result<ListResponse<ProgressionId>, ApiError> {
        self.list("progression/list", "/api/progression/list", query)
            .await
    }

    async fn get_progression(&self, id: ProgressionId) -> Result<ProgressionRecord, ApiError> {
        self.get_json(
            "progression/get",
            &format!("/api/progression/get/{}", id),
            &[],
        )
        .await
    }

    async fn delete_progression(&self, id: ProgressionId) -> Result<(), ApiError> {
        self.delete(
            "progression/delete",
            &format!("/api/progression/delete/{}", id),
        )
        .await
    }

    async fn generate_magic_item(
        &self,
        request: &MagicItemRequest,
        engine: GenerationEngine,
    ) -> Result<MagicItem, ApiError> {
        self.post_json(
            "items/generate",
            "/api/items/generate",
            &engine_query(engine),
            request,
        )
        .await
    }

    async fn export_magic_item_pdf(&self, item: &MagicItem) -> Result<ExportFile, ApiError> {
        let body = ItemEnvelope { item: item.clone() };
        self.post_for_file(
            "items/export/pdf",
            "/api/items/export/pdf",
            &body,
            format!("{}.pdf", file_stem(&item.name)),
        )
        .await
    }

    async fn save_magic_item(
        &self,
        item: &MagicItem,
    ) -> Result<SavedRecord<MagicItemId>, ApiError> {
        let body = ItemEnvelope { item: item.clone() };
        self.post_json("items/save", "/api/items/save", &[], &body).await
    }

    async fn list_magic_items(
        &self,
        query: &ListQuery,
    ) -> Result<ListResponse<MagicItemId>, ApiError> {
        self.list("items/list", "/api/items/list", query).await
    }

    async fn get_magic_item(&self, id: MagicItemId) -> Result<MagicItemRecord, ApiError> {
        self.get_json("items/get", &format!("/api/items/get/{}", id), &[])
            .await
    }

    async fn delete_magic_item(&self, id: MagicItemId) -> Result<(), ApiError> {
        self.delete("items/delete", &format!("/api/items/delete/{}", id))
            .await
    }

    async fn generate_spell(
        &self,
        request: &SpellRequest,
        engine: GenerationEngine,
    ) -> Result<Spell, ApiError> {
        self.post_json(
            "spells/generate",
            "/api/spells/generate",
            &engine_query(engine),
            request,
        )
        .await
    }

    async fn save_spell(&self, spell: &Spell) -> Result<SavedRecord<SpellId>, ApiError> {
        let body = SpellEnvelope {
            spell: spell.clone(),
        };
        self.post_json("spells/save", "/api/spells/save", &[], &body)
            .await
    }

    async fn list_spells(&self, query: &ListQuery) -> Result<ListResponse<SpellId>, ApiError> {
        self.list("spells/list", "/api/spells/list", query).await
    }

    async fn get_spell(&self, id: SpellId) -> Result<SpellRecord, ApiError> {
        self.get_json("spells/get", &format!("/api/spells/get/{}", id), &[])
            .await
    }

    async fn delete_spell(&self, id: SpellId) -> Result<(), ApiError> {
        self.delete("spells/delete", &format!("/api/spells/delete/{}", id))
            .await
    }

    async fn generate_creature(
        &self,
        request: &CreatureRequest,
        engine: GenerationEngine,
    ) -> Result<Creature, ApiError> {
        self.post_json(
            "creatures/generate",
            "/api/creatures/generate",
            &engine_query(engine),
            request,
        )
        .await
    }

    async fn generate_creature_portrait(
        &self,
        creature: &Creature,
        engine: GenerationEngine,
    ) -> Result<Vec<u8>, ApiError> {
        let body = CreatureEnvelope {
            creature: creature.clone(),
            portrait_base64: None,
        };
        self.post_for_bytes(
            "creatures/portrait",
            "/api/creatures/portrait",
            &engine_query(engine),
            &body,
        )
        .await
    }

    async fn save_creature(
        &self,
        envelope: &CreatureEnvelope,
    ) -> Result<SavedRecord<CreatureId>, ApiError> {
        self.post_json("creatures/save", "/api/creatures/save", &[], envelope)
            .await
    }

    async fn list_creatures(
        &self,
        query: &ListQuery,
    ) -> Result<ListResponse<CreatureId>, ApiError> {
        self.list("creatures/list", "/api/creatures/list", query).await
    }

    async fn get_creature(&self, id: CreatureId) -> Result<CreatureRecord, ApiError> {
        self.get_json("creatures/get", &format!("/api/creatures/get/{}", id), &[])
            .await
    }

    async fn delete_creature(&self, id: CreatureId) -> Result<(), ApiError> {
        self.delete("creatures/delete", &format!("/api/creatures/delete/{}", id))
            .await
    }
}
