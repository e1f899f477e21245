//! In-memory stand-ins for the outbound ports, shared by service tests

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::application::dto::{
    BackstoryRequest, CharacterBundle, CharacterRecord, CreatureEnvelope, CreatureRecord,
    CreatureRequest, ExportFile, GenerateDraftRequest, HealthStatus, ImageModelInfo,
    MagicItemRecord, MagicItemRequest, ModelHealth, PortraitRequest, ProgressionRecord,
    ProgressionRequest, SpellRecord, SpellRequest, TextModelInfo,
};
use crate::application::ports::outbound::{
    ApiError, DownloadError, DownloadPort, ForgeApiPort, PreferencesError, PreferencesPort,
};
use crate::domain::entities::{
    AbilityBlock, BackstoryResult, CharacterDraft, Creature, LevelPick, LibraryRow,
    ListResponse, MagicItem, ProgressionPlan, RuleRef, SavedRecord, Spell,
};
use crate::domain::value_objects::{
    Ability, AbilityRoll, AbilitySet, CharacterId, CreatureId, GenerationEngine, LibrarySort,
    ListQuery, MagicItemId, ProgressionId, RecordId, SpellId,
};

pub const PNG_BYTES: [u8; 8] = [0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a];

struct Stored<I, T> {
    id: I,
    name: String,
    created_at: String,
    value: T,
}

struct Store<I, T> {
    next_id: i64,
    rows: Vec<Stored<I, T>>,
}

impl<I: RecordId + From<i64>, T> Store<I, T> {
    fn new() -> Self {
        Self {
            next_id: 1,
            rows: Vec::new(),
        }
    }

    fn insert(&mut self, name: &str, value: T) -> SavedRecord<I> {
        let id = I::from(self.next_id);
        let created_at = format!("2024-05-01T10:{:02}:{:02}Z", self.next_id / 60, self.next_id % 60);
        self.next_id += 1;
        self.rows.push(Stored {
            id,
            name: name.to_string(),
            created_at: created_at.clone(),
            value,
        });
        SavedRecord {
            id,
            name: name.to_string(),
            created_at,
        }
    }

    fn get(&self, id: I) -> Option<&Stored<I, T>> {
        self.rows.iter().find(|row| row.id == id)
    }

    fn remove(&mut self, id: I) -> bool {
        let before = self.rows.len();
        self.rows.retain(|row| row.id != id);
        self.rows.len() != before
    }

    fn list(&self, query: &ListQuery) -> ListResponse<I> {
        let needle = query.search.to_lowercase();
        let mut matching: Vec<&Stored<I, T>> = self
            .rows
            .iter()
            .filter(|row| needle.is_empty() || row.name.to_lowercase().contains(&needle))
            .collect();
        match query.sort {
            LibrarySort::CreatedDesc => matching.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            LibrarySort::CreatedAsc => matching.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            LibrarySort::NameAsc => matching.sort_by(|a, b| a.name.cmp(&b.name)),
            LibrarySort::NameDesc => matching.sort_by(|a, b| b.name.cmp(&a.name)),
        }
        let total = matching.len() as u64;
        let skip = (query.page.saturating_sub(1) * query.limit) as usize;
        let items = matching
            .into_iter()
            .skip(skip)
            .take(query.limit as usize)
            .map(|row| LibraryRow {
                id: row.id,
                name: row.name.clone(),
                created_at: row.created_at.clone(),
                summary: Default::default(),
            })
            .collect();
        ListResponse { items, total }
    }
}

#[derive(Default)]
struct Failures {
    lists: Option<u16>,
    generation: Option<u16>,
    rules: bool,
    backstory: bool,
    health: bool,
}

/// In-memory Forge backend
pub struct MockForgeApi {
    characters: Mutex<Store<CharacterId, CharacterBundle>>,
    items: Mutex<Store<MagicItemId, MagicItem>>,
    spells: Mutex<Store<SpellId, Spell>>,
    creatures: Mutex<Store<CreatureId, CreatureEnvelope>>,
    progressions: Mutex<Store<ProgressionId, ProgressionPlan>>,
    calls: Mutex<HashMap<&'static str, usize>>,
    last_list_query: Mutex<Option<ListQuery>>,
    last_backstory: Mutex<Option<(BackstoryRequest, GenerationEngine)>>,
    last_draft_request: Mutex<Option<GenerateDraftRequest>>,
    failures: Mutex<Failures>,
    generation_delay: Mutex<Option<Duration>>,
}

impl Default for MockForgeApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockForgeApi {
    pub fn new() -> Self {
        Self {
            characters: Mutex::new(Store::new()),
            items: Mutex::new(Store::new()),
            spells: Mutex::new(Store::new()),
            creatures: Mutex::new(Store::new()),
            progressions: Mutex::new(Store::new()),
            calls: Mutex::new(HashMap::new()),
            last_list_query: Mutex::new(None),
            last_backstory: Mutex::new(None),
            last_draft_request: Mutex::new(None),
            failures: Mutex::new(Failures::default()),
            generation_delay: Mutex::new(None),
        }
    }

    fn record(&self, endpoint: &'static str) {
        *self.calls.lock().unwrap().entry(endpoint).or_default() += 1;
    }

    pub fn calls(&self, endpoint: &str) -> usize {
        self.calls.lock().unwrap().get(endpoint).copied().unwrap_or(0)
    }

    pub fn list_calls(&self) -> usize {
        self.calls.lock().unwrap().iter().filter(|(k, _)| k.ends_with("/list")).map(|(_, v)| v).sum()
    }

    pub fn last_list_query(&self) -> Option<ListQuery> {
        self.last_list_query.lock().unwrap().clone()
    }

    pub fn last_backstory(&self) -> Option<(BackstoryRequest, GenerationEngine)> {
        self.last_backstory.lock().unwrap().clone()
    }

    pub fn last_draft_request(&self) -> Option<GenerateDraftRequest> {
        self.last_draft_request.lock().unwrap().clone()
    }

    pub fn fail_lists_with(&self, status: u16) {
        self.failures.lock().unwrap().lists = Some(status);
    }

    pub fn fail_generation_with(&self, status: u16) {
        self.failures.lock().unwrap().generation = Some(status);
    }

    /// Hold every draft generation for `delay` before answering
    pub fn delay_generation(&self, delay: Duration) {
        *self.generation_delay.lock().unwrap() = Some(delay);
    }

    pub fn fail_rules(&self) {
        self.failures.lock().unwrap().rules = true;
    }

    pub fn fail_backstory(&self) {
        self.failures.lock().unwrap().backstory = true;
    }

    pub fn set_offline(&self, offline: bool) {
        self.failures.lock().unwrap().health = offline;
    }

    pub fn seed_spells(&self, count: usize) -> Vec<SpellId> {
        let mut store = self.spells.lock().unwrap();
        (0..count)
            .map(|i| {
                let spell = sample_spell(&format!("Spell {:02}", i + 1));
                store.insert(&spell.name.clone(), spell).id
            })
            .collect()
    }

    pub fn stored_characters(&self) -> usize {
        self.characters.lock().unwrap().rows.len()
    }

    fn check_list(&self, endpoint: &'static str, query: &ListQuery) -> Result<(), ApiError> {
        self.record(endpoint);
        *self.last_list_query.lock().unwrap() = Some(query.clone());
        match self.failures.lock().unwrap().lists {
            Some(status) => Err(ApiError::Status { endpoint, status }),
            None => Ok(()),
        }
    }

    fn check_generation(&self, endpoint: &'static str) -> Result<(), ApiError> {
        self.record(endpoint);
        match self.failures.lock().unwrap().generation {
            Some(status) => Err(ApiError::Status { endpoint, status }),
            None => Ok(()),
        }
    }

    fn not_found(endpoint: &'static str) -> ApiError {
        ApiError::Status {
            endpoint,
            status: 404,
        }
    }
}

pub fn roll_with_seed(seed: Option<u64>) -> AbilitySet {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let rolls: Vec<AbilityRoll> = (0..6)
        .map(|_| {
            let dice: Vec<u8> = (0..4).map(|_| rng.gen_range(1..=6)).collect();
            let (dropped_index, lowest) = dice
                .iter()
                .enumerate()
                .min_by_key(|(_, d)| **d)
                .map(|(i, d)| (i, *d))
                .unwrap();
            let total = dice.iter().map(|d| i32::from(*d)).sum::<i32>() - i32::from(lowest);
            AbilityRoll {
                dice,
                dropped_index,
                total,
            }
        })
        .collect();
    let mut scores: Vec<i32> = rolls.iter().map(|r| r.total).collect();
    scores.sort_unstable_by(|a, b| b.cmp(a));
    AbilitySet {
        method: "4d6-drop-lowest".to_string(),
        seed,
        rolls,
        scores,
    }
}

fn modifier(score: i32) -> i32 {
    (score - 10).div_euclid(2)
}

pub fn block_from(scores: &[i32], assignment: &[Ability]) -> AbilityBlock {
    let score_of = |ability: Ability| {
        assignment
            .iter()
            .position(|a| *a == ability)
            .and_then(|i| scores.get(i).copied())
            .unwrap_or(10)
    };
    AbilityBlock {
        strength: score_of(Ability::Str),
        dexterity: score_of(Ability::Dex),
        constitution: score_of(Ability::Con),
        intelligence: score_of(Ability::Int),
        wisdom: score_of(Ability::Wis),
        charisma: score_of(Ability::Cha),
        strength_mod: modifier(score_of(Ability::Str)),
        dexterity_mod: modifier(score_of(Ability::Dex)),
        constitution_mod: modifier(score_of(Ability::Con)),
        intelligence_mod: modifier(score_of(Ability::Int)),
        wisdom_mod: modifier(score_of(Ability::Wis)),
        charisma_mod: modifier(score_of(Ability::Cha)),
    }
}

pub fn sample_spell(name: &str) -> Spell {
    Spell {
        name: name.to_string(),
        level: 3,
        school: "Evocation".to_string(),
        classes: vec!["Wizard".to_string()],
        casting_time: "1 action".to_string(),
        range: "120 feet".to_string(),
        duration: "Instantaneous".to_string(),
        components: "V, S, M".to_string(),
        concentration: false,
        ritual: false,
        description: "A bright streak flashes to a point you choose.".to_string(),
        damage: Some("8d6 fire".to_string()),
        save: Some("DEX".to_string()),
    }
}

pub fn sample_item(name: &str) -> MagicItem {
    MagicItem {
        name: name.to_string(),
        item_type: "Ring".to_string(),
        rarity: "rare".to_string(),
        requires_attunement: true,
        description: "A band of cold iron.".to_string(),
        properties: vec!["Resistance to cold damage".to_string()],
        charges: Some(3),
        bonus: None,
        damage: None,
    }
}

pub fn sample_creature(name: &str) -> Creature {
    Creature {
        name: name.to_string(),
        size: "Large".to_string(),
        creature_type: "monstrosity".to_string(),
        challenge_rating: "3".to_string(),
        armor_class: 13,
        hit_points: 59,
        hit_dice: "7d10 + 21".to_string(),
        speed: "40 ft.".to_string(),
        ability_scores: block_from(&[20, 16, 12, 10, 7, 3], &[
            Ability::Str,
            Ability::Con,
            Ability::Dex,
            Ability::Wis,
            Ability::Cha,
            Ability::Int,
        ]),
        saving_throws: Vec::new(),
        skills: vec!["Perception +3".to_string()],
        damage_resistances: Vec::new(),
        damage_immunities: Vec::new(),
        condition_immunities: Vec::new(),
        senses: "darkvision 60 ft.".to_string(),
        languages: Vec::new(),
        traits: vec!["Keen Sight and Smell".to_string()],
        actions: vec!["Multiattack".to_string()],
        spells: Vec::new(),
        description: "Half bear, half owl.".to_string(),
    }
}

fn sample_backstory() -> BackstoryResult {
    BackstoryResult {
        summary: "Raised in a mountain hold.".to_string(),
        traits: vec!["Stubborn".to_string()],
        ideals: vec!["Honor".to_string()],
        bonds: vec!["The clan".to_string()],
        flaws: vec!["Holds grudges".to_string()],
        hooks: vec!["A stolen axe".to_string()],
        prose_markdown: "## Early Life\n\nStone and fire.".to_string(),
    }
}

#[async_trait]
impl ForgeApiPort for MockForgeApi {
    async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.record("health");
        if self.failures.lock().unwrap().health {
            return Err(ApiError::Transport {
                endpoint: "health",
                message: "connection refused".to_string(),
            });
        }
        Ok(HealthStatus { ok: true })
    }

    async fn model_health(&self) -> Result<ModelHealth, ApiError> {
        self.record("health/model");
        if self.failures.lock().unwrap().health {
            return Err(ApiError::Status {
                endpoint: "health/model",
                status: 503,
            });
        }
        Ok(ModelHealth {
            mode_default: "local".to_string(),
            image: ImageModelInfo {
                model: "sdxl-turbo".to_string(),
                base_model: "sdxl".to_string(),
                device: "cpu".to_string(),
                dtype: "float32".to_string(),
            },
            text: TextModelInfo {
                url: "http://localhost:11434".to_string(),
                model: "llama3".to_string(),
                reachable: true,
            },
        })
    }

    async fn list_classes(&self) -> Result<Vec<RuleRef>, ApiError> {
        self.record("rules/classes");
        if self.failures.lock().unwrap().rules {
            return Err(ApiError::Status {
                endpoint: "rules/classes",
                status: 502,
            });
        }
        Ok(vec![RuleRef::new("fighter", "Fighter")])
    }

    async fn list_races(&self) -> Result<Vec<RuleRef>, ApiError> {
        self.record("rules/races");
        Ok(vec![RuleRef::new("half-elf", "Half-Elf")])
    }

    async fn list_backgrounds(&self) -> Result<Vec<RuleRef>, ApiError> {
        self.record("rules/backgrounds");
        Ok(vec![RuleRef::new("acolyte", "Acolyte")])
    }

    async fn roll_abilities(&self, seed: Option<u64>) -> Result<AbilitySet, ApiError> {
        self.record("roll/abilities");
        Ok(roll_with_seed(seed))
    }

    async fn generate_draft(
        &self,
        request: &GenerateDraftRequest,
    ) -> Result<CharacterDraft, ApiError> {
        self.check_generation("generate")?;
        *self.last_draft_request.lock().unwrap() = Some(request.clone());
        let delay = *self.generation_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(CharacterDraft {
            name: None,
            level: request.level,
            cls: request.class_index.clone(),
            race: request.race_index.clone(),
            background: request.background_index.clone(),
            hit_die: 10,
            proficiency_bonus: 2,
            abilities: block_from(&request.scores, &request.assignment),
            speed: 30,
            saving_throws: vec!["STR".to_string(), "CON".to_string()],
            languages: vec!["Common".to_string()],
            proficiencies: Vec::new(),
            equipment: Vec::new(),
            armor_class_basic: 10,
            features: Vec::new(),
            spell_slots: None,
        })
    }

    async fn generate_backstory(
        &self,
        request: &BackstoryRequest,
        engine: GenerationEngine,
    ) -> Result<BackstoryResult, ApiError> {
        self.record("backstory");
        *self.last_backstory.lock().unwrap() = Some((request.clone(), engine));
        if self.failures.lock().unwrap().backstory {
            return Err(ApiError::Status {
                endpoint: "backstory",
                status: 500,
            });
        }
        Ok(sample_backstory())
    }

    async fn generate_portrait(
        &self,
        _request: &PortraitRequest,
        _engine: GenerationEngine,
    ) -> Result<Vec<u8>, ApiError> {
        self.check_generation("portrait")?;
        Ok(PNG_BYTES.to_vec())
    }

    async fn export_character_json(&self, bundle: &CharacterBundle) -> Result<ExportFile, ApiError> {
        self.record("export/json");
        let bytes = serde_json::to_vec(bundle).unwrap();
        Ok(ExportFile::new("character.json", bytes))
    }

    async fn export_character_markdown(
        &self,
        bundle: &CharacterBundle,
    ) -> Result<ExportFile, ApiError> {
        self.record("export/md");
        Ok(ExportFile::new(
            "character.md",
            format!("# {}\n", bundle.draft.display_name()).into_bytes(),
        ))
    }

    async fn export_character_pdf(&self, _bundle: &CharacterBundle) -> Result<ExportFile, ApiError> {
        self.record("export/pdf");
        Ok(ExportFile::new("character.pdf", b"%PDF-1.4".to_vec()))
    }

    async fn save_character(
        &self,
        bundle: &CharacterBundle,
    ) -> Result<SavedRecord<CharacterId>, ApiError> {
        self.record("library/save");
        let name = bundle.draft.display_name();
        Ok(self.characters.lock().unwrap().insert(&name, bundle.clone()))
    }

    async fn list_characters(
        &self,
        query: &ListQuery,
    ) -> Result<ListResponse<CharacterId>, ApiError> {
        self.check_list("library/list", query)?;
        Ok(self.characters.lock().unwrap().list(query))
    }

    async fn get_character(&self, id: CharacterId) -> Result<CharacterRecord, ApiError> {
        self.record("library/get");
        let store = self.characters.lock().unwrap();
        let row = store.get(id).ok_or_else(|| Self::not_found("library/get"))?;
        Ok(CharacterRecord {
            id: row.id,
            name: row.name.clone(),
            created_at: row.created_at.clone(),
            draft: row.value.draft.clone(),
            backstory: row.value.backstory.clone(),
            progression: row.value.progression.clone(),
            portrait_base64: row.value.portrait_base64.clone(),
        })
    }

    async fn delete_character(&self, id: CharacterId) -> Result<(), ApiError> {
        self.record("library/delete");
        if self.characters.lock().unwrap().remove(id) {
            Ok(())
        } else {
            Err(Self::not_found("library/delete"))
        }
    }

    async fn generate_progression(
        &self,
        request: &ProgressionRequest,
    ) -> Result<ProgressionPlan, ApiError> {
        self.check_generation("progression/generate")?;
        let picks = (2..=request.target_level)
            .map(|level| LevelPick {
                level,
                hp_gain: Some(6),
                features: vec![format!("Level {} feature", level)],
                subclass: None,
                asi: None,
                spells_known: Vec::new(),
                prepared: Vec::new(),
                notes: None,
            })
            .collect();
        Ok(ProgressionPlan {
            name: request.draft.name.clone(),
            class_index: request.class_index.clone(),
            target_level: request.target_level,
            picks,
            notes_markdown: String::new(),
        })
    }

    async fn export_progression_markdown(
        &self,
        _plan: &ProgressionPlan,
    ) -> Result<ExportFile, ApiError> {
        self.record("progression/export/md");
        Ok(ExportFile::new("progression.md", b"# Plan".to_vec()))
    }

    async fn export_progression_pdf(&self, _plan: &ProgressionPlan) -> Result<ExportFile, ApiError> {
        self.record("progression/export/pdf");
        Ok(ExportFile::new("progression.pdf", b"%PDF-1.4".to_vec()))
    }

    async fn save_progression(
        &self,
        plan: &ProgressionPlan,
    ) -> Result<SavedRecord<ProgressionId>, ApiError> {
        self.record("progression/save");
        let name = plan
            .name
            .clone()
            .unwrap_or_else(|| format!("{} to {}", plan.class_index, plan.target_level));
        Ok(self.progressions.lock().unwrap().insert(&name, plan.clone()))
    }

    async fn list_progressions(
        &self,
        query: &ListQuery,
    ) -> Result<ListResponse<ProgressionId>, ApiError> {
        self.check_list("progression/list", query)?;
        Ok(self.progressions.lock().unwrap().list(query))
    }

    async fn get_progression(&self, id: ProgressionId) -> Result<ProgressionRecord, ApiError> {
        self.record("progression/get");
        let store = self.progressions.lock().unwrap();
        let row = store
            .get(id)
            .ok_or_else(|| Self::not_found("progression/get"))?;
        Ok(ProgressionRecord {
            id: row.id,
            name: row.name.clone(),
            created_at: row.created_at.clone(),
            plan: row.value.clone(),
        })
    }

    async fn delete_progression(&self, id: ProgressionId) -> Result<(), ApiError> {
        self.record("progression/delete");
        self.progressions.lock().unwrap().remove(id);
        Ok(())
    }

    async fn generate_magic_item(
        &self,
        request: &MagicItemRequest,
        _engine: GenerationEngine,
    ) -> Result<MagicItem, ApiError> {
        self.check_generation("items/generate")?;
        let name = request.name.clone().unwrap_or_else(|| "Ring of Frost".to_string());
        let mut item = sample_item(&name);
        if let Some(rarity) = &request.rarity {
            item.rarity = rarity.clone();
        }
        Ok(item)
    }

    async fn export_magic_item_pdf(&self, item: &MagicItem) -> Result<ExportFile, ApiError> {
        self.record("items/export/pdf");
        Ok(ExportFile::new(
            format!("{}.pdf", item.name.replace(' ', "_")),
            b"%PDF-1.4".to_vec(),
        ))
    }

    async fn save_magic_item(
        &self,
        item: &MagicItem,
    ) -> Result<SavedRecord<MagicItemId>, ApiError> {
        self.record("items/save");
        Ok(self.items.lock().unwrap().insert(&item.name, item.clone()))
    }

    async fn list_magic_items(
        &self,
        query: &ListQuery,
    ) -> Result<ListResponse<MagicItemId>, ApiError> {
        self.check_list("items/list", query)?;
        Ok(self.items.lock().unwrap().list(query))
    }

    async fn get_magic_item(&self, id: MagicItemId) -> Result<MagicItemRecord, ApiError> {
        self.record("items/get");
        let store = self.items.lock().unwrap();
        let row = store.get(id).ok_or_else(|| Self::not_found("items/get"))?;
        Ok(MagicItemRecord {
            id: row.id,
            name: row.name.clone(),
            created_at: row.created_at.clone(),
            item: row.value.clone(),
        })
    }

    async fn delete_magic_item(&self, id: MagicItemId) -> Result<(), ApiError> {
        self.record("items/delete");
        self.items.lock().unwrap().remove(id);
        Ok(())
    }

    async fn generate_spell(
        &self,
        request: &SpellRequest,
        _engine: GenerationEngine,
    ) -> Result<Spell, ApiError> {
        self.check_generation("spells/generate")?;
        let mut spell = sample_spell(request.name.as_deref().unwrap_or("Ember Lance"));
        if let Some(level) = request.level {
            spell.level = level;
        }
        Ok(spell)
    }

    async fn save_spell(&self, spell: &Spell) -> Result<SavedRecord<SpellId>, ApiError> {
        self.record("spells/save");
        Ok(self.spells.lock().unwrap().insert(&spell.name, spell.clone()))
    }

    async fn list_spells(&self, query: &ListQuery) -> Result<ListResponse<SpellId>, ApiError> {
        self.check_list("spells/list", query)?;
        Ok(self.spells.lock().unwrap().list(query))
    }

    async fn get_spell(&self, id: SpellId) -> Result<SpellRecord, ApiError> {
        self.record("spells/get");
        let store = self.spells.lock().unwrap();
        let row = store.get(id).ok_or_else(|| Self::not_found("spells/get"))?;
        Ok(SpellRecord {
            id: row.id,
            name: row.name.clone(),
            created_at: row.created_at.clone(),
            spell: row.value.clone(),
        })
    }

    async fn delete_spell(&self, id: SpellId) -> Result<(), ApiError> {
        self.record("spells/delete");
        self.spells.lock().unwrap().remove(id);
        Ok(())
    }

    async fn generate_creature(
        &self,
        request: &CreatureRequest,
        _engine: GenerationEngine,
    ) -> Result<Creature, ApiError> {
        self.check_generation("creatures/generate")?;
        Ok(sample_creature(request.name.as_deref().unwrap_or("Owlbear")))
    }

    async fn generate_creature_portrait(
        &self,
        _creature: &Creature,
        _engine: GenerationEngine,
    ) -> Result<Vec<u8>, ApiError> {
        self.check_generation("creatures/portrait")?;
        Ok(PNG_BYTES.to_vec())
    }

    async fn save_creature(
        &self,
        envelope: &CreatureEnvelope,
    ) -> Result<SavedRecord<CreatureId>, ApiError> {
        self.record("creatures/save");
        Ok(self
            .creatures
            .lock()
            .unwrap()
            .insert(&envelope.creature.name, envelope.clone()))
    }

    async fn list_creatures(
        &self,
        query: &ListQuery,
    ) -> Result<ListResponse<CreatureId>, ApiError> {
        self.check_list("creatures/list", query)?;
        Ok(self.creatures.lock().unwrap().list(query))
    }

    async fn get_creature(&self, id: CreatureId) -> Result<CreatureRecord, ApiError> {
        self.record("creatures/get");
        let store = self.creatures.lock().unwrap();
        let row = store.get(id).ok_or_else(|| Self::not_found("creatures/get"))?;
        Ok(CreatureRecord {
            id: row.id,
            name: row.name.clone(),
            created_at: row.created_at.clone(),
            creature: row.value.creature.clone(),
            portrait_base64: row.value.portrait_base64.clone(),
        })
    }

    async fn delete_creature(&self, id: CreatureId) -> Result<(), ApiError> {
        self.record("creatures/delete");
        self.creatures.lock().unwrap().remove(id);
        Ok(())
    }
}

/// Collects delivered files instead of writing them
#[derive(Default)]
pub struct MemoryDownloads {
    pub files: Mutex<Vec<ExportFile>>,
}

impl MemoryDownloads {
    pub fn filenames(&self) -> Vec<String> {
        self.files
            .lock()
            .unwrap()
            .iter()
            .map(|f| f.filename.clone())
            .collect()
    }
}

#[async_trait]
impl DownloadPort for MemoryDownloads {
    async fn deliver(&self, file: &ExportFile) -> Result<PathBuf, DownloadError> {
        self.files.lock().unwrap().push(file.clone());
        Ok(PathBuf::from("/downloads").join(&file.filename))
    }
}

#[derive(Default)]
pub struct MemoryPreferences {
    pub engine: Mutex<Option<GenerationEngine>>,
}

#[async_trait]
impl PreferencesPort for MemoryPreferences {
    async fn load_engine(&self) -> Result<Option<GenerationEngine>, PreferencesError> {
        Ok(*self.engine.lock().unwrap())
    }

    async fn save_engine(&self, engine: GenerationEngine) -> Result<(), PreferencesError> {
        *self.engine.lock().unwrap() = Some(engine);
        Ok(())
    }
}
