/*!
 * Extraction and re-injection of quest texts.
 *
 * A document is walked once, read-only, into a list of [`TextSlot`]s. Each
 * slot carries the synthetic key of one player-visible field together with
 * the JSON pointers of every physical key holding it. Extraction filters the
 * slots; re-injection writes through their pointers, so both directions agree
 * on ids by construction.
 */

use std::fs;
use std::path::Path;

use log::{debug, info};
use serde_json::{Map, Value};

use crate::errors::QuestError;
use crate::quests::dialect::{BagLayout, Dialect, strip_tag};
use crate::quests::filter::{is_player_message, is_translatable_text};
use crate::translation::TranslationData;

/// How a slot's text is screened before extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    /// Free text, screened by [`is_translatable_text`]
    Text,
    /// Reward command, screened by [`is_player_message`]
    Command,
}

/// One player-visible field of a quest document
#[derive(Debug, Clone, PartialEq)]
pub struct TextSlot {
    /// Synthetic key such as `quest.3.name`
    pub key: String,
    /// Current text of the field
    pub text: String,
    pub kind: SlotKind,
    /// JSON pointers of every key holding the field
    pointers: Vec<String>,
}

impl TextSlot {
    /// Whether the text should be offered for translation
    pub fn is_translatable(&self) -> bool {
        match self.kind {
            SlotKind::Text => is_translatable_text(&self.text),
            SlotKind::Command => is_translatable_text(&self.text) && is_player_message(&self.text),
        }
    }

    pub fn pointers(&self) -> &[String] {
        &self.pointers
    }
}

/// A BetterQuesting document in either dialect
#[derive(Debug, Clone, PartialEq)]
pub struct QuestDocument {
    root: Value,
    dialect: Dialect,
}

impl QuestDocument {
    pub fn from_value(root: Value) -> Self {
        let dialect = root.as_object().map(|map| BagLayout::detect(map).dialect()).unwrap_or_default();
        Self { root, dialect }
    }

    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text).map(Self::from_value)
    }

    /// Read and parse a quest file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, QuestError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| QuestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let document = Self::parse(&content).map_err(|source| QuestError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded {:?} quest document {}", document.dialect, path.display());
        Ok(document)
    }

    /// Dialect of the top-level keys
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn as_value(&self) -> &Value {
        &self.root
    }

    /// Every text field the walker knows about, admissible or not
    pub fn slots(&self) -> Vec<TextSlot> {
        let mut walker = SlotWalker::default();
        if let Some(root) = self.root.as_object() {
            walker.walk_root(root);
        }
        walker.slots
    }

    /// Synthetic key to text for every admissible field
    pub fn extract(&self) -> TranslationData {
        self.slots()
            .into_iter()
            .filter(TextSlot::is_translatable)
            .map(|slot| (slot.key, slot.text))
            .collect()
    }

    /// Write translations back into the fields they were extracted from.
    ///
    /// Both the plain and the tagged key are overwritten when a field has
    /// both. Unknown keys are ignored. Returns the number of fields updated.
    pub fn apply(&mut self, translations: &TranslationData) -> usize {
        let mut updated = 0;
        for slot in self.slots() {
            let Some(translation) = translations.get(&slot.key) else {
                continue;
            };
            for pointer in &slot.pointers {
                if let Some(target) = self.root.pointer_mut(pointer) {
                    *target = Value::String(translation.clone());
                }
            }
            updated += 1;
        }
        updated
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.root)
    }

    /// Write the document as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), QuestError> {
        let path = path.as_ref();
        let write_error = |message: String| QuestError::Write {
            path: path.to_path_buf(),
            message,
        };

        let content = self.to_json_pretty().map_err(|e| write_error(e.to_string()))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| write_error(e.to_string()))?;
        }
        fs::write(path, content).map_err(|e| write_error(e.to_string()))?;

        info!("Wrote quest document {}", path.display());
        Ok(())
    }
}

/// Escape one JSON pointer reference token
fn pointer_token(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

fn child_pointer(base: &str, key: &str) -> String {
    format!("{}/{}", base, pointer_token(key))
}

/// Children of an object or array as `(id, physical key, value)`
fn entries(value: &Value) -> Vec<(String, String, &Value)> {
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(key, child)| (strip_tag(key).to_string(), key.clone(), child))
            .collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, child)| (index.to_string(), index.to_string(), child))
            .collect(),
        _ => Vec::new(),
    }
}

/// Numeric or string id field of an object
fn id_field(map: &Map<String, Value>, layout: &BagLayout, field: &str) -> Option<String> {
    match layout.get(map, field)?.1 {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

#[derive(Default)]
struct SlotWalker {
    slots: Vec<TextSlot>,
}

impl SlotWalker {
    fn walk_root(&mut self, root: &Map<String, Value>) {
        let layout = BagLayout::detect(root);

        if let Some((key, database)) = layout.get(root, "questDatabase") {
            let pointer = child_pointer("", key);
            for (container_id, child_key, quest) in entries(database) {
                if let Some(quest) = quest.as_object() {
                    self.walk_quest(quest, &container_id, &child_pointer(&pointer, &child_key));
                }
            }
        }

        if let Some((key, lines)) = layout.get(root, "questLines") {
            let pointer = child_pointer("", key);
            for (container_id, child_key, line) in entries(lines) {
                if let Some(line) = line.as_object() {
                    self.walk_line(line, &container_id, &child_pointer(&pointer, &child_key));
                }
            }
        }
    }

    fn walk_quest(&mut self, quest: &Map<String, Value>, container_id: &str, pointer: &str) {
        let layout = BagLayout::detect(quest);
        let id = id_field(quest, &layout, "questID").unwrap_or_else(|| container_id.to_string());

        if let Some((bag, bag_pointer)) = betterquesting_bag(quest, &layout, pointer) {
            let bag_layout = BagLayout::detect(bag);
            self.push(bag, &bag_layout, &bag_pointer, "name", format!("quest.{}.name", id), SlotKind::Text);
            self.push(bag, &bag_layout, &bag_pointer, "desc", format!("quest.{}.description", id), SlotKind::Text);
        }

        if let Some((key, rewards)) = layout.get(quest, "rewards") {
            let rewards_pointer = child_pointer(pointer, key);
            for (reward_id, child_key, reward) in entries(rewards) {
                let Some(reward) = reward.as_object() else {
                    continue;
                };
                let reward_layout = BagLayout::detect(reward);
                let reward_pointer = child_pointer(&rewards_pointer, &child_key);
                let prefix = format!("quest.{}.reward.{}", id, reward_id);

                self.push(
                    reward,
                    &reward_layout,
                    &reward_pointer,
                    "description",
                    format!("{}.description", prefix),
                    SlotKind::Text,
                );
                self.push(
                    reward,
                    &reward_layout,
                    &reward_pointer,
                    "command",
                    format!("{}.command", prefix),
                    SlotKind::Command,
                );
            }
        }
    }

    fn walk_line(&mut self, line: &Map<String, Value>, container_id: &str, pointer: &str) {
        let layout = BagLayout::detect(line);
        let id = id_field(line, &layout, "lineID").unwrap_or_else(|| container_id.to_string());
        let bag = betterquesting_bag(line, &layout, pointer);

        for (field, bag_field, suffix) in [("name", "name", "name"), ("description", "desc", "description")] {
            let key = format!("questline.{}.{}", id, suffix);
            if layout.strings(line, field).1.is_some() {
                self.push(line, &layout, pointer, field, key, SlotKind::Text);
            } else if let Some((bag, bag_pointer)) = &bag {
                self.push(bag, &BagLayout::detect(bag), bag_pointer, bag_field, key, SlotKind::Text);
            }
        }
    }

    /// Record `field` of `map` as a slot when it holds non-empty text
    fn push(
        &mut self,
        map: &Map<String, Value>,
        layout: &BagLayout,
        pointer: &str,
        field: &str,
        key: String,
        kind: SlotKind,
    ) {
        let (keys, text) = layout.strings(map, field);
        let Some(text) = text else {
            return;
        };
        self.slots.push(TextSlot {
            key,
            text: text.to_string(),
            kind,
            pointers: keys.iter().map(|k| child_pointer(pointer, k)).collect(),
        });
    }
}

/// The `properties.betterquesting` bag of a quest or quest line, with its pointer
fn betterquesting_bag<'a>(
    map: &'a Map<String, Value>,
    layout: &BagLayout,
    pointer: &str,
) -> Option<(&'a Map<String, Value>, String)> {
    let (props_key, properties) = layout.object(map, "properties")?;
    let (bag_key, bag) = BagLayout::detect(properties).object(properties, "betterquesting")?;
    let bag_pointer = child_pointer(&child_pointer(pointer, props_key), bag_key);
    Some((bag, bag_pointer))
}
