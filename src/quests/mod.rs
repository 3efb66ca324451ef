/*!
 * BetterQuesting quest documents.
 *
 * - `dialect`: Plain and NBT-tagged key dialects, resolved per object
 * - `filter`: Player-facing text heuristics
 * - `document`: Extraction and re-injection of quest texts
 * - `files`: Quest file detection and search
 */

pub use self::dialect::{BagLayout, Dialect};
pub use self::document::{QuestDocument, SlotKind, TextSlot};
pub use self::files::{find_quest_files, is_quest_file};
pub use self::filter::{is_player_message, is_translatable_text};

pub mod dialect;
pub mod document;
pub mod files;
pub mod filter;
