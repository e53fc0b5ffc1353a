//! Resource categories derived from entry names.
//!
//! Every entry name starts with a category prefix terminated by the first
//! `.` (`sound.click_01.h4d`). The category picks the output directory, the
//! default output extension and the payload inspector.

use std::fmt;

use crate::{Error, Result};

/// Coarse content type of an archive entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Unknown,
    ActorSequence,
    AdvActor,
    AdvObject,
    Animation,
    BattlefieldPresetMap,
    BitmapRaw,
    Bink,
    Castle,
    CombatActor,
    CombatHeaderTableCache,
    CombatObject,
    Font,
    GameMaps,
    Layers,
    Sound,
    Strings,
    Table,
    Terrain,
    Transition,
}

impl Category {
    /// All categories, in name order.
    pub const ALL: [Category; 20] = [
        Category::Unknown,
        Category::ActorSequence,
        Category::AdvActor,
        Category::AdvObject,
        Category::Animation,
        Category::BattlefieldPresetMap,
        Category::BitmapRaw,
        Category::Bink,
        Category::Castle,
        Category::CombatActor,
        Category::CombatHeaderTableCache,
        Category::CombatObject,
        Category::Font,
        Category::GameMaps,
        Category::Layers,
        Category::Sound,
        Category::Strings,
        Category::Table,
        Category::Terrain,
        Category::Transition,
    ];

    /// Classify an entry by the part of its name before the first `.`.
    pub fn classify(name: &str) -> Result<Self> {
        let prefix = name.split('.').next().unwrap_or(name);
        Self::from_prefix(prefix).ok_or_else(|| Error::UnknownCategory {
            prefix: prefix.to_string(),
            name: name.to_string(),
        })
    }

    /// Look up a category by its exact name prefix.
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.prefix() == prefix)
    }

    /// The name prefix used inside the archive.
    pub const fn prefix(self) -> &'static str {
        match self {
            Category::Unknown => "unknown",
            Category::ActorSequence => "actor_sequence",
            Category::AdvActor => "adv_actor",
            Category::AdvObject => "adv_object",
            Category::Animation => "animation",
            Category::BattlefieldPresetMap => "battlefield_preset_map",
            Category::BitmapRaw => "bitmap_raw",
            Category::Bink => "bink",
            Category::Castle => "castle",
            Category::CombatActor => "combat_actor",
            Category::CombatHeaderTableCache => "combat_header_table_cache",
            Category::CombatObject => "combat_object",
            Category::Font => "font",
            Category::GameMaps => "game_maps",
            Category::Layers => "layers",
            Category::Sound => "sound",
            Category::Strings => "strings",
            Category::Table => "table",
            Category::Terrain => "terrain",
            Category::Transition => "transition",
        }
    }

    /// Default extension (without the dot) for extracted files.
    pub const fn default_extension(self) -> &'static str {
        match self {
            Category::Unknown => "unk",
            Category::ActorSequence => "seq",
            Category::AdvActor => "act",
            Category::AdvObject | Category::CombatObject => "obj",
            Category::Animation => "ani",
            Category::BattlefieldPresetMap => "map",
            Category::BitmapRaw => "raw",
            Category::Bink => "bik",
            Category::Castle => "cst",
            Category::CombatActor => "cmb",
            Category::CombatHeaderTableCache => "cht",
            Category::Font => "fnt",
            Category::GameMaps => "h4c",
            Category::Layers => "lay",
            Category::Sound => "mp3",
            Category::Strings | Category::Table => "txt",
            Category::Terrain => "ter",
            Category::Transition => "tra",
        }
    }

    /// Output directory name: the prefix with its first letter upper-cased.
    pub fn dir_name(self) -> String {
        let prefix = self.prefix();
        let mut chars = prefix.chars();
        match chars.next() {
            Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
            None => String::new(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_splits_at_first_dot() {
        assert_eq!(
            Category::classify("sound.click.h4d").unwrap(),
            Category::Sound
        );
        assert_eq!(
            Category::classify("combat_header_table_cache.h4d").unwrap(),
            Category::CombatHeaderTableCache
        );
        assert_eq!(Category::classify("font").unwrap(), Category::Font);
    }

    #[test]
    fn test_unknown_prefix() {
        let err = Category::classify("music.theme.h4d").unwrap_err();
        match err {
            Error::UnknownCategory { prefix, name } => {
                assert_eq!(prefix, "music");
                assert_eq!(name, "music.theme.h4d");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_prefix_lookup_is_case_sensitive() {
        assert!(Category::from_prefix("Sound").is_none());
    }

    #[test]
    fn test_prefixes_roundtrip() {
        for category in Category::ALL {
            assert_eq!(Category::from_prefix(category.prefix()), Some(category));
        }
    }

    #[test]
    fn test_dir_name() {
        assert_eq!(Category::Sound.dir_name(), "Sound");
        assert_eq!(Category::GameMaps.dir_name(), "Game_maps");
    }

    #[test]
    fn test_default_extensions() {
        assert_eq!(Category::Sound.default_extension(), "mp3");
        assert_eq!(Category::Table.default_extension(), "txt");
        assert_eq!(Category::CombatObject.default_extension(), "obj");
    }
}
