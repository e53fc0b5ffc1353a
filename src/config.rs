//! Game directory layout and output location.

use std::path::{Path, PathBuf};

/// Logical archive names and their location inside the game directory.
pub const KNOWN_ARCHIVES: [(&str, &str); 5] = [
    ("text", "Data/text.h4r"),
    ("movies", "Data/movies.h4r"),
    ("updates", "Data/updates.h4r"),
    ("heroes4", "Data/heroes4.h4r"),
    ("music", "Data/music.h4r"),
];

/// Where archives are read from and extracted to.
#[derive(Debug, Clone)]
pub struct Settings {
    pub game_dir: PathBuf,
    pub output: PathBuf,
}

impl Settings {
    pub fn new(game_dir: PathBuf, output: PathBuf) -> Self {
        Self { game_dir, output }
    }

    /// Resolve a logical archive name, or treat the argument as a path.
    pub fn archive_path(&self, archive: &str) -> PathBuf {
        KNOWN_ARCHIVES
            .iter()
            .find(|(name, _)| *name == archive)
            .map(|(_, relative)| self.game_dir.join(relative))
            .unwrap_or_else(|| PathBuf::from(archive))
    }

    /// Every known archive with its resolved path.
    pub fn known_archives(&self) -> impl Iterator<Item = (&'static str, PathBuf)> + '_ {
        KNOWN_ARCHIVES
            .iter()
            .map(|(name, relative)| (*name, self.game_dir.join(relative)))
    }

    pub fn output(&self) -> &Path {
        &self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings::new(PathBuf::from("/games/h4"), PathBuf::from("out"))
    }

    #[test]
    fn test_known_name_resolves_under_game_dir() {
        assert_eq!(
            settings().archive_path("music"),
            PathBuf::from("/games/h4/Data/music.h4r")
        );
    }

    #[test]
    fn test_unknown_name_is_a_path() {
        assert_eq!(
            settings().archive_path("mods/extra.h4r"),
            PathBuf::from("mods/extra.h4r")
        );
    }

    #[test]
    fn test_known_archives_in_order() {
        let names: Vec<&str> = settings().known_archives().map(|(n, _)| n).collect();
        assert_eq!(names, ["text", "movies", "updates", "heroes4", "music"]);
    }
}
