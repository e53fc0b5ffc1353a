//! Category-specific payload inspection.

use crate::category::Category;
use crate::sound::SoundInfo;
use crate::Result;

/// What the inspector learned about a decoded payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    /// Category with no specialised parsing.
    Generic,
    /// A sound with its sub-header.
    Sound(SoundInfo),
}

impl Payload {
    /// Run the inspector for `category`, if it has one.
    pub fn inspect(category: Category, data: &[u8]) -> Result<Self> {
        match category {
            Category::Sound => SoundInfo::parse(data).map(Payload::Sound),
            _ => Ok(Payload::Generic),
        }
    }

    /// Extension for the extracted file.
    ///
    /// Raw PCM sound is written as `.pcm`; everything else keeps the category
    /// default.
    pub fn output_extension(&self, category: Category) -> &'static str {
        match self {
            Payload::Sound(info) if info.is_raw() => "pcm",
            _ => category.default_extension(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sound::tests::raw_sound;

    #[test]
    fn test_generic_categories_are_not_parsed() {
        let payload = Payload::inspect(Category::Table, b"anything").unwrap();
        assert_eq!(payload, Payload::Generic);
        assert_eq!(payload.output_extension(Category::Table), "txt");
    }

    #[test]
    fn test_raw_sound_uses_pcm_extension() {
        let data = raw_sound(1, 22050, &[0; 8]);
        let payload = Payload::inspect(Category::Sound, &data).unwrap();

        assert!(matches!(payload, Payload::Sound(_)));
        assert_eq!(payload.output_extension(Category::Sound), "pcm");
    }

    #[test]
    fn test_sound_inspector_errors_propagate() {
        assert!(Payload::inspect(Category::Sound, &[0; 4]).is_err());
    }
}
