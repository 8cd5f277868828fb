//! Names of the images and sounds the host has to provide.
//!
//! The simulation only ever refers to assets by these keys; loading and
//! decoding them is the host's business.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageName {
    Backgrounds,
    BigCharacter,
    Blocks,
    Bushes,
    Character,
    Coin,
    Creatures,
    Flagpole,
    PowerUps,
    Tiles,
    Toppers,
}

impl ImageName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Backgrounds => "backgrounds",
            Self::BigCharacter => "big_character",
            Self::Blocks => "blocks",
            Self::Bushes => "bushes",
            Self::Character => "character",
            Self::Coin => "coin",
            Self::Creatures => "creatures",
            Self::Flagpole => "flagpole",
            Self::PowerUps => "power_ups",
            Self::Tiles => "tiles",
            Self::Toppers => "toppers",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundName {
    Death,
    EmptyBlock,
    Jump,
    Kill,
    Kill2,
    Music,
    PickUp,
    Reveal,
}

impl SoundName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Death => "death",
            Self::EmptyBlock => "empty_block",
            Self::Jump => "jump",
            Self::Kill => "kill",
            Self::Kill2 => "kill2",
            Self::Music => "music",
            Self::PickUp => "pick_up",
            Self::Reveal => "reveal",
        }
    }
}

impl std::fmt::Display for SoundName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
