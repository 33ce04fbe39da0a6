//! Themes, moods and instrument profiles.
//!
//! A subject word resolves to a [`Theme`] through a fixed vocabulary table.
//! Each theme maps to an ordered list of [`InstrumentSpec`]s and a default
//! [`Mood`], whose energy drives synthesis density and loudness.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SpecError, SpecResult};

/// Theme categories for generated beats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    /// Ships, sailing, ocean travel.
    Nautical,
    /// Gold, gems, riches.
    Treasure,
    /// Exploration and discovery.
    Adventure,
    /// Sea, sky and animals.
    Nature,
    /// Pirates, sailors, friends.
    Crew,
    /// Maps, secrets, islands.
    Mysterious,
}

/// Mood tags with a default energy each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    /// Gentle, peaceful.
    Calm,
    /// Bouncy, fun.
    Playful,
    /// Exciting, fast.
    Energetic,
    /// Suspenseful, curious.
    Mysterious,
    /// Bold, daring.
    Adventurous,
}

/// Instrument voices a theme can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentKind {
    /// Full drum kit (kick, snare, hi-hat).
    Drums,
    /// Drum kit at reduced intensity.
    LightDrums,
    /// Chord pad with vibrato.
    Accordion,
    /// Plucked melodic lead.
    Fiddle,
    /// High, soft melodic lead.
    Flute,
    /// Multi-partial bell strikes.
    Bells,
    /// Same bell layer as [`InstrumentKind::Bells`].
    Chimes,
    /// Short noise bursts on the backbeat.
    HandClaps,
    /// Smoothed noise bed with slow swell.
    Waves,
    /// Low drone with slow amplitude LFO.
    Ambient,
}

/// An instrument voice plus its relative weight in the mix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InstrumentSpec {
    /// Voice to render.
    pub kind: InstrumentKind,
    /// Linear weight applied before summing.
    pub weight: f64,
}

/// Everything the synthesizer needs to know about a theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeProfile {
    /// Resolved theme.
    pub theme: Theme,
    /// Mood used for the default energy.
    pub mood: Mood,
    /// Energy in `[0.0, 1.0]`.
    pub energy: f64,
    /// Ordered voices for this theme.
    pub instruments: Vec<InstrumentSpec>,
}

const ALL_THEMES: [Theme; 6] = [
    Theme::Nautical,
    Theme::Treasure,
    Theme::Adventure,
    Theme::Nature,
    Theme::Crew,
    Theme::Mysterious,
];

impl Theme {
    /// Every theme in table order.
    pub fn all() -> &'static [Theme] {
        &ALL_THEMES
    }

    /// Lower-case tag used in file names and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Nautical => "nautical",
            Theme::Treasure => "treasure",
            Theme::Adventure => "adventure",
            Theme::Nature => "nature",
            Theme::Crew => "crew",
            Theme::Mysterious => "mysterious",
        }
    }

    /// Vocabulary that maps onto this theme.
    pub fn vocabulary(&self) -> &'static [&'static str] {
        match self {
            Theme::Nautical => &[
                "ship", "sail", "boat", "anchor", "helm", "mast", "deck", "port", "starboard",
                "voyage", "sailing", "fleet", "vessel",
            ],
            Theme::Treasure => &[
                "treasure", "gold", "coin", "chest", "jewel", "gem", "ruby", "diamond", "pearl",
                "silver", "riches", "bounty", "loot",
            ],
            Theme::Adventure => &[
                "adventure",
                "quest",
                "journey",
                "explore",
                "discover",
                "map",
                "compass",
                "island",
                "land",
                "shore",
                "beach",
            ],
            Theme::Nature => &[
                "sea", "ocean", "wave", "water", "wind", "storm", "sky", "cloud", "sun", "moon",
                "star", "fish", "whale", "bird", "parrot", "crab", "dolphin",
            ],
            Theme::Crew => &[
                "pirate", "sailor", "crew", "captain", "mate", "friend", "team", "together",
                "help", "share", "work",
            ],
            Theme::Mysterious => &[
                "mystery", "secret", "hidden", "lost", "find", "search", "clue", "riddle",
                "puzzle", "key", "lock", "cave",
            ],
        }
    }

    /// Resolves a subject word to a theme.
    ///
    /// Matching is case-insensitive on the trimmed word. Unknown words map to
    /// [`Theme::Adventure`].
    pub fn for_word(word: &str) -> Theme {
        let word = word.trim().to_lowercase();
        ALL_THEMES
            .iter()
            .copied()
            .find(|theme| theme.vocabulary().contains(&word.as_str()))
            .unwrap_or(Theme::Adventure)
    }

    /// Instruments for this theme, in mix order.
    pub fn instruments(&self) -> Vec<InstrumentSpec> {
        use InstrumentKind::*;

        let kinds: &[InstrumentKind] = match self {
            Theme::Nautical => &[Accordion, Waves, Drums],
            Theme::Treasure => &[Bells, Chimes, Drums],
            Theme::Adventure => &[Fiddle, Accordion, Drums],
            Theme::Nature => &[Waves, Flute, LightDrums],
            Theme::Crew => &[Drums, Accordion, HandClaps],
            Theme::Mysterious => &[Bells, LightDrums, Ambient],
        };
        kinds.iter().map(|&kind| InstrumentSpec::new(kind)).collect()
    }

    /// Default mood for this theme.
    pub fn mood(&self) -> Mood {
        match self {
            Theme::Nautical => Mood::Adventurous,
            Theme::Treasure => Mood::Playful,
            Theme::Adventure => Mood::Energetic,
            Theme::Nature => Mood::Calm,
            Theme::Crew => Mood::Playful,
            Theme::Mysterious => Mood::Mysterious,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_lowercase();
        ALL_THEMES
            .iter()
            .copied()
            .find(|theme| theme.as_str() == tag)
            .ok_or_else(|| SpecError::UnknownTheme(s.to_string()))
    }
}

impl Mood {
    /// Default energy for the mood.
    pub fn energy(&self) -> f64 {
        match self {
            Mood::Calm => 0.3,
            Mood::Playful => 0.6,
            Mood::Energetic => 0.9,
            Mood::Mysterious => 0.4,
            Mood::Adventurous => 0.75,
        }
    }

    /// Lower-case tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Calm => "calm",
            Mood::Playful => "playful",
            Mood::Energetic => "energetic",
            Mood::Mysterious => "mysterious",
            Mood::Adventurous => "adventurous",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "calm" => Ok(Mood::Calm),
            "playful" => Ok(Mood::Playful),
            "energetic" => Ok(Mood::Energetic),
            "mysterious" => Ok(Mood::Mysterious),
            "adventurous" => Ok(Mood::Adventurous),
            _ => Err(SpecError::UnknownMood(s.to_string())),
        }
    }
}

impl InstrumentKind {
    /// Default mix weight for the voice.
    ///
    /// Drum kits return 1.0 because the kick, snare and hi-hat layers carry
    /// their own weights.
    pub fn default_weight(&self) -> f64 {
        match self {
            InstrumentKind::Drums | InstrumentKind::LightDrums => 1.0,
            InstrumentKind::Accordion => 0.40,
            InstrumentKind::Bells | InstrumentKind::Chimes => 0.35,
            InstrumentKind::Fiddle => 0.38,
            InstrumentKind::Waves => 0.25,
            InstrumentKind::Flute => 0.30,
            InstrumentKind::HandClaps => 0.30,
            InstrumentKind::Ambient => 0.20,
        }
    }

    /// Snake-case tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            InstrumentKind::Drums => "drums",
            InstrumentKind::LightDrums => "light_drums",
            InstrumentKind::Accordion => "accordion",
            InstrumentKind::Fiddle => "fiddle",
            InstrumentKind::Flute => "flute",
            InstrumentKind::Bells => "bells",
            InstrumentKind::Chimes => "chimes",
            InstrumentKind::HandClaps => "hand_claps",
            InstrumentKind::Waves => "waves",
            InstrumentKind::Ambient => "ambient",
        }
    }
}

impl fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstrumentKind {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use InstrumentKind::*;

        let kind = match s.trim().to_lowercase().replace('-', "_").as_str() {
            "drums" => Drums,
            "light_drums" => LightDrums,
            "accordion" => Accordion,
            "fiddle" => Fiddle,
            "flute" => Flute,
            "bells" => Bells,
            "chimes" => Chimes,
            "hand_claps" => HandClaps,
            "waves" => Waves,
            "ambient" => Ambient,
            _ => return Err(SpecError::UnknownInstrument(s.to_string())),
        };
        Ok(kind)
    }
}

impl InstrumentSpec {
    /// Creates a spec with the voice's default weight.
    pub fn new(kind: InstrumentKind) -> Self {
        Self {
            kind,
            weight: kind.default_weight(),
        }
    }

    /// Overrides the mix weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }
}

impl ThemeProfile {
    /// Builds the table profile for a theme.
    pub fn for_theme(theme: Theme) -> Self {
        let mood = theme.mood();
        Self {
            theme,
            mood,
            energy: mood.energy(),
            instruments: theme.instruments(),
        }
    }

    /// Resolves a subject word and builds its profile.
    pub fn for_word(word: &str) -> Self {
        Self::for_theme(Theme::for_word(word))
    }

    /// Replaces the energy, rejecting values outside `[0.0, 1.0]`.
    pub fn with_energy(mut self, energy: f64) -> SpecResult<Self> {
        if !energy.is_finite() || !(0.0..=1.0).contains(&energy) {
            return Err(SpecError::InvalidEnergy(energy));
        }
        self.energy = energy;
        Ok(self)
    }

    /// Replaces the mood and takes its default energy.
    pub fn with_mood(mut self, mood: Mood) -> Self {
        self.mood = mood;
        self.energy = mood.energy();
        self
    }

    /// Returns true if the profile lists the given voice.
    pub fn has(&self, kind: InstrumentKind) -> bool {
        self.instruments.iter().any(|spec| spec.kind == kind)
    }
}
