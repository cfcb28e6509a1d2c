use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::constants::SKIP_CHOICE_DESCRIPTION;
use crate::state::Genre;

const DEFAULT_SCRIPT_DATA: &str = include_str!("../assets/data/days.json");

/// Narrative register of a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChoiceKind {
    Compromise,
    Perfectionism,
    Skip,
    Neutral,
    Abandon,
}

impl ChoiceKind {
    pub const ALL: [Self; 5] = [
        Self::Compromise,
        Self::Perfectionism,
        Self::Skip,
        Self::Neutral,
        Self::Abandon,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Compromise => "compromise",
            Self::Perfectionism => "perfectionism",
            Self::Skip => "skip",
            Self::Neutral => "neutral",
            Self::Abandon => "abandon",
        }
    }
}

impl fmt::Display for ChoiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChoiceKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "compromise" => Ok(Self::Compromise),
            "perfectionism" => Ok(Self::Perfectionism),
            "skip" => Ok(Self::Skip),
            "neutral" => Ok(Self::Neutral),
            "abandon" => Ok(Self::Abandon),
            _ => Err(()),
        }
    }
}

/// Signed stat deltas carried by a choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Impact {
    #[serde(default)]
    pub visual_degradation: i32,
    #[serde(default)]
    pub progress: i32,
    #[serde(default)]
    pub quality: i32,
    #[serde(default)]
    pub energy: i32,
}

impl Impact {
    #[must_use]
    pub const fn new(visual_degradation: i32, progress: i32, quality: i32, energy: i32) -> Self {
        Self {
            visual_degradation,
            progress,
            quality,
            energy,
        }
    }

    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.visual_degradation == 0 && self.progress == 0 && self.quality == 0 && self.energy == 0
    }
}

/// A resolved decision, recorded in the game history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub day: u32,
    pub kind: ChoiceKind,
    pub description: String,
    #[serde(default, skip_serializing_if = "Impact::is_zero")]
    pub impact: Impact,
    /// Set only on the synthetic entry left by a skipped minigame.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub minigame_skip: bool,
}

impl Choice {
    #[must_use]
    pub fn new(day: u32, kind: ChoiceKind, description: impl Into<String>, impact: Impact) -> Self {
        Self {
            day,
            kind,
            description: description.into(),
            impact,
            minigame_skip: false,
        }
    }

    /// Synthetic compromise recorded when a minigame is skipped.
    #[must_use]
    pub fn minigame_skip(day: u32, impact: Impact) -> Self {
        Self {
            minigame_skip: true,
            ..Self::new(day, ChoiceKind::Compromise, SKIP_CHOICE_DESCRIPTION, impact)
        }
    }
}

/// A selectable option within a day's script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayChoice {
    pub id: String,
    pub text: String,
    pub kind: ChoiceKind,
    #[serde(default, skip_serializing_if = "Impact::is_zero")]
    pub impact: Impact,
}

impl DayChoice {
    /// Resolve this template into a history entry for `day`.
    #[must_use]
    pub fn to_choice(&self, day: u32) -> Choice {
        Choice::new(day, self.kind, self.text.clone(), self.impact)
    }
}

/// Day body text, either fixed or keyed by the selected genre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Description {
    Plain(String),
    ByGenre {
        default: String,
        #[serde(default)]
        fantasy: Option<String>,
        #[serde(default)]
        cyberpunk: Option<String>,
        #[serde(default)]
        postapoc: Option<String>,
    },
}

impl Description {
    #[must_use]
    pub fn render(&self, genre: Option<Genre>) -> &str {
        match self {
            Self::Plain(text) => text.as_str(),
            Self::ByGenre {
                default,
                fantasy,
                cyberpunk,
                postapoc,
            } => {
                let variant = match genre {
                    Some(Genre::Fantasy) => fantasy.as_deref(),
                    Some(Genre::Cyberpunk) => cyberpunk.as_deref(),
                    Some(Genre::Postapoc) => postapoc.as_deref(),
                    None => None,
                };
                variant.unwrap_or(default.as_str())
            }
        }
    }
}

/// Minigame difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl FromStr for Difficulty {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(()),
        }
    }
}

/// Parsed form of a day's minigame tag such as `typing-easy` or `qa-15`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Minigame {
    GenreSelect,
    Typing(Difficulty),
    BugFix(Difficulty),
    TaskOrder { tasks: u32 },
    QaChecklist { items: u32 },
    Build { seconds: u32 },
}

impl FromStr for Minigame {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "genre-select" {
            return Ok(Self::GenreSelect);
        }
        let (name, arg) = s.split_once('-').ok_or(())?;
        match name {
            "typing" => arg.parse().map(Self::Typing),
            "bugfix" => arg.parse().map(Self::BugFix),
            "taskorder" => arg
                .parse()
                .map(|tasks| Self::TaskOrder { tasks })
                .map_err(|_| ()),
            "qa" => arg
                .parse()
                .map(|items| Self::QaChecklist { items })
                .map_err(|_| ()),
            "build" => arg
                .parse()
                .map(|seconds| Self::Build { seconds })
                .map_err(|_| ()),
            _ => Err(()),
        }
    }
}

impl Minigame {
    #[must_use]
    pub const fn is_genre_select(self) -> bool {
        matches!(self, Self::GenreSelect)
    }
}

/// Static script for one day of the timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayContent {
    pub day: u32,
    #[serde(default = "default_act")]
    pub act: u8,
    pub title: String,
    pub description: Description,
    #[serde(default)]
    pub minigame: Option<String>,
    #[serde(default)]
    pub minigame_skip_impact: Option<Impact>,
    #[serde(default)]
    pub choices: SmallVec<[DayChoice; 3]>,
}

fn default_act() -> u8 {
    1
}

impl DayContent {
    #[must_use]
    pub fn choice(&self, id: &str) -> Option<&DayChoice> {
        self.choices.iter().find(|choice| choice.id == id)
    }

    #[must_use]
    pub fn has_minigame(&self) -> bool {
        self.minigame.is_some()
    }

    /// Parsed minigame tag. Unknown tags yield `None`.
    #[must_use]
    pub fn minigame_kind(&self) -> Option<Minigame> {
        self.minigame.as_deref().and_then(|tag| tag.parse().ok())
    }

    /// Days with only a minigame advance as soon as it resolves.
    #[must_use]
    pub fn is_minigame_only(&self) -> bool {
        self.choices.is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ScriptFile {
    days: Vec<DayContent>,
}

/// Day-number keyed script. The first entry for a day wins.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DayScript {
    days: BTreeMap<u32, DayContent>,
    shadowed: Vec<DayContent>,
}

impl DayScript {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_days(entries: Vec<DayContent>) -> Self {
        let mut script = Self::default();
        for entry in entries {
            if script.days.contains_key(&entry.day) {
                log::debug!("script entry for day {} shadowed by earlier entry", entry.day);
                script.shadowed.push(entry);
            } else {
                script.days.insert(entry.day, entry);
            }
        }
        script
    }

    /// Load a script from JSON of the shape `{ "days": [...] }`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into day content.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let file: ScriptFile = serde_json::from_str(json)?;
        Ok(Self::from_days(file.days))
    }

    /// The script bundled with the crate.
    #[must_use]
    pub fn bundled() -> &'static Self {
        static SCRIPT: OnceLock<DayScript> = OnceLock::new();
        SCRIPT.get_or_init(|| Self::from_json(DEFAULT_SCRIPT_DATA).unwrap_or_default())
    }

    #[must_use]
    pub fn day(&self, day: u32) -> Option<&DayContent> {
        self.days.get(&day)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DayContent> {
        self.days.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.days.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Entries that lost to an earlier entry for the same day.
    #[must_use]
    pub fn shadowed(&self) -> &[DayContent] {
        &self.shadowed
    }
}
