use serde::{Deserialize, Serialize};

/// Kind of itinerary stop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Transport,
    Logistics,
    #[serde(alias = "activity")]
    Sight,
    Food,
    Scouting,
    Hub,
}

impl Category {
    /// Parse from a loose tag ("activity" is accepted for sights)
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "transport" => Some(Self::Transport),
            "logistics" => Some(Self::Logistics),
            "sight" | "activity" => Some(Self::Sight),
            "food" => Some(Self::Food),
            "scouting" => Some(Self::Scouting),
            "hub" => Some(Self::Hub),
            _ => None,
        }
    }

    /// Tag sent to the generative service and written to reports
    pub fn to_tag(&self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Logistics => "logistics",
            Self::Sight => "sight",
            Self::Food => "food",
            Self::Scouting => "scouting",
            Self::Hub => "hub",
        }
    }

    /// Short badge shown on cards
    pub fn label(&self) -> &'static str {
        match self {
            Self::Transport => "MOVE",
            Self::Logistics => "TASK",
            Self::Sight => "SIGHT",
            Self::Food => "FOOD",
            Self::Scouting => "SCOUT",
            Self::Hub => "HUB",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Transport => "🚆",
            Self::Logistics => "🧳",
            Self::Sight => "⛩",
            Self::Food => "🍜",
            Self::Scouting => "🔭",
            Self::Hub => "🏁",
        }
    }

    /// Whether the batch action should generate long-form details for this kind of stop
    pub fn wants_details(&self) -> bool {
        matches!(self, Self::Sight | Self::Food | Self::Scouting | Self::Logistics)
    }

    /// Next category in form cycling order
    pub fn next(&self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|c| c == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    /// Previous category in form cycling order
    pub fn prev(&self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|c| c == self).unwrap_or(0);
        all[(idx + all.len() - 1) % all.len()]
    }

    pub fn all() -> &'static [Category] {
        &[
            Category::Sight,
            Category::Food,
            Category::Transport,
            Category::Logistics,
            Category::Scouting,
            Category::Hub,
        ]
    }
}

/// Lifecycle status of a schedule item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    #[default]
    Active,
    Deleted,
}

/// Top-level screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Itinerary,
    Trash,
    Toolbox,
}

impl View {
    pub fn name(&self) -> &'static str {
        match self {
            View::Itinerary => "Itinerary",
            View::Trash => "Trash",
            View::Toolbox => "Toolbox",
        }
    }

    /// Cycle Itinerary -> Toolbox -> Trash
    pub fn next(&self) -> Self {
        match self {
            View::Itinerary => View::Toolbox,
            View::Toolbox => View::Trash,
            View::Trash => View::Itinerary,
        }
    }
}

/// UI mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    AddingItem,
    EditingItem,
    EditingExpenses,
    ViewingDetails,
    ViewingPhrase,
    Help,
}
