//! Gift descriptor
//!
//! A [`GiftDescriptor`] is the normalized configuration of one gift. Every
//! constructor coerces invalid input to the nearest valid default, so a
//! descriptor can never hold an out-of-range value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub mod codec;

pub use self::codec::{decode, encode, encode_stored, gift_page, GiftReference};

/// Message shown when the sender left none
pub const DEFAULT_MESSAGE: &str = "A gift for you!";

/// Waterings required when the link gives no usable count
pub const DEFAULT_REQUIRED_INTERACTIONS: u32 = 3;

/// Smallest accepted watering count
pub const MIN_REQUIRED_INTERACTIONS: u32 = 1;

/// Largest accepted watering count
pub const MAX_REQUIRED_INTERACTIONS: u32 = 10;

/// Unknown flower or theme name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown value `{0}`")]
pub struct UnknownValue(pub String);

/// Flower kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlowerKind {
    /// Rose
    #[default]
    Rose,
    /// Tulip
    Tulip,
    /// Daisy
    Daisy,
    /// Lily
    Lily,
    /// Sunflower
    Sunflower,
    /// Orchid
    Orchid,
}

impl FlowerKind {
    /// All known flower kinds, primary kind first
    pub const ALL: [FlowerKind; 6] = [
        Self::Rose,
        Self::Tulip,
        Self::Daisy,
        Self::Lily,
        Self::Sunflower,
        Self::Orchid,
    ];

    /// Name used in links and asset file names
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rose => "Rose",
            Self::Tulip => "Tulip",
            Self::Daisy => "Daisy",
            Self::Lily => "Lily",
            Self::Sunflower => "Sunflower",
            Self::Orchid => "Orchid",
        }
    }

    /// Image asset for this flower
    pub fn image_name(&self) -> String {
        format!("{}.png", self.as_str())
    }
}

impl FromStr for FlowerKind {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownValue(s.to_string()))
    }
}

impl fmt::Display for FlowerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Page theme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Spring
    #[default]
    Spring,
    /// Summer
    Summer,
    /// Autumn
    Autumn,
    /// Winter
    Winter,
}

impl Theme {
    /// All known themes, default first
    pub const ALL: [Theme; 4] = [Self::Spring, Self::Summer, Self::Autumn, Self::Winter];

    /// Name used in links
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Autumn => "autumn",
            Self::Winter => "winter",
        }
    }

    /// Background colour of the gift page
    pub fn background_color(&self) -> &'static str {
        match self {
            Self::Spring => "#E6E6FA",
            Self::Summer => "#B0E0E6",
            Self::Autumn => "#FFDAB9",
            Self::Winter => "#ADD8E6",
        }
    }
}

impl FromStr for Theme {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|theme| theme.as_str() == s)
            .ok_or_else(|| UnknownValue(s.to_string()))
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized gift configuration
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawGiftDescriptor")]
pub struct GiftDescriptor {
    flower: FlowerKind,
    message: String,
    theme: Theme,
    required_interactions: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    music: Option<String>,
    sparkle: bool,
}

impl GiftDescriptor {
    /// Create a new [`GiftDescriptor`], normalizing every field
    pub fn new<M>(
        flower: FlowerKind,
        message: M,
        theme: Theme,
        required_interactions: i64,
        music: Option<String>,
        sparkle: bool,
    ) -> Self
    where
        M: AsRef<str>,
    {
        Self {
            flower,
            message: normalize_message(message.as_ref()),
            theme,
            required_interactions: normalize_required_interactions(required_interactions),
            music: music.filter(|m| !m.is_empty()),
            sparkle,
        }
    }

    /// Flower kind
    pub fn flower(&self) -> FlowerKind {
        self.flower
    }

    /// Message revealed when the flower blooms
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Page theme
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Waterings needed before the flower blooms
    pub fn required_interactions(&self) -> u32 {
        self.required_interactions
    }

    /// Music played on reveal
    pub fn music(&self) -> Option<&str> {
        self.music.as_deref()
    }

    /// Whether the reveal sparkles
    pub fn sparkle(&self) -> bool {
        self.sparkle
    }
}

impl Default for GiftDescriptor {
    fn default() -> Self {
        Self::new(
            FlowerKind::default(),
            "",
            Theme::default(),
            DEFAULT_REQUIRED_INTERACTIONS as i64,
            None,
            false,
        )
    }
}

/// Trimmed message, or the placeholder when nothing is left
pub fn normalize_message(message: &str) -> String {
    let message = message.trim();
    if message.is_empty() {
        DEFAULT_MESSAGE.to_string()
    } else {
        message.to_string()
    }
}

/// Non-positive counts fall back to the default, the rest are clamped
pub fn normalize_required_interactions(count: i64) -> u32 {
    if count <= 0 {
        return DEFAULT_REQUIRED_INTERACTIONS;
    }

    count.clamp(
        MIN_REQUIRED_INTERACTIONS as i64,
        MAX_REQUIRED_INTERACTIONS as i64,
    ) as u32
}

// Stored records go back through `GiftDescriptor::new`
#[derive(Deserialize)]
struct RawGiftDescriptor {
    #[serde(default)]
    flower: FlowerKind,
    #[serde(default)]
    message: String,
    #[serde(default)]
    theme: Theme,
    #[serde(default)]
    required_interactions: i64,
    #[serde(default)]
    music: Option<String>,
    #[serde(default)]
    sparkle: bool,
}

impl From<RawGiftDescriptor> for GiftDescriptor {
    fn from(raw: RawGiftDescriptor) -> Self {
        Self::new(
            raw.flower,
            raw.message,
            raw.theme,
            raw.required_interactions,
            raw.music,
            raw.sparkle,
        )
    }
}
