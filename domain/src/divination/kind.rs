//! Divination kind value object

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// The oracle a reading is requested from (Value Object)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DivinationKind {
    /// Three-card tarot spread
    Tarot,
    /// I Ching hexagram casting
    #[serde(rename = "iching")]
    IChing,
    /// Natal chart and transit reading
    Astrology,
    /// Norse rune casting
    Runes,
}

impl DivinationKind {
    /// All kinds, in menu order.
    pub const ALL: [DivinationKind; 4] = [
        DivinationKind::Tarot,
        DivinationKind::IChing,
        DivinationKind::Astrology,
        DivinationKind::Runes,
    ];

    /// Get the string identifier for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            DivinationKind::Tarot => "tarot",
            DivinationKind::IChing => "iching",
            DivinationKind::Astrology => "astrology",
            DivinationKind::Runes => "runes",
        }
    }

    /// Menu label
    pub fn display_name(&self) -> &'static str {
        match self {
            DivinationKind::Tarot => "塔罗秘境 (Tarot)",
            DivinationKind::IChing => "周易神算 (I Ching)",
            DivinationKind::Astrology => "星盘解读 (Astrology)",
            DivinationKind::Runes => "卢恩符文 (Runes)",
        }
    }

    /// One-line menu description
    pub fn description(&self) -> &'static str {
        match self {
            DivinationKind::Tarot => "揭示过去、现在与未来的潜意识指引。",
            DivinationKind::IChing => "源自东方的古老智慧，解析阴阳变幻。",
            DivinationKind::Astrology => "聆听星辰的低语，洞察宇宙能量。",
            DivinationKind::Runes => "北欧奥丁的神谕，直击命运核心。",
        }
    }

    /// Whether a birth date may stand in for the question.
    pub fn accepts_birth_date(&self) -> bool {
        matches!(self, DivinationKind::Astrology)
    }
}

impl std::fmt::Display for DivinationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DivinationKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tarot" => Ok(DivinationKind::Tarot),
            "iching" | "i-ching" | "i_ching" => Ok(DivinationKind::IChing),
            "astrology" => Ok(DivinationKind::Astrology),
            "runes" => Ok(DivinationKind::Runes),
            _ => Err(DomainError::UnknownKind(s.to_string())),
        }
    }
}
