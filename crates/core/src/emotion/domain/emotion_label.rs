use std::fmt;
use std::str::FromStr;

/// The closed set of emotions the overlay knows how to name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EmotionLabel {
    Angry,
    Disgust,
    Fear,
    Happy,
    Sad,
    Surprise,
    Neutral,
}

impl EmotionLabel {
    pub const ALL: [EmotionLabel; 7] = [
        EmotionLabel::Angry,
        EmotionLabel::Disgust,
        EmotionLabel::Fear,
        EmotionLabel::Happy,
        EmotionLabel::Sad,
        EmotionLabel::Surprise,
        EmotionLabel::Neutral,
    ];

    /// Parses a raw label as produced by the analyzer (`"happy"`, ...).
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|label| label.key() == raw)
    }

    /// Lowercase key used in analysis records.
    pub fn key(self) -> &'static str {
        match self {
            EmotionLabel::Angry => "angry",
            EmotionLabel::Disgust => "disgust",
            EmotionLabel::Fear => "fear",
            EmotionLabel::Happy => "happy",
            EmotionLabel::Sad => "sad",
            EmotionLabel::Surprise => "surprise",
            EmotionLabel::Neutral => "neutral",
        }
    }

    pub fn display_name(self, language: DisplayLanguage) -> &'static str {
        match language {
            DisplayLanguage::English => match self {
                EmotionLabel::Angry => "Angry",
                EmotionLabel::Disgust => "Disgust",
                EmotionLabel::Fear => "Fear",
                EmotionLabel::Happy => "Happy",
                EmotionLabel::Sad => "Sad",
                EmotionLabel::Surprise => "Surprise",
                EmotionLabel::Neutral => "Neutral",
            },
            DisplayLanguage::Chinese => match self {
                EmotionLabel::Angry => "生气",
                EmotionLabel::Disgust => "厌恶",
                EmotionLabel::Fear => "恐惧",
                EmotionLabel::Happy => "开心",
                EmotionLabel::Sad => "悲伤",
                EmotionLabel::Surprise => "惊讶",
                EmotionLabel::Neutral => "中性",
            },
        }
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Language used for on-screen emotion names. Chosen once at startup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DisplayLanguage {
    English,
    #[default]
    Chinese,
}

impl FromStr for DisplayLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(DisplayLanguage::English),
            "zh" | "chinese" => Ok(DisplayLanguage::Chinese),
            other => Err(format!("Language must be 'en' or 'zh', got '{other}'")),
        }
    }
}

/// Display string for a raw analyzer label. Unknown labels pass through verbatim.
pub fn translate_label(raw: &str, language: DisplayLanguage) -> &str {
    match EmotionLabel::parse(raw) {
        Some(label) => label.display_name(language),
        None => raw,
    }
}
