use std::fmt;

use serde::Deserialize;

/// Languages the gallery ships text for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Locale {
    #[default]
    En,
    Zh,
}

impl Locale {
    /// Parse a locale tag such as `zh-CN`, `zh_TW` or `en-US`. Anything
    /// without a Chinese language subtag falls back to English.
    pub fn parse(tag: &str) -> Self {
        let tag = tag.trim().replace('_', "-");
        let language = tag.split('-').next().unwrap_or_default();
        if language.eq_ignore_ascii_case("zh") {
            Locale::Zh
        } else {
            Locale::En
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Zh => "zh",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A string with an English original and an optional Chinese translation
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LocalizedText {
    pub en: String,
    #[serde(default)]
    pub zh: Option<String>,
}

impl LocalizedText {
    pub fn new(en: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            zh: None,
        }
    }

    /// Text for `locale`, falling back to English
    pub fn get(&self, locale: Locale) -> &str {
        match locale {
            Locale::Zh => self.zh.as_deref().unwrap_or(&self.en),
            Locale::En => &self.en,
        }
    }
}
