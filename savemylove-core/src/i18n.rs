//! Interface language of the front end.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "zh")]
    Chinese,
    #[default]
    #[serde(rename = "en")]
    English,
}

impl Language {
    /// Short code used on the command line and in configuration
    pub fn code(self) -> &'static str {
        match self {
            Self::Chinese => "zh",
            Self::English => "en",
        }
    }

    /// Name substituted for `{lang}` in prompt templates
    pub fn prompt_name(self) -> &'static str {
        match self {
            Self::Chinese => "中文",
            Self::English => "English",
        }
    }

    /// Tag line that steers the model toward one half of a bilingual prompt
    pub fn prompt_tag(self) -> &'static str {
        match self {
            Self::Chinese => "[Language: Chinese]\n",
            Self::English => "[Language: English]\n",
        }
    }

    /// Generic failure text shown in place of a result
    pub fn error_occurred(self) -> &'static str {
        match self {
            Self::Chinese => "抱歉，发生了一些错误。请稍后再试。",
            Self::English => "Sorry, an error occurred. Please try again later.",
        }
    }

    pub fn analysis_result(self) -> &'static str {
        match self {
            Self::Chinese => "分析结果",
            Self::English => "Analysis Result",
        }
    }

    pub fn analyzing(self) -> &'static str {
        match self {
            Self::Chinese => "分析中...",
            Self::English => "Analyzing...",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zh" | "cn" | "chinese" | "中文" => Ok(Self::Chinese),
            "en" | "english" => Ok(Self::English),
            other => Err(format!("unsupported language '{other}', expected 'zh' or 'en'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_and_names() {
        assert_eq!("zh".parse::<Language>(), Ok(Language::Chinese));
        assert_eq!("English".parse::<Language>(), Ok(Language::English));
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn prompt_names_match_template_expectations() {
        assert_eq!(Language::Chinese.prompt_name(), "中文");
        assert_eq!(Language::English.prompt_tag(), "[Language: English]\n");
    }
}
