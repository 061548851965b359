//! Static policy configuration: confidence cut points and reply texts.
//!
//! The bot variants this policy replaces differed only in these values, so
//! they survive as presets ([`PolicyConfig::unit_scale`],
//! [`PolicyConfig::conversational`]) rather than as separate code paths.

use thiserror::Error;

/// Errors from building or validating a [`PolicyConfig`].
#[derive(Debug, Error, PartialEq)]
pub enum PolicyConfigError {
    #[error("[Answer Policy] unknown preset: {0}")]
    UnknownPreset(String),

    #[error("[Answer Policy] invalid number in {var}: {value}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("[Answer Policy] invalid boolean in {var}: {value}")]
    InvalidBool { var: &'static str, value: String },

    #[error("[Answer Policy] confidence bands out of order: {0}")]
    BandOrder(&'static str),
}

/// User-facing texts. Never contain backend error details.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyMessages {
    /// Sent when there is no usable answer (empty list or no-match score).
    pub no_answer: String,
    /// Header before the per-candidate blocks of a low-confidence reply.
    pub low_confidence_header: String,
    /// Caveat before the top answer of a medium-confidence reply.
    pub medium_confidence_caveat: String,
    /// Header before the remaining candidates when `list_other_topics` is on.
    pub other_topics_header: String,
    /// Title of the follow-up prompt card.
    pub related_topics_title: String,
}

impl Default for PolicyMessages {
    fn default() -> Self {
        Self {
            no_answer: "I couldn't find an answer to that. Try rephrasing your question.".into(),
            low_confidence_header: "Did you mean to ask about:".into(),
            medium_confidence_caveat: "This seems related to what you asked:".into(),
            other_topics_header: "I also found these topics:".into(),
            related_topics_title: "Related topics".into(),
        }
    }
}

/// Cut points and texts driving [`crate::render`].
///
/// A top score `<= no_match_score` means no match; `< low_confidence_below`
/// is low confidence; `< medium_confidence_below` (if set) is medium; anything
/// else is high.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyConfig {
    pub no_match_score: f64,
    pub low_confidence_below: f64,
    pub medium_confidence_below: Option<f64>,
    /// List the remaining candidates after a high-confidence text answer.
    pub list_other_topics: bool,
    pub messages: PolicyMessages,
}

impl Default for PolicyConfig {
    /// Raw `generateanswer` scale (0..=100).
    fn default() -> Self {
        Self {
            no_match_score: 0.0,
            low_confidence_below: 50.0,
            medium_confidence_below: Some(70.0),
            list_other_topics: false,
            messages: PolicyMessages::default(),
        }
    }
}

impl PolicyConfig {
    /// Normalized 0..=1 scores, as produced by SDK wrappers of the API.
    pub fn unit_scale() -> Self {
        Self {
            no_match_score: 0.0,
            low_confidence_below: 0.5,
            medium_confidence_below: Some(0.7),
            list_other_topics: true,
            messages: PolicyMessages::default(),
        }
    }

    /// Persona-style bot: one low cut point and a small-talk fallback.
    pub fn conversational() -> Self {
        Self {
            no_match_score: 0.0,
            low_confidence_below: 20.0,
            medium_confidence_below: None,
            list_other_topics: false,
            messages: PolicyMessages {
                no_answer: "It looks like I didn't understand you. Try using different terms, \
                            and use very simple language."
                    .into(),
                ..PolicyMessages::default()
            },
        }
    }

    /// Resolves a preset by name: `default`, `unit` or `conversational`.
    pub fn preset(name: &str) -> Result<Self, PolicyConfigError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "" | "default" => Ok(Self::default()),
            "unit" | "unit_scale" => Ok(Self::unit_scale()),
            "conversational" => Ok(Self::conversational()),
            other => Err(PolicyConfigError::UnknownPreset(other.to_string())),
        }
    }

    /// Checks `no_match_score < low_confidence_below <= medium_confidence_below`.
    pub fn validate(&self) -> Result<(), PolicyConfigError> {
        if !(self.no_match_score.is_finite() && self.low_confidence_below.is_finite()) {
            return Err(PolicyConfigError::BandOrder("cut points must be finite"));
        }
        if self.no_match_score >= self.low_confidence_below {
            return Err(PolicyConfigError::BandOrder(
                "no_match_score must be below low_confidence_below",
            ));
        }
        if let Some(mid) = self.medium_confidence_below {
            if !mid.is_finite() || mid < self.low_confidence_below {
                return Err(PolicyConfigError::BandOrder(
                    "medium_confidence_below must not be below low_confidence_below",
                ));
            }
        }
        Ok(())
    }

    /// Builds a config from environment variables.
    ///
    /// - `QNA_POLICY_PRESET`     = `default` | `unit` | `conversational`
    /// - `QNA_NO_MATCH_SCORE`    = override of the no-match cut point
    /// - `QNA_LOW_CONFIDENCE`    = override of the low band
    /// - `QNA_MEDIUM_CONFIDENCE` = override of the medium band (`none` disables it)
    /// - `QNA_LIST_OTHER_TOPICS` = `true` | `false`
    pub fn from_env() -> Result<Self, PolicyConfigError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Same as [`PolicyConfig::from_env`] over an arbitrary key lookup.
    pub fn from_lookup<F>(get: F) -> Result<Self, PolicyConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| get(k).filter(|v| !v.trim().is_empty());

        let mut cfg = match get("QNA_POLICY_PRESET") {
            Some(name) => Self::preset(&name)?,
            None => Self::default(),
        };

        if let Some(v) = get("QNA_NO_MATCH_SCORE") {
            cfg.no_match_score = parse_f64("QNA_NO_MATCH_SCORE", &v)?;
        }
        if let Some(v) = get("QNA_LOW_CONFIDENCE") {
            cfg.low_confidence_below = parse_f64("QNA_LOW_CONFIDENCE", &v)?;
        }
        if let Some(v) = get("QNA_MEDIUM_CONFIDENCE") {
            cfg.medium_confidence_below = if v.trim().eq_ignore_ascii_case("none") {
                None
            } else {
                Some(parse_f64("QNA_MEDIUM_CONFIDENCE", &v)?)
            };
        }
        if let Some(v) = get("QNA_LIST_OTHER_TOPICS") {
            cfg.list_other_topics = match v.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => {
                    return Err(PolicyConfigError::InvalidBool {
                        var: "QNA_LIST_OTHER_TOPICS",
                        value: v,
                    });
                }
            };
        }

        cfg.validate()?;
        Ok(cfg)
    }
}

fn parse_f64(var: &'static str, value: &str) -> Result<f64, PolicyConfigError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|x| x.is_finite())
        .ok_or_else(|| PolicyConfigError::InvalidNumber {
            var,
            value: value.to_string(),
        })
}
