use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    #[default]
    None,
    Daily,
    Weekly,
}

impl Display for RepeatMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mode = match self {
            RepeatMode::None => "none",
            RepeatMode::Daily => "daily",
            RepeatMode::Weekly => "weekly",
        };
        write!(f, "{}", mode)
    }
}

impl FromStr for RepeatMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "none" => Ok(RepeatMode::None),
            "daily" => Ok(RepeatMode::Daily),
            "weekly" => Ok(RepeatMode::Weekly),
            other => Err(format!("Unsupported repeat mode: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_stored_value() {
        for mode in [RepeatMode::None, RepeatMode::Daily, RepeatMode::Weekly] {
            assert_eq!(mode.to_string().parse::<RepeatMode>().unwrap(), mode);
        }
    }

    #[test]
    fn unknown_value_is_rejected() {
        let err = "hourly".parse::<RepeatMode>().unwrap_err();
        assert!(err.contains("Unsupported repeat mode"));
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&RepeatMode::Weekly).unwrap();
        assert_eq!(json, "\"weekly\"");
        let mode: RepeatMode = serde_json::from_str("\"daily\"").unwrap();
        assert_eq!(mode, RepeatMode::Daily);
    }
}
