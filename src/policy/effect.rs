//! Policy effects and their textual form.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::PolicyError;

/// Outcome of a statement or of an aggregated evaluation.
///
/// `Unspecified` is an internal aggregation result only: a statement is
/// never constructed with it, and it has no textual form. Absence of an
/// explicit grant never implies access, so an `Unspecified` final result is
/// treated as a denial by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    Allow,
    Deny,
    Unspecified,
}

impl Effect {
    /// Display token for this effect. Fails for `Unspecified`, which must
    /// never be rendered or persisted.
    pub fn as_str(&self) -> Result<&'static str, PolicyError> {
        match self {
            Self::Allow => Ok("Allow"),
            Self::Deny => Ok("Deny"),
            Self::Unspecified => Err(PolicyError::InvalidEffect("Unspecified".to_owned())),
        }
    }

    /// Parse `allow` / `deny`, case-insensitively. Everything else fails,
    /// including any spelling of "unspecified".
    pub fn parse(token: &str) -> Result<Self, PolicyError> {
        match token.to_ascii_lowercase().as_str() {
            "allow" => Ok(Self::Allow),
            "deny" => Ok(Self::Deny),
            _ => Err(PolicyError::InvalidEffect(token.to_owned())),
        }
    }
}

impl Serialize for Effect {
    /// Serializes through [`Effect::as_str`], so `Unspecified` fails instead
    /// of being persisted.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let token = self.as_str().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(token)
    }
}

impl<'de> Deserialize<'de> for Effect {
    /// Deserializes through [`Effect::parse`], so only `allow`/`deny`
    /// spellings are accepted.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Effect::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(Effect::parse("allow"), Ok(Effect::Allow));
        assert_eq!(Effect::parse("ALLOW"), Ok(Effect::Allow));
        assert_eq!(Effect::parse("Deny"), Ok(Effect::Deny));
    }

    #[test]
    fn test_parse_rejects_unknown_tokens() {
        for token in ["permit", "unspecified", ""] {
            assert_eq!(
                Effect::parse(token),
                Err(PolicyError::InvalidEffect(token.to_owned()))
            );
        }
    }

    #[test]
    fn test_as_str() {
        assert_eq!(Effect::Allow.as_str(), Ok("Allow"));
        assert_eq!(Effect::Deny.as_str(), Ok("Deny"));
        assert!(Effect::Unspecified.as_str().is_err());
    }

    #[test]
    fn test_serde_goes_through_the_textual_form() {
        assert_eq!(serde_json::to_string(&Effect::Allow).unwrap(), "\"Allow\"");
        assert_eq!(serde_json::to_string(&Effect::Deny).unwrap(), "\"Deny\"");

        let back: Effect = serde_json::from_str("\"deny\"").unwrap();
        assert_eq!(back, Effect::Deny);

        // The internal marker can neither be persisted nor parsed back.
        assert!(serde_json::to_string(&Effect::Unspecified).is_err());
        let bad: Result<Effect, _> = serde_json::from_str("\"Unspecified\"");
        assert!(bad.is_err());
    }
}
