use serde::{Deserialize, Serialize};

use crate::EngineError;

/// ISO-like currency code tagging a group's checkpoint and summaries.
///
/// Divvy is effectively mono-currency per group (default `INR`, matching the
/// deployments this engine grew out of). The engine never converts between
/// currencies; the code is carried so summaries can label their amounts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Inr,
    Eur,
    Usd,
}

impl Currency {
    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Inr => "INR",
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
        }
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "INR" => Ok(Currency::Inr),
            "EUR" => Ok(Currency::Eur),
            "USD" => Ok(Currency::Usd),
            other => Err(EngineError::InvalidValue(format!(
                "unsupported currency: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_failure_is_an_invalid_value() {
        assert!(matches!(
            Currency::try_from("XYZ").unwrap_err(),
            EngineError::InvalidValue(_)
        ));
        assert_eq!(Currency::try_from(" eur ").unwrap(), Currency::Eur);
    }
}
