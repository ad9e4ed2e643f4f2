//! Billing cadence of a subscription.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Enumerates how often a subscription charges.
///
/// Values that are not one of the four known cadences are kept verbatim in
/// [`BillingCycle::Other`] so that a stored collection survives a load/save
/// round trip unchanged. The validation gate rejects them for new input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BillingCycle {
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
    Other(String),
}

impl BillingCycle {
    /// The four cadences accepted by the validation gate, in display order.
    pub const KNOWN: [BillingCycle; 4] = [
        BillingCycle::Weekly,
        BillingCycle::Monthly,
        BillingCycle::Quarterly,
        BillingCycle::Yearly,
    ];

    /// Interprets user or storage text; matching is case-insensitive.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        match raw.trim().to_ascii_lowercase().as_str() {
            "weekly" => BillingCycle::Weekly,
            "monthly" => BillingCycle::Monthly,
            "quarterly" => BillingCycle::Quarterly,
            "yearly" => BillingCycle::Yearly,
            _ => BillingCycle::Other(raw),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            BillingCycle::Weekly => "weekly",
            BillingCycle::Monthly => "monthly",
            BillingCycle::Quarterly => "quarterly",
            BillingCycle::Yearly => "yearly",
            BillingCycle::Other(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, BillingCycle::Other(_))
    }

    /// Human readable label; unknown cycles display their raw text.
    pub fn label(&self) -> &str {
        match self {
            BillingCycle::Weekly => "Weekly",
            BillingCycle::Monthly => "Monthly",
            BillingCycle::Quarterly => "Quarterly",
            BillingCycle::Yearly => "Yearly",
            BillingCycle::Other(raw) => raw,
        }
    }

    /// Number of charges in a calendar year. Unknown cycles count once.
    pub fn payments_per_year(&self) -> u32 {
        match self {
            BillingCycle::Weekly => 52,
            BillingCycle::Monthly => 12,
            BillingCycle::Quarterly => 4,
            BillingCycle::Yearly | BillingCycle::Other(_) => 1,
        }
    }

    pub(crate) fn unspecified() -> Self {
        BillingCycle::Other(String::new())
    }
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<&str> for BillingCycle {
    fn from(value: &str) -> Self {
        BillingCycle::from_raw(value)
    }
}

impl From<String> for BillingCycle {
    fn from(value: String) -> Self {
        BillingCycle::from_raw(value)
    }
}

impl Serialize for BillingCycle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BillingCycle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map(BillingCycle::from_raw).unwrap_or_else(Self::unspecified))
    }
}
