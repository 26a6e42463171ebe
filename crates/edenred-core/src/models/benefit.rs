use std::fmt;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Provider classification of a benefit wallet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum WalletType {
    /// Lunch benefit
    Main,
    /// Virike (sports and culture) benefit
    Wellness,
    Other(String),
}

impl WalletType {
    pub fn as_str(&self) -> &str {
        match self {
            WalletType::Main => "main",
            WalletType::Wellness => "wellness",
            WalletType::Other(name) => name,
        }
    }
}

impl Default for WalletType {
    fn default() -> Self {
        WalletType::Other(String::new())
    }
}

impl From<String> for WalletType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "main" => WalletType::Main,
            "wellness" => WalletType::Wellness,
            _ => WalletType::Other(name),
        }
    }
}

impl From<&str> for WalletType {
    fn from(name: &str) -> Self {
        WalletType::from(name.to_string())
    }
}

impl fmt::Display for WalletType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid balance {raw:?}")]
pub struct ParseBalanceError {
    raw: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("parse {wallet_type} balance: {source}")]
pub struct WalletParseError {
    pub wallet_type: WalletType,
    pub source: ParseBalanceError,
}

/// Wallet balance exactly as the provider sent it.
///
/// The API is inconsistent about units: whole numbers are cents, numbers
/// with a fractional part are already euros. The field may also arrive as a
/// numeric string, `null`, or not at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawBalance(String);

impl RawBalance {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Convert to euros. Integer parse is tried first so `6850` means 68.50.
    pub fn to_major_units(&self) -> Result<f64, ParseBalanceError> {
        let raw = self.0.trim();
        if raw.is_empty() {
            return Ok(0.0);
        }
        if let Ok(minor) = raw.parse::<i64>() {
            return Ok(minor as f64 / 100.0);
        }
        match raw.parse::<f64>() {
            Ok(major) if major.is_finite() => Ok(major),
            _ => Err(ParseBalanceError {
                raw: raw.to_string(),
            }),
        }
    }
}

impl<'de> Deserialize<'de> for RawBalance {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(serde_json::Number),
            Text(String),
        }

        Ok(match Option::<Repr>::deserialize(deserializer)? {
            Some(Repr::Number(n)) => RawBalance(n.to_string()),
            Some(Repr::Text(s)) => RawBalance(s),
            None => RawBalance::default(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BenefitWallet {
    #[serde(rename = "walletType", default)]
    pub wallet_type: WalletType,
    #[serde(default)]
    pub balance: RawBalance,
    #[serde(rename = "cardType", default)]
    pub card_type: Option<String>,
    #[serde(rename = "cardStatus", default)]
    pub card_status: Option<String>,
    #[serde(rename = "mobileAvailable", default)]
    pub mobile_available: Option<bool>,
    #[serde(rename = "mobilePaymentEnabled", default)]
    pub mobile_payment_enabled: Option<bool>,
    #[serde(rename = "expectsRenewedCard", default)]
    pub expects_renewed_card: Option<String>,
    #[serde(rename = "accountActive", default)]
    pub account_active: Option<bool>,
}

impl BenefitWallet {
    pub fn new(wallet_type: impl Into<WalletType>, balance: RawBalance) -> Self {
        Self {
            wallet_type: wallet_type.into(),
            balance,
            card_type: None,
            card_status: None,
            mobile_available: None,
            mobile_payment_enabled: None,
            expects_renewed_card: None,
            account_active: None,
        }
    }

    /// Balance in euros, with parse failures naming this wallet.
    pub fn normalized_balance(&self) -> Result<f64, WalletParseError> {
        self.balance
            .to_major_units()
            .map_err(|source| WalletParseError {
                wallet_type: self.wallet_type.clone(),
                source,
            })
    }
}

/// Response body of `GET /users/me/user-benefits`
#[derive(Debug, Clone, Deserialize)]
pub struct UserBenefitsResponse {
    #[serde(default)]
    pub benefits: Vec<BenefitWallet>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wallet_from(json: &str) -> BenefitWallet {
        serde_json::from_str(json).expect("Failed to parse wallet test JSON")
    }

    #[test]
    fn test_integer_balance_is_minor_units() {
        assert_eq!(RawBalance::new("6850").to_major_units(), Ok(68.5));
        assert_eq!(RawBalance::new("12345").to_major_units(), Ok(123.45));
        assert_eq!(RawBalance::new("0").to_major_units(), Ok(0.0));
        assert_eq!(RawBalance::new("-250").to_major_units(), Ok(-2.5));
    }

    #[test]
    fn test_fractional_balance_is_major_units() {
        assert_eq!(RawBalance::new("12.34").to_major_units(), Ok(12.34));
        assert_eq!(RawBalance::new("12.0").to_major_units(), Ok(12.0));
        assert_eq!(RawBalance::new("0.5").to_major_units(), Ok(0.5));
    }

    #[test]
    fn test_empty_balance_is_zero() {
        assert_eq!(RawBalance::default().to_major_units(), Ok(0.0));
        assert_eq!(RawBalance::new("   ").to_major_units(), Ok(0.0));
    }

    #[test]
    fn test_invalid_balance() {
        assert!(RawBalance::new("12,34").to_major_units().is_err());
        assert!(RawBalance::new("abc").to_major_units().is_err());
        assert!(RawBalance::new("inf").to_major_units().is_err());
        assert!(RawBalance::new("NaN").to_major_units().is_err());
    }

    #[test]
    fn test_deserialize_balance_representations() {
        assert_eq!(wallet_from(r#"{"balance": 6850}"#).balance.as_str(), "6850");
        assert_eq!(wallet_from(r#"{"balance": 12.34}"#).balance.as_str(), "12.34");
        assert_eq!(wallet_from(r#"{"balance": "4200"}"#).balance.as_str(), "4200");
        assert!(wallet_from(r#"{"balance": null}"#).balance.is_empty());
        assert!(wallet_from(r#"{}"#).balance.is_empty());
    }

    #[test]
    fn test_deserialize_full_wallet() {
        let wallet = wallet_from(
            r#"{"cardType": "VIRTUAL", "walletType": "wellness", "cardStatus": "ACTIVE", "balance": 12345, "mobileAvailable": true, "mobilePaymentEnabled": false, "expectsRenewedCard": null, "accountActive": true}"#,
        );
        assert_eq!(wallet.wallet_type, WalletType::Wellness);
        assert_eq!(wallet.card_type.as_deref(), Some("VIRTUAL"));
        assert_eq!(wallet.card_status.as_deref(), Some("ACTIVE"));
        assert_eq!(wallet.mobile_available, Some(true));
        assert_eq!(wallet.mobile_payment_enabled, Some(false));
        assert_eq!(wallet.expects_renewed_card, None);
        assert_eq!(wallet.account_active, Some(true));
        assert_eq!(wallet.normalized_balance(), Ok(123.45));
    }

    #[test]
    fn test_wallet_type_from_string() {
        assert_eq!(WalletType::from("main"), WalletType::Main);
        assert_eq!(WalletType::from("wellness"), WalletType::Wellness);
        assert_eq!(WalletType::from("gift"), WalletType::Other("gift".to_string()));
        assert_eq!(WalletType::from("gift").to_string(), "gift");
    }

    #[test]
    fn test_parse_error_names_wallet() {
        let wallet = BenefitWallet::new("main", RawBalance::new("lots"));
        let err = wallet.normalized_balance().unwrap_err();
        assert_eq!(err.wallet_type, WalletType::Main);
        assert_eq!(err.to_string(), r#"parse main balance: invalid balance "lots""#);
    }

    #[test]
    fn test_missing_benefits_field() {
        let resp: UserBenefitsResponse =
            serde_json::from_str("{}").expect("Failed to parse empty response");
        assert!(resp.benefits.is_empty());
    }
}
