use serde::Serialize;

use super::benefit::{BenefitWallet, WalletParseError, WalletType};

/// Lunch and Virike balances in euros.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Balances {
    pub lunch: f64,
    pub virike: f64,
}

impl Balances {
    /// Fold a wallet list into the two reported balances.
    ///
    /// Every balance must parse, including those of wallet types other than
    /// `main` and `wellness`, which are then dropped. A missing wallet leaves
    /// its amount at zero, and a repeated wallet type keeps the last entry.
    pub fn from_wallets(wallets: &[BenefitWallet]) -> Result<Self, WalletParseError> {
        let mut balances = Balances::default();
        for wallet in wallets {
            let amount = wallet.normalized_balance()?;
            match wallet.wallet_type {
                WalletType::Main => balances.lunch = amount,
                WalletType::Wellness => balances.virike = amount,
                WalletType::Other(_) => {}
            }
        }
        Ok(balances)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawBalance;

    fn wallet(wallet_type: &str, balance: &str) -> BenefitWallet {
        BenefitWallet::new(wallet_type, RawBalance::new(balance))
    }

    #[test]
    fn test_from_wallets() {
        let balances =
            Balances::from_wallets(&[wallet("main", "6850"), wallet("wellness", "12345")])
                .expect("Failed to fold wallets");
        assert_eq!(balances, Balances { lunch: 68.5, virike: 123.45 });
    }

    #[test]
    fn test_absent_wallet_defaults_to_zero() {
        let balances = Balances::from_wallets(&[wallet("main", "12.34")])
            .expect("Failed to fold wallets");
        assert_eq!(balances, Balances { lunch: 12.34, virike: 0.0 });

        let balances = Balances::from_wallets(&[]).expect("Failed to fold wallets");
        assert_eq!(balances, Balances::default());
    }

    #[test]
    fn test_unknown_wallets_are_ignored() {
        let balances = Balances::from_wallets(&[wallet("gift", "999"), wallet("wellness", "2000")])
            .expect("Failed to fold wallets");
        assert_eq!(balances, Balances { lunch: 0.0, virike: 20.0 });
    }

    #[test]
    fn test_unknown_wallet_with_bad_balance_fails() {
        let err = Balances::from_wallets(&[wallet("gift", "garbage"), wallet("main", "6850")])
            .unwrap_err();
        assert_eq!(err.wallet_type, WalletType::Other("gift".to_string()));
        assert!(err.to_string().starts_with("parse gift balance"));
    }

    #[test]
    fn test_repeated_wallet_keeps_last() {
        let balances = Balances::from_wallets(&[wallet("main", "100"), wallet("main", "250")])
            .expect("Failed to fold wallets");
        assert_eq!(balances.lunch, 2.5);
    }

    #[test]
    fn test_parse_error_aborts() {
        let err = Balances::from_wallets(&[wallet("main", "100"), wallet("wellness", "x")])
            .unwrap_err();
        assert_eq!(err.wallet_type, WalletType::Wellness);
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&Balances { lunch: 68.5, virike: 0.0 })
            .expect("Failed to serialize balances");
        assert_eq!(json, r#"{"lunch":68.5,"virike":0.0}"#);
    }
}
