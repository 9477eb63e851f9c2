use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{percent_to_rate, Money, Percent};

/// Commission terms recorded on a pipeline deal. Either field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionTerms {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commission_percent: Option<Percent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commission_amount: Option<Money>,
}

/// Which rule produced the commission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CommissionSource {
    Percent,
    Amount,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionResolution {
    pub amount: Money,
    pub source: CommissionSource,
}

/// Resolve a deal's commission in priority order:
///
/// 1. `commission_percent` of `deal_value`, when present
/// 2. `commission_amount`, when present
/// 3. zero
///
/// A percentage wins even when an amount is also recorded.
pub fn resolve_commission(terms: &CommissionTerms, deal_value: Money) -> CommissionResolution {
    if let Some(percent) = terms.commission_percent {
        return CommissionResolution {
            amount: deal_value * percent_to_rate(percent),
            source: CommissionSource::Percent,
        };
    }

    if let Some(amount) = terms.commission_amount {
        return CommissionResolution {
            amount,
            source: CommissionSource::Amount,
        };
    }

    CommissionResolution {
        amount: Decimal::ZERO,
        source: CommissionSource::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_percent_takes_priority() {
        let terms = CommissionTerms {
            commission_percent: Some(dec!(3)),
            commission_amount: Some(dec!(5000)),
        };
        let r = resolve_commission(&terms, dec!(400000));
        assert_eq!(r.amount, dec!(12000));
        assert_eq!(r.source, CommissionSource::Percent);
    }

    #[test]
    fn test_amount_when_no_percent() {
        let terms = CommissionTerms {
            commission_percent: None,
            commission_amount: Some(dec!(5000)),
        };
        let r = resolve_commission(&terms, dec!(400000));
        assert_eq!(r.amount, dec!(5000));
        assert_eq!(r.source, CommissionSource::Amount);
    }

    #[test]
    fn test_zero_when_nothing_recorded() {
        let r = resolve_commission(&CommissionTerms::default(), dec!(400000));
        assert_eq!(r.amount, Decimal::ZERO);
        assert_eq!(r.source, CommissionSource::None);
    }

    #[test]
    fn test_explicit_zero_percent_still_wins() {
        let terms = CommissionTerms {
            commission_percent: Some(Decimal::ZERO),
            commission_amount: Some(dec!(5000)),
        };
        let r = resolve_commission(&terms, dec!(400000));
        assert_eq!(r.amount, Decimal::ZERO);
        assert_eq!(r.source, CommissionSource::Percent);
    }
}
