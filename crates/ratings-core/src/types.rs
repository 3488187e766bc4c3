use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::RatingsError;

/// One analyst's price-target call as published by the analyst data provider.
///
/// Deserialization never fails: fields that are missing or of the wrong
/// shape come back as `None`, and the aggregator skips such records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value")]
pub struct RatingRecord {
    #[serde(rename = "priceTarget", skip_serializing_if = "Option::is_none")]
    pub price_target: Option<PriceTarget>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expert: Option<Expert>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceTarget {
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Expert {
    #[serde(rename = "avgReturn")]
    pub avg_return: Option<f64>,
}

impl RatingRecord {
    pub fn new(price_target: Option<f64>, avg_return: Option<f64>) -> Self {
        Self {
            price_target: Some(PriceTarget { value: price_target }),
            expert: avg_return.map(|r| Expert { avg_return: Some(r) }),
        }
    }

    /// The price target if it is usable: present, finite, and non-zero.
    pub fn target_value(&self) -> Option<f64> {
        self.price_target
            .as_ref()
            .and_then(|pt| pt.value)
            .filter(|v| v.is_finite() && *v != 0.0)
    }

    pub fn avg_return(&self) -> Option<f64> {
        self.expert.as_ref().and_then(|e| e.avg_return)
    }

    /// Whether the issuing analyst has a positive historical return.
    pub fn has_positive_return(&self) -> bool {
        self.avg_return().map(|r| r > 0.0).unwrap_or(false)
    }
}

impl From<Value> for RatingRecord {
    fn from(value: Value) -> Self {
        let price_target = value
            .get("priceTarget")
            .filter(|v| v.is_object())
            .map(|pt| PriceTarget {
                value: pt.get("value").and_then(lenient_f64),
            });
        let expert = value
            .get("expert")
            .filter(|v| v.is_object())
            .map(|e| Expert {
                avg_return: e.get("avgReturn").and_then(lenient_f64),
            });

        Self {
            price_target,
            expert,
        }
    }
}

/// Accepts JSON numbers and numeric strings.
fn lenient_f64(v: &Value) -> Option<f64> {
    v.as_f64()
        .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
}

/// Highest, lowest and average price target of a set of ratings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingSummary {
    pub average: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highest: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lowest: Option<f64>,
}

/// Company name and latest price for a symbol, as served by the ticker service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerQuote {
    #[serde(rename = "companyName")]
    pub company_name: String,
    pub price: f64,
    pub symbol: String,
}

/// Current and previous ratings for a symbol together with its quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealtimeData {
    pub rating: RatingSummary,
    pub rating_history: RatingSummary,
    pub ticker: TickerQuote,
}

impl RealtimeData {
    /// True when the current rating differs from the stored history.
    pub fn has_changed(&self) -> bool {
        self.rating != self.rating_history
    }
}

/// Response to a ratings history write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryWriteAck {
    pub success: bool,
    pub symbol: String,
}

/// Check that `symbol` is a plain ticker (letters, digits, `.` and `-`)
/// before it is placed in a URL path.
pub fn validate_symbol(symbol: &str) -> Result<(), RatingsError> {
    let plain = !symbol.is_empty()
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    if plain && symbol != "." && symbol != ".." {
        Ok(())
    } else {
        Err(RatingsError::InvalidData(format!("invalid symbol: {:?}", symbol)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_from_full_json() {
        let record: RatingRecord =
            serde_json::from_value(json!({"priceTarget": {"value": 20}, "expert": {"avgReturn": 0.12}}))
                .unwrap();
        assert_eq!(record.target_value(), Some(20.0));
        assert_eq!(record.avg_return(), Some(0.12));
        assert!(record.has_positive_return());
    }

    #[test]
    fn test_record_tolerates_malformed_fields() {
        let record: RatingRecord =
            serde_json::from_value(json!({"priceTarget": "soon", "expert": null})).unwrap();
        assert_eq!(record.price_target, None);
        assert_eq!(record.expert, None);
        assert_eq!(record.target_value(), None);
        assert!(!record.has_positive_return());

        let record: RatingRecord = serde_json::from_value(json!(42)).unwrap();
        assert_eq!(record, RatingRecord::default());
    }

    #[test]
    fn test_record_zero_and_string_targets() {
        let zero: RatingRecord = serde_json::from_value(json!({"priceTarget": {"value": 0}})).unwrap();
        assert_eq!(zero.target_value(), None);

        let text: RatingRecord =
            serde_json::from_value(json!({"priceTarget": {"value": "31.5"}})).unwrap();
        assert_eq!(text.target_value(), Some(31.5));
    }

    #[test]
    fn test_ratings_array_with_bad_entry_still_parses() {
        let records: Vec<RatingRecord> = serde_json::from_value(json!([
            {"priceTarget": {"value": 10}},
            "garbage",
            {"expert": {"avgReturn": -0.3}}
        ]))
        .unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].target_value(), Some(10.0));
        assert_eq!(records[1].target_value(), None);
        assert_eq!(records[2].avg_return(), Some(-0.3));
    }

    #[test]
    fn test_empty_summary_omits_bounds() {
        let body = serde_json::to_value(RatingSummary::default()).unwrap();
        assert_eq!(body, json!({"average": 0.0}));

        let parsed: RatingSummary = serde_json::from_value(json!({"average": 0})).unwrap();
        assert_eq!(parsed, RatingSummary::default());
    }

    #[test]
    fn test_realtime_wire_names() {
        let data = RealtimeData {
            rating: RatingSummary { average: 12.6, highest: Some(20.0), lowest: Some(5.0) },
            rating_history: RatingSummary::default(),
            ticker: TickerQuote {
                company_name: "Apple Inc.".to_string(),
                price: 150.25,
                symbol: "AAPL".to_string(),
            },
        };
        let body = serde_json::to_value(&data).unwrap();
        assert_eq!(body["ticker"]["companyName"], "Apple Inc.");
        assert_eq!(body["rating_history"]["average"], 0.0);
        assert!(data.has_changed());
    }

    #[test]
    fn test_validate_symbol() {
        for ok in ["AAPL", "msft", "BRK.B", "RDS-A", "7203"] {
            assert!(validate_symbol(ok).is_ok(), "{}", ok);
        }
        for bad in ["", ".", "..", "AAPL/../../v2", "MS FT", "A%2F", "AAPL?apiKey=x", "ÄPL"] {
            assert!(matches!(validate_symbol(bad), Err(RatingsError::InvalidData(_))), "{}", bad);
        }
    }
}
