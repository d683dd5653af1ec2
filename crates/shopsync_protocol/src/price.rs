//! Price payload for `/CreateUpdatePrice`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Date format the service expects: ISO-8601 without fractional seconds.
const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A price entry for one SKU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceUpdate {
    /// SKU identifier.
    pub sku_id: String,
    /// The price window.
    pub price: PriceWindow,
}

/// Regular and discounted price with a validity window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceWindow {
    /// Regular unit price.
    pub price: f64,
    /// Discounted unit price.
    pub discount_price: f64,
    /// Minimum quantity for the regular price.
    pub min_quantity: i64,
    /// Minimum quantity for the discounted price.
    pub discount_min_quantity: i64,
    /// Window start.
    #[serde(with = "wire_date")]
    pub from_date: NaiveDateTime,
    /// Window end.
    #[serde(with = "wire_date")]
    pub to_date: NaiveDateTime,
}

mod wire_date {
    use super::{NaiveDateTime, DATE_FORMAT};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&date.format(DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn window() -> PriceWindow {
        PriceWindow {
            price: 10.0,
            discount_price: 8.5,
            min_quantity: 1,
            discount_min_quantity: 3,
            from_date: NaiveDate::from_ymd_opt(2026, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            to_date: NaiveDate::from_ymd_opt(2026, 6, 30)
                .unwrap()
                .and_hms_opt(23, 59, 59)
                .unwrap(),
        }
    }

    #[test]
    fn date_format_has_no_fraction() {
        let update = PriceUpdate {
            sku_id: "S1".into(),
            price: window(),
        };
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value["price"]["fromDate"], "2026-01-01T00:00:00");
        assert_eq!(value["price"]["toDate"], "2026-06-30T23:59:59");
        assert_eq!(value["price"]["discountMinQuantity"], 3);
    }

    #[test]
    fn parses_wire_dates() {
        let raw = r#"{"skuId":"S1","price":{"price":10.0,"discountPrice":8.5,
            "minQuantity":1,"discountMinQuantity":3,
            "fromDate":"2026-01-01T00:00:00","toDate":"2026-06-30T23:59:59"}}"#;
        let parsed: PriceUpdate = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.price, window());
    }
}
