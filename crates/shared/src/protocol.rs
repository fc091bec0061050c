use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{ListingId, SellerId, UserId};

/// Query parameters for one page of a seller's listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: String,
}

/// Spring-style page envelope returned by the catalog service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub content: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_elements: Option<u64>,
}

impl<T> PageResponse<T> {
    pub fn new(content: Vec<T>, last: bool) -> Self {
        Self {
            content,
            last: Some(last),
            number: None,
            total_pages: None,
            total_elements: None,
        }
    }

    /// Only an explicit `last: true` ends pagination.
    pub fn is_last(&self) -> bool {
        self.last == Some(true)
    }
}

/// Minimal catalog record as returned by a list page.
///
/// Every category names its identifier differently (`bikeId`, `carId`, ...) and bikes
/// may report the price as `prize`; both are folded into the common fields here.
/// Category-specific secondary fields stay in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingSummary {
    #[serde(alias = "bikeId", alias = "carId", alias = "laptopId", alias = "mobileId")]
    pub id: ListingId,
    #[serde(default, deserialize_with = "lenient::text_or_empty")]
    pub title: String,
    #[serde(default, alias = "prize", deserialize_with = "lenient::number")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::seller_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub seller_id: Option<SellerId>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ListingSummary {
    pub fn new(id: ListingId, title: impl Into<String>, status: Option<&str>) -> Self {
        Self {
            id,
            title: title.into(),
            price: None,
            status: status.map(str::to_string),
            images: Vec::new(),
            brand: None,
            model: None,
            seller_id: None,
            extra: Map::new(),
        }
    }

    /// "brand | model" with blank parts dropped.
    pub fn subtitle(&self) -> String {
        [self.brand.as_deref(), self.model.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" | ")
    }

    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Full listing record returned by `getById`.
///
/// All category fields are kept as raw JSON in `fields`; the engine reads them through
/// its category schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingDetail {
    #[serde(
        default,
        alias = "bikeId",
        alias = "carId",
        alias = "laptopId",
        alias = "mobileId",
        deserialize_with = "lenient::listing_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<ListingId>,
    #[serde(
        default,
        deserialize_with = "lenient::seller_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub seller_id: Option<SellerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub images: Vec<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ListingDetail {
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).filter(|value| !value.is_null())
    }

    /// A numeric field, accepting numbers and numeric strings.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.field(key).and_then(lenient::value_as_f64)
    }
}

/// Normalised result of `createListing`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedListing {
    pub id: Option<ListingId>,
    pub code: String,
    pub message: String,
}

/// Seller record as served by the sellers endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerProfile {
    #[serde(default, deserialize_with = "lenient::seller_id")]
    pub seller_id: Option<SellerId>,
    #[serde(default)]
    pub user: SellerContact,
}

/// Contact fields of the user behind a seller account.
///
/// The service sends `mobileNumber` either as a number or a string; it is always
/// held as text here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerContact {
    #[serde(default, deserialize_with = "lenient::user_id")]
    pub id: Option<UserId>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub mobile_number: Option<String>,
}

/// Combined price + seller contact shown on the confirm step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmDetails {
    pub price: String,
    pub name: String,
    pub phone_number: String,
}

/// Deserializers that degrade malformed values to `None` instead of failing the record.
pub mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use crate::domain::{ListingId, SellerId, UserId};

    /// Largest magnitude below which every whole `f64` maps to exactly one `i64`.
    pub const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

    /// `value` as an `i64` when it is whole and small enough to convert exactly.
    pub fn whole_number(value: f64) -> Option<i64> {
        (value.is_finite() && value.fract() == 0.0 && value.abs() < MAX_EXACT_INTEGER)
            .then_some(value as i64)
    }

    pub fn value_as_f64(value: &Value) -> Option<f64> {
        match value {
            Value::Number(number) => number.as_f64().filter(|v| v.is_finite()),
            Value::String(text) => text.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }

    pub fn value_as_i64(value: &Value) -> Option<i64> {
        match value {
            Value::Number(number) => number.as_i64().or_else(|| {
                number.as_f64().and_then(whole_number)
            }),
            Value::String(text) => text.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    pub fn value_as_text(value: &Value) -> Option<String> {
        match value {
            Value::Null => None,
            Value::String(text) => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            Value::Bool(flag) => Some(flag.to_string()),
            _ => None,
        }
    }

    pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(value_as_f64))
    }

    pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(value_as_text))
    }

    /// Missing, `null` or non-scalar text becomes the empty string.
    pub fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(text(deserializer)?.unwrap_or_default())
    }

    /// A list of strings; `null` becomes empty and non-string entries are skipped.
    pub fn strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        })
    }

    pub fn listing_id<'de, D>(deserializer: D) -> Result<Option<ListingId>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(value_as_i64).map(ListingId))
    }

    pub fn seller_id<'de, D>(deserializer: D) -> Result<Option<SellerId>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(value_as_i64).map(SellerId))
    }

    pub fn user_id<'de, D>(deserializer: D) -> Result<Option<UserId>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(value_as_i64).map(UserId))
    }
}
