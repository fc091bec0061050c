use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use shared::{
    domain::{Category, ListingId},
    protocol::{lenient, CreatedListing},
};

fn bike_id_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?i)BikeId:(\d+)").ok())
        .as_ref()
}

/// Pulls the numeric id out of a `"BikeId:<digits>"` status string.
pub fn extract_bike_id(data: &str) -> Option<ListingId> {
    bike_id_pattern()?
        .captures(data)?
        .get(1)?
        .as_str()
        .parse::<i64>()
        .ok()
        .map(ListingId)
}

/// Normalises a raw create response.
///
/// Bikes embed the id in the `data` string; the other categories return it as a direct
/// field (`carId`, `laptopId`, `mobileId`, or plain `id`). A missing or malformed id
/// leaves `id` empty; it is never an error.
pub fn parse_created_listing(category: Category, body: &Value) -> CreatedListing {
    let id = match category {
        Category::Bike => body
            .get("data")
            .and_then(Value::as_str)
            .and_then(extract_bike_id),
        _ => [category.id_key(), "id"]
            .into_iter()
            .find_map(|key| body.get(key).and_then(lenient::value_as_i64))
            .map(ListingId),
    };

    let code = body
        .get("status")
        .or_else(|| body.get("code"))
        .and_then(lenient::value_as_text)
        .filter(|code| !code.trim().is_empty())
        .unwrap_or_else(|| "200".to_string());
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .filter(|message| !message.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{} created successfully", category.label()));

    CreatedListing { id, code, message }
}
