//! Change detection for update screens.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::{Map, Value};
use shared::domain::{Category, SellerId};

use crate::{
    form::{BaselineSnapshot, FieldValue, FormState},
    mapper::wire,
    schema::{schema_for, FieldKind, FieldSpec},
};

/// Names of the fields whose normalised value differs from the baseline.
///
/// Without a baseline every field counts as changed, so an edit made after a failed load
/// is never dropped. Fields the baseline never had are reported as changed as well.
pub fn changed_fields(
    current: &FormState,
    baseline: Option<&BaselineSnapshot>,
) -> BTreeSet<String> {
    let Some(baseline) = baseline else {
        return current.names().map(str::to_string).collect();
    };
    current
        .iter()
        .filter(|(name, value)| {
            !baseline.contains(name) || value.normalized() != baseline.get(name).normalized()
        })
        .map(|(name, _)| name.to_string())
        .collect()
}

/// Partial update body: the changed fields plus the owning seller.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct UpdatePayload(Map<String, Value>);

impl UpdatePayload {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

/// Builds the body for `updateListing`, or `None` when nothing changed.
///
/// `None` means the caller must not touch the network. The seller id rides along with
/// any non-empty change set whenever it could be resolved.
///
/// A blank field is sent as `null` only when `baseline` held a value for it. Without that
/// the field is left out so the server keeps whatever it has; unset yes/no flags go out
/// as `false`.
pub fn build_update_payload(
    category: Category,
    current: &FormState,
    baseline: Option<&BaselineSnapshot>,
    changed: &BTreeSet<String>,
    seller_id: Option<SellerId>,
) -> Option<UpdatePayload> {
    if changed.is_empty() {
        return None;
    }

    let schema = schema_for(category);
    let mut body = Map::new();
    for name in changed {
        let value = current.get(name);
        let cleared = baseline.is_some_and(|baseline| !baseline.get(name).is_blank());
        let spec = schema.field(name);
        let is_flag =
            spec.is_some_and(|spec| matches!(spec.kind, FieldKind::Flag | FieldKind::Feature));
        if value.is_blank() && !is_flag {
            if cleared {
                body.insert(name.clone(), Value::Null);
            }
            continue;
        }
        let encoded = match spec {
            Some(spec) => encode_field(spec, value, cleared),
            None => Some(encode_untyped(value)),
        };
        match encoded {
            Some(encoded) => {
                body.insert(name.clone(), encoded);
            }
            None => tracing::debug!(
                category = %category,
                field = %name,
                "update: dropping unparseable value from payload"
            ),
        }
    }

    if body.is_empty() {
        return None;
    }
    if let Some(seller_id) = seller_id {
        body.insert("sellerId".to_string(), Value::from(seller_id.0));
    }
    Some(UpdatePayload(body))
}

/// Owner recorded on the fetched listing first, then the signed-in seller.
///
/// Zero is treated as "not known" on either side.
pub fn resolve_seller_id(
    listing_seller: Option<SellerId>,
    session_seller: Option<SellerId>,
) -> Option<SellerId> {
    let known = |id: &SellerId| id.0 != 0;
    listing_seller
        .filter(known)
        .or_else(|| session_seller.filter(known))
}

fn encode_field(spec: &FieldSpec, value: &FieldValue, cleared: bool) -> Option<Value> {
    match spec.kind {
        FieldKind::Flag | FieldKind::Feature => Some(match value.flag() {
            Some(flag) => Value::Bool(flag),
            None if cleared => Value::Null,
            None => Value::Bool(false),
        }),
        FieldKind::Price { .. } | FieldKind::Count { .. } | FieldKind::Year { .. } => {
            value.as_number().map(|number| match spec.kind {
                FieldKind::Price { .. } => wire::to_json(number),
                _ => wire::to_json(number.trunc()),
            })
        }
        FieldKind::Text { .. } | FieldKind::Date | FieldKind::Choice(_) | FieldKind::Digits(_) => {
            Some(Value::String(value.trimmed()))
        }
    }
}

fn encode_untyped(value: &FieldValue) -> Value {
    match value {
        FieldValue::Unset => Value::Null,
        FieldValue::Text(text) => Value::String(text.trim().to_string()),
        FieldValue::Flag(flag) => Value::Bool(*flag),
        FieldValue::Number(number) => wire::to_json(*number),
    }
}

#[cfg(test)]
#[path = "tests/differ_tests.rs"]
mod tests;
