// Decoding and migration of stored inventories
//
// Stored records come from several generations of the app, so decoding goes
// through `serde_json::Value` and every legacy-missing field is defaulted here.

use crate::id::generate_id;
use crate::models::{CURRENT_SCHEMA_VERSION, Rarity, Weapon, WeaponType};
use serde_json::{Map, Value};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, warn};

/// Why a stored element could not become a record
#[derive(Debug, Error, PartialEq)]
pub enum MigrateError {
    #[error("element is not an object")]
    NotAnObject,

    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// Turn one loosely-typed stored element into a current record
///
/// Defaults: missing id gets a fresh one (numbers are coerced to strings),
/// missing `isPossessed` is `true`, missing effect texts are empty,
/// missing `isCompleted` is `false`, missing `createdAt` is 0.
pub fn migrate(raw: &Value) -> Result<Weapon, MigrateError> {
    let obj = raw.as_object().ok_or(MigrateError::NotAnObject)?;

    let version = obj.get("schemaVersion").and_then(Value::as_u64).unwrap_or(0);
    if version < CURRENT_SCHEMA_VERSION as u64 {
        debug!(version, "migrate: upgrading legacy record");
    }

    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .ok_or(MigrateError::MissingField("name"))?
        .to_string();

    Ok(Weapon {
        id: migrate_id(obj.get("id")),
        name,
        rarity: migrate_rarity(obj.get("rarity"))?,
        weapon_type: migrate_type(obj.get("type"))?,
        basic_effect: text(obj, "basicEffect"),
        additional_effect: text(obj, "additionalEffect"),
        skill: text(obj, "skill"),
        optimized: obj.get("isCompleted").and_then(Value::as_bool).unwrap_or(false),
        owned: obj.get("isPossessed").and_then(Value::as_bool).unwrap_or(true),
        created_at: obj
            .get("createdAt")
            .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
            .unwrap_or(0),
        schema_version: CURRENT_SCHEMA_VERSION,
    })
}

/// Result of decoding a stored inventory
#[derive(Debug, Default, PartialEq)]
pub struct Decoded {
    pub weapons: Vec<Weapon>,
    /// Elements that could not be turned into records
    pub skipped: usize,
}

impl Decoded {
    /// True if every stored element became a record
    pub fn is_complete(&self) -> bool {
        self.skipped == 0
    }
}

/// Decode a stored inventory
///
/// Returns `None` when the value is malformed, not an array, or an empty
/// array. Unreadable elements are counted in `skipped`, and ids repeated
/// from an earlier element are replaced with fresh ones.
pub fn decode_inventory(raw: &str) -> Option<Decoded> {
    let parsed: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "Failed to parse stored inventory, discarding");
            return None;
        }
    };

    let elements = match parsed {
        Value::Array(elements) if !elements.is_empty() => elements,
        Value::Array(_) => return None,
        other => {
            warn!(kind = value_kind(&other), "Stored inventory is not an array, discarding");
            return None;
        }
    };

    let mut decoded = Decoded::default();
    let mut seen = HashSet::new();

    for (index, element) in elements.iter().enumerate() {
        let mut weapon = match migrate(element) {
            Ok(weapon) => weapon,
            Err(e) => {
                warn!(index, error = %e, element = %element, "Unreadable stored weapon");
                decoded.skipped += 1;
                continue;
            }
        };

        if !seen.insert(weapon.id.clone()) {
            let fresh = generate_id();
            warn!(index, id = %weapon.id, fresh = %fresh, "Duplicate stored id, assigning a fresh one");
            weapon.id = fresh.clone();
            seen.insert(fresh);
        }

        decoded.weapons.push(weapon);
    }

    Some(decoded)
}

/// Serialize the full inventory for storage
pub fn encode_inventory(weapons: &[Weapon]) -> serde_json::Result<String> {
    serde_json::to_string(weapons)
}

fn migrate_id(raw: Option<&Value>) -> String {
    match raw {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => n.to_string(),
        _ => generate_id(),
    }
}

fn migrate_rarity(raw: Option<&Value>) -> Result<Rarity, MigrateError> {
    let raw = raw.ok_or(MigrateError::MissingField("rarity"))?;
    let invalid = |reason: String| MigrateError::InvalidField {
        field: "rarity",
        reason,
    };
    match raw {
        Value::Number(n) => n
            .as_u64()
            .and_then(|n| u8::try_from(n).ok())
            .ok_or_else(|| invalid(n.to_string()))
            .and_then(|n| Rarity::try_from(n).map_err(invalid)),
        Value::String(s) => s.parse().map_err(invalid),
        other => Err(invalid(value_kind(other).to_string())),
    }
}

fn migrate_type(raw: Option<&Value>) -> Result<WeaponType, MigrateError> {
    raw.and_then(Value::as_str)
        .ok_or(MigrateError::MissingField("type"))?
        .parse()
        .map_err(|reason| MigrateError::InvalidField { field: "type", reason })
}

fn text(obj: &Map<String, Value>, field: &str) -> String {
    obj.get(field).and_then(Value::as_str).unwrap_or_default().to_string()
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_migrate_legacy_defaults() {
        let raw = json!({
            "id": "w-1",
            "name": "制式槍",
            "rarity": 4,
            "type": "槍",
            "isCompleted": true,
            "createdAt": 1234
        });

        let weapon = migrate(&raw).unwrap();
        assert_eq!(weapon.id, "w-1");
        assert!(weapon.owned);
        assert!(weapon.optimized);
        assert_eq!(weapon.basic_effect, "");
        assert_eq!(weapon.additional_effect, "");
        assert_eq!(weapon.skill, "");
        assert_eq!(weapon.created_at, 1234);
        assert_eq!(weapon.schema_version, CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn test_migrate_keeps_explicit_not_owned() {
        let raw = json!({"id": "x", "name": "a", "rarity": 5, "type": "拳銃", "isPossessed": false});
        assert!(!migrate(&raw).unwrap().owned);
    }

    #[test]
    fn test_migrate_null_owned_defaults_true() {
        let raw = json!({"id": "x", "name": "a", "rarity": 5, "type": "拳銃", "isPossessed": null});
        assert!(migrate(&raw).unwrap().owned);
    }

    #[test]
    fn test_migrate_numeric_id_coerced() {
        let raw = json!({"id": 42, "name": "a", "rarity": 6, "type": "両手剣"});
        assert_eq!(migrate(&raw).unwrap().id, "42");
    }

    #[test]
    fn test_migrate_missing_ids_are_fresh_and_distinct() {
        let stored = json!([
            {"name": "a", "rarity": 4, "type": "槍"},
            {"id": "", "name": "b", "rarity": 5, "type": "槍"},
            {"id": "keep", "name": "c", "rarity": 6, "type": "槍"},
            {"id": null, "name": "d", "rarity": 6, "type": "槍"}
        ])
        .to_string();

        let weapons = decode_inventory(&stored).unwrap().weapons;
        let ids: HashSet<&str> = weapons.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids.len(), 4);
        assert!(ids.iter().all(|id| !id.is_empty()));
        assert_eq!(weapons[2].id, "keep");
    }

    #[test]
    fn test_migrate_rejects_unusable_elements() {
        assert_eq!(migrate(&json!("text")), Err(MigrateError::NotAnObject));
        assert_eq!(
            migrate(&json!({"rarity": 4, "type": "槍"})),
            Err(MigrateError::MissingField("name"))
        );
        assert!(matches!(
            migrate(&json!({"name": "a", "rarity": 3, "type": "槍"})),
            Err(MigrateError::InvalidField { field: "rarity", .. })
        ));
        assert!(matches!(
            migrate(&json!({"name": "a", "rarity": 4, "type": "弓"})),
            Err(MigrateError::InvalidField { field: "type", .. })
        ));
    }

    #[test]
    fn test_decode_skips_bad_elements() {
        let stored = json!([
            {"id": "good", "name": "a", "rarity": 4, "type": "槍"},
            {"id": "bad", "rarity": 4, "type": "槍"}
        ])
        .to_string();

        let decoded = decode_inventory(&stored).unwrap();
        assert_eq!(decoded.skipped, 1);
        assert!(!decoded.is_complete());
        assert_eq!(decoded.weapons.len(), 1);
        assert_eq!(decoded.weapons[0].id, "good");
    }

    #[test]
    fn test_decode_all_elements_unreadable() {
        let decoded = decode_inventory("[1, 2]").unwrap();
        assert!(decoded.weapons.is_empty());
        assert_eq!(decoded.skipped, 2);
    }

    #[test]
    fn test_decode_replaces_duplicate_ids() {
        let stored = json!([
            {"id": "dup", "name": "a", "rarity": 4, "type": "槍"},
            {"id": "dup", "name": "b", "rarity": 5, "type": "槍"},
            {"id": "dup", "name": "c", "rarity": 6, "type": "槍"}
        ])
        .to_string();

        let decoded = decode_inventory(&stored).unwrap();
        assert!(decoded.is_complete());
        assert_eq!(decoded.weapons[0].id, "dup");
        assert_eq!(decoded.weapons[0].name, "a");

        let ids: HashSet<&str> = decoded.weapons.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_decode_rejects_unusable_inventories() {
        assert!(decode_inventory("{not json").is_none());
        assert!(decode_inventory("[]").is_none());
        assert!(decode_inventory("{\"a\":1}").is_none());
    }

    #[test]
    fn test_encode_decode_preserves_order_and_fields() {
        let stored = json!([
            {"id": "b", "name": "二", "rarity": 5, "type": "拳銃", "basicEffect": "筋力",
             "additionalEffect": "会心率", "skill": "追襲", "isCompleted": true,
             "isPossessed": false, "createdAt": 2, "schemaVersion": 1},
            {"id": "a", "name": "一", "rarity": 6, "type": "槍", "basicEffect": "知性",
             "additionalEffect": "攻撃力", "skill": "夜幕", "isCompleted": false,
             "isPossessed": true, "createdAt": 1, "schemaVersion": 1}
        ])
        .to_string();

        let weapons = decode_inventory(&stored).unwrap().weapons;
        let reencoded = encode_inventory(&weapons).unwrap();
        assert_eq!(decode_inventory(&reencoded).unwrap().weapons, weapons);
        assert_eq!(weapons[0].id, "b");
        assert_eq!(weapons[1].skill, "夜幕");
    }
}
