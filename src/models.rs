// Data models for WeaponStore

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Schema version stamped on every record written by this crate
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Star rating of a weapon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Rarity {
    Four,
    Five,
    Six,
}

impl Rarity {
    pub fn stars(self) -> u8 {
        match self {
            Rarity::Four => 4,
            Rarity::Five => 5,
            Rarity::Six => 6,
        }
    }
}

impl TryFrom<u8> for Rarity {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            4 => Ok(Rarity::Four),
            5 => Ok(Rarity::Five),
            6 => Ok(Rarity::Six),
            other => Err(format!("Invalid rarity: {} (expected 4, 5 or 6)", other)),
        }
    }
}

impl From<Rarity> for u8 {
    fn from(rarity: Rarity) -> Self {
        rarity.stars()
    }
}

impl FromStr for Rarity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stars: u8 = s
            .trim()
            .trim_start_matches('★')
            .parse()
            .map_err(|_| format!("Invalid rarity: {}", s))?;
        Rarity::try_from(stars)
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "★{}", self.stars())
    }
}

/// Weapon category
///
/// Serialized as the in-game label, which is what persisted inventories contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponType {
    #[serde(rename = "片手剣")]
    Sword1H,
    #[serde(rename = "両手剣")]
    Sword2H,
    #[serde(rename = "アーツユニット")]
    ArtsUnit,
    #[serde(rename = "槍")]
    Spear,
    #[serde(rename = "拳銃")]
    Pistol,
}

impl WeaponType {
    pub const ALL: [WeaponType; 5] = [
        WeaponType::Sword1H,
        WeaponType::Sword2H,
        WeaponType::ArtsUnit,
        WeaponType::Spear,
        WeaponType::Pistol,
    ];

    /// In-game label
    pub fn label(self) -> &'static str {
        match self {
            WeaponType::Sword1H => "片手剣",
            WeaponType::Sword2H => "両手剣",
            WeaponType::ArtsUnit => "アーツユニット",
            WeaponType::Spear => "槍",
            WeaponType::Pistol => "拳銃",
        }
    }

    /// ASCII name accepted on the command line
    pub fn slug(self) -> &'static str {
        match self {
            WeaponType::Sword1H => "sword1h",
            WeaponType::Sword2H => "sword2h",
            WeaponType::ArtsUnit => "arts-unit",
            WeaponType::Spear => "spear",
            WeaponType::Pistol => "pistol",
        }
    }
}

impl FromStr for WeaponType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        WeaponType::ALL
            .into_iter()
            .find(|t| t.label() == s || t.slug().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Invalid weapon type: {}", s))
    }
}

impl fmt::Display for WeaponType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A tracked weapon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weapon {
    pub id: String,
    pub name: String,
    pub rarity: Rarity,
    #[serde(rename = "type")]
    pub weapon_type: WeaponType,
    pub basic_effect: String,
    pub additional_effect: String,
    pub skill: String,
    /// Optimization ("gen-sen") finished
    #[serde(rename = "isCompleted")]
    pub optimized: bool,
    #[serde(rename = "isPossessed")]
    pub owned: bool,
    pub created_at: i64,
    #[serde(default)]
    pub schema_version: u32,
}

/// A weapon before an identifier and timestamp are assigned
#[derive(Debug, Clone, PartialEq)]
pub struct NewWeapon {
    pub name: String,
    pub rarity: Rarity,
    pub weapon_type: WeaponType,
    pub basic_effect: String,
    pub additional_effect: String,
    pub skill: String,
    pub optimized: bool,
    pub owned: bool,
}

impl NewWeapon {
    /// Complete the record with its identity
    pub fn into_weapon(self, id: String, created_at: i64) -> Weapon {
        Weapon {
            id,
            name: self.name,
            rarity: self.rarity,
            weapon_type: self.weapon_type,
            basic_effect: self.basic_effect,
            additional_effect: self.additional_effect,
            skill: self.skill,
            optimized: self.optimized,
            owned: self.owned,
            created_at,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }
}

/// Helper function to get current timestamp in milliseconds
pub fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Weapon {
        NewWeapon {
            name: "統制者の剣".to_string(),
            rarity: Rarity::Six,
            weapon_type: WeaponType::Sword1H,
            basic_effect: "俊敏".to_string(),
            additional_effect: "攻撃力".to_string(),
            skill: "強攻".to_string(),
            optimized: false,
            owned: true,
        }
        .into_weapon("w-1".to_string(), 1000)
    }

    #[test]
    fn test_now_ms() {
        let ts = now_ms();
        // Should be reasonable timestamp (after year 2020)
        assert!(ts > 1_600_000_000_000);
    }

    #[test]
    fn test_rarity_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Rarity::Five).unwrap(), "5");
        let rarity: Rarity = serde_json::from_str("6").unwrap();
        assert_eq!(rarity, Rarity::Six);
        assert!(serde_json::from_str::<Rarity>("3").is_err());
    }

    #[test]
    fn test_rarity_from_str() {
        assert_eq!("4".parse::<Rarity>().unwrap(), Rarity::Four);
        assert_eq!("★6".parse::<Rarity>().unwrap(), Rarity::Six);
        assert!("7".parse::<Rarity>().is_err());
        assert!("six".parse::<Rarity>().is_err());
    }

    #[test]
    fn test_weapon_type_labels() {
        assert_eq!(serde_json::to_string(&WeaponType::Spear).unwrap(), "\"槍\"");
        assert_eq!("拳銃".parse::<WeaponType>().unwrap(), WeaponType::Pistol);
        assert_eq!("Arts-Unit".parse::<WeaponType>().unwrap(), WeaponType::ArtsUnit);
        assert!("bow".parse::<WeaponType>().is_err());
    }

    #[test]
    fn test_weapon_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["type"], "片手剣");
        assert_eq!(json["basicEffect"], "俊敏");
        assert_eq!(json["isCompleted"], false);
        assert_eq!(json["isPossessed"], true);
        assert_eq!(json["createdAt"], 1000);
        assert_eq!(json["schemaVersion"], CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn test_weapon_serialization() {
        let weapon = sample();
        let json = serde_json::to_string(&weapon).unwrap();
        let deserialized: Weapon = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, weapon);
    }
}
