// Fallback dataset used when no usable inventory is stored

use crate::models::{NewWeapon, Rarity, WeaponType};

/// Default attribute values for seed items (first entry of each in-game list)
pub const DEFAULT_BASIC_EFFECT: &str = "俊敏";
pub const DEFAULT_ADDITIONAL_EFFECT: &str = "攻撃力";
pub const DEFAULT_SKILL: &str = "強攻";

const SEED: &[(&str, Rarity, WeaponType)] = &[
    // ★6
    ("統制者の剣", Rarity::Six, WeaponType::Sword1H),
    ("没入する影", Rarity::Six, WeaponType::Sword1H),
    ("巨人の怒り", Rarity::Six, WeaponType::Sword2H),
    ("深淵の瞳", Rarity::Six, WeaponType::ArtsUnit),
    ("虚空の叫び", Rarity::Six, WeaponType::ArtsUnit),
    ("竜殺しの槍", Rarity::Six, WeaponType::Spear),
    ("荒野の決闘", Rarity::Six, WeaponType::Pistol),
    ("極光の衛士", Rarity::Six, WeaponType::Sword1H),
    ("終焉の裁定", Rarity::Six, WeaponType::Sword2H),
    // ★5
    ("騎士の儀礼剣", Rarity::Five, WeaponType::Sword1H),
    ("執行者の大剣", Rarity::Five, WeaponType::Sword2H),
    ("貫く稲妻", Rarity::Five, WeaponType::Spear),
    ("アーツワンド・改", Rarity::Five, WeaponType::ArtsUnit),
    ("速射拳銃", Rarity::Five, WeaponType::Pistol),
    ("守護者の盾", Rarity::Five, WeaponType::Sword1H),
    ("夜明けの光", Rarity::Five, WeaponType::ArtsUnit),
    ("ハンターボウ", Rarity::Five, WeaponType::Pistol),
    ("赤熱の槍", Rarity::Five, WeaponType::Spear),
    // ★4
    ("制式片手剣", Rarity::Four, WeaponType::Sword1H),
    ("強化型カトラス", Rarity::Four, WeaponType::Sword1H),
    ("制式大剣", Rarity::Four, WeaponType::Sword2H),
    ("重装破壊剣", Rarity::Four, WeaponType::Sword2H),
    ("制式アーツユニット", Rarity::Four, WeaponType::ArtsUnit),
    ("共振アーツユニット", Rarity::Four, WeaponType::ArtsUnit),
    ("制式槍", Rarity::Four, WeaponType::Spear),
    ("合金製の槍", Rarity::Four, WeaponType::Spear),
    ("制式拳銃", Rarity::Four, WeaponType::Pistol),
    ("護身用拳銃", Rarity::Four, WeaponType::Pistol),
];

/// Seed templates, neither owned nor optimized
pub fn seed_weapons() -> Vec<NewWeapon> {
    SEED.iter()
        .map(|&(name, rarity, weapon_type)| NewWeapon {
            name: name.to_string(),
            rarity,
            weapon_type,
            basic_effect: DEFAULT_BASIC_EFFECT.to_string(),
            additional_effect: DEFAULT_ADDITIONAL_EFFECT.to_string(),
            skill: DEFAULT_SKILL.to_string(),
            optimized: false,
            owned: false,
        })
        .collect()
}
