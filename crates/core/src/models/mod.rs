//! Shared domain models.
//!
//! Records are validated once at the load boundary; every optional field is
//! an `Option` (or defaults to empty for lists) so downstream code never
//! meets a sentinel value. Referential consistency between `warband_ids`
//! and `unit_ids` is not guaranteed by the data source and is not repaired
//! here.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A purchasable roster entry with combat statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    /// Short identifier, unique within the unit collection.
    pub id: String,
    /// Human-readable unit name.
    #[serde(default)]
    pub name: String,
    /// Type label (e.g. `Infantry`).
    #[serde(rename = "type")]
    pub unit_type: Option<String>,
    /// Recruitment cost.
    pub cost: Option<Cost>,
    /// Combat profile.
    pub profile: Option<Profile>,
    /// Keyword tags.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Equipment lists.
    pub equipment: Option<Equipment>,
    /// Warbands this unit belongs to (many-to-many, may dangle).
    #[serde(default)]
    pub warband_ids: Vec<String>,
}

impl Unit {
    /// User-facing label, falling back to the id when the name is empty.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    /// Gold cost with an absent cost treated as 0 (the sort default).
    pub fn gold(&self) -> i64 {
        self.cost.as_ref().and_then(|cost| cost.gold).unwrap_or(0)
    }
}

/// Recruitment cost of a unit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cost {
    /// Gold to recruit.
    #[serde(default)]
    pub gold: Option<i64>,
    /// Recurring upkeep, where the game uses one.
    #[serde(default)]
    pub upkeep: Option<i64>,
}

/// A single profile stat, numeric or textual (`7`, `"2D6"`, `"4+"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    /// Plain numeric stat.
    Number(f64),
    /// Textual stat such as a dice expression or save value.
    Text(String),
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Number(value) if value.fract() == 0.0 => write!(f, "{}", *value as i64),
            StatValue::Number(value) => write!(f, "{value}"),
            StatValue::Text(value) => write!(f, "{value}"),
        }
    }
}

/// The fixed set of named combat statistics attached to a unit.
///
/// Every field is absent-tolerant; the detail layer substitutes a
/// placeholder for missing values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    /// Movement.
    #[serde(rename = "M", default, skip_serializing_if = "Option::is_none")]
    pub movement: Option<StatValue>,
    /// Weapon Skill.
    #[serde(rename = "WS", default, skip_serializing_if = "Option::is_none")]
    pub weapon_skill: Option<StatValue>,
    /// Ballistic Skill.
    #[serde(rename = "BS", default, skip_serializing_if = "Option::is_none")]
    pub ballistic_skill: Option<StatValue>,
    /// Strength.
    #[serde(rename = "S", default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<StatValue>,
    /// Toughness.
    #[serde(rename = "T", default, skip_serializing_if = "Option::is_none")]
    pub toughness: Option<StatValue>,
    /// Wounds.
    #[serde(rename = "W", default, skip_serializing_if = "Option::is_none")]
    pub wounds: Option<StatValue>,
    /// Initiative.
    #[serde(rename = "I", default, skip_serializing_if = "Option::is_none")]
    pub initiative: Option<StatValue>,
    /// Attacks.
    #[serde(rename = "A", default, skip_serializing_if = "Option::is_none")]
    pub attacks: Option<StatValue>,
    /// Leadership.
    #[serde(rename = "Ld", default, skip_serializing_if = "Option::is_none")]
    pub leadership: Option<StatValue>,
    /// Armour save.
    #[serde(rename = "Sv", default, skip_serializing_if = "Option::is_none")]
    pub save: Option<StatValue>,
}

impl Profile {
    /// All ten stats in display order, labelled.
    pub fn stats(&self) -> [(&'static str, Option<&StatValue>); 10] {
        [
            ("M", self.movement.as_ref()),
            ("WS", self.weapon_skill.as_ref()),
            ("BS", self.ballistic_skill.as_ref()),
            ("S", self.strength.as_ref()),
            ("T", self.toughness.as_ref()),
            ("W", self.wounds.as_ref()),
            ("I", self.initiative.as_ref()),
            ("A", self.attacks.as_ref()),
            ("Ld", self.leadership.as_ref()),
            ("Sv", self.save.as_ref()),
        ]
    }
}

/// Equipment carried by and available to a unit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Equipment {
    /// Gear the unit starts with.
    #[serde(default)]
    pub starting: Vec<String>,
    /// Optional gear the unit may take.
    #[serde(default)]
    pub options: Vec<String>,
}

/// A themed roster grouping that lists member units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warband {
    /// Short identifier, unique within the warband collection.
    pub id: String,
    /// Human-readable warband name.
    #[serde(default)]
    pub name: String,
    /// Game system label.
    pub game: Option<String>,
    /// Free-text summary.
    pub summary: Option<String>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Publication the warband comes from.
    pub source: Option<SourceRef>,
    /// Units this warband contains (inverse of `Unit::warband_ids`).
    #[serde(default)]
    pub unit_ids: Vec<String>,
}

impl Warband {
    /// User-facing label, falling back to the id when the name is empty.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    /// Number of contained unit ids (the `units` sort key).
    pub fn unit_count(&self) -> usize {
        self.unit_ids.len()
    }
}

/// Publication reference for a warband.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRef {
    /// Publication name.
    pub name: String,
    /// Page number, where known.
    pub page: Option<i64>,
}

impl SourceRef {
    /// Display citation; the page is appended only when present.
    pub fn citation(&self) -> String {
        match self.page {
            Some(page) => format!("{}, p. {}", self.name, page),
            None => self.name.clone(),
        }
    }
}

/// Summary metadata record published alongside the collections.
///
/// Advisory only: actual counts are always derivable from the loaded
/// collections themselves.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetMeta {
    /// Collection counts for the status line.
    #[serde(default)]
    pub counts: DatasetCounts,
}

/// Collection counts inside [`DatasetMeta`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetCounts {
    /// Number of published units.
    #[serde(default)]
    pub units: Option<u64>,
    /// Number of published warbands.
    #[serde(default)]
    pub warbands: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_tolerates_missing_optional_fields() {
        let unit: Unit = serde_json::from_str(r#"{"id": "u1"}"#).expect("deserialize unit");
        assert_eq!(unit.id, "u1");
        assert_eq!(unit.display_name(), "u1");
        assert_eq!(unit.gold(), 0);
        assert!(unit.keywords.is_empty());
        assert!(unit.warband_ids.is_empty());
        assert!(unit.profile.is_none());
    }

    #[test]
    fn profile_accepts_numbers_and_text() {
        let profile: Profile = serde_json::from_str(r#"{"M": 4, "WS": 3, "Sv": "5+", "A": "2D6"}"#)
            .expect("deserialize profile");
        assert_eq!(profile.movement, Some(StatValue::Number(4.0)));
        assert_eq!(profile.save, Some(StatValue::Text("5+".to_string())));
        assert_eq!(profile.movement.unwrap().to_string(), "4");
        assert_eq!(profile.attacks.unwrap().to_string(), "2D6");
        assert!(profile.toughness.is_none());
    }

    #[test]
    fn warband_citation_includes_page_only_when_present() {
        let with_page = SourceRef {
            name: "Core Rulebook".to_string(),
            page: Some(42),
        };
        assert_eq!(with_page.citation(), "Core Rulebook, p. 42");

        let without_page = SourceRef {
            name: "Annual 2002".to_string(),
            page: None,
        };
        assert_eq!(without_page.citation(), "Annual 2002");
    }

    #[test]
    fn meta_counts_are_optional() {
        let meta: DatasetMeta = serde_json::from_str(r#"{}"#).expect("deserialize meta");
        assert_eq!(meta.counts.units, None);

        let meta: DatasetMeta = serde_json::from_str(r#"{"counts": {"units": 12}}"#)
            .expect("deserialize counted meta");
        assert_eq!(meta.counts.units, Some(12));
        assert_eq!(meta.counts.warbands, None);
    }
}
