//! Shaping of single entities into display-ready detail records.
//!
//! Shaping never fails: every optional field resolves to a placeholder and
//! every cross-reference resolves to a label, dangling or not.

use serde::Serialize;

use crate::{
    dataset::CrossIndex,
    models::{Profile, Unit, Warband},
};

/// Placeholder shown for absent optional values.
pub const PLACEHOLDER: &str = "—";

/// A cross-collection reference resolved to a display name.
///
/// `name` carries the raw id when the reference dangles, so callers
/// cannot forget the fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityRef {
    /// Referenced identifier as it appears in the data.
    pub id: String,
    /// Resolved display name, or the raw id on a miss.
    pub name: String,
}

/// One named profile stat, placeholder-filled.
#[derive(Debug, Clone, Serialize)]
pub struct StatLine {
    /// Stat label (`M`, `WS`, ...).
    pub label: &'static str,
    /// Rendered value, or the placeholder when absent.
    pub value: String,
}

/// Display-ready record for one unit.
#[derive(Debug, Clone, Serialize)]
pub struct UnitDetail {
    /// Unit identifier.
    pub id: String,
    /// Display name (id fallback).
    pub name: String,
    /// Type label, placeholder when absent.
    pub unit_type: String,
    /// Gold cost, where known.
    pub gold: Option<i64>,
    /// Upkeep cost, where known.
    pub upkeep: Option<i64>,
    /// All ten profile stats in display order.
    pub profile: Vec<StatLine>,
    /// Keyword tags.
    pub keywords: Vec<String>,
    /// Starting equipment.
    pub starting_equipment: Vec<String>,
    /// Equipment options.
    pub equipment_options: Vec<String>,
    /// Warband memberships, resolved with raw-id fallback.
    pub warbands: Vec<EntityRef>,
}

/// Display-ready record for one warband.
#[derive(Debug, Clone, Serialize)]
pub struct WarbandDetail {
    /// Warband identifier.
    pub id: String,
    /// Display name (id fallback).
    pub name: String,
    /// Game system label, placeholder when absent.
    pub game: String,
    /// Summary text, placeholder when absent.
    pub summary: String,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Composed source citation, when the warband has one.
    pub source: Option<String>,
    /// Number of contained unit ids.
    pub unit_count: usize,
    /// Contained units, resolved with raw-id fallback.
    pub units: Vec<EntityRef>,
}

/// Shape one unit for display, resolving warband references through the
/// index.
pub fn build_unit_detail(unit: &Unit, index: &CrossIndex) -> UnitDetail {
    let warbands = unit
        .warband_ids
        .iter()
        .map(|id| EntityRef {
            id: id.clone(),
            name: index.warband_label(id),
        })
        .collect();

    let profile = unit.profile.clone().unwrap_or_default();
    let equipment = unit.equipment.clone().unwrap_or_default();

    UnitDetail {
        id: unit.id.clone(),
        name: unit.display_name().to_string(),
        unit_type: unit
            .unit_type
            .clone()
            .unwrap_or_else(|| PLACEHOLDER.to_string()),
        gold: unit.cost.as_ref().and_then(|cost| cost.gold),
        upkeep: unit.cost.as_ref().and_then(|cost| cost.upkeep),
        profile: stat_lines(&profile),
        keywords: unit.keywords.clone(),
        starting_equipment: equipment.starting,
        equipment_options: equipment.options,
        warbands,
    }
}

/// Shape one warband for display, resolving unit references through the
/// index.
pub fn build_warband_detail(warband: &Warband, index: &CrossIndex) -> WarbandDetail {
    let units = warband
        .unit_ids
        .iter()
        .map(|id| EntityRef {
            id: id.clone(),
            name: index.unit_label(id),
        })
        .collect();

    WarbandDetail {
        id: warband.id.clone(),
        name: warband.display_name().to_string(),
        game: warband
            .game
            .clone()
            .unwrap_or_else(|| PLACEHOLDER.to_string()),
        summary: warband
            .summary
            .clone()
            .unwrap_or_else(|| PLACEHOLDER.to_string()),
        tags: warband.tags.clone(),
        source: warband.source.as_ref().map(|source| source.citation()),
        unit_count: warband.unit_ids.len(),
        units,
    }
}

fn stat_lines(profile: &Profile) -> Vec<StatLine> {
    profile
        .stats()
        .into_iter()
        .map(|(label, value)| StatLine {
            label,
            value: value
                .map(|value| value.to_string())
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
        })
        .collect()
}

impl UnitDetail {
    /// Plain-text rendering used by the deep-link command and the detail
    /// modal.
    pub fn text_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("{} ({})", self.name, self.id),
            format!("Type: {}", self.unit_type),
            match self.upkeep {
                Some(upkeep) => format!("Cost: {} · Upkeep: {}", cost_text(self.gold), upkeep),
                None => format!("Cost: {}", cost_text(self.gold)),
            },
            format!("Warbands: {}", ref_list(&self.warbands)),
            String::new(),
        ];
        lines.extend(profile_rows(&self.profile));
        lines.push(String::new());
        lines.push("Equipment (starting):".to_string());
        lines.extend(bullet_list(&self.starting_equipment));
        lines.push("Equipment (options):".to_string());
        lines.extend(bullet_list(&self.equipment_options));
        lines.push("Keywords:".to_string());
        lines.extend(bullet_list(&self.keywords));
        lines
    }
}

impl WarbandDetail {
    /// Plain-text rendering used by the deep-link command and the detail
    /// modal.
    pub fn text_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("{} ({})", self.name, self.id),
            format!("Game: {}", self.game),
            format!(
                "Source: {}",
                self.source.as_deref().unwrap_or(PLACEHOLDER)
            ),
            format!("Summary: {}", self.summary),
            String::new(),
            "Tags:".to_string(),
        ];
        lines.extend(bullet_list(&self.tags));
        lines.push(format!("Units ({}):", self.unit_count));
        lines.extend(bullet_list(
            &self
                .units
                .iter()
                .map(|unit| unit.name.clone())
                .collect::<Vec<_>>(),
        ));
        lines
    }
}

fn cost_text(gold: Option<i64>) -> String {
    gold.map(|gold| gold.to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn ref_list(refs: &[EntityRef]) -> String {
    if refs.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        refs.iter()
            .map(|reference| reference.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn bullet_list(items: &[String]) -> Vec<String> {
    if items.is_empty() {
        vec![format!("  {PLACEHOLDER}")]
    } else {
        items.iter().map(|item| format!("  - {item}")).collect()
    }
}

// Two aligned rows: labels, then values, padded per column.
fn profile_rows(stats: &[StatLine]) -> Vec<String> {
    let mut labels = String::from("  ");
    let mut values = String::from("  ");
    for stat in stats {
        let width = stat.label.chars().count().max(stat.value.chars().count());
        labels.push_str(&format!("{:<width$}  ", stat.label));
        values.push_str(&format!("{:<width$}  ", stat.value));
    }
    vec![
        "Profile:".to_string(),
        labels.trim_end().to_string(),
        values.trim_end().to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::testing::{sample_units, sample_warbands};
    use crate::models::{Cost, Equipment, StatValue};

    fn index() -> CrossIndex {
        CrossIndex::build(&sample_units(), &sample_warbands())
    }

    #[test]
    fn unit_detail_resolves_warband_references() {
        let units = sample_units();
        let detail = build_unit_detail(&units[0], &index());
        assert_eq!(
            detail.warbands,
            vec![EntityRef {
                id: "w1".to_string(),
                name: "Mercenaries".to_string()
            }]
        );
    }

    #[test]
    fn dangling_reference_falls_back_to_the_raw_id() {
        let units = sample_units();
        // u2 references w404, which does not exist.
        let detail = build_unit_detail(&units[1], &index());
        assert_eq!(
            detail.warbands,
            vec![EntityRef {
                id: "w404".to_string(),
                name: "w404".to_string()
            }]
        );
    }

    #[test]
    fn empty_membership_yields_an_empty_reference_list() {
        let mut unit = sample_units().remove(0);
        unit.warband_ids.clear();
        let detail = build_unit_detail(&unit, &index());
        assert!(detail.warbands.is_empty());
    }

    #[test]
    fn absent_stats_render_as_placeholders() {
        let mut unit = sample_units().remove(1);
        unit.profile = None;
        unit.cost = Some(Cost {
            gold: None,
            upkeep: Some(5),
        });
        let detail = build_unit_detail(&unit, &index());
        assert_eq!(detail.profile.len(), 10);
        assert!(detail.profile.iter().all(|stat| stat.value == PLACEHOLDER));
        assert_eq!(detail.gold, None);
        assert_eq!(detail.upkeep, Some(5));
    }

    #[test]
    fn present_stats_render_their_values_in_order() {
        let mut unit = sample_units().remove(0);
        unit.profile = Some(Profile {
            movement: Some(StatValue::Number(4.0)),
            save: Some(StatValue::Text("5+".to_string())),
            ..Profile::default()
        });
        unit.equipment = Some(Equipment {
            starting: vec!["Sword".to_string()],
            options: Vec::new(),
        });

        let detail = build_unit_detail(&unit, &index());
        assert_eq!(detail.profile[0].label, "M");
        assert_eq!(detail.profile[0].value, "4");
        assert_eq!(detail.profile[9].label, "Sv");
        assert_eq!(detail.profile[9].value, "5+");
        assert_eq!(detail.starting_equipment, vec!["Sword".to_string()]);
        assert!(detail.equipment_options.is_empty());
    }

    #[test]
    fn warband_detail_resolves_units_and_composes_the_citation() {
        let warbands = sample_warbands();
        let mut warband = warbands[0].clone();
        warband.source = Some(crate::models::SourceRef {
            name: "Core Rulebook".to_string(),
            page: Some(12),
        });
        warband.unit_ids.push("ghost".to_string());

        let detail = build_warband_detail(&warband, &index());
        assert_eq!(detail.source.as_deref(), Some("Core Rulebook, p. 12"));
        assert_eq!(detail.unit_count, 2);
        assert_eq!(detail.units[0].name, "Swordsman");
        assert_eq!(detail.units[1].name, "ghost");
        assert_eq!(detail.summary, PLACEHOLDER);
    }

    #[test]
    fn text_rendering_never_fails_on_sparse_records() {
        let unit = Unit {
            id: "bare".to_string(),
            name: String::new(),
            unit_type: None,
            cost: None,
            profile: None,
            keywords: Vec::new(),
            tags: Vec::new(),
            equipment: None,
            warband_ids: Vec::new(),
        };
        let detail = build_unit_detail(&unit, &CrossIndex::default());
        let lines = detail.text_lines();
        assert_eq!(lines[0], "bare (bare)");
        assert!(lines.iter().any(|line| line == "Warbands: —"));
    }
}
