//! Cross-reference index over the two collections.

use std::collections::HashMap;

use crate::models::{Unit, Warband};

/// Id-to-entity mappings enabling O(1) lookup, scoped per collection.
///
/// The two collections share no namespace guarantee, so a unit id and a
/// warband id may collide; lookups always go against the matching map.
/// Misses are an expected, common case (dangling references) and resolve
/// to fallbacks, never errors.
#[derive(Debug, Clone, Default)]
pub struct CrossIndex {
    units: HashMap<String, Unit>,
    warbands: HashMap<String, Warband>,
}

impl CrossIndex {
    /// Build both maps in one O(n) pass over each collection.
    pub fn build(units: &[Unit], warbands: &[Warband]) -> Self {
        Self {
            units: units
                .iter()
                .map(|unit| (unit.id.clone(), unit.clone()))
                .collect(),
            warbands: warbands
                .iter()
                .map(|warband| (warband.id.clone(), warband.clone()))
                .collect(),
        }
    }

    /// Look up a unit by id.
    pub fn unit(&self, id: &str) -> Option<&Unit> {
        self.units.get(id)
    }

    /// Look up a warband by id.
    pub fn warband(&self, id: &str) -> Option<&Warband> {
        self.warbands.get(id)
    }

    /// Display name for a unit id, falling back to the raw id on a miss.
    pub fn unit_label(&self, id: &str) -> String {
        self.units
            .get(id)
            .map(|unit| unit.display_name().to_string())
            .unwrap_or_else(|| id.to_string())
    }

    /// Display name for a warband id, falling back to the raw id on a miss.
    pub fn warband_label(&self, id: &str) -> String {
        self.warbands
            .get(id)
            .map(|warband| warband.display_name().to_string())
            .unwrap_or_else(|| id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::testing::{sample_units, sample_warbands};

    #[test]
    fn lookups_are_scoped_to_their_collection() {
        let mut units = sample_units();
        // Same id on both sides of the relationship must not cross-resolve.
        units[0].id = "shared".to_string();
        let mut warbands = sample_warbands();
        warbands[0].id = "shared".to_string();

        let index = CrossIndex::build(&units, &warbands);
        assert_eq!(index.unit("shared").expect("unit").name, units[0].name);
        assert_eq!(
            index.warband("shared").expect("warband").name,
            warbands[0].name
        );
    }

    #[test]
    fn lookup_is_total_and_labels_fall_back_to_the_raw_id() {
        let index = CrossIndex::build(&sample_units(), &sample_warbands());
        assert!(index.unit("no-such-unit").is_none());
        assert!(index.warband("no-such-warband").is_none());
        assert_eq!(index.unit_label("no-such-unit"), "no-such-unit");
        assert_eq!(index.warband_label("w404"), "w404");
        assert_eq!(index.warband_label("w1"), "Mercenaries");
        assert_eq!(index.unit_label("u1"), "Swordsman");
    }
}
