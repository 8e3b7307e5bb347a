//! Filtering and sorting over loaded collections.
//!
//! Every operation here is synchronous, bounded by collection size, and
//! safe to run on every keystroke. Queries never mutate their source
//! slice; results are fresh, ordered vectors.

use std::cmp::Ordering;

use crate::models::{Unit, Warband};

/// Lower-case arbitrary optional text for case-insensitive comparison.
///
/// Total: absent input normalizes to the empty string, and the result is
/// idempotent under repeated application.
pub fn normalize(text: Option<&str>) -> String {
    text.unwrap_or_default().to_lowercase()
}

/// Sort direction for any sort key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDir {
    /// Ascending (the default for every key).
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl SortDir {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDir::Asc => ordering,
            SortDir::Desc => ordering.reverse(),
        }
    }

    /// The opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }

    /// Selector fragment (`asc`/`desc`).
    pub fn as_str(self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }
}

/// Sort key for the unit table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnitSortKey {
    /// By display name.
    #[default]
    Name,
    /// By type label, ties broken by name.
    Type,
    /// By gold cost (missing cost sorts as 0), ties broken by name.
    Gold,
}

impl UnitSortKey {
    /// Selector fragment (`name`/`type`/`gold`).
    pub fn as_str(self) -> &'static str {
        match self {
            UnitSortKey::Name => "name",
            UnitSortKey::Type => "type",
            UnitSortKey::Gold => "gold",
        }
    }

    /// The next key in cycling order.
    pub fn cycled(self) -> Self {
        match self {
            UnitSortKey::Name => UnitSortKey::Type,
            UnitSortKey::Type => UnitSortKey::Gold,
            UnitSortKey::Gold => UnitSortKey::Name,
        }
    }
}

/// Sort key for the warband table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WarbandSortKey {
    /// By display name.
    #[default]
    Name,
    /// By contained unit count, ties broken by name.
    Units,
}

impl WarbandSortKey {
    /// Selector fragment (`name`/`units`).
    pub fn as_str(self) -> &'static str {
        match self {
            WarbandSortKey::Name => "name",
            WarbandSortKey::Units => "units",
        }
    }

    /// The next key in cycling order.
    pub fn cycled(self) -> Self {
        match self {
            WarbandSortKey::Name => WarbandSortKey::Units,
            WarbandSortKey::Units => WarbandSortKey::Name,
        }
    }
}

/// Unit sort selector: key plus direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnitSort {
    /// Which key to order by.
    pub key: UnitSortKey,
    /// Which way to order.
    pub dir: SortDir,
}

impl UnitSort {
    /// Parse a `key:dir` selector such as `"gold:desc"`.
    ///
    /// Unknown keys fall back to name, unknown directions to ascending.
    pub fn parse(value: &str) -> Self {
        let (key, dir) = split_selector(value);
        let key = match key {
            "type" => UnitSortKey::Type,
            "gold" => UnitSortKey::Gold,
            _ => UnitSortKey::Name,
        };
        Self { key, dir }
    }

    /// Selector form, e.g. `"gold:desc"`.
    pub fn selector(&self) -> String {
        format!("{}:{}", self.key.as_str(), self.dir.as_str())
    }
}

/// Warband sort selector: key plus direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WarbandSort {
    /// Which key to order by.
    pub key: WarbandSortKey,
    /// Which way to order.
    pub dir: SortDir,
}

impl WarbandSort {
    /// Parse a `key:dir` selector such as `"units:desc"`.
    pub fn parse(value: &str) -> Self {
        let (key, dir) = split_selector(value);
        let key = match key {
            "units" => WarbandSortKey::Units,
            _ => WarbandSortKey::Name,
        };
        Self { key, dir }
    }

    /// Selector form, e.g. `"units:asc"`.
    pub fn selector(&self) -> String {
        format!("{}:{}", self.key.as_str(), self.dir.as_str())
    }
}

fn split_selector(value: &str) -> (&str, SortDir) {
    let mut parts = value.splitn(2, ':');
    let key = parts.next().unwrap_or_default();
    let dir = match parts.next() {
        Some("desc") => SortDir::Desc,
        _ => SortDir::Asc,
    };
    (key, dir)
}

/// Filter and sort parameters for the unit table.
#[derive(Debug, Clone, Default)]
pub struct UnitQuery {
    /// Free-text search; empty matches everything.
    pub text: String,
    /// Keep only units belonging to this warband; empty/absent passes all.
    pub warband_id: Option<String>,
    /// Keep only units with exactly this type label; empty/absent passes all.
    pub unit_type: Option<String>,
    /// Ordering of the result.
    pub sort: UnitSort,
}

/// Filter and sort parameters for the warband table.
#[derive(Debug, Clone, Default)]
pub struct WarbandQuery {
    /// Free-text search; empty matches everything.
    pub text: String,
    /// Ordering of the result.
    pub sort: WarbandSort,
}

/// Apply filters, then sort. The source slice is never mutated.
pub fn query_units(units: &[Unit], query: &UnitQuery) -> Vec<Unit> {
    let needle = normalize(Some(query.text.trim()));
    let mut rows: Vec<Unit> = units
        .iter()
        .filter(|unit| matches_text(&unit_haystack(unit), &needle))
        .filter(|unit| match query.unit_type.as_deref() {
            None | Some("") => true,
            Some(label) => unit.unit_type.as_deref() == Some(label),
        })
        .filter(|unit| match query.warband_id.as_deref() {
            None | Some("") => true,
            Some(warband) => unit.warband_ids.iter().any(|id| id == warband),
        })
        .cloned()
        .collect();
    rows.sort_by(|a, b| query.sort.dir.apply(compare_units(a, b, query.sort.key)));
    rows
}

/// Apply the text filter, then sort. The source slice is never mutated.
pub fn query_warbands(warbands: &[Warband], query: &WarbandQuery) -> Vec<Warband> {
    let needle = normalize(Some(query.text.trim()));
    let mut rows: Vec<Warband> = warbands
        .iter()
        .filter(|warband| matches_text(&warband_haystack(warband), &needle))
        .cloned()
        .collect();
    rows.sort_by(|a, b| query.sort.dir.apply(compare_warbands(a, b, query.sort.key)));
    rows
}

fn matches_text(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.contains(needle)
}

fn unit_haystack(unit: &Unit) -> String {
    let mut parts = vec![
        normalize(Some(&unit.id)),
        normalize(Some(&unit.name)),
        normalize(unit.unit_type.as_deref()),
    ];
    parts.extend(unit.keywords.iter().map(|k| normalize(Some(k))));
    parts.extend(unit.tags.iter().map(|t| normalize(Some(t))));
    parts.join(" | ")
}

fn warband_haystack(warband: &Warband) -> String {
    let mut parts = vec![
        normalize(Some(&warband.id)),
        normalize(Some(&warband.name)),
    ];
    parts.extend(warband.tags.iter().map(|t| normalize(Some(t))));
    parts.join(" | ")
}

fn compare_units(a: &Unit, b: &Unit, key: UnitSortKey) -> Ordering {
    match key {
        UnitSortKey::Name => compare_text(a.display_name(), b.display_name()),
        UnitSortKey::Type => compare_text(
            a.unit_type.as_deref().unwrap_or_default(),
            b.unit_type.as_deref().unwrap_or_default(),
        )
        .then_with(|| compare_text(a.display_name(), b.display_name())),
        UnitSortKey::Gold => a
            .gold()
            .cmp(&b.gold())
            .then_with(|| compare_text(a.display_name(), b.display_name())),
    }
}

fn compare_warbands(a: &Warband, b: &Warband, key: WarbandSortKey) -> Ordering {
    match key {
        WarbandSortKey::Name => compare_text(a.display_name(), b.display_name()),
        WarbandSortKey::Units => a
            .unit_count()
            .cmp(&b.unit_count())
            .then_with(|| compare_text(a.display_name(), b.display_name())),
    }
}

// Case-folded stand-in for locale-aware collation; exact ties fall back
// to raw ordering so results stay deterministic.
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}
