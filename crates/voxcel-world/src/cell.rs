use std::collections::{BTreeMap, HashSet};
use voxcel_core::color::{ColorClass, Rgb};
use voxcel_core::types::{ArrayId, CellCoord};

/// Literal cell value as shown in the grid.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Bool(bool),
}

impl CellValue {
    /// Empty text counts as no value.
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Text(s) if s.is_empty())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Number(v)
    }
}

/// Legacy spellings accepted for canonical meta keys.
const META_KEY_ALIASES: [(&str, &str); 4] = [
    ("onClick", "on_click"),
    ("onHold", "on_hold"),
    ("onTouch", "on_touch"),
    ("onLand", "on_land"),
];

fn canonical_meta_key(key: &str) -> &str {
    META_KEY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(key)
}

/// Per-cell annotations. The two fields the engine reads are typed; anything
/// else is kept verbatim in `extra` under its canonical key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellMeta {
    /// Custom color, overrides the palette for the solid pass.
    pub color: Option<Rgb>,
    /// Raw (still encoded) click action payload.
    pub click_action: Option<String>,
    pub extra: BTreeMap<String, String>,
}

impl CellMeta {
    /// Build from loose key/value pairs. Alias keys (`onClick`) are folded
    /// into their canonical form (`on_click`); when both spellings are
    /// present the canonical one wins. Unparseable colors are dropped.
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut canonical: BTreeMap<String, (bool, String)> = BTreeMap::new();
        for (key, value) in entries {
            let canon = canonical_meta_key(key);
            let is_canonical = canon == key;
            match canonical.get(canon) {
                Some((true, _)) if !is_canonical => {}
                _ => {
                    canonical.insert(canon.to_string(), (is_canonical, value.to_string()));
                }
            }
        }

        let mut meta = CellMeta::default();
        for (key, (_, value)) in canonical {
            match key.as_str() {
                "color" => meta.color = Rgb::parse(&value),
                "on_click" => meta.click_action = Some(value),
                _ => {
                    meta.extra.insert(key, value);
                }
            }
        }
        meta
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_click_action(mut self, action: impl Into<String>) -> Self {
        self.click_action = Some(action.into());
        self
    }
}

/// One addressable cell of an array.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub coord: CellCoord,
    pub value: Option<CellValue>,
    pub formula: Option<String>,
    pub meta: CellMeta,
}

impl Cell {
    pub fn empty(coord: CellCoord) -> Self {
        Self {
            coord,
            value: None,
            formula: None,
            meta: CellMeta::default(),
        }
    }

    pub fn with_value(coord: CellCoord, value: impl Into<CellValue>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::empty(coord)
        }
    }

    pub fn with_formula(coord: CellCoord, formula: impl Into<String>) -> Self {
        Self {
            formula: Some(formula.into()),
            ..Self::empty(coord)
        }
    }

    pub fn has_value(&self) -> bool {
        self.value.as_ref().is_some_and(|v| !v.is_empty())
    }

    /// Palette class for this cell. Formula always wins, then emitted,
    /// then value, then empty.
    pub fn color_class(&self, emitted: bool) -> ColorClass {
        if self.formula.is_some() {
            ColorClass::Formula
        } else if emitted {
            ColorClass::Emitted
        } else if self.has_value() {
            ColorClass::Value
        } else {
            ColorClass::Empty
        }
    }
}

/// Answers whether a cell's value was written by another cell's side effect.
pub trait CellProvenance {
    fn is_emitted(&self, array: ArrayId, coord: CellCoord) -> bool;
}

/// No cell is emitted.
pub struct NoProvenance;

impl CellProvenance for NoProvenance {
    fn is_emitted(&self, _array: ArrayId, _coord: CellCoord) -> bool {
        false
    }
}

impl CellProvenance for HashSet<(ArrayId, CellCoord)> {
    fn is_emitted(&self, array: ArrayId, coord: CellCoord) -> bool {
        self.contains(&(array, coord))
    }
}
