//! Projection of raw mappings onto record values.

use serde_json::{Map, Value};

use super::{FieldKind, RecordAnalyzer};
use crate::merge::merge_value;

impl RecordAnalyzer {
    /// Overlay the known parts of `raw` onto `base`.
    ///
    /// Keys of `raw` may use either spelling and may be dotted paths such as
    /// `child.str-arg`. Unknown keys are dropped at every level; nested
    /// mappings merge into the base while everything else replaces it.
    #[must_use]
    pub fn project(&self, base: &Map<String, Value>, raw: &Map<String, Value>) -> Map<String, Value> {
        let mut merged = Value::Object(base.clone());
        merge_value(&mut merged, Value::Object(self.retain_known(raw)));
        match merged {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    /// Keep only the entries of `raw` that name fields of this record.
    fn retain_known(&self, raw: &Map<String, Value>) -> Map<String, Value> {
        nest_dotted(raw)
            .into_iter()
            .filter_map(|(key, value)| {
                let field = self.field(&key)?;
                let kept = match (&field.kind, value) {
                    (FieldKind::Nested(child), Value::Object(inner)) => {
                        Value::Object(child.retain_known(&inner))
                    }
                    (_, other) => other,
                };
                Some((field.name.clone(), kept))
            })
            .collect()
    }
}

/// Turn dotted keys into nested mappings, keeping each segment's spelling.
fn nest_dotted(raw: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Value::Object(Map::new());
    for (key, value) in raw {
        let nested = key
            .rsplit('.')
            .fold(value.clone(), |inner, segment| {
                let mut level = Map::new();
                level.insert(segment.to_owned(), inner);
                Value::Object(level)
            });
        merge_value(&mut out, nested);
    }
    match out {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
