//! Mismatch detection and the append-only mismatch log.
//!
//! A mismatch is a rewrite whose new value disagrees with the previous one
//! beyond tolerance. It is recorded, never rejected.

use crate::advisory::{Advisory, AdvisoryBus};
use crate::value::ParamValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of comparing a previous value against a new one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Disagreement {
    /// Both numeric; carries `|new - old| / |old|`. Infinite when `old == 0`
    /// or when either side is NaN or infinite.
    Numeric(f64),
    /// At least one side is non-numeric and the values differ.
    Structural,
}

impl Disagreement {
    pub fn relative_difference(&self) -> Option<f64> {
        match self {
            Disagreement::Numeric(rel) => Some(*rel),
            Disagreement::Structural => None,
        }
    }
}

/// Compare `old` against `new`.
///
/// Numeric pairs disagree when the relative difference exceeds `tolerance`;
/// an old value of zero disagrees with any nonzero new value. A pair with a
/// NaN or infinite side disagrees unless both sides are bit-identical.
/// Every other pair disagrees iff the values are not structurally equal.
pub fn detect(old: &ParamValue, new: &ParamValue, tolerance: f64) -> Option<Disagreement> {
    match (old.as_f64(), new.as_f64()) {
        (Some(old), Some(new)) => {
            if !old.is_finite() || !new.is_finite() {
                return (old.to_bits() != new.to_bits())
                    .then_some(Disagreement::Numeric(f64::INFINITY));
            }
            if old == 0.0 {
                return (new != 0.0).then_some(Disagreement::Numeric(f64::INFINITY));
            }
            let rel = (new - old).abs() / old.abs();
            (rel > tolerance).then_some(Disagreement::Numeric(rel))
        }
        _ => (old != new).then_some(Disagreement::Structural),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MismatchRecord {
    pub path: String,
    pub previous_value: ParamValue,
    pub previous_source: String,
    pub new_value: ParamValue,
    pub new_source: String,
    /// `None` for structural mismatches. An infinite difference is written
    /// as the string `"unbounded"` since JSON has no infinity.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "relative_difference_repr"
    )]
    pub relative_difference: Option<f64>,
    pub recorded_at: DateTime<Utc>,
}

mod relative_difference_repr {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    const UNBOUNDED: &str = "unbounded";

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Marker(String),
    }

    pub fn serialize<S>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(rel) if rel.is_infinite() => serializer.serialize_str(UNBOUNDED),
            Some(rel) => serializer.serialize_f64(*rel),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Repr>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Repr::Number(rel)) => Ok(Some(rel)),
            Some(Repr::Marker(marker)) if marker == UNBOUNDED => Ok(Some(f64::INFINITY)),
            Some(Repr::Marker(other)) => Err(D::Error::custom(format!(
                "relative_difference must be a number or \"{UNBOUNDED}\", got \"{other}\""
            ))),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MismatchLog {
    records: Vec<MismatchRecord>,
}

impl MismatchLog {
    /// Store `record` and raise it as an advisory.
    pub fn append(&mut self, record: MismatchRecord, advisories: &mut AdvisoryBus) {
        advisories.raise(Advisory::Mismatch(record.clone()));
        self.records.push(record);
    }

    /// Full history in append order.
    pub fn all(&self) -> Vec<MismatchRecord> {
        self.records.clone()
    }

    pub fn for_path<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a MismatchRecord> {
        self.records.iter().filter(move |record| record.path == path)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MISMATCH_TOLERANCE;

    fn num(n: f64) -> ParamValue {
        ParamValue::Number(n)
    }

    #[test]
    fn half_percent_drift_is_within_tolerance() {
        assert_eq!(
            detect(&num(100.0), &num(100.5), DEFAULT_MISMATCH_TOLERANCE),
            None
        );
    }

    #[test]
    fn ten_percent_drift_is_a_mismatch() {
        let hit = detect(&num(100.0), &num(110.0), DEFAULT_MISMATCH_TOLERANCE)
            .expect("10% must mismatch");
        let rel = hit.relative_difference().expect("numeric pair");
        assert!((rel - 0.1).abs() < 1e-12);
    }

    #[test]
    fn zero_baseline_mismatches_any_nonzero_value() {
        assert_eq!(
            detect(&num(0.0), &num(1e-12), DEFAULT_MISMATCH_TOLERANCE),
            Some(Disagreement::Numeric(f64::INFINITY))
        );
        assert_eq!(detect(&num(0.0), &num(0.0), DEFAULT_MISMATCH_TOLERANCE), None);
    }

    #[test]
    fn nan_rewrites_are_mismatches() {
        let tol = DEFAULT_MISMATCH_TOLERANCE;
        assert_eq!(
            detect(&num(100.0), &num(f64::NAN), tol),
            Some(Disagreement::Numeric(f64::INFINITY))
        );
        assert_eq!(
            detect(&num(f64::NAN), &num(5.0), tol),
            Some(Disagreement::Numeric(f64::INFINITY))
        );
        assert_eq!(detect(&num(f64::NAN), &num(f64::NAN), tol), None);
    }

    #[test]
    fn infinite_rewrites_are_mismatches() {
        let tol = DEFAULT_MISMATCH_TOLERANCE;
        assert_eq!(
            detect(&num(f64::INFINITY), &num(5.0), tol),
            Some(Disagreement::Numeric(f64::INFINITY))
        );
        assert_eq!(
            detect(&num(5.0), &num(f64::NEG_INFINITY), tol),
            Some(Disagreement::Numeric(f64::INFINITY))
        );
        assert_eq!(
            detect(&num(f64::INFINITY), &num(f64::NEG_INFINITY), tol),
            Some(Disagreement::Numeric(f64::INFINITY))
        );
        assert_eq!(detect(&num(f64::INFINITY), &num(f64::INFINITY), tol), None);
    }

    fn record(relative_difference: Option<f64>) -> MismatchRecord {
        MismatchRecord {
            path: "gauge.alpha_gut".to_string(),
            previous_value: num(0.0),
            previous_source: "seed".to_string(),
            new_value: num(0.05),
            new_source: "gauge_mod".to_string(),
            relative_difference,
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn unbounded_difference_survives_json() {
        let original = record(Some(f64::INFINITY));
        let json = serde_json::to_value(&original).expect("serialize");
        assert_eq!(json["relative_difference"], "unbounded");

        let back: MismatchRecord = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, original);
    }

    #[test]
    fn finite_and_structural_differences_survive_json() {
        let numeric = record(Some(0.25));
        let json = serde_json::to_value(&numeric).expect("serialize");
        assert_eq!(json["relative_difference"], 0.25);
        assert_eq!(
            serde_json::from_value::<MismatchRecord>(json).expect("deserialize"),
            numeric
        );

        let structural = record(None);
        let json = serde_json::to_value(&structural).expect("serialize");
        assert!(json.get("relative_difference").is_none());
        assert_eq!(
            serde_json::from_value::<MismatchRecord>(json).expect("deserialize"),
            structural
        );
    }

    #[test]
    fn unknown_difference_marker_is_rejected() {
        let mut json = serde_json::to_value(record(None)).expect("serialize");
        json["relative_difference"] = serde_json::json!("huge");
        assert!(serde_json::from_value::<MismatchRecord>(json).is_err());
    }

    #[test]
    fn negative_baselines_use_magnitude() {
        assert_eq!(
            detect(&num(-100.0), &num(-100.5), DEFAULT_MISMATCH_TOLERANCE),
            None
        );
        assert!(detect(&num(-100.0), &num(-90.0), DEFAULT_MISMATCH_TOLERANCE).is_some());
    }

    #[test]
    fn non_numeric_pairs_compare_structurally() {
        let old = ParamValue::from("SU(5)");
        assert_eq!(detect(&old, &old.clone(), DEFAULT_MISMATCH_TOLERANCE), None);
        assert_eq!(
            detect(&old, &ParamValue::from("SO(10)"), DEFAULT_MISMATCH_TOLERANCE),
            Some(Disagreement::Structural)
        );
        assert_eq!(
            detect(&num(1.0), &ParamValue::Bool(true), DEFAULT_MISMATCH_TOLERANCE),
            Some(Disagreement::Structural)
        );
        let list = ParamValue::from(vec![1.0, 2.0]);
        assert_eq!(
            detect(&list, &ParamValue::from(vec![1.0, 2.001]), DEFAULT_MISMATCH_TOLERANCE),
            Some(Disagreement::Structural)
        );
    }

    #[test]
    fn tolerance_is_configurable() {
        assert_eq!(detect(&num(100.0), &num(110.0), 0.2), None);
        assert!(detect(&num(100.0), &num(100.5), 0.001).is_some());
    }

    #[test]
    fn append_keeps_order_and_notifies() {
        let mut log = MismatchLog::default();
        let mut bus = AdvisoryBus::default();
        let rx = bus.subscribe();

        for (idx, path) in ["a", "b", "a"].into_iter().enumerate() {
            log.append(
                MismatchRecord {
                    path: path.to_string(),
                    previous_value: num(idx as f64),
                    previous_source: "old".to_string(),
                    new_value: num(idx as f64 + 10.0),
                    new_source: "new".to_string(),
                    relative_difference: None,
                    recorded_at: Utc::now(),
                },
                &mut bus,
            );
        }

        let paths: Vec<String> = log.all().into_iter().map(|r| r.path).collect();
        assert_eq!(paths, vec!["a", "b", "a"]);
        assert_eq!(log.for_path("a").count(), 2);
        assert_eq!(rx.try_iter().count(), 3);
    }
}
