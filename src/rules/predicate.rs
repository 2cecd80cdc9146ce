//! Declarative range predicates over observation fields.
//!
//! A predicate names one field and an optional lower and upper bound, each
//! inclusive or exclusive. An absent optional field never satisfies a
//! predicate.

use serde::{Deserialize, Serialize};

use crate::observation::Observation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    WindSpeed,
    Pressure,
    Temperature,
    Humidity,
}

impl Field {
    pub fn read(self, obs: &Observation) -> Option<f64> {
        match self {
            Field::WindSpeed => Some(obs.wind_speed()),
            Field::Pressure => Some(obs.pressure()),
            Field::Temperature => obs.temperature(),
            Field::Humidity => obs.humidity(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bound {
    pub value: f64,
    pub inclusive: bool,
}

impl Bound {
    pub const fn inclusive(value: f64) -> Self {
        Self {
            value,
            inclusive: true,
        }
    }

    pub const fn exclusive(value: f64) -> Self {
        Self {
            value,
            inclusive: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangePredicate {
    pub field: Field,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower: Option<Bound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<Bound>,
}

impl RangePredicate {
    /// `x >= v`
    pub const fn at_least(field: Field, v: f64) -> Self {
        Self {
            field,
            lower: Some(Bound::inclusive(v)),
            upper: None,
        }
    }

    /// `x > v`
    pub const fn above(field: Field, v: f64) -> Self {
        Self {
            field,
            lower: Some(Bound::exclusive(v)),
            upper: None,
        }
    }

    /// `x <= v`
    pub const fn at_most(field: Field, v: f64) -> Self {
        Self {
            field,
            lower: None,
            upper: Some(Bound::inclusive(v)),
        }
    }

    /// `x < v`
    pub const fn below(field: Field, v: f64) -> Self {
        Self {
            field,
            lower: None,
            upper: Some(Bound::exclusive(v)),
        }
    }

    /// `lo <= x < hi`
    pub const fn half_open(field: Field, lo: f64, hi: f64) -> Self {
        Self {
            field,
            lower: Some(Bound::inclusive(lo)),
            upper: Some(Bound::exclusive(hi)),
        }
    }

    /// `lo <= x <= hi`
    pub const fn closed(field: Field, lo: f64, hi: f64) -> Self {
        Self {
            field,
            lower: Some(Bound::inclusive(lo)),
            upper: Some(Bound::inclusive(hi)),
        }
    }

    pub fn contains(&self, x: f64) -> bool {
        let lower_ok = match self.lower {
            None => true,
            Some(b) if b.inclusive => x >= b.value,
            Some(b) => x > b.value,
        };
        let upper_ok = match self.upper {
            None => true,
            Some(b) if b.inclusive => x <= b.value,
            Some(b) => x < b.value,
        };
        lower_ok && upper_ok
    }

    pub fn holds(&self, obs: &Observation) -> bool {
        self.field.read(obs).is_some_and(|x| self.contains(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::ObservationInput;

    #[test]
    fn half_open_edges() {
        let p = RangePredicate::half_open(Field::WindSpeed, 74.0, 96.0);
        assert!(!p.contains(73.999));
        assert!(p.contains(74.0));
        assert!(p.contains(95.999));
        assert!(!p.contains(96.0));
    }

    #[test]
    fn single_sided_edges() {
        assert!(RangePredicate::at_most(Field::Pressure, 980.0).contains(980.0));
        assert!(!RangePredicate::below(Field::Pressure, 980.0).contains(980.0));
        assert!(RangePredicate::at_least(Field::WindSpeed, 111.0).contains(111.0));
        assert!(!RangePredicate::above(Field::Temperature, 20.0).contains(20.0));
        assert!(RangePredicate::closed(Field::Humidity, 60.0, 80.0).contains(80.0));
    }

    #[test]
    fn absent_field_never_holds() {
        let obs = ObservationInput::new()
            .wind_speed(50.0)
            .pressure(990.0)
            .validate()
            .unwrap();
        assert!(!RangePredicate::above(Field::Temperature, -1000.0).holds(&obs));
        assert!(!RangePredicate::below(Field::Humidity, 1000.0).holds(&obs));
        assert!(RangePredicate::at_most(Field::Pressure, 990.0).holds(&obs));
    }

    #[test]
    fn serializes_without_missing_bounds() {
        let v = serde_json::to_value(RangePredicate::above(Field::Temperature, 20.0)).unwrap();
        assert_eq!(v["field"], serde_json::json!("temperature"));
        assert!(v.get("upper").is_none());
        assert_eq!(v["lower"]["inclusive"], serde_json::json!(false));
    }
}
