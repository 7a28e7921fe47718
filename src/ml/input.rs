use crate::error::{AppError, Result};
use crate::ml::models::{Observation, DEFAULT_DAY, DEFAULT_MONTH, N_CONTINUOUS};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Field names for one request shape
#[derive(Debug, Clone, Copy)]
pub struct FieldNames {
    /// Continuous fields in feature order
    pub continuous: [&'static str; N_CONTINUOUS],
    pub month: &'static str,
    pub day: &'static str,
    pub lat: &'static str,
    pub lon: &'static str,
}

/// Lowercase names posted by the web form
pub const FORM_FIELDS: FieldNames = FieldNames {
    continuous: ["ffmc", "dmc", "dc", "isi", "temp", "rh", "wind", "rain"],
    month: "month",
    day: "day",
    lat: "lat",
    lon: "lon",
};

/// Dataset-style names used by the JSON API
pub const API_FIELDS: FieldNames = FieldNames {
    continuous: ["FFMC", "DMC", "DC", "ISI", "temp", "RH", "wind", "rain"],
    month: "month",
    day: "day",
    lat: "lat",
    lon: "lon",
};

/// Source of raw request fields
pub trait FieldSource {
    /// Numeric field; `Ok(None)` when absent, an error when present but not a number
    fn number(&self, key: &str) -> Result<Option<f64>>;

    /// String field; `Ok(None)` when absent
    fn text(&self, key: &str) -> Result<Option<String>>;

    /// Optional coordinate; anything unparseable reads as absent
    fn coordinate(&self, key: &str) -> Option<f64>;
}

fn parse_number(key: &str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| AppError::Validation(format!("{} must be a number, got '{}'", key, raw)))
}

impl FieldSource for HashMap<String, String> {
    fn number(&self, key: &str) -> Result<Option<f64>> {
        self.get(key).map(|raw| parse_number(key, raw)).transpose()
    }

    fn text(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get(key).cloned())
    }

    fn coordinate(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(|raw| raw.trim().parse().ok())
    }
}

impl FieldSource for Map<String, Value> {
    fn number(&self, key: &str) -> Result<Option<f64>> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n.as_f64().map(Some).ok_or_else(|| {
                AppError::Validation(format!("{} is not representable as a float", key))
            }),
            Some(Value::String(raw)) => parse_number(key, raw).map(Some),
            Some(other) => Err(AppError::Validation(format!(
                "{} must be a number, got {}",
                key, other
            ))),
        }
    }

    fn text(&self, key: &str) -> Result<Option<String>> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(AppError::Validation(format!(
                "{} must be a string, got {}",
                key, other
            ))),
        }
    }

    fn coordinate(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(raw) => raw.trim().parse().ok(),
            _ => None,
        }
    }
}

/// One parsed prediction request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionInput {
    pub observation: Observation,

    /// Echoed back unchanged; never used by the model
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl PredictionInput {
    /// Parse with permissive defaults: absent numbers are 0, absent month/day are
    /// "jan"/"mon"
    pub fn parse<S: FieldSource + ?Sized>(source: &S, names: &FieldNames) -> Result<Self> {
        let mut values = [0.0; N_CONTINUOUS];
        for (value, key) in values.iter_mut().zip(names.continuous) {
            *value = source.number(key)?.unwrap_or(0.0);
        }
        let [ffmc, dmc, dc, isi, temp, rh, wind, rain] = values;

        let month = source
            .text(names.month)?
            .unwrap_or_else(|| DEFAULT_MONTH.to_string());
        let day = source
            .text(names.day)?
            .unwrap_or_else(|| DEFAULT_DAY.to_string());

        Ok(Self {
            observation: Observation {
                ffmc,
                dmc,
                dc,
                isi,
                temp,
                rh,
                wind,
                rain,
                month,
                day,
            },
            lat: source.coordinate(names.lat),
            lon: source.coordinate(names.lon),
        })
    }

    /// Parse urlencoded form fields
    pub fn from_form(fields: &HashMap<String, String>) -> Result<Self> {
        Self::parse(fields, &FORM_FIELDS)
    }

    /// Parse a JSON API body
    pub fn from_json(body: &Value) -> Result<Self> {
        let object = body.as_object().ok_or_else(|| {
            AppError::Validation("Request body must be a JSON object".to_string())
        })?;
        Self::parse(object, &API_FIELDS)
    }
}
