use serde_json::{Map, Value};

use crate::error::FieldError;

pub const MIN_HEAT: i64 = 0;
pub const MAX_HEAT: i64 = 12;

/// Fields a client may set on a sauce. On create every field is present;
/// on update absent fields are `None` and stay as they are.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SauceChanges {
    pub name: Option<String>,
    pub heat: Option<i32>,
    pub description: Option<String>,
    pub manufacturer: Option<String>,
    pub main_pepper: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSauce {
    pub name: String,
    pub heat: i32,
    pub description: String,
    pub manufacturer: String,
    pub main_pepper: String,
}

/// Validates a create payload. Errors are listed in field order: name, heat,
/// description, manufacturer, mainPepper.
pub fn validate_new(body: &Value) -> Result<NewSauce, Vec<FieldError>> {
    let changes = read_changes(body, true)?;
    let SauceChanges {
        name: Some(name),
        heat: Some(heat),
        description: Some(description),
        manufacturer: Some(manufacturer),
        main_pepper: Some(main_pepper),
    } = changes
    else {
        return Err(vec![FieldError::new("sauce", "sauce is incomplete")]);
    };
    Ok(NewSauce {
        name,
        heat,
        description,
        manufacturer,
        main_pepper,
    })
}

/// Validates an update payload: only the fields present are checked.
pub fn validate_changes(body: &Value) -> Result<SauceChanges, Vec<FieldError>> {
    read_changes(body, false)
}

fn read_changes(body: &Value, required: bool) -> Result<SauceChanges, Vec<FieldError>> {
    let Some(obj) = body.as_object() else {
        return Err(vec![FieldError::new("sauce", "sauce must be a JSON object")]);
    };

    let mut errors = Vec::new();
    let changes = SauceChanges {
        name: read_text(obj, "name", required, &mut errors),
        heat: read_heat(obj, required, &mut errors),
        description: read_text(obj, "description", required, &mut errors),
        manufacturer: read_text(obj, "manufacturer", required, &mut errors),
        main_pepper: read_text(obj, "mainPepper", required, &mut errors),
    };

    if errors.is_empty() {
        Ok(changes)
    } else {
        Err(errors)
    }
}

fn read_text(
    obj: &Map<String, Value>,
    field: &'static str,
    required: bool,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match obj.get(field) {
        None | Some(Value::Null) => {
            if required {
                errors.push(FieldError::new(field, format!("{field} is required")));
            }
            None
        }
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(_) => {
            errors.push(FieldError::new(
                field,
                format!("{field} must be a non-empty string"),
            ));
            None
        }
    }
}

fn read_heat(
    obj: &Map<String, Value>,
    required: bool,
    errors: &mut Vec<FieldError>,
) -> Option<i32> {
    match obj.get("heat") {
        None | Some(Value::Null) => {
            if required {
                errors.push(FieldError::new("heat", "heat is required"));
            }
            None
        }
        Some(v) => match whole_number(v) {
            Some(h) if (MIN_HEAT..=MAX_HEAT).contains(&h) => Some(h as i32),
            _ => {
                errors.push(FieldError::new(
                    "heat",
                    format!("heat must be an integer between {MIN_HEAT} and {MAX_HEAT}"),
                ));
                None
            }
        },
    }
}

/// `4` and `4.0` are both accepted; `4.5`, strings and booleans are not.
fn whole_number(v: &Value) -> Option<i64> {
    if let Some(n) = v.as_i64() {
        return Some(n);
    }
    let f = v.as_f64()?;
    (f.is_finite() && f.fract() == 0.0 && f.abs() <= i32::MAX as f64).then_some(f as i64)
}
