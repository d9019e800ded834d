//! Recipe input normalization.
//!
//! Create and update share one request shape ([`RecipeInput`]) and one
//! normalization path ([`RecipeInput::normalize`]) so both apply identical
//! defaults. Update is a full overwrite of the scalar fields; only the
//! `ingredients` list distinguishes "absent" (keep associations) from
//! "present" (replace them).

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::CoreError;
use crate::listing::parse_int_prefix;

/// Prep time applied when the field is missing or unparseable.
pub const DEFAULT_PREP_TIME_MINUTES: i32 = 0;

/// Servings applied when the field is missing, unparseable, or below 1.
pub const DEFAULT_SERVINGS: i32 = 1;

/// Lowest accepted rating.
pub const MIN_RATING: i16 = 1;

/// Highest accepted rating.
pub const MAX_RATING: i16 = 5;

// ---------------------------------------------------------------------------
// Request shape
// ---------------------------------------------------------------------------

/// Body of `POST /api/recipes` and `PUT /api/recipes/{id}`.
///
/// Numeric fields accept JSON numbers or numeric strings, since HTML forms
/// post everything as text.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RecipeInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub cuisine_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub prep_time_minutes: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub servings: Option<i64>,
    #[serde(default)]
    pub instructions: Option<String>,
    /// `None` when the field is absent from the body.
    #[serde(default)]
    pub ingredients: Option<Vec<IngredientInput>>,
}

/// One ingredient line as submitted by the client.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct IngredientInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub quantity: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub unit: Option<String>,
}

// ---------------------------------------------------------------------------
// Normalized shape
// ---------------------------------------------------------------------------

/// A recipe ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeDraft {
    pub title: String,
    pub description: Option<String>,
    /// Never blank: the default image is substituted.
    pub image_url: String,
    pub video_url: Option<String>,
    pub cuisine_type: Option<String>,
    pub prep_time_minutes: i32,
    pub servings: i32,
    pub instructions: Option<String>,
    /// `None` leaves existing associations untouched on update.
    pub ingredients: Option<Vec<IngredientLine>>,
}

/// An ingredient line with a non-blank name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientLine {
    pub name: String,
    pub quantity: Option<String>,
    pub unit: Option<String>,
}

impl RecipeInput {
    /// Validate and apply defaults.
    ///
    /// Fails only when the title is missing or blank.
    pub fn normalize(self, default_image_url: &str) -> Result<RecipeDraft, CoreError> {
        let title = normalize_optional_text(self.title.as_deref())
            .ok_or_else(|| CoreError::Validation("Title is required".into()))?;

        let ingredients = self.ingredients.map(|lines| {
            lines
                .into_iter()
                .filter_map(IngredientInput::into_line)
                .collect()
        });

        Ok(RecipeDraft {
            title,
            description: normalize_optional_text(self.description.as_deref()),
            image_url: resolve_image_url(self.image_url.as_deref(), default_image_url),
            video_url: normalize_optional_text(self.video_url.as_deref()),
            cuisine_type: normalize_optional_text(self.cuisine_type.as_deref()),
            prep_time_minutes: coerce_prep_time(self.prep_time_minutes),
            servings: coerce_servings(self.servings),
            instructions: normalize_optional_text(self.instructions.as_deref()),
            ingredients,
        })
    }
}

impl IngredientInput {
    fn into_line(self) -> Option<IngredientLine> {
        let name = normalize_optional_text(self.name.as_deref())?;
        Some(IngredientLine {
            name,
            quantity: self.quantity,
            unit: self.unit,
        })
    }
}

// ---------------------------------------------------------------------------
// Field rules
// ---------------------------------------------------------------------------

/// The image URL a client sees: the stored value when non-blank, the
/// configured default otherwise.
pub fn resolve_image_url(stored: Option<&str>, default_image_url: &str) -> String {
    match stored.map(str::trim) {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => default_image_url.to_string(),
    }
}

/// Trim and map blank strings to `None`.
pub fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Negative or missing prep times become 0.
pub fn coerce_prep_time(value: Option<i64>) -> i32 {
    match value {
        Some(v) if v > 0 => v.min(i64::from(i32::MAX)) as i32,
        _ => DEFAULT_PREP_TIME_MINUTES,
    }
}

/// Servings below 1 or missing become 1.
pub fn coerce_servings(value: Option<i64>) -> i32 {
    match value {
        Some(v) if v >= 1 => v.min(i64::from(i32::MAX)) as i32,
        _ => DEFAULT_SERVINGS,
    }
}

/// Clamp a submitted rating into `MIN_RATING..=MAX_RATING`.
pub fn clamp_rating(value: Option<i64>) -> Result<i16, CoreError> {
    let value = value.ok_or_else(|| CoreError::Validation("Rating is required".into()))?;
    Ok(value.clamp(i64::from(MIN_RATING), i64::from(MAX_RATING)) as i16)
}

// ---------------------------------------------------------------------------
// Lenient deserializers
// ---------------------------------------------------------------------------

/// Accept a JSON number or a numeric string; anything else becomes `None`.
pub fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(int_from_json))
}

/// Accept a JSON string or number as free text; blanks become `None`.
pub fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => normalize_optional_text(Some(&s)),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn int_from_json(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => parse_int_prefix(s),
        _ => None,
    }
}
