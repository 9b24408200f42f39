use mongodb::bson::{Bson, Document};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use utoipa::ToSchema;

use crate::utils::AppError;

/// Numeric age.
///
/// Accepts numbers, numeric strings and booleans on input. Integral values are
/// written back as integers so `30` round-trips as `30` and not `30.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Age(pub f64);

impl Age {
    fn is_integral(&self) -> bool {
        self.0.fract() == 0.0 && self.0 >= i64::MIN as f64 && self.0 <= i64::MAX as f64
    }

    pub fn to_bson(self) -> Bson {
        if self.is_integral() {
            Bson::Int64(self.0 as i64)
        } else {
            Bson::Double(self.0)
        }
    }
}

impl Serialize for Age {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_integral() {
            serializer.serialize_i64(self.0 as i64)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

struct AgeVisitor;

impl<'de> de::Visitor<'de> for AgeVisitor {
    type Value = Age;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number or a numeric string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Age, E> {
        Ok(Age(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Age, E> {
        Ok(Age(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Age, E> {
        if v.is_finite() {
            Ok(Age(v))
        } else {
            Err(E::invalid_value(de::Unexpected::Float(v), &self))
        }
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Age, E> {
        Ok(Age(if v { 1.0 } else { 0.0 }))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Age, E> {
        v.trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Age)
            .ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}

impl<'de> Deserialize<'de> for Age {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AgeVisitor)
    }
}

struct TextVisitor;

impl<'de> de::Visitor<'de> for TextVisitor {
    type Value = Option<String>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string, number or boolean")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(Some(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }
}

/// Text fields take strings verbatim and stringify scalars; `null` means unset.
fn coerce_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    deserializer.deserialize_any(TextVisitor)
}

/// User as stored in the `users` collection.
///
/// The collection has no enforced schema, so decoding never fails: a
/// non-ObjectId `_id` is stringified and a field that does not coerce is
/// treated as unset.
#[derive(Debug, Clone, PartialEq)]
pub struct UserDocument {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<Age>,
}

fn bson_id(value: &Bson) -> String {
    match value {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn bson_text(value: &Bson) -> Option<String> {
    match value {
        Bson::String(s) => Some(s.clone()),
        Bson::Int32(n) => Some(n.to_string()),
        Bson::Int64(n) => Some(n.to_string()),
        Bson::Double(n) => Some(n.to_string()),
        Bson::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}

fn bson_age(value: &Bson) -> Option<Age> {
    match value {
        Bson::Int32(n) => Some(Age(*n as f64)),
        Bson::Int64(n) => Some(Age(*n as f64)),
        Bson::Double(n) if n.is_finite() => Some(Age(*n)),
        Bson::Boolean(b) => Some(Age(if *b { 1.0 } else { 0.0 })),
        Bson::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()).map(Age),
        _ => None,
    }
}

impl From<&Document> for UserDocument {
    fn from(doc: &Document) -> Self {
        let id = doc.get("_id").map(bson_id).unwrap_or_default();

        let field = |key: &str, value: Option<&Bson>, coerced: bool| {
            if let Some(raw) = value {
                if !coerced && *raw != Bson::Null {
                    log::warn!("⚠️ User {}: ignoring stored '{}' = {}", id, key, raw);
                }
            }
        };

        let name = doc.get("name").and_then(bson_text);
        field("name", doc.get("name"), name.is_some());
        let email = doc.get("email").and_then(bson_text);
        field("email", doc.get("email"), email.is_some());
        let age = doc.get("age").and_then(bson_age);
        field("age", doc.get("age"), age.is_some());

        Self { id, name, email, age }
    }
}

/// Any subset of the user fields, as submitted on create and update.
///
/// Keys outside `name`, `email` and `age` are dropped.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
pub struct UserFields {
    /// The user name
    #[serde(default, deserialize_with = "coerce_text")]
    #[schema(example = "Ann")]
    pub name: Option<String>,

    /// The user email
    #[serde(default, deserialize_with = "coerce_text")]
    #[schema(example = "a@x.com")]
    pub email: Option<String>,

    /// Age of the user
    #[serde(default)]
    #[schema(value_type = Option<f64>, example = 30)]
    pub age: Option<Age>,
}

fn is_json_content_type(content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or_default();
    essence.trim().eq_ignore_ascii_case("application/json")
}

impl UserFields {
    /// Reads the fields from a request. Bodies not declared as
    /// `application/json` are not parsed and yield an empty field set.
    pub fn from_request(content_type: &str, body: &[u8]) -> Result<Self, AppError> {
        if !is_json_content_type(content_type) {
            if !body.is_empty() {
                log::debug!("Ignoring {} byte body with content type {:?}", body.len(), content_type);
            }
            return Ok(Self::default());
        }

        Self::from_body(body)
    }

    /// Parses a request body. An empty body is an empty field set; anything
    /// else must be a JSON object whose known fields coerce cleanly.
    pub fn from_body(body: &[u8]) -> Result<Self, AppError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        let value: serde_json::Value = serde_json::from_slice(body)
            .map_err(|e| AppError::InvalidRequest(format!("Malformed JSON body: {}", e)))?;

        if !value.is_object() {
            return Err(AppError::InvalidRequest(
                "User payload must be a JSON object".to_string(),
            ));
        }

        serde_json::from_value(value)
            .map_err(|e| AppError::InvalidRequest(format!("Invalid user payload: {}", e)))
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.age.is_none()
    }

    /// Only the supplied fields, ready for `insert_one` or `$set`.
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();

        if let Some(name) = &self.name { doc.insert("name", name.as_str()); }
        if let Some(email) = &self.email { doc.insert("email", email.as_str()); }
        if let Some(age) = self.age { doc.insert("age", age.to_bson()); }

        doc
    }
}

/// User as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    /// The auto-generated id of the user
    #[schema(example = "65f1a2b3c4d5e6f708192a3b")]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>)]
    pub age: Option<Age>,
}

impl From<UserDocument> for UserResponse {
    fn from(user: UserDocument) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            age: user.age,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "New User has been created")]
    pub msg: String,
}

impl MessageResponse {
    pub fn new(msg: &str) -> Self {
        Self { msg: msg.to_string() }
    }
}
