//! Actions and the structural guard applied to untyped actions.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt::Debug;

use super::error::InvalidActionError;

/// Field carrying the discriminator in the untyped (JSON) form of an action.
pub const TYPE_FIELD: &str = "type";

/// Kind reported for the initialization marker. Application actions must
/// not use it.
pub const INIT_KIND: &str = "@@minidux/INIT";

/// Trait for application actions.
///
/// Actions represent discrete transition requests, e.g. user edits or
/// system events. Each variant carries only the fields it needs.
pub trait Action: Debug + Send + 'static {
    /// Every discriminator this action type understands, as written in the
    /// `type` field.
    const KINDS: &'static [&'static str];

    /// Discriminator of this particular action.
    fn kind(&self) -> &'static str;
}

/// What a reducer receives on each dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum Incoming<A> {
    /// Sent once while the store is created, with no prior state.
    Init,
    /// A recognized application action.
    Action(A),
    /// A well-formed untyped action whose `type` the application doesn't know.
    Unrecognized { kind: String },
}

impl<A: Action> Incoming<A> {
    pub fn kind(&self) -> &str {
        match self {
            Incoming::Init => INIT_KIND,
            Incoming::Action(action) => action.kind(),
            Incoming::Unrecognized { kind } => kind,
        }
    }
}

/// Check that `raw` is a non-array object with a defined `type`.
///
/// `None` and JSON `null` both count as an absent action.
pub fn validate(raw: Option<&Value>) -> Result<(), InvalidActionError> {
    let object = match raw {
        None | Some(Value::Null) => return Err(InvalidActionError::Missing),
        Some(Value::Array(_)) => return Err(InvalidActionError::Array),
        Some(Value::Object(object)) => object,
        Some(other) => {
            return Err(InvalidActionError::NotAnObject {
                found: json_kind(other),
            })
        }
    };

    match object.get(TYPE_FIELD) {
        None | Some(Value::Null) => Err(InvalidActionError::MissingType),
        Some(_) => Ok(()),
    }
}

/// Validate `raw`, then decode it into the typed action union.
///
/// A `type` outside [`Action::KINDS`] decodes to [`Incoming::Unrecognized`]
/// rather than failing. This includes the reserved init kind and non-string
/// discriminators, which keep their JSON text as the kind.
pub fn decode_action<A>(raw: Option<&Value>) -> Result<Incoming<A>, InvalidActionError>
where
    A: Action + DeserializeOwned,
{
    validate(raw)?;
    let Some(raw) = raw else {
        return Err(InvalidActionError::Missing);
    };

    let kind = match &raw[TYPE_FIELD] {
        Value::String(kind) => kind.clone(),
        other => other.to_string(),
    };

    if !A::KINDS.contains(&kind.as_str()) {
        return Ok(Incoming::Unrecognized { kind });
    }

    serde_json::from_value(raw.clone())
        .map(Incoming::Action)
        .map_err(|source| InvalidActionError::Malformed { kind, source })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
