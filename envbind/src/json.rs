//! JSON-encoded values

use std::ops::{Deref, DerefMut};

use serde::de::DeserializeOwned;

use crate::target::{Bind, Target, UnmarshalString};

/// Binds a value encoded as JSON, e.g. `TAGS=["a","b"]` or
/// `LIMITS={"cpu":2}`.
///
/// ```
/// use std::collections::HashMap;
/// use envbind::Json;
///
/// let mut limits: Json<HashMap<String, u32>> = Json::default();
/// envbind::bind_value_from(
///     &mut limits,
///     "LIMITS",
///     &[],
///     &HashMap::from([("LIMITS".to_string(), r#"{"cpu":2}"#.to_string())]),
/// )
/// .unwrap();
/// assert_eq!(limits["cpu"], 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for Json<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T: DeserializeOwned> UnmarshalString for Json<T> {
    fn unmarshal_string(&mut self, value: &str) -> anyhow::Result<()> {
        self.0 = serde_json::from_str(value)?;
        Ok(())
    }
}

impl<T: DeserializeOwned> Bind for Json<T> {
    fn target(&mut self) -> Target<'_> {
        Target::UnmarshalString(self)
    }
}
