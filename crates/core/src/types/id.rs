//! Caller-assigned insured identifier.

use core::fmt;
use core::num::ParseIntError;

use serde::{Deserialize, Serialize};

/// Identification number of an insured person.
///
/// The identifier is assigned by the caller at creation time (it is a
/// national identification number, not a generated surrogate key) and is
/// immutable afterwards. It is the primary key in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InsuredId(i64);

impl InsuredId {
    /// Create a new ID from an i64 value.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the underlying i64 value.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for InsuredId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for InsuredId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(Self)
    }
}

impl From<i64> for InsuredId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<InsuredId> for i64 {
    fn from(id: InsuredId) -> Self {
        id.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for InsuredId {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i64 as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <i64 as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for InsuredId {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let id = <i64 as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(id))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for InsuredId {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i64 as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_decimal_string() {
        assert_eq!(InsuredId::new(1_019_456_789).to_string(), "1019456789");
    }

    #[test]
    fn test_from_str() {
        let id: InsuredId = "42".parse().unwrap();
        assert_eq!(id, InsuredId::new(42));
        assert!("not-a-number".parse::<InsuredId>().is_err());
    }

    #[test]
    fn test_serde_transparent() {
        let id = InsuredId::new(7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
        let back: InsuredId = serde_json::from_str("7").unwrap();
        assert_eq!(back, id);
    }
}
