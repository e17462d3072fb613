//! Class join codes.
//!
//! A code is exactly six characters drawn from `A-Z0-9`. Codes are typed in
//! by students, so parsing is case-insensitive and always normalizes to
//! upper case.

use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::{Database, Decode, Encode, Type, postgres::PgTypeInfo};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

pub const CLASS_CODE_LENGTH: usize = 6;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidClassCode;

impl fmt::Display for InvalidClassCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Invalid code")
    }
}

impl std::error::Error for InvalidClassCode {}

#[derive(Clone, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[schema(value_type = String, example = "K7Q2XD")]
pub struct ClassCode(String);

impl ClassCode {
    /// A fresh code with each character chosen uniformly from the alphabet.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let code = (0..CLASS_CODE_LENGTH)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect();
        Self(code)
    }

    /// Upper-cases `raw` and checks length and alphabet.
    pub fn parse(raw: &str) -> Result<Self, InvalidClassCode> {
        let normalized = raw.trim().to_ascii_uppercase();
        let valid = normalized.len() == CLASS_CODE_LENGTH
            && normalized.bytes().all(|b| ALPHABET.contains(&b));
        if valid {
            Ok(Self(normalized))
        } else {
            Err(InvalidClassCode)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ClassCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassCode({})", self.0)
    }
}

impl fmt::Display for ClassCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ClassCode {
    type Err = InvalidClassCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Type<sqlx::Postgres> for ClassCode {
    fn type_info() -> PgTypeInfo {
        <String as Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <String as Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl<'q> Encode<'q, sqlx::Postgres> for ClassCode {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

impl<'r> Decode<'r, sqlx::Postgres> for ClassCode {
    fn decode(
        value: <sqlx::Postgres as Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as Decode<'r, sqlx::Postgres>>::decode(value)?;
        Ok(Self(s))
    }
}

impl<'de> Deserialize<'de> for ClassCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_codes_match_format() {
        for _ in 0..500 {
            let code = ClassCode::generate();
            assert_eq!(code.as_str().len(), CLASS_CODE_LENGTH);
            assert!(
                code.as_str()
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
            );
            assert_eq!(ClassCode::parse(code.as_str()).unwrap(), code);
        }
    }

    #[test]
    fn test_generated_codes_vary() {
        let codes: HashSet<_> = (0..200).map(|_| ClassCode::generate()).collect();
        assert!(codes.len() > 190);
    }

    #[test]
    fn test_parse_uppercases() {
        assert_eq!(ClassCode::parse("ab12cd").unwrap().as_str(), "AB12CD");
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        assert!(ClassCode::parse("ABC12").is_err());
        assert!(ClassCode::parse("ABC1234").is_err());
        assert!(ClassCode::parse("AB-12C").is_err());
        assert!(ClassCode::parse("ÄBC123").is_err());
        assert!(ClassCode::parse("").is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let code: ClassCode = serde_json::from_str(r#""x9y8z7""#).unwrap();
        assert_eq!(code.as_str(), "X9Y8Z7");
        assert!(serde_json::from_str::<ClassCode>(r#""nope""#).is_err());
    }
}
