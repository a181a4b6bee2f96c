//! Serde helpers for backend payloads.

use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};
use std::fmt;

/// Integers the backend may send either as JSON numbers or as numeric strings.
///
/// Identifiers and pagination counters are affected: rows coming from SQL
/// drivers sometimes stringify `COUNT(*)` and bigint columns.
pub mod lenient_u64 {
    use super::{Deserializer, Serializer, Visitor, de, fmt};

    /// Serializes a u64 as a JSON number.
    ///
    /// # Errors
    ///
    /// Returns an error if the serializer fails.
    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S>(value: &u64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(*value)
    }

    /// Deserializes a u64 from a string or number.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is negative, fractional or not numeric.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct StringOrIntVisitor;

        impl Visitor<'_> for StringOrIntVisitor {
            type Value = u64;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a non-negative integer or numeric string")
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(value)
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                u64::try_from(value).map_err(|_| E::custom(format!("negative value {value}")))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                value.trim().parse::<u64>().map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_any(StringOrIntVisitor)
    }

    /// Optional variant, `null` and missing map to `None`.
    pub mod option {
        use super::{Deserializer, Serializer, Visitor, de, fmt};

        /// Serializes an optional u64.
        ///
        /// # Errors
        ///
        /// Returns an error if the serializer fails.
        #[allow(clippy::ref_option)]
        pub fn serialize<S>(value: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(v) => super::serialize(v, serializer),
                None => serializer.serialize_none(),
            }
        }

        /// Deserializes an optional u64 from a string or number.
        ///
        /// # Errors
        ///
        /// Returns an error if deserialization fails.
        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
        where
            D: Deserializer<'de>,
        {
            struct OptionVisitor;

            impl<'de> Visitor<'de> for OptionVisitor {
                type Value = Option<u64>;

                fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                    formatter.write_str("an optional integer")
                }

                fn visit_none<E>(self) -> Result<Self::Value, E>
                where
                    E: de::Error,
                {
                    Ok(None)
                }

                fn visit_unit<E>(self) -> Result<Self::Value, E>
                where
                    E: de::Error,
                {
                    Ok(None)
                }

                fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
                where
                    D: Deserializer<'de>,
                {
                    super::deserialize(deserializer).map(Some)
                }
            }
            deserializer.deserialize_option(OptionVisitor)
        }
    }
}
