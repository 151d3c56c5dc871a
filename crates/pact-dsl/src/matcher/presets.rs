//! Ready-made matchers for common value formats.
//!
//! Each preset pairs a rule with a generated example. Examples that depend on
//! randomness or the clock are produced once, when the matcher is built, so a
//! preset used inside an array template yields identical elements.

use super::Matcher;
use chrono::{SecondsFormat, Utc};
use rand::Rng;

pub const HEXADECIMAL: &str = r"[0-9a-fA-F]+";
pub const IP_ADDRESS: &str = r"(\d{1,3}\.)+\d{1,3}";
pub const IPV6_ADDRESS: &str = r"^(([0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}|(([0-9a-fA-F]{1,4}:)*[0-9a-fA-F]{1,4})?::(([0-9a-fA-F]{1,4}:)*[0-9a-fA-F]{1,4})?|(([0-9a-fA-F]{1,4}:)*[0-9a-fA-F]{1,4})?::([0-9a-fA-F]{1,4}:)*(\d{1,3}\.){3}\d{1,3})$";
pub const UUID: &str = r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}";
pub const TIMESTAMP: &str =
    r"^\d{4}-[01]\d-[0-3]\d[T\s][0-2]\d:[0-5]\d:[0-5]\d(\.\d+)?([zZ]|[+-][0-2]\d:?[0-5]\d)?$";
pub const DATE: &str = r"^\d{4}-[01]\d-[0-3]\d$";
pub const TIME: &str = r"^T[0-2]\d:[0-5]\d(:[0-5]\d)?(\.\d+)?([zZ]|[+-][0-2]\d:[0-5]\d)?$";

/// Hexadecimal string, e.g. `3F`.
pub fn hex_value() -> Matcher {
    Matcher::term(HEXADECIMAL, "3F")
}

/// Any integer, matched by type. The example is a random non-negative `i64`.
pub fn identifier() -> Matcher {
    Matcher::like(rand::thread_rng().gen_range(0..=i64::MAX))
}

/// Same as [`identifier`].
pub fn integer() -> Matcher {
    identifier()
}

/// Any decimal, matched by type. The example is a random `f64` in `[0, 1)`.
pub fn decimal() -> Matcher {
    Matcher::like(rand::thread_rng().gen::<f64>())
}

/// Dotted IPv4 address.
pub fn ip_address() -> Matcher {
    Matcher::term(IP_ADDRESS, "127.0.0.1")
}

/// Same as [`ip_address`].
pub fn ipv4_address() -> Matcher {
    ip_address()
}

/// IPv6 address, including IPv4-mapped forms.
pub fn ipv6_address() -> Matcher {
    Matcher::term(IPV6_ADDRESS, "::ffff:192.0.2.128")
}

/// ISO 8601 date-time; the example is the current UTC time.
pub fn timestamp() -> Matcher {
    Matcher::term(
        TIMESTAMP,
        Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    )
}

/// ISO 8601 date (`YYYY-MM-DD`); the example is today's UTC date.
pub fn date() -> Matcher {
    Matcher::term(DATE, Utc::now().format("%Y-%m-%d").to_string())
}

/// ISO 8601 time prefixed with `T`; the example is the current UTC time.
pub fn time() -> Matcher {
    Matcher::term(TIME, Utc::now().format("T%H:%M:%S").to_string())
}

/// Lower-case hyphenated UUID; the example is a fresh v4 UUID.
pub fn uuid() -> Matcher {
    Matcher::term(UUID, ::uuid::Uuid::new_v4().to_string())
}
