// Dweve ScopeSAX - Scoped Event-Driven XML Parsing
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Built-in XML Schema simple types.
//!
//! Every primitive and derived type of XML Schema 1.0 is known by name.
//! Values are checked against the lexical space of their type; facets
//! other than the integer bounds implied by the derived integer types are
//! not applied.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Lexical check applied to a value of a built-in type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lexical {
    /// Any text
    Text,
    Language,
    Name,
    NcName,
    /// Whitespace separated list of NCNames
    NcNames,
    NmToken,
    /// Whitespace separated list of name tokens
    NmTokens,
    QName,
    Boolean,
    Decimal,
    /// Integer within optional inclusive bounds
    Integer {
        min: Option<i128>,
        max: Option<i128>,
    },
    /// `float` and `double`
    Float,
    Duration,
    DateTime,
    Date,
    Time,
    GYear,
    GYearMonth,
    GMonth,
    GDay,
    GMonthDay,
    HexBinary,
    Base64Binary,
    /// A URI reference; must not contain whitespace
    Uri,
}

const fn bounded(min: i128, max: i128) -> Lexical {
    Lexical::Integer {
        min: Some(min),
        max: Some(max),
    }
}

const BUILTINS: &[(&str, Lexical)] = &[
    ("string", Lexical::Text),
    ("normalizedString", Lexical::Text),
    ("token", Lexical::Text),
    ("anySimpleType", Lexical::Text),
    ("language", Lexical::Language),
    ("Name", Lexical::Name),
    ("NCName", Lexical::NcName),
    ("ID", Lexical::NcName),
    ("IDREF", Lexical::NcName),
    ("ENTITY", Lexical::NcName),
    ("IDREFS", Lexical::NcNames),
    ("ENTITIES", Lexical::NcNames),
    ("NMTOKEN", Lexical::NmToken),
    ("NMTOKENS", Lexical::NmTokens),
    ("QName", Lexical::QName),
    ("NOTATION", Lexical::QName),
    ("boolean", Lexical::Boolean),
    ("decimal", Lexical::Decimal),
    (
        "integer",
        Lexical::Integer {
            min: None,
            max: None,
        },
    ),
    (
        "nonPositiveInteger",
        Lexical::Integer {
            min: None,
            max: Some(0),
        },
    ),
    (
        "negativeInteger",
        Lexical::Integer {
            min: None,
            max: Some(-1),
        },
    ),
    (
        "nonNegativeInteger",
        Lexical::Integer {
            min: Some(0),
            max: None,
        },
    ),
    (
        "positiveInteger",
        Lexical::Integer {
            min: Some(1),
            max: None,
        },
    ),
    ("long", bounded(i64::MIN as i128, i64::MAX as i128)),
    ("int", bounded(i32::MIN as i128, i32::MAX as i128)),
    ("short", bounded(i16::MIN as i128, i16::MAX as i128)),
    ("byte", bounded(i8::MIN as i128, i8::MAX as i128)),
    ("unsignedLong", bounded(0, u64::MAX as i128)),
    ("unsignedInt", bounded(0, u32::MAX as i128)),
    ("unsignedShort", bounded(0, u16::MAX as i128)),
    ("unsignedByte", bounded(0, u8::MAX as i128)),
    ("float", Lexical::Float),
    ("double", Lexical::Float),
    ("duration", Lexical::Duration),
    ("dateTime", Lexical::DateTime),
    ("date", Lexical::Date),
    ("time", Lexical::Time),
    ("gYear", Lexical::GYear),
    ("gYearMonth", Lexical::GYearMonth),
    ("gMonth", Lexical::GMonth),
    ("gDay", Lexical::GDay),
    ("gMonthDay", Lexical::GMonthDay),
    ("hexBinary", Lexical::HexBinary),
    ("base64Binary", Lexical::Base64Binary),
    ("anyURI", Lexical::Uri),
];

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        static $name: Lazy<Regex> =
            Lazy::new(|| Regex::new($re).expect("built-in type pattern is valid"));
    };
}

// Fragments shared by the date and time patterns.
macro_rules! year {
    () => {
        r"(?P<year>-?(?:[1-9][0-9]{4,}|[0-9]{4}))"
    };
}
macro_rules! zone {
    () => {
        r"(?:Z|[+-](?:(?:0[0-9]|1[0-3]):[0-5][0-9]|14:00))?"
    };
}
macro_rules! clock {
    () => {
        r"(?P<hour>[0-9]{2}):(?P<minute>[0-9]{2}):(?P<second>[0-9]{2})(?:\.[0-9]+)?"
    };
}

pattern!(LANGUAGE, r"^[a-zA-Z]{1,8}(?:-[a-zA-Z0-9]{1,8})*$");
pattern!(INTEGER, r"^[+-]?[0-9]+$");
pattern!(DECIMAL, r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)$");
pattern!(
    FLOAT,
    r"^(?:[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?|-?INF|NaN)$"
);
pattern!(
    DURATION,
    r"^-?P(?:[0-9]+Y)?(?:[0-9]+M)?(?:[0-9]+D)?(?:T(?:[0-9]+H)?(?:[0-9]+M)?(?:[0-9]+(?:\.[0-9]+)?S)?)?$"
);
pattern!(
    DATE_TIME,
    concat!(
        "^",
        year!(),
        "-(?P<month>[0-9]{2})-(?P<day>[0-9]{2})T",
        clock!(),
        zone!(),
        "$"
    )
);
pattern!(
    DATE,
    concat!("^", year!(), "-(?P<month>[0-9]{2})-(?P<day>[0-9]{2})", zone!(), "$")
);
pattern!(TIME, concat!("^", clock!(), zone!(), "$"));
pattern!(G_YEAR, concat!("^", year!(), zone!(), "$"));
pattern!(
    G_YEAR_MONTH,
    concat!("^", year!(), "-(?P<month>[0-9]{2})", zone!(), "$")
);
pattern!(G_MONTH, concat!("^--(?P<month>[0-9]{2})", zone!(), "$"));
pattern!(G_DAY, concat!("^---(?P<day>[0-9]{2})", zone!(), "$"));
pattern!(
    G_MONTH_DAY,
    concat!("^--(?P<month>[0-9]{2})-(?P<day>[0-9]{2})", zone!(), "$")
);
pattern!(HEX_BINARY, r"^(?:[0-9a-fA-F]{2})*$");
pattern!(BASE64, r"^[A-Za-z0-9+/]*={0,2}$");

/// A built-in simple type of the `xs` namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Builtin {
    name: &'static str,
    lexical: Lexical,
}

impl Builtin {
    /// The type called `local_name` in the XML Schema namespace.
    pub fn from_local(local_name: &str) -> Option<Self> {
        BUILTINS
            .iter()
            .find(|(name, _)| *name == local_name)
            .map(|&(name, lexical)| Self { name, lexical })
    }

    /// `xs:string`, the fallback base of restrictions.
    pub fn string() -> Self {
        Self {
            name: "string",
            lexical: Lexical::Text,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether `value` is in the lexical space of this type.
    ///
    /// Leading and trailing whitespace is ignored for every type but the
    /// string family.
    pub fn accepts(&self, value: &str) -> bool {
        let value = value.trim();
        match self.lexical {
            Lexical::Text => true,
            Lexical::Language => LANGUAGE.is_match(value),
            Lexical::Name => is_name(value, true),
            Lexical::NcName => is_name(value, false),
            Lexical::NcNames => is_list(value, |item| is_name(item, false)),
            Lexical::NmToken => is_nmtoken(value),
            Lexical::NmTokens => is_list(value, is_nmtoken),
            Lexical::QName => match value.split_once(':') {
                Some((prefix, local)) => is_name(prefix, false) && is_name(local, false),
                None => is_name(value, false),
            },
            Lexical::Boolean => ["true", "false", "1", "0"].contains(&value),
            Lexical::Decimal => DECIMAL.is_match(value),
            Lexical::Integer { min, max } => is_integer_in(value, min, max),
            Lexical::Float => FLOAT.is_match(value),
            Lexical::Duration => {
                DURATION.is_match(value) && !value.ends_with('P') && !value.ends_with('T')
            }
            Lexical::DateTime => DATE_TIME
                .captures(value)
                .map_or(false, |c| valid_date(&c) && valid_clock(&c)),
            Lexical::Date => DATE.captures(value).map_or(false, |c| valid_date(&c)),
            Lexical::Time => TIME.captures(value).map_or(false, |c| valid_clock(&c)),
            Lexical::GYear => G_YEAR.is_match(value),
            Lexical::GYearMonth => G_YEAR_MONTH
                .captures(value)
                .map_or(false, |c| number(&c, "month").map_or(false, valid_month)),
            Lexical::GMonth => G_MONTH
                .captures(value)
                .map_or(false, |c| number(&c, "month").map_or(false, valid_month)),
            Lexical::GDay => G_DAY
                .captures(value)
                .map_or(false, |c| number(&c, "day").map_or(false, |d| (1..=31).contains(&d))),
            Lexical::GMonthDay => G_MONTH_DAY.captures(value).map_or(false, |c| {
                match (number(&c, "month"), number(&c, "day")) {
                    (Some(month), Some(day)) => {
                        valid_month(month) && day >= 1 && day <= days_in_month(None, month)
                    }
                    _ => false,
                }
            }),
            Lexical::HexBinary => HEX_BINARY.is_match(value),
            Lexical::Base64Binary => {
                let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
                compact.len() % 4 == 0 && BASE64.is_match(&compact)
            }
            Lexical::Uri => !value.chars().any(char::is_whitespace),
        }
    }
}

fn is_name_start_char(c: char) -> bool {
    matches!(c,
        'A'..='Z' | 'a'..='z' | '_' | ':'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}')
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}'
            | '\u{300}'..='\u{36F}'
            | '\u{203F}'..='\u{2040}')
}

/// XML `Name`, or `NCName` when colons are not allowed.
fn is_name(value: &str, allow_colon: bool) -> bool {
    let mut chars = value.chars();
    let valid_char = |c: char| allow_colon || c != ':';
    match chars.next() {
        Some(first) if is_name_start_char(first) && valid_char(first) => {
            chars.all(|c| is_name_char(c) && valid_char(c))
        }
        _ => false,
    }
}

fn is_nmtoken(value: &str) -> bool {
    !value.is_empty() && value.chars().all(is_name_char)
}

fn is_list(value: &str, item: impl Fn(&str) -> bool) -> bool {
    let mut items = value.split_whitespace().peekable();
    items.peek().is_some() && items.all(item)
}

fn is_integer_in(value: &str, min: Option<i128>, max: Option<i128>) -> bool {
    if !INTEGER.is_match(value) {
        return false;
    }
    match value.parse::<i128>() {
        Ok(n) => min.map_or(true, |min| n >= min) && max.map_or(true, |max| n <= max),
        // Out of i128 range: only an unbounded side can hold it.
        Err(_) if value.starts_with('-') => min.is_none(),
        Err(_) => max.is_none(),
    }
}

fn number(captures: &Captures<'_>, group: &str) -> Option<u32> {
    captures.name(group)?.as_str().parse().ok()
}

fn valid_month(month: u32) -> bool {
    (1..=12).contains(&month)
}

/// Days in `month`; February has 29 when the year is unknown.
fn days_in_month(year: Option<i64>, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 => match year {
            Some(y) if !(y % 4 == 0 && (y % 100 != 0 || y % 400 == 0)) => 28,
            _ => 29,
        },
        _ => 31,
    }
}

fn valid_date(captures: &Captures<'_>) -> bool {
    let year = captures
        .name("year")
        .and_then(|y| y.as_str().parse::<i64>().ok());
    // Year 0000 does not exist in XML Schema 1.0.
    if year == Some(0) {
        return false;
    }
    match (number(captures, "month"), number(captures, "day")) {
        (Some(month), Some(day)) => {
            valid_month(month) && day >= 1 && day <= days_in_month(year, month)
        }
        _ => false,
    }
}

fn valid_clock(captures: &Captures<'_>) -> bool {
    let hour = number(captures, "hour");
    let minute = number(captures, "minute");
    let second = captures.name("second").map(|s| s.as_str());
    match (hour, minute) {
        (Some(24), Some(0)) => second == Some("00"),
        (Some(hour), Some(minute)) => {
            hour < 24 && minute < 60 && number(captures, "second").map_or(false, |s| s < 60)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin(name: &str) -> Builtin {
        Builtin::from_local(name).unwrap()
    }

    #[test]
    fn test_lookup() {
        assert_eq!(Builtin::from_local("integer").map(|b| b.name()), Some("integer"));
        assert!(Builtin::from_local("anyType").is_none());
        assert!(Builtin::from_local("nonexistent").is_none());
    }

    #[test]
    fn test_every_builtin_is_known() {
        let names = [
            "string", "normalizedString", "token", "language", "Name", "NCName", "ID", "IDREF",
            "IDREFS", "ENTITY", "ENTITIES", "NMTOKEN", "NMTOKENS", "QName", "NOTATION",
            "anySimpleType", "boolean", "decimal", "integer", "nonPositiveInteger",
            "negativeInteger", "nonNegativeInteger", "positiveInteger", "long", "int", "short",
            "byte", "unsignedLong", "unsignedInt", "unsignedShort", "unsignedByte", "float",
            "double", "duration", "dateTime", "date", "time", "gYear", "gYearMonth", "gMonth",
            "gDay", "gMonthDay", "hexBinary", "base64Binary", "anyURI",
        ];
        for name in names {
            assert!(Builtin::from_local(name).is_some(), "{} should be built in", name);
        }
    }

    #[test]
    fn test_integer_family() {
        let integer = builtin("integer");
        assert!(integer.accepts("30"));
        assert!(integer.accepts(" -7 "));
        assert!(integer.accepts("+12"));
        assert!(integer.accepts("123456789012345678901234567890123456789012345"));
        assert!(!integer.accepts("thirty"));
        assert!(!integer.accepts("1.0"));
        assert!(!integer.accepts(""));

        let positive = builtin("positiveInteger");
        assert!(positive.accepts("1"));
        assert!(!positive.accepts("0"));

        let unsigned = builtin("unsignedInt");
        assert!(unsigned.accepts("0"));
        assert!(unsigned.accepts("4294967295"));
        assert!(!unsigned.accepts("4294967296"));
        assert!(!unsigned.accepts("-1"));

        let byte = builtin("byte");
        assert!(byte.accepts("-128"));
        assert!(!byte.accepts("128"));

        let long = builtin("long");
        assert!(long.accepts("9223372036854775807"));
        assert!(!long.accepts("9223372036854775808"));
        assert!(!builtin("negativeInteger")
            .accepts("123456789012345678901234567890123456789012345"));
    }

    #[test]
    fn test_decimal_is_strict() {
        let decimal = builtin("decimal");
        for val in ["19.99", "-0.5", "+3", ".5", "7."] {
            assert!(decimal.accepts(val), "{}", val);
        }
        for val in ["1e5", "inf", "INF", "NaN", "1.2.3", "not a number", ""] {
            assert!(!decimal.accepts(val), "{}", val);
        }
    }

    #[test]
    fn test_float_and_double() {
        let double = builtin("double");
        for val in ["1e5", "-1.5E-3", "INF", "-INF", "NaN", "42"] {
            assert!(double.accepts(val), "{}", val);
        }
        for val in ["inf", "+INF", "1e", "e5"] {
            assert!(!double.accepts(val), "{}", val);
        }
    }

    #[test]
    fn test_boolean() {
        let boolean = builtin("boolean");
        for val in &["true", "false", "1", "0"] {
            assert!(boolean.accepts(val));
        }
        assert!(!boolean.accepts("yes"));
    }

    #[test]
    fn test_names() {
        let qname = builtin("QName");
        assert!(qname.accepts("xs:string"));
        assert!(qname.accepts("local"));
        assert!(!qname.accepts("a:b:c"));
        assert!(!qname.accepts(":a"));
        assert!(!qname.accepts("1abc"));

        assert!(builtin("Name").accepts("a:b"));
        assert!(!builtin("NCName").accepts("a:b"));
        assert!(builtin("ID").accepts("_p1"));
        assert!(!builtin("ID").accepts("1p"));
        assert!(builtin("NMTOKEN").accepts("1p"));
        assert!(builtin("NMTOKENS").accepts(" a 1 b-2 "));
        assert!(!builtin("NMTOKENS").accepts("  "));
        assert!(builtin("IDREFS").accepts("a b"));
        assert!(builtin("language").accepts("en-GB"));
        assert!(!builtin("language").accepts("english language"));
    }

    #[test]
    fn test_dates_and_times() {
        let date = builtin("date");
        assert!(date.accepts("2024-02-29"));
        assert!(date.accepts("2024-01-31Z"));
        assert!(date.accepts("-0044-03-15+01:00"));
        assert!(!date.accepts("2023-02-29"));
        assert!(!date.accepts("2024-13-01"));
        assert!(!date.accepts("0000-01-01"));
        assert!(!date.accepts("24-01-01"));

        let date_time = builtin("dateTime");
        assert!(date_time.accepts("2024-05-01T12:30:00"));
        assert!(date_time.accepts("2024-05-01T12:30:00.125-05:00"));
        assert!(date_time.accepts("2024-05-01T24:00:00Z"));
        assert!(!date_time.accepts("2024-05-01 12:30:00"));
        assert!(!date_time.accepts("2024-05-01T12:60:00"));

        let time = builtin("time");
        assert!(time.accepts("23:59:59"));
        assert!(!time.accepts("25:00:00"));
        assert!(!time.accepts("12:00"));

        assert!(builtin("gYear").accepts("2024"));
        assert!(builtin("gYearMonth").accepts("2024-12"));
        assert!(!builtin("gYearMonth").accepts("2024-13"));
        assert!(builtin("gMonth").accepts("--05"));
        assert!(builtin("gDay").accepts("---31"));
        assert!(builtin("gMonthDay").accepts("--02-29"));
        assert!(!builtin("gMonthDay").accepts("--04-31"));
    }

    #[test]
    fn test_duration() {
        let duration = builtin("duration");
        for val in ["P1Y2M3DT4H5M6.5S", "-P10D", "PT1H", "P0Y"] {
            assert!(duration.accepts(val), "{}", val);
        }
        for val in ["P", "PT", "P1DT", "1Y", "P1H"] {
            assert!(!duration.accepts(val), "{}", val);
        }
    }

    #[test]
    fn test_binary() {
        let hex = builtin("hexBinary");
        assert!(hex.accepts("0FB7"));
        assert!(!hex.accepts("0FB"));
        assert!(!hex.accepts("zz"));

        let base64 = builtin("base64Binary");
        assert!(base64.accepts("SGVsbG8="));
        assert!(base64.accepts("SGVs bG8h"));
        assert!(!base64.accepts("SGVsbG8"));
        assert!(!base64.accepts("SGV=bG8h"));
    }

    #[test]
    fn test_any_uri() {
        let uri = builtin("anyURI");
        assert!(uri.accepts("http://www.upnp.org/schemas/av/didl-lite.xsd"));
        assert!(!uri.accepts("not a uri"));
    }
}
