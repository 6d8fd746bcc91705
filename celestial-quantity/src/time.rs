use crate::constants::{MJD_ZERO_POINT, SECONDS_PER_DAY_F64, SECONDS_TO_DAYS};
use crate::{QuantityError, QuantityResult};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimeScale {
    #[default]
    Utc,
    Tai,
    Tt,
    Tdb,
    Tcg,
    Tcb,
    Ut1,
}

impl TimeScale {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeScale::Utc => "utc",
            TimeScale::Tai => "tai",
            TimeScale::Tt => "tt",
            TimeScale::Tdb => "tdb",
            TimeScale::Tcg => "tcg",
            TimeScale::Tcb => "tcb",
            TimeScale::Ut1 => "ut1",
        }
    }
}

impl fmt::Display for TimeScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeScale {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utc" => Ok(TimeScale::Utc),
            "tai" => Ok(TimeScale::Tai),
            "tt" => Ok(TimeScale::Tt),
            "tdb" => Ok(TimeScale::Tdb),
            "tcg" => Ok(TimeScale::Tcg),
            "tcb" => Ok(TimeScale::Tcb),
            "ut1" => Ok(TimeScale::Ut1),
            _ => Err(QuantityError::parse(format!("Unknown time scale '{}'", s))),
        }
    }
}

/// Two-part Julian date, `jd1 + jd2`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JulianDate {
    pub jd1: f64,
    pub jd2: f64,
}

impl JulianDate {
    pub fn new(jd1: f64, jd2: f64) -> Self {
        Self { jd1, jd2 }
    }

    pub fn to_f64(&self) -> f64 {
        self.jd1 + self.jd2
    }

    pub fn add_seconds(&self, seconds: f64) -> Self {
        Self::new(self.jd1, self.jd2 + seconds * SECONDS_TO_DAYS)
    }

    /// ERFA `eraCal2jd` + `eraDtf2d`: `jd1` is midnight, `jd2` the day fraction.
    pub fn from_calendar(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: f64) -> Self {
        let my = (month as i32 - 14) / 12;
        let iypmy = year + my;

        let mjd = ((1461 * (iypmy + 4800)) / 4 + (367 * (month as i32 - 2 - 12 * my)) / 12
            - (3 * ((iypmy + 4900) / 100)) / 4
            + day as i32
            - 2432076) as f64;

        let jd1 = MJD_ZERO_POINT + mjd;
        let jd2 = (60.0 * (60 * hour as i32 + minute as i32) as f64 + second) / SECONDS_PER_DAY_F64;

        Self::new(jd1, jd2)
    }

    /// ERFA `eraJd2cal`: Gregorian (year, month, day, day fraction).
    pub fn to_calendar(&self) -> (i64, u8, u8, f64) {
        let (d1, d2) = if self.jd1.abs() >= self.jd2.abs() {
            (self.jd1, self.jd2)
        } else {
            (self.jd2, self.jd1)
        };
        let d2 = d2 - 0.5;

        let f1 = libm::fmod(d1, 1.0);
        let f2 = libm::fmod(d2, 1.0);
        let mut f = libm::fmod(f1 + f2, 1.0);
        if f < 0.0 {
            f += 1.0;
        }
        let d = (d1 - f1).round() + (d2 - f2).round() + (f1 + f2 - f).round();
        let jd = d.round() as i64 + 1;

        let mut l = jd + 68569;
        let n = (4 * l) / 146097;
        l -= (146097 * n + 3) / 4;
        let i = (4000 * (l + 1)) / 1461001;
        l -= (1461 * i) / 4 - 31;
        let k = (80 * l) / 2447;
        let day = l - (2447 * k) / 80;
        l = k / 11;
        let month = k + 2 - 12 * l;
        let year = 100 * (n - 49) + i + l;

        (year, month as u8, day as u8, f)
    }
}

/// An instant in a time scale.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Time {
    jd: JulianDate,
    scale: TimeScale,
}

impl Time {
    pub fn new(jd: JulianDate, scale: TimeScale) -> Self {
        Self { jd, scale }
    }

    pub fn from_jd(jd: f64, scale: TimeScale) -> Self {
        Self::new(JulianDate::new(jd, 0.0), scale)
    }

    pub fn from_mjd(mjd: f64, scale: TimeScale) -> Self {
        Self::new(JulianDate::new(MJD_ZERO_POINT, mjd), scale)
    }

    /// Parses `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS[.fff]` (or a space instead of
    /// `T`, optional trailing `Z`).
    pub fn from_iso(s: &str, scale: TimeScale) -> QuantityResult<Self> {
        let parsed = parse_iso8601(s)?;
        Ok(Self::new(
            JulianDate::from_calendar(
                parsed.year,
                parsed.month,
                parsed.day,
                parsed.hour,
                parsed.minute,
                parsed.second,
            ),
            scale,
        ))
    }

    #[inline]
    pub fn jd(&self) -> JulianDate {
        self.jd
    }

    #[inline]
    pub fn scale(&self) -> TimeScale {
        self.scale
    }

    pub fn to_jd(&self) -> f64 {
        self.jd.to_f64()
    }

    pub fn is_nan(&self) -> bool {
        self.to_jd().is_nan()
    }

    pub fn add_seconds(&self, seconds: f64) -> Self {
        Self::new(self.jd.add_seconds(seconds), self.scale)
    }

    /// Elapsed seconds from `earlier` to `self`; both must share a scale.
    pub fn seconds_since(&self, earlier: &Time) -> QuantityResult<f64> {
        if self.scale != earlier.scale {
            return Err(QuantityError::time_scale_mismatch(
                self.scale.as_str(),
                earlier.scale.as_str(),
            ));
        }
        let days = (self.jd.jd1 - earlier.jd.jd1) + (self.jd.jd2 - earlier.jd.jd2);
        Ok(days * SECONDS_PER_DAY_F64)
    }

    /// ISO-8601 with millisecond precision.
    pub fn to_iso(&self) -> String {
        if !self.to_jd().is_finite() {
            return "NaN".to_string();
        }

        let (mut year, mut month, mut day, frac) = self.jd.to_calendar();
        let mut ms = (frac * SECONDS_PER_DAY_F64 * 1000.0).round() as i64;
        if ms >= 86_400_000 {
            let next = JulianDate::new(self.jd.jd1, self.jd.jd2 + 0.5 * SECONDS_TO_DAYS);
            (year, month, day, _) = next.to_calendar();
            ms -= 86_400_000;
        }

        let hour = ms / 3_600_000;
        let minute = (ms / 60_000) % 60;
        let second = (ms / 1000) % 60;
        let milli = ms % 1000;
        format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}",
            year, month, day, hour, minute, second, milli
        )
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.to_iso(), self.scale)
    }
}

struct ParsedDateTime {
    year: i32,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: f64,
}

fn parse_iso8601(s: &str) -> QuantityResult<ParsedDateTime> {
    let s = s.trim();

    const MAX_ISO8601_LENGTH: usize = 32;
    if s.len() > MAX_ISO8601_LENGTH {
        return Err(QuantityError::parse("Input too long"));
    }

    let s = s.strip_suffix('Z').unwrap_or(s);
    let (date_part, time_part) = match s.find('T').or_else(|| s.find(' ')) {
        Some(pos) => (&s[..pos], Some(&s[pos + 1..])),
        None => (s, None),
    };

    let date: Vec<&str> = date_part.split('-').collect();
    if date.len() != 3 || date[0].len() != 4 {
        return Err(QuantityError::parse(format!(
            "Invalid date format: '{}'. Expected YYYY-MM-DD",
            date_part
        )));
    }

    let year: i32 = parse_field(date[0], "year")?;
    let month: u8 = parse_field(date[1], "month")?;
    let day: u8 = parse_field(date[2], "day")?;
    if !(1..=12).contains(&month) {
        return Err(QuantityError::parse(format!("Invalid month: {}", month)));
    }
    if !(1..=31).contains(&day) {
        return Err(QuantityError::parse(format!("Invalid day: {}", day)));
    }

    let (hour, minute, second) = match time_part {
        None => (0, 0, 0.0),
        Some(t) => {
            let parts: Vec<&str> = t.split(':').collect();
            if parts.len() != 3 {
                return Err(QuantityError::parse(format!(
                    "Invalid time format: '{}'. Expected HH:MM:SS",
                    t
                )));
            }
            let hour: u8 = parse_field(parts[0], "hour")?;
            let minute: u8 = parse_field(parts[1], "minute")?;
            let second: f64 = parse_field(parts[2], "second")?;
            if hour > 23 || minute > 59 || !(0.0..61.0).contains(&second) {
                return Err(QuantityError::parse(format!("Time out of range: '{}'", t)));
            }
            (hour, minute, second)
        }
    };

    Ok(ParsedDateTime {
        year,
        month,
        day,
        hour,
        minute,
        second,
    })
}

fn parse_field<T: FromStr>(field: &str, what: &str) -> QuantityResult<T> {
    field
        .parse()
        .map_err(|_| QuantityError::parse(format!("Invalid {}: '{}'", what, field)))
}
