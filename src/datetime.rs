//! Time and date value types for the PCF8593 RTC.
//!
//! This module provides the BCD conversion logic and the value types returned
//! by the driver's read operations. Every read produces a plain value; nothing
//! is cached between calls.
//!
//! # Features
//!
//! - Decimal/BCD conversion matching the chip's wire format
//! - `Time` and `Date` values with display adapters for the common
//!   regional formats
//! - Conversion to/from chrono's `NaiveTime`/`NaiveDate`
//!
//! # Register Model
//!
//! The PCF8593 stores time in plain BCD bytes, while the date is bit-packed:
//! the weekday lives in the top three bits of the month register and a 2-bit
//! year rollover counter lives in the top bits of the day register.
//!
//! # Error Handling
//!
//! Conversion errors are reported via [`PCF8593DateTimeError`]. Raw register
//! decoding performs no validation: the chip accepts whatever nibbles it is
//! given, and this module mirrors that.

use core::fmt;

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};

use crate::{Days, MonthsWeekday, Years};

/// Packs a decimal value into BCD, tens digit in the high nibble.
///
/// Only 0-99 encode meaningfully; larger inputs produce garbage without
/// complaint, matching the peripheral's behavior.
#[must_use]
pub const fn decimal_to_bcd(value: u8) -> u8 {
    (value / 10) * 16 + (value % 10)
}

/// Unpacks a BCD byte into its decimal value.
///
/// The exact inverse of [`decimal_to_bcd`] for 0-99. Bytes with nibbles
/// above 9 decode to garbage without complaint.
#[must_use]
pub const fn bcd_to_decimal(value: u8) -> u8 {
    (value / 16) * 10 + (value % 16)
}

/// Time rendering styles.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeStyle {
    /// `HH:MM:SS`
    HoursMinutesSeconds,
    /// `HH:MM`
    HoursMinutes,
}

/// Date rendering styles.
///
/// The year is always rendered with a fixed `20` century prefix; the chip
/// only carries the two low digits.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DateStyle {
    /// `DD-MM-YYYY`
    World,
    /// `YYYY-MM-DD`
    Asia,
    /// `MM/DD/YYYY`
    Us,
}

/// A time of day as stored by the chip.
///
/// Each field holds whatever the corresponding BCD register decoded to, so
/// values can span 0-99; the peripheral enforces no range.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Time {
    /// Hours (0-23 on a well-behaved clock)
    pub hours: u8,
    /// Minutes (0-59 on a well-behaved clock)
    pub minutes: u8,
    /// Seconds (0-59 on a well-behaved clock)
    pub seconds: u8,
}

impl Time {
    /// Creates a `Time` from a chrono `NaiveTime`.
    ///
    /// # Errors
    ///
    /// Returns an error if a component does not fit the chip's registers.
    pub fn from_naive_time(time: &NaiveTime) -> Result<Self, PCF8593DateTimeError> {
        Ok(Time {
            hours: u8::try_from(time.hour()).map_err(|_| PCF8593DateTimeError::InvalidDateTime)?,
            minutes: u8::try_from(time.minute())
                .map_err(|_| PCF8593DateTimeError::InvalidDateTime)?,
            seconds: u8::try_from(time.second())
                .map_err(|_| PCF8593DateTimeError::InvalidDateTime)?,
        })
    }

    /// Converts this time into a chrono `NaiveTime`.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored values do not form a valid time of
    /// day, which happens when the chip was fed malformed BCD.
    pub fn into_naive_time(self) -> Result<NaiveTime, PCF8593DateTimeError> {
        NaiveTime::from_hms_opt(
            u32::from(self.hours),
            u32::from(self.minutes),
            u32::from(self.seconds),
        )
        .ok_or(PCF8593DateTimeError::InvalidDateTime)
    }

    /// Returns an adapter rendering this time with `core::fmt` in the given
    /// style.
    #[must_use]
    pub fn display(self, style: TimeStyle) -> TimeDisplay {
        TimeDisplay { time: self, style }
    }
}

impl From<[u8; 3]> for Time {
    /// Decodes the seconds, minutes and hours registers, in register order.
    fn from(data: [u8; 3]) -> Self {
        Time {
            seconds: bcd_to_decimal(data[0]),
            minutes: bcd_to_decimal(data[1]),
            hours: bcd_to_decimal(data[2]),
        }
    }
}

impl From<&Time> for [u8; 3] {
    /// Encodes to the seconds, minutes and hours registers, in register order.
    fn from(time: &Time) -> [u8; 3] {
        [
            decimal_to_bcd(time.seconds),
            decimal_to_bcd(time.minutes),
            decimal_to_bcd(time.hours),
        ]
    }
}

/// Renders a [`Time`] with `core::fmt`.
#[derive(Copy, Clone, Debug)]
pub struct TimeDisplay {
    time: Time,
    style: TimeStyle,
}

impl fmt::Display for TimeDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.style {
            TimeStyle::HoursMinutes => {
                write!(f, "{:02}:{:02}", self.time.hours, self.time.minutes)
            }
            TimeStyle::HoursMinutesSeconds => write!(
                f,
                "{:02}:{:02}:{:02}",
                self.time.hours, self.time.minutes, self.time.seconds
            ),
        }
    }
}

/// A calendar date as stored by the chip.
///
/// The year is the two low digits only; the century is fixed at 20 for
/// display and chrono conversion purposes.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Date {
    /// Day of month (1-31)
    pub day: u8,
    /// Day of week (0-6, 0 = Sunday)
    pub weekday: u8,
    /// Month (1-12)
    pub month: u8,
    /// Year modulo 100
    pub year: u8,
}

impl Date {
    /// Creates a `Date` from a chrono `NaiveDate`.
    ///
    /// The weekday is derived from the date, with Sunday as day 0.
    ///
    /// # Errors
    ///
    /// Returns an error for years outside 2000-2099; the chip carries only
    /// two year digits.
    pub fn from_naive_date(date: &NaiveDate) -> Result<Self, PCF8593DateTimeError> {
        let year = date.year();
        if year > 2099 {
            error!("Year {} is too late! must be before 2100", year);
            return Err(PCF8593DateTimeError::YearNotBefore2100);
        }
        if year < 2000 {
            error!("Year {} is too early! must be greater than 1999", year);
            return Err(PCF8593DateTimeError::YearNotAfter1999);
        }
        Ok(Date {
            day: u8::try_from(date.day()).map_err(|_| PCF8593DateTimeError::InvalidDateTime)?,
            weekday: u8::try_from(date.weekday().num_days_from_sunday())
                .map_err(|_| PCF8593DateTimeError::InvalidDateTime)?,
            month: u8::try_from(date.month()).map_err(|_| PCF8593DateTimeError::InvalidDateTime)?,
            year: u8::try_from(year - 2000).map_err(|_| PCF8593DateTimeError::InvalidDateTime)?,
        })
    }

    /// Converts this date into a chrono `NaiveDate` in the 2000-2099 window.
    ///
    /// The stored weekday is ignored; chrono derives it from the date.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored values do not form a valid calendar
    /// date, which happens when the chip was fed malformed BCD.
    pub fn into_naive_date(self) -> Result<NaiveDate, PCF8593DateTimeError> {
        NaiveDate::from_ymd_opt(
            2000 + i32::from(self.year),
            u32::from(self.month),
            u32::from(self.day),
        )
        .ok_or(PCF8593DateTimeError::InvalidDateTime)
    }

    /// Returns an adapter rendering this date with `core::fmt` in the given
    /// style.
    #[must_use]
    pub fn display(self, style: DateStyle) -> DateDisplay {
        DateDisplay { date: self, style }
    }

    /// Decodes the day, month/weekday and year registers.
    ///
    /// The rollover counter in the day register is not part of the date; the
    /// driver reconciles it before calling this.
    pub(crate) fn from_registers(days: Days, months: MonthsWeekday, years: Years) -> Self {
        Date {
            day: 10 * days.ten_days() + days.days(),
            weekday: months.weekday(),
            month: 10 * months.ten_months() + months.months(),
            year: 10 * years.ten_years() + years.years(),
        }
    }

    /// Encodes to the day, month/weekday and year registers.
    ///
    /// The rollover counter is left at zero so the chip restarts counting
    /// from the written year.
    pub(crate) fn to_registers(&self) -> (Days, MonthsWeekday, Years) {
        let mut days = Days::default();
        days.set_ten_days(self.day / 10);
        days.set_days(self.day % 10);

        let mut months = MonthsWeekday::default();
        months.set_weekday(self.weekday);
        months.set_ten_months(self.month / 10);
        months.set_months(self.month % 10);

        (days, months, Years(decimal_to_bcd(self.year)))
    }
}

/// Renders a [`Date`] with `core::fmt`.
#[derive(Copy, Clone, Debug)]
pub struct DateDisplay {
    date: Date,
    style: DateStyle,
}

impl fmt::Display for DateDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.style {
            DateStyle::World => write!(
                f,
                "{:02}-{:02}-20{:02}",
                self.date.day, self.date.month, self.date.year
            ),
            DateStyle::Asia => write!(
                f,
                "20{:02}-{:02}-{:02}",
                self.date.year, self.date.month, self.date.day
            ),
            DateStyle::Us => write!(
                f,
                "{:02}/{:02}/20{:02}",
                self.date.month, self.date.day, self.date.year
            ),
        }
    }
}

#[derive(Debug)]
/// Errors that can occur during PCF8593 date/time conversion or validation.
pub enum PCF8593DateTimeError {
    /// The provided or decoded date/time is invalid (e.g., out of range, not representable)
    InvalidDateTime,
    /// The year is not before 2100 (the chip carries only two year digits)
    YearNotBefore2100,
    /// The year is not after 1999 (the century prefix is fixed at 20)
    YearNotAfter1999,
}
