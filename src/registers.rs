//! Register definitions and bitfield structures for the PCF8593 RTC.
//!
//! This module contains all register addresses, bitfield definitions, and
//! related types for interacting with the PCF8593 clock/calendar registers.

use bitfield::bitfield;

/// Register addresses for the PCF8593 RTC.
///
/// The chip repurposes two counters: the timer register at 0x07 stores the
/// two-digit year, and the high bits of the day register count the years
/// elapsed since the year register was last written.
#[allow(unused)]
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegAddr {
    /// Control/status register 1
    Status1 = 0x00,
    /// Hundredths of a second register (0-99)
    Hundredths = 0x01,
    /// Seconds register (0-59)
    Seconds = 0x02,
    /// Minutes register (0-59)
    Minutes = 0x03,
    /// Hours register (0-23)
    Hours = 0x04,
    /// Day register (1-31), high bits hold the year rollover counter
    Days = 0x05,
    /// Month register (1-12), high bits hold the weekday
    MonthsWeekday = 0x06,
    /// Timer register, repurposed to store the year (0-99)
    Years = 0x07,
    /// Alarm control/status register 2
    Status2 = 0x08,
    /// Alarm hundredths of a second register
    AlarmHundredths = 0x09,
    /// Alarm seconds register
    AlarmSeconds = 0x0A,
    /// Alarm minutes register
    AlarmMinutes = 0x0B,
    /// Alarm hours register
    AlarmHours = 0x0C,
    /// Alarm day register
    AlarmDays = 0x0D,
    /// Alarm month register, or weekday bitmask for weekday alarms
    AlarmMonthsWeekday = 0x0E,
}

/// Reset value for [`Status1`]: counters running, alarm register enabled.
pub const STATUS1_RESET: u8 = 0x04;

/// Alarm recurrence mode, held in bits 5-4 of [`Status2`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmMode {
    /// Alarm disabled
    Disabled = 0b00,
    /// Trigger daily when the alarm time matches
    Daily = 0b01,
    /// Trigger on the weekdays selected in the alarm weekday bitmask
    Weekday = 0b10,
    /// Trigger when the alarm date and time match
    Dated = 0b11,
}
impl From<u8> for AlarmMode {
    /// Creates an `AlarmMode` from a raw register value.
    ///
    /// # Panics
    /// Panics if the value is not 0-3.
    fn from(v: u8) -> Self {
        match v {
            0b00 => AlarmMode::Disabled,
            0b01 => AlarmMode::Daily,
            0b10 => AlarmMode::Weekday,
            0b11 => AlarmMode::Dated,
            _ => panic!("Invalid value for AlarmMode: {}", v),
        }
    }
}
impl From<AlarmMode> for u8 {
    /// Converts an `AlarmMode` to its raw register value.
    fn from(v: AlarmMode) -> Self {
        v as u8
    }
}

// This macro generates the From<u8> and Into<u8> implementations for the
// register type
macro_rules! from_register_u8 {
    ($typ:ty) => {
        impl From<u8> for $typ {
            fn from(v: u8) -> Self {
                paste::paste!([< $typ >](v))
            }
        }
        impl From<$typ> for u8 {
            fn from(v: $typ) -> Self {
                v.0
            }
        }
    };
}

bitfield! {
    /// Control/status register 1.
    ///
    /// Only the bits the driver touches are named; the remaining bits keep
    /// whatever the chip reports.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Status1(u8);
    impl Debug;
    /// Alarm register enable (part of the 0x04 reset value)
    pub alarm_enable, set_alarm_enable: 2;
    /// Alarm flag (AF), set by the chip when the alarm conditions are met
    pub alarm_flag, set_alarm_flag: 1;
}
from_register_u8!(Status1);

#[cfg(feature = "defmt")]
impl defmt::Format for Status1 {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Status1(");
        let mut first = true;
        if self.alarm_enable() {
            defmt::write!(f, "ALARM_EN");
            first = false;
        }
        if self.alarm_flag() {
            if !first {
                defmt::write!(f, ", ");
            }
            defmt::write!(f, "AF");
            first = false;
        }
        if first {
            defmt::write!(f, "clear");
        }
        defmt::write!(f, ")");
    }
}

bitfield! {
    /// Alarm control/status register 2.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Status2(u8);
    impl Debug;
    /// Alarm interrupt enable (AIE), gates whether AF drives the interrupt pin
    pub alarm_interrupt_enable, set_alarm_interrupt_enable: 7;
    /// Alarm recurrence mode
    pub from into AlarmMode, alarm_mode, set_alarm_mode: 5, 4;
}
from_register_u8!(Status2);

#[cfg(feature = "defmt")]
impl defmt::Format for Status2 {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Status2({}", self.alarm_mode());
        if self.alarm_interrupt_enable() {
            defmt::write!(f, ", AIE");
        }
        defmt::write!(f, ")");
    }
}

bitfield! {
    /// Hundredths of a second register with BCD encoding.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Hundredths(u8);
    impl Debug;
    /// Tens place of hundredths (0-9)
    pub ten_hundredths, set_ten_hundredths: 7, 4;
    /// Ones place of hundredths (0-9)
    pub hundredths, set_hundredths: 3, 0;
}
from_register_u8!(Hundredths);

#[cfg(feature = "defmt")]
impl defmt::Format for Hundredths {
    fn format(&self, f: defmt::Formatter) {
        let hundredths = 10 * self.ten_hundredths() + self.hundredths();
        defmt::write!(f, "Hundredths({})", hundredths);
    }
}

bitfield! {
    /// Seconds register with BCD encoding.
    ///
    /// The chip enforces no range, so both nibbles span the full digit set
    /// and decoded values can reach 99.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Seconds(u8);
    impl Debug;
    /// Tens place of seconds
    pub ten_seconds, set_ten_seconds: 7, 4;
    /// Ones place of seconds
    pub seconds, set_seconds: 3, 0;
}
from_register_u8!(Seconds);

#[cfg(feature = "defmt")]
impl defmt::Format for Seconds {
    fn format(&self, f: defmt::Formatter) {
        let seconds = 10 * self.ten_seconds() + self.seconds();
        defmt::write!(f, "Seconds({}s)", seconds);
    }
}

bitfield! {
    /// Minutes register with BCD encoding.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Minutes(u8);
    impl Debug;
    /// Tens place of minutes
    pub ten_minutes, set_ten_minutes: 7, 4;
    /// Ones place of minutes
    pub minutes, set_minutes: 3, 0;
}
from_register_u8!(Minutes);

#[cfg(feature = "defmt")]
impl defmt::Format for Minutes {
    fn format(&self, f: defmt::Formatter) {
        let minutes = 10 * self.ten_minutes() + self.minutes();
        defmt::write!(f, "Minutes({}m)", minutes);
    }
}

bitfield! {
    /// Hours register with BCD encoding (24-hour counting only).
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Hours(u8);
    impl Debug;
    /// Tens place of hours
    pub ten_hours, set_ten_hours: 7, 4;
    /// Ones place of hours
    pub hours, set_hours: 3, 0;
}
from_register_u8!(Hours);

#[cfg(feature = "defmt")]
impl defmt::Format for Hours {
    fn format(&self, f: defmt::Formatter) {
        let hours = 10 * self.ten_hours() + self.hours();
        defmt::write!(f, "Hours({}h)", hours);
    }
}

bitfield! {
    /// Day register (1-31) with BCD encoding and the year rollover counter.
    ///
    /// Bits 7-6 count the years elapsed since the year register was last
    /// written; the running timer carries into them when the date wraps past
    /// December 31st. Masks 0xC0/0x3F separate the two fields.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Days(u8);
    impl Debug;
    /// Years elapsed since the year register was last written (0-3)
    pub years_passed, set_years_passed: 7, 6;
    /// Tens place of the day (0-3)
    pub ten_days, set_ten_days: 5, 4;
    /// Ones place of the day (0-9)
    pub days, set_days: 3, 0;
}
from_register_u8!(Days);

#[cfg(feature = "defmt")]
impl defmt::Format for Days {
    fn format(&self, f: defmt::Formatter) {
        let days = 10 * self.ten_days() + self.days();
        defmt::write!(f, "Days({}", days);
        if self.years_passed() > 0 {
            defmt::write!(f, ", +{}y", self.years_passed());
        }
        defmt::write!(f, ")");
    }
}

bitfield! {
    /// Month register (1-12) with BCD encoding and the weekday in bits 7-5.
    ///
    /// Masks 0xE0/0x1F separate the weekday from the month.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct MonthsWeekday(u8);
    impl Debug;
    /// Day of week (0-6, 0 = Sunday)
    pub weekday, set_weekday: 7, 5;
    /// Tens place of the month (0-1)
    pub ten_months, set_ten_months: 4, 4;
    /// Ones place of the month (0-9)
    pub months, set_months: 3, 0;
}
from_register_u8!(MonthsWeekday);

#[cfg(feature = "defmt")]
impl defmt::Format for MonthsWeekday {
    fn format(&self, f: defmt::Formatter) {
        let months = 10 * self.ten_months() + self.months();
        defmt::write!(f, "MonthsWeekday(month {}, weekday {})", months, self.weekday());
    }
}

bitfield! {
    /// Year register (0-99) with BCD encoding.
    ///
    /// This is the chip's timer register pressed into service as a year
    /// counter; it does not advance on its own.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Years(u8);
    impl Debug;
    /// Tens place of the year
    pub ten_years, set_ten_years: 7, 4;
    /// Ones place of the year
    pub years, set_years: 3, 0;
}
from_register_u8!(Years);

#[cfg(feature = "defmt")]
impl defmt::Format for Years {
    fn format(&self, f: defmt::Formatter) {
        let years = 10 * self.ten_years() + self.years();
        defmt::write!(f, "Years({})", years);
    }
}

bitfield! {
    /// Weekday selection bitmask for weekday alarms, one enable bit per day.
    ///
    /// Written to the alarm month register when the alarm mode is
    /// [`AlarmMode::Weekday`]; the alarm fires on every selected day.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct AlarmWeekdays(u8);
    impl Debug;
    /// Trigger on Saturdays
    pub saturday, set_saturday: 6;
    /// Trigger on Fridays
    pub friday, set_friday: 5;
    /// Trigger on Thursdays
    pub thursday, set_thursday: 4;
    /// Trigger on Wednesdays
    pub wednesday, set_wednesday: 3;
    /// Trigger on Tuesdays
    pub tuesday, set_tuesday: 2;
    /// Trigger on Mondays
    pub monday, set_monday: 1;
    /// Trigger on Sundays
    pub sunday, set_sunday: 0;
}
from_register_u8!(AlarmWeekdays);

#[cfg(feature = "defmt")]
impl defmt::Format for AlarmWeekdays {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "AlarmWeekdays(");
        let names = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
        let mut first = true;
        for (bit, name) in names.iter().enumerate() {
            if self.0 & (1u8 << bit) != 0 {
                if !first {
                    defmt::write!(f, ", ");
                }
                defmt::write!(f, "{}", name);
                first = false;
            }
        }
        if first {
            defmt::write!(f, "none");
        }
        defmt::write!(f, ")");
    }
}
