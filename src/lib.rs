#![no_std]
//! Platform-agnostic driver for the PCF8593 clock/calendar chip.
//!
//! The PCF8593 is an I2C real-time clock that counts hundredths of a second
//! through years and provides a programmable alarm with daily, weekday and
//! dated recurrence. This crate talks to it through the `embedded-hal` I2C
//! traits (blocking by default, async behind the `async` feature) and
//! converts between the chip's BCD register encoding and plain values.
//!
//! The chip has no year counter of its own: the timer register stores the
//! two-digit year and the high bits of the day register count years elapsed
//! since it was written. Reading the date reconciles that counter, which
//! makes the date read a (documented) writing operation.
//!
//! # Example
//!
//! ```rust,ignore
//! use pcf8593::{PCF8593, PCF8593_ADDRESS};
//! use pcf8593::datetime::{DateStyle, Time};
//!
//! let mut rtc = PCF8593::new(i2c, PCF8593_ADDRESS);
//!
//! rtc.set_time(&Time { hours: 13, minutes: 30, seconds: 0 })?;
//!
//! let date = rtc.date()?;
//! defmt::info!("today is {}", date.display(DateStyle::Asia));
//! ```

// Logging shims: route to `log` or `defmt` when enabled, vanish otherwise.
// Defined before the modules so they can use them unqualified.
#[allow(unused_macros)]
macro_rules! debug {
    ($($arg:tt)*) => {
        cfg_if::cfg_if! {
            if #[cfg(feature = "defmt")] {
                defmt::debug!($($arg)*);
            } else if #[cfg(feature = "log")] {
                log::debug!($($arg)*);
            } else {
                let _ = ($($arg)*);
            }
        }
    };
}

#[allow(unused_macros)]
macro_rules! error {
    ($($arg:tt)*) => {
        cfg_if::cfg_if! {
            if #[cfg(feature = "defmt")] {
                defmt::error!($($arg)*);
            } else if #[cfg(feature = "log")] {
                log::error!($($arg)*);
            } else {
                let _ = ($($arg)*);
            }
        }
    };
}

pub mod alarm;
#[cfg(feature = "async")]
pub mod asynch;
pub mod datetime;
mod registers;

pub use registers::*;

use chrono::NaiveDateTime;
use embedded_hal::i2c::I2c;
use paste::paste;

use crate::alarm::{encode_alarm_field, Alarm};
use crate::datetime::{decimal_to_bcd, Date, PCF8593DateTimeError, Time};

/// 7-bit bus address of the PCF8593 (0xA2 write / 0xA3 read on the wire).
pub const PCF8593_ADDRESS: u8 = 0xA3 >> 1;

/// Error type for PCF8593 operations.
#[derive(Debug)]
pub enum PCF8593Error<I2CE> {
    /// I2C bus error from the underlying transport
    I2c(I2CE),
    /// Date/time conversion or validation error
    DateTime(PCF8593DateTimeError),
}

impl<I2CE> From<I2CE> for PCF8593Error<I2CE> {
    fn from(e: I2CE) -> Self {
        PCF8593Error::I2c(e)
    }
}

/// PCF8593 clock/calendar blocking driver.
///
/// Every operation is a single bus transaction or a short fixed sequence of
/// them; nothing is cached and nothing is retried. Out-of-range values are
/// passed through (time, date) or clamped (alarm setters) the way the chip
/// itself would tolerate them.
pub struct PCF8593<I2C: I2c> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> PCF8593<I2C> {
    /// Creates a new PCF8593 driver instance.
    ///
    /// # Arguments
    /// * `i2c` - The I2C bus implementation
    /// * `address` - The 7-bit address of the device, normally
    ///   [`PCF8593_ADDRESS`]
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Resets the whole register file: counters to their lowest values,
    /// status registers to their reset state, all alarm registers to zero.
    ///
    /// # Errors
    /// Returns `PCF8593Error::I2c` if the bus transaction fails.
    pub fn init_clock(&mut self) -> Result<(), PCF8593Error<I2C::Error>> {
        self.i2c.write(
            self.address,
            &[
                RegAddr::Status1 as u8,
                STATUS1_RESET,
                0x01, // hundredths
                0x01, // seconds
                0x01, // minutes
                0x01, // hours
                0x01, // day, rollover counter zeroed
                0x01, // weekday and month
                0x01, // timer register holding the year
                0x00, // status2, all alarms off
                0x00, // alarm hundredths
                0x00, // alarm seconds
                0x00, // alarm minutes
                0x00, // alarm hours
                0x00, // alarm day
                0x00, // alarm month
                0x00, // alarm timer off
            ],
        )?;
        Ok(())
    }

    /// Writes both status registers back to their reset values.
    ///
    /// # Errors
    /// Returns `PCF8593Error::I2c` if a bus transaction fails.
    pub fn clear_status(&mut self) -> Result<(), PCF8593Error<I2C::Error>> {
        self.i2c
            .write(self.address, &[RegAddr::Status1 as u8, STATUS1_RESET])?;
        self.i2c
            .write(self.address, &[RegAddr::Status2 as u8, 0x00])?;
        Ok(())
    }

    /// Gets the current time of day.
    ///
    /// One burst read starting at the first status register; the status and
    /// hundredths bytes come along for the ride and are discarded.
    ///
    /// # Errors
    /// Returns `PCF8593Error::I2c` if the bus transaction fails.
    pub fn time(&mut self) -> Result<Time, PCF8593Error<I2C::Error>> {
        let mut data = [0; 5];
        self.i2c
            .write_read(self.address, &[RegAddr::Status1 as u8], &mut data)?;
        Ok(Time::from([data[2], data[3], data[4]]))
    }

    /// Sets the time of day.
    ///
    /// Values are BCD-encoded as given; the chip silently misbehaves on
    /// out-of-range input and this layer does not second-guess the caller.
    ///
    /// # Errors
    /// Returns `PCF8593Error::I2c` if the bus transaction fails.
    pub fn set_time(&mut self, time: &Time) -> Result<(), PCF8593Error<I2C::Error>> {
        let data: [u8; 3] = time.into();
        self.i2c.write(
            self.address,
            &[RegAddr::Seconds as u8, data[0], data[1], data[2]],
        )?;
        Ok(())
    }

    /// Gets the current date.
    ///
    /// The chip counts years elapsed since the year register was written in
    /// the high bits of the day register. When that counter is nonzero this
    /// call folds it into the year and **writes back** both the new year and
    /// the cleared counter before returning, so the read has a side effect
    /// on the device.
    ///
    /// # Errors
    /// Returns `PCF8593Error::I2c` if a bus transaction fails.
    pub fn date(&mut self) -> Result<Date, PCF8593Error<I2C::Error>> {
        let mut data = [0; 2];
        self.i2c
            .write_read(self.address, &[RegAddr::Days as u8], &mut data)?;
        let days = Days(data[0]);
        let months = MonthsWeekday(data[1]);

        let mut year_data = [0];
        self.i2c
            .write_read(self.address, &[RegAddr::Years as u8], &mut year_data)?;

        let mut date = Date::from_registers(days, months, Years(year_data[0]));

        let years_passed = days.years_passed();
        if years_passed > 0 {
            // The timer register holding the year never advances on its own;
            // fold the elapsed years back into it and restart the counter.
            date.year += years_passed;
            debug!("rolling year forward by {}", years_passed);
            self.i2c.write(
                self.address,
                &[RegAddr::Years as u8, decimal_to_bcd(date.year)],
            )?;
            let mut cleared = days;
            cleared.set_years_passed(0);
            self.i2c
                .write(self.address, &[RegAddr::Days as u8, cleared.0])?;
        }

        Ok(date)
    }

    /// Sets the date.
    ///
    /// The day byte is written with the rollover counter cleared, so the
    /// chip restarts counting elapsed years from the written year.
    ///
    /// # Errors
    /// Returns `PCF8593Error::I2c` if a bus transaction fails.
    pub fn set_date(&mut self, date: &Date) -> Result<(), PCF8593Error<I2C::Error>> {
        let (days, months, years) = date.to_registers();
        self.i2c
            .write(self.address, &[RegAddr::Days as u8, days.0, months.0])?;
        self.i2c
            .write(self.address, &[RegAddr::Years as u8, years.0])?;
        Ok(())
    }

    /// Gets the current date and time as a chrono `NaiveDateTime`.
    ///
    /// Composed of [`date`](Self::date) and [`time`](Self::time), and
    /// inherits the year write-back effect of the date read.
    ///
    /// # Errors
    /// Returns an error if a bus transaction fails or the register contents
    /// do not form a valid date/time.
    pub fn datetime(&mut self) -> Result<NaiveDateTime, PCF8593Error<I2C::Error>> {
        let date = self.date()?;
        let time = self.time()?;
        let date = date.into_naive_date().map_err(PCF8593Error::DateTime)?;
        let time = time.into_naive_time().map_err(PCF8593Error::DateTime)?;
        Ok(NaiveDateTime::new(date, time))
    }

    /// Sets the date and time from a chrono `NaiveDateTime`.
    ///
    /// # Errors
    /// Returns an error if the year falls outside 2000-2099 or a bus
    /// transaction fails.
    pub fn set_datetime(
        &mut self,
        datetime: &NaiveDateTime,
    ) -> Result<(), PCF8593Error<I2C::Error>> {
        let date = Date::from_naive_date(&datetime.date()).map_err(PCF8593Error::DateTime)?;
        let time = Time::from_naive_time(&datetime.time()).map_err(PCF8593Error::DateTime)?;
        self.set_date(&date)?;
        self.set_time(&time)?;
        Ok(())
    }

    /// Gets the alarm configuration currently held by the chip.
    ///
    /// One burst read of the alarm register bank starting at the second
    /// status register.
    ///
    /// # Errors
    /// Returns `PCF8593Error::I2c` if the bus transaction fails.
    pub fn alarm(&mut self) -> Result<Alarm, PCF8593Error<I2C::Error>> {
        let mut data = [0; 7];
        self.i2c
            .write_read(self.address, &[RegAddr::Status2 as u8], &mut data)?;
        Ok(Alarm::from(data))
    }

    /// Sets the alarm time fields.
    ///
    /// Passing [`NO_ALARM`](crate::alarm::NO_ALARM) for a field takes it out
    /// of the match (encoded as 0x00); other values are clamped to
    /// seconds/minutes 0-59 and hours 0-23. The alarm hundredths register is
    /// always written as zero.
    ///
    /// # Errors
    /// Returns `PCF8593Error::I2c` if the bus transaction fails.
    pub fn set_alarm_time(
        &mut self,
        hours: u8,
        minutes: u8,
        seconds: u8,
    ) -> Result<(), PCF8593Error<I2C::Error>> {
        self.i2c.write(
            self.address,
            &[
                RegAddr::AlarmHundredths as u8,
                0x00,
                encode_alarm_field(seconds, 0, 59),
                encode_alarm_field(minutes, 0, 59),
                encode_alarm_field(hours, 0, 23),
            ],
        )?;
        Ok(())
    }

    /// Sets the alarm date fields, used by the dated alarm mode.
    ///
    /// Passing [`NO_ALARM`](crate::alarm::NO_ALARM) for a field takes it out
    /// of the match; other values are clamped to day 1-31 and month 1-12.
    ///
    /// # Errors
    /// Returns `PCF8593Error::I2c` if the bus transaction fails.
    pub fn set_alarm_date(&mut self, day: u8, month: u8) -> Result<(), PCF8593Error<I2C::Error>> {
        self.i2c.write(
            self.address,
            &[
                RegAddr::AlarmDays as u8,
                encode_alarm_field(day, 1, 31),
                encode_alarm_field(month, 1, 12),
            ],
        )?;
        Ok(())
    }

    /// Sets the weekday bitmask, used by the weekday alarm mode.
    ///
    /// # Errors
    /// Returns `PCF8593Error::I2c` if the bus transaction fails.
    pub fn set_alarm_weekdays(
        &mut self,
        weekdays: AlarmWeekdays,
    ) -> Result<(), PCF8593Error<I2C::Error>> {
        self.i2c.write(
            self.address,
            &[RegAddr::AlarmMonthsWeekday as u8, weekdays.into()],
        )?;
        Ok(())
    }

    /// Sets the alarm recurrence mode.
    ///
    /// Selecting [`AlarmMode::Disabled`] also runs the full
    /// [`clear_alarm`](Self::clear_alarm) sequence; any other mode runs
    /// [`enable_alarm`](Self::enable_alarm) so the interrupt output follows
    /// the new configuration.
    ///
    /// # Errors
    /// Returns `PCF8593Error::I2c` if a bus transaction fails.
    pub fn set_alarm_mode(&mut self, mode: AlarmMode) -> Result<(), PCF8593Error<I2C::Error>> {
        let mut status2 = self.status2()?;
        status2.set_alarm_mode(mode);
        self.set_status2(status2)?;

        if mode == AlarmMode::Disabled {
            self.clear_alarm()
        } else {
            self.enable_alarm()
        }
    }

    /// Arms the alarm: clears the alarm flag and enables the interrupt
    /// output, so the next match drives the interrupt pin.
    ///
    /// # Errors
    /// Returns `PCF8593Error::I2c` if a bus transaction fails.
    pub fn enable_alarm(&mut self) -> Result<(), PCF8593Error<I2C::Error>> {
        let mut status1 = self.status1()?;
        let mut status2 = self.status2()?;
        status1.set_alarm_flag(false);
        status2.set_alarm_interrupt_enable(true);
        self.set_status1(status1)?;
        self.set_status2(status2)?;
        Ok(())
    }

    /// Acknowledges a fired alarm: clears the alarm flag and leaves the
    /// interrupt enable untouched, so the alarm can fire again.
    ///
    /// # Errors
    /// Returns `PCF8593Error::I2c` if a bus transaction fails.
    pub fn reset_alarm(&mut self) -> Result<(), PCF8593Error<I2C::Error>> {
        let mut status1 = self.status1()?;
        status1.set_alarm_flag(false);
        self.set_status1(status1)?;
        Ok(())
    }

    /// Disarms the alarm: clears both the alarm flag and the interrupt
    /// enable.
    ///
    /// # Errors
    /// Returns `PCF8593Error::I2c` if a bus transaction fails.
    pub fn clear_alarm(&mut self) -> Result<(), PCF8593Error<I2C::Error>> {
        let mut status1 = self.status1()?;
        let mut status2 = self.status2()?;
        status1.set_alarm_flag(false);
        status2.set_alarm_interrupt_enable(false);
        self.set_status1(status1)?;
        self.set_status2(status2)?;
        Ok(())
    }

    /// Returns true if the alarm interrupt output is enabled (AIE).
    ///
    /// # Errors
    /// Returns `PCF8593Error::I2c` if the bus transaction fails.
    pub fn alarm_enabled(&mut self) -> Result<bool, PCF8593Error<I2C::Error>> {
        Ok(self.status2()?.alarm_interrupt_enable())
    }

    /// Returns true if the alarm has fired (AF set).
    ///
    /// # Errors
    /// Returns `PCF8593Error::I2c` if the bus transaction fails.
    pub fn alarm_active(&mut self) -> Result<bool, PCF8593Error<I2C::Error>> {
        Ok(self.status1()?.alarm_flag())
    }
}

// Register access implementations
macro_rules! impl_register_access {
    ($(($name:ident, $regaddr:expr, $typ:ty)),+) => {
        impl<I2C: I2c> PCF8593<I2C> {
            $(
                paste! {
                    #[doc = concat!("Gets the value of the ", stringify!($name), " register.")]
                    #[doc = "\n\n# Errors"]
                    #[doc = "Returns `PCF8593Error::I2c` if the bus transaction fails."]
                    pub fn $name(&mut self) -> Result<$typ, PCF8593Error<I2C::Error>> {
                        let mut data = [0];
                        self.i2c
                            .write_read(self.address, &[$regaddr as u8], &mut data)?;
                        Ok($typ(data[0]))
                    }

                    #[doc = concat!("Sets the value of the ", stringify!($name), " register.")]
                    #[doc = "\n\n# Errors"]
                    #[doc = "Returns `PCF8593Error::I2c` if the bus transaction fails."]
                    pub fn [<set_ $name>](&mut self, value: $typ) -> Result<(), PCF8593Error<I2C::Error>> {
                        self.i2c.write(
                            self.address,
                            &[$regaddr as u8, value.into()],
                        )?;
                        Ok(())
                    }
                }
            )+
        }
    }
}

impl_register_access!(
    (status1, RegAddr::Status1, Status1),
    (hundredths, RegAddr::Hundredths, Hundredths),
    (second, RegAddr::Seconds, Seconds),
    (minute, RegAddr::Minutes, Minutes),
    (hour, RegAddr::Hours, Hours),
    (day, RegAddr::Days, Days),
    (month_weekday, RegAddr::MonthsWeekday, MonthsWeekday),
    (year, RegAddr::Years, Years),
    (status2, RegAddr::Status2, Status2),
    (alarm_hundredths, RegAddr::AlarmHundredths, Hundredths),
    (alarm_second, RegAddr::AlarmSeconds, Seconds),
    (alarm_minute, RegAddr::AlarmMinutes, Minutes),
    (alarm_hour, RegAddr::AlarmHours, Hours),
    (alarm_day, RegAddr::AlarmDays, Days),
    (alarm_month_weekday, RegAddr::AlarmMonthsWeekday, MonthsWeekday)
);

#[cfg(test)]
mod tests {
    extern crate alloc;
    use super::*;
    use crate::alarm::NO_ALARM;
    use crate::datetime::{DateStyle, TimeStyle};
    use alloc::vec;
    use chrono::{Datelike, NaiveDate, Timelike};
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};

    const DEVICE_ADDRESS: u8 = PCF8593_ADDRESS;

    #[test]
    fn test_device_address() {
        // 0xA2 write / 0xA3 read collapse to one 7-bit address
        assert_eq!(PCF8593_ADDRESS, 0x51);
    }

    #[test]
    fn test_init_clock() {
        let mock = I2cMock::new(&[I2cTrans::write(
            DEVICE_ADDRESS,
            vec![
                RegAddr::Status1 as u8,
                0x04,
                0x01,
                0x01,
                0x01,
                0x01,
                0x01,
                0x01,
                0x01,
                0x00,
                0x00,
                0x00,
                0x00,
                0x00,
                0x00,
                0x00,
                0x00,
            ],
        )]);
        let mut dev = PCF8593::new(mock, DEVICE_ADDRESS);
        dev.init_clock().unwrap();
        dev.i2c.done();
    }

    #[test]
    fn test_clear_status() {
        let mock = I2cMock::new(&[
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Status1 as u8, 0x04]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Status2 as u8, 0x00]),
        ]);
        let mut dev = PCF8593::new(mock, DEVICE_ADDRESS);
        dev.clear_status().unwrap();
        dev.i2c.done();
    }

    #[test]
    fn test_read_time() {
        // Burst read carries status1 and hundredths before the time bytes
        let mock = I2cMock::new(&[I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![RegAddr::Status1 as u8],
            vec![0x04, 0x00, 0x30, 0x45, 0x12],
        )]);
        let mut dev = PCF8593::new(mock, DEVICE_ADDRESS);

        let time = dev.time().unwrap();
        assert_eq!(time.hours, 12);
        assert_eq!(time.minutes, 45);
        assert_eq!(time.seconds, 30);
        assert_eq!(
            alloc::format!("{}", time.display(TimeStyle::HoursMinutesSeconds)),
            "12:45:30"
        );
        dev.i2c.done();
    }

    #[test]
    fn test_set_time() {
        let mock = I2cMock::new(&[I2cTrans::write(
            DEVICE_ADDRESS,
            vec![RegAddr::Seconds as u8, 0x58, 0x59, 0x23],
        )]);
        let mut dev = PCF8593::new(mock, DEVICE_ADDRESS);

        dev.set_time(&Time {
            hours: 23,
            minutes: 59,
            seconds: 58,
        })
        .unwrap();
        dev.i2c.done();
    }

    #[test]
    fn test_read_date() {
        let mock = I2cMock::new(&[
            // day 14, weekday 4 + December
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Days as u8], vec![0x14, 0x92]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Years as u8], vec![0x24]),
        ]);
        let mut dev = PCF8593::new(mock, DEVICE_ADDRESS);

        let date = dev.date().unwrap();
        assert_eq!(date.day, 14);
        assert_eq!(date.weekday, 4);
        assert_eq!(date.month, 12);
        assert_eq!(date.year, 24);
        dev.i2c.done();
    }

    #[test]
    fn test_read_date_rollover_write_back() {
        // Rollover counter at 2 with stored year 23: the reported year is 25
        // and both the year and the cleared day byte go back to the chip.
        let mock = I2cMock::new(&[
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Days as u8], vec![0x85, 0x21]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Years as u8], vec![0x23]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Years as u8, 0x25]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Days as u8, 0x05]),
        ]);
        let mut dev = PCF8593::new(mock, DEVICE_ADDRESS);

        let date = dev.date().unwrap();
        assert_eq!(date.year, 25);
        assert_eq!(date.day, 5);
        assert_eq!(date.weekday, 1);
        assert_eq!(date.month, 1);
        dev.i2c.done();
    }

    #[test]
    fn test_set_date() {
        let mock = I2cMock::new(&[
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Days as u8, 0x14, 0x83]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Years as u8, 0x24]),
        ]);
        let mut dev = PCF8593::new(mock, DEVICE_ADDRESS);

        dev.set_date(&Date {
            day: 14,
            weekday: 4,
            month: 3,
            year: 24,
        })
        .unwrap();
        dev.i2c.done();
    }

    #[test]
    fn test_read_datetime() {
        let mock = I2cMock::new(&[
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Days as u8], vec![0x14, 0x83]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Years as u8], vec![0x24]),
            I2cTrans::write_read(
                DEVICE_ADDRESS,
                vec![RegAddr::Status1 as u8],
                vec![0x04, 0x00, 0x00, 0x30, 0x15],
            ),
        ]);
        let mut dev = PCF8593::new(mock, DEVICE_ADDRESS);

        let dt = dev.datetime().unwrap();
        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.month(), 3);
        assert_eq!(dt.day(), 14);
        assert_eq!(dt.hour(), 15);
        assert_eq!(dt.minute(), 30);
        assert_eq!(dt.second(), 0);
        dev.i2c.done();
    }

    #[test]
    fn test_set_datetime() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 14)
            .unwrap()
            .and_hms_opt(15, 30, 0)
            .unwrap();

        let mock = I2cMock::new(&[
            // 2024-03-14 is a Thursday, weekday 4
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Days as u8, 0x14, 0x83]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Years as u8, 0x24]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Seconds as u8, 0x00, 0x30, 0x15]),
        ]);
        let mut dev = PCF8593::new(mock, DEVICE_ADDRESS);

        dev.set_datetime(&dt).unwrap();
        dev.i2c.done();
    }

    #[test]
    fn test_set_datetime_year_out_of_range() {
        let dt = NaiveDate::from_ymd_opt(2100, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        let mock = I2cMock::new(&[]);
        let mut dev = PCF8593::new(mock, DEVICE_ADDRESS);

        assert!(matches!(
            dev.set_datetime(&dt),
            Err(PCF8593Error::DateTime(
                PCF8593DateTimeError::YearNotBefore2100
            ))
        ));
        dev.i2c.done();
    }

    #[test]
    fn test_read_alarm() {
        let mock = I2cMock::new(&[I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![RegAddr::Status2 as u8],
            vec![0xB0, 0x00, 0x30, 0x45, 0x12, 0x15, 0x06],
        )]);
        let mut dev = PCF8593::new(mock, DEVICE_ADDRESS);

        let alarm = dev.alarm().unwrap();
        assert_eq!(alarm.mode, AlarmMode::Dated);
        assert!(alarm.interrupt_enabled);
        assert_eq!(alarm.seconds, 30);
        assert_eq!(alarm.minutes, 45);
        assert_eq!(alarm.hours, 12);
        assert_eq!(alarm.day, 15);
        assert_eq!(alarm.month, 6);
        dev.i2c.done();
    }

    #[test]
    fn test_set_alarm_time() {
        let mock = I2cMock::new(&[I2cTrans::write(
            DEVICE_ADDRESS,
            vec![RegAddr::AlarmHundredths as u8, 0x00, 0x00, 0x30, 0x07],
        )]);
        let mut dev = PCF8593::new(mock, DEVICE_ADDRESS);

        dev.set_alarm_time(7, 30, 0).unwrap();
        dev.i2c.done();
    }

    #[test]
    fn test_set_alarm_time_no_alarm_sentinel() {
        // 99 means "don't care" and encodes as zero, not BCD 99
        let mock = I2cMock::new(&[I2cTrans::write(
            DEVICE_ADDRESS,
            vec![RegAddr::AlarmHundredths as u8, 0x00, 0x00, 0x00, 0x00],
        )]);
        let mut dev = PCF8593::new(mock, DEVICE_ADDRESS);

        dev.set_alarm_time(NO_ALARM, NO_ALARM, NO_ALARM).unwrap();
        dev.i2c.done();
    }

    #[test]
    fn test_set_alarm_time_clamps_out_of_range() {
        // (25, 70, 5) clamps to (23, 59, 5) before encoding
        let mock = I2cMock::new(&[I2cTrans::write(
            DEVICE_ADDRESS,
            vec![RegAddr::AlarmHundredths as u8, 0x00, 0x05, 0x59, 0x23],
        )]);
        let mut dev = PCF8593::new(mock, DEVICE_ADDRESS);

        dev.set_alarm_time(25, 70, 5).unwrap();
        dev.i2c.done();
    }

    #[test]
    fn test_set_alarm_date() {
        let mock = I2cMock::new(&[
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::AlarmDays as u8, 0x15, 0x06]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::AlarmDays as u8, 0x00, 0x00]),
        ]);
        let mut dev = PCF8593::new(mock, DEVICE_ADDRESS);

        dev.set_alarm_date(15, 6).unwrap();
        dev.set_alarm_date(NO_ALARM, NO_ALARM).unwrap();
        dev.i2c.done();
    }

    #[test]
    fn test_set_alarm_date_clamps_out_of_range() {
        // Day and month clamp from below to 1
        let mock = I2cMock::new(&[I2cTrans::write(
            DEVICE_ADDRESS,
            vec![RegAddr::AlarmDays as u8, 0x01, 0x12],
        )]);
        let mut dev = PCF8593::new(mock, DEVICE_ADDRESS);

        dev.set_alarm_date(0, 13).unwrap();
        dev.i2c.done();
    }

    #[test]
    fn test_set_alarm_weekdays() {
        let mock = I2cMock::new(&[I2cTrans::write(
            DEVICE_ADDRESS,
            vec![RegAddr::AlarmMonthsWeekday as u8, 0x22],
        )]);
        let mut dev = PCF8593::new(mock, DEVICE_ADDRESS);

        let mut weekdays = AlarmWeekdays::default();
        weekdays.set_monday(true);
        weekdays.set_friday(true);
        dev.set_alarm_weekdays(weekdays).unwrap();
        dev.i2c.done();
    }

    #[test]
    fn test_set_alarm_mode_daily_enables_interrupt() {
        let mock = I2cMock::new(&[
            // Read-modify-write of the mode bits
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Status2 as u8], vec![0x00]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Status2 as u8, 0x10]),
            // enable_alarm: clear AF, set AIE
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Status1 as u8], vec![0x06]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Status2 as u8], vec![0x10]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Status1 as u8, 0x04]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Status2 as u8, 0x90]),
        ]);
        let mut dev = PCF8593::new(mock, DEVICE_ADDRESS);

        dev.set_alarm_mode(AlarmMode::Daily).unwrap();
        dev.i2c.done();
    }

    #[test]
    fn test_set_alarm_mode_disabled_clears_flags() {
        let mock = I2cMock::new(&[
            // Mode bits cleared while AIE still reads set
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Status2 as u8], vec![0x90]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Status2 as u8, 0x80]),
            // clear_alarm: AF and AIE both dropped
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Status1 as u8], vec![0x06]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Status2 as u8], vec![0x80]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Status1 as u8, 0x04]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Status2 as u8, 0x00]),
        ]);
        let mut dev = PCF8593::new(mock, DEVICE_ADDRESS);

        dev.set_alarm_mode(AlarmMode::Disabled).unwrap();
        dev.i2c.done();
    }

    #[test]
    fn test_reset_alarm_leaves_interrupt_enabled() {
        let mock = I2cMock::new(&[
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Status1 as u8], vec![0x06]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Status1 as u8, 0x04]),
        ]);
        let mut dev = PCF8593::new(mock, DEVICE_ADDRESS);

        dev.reset_alarm().unwrap();
        dev.i2c.done();
    }

    #[test]
    fn test_alarm_enabled_and_active() {
        let mock = I2cMock::new(&[
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Status2 as u8], vec![0x80]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Status2 as u8], vec![0x00]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Status1 as u8], vec![0x06]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Status1 as u8], vec![0x04]),
        ]);
        let mut dev = PCF8593::new(mock, DEVICE_ADDRESS);

        assert!(dev.alarm_enabled().unwrap());
        assert!(!dev.alarm_enabled().unwrap());
        assert!(dev.alarm_active().unwrap());
        assert!(!dev.alarm_active().unwrap());
        dev.i2c.done();
    }

    #[test]
    fn test_register_operations() {
        let mock = I2cMock::new(&[
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Seconds as u8], vec![0x45]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Seconds as u8, 0x30]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Hundredths as u8], vec![0x25]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Status2 as u8], vec![0x90]),
        ]);
        let mut dev = PCF8593::new(mock, DEVICE_ADDRESS);

        let seconds = dev.second().unwrap();
        assert_eq!(seconds.ten_seconds(), 4);
        assert_eq!(seconds.seconds(), 5);
        dev.set_second(Seconds(0x30)).unwrap();

        let hundredths = dev.hundredths().unwrap();
        assert_eq!(hundredths.ten_hundredths(), 2);
        assert_eq!(hundredths.hundredths(), 5);

        let status2 = dev.status2().unwrap();
        assert!(status2.alarm_interrupt_enable());
        assert_eq!(status2.alarm_mode(), AlarmMode::Daily);
        dev.i2c.done();
    }

    #[test]
    fn test_date_display_from_driver_read() {
        let mock = I2cMock::new(&[
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Days as u8], vec![0x05, 0x43]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Years as u8], vec![0x24]),
        ]);
        let mut dev = PCF8593::new(mock, DEVICE_ADDRESS);

        // day 5, weekday 2, March, year 24
        let date = dev.date().unwrap();
        assert_eq!(
            alloc::format!("{}", date.display(DateStyle::Us)),
            "03/05/2024"
        );
        assert_eq!(
            alloc::format!("{}", date.display(DateStyle::World)),
            "05-03-2024"
        );
        dev.i2c.done();
    }
}
