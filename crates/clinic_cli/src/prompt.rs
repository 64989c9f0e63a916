//! Line-oriented prompt helpers for the console front end.
//!
//! # Invariants
//! - Every helper reprompts until the input is valid.
//! - End of input surfaces as `io::ErrorKind::UnexpectedEof` so callers can
//!   exit cleanly.

use chrono::{NaiveDate, NaiveTime};
use clinic_core::{parse_date, parse_time};
use std::io::{self, BufRead, Write};
use std::str::FromStr;

/// Reads answers from `input` and writes prompts and feedback to `output`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// Prints `prompt` and returns the trimmed answer.
    pub fn line(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed",
            ));
        }
        Ok(buf.trim().to_string())
    }

    pub fn text(&mut self, prompt: &str) -> io::Result<String> {
        loop {
            let value = self.line(prompt)?;
            if !value.is_empty() {
                return Ok(value);
            }
            writeln!(self.output, "Value cannot be empty. Try again.")?;
        }
    }

    /// Blank answers map to `None`.
    pub fn optional_text(&mut self, prompt: &str) -> io::Result<Option<String>> {
        let value = self.line(prompt)?;
        Ok((!value.is_empty()).then_some(value))
    }

    pub fn int(&mut self, prompt: &str, min: Option<i64>) -> io::Result<i64> {
        self.number(prompt, min, false, "Please enter a valid integer.", |_| true)
            .map(|value| value.unwrap_or_default())
    }

    pub fn optional_int(&mut self, prompt: &str, min: Option<i64>) -> io::Result<Option<i64>> {
        self.number(prompt, min, true, "Please enter a valid integer.", |_| true)
    }

    pub fn float(&mut self, prompt: &str, min: Option<f64>) -> io::Result<f64> {
        self.number(prompt, min, false, "Please enter a valid number.", |v| v.is_finite())
            .map(|value| value.unwrap_or_default())
    }

    pub fn optional_float(&mut self, prompt: &str, min: Option<f64>) -> io::Result<Option<f64>> {
        self.number(prompt, min, true, "Please enter a valid number.", |v| v.is_finite())
    }

    pub fn date(&mut self, prompt: &str) -> io::Result<NaiveDate> {
        loop {
            let value = self.line(prompt)?;
            match parse_date(&value) {
                Ok(date) => return Ok(date),
                Err(_) => writeln!(self.output, "Invalid date format. Use YYYY-MM-DD.")?,
            }
        }
    }

    pub fn time(&mut self, prompt: &str) -> io::Result<NaiveTime> {
        loop {
            let value = self.line(prompt)?;
            match parse_time(&value) {
                Ok(time) => return Ok(time),
                Err(_) => writeln!(self.output, "Invalid time format. Use HH:MM (24h).")?,
            }
        }
    }

    /// Waits for Enter before the menu is shown again.
    pub fn pause(&mut self) -> io::Result<()> {
        self.line("\nPress Enter to continue...").map(|_| ())
    }

    fn number<T>(
        &mut self,
        prompt: &str,
        min: Option<T>,
        allow_blank: bool,
        invalid_message: &str,
        accept: fn(&T) -> bool,
    ) -> io::Result<Option<T>>
    where
        T: FromStr + PartialOrd + Copy + std::fmt::Display,
    {
        loop {
            let value = self.line(prompt)?;
            if allow_blank && value.is_empty() {
                return Ok(None);
            }
            // `nan` and `inf` parse as floats but are not usable amounts.
            match value.parse::<T>().ok().filter(accept) {
                Some(number) => match min {
                    Some(min) if number < min => writeln!(self.output, "Enter >= {min}")?,
                    _ => return Ok(Some(number)),
                },
                None => writeln!(self.output, "{invalid_message}")?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompter(input: &str) -> Prompter<&[u8], Vec<u8>> {
        Prompter::new(input.as_bytes(), Vec::new())
    }

    fn printed(prompter: Prompter<&[u8], Vec<u8>>) -> String {
        String::from_utf8(prompter.output).unwrap()
    }

    #[test]
    fn text_reprompts_on_blank_input() {
        let mut p = prompter("\n   \n  Dr. Sen \n");
        assert_eq!(p.text("Name: ").unwrap(), "Dr. Sen");
        let out = printed(p);
        assert_eq!(out.matches("Value cannot be empty").count(), 2);
        assert_eq!(out.matches("Name: ").count(), 3);
    }

    #[test]
    fn int_enforces_minimum_and_rejects_garbage() {
        let mut p = prompter("abc\n-4\n35\n");
        assert_eq!(p.int("Age: ", Some(0)).unwrap(), 35);
        let out = printed(p);
        assert!(out.contains("Please enter a valid integer."));
        assert!(out.contains("Enter >= 0"));
    }

    #[test]
    fn optional_int_accepts_blank() {
        let mut p = prompter("\n");
        assert_eq!(p.optional_int("Doctor ID: ", Some(1)).unwrap(), None);
    }

    #[test]
    fn float_rejects_negative_amount() {
        let mut p = prompter("-1\n400.5\n");
        assert_eq!(p.float("Amount: ", Some(0.0)).unwrap(), 400.5);
        assert!(printed(p).contains("Enter >= 0"));
    }

    #[test]
    fn float_reprompts_on_non_finite_input() {
        let mut p = prompter("nan\ninf\n-inf\n5\n");
        assert_eq!(p.float("Amount: ", Some(0.0)).unwrap(), 5.0);
        let out = printed(p);
        assert_eq!(out.matches("Please enter a valid number.").count(), 3);
        assert_eq!(out.matches("Amount: ").count(), 4);
    }

    #[test]
    fn optional_float_reprompts_on_nan_and_keeps_blank() {
        let mut p = prompter("NaN\n\n");
        assert_eq!(p.optional_float("Cost (blank for 0): ", Some(0.0)).unwrap(), None);
        assert!(printed(p).contains("Please enter a valid number."));
    }

    #[test]
    fn date_and_time_reprompt_until_valid() {
        let mut p = prompter("10/09/2025\n2025-09-10\n25:00\n09:15\n");
        assert_eq!(
            p.date("Date: ").unwrap(),
            NaiveDate::from_ymd_opt(2025, 9, 10).unwrap()
        );
        assert_eq!(
            p.time("Time: ").unwrap(),
            NaiveTime::from_hms_opt(9, 15, 0).unwrap()
        );
        let out = printed(p);
        assert!(out.contains("Invalid date format. Use YYYY-MM-DD."));
        assert!(out.contains("Invalid time format. Use HH:MM (24h)."));
    }

    #[test]
    fn closed_input_reports_eof() {
        let mut p = prompter("");
        let err = p.text("Name: ").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
