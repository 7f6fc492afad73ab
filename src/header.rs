//! WFDB header parsing.
//!
//! Challenge headers look like
//!
//! ```text
//! A0001 12 500 7500 05-Feb-2020 11:39:16
//! A0001.mat 16+24 1000/mV 16 0 28 -1716 0 I
//! ... one line per lead ...
//! #Age: 74
//! #Sex: Male
//! #Dx: 59118001
//! #Rx: Unknown
//! ```
//!
//! The demographic and diagnosis comments sit at fixed line indices; the
//! parser checks that each of those lines carries the expected key.
use std::path::Path;

use crate::error::{HeaderErrorKind, PrepError, Result};

pub const RECORD_LINE: usize = 0;
pub const AGE_LINE: usize = 13;
pub const SEX_LINE: usize = 14;
pub const DX_LINE: usize = 15;

#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub record_name: String,
    pub n_channels: usize,
    pub sampling_frequency: f64,
    pub n_samples: usize,
    /// Lead names, taken from the last token of each signal line.
    pub leads: Vec<String>,
    /// Raw values, cleaned later by [`crate::demographics`].
    pub age: String,
    pub sex: String,
    /// Comma separated SNOMED CT codes.
    pub dx: String,
}

impl Header {
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| PrepError::io(path, e))?;
        Self::parse(&text).map_err(|kind| PrepError::Header {
            path: path.to_path_buf(),
            kind,
        })
    }

    pub fn parse(text: &str) -> std::result::Result<Self, HeaderErrorKind> {
        let lines: Vec<&str> = text.lines().collect();
        if lines.len() <= DX_LINE {
            return Err(HeaderErrorKind::TooFewLines {
                expected: DX_LINE + 1,
                found: lines.len(),
            });
        }

        let record = lines[RECORD_LINE];
        let tokens: Vec<&str> = record.split_whitespace().collect();
        if tokens.len() < 4 {
            return Err(HeaderErrorKind::MalformedRecordLine(record.to_string()));
        }
        let n_channels = parse_number::<usize>("channel count", tokens[1])?;
        // "500", "500/1", "500(0)" all mean 500 Hz
        let fs_token = tokens[2]
            .split(|c| c == '/' || c == '(')
            .next()
            .unwrap_or(tokens[2]);
        let sampling_frequency = parse_number::<f64>("sampling frequency", fs_token)?;
        let n_samples = parse_number::<usize>("sample count", tokens[3])?;

        let last_lead_line = n_channels.min(lines.len() - 1);
        let leads = lines[1..=last_lead_line]
            .iter()
            .filter_map(|line| line.split_whitespace().last())
            .map(str::to_string)
            .collect();

        Ok(Self {
            record_name: tokens[0].to_string(),
            n_channels,
            sampling_frequency,
            n_samples,
            leads,
            age: comment_field(&lines, AGE_LINE, "Age")?,
            sex: comment_field(&lines, SEX_LINE, "Sex")?,
            dx: comment_field(&lines, DX_LINE, "Dx")?,
        })
    }

    /// Format as a header file. Signal lines use the Challenge layout
    /// (`16+24`: int16 data behind a 24 byte Level 4 preamble).
    pub fn render(&self) -> String {
        let mut out = format!(
            "{} {} {} {}\n",
            self.record_name, self.n_channels, self.sampling_frequency, self.n_samples
        );
        for lead in &self.leads {
            out.push_str(&format!("{}.mat 16+24 1000/mV 16 0 0 0 0 {}\n", self.record_name, lead));
        }
        out.push_str(&format!("#Age: {}\n#Sex: {}\n#Dx: {}\n", self.age, self.sex, self.dx));
        out.push_str("#Rx: Unknown\n#Hx: Unknown\n#Sx: Unknown\n");
        out
    }
}

fn parse_number<T: std::str::FromStr>(
    field: &'static str,
    value: &str,
) -> std::result::Result<T, HeaderErrorKind> {
    value.parse().map_err(|_| HeaderErrorKind::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

fn comment_field(
    lines: &[&str],
    line: usize,
    field: &'static str,
) -> std::result::Result<String, HeaderErrorKind> {
    let missing = || HeaderErrorKind::MissingField { line, field };
    let value = lines[line]
        .trim()
        .strip_prefix('#')
        .ok_or_else(missing)?
        .trim_start()
        .strip_prefix(field)
        .and_then(|rest| rest.strip_prefix(':'))
        .ok_or_else(missing)?;
    Ok(value.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEADS: [&str; 12] = [
        "I", "II", "III", "aVR", "aVL", "aVF", "V1", "V2", "V3", "V4", "V5", "V6",
    ];

    fn challenge_header(age: &str, sex: &str, dx: &str) -> String {
        let mut text = String::from("A0001 12 500 7500 05-Feb-2020 11:39:16\n");
        for lead in LEADS {
            text.push_str(&format!("A0001.mat 16+24 1000/mV 16 0 28 -1716 0 {lead}\n"));
        }
        text.push_str(&format!("#Age: {age}\n#Sex: {sex}\n#Dx: {dx}\n#Rx: Unknown\n"));
        text
    }

    #[test]
    fn test_parses_challenge_header() {
        let header = Header::parse(&challenge_header("74", "Male", "59118001,164884008")).unwrap();

        assert_eq!(header.record_name, "A0001");
        assert_eq!(header.n_channels, 12);
        assert_eq!(header.sampling_frequency, 500.0);
        assert_eq!(header.n_samples, 7500);
        assert_eq!(header.leads, LEADS);
        assert_eq!(header.age, "74");
        assert_eq!(header.sex, "Male");
        assert_eq!(header.dx, "59118001,164884008");
    }

    #[test]
    fn test_windows_line_endings() {
        let text = challenge_header("NaN", "F", "426783006").replace('\n', "\r\n");
        let header = Header::parse(&text).unwrap();
        assert_eq!(header.age, "NaN");
        assert_eq!(header.sex, "F");
        assert_eq!(header.dx, "426783006");
    }

    #[test]
    fn test_frequency_with_counter_suffix() {
        let text = challenge_header("50", "M", "1").replacen(" 500 ", " 500/1 ", 1);
        assert_eq!(Header::parse(&text).unwrap().sampling_frequency, 500.0);
    }

    #[test]
    fn test_too_few_lines() {
        let text = "A0001 12 500 7500\n#Age: 74\n";
        assert_eq!(
            Header::parse(text),
            Err(HeaderErrorKind::TooFewLines { expected: 16, found: 2 })
        );
    }

    #[test]
    fn test_short_record_line() {
        let text = challenge_header("74", "Male", "1").replacen("A0001 12 500 7500 05-Feb-2020 11:39:16", "A0001 12", 1);
        assert!(matches!(
            Header::parse(&text),
            Err(HeaderErrorKind::MalformedRecordLine(_))
        ));
    }

    #[test]
    fn test_non_numeric_sample_count() {
        let text = challenge_header("74", "Male", "1").replacen(" 7500 ", " many ", 1);
        assert_eq!(
            Header::parse(&text),
            Err(HeaderErrorKind::InvalidNumber {
                field: "sample count",
                value: "many".to_string()
            })
        );
    }

    #[test]
    fn test_field_on_wrong_line() {
        // sex and age swapped
        let text = challenge_header("74", "Male", "1").replace("#Age: 74\n#Sex: Male", "#Sex: Male\n#Age: 74");
        assert_eq!(
            Header::parse(&text),
            Err(HeaderErrorKind::MissingField { line: AGE_LINE, field: "Age" })
        );
    }

    #[test]
    fn test_render_parses_back() {
        let header = Header {
            record_name: "S0007".to_string(),
            n_channels: 12,
            sampling_frequency: 500.0,
            n_samples: 4200,
            leads: LEADS.iter().map(|l| l.to_string()).collect(),
            age: "63".to_string(),
            sex: "Female".to_string(),
            dx: "164889003,270492004".to_string(),
        };
        assert_eq!(Header::parse(&header.render()).unwrap(), header);
    }
}
