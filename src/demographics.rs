use ndarray::Array1;

use crate::error::{PrepError, Result};

pub const MISSING_AGE: i32 = -1;
const MISSING: &str = "NaN";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
    Unknown,
}

impl Sex {
    /// Exact-match lookup. Anything outside the table is a data defect.
    pub fn from_raw(raw: &str) -> Option<Self> {
        match raw {
            "Male" | "male" | "M" => Some(Sex::Male),
            "Female" | "female" | "F" => Some(Sex::Female),
            MISSING => Some(Sex::Unknown),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Sex::Male => 0,
            Sex::Female => 1,
            Sex::Unknown => 2,
        }
    }
}

pub fn clean_up_sex_data<S: AsRef<str>>(sex: &[S]) -> Result<Array1<u8>> {
    sex.iter()
        .map(|s| {
            let s = s.as_ref();
            Sex::from_raw(s)
                .map(Sex::code)
                .ok_or_else(|| PrepError::UnmappedSex(s.to_string()))
        })
        .collect::<Result<Vec<u8>>>()
        .map(Array1::from)
}

pub fn clean_up_age_data<S: AsRef<str>>(age: &[S]) -> Result<Array1<i32>> {
    age.iter()
        .map(|a| match a.as_ref() {
            MISSING => Ok(MISSING_AGE),
            a => a
                .parse::<i32>()
                .map_err(|_| PrepError::InvalidAge(a.to_string())),
        })
        .collect::<Result<Vec<i32>>>()
        .map(Array1::from)
}

/// Clean both demographic columns at once. Returns `(age, sex)`.
pub fn import_sex_and_age<A, S>(age: &[A], sex: &[S]) -> Result<(Array1<i32>, Array1<u8>)>
where
    A: AsRef<str>,
    S: AsRef<str>,
{
    let sex_clean = clean_up_sex_data(sex)?;
    let age_clean = clean_up_age_data(age)?;
    log::info!("sex data shape: {}", sex_clean.len());
    log::info!("age data shape: {}", age_clean.len());
    Ok((age_clean, sex_clean))
}
