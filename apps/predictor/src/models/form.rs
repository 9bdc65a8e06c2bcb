use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::errors::InputError;

pub const EXPERIENCE_FIELD: &str = "Years of Experience";
pub const EXPERIENCE_MIN: f64 = 0.0;
pub const EXPERIENCE_MAX: f64 = 25.0;
pub const EXPERIENCE_STEP: f64 = 0.5;

pub const AGE_FIELD: &str = "Age";
pub const AGE_MIN: f64 = 23.0;
pub const AGE_MAX: f64 = 53.0;

const EDUCATION_FIELD: &str = "Education Level";
const JOB_TITLE_FIELD: &str = "Job Title";
const GENDER_FIELD: &str = "Gender";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Education {
    #[serde(rename = "Bachelor's")]
    Bachelors,
    #[serde(rename = "Master's")]
    Masters,
    #[serde(rename = "PhD")]
    Phd,
}

impl Education {
    pub const ALL: [Education; 3] = [Education::Bachelors, Education::Masters, Education::Phd];

    pub fn as_str(&self) -> &'static str {
        match self {
            Education::Bachelors => "Bachelor's",
            Education::Masters => "Master's",
            Education::Phd => "PhD",
        }
    }
}

impl fmt::Display for Education {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Education {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bachelor's" | "bachelors" | "bachelor" => Ok(Education::Bachelors),
            "master's" | "masters" | "master" => Ok(Education::Masters),
            "phd" => Ok(Education::Phd),
            "" => Err(InputError::Missing(EDUCATION_FIELD)),
            _ => Err(InputError::UnknownEducation(s.trim().to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "" => Err(InputError::Missing(GENDER_FIELD)),
            _ => Err(InputError::UnknownGender(s.trim().to_string())),
        }
    }
}

/// Raw form fields exactly as the user typed them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormInput {
    pub experience: String,
    pub education: String,
    pub job_title: String,
    pub gender: String,
    pub age: String,
}

/// Validated body of `POST /predict`, serialized with the service's column names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRequest {
    #[serde(rename = "Years of Experience")]
    pub experience: f64,
    #[serde(rename = "Education Level")]
    pub education: Education,
    #[serde(rename = "Job Title")]
    pub job_title: String,
    #[serde(rename = "Gender")]
    pub gender: Gender,
    #[serde(rename = "Age")]
    pub age: f64,
}

impl FormInput {
    /// Applies the form's input constraints and converts the numeric fields.
    pub fn to_request(&self) -> Result<PredictionRequest, InputError> {
        let experience = parse_number(EXPERIENCE_FIELD, &self.experience)?;
        check_range(EXPERIENCE_FIELD, experience, EXPERIENCE_MIN, EXPERIENCE_MAX)?;
        if (experience / EXPERIENCE_STEP).fract() != 0.0 {
            return Err(InputError::Step {
                field: EXPERIENCE_FIELD,
                step: EXPERIENCE_STEP,
            });
        }

        let age = parse_number(AGE_FIELD, &self.age)?;
        check_range(AGE_FIELD, age, AGE_MIN, AGE_MAX)?;

        let education = self.education.parse::<Education>()?;

        let job_title = self.job_title.trim();
        if job_title.is_empty() {
            return Err(InputError::Missing(JOB_TITLE_FIELD));
        }

        let gender = self.gender.parse::<Gender>()?;

        Ok(PredictionRequest {
            experience,
            education,
            job_title: job_title.to_string(),
            gender,
            age,
        })
    }
}

fn parse_number(field: &'static str, raw: &str) -> Result<f64, InputError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(InputError::Missing(field));
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(InputError::NotANumber {
            field,
            value: raw.to_string(),
        }),
    }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), InputError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(InputError::OutOfRange { field, min, max })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_form() -> FormInput {
        FormInput {
            experience: "5".to_string(),
            education: "Master's".to_string(),
            job_title: "  Software Engineer ".to_string(),
            gender: "female".to_string(),
            age: "30".to_string(),
        }
    }

    #[test]
    fn test_valid_form_converts_numbers_and_trims_title() {
        let req = valid_form().to_request().unwrap();
        assert_eq!(req.experience, 5.0);
        assert_eq!(req.age, 30.0);
        assert_eq!(req.education, Education::Masters);
        assert_eq!(req.gender, Gender::Female);
        assert_eq!(req.job_title, "Software Engineer");
    }

    #[test]
    fn test_request_serializes_with_service_field_names() {
        let req = valid_form().to_request().unwrap();
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(
            body,
            json!({
                "Years of Experience": 5.0,
                "Education Level": "Master's",
                "Job Title": "Software Engineer",
                "Gender": "Female",
                "Age": 30.0
            })
        );
    }

    #[test]
    fn test_unparseable_experience_is_input_error() {
        let mut form = valid_form();
        form.experience = "five".to_string();
        assert_eq!(
            form.to_request().unwrap_err(),
            InputError::NotANumber {
                field: EXPERIENCE_FIELD,
                value: "five".to_string()
            }
        );
    }

    #[test]
    fn test_experience_must_step_by_half_years() {
        let mut form = valid_form();
        form.experience = "2.5".to_string();
        assert!(form.to_request().is_ok());
        form.experience = "2.3".to_string();
        assert!(matches!(
            form.to_request(),
            Err(InputError::Step { .. })
        ));
    }

    #[test]
    fn test_numeric_ranges_are_enforced() {
        let mut form = valid_form();
        form.experience = "26".to_string();
        assert!(matches!(
            form.to_request(),
            Err(InputError::OutOfRange { field: EXPERIENCE_FIELD, .. })
        ));

        let mut form = valid_form();
        form.age = "22".to_string();
        assert!(matches!(
            form.to_request(),
            Err(InputError::OutOfRange { field: AGE_FIELD, .. })
        ));

        form.age = "53".to_string();
        assert!(form.to_request().is_ok());
    }

    #[test]
    fn test_blank_fields_are_missing() {
        let mut form = valid_form();
        form.job_title = "   ".to_string();
        assert_eq!(
            form.to_request().unwrap_err(),
            InputError::Missing("Job Title")
        );

        let mut form = valid_form();
        form.age = String::new();
        assert_eq!(form.to_request().unwrap_err(), InputError::Missing(AGE_FIELD));
    }

    #[test]
    fn test_education_accepts_shorthands() {
        assert_eq!("phd".parse::<Education>().unwrap(), Education::Phd);
        assert_eq!("Bachelors".parse::<Education>().unwrap(), Education::Bachelors);
        assert_eq!(" master ".parse::<Education>().unwrap(), Education::Masters);
        assert_eq!(
            "Diploma".parse::<Education>().unwrap_err(),
            InputError::UnknownEducation("Diploma".to_string())
        );
    }

    #[test]
    fn test_unknown_gender_is_rejected() {
        assert_eq!(
            "other".parse::<Gender>().unwrap_err(),
            InputError::UnknownGender("other".to_string())
        );
    }
}
