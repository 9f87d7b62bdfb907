use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{ResumeError, Result};

/// Point-in-time mapping of form field names to their string values.
///
/// Insertion order follows the document order of the form controls. Values are
/// always plain strings, so the JSON form round-trips to an equal mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormSnapshot {
    fields: IndexMap<String, String>,
}

impl FormSnapshot {
    /// Key of the single local slot the autosave writes to
    pub const STORAGE_KEY: &'static str = "resumeData";

    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a field. An existing name keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Value of `name`, or the empty string when the field is absent
    pub fn value_or_empty(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| ResumeError::CorruptSnapshot {
            key: Self::STORAGE_KEY.to_string(),
            source,
        })
    }
}

impl<K, V> FromIterator<(K, V)> for FormSnapshot
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut snapshot = FormSnapshot::new();
        for (name, value) in iter {
            snapshot.insert(name, value);
        }
        snapshot
    }
}

/// Rendering strategy for the preview pane
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TemplateVariant {
    Template1,
    Template2,
    Template3,
    /// A tag with no renderer; previews as nothing
    Unknown(String),
}

impl TemplateVariant {
    /// Variants that have a renderer, in selector order
    pub fn defined() -> [TemplateVariant; 3] {
        [
            TemplateVariant::Template1,
            TemplateVariant::Template2,
            TemplateVariant::Template3,
        ]
    }

    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            "template1" => TemplateVariant::Template1,
            "template2" => TemplateVariant::Template2,
            "template3" => TemplateVariant::Template3,
            other => TemplateVariant::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TemplateVariant::Template1 => "template1",
            TemplateVariant::Template2 => "template2",
            TemplateVariant::Template3 => "template3",
            TemplateVariant::Unknown(tag) => tag,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            TemplateVariant::Template1 => "Classic",
            TemplateVariant::Template2 => "Sectioned",
            TemplateVariant::Template3 => "Compact",
            TemplateVariant::Unknown(_) => "Unknown",
        }
    }
}

impl fmt::Display for TemplateVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of one resume form control
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
    /// Typeahead candidates; empty when the field has no suggester
    pub candidates: &'static [&'static str],
}

const SKILLS: &[&str] = &["JavaScript", "HTML", "CSS", "Python", "Java", "React"];

/// Resume form controls in document order
pub const RESUME_FIELDS: &[FieldSpec] = &[
    FieldSpec { name: "full_name", label: "Full Name", placeholder: "e.g., Ada Lovelace", candidates: &[] },
    FieldSpec { name: "email", label: "Email", placeholder: "you@example.com", candidates: &[] },
    FieldSpec { name: "phone", label: "Phone", placeholder: "+1 555 0100", candidates: &[] },
    FieldSpec { name: "education", label: "Education", placeholder: "Summary of your education", candidates: &[] },
    FieldSpec {
        name: "education_degree",
        label: "Degree",
        placeholder: "e.g., Bachelor of Science",
        candidates: &[
            "Bachelor of Science",
            "Master of Arts",
            "Doctor of Philosophy",
            "Associate Degree",
            "Professional Certificate",
        ],
    },
    FieldSpec {
        name: "education_major",
        label: "Major",
        placeholder: "e.g., Computer Science",
        candidates: &[
            "Computer Science",
            "Psychology",
            "Business Administration",
            "Engineering",
            "English Literature",
        ],
    },
    FieldSpec {
        name: "education_school",
        label: "School / University",
        placeholder: "e.g., Stanford University",
        candidates: &[
            "Harvard University",
            "Stanford University",
            "Massachusetts Institute of Technology",
            "University of California, Berkeley",
            "Yale University",
        ],
    },
    FieldSpec {
        name: "education_year",
        label: "Year of Graduation",
        placeholder: "e.g., 2024",
        candidates: &["2022", "2023", "2024", "2025", "2026"],
    },
    FieldSpec { name: "work_experience", label: "Experience", placeholder: "Summary of your experience", candidates: &[] },
    FieldSpec {
        name: "work_position",
        label: "Position",
        placeholder: "e.g., Software Engineer",
        candidates: &[
            "Software Engineer",
            "Web Developer",
            "Data Analyst",
            "Project Manager",
            "UI/UX Designer",
        ],
    },
    FieldSpec {
        name: "work_company",
        label: "Company",
        placeholder: "e.g., Company A",
        candidates: &["Company A", "Company B", "Company C", "Company D", "Company E"],
    },
    FieldSpec {
        name: "work_duration",
        label: "Duration",
        placeholder: "e.g., 2 years",
        candidates: &["1 year", "2 years", "3 years", "4 years", "5 years"],
    },
    FieldSpec { name: "skill1", label: "Skill 1", placeholder: "e.g., Python", candidates: SKILLS },
    FieldSpec { name: "skill2", label: "Skill 2", placeholder: "e.g., React", candidates: SKILLS },
    FieldSpec { name: "skill3", label: "Skill 3", placeholder: "e.g., CSS", candidates: SKILLS },
];

pub fn field_spec(name: &str) -> Option<&'static FieldSpec> {
    RESUME_FIELDS.iter().find(|spec| spec.name == name)
}
