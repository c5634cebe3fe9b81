//! The fixed agent-record schema.
//!
//! Every input row is resolved into an [`AgentRecord`] up front: each of the
//! sixteen known columns either carries the cell value or its documented
//! default literal. The renderer never sees a missing field.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default literal for fields without a more specific one.
pub const DATA_NOT_PROVIDED: &str = "[DATA NOT PROVIDED]";

/// One of the sixteen columns an agent roster is read by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgentField {
    Name,
    Looks,
    Anomaly,
    Reality,
    Competency,
    AnomalyContact,
    AgencyContact,
    PowerVisual,
    AnnualSalary,
    Coffee,
    Collaboration,
    WorkExperience,
    PrimaryContact,
    FirstConnection,
    SecondConnection,
    ThirdConnection,
}

impl AgentField {
    pub const ALL: [AgentField; 16] = [
        AgentField::Name,
        AgentField::Looks,
        AgentField::Anomaly,
        AgentField::Reality,
        AgentField::Competency,
        AgentField::AnomalyContact,
        AgentField::AgencyContact,
        AgentField::PowerVisual,
        AgentField::AnnualSalary,
        AgentField::Coffee,
        AgentField::Collaboration,
        AgentField::WorkExperience,
        AgentField::PrimaryContact,
        AgentField::FirstConnection,
        AgentField::SecondConnection,
        AgentField::ThirdConnection,
    ];

    /// Column header in the input file.
    pub fn column(&self) -> &'static str {
        match self {
            AgentField::Name => "Name",
            AgentField::Looks => "Looks",
            AgentField::Anomaly => "Anomaly",
            AgentField::Reality => "Reality",
            AgentField::Competency => "Competency",
            AgentField::AnomalyContact => "Anomaly_Contact",
            AgentField::AgencyContact => "Agency_Contact",
            AgentField::PowerVisual => "Power_Visual",
            AgentField::AnnualSalary => "Annual_Salary",
            AgentField::Coffee => "Coffee",
            AgentField::Collaboration => "Collaboration",
            AgentField::WorkExperience => "Work_Experience",
            AgentField::PrimaryContact => "Primary_Contact",
            AgentField::FirstConnection => "First_Connection",
            AgentField::SecondConnection => "Second_Connection",
            AgentField::ThirdConnection => "Third_Connection",
        }
    }

    /// Placeholder key used in templates, without braces (`anomaly_contact`).
    pub fn key(&self) -> &'static str {
        match self {
            AgentField::Name => "name",
            AgentField::Looks => "looks",
            AgentField::Anomaly => "anomaly",
            AgentField::Reality => "reality",
            AgentField::Competency => "competency",
            AgentField::AnomalyContact => "anomaly_contact",
            AgentField::AgencyContact => "agency_contact",
            AgentField::PowerVisual => "power_visual",
            AgentField::AnnualSalary => "annual_salary",
            AgentField::Coffee => "coffee",
            AgentField::Collaboration => "collaboration",
            AgentField::WorkExperience => "work_experience",
            AgentField::PrimaryContact => "primary_contact",
            AgentField::FirstConnection => "first_connection",
            AgentField::SecondConnection => "second_connection",
            AgentField::ThirdConnection => "third_connection",
        }
    }

    /// Literal substituted when the cell is absent or blank.
    pub fn default_value(&self) -> &'static str {
        match self {
            AgentField::Anomaly => "[ANOMALY TYPE]",
            AgentField::Reality => "[REALITY LEVEL]",
            AgentField::Competency => "[COMPETENCY LEVEL]",
            _ => DATA_NOT_PROVIDED,
        }
    }

    pub fn from_key(key: &str) -> Option<AgentField> {
        AgentField::ALL.into_iter().find(|f| f.key() == key)
    }
}

/// One agent's row, with defaults already applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRecord {
    /// 1-based position in the roster (header and blank rows not counted).
    pub row: usize,
    pub name: String,
    pub looks: String,
    pub anomaly: String,
    pub reality: String,
    pub competency: String,
    pub anomaly_contact: String,
    pub agency_contact: String,
    pub power_visual: String,
    pub annual_salary: String,
    pub coffee: String,
    pub collaboration: String,
    pub work_experience: String,
    pub primary_contact: String,
    pub first_connection: String,
    pub second_connection: String,
    pub third_connection: String,
    /// Fields that fell back to their default literal.
    pub defaulted: Vec<AgentField>,
}

impl AgentRecord {
    /// Resolve a raw `column → cell` row into a record.
    ///
    /// A cell counts as missing when the column is absent or the value is
    /// blank after trimming; the stored value itself is not trimmed.
    pub fn from_row(row: usize, cells: &HashMap<String, String>) -> Self {
        let mut defaulted = Vec::new();
        let mut resolve = |field: AgentField| -> String {
            match cells.get(field.column()) {
                Some(v) if !v.trim().is_empty() => v.clone(),
                _ => {
                    defaulted.push(field);
                    field.default_value().to_string()
                }
            }
        };

        Self {
            row,
            name: resolve(AgentField::Name),
            looks: resolve(AgentField::Looks),
            anomaly: resolve(AgentField::Anomaly),
            reality: resolve(AgentField::Reality),
            competency: resolve(AgentField::Competency),
            anomaly_contact: resolve(AgentField::AnomalyContact),
            agency_contact: resolve(AgentField::AgencyContact),
            power_visual: resolve(AgentField::PowerVisual),
            annual_salary: resolve(AgentField::AnnualSalary),
            coffee: resolve(AgentField::Coffee),
            collaboration: resolve(AgentField::Collaboration),
            work_experience: resolve(AgentField::WorkExperience),
            primary_contact: resolve(AgentField::PrimaryContact),
            first_connection: resolve(AgentField::FirstConnection),
            second_connection: resolve(AgentField::SecondConnection),
            third_connection: resolve(AgentField::ThirdConnection),
            defaulted,
        }
    }

    pub fn get(&self, field: AgentField) -> &str {
        match field {
            AgentField::Name => &self.name,
            AgentField::Looks => &self.looks,
            AgentField::Anomaly => &self.anomaly,
            AgentField::Reality => &self.reality,
            AgentField::Competency => &self.competency,
            AgentField::AnomalyContact => &self.anomaly_contact,
            AgentField::AgencyContact => &self.agency_contact,
            AgentField::PowerVisual => &self.power_visual,
            AgentField::AnnualSalary => &self.annual_salary,
            AgentField::Coffee => &self.coffee,
            AgentField::Collaboration => &self.collaboration,
            AgentField::WorkExperience => &self.work_experience,
            AgentField::PrimaryContact => &self.primary_contact,
            AgentField::FirstConnection => &self.first_connection,
            AgentField::SecondConnection => &self.second_connection,
            AgentField::ThirdConnection => &self.third_connection,
        }
    }

    pub fn is_defaulted(&self, field: AgentField) -> bool {
        self.defaulted.contains(&field)
    }

    /// The agent name, if the row actually supplied one.
    pub fn provided_name(&self) -> Option<&str> {
        if self.is_defaulted(AgentField::Name) {
            None
        } else {
            Some(&self.name)
        }
    }
}
