//! Data models for the clinic backend.
//!
//! Records mirror the JSON the backend returns. Foreign keys always arrive
//! as ids; the nested objects next to them are optional and are combined
//! into a [`Linked`] value for display.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declares a closed set of wire values with an `Other` fallback.
///
/// Unknown values are kept verbatim so that server data is displayed rather
/// than rejected.
macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => ($wire:literal, $label:literal, $badge:ident)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum $name {
            $($variant,)+
            /// A value outside the known set.
            Other(String),
        }

        impl $name {
            pub fn from_wire(value: &str) -> Self {
                match value {
                    $($wire => $name::$variant,)+
                    other => $name::Other(other.to_string()),
                }
            }

            pub fn as_wire(&self) -> &str {
                match self {
                    $($name::$variant => $wire,)+
                    $name::Other(raw) => raw.as_str(),
                }
            }

            pub fn label(&self) -> &str {
                match self {
                    $($name::$variant => $label,)+
                    $name::Other(raw) => raw.as_str(),
                }
            }

            pub fn badge(&self) -> $crate::models::Badge {
                match self {
                    $($name::$variant => $crate::models::Badge::$badge,)+
                    $name::Other(_) => $crate::models::Badge::Neutral,
                }
            }

            /// `(wire, label)` of every known value.
            pub fn pairs() -> Vec<(&'static str, &'static str)> {
                vec![$(($wire, $label)),+]
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_wire())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
                Ok($name::from_wire(&raw))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

pub mod appointment;
pub mod dates;
pub mod diagnosis;
pub mod doctor;
pub mod medicine;
pub mod money;
pub mod patient;
pub mod payment;
pub mod prescription;
pub mod procedure;
pub mod recipe_detail;
pub mod specialty;

/// Visual classification of a status value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Success,
    Warning,
    Danger,
    Info,
    Neutral,
}

closed_enum! {
    /// Status shared by doctors and patients.
    pub enum ActiveStatus {
        Active => ("ACTIVE", "Active", Success),
        Inactive => ("INACTIVE", "Inactive", Danger),
    }
}

/// A foreign key, optionally hydrated with the related record.
#[derive(Debug, Clone, PartialEq)]
pub enum Linked<T> {
    Full(T),
    IdOnly(u64),
}

impl<T> Linked<T> {
    pub fn from_parts(id: u64, nested: Option<T>) -> Self {
        match nested {
            Some(record) => Linked::Full(record),
            None => Linked::IdOnly(id),
        }
    }

    /// Display name of the related record, or `"<kind> #<id>"` when the
    /// backend did not embed it.
    pub fn label(&self, kind: &str, describe: impl Fn(&T) -> String) -> String {
        match self {
            Linked::Full(record) => describe(record),
            Linked::IdOnly(id) => format!("{kind} #{id}"),
        }
    }

    pub fn full(&self) -> Option<&T> {
        match self {
            Linked::Full(record) => Some(record),
            Linked::IdOnly(_) => None,
        }
    }
}

pub fn full_name(name: &str, last_name: &str) -> String {
    format!("{} {}", name.trim(), last_name.trim()).trim().to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonSummary {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    pub last_name: String,
}

impl PersonSummary {
    pub fn full_name(&self) -> String {
        full_name(&self.name, &self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialtySummary {
    #[serde(default)]
    pub id: u64,
    pub specialtyname: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorSummary {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    pub last_name: String,
    #[serde(default)]
    pub specialty: Option<SpecialtySummary>,
}

impl DoctorSummary {
    pub fn display_name(&self) -> String {
        format!("Dr. {}", full_name(&self.name, &self.last_name))
    }

    pub fn specialty_name(&self) -> &str {
        self.specialty
            .as_ref()
            .map(|s| s.specialtyname.as_str())
            .unwrap_or(NOT_SPECIFIED)
    }
}

/// Appointment as embedded in prescriptions, diagnoses and procedures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentSummary {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub appointment_date: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub patient_id: Option<u64>,
    #[serde(default)]
    pub doctor_id: Option<u64>,
    pub status: appointment::AppointmentStatus,
    #[serde(default)]
    pub patient: Option<PersonSummary>,
    #[serde(default)]
    pub doctor: Option<DoctorSummary>,
}

pub const NOT_SPECIFIED: &str = "Not specified";

pub fn patient_label(link: &Linked<PersonSummary>) -> String {
    link.label("Patient", PersonSummary::full_name)
}

pub fn doctor_label(link: &Linked<DoctorSummary>) -> String {
    link.label("Doctor", DoctorSummary::display_name)
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Badge::Success => "success",
            Badge::Warning => "warning",
            Badge::Danger => "danger",
            Badge::Info => "info",
            Badge::Neutral => "neutral",
        };
        f.write_str(name)
    }
}
