//! Options for reference fields, built from fetched collections.

use super::field::ChoiceOption;
use crate::models::appointment::{Appointment, AppointmentStatus};
use crate::models::doctor::Doctor;

/// Which appointments an appointment-bound form may pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentPolicy {
    /// Diagnoses and medical procedures.
    AttendedOnly,
    /// Prescriptions.
    AttendedOrPending,
    /// Payments: anything not cancelled or missed.
    Billable,
}

impl AppointmentPolicy {
    pub fn allows(self, status: &AppointmentStatus) -> bool {
        match self {
            AppointmentPolicy::AttendedOnly => *status == AppointmentStatus::Attended,
            AppointmentPolicy::AttendedOrPending => matches!(
                status,
                AppointmentStatus::Attended | AppointmentStatus::Pending
            ),
            AppointmentPolicy::Billable => !matches!(
                status,
                AppointmentStatus::Cancelled | AppointmentStatus::NoShow
            ),
        }
    }
}

/// Options for the items passing `allowed`. When editing, the record's
/// current reference comes first even if it no longer passes the filter;
/// if it is missing from `items` altogether it is kept as a bare id.
pub fn selectable<T>(
    items: &[T],
    id_of: impl Fn(&T) -> u64,
    label_of: impl Fn(&T) -> String,
    allowed: impl Fn(&T) -> bool,
    current: Option<u64>,
) -> Vec<ChoiceOption> {
    let mut options = Vec::new();

    if let Some(current_id) = current {
        let label = items
            .iter()
            .find(|item| id_of(*item) == current_id)
            .map(&label_of)
            .unwrap_or_else(|| format!("#{current_id}"));
        options.push(ChoiceOption::new(current_id.to_string(), label));
    }

    options.extend(
        items
            .iter()
            .filter(|item| Some(id_of(*item)) != current && allowed(*item))
            .map(|item| ChoiceOption::new(id_of(item).to_string(), label_of(item))),
    );
    options
}

pub fn all_of<T>(
    items: &[T],
    id_of: impl Fn(&T) -> u64,
    label_of: impl Fn(&T) -> String,
) -> Vec<ChoiceOption> {
    selectable(items, id_of, label_of, |_| true, None)
}

pub fn appointment_choices(
    appointments: &[Appointment],
    policy: AppointmentPolicy,
    current: Option<u64>,
) -> Vec<ChoiceOption> {
    selectable(
        appointments,
        |a| a.id,
        Appointment::choice_label,
        |a| policy.allows(&a.status),
        current,
    )
}

/// Active doctors, plus the currently assigned one when editing.
pub fn doctor_choices(doctors: &[Doctor], current: Option<u64>) -> Vec<ChoiceOption> {
    selectable(
        doctors,
        |d| d.id,
        |d| format!("{} - {}", d.display_name(), d.specialty_label()),
        Doctor::is_active,
        current,
    )
}
