use super::appointment::AppointmentContext;
use super::dates::display_date;
use super::recipe_detail::RecipeDetail;
use super::AppointmentSummary;
use crate::api::client::Entity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    pub id: u64,
    pub prescription_date: String,
    pub appointment_id: u64,
    #[serde(default)]
    pub appointment: Option<AppointmentSummary>,
    #[serde(default)]
    pub recipe_details: Option<Vec<RecipeDetail>>,
}

impl Prescription {
    pub fn context(&self) -> AppointmentContext<'_> {
        AppointmentContext {
            appointment_id: self.appointment_id,
            appointment: self.appointment.as_ref(),
            patient: None,
            doctor: None,
        }
    }

    pub fn lines(&self) -> &[RecipeDetail] {
        self.recipe_details.as_deref().unwrap_or_default()
    }

    pub fn has_medicines(&self) -> bool {
        !self.lines().is_empty()
    }

    pub fn medicines_count(&self) -> usize {
        self.lines().len()
    }

    /// `#5 - Luis Mora - 01/03/2025`
    pub fn choice_label(&self) -> String {
        format!(
            "#{} - {} - {}",
            self.id,
            self.context().patient_name(),
            display_date(&self.prescription_date)
        )
    }
}

impl Entity for Prescription {
    const COLLECTION: &'static str = "prescriptions";

    fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PrescriptionPayload {
    pub prescription_date: String,
    pub appointment_id: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn prescription(value: serde_json::Value) -> Prescription {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn absent_or_empty_details_mean_no_medicines() {
        let absent = prescription(json!({
            "id": 1, "prescription_date": "2025-03-01", "appointment_id": 4
        }));
        let empty = prescription(json!({
            "id": 2, "prescription_date": "2025-03-01", "appointment_id": 4,
            "recipe_details": []
        }));

        for p in [&absent, &empty] {
            assert!(!p.has_medicines());
            assert_eq!(p.medicines_count(), 0);
        }
    }

    #[test]
    fn counts_embedded_lines() {
        let p = prescription(json!({
            "id": 1, "prescription_date": "2025-03-01", "appointment_id": 4,
            "recipe_details": [
                {"id": 1, "amount": 2, "indications": "Cada 8 horas", "prescription_id": 1,
                 "medicine_id": 3, "medicine": {"id": 3, "name": "Ibuprofeno",
                 "presentation": "Tableta", "dose": "400 mg"}},
                {"id": 2, "amount": 1, "indications": "En ayunas", "prescription_id": 1,
                 "medicine_id": 8}
            ]
        }));

        assert!(p.has_medicines());
        assert_eq!(p.medicines_count(), 2);
        assert_eq!(p.lines()[0].medicine_name(), "Ibuprofeno");
        assert_eq!(p.lines()[1].medicine_name(), "Medicine #8");
        assert_eq!(p.choice_label(), "#1 - Appointment #4 - 01/03/2025");
    }
}
