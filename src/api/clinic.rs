//! Registry holding one resource client per clinic entity.

use super::client::ResourceClient;
use super::transport::{HttpTransport, Transport};
use super::ApiResult;
use crate::models::{
    appointment::Appointment, diagnosis::Diagnosis, doctor::Doctor, medicine::Medicine,
    patient::Patient, payment::Payment, prescription::Prescription, procedure::MedicalProcedure,
    recipe_detail::RecipeDetail, specialty::Specialty,
};
use std::sync::Arc;

/// Created once at startup and shared by every screen for the process
/// lifetime, so each entity has exactly one store.
pub struct Clinic {
    pub specialties: ResourceClient<Specialty>,
    pub doctors: ResourceClient<Doctor>,
    pub patients: ResourceClient<Patient>,
    pub appointments: ResourceClient<Appointment>,
    pub medicines: ResourceClient<Medicine>,
    pub prescriptions: ResourceClient<Prescription>,
    pub recipe_details: ResourceClient<RecipeDetail>,
    pub diagnoses: ResourceClient<Diagnosis>,
    pub procedures: ResourceClient<MedicalProcedure>,
    pub payments: ResourceClient<Payment>,
}

impl Clinic {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            specialties: ResourceClient::new(transport.clone()),
            doctors: ResourceClient::new(transport.clone()),
            patients: ResourceClient::new(transport.clone()),
            appointments: ResourceClient::new(transport.clone()),
            medicines: ResourceClient::new(transport.clone()),
            prescriptions: ResourceClient::new(transport.clone()),
            recipe_details: ResourceClient::new(transport.clone()),
            diagnoses: ResourceClient::new(transport.clone()),
            procedures: ResourceClient::new(transport.clone()),
            payments: ResourceClient::new(transport),
        }
    }

    /// Connects every client to the backend at `base_url` over HTTP.
    pub fn connect(base_url: &str) -> ApiResult<Self> {
        let transport = HttpTransport::new(base_url)?;
        tracing::info!(base_url = transport.base_url(), "backend configured");
        Ok(Self::new(Arc::new(transport)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockBackend;
    use serde_json::json;

    #[test]
    fn clients_share_one_transport() {
        let backend = MockBackend::new();
        backend.seed(
            "medicines",
            json!({"name": "Ibuprofeno", "presentation": "Tableta", "dose": "400 mg"}),
        );
        backend.seed("specialties", json!({"specialtyname": "Pediatría"}));
        let clinic = Clinic::new(backend.clone());

        assert_eq!(clinic.medicines.list_all().unwrap().len(), 1);
        assert_eq!(clinic.specialties.list_all().unwrap().len(), 1);
        assert_eq!(backend.request_count(), 2);
    }

    #[test]
    fn each_entity_has_its_own_store() {
        let backend = MockBackend::new();
        backend.seed(
            "medicines",
            json!({"name": "Ibuprofeno", "presentation": "Tableta", "dose": "400 mg"}),
        );
        let clinic = Clinic::new(backend);

        clinic.medicines.list_all().unwrap();

        assert_eq!(clinic.medicines.store().snapshot().len(), 1);
        assert!(clinic.specialties.store().snapshot().is_empty());
    }
}
