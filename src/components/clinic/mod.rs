//! Per-entity configuration of the generic list and form screens.

use crate::api::client::{Entity, ResourceClient};
use crate::api::clinic::Clinic;
use crate::api::ApiResult;
use crate::app::{Page, ResourceKind, Route};
use crate::components::form::FormView;
use crate::components::list::ListView;
use crate::components::Component;
use crate::config::Config;
use crate::forms::field::{ChoiceOption, FieldSpec};
use crate::forms::{FormMode, FormState, FormValues};
use crate::models::appointment::Appointment;
use crate::models::diagnosis::Diagnosis;
use crate::models::doctor::Doctor;
use crate::models::medicine::Medicine;
use crate::models::patient::Patient;
use crate::models::payment::Payment;
use crate::models::prescription::Prescription;
use crate::models::procedure::MedicalProcedure;
use crate::models::recipe_detail::RecipeDetail;
use crate::models::specialty::Specialty;
use crate::models::Badge;
use ratatui::layout::Constraint;
use std::sync::Arc;

pub mod appointments;
pub mod diagnoses;
pub mod doctors;
pub mod medicines;
pub mod patients;
pub mod payments;
pub mod prescriptions;
pub mod procedures;
pub mod recipe_details;
pub mod specialties;

/// A table cell; badge cells are coloured by their classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellText {
    pub text: String,
    pub badge: Option<Badge>,
}

impl CellText {
    pub fn badge(text: impl Into<String>, badge: Badge) -> Self {
        Self {
            text: text.into(),
            badge: Some(badge),
        }
    }
}

impl From<String> for CellText {
    fn from(text: String) -> Self {
        Self { text, badge: None }
    }
}

impl From<&str> for CellText {
    fn from(text: &str) -> Self {
        text.to_string().into()
    }
}

/// Result of an entity-specific list key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListOutcome {
    Navigate(Route),
    Done(String),
    Failed(String),
}

/// Everything the generic screens need to know about one entity.
pub trait ResourceScreen: Entity {
    const KIND: ResourceKind;
    /// Upper-case screen title, e.g. `DOCTORS`.
    const TITLE: &'static str;
    /// Lower-case singular used in messages, e.g. `doctor`.
    const SINGULAR: &'static str;

    fn client(clinic: &Clinic) -> &ResourceClient<Self>;

    fn columns() -> Vec<(&'static str, Constraint)>;

    fn cells(&self) -> Vec<CellText>;

    /// Label/value pairs for the details pane.
    fn details(&self) -> Vec<(String, String)>;

    fn delete_prompt(&self) -> String {
        format!("Delete {} #{}?", Self::SINGULAR, self.id())
    }

    fn form_fields(mode: FormMode) -> Vec<FieldSpec>;

    /// Copies a fetched record into the form (edit mode).
    fn prefill(&self, form: &mut FormState);

    /// Fetches reference collections and installs choice options.
    /// `current` is the record being edited.
    fn load_references(
        _clinic: &Clinic,
        _form: &mut FormState,
        _current: Option<&Self>,
    ) -> ApiResult<()> {
        Ok(())
    }

    fn submit(clinic: &Clinic, mode: FormMode, values: &FormValues) -> ApiResult<()>;

    /// Extra list keys as `(key, description)` for the help line.
    fn list_keys() -> &'static [(char, &'static str)] {
        &[]
    }

    fn list_action(_clinic: &Clinic, _record: &Self, _key: char) -> Option<ListOutcome> {
        None
    }

    /// Caches of other entities that embed this one.
    fn after_mutation(_clinic: &Clinic) {}
}

/// Sends a create or update depending on the form mode.
pub fn save<E: Entity, P: serde::Serialize>(
    client: &ResourceClient<E>,
    mode: FormMode,
    payload: &P,
) -> ApiResult<()> {
    match mode {
        FormMode::Create => client.create(payload).map(|_| ()),
        FormMode::Edit(id) => client.update(id, payload).map(|_| ()),
    }
}

/// Choice options for a closed set of wire values.
pub fn enum_options(pairs: Vec<(&'static str, &'static str)>) -> Vec<ChoiceOption> {
    pairs
        .into_iter()
        .map(|(value, label)| ChoiceOption::new(value, label))
        .collect()
}

/// Runs two reference fetches in parallel.
pub fn fetch_both<A, B>(
    first: impl FnOnce() -> ApiResult<A> + Send,
    second: impl FnOnce() -> ApiResult<B> + Send,
) -> (ApiResult<A>, ApiResult<B>)
where
    A: Send,
    B: Send,
{
    std::thread::scope(|scope| {
        let handle = scope.spawn(second);
        let first = first();
        let second = handle.join().unwrap_or_else(|_| {
            Err(crate::api::ApiError::Transport("fetch thread panicked".into()))
        });
        (first, second)
    })
}

fn screen<E: ResourceScreen>(
    page: &Page,
    clinic: Arc<Clinic>,
    config: &Config,
) -> Box<dyn Component> {
    match page {
        Page::List => Box::new(ListView::<E>::new(clinic, config)),
        Page::Create { preset } => Box::new(FormView::<E>::new(
            clinic,
            config,
            FormMode::Create,
            preset.clone(),
        )),
        Page::Edit(id) => Box::new(FormView::<E>::new(
            clinic,
            config,
            FormMode::Edit(*id),
            Vec::new(),
        )),
    }
}

/// Builds the screen for `route`.
pub fn build(route: &Route, clinic: Arc<Clinic>, config: &Config) -> Box<dyn Component> {
    match route.kind {
        ResourceKind::Specialties => screen::<Specialty>(&route.page, clinic, config),
        ResourceKind::Doctors => screen::<Doctor>(&route.page, clinic, config),
        ResourceKind::Patients => screen::<Patient>(&route.page, clinic, config),
        ResourceKind::Appointments => screen::<Appointment>(&route.page, clinic, config),
        ResourceKind::Medicines => screen::<Medicine>(&route.page, clinic, config),
        ResourceKind::Prescriptions => screen::<Prescription>(&route.page, clinic, config),
        ResourceKind::RecipeDetails => screen::<RecipeDetail>(&route.page, clinic, config),
        ResourceKind::Diagnoses => screen::<Diagnosis>(&route.page, clinic, config),
        ResourceKind::Procedures => screen::<MedicalProcedure>(&route.page, clinic, config),
        ResourceKind::Payments => screen::<Payment>(&route.page, clinic, config),
    }
}
