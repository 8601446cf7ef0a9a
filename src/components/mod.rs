//! UI Components
//!
//! Screens and app chrome built on leptos-forge.

mod appointments_screen;
mod billing_screen;
mod log_panel;
mod patients_screen;
mod pharmacy_screen;
mod register_patient;
mod section_tab_bar;

pub use appointments_screen::AppointmentsScreen;
pub use billing_screen::BillingScreen;
pub use log_panel::LogPanel;
pub use patients_screen::PatientsScreen;
pub use pharmacy_screen::PharmacyScreen;
pub use register_patient::RegisterPatientWizard;
pub use section_tab_bar::SectionTabBar;
