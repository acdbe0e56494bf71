//! Onboarding wizard. Collects the company profile before chat starts.
//!
//! The wizard is a small linear state machine: company name, sector,
//! status, and (for established companies) the founding date. Its state is
//! a plain value owned by the session; `wizard::transition` is the only
//! thing that moves it forward.

pub mod model;
pub mod prompts;
pub mod routes;
pub mod state;
pub mod view;
pub mod wizard;

pub use model::{CompanyProfile, CompanyStatus};
pub use routes::onboarding_routes;
pub use state::{HistoryEntry, Speaker, WizardState, WizardStep};
pub use view::{Prompt, WizardView};
pub use wizard::{Outcome, Transition, WizardError, transition};
