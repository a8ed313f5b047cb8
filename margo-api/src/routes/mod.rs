/// API route handlers
///
/// Organized by resource:
///
/// - `health`: store health check
/// - `growth_plans`, `tactics`: owner-scoped create and list
/// - `campaigns`: campaign CRUD, project generation and cascade deletion
/// - `projects`: generated projects and their tasks
/// - `onboarding`: welcome email and marketing list signup

pub mod campaigns;
pub mod growth_plans;
pub mod health;
pub mod onboarding;
pub mod projects;
pub mod tactics;
