/// Campaign planning
///
/// The core of Margo: partitioning a campaign's date range into periods,
/// generating projects and tasks for those periods, and deleting a campaign
/// together with (or apart from) what was generated.
///
/// All operations take the data store as an explicit `&dyn DataStore` and
/// await its calls one after another.

pub mod cascade;
pub mod error;
pub mod generator;
pub mod interval;

pub use cascade::{delete_campaign, CascadePolicy};
pub use error::PlanningError;
pub use generator::{generate_projects_for_campaign, GenerateProjects};
pub use interval::partition;
