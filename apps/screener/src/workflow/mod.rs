// Screening workflow: stage machine, staging buffer, and the orchestrator that
// sequences upload → match against the screening service.

pub mod orchestrator;
pub mod stage;
pub mod staging;
