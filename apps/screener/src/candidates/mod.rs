// Candidate Collection: the evaluated candidates returned by a match, how they
// are ranked and summarised, and the delete/clear operations that keep them in
// step with the screening service.

pub mod collection;
pub mod manager;
pub mod models;
pub mod stats;
