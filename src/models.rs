pub mod admin;
pub mod budgets;
pub mod catalog;
pub mod clients;
pub mod documents;
pub mod finance;
pub mod fleet;
pub mod hr;
pub mod jobs;
pub mod leads;
pub mod travel;
