pub mod admin_repo;
pub use admin_repo::AdminRepository;
pub mod budgets_repo;
pub use budgets_repo::BudgetsRepository;
pub mod catalog_repo;
pub use catalog_repo::CatalogRepository;
pub mod clients_repo;
pub use clients_repo::ClientsRepository;
pub mod documents_repo;
pub use documents_repo::DocumentsRepository;
pub mod finance_repo;
pub use finance_repo::FinanceRepository;
pub mod fleet_repo;
pub use fleet_repo::FleetRepository;
pub mod hr_repo;
pub use hr_repo::HrRepository;
pub mod jobs_repo;
pub use jobs_repo::JobsRepository;
pub mod leads_repo;
pub use leads_repo::LeadsRepository;
pub mod travel_repo;
pub use travel_repo::TravelRepository;
