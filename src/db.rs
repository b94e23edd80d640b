pub mod stores;
pub use stores::{BadgeStore, DashboardStore, MaintenanceStore, RevisionCacheStore, VehicleStore};

pub mod vehicle_repo;
pub use vehicle_repo::VehicleRepository;
pub mod maintenance_repo;
pub use maintenance_repo::MaintenanceRepository;
pub mod badge_repo;
pub use badge_repo::BadgeRepository;
pub mod revision_repo;
pub use revision_repo::RevisionRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
