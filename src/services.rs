pub mod alert_service;
pub mod badge_service;
pub mod dashboard_service;
pub mod document_service;
pub mod due_status;
pub mod maintenance_service;
pub mod quality_badge;
pub mod remote_rules;
pub mod revision_cache;
pub mod rule_provider;
pub mod vehicle_service;
