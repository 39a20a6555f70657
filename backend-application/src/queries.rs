pub mod analytics_queries;
pub mod dashboard_queries;
pub mod export_queries;
pub mod wine_registry_queries;
