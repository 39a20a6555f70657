pub mod scan_commands;
pub mod wine_registry_commands;
