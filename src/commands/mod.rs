pub mod file_commands;
pub mod record_commands;
pub mod search_commands;
