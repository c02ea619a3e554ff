pub mod commands;
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    api_config_from_args, exclusions_from_args, format_project_list, format_run_summary,
    report_settings_from_args,
};

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
