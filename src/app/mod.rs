//! Application orchestration module

pub mod initialization;
pub mod execution;
pub mod repository;

pub use repository::resolve_repository_path;
pub use initialization::{
    build_run_settings,
    configure_logging,
    create_colour_manager,
    load_configuration,
    RunSettings,
};
pub use execution::{analyze_repository, run_analysis};
