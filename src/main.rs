use anyhow::Result;
use std::process;
use log::error;
use gspots::{app, cli, hotspot::HotspotError, logging};

fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("Application panicked: {:?}", panic_info);
        eprintln!("Panic: {:?}", panic_info);
        process::exit(101);
    }));

    if let Err(e) = run() {
        // Hotspot errors are user-facing; keep the log quiet for them
        if e.downcast_ref::<HotspotError>().is_some() {
            eprintln!("{}", e);
        } else {
            error!("Application error: {:#}", e);
            eprintln!("Error: {:#}", e);
        }

        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = cli::args::parse_args();

    cli::args::validate_args(&args)?;

    let config_manager = app::load_configuration(&args)?;

    let log_config = app::configure_logging(&args, &config_manager)?;
    logging::init_logger(log_config)?;

    let settings = app::build_run_settings(&args, &config_manager)?;
    let colour_manager = app::create_colour_manager(&args, &config_manager);
    let repo_path = app::resolve_repository_path(args.repository_path())?;

    // Single current_thread runtime; the analysis itself runs on the blocking pool
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(app::run_analysis(repo_path, settings, colour_manager))
}
