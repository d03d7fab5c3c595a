use anyhow::anyhow;
use time::macros::format_description;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Logs go to stderr so stdout only carries
/// the report. `RUST_LOG` takes precedence over `verbose`.
pub fn setup_logging(verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(LocalTime::new(format_description!(
            "[hour]:[minute]:[second].[subsecond digits:3]"
        )))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {e}"))
}

/// Number of workers to use, or `None` for a single-threaded scan.
pub fn resolve_workers(args: &crate::args::Args) -> Option<usize> {
    if args.parallel {
        let cpu_count = num_cpus::get();
        return Some(std::cmp::min(cpu_count, 8));
    }
    args.workers
}

pub fn validate_args(args: &crate::args::Args) -> anyhow::Result<()> {
    if args.path.as_os_str().is_empty() {
        anyhow::bail!("--path must not be empty");
    }

    if let Some(out) = &args.out {
        if out.as_os_str().is_empty() {
            anyhow::bail!("--out must not be empty");
        }
    }

    if let Some(workers) = args.workers {
        if workers == 0 {
            anyhow::bail!("--workers must be greater than 0");
        }
    }

    Ok(())
}
