use anyhow::Result;
use std::sync::Arc;
use uprl_core::{
    spawn_batch, BatchConfig, BatchEvent, BatchJob, BatchProcessor, FailureLog, FileOutcome,
};

mod cli;

fn main() -> Result<()> {
    // Refuse to run as root for security
    #[cfg(unix)]
    {
        if unsafe { libc::geteuid() } == 0 {
            eprintln!("ERROR: uprl refuses to run as root for security reasons.");
            eprintln!("Running as root could accidentally rewrite files in system directories.");
            eprintln!("Please run as a regular user.");
            std::process::exit(1);
        }
    }

    let args = cli::parse_args();

    // Initialize logger with appropriate level based on verbose flag
    if std::env::var("RUST_LOG").is_err() {
        if args.verbose {
            std::env::set_var("RUST_LOG", "debug");
        } else {
            std::env::set_var("RUST_LOG", "info");
        }
    }
    env_logger::init();

    let config = BatchConfig {
        recurse_subdirectories: !args.no_recurse, // Inverted: recursion is default, no_recurse opts out
        backup_files: args.backup,
        dry_run: args.dry_run,
        skip_hidden: args.skip_hidden,
        ..BatchConfig::default()
    };

    let mut job = BatchJob::new(config);
    job.add_paths(args.directories.iter().cloned());

    if job.directory_count() == 0 {
        anyhow::bail!("None of the given paths is a directory. Use --help for usage information.");
    }

    let processor = Arc::new(BatchProcessor::with_http(FailureLog::new(&args.error_log))?);
    let handle = spawn_batch(processor, job);

    for event in handle.events() {
        if args.json {
            continue;
        }
        match event {
            BatchEvent::Started { directories, total } => {
                println!("Found {} .url files in {} directories", total, directories);
            }
            BatchEvent::DirectorySkipped(skipped) => {
                eprintln!("✗ {}: {}", skipped.directory.display(), skipped.message);
            }
            BatchEvent::FileProcessed { outcome, .. } => match outcome {
                FileOutcome::Renamed { source, target, .. } => {
                    println!("✓ {} -> {}", source.display(), target.display());
                }
                FileOutcome::Failed { path, failure } => {
                    eprintln!("✗ {} ({}): {}", path.display(), failure.kind(), failure);
                }
            },
            BatchEvent::Finished(_) => {}
        }
    }

    let (job, summary) = handle.join()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "\nDirectories: {}  Processed: {}/{}  Failed: {}",
            job.directory_count(),
            summary.processed,
            summary.total,
            summary.failed
        );
        if summary.failed > 0 {
            println!("Failures were appended to {}", args.error_log.display());
        }
    }

    Ok(())
}
