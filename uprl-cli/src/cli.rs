use clap::Parser;
use std::path::PathBuf;

/// Renames internet shortcut (.url) files after the title of the page they link to
#[derive(Parser, Debug)]
#[command(name = "uprl")]
#[command(author, version)]
#[command(about = "Renames .url shortcut files after the HTML title of their target page", long_about = None)]
pub struct Args {
    /// Directories to scan for .url files (non-directories are ignored)
    #[arg(value_name = "DIRECTORY", required = true)]
    pub directories: Vec<PathBuf>,

    /// Only scan the top level of each directory
    #[arg(long = "no-recurse")]
    pub no_recurse: bool,

    /// Move originals into an UpRL-backup folder before writing renamed copies
    #[arg(short = 'b', long = "backup")]
    pub backup: bool,

    /// Run in dry-run mode (preview changes without renaming)
    #[arg(short = 'n', long = "dry-run")]
    pub dry_run: bool,

    /// Skip hidden files and directories
    #[arg(short = 's', long = "skip-hidden")]
    pub skip_hidden: bool,

    /// File that failures are appended to
    #[arg(long = "error-log", value_name = "PATH", default_value = uprl_core::DEFAULT_FAILURE_LOG)]
    pub error_log: PathBuf,

    /// Print the final summary as JSON
    #[arg(long = "json")]
    pub json: bool,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Parses command-line arguments
pub fn parse_args() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["uprl", "links"]).unwrap();
        assert_eq!(args.directories, vec![PathBuf::from("links")]);
        assert!(!args.no_recurse);
        assert!(!args.backup);
        assert!(!args.dry_run);
        assert_eq!(args.error_log, PathBuf::from("UpRL-ErrorLog.txt"));
    }

    #[test]
    fn test_flags() {
        let args = Args::try_parse_from([
            "uprl", "-b", "-n", "--no-recurse", "--error-log", "errs.txt", "a", "b",
        ])
        .unwrap();
        assert!(args.backup);
        assert!(args.dry_run);
        assert!(args.no_recurse);
        assert_eq!(args.error_log, PathBuf::from("errs.txt"));
        assert_eq!(args.directories.len(), 2);
    }

    #[test]
    fn test_directory_required() {
        assert!(Args::try_parse_from(["uprl"]).is_err());
    }
}
