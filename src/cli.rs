use crate::error::{MarksheetError, Result};
use crate::export::{self, sheet, ExportFormat};
use crate::interactive;
use crate::source::{self, ChromeBookmarks};
use crate::state::{KvStore, SessionState};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a Chromium-format Bookmarks file (skips profile detection)
    #[arg(long)]
    pub bookmarks: Option<PathBuf>,

    /// Pick a detected browser profile by name, e.g. "chrome" or "Profile 2"
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Disable color output
    #[arg(long)]
    pub nc: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Browse the folder tree interactively and export from it (default)
    Browse,

    /// One-shot export of a folder's links
    Export {
        /// Output format: csv or xlsx
        format: String,

        /// Id of the folder to export (shown by `i <row>` in browse mode)
        #[arg(long)]
        folder: Option<String>,

        /// Output file path (default: timestamped name in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List detected browser profiles
    Sources,
}

pub fn handle_args(args: Cli) -> Result<()> {
    match args.command {
        Some(Commands::Sources) => {
            let profiles = source::detect_profiles();
            if profiles.is_empty() {
                eprintln!("No browser profiles with a Bookmarks file detected.");
            } else {
                eprintln!("Detected browser profiles:");
                for profile in profiles {
                    eprintln!("  • {}", profile.display_string());
                }
            }
            Ok(())
        }
        Some(Commands::Export {
            ref format,
            ref folder,
            ref output,
        }) => {
            let format = ExportFormat::from_string(format)
                .ok_or_else(|| format!("Unsupported export format: {}", format))?;
            let source = load_source(&args)?;

            let encoder = sheet::default_encoder();
            let payload = export::build_export(
                &source,
                folder.as_deref(),
                format,
                encoder.as_deref(),
            )?;
            let path = export::write_payload(&payload, output.as_deref())?;
            eprintln!(
                "✓ Exported {} bookmark(s) to {}",
                payload.row_count,
                path.display()
            );
            Ok(())
        }
        Some(Commands::Browse) | None => {
            let source = load_source(&args)?;
            let mut state = SessionState::load(KvStore::open_default());
            interactive::run(&source, &mut state, args.nc)
        }
    }
}

/// Resolve the Bookmarks file to read: explicit path, then profile match,
/// then the first detected profile
fn load_source(args: &Cli) -> Result<ChromeBookmarks> {
    let path = if let Some(path) = &args.bookmarks {
        path.clone()
    } else {
        let profiles = source::detect_profiles();
        let profile = match &args.profile {
            Some(wanted) => {
                let needle = wanted.to_lowercase();
                profiles
                    .into_iter()
                    .find(|p| p.display_string().to_lowercase().contains(&needle))
                    .ok_or_else(|| {
                        MarksheetError::Source(format!(
                            "No detected profile matches '{}'. Try `marksheet sources`.",
                            wanted
                        ))
                    })?
            }
            None => profiles.into_iter().next().ok_or_else(|| {
                MarksheetError::Source(
                    "No browser profile with a Bookmarks file was detected; \
                     pass --bookmarks <path>."
                        .to_string(),
                )
            })?,
        };
        eprintln!("Reading bookmarks from {}", profile.display_string());
        profile.path
    };

    ChromeBookmarks::load(&path)
}
