use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::types::OutputFormat;
use crate::jobs::OrganizeMode;

#[derive(Parser)]
#[command(name = "media_organizer")]
#[command(about = "A tool for organizing, deduplicating and sanitizing media folders")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Count images, videos and other files and report total size
    Analyze {
        /// Target directory to analyze
        root: PathBuf,
    },

    /// Move files into date-based folders derived from capture date
    Organize {
        /// Target directory to organize
        root: PathBuf,

        /// Folder granularity
        #[arg(short, long, default_value = "by-month")]
        mode: OrganizeMode,

        /// What to do when the destination file already exists
        #[arg(long, default_value = "copy with suffix")]
        on_conflict: String,
    },

    /// Find duplicate files by content and quarantine the extra copies
    Cleanup {
        /// Target directory to scan
        root: PathBuf,

        /// What to do when the destination file already exists
        #[arg(long, default_value = "copy with suffix")]
        on_conflict: String,
    },

    /// Convert images to another format
    Convert {
        /// Target directory to scan
        root: PathBuf,

        /// Output image format
        #[arg(short, long, default_value = "jpeg")]
        format: OutputFormat,

        /// Destination directory for converted files
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// What to do when the destination file already exists
        #[arg(long, default_value = "copy with suffix")]
        on_conflict: String,
    },

    /// Strip embedded metadata from images
    Privacy {
        /// Target directory to scan
        root: PathBuf,

        /// Destination directory for cleaned files
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// What to do when the destination file already exists
        /// ("overwrite" cleans files in place)
        #[arg(long, default_value = "copy with suffix")]
        on_conflict: String,
    },

    /// Repair damaged images using the restoration backend
    Repair {
        /// Target directory to scan
        root: PathBuf,

        /// Destination directory for repaired files
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// What to do when the destination file already exists
        #[arg(long, default_value = "copy with suffix")]
        on_conflict: String,
    },

    /// Rename files in a directory using a pattern
    Rename {
        /// Target directory
        root: PathBuf,

        /// Name pattern ({date}, {name}, {ext}, {counter}, {time})
        #[arg(short, long, default_value = "{date}_{counter}{ext}")]
        pattern: String,

        /// First counter value
        #[arg(long, default_value = "1")]
        start: usize,
    },
}
