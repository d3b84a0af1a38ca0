//! CLI tool for segmenting and cleaning up song and deck text files.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use slides_core::{
    cleanup, resolve_alias, segment, CalendarDate, Catalog, PositionIndex, SegmentMode, Slide,
    SlideKind, Song, SongText,
};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Turn song and deck text into slides.
#[derive(Parser, Debug)]
#[command(name = "slides")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split a file into slides
    Segment {
        file: PathBuf,

        /// Emit labels as their own slides, followed by an end marker
        #[arg(short, long)]
        labels: bool,

        /// Print slides as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Rewrite a file keeping only what appears on slides
    Cleanup {
        file: PathBuf,

        /// Overwrite the file instead of printing the result
        #[arg(short, long)]
        write: bool,
    },

    /// Show the slide at a byte offset
    Locate {
        file: PathBuf,

        offset: usize,

        /// Use label-style segmentation
        #[arg(short, long)]
        labels: bool,
    },

    /// Print the header fields of a song document as JSON
    Header { file: PathBuf },

    /// Fuzzy search song titles across song documents
    Search {
        query: String,

        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Describe a date or resolve a deck alias such as "current" or "fri"
    Date {
        date: String,

        /// Reference day (default: today, UTC)
        #[arg(short, long)]
        today: Option<String>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    match args.command {
        Command::Segment { file, labels, json } => {
            let text = read_text(&file)?;
            let slides = segment(&text, mode(labels));
            if json {
                println!("{}", serde_json::to_string_pretty(&slides)?);
            } else {
                for (i, slide) in slides.iter().enumerate() {
                    print!("{}", describe_slide(i, slide));
                }
            }
        }
        Command::Cleanup { file, write } => {
            let text = read_text(&file)?;
            let cleaned = cleanup(&text);
            if write {
                write_output(&file, &cleaned)?;
                log::info!("Written to: {}", file.display());
            } else {
                print!("{}", cleaned);
            }
        }
        Command::Locate {
            file,
            offset,
            labels,
        } => {
            let text = read_text(&file)?;
            let slides = segment(&text, mode(labels));
            match PositionIndex::new(&slides).locate_index(offset) {
                Some(i) => print!("{}", describe_slide(i, &slides[i])),
                None => println!("no slide at offset {}", offset),
            }
        }
        Command::Header { file } => {
            let text = read_text(&file)?;
            let song = SongText::parse(&text);
            let out = serde_json::json!({
                "header": song.header(),
                "body_offset": song.body_offset(),
                "slides": song.slides().len(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Command::Search { query, files } => {
            let mut songs = Vec::with_capacity(files.len());
            for (i, file) in files.iter().enumerate() {
                let text = read_text(file)?;
                songs.push(Song::from_document(Some(i as u64 + 1), &text));
            }

            let mut catalog = Catalog::new();
            let snapshot = catalog.refresh(songs, Vec::new());
            for found in snapshot.search(&query) {
                let path = found
                    .song
                    .id
                    .and_then(|id| files.get(id as usize - 1))
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                println!("{:>3}  {}  ({})", found.score, found.song.title, path);
            }
        }
        Command::Date { date, today } => {
            let today = match today {
                Some(day) => CalendarDate::parse(&day)
                    .with_context(|| format!("Invalid --today value: {}", day))?,
                None => CalendarDate::today(),
            };
            let resolved = resolve_alias(&date, today);
            let day = CalendarDate::parse(&resolved)
                .with_context(|| format!("Not a date or alias: {}", date))?;

            println!(
                "{}  {}, week {}, {}",
                day,
                day.weekday().name(),
                day.iso_week(),
                day.fuzzy_relative(&today)
            );
        }
    }

    Ok(())
}

fn mode(labels: bool) -> SegmentMode {
    if labels {
        SegmentMode::LabelStyle
    } else {
        SegmentMode::HeaderStyle
    }
}

/// Human readable listing of one slide.
fn describe_slide(index: usize, slide: &Slide) -> String {
    let kind = match slide.kind {
        SlideKind::Content => "slide",
        SlideKind::Label => "label",
        SlideKind::End => "end",
    };

    let mut out = format!(
        "#{} {} [{}..{}]",
        index + 1,
        kind,
        slide.span.start,
        slide.span.end
    );
    if !slide.headers.is_empty() {
        out.push_str(&format!(" ({})", slide.headers.join(" / ")));
    }
    out.push('\n');
    for line in slide.lines() {
        out.push_str("    ");
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Read a UTF-8 text file.
fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Write output to a file.
fn write_output(path: &Path, content: &str) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}
