use std::fs;
use std::path::PathBuf;
use std::process::exit;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;

use inscripta_backend::logger::init_logger;
use inscripta_backend::monument::process_batch;
use inscripta_backend::search::{SearchField, TermSets, search_monuments};
use inscripta_backend::types::{
    ApparatusStyle, BibliographyStyle, ExtractOptions, Monument, RenderOptions,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Inscripta CLI", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Apparatus extraction policy.
    /// Possible values: location-based, language-filtered
    #[arg(long, global = true, default_value = "location-based",
          value_parser = ApparatusStyle::from_str)]
    apparatus_style: ApparatusStyle,

    /// Bibliography extraction policy.
    /// Possible values: structured, verbatim
    #[arg(long, global = true, default_value = "structured",
          value_parser = BibliographyStyle::from_str)]
    bibliography_style: BibliographyStyle,

    /// Language code of the ancient-language edition division.
    #[arg(long, global = true, default_value = "grc", env = "INSCRIPTA_EDITION_LANG")]
    edition_lang: String,

    /// Language of the modern annotation layer (translation, commentary,
    /// apparatus notes).
    #[arg(long, global = true, default_value = "en", env = "INSCRIPTA_LANG")]
    lang: String,

    /// Render lb elements with break="no" instead of suppressing them.
    #[arg(long, global = true, default_value_t = false)]
    keep_unbroken_lb: bool,

    /// Process a div's own children even when it wraps a single ab container.
    #[arg(long, global = true, default_value_t = false)]
    no_transparent_ab: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render TEI files to Leiden+ plain text with the extracted sections
    #[command(arg_required_else_help = true)]
    Render {
        /// TEI XML files to process
        files: Vec<PathBuf>,

        /// Emit the assembled records as JSON instead of plain text
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Print the descriptive metadata fields of each file
    #[command(arg_required_else_help = true)]
    Metadata {
        /// TEI XML files to process
        files: Vec<PathBuf>,
    },

    /// Case-insensitive substring search across a batch of files
    #[command(arg_required_else_help = true)]
    Search {
        /// The search term
        term: String,

        /// TEI XML files to search
        files: Vec<PathBuf>,

        /// Where to search.
        /// Possible values: all, info, edition, translation, commentary, bibliography
        #[arg(long, default_value = "all", value_parser = SearchField::from_str)]
        field: SearchField,
    },

    /// Print the search-term suggestions collected from a batch
    #[command(arg_required_else_help = true)]
    Terms {
        /// TEI XML files to process
        files: Vec<PathBuf>,
    },
}

impl Cli {
    fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            apparatus: self.apparatus_style,
            bibliography: self.bibliography_style,
            edition_lang: self.edition_lang.clone(),
            note_lang: self.lang.clone(),
            render: RenderOptions {
                suppress_unbroken_lb: !self.keep_unbroken_lb,
                transparent_ab: !self.no_transparent_ab,
            },
        }
    }
}

/// Read the batch from disk. Unreadable files are reported and skipped, the
/// same policy as malformed ones.
fn read_inputs(files: &[PathBuf]) -> Vec<(String, Vec<u8>)> {
    let mut inputs = Vec::new();

    for path in files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        match fs::read(path) {
            Ok(bytes) => inputs.push((name, bytes)),
            Err(e) => eprintln!("Error reading file {:?}: {}", path, e),
        }
    }

    inputs
}

fn load_monuments(files: &[PathBuf], opts: &ExtractOptions) -> Vec<Monument> {
    let inputs = read_inputs(files);
    let (monuments, failures) = process_batch(&inputs, opts);

    for failure in &failures {
        eprintln!("Skipped {}: {}", failure.file_name, failure.error);
    }

    if monuments.is_empty() && !files.is_empty() {
        eprintln!("No file in the batch could be processed.");
        exit(1);
    }

    monuments
}

fn print_monument(m: &Monument) {
    println!("=== {} ===", m.file_name);
    println!("{}", m.title);
    if !m.monument_id.is_empty() {
        println!("ID: {}", m.monument_id);
    }

    println!("\n--- Leiden+ text ---");
    println!("{}", m.leiden_text);

    for (heading, content) in [
        ("Translation", &m.translation),
        ("Apparatus", &m.apparatus),
        ("Commentary", &m.commentary),
        ("Bibliography", &m.bibliography),
    ] {
        println!("\n--- {} ---", heading);
        if content.is_empty() {
            println!("No {} available.", heading.to_lowercase());
        } else {
            println!("{}", content);
        }
    }
    println!();
}

fn cmd_render(monuments: &[Monument], json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(monuments)
            .context("Failed to serialize monument records")?;
        println!("{}", out);
    } else {
        for m in monuments {
            print_monument(m);
        }
    }
    Ok(())
}

fn cmd_metadata(monuments: &[Monument]) -> Result<()> {
    for m in monuments {
        println!("=== {} ===", m.file_name);
        println!("{}", m.title);
        for (label, value) in m.metadata.fields() {
            println!("- {}: {}", label, value);
        }
        println!();
    }
    Ok(())
}

fn cmd_search(monuments: &[Monument], term: &str, field: SearchField) -> Result<()> {
    let matches = search_monuments(monuments, term, field);

    if matches.is_empty() {
        println!("No matches found for your search criteria.");
        return Ok(());
    }

    for hit in matches {
        println!("=== {} ({}) ===", hit.file_name, hit.section);
        println!("{}", hit.content);
        println!();
    }
    Ok(())
}

fn cmd_terms(monuments: &[Monument]) -> Result<()> {
    let mut sets = TermSets::default();
    for m in monuments {
        sets.add(m);
    }

    println!("Monument types: {}", sets.object_types().join(", "));
    println!("Materials: {}", sets.materials().join(", "));
    println!("Categories: {}", sets.categories().join(", "));
    Ok(())
}

fn main() {
    // A .env file may define INSCRIPTA_LANG etc.; clap picks them up via
    // the env attributes.
    let _ = dotenv();

    init_logger();

    let cli = Cli::parse();
    let opts = cli.extract_options();

    let command_result = match &cli.command {
        Commands::Render { files, json } => {
            let monuments = load_monuments(files, &opts);
            cmd_render(&monuments, *json)
        }

        Commands::Metadata { files } => {
            let monuments = load_monuments(files, &opts);
            cmd_metadata(&monuments)
        }

        Commands::Search { term, files, field } => {
            let monuments = load_monuments(files, &opts);
            cmd_search(&monuments, term, *field)
        }

        Commands::Terms { files } => {
            let monuments = load_monuments(files, &opts);
            cmd_terms(&monuments)
        }
    };

    if let Err(e) = command_result {
        eprintln!("Error executing command: {}", e);
        exit(1);
    }
}
