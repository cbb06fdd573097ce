use clap::Parser;
use crossterm::style::Stylize;
use inflector_core::config::{Config, CACHE_ENV, SEPARATOR_ENV};
use inflector_core::validation::PHONEMIC_ALPHABET;
use inflector_core::{
    Category, Formality, OneOrMany, ParadigmCache, Person, Polarity, Result, Script, Separator,
    Tense, VerbProfile,
};
use std::io::{stdin, stdout, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const PRESENT: [Category; 7] = [
    Category::Simple,
    Category::Continuous,
    Category::Subjunctive,
    Category::Progressive,
    Category::Perfect,
    Category::PerfectPast,
    Category::Imperative,
];
const PAST: [Category; 6] = [
    Category::Simple,
    Category::Continuous,
    Category::Subjunctive,
    Category::Progressive,
    Category::Perfect,
    Category::PerfectSubjunctive,
];
const FUTURE: [Category; 1] = [Category::Simple];

/// Persian verb paradigm generator.
#[derive(Debug, Parser)]
#[command(name = "inflect", version, about)]
struct Args {
    /// Citation form, present stem or past stem. Omit to start a prompt.
    word: Option<String>,

    /// Phonemic transcription of WORD.
    phonemic: Option<String>,

    /// Native-script separator: space, zwnj or none.
    #[arg(long, env = SEPARATOR_ENV)]
    separator: Option<String>,

    /// Paradigm cache file.
    #[arg(long, env = CACHE_ENV)]
    cache: Option<PathBuf>,

    /// Print the profile as JSON.
    #[arg(long)]
    json: bool,

    /// Config file to read instead of the default one.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = Config::resolve(
        args.separator.as_deref(),
        args.cache.as_deref(),
        args.json,
        args.config.as_deref(),
    )?;
    let mut cache = ParadigmCache::from_file_or_new(&config.cache_path);

    if let Some(word) = args.word.as_deref() {
        let verb = cache.get_or_generate(word, args.phonemic.as_deref(), config.separator)?;
        print_profile(verb, config.json)?;
        return cache.save();
    }

    println!("{}", "Persian verb inflector. Type 'exit' to save and quit.".bold());
    println!("Enter '<word> [phonemic]', ':sep <space|zwnj|none>' or ':alphabet'.");
    let stdin = stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("[{}] > ", config.separator);
        stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        let mut parts = line.split_whitespace();
        match parts.next() {
            None => continue,
            Some("exit") => break,
            Some(":alphabet") => print_alphabet(),
            Some(":sep") => match parts.next().map(str::parse::<Separator>) {
                Some(Ok(separator)) => config.separator = separator,
                Some(Err(e)) => eprintln!("{} {}", "error:".red(), e),
                None => eprintln!("usage: :sep <space|zwnj|none>"),
            },
            Some(word) => {
                let phonemic = parts.next();
                match cache.get_or_generate(word, phonemic, config.separator) {
                    Ok(verb) => print_profile(verb, config.json)?,
                    Err(e) => eprintln!("{} {}", "error:".red(), e),
                }
            }
        }
    }

    if let Err(e) = cache.save() {
        error!(error = %e, "could not save the paradigm cache");
        return Err(e);
    }
    info!(entries = cache.len(), path = %config.cache_path.display(), "paradigm cache saved");
    Ok(())
}

fn print_profile(verb: &VerbProfile, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(verb)?);
        return Ok(());
    }

    println!(
        "\n{}  {:?}, {:?}, {:?}",
        verb.citation.as_str().bold(),
        verb.regularity,
        verb.transitivity,
        verb.lexical_aspect
    );
    let Some(paradigm) = &verb.paradigm else {
        return Ok(());
    };
    for formality in Formality::ALL {
        for script in Script::ALL {
            for polarity in Polarity::ALL {
                let branch = &paradigm[formality][script][polarity];
                let heading = format!("{formality:?} / {script:?} / {polarity:?}");
                println!("\n{}", heading.cyan().bold());
                for (tense, categories) in [
                    (Tense::Present, &PRESENT[..]),
                    (Tense::Past, &PAST[..]),
                    (Tense::Future, &FUTURE[..]),
                ] {
                    for &category in categories {
                        let Some(cells) = branch.get(tense, category) else {
                            continue;
                        };
                        println!("  {}", format!("{tense:?} {category:?}").dim());
                        for person in Person::ALL {
                            if let Some(cell) = cells.get(&person) {
                                println!("    {:<3} {}", format!("{person:?}"), show(cell));
                            }
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

fn show(cell: &OneOrMany) -> String {
    cell.variants().join(" / ")
}

fn print_alphabet() {
    for (letter, spellings) in PHONEMIC_ALPHABET {
        println!("  {}  {}", letter.to_string().bold(), spellings.join(", "));
    }
}
