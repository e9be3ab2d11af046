use anyhow::{Context, Result, bail};
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use dialoguer::Confirm;
use indoc::indoc;
use log::{Level, warn};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use luares::{DescriptionTable, ItemIndex, LuaresParser, ParserSettings};

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[cfg(all(feature = "fast-alloc", not(windows)))]
#[global_allocator]
static ALLOC: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[cfg(all(feature = "fast-alloc", windows))]
#[global_allocator]
static ALLOC: rpmalloc::GlobalRpmalloc = rpmalloc::GlobalRpmalloc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Jsonl,
}

impl OutputFormat {
    pub fn from_cli_string(s: impl AsRef<str>) -> Self {
        // `value_parser` keeps this in sync with the possible values.
        match s.as_ref() {
            "json" => OutputFormat::Json,
            "jsonl" => OutputFormat::Jsonl,
            _ => unreachable!(),
        }
    }
}

struct LuaresDump {
    parser_settings: ParserSettings,
    items_path: PathBuf,
    descriptions_path: PathBuf,
    descriptions_path_is_default: bool,
    output_format: OutputFormat,
    output: Box<dyn Write>,
    show_stats: bool,
    verbosity_level: Option<Level>,
}

impl LuaresDump {
    pub fn from_cli_matches(matches: &ArgMatches) -> Result<Self> {
        let items_path = matches
            .get_one::<PathBuf>("ITEMS")
            .expect("this is a required argument")
            .clone();

        let (descriptions_path, descriptions_path_is_default) =
            match matches.get_one::<PathBuf>("descriptions") {
                Some(path) => (path.clone(), false),
                None => (items_path.with_file_name("item_descriptions.lua"), true),
            };

        let output_format = OutputFormat::from_cli_string(
            matches
                .get_one::<String>("output-format")
                .expect("has default"),
        );

        let no_indent = match (matches.get_flag("no-indent"), output_format) {
            // "jsonl" is already "not indented".
            (false, OutputFormat::Jsonl) => true,
            (true, OutputFormat::Jsonl) => {
                eprintln!("no need to pass both `--no-indent` and `-o jsonl`");
                true
            }
            (flag, _) => flag,
        };

        let num_threads = *matches.get_one::<usize>("num-threads").expect("has default");
        let num_threads = if cfg!(feature = "multithreading") {
            num_threads
        } else {
            if num_threads != 1 {
                eprintln!(
                    "turned on threads, but binary was compiled without `multithreading`! \
                     using a single thread."
                );
            }
            1
        };

        let verbosity_level = match matches.get_count("verbose") {
            0 => None,
            1 => Some(Level::Info),
            2 => Some(Level::Debug),
            3 => Some(Level::Trace),
            _ => {
                eprintln!("using more than -vvv does not affect verbosity level");
                Some(Level::Trace)
            }
        };

        let output: Box<dyn Write> = match matches.get_one::<PathBuf>("output-target") {
            Some(path) => Box::new(
                create_output_file(path, !matches.get_flag("no-confirm-overwrite"))
                    .with_context(|| {
                        format!("An error occurred while creating output file at `{}`", path.display())
                    })?,
            ),
            None => Box::new(io::stdout()),
        };

        Ok(LuaresDump {
            parser_settings: ParserSettings::new()
                .num_threads(num_threads)
                .indent(!no_indent),
            items_path,
            descriptions_path,
            descriptions_path_is_default,
            output_format,
            output,
            show_stats: matches.get_flag("stats"),
            verbosity_level,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        self.try_to_initialize_logging();

        let parser = LuaresParser::from_path(&self.items_path)
            .with_context(|| format!("Failed to load items from `{}`", self.items_path.display()))?
            .with_configuration(self.parser_settings.clone());

        let descriptions = self.load_descriptions()?;

        let index = ItemIndex::build(&parser, &descriptions);

        match self.output_format {
            OutputFormat::Json => {
                let data = index.to_json(self.parser_settings.should_indent())?;
                writeln!(self.output, "{data}")?;
            }
            OutputFormat::Jsonl => {
                for record in &index.records {
                    writeln!(self.output, "{}", serde_json::to_string(record)?)?;
                }
            }
        }

        self.output.flush()?;

        if self.show_stats {
            print_stats(&index);
        }

        Ok(())
    }

    /// A missing descriptions blob is fatal only when its path was given
    /// explicitly; the default sibling path may simply not exist.
    fn load_descriptions(&self) -> Result<DescriptionTable> {
        if self.descriptions_path_is_default && !self.descriptions_path.exists() {
            warn!(
                "no descriptions found at `{}`, records will carry no description texts",
                self.descriptions_path.display()
            );
            return Ok(DescriptionTable::new());
        }

        let descriptions = DescriptionTable::from_path(&self.descriptions_path).with_context(
            || {
                format!(
                    "Failed to load descriptions from `{}`",
                    self.descriptions_path.display()
                )
            },
        )?;

        Ok(descriptions)
    }

    fn try_to_initialize_logging(&self) {
        if let Some(level) = self.verbosity_level {
            match TermLogger::init(
                level.to_level_filter(),
                Config::default(),
                TerminalMode::Stderr,
                ColorChoice::Auto,
            ) {
                Ok(_) => {}
                Err(e) => eprintln!("Failed to initialize logging: {e:?}"),
            };
        }
    }
}

fn print_stats(index: &ItemIndex) {
    let mut categories: HashMap<&str, usize> = HashMap::new();
    for record in &index.records {
        *categories.entry(record.category.as_str()).or_insert(0) += 1;
    }

    let mut breakdown: Vec<(&str, usize)> = categories.into_iter().collect();
    breakdown.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    eprintln!("Indexed {} records", index.item_count);
    eprintln!("Category breakdown:");
    for (category, count) in breakdown {
        eprintln!("  {category}: {count}");
    }
}

fn create_output_file(path: impl AsRef<Path>, prompt: bool) -> Result<File> {
    let path = path.as_ref();

    if path.is_dir() {
        bail!("There is a directory at {}, refusing to overwrite", path.display());
    }

    if path.exists() {
        if prompt {
            match Confirm::new()
                .with_prompt(format!(
                    "Are you sure you want to override output file at {}",
                    path.display()
                ))
                .default(false)
                .interact()
            {
                Ok(true) => Ok(File::create(path)?),
                Ok(false) => bail!("Cancelled"),
                Err(e) => bail!("Failed to display confirmation prompt: {e}"),
            }
        } else {
            Ok(File::create(path)?)
        }
    } else {
        // Create parent directories if needed.
        match path.parent() {
            Some(parent) => {
                if !parent.exists() && !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
                Ok(File::create(path)?)
            }
            None => bail!("Output file cannot be the root directory"),
        }
    }
}

fn cli() -> Command {
    Command::new("luares_dump")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Converts Windower item resources (items.lua) into a normalized JSON index")
        .arg(
            Arg::new("ITEMS")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("The items resource to parse (items.lua)"),
        )
        .arg(
            Arg::new("descriptions")
                .short('d')
                .long("descriptions")
                .value_parser(value_parser!(PathBuf))
                .help(
                    "The descriptions resource to join by item id \
                     [default: `item_descriptions.lua` next to ITEMS]",
                ),
        )
        .arg(
            Arg::new("num-threads")
                .short('t')
                .long("threads")
                .default_value("0")
                .value_parser(value_parser!(usize))
                .help("Sets the number of worker threads, defaults to number of CPU cores"),
        )
        .arg(
            Arg::new("output-format")
                .short('o')
                .long("format")
                .value_parser(["json", "jsonl"])
                .default_value("json")
                .help("Sets the output format")
                .long_help(indoc!(
                    r#"Sets the output format:
                         "json"  - a single document with `version`, `item_count` and `records`.
                         "jsonl" - one record per line, no envelope.
                    "#
                )),
        )
        .arg(
            Arg::new("output-target")
                .long("output")
                .short('f')
                .value_parser(value_parser!(PathBuf))
                .help("Writes output to the file specified instead of stdout"),
        )
        .arg(
            Arg::new("no-indent")
                .long("no-indent")
                .action(ArgAction::SetTrue)
                .help("When set, output will not be indented"),
        )
        .arg(
            Arg::new("no-confirm-overwrite")
                .long("no-confirm-overwrite")
                .action(ArgAction::SetTrue)
                .help("When set, will not ask for confirmation before overwriting files, useful for automation"),
        )
        .arg(
            Arg::new("stats")
                .long("stats")
                .action(ArgAction::SetTrue)
                .help("When set, prints a per-category record breakdown to stderr"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .action(ArgAction::Count)
                .help(indoc!(
                    r#"
                    Sets debug prints level for the application:
                        -v   - info
                        -vv  - debug
                        -vvv - trace
                    NOTE: trace output is only available in debug builds, as it is extremely verbose."#
                )),
        )
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    let mut app = LuaresDump::from_cli_matches(&matches)?;

    app.run()
}
