use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use efp_abi::config;
use efp_abi::domain::abi::{parse_selector, Entry, EntryKind, InterfaceRegistry};
use efp_abi::{
    register_builtin, validate, AbiDecoder, AbiEncoder, AbiScanner, AlloyAbiDecoder,
};

#[derive(Debug, Parser)]
#[command(
    name = "efp-abi",
    version,
    about = "Inspect the Ethereum Follow Protocol contract interfaces"
)]
struct Args {
    /// Extra directory scanned for ABI JSON files (repeatable)
    #[arg(long = "abi-dir", global = true)]
    abi_dirs: Vec<PathBuf>,

    /// Do not register the built-in EFP interfaces
    #[arg(long, global = true)]
    no_builtin: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List registered contracts
    List,
    /// Print every entry of a contract
    Show {
        contract: String,
        /// Print the JSON ABI instead of signatures
        #[arg(long)]
        json: bool,
    },
    /// Resolve a single function, event, error or constructor
    Entry {
        contract: String,
        kind: EntryKind,
        name: String,
        /// Exact input types, e.g. "address,address,uint256,bytes"
        #[arg(long)]
        types: Option<String>,
    },
    /// Print function and error selectors and event topics
    Selectors { contract: String },
    /// Validate ABI JSON files without registering them
    Validate {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Encode calldata for a function
    Encode {
        contract: String,
        function: String,
        /// Exact input types, required for overloaded functions
        #[arg(long)]
        types: Option<String>,
        args: Vec<String>,
    },
    /// Decode calldata by looking up its selector
    Decode { calldata: String },
}

fn main() -> Result<()> {
    init_tracing();
    let Args {
        abi_dirs,
        no_builtin,
        command,
    } = Args::parse();
    let load = || build_registry(&abi_dirs, no_builtin);

    match command {
        Command::List => list(&load()?),
        Command::Show { contract, json } => show(&load()?, &contract, json),
        Command::Entry {
            contract,
            kind,
            name,
            types,
        } => entry(&load()?, &contract, kind, &name, types.as_deref()),
        Command::Selectors { contract } => selectors(&load()?, &contract),
        Command::Validate { files } => validate_files(&files),
        Command::Encode {
            contract,
            function,
            types,
            args,
        } => encode(&load()?, &contract, &function, types.as_deref(), &args),
        Command::Decode { calldata } => decode(&load()?, &calldata),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .unwrap_or_else(|_| EnvFilter::new("error"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn build_registry(abi_dirs: &[PathBuf], no_builtin: bool) -> Result<InterfaceRegistry> {
    let config = config::load();
    let mut registry = InterfaceRegistry::new();

    if config.builtin && !no_builtin {
        register_builtin(&mut registry).context("built-in interfaces failed to register")?;
    }

    let mut roots = config.abi_roots();
    roots.extend(abi_dirs.iter().cloned());
    if !roots.is_empty() {
        let report = AbiScanner::scan_roots(&roots, &mut registry);
        for error in &report.errors {
            eprintln!("warning: {error}");
        }
    }

    Ok(registry)
}

fn list(registry: &InterfaceRegistry) -> Result<()> {
    for (name, descriptor) in registry.iter() {
        println!(
            "{:<28} {:>3} functions {:>3} events {:>3} errors",
            name,
            descriptor.functions().count(),
            descriptor.events().count(),
            descriptor.errors().count()
        );
    }
    Ok(())
}

fn show(registry: &InterfaceRegistry, contract: &str, json: bool) -> Result<()> {
    let descriptor = registry.lookup(contract)?;
    if json {
        println!("{}", descriptor.to_json_pretty()?);
        return Ok(());
    }
    for entry in descriptor {
        println!("{entry}");
    }
    Ok(())
}

fn entry(
    registry: &InterfaceRegistry,
    contract: &str,
    kind: EntryKind,
    name: &str,
    types: Option<&str>,
) -> Result<()> {
    let types = types.map(split_types);
    let types: Option<Vec<&str>> = types
        .as_ref()
        .map(|types| types.iter().map(String::as_str).collect());
    let found = registry.find_entry(contract, kind, name, types.as_deref())?;

    println!("{found}");
    match found {
        Entry::Function(function) => println!("selector: {}", function.selector_hex()),
        Entry::Error(error) => println!("selector: 0x{}", hex::encode(error.selector())),
        Entry::Event(event) if !event.anonymous => println!("topic0:   {}", event.topic()),
        _ => {}
    }
    Ok(())
}

fn selectors(registry: &InterfaceRegistry, contract: &str) -> Result<()> {
    let descriptor = registry.lookup(contract)?;
    for function in descriptor.functions() {
        println!("{}  {}", function.selector_hex(), function.signature());
    }
    for error in descriptor.errors() {
        println!("0x{}  {}", hex::encode(error.selector()), error.signature());
    }
    for event in descriptor.events() {
        println!("{}  {}", event.topic(), event.signature());
    }
    Ok(())
}

fn validate_files(files: &[PathBuf]) -> Result<()> {
    let mut failed = 0usize;
    for path in files {
        match AbiScanner::read_descriptor(path) {
            Ok(Some((name, descriptor))) => {
                let violations = validate(&descriptor);
                if violations.is_empty() {
                    println!("{}: ok ({name}, {} entries)", path.display(), descriptor.len());
                } else {
                    failed += 1;
                    for violation in violations {
                        println!("{}: {violation}", path.display());
                    }
                }
            }
            Ok(None) => println!("{}: no ABI found", path.display()),
            Err(err) => {
                failed += 1;
                println!("{}: {err:#}", path.display());
            }
        }
    }
    if failed > 0 {
        bail!("{failed} file(s) failed validation");
    }
    Ok(())
}

fn encode(
    registry: &InterfaceRegistry,
    contract: &str,
    function: &str,
    types: Option<&str>,
    args: &[String],
) -> Result<()> {
    let types = types.map(split_types);
    let types: Option<Vec<&str>> = types
        .as_ref()
        .map(|types| types.iter().map(String::as_str).collect());
    let function = registry.find_function(contract, function, types.as_deref())?;

    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let calldata = AbiEncoder::encode_call(function, &args)?;
    println!("0x{}", hex::encode(calldata));
    Ok(())
}

fn decode(registry: &InterfaceRegistry, calldata: &str) -> Result<()> {
    let trimmed = calldata.trim();
    let payload = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let data = hex::decode(payload).context("calldata is not valid hex")?;

    let decoder = AlloyAbiDecoder::new(registry);
    let Some(decoded) = decoder.decode_by_selector(&data)? else {
        let selector = parse_selector(payload.get(..8).unwrap_or(payload))
            .map(hex::encode)
            .unwrap_or_default();
        bail!("no registered function with selector 0x{selector}");
    };

    println!(
        "{}::{}",
        decoded.contract.as_deref().unwrap_or("?"),
        decoded.signature
    );
    for arg in decoded.arguments {
        println!("  {} {} = {}", arg.kind, arg.name, shorten(&arg.value));
    }
    Ok(())
}

/// Values longer than this are cut when printed
const MAX_VALUE_CHARS: usize = 96;

fn shorten(value: &str) -> String {
    let chars = value.chars().count();
    if chars <= MAX_VALUE_CHARS {
        return value.to_string();
    }
    let head: String = value.chars().take(MAX_VALUE_CHARS).collect();
    format!("{head}… ({chars} chars)")
}

/// Split a type list on top-level commas, keeping tuple types whole
fn split_types(raw: &str) -> Vec<String> {
    let mut types = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    for c in raw.chars() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if depth == 0 => types.push(std::mem::take(&mut current)),
            c if c.is_whitespace() => {}
            _ => current.push(c),
        }
    }
    if !current.is_empty() || !types.is_empty() {
        types.push(current);
    }
    types
}
