//! Command implementations for the CLI.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::sync::Arc;
use std::time::Instant;

use log::info;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::{IndexConfig, find_config, load_configs};
use crate::error::{Result, SuggestError};
use crate::index::{InMemoryDictionary, Indexer, OnDiskReader, OnDiskWriter};
use crate::merger::OptimizedMerger;
use crate::suggest::{SearchConfig, ThresholdSearcher};

/// Execute a CLI command.
pub fn execute_command(args: &SuggestArgs) -> Result<()> {
    match &args.command {
        Command::Index(index_args) => build_indexes(index_args, args.output_format),
        Command::Search(search_args) => search_index(search_args, args.output_format),
    }
}

fn build_indexes(args: &IndexArgs, format: OutputFormat) -> Result<()> {
    let configs = load_configs(&args.config)?;
    let start = Instant::now();

    let summaries = configs
        .iter()
        .map(build_index)
        .collect::<Result<Vec<_>>>()?;

    info!("Total time spent {:?}", start.elapsed());
    write_summaries(&mut io::stdout().lock(), &summaries, format)
}

/// Read the source word list of `config`, then store its dictionary and
/// inverted index in the output directory.
pub fn build_index(config: &IndexConfig) -> Result<IndexSummary> {
    info!("Start processing '{}'", config.name);
    let start = Instant::now();
    let generator = config.generator()?;

    let source = File::open(&config.source_path).map_err(|e| {
        SuggestError::config(format!(
            "Cannot open source file {}: {e}",
            config.source_path.display()
        ))
    })?;
    let dictionary = BufReader::new(source)
        .lines()
        .collect::<io::Result<InMemoryDictionary>>()?;
    info!("Read {} words", dictionary.words().len());

    let storage = config.storage(false)?;
    dictionary.save(storage.as_ref(), &config.dictionary_file_name())?;

    let lists = Indexer::new(generator).index(&dictionary)?;
    OnDiskWriter::new(storage, config.codec, config.name.as_str()).save(&lists)?;

    let elapsed = start.elapsed();
    info!("Finished '{}' in {:?}", config.name, elapsed);

    Ok(IndexSummary {
        name: config.name.clone(),
        words: dictionary.words().len(),
        terms: lists.len(),
        duration_ms: elapsed.as_millis() as u64,
    })
}

/// Open the stored index of `config` for searching.
pub fn open_searcher(config: &IndexConfig) -> Result<ThresholdSearcher> {
    let storage = config.storage(true)?;
    let dictionary = InMemoryDictionary::load(storage.as_ref(), &config.dictionary_file_name())?;
    let reader = OnDiskReader::open(storage, config.codec, config.name.as_str())?;

    Ok(ThresholdSearcher::new(
        Arc::new(reader),
        Arc::new(dictionary),
        config.generator()?,
        OptimizedMerger::new(config.merger),
    ))
}

fn search_index(args: &SearchArgs, format: OutputFormat) -> Result<()> {
    let configs = load_configs(&args.config)?;
    let config = find_config(&configs, &args.name)?;
    let searcher = open_searcher(config)?;

    let search = SearchConfig::new(args.query.as_str(), args.top_k, args.similarity)?
        .with_metric(args.metric);
    let start = Instant::now();
    let results = searcher.search(&search)?;
    info!("Found {} results in {:?}", results.len(), start.elapsed());

    write_results(&mut io::stdout().lock(), &results, format)
}
