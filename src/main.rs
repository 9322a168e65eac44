//! Command-line surface: solves each topology file named on the
//! command line, printing one line per solution to stdout.
//!
//! The default dictionary for topology lines that name none comes from
//! the `GRIDFILL_DICTIONARY` environment variable. Status output goes
//! through `env_logger` (`RUST_LOG=info` shows compression statistics
//! and timings).

use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use log::{debug, error, info};

use gridfill::dictionary::DictionaryCache;
use gridfill::solver::{Config, Puzzle};
use gridfill::topology;

fn main() -> ExitCode {
    env_logger::init();

    let paths: Vec<PathBuf> = env::args_os().skip(1).map(PathBuf::from).collect();
    if paths.is_empty() {
        eprintln!("usage: gridfill <topology-file>...");
        return ExitCode::from(1);
    }

    let default_dictionary = env::var_os("GRIDFILL_DICTIONARY").map(PathBuf::from);
    let config = Config::default();
    for path in &paths {
        // A failing topology aborts only its own invocation.
        if let Err(e) = run(path, default_dictionary.as_deref(), &config) {
            error!("{}: {e:#}", path.display());
        }
    }
    ExitCode::SUCCESS
}

/// Loads, assembles, and solves one topology file.
fn run(path: &Path, default_dictionary: Option<&Path>, config: &Config) -> Result<()> {
    let slots = topology::parse_file(path)
        .with_context(|| format!("loading topology {}", path.display()))?;

    let mut cache = DictionaryCache::new(default_dictionary.map(Path::to_path_buf));
    let mut dawgs = Vec::with_capacity(slots.len());
    for slot in &slots {
        let id = cache
            .load(slot.dictionary.as_deref(), &slot.labels)
            .with_context(|| format!("slot {:?}", slot.labels))?;
        dawgs.push(id);
    }

    let mut labels: Vec<_> = slots.into_iter().map(|slot| slot.labels).collect();
    let label_count = topology::renumber(&mut labels);
    debug!("normalized topology ({label_count} labels): {labels:?}");

    let puzzle = Puzzle::assemble(
        labels.into_iter().zip(dawgs).collect(),
        cache.compiled(),
        label_count,
    )?;

    let started = Instant::now();
    puzzle.solve(config, &mut io::stdout())?;
    info!("{} solved in {:.2?}", path.display(), started.elapsed());
    Ok(())
}
