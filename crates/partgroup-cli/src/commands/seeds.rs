//! Seeds command implementation.

use super::open_source;
use crate::cli::SeedsArgs;
use crate::config::{Config, OutputFormat};
use crate::error::Result;
use crate::output::Formatter;
use partgroup_domain::{DatasetSource, GroupingPipeline};

/// Execute the seeds command.
pub fn execute_seeds(args: SeedsArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let dataset = open_source(&args.input, config).load()?;
    let pipeline = GroupingPipeline::new(config.grouping_config(args.seeds));

    let (_, seeds) = pipeline.seed(&dataset)?;

    if !seeds.is_complete() && formatter.format() != OutputFormat::Table {
        eprintln!("{}", formatter.shortfall_warning(&seeds));
    }
    println!("{}", formatter.format_seeds(&seeds)?);

    Ok(())
}
