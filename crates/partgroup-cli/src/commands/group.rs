//! Group command implementation.

use super::open_source;
use crate::cli::GroupArgs;
use crate::config::{Config, OutputFormat};
use crate::error::Result;
use crate::output::{Formatter, GroupSections};
use partgroup_domain::GroupingPipeline;

/// Execute the group command.
pub fn execute_group(args: GroupArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let source = open_source(&args.input, config);
    let pipeline = GroupingPipeline::new(config.grouping_config(args.seeds));

    let outcome = pipeline.run_from(&source)?;

    // The table view prints the warning inline with the steps
    if !outcome.seeds.is_complete() && !(args.show_steps && formatter.format() == OutputFormat::Table) {
        eprintln!("{}", formatter.shortfall_warning(&outcome.seeds));
    }

    let sections = GroupSections {
        matrix: args.show_matrix,
        steps: args.show_steps,
        group_matrices: args.group_matrices,
    };
    println!("{}", formatter.format_outcome(&outcome, sections)?);

    Ok(())
}
