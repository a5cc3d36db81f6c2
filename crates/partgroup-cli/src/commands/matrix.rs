//! Matrix command implementation.

use super::open_source;
use crate::cli::MatrixArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use partgroup_domain::{DatasetSource, SimilarityMatrix};

/// Execute the matrix command.
pub fn execute_matrix(args: MatrixArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let dataset = open_source(&args.input, config).load()?;
    let matrix = SimilarityMatrix::compute(&dataset);

    println!("{}", formatter.format_matrix(&matrix)?);

    Ok(())
}
