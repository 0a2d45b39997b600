//! Count command

use crate::context::{conditions_from, parse_assignment, CliResult, Context, TypeArgs};
use clap::Args;
use slimorm_core::Value;

#[derive(Debug, Args)]
pub struct CountArgs {
    #[command(flatten)]
    pub target: TypeArgs,

    /// Equality filter, repeatable
    #[arg(long = "where", value_name = "COLUMN=VALUE", value_parser = parse_assignment)]
    pub filters: Vec<(String, Value)>,

    /// Raw GROUP BY fragment; the first group's count is printed
    #[arg(long)]
    pub group_by: Option<String>,
}

pub fn execute(ctx: &Context, args: CountArgs) -> CliResult {
    let record_type = args.target.build();
    let count = ctx.session().count(
        &record_type,
        &conditions_from(&args.filters),
        args.group_by.as_deref(),
    )?;
    println!("{}", count);
    Ok(())
}
