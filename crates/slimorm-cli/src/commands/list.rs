//! List command

use crate::context::{conditions_from, parse_assignment, print_record, CliResult, Context, TypeArgs};
use clap::Args;
use slimorm_core::{SelectOptions, Value};

#[derive(Debug, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub target: TypeArgs,

    /// Equality filter, repeatable
    #[arg(long = "where", value_name = "COLUMN=VALUE", value_parser = parse_assignment)]
    pub filters: Vec<(String, Value)>,

    #[arg(long)]
    pub limit: Option<u64>,

    #[arg(long)]
    pub offset: Option<u64>,

    /// Raw ORDER BY fragment, e.g. "id DESC"
    #[arg(long)]
    pub order_by: Option<String>,

    /// Raw select list, defaults to *
    #[arg(long)]
    pub fields: Option<String>,
}

pub fn execute(ctx: &Context, args: ListArgs) -> CliResult {
    let record_type = args.target.build();
    let options = SelectOptions {
        limit: args.limit,
        offset: args.offset,
        order_by: args.order_by,
        group_by: None,
        fields: args.fields,
    };

    let records = ctx
        .session()
        .all(&record_type, &conditions_from(&args.filters), &options)?;
    for record in records {
        print_record(&record)?;
    }
    Ok(())
}
