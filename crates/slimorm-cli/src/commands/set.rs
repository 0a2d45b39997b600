//! Set command: update columns of an existing row

use crate::context::{parse_assignment, print_record, CliResult, Context, TypeArgs};
use clap::Args;
use slimorm_core::Value;

#[derive(Debug, Args)]
pub struct SetArgs {
    #[command(flatten)]
    pub target: TypeArgs,

    /// Primary-key value of the row to update
    pub id: String,

    /// New column values
    #[arg(required = true, value_name = "COLUMN=VALUE", value_parser = parse_assignment)]
    pub assignments: Vec<(String, Value)>,
}

pub fn execute(ctx: &Context, args: SetArgs) -> CliResult {
    let record_type = args.target.build();
    let mut record = ctx.load(&record_type, &args.id)?;
    for (column, value) in args.assignments {
        record.set(column, value)?;
    }
    ctx.session().save(&mut record)?;
    ctx.commit()?;
    print_record(&record)
}
