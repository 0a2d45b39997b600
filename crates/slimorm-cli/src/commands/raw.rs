//! Raw SQL command

use crate::context::{parse_scalar, print_record, CliResult, Context, TypeArgs};
use clap::Args;
use slimorm_core::Value;

#[derive(Debug, Args)]
pub struct RawArgs {
    #[command(flatten)]
    pub target: TypeArgs,

    /// Statement text with `?` placeholders
    pub sql: String,

    /// Bound positionally to the placeholders
    pub params: Vec<String>,
}

pub fn execute(ctx: &Context, args: RawArgs) -> CliResult {
    let record_type = args.target.build();
    let params: Vec<Value> = args.params.iter().map(|p| parse_scalar(p)).collect();

    for record in ctx.session().raw(&record_type, &args.sql, &params)? {
        print_record(&record)?;
    }
    ctx.commit()
}
