//! Delete command

use crate::context::{CliResult, Context, TypeArgs};
use clap::Args;

#[derive(Debug, Args)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub target: TypeArgs,

    /// Primary-key value of the row to delete
    pub id: String,
}

pub fn execute(ctx: &Context, args: DeleteArgs) -> CliResult {
    let record_type = args.target.build();
    let record = ctx.load(&record_type, &args.id)?;
    let deleted = ctx.session().delete(&record)?;
    ctx.commit()?;
    println!("{}", serde_json::json!({ "deleted": deleted }));
    Ok(())
}
