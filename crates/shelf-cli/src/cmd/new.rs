//! `shelf new`: create an empty catalog file.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use shelf_core::{ErrorCode, Session};
use std::io::Write;

use super::Context;
use crate::output::{CliError, render};

#[derive(Args, Debug)]
pub struct NewArgs {
    /// Name of the catalog to create.
    pub catalog: String,

    /// Overwrite an existing catalog of the same name.
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
struct Created {
    catalog: String,
    path: String,
}

pub fn run_new(args: &NewArgs, ctx: &Context) -> Result<()> {
    let mut session = Session::new(ctx.store.clone());
    session.make_new(&args.catalog)?;
    let name = session.catalog().name().to_string();

    if ctx.store.exists(&name) && !args.force {
        return Err(CliError::coded(
            format!("catalog '{name}' already exists"),
            ErrorCode::CatalogExists,
        )
        .into());
    }

    let path = session.save()?;
    let created = Created {
        catalog: name,
        path: path.display().to_string(),
    };
    render(ctx.output, &created, |c, w| {
        writeln!(w, "Created catalog {} at {}", c.catalog, c.path)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: NewArgs,
    }

    #[test]
    fn parses_name_and_force() {
        let w = Wrapper::parse_from(["test", "media", "--force"]);
        assert_eq!(w.args.catalog, "media");
        assert!(w.args.force);
    }
}
