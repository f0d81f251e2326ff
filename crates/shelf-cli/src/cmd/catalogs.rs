//! `shelf catalogs`: list saved catalogs.

use anyhow::Result;
use serde::Serialize;
use std::io::Write;

use super::Context;
use crate::output::{pretty_section, render_mode};

#[derive(Debug, Serialize)]
struct Listing {
    dir: String,
    catalogs: Vec<String>,
}

pub fn run_catalogs(ctx: &Context) -> Result<()> {
    let listing = Listing {
        dir: ctx.store.dir().display().to_string(),
        catalogs: ctx.store.list()?,
    };
    render_mode(
        ctx.output,
        &listing,
        |l, w| {
            for name in &l.catalogs {
                writeln!(w, "{name}")?;
            }
            Ok(())
        },
        |l, w| {
            pretty_section(w, &format!("Catalogs in {}", l.dir))?;
            if l.catalogs.is_empty() {
                writeln!(w, "(none)")?;
            }
            for name in &l.catalogs {
                writeln!(w, "  {name}")?;
            }
            Ok(())
        },
    )
}
