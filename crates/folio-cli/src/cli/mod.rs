use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod args;


pub use args::{
    CanEnterArgs, ConfigArgs, LinkArgs, ListArgs, MoveArgs, OpenArgs, PathArg, PutArgs,
    RebuildArgs, RemoveArgs, SearchArgs,
};

#[derive(Debug, Parser)]
#[command(name = "folio")]
#[command(about = "Browse, search and administer a Folio content store", version)]
pub struct Cli {
    /// Store root. Defaults to `FOLIO_ROOT`, then `./content`.
    #[arg(long)]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Rebuild(RebuildArgs),
    Ls(ListArgs),
    Search(SearchArgs),
    Suggest(PathArg),
    Open(OpenArgs),
    CanEnter(CanEnterArgs),
    Mkdir(PathArg),
    Put(PutArgs),
    Link(LinkArgs),
    Config(ConfigArgs),
    Rm(RemoveArgs),
    Mv(MoveArgs),
}
