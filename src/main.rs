use anyhow::Result;

mod app;
mod logging;

fn main() -> Result<()> {
    let args = fstree::cli::parse();
    app::run(args)
}
