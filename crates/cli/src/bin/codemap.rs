use anyhow::Result;

fn main() -> Result<()> {
    codemap_cli::main_entry()
}
