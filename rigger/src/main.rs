//! `rigger` binary with the base package's registrations.

fn main() -> anyhow::Result<()> {
    rigger::main_with(rigger::Catalog::builtin())
}
