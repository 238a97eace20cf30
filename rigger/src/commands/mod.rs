//! One module per subcommand. Each exposes an `Args` struct with `run`.

pub mod build;
pub mod converge;
pub mod diff;
pub mod graph;
pub mod status;
