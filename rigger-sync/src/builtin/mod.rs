//! Config entities shipped with the base package, registered in
//! `rigger::dev::configs`. Dependent packages override any of them by
//! registering a candidate that `replaces` its id.

pub mod dot_env;
pub mod gitignore;
pub mod manifest;
pub mod readme;
pub mod toolchain;

use rigger_core::{Candidate, ExtensionPoint, BASE_PACKAGE};

use crate::entity::ConfigEntity;

pub use dot_env::DotEnv;
pub use gitignore::GitIgnore;
pub use manifest::ProjectManifest;
pub use readme::Readme;
pub use toolchain::ToolchainPin;

/// Canonical module path of the config extension point.
pub const CONFIGS_MODULE: &str = "rigger::dev::configs";

/// Extension point pre-populated with the builtin entities.
///
/// The toolchain pin reads the manifest, so it is declared after it.
pub fn config_point() -> ExtensionPoint<dyn ConfigEntity> {
    let mut point = ExtensionPoint::new(CONFIGS_MODULE);
    point
        .module_for(BASE_PACKAGE)
        .register(Candidate::concrete(gitignore::ID, gitignore::boxed))
        .register(Candidate::concrete(dot_env::ID, dot_env::boxed))
        .register(Candidate::concrete(manifest::ID, manifest::boxed))
        .register(Candidate::concrete(toolchain::ID, toolchain::boxed))
        .register(Candidate::concrete(readme::ID, readme::boxed));
    point
}
