//! Module locator.
//!
//! Maps a walked package onto the module that corresponds, by naming
//! convention, to an extension point defined in the base package. A package
//! that never declared the module simply does not participate.

use crate::error::LocateError;
use crate::extension::{ExtensionModule, ExtensionPoint};
use crate::types::{ModulePath, Package, PackageName};

/// The conventional module path for `canonical` inside `package`.
///
/// `canonical` must be rooted in `base`; the base identifier is replaced by the
/// package's own identifier.
pub fn module_path_for(
    package: &Package,
    canonical: &ModulePath,
    base: &PackageName,
) -> Result<ModulePath, LocateError> {
    validate(package)?;
    if canonical.top_level() != base.ident() {
        return Err(LocateError::ForeignPath {
            path: canonical.clone(),
            base: base.clone(),
        });
    }
    Ok(canonical.with_top_level(&package.name.ident()))
}

/// Find `package`'s module for `point`, or `None` if it does not define one.
pub fn locate<'p, T: ?Sized>(
    package: &Package,
    point: &'p ExtensionPoint<T>,
) -> Result<Option<&'p ExtensionModule<T>>, LocateError> {
    let path = module_path_for(package, point.path(), &point.base())?;
    let found = point.get(&path);
    tracing::trace!(
        package = %package.name,
        module = %path,
        found = found.is_some(),
        "located extension module"
    );
    Ok(found)
}

fn validate(package: &Package) -> Result<(), LocateError> {
    let malformed = |reason: &str| LocateError::MalformedPackage {
        package: package.name.clone(),
        reason: reason.to_owned(),
    };

    let ident = package.name.ident();
    if ident.is_empty() {
        return Err(malformed("empty package name"));
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(malformed("package name starts with a digit"));
    }
    if !ident.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(malformed("package name is not a valid identifier"));
    }
    if package.root.as_os_str().is_empty() {
        return Err(malformed("package has no root path"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extension::Candidate;
    use std::path::PathBuf;

    trait Probe {}

    fn pkg(name: &str) -> Package {
        Package {
            name: PackageName::from(name),
            root: PathBuf::from("/pkgs").join(name),
            dependencies: vec![],
            rust_version: None,
        }
    }

    #[test]
    fn substitutes_package_identifier() {
        let path = module_path_for(
            &pkg("my-app"),
            &ModulePath::from("rigger::dev::configs"),
            &PackageName::from("rigger"),
        )
        .unwrap();
        assert_eq!(path, ModulePath::from("my_app::dev::configs"));
    }

    #[test]
    fn missing_module_is_not_an_error() {
        let point = ExtensionPoint::<dyn Probe>::new("rigger::dev::probes");
        assert!(locate(&pkg("my-app"), &point).unwrap().is_none());
    }

    #[test]
    fn finds_registered_module() {
        let mut point = ExtensionPoint::<dyn Probe>::new("rigger::dev::probes");
        point
            .module_for("my-app")
            .register(Candidate::abstract_type("my_app::dev::probes::Base"));
        let module = locate(&pkg("my-app"), &point).unwrap().expect("module");
        assert_eq!(module.path, ModulePath::from("my_app::dev::probes"));
    }

    #[test]
    fn malformed_names_are_rejected() {
        let point = ExtensionPoint::<dyn Probe>::new("rigger::dev::probes");
        for bad in ["", "9lives", "has space", "dots.in.name"] {
            let err = locate(&pkg(bad), &point).unwrap_err();
            assert!(matches!(err, LocateError::MalformedPackage { .. }), "{bad}: {err}");
        }
    }

    #[test]
    fn missing_root_is_malformed() {
        let mut package = pkg("app");
        package.root = PathBuf::new();
        let err = module_path_for(&package, &"rigger::dev".into(), &"rigger".into()).unwrap_err();
        assert!(err.to_string().contains("no root path"));
    }

    #[test]
    fn foreign_extension_point_is_rejected() {
        let err = module_path_for(&pkg("app"), &"other::dev".into(), &"rigger".into()).unwrap_err();
        assert!(matches!(err, LocateError::ForeignPath { .. }));
    }
}
