//! Recursive import resolution.
//!
//! Resolution walks every import reference reachable from a model, fetches
//! each distinct unresolved URL through the caller's [`FileLoader`],
//! recursively resolves the fetched model, and attaches the result to the
//! import-source registry. The walk keeps three pieces of state:
//!
//! - the per-model registry, which deduplicates sources by URL and persists
//!   between calls, making resolution idempotent and re-entrant;
//! - a per-call library of fetched models, so the same URL reached from
//!   independent branches (a diamond) is fetched once and shared;
//! - a stack of in-progress URLs on the current recursion path, so a true
//!   cycle is rejected while re-imports from unrelated branches are served
//!   from the library.

use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use seam_model::{ImportKind, Model};

use crate::error::{ImportError, ResolveErrors};
use crate::util::{FileLoader, Stack};

/// Resolves every import reachable from `model`.
///
/// Each stub's URL is fetched relative to `base_directory` (an empty base
/// means the current directory; the base acts as a path prefix, never as a
/// separate search root). Sources that already have an attached model are
/// skipped, so calling this again after a partial failure retries only the
/// still-unresolved branches.
///
/// On success, `model.has_unresolved_imports()` is false.
///
/// # Errors
///
/// Returns the collected per-branch failures: unreadable files, names
/// missing from fetched models, and import cycles. Branches that failed are
/// left unresolved; sibling branches are still resolved and attached.
pub fn resolve_imports<F>(
    model: &mut Model,
    base_directory: impl AsRef<Path>,
    loader: &F,
) -> Result<(), ResolveErrors<F::ParseError>>
where
    F: FileLoader,
{
    let mut stack = Stack::new();
    let mut library = HashMap::new();
    let mut errors = ResolveErrors::new();

    resolve_model(
        model,
        base_directory.as_ref(),
        loader,
        &mut stack,
        &mut library,
        &mut errors,
    );

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn resolve_model<F>(
    model: &mut Model,
    base: &Path,
    loader: &F,
    stack: &mut Stack<String>,
    library: &mut HashMap<String, Rc<Model>>,
    errors: &mut ResolveErrors<F::ParseError>,
) where
    F: FileLoader,
{
    for (import, kind) in model.import_references() {
        let url = import.url().to_string();
        model.register_import_source(url.clone());

        let already_resolved = model
            .import_source(&url)
            .is_some_and(seam_model::ImportSource::is_resolved);

        if !already_resolved {
            let fetched = match library.get(&url) {
                Some(remote) => Some(Rc::clone(remote)),
                None => fetch(&url, base, loader, stack, library, errors),
            };

            match fetched {
                Some(remote) => {
                    if let Some(source) = model.import_source_mut(&url) {
                        source.set_model(remote);
                    }
                }
                // the failure has been recorded; move on to the next branch
                None => continue,
            }
        }

        check_reference(model, &url, import.reference(), kind, errors);
    }
}

/// Fetches and recursively resolves the file at `url`.
///
/// Returns `None` if the branch failed in any way. A fetched model whose
/// own resolution recorded errors is discarded rather than attached, so a
/// retry revisits the whole branch instead of finding a frozen partial
/// resolution behind an immutable handle.
fn fetch<F>(
    url: &str,
    base: &Path,
    loader: &F,
    stack: &mut Stack<String>,
    library: &mut HashMap<String, Rc<Model>>,
    errors: &mut ResolveErrors<F::ParseError>,
) -> Option<Rc<Model>>
where
    F: FileLoader,
{
    let url_owned = url.to_string();

    if let Some(chain) = stack.find_circular_dependency(&url_owned) {
        errors.push(ImportError::cycle(chain));
        return None;
    }

    let path = base.join(url);
    let mut remote = match loader.parse_model(&path) {
        Ok(remote) => remote,
        Err(error) => {
            errors.push(ImportError::file(url, error));
            return None;
        }
    };

    let errors_before = errors.len();
    stack.push(url_owned.clone());
    resolve_model(&mut remote, base, loader, stack, library, errors);
    stack.pop();

    if errors.len() > errors_before {
        return None;
    }

    let remote = Rc::new(remote);
    library.insert(url_owned, Rc::clone(&remote));
    Some(remote)
}

fn check_reference<Ps>(
    model: &Model,
    url: &str,
    name: &str,
    kind: ImportKind,
    errors: &mut ResolveErrors<Ps>,
) {
    let Some(remote) = model.import_source(url).and_then(|source| source.model()) else {
        return;
    };

    let found = match kind {
        ImportKind::Component => remote.find_component(name).is_some(),
        ImportKind::Units => remote.units_by_name(name).is_some(),
    };

    if !found {
        errors.push(ImportError::reference(url, name, kind));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{construct, TestModelLoader};

    #[test]
    fn model_without_imports_resolves_trivially() {
        let mut model = construct::empty_model("plain");
        let loader = TestModelLoader::empty();

        resolve_imports(&mut model, "", &loader).expect("nothing to resolve");

        assert_eq!(loader.fetch_count(), 0);
        assert!(!model.has_unresolved_imports());
    }

    #[test]
    fn stub_sources_get_the_remote_model_attached() {
        let mut model = construct::model_with_component_stub("main", "cell", "remote.sm", "cell");
        let loader = TestModelLoader::new([(
            "remote.sm",
            construct::model_with_concrete_component("remote", "cell", &["v"]),
        )]);

        resolve_imports(&mut model, "", &loader).expect("the remote file is available");

        let source = model
            .import_source("remote.sm")
            .expect("the stub registered its source");
        assert!(source.is_resolved());
        assert!(!model.has_unresolved_imports());
    }

    #[test]
    fn resolution_is_idempotent() {
        let mut model = construct::model_with_component_stub("main", "cell", "remote.sm", "cell");
        let loader = TestModelLoader::new([(
            "remote.sm",
            construct::model_with_concrete_component("remote", "cell", &["v"]),
        )]);

        resolve_imports(&mut model, "", &loader).expect("first resolve succeeds");
        resolve_imports(&mut model, "", &loader).expect("second resolve succeeds");

        assert_eq!(loader.fetch_count(), 1);
    }

    #[test]
    fn stubs_sharing_a_url_share_one_fetch() {
        let mut model = Model::new("main");
        let first = model.add_component("first");
        let second = model.add_component("second");
        model.set_component_import(first, "shared.sm", "cell");
        model.set_component_import(second, "shared.sm", "pump");

        let mut remote = construct::model_with_concrete_component("remote", "cell", &["v"]);
        let pump = remote.add_component("pump");
        remote.add_variable(pump, "rate");

        let loader = TestModelLoader::new([("shared.sm", remote)]);

        resolve_imports(&mut model, "", &loader).expect("both references exist remotely");

        assert_eq!(loader.fetch_count(), 1);
        assert_eq!(model.import_sources().len(), 1);
        assert!(!model.has_unresolved_imports());
    }

    #[test]
    fn missing_file_fails_the_branch_but_not_its_siblings() {
        let mut model = Model::new("main");
        let broken = model.add_component("broken");
        let healthy = model.add_component("healthy");
        model.set_component_import(broken, "missing.sm", "cell");
        model.set_component_import(healthy, "present.sm", "cell");

        let loader = TestModelLoader::new([(
            "present.sm",
            construct::model_with_concrete_component("present", "cell", &["v"]),
        )]);

        let errors =
            resolve_imports(&mut model, "", &loader).expect_err("one branch cannot be fetched");

        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.errors()[0],
            ImportError::file("missing.sm", ())
        );

        let healthy_source = model
            .import_source("present.sm")
            .expect("the healthy source exists");
        assert!(healthy_source.is_resolved());
        assert!(model.has_unresolved_imports());
    }

    #[test]
    fn retry_revisits_only_unresolved_branches() {
        let mut model = Model::new("main");
        let broken = model.add_component("broken");
        let healthy = model.add_component("healthy");
        model.set_component_import(broken, "late.sm", "cell");
        model.set_component_import(healthy, "present.sm", "cell");

        let first_loader = TestModelLoader::new([(
            "present.sm",
            construct::model_with_concrete_component("present", "cell", &["v"]),
        )]);
        resolve_imports(&mut model, "", &first_loader).expect_err("late.sm does not exist yet");

        // the file appears; a retry fetches it and nothing else
        let second_loader = TestModelLoader::new([
            (
                "late.sm",
                construct::model_with_concrete_component("late", "cell", &["v"]),
            ),
            (
                "present.sm",
                construct::model_with_concrete_component("present", "cell", &["v"]),
            ),
        ]);
        resolve_imports(&mut model, "", &second_loader).expect("everything is available now");

        assert_eq!(second_loader.fetch_count(), 1);
        assert_eq!(second_loader.fetches_of("late.sm"), 1);
        assert!(!model.has_unresolved_imports());
    }

    #[test]
    fn missing_reference_is_reported_for_the_offending_name() {
        let mut model = construct::model_with_component_stub("main", "cell", "remote.sm", "axon");
        let loader = TestModelLoader::new([(
            "remote.sm",
            construct::model_with_concrete_component("remote", "cell", &["v"]),
        )]);

        let errors =
            resolve_imports(&mut model, "", &loader).expect_err("the remote lacks `axon`");

        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.errors()[0],
            ImportError::reference("remote.sm", "axon", ImportKind::Component)
        );
    }

    #[test]
    fn true_cycles_are_rejected_with_the_offending_chain() {
        // main imports from a.sm, a.sm imports from b.sm, b.sm imports from a.sm
        let mut model = construct::model_with_component_stub("main", "cell", "a.sm", "cell");

        let loader = TestModelLoader::new([
            (
                "a.sm",
                construct::model_with_component_stub("a", "cell", "b.sm", "cell"),
            ),
            (
                "b.sm",
                construct::model_with_component_stub("b", "cell", "a.sm", "cell"),
            ),
        ]);

        let errors = resolve_imports(&mut model, "", &loader).expect_err("a cycle exists");

        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.errors()[0],
            ImportError::cycle(vec![
                "a.sm".to_string(),
                "b.sm".to_string(),
                "a.sm".to_string(),
            ])
        );
        assert!(model.has_unresolved_imports());
    }

    #[test]
    fn diamond_imports_fetch_the_shared_file_once() {
        // main imports from left.sm and right.sm, both of which import from
        // common.sm
        let mut model = Model::new("main");
        let left = model.add_component("left");
        let right = model.add_component("right");
        model.set_component_import(left, "left.sm", "cell");
        model.set_component_import(right, "right.sm", "cell");

        let loader = TestModelLoader::new([
            (
                "left.sm",
                construct::model_with_component_stub("left", "cell", "common.sm", "cell"),
            ),
            (
                "right.sm",
                construct::model_with_component_stub("right", "cell", "common.sm", "cell"),
            ),
            (
                "common.sm",
                construct::model_with_concrete_component("common", "cell", &["v"]),
            ),
        ]);

        resolve_imports(&mut model, "", &loader).expect("a diamond is not a cycle");

        assert_eq!(loader.fetches_of("common.sm"), 1);
        assert_eq!(loader.fetch_count(), 3);
        assert!(!model.has_unresolved_imports());
    }

    #[test]
    fn base_directory_prefixes_every_url() {
        let mut model = construct::model_with_component_stub("main", "cell", "remote.sm", "cell");
        let loader = TestModelLoader::new([(
            "cells/remote.sm",
            construct::model_with_concrete_component("remote", "cell", &["v"]),
        )]);

        resolve_imports(&mut model, "cells", &loader).expect("the prefixed path exists");

        assert_eq!(loader.fetches_of("cells/remote.sm"), 1);
        assert!(!model.has_unresolved_imports());
    }

    #[test]
    fn units_references_are_checked_in_the_fetched_model() {
        let mut model = Model::new("main");
        let index = model.add_units(seam_model::Units::new("local_volts"));
        model.set_units_import(index, "units.sm", "mV");

        let mut remote = Model::new("units");
        let mut mv = seam_model::Units::new("mV");
        mv.add_unit("volt", seam_model::Prefix::Milli, 1);
        remote.add_units(mv);

        let loader = TestModelLoader::new([("units.sm", remote)]);

        resolve_imports(&mut model, "", &loader).expect("the units definition exists remotely");
        assert!(!model.has_unresolved_imports());
    }
}
