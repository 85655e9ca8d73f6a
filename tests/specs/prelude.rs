//! Test helpers for the end-to-end pipeline specifications.
//!
//! These tests drive the real `Loader` → `expand_config` path over actual
//! TOML files on disk, so they exercise the Loader's include-resolution
//! and hashing boundary rather than stopping at the already-parsed specs
//! the crate-internal unit tests use.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub use rcr_config::{Config, LoadError, Loader, VerificationCapability, VerificationError};
pub use rcr_expand::{
    expand_config, ErrorKind, ExpandError, PathResolver, ProcessAutoVars, RealPathResolver,
    RealSystemEnv, RuntimeGlobal, RuntimeGroup, SystemEnvProvider,
};

/// A `VerificationCapability` that reads straight off disk with no hash
/// check, standing in for the out-of-scope concrete hash store. Good
/// enough for these specs since they only exercise the Loader's
/// parsing/merging behavior, not the verification boundary itself —
/// that's `rcr-config`'s own `FakeVerifier`-backed unit tests.
#[derive(Default)]
pub struct DiskVerifier;

impl VerificationCapability for DiskVerifier {
    fn verify_and_read_config(&self, path: &Path) -> Result<Vec<u8>, VerificationError> {
        std::fs::read(path).map_err(|e| VerificationError::ReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn verify_and_read_template(&self, path: &Path) -> Result<Vec<u8>, VerificationError> {
        self.verify_and_read_config(path)
    }
}

/// A `SystemEnvProvider` backed by a fixed map, so these specs never
/// depend on the real process environment.
pub struct FixedEnv(pub HashMap<&'static str, &'static str>);

impl SystemEnvProvider for FixedEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get(key).map(|v| v.to_string())
    }
}

/// A `PathResolver` that reports every queried path as already canonical,
/// for specs that don't exercise symlink canonicalization themselves.
pub struct IdentityPaths;

impl PathResolver for IdentityPaths {
    fn canonicalize(&self, path: &Path) -> std::io::Result<PathBuf> {
        Ok(path.to_path_buf())
    }
}

/// A fixture directory holding a main config plus any included
/// template-only files, backed by a real `tempfile::TempDir` so relative
/// `includes` paths resolve the way they would in production.
pub struct Fixture {
    dir: tempfile::TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create tempdir"),
        }
    }

    /// Writes `contents` at `relative_path` inside the fixture directory,
    /// creating parent directories as needed.
    pub fn write(&self, relative_path: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(relative_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dirs");
        }
        std::fs::write(&path, contents).expect("write fixture file");
        path
    }

    pub fn path(&self, relative_path: &str) -> PathBuf {
        self.dir.path().join(relative_path)
    }
}

/// Loads `main.toml` from `fixture` and runs the full expansion pipeline
/// with deterministic auto-vars and the supplied env map.
pub fn run_pipeline(
    fixture: &Fixture,
    main_file: &str,
    env: HashMap<&'static str, &'static str>,
) -> Result<(RuntimeGlobal, Vec<RuntimeGroup>), PipelineError> {
    let loader = Loader::new(std::sync::Arc::new(DiskVerifier));
    let config = loader
        .load(&fixture.path(main_file))
        .map_err(PipelineError::Load)?;
    let process_vars = ProcessAutoVars::from_parts("20260726120000.000", "4242");
    expand_config(
        &config,
        &process_vars,
        &FixedEnv(env),
        &IdentityPaths,
        30,
        1_048_576,
    )
    .map_err(PipelineError::Expand)
}

/// Unifies the two fallible stages (Loader, then expansion) so a spec can
/// assert on whichever one is expected to fail without matching two
/// separate `Result` types.
#[derive(Debug)]
pub enum PipelineError {
    Load(LoadError),
    Expand(ExpandError),
}

impl PipelineError {
    pub fn expand_kind(&self) -> Option<ErrorKind> {
        match self {
            PipelineError::Expand(e) => Some(e.kind()),
            PipelineError::Load(_) => None,
        }
    }
}
