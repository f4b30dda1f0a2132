// src/hooks.rs

//! Lifecycle hook registry
//!
//! Release orchestration runs named hooks around install, upgrade, delete
//! and rollback. Hooks are registered explicitly on a [`HookRegistry`] owned
//! by the orchestrator; there is no global table. The registry is generic
//! over the context type handed to each hook, so it carries no knowledge of
//! what a release is.
//!
//! ```
//! use chartdeps::hooks::{HookRegistry, Phase};
//!
//! let mut registry: HookRegistry<Vec<String>> = HookRegistry::new();
//! registry
//!     .register("record", Phase::PreInstall, |log: &mut Vec<String>, args: &str| {
//!         log.push(args.to_string());
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! let mut log = Vec::new();
//! registry.run(Phase::PreInstall, &mut log, "--dry-run").unwrap();
//! assert_eq!(log, ["--dry-run"]);
//! ```

use crate::error::{Error, Result};
use std::fmt;
use tracing::{debug, info};

/// Point in a release lifecycle at which hooks run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    PreInstall,
    PostInstall,
    PreUpgrade,
    PostUpgrade,
    PreDelete,
    PostDelete,
    PreRollback,
    PostRollback,
}

impl Phase {
    pub const ALL: [Phase; 8] = [
        Phase::PreInstall,
        Phase::PostInstall,
        Phase::PreUpgrade,
        Phase::PostUpgrade,
        Phase::PreDelete,
        Phase::PostDelete,
        Phase::PreRollback,
        Phase::PostRollback,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::PreInstall => "pre-install",
            Phase::PostInstall => "post-install",
            Phase::PreUpgrade => "pre-upgrade",
            Phase::PostUpgrade => "post-upgrade",
            Phase::PreDelete => "pre-delete",
            Phase::PostDelete => "post-delete",
            Phase::PreRollback => "pre-rollback",
            Phase::PostRollback => "post-rollback",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lifecycle hook
///
/// Closures taking `(&mut C, &str)` implement this directly.
pub trait Hook<C> {
    fn run(&self, ctx: &mut C, args: &str) -> Result<()>;
}

impl<C, F> Hook<C> for F
where
    F: Fn(&mut C, &str) -> Result<()>,
{
    fn run(&self, ctx: &mut C, args: &str) -> Result<()> {
        self(ctx, args)
    }
}

struct Registered<C> {
    name: String,
    phase: Phase,
    hook: Box<dyn Hook<C>>,
}

/// Named hooks grouped by phase, kept in registration order
pub struct HookRegistry<C> {
    hooks: Vec<Registered<C>>,
}

impl<C> Default for HookRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for HookRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.hooks.iter().map(|h| (&h.name, h.phase)))
            .finish()
    }
}

impl<C> HookRegistry<C> {
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Register a hook; names are unique across all phases
    pub fn register<H>(&mut self, name: impl Into<String>, phase: Phase, hook: H) -> Result<()>
    where
        H: Hook<C> + 'static,
    {
        let name = name.into();
        if self.contains(&name) {
            return Err(Error::DuplicateHook { name });
        }

        debug!("Registered hook '{}' for {}", name, phase);
        self.hooks.push(Registered {
            name,
            phase,
            hook: Box::new(hook),
        });
        Ok(())
    }

    /// Remove a hook by name, returning whether it was registered
    pub fn unregister(&mut self, name: &str) -> bool {
        let before = self.hooks.len();
        self.hooks.retain(|h| h.name != name);
        self.hooks.len() != before
    }

    pub fn contains(&self, name: &str) -> bool {
        self.hooks.iter().any(|h| h.name == name)
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Names of the hooks for `phase`, in registration order
    pub fn hooks(&self, phase: Phase) -> Vec<&str> {
        self.hooks
            .iter()
            .filter(|h| h.phase == phase)
            .map(|h| h.name.as_str())
            .collect()
    }

    /// Run every hook for `phase` in order
    ///
    /// Stops at the first failing hook; later hooks are not run.
    pub fn run(&self, phase: Phase, ctx: &mut C, args: &str) -> Result<()> {
        let mut count = 0;
        for registered in self.hooks.iter().filter(|h| h.phase == phase) {
            debug!("Running {} hook '{}'", phase, registered.name);
            registered
                .hook
                .run(ctx, args)
                .map_err(|e| Error::HookFailed {
                    name: registered.name.clone(),
                    phase: phase.to_string(),
                    reason: e.to_string(),
                })?;
            count += 1;
        }

        if count > 0 {
            info!("Ran {} {} hook(s)", count, phase);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push(tag: &'static str) -> impl Fn(&mut Vec<String>, &str) -> Result<()> {
        move |log: &mut Vec<String>, args: &str| {
            log.push(format!("{}:{}", tag, args));
            Ok(())
        }
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut registry = HookRegistry::new();
        registry.register("a", Phase::PreInstall, push("a")).unwrap();

        let err = registry
            .register("a", Phase::PostDelete, push("a"))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateHook { ref name } if name == "a"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_hooks_in_registration_order() {
        let mut registry = HookRegistry::new();
        registry.register("second", Phase::PreUpgrade, push("2")).unwrap();
        registry.register("other", Phase::PostUpgrade, push("x")).unwrap();
        registry.register("first", Phase::PreUpgrade, push("1")).unwrap();

        assert_eq!(registry.hooks(Phase::PreUpgrade), ["second", "first"]);
        assert_eq!(registry.hooks(Phase::PostUpgrade), ["other"]);
        assert!(registry.hooks(Phase::PreRollback).is_empty());

        let mut log = Vec::new();
        registry.run(Phase::PreUpgrade, &mut log, "v2").unwrap();
        assert_eq!(log, ["2:v2", "1:v2"]);
    }

    #[test]
    fn test_run_stops_at_first_failure() {
        let mut registry = HookRegistry::new();
        registry.register("ok", Phase::PreDelete, push("ok")).unwrap();
        registry
            .register(
                "broken",
                Phase::PreDelete,
                |_: &mut Vec<String>, _: &str| -> Result<()> {
                    Err(Error::ParseError("boom".to_string()))
                },
            )
            .unwrap();
        registry.register("never", Phase::PreDelete, push("never")).unwrap();

        let mut log = Vec::new();
        let err = registry.run(Phase::PreDelete, &mut log, "").unwrap_err();
        match err {
            Error::HookFailed { name, phase, reason } => {
                assert_eq!(name, "broken");
                assert_eq!(phase, "pre-delete");
                assert!(reason.contains("boom"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(log, ["ok:"]);
    }

    #[test]
    fn test_unregister() {
        let mut registry = HookRegistry::new();
        registry.register("a", Phase::PostInstall, push("a")).unwrap();

        assert!(registry.unregister("a"));
        assert!(!registry.unregister("a"));
        assert!(registry.is_empty());

        registry.register("a", Phase::PostInstall, push("a")).unwrap();
        assert!(registry.contains("a"));
    }

    #[test]
    fn test_phase_names() {
        let names: Vec<String> = Phase::ALL.iter().map(Phase::to_string).collect();
        assert_eq!(names[0], "pre-install");
        assert_eq!(names[7], "post-rollback");
    }
}
