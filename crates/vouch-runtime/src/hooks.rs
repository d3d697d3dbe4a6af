//! Run-wide lifecycle hooks
//!
//! These wrap every suite's own hooks: `before_all`/`before_each` run before
//! the suite's, `after_each`/`after_all` after. All default to no-ops. The
//! mock drain that follows `after_each` is performed by the executor and
//! cannot be overridden.

/// Hooks installed once for the whole run
pub trait LifecycleHooks {
    fn before_all(&mut self, _suite: &str) -> anyhow::Result<()> {
        Ok(())
    }

    fn before_each(&mut self, _suite: &str, _test: &str) -> anyhow::Result<()> {
        Ok(())
    }

    fn after_each(&mut self, _suite: &str, _test: &str) -> anyhow::Result<()> {
        Ok(())
    }

    fn after_all(&mut self, _suite: &str) -> anyhow::Result<()> {
        Ok(())
    }
}

/// The default: every hook does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

impl LifecycleHooks for NoopHooks {}

impl<H: LifecycleHooks + ?Sized> LifecycleHooks for Box<H> {
    fn before_all(&mut self, suite: &str) -> anyhow::Result<()> {
        (**self).before_all(suite)
    }

    fn before_each(&mut self, suite: &str, test: &str) -> anyhow::Result<()> {
        (**self).before_each(suite, test)
    }

    fn after_each(&mut self, suite: &str, test: &str) -> anyhow::Result<()> {
        (**self).after_each(suite, test)
    }

    fn after_all(&mut self, suite: &str) -> anyhow::Result<()> {
        (**self).after_all(suite)
    }
}
