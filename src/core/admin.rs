//! Administrative gate context
//!
//! Holds the platform admin identity and the pause/destroyed flags. Each
//! engine owns its own context, so independent engines never share
//! administrative state.

use crate::types::{Identity, MarketplaceError};

/// Admin identity and global switches of one marketplace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminContext {
    owner: Identity,
    stopped: bool,
    destroyed: bool,
}

impl AdminContext {
    /// Create a running context administered by `owner`
    pub fn new(owner: Identity) -> Self {
        AdminContext {
            owner,
            stopped: false,
            destroyed: false,
        }
    }

    pub fn owner(&self) -> Identity {
        self.owner
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Fail unless the system still accepts changes
    pub fn ensure_alive(&self) -> Result<(), MarketplaceError> {
        if self.destroyed {
            return Err(MarketplaceError::SystemDestroyed);
        }
        Ok(())
    }

    /// Fail unless lifecycle operations are currently allowed
    pub fn ensure_running(&self) -> Result<(), MarketplaceError> {
        self.ensure_alive()?;
        if self.stopped {
            return Err(MarketplaceError::SystemStopped);
        }
        Ok(())
    }

    /// Fail unless the system is paused
    pub fn ensure_stopped(&self) -> Result<(), MarketplaceError> {
        self.ensure_alive()?;
        if !self.stopped {
            return Err(MarketplaceError::SystemNotStopped);
        }
        Ok(())
    }

    /// Fail unless `caller` is the admin
    pub fn ensure_owner(&self, caller: &Identity) -> Result<(), MarketplaceError> {
        if *caller != self.owner {
            return Err(MarketplaceError::OnlyOwner { caller: *caller });
        }
        Ok(())
    }

    pub(crate) fn set_stopped(&mut self, stopped: bool) {
        self.stopped = stopped;
    }

    pub(crate) fn set_destroyed(&mut self, destroyed: bool) {
        self.destroyed = destroyed;
    }

    pub(crate) fn set_owner(&mut self, owner: Identity) {
        self.owner = owner;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> Identity {
        Identity::new([0xad; 20])
    }

    #[test]
    fn test_new_context_is_running() {
        let context = AdminContext::new(admin());
        assert_eq!(context.owner(), admin());
        assert!(context.ensure_running().is_ok());
        assert_eq!(context.ensure_stopped(), Err(MarketplaceError::SystemNotStopped));
    }

    #[test]
    fn test_ensure_owner() {
        let context = AdminContext::new(admin());
        let stranger = Identity::new([1; 20]);

        assert!(context.ensure_owner(&admin()).is_ok());
        assert_eq!(
            context.ensure_owner(&stranger),
            Err(MarketplaceError::OnlyOwner { caller: stranger })
        );
    }

    #[test]
    fn test_stopped_context() {
        let mut context = AdminContext::new(admin());
        context.set_stopped(true);

        assert_eq!(context.ensure_running(), Err(MarketplaceError::SystemStopped));
        assert!(context.ensure_stopped().is_ok());
    }

    #[test]
    fn test_destroyed_context_rejects_everything() {
        let mut context = AdminContext::new(admin());
        context.set_stopped(true);
        context.set_destroyed(true);

        assert_eq!(context.ensure_alive(), Err(MarketplaceError::SystemDestroyed));
        assert_eq!(context.ensure_running(), Err(MarketplaceError::SystemDestroyed));
        assert_eq!(context.ensure_stopped(), Err(MarketplaceError::SystemDestroyed));
    }
}
