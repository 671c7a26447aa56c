//! Configuration store and activation lifecycle
//!
//! The lifecycle only moves forward:
//!
//! ```text
//! Uninitialized --install--> Configured --activate--> Active
//!                                 ^                      |
//!                                 +------install---------+
//! ```
//!
//! Installing a different configuration while active re-enters `Configured`;
//! nothing ever returns to `Uninitialized`.

use dia_core::{DiaError, Result, StateMachine};
use serde::{Deserialize, Serialize};

/// Session configuration supplied by the host
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiaConfig {
    pub locale: String,
}

impl DiaConfig {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
        }
    }
}

impl Default for DiaConfig {
    fn default() -> Self {
        Self::new("zh-CN")
    }
}

/// Activation lifecycle state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationState {
    #[default]
    Uninitialized,
    Configured,
    Active,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum LifecycleEvent {
    Install,
    Activate,
}

/// Result of [`ConfigStore::install`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The same configuration was already installed; nothing changed
    Unchanged,
    /// The configuration was stored and the lifecycle moved to `Configured`
    Installed { locale_changed: bool },
}

/// Holds the installed configuration and the activation state
#[derive(Debug)]
pub struct ConfigStore {
    config: Option<DiaConfig>,
    lifecycle: StateMachine<ActivationState, LifecycleEvent>,
}

impl ConfigStore {
    pub fn new() -> Self {
        let lifecycle = StateMachine::builder(ActivationState::Uninitialized)
            .on(
                ActivationState::Uninitialized,
                LifecycleEvent::Install,
                ActivationState::Configured,
            )
            .on(
                ActivationState::Configured,
                LifecycleEvent::Install,
                ActivationState::Configured,
            )
            .on(
                ActivationState::Active,
                LifecycleEvent::Install,
                ActivationState::Configured,
            )
            .on(
                ActivationState::Configured,
                LifecycleEvent::Activate,
                ActivationState::Active,
            )
            .build();

        Self {
            config: None,
            lifecycle,
        }
    }

    pub fn config(&self) -> Option<&DiaConfig> {
        self.config.as_ref()
    }

    pub fn locale(&self) -> Option<&str> {
        self.config.as_ref().map(|c| c.locale.as_str())
    }

    pub fn state(&self) -> ActivationState {
        self.lifecycle.current_state()
    }

    pub fn is_active(&self) -> bool {
        self.lifecycle.is_in(ActivationState::Active)
    }

    /// Store a configuration; identical re-installs are ignored
    pub fn install(&mut self, config: DiaConfig) -> InstallOutcome {
        if self.config.as_ref() == Some(&config) {
            return InstallOutcome::Unchanged;
        }

        let locale_changed = self
            .config
            .as_ref()
            .map_or(true, |current| current.locale != config.locale);

        tracing::debug!("ConfigStore::install - locale {}", config.locale);
        self.config = Some(config);
        self.lifecycle.send(LifecycleEvent::Install);

        InstallOutcome::Installed { locale_changed }
    }

    /// Move from `Configured` to `Active`
    ///
    /// Already active is a no-op. Before any configuration is installed this
    /// returns [`DiaError::NotConfigured`] and leaves the state untouched.
    pub fn activate(&mut self) -> Result<()> {
        match self.state() {
            ActivationState::Uninitialized => Err(DiaError::NotConfigured),
            ActivationState::Active => Ok(()),
            ActivationState::Configured => {
                self.lifecycle.send(LifecycleEvent::Activate);
                tracing::debug!("ConfigStore::activate - now active");
                Ok(())
            }
        }
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activate_before_install_fails() {
        let mut store = ConfigStore::new();

        assert_eq!(store.activate(), Err(DiaError::NotConfigured));
        assert_eq!(store.state(), ActivationState::Uninitialized);
    }

    #[test]
    fn test_install_then_activate() {
        let mut store = ConfigStore::new();

        assert_eq!(
            store.install(DiaConfig::new("zh-CN")),
            InstallOutcome::Installed {
                locale_changed: true
            }
        );
        assert_eq!(store.state(), ActivationState::Configured);
        assert_eq!(store.activate(), Ok(()));
        assert!(store.is_active());
        assert_eq!(store.locale(), Some("zh-CN"));
    }

    #[test]
    fn test_identical_install_is_idempotent() {
        let mut store = ConfigStore::new();
        store.install(DiaConfig::new("zh-CN"));
        store.activate().unwrap();

        assert_eq!(
            store.install(DiaConfig::new("zh-CN")),
            InstallOutcome::Unchanged
        );
        assert_eq!(store.state(), ActivationState::Active);
    }

    #[test]
    fn test_reinstall_reenters_configured() {
        let mut store = ConfigStore::new();
        store.install(DiaConfig::new("zh-CN"));
        store.activate().unwrap();

        store.install(DiaConfig::new("en-US"));
        assert_eq!(store.state(), ActivationState::Configured);
        store.activate().unwrap();
        assert_eq!(store.state(), ActivationState::Active);
        assert_eq!(store.locale(), Some("en-US"));
    }

    #[test]
    fn test_activate_is_idempotent() {
        let mut store = ConfigStore::new();
        store.install(DiaConfig::default());
        store.activate().unwrap();
        assert_eq!(store.activate(), Ok(()));
        assert!(store.is_active());
    }
}
