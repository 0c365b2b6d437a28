#![forbid(unsafe_code)]

//! Lazily registered window class.

use crate::config::WindowClassConfig;
use crate::error::PlatformError;
use crate::host::{ClassAtom, PlatformHost};

/// Registers its class with the host on first use and returns the cached
/// atom afterwards.
#[derive(Debug, Clone)]
pub struct WindowClass {
    config: WindowClassConfig,
    atom: Option<ClassAtom>,
}

impl WindowClass {
    #[must_use]
    pub fn new(config: WindowClassConfig) -> Self {
        Self { config, atom: None }
    }

    pub fn config(&self) -> &WindowClassConfig {
        &self.config
    }

    /// The atom, if registration already happened.
    pub fn atom(&self) -> Option<ClassAtom> {
        self.atom
    }

    pub fn ensure_registered<H: PlatformHost + ?Sized>(
        &mut self,
        host: &mut H,
    ) -> Result<ClassAtom, PlatformError> {
        if let Some(atom) = self.atom {
            return Ok(atom);
        }
        let atom = host.register_window_class(&self.config)?;
        arbor_core::debug!(class = %self.config.name, atom = atom.0, "window class registered");
        self.atom = Some(atom);
        Ok(atom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{HeadlessHost, HostCall};

    #[test]
    fn registers_once() {
        let mut host = HeadlessHost::new();
        let mut class = WindowClass::new(WindowClassConfig::new("Main"));
        let first = class.ensure_registered(&mut host).unwrap();
        let second = class.ensure_registered(&mut host).unwrap();
        assert_eq!(first, second);
        let registrations = host
            .calls()
            .iter()
            .filter(|call| matches!(call, HostCall::RegisterClass(_)))
            .count();
        assert_eq!(registrations, 1);
    }

    #[test]
    fn failure_is_not_cached() {
        let mut host = HeadlessHost::new();
        host.fail_class_registration("denied");
        let mut class = WindowClass::new(WindowClassConfig::default());
        assert!(matches!(
            class.ensure_registered(&mut host),
            Err(PlatformError::ClassRegistration { .. })
        ));
        assert!(class.atom().is_none());
        assert!(class.ensure_registered(&mut host).is_ok());
    }
}
