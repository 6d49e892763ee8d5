//! Control map modifiers
//!
//! A modifier owns one control key. It reads the resource named by that key,
//! parses it, and puts the parsed table back under the same key.

use crate::app::adapters::file_resolver::FileResolver;
use crate::app::services::control_map::{ControlKey, ControlMap, ControlValue};
use crate::{Error, Result};
use std::io::BufRead;
use tracing::debug;

/// Whether a modifier's record must be present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Required,
    /// A blank or missing record installs the modifier's default
    Optional,
}

/// Replaces a resource name in the control map with the parsed resource
pub trait ControlMapModifier {
    /// Key whose value is the resource name and receives the parsed result
    fn control_key(&self) -> ControlKey;

    fn requirement(&self) -> Requirement {
        Requirement::Required
    }

    /// Value installed when an optional record is blank or missing
    fn default_value(&self, _map: &ControlMap) -> Result<ControlValue> {
        Ok(ControlValue::Absent)
    }

    /// Parse the named resource
    ///
    /// Earlier phases have already resolved the definitions a resource refers
    /// to, so implementations may read them from `map`. Modifiers that override
    /// [`modify`](Self::modify) without reading a resource keep this default.
    fn parse(&self, _input: &mut dyn BufRead, _map: &ControlMap) -> Result<ControlValue> {
        Err(Error::configuration(format!(
            "{} is resolved without parsing a resource",
            self.control_key()
        )))
    }

    /// Resolve the key in place
    ///
    /// The resolver is not consulted when an optional record falls back to its
    /// default. The input handle is dropped before the map is updated.
    fn modify(&self, map: &mut ControlMap, resolver: &dyn FileResolver) -> Result<()> {
        let key = self.control_key();
        let Some(name) = map.file_name(key)? else {
            return match self.requirement() {
                Requirement::Optional => {
                    debug!("{} not given, using its default", key);
                    let value = self.default_value(map)?;
                    map.insert(key, value);
                    Ok(())
                }
                Requirement::Required => Err(Error::missing_control(key)),
            };
        };

        let value = parse_resource(resolver, &name, |input| self.parse(input, map))?;
        debug!("Resolved {} from {}", key, resolver.describe(&name));
        map.insert(key, value);
        Ok(())
    }
}

/// Open a named resource and run `parse` on it
///
/// Parse failures are wrapped with the resolver's description of the resource.
pub fn parse_resource<T>(
    resolver: &dyn FileResolver,
    name: &str,
    parse: impl FnOnce(&mut dyn BufRead) -> Result<T>,
) -> Result<T> {
    let mut input = resolver.resolve_for_input(name)?;
    parse(&mut *input).map_err(|error| Error::resource_parse(resolver.describe(name), error))
}
