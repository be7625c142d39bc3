//! # Config Command
//!
//! Prints the configuration the other commands run with.

use tracing::debug;

use super::{respond, CommandResult};
use crate::state::ConfigState;

/// Gets the current application configuration.
///
/// ## When Used
/// - Checking which data directory is in use
/// - Verifying `BREW_*` overrides
pub fn get_config(config: &ConfigState) -> CommandResult {
    debug!("get_config command");
    respond(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_config_is_camel_case() {
        let value = get_config(&ConfigState::default()).unwrap();
        assert_eq!(value["storeName"], "Brew Coffee House");
        assert_eq!(value["minRedeemPoints"], 10);
        assert_eq!(value["dataDir"], "data");
    }
}
