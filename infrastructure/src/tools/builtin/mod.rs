//! Built-in tools
//!
//! Small in-process tools registered under the `modbuild` namespace:
//!
//! | Tool | Arguments | Purpose |
//! |------|-----------|---------|
//! | `banner` | `TEXT...` | framed headline for build output |
//! | `checksum` | `FILE [ALGORITHM [EXPECTED]]` | print or verify a file digest |
//! | `tree` | `[DIR [REGEX]]` | list files below a directory |

mod banner;
mod checksum;
mod tree;

use super::registry::ToolRegistry;

pub use banner::banner;
pub use checksum::{CHECKSUM_MISMATCH_CODE, checksum};
pub use tree::tree;

pub const BUILTIN_NAMESPACE: &str = "modbuild";

/// Registry holding every built-in tool
pub fn builtin_tools() -> ToolRegistry {
    ToolRegistry::new(BUILTIN_NAMESPACE)
        .register("banner", banner)
        .register("checksum", checksum)
        .register("tree", tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use modbuild_domain::ToolFinder;

    #[test]
    fn test_builtins_registered() {
        let registry = builtin_tools();
        let ids: Vec<String> = registry
            .find_all()
            .iter()
            .map(|t| t.identifier().to_string())
            .collect();
        assert_eq!(ids, vec!["modbuild/banner", "modbuild/checksum", "modbuild/tree"]);
    }
}
