use modbuild_domain::{AppendArguments, InsertBefore, TweakChain};
use serde::{Deserialize, Serialize};

/// Raw `[tweaks]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTweaksConfig {
    /// Source encoding passed to javac; empty disables the tweak
    pub encoding: String,
    /// Appended to every javac call
    pub javac: Vec<String>,
    /// Appended to every jar call
    pub jar: Vec<String>,
}

impl Default for FileTweaksConfig {
    fn default() -> Self {
        Self {
            encoding: "UTF-8".to_string(),
            javac: Vec::new(),
            jar: Vec::new(),
        }
    }
}

impl FileTweaksConfig {
    pub fn encoding(&self) -> Option<String> {
        let encoding = self.encoding.trim();
        (!encoding.is_empty()).then(|| encoding.to_string())
    }

    /// Encoding goes immediately before javac's `-d`
    pub fn to_tweak_chain(&self) -> TweakChain {
        let mut chain = TweakChain::new();
        if let Some(encoding) = self.encoding() {
            chain = chain.with(InsertBefore::new("javac", "-d", ["-encoding".to_string(), encoding]));
        }
        if !self.javac.is_empty() {
            chain = chain.with(AppendArguments::new("javac", self.javac.iter().cloned()));
        }
        if !self.jar.is_empty() {
            chain = chain.with(AppendArguments::new("jar", self.jar.iter().cloned()));
        }
        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modbuild_domain::ToolCall;

    #[test]
    fn test_default_chain_injects_encoding_before_destination() {
        let chain = FileTweaksConfig::default().to_tweak_chain();
        let call = chain.apply(ToolCall::new("javac").with_all(["--module", "foo", "-d", "out"]));
        assert_eq!(call.to_string(), "javac --module foo -encoding UTF-8 -d out");
    }

    #[test]
    fn test_empty_encoding_and_extra_arguments() {
        let tweaks = FileTweaksConfig {
            encoding: " ".to_string(),
            javac: vec!["-Xlint".to_string()],
            jar: vec!["--no-compress".to_string()],
        };
        let chain = tweaks.to_tweak_chain();
        assert_eq!(chain.len(), 2);
        let call = chain.apply(ToolCall::new("javac").with_all(["-d", "out"]));
        assert_eq!(call.to_string(), "javac -d out -Xlint");
        let call = chain.apply(ToolCall::new("jar").with("--create"));
        assert_eq!(call.to_string(), "jar --create --no-compress");
    }
}
