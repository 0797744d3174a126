//! Tweak chain
//!
//! A [`Tweak`] rewrites a [`ToolCall`] before it is dispatched. Tweaks are pure:
//! they see only the call, never the outcome of running it. A [`TweakChain`]
//! applies its tweaks in registration order, feeding each output into the next.

use std::fmt;
use std::sync::Arc;

use super::call::ToolCall;

/// Pure rewriting function applied to a call prior to dispatch
pub trait Tweak: Send + Sync {
    fn tweak(&self, call: ToolCall) -> ToolCall;
}

impl<F> Tweak for F
where
    F: Fn(ToolCall) -> ToolCall + Send + Sync,
{
    fn tweak(&self, call: ToolCall) -> ToolCall {
        self(call)
    }
}

/// Ordered sequence of tweaks, `t1 then t2 then ... then tn`
#[derive(Clone, Default)]
pub struct TweakChain {
    tweaks: Vec<Arc<dyn Tweak>>,
}

impl TweakChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, tweak: impl Tweak + 'static) -> Self {
        self.tweaks.push(Arc::new(tweak));
        self
    }

    pub fn push(&mut self, tweak: Arc<dyn Tweak>) {
        self.tweaks.push(tweak);
    }

    pub fn len(&self) -> usize {
        self.tweaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweaks.is_empty()
    }

    pub fn apply(&self, call: ToolCall) -> ToolCall {
        self.tweaks.iter().fold(call, |call, tweak| tweak.tweak(call))
    }
}

impl Tweak for TweakChain {
    fn tweak(&self, call: ToolCall) -> ToolCall {
        self.apply(call)
    }
}

impl fmt::Debug for TweakChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TweakChain")
            .field("len", &self.tweaks.len())
            .finish()
    }
}

/// Insert arguments right before the first occurrence of an anchor argument.
///
/// Used for tools that are sensitive to argument order, e.g. placing
/// `-encoding UTF-8` in front of `-d` for `javac`. Calls to other tools, and
/// calls without the anchor, pass through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertBefore {
    tool: String,
    anchor: String,
    arguments: Vec<String>,
}

impl InsertBefore {
    pub fn new<I, S>(tool: impl Into<String>, anchor: impl Into<String>, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tool: tool.into(),
            anchor: anchor.into(),
            arguments: arguments.into_iter().map(Into::into).collect(),
        }
    }
}

impl Tweak for InsertBefore {
    fn tweak(&self, call: ToolCall) -> ToolCall {
        if call.name() != self.tool {
            return call;
        }
        match call.position(&self.anchor) {
            Some(index) => call.inserted(index, self.arguments.iter().cloned()),
            None => call,
        }
    }
}

/// Append arguments to every call of one tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendArguments {
    tool: String,
    arguments: Vec<String>,
}

impl AppendArguments {
    pub fn new<I, S>(tool: impl Into<String>, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tool: tool.into(),
            arguments: arguments.into_iter().map(Into::into).collect(),
        }
    }
}

impl Tweak for AppendArguments {
    fn tweak(&self, call: ToolCall) -> ToolCall {
        if call.name() == self.tool {
            call.with_all(self.arguments.iter().cloned())
        } else {
            call
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn javac() -> ToolCall {
        ToolCall::new("javac").with_all(["--release", "21", "-d", "out/classes"])
    }

    #[test]
    fn test_insert_before_anchor() {
        let tweak = InsertBefore::new("javac", "-d", ["-encoding", "UTF-8"]);
        let call = tweak.tweak(javac());
        assert_eq!(
            call.to_string(),
            "javac --release 21 -encoding UTF-8 -d out/classes"
        );
    }

    #[test]
    fn test_insert_before_ignores_other_tools_and_missing_anchor() {
        let tweak = InsertBefore::new("javac", "-d", ["-encoding", "UTF-8"]);
        let jar = ToolCall::new("jar").with_all(["-d", "x"]);
        assert_eq!(tweak.tweak(jar.clone()), jar);

        let no_anchor = ToolCall::new("javac").with("--version");
        assert_eq!(tweak.tweak(no_anchor.clone()), no_anchor);
    }

    #[test]
    fn test_chain_applies_in_registration_order() {
        let chain = TweakChain::new()
            .with(|call: ToolCall| call.with("first"))
            .with(|call: ToolCall| call.with("second"));
        let call = chain.apply(ToolCall::new("tool"));
        assert_eq!(call.arguments(), &["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn test_chain_feeds_output_forward() {
        let chain = TweakChain::new()
            .with(AppendArguments::new("javac", ["-Xlint"]))
            .with(InsertBefore::new("javac", "-Xlint", ["-g"]));
        let call = chain.apply(ToolCall::new("javac"));
        assert_eq!(call.to_string(), "javac -g -Xlint");
    }

    #[test]
    fn test_empty_chain_is_identity() {
        let chain = TweakChain::new();
        assert!(chain.is_empty());
        assert_eq!(chain.apply(javac()), javac());
    }

    #[test]
    fn test_chain_is_itself_a_tweak() {
        let inner = TweakChain::new().with(AppendArguments::new("jar", ["--verbose"]));
        let call = inner.tweak(ToolCall::new("jar"));
        assert_eq!(call.arguments(), &["--verbose".to_string()]);
        assert_eq!(inner.len(), 1);
    }
}
