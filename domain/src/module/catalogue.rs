//! Platform module catalogue
//!
//! Names of modules shipped with the Java runtime. Requirements on these never
//! need resolution. The built-in list matches a JDK 21 image; a build can
//! replace it with the output of `java --list-modules` or extend it from
//! configuration.

use std::collections::BTreeSet;

const JDK_MODULES: &[&str] = &[
    "java.base",
    "java.compiler",
    "java.datatransfer",
    "java.desktop",
    "java.instrument",
    "java.logging",
    "java.management",
    "java.management.rmi",
    "java.naming",
    "java.net.http",
    "java.prefs",
    "java.rmi",
    "java.scripting",
    "java.se",
    "java.security.jgss",
    "java.security.sasl",
    "java.smartcardio",
    "java.sql",
    "java.sql.rowset",
    "java.transaction.xa",
    "java.xml",
    "java.xml.crypto",
    "jdk.accessibility",
    "jdk.attach",
    "jdk.charsets",
    "jdk.compiler",
    "jdk.crypto.cryptoki",
    "jdk.crypto.ec",
    "jdk.dynalink",
    "jdk.editpad",
    "jdk.hotspot.agent",
    "jdk.httpserver",
    "jdk.incubator.vector",
    "jdk.internal.ed",
    "jdk.internal.jvmstat",
    "jdk.internal.le",
    "jdk.internal.opt",
    "jdk.internal.vm.ci",
    "jdk.jartool",
    "jdk.javadoc",
    "jdk.jcmd",
    "jdk.jconsole",
    "jdk.jdeps",
    "jdk.jdi",
    "jdk.jdwp.agent",
    "jdk.jfr",
    "jdk.jlink",
    "jdk.jpackage",
    "jdk.jshell",
    "jdk.jsobject",
    "jdk.jstatd",
    "jdk.localedata",
    "jdk.management",
    "jdk.management.agent",
    "jdk.management.jfr",
    "jdk.naming.dns",
    "jdk.naming.rmi",
    "jdk.net",
    "jdk.nio.mapmode",
    "jdk.random",
    "jdk.sctp",
    "jdk.security.auth",
    "jdk.security.jgss",
    "jdk.unsupported",
    "jdk.unsupported.desktop",
    "jdk.xml.dom",
    "jdk.zipfs",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemCatalogue {
    modules: BTreeSet<String>,
}

impl Default for SystemCatalogue {
    fn default() -> Self {
        Self::jdk()
    }
}

impl SystemCatalogue {
    /// Built-in JDK module list
    pub fn jdk() -> Self {
        Self::of(JDK_MODULES.iter().copied())
    }

    pub fn empty() -> Self {
        Self::of(std::iter::empty::<&str>())
    }

    pub fn of<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            modules: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse `java --list-modules` output: one `name@version` per line
    pub fn from_list_modules(output: &str) -> Self {
        Self::of(
            output
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(|line| line.split_once('@').map_or(line, |(name, _)| name)),
        )
    }

    pub fn with<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modules.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains(name)
    }

    pub fn declared(&self) -> &BTreeSet<String> {
        &self.modules
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
