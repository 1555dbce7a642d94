//! Test fixtures for common scenario layouts.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A scenario source tree: the project file, its sources, and the scenario
/// script that would drive it.
#[derive(Debug, Clone)]
pub struct ScenarioFixture {
    /// Files (path relative to the fixture root -> content).
    pub files: BTreeMap<PathBuf, String>,
}

impl ScenarioFixture {
    /// Create an empty fixture.
    pub fn new() -> Self {
        ScenarioFixture {
            files: BTreeMap::new(),
        }
    }

    /// A single-executable project named `hello`.
    pub fn hello() -> Self {
        ScenarioFixture::new()
            .with_file(
                "hello.gyp",
                r#"{
  'targets': [
    {
      'target_name': 'hello',
      'type': 'executable',
      'sources': [ 'hello.c' ],
    },
  ],
}
"#,
            )
            .with_file(
                "hello.c",
                "#include <stdio.h>\n\nint main(void) {\n  printf(\"Hello, world!\\n\");\n  return 0;\n}\n",
            )
            .with_file("gyptest-hello.py", "#!/usr/bin/env python\n")
    }

    /// Add a file.
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    /// Write the fixture under `root`.
    pub fn write_to(&self, root: &Path) {
        for (path, content) in &self.files {
            let full = root.join(path);
            if let Some(parent) = full.parent() {
                std::fs::create_dir_all(parent).expect("failed to create fixture dir");
            }
            std::fs::write(&full, content).expect("failed to write fixture file");
        }
    }

    /// Write the fixture into a fresh temporary directory.
    pub fn create(&self) -> tempfile::TempDir {
        let tmp = tempfile::TempDir::new().expect("failed to create temp dir");
        self.write_to(tmp.path());
        tmp
    }
}

impl Default for ScenarioFixture {
    fn default() -> Self {
        Self::new()
    }
}
