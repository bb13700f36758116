//! Assembling and linking through the system C compiler driver.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// Compiler driver used when `MINO_CC` is unset.
pub const DEFAULT_CC: &str = "gcc";

#[derive(Error, Debug)]
pub enum ToolchainError {
    #[error("C compiler '{cc}' not found: {source}")]
    NotFound {
        cc: String,
        #[source]
        source: std::io::Error,
    },
    #[error("'{cc}' failed ({status}): {stderr}")]
    Failed {
        cc: String,
        status: String,
        stderr: String,
    },
    #[error("Unsupported runtime artifact '{}': expected a .a, .o or .c file", .path.display())]
    UnsupportedRuntime { path: PathBuf },
}

/// The runtime providing `initSystem` and the `sys_*` routines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeArtifact {
    /// A `libNAME.a` archive, linked with `-L<dir> -lNAME`.
    Library { dir: PathBuf, name: String },
    /// Any other file the driver accepts directly: archives, objects, C sources.
    File(PathBuf),
}

impl RuntimeArtifact {
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, ToolchainError> {
        let path = path.into();
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        if !matches!(extension, "a" | "o" | "c") {
            return Err(ToolchainError::UnsupportedRuntime { path });
        }

        let library = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(|stem| stem.strip_prefix("lib"))
            .filter(|name| extension == "a" && !name.is_empty())
            .map(str::to_string);

        Ok(match library {
            Some(name) => {
                let dir = match path.parent() {
                    Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                    _ => PathBuf::from("."),
                };
                RuntimeArtifact::Library { dir, name }
            }
            None => RuntimeArtifact::File(path),
        })
    }

    fn link_args(&self) -> Vec<OsString> {
        match self {
            RuntimeArtifact::Library { dir, name } => {
                let mut search = OsString::from("-L");
                search.push(dir);
                vec![search, OsString::from(format!("-l{name}"))]
            }
            RuntimeArtifact::File(path) => vec![path.clone().into_os_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub cc: String,
    pub runtime: Option<RuntimeArtifact>,
}

impl Toolchain {
    pub fn new(cc: impl Into<String>) -> Self {
        Self {
            cc: cc.into(),
            runtime: None,
        }
    }

    pub fn with_runtime(mut self, runtime: RuntimeArtifact) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Arguments for `cc -no-pie -o <output> <asm> [runtime] -lm`.
    pub fn link_args(&self, asm: &Path, output: &Path) -> Vec<OsString> {
        let mut args = vec![
            OsString::from("-no-pie"),
            OsString::from("-o"),
            output.as_os_str().to_owned(),
            asm.as_os_str().to_owned(),
        ];
        if let Some(runtime) = &self.runtime {
            args.extend(runtime.link_args());
        }
        args.push(OsString::from("-lm"));
        args
    }

    /// Assembles `asm` and links it into the executable `output`.
    pub fn link(&self, asm: &Path, output: &Path) -> Result<(), ToolchainError> {
        let result = Command::new(&self.cc)
            .args(self.link_args(asm, output))
            .output()
            .map_err(|source| ToolchainError::NotFound {
                cc: self.cc.clone(),
                source,
            })?;

        if !result.status.success() {
            return Err(ToolchainError::Failed {
                cc: self.cc.clone(),
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

impl Default for Toolchain {
    fn default() -> Self {
        Self::new(DEFAULT_CC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_link_args_without_runtime() {
        let toolchain = Toolchain::new("cc");
        let args = toolchain.link_args(Path::new("out.s"), Path::new("app"));
        assert_eq!(strings(args), ["-no-pie", "-o", "app", "out.s", "-lm"]);
    }

    #[test]
    fn test_library_runtime() {
        let runtime = RuntimeArtifact::from_path("build/lib/libminort.a").unwrap();
        assert_eq!(
            runtime,
            RuntimeArtifact::Library {
                dir: PathBuf::from("build/lib"),
                name: "minort".to_string()
            }
        );

        let toolchain = Toolchain::new("cc").with_runtime(runtime);
        let args = toolchain.link_args(Path::new("out.s"), Path::new("app"));
        assert_eq!(
            strings(args),
            ["-no-pie", "-o", "app", "out.s", "-Lbuild/lib", "-lminort", "-lm"]
        );
    }

    #[test]
    fn test_library_in_current_directory() {
        let runtime = RuntimeArtifact::from_path("libsys.a").unwrap();
        assert_eq!(
            runtime,
            RuntimeArtifact::Library {
                dir: PathBuf::from("."),
                name: "sys".to_string()
            }
        );
    }

    #[test]
    fn test_plain_runtime_files() {
        assert_eq!(
            RuntimeArtifact::from_path("System.c").unwrap(),
            RuntimeArtifact::File(PathBuf::from("System.c"))
        );
        assert_eq!(
            RuntimeArtifact::from_path("runtime.a").unwrap(),
            RuntimeArtifact::File(PathBuf::from("runtime.a"))
        );
        assert!(matches!(
            RuntimeArtifact::from_path("runtime.so"),
            Err(ToolchainError::UnsupportedRuntime { .. })
        ));
    }

    #[test]
    fn test_missing_compiler() {
        let toolchain = Toolchain::new("mino-test-no-such-compiler");
        let err = toolchain
            .link(Path::new("missing.s"), Path::new("missing.out"))
            .unwrap_err();
        assert!(matches!(err, ToolchainError::NotFound { .. }));
    }
}
