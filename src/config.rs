//! Site configuration: built-in defaults, then `docsite.toml`, then CLI flags.
//!
//! Everything the pipeline needs is resolved once into a [`SiteConfig`] and
//! passed by reference; no component reads process-wide state.

use crate::error::ConfigError;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file looked up in the repository root when `--config` is absent.
pub const CONFIG_FILE_NAME: &str = "docsite.toml";

const DEFAULT_SOURCE_DIRS: &[&str] = &["src-local", "testCases", "postProcess"];
const DEFAULT_EXTENSIONS: &[&str] = &["c", "h", "py", "sh", "md"];
const DEFAULT_TERMS: &[&str] = &[
    "Basilisk",
    "CFD",
    "Navier-Stokes",
    "multiphase",
    "VOF",
    "volume of fluid",
    "surface tension",
    "viscoelastic",
    "adaptive mesh",
    "octree",
    "quadtree",
    "tracer",
    "interface",
    "bubble",
    "drop",
    "simulation",
];

/// On-disk representation of `docsite.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub output_dir: Option<PathBuf>,
    pub source_dirs: Option<Vec<String>>,
    pub extensions: Option<Vec<String>>,
    pub readme: Option<PathBuf>,
    pub template: Option<PathBuf>,
    pub darcsit_dir: Option<PathBuf>,
    pub css: Option<PathBuf>,
    pub base_url: Option<String>,
    pub site_url: Option<String>,
    pub pandoc: Option<String>,
    pub awk: Option<String>,
    pub local_sources_dir: Option<PathBuf>,
    pub include_fallback_url: Option<String>,
    pub key_sections: Option<Vec<String>>,
    pub seo: SeoFileConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeoFileConfig {
    pub image: Option<String>,
    pub terms: Option<Vec<String>>,
}

/// Command-line overrides, applied on top of the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub output_dir: Option<PathBuf>,
    pub source_dirs: Vec<String>,
    pub template: Option<PathBuf>,
    pub darcsit_dir: Option<PathBuf>,
    pub css: Option<PathBuf>,
    pub base_url: Option<String>,
    pub site_url: Option<String>,
    pub pandoc: Option<String>,
    pub awk: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SeoConfig {
    /// Image URL advertised in the page metadata (may be empty).
    pub image: String,
    /// Technical terms matched against page content for the keywords list.
    pub terms: Vec<String>,
}

/// Fully resolved configuration. All paths are absolute or root-relative
/// joined onto `root`.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub root: PathBuf,
    pub output_dir: PathBuf,
    pub source_dirs: Vec<String>,
    pub extensions: Vec<String>,
    pub readme: PathBuf,
    pub template: PathBuf,
    pub darcsit_dir: PathBuf,
    pub css: Option<PathBuf>,
    pub base_url: String,
    pub site_url: String,
    pub wiki_title: String,
    pub pandoc: String,
    pub awk: String,
    pub local_sources_dir: PathBuf,
    /// External URL for includes without a local match; `{}` is the include.
    pub include_fallback_url: String,
    /// Top-level directories whose pages get sitemap priority 0.8.
    pub key_sections: Vec<String>,
    pub seo: SeoConfig,
}

impl SiteConfig {
    /// Resolve the configuration for the repository at `root`.
    ///
    /// `config_path` overrides the default `docsite.toml` lookup; an explicit
    /// path that does not exist is an error, a missing default file is not.
    pub fn load(
        root: &Path,
        config_path: Option<&Path>,
        overrides: Overrides,
    ) -> Result<Self, ConfigError> {
        let file = match config_path {
            Some(path) => read_file_config(path)?,
            None => {
                let candidate = root.join(CONFIG_FILE_NAME);
                if candidate.is_file() {
                    read_file_config(&candidate)?
                } else {
                    FileConfig::default()
                }
            }
        };
        Ok(Self::resolve(root, file, overrides))
    }

    /// Merge defaults, file values, and overrides. Pure apart from reading
    /// the README for the wiki title.
    pub fn resolve(root: &Path, file: FileConfig, cli: Overrides) -> Self {
        let at_root = |p: PathBuf| if p.is_absolute() { p } else { root.join(p) };

        let basilisk = root.join("basilisk");
        let readme = at_root(file.readme.unwrap_or_else(|| PathBuf::from("README.md")));
        let wiki_title = fs::read_to_string(&readme)
            .map(|content| crate::index::wiki_title(&content))
            .unwrap_or_else(|_| crate::index::DEFAULT_WIKI_TITLE.to_string());

        let source_dirs = if cli.source_dirs.is_empty() {
            file.source_dirs
                .unwrap_or_else(|| DEFAULT_SOURCE_DIRS.iter().map(|s| s.to_string()).collect())
        } else {
            cli.source_dirs
        };

        let css = cli
            .css
            .or(file.css)
            .map(at_root)
            .or_else(|| Some(root.join(".github/assets/custom_styles.css")));

        let site_url = cli
            .site_url
            .or(file.site_url)
            .unwrap_or_default()
            .trim_end_matches('/')
            .to_string();

        SiteConfig {
            root: root.to_path_buf(),
            output_dir: at_root(cli.output_dir.or(file.output_dir).unwrap_or_else(|| "docs".into())),
            source_dirs,
            extensions: file
                .extensions
                .unwrap_or_else(|| DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect())
                .into_iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            readme,
            template: at_root(
                cli.template
                    .or(file.template)
                    .unwrap_or_else(|| ".github/assets/custom_template.html".into()),
            ),
            darcsit_dir: cli
                .darcsit_dir
                .or(file.darcsit_dir)
                .map(at_root)
                .unwrap_or_else(|| basilisk.join("src").join("darcsit")),
            css,
            base_url: cli.base_url.or(file.base_url).unwrap_or_else(|| "/".into()),
            site_url,
            wiki_title,
            pandoc: cli.pandoc.or(file.pandoc).unwrap_or_else(|| "pandoc".into()),
            awk: cli.awk.or(file.awk).unwrap_or_else(|| "awk".into()),
            local_sources_dir: at_root(
                file.local_sources_dir.unwrap_or_else(|| "src-local".into()),
            ),
            include_fallback_url: file
                .include_fallback_url
                .unwrap_or_else(|| "http://basilisk.fr/src/{}".into()),
            key_sections: file
                .key_sections
                .unwrap_or_else(|| vec!["src-local".to_string()]),
            seo: SeoConfig {
                image: file.seo.image.unwrap_or_default(),
                terms: file
                    .seo
                    .terms
                    .unwrap_or_else(|| DEFAULT_TERMS.iter().map(|s| s.to_string()).collect()),
            },
        }
    }

    /// Check that every required tool, template, and directory exists.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_dir("darcsit directory", &self.darcsit_dir)?;
        require_file("template", &self.template)?;
        require_file("literate-c script", &self.literate_c())?;
        require_file("decl_anchors.awk script", &self.decl_anchors())?;
        require_command("converter", &self.pandoc)?;
        require_command("stream editor", &self.awk)?;
        Ok(())
    }

    pub fn literate_c(&self) -> PathBuf {
        self.darcsit_dir.join("literate-c")
    }

    pub fn decl_anchors(&self) -> PathBuf {
        self.darcsit_dir.join("decl_anchors.awk")
    }

    pub fn index_path(&self) -> PathBuf {
        self.output_dir.join("index.html")
    }

    /// Output page for a source file: the source path mirrored under the
    /// output root with `.html` appended (`a/foo.c` → `docs/a/foo.c.html`).
    pub fn output_path_for(&self, source: &Path) -> PathBuf {
        let relative = source.strip_prefix(&self.root).unwrap_or(source);
        let mut name = relative.as_os_str().to_owned();
        name.push(".html");
        self.output_dir.join(name)
    }

    /// Stylesheet file name as linked from generated pages.
    pub fn css_name(&self) -> Option<String> {
        self.css
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
    }

    /// Whether `extension` (without the dot) is a recognized source extension.
    pub fn is_recognized(&self, extension: &str) -> bool {
        let ext = extension.to_ascii_lowercase();
        self.extensions.iter().any(|e| *e == ext)
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn require_file(what: &'static str, path: &Path) -> Result<(), ConfigError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ConfigError::MissingPath {
            what,
            path: path.to_path_buf(),
        })
    }
}

fn require_dir(what: &'static str, path: &Path) -> Result<(), ConfigError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(ConfigError::MissingPath {
            what,
            path: path.to_path_buf(),
        })
    }
}

fn require_command(what: &'static str, command: &str) -> Result<(), ConfigError> {
    if find_command(command).is_some() {
        Ok(())
    } else {
        Err(ConfigError::MissingCommand {
            what,
            command: command.to_string(),
        })
    }
}

/// Resolve a command the way a shell would: paths are checked directly,
/// bare names are searched on `PATH`.
pub fn find_command(command: &str) -> Option<PathBuf> {
    let path = Path::new(command);
    if path.components().count() > 1 {
        return path.is_file().then(|| path.to_path_buf());
    }
    env::var_os("PATH").and_then(|paths| {
        env::split_paths(&paths)
            .map(|dir| dir.join(command))
            .find(|candidate| candidate.is_file())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_follow_repository_layout() {
        let root = Path::new("/repo");
        let cfg = SiteConfig::resolve(root, FileConfig::default(), Overrides::default());
        assert_eq!(cfg.output_dir, PathBuf::from("/repo/docs"));
        assert_eq!(cfg.source_dirs, vec!["src-local", "testCases", "postProcess"]);
        assert_eq!(cfg.darcsit_dir, PathBuf::from("/repo/basilisk/src/darcsit"));
        assert_eq!(cfg.base_url, "/");
        assert_eq!(cfg.wiki_title, "Documentation");
        assert_eq!(cfg.css_name().as_deref(), Some("custom_styles.css"));
    }

    #[test]
    fn file_values_are_overridden_by_cli() {
        let file: FileConfig = toml::from_str(
            "output_dir = \"site\"\nbase_url = \"/wiki/\"\nsource_dirs = [\"lib\"]\n[seo]\nimage = \"logo.png\"\n",
        )
        .unwrap();
        let cli = Overrides {
            base_url: Some("/other/".into()),
            ..Overrides::default()
        };
        let cfg = SiteConfig::resolve(Path::new("/repo"), file, cli);
        assert_eq!(cfg.output_dir, PathBuf::from("/repo/site"));
        assert_eq!(cfg.base_url, "/other/");
        assert_eq!(cfg.source_dirs, vec!["lib"]);
        assert_eq!(cfg.seo.image, "logo.png");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<FileConfig>("outptu_dir = \"x\"").is_err());
    }

    #[test]
    fn output_path_keeps_source_extension() {
        let cfg = SiteConfig::resolve(Path::new("/repo"), FileConfig::default(), Overrides::default());
        assert_eq!(
            cfg.output_path_for(Path::new("/repo/src-local/foo.c")),
            PathBuf::from("/repo/docs/src-local/foo.c.html")
        );
        assert_eq!(
            cfg.output_path_for(Path::new("/repo/src-local/foo.h")),
            PathBuf::from("/repo/docs/src-local/foo.h.html")
        );
    }

    #[test]
    fn wiki_title_comes_from_readme() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("README.md"), "Intro\n# Drop Impact\n").unwrap();
        let cfg = SiteConfig::load(dir.path(), None, Overrides::default()).unwrap();
        assert_eq!(cfg.wiki_title, "Drop Impact");
    }

    #[test]
    fn validate_reports_missing_darcsit() {
        let dir = TempDir::new().unwrap();
        let cfg = SiteConfig::load(dir.path(), None, Overrides::default()).unwrap();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("darcsit directory"), "{err}");
    }

    #[test]
    fn explicit_missing_config_file_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(SiteConfig::load(dir.path(), Some(&missing), Overrides::default()).is_err());
    }
}
