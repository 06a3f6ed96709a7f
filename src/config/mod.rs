use std::{
    collections::HashMap,
    env,
    fs,
    path::{Path, PathBuf},
};

use directories::BaseDirs;

use crate::{
    cli::Cli,
    error::{Result, SweepError},
    process::Launcher,
    run::ArtifactLayout,
    scheduler::BatchScheduler,
};

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
    pub config_path: PathBuf,
}

impl Config {
    /// Defaults, overlaid with the default rc file if present, overlaid with `SWEEP_*` env vars.
    pub fn load() -> Self {
        let path = default_config_path();
        let text = fs::read_to_string(&path).unwrap_or_default();
        Self::from_rc_text(&text, &path).with_env()
    }

    /// Like [`Config::load`] but for an explicitly named rc file, which must be readable.
    pub fn load_from(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            SweepError::Config(format!("cannot read config file {}: {e}", path.display()))
        })?;
        Ok(Self::from_rc_text(&text, path).with_env())
    }

    // Environment variables take precedence
    fn with_env(mut self) -> Self {
        for (k, v) in env::vars() {
            if is_config_key(&k) {
                self.inner.insert(k, v);
            }
        }
        self
    }

    /// Defaults overlaid with `KEY=VALUE` lines; `#` starts a comment line.
    pub fn from_rc_text(text: &str, path: &Path) -> Self {
        let mut map = default_map();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((k, v)) = line.split_once('=') {
                map.insert(k.trim().to_string(), v.trim().to_string());
            }
        }
        Self { inner: map, config_path: path.to_path_buf() }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).cloned()
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key)
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    pub fn get_u32(&self, key: &str) -> Result<u32> {
        let raw = self.get(key).unwrap_or_default();
        raw.trim()
            .parse::<u32>()
            .map_err(|_| SweepError::Config(format!("{key}: expected a positive integer, got {raw:?}")))
    }

    pub fn get_list(&self, key: &str) -> Result<Vec<u32>> {
        parse_list(key, &self.get(key).unwrap_or_default())
    }

    pub fn get_path(&self, key: &str) -> Option<PathBuf> {
        self.get(key).map(PathBuf::from)
    }
}

fn is_config_key(k: &str) -> bool {
    k.starts_with("SWEEP_")
}

fn default_config_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("speedup_sweep").join(".sweeprc")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();

    // Sweep
    m.insert("SWEEP_GENERATIONS".into(), "100".into());
    m.insert("SWEEP_SIZES".into(), "10,15,1000,2000,3000,5000".into());
    m.insert("SWEEP_WORKERS".into(), "4,8,12,16,20,24,28,32,64,128".into());

    // Executable
    m.insert("SWEEP_EXECUTABLE".into(), "life_mpi".into());
    m.insert("SWEEP_LAUNCHER".into(), "mpiexec -n".into());

    // Paths
    m.insert("SWEEP_INPUT_DIR".into(), "inputs".into());
    m.insert("SWEEP_OUTPUT_DIR".into(), "outputs".into());
    m.insert("SWEEP_BASE_NAME".into(), "bacteria".into());

    // Bools as strings
    m.insert("SWEEP_PLOT".into(), "true".into());
    m.insert("SWEEP_QUIET_RUNS".into(), "false".into());
    m.insert("SWEEP_CLEAR_ARTIFACTS".into(), "false".into());

    m
}

/// Comma separated positive integers.
pub fn parse_list(key: &str, raw: &str) -> Result<Vec<u32>> {
    raw.split(',')
        .map(str::trim)
        .map(|s| {
            if s.is_empty() {
                return Err(SweepError::Config(format!("{key}: empty entry in {raw:?}")));
            }
            s.parse::<u32>()
                .map_err(|_| SweepError::Config(format!("{key}: {s:?} is not a positive integer")))
        })
        .collect()
}

/// Fully resolved, validated sweep settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepSettings {
    pub generations: u32,
    pub sizes: Vec<u32>,
    pub workers: Vec<u32>,
    pub executable: PathBuf,
    pub launcher: Vec<String>,
    pub layout: ArtifactLayout,
    pub plot: bool,
    pub quiet_runs: bool,
    pub clear_artifacts: bool,
}

impl SweepSettings {
    /// CLI flags override config values.
    pub fn resolve(cfg: &Config, cli: &Cli) -> Result<Self> {
        let generations = match cli.generations {
            Some(g) => g,
            None => cfg.get_u32("SWEEP_GENERATIONS")?,
        };
        let sizes = match &cli.sizes {
            Some(raw) => parse_list("--sizes", raw)?,
            None => cfg.get_list("SWEEP_SIZES")?,
        };
        let workers = match &cli.workers {
            Some(raw) => parse_list("--workers", raw)?,
            None => cfg.get_list("SWEEP_WORKERS")?,
        };
        let executable = cli
            .executable
            .clone()
            .or_else(|| cfg.get_path("SWEEP_EXECUTABLE"))
            .unwrap_or_default();
        let launcher = cli
            .launcher
            .clone()
            .or_else(|| cfg.get("SWEEP_LAUNCHER"))
            .unwrap_or_default()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        let layout = ArtifactLayout::new(
            cli.input_dir.clone().or_else(|| cfg.get_path("SWEEP_INPUT_DIR")).unwrap_or_default(),
            cli.output_dir.clone().or_else(|| cfg.get_path("SWEEP_OUTPUT_DIR")).unwrap_or_default(),
            cli.base_name.clone().or_else(|| cfg.get("SWEEP_BASE_NAME")).unwrap_or_default(),
        );

        let settings = Self {
            generations,
            sizes,
            workers,
            executable,
            launcher,
            layout,
            plot: !cli.no_plot && cfg.get_bool("SWEEP_PLOT"),
            quiet_runs: cli.quiet_runs || cfg.get_bool("SWEEP_QUIET_RUNS"),
            clear_artifacts: cli.clear_artifacts || cfg.get_bool("SWEEP_CLEAR_ARTIFACTS"),
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.generations == 0 {
            return Err(SweepError::Config("generation count must be positive".into()));
        }
        check_levels("grid sizes", &self.sizes)?;
        check_levels("worker counts", &self.workers)?;
        if self.workers.windows(2).any(|w| w[0] >= w[1]) {
            return Err(SweepError::Config(format!(
                "worker counts must be strictly ascending, got {:?}",
                self.workers
            )));
        }
        if self.executable.as_os_str().is_empty() {
            return Err(SweepError::Config("no executable configured".into()));
        }
        Ok(())
    }

    pub fn scheduler(&self) -> BatchScheduler {
        let launcher = Launcher {
            launcher: self.launcher.clone(),
            executable: self.executable.clone(),
            generations: self.generations,
            layout: self.layout.clone(),
            quiet: self.quiet_runs,
            stdout_to_stderr: false,
        };
        let mut scheduler = BatchScheduler::new(launcher, self.sizes.clone(), self.workers.clone());
        scheduler.clear_artifacts = self.clear_artifacts;
        scheduler
    }
}

fn check_levels(what: &str, levels: &[u32]) -> Result<()> {
    if levels.is_empty() {
        return Err(SweepError::Config(format!("no {what} configured")));
    }
    if levels.contains(&0) {
        return Err(SweepError::Config(format!("{what} must be positive, got {levels:?}")));
    }
    let mut seen = levels.to_vec();
    seen.sort_unstable();
    seen.dedup();
    if seen.len() != levels.len() {
        return Err(SweepError::Config(format!("duplicate {what} in {levels:?}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(text: &str) -> Config {
        Config::from_rc_text(text, Path::new(".sweeprc"))
    }

    #[test]
    fn defaults_match_the_full_sweep() {
        let s = SweepSettings::resolve(&cfg(""), &Cli::default()).unwrap();
        assert_eq!(s.generations, 100);
        assert_eq!(s.sizes, vec![10, 15, 1000, 2000, 3000, 5000]);
        assert_eq!(s.workers, vec![4, 8, 12, 16, 20, 24, 28, 32, 64, 128]);
        assert_eq!(s.launcher, vec!["mpiexec", "-n"]);
        assert_eq!(s.layout, ArtifactLayout::default());
        assert!(s.plot);
        assert!(!s.clear_artifacts);
    }

    #[test]
    fn rc_file_then_cli_override() {
        let c = cfg("# local run\nSWEEP_SIZES = 10, 15\nSWEEP_WORKERS=4,8\nSWEEP_PLOT=false\n");
        let cli = Cli {
            workers: Some("2,4,6".into()),
            launcher: Some(String::new()),
            ..Cli::default()
        };
        let s = SweepSettings::resolve(&c, &cli).unwrap();
        assert_eq!(s.sizes, vec![10, 15]);
        assert_eq!(s.workers, vec![2, 4, 6]);
        assert!(s.launcher.is_empty());
        assert!(!s.plot);
    }

    #[test]
    fn explicit_config_file_must_exist() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("nope.sweeprc");
        let err = Config::load_from(&missing).unwrap_err();
        assert!(matches!(err, SweepError::Config(ref msg) if msg.contains("nope.sweeprc")), "{err}");

        // A directory is not a readable rc file either.
        assert!(matches!(Config::load_from(dir.path()), Err(SweepError::Config(_))));
    }

    #[test]
    fn explicit_config_file_is_read() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(".sweeprc");
        fs::write(&path, "SWEEP_GENERATIONS=250\n").unwrap();
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.config_path, path);
        assert_eq!(cfg.get_u32("SWEEP_GENERATIONS").unwrap(), 250);
    }

    #[test]
    fn list_entries_must_not_be_empty() {
        for raw in ["10,,15", "10,15,", ",10", "", " , "] {
            assert!(matches!(parse_list("--sizes", raw), Err(SweepError::Config(_))), "{raw:?}");
        }
        assert_eq!(parse_list("--sizes", " 10, 15 ").unwrap(), vec![10, 15]);
    }

    #[test]
    fn rejects_bad_levels() {
        for text in [
            "SWEEP_WORKERS=8,4",
            "SWEEP_WORKERS=4,4",
            "SWEEP_SIZES=",
            "SWEEP_SIZES=10,0",
            "SWEEP_SIZES=10,abc",
            "SWEEP_SIZES=10,,15",
            "SWEEP_GENERATIONS=0",
            "SWEEP_EXECUTABLE=",
        ] {
            let err = SweepSettings::resolve(&cfg(text), &Cli::default()).unwrap_err();
            assert!(matches!(err, SweepError::Config(_)), "{text}: {err}");
        }
    }
}
