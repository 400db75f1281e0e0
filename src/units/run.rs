//! Run-level configuration view and path factory.

use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::{debug, info, warn};
use serde_json::Value;

use super::{ReadGroup, Sample, UnitName};
use crate::config::{get_nested, load_config, parse_path, OUTPUT_DIR_KEY, SAMPLES_KEY, SETTINGS_KEY, WORKDIR_KEY};
use crate::error::{RattleError, Result};
use crate::memo::Memo;
use crate::paths::{
    substitute, Expander, GatherResolver, InputResolver, Level, ProductExpander, Wildcards,
    READ_GROUP_WILDCARD, SAMPLE_WILDCARD,
};

/// Run-level view over one pipeline invocation's configuration.
///
/// The raw configuration is shared, never copied. Samples and unit names are
/// computed on first access and cached for the lifetime of the run.
///
/// # Output Directory
///
/// Resolved in order of precedence:
/// 1. [`Run::with_output_dir`]
/// 2. The top-level `output_dir` entry of the configuration
/// 3. None; output path helpers then fail with [`RattleError::MissingOutputDir`]
///
/// # Example
///
/// ```
/// use rattle::{Level, Run, Wildcards};
/// use serde_json::json;
///
/// let run = Run::new(json!({
///     "samples": {"sample01": {"read_groups": {"rg01": {"r1": "input-rg01.txt"}}}}
/// }))
/// .with_output_dir("results");
///
/// let unit = &run.unit_names()[0];
/// let wildcards = Wildcards::for_unit(unit);
///
/// let r1 = run.config_input_func(Level::ReadGroup, "r1");
/// assert_eq!(r1.resolve(&wildcards).unwrap(), Some(json!("input-rg01.txt")));
///
/// let output = run.output_for("output-{sample}-{read_group}.txt", &wildcards).unwrap();
/// assert_eq!(output, "results/output-sample01-rg01.txt");
/// ```
pub struct Run {
    raw: Rc<Value>,
    output_dir: Option<PathBuf>,
    expander: Rc<dyn Expander>,
    samples: Memo<Vec<Sample>>,
    unit_names: Memo<Vec<UnitName>>,
}

impl Run {
    /// Wraps a raw configuration tree.
    pub fn new(raw: Value) -> Self {
        Self::from_shared(Rc::new(raw))
    }

    /// Wraps a raw configuration tree that is already shared.
    pub fn from_shared(raw: Rc<Value>) -> Self {
        let output_dir = raw
            .get(OUTPUT_DIR_KEY)
            .and_then(Value::as_str)
            .map(PathBuf::from);

        if let Some(dir) = &output_dir {
            debug!("Output directory from config: {}", dir.display());
        }

        Self {
            raw,
            output_dir,
            expander: Rc::new(ProductExpander),
            samples: Memo::new(),
            unit_names: Memo::new(),
        }
    }

    /// Loads the configuration document at `path` and wraps it.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(load_config(path)?))
    }

    /// Sets the output directory, overriding any value in the configuration.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        debug!("Output directory set explicitly: {}", dir.display());
        self.output_dir = Some(dir);
        self
    }

    /// Replaces the expander used by [`Run::rg_gather_func`].
    pub fn with_expander(mut self, expander: impl Expander + 'static) -> Self {
        self.expander = Rc::new(expander);
        self
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }

    /// Samples of the run, in document order.
    pub fn samples(&self) -> &[Sample] {
        self.samples.get_or_compute(|| {
            let samples: Vec<Sample> = match self.raw.get(SAMPLES_KEY) {
                Some(Value::Object(map)) => map
                    .keys()
                    .map(|name| Sample::new(Rc::clone(&self.raw), name.as_str()))
                    .collect(),
                _ => {
                    warn!("Config has no '{}' mapping; run has no samples", SAMPLES_KEY);
                    Vec::new()
                }
            };

            info!("Run has {} samples", samples.len());
            samples
        })
    }

    pub fn sample(&self, name: &str) -> Option<&Sample> {
        self.samples().iter().find(|sample| sample.name() == name)
    }

    /// Read group view addressed by a unit name.
    pub fn read_group(&self, unit: &UnitName) -> Option<&ReadGroup> {
        self.sample(&unit.sample)?.read_group(&unit.read_group)
    }

    /// The sample a read group belongs to.
    pub fn sample_of(&self, read_group: &ReadGroup) -> Option<&Sample> {
        self.sample(read_group.sample_name())
    }

    /// Every (sample, read group) pair, samples first, in document order.
    pub fn unit_names(&self) -> &[UnitName] {
        self.unit_names.get_or_compute(|| {
            let units: Vec<UnitName> = self.samples().iter().flat_map(Sample::unit_names).collect();
            debug!("Run has {} units", units.len());
            units
        })
    }

    /// Looks up a dotted path such as `settings.workdir` in the raw tree.
    pub fn get(&self, dotted: &str) -> Option<&Value> {
        get_nested(&self.raw, &parse_path(dotted))
    }

    /// Returns `settings.workdir`, or `default` if it is not set.
    pub fn get_workdir<'a>(&'a self, default: Option<&'a str>) -> Option<&'a str> {
        get_nested(&self.raw, &[SETTINGS_KEY.into(), WORKDIR_KEY.into()])
            .and_then(Value::as_str)
            .or(default)
    }

    /// Builds an input resolver reading `key` at the given level.
    ///
    /// The lookup path is `samples.<sample>.<key>` for [`Level::Sample`] and
    /// `samples.<sample>.read_groups.<read_group>.<key>` for
    /// [`Level::ReadGroup`]. A key written as `{name}` is read from the
    /// wildcard `name` at call time.
    pub fn config_input_func(&self, level: Level, key: impl Into<String>) -> InputResolver {
        InputResolver::new(Rc::clone(&self.raw), level, key)
    }

    /// Like [`Run::config_input_func`], with the level given as text.
    pub fn config_input_func_named(&self, level: &str, key: impl Into<String>) -> Result<InputResolver> {
        let level: Level = level.parse()?;
        Ok(self.config_input_func(level, key))
    }

    /// Builds a resolver expanding `pattern` across all read groups of a sample.
    ///
    /// `extra` supplies fixed values for other placeholders of the pattern.
    pub fn rg_gather_func<I, K, V>(&self, pattern: impl Into<String>, extra: I) -> GatherResolver
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        GatherResolver::new(Rc::clone(&self.raw), pattern, extra, Rc::clone(&self.expander))
    }

    /// Like [`Run::rg_gather_func`], with an explicit expander.
    pub fn rg_gather_func_with<I, K, V>(
        &self,
        pattern: impl Into<String>,
        extra: I,
        expander: Rc<dyn Expander>,
    ) -> GatherResolver
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        GatherResolver::new(Rc::clone(&self.raw), pattern, extra, expander)
    }

    /// Joins `fname` onto the output directory, leaving placeholders intact.
    pub fn output(&self, fname: &str) -> Result<String> {
        let dir = self.output_dir.as_ref().ok_or(RattleError::MissingOutputDir)?;
        Ok(dir.join(fname).to_string_lossy().into_owned())
    }

    /// Joins `fname` onto the output directory and fills in every placeholder
    /// that has a value in `wildcards`.
    pub fn output_for(&self, fname: &str, wildcards: &Wildcards) -> Result<String> {
        let joined = self.output(fname)?;
        Ok(substitute(&joined, wildcards.iter()))
    }

    /// Output path for a sample and read group.
    ///
    /// A value that is not given keeps its `{sample}` / `{read_group}`
    /// placeholder for the engine to fill in.
    pub fn make_output_fname(
        &self,
        fname: &str,
        sample: Option<&str>,
        read_group: Option<&str>,
    ) -> Result<String> {
        let mut wildcards = Wildcards::new();
        if let Some(sample) = sample {
            wildcards.insert(SAMPLE_WILDCARD, sample);
        }
        if let Some(read_group) = read_group {
            wildcards.insert(READ_GROUP_WILDCARD, read_group);
        }
        self.output_for(fname, &wildcards)
    }
}

impl fmt::Debug for Run {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Run")
            .field("output_dir", &self.output_dir)
            .field("samples", &self.samples)
            .field("unit_names", &self.unit_names)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::Substitutions;
    use serde_json::json;

    fn single_rg_config() -> Value {
        json!({
            "samples": {
                "sample01": {
                    "read_groups": {
                        "rg01": {"r1": "input-rg01.txt"}
                    }
                }
            }
        })
    }

    fn multi_config() -> Value {
        json!({
            "output_dir": "from-config",
            "settings": {"workdir": "/scratch/run1"},
            "samples": {
                "s2": {
                    "read_groups": {
                        "rgB": {"r1": "s2-rgB_R1.fq", "r2": "s2-rgB_R2.fq"},
                        "rgA": {"r1": "s2-rgA_R1.fq", "r2": "s2-rgA_R2.fq"},
                    }
                },
                "s1": {
                    "reference": "hg38.fa",
                    "read_groups": {
                        "rg1": {"r1": "s1-rg1_R1.fq", "r2": "s1-rg1_R2.fq"},
                    }
                },
            }
        })
    }

    #[test]
    fn test_single_read_group_scenario() {
        let run = Run::new(single_rg_config()).with_output_dir("results");

        assert_eq!(run.unit_names(), &[UnitName::new("sample01", "rg01")]);

        let wildcards = Wildcards::new()
            .with("sample", "sample01")
            .with("read_group", "rg01");
        let r1 = run.config_input_func(Level::ReadGroup, "r1");
        assert_eq!(r1.resolve(&wildcards).unwrap(), Some(json!("input-rg01.txt")));

        let output = run
            .output_for("output-{sample}-{read_group}.txt", &wildcards)
            .unwrap();
        assert_eq!(output, "results/output-sample01-rg01.txt");
    }

    #[test]
    fn test_unit_names_follow_document_order() {
        let run = Run::new(multi_config());
        assert_eq!(
            run.unit_names(),
            &[
                UnitName::new("s2", "rgB"),
                UnitName::new("s2", "rgA"),
                UnitName::new("s1", "rg1"),
            ]
        );
    }

    #[test]
    fn test_samples_and_units_are_cached() {
        let run = Run::new(multi_config());
        assert!(std::ptr::eq(run.samples(), run.samples()));
        assert!(std::ptr::eq(run.unit_names(), run.unit_names()));
        assert!(std::ptr::eq(
            run.sample("s2").unwrap().read_groups(),
            run.sample("s2").unwrap().read_groups()
        ));
    }

    #[test]
    fn test_sample_lookup() {
        let run = Run::new(multi_config());
        let sample = run.sample("s1").unwrap();
        assert_eq!(sample.get("reference"), Some(&json!("hg38.fa")));
        assert!(run.sample("s3").is_none());
    }

    #[test]
    fn test_read_group_to_sample_and_back() {
        let run = Run::new(multi_config());
        let unit = UnitName::new("s2", "rgA");

        let rg = run.read_group(&unit).unwrap();
        assert_eq!(rg.get("r2"), Some(&json!("s2-rgA_R2.fq")));

        let sample = run.sample_of(rg).unwrap();
        assert_eq!(sample.name(), "s2");
        assert_eq!(sample.read_group(rg.name()).unwrap().unit_name(), unit);

        assert!(run.read_group(&UnitName::new("s2", "rgZ")).is_none());
        assert!(run.read_group(&UnitName::new("s9", "rgA")).is_none());
    }

    #[test]
    fn test_dotted_get() {
        let run = Run::new(multi_config());
        assert_eq!(run.get("settings.workdir"), Some(&json!("/scratch/run1")));
        assert_eq!(run.get("samples.s1.reference"), Some(&json!("hg38.fa")));
        assert_eq!(run.get("samples.s1.missing"), None);
        assert_eq!(run.get(""), Some(run.raw()));
    }

    #[test]
    fn test_missing_samples_mapping() {
        let run = Run::new(json!({"settings": {}}));
        assert!(run.samples().is_empty());
        assert!(run.unit_names().is_empty());
    }

    #[test]
    fn test_get_workdir() {
        let run = Run::new(multi_config());
        assert_eq!(run.get_workdir(None), Some("/scratch/run1"));
        assert_eq!(run.get_workdir(Some("/tmp")), Some("/scratch/run1"));

        let bare = Run::new(single_rg_config());
        assert_eq!(bare.get_workdir(None), None);
        assert_eq!(bare.get_workdir(Some("/tmp")), Some("/tmp"));
    }

    #[test]
    fn test_output_dir_precedence() {
        let from_config = Run::new(multi_config());
        assert_eq!(from_config.output_dir(), Some(Path::new("from-config")));

        let explicit = Run::new(multi_config()).with_output_dir("explicit");
        assert_eq!(explicit.output_dir(), Some(Path::new("explicit")));

        let none = Run::new(single_rg_config());
        assert_eq!(none.output_dir(), None);
    }

    #[test]
    fn test_output_without_dir_fails() {
        let run = Run::new(single_rg_config());
        assert!(matches!(run.output("x.txt"), Err(RattleError::MissingOutputDir)));
        assert!(matches!(
            run.output_for("x.txt", &Wildcards::new()),
            Err(RattleError::MissingOutputDir)
        ));
        assert!(matches!(
            run.make_output_fname("x.txt", Some("s"), None),
            Err(RattleError::MissingOutputDir)
        ));
    }

    #[test]
    fn test_output_unformatted_keeps_placeholders() {
        let run = Run::new(single_rg_config()).with_output_dir("results");
        assert_eq!(
            run.output("output-{sample}-{read_group}.txt").unwrap(),
            "results/output-{sample}-{read_group}.txt"
        );
    }

    #[test]
    fn test_output_for_extra_values() {
        let run = Run::new(single_rg_config()).with_output_dir("results");
        let wildcards = Wildcards::for_unit(&UnitName::new("s1", "rg1")).with("ext", "bam");
        assert_eq!(
            run.output_for("{sample}/{read_group}.{ext}", &wildcards).unwrap(),
            "results/s1/rg1.bam"
        );
    }

    #[test]
    fn test_output_absolute_fname_replaces_dir() {
        let run = Run::new(single_rg_config()).with_output_dir("results");
        assert_eq!(run.output("/abs/file.txt").unwrap(), "/abs/file.txt");
    }

    #[test]
    fn test_make_output_fname_defaults_to_placeholders() {
        let run = Run::new(single_rg_config()).with_output_dir("results");
        assert_eq!(
            run.make_output_fname("output-{sample}-{read_group}.txt", None, None)
                .unwrap(),
            "results/output-{sample}-{read_group}.txt"
        );
        assert_eq!(
            run.make_output_fname("output-{sample}-{read_group}.txt", Some("sample01"), Some("rg01"))
                .unwrap(),
            "results/output-sample01-rg01.txt"
        );
    }

    #[test]
    fn test_make_output_fname_unescapes_doubled_braces() {
        let run = Run::new(single_rg_config()).with_output_dir("results");
        assert_eq!(
            run.make_output_fname("{sample}.{{ext}}", Some("s1"), None).unwrap(),
            "results/s1.{ext}"
        );
    }

    #[test]
    fn test_config_input_func_named() {
        let run = Run::new(single_rg_config());
        let resolver = run.config_input_func_named("read_group", "r1").unwrap();
        assert_eq!(resolver.level(), Level::ReadGroup);
        assert_eq!(resolver.key(), "r1");

        assert!(matches!(
            run.config_input_func_named("SomeOtherType", "r1"),
            Err(RattleError::InvalidLevel(_))
        ));
    }

    #[test]
    fn test_rg_gather_func() {
        let run = Run::new(multi_config());
        let gather = run.rg_gather_func("aligned/{sample}-{read_group}.{ext}", [("ext", "bam")]);
        let wildcards = Wildcards::new().with("sample", "s2");

        assert_eq!(
            gather.resolve(&wildcards).unwrap(),
            vec!["aligned/s2-rgB.bam", "aligned/s2-rgA.bam"]
        );
    }

    #[test]
    fn test_rg_gather_func_custom_expander() {
        let run = Run::new(multi_config())
            .with_expander(|pattern: &str, _: &Substitutions| vec![pattern.to_uppercase()]);
        let gather = run.rg_gather_func("x", Vec::<(String, String)>::new());
        let wildcards = Wildcards::new().with("sample", "s1");
        assert_eq!(gather.resolve(&wildcards).unwrap(), vec!["X"]);

        let explicit = run.rg_gather_func_with(
            "{sample}:{read_group}",
            Vec::<(String, String)>::new(),
            Rc::new(ProductExpander),
        );
        assert_eq!(explicit.resolve(&wildcards).unwrap(), vec!["s1:rg1"]);
    }

    #[test]
    fn test_resolvers_outlive_run() {
        let resolver = {
            let run = Run::new(single_rg_config());
            run.config_input_func(Level::ReadGroup, "r1")
        };
        let wildcards = Wildcards::for_unit(&UnitName::new("sample01", "rg01"));
        assert_eq!(resolver.resolve(&wildcards).unwrap(), Some(json!("input-rg01.txt")));
    }

    #[test]
    fn test_from_file() {
        use tempfile::tempdir;

        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yml");
        std::fs::write(
            &config_path,
            "output_dir: out\nsamples:\n  s1:\n    read_groups:\n      rg1:\n        r1: a.fq\n",
        )
        .unwrap();

        let run = Run::from_file(&config_path).unwrap();
        assert_eq!(run.unit_names(), &[UnitName::new("s1", "rg1")]);
        assert_eq!(run.output("x").unwrap(), "out/x");
    }
}
