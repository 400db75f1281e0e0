//! Dry-Run Planning
//!
//! Renders the command each unit would run, without running anything.
//! This mirrors what the orchestration engine prints in dry-run mode and is
//! used to check a configuration before handing it over.
//!
//! # Command Placeholders
//!
//! - `{input}` / `{inputs}` - space-separated input paths
//! - `{output}` - the unit's output path
//! - `{sample}` / `{read_group}` - the unit's names

use log::{debug, info};
use serde::Serialize;

use crate::error::Result;
use crate::paths::{substitute, InputFunction, Wildcards, READ_GROUP_WILDCARD, SAMPLE_WILDCARD};
use crate::units::{Run, UnitName};

/// The rendered command of one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitCommand {
    pub unit: UnitName,
    pub inputs: Vec<String>,
    pub output: String,
    pub command: String,
}

/// Plans one command per unit of `run`.
///
/// # Arguments
///
/// * `run` - Configuration view supplying the units and output directory
/// * `input` - Resolver called with each unit's wildcards
/// * `output_template` - Output file name, relative to the output directory
/// * `command_template` - Command line with placeholders
///
/// # Example
///
/// ```
/// use rattle::plan::plan_units;
/// use rattle::{Level, Run};
/// use serde_json::json;
///
/// let run = Run::new(json!({
///     "samples": {"sample01": {"read_groups": {"rg01": {"r1": "input-rg01.txt"}}}}
/// }))
/// .with_output_dir("results");
///
/// let plan = plan_units(
///     &run,
///     &run.config_input_func(Level::ReadGroup, "r1"),
///     "output-{sample}-{read_group}.txt",
///     "some_exe -i {input} -o {output}",
/// )
/// .unwrap();
///
/// assert_eq!(
///     plan[0].command,
///     "some_exe -i input-rg01.txt -o results/output-sample01-rg01.txt"
/// );
/// ```
pub fn plan_units(
    run: &Run,
    input: &dyn InputFunction,
    output_template: &str,
    command_template: &str,
) -> Result<Vec<UnitCommand>> {
    let mut planned = Vec::with_capacity(run.unit_names().len());

    for unit in run.unit_names() {
        let wildcards = Wildcards::for_unit(unit);
        let inputs = input.inputs(&wildcards)?;
        let output = run.output_for(output_template, &wildcards)?;
        let command = render_command(command_template, unit, &inputs, &output);

        debug!("Unit '{}': {}", unit, command);

        planned.push(UnitCommand {
            unit: unit.clone(),
            inputs,
            output,
            command,
        });
    }

    info!("Planned {} unit commands", planned.len());
    Ok(planned)
}

fn render_command(template: &str, unit: &UnitName, inputs: &[String], output: &str) -> String {
    let inputs_str = inputs.join(" ");
    substitute(
        template,
        [
            ("input", inputs_str.as_str()),
            ("inputs", inputs_str.as_str()),
            ("output", output),
            (SAMPLE_WILDCARD, unit.sample.as_str()),
            (READ_GROUP_WILDCARD, unit.read_group.as_str()),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RattleError;
    use crate::paths::Level;
    use serde_json::json;

    fn paired_run() -> Run {
        Run::new(json!({
            "output_dir": "results",
            "samples": {
                "sample01": {
                    "read_groups": {
                        "rg01": {"r1": "s1-rg01_R1.fq", "r2": "s1-rg01_R2.fq"},
                        "rg02": {"r1": "s1-rg02_R1.fq"},
                    }
                },
                "sample02": {
                    "read_groups": {"rg01": {"r1": "s2-rg01_R1.fq"}}
                },
            }
        }))
    }

    #[test]
    fn test_plan_one_command_per_unit() {
        let run = paired_run();
        let input = run.config_input_func(Level::ReadGroup, "r1");
        let plan = plan_units(&run, &input, "{sample}/{read_group}.bam", "align {input} > {output}")
            .unwrap();

        let commands: Vec<&str> = plan.iter().map(|c| c.command.as_str()).collect();
        assert_eq!(
            commands,
            vec![
                "align s1-rg01_R1.fq > results/sample01/rg01.bam",
                "align s1-rg02_R1.fq > results/sample01/rg02.bam",
                "align s2-rg01_R1.fq > results/sample02/rg01.bam",
            ]
        );
    }

    #[test]
    fn test_plan_missing_input_renders_empty() {
        let run = paired_run();
        let input = run.config_input_func(Level::ReadGroup, "r2");
        let plan = plan_units(&run, &input, "{sample}.txt", "tool -i '{input}'").unwrap();

        assert_eq!(plan[0].inputs, vec!["s1-rg01_R2.fq"]);
        assert!(plan[1].inputs.is_empty());
        assert_eq!(plan[1].command, "tool -i ''");
    }

    #[test]
    fn test_plan_with_gathered_inputs() {
        let run = paired_run();
        let gather = run.rg_gather_func("{sample}-{read_group}.bam", Vec::<(String, String)>::new());
        let plan = plan_units(&run, &gather, "{sample}.merged.bam", "merge {inputs} -o {output}").unwrap();

        assert_eq!(
            plan[0].command,
            "merge sample01-rg01.bam sample01-rg02.bam -o results/sample01.merged.bam"
        );
    }

    #[test]
    fn test_plan_requires_output_dir() {
        let run = Run::new(json!({"samples": {"s": {"read_groups": {"rg": {}}}}}));
        let input = run.config_input_func(Level::ReadGroup, "r1");
        let result = plan_units(&run, &input, "out.txt", "cmd");
        assert!(matches!(result, Err(RattleError::MissingOutputDir)));
    }

    #[test]
    fn test_plan_serializes() {
        let run = paired_run();
        let input = run.config_input_func(Level::Sample, "missing");
        let plan = plan_units(&run, &input, "{sample}.txt", "{sample}").unwrap();

        let value = serde_json::to_value(&plan[0]).unwrap();
        assert_eq!(value["unit"]["sample"], json!("sample01"));
        assert_eq!(value["command"], json!("sample01"));
    }
}
