use crate::cli::AnglesArgs;
use crate::config::PartialAnalysisConfig;
use crate::error::{CliError, Result};
use crate::output::{generate_output_path, write_angle_file};
use crate::ui::IgnoredTablePrinter;
use crate::utils::progress::CliProgressHandler;
use phipsi::engine::aggregate::PerFileResult;
use phipsi::engine::progress::ProgressReporter;
use phipsi::engine::report::{IgnoredResidueReporter, NullReporter};
use phipsi::workflows::angles::{AngleInput, compute_angles};
use std::path::Path;
use tracing::{error, info};

fn summary_line(path: &Path, result: &PerFileResult) -> String {
    format!(
        "✓ {}: {} residue(s), {} with phi/psi, {} ignored",
        path.display(),
        result.len(),
        result.complete_count(),
        result.len() - result.complete_count()
    )
}

pub fn run(args: AnglesArgs, show_progress: bool) -> Result<()> {
    let partial_config = match &args.config {
        Some(path) => PartialAnalysisConfig::from_file(path)?,
        None => PartialAnalysisConfig::default(),
    };
    info!("Merging configuration from file and CLI arguments...");
    let settings = partial_config.merge_with_cli(&args)?;

    let input = match args.inputs.as_slice() {
        [single] => AngleInput::Single(single.clone()),
        many => AngleInput::Batch(many.to_vec()),
    };

    let progress_handler = CliProgressHandler::new(show_progress);
    let progress = ProgressReporter::with_callback(progress_handler.get_callback());
    let reporter: &dyn IgnoredResidueReporter = if settings.print_ignored {
        &IgnoredTablePrinter
    } else {
        &NullReporter
    };

    info!("Invoking the angle workflow on {} file(s)...", input.paths().len());
    let output = compute_angles(&input, &settings.analysis, reporter, &progress);

    let total = input.paths().len();
    let mut failures = 0;
    for (i, (path, outcome)) in input.paths().iter().zip(output.outcomes()).enumerate() {
        match outcome {
            Ok(result) => {
                if let Some(template) = &args.output {
                    let output_path = generate_output_path(template, i + 1, total);
                    info!("Writing angles for {:?} to {:?}", path, &output_path);
                    match write_angle_file(&output_path, result) {
                        Ok(()) => println!(
                            "{} -> {}",
                            summary_line(path, result),
                            output_path.display()
                        ),
                        Err(e) => {
                            failures += 1;
                            error!("Failed to write angles for {:?}: {}", path, e);
                            eprintln!("✗ {}: {}", path.display(), e);
                        }
                    }
                } else {
                    println!("{}", summary_line(path, result));
                }
            }
            Err(e) => {
                failures += 1;
                error!("Failed to analyze {:?}: {}", path, e);
                eprintln!("✗ {}: {}", path.display(), e);
            }
        }
    }

    if failures == total {
        return Err(CliError::AllInputsFailed { count: total });
    }
    if failures > 0 {
        println!("{} of {} file(s) could not be processed.", failures, total);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    const ALA_GLY_SER: &str = "\
ATOM      1  N   ALA A   1       0.000   0.000   0.000  1.00  0.00           N
ATOM      2  CA  ALA A   1       1.458   0.000   0.000  1.00  0.00           C
ATOM      3  C   ALA A   1       2.009   1.422   0.000  1.00  0.00           C
ATOM      4  N   GLY A   2       3.184   1.595   0.596  1.00  0.00           N
ATOM      5  CA  GLY A   2       3.822   2.905   0.666  1.00  0.00           C
ATOM      6  C   GLY A   2       4.091   3.462  -0.728  1.00  0.00           C
ATOM      7  N   SER A   3       4.614   2.615  -1.608  1.00  0.00           N
ATOM      8  CA  SER A   3       4.919   3.022  -2.974  1.00  0.00           C
ATOM      9  C   SER A   3       4.140   2.187  -3.985  1.00  0.00           C
END
";

    fn angles_args(argv: &[&str]) -> AnglesArgs {
        let mut full = vec!["phipsi", "angles"];
        full.extend_from_slice(argv);
        let Commands::Angles(args) = Cli::parse_from(full).command;
        args
    }

    #[test]
    fn writes_numbered_csv_per_successful_input() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.pdb");
        let bad = dir.path().join("bad.pdb");
        fs::write(&good, ALA_GLY_SER).unwrap();
        fs::write(&bad, "HEADER    nothing here\n").unwrap();
        let template = dir.path().join("angles.csv");

        let args = angles_args(&[
            good.to_str().unwrap(),
            bad.to_str().unwrap(),
            "-o",
            template.to_str().unwrap(),
        ]);
        run(args, false).unwrap();

        let written = fs::read_to_string(dir.path().join("angles_1.csv")).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines[0], "residue,phi,psi,status");
        assert!(lines[1].starts_with("A:ALA1,,150.0"));
        assert!(lines[2].starts_with("A:GLY2,-60.0"));
        assert!(lines[3].starts_with("A:SER3,-120.0"));
        assert!(!dir.path().join("angles_2.csv").exists());
    }

    #[test]
    fn unwritable_output_skips_that_file_and_continues() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("first.pdb");
        let second = dir.path().join("second.pdb");
        fs::write(&first, ALA_GLY_SER).unwrap();
        fs::write(&second, ALA_GLY_SER).unwrap();
        fs::create_dir(dir.path().join("angles_1.csv")).unwrap();
        let template = dir.path().join("angles.csv");

        let args = angles_args(&[
            first.to_str().unwrap(),
            second.to_str().unwrap(),
            "-o",
            template.to_str().unwrap(),
        ]);
        run(args, false).unwrap();

        let written = fs::read_to_string(dir.path().join("angles_2.csv")).unwrap();
        assert!(written.starts_with("residue,phi,psi,status"));
    }

    #[test]
    fn fails_when_no_output_can_be_written() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.pdb");
        fs::write(&input, ALA_GLY_SER).unwrap();
        let template = dir.path().join("taken.csv");
        fs::create_dir(&template).unwrap();

        let result = run(
            angles_args(&[input.to_str().unwrap(), "-o", template.to_str().unwrap()]),
            false,
        );

        assert!(matches!(result, Err(CliError::AllInputsFailed { count: 1 })));
    }

    #[test]
    fn fails_only_when_every_input_fails() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.pdb");

        let result = run(angles_args(&[missing.to_str().unwrap()]), false);

        assert!(matches!(result, Err(CliError::AllInputsFailed { count: 1 })));
    }

    #[test]
    fn invalid_configuration_is_reported_before_analysis() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.pdb");
        fs::write(&input, ALA_GLY_SER).unwrap();

        let result = run(
            angles_args(&[input.to_str().unwrap(), "-S", "residues.filter=everything"]),
            false,
        );

        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
