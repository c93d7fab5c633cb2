use anyhow::{Context, Result};
use clap::Parser;
use class_uniqueness::analyzer::ClassUniquenessAnalyzer;
use class_uniqueness::archive::scan_artifact;
use class_uniqueness::cli::{Cli, Commands, OutputFormat};
use class_uniqueness::config::{
    analyzer_config, log_level, resolve_artifact, resolve_artifacts, resolve_m2_repo,
};
use class_uniqueness::report::UniquenessReport;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    let cli = parse_cli();
    init_logging(log_level(&cli));

    match cli.command.clone() {
        Commands::Check {
            artifacts,
            path,
            format,
            output,
            fail_on_differing,
        } => {
            let m2_repo = resolve_m2_repo(&cli)?;
            let artifacts = resolve_artifacts(&artifacts, path.as_deref(), &m2_repo)?;
            if artifacts.is_empty() {
                anyhow::bail!("No artifacts to check. Pass jar paths, coordinates or --path DIR");
            }

            let mut analyzer = ClassUniquenessAnalyzer::new(analyzer_config(&cli));
            let summary = analyzer
                .analyze(&artifacts)
                .context("Class uniqueness analysis failed")?;
            let report = UniquenessReport::build(&analyzer, summary);
            write_report(&report, format, output.as_deref())?;

            if fail_on_differing && report.has_version_skew() {
                let groups = report
                    .problem_groups
                    .iter()
                    .filter(|g| g.is_version_skew())
                    .count();
                anyhow::bail!(
                    "{groups} group(s) of jars provide classes with differing implementations"
                );
            }
        }
        Commands::Classes { artifact } => {
            let m2_repo = resolve_m2_repo(&cli)?;
            let artifact = resolve_artifact(&artifact, &m2_repo)?;
            let entries = scan_artifact(&artifact)?.with_context(|| {
                format!("Jar not found: {} ({})", artifact.identity, artifact.path.display())
            })?;
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
    }

    Ok(())
}

fn init_logging(default_level: &str) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn parse_cli() -> Cli {
    let args: Vec<String> = std::env::args().collect();
    Cli::parse_from(rewrite_args_for_implicit_check(args))
}

/// `class-uniqueness [-f json] a.jar b.jar` is shorthand for
/// `class-uniqueness check [-f json] a.jar b.jar`. `check` goes in front of the
/// first token that is not a global option.
fn rewrite_args_for_implicit_check(mut args: Vec<String>) -> Vec<String> {
    if args.len() <= 1 {
        return args;
    }

    let subcommands = ["check", "classes", "help", "-h", "--help"];
    let global_with_values = ["--m2", "--jobs", "-j"];
    let global_flags = ["-v", "--verbose", "-q", "--quiet"];

    let mut idx = 1usize;
    while idx < args.len() {
        let a = args[idx].as_str();
        if global_with_values.contains(&a) {
            idx += 2;
            continue;
        }

        if global_flags.contains(&a) || a.starts_with("--m2=") || a.starts_with("--jobs=") {
            idx += 1;
            continue;
        }

        break;
    }

    if idx < args.len() {
        let token = args[idx].as_str();
        if !subcommands.contains(&token) {
            args.insert(idx, "check".to_string());
        }
    }

    args
}

fn write_report(report: &UniquenessReport, format: OutputFormat, output: Option<&Path>) -> Result<()> {
    let content = match format {
        OutputFormat::Json => report.to_json()?,
        OutputFormat::Text => report.to_text(),
    };

    if let Some(path) = output {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
    } else {
        print!("{content}");
        if !content.ends_with('\n') {
            println!();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrite_args_inserts_check_after_global_options() {
        let args = vec![
            "class-uniqueness".to_string(),
            "--m2".to_string(),
            "/tmp/m2".to_string(),
            "-j".to_string(),
            "4".to_string(),
            "org.example:demo:1.0".to_string(),
            "--fail-on-differing".to_string(),
        ];

        let rewritten = rewrite_args_for_implicit_check(args);
        assert_eq!(rewritten[1], "--m2");
        assert_eq!(rewritten[2], "/tmp/m2");
        assert_eq!(rewritten[3], "-j");
        assert_eq!(rewritten[4], "4");
        assert_eq!(rewritten[5], "check");
        assert_eq!(rewritten[6], "org.example:demo:1.0");
    }

    #[test]
    fn rewrite_args_skips_check_option_values() {
        let args = vec![
            "class-uniqueness".to_string(),
            "-f".to_string(),
            "json".to_string(),
            "--path".to_string(),
            "libs".to_string(),
            "a.jar".to_string(),
        ];

        let rewritten = rewrite_args_for_implicit_check(args);
        assert_eq!(
            &rewritten[1..],
            &["check", "-f", "json", "--path", "libs", "a.jar"]
        );
        Cli::try_parse_from(rewritten).expect("rewritten args parse");
    }

    #[test]
    fn rewrite_args_keeps_explicit_subcommands() {
        let args = vec![
            "class-uniqueness".to_string(),
            "classes".to_string(),
            "a.jar".to_string(),
        ];
        assert_eq!(rewrite_args_for_implicit_check(args.clone()), args);
    }
}
