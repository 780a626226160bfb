use crate::*;
use std::path::{Path, PathBuf};

pub fn handle_runtime_commands(cli: &Cli, settings: &Settings) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Compile { target, out_dir } => {
            let out_dir = resolve_out_dir(out_dir.as_ref(), settings);
            let report = compile_and_write(target, &out_dir, settings)?;
            print_one(cli.json, report, |r| {
                let mut lines = vec![format!("namespace: {}", r.namespace)];
                for a in &r.artifacts {
                    lines.push(format!("wrote {}\t{}", a.path, a.sha256));
                }
                if !r.dropped.is_empty() {
                    lines.push(format!("dropped: {}", r.dropped.join(", ")));
                }
                lines.join("\n")
            })?;
        }
        Commands::Train {
            target,
            out_dir,
            python,
        } => {
            let out_dir = resolve_out_dir(out_dir.as_ref(), settings);
            let compile = compile_and_write(target, &out_dir, settings)?;
            let python = python.as_deref().unwrap_or(&settings.python);
            let outcome = run_training(python, &out_dir, &compile.namespace);
            audit(
                "train",
                serde_json::json!({
                    "namespace": compile.namespace,
                    "ok": outcome.is_ok(),
                }),
            );
            let outcome = outcome?;
            let report = TrainReport {
                compile,
                exit_code: outcome.exit_code,
                stdout: outcome.stdout,
                stderr: outcome.stderr,
            };
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&JsonOut {
                        ok: true,
                        data: report
                    })?
                );
            } else {
                print!("{}", report.stdout);
                println!("trained {}", report.compile.namespace);
            }
        }
        Commands::Emit { target, artifact } => {
            let project = bind_target(target)?;
            let compiled = compiler_for(target, settings).compile(&project)?;
            let chosen = match artifact {
                ArtifactKind::Model => compiled.model,
                ArtifactKind::Train => compiled.trainer,
            };
            let report = EmitReport {
                name: chosen.name.to_string(),
                sha256: chosen.sha256(),
                content: chosen.render(),
            };
            print_one(cli.json, report, |r| r.content.trim_end().to_string())?;
        }
        Commands::Submit {
            payload,
            user,
            trainer_url,
        } => {
            let raw = read_payload(payload)?;
            let project = bind_project(&raw, user.as_deref())?;
            let url = trainer_url.as_deref().or(settings.trainer_url.as_deref());
            let report = submit_train(url, &project.train_body(), 10_000)?;
            audit(
                "submit",
                serde_json::json!({"namespace": project.user_id, "status": report.status}),
            );
            print_one(cli.json, report, |r| format!("submitted to {} ({})", r.url, r.status))?;
        }
        Commands::Order { .. } | Commands::TrainBody { .. } | Commands::Layers => {}
    }
    Ok(())
}

fn resolve_out_dir(flag: Option<&PathBuf>, settings: &Settings) -> PathBuf {
    flag.cloned().unwrap_or_else(|| settings.out_dir.clone())
}

fn bind_target(target: &Target) -> anyhow::Result<Project> {
    let raw = read_payload(&target.payload)?;
    Ok(bind_project(&raw, target.user.as_deref())?)
}

fn compiler_for<'s>(target: &Target, settings: &'s Settings) -> ProjectCompiler<'s> {
    let mut options = CompileOptions::from_settings(settings);
    if let Some(policy) = target.unreachable {
        options.unreachable = policy;
    }
    ProjectCompiler::new(&settings.dialect, options)
}

/// Binds and compiles before touching the filesystem, so a failing request
/// leaves no artifacts behind.
fn compile_and_write(
    target: &Target,
    out_dir: &Path,
    settings: &Settings,
) -> anyhow::Result<CompileReport> {
    let project = bind_target(target)?;
    let compiled = compiler_for(target, settings).compile(&project)?;
    let artifacts = write_artifacts(out_dir, &project, &compiled)?;
    audit(
        "compile",
        serde_json::json!({
            "namespace": project.user_id,
            "model_sha256": artifacts.first().map(|a| a.sha256.clone()),
        }),
    );
    Ok(CompileReport {
        namespace: project.user_id,
        out_dir: out_dir.display().to_string(),
        artifacts,
        order: compiled.order,
        dropped: compiled.dropped,
    })
}
